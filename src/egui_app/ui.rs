//! egui renderer for the waveform viewer.
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

use eframe::egui::{self, RichText};

use super::textures::SegmentTextures;
use crate::events::Subscriptions;
use crate::minimap::MinimapOptions;
use crate::options::WaveOptions;
use crate::regions::{RegionParams, RegionsEvent};
use crate::wave_view::{ContainerSize, ViewEvent, WaveView};

pub mod style;
mod waveform_view;

/// Smallest window the viewer allows.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(480.0, 240.0);
/// Width used before the first layout pass reports the real container.
const INITIAL_CONTAINER_WIDTH: f64 = 960.0;
const ZOOM_MAX_PX_PER_SEC: f64 = 2_000.0;
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Renders one [`WaveView`] with transport, zoom and region controls.
pub struct EguiApp {
    view: WaveView,
    textures: SegmentTextures,
    minimap_textures: SegmentTextures,
    status: Rc<RefCell<String>>,
    subscriptions: Subscriptions,
    pointer: waveform_view::PointerTracker,
    zoom: f64,
    loaded: Option<PathBuf>,
    visuals_set: bool,
}

impl EguiApp {
    /// Build the viewer and optionally load `path`.
    pub fn new(options: WaveOptions, path: Option<PathBuf>) -> Result<Self, String> {
        let container = ContainerSize::new(INITIAL_CONTAINER_WIDTH, f64::from(options.height));
        let zoom = f64::from(options.min_px_per_sec);
        let mut view = WaveView::new(container, options).map_err(|err| err.to_string())?;
        view.enable_minimap(MinimapOptions::default(), Instant::now())
            .map_err(|err| err.to_string())?;
        let mut app = Self {
            view,
            textures: SegmentTextures::new("wave_segment"),
            minimap_textures: SegmentTextures::new("minimap_segment"),
            status: Rc::new(RefCell::new(String::from("Drop a WAV file to begin"))),
            subscriptions: Subscriptions::new(),
            pointer: waveform_view::PointerTracker::default(),
            zoom,
            loaded: None,
            visuals_set: false,
        };
        app.subscribe();
        if let Some(path) = path {
            app.open(&path);
        }
        Ok(app)
    }

    fn subscribe(&mut self) {
        let status = Rc::clone(&self.status);
        self.subscriptions.push(self.view.on(move |event| {
            if let ViewEvent::Ready { duration } = event {
                *status.borrow_mut() = format!("Ready: {duration:.2}s");
            }
        }));
        let status = Rc::clone(&self.status);
        self.subscriptions.push(self.view.regions().on(move |event| match event {
            RegionsEvent::Created(region) | RegionsEvent::Updated(region) => {
                *status.borrow_mut() =
                    format!("Region {:.2}s - {:.2}s", region.start(), region.end());
            }
            RegionsEvent::In(region) => {
                tracing::debug!("Entered region {}", region.id());
            }
            _ => {}
        }));
        self.subscriptions
            .push(self.view.enable_drag_selection(RegionParams::default()));
    }

    fn open(&mut self, path: &Path) {
        self.textures.clear();
        self.minimap_textures.clear();
        match self.view.load_wav(path, Instant::now()) {
            Ok(()) => {
                self.loaded = Some(path.to_path_buf());
            }
            Err(err) => {
                tracing::warn!("Failed to load {}: {err}", path.display());
                *self.status.borrow_mut() = format!("Failed to load: {err}");
            }
        }
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .find_map(|file| file.path.clone())
        });
        if let Some(path) = dropped {
            self.open(&path);
        }
    }

    fn toggle_playback(&mut self) {
        let playback = self.view.playback_mut();
        if playback.is_playing() {
            playback.pause();
        } else {
            playback.play();
        }
    }

    fn render_controls(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        ui.horizontal(|ui| {
            let ready = self.view.duration().is_some();
            let label = if self.view.playback().is_playing() {
                "Pause"
            } else {
                "Play"
            };
            if ui.add_enabled(ready, egui::Button::new(label)).clicked() {
                self.toggle_playback();
            }
            let response = ui.add(
                egui::Slider::new(&mut self.zoom, 0.0..=ZOOM_MAX_PX_PER_SEC)
                    .text("px/s")
                    .logarithmic(true),
            );
            if response.changed() {
                self.view.zoom(self.zoom, Instant::now());
            }
            let has_regions = !self.view.regions().regions().is_empty();
            if ui
                .add_enabled(has_regions, egui::Button::new("Clear regions"))
                .clicked()
            {
                self.view.clear_regions();
            }
            ui.separator();
            if let Some(path) = self.loaded.as_ref()
                && let Some(name) = path.file_name()
            {
                ui.label(RichText::new(name.to_string_lossy()).color(palette.accent_ice));
            }
            ui.label(
                RichText::new(format!(
                    "{:.2}s  {}",
                    self.view.current_time(),
                    self.status.borrow()
                ))
                .color(palette.text_muted),
            );
        });
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        let now = Instant::now();
        self.handle_dropped_files(ctx);
        if ctx.input(|i| i.key_pressed(egui::Key::Space)) {
            self.toggle_playback();
        }
        self.view.tick(now);
        self.textures.sync(ctx, self.view.renderer().segments());
        if let Some(minimap) = self.view.minimap() {
            self.minimap_textures.sync(ctx, minimap.renderer().segments());
        }

        egui::TopBottomPanel::top("controls").show(ctx, |ui| self.render_controls(ui));
        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_waveform(ui, now);
            ui.add_space(6.0);
            self.render_minimap(ui, now);
        });

        ctx.request_repaint_after(FRAME_INTERVAL);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.subscriptions.release();
        self.view.destroy();
    }
}
