//! Host facade: one viewport, renderer and region collection per view.
//!
//! The host calls [`WaveView::tick`] once per frame with the current instant;
//! all debounced work (segment growth, resize re-render, playback progress)
//! happens from there. Pointer input is fed through the methods in `input.rs`
//! in container coordinates.

mod input;

use std::path::Path;
use std::time::Instant;

use crate::debounce::{Debouncer, RESIZE_DELAY};
use crate::drag::DragController;
use crate::events::{Emitter, Subscription};
use crate::minimap::{Minimap, MinimapOptions};
use crate::options::{ConfigError, WaveOptions};
use crate::playback::{ClockPlayback, Playback};
use crate::plugin::{HostInfo, Plugin};
use crate::regions::{RegionGeometry, RegionId, RegionParams, Regions};
use crate::viewport::{ViewportController, ViewportState};
use crate::waveform::{
    AudioLoadError, DecodedAudio, PeakNormalizer, RenderPass, RenderedSegment, SegmentedRenderer,
    load_wav_file, progress_crop_px,
};

/// Events published by a [`WaveView`].
#[derive(Clone, Debug, PartialEq)]
pub enum ViewEvent {
    /// Audio is loaded and the first pass is drawn.
    Ready { duration: f64 },
    /// A render pass drew its visible segments.
    Render(RenderPass),
    /// Visible window changed, as content fractions.
    Scroll { start: f64, end: f64 },
    /// Click on the waveform at a content fraction.
    Click { fraction: f64 },
    /// Scrub position while dragging across the waveform.
    Drag { fraction: f64 },
    Zoom { px_per_sec: f64 },
}

/// Size of the area the view renders into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

impl ContainerSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let usable = |v: f64| v.is_finite() && v > 0.0;
        if usable(self.width) && usable(self.height) {
            Ok(())
        } else {
            Err(ConfigError::MissingContainer {
                width: self.width as f32,
                height: self.height as f32,
            })
        }
    }
}

/// Which component owns the pointer between press and release.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum PointerRoute {
    #[default]
    None,
    Regions,
    Scrub,
}

pub struct WaveView {
    options: WaveOptions,
    container: ContainerSize,
    viewport: ViewportController,
    renderer: SegmentedRenderer,
    regions: Regions,
    scrub: DragController,
    playback: Box<dyn Playback>,
    host_playback: bool,
    audio: Option<DecodedAudio>,
    current_time: f64,
    resize: Debouncer,
    pending_width: Option<f64>,
    plugins: Vec<Box<dyn Plugin>>,
    minimap: Option<Minimap>,
    route: PointerRoute,
    events: Emitter<ViewEvent>,
    destroyed: bool,
}

impl WaveView {
    /// Create a view for `container`. Fails on an unusable container or
    /// invalid options.
    pub fn new(container: ContainerSize, options: WaveOptions) -> Result<Self, ConfigError> {
        container.validate()?;
        options.validate()?;
        let viewport = ViewportController::new(&options, container.width);
        Ok(Self {
            container,
            viewport,
            renderer: SegmentedRenderer::new(),
            regions: Regions::new(),
            scrub: DragController::default(),
            playback: Box::new(ClockPlayback::new(0.0)),
            host_playback: false,
            audio: None,
            current_time: 0.0,
            resize: Debouncer::new(RESIZE_DELAY),
            pending_width: None,
            plugins: Vec::new(),
            minimap: None,
            route: PointerRoute::None,
            events: Emitter::new(),
            destroyed: false,
            options,
        })
    }

    pub fn options(&self) -> &WaveOptions {
        &self.options
    }

    pub fn container(&self) -> ContainerSize {
        self.container
    }

    pub fn viewport(&self) -> &ViewportState {
        self.viewport.state()
    }

    pub fn events(&self) -> &Emitter<ViewEvent> {
        &self.events
    }

    pub fn on(&self, listener: impl FnMut(&ViewEvent) + 'static) -> Subscription {
        self.events.on(listener)
    }

    pub fn playback(&self) -> &dyn Playback {
        self.playback.as_ref()
    }

    pub fn playback_mut(&mut self) -> &mut dyn Playback {
        self.playback.as_mut()
    }

    /// Swap the transport. Without one, loads install a silent
    /// [`ClockPlayback`] sized to the audio.
    pub fn set_playback(&mut self, playback: Box<dyn Playback>) {
        self.playback = playback;
        self.host_playback = true;
    }

    /// Attach a plugin; it is initialized now and on every layout change.
    pub fn register_plugin(&mut self, mut plugin: Box<dyn Plugin>) {
        plugin.init(&self.host_info());
        tracing::debug!("Registered plugin {}", plugin.name());
        self.plugins.push(plugin);
    }

    /// Duration of the loaded audio.
    pub fn duration(&self) -> Option<f64> {
        self.audio.as_ref().map(|audio| audio.duration)
    }

    /// Playhead time last reported through [`on_time_update`](Self::on_time_update).
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Played fraction of the track.
    pub fn progress(&self) -> f64 {
        match self.duration() {
            Some(duration) if duration > 0.0 => (self.current_time / duration).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    /// Replace the options and re-render.
    pub fn set_options(&mut self, options: WaveOptions, now: Instant) -> Result<(), ConfigError> {
        options.validate()?;
        let renormalize = options.normalize != self.options.normalize
            || options.normalize_reference != self.options.normalize_reference;
        self.options = options;
        self.viewport.apply_options(&self.options);
        if renormalize && let Some(audio) = self.audio.as_ref() {
            let peaks = self.normalizer().apply(&audio.channels);
            self.renderer.set_audio(peaks, &self.options);
        } else {
            self.renderer.set_style(&self.options);
        }
        if let Some(minimap) = self.minimap.as_mut() {
            minimap.set_style(&self.options);
            if let Some(peaks) = self.renderer.peaks() {
                minimap.set_audio(peaks);
            }
        }
        if self.audio.is_some() {
            self.rerender(now);
        }
        Ok(())
    }

    /// Load decoded audio: normalize, lay out, draw the visible segments and
    /// commit regions that were waiting for the duration.
    pub fn load(&mut self, audio: DecodedAudio, now: Instant) {
        if self.destroyed {
            return;
        }
        let peaks = self.normalizer().apply(&audio.channels);
        if let Some(minimap) = self.minimap.as_mut() {
            minimap.set_audio(&peaks);
        }
        self.renderer.set_audio(peaks, &self.options);
        self.viewport.set_duration(audio.duration);
        self.viewport.set_scroll(0.0);
        self.current_time = 0.0;
        let duration = audio.duration;
        if !self.host_playback {
            self.playback = Box::new(ClockPlayback::new(duration));
        }
        tracing::info!(
            "Loaded {} channel(s), {:.2}s at {} Hz",
            audio.channel_count(),
            duration,
            audio.sample_rate
        );
        self.audio = Some(audio);
        self.rerender(now);
        self.events.emit(&ViewEvent::Ready { duration });
    }

    /// Decode a WAV file and [`load`](Self::load) it.
    pub fn load_wav(&mut self, path: &Path, now: Instant) -> Result<(), AudioLoadError> {
        let audio = load_wav_file(path)?;
        self.load(audio, now);
        Ok(())
    }

    /// Change zoom, keeping the scroll fraction.
    pub fn zoom(&mut self, px_per_sec: f64, now: Instant) {
        let before = self.viewport.state().scroll;
        self.viewport.set_zoom(px_per_sec);
        if self.audio.is_some() {
            self.rerender(now);
        }
        self.events.emit(&ViewEvent::Zoom {
            px_per_sec: self.viewport.state().px_per_sec,
        });
        if self.viewport.state().scroll != before {
            self.emit_scroll();
        }
    }

    /// Report a new container size. The re-render is debounced.
    pub fn resize(&mut self, container: ContainerSize, now: Instant) {
        if container.validate().is_err() {
            tracing::debug!("Ignoring unusable container size {container:?}");
            return;
        }
        self.container = container;
        self.pending_width = Some(container.width);
        self.resize.trigger(now);
    }

    /// Scroll to `px` content pixels.
    pub fn scroll_to(&mut self, px: f64, now: Instant) {
        if self.viewport.set_scroll(px) {
            self.viewport.set_scrolling(true);
            self.after_scroll(now);
        }
    }

    pub fn scroll_by(&mut self, dx: f64, now: Instant) {
        self.scroll_to(self.viewport.state().scroll + dx, now);
    }

    pub fn scroll_to_fraction(&mut self, fraction: f64, now: Instant) {
        if self.viewport.scroll_to_fraction(fraction) {
            self.viewport.set_scrolling(true);
            self.after_scroll(now);
        }
    }

    /// Frame tick: resize re-render, segment growth and playback progress.
    pub fn tick(&mut self, now: Instant) {
        if self.destroyed {
            return;
        }
        if self.resize.fire_if_due(now)
            && let Some(width) = self.pending_width.take()
        {
            let scroll = self.viewport.state().scroll;
            self.viewport.set_container_width(width);
            tracing::debug!("Container resized to {width:.0} px");
            if self.audio.is_some() {
                self.rerender(now);
            }
            if self.viewport.state().scroll != scroll {
                self.emit_scroll();
            }
        }
        self.renderer.tick(self.viewport.window(), now);
        if let Some(minimap) = self.minimap.as_mut() {
            minimap.tick(now);
        }
        if self.playback.is_playing() {
            let time = self.playback.current_time();
            self.on_time_update(time, now);
        }
        self.viewport.set_scrolling(false);
    }

    /// Playhead moved: update progress, follow it, track active regions.
    pub fn on_time_update(&mut self, time: f64, now: Instant) {
        if self.destroyed || !time.is_finite() {
            return;
        }
        self.current_time = time.max(0.0);
        if self.viewport.follow_playhead(self.current_time, self.playback.is_playing()) {
            self.after_scroll(now);
        }
        self.regions.update_time(self.current_time);
    }

    /// Seek the transport and the progress overlay to `fraction` of the track.
    pub fn seek_to_fraction(&mut self, fraction: f64, now: Instant) {
        let Some(duration) = self.duration() else {
            return;
        };
        let time = fraction.clamp(0.0, 1.0) * duration;
        self.playback.set_time(time);
        self.on_time_update(time, now);
    }

    pub fn regions(&self) -> &Regions {
        &self.regions
    }

    pub fn regions_mut(&mut self) -> &mut Regions {
        &mut self.regions
    }

    pub fn add_region(&mut self, params: RegionParams) -> RegionId {
        self.regions.add_region(params)
    }

    pub fn clear_regions(&mut self) {
        self.regions.clear_regions();
    }

    pub fn enable_drag_selection(&mut self, params: RegionParams) -> Subscription {
        self.regions.enable_drag_selection(params)
    }

    /// Seek to a region's start and play it.
    pub fn play_region(&mut self, id: &RegionId) -> bool {
        self.regions.play_region(id, self.playback.as_mut())
    }

    /// Attach the overview strip, replacing any previous one.
    pub fn enable_minimap(
        &mut self,
        options: MinimapOptions,
        now: Instant,
    ) -> Result<(), ConfigError> {
        let mut minimap = Minimap::new(options, &self.options)?;
        minimap.init(&self.host_info());
        if let Some(peaks) = self.renderer.peaks() {
            minimap.set_audio(peaks);
        }
        minimap.tick(now);
        if let Some(mut previous) = self.minimap.replace(minimap) {
            previous.destroy();
        }
        tracing::debug!("Minimap enabled");
        Ok(())
    }

    pub fn disable_minimap(&mut self) {
        if let Some(mut minimap) = self.minimap.take() {
            minimap.destroy();
        }
    }

    pub fn minimap(&self) -> Option<&Minimap> {
        self.minimap.as_ref()
    }

    /// Click or drag on the overview at pixel `x`: seek there. Returns the
    /// fraction seeked to.
    pub fn minimap_seek(&mut self, x: f64, now: Instant) -> Option<f64> {
        let fraction = self.minimap.as_mut()?.interact(x)?;
        self.seek_to_fraction(fraction, now);
        Some(fraction)
    }

    /// Drawn segments with the visible width of their progress overlay.
    pub fn segments(&self) -> impl Iterator<Item = (&RenderedSegment, f32)> {
        let progress = self.progress();
        let total_width = self.viewport.state().total_width();
        self.renderer
            .segments()
            .map(move |segment| (segment, progress_crop_px(&segment.segment, progress, total_width)))
    }

    pub fn renderer(&self) -> &SegmentedRenderer {
        &self.renderer
    }

    /// Cancel all pending work and release every resource and listener.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.renderer.destroy();
        self.regions.destroy();
        self.disable_minimap();
        for plugin in &mut self.plugins {
            plugin.destroy();
        }
        self.plugins.clear();
        self.resize.cancel();
        self.pending_width = None;
        self.scrub.detach();
        self.route = PointerRoute::None;
        self.audio = None;
        self.events.clear();
        self.destroyed = true;
        tracing::debug!("Wave view destroyed");
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn normalizer(&self) -> PeakNormalizer {
        PeakNormalizer::new(self.options.normalize, self.options.normalize_reference)
    }

    fn host_info(&self) -> HostInfo {
        let state = self.viewport.state();
        HostInfo {
            duration: self.duration(),
            total_width: state.total_width(),
            container_width: state.container_width,
            visible: state.visible_fractions(),
        }
    }

    fn rerender(&mut self, now: Instant) {
        let pass = self.renderer.render(self.viewport.window(), now);
        self.sync_layout();
        if let Some(minimap) = self.minimap.as_mut() {
            minimap.tick(now);
        }
        self.events.emit(&ViewEvent::Render(pass));
    }

    fn sync_layout(&mut self) {
        let host = self.host_info();
        self.regions.set_geometry(RegionGeometry {
            duration: host.duration,
            total_width: host.total_width as f64,
        });
        if let Some(minimap) = self.minimap.as_mut() {
            minimap.init(&host);
        }
        for plugin in &mut self.plugins {
            plugin.init(&host);
        }
    }

    fn after_scroll(&mut self, now: Instant) {
        self.renderer.ensure_visible(self.viewport.window(), now);
        self.emit_scroll();
    }

    fn emit_scroll(&mut self) {
        let host = self.host_info();
        if let Some(minimap) = self.minimap.as_mut() {
            minimap.init(&host);
        }
        let (start, end) = host.visible;
        self.events.emit(&ViewEvent::Scroll { start, end });
    }
}

impl Drop for WaveView {
    fn drop(&mut self) {
        self.destroy();
    }
}
