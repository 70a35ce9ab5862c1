//! Overview strip: the whole track drawn at container width, with the main
//! view's visible window marked on top. Clicking or dragging on it seeks.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::events::{Emitter, Subscription};
use crate::options::{Color, ConfigError, WaveOptions};
use crate::plugin::{HostInfo, Plugin};
use crate::waveform::{
    NormalizedPeaks, RenderedSegment, SegmentedRenderer, ViewWindow, progress_crop_px,
};

/// Overview height when none is configured.
pub const DEFAULT_MINIMAP_HEIGHT: u32 = 50;

fn default_overlay_color() -> Color {
    Color::from_rgba(100, 100, 100, 26)
}

/// Overview strip options. Unset colors follow the host view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimapOptions {
    pub height: u32,
    /// Fill of the visible-window indicator.
    pub overlay_color: Color,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wave_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_color: Option<Color>,
}

impl Default for MinimapOptions {
    fn default() -> Self {
        Self {
            height: DEFAULT_MINIMAP_HEIGHT,
            overlay_color: default_overlay_color(),
            wave_color: None,
            progress_color: None,
        }
    }
}

impl MinimapOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.height == 0 {
            return Err(ConfigError::InvalidOption {
                key: "minimap.height",
                reason: "must be at least 1 pixel".into(),
            });
        }
        Ok(())
    }

    /// Render options for the overview: one lane at the minimap height,
    /// stretched to the container.
    fn render_options(&self, host: &WaveOptions) -> WaveOptions {
        WaveOptions {
            height: self.height,
            wave_color: self.wave_color.unwrap_or(host.wave_color),
            progress_color: self.progress_color.unwrap_or(host.progress_color),
            min_px_per_sec: 0.0,
            fill_parent: true,
            split_channels: None,
            ..host.clone()
        }
    }
}

/// Events published by a [`Minimap`].
#[derive(Clone, Debug, PartialEq)]
pub enum MinimapEvent {
    /// The overview finished its first pass for the current audio.
    Ready,
    /// Click or drag on the overview at a track fraction.
    Interaction { fraction: f64 },
}

pub struct Minimap {
    options: MinimapOptions,
    style: WaveOptions,
    renderer: SegmentedRenderer,
    host: HostInfo,
    rendered_width: Option<u32>,
    has_audio: bool,
    ready: bool,
    events: Emitter<MinimapEvent>,
}

impl Minimap {
    pub fn new(options: MinimapOptions, host_options: &WaveOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self {
            style: options.render_options(host_options),
            options,
            renderer: SegmentedRenderer::new(),
            host: HostInfo::default(),
            rendered_width: None,
            has_audio: false,
            ready: false,
            events: Emitter::new(),
        })
    }

    pub fn options(&self) -> &MinimapOptions {
        &self.options
    }

    pub fn events(&self) -> &Emitter<MinimapEvent> {
        &self.events
    }

    pub fn on(&self, listener: impl FnMut(&MinimapEvent) + 'static) -> Subscription {
        self.events.on(listener)
    }

    pub fn renderer(&self) -> &SegmentedRenderer {
        &self.renderer
    }

    /// Overview width in pixels: the host container width.
    pub fn width(&self) -> u32 {
        self.host.container_width.max(0.0).floor() as u32
    }

    pub fn height(&self) -> u32 {
        self.options.height
    }

    /// Draw the first channel of `peaks`. Drawing happens on the next
    /// [`tick`](Self::tick).
    pub fn set_audio(&mut self, peaks: &NormalizedPeaks) {
        let first = NormalizedPeaks {
            channels: peaks.channels.iter().take(1).cloned().collect(),
            peak_scale: peaks.peak_scale,
        };
        self.renderer.set_audio(first, &self.style);
        self.has_audio = true;
        self.ready = false;
        self.rendered_width = None;
    }

    /// Follow a host option change.
    pub fn set_style(&mut self, host_options: &WaveOptions) {
        self.style = self.options.render_options(host_options);
        self.renderer.set_style(&self.style);
        self.rendered_width = None;
    }

    /// Redraw after audio or width changes; otherwise let growth continue.
    pub fn tick(&mut self, now: Instant) {
        if !self.has_audio {
            return;
        }
        let window = self.window();
        if self.rendered_width == Some(window.total_width) {
            self.renderer.tick(window, now);
            return;
        }
        let pass = self.renderer.render(window, now);
        self.rendered_width = Some(window.total_width);
        if !self.ready && pass.drawn > 0 {
            self.ready = true;
            tracing::debug!("Minimap drew {} segment(s)", pass.drawn);
            self.events.emit(&MinimapEvent::Ready);
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// The whole overview is one window: no scrolling.
    pub fn window(&self) -> ViewWindow {
        let width = self.width();
        ViewWindow {
            scroll: 0.0,
            width: f64::from(width),
            total_width: width,
        }
    }

    /// Host's visible window as `(start, end)` track fractions.
    pub fn visible_window(&self) -> (f64, f64) {
        self.host.visible
    }

    /// Indicator `(left, width)` in overview pixels.
    pub fn indicator_px(&self) -> (f64, f64) {
        let width = f64::from(self.width());
        let (start, end) = self.host.visible;
        (start * width, (end - start).max(0.0) * width)
    }

    /// Track fraction under overview pixel `x`.
    pub fn fraction_at(&self, x: f64) -> Option<f64> {
        let width = f64::from(self.width());
        if self.host.duration.is_none() || width <= 0.0 || !x.is_finite() {
            return None;
        }
        Some((x / width).clamp(0.0, 1.0))
    }

    /// Report a click or drag at overview pixel `x`; returns the fraction the
    /// host should seek to.
    pub fn interact(&mut self, x: f64) -> Option<f64> {
        let fraction = self.fraction_at(x)?;
        self.events.emit(&MinimapEvent::Interaction { fraction });
        Some(fraction)
    }

    /// Drawn segments with the visible width of their progress overlay.
    pub fn segments(&self, progress: f64) -> impl Iterator<Item = (&RenderedSegment, f32)> {
        let total_width = self.width();
        self.renderer
            .segments()
            .map(move |segment| (segment, progress_crop_px(&segment.segment, progress, total_width)))
    }
}

impl Plugin for Minimap {
    fn name(&self) -> &'static str {
        "minimap"
    }

    fn init(&mut self, host: &HostInfo) {
        self.host = *host;
    }

    fn destroy(&mut self) {
        self.renderer.destroy();
        self.has_audio = false;
        self.ready = false;
        self.rendered_width = None;
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::sync::Arc;

    fn peaks(channels: usize) -> NormalizedPeaks {
        NormalizedPeaks {
            channels: (0..channels)
                .map(|c| Arc::from(vec![0.5 / (c + 1) as f32; 1_000]))
                .collect(),
            peak_scale: 1.0,
        }
    }

    fn host(container_width: f64, visible: (f64, f64)) -> HostInfo {
        HostInfo {
            duration: Some(10.0),
            total_width: 4_000,
            container_width,
            visible,
        }
    }

    #[test]
    fn draws_the_first_channel_at_container_width() {
        let mut minimap = Minimap::new(MinimapOptions::default(), &WaveOptions::default()).unwrap();
        let ready = Rc::new(Cell::new(0));
        let counter = Rc::clone(&ready);
        let _sub = minimap.on(move |event| {
            if *event == MinimapEvent::Ready {
                counter.set(counter.get() + 1);
            }
        });
        minimap.init(&host(800.0, (0.0, 0.2)));
        minimap.set_audio(&peaks(2));
        minimap.tick(Instant::now());

        assert!(minimap.is_ready());
        assert_eq!(ready.get(), 1);
        assert_eq!(minimap.renderer().lanes().len(), 1);
        assert_eq!(minimap.renderer().image_height(), DEFAULT_MINIMAP_HEIGHT);
        assert!(minimap.renderer().is_complete());
        let segment = minimap.renderer().segment(0).unwrap();
        assert_eq!(segment.segment.pixel_width, 800);
        assert_eq!(minimap.renderer().peaks().unwrap().channels.len(), 1);
    }

    #[test]
    fn width_change_redraws() {
        let mut minimap = Minimap::new(MinimapOptions::default(), &WaveOptions::default()).unwrap();
        minimap.init(&host(800.0, (0.0, 0.2)));
        minimap.set_audio(&peaks(1));
        let now = Instant::now();
        minimap.tick(now);
        let first = minimap.renderer().generation();
        minimap.tick(now);
        assert_eq!(minimap.renderer().generation(), first);
        minimap.init(&host(500.0, (0.0, 0.2)));
        minimap.tick(now);
        assert!(minimap.renderer().generation() > first);
        assert_eq!(minimap.renderer().segment(0).unwrap().segment.pixel_width, 500);
    }

    #[test]
    fn indicator_tracks_the_host_window() {
        let mut minimap = Minimap::new(MinimapOptions::default(), &WaveOptions::default()).unwrap();
        minimap.init(&host(1_000.0, (0.25, 0.5)));
        let (left, width) = minimap.indicator_px();
        assert!((left - 250.0).abs() < 1e-9);
        assert!((width - 250.0).abs() < 1e-9);
    }

    #[test]
    fn interaction_reports_a_clamped_fraction() {
        let mut minimap = Minimap::new(MinimapOptions::default(), &WaveOptions::default()).unwrap();
        assert_eq!(minimap.interact(10.0), None);
        minimap.init(&host(1_000.0, (0.0, 0.25)));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = minimap.on(move |event| sink.borrow_mut().push(event.clone()));
        assert_eq!(minimap.interact(400.0), Some(0.4));
        assert_eq!(minimap.interact(2_000.0), Some(1.0));
        assert_eq!(
            *seen.borrow(),
            vec![
                MinimapEvent::Interaction { fraction: 0.4 },
                MinimapEvent::Interaction { fraction: 1.0 },
            ]
        );
    }

    #[test]
    fn zero_height_is_rejected() {
        let options = MinimapOptions {
            height: 0,
            ..MinimapOptions::default()
        };
        let err = Minimap::new(options, &WaveOptions::default()).err().unwrap();
        assert!(matches!(err, ConfigError::InvalidOption { key: "minimap.height", .. }));
    }

    #[test]
    fn destroy_releases_images_and_listeners() {
        let mut minimap = Minimap::new(MinimapOptions::default(), &WaveOptions::default()).unwrap();
        minimap.init(&host(600.0, (0.0, 1.0)));
        minimap.set_audio(&peaks(1));
        minimap.tick(Instant::now());
        let _sub = minimap.on(|_| {});
        minimap.destroy();
        assert_eq!(minimap.renderer().drawn_count(), 0);
        assert_eq!(minimap.events().listener_count(), 0);
        minimap.tick(Instant::now());
        assert_eq!(minimap.renderer().drawn_count(), 0);
    }
}
