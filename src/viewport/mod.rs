//! Scroll position, zoom and pointer-to-time mapping for one waveform view.

mod autoscroll;

pub use autoscroll::{CENTER_STEP_DIVISOR, DRAG_FOLLOW_MARGIN, FollowPolicy, follow_playhead};

use crate::options::WaveOptions;
use crate::waveform::ViewWindow;

/// Mutable viewport record. Derived values are computed on demand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
    /// Zoom requested by the host, in pixels per second.
    pub px_per_sec: f64,
    /// Lower bound on the effective zoom.
    pub min_px_per_sec: f64,
    /// Stretch short content to the container width.
    pub fill_parent: bool,
    /// Scroll offset in content pixels.
    pub scroll: f64,
    pub container_width: f64,
    /// Audio duration in seconds; zero before audio is ready.
    pub duration: f64,
    /// Set while the host is actively scrolling; suppresses playhead following.
    pub is_scrolling: bool,
    /// Set while the user scrubs or drags on the waveform.
    pub is_dragging: bool,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            px_per_sec: 0.0,
            min_px_per_sec: 0.0,
            fill_parent: true,
            scroll: 0.0,
            container_width: 0.0,
            duration: 0.0,
            is_scrolling: false,
            is_dragging: false,
        }
    }
}

impl ViewportState {
    /// Effective zoom.
    pub fn effective_px_per_sec(&self) -> f64 {
        self.px_per_sec.max(self.min_px_per_sec).max(0.0)
    }

    /// Width the content needs at the current zoom.
    pub fn scroll_width(&self) -> u32 {
        let width = (self.duration.max(0.0) * self.effective_px_per_sec()).ceil();
        if width.is_finite() { width.min(u32::MAX as f64) as u32 } else { 0 }
    }

    pub fn is_scrollable(&self) -> bool {
        self.scroll_width() as f64 > self.container_width
    }

    /// Content width in pixels.
    pub fn total_width(&self) -> u32 {
        if self.fill_parent && !self.is_scrollable() {
            self.container_width.max(0.0).floor() as u32
        } else {
            self.scroll_width()
        }
    }

    pub fn max_scroll(&self) -> f64 {
        (self.total_width() as f64 - self.container_width).max(0.0)
    }

    /// Scroll offset as a fraction of the content width.
    pub fn scroll_fraction(&self) -> f64 {
        let total = self.total_width();
        if total == 0 {
            0.0
        } else {
            self.scroll / total as f64
        }
    }

    /// `[start, end]` of the visible window as fractions of the content.
    pub fn visible_fractions(&self) -> (f64, f64) {
        let total = self.total_width() as f64;
        if total <= 0.0 {
            return (0.0, 1.0);
        }
        let start = (self.scroll / total).clamp(0.0, 1.0);
        let end = ((self.scroll + self.container_width) / total).clamp(0.0, 1.0);
        (start, end)
    }

    /// Visible time range in seconds.
    pub fn visible_time_range(&self) -> (f64, f64) {
        let (start, end) = self.visible_fractions();
        (start * self.duration, end * self.duration)
    }

    /// Map a container-relative x coordinate to a content fraction in `[0, 1]`.
    pub fn pointer_to_fraction(&self, x: f64) -> f64 {
        let total = self.total_width() as f64;
        if total <= 0.0 || !x.is_finite() {
            return 0.0;
        }
        ((x + self.scroll) / total).clamp(0.0, 1.0)
    }

    pub fn pointer_to_time(&self, x: f64) -> f64 {
        self.pointer_to_fraction(x) * self.duration
    }

    /// Content pixel of `time`.
    pub fn time_to_px(&self, time: f64) -> f64 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        time / self.duration * self.total_width() as f64
    }

    pub fn window(&self) -> ViewWindow {
        ViewWindow {
            scroll: self.scroll,
            width: self.container_width,
            total_width: self.total_width(),
        }
    }
}

/// Owns the [`ViewportState`] and applies zoom, resize and scroll changes.
#[derive(Clone, Debug)]
pub struct ViewportController {
    state: ViewportState,
    auto_scroll: bool,
    auto_center: bool,
}

impl ViewportController {
    pub fn new(options: &WaveOptions, container_width: f64) -> Self {
        let mut controller = Self {
            state: ViewportState {
                container_width,
                ..ViewportState::default()
            },
            auto_scroll: options.auto_scroll,
            auto_center: options.auto_center,
        };
        controller.apply_options(options);
        controller
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn window(&self) -> ViewWindow {
        self.state.window()
    }

    pub fn apply_options(&mut self, options: &WaveOptions) {
        self.state.min_px_per_sec = options.min_px_per_sec as f64;
        self.state.fill_parent = options.fill_parent;
        self.auto_scroll = options.auto_scroll;
        self.auto_center = options.auto_center;
        self.clamp_scroll();
    }

    pub fn set_duration(&mut self, duration: f64) {
        self.state.duration = if duration.is_finite() {
            duration.max(0.0)
        } else {
            0.0
        };
        self.clamp_scroll();
    }

    /// Change zoom, keeping the scroll fraction. Returns whether the content
    /// width changed.
    pub fn set_zoom(&mut self, px_per_sec: f64) -> bool {
        let px_per_sec = if px_per_sec.is_finite() {
            px_per_sec.max(0.0)
        } else {
            0.0
        };
        let before = self.state.total_width();
        let fraction = self.state.scroll_fraction();
        self.state.px_per_sec = px_per_sec;
        let after = self.state.total_width();
        self.state.scroll = fraction * after as f64;
        self.clamp_scroll();
        before != after
    }

    pub fn set_container_width(&mut self, width: f64) -> bool {
        let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        if (width - self.state.container_width).abs() < f64::EPSILON {
            return false;
        }
        self.state.container_width = width;
        self.clamp_scroll();
        true
    }

    /// Set the scroll offset, clamped to the content. Returns whether it moved.
    pub fn set_scroll(&mut self, px: f64) -> bool {
        if !px.is_finite() {
            return false;
        }
        let before = self.state.scroll;
        self.state.scroll = px;
        self.clamp_scroll();
        (self.state.scroll - before).abs() > f64::EPSILON
    }

    pub fn scroll_by(&mut self, dx: f64) -> bool {
        self.set_scroll(self.state.scroll + dx)
    }

    pub fn scroll_to_fraction(&mut self, fraction: f64) -> bool {
        let px = fraction.clamp(0.0, 1.0) * self.state.total_width() as f64;
        self.set_scroll(px)
    }

    pub fn set_scrolling(&mut self, scrolling: bool) {
        self.state.is_scrolling = scrolling;
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.state.is_dragging = dragging;
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging
    }

    /// Keep the playhead at `time` in view. Returns whether the scroll moved.
    pub fn follow_playhead(&mut self, time: f64, is_playing: bool) -> bool {
        if !self.auto_scroll || self.state.is_scrolling || !self.state.is_scrollable() {
            return false;
        }
        let policy = FollowPolicy {
            auto_center: self.auto_center,
            is_playing,
        };
        match follow_playhead(&self.state, self.state.time_to_px(time), policy) {
            Some(scroll) => {
                self.state.scroll = scroll;
                true
            }
            None => false,
        }
    }

    fn clamp_scroll(&mut self) {
        self.state.scroll = self.state.scroll.clamp(0.0, self.state.max_scroll());
    }
}
