//! Library exports for the viewer, benchmarks and tests.
//!
//! [`WaveView`] ties the pieces together: decoded audio is normalized,
//! drawn into bounded-width segments by the [`waveform`] renderer, scrolled
//! and zoomed through the [`viewport`], and annotated with time [`regions`].

/// Application directory resolution.
pub mod app_dirs;
/// Polled trailing-edge debouncing.
pub mod debounce;
/// Pointer drag state machine.
pub mod drag;
/// egui viewer.
pub mod egui_app;
/// Listener registry and subscription handles.
pub mod events;
/// Tracing setup with rotating log files.
pub mod logging;
/// Overview strip with the visible-window indicator.
pub mod minimap;
/// Waveform options and their TOML persistence.
pub mod options;
/// Transport seam.
pub mod playback;
/// View component lifecycle.
pub mod plugin;
/// Time regions and their interaction model.
pub mod regions;
/// Scroll, zoom and auto-scroll.
pub mod viewport;
/// Host-facing facade.
pub mod wave_view;
/// Waveform decoding, normalization and segmented rendering.
pub mod waveform;

pub use wave_view::{ContainerSize, ViewEvent, WaveView};
