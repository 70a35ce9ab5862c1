//! egui viewer for a single waveform view.

mod textures;
pub mod ui;
