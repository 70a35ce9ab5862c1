//! Waveform pipeline: decoded channels, peak normalization, segment layout and
//! the lazily-growing segmented rasterizer.

mod decode;
mod error;
mod normalize;
mod render;
mod segments;
mod style;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use decode::{decode_wav_bytes, load_wav_file};
pub use error::{AudioLoadError, RenderError};
pub use normalize::{NormalizedPeaks, PeakNormalizer};
pub use render::{
    MAX_SEGMENT_PIXELS, RenderPass, RenderedSegment, SegmentedRenderer, ViewWindow,
    progress_crop_px,
};
pub use segments::{DrawingSegment, MAX_SEGMENT_WIDTH, SegmentLayout};
pub use style::{Lane, LaneSource, LaneStyle, resolve_lanes};

/// Vertical placement of bars inside a lane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarAlign {
    /// Bars grow outward from the horizontal center line.
    #[default]
    Middle,
    /// Bars hang from the top edge.
    Top,
    /// Bars stand on the bottom edge.
    Bottom,
}

/// Per-channel audio produced by a decoder, ready to normalize and render.
#[derive(Clone, Debug)]
pub struct DecodedAudio {
    /// One `[-1.0, 1.0]` buffer per channel, all the same length.
    pub channels: Vec<Arc<[f32]>>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Total duration in seconds.
    pub duration: f64,
}

impl DecodedAudio {
    /// Build decoded audio from owned channel buffers.
    ///
    /// The duration is derived from the longest channel and the sample rate.
    pub fn from_channels(channels: Vec<Vec<f32>>, sample_rate: u32) -> Self {
        let frames = channels.iter().map(Vec::len).max().unwrap_or(0);
        let duration = frames as f64 / sample_rate.max(1) as f64;
        Self {
            channels: channels.into_iter().map(Arc::from).collect(),
            sample_rate,
            duration,
        }
    }

    /// Number of channels (may be zero for an empty decode).
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of frames in the longest channel.
    pub fn frame_count(&self) -> usize {
        self.channels.iter().map(|c| c.len()).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_follows_longest_channel() {
        let audio = DecodedAudio::from_channels(vec![vec![0.0; 100], vec![0.0; 50]], 100);
        assert_eq!(audio.channel_count(), 2);
        assert_eq!(audio.frame_count(), 100);
        assert!((audio.duration - 1.0).abs() < 1e-12);
    }

    #[test]
    fn bar_align_uses_snake_case() {
        let text = serde_json::to_string(&BarAlign::Bottom).unwrap();
        assert_eq!(text, "\"bottom\"");
    }
}
