use std::path::PathBuf;
use thiserror::Error;

/// Failures while turning a WAV file into [`DecodedAudio`](super::DecodedAudio).
#[derive(Debug, Error)]
pub enum AudioLoadError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid wav: {source}")]
    Invalid { source: hound::Error },
    #[error("Sample error: {source}")]
    Sample { source: hound::Error },
    #[error("Unsupported wav layout: {message}")]
    Unsupported { message: String },
}

/// Reasons a single drawing segment could not be rasterized.
///
/// These never abort a render pass; the segment is skipped with a warning.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("Segment {index} is {width}x{height} px, above the {budget} px budget")]
    SegmentTooLarge {
        index: usize,
        width: u32,
        height: u32,
        budget: usize,
    },
    #[error("Could not allocate {pixels} px for segment {index}")]
    Allocation { index: usize, pixels: usize },
}
