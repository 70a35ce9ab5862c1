use std::sync::Arc;

use crate::options::NormalizeReference;

/// Channel buffers prepared for rasterizing.
#[derive(Clone, Debug)]
pub struct NormalizedPeaks {
    /// Finite samples, one buffer per channel.
    pub channels: Vec<Arc<[f32]>>,
    /// Amplitude mapped to full lane height; bar heights divide by it.
    pub peak_scale: f32,
}

impl NormalizedPeaks {
    /// Number of frames in the longest channel.
    pub fn frame_count(&self) -> usize {
        self.channels.iter().map(|c| c.len()).max().unwrap_or(0)
    }
}

/// Computes a shared amplitude scale and optionally stretches the loudest
/// reference sample to exactly `1.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PeakNormalizer {
    normalize: bool,
    reference: NormalizeReference,
}

impl PeakNormalizer {
    pub fn new(normalize: bool, reference: NormalizeReference) -> Self {
        Self {
            normalize,
            reference,
        }
    }

    /// Sanitize and (when enabled) normalize `channels`.
    ///
    /// Non-finite samples become `0.0`. A silent reference leaves samples as
    /// they are; an out-of-range reference channel falls back to all channels.
    pub fn apply(&self, channels: &[Arc<[f32]>]) -> NormalizedPeaks {
        let mut channels: Vec<Arc<[f32]>> = channels
            .iter()
            .map(|channel| {
                if channel.iter().all(|s| s.is_finite()) {
                    Arc::clone(channel)
                } else {
                    channel.iter().map(|&s| finite_or_zero(s)).collect()
                }
            })
            .collect();
        if !self.normalize {
            return NormalizedPeaks {
                channels,
                peak_scale: 1.0,
            };
        }
        let peak = self.reference_peak(&channels);
        if peak > 0.0 {
            channels = channels
                .iter()
                .map(|channel| channel.iter().map(|&s| s / peak).collect())
                .collect();
            tracing::debug!("Normalized waveform peak {peak:.4} to 1.0");
        }
        NormalizedPeaks {
            channels,
            peak_scale: 1.0,
        }
    }

    fn reference_peak(&self, channels: &[Arc<[f32]>]) -> f32 {
        match self.reference {
            NormalizeReference::Channel(index) if index < channels.len() => {
                max_abs(&channels[index])
            }
            NormalizeReference::Channel(index) => {
                tracing::debug!(
                    "Normalize reference channel {index} missing; using all {} channels",
                    channels.len()
                );
                channels.iter().map(|c| max_abs(c)).fold(0.0, f32::max)
            }
            NormalizeReference::AllChannels => {
                channels.iter().map(|c| max_abs(c)).fold(0.0, f32::max)
            }
        }
    }
}

fn max_abs(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0_f32, |acc, s| acc.max(s.abs()))
}

fn finite_or_zero(sample: f32) -> f32 {
    if sample.is_finite() { sample } else { 0.0 }
}
