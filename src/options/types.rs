use serde::{Deserialize, Serialize};

use super::color::Color;
use super::defaults::{
    default_bar_height, default_cursor_width, default_height, default_progress_color,
    default_true, default_wave_color,
};
use super::errors::ConfigError;
use crate::waveform::BarAlign;

/// Which samples decide the normalization peak.
///
/// Defaults to the first channel. A channel the audio does not have falls back
/// to every channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizeReference {
    /// Loudest sample across every channel.
    AllChannels,
    /// Loudest sample of a single channel.
    Channel(usize),
}

impl Default for NormalizeReference {
    fn default() -> Self {
        Self::Channel(0)
    }
}

/// Per-channel style overrides used in split-channel mode.
///
/// Unset fields inherit from the base [`WaveOptions`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelOverrides {
    /// Lane waveform color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wave_color: Option<Color>,
    /// Lane played-portion color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_color: Option<Color>,
    /// Lane height in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Lane bar width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bar_width: Option<f32>,
    /// Lane bar gap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bar_gap: Option<f32>,
    /// Lane bar corner radius.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bar_radius: Option<f32>,
    /// Lane vertical amplitude multiplier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bar_height: Option<f32>,
    /// Lane bar alignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bar_align: Option<BarAlign>,
}

/// Rendering and interaction options for a [`WaveView`](crate::WaveView).
///
/// Config keys: `wave_color`, `progress_color`, `cursor_color`, `cursor_width`,
/// `bar_width`, `bar_gap`, `bar_radius`, `bar_height`, `bar_align`, `height`,
/// `min_px_per_sec`, `fill_parent`, `hide_scrollbar`, `auto_scroll`, `auto_center`,
/// `normalize`, `normalize_reference`, `split_channels`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveOptions {
    /// Color of the unplayed waveform.
    #[serde(default = "default_wave_color")]
    pub wave_color: Color,
    /// Color of the played portion.
    #[serde(default = "default_progress_color")]
    pub progress_color: Color,
    /// Playhead color; falls back to `progress_color`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor_color: Option<Color>,
    /// Playhead width in pixels.
    #[serde(default = "default_cursor_width")]
    pub cursor_width: f32,
    /// Bar width in pixels; `0` draws one column per pixel.
    #[serde(default)]
    pub bar_width: f32,
    /// Gap between bars; defaults to half the bar width when bars are enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bar_gap: Option<f32>,
    /// Bar corner radius.
    #[serde(default)]
    pub bar_radius: f32,
    /// Vertical amplitude multiplier.
    #[serde(default = "default_bar_height")]
    pub bar_height: f32,
    /// Vertical bar alignment.
    #[serde(default)]
    pub bar_align: BarAlign,
    /// Waveform height in pixels (per lane in split mode).
    #[serde(default = "default_height")]
    pub height: u32,
    /// Minimum zoom in pixels per second of audio.
    #[serde(default)]
    pub min_px_per_sec: f32,
    /// Stretch the waveform to the container when it would be narrower.
    #[serde(default = "default_true")]
    pub fill_parent: bool,
    /// Hide the horizontal scrollbar in the viewer.
    #[serde(default)]
    pub hide_scrollbar: bool,
    /// Keep the playhead visible while playing.
    #[serde(default = "default_true")]
    pub auto_scroll: bool,
    /// Keep the playhead centered while playing.
    #[serde(default = "default_true")]
    pub auto_center: bool,
    /// Stretch the loudest sample to full height.
    #[serde(default)]
    pub normalize: bool,
    /// Samples that decide the normalization peak.
    #[serde(default)]
    pub normalize_reference: NormalizeReference,
    /// Render each channel in its own lane with optional overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_channels: Option<Vec<ChannelOverrides>>,
}

impl Default for WaveOptions {
    fn default() -> Self {
        Self {
            wave_color: default_wave_color(),
            progress_color: default_progress_color(),
            cursor_color: None,
            cursor_width: default_cursor_width(),
            bar_width: 0.0,
            bar_gap: None,
            bar_radius: 0.0,
            bar_height: default_bar_height(),
            bar_align: BarAlign::default(),
            height: default_height(),
            min_px_per_sec: 0.0,
            fill_parent: true,
            hide_scrollbar: false,
            auto_scroll: true,
            auto_center: true,
            normalize: false,
            normalize_reference: NormalizeReference::default(),
            split_channels: None,
        }
    }
}

impl WaveOptions {
    /// Effective playhead color.
    pub fn cursor_color(&self) -> Color {
        self.cursor_color.unwrap_or(self.progress_color)
    }

    /// Reject values that have no sensible rendering.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("cursor_width", self.cursor_width)?;
        non_negative("bar_width", self.bar_width)?;
        if let Some(gap) = self.bar_gap {
            non_negative("bar_gap", gap)?;
        }
        non_negative("bar_radius", self.bar_radius)?;
        positive("bar_height", self.bar_height)?;
        non_negative("min_px_per_sec", self.min_px_per_sec)?;
        if self.height == 0 {
            return Err(ConfigError::InvalidOption {
                key: "height",
                reason: "must be at least 1 pixel".into(),
            });
        }
        if let NormalizeReference::Channel(channel) = self.normalize_reference
            && let Some(lanes) = &self.split_channels
            && !lanes.is_empty()
            && channel >= lanes.len()
        {
            return Err(ConfigError::InvalidOption {
                key: "normalize_reference",
                reason: format!("channel {channel} has no split lane"),
            });
        }
        for lane in self.split_channels.iter().flatten() {
            if lane.height == Some(0) {
                return Err(ConfigError::InvalidOption {
                    key: "split_channels.height",
                    reason: "must be at least 1 pixel".into(),
                });
            }
            for (key, value) in [
                ("split_channels.bar_width", lane.bar_width),
                ("split_channels.bar_gap", lane.bar_gap),
                ("split_channels.bar_radius", lane.bar_radius),
            ] {
                if let Some(value) = value {
                    non_negative(key, value)?;
                }
            }
            if let Some(bar_height) = lane.bar_height {
                positive("split_channels.bar_height", bar_height)?;
            }
        }
        Ok(())
    }
}

fn non_negative(key: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidOption {
            key,
            reason: format!("expected a finite value >= 0, got {value}"),
        })
    }
}

fn positive(key: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidOption {
            key,
            reason: format!("expected a finite value > 0, got {value}"),
        })
    }
}
