use egui::Color32;

use super::BarAlign;
use crate::options::{ChannelOverrides, WaveOptions};

/// Resolved drawing style for one lane.
#[derive(Clone, Debug, PartialEq)]
pub struct LaneStyle {
    pub wave_color: Color32,
    pub progress_color: Color32,
    pub height: u32,
    pub bar_width: f32,
    pub bar_gap: Option<f32>,
    pub bar_radius: f32,
    pub bar_height: f32,
    pub bar_align: BarAlign,
}

impl LaneStyle {
    pub fn from_options(options: &WaveOptions) -> Self {
        Self {
            wave_color: options.wave_color.to_color32(),
            progress_color: options.progress_color.to_color32(),
            height: options.height.max(1),
            bar_width: options.bar_width,
            bar_gap: options.bar_gap,
            bar_radius: options.bar_radius,
            bar_height: options.bar_height,
            bar_align: options.bar_align,
        }
    }

    /// Merge a lane's overrides onto this base style.
    pub fn with_overrides(&self, overrides: &ChannelOverrides) -> Self {
        Self {
            wave_color: overrides
                .wave_color
                .map_or(self.wave_color, |c| c.to_color32()),
            progress_color: overrides
                .progress_color
                .map_or(self.progress_color, |c| c.to_color32()),
            height: overrides.height.unwrap_or(self.height).max(1),
            bar_width: overrides.bar_width.unwrap_or(self.bar_width),
            bar_gap: overrides.bar_gap.or(self.bar_gap),
            bar_radius: overrides.bar_radius.unwrap_or(self.bar_radius),
            bar_height: overrides.bar_height.unwrap_or(self.bar_height),
            bar_align: overrides.bar_align.unwrap_or(self.bar_align),
        }
    }

    /// Drawn width of one bar; zero bar width means single pixel columns.
    pub fn bar_px(&self) -> f32 {
        if self.bar_width > 0.0 { self.bar_width } else { 1.0 }
    }

    /// Gap after each bar: explicit, else half a bar when bars are enabled.
    pub fn gap_px(&self) -> f32 {
        match self.bar_gap {
            Some(gap) if gap > 0.0 => gap,
            _ if self.bar_width > 0.0 => self.bar_width / 2.0,
            _ => 0.0,
        }
    }

    /// Horizontal distance between the left edges of adjacent bars.
    pub fn column_step(&self) -> f32 {
        self.bar_px() + self.gap_px()
    }
}

/// Which channel data feeds the two halves of a lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LaneSource {
    /// Top is the max positive value, bottom the max negative magnitude.
    Mono(usize),
    /// Top is max `|top|`, bottom is max `|bottom|`.
    Pair { top: usize, bottom: usize },
}

/// One horizontal band of the rendered waveform.
#[derive(Clone, Debug, PartialEq)]
pub struct Lane {
    pub source: LaneSource,
    pub style: LaneStyle,
    /// First image row of the lane.
    pub y_offset: u32,
}

/// Lay out lanes for `channel_count` channels.
///
/// Combined mode yields one two-sided lane; split mode stacks one lane per
/// channel with that channel's overrides applied.
pub fn resolve_lanes(options: &WaveOptions, channel_count: usize) -> Vec<Lane> {
    let base = LaneStyle::from_options(options);
    let Some(overrides) = options.split_channels.as_ref() else {
        let source = if channel_count >= 2 {
            LaneSource::Pair { top: 0, bottom: 1 }
        } else {
            LaneSource::Mono(0)
        };
        return vec![Lane {
            source,
            style: base,
            y_offset: 0,
        }];
    };
    let default_overrides = ChannelOverrides::default();
    let mut y_offset = 0;
    (0..channel_count.max(1))
        .map(|channel| {
            let style = base.with_overrides(overrides.get(channel).unwrap_or(&default_overrides));
            let lane = Lane {
                source: LaneSource::Mono(channel),
                y_offset,
                style,
            };
            y_offset += lane.style.height;
            lane
        })
        .collect()
}

/// Total image height of stacked lanes.
pub(crate) fn lanes_height(lanes: &[Lane]) -> u32 {
    lanes.iter().map(|lane| lane.style.height).sum::<u32>().max(1)
}
