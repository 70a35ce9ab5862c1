//! Min/max bar rasterizer for one lane of one segment.

use std::ops::Range;
use std::sync::Arc;

use egui::Color32;

use crate::waveform::{BarAlign, Lane, LaneSource};

/// Top and bottom magnitudes of one bar, before scaling.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct BarPeak {
    pub top: f32,
    pub bottom: f32,
}

/// Vertical extent of one bar inside its lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct BarSpan {
    pub y: u32,
    pub height: u32,
}

pub(crate) fn column_peak(source: LaneSource, channels: &[Arc<[f32]>], range: Range<usize>) -> BarPeak {
    match source {
        LaneSource::Mono(channel) => {
            let Some(samples) = channels.get(channel).and_then(|c| c.get(clamp_range(c, &range)))
            else {
                return BarPeak::default();
            };
            samples.iter().fold(BarPeak::default(), |acc, &s| BarPeak {
                top: acc.top.max(s),
                bottom: acc.bottom.max(-s),
            })
        }
        LaneSource::Pair { top, bottom } => BarPeak {
            top: max_abs(channels.get(top), &range),
            bottom: max_abs(channels.get(bottom), &range),
        },
    }
}

fn max_abs(channel: Option<&Arc<[f32]>>, range: &Range<usize>) -> f32 {
    channel
        .and_then(|c| c.get(clamp_range(c, range)))
        .map_or(0.0, |samples| samples.iter().fold(0.0_f32, |acc, s| acc.max(s.abs())))
}

fn clamp_range(samples: &[f32], range: &Range<usize>) -> Range<usize> {
    let end = range.end.min(samples.len());
    range.start.min(end)..end
}

/// Scale a peak to pixels and place it per the lane alignment.
pub(crate) fn bar_span(peak: BarPeak, lane_height: u32, bar_height: f32, peak_scale: f32, align: BarAlign) -> BarSpan {
    let half = lane_height as f32 / 2.0;
    let scale = half * bar_height / peak_scale.max(f32::EPSILON);
    let top = (peak.top.max(0.0) * scale).round() as u32;
    let bottom = (peak.bottom.max(0.0) * scale).round() as u32;
    let height = (top + bottom).max(1).min(lane_height.max(1));
    let y = match align {
        BarAlign::Middle => (half.round() as u32).saturating_sub(top),
        BarAlign::Top => 0,
        BarAlign::Bottom => lane_height.saturating_sub(height),
    };
    BarSpan {
        y: y.min(lane_height.saturating_sub(height)),
        height,
    }
}

/// Draw `lane` over `samples` into a row-major pixel buffer `image_width` wide.
pub(crate) fn rasterize_lane(
    pixels: &mut [Color32],
    image_width: usize,
    lane: &Lane,
    channels: &[Arc<[f32]>],
    samples: Range<usize>,
    peak_scale: f32,
) {
    let style = &lane.style;
    let sample_len = samples.end.saturating_sub(samples.start);
    if image_width == 0 || sample_len == 0 {
        return;
    }
    let step = style.column_step();
    let bar_px = style.bar_px();
    let columns = ((image_width as f32 / step).ceil() as usize).max(1);
    for column in 0..columns {
        let from = samples.start + column * sample_len / columns;
        let to = (samples.start + (column + 1) * sample_len / columns).max(from + 1);
        let peak = column_peak(lane.source, channels, from..to.min(samples.end));
        let span = bar_span(
            peak,
            style.height,
            style.bar_height,
            peak_scale,
            style.bar_align,
        );
        let left = column as f32 * step;
        let x0 = left.round() as usize;
        let x1 = ((left + bar_px).round() as usize).max(x0 + 1).min(image_width);
        if x0 >= image_width {
            break;
        }
        fill_bar(
            pixels,
            image_width,
            x0..x1,
            lane.y_offset + span.y..lane.y_offset + span.y + span.height,
            style.bar_radius,
            style.wave_color,
        );
    }
}

fn fill_bar(
    pixels: &mut [Color32],
    image_width: usize,
    xs: Range<usize>,
    ys: Range<u32>,
    radius: f32,
    color: Color32,
) {
    let w = xs.len() as f32;
    let h = ys.len() as f32;
    let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
    let (left, top) = (xs.start as f32, ys.start as f32);
    for y in ys.clone() {
        let row = y as usize * image_width;
        for x in xs.clone() {
            if r > 0.0 && outside_corner(x as f32 + 0.5 - left, y as f32 + 0.5 - top, w, h, r) {
                continue;
            }
            if let Some(pixel) = pixels.get_mut(row + x) {
                *pixel = color;
            }
        }
    }
}

/// True if the local point `(px, py)` lies in a cut-off corner of a `w`x`h`
/// rectangle with corner radius `r`.
fn outside_corner(px: f32, py: f32, w: f32, h: f32, r: f32) -> bool {
    let cx = if px < r {
        r
    } else if px > w - r {
        w - r
    } else {
        return false;
    };
    let cy = if py < r {
        r
    } else if py > h - r {
        h - r
    } else {
        return false;
    };
    let (dx, dy) = (px - cx, py - cy);
    dx * dx + dy * dy > r * r
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::WaveOptions;
    use crate::waveform::LaneStyle;

    fn lane(source: LaneSource, height: u32) -> Lane {
        let options = WaveOptions {
            height,
            ..WaveOptions::default()
        };
        Lane {
            source,
            style: LaneStyle::from_options(&options),
            y_offset: 0,
        }
    }

    fn arcs(channels: Vec<Vec<f32>>) -> Vec<Arc<[f32]>> {
        channels.into_iter().map(Arc::from).collect()
    }

    #[test]
    fn mono_peak_splits_positive_and_negative() {
        let channels = arcs(vec![vec![0.2, -0.7, 0.5, -0.1]]);
        let peak = column_peak(LaneSource::Mono(0), &channels, 0..4);
        assert_eq!(peak, BarPeak { top: 0.5, bottom: 0.7 });
    }

    #[test]
    fn pair_peak_uses_magnitudes_of_each_channel() {
        let channels = arcs(vec![vec![-0.9, 0.1], vec![0.3, -0.4]]);
        let peak = column_peak(LaneSource::Pair { top: 0, bottom: 1 }, &channels, 0..2);
        assert_eq!(peak, BarPeak { top: 0.9, bottom: 0.4 });
    }

    #[test]
    fn silent_bar_is_one_pixel() {
        let span = bar_span(BarPeak::default(), 100, 1.0, 1.0, BarAlign::Middle);
        assert_eq!(span, BarSpan { y: 50, height: 1 });
    }

    #[test]
    fn alignment_places_bars() {
        let peak = BarPeak { top: 0.5, bottom: 0.25 };
        assert_eq!(
            bar_span(peak, 100, 1.0, 1.0, BarAlign::Middle),
            BarSpan { y: 25, height: 38 }
        );
        assert_eq!(
            bar_span(peak, 100, 1.0, 1.0, BarAlign::Top),
            BarSpan { y: 0, height: 38 }
        );
        assert_eq!(
            bar_span(peak, 100, 1.0, 1.0, BarAlign::Bottom),
            BarSpan { y: 62, height: 38 }
        );
    }

    #[test]
    fn bar_height_multiplier_is_clamped_to_lane() {
        let peak = BarPeak { top: 1.0, bottom: 1.0 };
        let span = bar_span(peak, 40, 3.0, 1.0, BarAlign::Middle);
        assert_eq!(span, BarSpan { y: 0, height: 40 });
    }

    #[test]
    fn transient_survives_heavy_compression() {
        let mut samples = vec![0.0_f32; 10_000];
        samples[5_003] = 1.0;
        let channels = arcs(vec![samples]);
        let lane = lane(LaneSource::Mono(0), 20);
        let mut pixels = vec![Color32::TRANSPARENT; 10 * 20];
        rasterize_lane(&mut pixels, 10, &lane, &channels, 0..10_000, 1.0);
        let column_height = |x: usize| {
            (0..20)
                .filter(|&y| pixels[y * 10 + x] != Color32::TRANSPARENT)
                .count()
        };
        assert_eq!(column_height(5), 10);
        assert_eq!(column_height(4), 1);
    }

    #[test]
    fn rounded_corners_clip_pixels() {
        let mut pixels = vec![Color32::TRANSPARENT; 8 * 8];
        fill_bar(&mut pixels, 8, 0..8, 0..8, 3.0, Color32::WHITE);
        assert_eq!(pixels[0], Color32::TRANSPARENT);
        assert_eq!(pixels[4 * 8 + 4], Color32::WHITE);
        assert_eq!(pixels[7 * 8 + 7], Color32::TRANSPARENT);
    }
}
