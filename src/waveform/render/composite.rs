use egui::Color32;

use crate::waveform::{DrawingSegment, Lane};

/// Source-in composite: paint each lane's progress color wherever the base
/// image has coverage, scaled by that coverage.
pub(crate) fn source_in(
    base: &[Color32],
    out: &mut Vec<Color32>,
    image_width: usize,
    lanes: &[Lane],
) {
    out.clear();
    out.extend(base.iter().enumerate().map(|(index, pixel)| {
        let alpha = pixel.a();
        if alpha == 0 {
            return Color32::TRANSPARENT;
        }
        let row = (index / image_width.max(1)) as u32;
        let fill = lane_for_row(lanes, row).map_or(Color32::TRANSPARENT, |lane| {
            lane.style.progress_color
        });
        scale_premultiplied(fill, alpha)
    }));
}

fn lane_for_row(lanes: &[Lane], row: u32) -> Option<&Lane> {
    lanes
        .iter()
        .find(|lane| row >= lane.y_offset && row < lane.y_offset + lane.style.height)
}

fn scale_premultiplied(color: Color32, alpha: u8) -> Color32 {
    let mul = |c: u8| ((c as u16 * alpha as u16 + 127) / 255) as u8;
    Color32::from_rgba_premultiplied(mul(color.r()), mul(color.g()), mul(color.b()), mul(color.a()))
}

/// Width in pixels of `segment`'s progress image that should be visible for a
/// global progress fraction.
pub fn progress_crop_px(segment: &DrawingSegment, progress: f64, total_width: u32) -> f32 {
    let played_px = progress.clamp(0.0, 1.0) * total_width as f64;
    (played_px - segment.pixel_left as f64).clamp(0.0, segment.pixel_width as f64) as f32
}
