use eframe::egui::{self, Color32};

use super::EguiApp;

pub(super) const FULL_UV: egui::Rect = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));

/// Paint every drawn segment at its content offset; the progress texture is
/// cropped to the played width of each segment.
pub(super) fn paint_segments(app: &EguiApp, painter: &egui::Painter, rect: egui::Rect) {
    let scroll = app.view.viewport().scroll as f32;
    let height = app.view.renderer().image_height() as f32;
    for (segment, crop) in app.view.segments() {
        let Some((base, progress)) = app.textures.ids(segment.segment.index) else {
            continue;
        };
        let left = rect.left() + segment.segment.pixel_left as f32 - scroll;
        let width = segment.segment.pixel_width as f32;
        if left + width < rect.left() || left > rect.right() {
            continue;
        }
        let target = egui::Rect::from_min_size(egui::pos2(left, rect.top()), egui::vec2(width, height));
        painter.image(base, target, FULL_UV, Color32::WHITE);
        if crop > 0.0 && width > 0.0 {
            let played = egui::Rect::from_min_size(target.min, egui::vec2(crop, height));
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(crop / width, 1.0));
            painter.image(progress, played, uv, Color32::WHITE);
        }
    }
}

pub(super) fn paint_cursor(app: &EguiApp, painter: &egui::Painter, rect: egui::Rect) {
    let options = app.view.options();
    if options.cursor_width <= 0.0 {
        return;
    }
    let viewport = app.view.viewport();
    let x = rect.left() + (viewport.time_to_px(app.view.current_time()) - viewport.scroll) as f32;
    painter.line_segment(
        [egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())],
        egui::Stroke::new(options.cursor_width, options.cursor_color().to_color32()),
    );
}
