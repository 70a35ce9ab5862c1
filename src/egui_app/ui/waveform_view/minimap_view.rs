use std::time::Instant;

use eframe::egui::{self, Color32, StrokeKind, Ui};

use super::base_render::FULL_UV;
use super::{EguiApp, style};

/// Overview strip under the main waveform. Click or drag seeks.
pub(super) fn render_minimap(app: &mut EguiApp, ui: &mut Ui, now: Instant) {
    let Some(minimap) = app.view.minimap() else {
        return;
    };
    let palette = style::palette();
    let desired = egui::vec2(ui.available_width(), minimap.height() as f32);
    let (rect, response) = ui.allocate_exact_size(desired, egui::Sense::click_and_drag());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, palette.bg_primary);
    if app.view.duration().is_none() {
        return;
    }

    let progress = app.view.progress();
    let height = minimap.renderer().image_height() as f32;
    for (segment, crop) in minimap.segments(progress) {
        let Some((base, played)) = app.minimap_textures.ids(segment.segment.index) else {
            continue;
        };
        let left = rect.left() + segment.segment.pixel_left as f32;
        let width = segment.segment.pixel_width as f32;
        let target = egui::Rect::from_min_size(egui::pos2(left, rect.top()), egui::vec2(width, height));
        painter.image(base, target, FULL_UV, Color32::WHITE);
        if crop > 0.0 && width > 0.0 {
            let played_rect = egui::Rect::from_min_size(target.min, egui::vec2(crop, height));
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(crop / width, 1.0));
            painter.image(played, played_rect, uv, Color32::WHITE);
        }
    }

    let (left, width) = minimap.indicator_px();
    let indicator = egui::Rect::from_min_size(
        egui::pos2(rect.left() + left as f32, rect.top()),
        egui::vec2((width as f32).max(2.0), rect.height()),
    );
    painter.rect_filled(indicator, 0.0, minimap.options().overlay_color.to_color32());
    painter.rect_stroke(
        indicator,
        0.0,
        egui::Stroke::new(1.0, style::with_alpha(palette.accent_ice, 120)),
        StrokeKind::Inside,
    );
    let cursor_x = rect.left() + (progress * f64::from(minimap.width())) as f32;
    painter.line_segment(
        [egui::pos2(cursor_x, rect.top()), egui::pos2(cursor_x, rect.bottom())],
        egui::Stroke::new(1.0, app.view.options().cursor_color().to_color32()),
    );
    painter.rect_stroke(
        rect,
        0.0,
        egui::Stroke::new(1.0, palette.panel_outline),
        StrokeKind::Inside,
    );

    if (response.clicked() || response.dragged())
        && let Some(pos) = response.interact_pointer_pos()
    {
        app.view.minimap_seek(f64::from(pos.x - rect.left()), now);
    }
}
