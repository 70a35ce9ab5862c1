use eframe::egui::{self, Align2, TextStyle};

use super::{EguiApp, style};
use crate::regions::{HANDLE_WIDTH_PX, Region};

const MARKER_WIDTH: f32 = 2.0;
const LABEL_PADDING: f32 = 2.0;

pub(super) fn paint_regions(
    app: &EguiApp,
    painter: &egui::Painter,
    rect: egui::Rect,
    ui_style: &egui::Style,
) {
    let Some(duration) = app.view.duration() else {
        return;
    };
    let viewport = app.view.viewport();
    let total_width = f64::from(viewport.total_width());
    let scroll = viewport.scroll;
    let font = TextStyle::Small.resolve(ui_style);
    let active = app.view.regions().active();
    for region in app.view.regions().regions() {
        let highlighted = active.contains(region.id());
        paint_region(painter, rect, region, total_width, duration, scroll, highlighted, &font);
    }
    if let Some(draft) = app.view.regions().draft() {
        paint_region(painter, rect, &draft, total_width, duration, scroll, false, &font);
    }
}

#[allow(clippy::too_many_arguments)]
fn paint_region(
    painter: &egui::Painter,
    rect: egui::Rect,
    region: &Region,
    total_width: f64,
    duration: f64,
    scroll: f64,
    highlighted: bool,
    font: &egui::FontId,
) {
    let palette = style::palette();
    let (left, width) = region.pixel_span(total_width, duration);
    let left = rect.left() + (left - scroll) as f32;
    let width = width as f32;
    let color = region.color().to_color32();
    if region.is_marker() {
        painter.line_segment(
            [egui::pos2(left, rect.top()), egui::pos2(left, rect.bottom())],
            egui::Stroke::new(MARKER_WIDTH, style::with_alpha(color, 255)),
        );
    } else {
        let body = egui::Rect::from_min_size(
            egui::pos2(left, rect.top()),
            egui::vec2(width, rect.height()),
        );
        painter.rect_filled(body, 0.0, color);
        if highlighted {
            painter.rect_filled(body, 0.0, style::with_alpha(palette.accent_copper, 24));
        }
        if region.is_resizable() {
            let handle = HANDLE_WIDTH_PX as f32;
            let stroke = egui::Stroke::new(1.0, style::with_alpha(palette.accent_ice, 160));
            for x in [body.left(), body.right()] {
                painter.line_segment([egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())], stroke);
            }
            let grip = style::with_alpha(palette.accent_ice, 40);
            painter.rect_filled(
                egui::Rect::from_min_size(body.min, egui::vec2(handle.min(width), rect.height())),
                0.0,
                grip,
            );
            painter.rect_filled(
                egui::Rect::from_min_max(
                    egui::pos2((body.right() - handle).max(body.left()), rect.top()),
                    body.max,
                ),
                0.0,
                grip,
            );
        }
    }
    if let Some(label) = region.label() {
        let pos = egui::pos2(
            left + LABEL_PADDING,
            rect.top() + LABEL_PADDING + region.label_offset() as f32,
        );
        painter.text(pos, Align2::LEFT_TOP, &label.text, font.clone(), palette.text_primary);
    }
}
