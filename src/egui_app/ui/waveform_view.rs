use std::time::Instant;

use eframe::egui::{self, StrokeKind, Ui};

use super::{EguiApp, style};
use crate::wave_view::ContainerSize;

mod base_render;
mod interactions;
mod minimap_view;
mod region_overlay;

pub(super) use interactions::PointerTracker;

const SCROLLBAR_HEIGHT: f32 = 12.0;

impl EguiApp {
    pub(super) fn render_waveform(&mut self, ui: &mut Ui, now: Instant) {
        let palette = style::palette();
        let height = self.view.renderer().image_height().max(self.view.options().height) as f32;
        let desired = egui::vec2(ui.available_width(), height);
        let (rect, response) = ui.allocate_exact_size(desired, egui::Sense::click_and_drag());
        self.sync_container(rect, now);

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, palette.bg_primary);
        if self.view.duration().is_none() {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                self.status.borrow().as_str(),
                egui::TextStyle::Heading.resolve(ui.style()),
                palette.text_muted,
            );
            return;
        }
        base_render::paint_segments(self, &painter, rect);
        region_overlay::paint_regions(self, &painter, rect, ui.style());
        base_render::paint_cursor(self, &painter, rect);
        painter.rect_stroke(
            rect,
            0.0,
            egui::Stroke::new(1.0, palette.panel_outline),
            StrokeKind::Inside,
        );

        interactions::handle_waveform_pointer(self, ui, rect, &response, now);
        interactions::handle_waveform_scroll(self, ui, &response, now);
        let viewport = self.view.viewport();
        if !self.view.options().hide_scrollbar && viewport.is_scrollable() {
            interactions::render_waveform_scrollbar(self, ui, rect, SCROLLBAR_HEIGHT, now);
        }
    }

    pub(super) fn render_minimap(&mut self, ui: &mut Ui, now: Instant) {
        minimap_view::render_minimap(self, ui, now);
    }

    fn sync_container(&mut self, rect: egui::Rect, now: Instant) {
        let size = ContainerSize::new(
            f64::from(rect.width().round().max(1.0)),
            f64::from(rect.height().round().max(1.0)),
        );
        let current = self.view.container();
        let pending = self.pointer.reported_size.unwrap_or(current);
        if size != pending {
            self.pointer.reported_size = Some(size);
            self.view.resize(size, now);
        }
    }
}
