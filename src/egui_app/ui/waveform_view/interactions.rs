use std::time::Instant;

use eframe::egui::{self, Ui};

use super::{EguiApp, SCROLLBAR_HEIGHT, style};
use crate::drag::PointerButton;
use crate::wave_view::ContainerSize;

const WHEEL_ZOOM_RATE: f64 = 0.002;

/// Pointer state carried between frames.
#[derive(Clone, Copy, Debug, Default)]
pub(in crate::egui_app::ui) struct PointerTracker {
    pressed: bool,
    inside: bool,
    pub(super) reported_size: Option<ContainerSize>,
}

fn map_button(button: egui::PointerButton) -> Option<PointerButton> {
    match button {
        egui::PointerButton::Primary => Some(PointerButton::Primary),
        egui::PointerButton::Secondary => Some(PointerButton::Secondary),
        egui::PointerButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

/// Forward raw pointer events to the view in container coordinates.
pub(super) fn handle_waveform_pointer(
    app: &mut EguiApp,
    ui: &mut Ui,
    rect: egui::Rect,
    response: &egui::Response,
    now: Instant,
) {
    // Presses on the scrollbar strip belong to the scrollbar.
    let hit_rect = if !app.view.options().hide_scrollbar && app.view.viewport().is_scrollable() {
        egui::Rect::from_min_max(rect.min, egui::pos2(rect.right(), rect.bottom() - SCROLLBAR_HEIGHT))
    } else {
        rect
    };
    let events = ui.input(|i| i.events.clone());
    for event in events {
        match event {
            egui::Event::PointerButton {
                pos,
                button,
                pressed: true,
                ..
            } if hit_rect.contains(pos) => {
                let Some(button) = map_button(button) else {
                    continue;
                };
                let local = pos - rect.min;
                app.pointer.pressed = true;
                app.view
                    .pointer_down(button, f64::from(local.x), f64::from(local.y));
            }
            egui::Event::PointerButton {
                pos,
                button,
                pressed: false,
                ..
            } if app.pointer.pressed => {
                app.pointer.pressed = false;
                app.view.pointer_up(now);
                if button == egui::PointerButton::Primary && hit_rect.contains(pos) {
                    let local = pos - rect.min;
                    app.view
                        .click(f64::from(local.x), f64::from(local.y), now);
                }
            }
            egui::Event::PointerMoved(pos) => {
                let inside = hit_rect.contains(pos);
                if app.pointer.pressed || inside {
                    let local = pos - rect.min;
                    app.view
                        .pointer_move(f64::from(local.x), f64::from(local.y), now);
                } else if app.pointer.inside {
                    app.view.pointer_leave(now);
                }
                app.pointer.inside = inside;
            }
            egui::Event::PointerGone => {
                app.pointer.pressed = false;
                app.pointer.inside = false;
                app.view.pointer_leave(now);
            }
            _ => {}
        }
    }
    if response.double_clicked()
        && let Some(pos) = response.interact_pointer_pos()
    {
        let local = pos - rect.min;
        app.view.double_click(f64::from(local.x), f64::from(local.y));
    }
}

/// Wheel scrolls horizontally; with ctrl held it zooms.
pub(super) fn handle_waveform_scroll(
    app: &mut EguiApp,
    ui: &mut Ui,
    response: &egui::Response,
    now: Instant,
) {
    if !response.hovered() {
        return;
    }
    let (delta, zoom_modifier) = ui.input(|i| (i.raw_scroll_delta, i.modifiers.command));
    if delta == egui::Vec2::ZERO {
        return;
    }
    if zoom_modifier {
        let Some(duration) = app.view.duration().filter(|d| *d > 0.0) else {
            return;
        };
        let current = f64::from(app.view.viewport().total_width()) / duration;
        let factor = (1.0 + f64::from(delta.y) * WHEEL_ZOOM_RATE).clamp(0.5, 2.0);
        app.zoom = (current * factor).max(1.0);
        app.view.zoom(app.zoom, now);
    } else {
        let dx = if delta.x.abs() > 0.0 { delta.x } else { delta.y };
        app.view.scroll_by(-f64::from(dx), now);
    }
}

pub(super) fn render_waveform_scrollbar(
    app: &mut EguiApp,
    ui: &mut Ui,
    rect: egui::Rect,
    bar_height: f32,
    now: Instant,
) {
    let palette = style::palette();
    let scroll_rect = egui::Rect::from_min_size(
        egui::pos2(rect.left(), rect.bottom() - bar_height),
        egui::vec2(rect.width(), bar_height),
    );
    let scroll_resp = ui.interact(
        scroll_rect,
        ui.id().with("waveform_scrollbar"),
        egui::Sense::click_and_drag(),
    );
    ui.painter()
        .rect_filled(scroll_rect, 0.0, style::with_alpha(palette.bg_primary, 140));
    let (start, end) = app.view.viewport().visible_fractions();
    let visible = (end - start) as f32;
    let indicator_rect = egui::Rect::from_min_size(
        egui::pos2(scroll_rect.left() + scroll_rect.width() * start as f32, scroll_rect.top()),
        egui::vec2((scroll_rect.width() * visible).max(8.0), scroll_rect.height()),
    );
    ui.painter()
        .rect_filled(indicator_rect, 0.0, style::with_alpha(palette.accent_ice, 200));
    if (scroll_resp.dragged() || scroll_resp.clicked())
        && scroll_rect.width() > f32::EPSILON
        && let Some(pos) = scroll_resp.interact_pointer_pos()
    {
        let frac = ((pos.x - scroll_rect.left()) / scroll_rect.width()).clamp(0.0, 1.0);
        let target = (f64::from(frac) - f64::from(visible) / 2.0).max(0.0);
        app.view.scroll_to_fraction(target, now);
    }
}
