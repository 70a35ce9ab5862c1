use super::color::Color;

pub(super) fn default_true() -> bool {
    true
}

pub(super) fn default_wave_color() -> Color {
    Color::from_rgb(0x99, 0x99, 0x99)
}

pub(super) fn default_progress_color() -> Color {
    Color::from_rgb(0x55, 0x55, 0x55)
}

pub(super) fn default_cursor_width() -> f32 {
    1.0
}

pub(super) fn default_bar_height() -> f32 {
    1.0
}

pub(super) fn default_height() -> u32 {
    128
}
