use egui::Color32;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Color accepted in options files as `#rgb`, `#rrggbb`, `#rrggbbaa` or
/// `rgba(r, g, b, a)` with `a` in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(Color32);

/// Failure to parse a color string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid color '{value}'")]
pub struct ColorParseError {
    /// Offending input.
    pub value: String,
}

impl Color {
    /// Build from 8-bit RGBA (unmultiplied alpha).
    pub fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(Color32::from_rgba_unmultiplied(r, g, b, a))
    }

    /// Build an opaque color.
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(Color32::from_rgb(r, g, b))
    }

    /// egui color for painting.
    pub fn to_color32(self) -> Color32 {
        self.0
    }
}

impl From<Color32> for Color {
    fn from(value: Color32) -> Self {
        Self(value)
    }
}

impl From<Color> for Color32 {
    fn from(value: Color) -> Self {
        value.0
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let err = || ColorParseError {
            value: input.to_string(),
        };
        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(err);
        }
        if let Some(body) = trimmed
            .strip_prefix("rgba(")
            .or_else(|| trimmed.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_functional(body).ok_or_else(err);
        }
        Err(err())
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |idx: usize| u8::from_str_radix(&hex[idx..idx + 1], 16).ok();
    let byte = |idx: usize| u8::from_str_radix(&hex[idx..idx + 2], 16).ok();
    match hex.len() {
        3 => Some(Color::from_rgb(
            nibble(0)? * 17,
            nibble(1)? * 17,
            nibble(2)? * 17,
        )),
        6 => Some(Color::from_rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Color::from_rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

fn parse_functional(body: &str) -> Option<Color> {
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let channel = |part: &str| part.parse::<u8>().ok();
    let r = channel(parts[0])?;
    let g = channel(parts[1])?;
    let b = channel(parts[2])?;
    let a = match parts.get(3) {
        Some(alpha) => {
            let alpha: f32 = alpha.parse().ok()?;
            if !alpha.is_finite() {
                return None;
            }
            (alpha.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        None => 255,
    };
    Some(Color::from_rgba(r, g, b, a))
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0.to_srgba_unmultiplied();
        if a == 255 {
            write!(f, "#{r:02x}{g:02x}{b:02x}")
        } else {
            write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_hex() {
        assert_eq!("#999".parse::<Color>().unwrap(), Color::from_rgb(153, 153, 153));
        assert_eq!(
            "#4f4a85".parse::<Color>().unwrap(),
            Color::from_rgb(0x4f, 0x4a, 0x85)
        );
    }

    #[test]
    fn parses_functional_rgba() {
        let color: Color = "rgba(0, 0, 0, 0.1)".parse().unwrap();
        assert_eq!(color, Color::from_rgba(0, 0, 0, 26));
    }

    #[test]
    fn rejects_garbage() {
        assert!("#12".parse::<Color>().is_err());
        assert!("blue".parse::<Color>().is_err());
        assert!("rgba(300, 0, 0, 1)".parse::<Color>().is_err());
    }

    #[test]
    fn display_omits_opaque_alpha() {
        assert_eq!(Color::from_rgb(1, 2, 3).to_string(), "#010203");
    }
}
