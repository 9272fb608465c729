//! Hex color parsing and formatting.

use peniko::Color;

/// Fallback color for unknown qualities and unparseable color strings.
pub const NEUTRAL: Color = Color::from_rgba8(156, 163, 175, 255);

/// Color stored for erase strokes.
pub const ERASE_HEX: &str = "#ffffff";

/// Parse a CSS-style hex color (`#rgb`, `#rrggbb`, `#rrggbbaa`).
pub fn parse_hex(color: &str) -> Option<Color> {
    let hex = color.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();

    match hex.len() {
        3 => {
            // #rgb -> #rrggbb
            let r = channel(0..1)? * 17;
            let g = channel(1..2)? * 17;
            let b = channel(2..3)? * 17;
            Some(Color::from_rgba8(r, g, b, 255))
        }
        6 => Some(Color::from_rgba8(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
        8 => Some(Color::from_rgba8(
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
            channel(6..8)?,
        )),
        _ => None,
    }
}

/// Parse a hex color, falling back to [`NEUTRAL`].
pub fn parse_hex_or_neutral(color: &str) -> Color {
    parse_hex(color).unwrap_or_else(|| {
        log::warn!("Unrecognized color {:?}, using neutral fallback", color);
        NEUTRAL
    })
}

/// Format a color as `#rrggbb` (or `#rrggbbaa` when not opaque).
pub fn to_hex(color: Color) -> String {
    let rgba = color.to_rgba8();
    if rgba.a == 255 {
        format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
    } else {
        format!("#{:02x}{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b, rgba.a)
    }
}
