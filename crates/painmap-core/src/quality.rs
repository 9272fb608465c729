//! Pain quality catalog.
//!
//! A quality is a clinical pain descriptor (burning, throbbing, ...) with a
//! display color. Strokes, annotations and selected regions are colored by the
//! quality active when they were created.

use crate::color::{self, NEUTRAL};
use peniko::Color;

/// A clinically meaningful pain descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PainQuality {
    /// Stable identifier stored in persisted data.
    pub id: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// Display color as `#rrggbb`.
    pub hex: &'static str,
}

impl PainQuality {
    /// Display color.
    pub fn color(&self) -> Color {
        color::parse_hex_or_neutral(self.hex)
    }
}

/// Built-in qualities. The first entry is the default selection.
pub const PAIN_QUALITIES: [PainQuality; 8] = [
    PainQuality { id: "burning", label: "Burning", hex: "#ef4444" },
    PainQuality { id: "sharp", label: "Sharp", hex: "#f97316" },
    PainQuality { id: "aching", label: "Aching", hex: "#eab308" },
    PainQuality { id: "throbbing", label: "Throbbing", hex: "#a855f7" },
    PainQuality { id: "stabbing", label: "Stabbing", hex: "#ec4899" },
    PainQuality { id: "tingling", label: "Tingling", hex: "#3b82f6" },
    PainQuality { id: "numbness", label: "Numbness", hex: "#6b7280" },
    PainQuality { id: "dull", label: "Dull", hex: "#14b8a6" },
];

/// Id of the default quality.
pub const DEFAULT_QUALITY_ID: &str = PAIN_QUALITIES[0].id;

/// Look up a quality by id or label (case-insensitive).
pub fn find_quality(key: &str) -> Option<&'static PainQuality> {
    let key = key.trim();
    PAIN_QUALITIES
        .iter()
        .find(|q| q.id.eq_ignore_ascii_case(key) || q.label.eq_ignore_ascii_case(key))
}

/// Color for a quality key, or the neutral fallback when the key is unknown.
pub fn quality_color(key: &str) -> Color {
    match find_quality(key) {
        Some(quality) => quality.color(),
        None => {
            log::warn!("Unknown pain quality {:?}, rendering neutral", key);
            NEUTRAL
        }
    }
}

/// Hex color for a quality key, or the neutral fallback when unknown.
pub fn quality_hex(key: &str) -> String {
    match find_quality(key) {
        Some(quality) => quality.hex.to_string(),
        None => {
            log::warn!("Unknown pain quality {:?}, using neutral color", key);
            color::to_hex(NEUTRAL)
        }
    }
}
