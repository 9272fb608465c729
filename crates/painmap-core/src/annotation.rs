//! Arrow, text and symbol overlays.
//!
//! Annotations are addressed by insertion order only. The manager holds the
//! session-level placement state (active symbol, half-finished arrow or text
//! placements); committing an annotation goes through the drawing session so
//! that each placement is one undoable history step.

use kurbo::Point;
use serde::{Deserialize, Deserializer, Serialize};

/// Annotation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    Arrow,
    Text,
    Symbol,
}

/// Symbol glyphs available for symbol annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolType {
    #[default]
    Pin,
    Lightning,
    Star,
    Cross,
}

impl SymbolType {
    /// All symbol types in display order.
    pub const ALL: [SymbolType; 4] = [
        SymbolType::Pin,
        SymbolType::Lightning,
        SymbolType::Star,
        SymbolType::Cross,
    ];

    /// Parse a persisted symbol id.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "pin" => Some(SymbolType::Pin),
            "lightning" => Some(SymbolType::Lightning),
            "star" => Some(SymbolType::Star),
            "cross" => Some(SymbolType::Cross),
            _ => None,
        }
    }
}

/// An overlay placed on the drawing surface.
///
/// Mirrors the persisted shape: an anchor point plus the optional fields the
/// kind uses. An arrow without an end point, or text without content, is kept
/// as data but not rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    #[serde(rename = "type")]
    pub kind: AnnotationKind,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_symbol"
    )]
    pub symbol_type: Option<SymbolType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Annotation {
    /// An arrow from `start` to `end`.
    pub fn arrow(start: Point, end: Point, color: impl Into<String>) -> Self {
        Self {
            kind: AnnotationKind::Arrow,
            x: start.x,
            y: start.y,
            end_x: Some(end.x),
            end_y: Some(end.y),
            content: None,
            symbol_type: None,
            color: Some(color.into()),
        }
    }

    /// A text note anchored at `point`. Text carries no color.
    pub fn text(point: Point, content: impl Into<String>) -> Self {
        Self {
            kind: AnnotationKind::Text,
            x: point.x,
            y: point.y,
            end_x: None,
            end_y: None,
            content: Some(content.into()),
            symbol_type: None,
            color: None,
        }
    }

    /// A symbol glyph anchored at `point`.
    pub fn symbol(point: Point, symbol: SymbolType, color: impl Into<String>) -> Self {
        Self {
            kind: AnnotationKind::Symbol,
            x: point.x,
            y: point.y,
            end_x: None,
            end_y: None,
            content: None,
            symbol_type: Some(symbol),
            color: Some(color.into()),
        }
    }

    /// Anchor point.
    pub fn anchor(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// End point, for arrows that have one.
    pub fn end(&self) -> Option<Point> {
        match (self.end_x, self.end_y) {
            (Some(x), Some(y)) => Some(Point::new(x, y)),
            _ => None,
        }
    }

    /// Symbol to draw; missing symbol ids default to a pin.
    pub fn symbol_or_default(&self) -> SymbolType {
        self.symbol_type.unwrap_or_default()
    }
}

/// Unknown symbol ids load as `None` (drawn as a pin) instead of failing.
fn deserialize_symbol<'de, D>(deserializer: D) -> Result<Option<SymbolType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|id| {
        let symbol = SymbolType::from_id(&id);
        if symbol.is_none() {
            log::warn!("Unknown symbol type {:?}, drawing a pin", id);
        }
        symbol
    }))
}

/// Placement state for annotation tools.
#[derive(Debug, Clone, Default)]
pub struct AnnotationManager {
    /// Symbol used by `place_active_symbol` and the symbol tool.
    active_symbol: SymbolType,
    /// Start of an arrow whose end has not been placed yet.
    pending_arrow: Option<Point>,
    /// Anchor of a text note awaiting its content.
    pending_text: Option<Point>,
}

impl AnnotationManager {
    /// Create a manager with the default symbol.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current symbol for future placements.
    pub fn active_symbol(&self) -> SymbolType {
        self.active_symbol
    }

    /// Change the symbol for future placements. Placed symbols are unaffected.
    pub fn set_active_symbol(&mut self, symbol: SymbolType) {
        self.active_symbol = symbol;
    }

    /// Record the start of an arrow drag.
    pub fn begin_arrow(&mut self, start: Point) {
        self.pending_arrow = Some(start);
    }

    /// Finish an arrow drag, yielding the arrow if one was started.
    pub fn finish_arrow(&mut self, end: Point, color: &str) -> Option<Annotation> {
        self.pending_arrow
            .take()
            .map(|start| Annotation::arrow(start, end, color))
    }

    /// Whether an arrow drag is in progress.
    pub fn arrow_in_progress(&self) -> bool {
        self.pending_arrow.is_some()
    }

    /// Record where a text note will be placed.
    pub fn begin_text(&mut self, anchor: Point) {
        self.pending_text = Some(anchor);
    }

    /// Anchor of the pending text note.
    pub fn pending_text(&self) -> Option<Point> {
        self.pending_text
    }

    /// Complete the pending text note.
    ///
    /// Content is trimmed; blank content discards the placement.
    pub fn finish_text(&mut self, content: &str) -> Option<Annotation> {
        let anchor = self.pending_text.take()?;
        let content = content.trim();
        if content.is_empty() {
            log::debug!("Empty text note discarded");
            return None;
        }
        Some(Annotation::text(anchor, content))
    }

    /// Build a text note directly, applying the same trimming rule.
    pub fn text_at(&self, anchor: Point, content: &str) -> Option<Annotation> {
        let content = content.trim();
        (!content.is_empty()).then(|| Annotation::text(anchor, content))
    }

    /// Drop any half-finished arrow or text placement.
    pub fn cancel_pending(&mut self) {
        self.pending_arrow = None;
        self.pending_text = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_serialization_shape() {
        let arrow = Annotation::arrow(Point::new(1.0, 2.0), Point::new(3.0, 4.0), "#ef4444");
        let json = serde_json::to_value(&arrow).unwrap();
        assert_eq!(json["type"], "arrow");
        assert_eq!(json["endX"], 3.0);
        assert_eq!(json["endY"], 4.0);
        assert!(json.get("content").is_none());
        assert!(json.get("symbolType").is_none());
    }

    #[test]
    fn test_symbol_serialization_shape() {
        let symbol = Annotation::symbol(Point::new(5.0, 5.0), SymbolType::Lightning, "#3b82f6");
        let json = serde_json::to_value(&symbol).unwrap();
        assert_eq!(json["type"], "symbol");
        assert_eq!(json["symbolType"], "lightning");
        assert_eq!(json["color"], "#3b82f6");
    }

    #[test]
    fn test_text_has_no_color() {
        let text = Annotation::text(Point::new(0.0, 0.0), "radiates down");
        assert!(text.color.is_none());
        assert_eq!(text.content.as_deref(), Some("radiates down"));
    }

    #[test]
    fn test_arrow_placement_flow() {
        let mut manager = AnnotationManager::new();
        assert!(manager.finish_arrow(Point::new(1.0, 1.0), "#000").is_none());

        manager.begin_arrow(Point::new(0.0, 0.0));
        assert!(manager.arrow_in_progress());
        let arrow = manager.finish_arrow(Point::new(10.0, 5.0), "#000").unwrap();
        assert_eq!(arrow.end(), Some(Point::new(10.0, 5.0)));
        assert!(!manager.arrow_in_progress());
    }

    #[test]
    fn test_text_trimmed_and_blank_discarded() {
        let mut manager = AnnotationManager::new();
        manager.begin_text(Point::new(4.0, 4.0));
        let text = manager.finish_text("  sore  ").unwrap();
        assert_eq!(text.content.as_deref(), Some("sore"));

        manager.begin_text(Point::new(4.0, 4.0));
        assert!(manager.finish_text("   ").is_none());
        assert!(manager.pending_text().is_none());
    }

    #[test]
    fn test_active_symbol_only_affects_future() {
        let mut manager = AnnotationManager::new();
        assert_eq!(manager.active_symbol(), SymbolType::Pin);
        let placed = Annotation::symbol(Point::ZERO, manager.active_symbol(), "#000");
        manager.set_active_symbol(SymbolType::Star);
        assert_eq!(placed.symbol_type, Some(SymbolType::Pin));
        assert_eq!(manager.active_symbol(), SymbolType::Star);
    }

    #[test]
    fn test_missing_symbol_defaults_to_pin() {
        let json = r##"{"type":"symbol","x":1,"y":2,"color":"#000"}"##;
        let annotation: Annotation = serde_json::from_str(json).unwrap();
        assert_eq!(annotation.symbol_or_default(), SymbolType::Pin);
    }

    #[test]
    fn test_unknown_symbol_falls_back() {
        let json = r##"{"type":"symbol","x":1,"y":2,"symbolType":"spiral"}"##;
        let annotation: Annotation = serde_json::from_str(json).unwrap();
        assert!(annotation.symbol_type.is_none());
        assert_eq!(annotation.symbol_or_default(), SymbolType::Pin);
    }
}
