//! Read-only display of stored pain maps.
//!
//! A projector borrows a frozen model and never owns editing state; a fresh
//! one is created for every displayed snapshot.

use crate::drawing::{DrawingData, DrawingSurface};
use crate::model::{AvatarVariant, PainMapModel, ViewOrientation};
use crate::region::{BodyRegistry, PartAppearance, RenderMode, appearances};
use chrono::{DateTime, Utc};
use kurbo::Affine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Avatar and view used when a snapshot records neither.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerDefaults {
    pub avatar: AvatarVariant,
    pub view: ViewOrientation,
}

/// Renders one snapshot.
#[derive(Debug, Clone, Copy)]
pub struct PlaybackProjector<'a> {
    model: &'a PainMapModel,
    defaults: &'a ViewerDefaults,
}

impl<'a> PlaybackProjector<'a> {
    pub fn new(model: &'a PainMapModel, defaults: &'a ViewerDefaults) -> Self {
        Self { model, defaults }
    }

    pub fn model(&self) -> &'a PainMapModel {
        self.model
    }

    /// Recorded avatar, else the viewer default.
    pub fn avatar(&self) -> &'a AvatarVariant {
        self.model.avatar_type.as_ref().unwrap_or(&self.defaults.avatar)
    }

    /// Recorded view, else the viewer default.
    pub fn view(&self) -> ViewOrientation {
        self.model.view_orientation.unwrap_or(self.defaults.view)
    }

    pub fn drawing(&self) -> &'a DrawingData {
        &self.model.drawing_data
    }

    /// Body part appearances in playback mode.
    pub fn region_appearances(&self, registry: &BodyRegistry) -> Vec<PartAppearance> {
        appearances(registry, self.model.regions(), RenderMode::Playback)
    }

    /// Paint the drawing at identity view. Only the snapshot is read.
    pub fn render<S: DrawingSurface>(&self, surface: &mut S) {
        surface.redraw(self.drawing(), Affine::IDENTITY);
    }
}

/// A snapshot in a patient's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub model: PainMapModel,
}

impl TimelineEntry {
    /// Entry recorded now.
    pub fn new(model: PainMapModel) -> Self {
        Self::recorded_at(model, Utc::now())
    }

    pub fn recorded_at(model: PainMapModel, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            recorded_at: at,
            model,
        }
    }
}

/// Chronological series of snapshots with one selected for display.
#[derive(Debug, Clone, Default)]
pub struct PlaybackTimeline {
    entries: Vec<TimelineEntry>,
    selected: usize,
    defaults: ViewerDefaults,
}

impl PlaybackTimeline {
    /// Build a timeline; entries are ordered oldest first.
    pub fn new(mut entries: Vec<TimelineEntry>, defaults: ViewerDefaults) -> Self {
        entries.sort_by_key(|entry| entry.recorded_at);
        Self {
            entries,
            selected: 0,
            defaults,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Select a snapshot by index. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> Option<PlaybackProjector<'_>> {
        if index >= self.entries.len() {
            log::trace!("Timeline index {} out of range ({})", index, self.entries.len());
            return None;
        }
        self.selected = index;
        self.current()
    }

    /// Projector for the selected snapshot.
    pub fn current(&self) -> Option<PlaybackProjector<'_>> {
        self.entries
            .get(self.selected)
            .map(|entry| PlaybackProjector::new(&entry.model, &self.defaults))
    }
}
