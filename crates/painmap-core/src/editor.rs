//! Form-side owner of one pain map being edited.
//!
//! The editor holds the drawing session and/or region model of one mount plus
//! the clinical scalars, and emits the full model on every committed change.

use crate::drawing::{CanvasDrawingSession, DrawingSurface, SessionConfig};
use crate::error::EngineResult;
use crate::model::{AvatarVariant, DepthIndicator, Intensity, PainMapModel, ViewOrientation};
use crate::region::{BodyRegistry, RegionSelectionModel};
use crate::storage::{PainMapStore, StoredPainMap};
use std::cell::RefCell;
use std::rc::Rc;

type ModelListener = Box<dyn FnMut(&PainMapModel)>;

/// Model plus its listeners, shared with the sub-component callbacks.
#[derive(Default)]
struct Shared {
    model: PainMapModel,
    listeners: Vec<ModelListener>,
}

impl Shared {
    fn notify(&mut self) {
        let Shared { model, listeners } = self;
        for listener in listeners.iter_mut() {
            listener(&*model);
        }
    }
}

/// Editing state for one pain map.
pub struct PainMapEditor<S: DrawingSurface> {
    shared: Rc<RefCell<Shared>>,
    drawing: Option<CanvasDrawingSession<S>>,
    regions: Option<RegionSelectionModel>,
}

impl<S: DrawingSurface> PainMapEditor<S> {
    /// Start editing, optionally from a stored model.
    pub fn new(seed: Option<PainMapModel>) -> Self {
        Self {
            shared: Rc::new(RefCell::new(Shared {
                model: seed.unwrap_or_default(),
                listeners: Vec::new(),
            })),
            drawing: None,
            regions: None,
        }
    }

    /// Register a listener for model changes.
    pub fn on_change(&mut self, listener: impl FnMut(&PainMapModel) + 'static) {
        self.shared.borrow_mut().listeners.push(Box::new(listener));
    }

    /// Mount a drawing session seeded with the model's drawing data.
    pub fn attach_drawing(&mut self, surface: Option<S>, config: &SessionConfig) -> EngineResult<()> {
        let seed = self.shared.borrow().model.drawing_data.clone();
        let mut session = CanvasDrawingSession::mount(surface, Some(&seed), config)?;
        let shared = Rc::clone(&self.shared);
        session.on_change(move |data| {
            let mut shared = shared.borrow_mut();
            shared.model.drawing_data = data.clone();
            shared.notify();
        });
        self.drawing = Some(session);
        Ok(())
    }

    /// Mount a region model seeded with the model's regions.
    pub fn attach_regions(&mut self, registry: BodyRegistry) -> EngineResult<()> {
        let seed = self.shared.borrow().model.regions().to_vec();
        let mut regions = RegionSelectionModel::mount(registry, Some(&seed))?;
        let shared = Rc::clone(&self.shared);
        regions.on_change(move |selected| {
            let mut shared = shared.borrow_mut();
            shared.model.regions = Some(selected.to_vec());
            shared.notify();
        });
        self.regions = Some(regions);
        Ok(())
    }

    pub fn drawing(&self) -> Option<&CanvasDrawingSession<S>> {
        self.drawing.as_ref()
    }

    pub fn drawing_mut(&mut self) -> Option<&mut CanvasDrawingSession<S>> {
        self.drawing.as_mut()
    }

    pub fn regions(&self) -> Option<&RegionSelectionModel> {
        self.regions.as_ref()
    }

    pub fn regions_mut(&mut self) -> Option<&mut RegionSelectionModel> {
        self.regions.as_mut()
    }

    // --- Clinical scalars ---

    pub fn set_body_region(&mut self, label: impl Into<String>) {
        let label = label.into();
        self.update(|model| model.body_region = label);
    }

    /// Overall intensity, clamped to 0–10.
    pub fn set_pain_intensity(&mut self, value: f64) {
        self.update(|model| model.pain_intensity = Intensity::new(value));
    }

    pub fn set_pain_qualities(&mut self, qualities: Vec<String>) {
        self.update(|model| model.pain_quality = qualities);
    }

    /// Add or remove one quality from the quality list.
    pub fn toggle_pain_quality(&mut self, quality: &str) {
        self.update(|model| {
            if let Some(index) = model.pain_quality.iter().position(|q| q == quality) {
                model.pain_quality.remove(index);
            } else {
                model.pain_quality.push(quality.to_string());
            }
        });
    }

    pub fn set_avatar(&mut self, avatar: AvatarVariant) {
        self.update(|model| model.avatar_type = Some(avatar));
    }

    pub fn set_view_orientation(&mut self, view: ViewOrientation) {
        self.update(|model| model.view_orientation = Some(view));
    }

    pub fn set_depth(&mut self, depth: DepthIndicator) {
        self.update(|model| model.depth_indicator = depth);
    }

    pub fn set_submission_source(&mut self, source: impl Into<String>) {
        let source = source.into();
        self.update(|model| model.submission_source = Some(source));
    }

    /// The current model.
    pub fn snapshot(&self) -> PainMapModel {
        self.shared.borrow().model.clone()
    }

    // --- Persistence ---

    /// Persist the current snapshot under `id`.
    ///
    /// Editor state is never modified, whether the save succeeds or not.
    pub async fn save_to(&self, store: &dyn PainMapStore, id: &str) -> EngineResult<StoredPainMap> {
        let record = StoredPainMap::new(id, self.snapshot());
        store.save(&record).await?;
        log::info!("Pain map {} saved", id);
        Ok(record)
    }

    /// Replace the edited model with a stored one.
    ///
    /// Attached components are re-seeded and their history restarts. On
    /// failure nothing changes.
    pub async fn load_from(&mut self, store: &dyn PainMapStore, id: &str) -> EngineResult<()> {
        let record = store.load(id).await?;
        self.shared.borrow_mut().model = record.model;

        let drawing_data = self.shared.borrow().model.drawing_data.clone();
        if let Some(session) = self.drawing.as_mut() {
            session.reset_history(drawing_data);
        }
        if let Some(regions) = self.regions.take() {
            let registry = regions.registry().clone();
            let view = regions.view();
            self.attach_regions(registry)?;
            if let Some(regions) = self.regions.as_mut() {
                regions.set_view(view);
            }
        }
        self.shared.borrow_mut().notify();
        log::info!("Pain map {} loaded", id);
        Ok(())
    }

    /// Unmount, returning the final model. An open stroke is discarded.
    pub fn teardown(mut self) -> PainMapModel {
        if let Some(session) = self.drawing.take() {
            session.teardown();
        }
        if let Some(regions) = self.regions.take() {
            regions.teardown();
        }
        self.snapshot()
    }

    fn update(&mut self, change: impl FnOnce(&mut PainMapModel)) {
        let mut shared = self.shared.borrow_mut();
        change(&mut shared.model);
        shared.notify();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::{BrushSettings, RecordingSurface};
    use crate::model::PainRegion;
    use crate::region::RegionBrush;
    use crate::storage::{BoxFuture, MemoryStorage, StorageError, StorageResult};
    use kurbo::Point;
    use pollster::block_on;

    fn mounted_editor() -> PainMapEditor<RecordingSurface> {
        let mut editor = PainMapEditor::new(None);
        editor
            .attach_drawing(Some(RecordingSurface::new()), &SessionConfig::default())
            .unwrap();
        editor.attach_regions(BodyRegistry::standard()).unwrap();
        editor
    }

    fn draw_stroke(editor: &mut PainMapEditor<RecordingSurface>) {
        let session = editor.drawing_mut().unwrap();
        let settings = BrushSettings::draw("burning");
        session.begin_stroke(Point::new(1.0, 1.0), &settings);
        session.continue_stroke(Point::new(5.0, 5.0));
        session.end_stroke();
    }

    #[test]
    fn test_every_change_emits_full_model() {
        let mut editor = mounted_editor();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        editor.on_change(move |model| sink.borrow_mut().push(model.clone()));

        editor.set_body_region("Right shoulder");
        draw_stroke(&mut editor);
        editor
            .regions_mut()
            .unwrap()
            .toggle_region("right_shoulder", &RegionBrush::new("throbbing", 8.0));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 3);
        let last = seen.last().unwrap();
        assert_eq!(last.body_region, "Right shoulder");
        assert_eq!(last.drawing_data.paths.len(), 1);
        assert_eq!(last.regions().len(), 1);
    }

    #[test]
    fn test_seeded_components() {
        let seed = PainMapModel::new().with_regions(vec![PainRegion::new("head", "dull", 2.0)]);
        let mut editor: PainMapEditor<RecordingSurface> = PainMapEditor::new(Some(seed));
        editor.attach_regions(BodyRegistry::standard()).unwrap();
        assert!(editor.regions().unwrap().is_selected("head"));
    }

    #[test]
    fn test_scalars_clamp_and_toggle() {
        let mut editor = mounted_editor();
        editor.set_pain_intensity(42.0);
        editor.toggle_pain_quality("sharp");
        editor.toggle_pain_quality("aching");
        editor.toggle_pain_quality("sharp");
        let model = editor.snapshot();
        assert_eq!(model.pain_intensity.value(), 10.0);
        assert_eq!(model.pain_quality, vec!["aching".to_string()]);
    }

    #[test]
    fn test_teardown_discards_open_stroke() {
        let mut editor = mounted_editor();
        draw_stroke(&mut editor);
        let session = editor.drawing_mut().unwrap();
        session.begin_stroke(Point::new(9.0, 9.0), &BrushSettings::default());
        session.continue_stroke(Point::new(10.0, 10.0));
        let model = editor.teardown();
        assert_eq!(model.drawing_data.paths.len(), 1);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let store = MemoryStorage::new();
        let mut editor = mounted_editor();
        editor.set_depth(DepthIndicator::Deep);
        draw_stroke(&mut editor);
        let record = block_on(editor.save_to(&store, "visit-1")).unwrap();
        assert_eq!(record.model, editor.snapshot());

        let mut other = mounted_editor();
        block_on(other.load_from(&store, "visit-1")).unwrap();
        assert_eq!(other.snapshot().depth_indicator, DepthIndicator::Deep);
        let session = other.drawing().unwrap();
        assert_eq!(session.paths().len(), 1);
        assert!(!session.can_undo());
    }

    struct FailingStore;

    impl PainMapStore for FailingStore {
        fn save(&self, _record: &StoredPainMap) -> BoxFuture<'_, StorageResult<()>> {
            Box::pin(async { Err(StorageError::Io("disk full".to_string())) })
        }
        fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<StoredPainMap>> {
            let id = id.to_string();
            Box::pin(async move { Err(StorageError::NotFound(id)) })
        }
        fn delete(&self, _id: &str) -> BoxFuture<'_, StorageResult<()>> {
            Box::pin(async { Ok(()) })
        }
        fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
            Box::pin(async { Ok(Vec::new()) })
        }
        fn exists(&self, _id: &str) -> BoxFuture<'_, StorageResult<bool>> {
            Box::pin(async { Ok(false) })
        }
    }

    #[test]
    fn test_failed_persistence_leaves_state_unchanged() {
        let mut editor = mounted_editor();
        draw_stroke(&mut editor);
        let before = editor.snapshot();

        let err = block_on(editor.save_to(&FailingStore, "x")).unwrap_err();
        assert!(!err.is_precondition());
        assert!(block_on(editor.load_from(&FailingStore, "x")).is_err());
        assert_eq!(editor.snapshot(), before);
        assert!(editor.drawing().unwrap().can_undo());
    }
}
