//! Editor facade: the single entry point for mutating the timeline.
//!
//! The editor owns the [`Store`] and the undo [`History`]. Every command
//! captures a snapshot before it runs and pushes it only if the command
//! changed anything. Pointer gestures capture once at gesture start and
//! push at gesture end.

use layercut_common::EditorSettings;
use layercut_project_model::{
    Element, ElementPatch, ElementProps, ElementType, Marker, MarkerColor, MarkerPatch,
    ProjectPersistence, ProjectSnapshot, TimelineState, TrackId, TrackKind,
};

use crate::edit::{self, NudgeDirection, SplitScope};
use crate::geometry::SnapResult;
use crate::history::History;
use crate::interaction::{CanvasDrag, CanvasHandle, DragMode, DragSettings, TimelineDrag};
use crate::placement::{place_new_element, PlacementRequest};
use crate::store::Store;

#[derive(Debug, Clone)]
enum GestureKind {
    Timeline(TimelineDrag),
    Canvas(CanvasDrag),
}

#[derive(Debug, Clone)]
struct Gesture {
    kind: GestureKind,
    before: ProjectSnapshot,
    revision: u64,
}

/// Timeline editor session.
#[derive(Debug, Clone)]
pub struct Editor {
    store: Store,
    history: History,
    settings: EditorSettings,
    pixels_per_second: f64,
    gesture: Option<Gesture>,
    saved_revision: Option<u64>,
}

impl Editor {
    pub fn new(settings: EditorSettings) -> Self {
        Self::with_store(Store::new(), settings)
    }

    /// Editor around a loaded snapshot (repaired by the store).
    pub fn from_snapshot(snapshot: ProjectSnapshot, settings: EditorSettings) -> Self {
        Self::with_store(Store::from_snapshot(snapshot), settings)
    }

    /// Load from persistence. A failed or empty load starts a fresh project.
    pub fn load(persistence: &dyn ProjectPersistence, settings: EditorSettings) -> Self {
        match persistence.load() {
            Ok(Some(snapshot)) => {
                let mut editor = Self::from_snapshot(snapshot, settings);
                editor.saved_revision = Some(editor.store.revision());
                editor
            }
            Ok(None) => Self::new(settings),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load project; starting fresh");
                Self::new(settings)
            }
        }
    }

    fn with_store(store: Store, settings: EditorSettings) -> Self {
        Self {
            store,
            history: History::new(settings.history_capacity),
            pixels_per_second: settings.pixels_per_second,
            settings,
            gesture: None,
            saved_revision: None,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Mutable store access for transport drivers (playback clock).
    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    pub fn state(&self) -> &TimelineState {
        self.store.state()
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn pixels_per_second(&self) -> f64 {
        self.pixels_per_second
    }

    /// Change the timeline zoom. Non-positive values are ignored.
    pub fn set_pixels_per_second(&mut self, pixels_per_second: f64) {
        if pixels_per_second > 0.0 {
            self.pixels_per_second = pixels_per_second;
        }
    }

    /// Run a command with undo capture.
    fn record<R>(&mut self, command: impl FnOnce(&mut Store) -> R) -> R {
        let before = self.store.project_snapshot();
        let revision = self.store.revision();
        let result = command(&mut self.store);
        if self.store.revision() != revision {
            self.history.push(before);
        }
        result
    }

    // ---------------------------------------------------------------
    // Element commands
    // ---------------------------------------------------------------

    pub fn add_element(&mut self, request: PlacementRequest) -> Option<Element> {
        self.record(|store| place_new_element(store, request))
    }

    pub fn update_element(&mut self, id: &str, patch: ElementPatch) -> bool {
        self.record(|store| store.update_element(id, patch))
    }

    pub fn remove_element(&mut self, id: &str) -> bool {
        self.record(|store| store.remove_element(id).is_some())
    }

    pub fn remove_selected(&mut self) -> bool {
        match self.state().selected_element_id.clone() {
            Some(id) => self.remove_element(&id),
            None => false,
        }
    }

    /// Place an AI-generated component payload.
    pub fn add_ai_component(
        &mut self,
        name: impl Into<String>,
        html: String,
        css: String,
    ) -> Option<Element> {
        let request = PlacementRequest::new(ElementType::AiGenerated)
            .named(name)
            .with_props(ElementProps {
                html: Some(html),
                css: Some(css),
                ..Default::default()
            });
        self.add_element(request)
    }

    /// Place an image from an already-resolved source (e.g. a data URI).
    pub fn add_image_source(&mut self, name: impl Into<String>, src: String) -> Option<Element> {
        let request = PlacementRequest::new(ElementType::Image)
            .named(name)
            .with_props(ElementProps {
                src: Some(src),
                ..Default::default()
            });
        self.add_element(request)
    }

    pub fn split_at(&mut self, time: f64, scope: SplitScope) -> Vec<String> {
        self.record(|store| edit::split_at_time(store, time, scope))
    }

    /// Split at the playhead, restricted to the selection when there is one.
    pub fn split_at_playhead(&mut self) -> Vec<String> {
        let time = self.state().current_time;
        let scope = if self.state().selected_element_id.is_some() {
            SplitScope::Selected
        } else {
            SplitScope::All
        };
        self.split_at(time, scope)
    }

    pub fn split_audio_from_video(&mut self, video_id: &str) -> Option<String> {
        self.record(|store| edit::split_audio_from_video(store, video_id))
    }

    pub fn duplicate_selected(&mut self) -> Option<String> {
        let offset = self.settings.duplicate_offset_percent;
        self.record(|store| edit::duplicate_selected(store, offset))
    }

    pub fn nudge_selected(&mut self, direction: NudgeDirection, large: bool) -> bool {
        let step = if large {
            self.settings.nudge_step_large
        } else {
            self.settings.nudge_step
        };
        self.record(|store| edit::nudge_selected(store, direction, step))
    }

    // ---------------------------------------------------------------
    // Track commands
    // ---------------------------------------------------------------

    pub fn add_track(&mut self, kind: TrackKind) -> TrackId {
        self.record(|store| store.add_track(kind))
    }

    pub fn insert_track_after(&mut self, after: TrackId, kind: TrackKind) -> Option<TrackId> {
        self.record(|store| edit::insert_track_after(store, after, kind))
    }

    pub fn delete_track(&mut self, track_id: TrackId) -> bool {
        self.record(|store| edit::delete_track(store, track_id))
    }

    pub fn set_track_visibility(&mut self, track_id: TrackId, visible: bool) -> bool {
        self.record(|store| store.set_track_visibility(track_id, visible))
    }

    pub fn set_track_locked(&mut self, track_id: TrackId, locked: bool) -> bool {
        self.record(|store| store.set_track_locked(track_id, locked))
    }

    // ---------------------------------------------------------------
    // Markers
    // ---------------------------------------------------------------

    pub fn add_marker(&mut self, time: f64, name: impl Into<String>, color: MarkerColor) -> String {
        let marker = Marker::new(time, name, color);
        let id = marker.id.clone();
        self.record(|store| store.add_marker(marker));
        id
    }

    pub fn update_marker(&mut self, id: &str, patch: MarkerPatch) -> bool {
        self.record(|store| store.update_marker(id, patch))
    }

    pub fn remove_marker(&mut self, id: &str) -> bool {
        self.record(|store| store.remove_marker(id).is_some())
    }

    // ---------------------------------------------------------------
    // Selection / transport (not undoable)
    // ---------------------------------------------------------------

    pub fn select(&mut self, id: Option<&str>) -> bool {
        self.store.select(id)
    }

    /// Move the playhead, clamped to `[0, total_duration]`.
    pub fn seek(&mut self, time: f64) {
        self.store.seek(time);
    }

    // ---------------------------------------------------------------
    // Undo / redo
    // ---------------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        self.end_gesture();
        let current = self.store.project_snapshot();
        match self.history.undo(current) {
            Some(previous) => {
                self.store.restore(previous);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        self.end_gesture();
        let current = self.store.project_snapshot();
        match self.history.redo(current) {
            Some(next) => {
                self.store.restore(next);
                true
            }
            None => false,
        }
    }

    // ---------------------------------------------------------------
    // Gestures
    // ---------------------------------------------------------------

    fn begin_gesture(&mut self, kind: GestureKind) {
        self.end_gesture();
        self.gesture = Some(Gesture {
            kind,
            before: self.store.project_snapshot(),
            revision: self.store.revision(),
        });
    }

    /// Start dragging a clip on the timeline at `pointer_x` pixels.
    pub fn begin_timeline_drag(&mut self, element_id: &str, mode: DragMode, pointer_x: f64) -> bool {
        let settings = DragSettings::from_editor(&self.settings, self.pixels_per_second);
        match TimelineDrag::begin(&self.store, element_id, mode, pointer_x, settings) {
            Some(drag) => {
                self.begin_gesture(GestureKind::Timeline(drag));
                true
            }
            None => false,
        }
    }

    /// Start a move/resize on the canvas at `pointer` (canvas percent).
    pub fn begin_canvas_drag(
        &mut self,
        element_id: &str,
        handle: CanvasHandle,
        pointer: (f64, f64),
    ) -> bool {
        match CanvasDrag::begin(&self.store, element_id, handle, pointer) {
            Some(drag) => {
                self.begin_gesture(GestureKind::Canvas(drag));
                true
            }
            None => false,
        }
    }

    /// Pointer moved during a timeline drag.
    pub fn drag_timeline(&mut self, pointer_x: f64, target_track: Option<TrackId>) -> Option<SnapResult> {
        match &self.gesture {
            Some(Gesture {
                kind: GestureKind::Timeline(drag),
                ..
            }) => drag.update(&mut self.store, pointer_x, target_track),
            _ => None,
        }
    }

    /// Pointer moved during a canvas drag.
    pub fn drag_canvas(&mut self, pointer: (f64, f64)) -> bool {
        match &self.gesture {
            Some(Gesture {
                kind: GestureKind::Canvas(drag),
                ..
            }) => drag.update(&mut self.store, pointer),
            _ => false,
        }
    }

    /// Pointer released. The last applied update stands.
    pub fn end_gesture(&mut self) {
        if let Some(gesture) = self.gesture.take() {
            if self.store.revision() != gesture.revision {
                self.history.push(gesture.before);
            }
        }
    }

    pub fn gesture_in_progress(&self) -> bool {
        self.gesture.is_some()
    }

    // ---------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------

    /// Save if the content changed since the last successful save and no
    /// gesture is in progress. Failures are logged; the next call retries.
    pub fn autosave(&mut self, persistence: &dyn ProjectPersistence) -> bool {
        if self.gesture.is_some() {
            return false;
        }
        let revision = self.store.revision();
        if self.saved_revision == Some(revision) {
            return false;
        }
        match persistence.save(&self.store.project_snapshot()) {
            Ok(()) => {
                self.saved_revision = Some(revision);
                tracing::debug!(revision, "Project saved");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Autosave failed; will retry on next change");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layercut_project_model::{JsonProjectStore, ProjectError};
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct MemoryPersistence {
        saved: RefCell<Vec<ProjectSnapshot>>,
        fail: Cell<bool>,
        fail_load: Cell<bool>,
    }

    impl ProjectPersistence for MemoryPersistence {
        fn load(&self) -> Result<Option<ProjectSnapshot>, ProjectError> {
            if self.fail_load.get() {
                return Err(ProjectError::IoError {
                    path: "memory".into(),
                    source: std::io::Error::other("unreadable"),
                });
            }
            Ok(self.saved.borrow().last().cloned())
        }

        fn save(&self, snapshot: &ProjectSnapshot) -> Result<(), ProjectError> {
            if self.fail.get() {
                return Err(ProjectError::IoError {
                    path: "memory".into(),
                    source: std::io::Error::other("disk full"),
                });
            }
            self.saved.borrow_mut().push(snapshot.clone());
            Ok(())
        }
    }

    fn editor() -> Editor {
        Editor::new(EditorSettings::default())
    }

    #[test]
    fn test_undo_restores_and_clears_selection() {
        let mut editor = editor();
        let el = editor.add_element(PlacementRequest::new(ElementType::Shape)).unwrap();
        assert_eq!(editor.state().selected_element_id.as_deref(), Some(el.id.as_str()));

        assert!(editor.undo());
        assert!(editor.state().elements.is_empty());
        assert!(editor.state().selected_element_id.is_none());

        assert!(editor.redo());
        assert_eq!(editor.state().elements.len(), 1);
    }

    #[test]
    fn test_noop_commands_do_not_push_history() {
        let mut editor = editor();
        assert!(!editor.delete_track(99));
        assert!(!editor.update_element("ghost", ElementPatch::position(1.0, 1.0)));
        assert!(!editor.history().can_undo());
    }

    #[test]
    fn test_gesture_is_one_undo_step() {
        let mut editor = editor();
        let el = editor
            .add_element(PlacementRequest::new(ElementType::Shape).at(1.0))
            .unwrap();
        let depth = editor.history().undo_depth();

        assert!(editor.begin_timeline_drag(&el.id, DragMode::Move, 0.0));
        for x in [50.0, 100.0, 150.0, 200.0] {
            editor.drag_timeline(x, None);
        }
        editor.end_gesture();

        assert_eq!(editor.history().undo_depth(), depth + 1);
        assert_eq!(editor.state().element(&el.id).unwrap().start_time, 5.0);

        editor.undo();
        assert_eq!(editor.state().element(&el.id).unwrap().start_time, 1.0);
    }

    #[test]
    fn test_gesture_without_movement_pushes_nothing() {
        let mut editor = editor();
        let el = editor.add_element(PlacementRequest::new(ElementType::Text)).unwrap();
        let depth = editor.history().undo_depth();
        editor.begin_canvas_drag(&el.id, CanvasHandle::Move, (0.0, 0.0));
        editor.end_gesture();
        assert_eq!(editor.history().undo_depth(), depth);
    }

    #[test]
    fn test_autosave_skips_unchanged_and_gestures() {
        let persistence = MemoryPersistence::default();
        let mut editor = editor();
        assert!(editor.autosave(&persistence));
        assert!(!editor.autosave(&persistence));

        let el = editor.add_element(PlacementRequest::new(ElementType::Shape)).unwrap();
        editor.begin_canvas_drag(&el.id, CanvasHandle::Move, (0.0, 0.0));
        editor.drag_canvas((10.0, 10.0));
        assert!(!editor.autosave(&persistence));
        editor.end_gesture();
        assert!(editor.autosave(&persistence));
        assert_eq!(persistence.saved.borrow().len(), 2);
    }

    #[test]
    fn test_autosave_failure_retries() {
        let persistence = MemoryPersistence::default();
        persistence.fail.set(true);
        let mut editor = editor();
        editor.add_element(PlacementRequest::new(ElementType::Shape));
        assert!(!editor.autosave(&persistence));

        persistence.fail.set(false);
        assert!(editor.autosave(&persistence));
    }

    #[test]
    fn test_load_falls_back_to_fresh_project() {
        let persistence = MemoryPersistence::default();
        let editor = Editor::load(&persistence, EditorSettings::default());
        assert_eq!(editor.state().tracks.len(), 3);
    }

    #[test]
    fn test_failed_load_still_autosaves() {
        let persistence = MemoryPersistence::default();
        persistence.fail_load.set(true);
        let mut editor = Editor::load(&persistence, EditorSettings::default());
        editor.add_element(PlacementRequest::new(ElementType::Shape));

        assert!(editor.autosave(&persistence));
        assert_eq!(persistence.saved.borrow().len(), 1);
        assert_eq!(persistence.saved.borrow()[0].elements.len(), 1);
    }

    #[test]
    fn test_corrupt_project_file_does_not_block_autosave() {
        let dir = std::env::temp_dir().join("layercut_test_editor_corrupt");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(dir.join("meta")).unwrap();
        std::fs::write(dir.join("meta").join("project.json"), "{").unwrap();

        let persistence = JsonProjectStore::new(&dir);
        let mut editor = Editor::load(&persistence, EditorSettings::default());
        editor.add_element(PlacementRequest::new(ElementType::Shape));
        assert!(editor.autosave(&persistence));

        let reloaded = Editor::load(&persistence, EditorSettings::default());
        assert_eq!(reloaded.state().elements.len(), 1);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_seek_clamps_like_transport() {
        let mut editor = editor();
        let total = editor.state().total_duration;
        editor.seek(total + 10.0);
        assert_eq!(editor.state().current_time, total);
        editor.seek(-2.0);
        assert_eq!(editor.state().current_time, 0.0);
    }

    #[test]
    fn test_split_at_playhead_prefers_selection() {
        let mut editor = editor();
        let a = editor.add_element(PlacementRequest::new(ElementType::Shape).at(0.0)).unwrap();
        let b = editor.add_element(PlacementRequest::new(ElementType::Shape).at(0.0)).unwrap();
        editor.seek(2.0);
        editor.select(Some(&a.id));
        assert_eq!(editor.split_at_playhead().len(), 1);
        assert_eq!(editor.state().element(&b.id).unwrap().duration, 5.0);
    }

    #[test]
    fn test_ai_component_payload() {
        let mut editor = editor();
        let el = editor
            .add_ai_component("Badge", "<div>hi</div>".to_string(), "div{}".to_string())
            .unwrap();
        assert_eq!(el.element_type, ElementType::AiGenerated);
        assert_eq!(el.props.html.as_deref(), Some("<div>hi</div>"));
        assert_eq!((el.width, el.height), (30.0, 30.0));
    }
}
