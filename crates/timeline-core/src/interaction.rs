//! Interaction layer: pointer gestures translated into geometry updates.
//!
//! Gestures apply live: every pointer move commits an update through the
//! Store, and releasing the pointer just drops the gesture. There is no
//! rollback, so the last move is the final result. Undo capture happens
//! once at gesture start (see [`crate::editor::Editor::begin_gesture`]).

use layercut_common::EditorSettings;
use layercut_project_model::{Element, ElementPatch, TrackId};

use crate::geometry::{collect_snap_points, snap_threshold_secs, snap_to_nearest, SnapResult};
use crate::store::Store;

/// Smallest canvas size a resize may produce (percent).
const MIN_CANVAS_SIZE: f64 = 1.0;

/// Timeline zoom and snapping parameters for a gesture.
#[derive(Debug, Clone, Copy)]
pub struct DragSettings {
    pub pixels_per_second: f64,
    pub snap_threshold_px: f64,
    pub min_duration: f64,
    pub snapping: bool,
}

impl DragSettings {
    pub fn from_editor(settings: &EditorSettings, pixels_per_second: f64) -> Self {
        Self {
            pixels_per_second,
            snap_threshold_px: settings.snap_threshold_px,
            min_duration: settings.min_element_duration_secs,
            snapping: true,
        }
    }

    fn threshold_secs(&self) -> f64 {
        if self.snapping {
            snap_threshold_secs(self.snap_threshold_px, self.pixels_per_second)
        } else {
            0.0
        }
    }

    fn px_to_secs(&self, px: f64) -> f64 {
        if self.pixels_per_second > 0.0 {
            px / self.pixels_per_second
        } else {
            0.0
        }
    }
}

/// Which part of a clip is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Move,
    TrimStart,
    TrimEnd,
}

/// An in-progress drag of a clip on the timeline.
#[derive(Debug, Clone)]
pub struct TimelineDrag {
    element_id: String,
    mode: DragMode,
    origin_x: f64,
    start_time: f64,
    duration: f64,
    media_offset: f64,
    time_based: bool,
    track_id: TrackId,
    settings: DragSettings,
}

impl TimelineDrag {
    /// Start a drag at pointer position `pointer_x` (timeline pixels).
    /// Refused for unknown elements and elements on locked tracks.
    pub fn begin(
        store: &Store,
        element_id: &str,
        mode: DragMode,
        pointer_x: f64,
        settings: DragSettings,
    ) -> Option<Self> {
        let state = store.state();
        let element = state.element(element_id)?;
        if state.track(element.track_id).is_some_and(|t| t.is_locked) {
            tracing::debug!(element_id, "Drag refused: track is locked");
            return None;
        }
        Some(Self {
            element_id: element_id.to_string(),
            mode,
            origin_x: pointer_x,
            start_time: element.start_time,
            duration: element.duration,
            media_offset: element.media_offset,
            time_based: element.element_type.is_time_based(),
            track_id: element.track_id,
            settings,
        })
    }

    pub fn element_id(&self) -> &str {
        &self.element_id
    }

    pub fn mode(&self) -> DragMode {
        self.mode
    }

    /// Apply the gesture for the current pointer position.
    ///
    /// `target_track` moves the clip to another lane during a move; locked
    /// or unknown tracks are ignored. Returns the snap outcome of the edge
    /// that was adjusted, or `None` if the element no longer exists.
    pub fn update(
        &self,
        store: &mut Store,
        pointer_x: f64,
        target_track: Option<TrackId>,
    ) -> Option<SnapResult> {
        let delta = self.settings.px_to_secs(pointer_x - self.origin_x);
        let threshold = self.settings.threshold_secs();
        let min_duration = self.settings.min_duration;
        let original_end = self.start_time + self.duration;

        let state = store.state();
        state.element(&self.element_id)?;

        let (patch, snap) = match self.mode {
            DragMode::Move => {
                let track_id = target_track
                    .filter(|id| state.track(*id).is_some_and(|t| !t.is_locked))
                    .unwrap_or(self.track_id);
                let points = collect_snap_points(&state.elements, track_id, Some(&self.element_id));

                let raw_start = (self.start_time + delta).max(0.0);
                let by_start = snap_to_nearest(raw_start, &points, threshold);
                let (start, snap) = if by_start.snapped {
                    (by_start.time, by_start)
                } else {
                    let by_end = snap_to_nearest(raw_start + self.duration, &points, threshold);
                    ((by_end.time - self.duration).max(0.0), by_end)
                };

                let patch = ElementPatch {
                    start_time: Some(start),
                    track_id: Some(track_id),
                    ..Default::default()
                };
                (patch, snap)
            }
            DragMode::TrimStart => {
                let points =
                    collect_snap_points(&state.elements, self.track_id, Some(&self.element_id));
                // Time-based media cannot start before its source begins.
                let floor = if self.time_based {
                    (self.start_time - self.media_offset).max(0.0)
                } else {
                    0.0
                };
                let ceiling = original_end - min_duration;
                let raw_start = (self.start_time + delta).clamp(floor, ceiling.max(floor));

                let snap = snap_to_nearest(raw_start, &points, threshold);
                let start = if snap.snapped && snap.time >= floor && snap.time <= ceiling {
                    snap.time
                } else {
                    raw_start
                };

                let mut patch = ElementPatch::timing(start, original_end - start);
                if self.time_based {
                    patch.media_offset = Some((self.media_offset + (start - self.start_time)).max(0.0));
                }
                (patch, SnapResult { time: start, snapped: start == snap.time && snap.snapped })
            }
            DragMode::TrimEnd => {
                let points =
                    collect_snap_points(&state.elements, self.track_id, Some(&self.element_id));
                let min_end = self.start_time + min_duration;
                let raw_end = (original_end + delta).max(min_end);

                let snap = snap_to_nearest(raw_end, &points, threshold);
                let end = if snap.snapped && snap.time >= min_end {
                    snap.time
                } else {
                    raw_end
                };
                (
                    ElementPatch::timing(self.start_time, end - self.start_time),
                    SnapResult { time: end, snapped: end == snap.time && snap.snapped },
                )
            }
        };

        store.update_element(&self.element_id, patch);
        Some(snap)
    }
}

/// Which handle of an element is grabbed on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasHandle {
    Move,
    /// Bottom-right corner.
    Resize,
}

/// An in-progress move/resize on the preview canvas. Pointer positions are
/// in canvas percent.
#[derive(Debug, Clone)]
pub struct CanvasDrag {
    element_id: String,
    handle: CanvasHandle,
    origin: (f64, f64),
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    lock_aspect_ratio: bool,
}

impl CanvasDrag {
    /// Start a canvas gesture. Audio elements have no canvas presence.
    pub fn begin(
        store: &Store,
        element_id: &str,
        handle: CanvasHandle,
        pointer: (f64, f64),
    ) -> Option<Self> {
        let state = store.state();
        let element: &Element = state.element(element_id)?;
        if !element.element_type.is_visual()
            || state.track(element.track_id).is_some_and(|t| t.is_locked)
        {
            return None;
        }
        Some(Self {
            element_id: element_id.to_string(),
            handle,
            origin: pointer,
            x: element.x,
            y: element.y,
            width: element.width,
            height: element.height,
            lock_aspect_ratio: element.lock_aspect_ratio,
        })
    }

    pub fn update(&self, store: &mut Store, pointer: (f64, f64)) -> bool {
        let dx = pointer.0 - self.origin.0;
        let dy = pointer.1 - self.origin.1;

        let patch = match self.handle {
            CanvasHandle::Move => ElementPatch::position(
                (self.x + dx).clamp(0.0, 100.0),
                (self.y + dy).clamp(0.0, 100.0),
            ),
            CanvasHandle::Resize => {
                let width = (self.width + dx).clamp(MIN_CANVAS_SIZE, 100.0);
                let height = if self.lock_aspect_ratio && self.width > 0.0 {
                    (width * self.height / self.width).clamp(MIN_CANVAS_SIZE, 100.0)
                } else {
                    (self.height + dy).clamp(MIN_CANVAS_SIZE, 100.0)
                };
                ElementPatch {
                    width: Some(width),
                    height: Some(height),
                    ..Default::default()
                }
            }
        };
        store.update_element(&self.element_id, patch)
    }
}

/// Project time under a pointer on the ruler.
pub fn time_at_pointer(pointer_x: f64, pixels_per_second: f64) -> f64 {
    if pixels_per_second <= 0.0 {
        return 0.0;
    }
    (pointer_x / pixels_per_second).max(0.0)
}
