//! The authoritative Track/Element Store.
//!
//! The store owns the canonical timeline state. Every mutation builds a new
//! [`TimelineState`] from the current one and swaps it in atomically, so a
//! reader holding a snapshot from [`Store::snapshot`] never observes a
//! partially applied change. Commands that would break an invariant are
//! refused and reported through their return value; nothing here panics or
//! returns an error across the public boundary.

use std::collections::BTreeMap;
use std::sync::Arc;

use layercut_project_model::{
    Element, ElementPatch, Marker, MarkerPatch, ProjectSnapshot, TimelineState, Track, TrackId,
    TrackKind,
};

use crate::geometry::intervals_overlap;

/// Duration assigned to elements loaded with a non-positive length.
const REPAIRED_DURATION_SECS: f64 = 0.1;

/// Owner of the timeline state.
#[derive(Debug, Clone)]
pub struct Store {
    state: Arc<TimelineState>,
    revision: u64,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Store around a fresh project.
    pub fn new() -> Self {
        Self {
            state: Arc::new(TimelineState::new()),
            revision: 0,
        }
    }

    /// Store around a loaded snapshot, repairing structural corruption.
    pub fn from_snapshot(snapshot: ProjectSnapshot) -> Self {
        Self::from_state(TimelineState::from_snapshot(snapshot))
    }

    /// Store around an existing state, repairing structural corruption.
    pub fn from_state(mut state: TimelineState) -> Self {
        let repairs = repair(&mut state);
        if repairs > 0 {
            tracing::warn!(repairs, "Repaired structural issues in loaded timeline");
        }
        state.raise_watermark();
        Self {
            state: Arc::new(state),
            revision: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> &TimelineState {
        &self.state
    }

    /// Shared handle to the current state; unaffected by later mutations.
    pub fn snapshot(&self) -> Arc<TimelineState> {
        Arc::clone(&self.state)
    }

    /// The persisted triple of the current state.
    pub fn project_snapshot(&self) -> ProjectSnapshot {
        self.state.snapshot()
    }

    /// Counter bumped on every change to elements, tracks, or markers.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Apply a content change to a copy of the state. The copy replaces the
    /// current state only when `f` reports a change.
    pub(crate) fn mutate<R>(&mut self, f: impl FnOnce(&mut TimelineState) -> Option<R>) -> Option<R> {
        let mut next = (*self.state).clone();
        let result = f(&mut next)?;
        next.raise_watermark();
        self.state = Arc::new(next);
        self.revision += 1;
        Some(result)
    }

    /// Like [`Store::mutate`] for transport and selection fields, which do
    /// not count as content revisions.
    fn mutate_transport(&mut self, f: impl FnOnce(&mut TimelineState) -> bool) -> bool {
        let mut next = (*self.state).clone();
        if !f(&mut next) {
            return false;
        }
        self.state = Arc::new(next);
        true
    }

    // ---------------------------------------------------------------
    // Elements
    // ---------------------------------------------------------------

    /// Append an element. Refused when its track does not exist, its id is
    /// already taken, or its duration is not positive.
    pub fn add_element(&mut self, element: Element) -> bool {
        self.mutate(|state| {
            if state.track(element.track_id).is_none() {
                tracing::debug!(element_id = %element.id, track_id = element.track_id, "add_element refused: unknown track");
                return None;
            }
            if state.element(&element.id).is_some() || !(element.duration > 0.0) {
                tracing::debug!(element_id = %element.id, "add_element refused");
                return None;
            }
            state.elements.push(element);
            Some(())
        })
        .is_some()
    }

    /// Shallow-merge `patch` into the element with `id`.
    pub fn update_element(&mut self, id: &str, patch: ElementPatch) -> bool {
        self.mutate(|state| {
            if let Some(track_id) = patch.track_id {
                if state.track(track_id).is_none() {
                    tracing::debug!(element_id = id, track_id, "update_element refused: unknown track");
                    return None;
                }
            }
            let element = state.elements.iter_mut().find(|e| e.id == id)?;
            element.apply_patch(patch);
            Some(())
        })
        .is_some()
    }

    /// Remove an element, clearing the selection if it pointed at it.
    pub fn remove_element(&mut self, id: &str) -> Option<Element> {
        self.mutate(|state| {
            let index = state.elements.iter().position(|e| e.id == id)?;
            let removed = state.elements.remove(index);
            if state.selected_element_id.as_deref() == Some(id) {
                state.selected_element_id = None;
            }
            Some(removed)
        })
    }

    // ---------------------------------------------------------------
    // Tracks
    // ---------------------------------------------------------------

    /// Append a track after the current maximum id (no renumbering).
    pub fn add_track(&mut self, kind: TrackKind) -> TrackId {
        self.mutate(|state| {
            let id = state.max_track_id() + 1;
            state.tracks.push(Track::new(id, kind));
            Some(id)
        })
        .unwrap_or_default()
    }

    /// Drop a track and every element on it. Refused for the last track.
    /// Does not renumber; see [`crate::edit::delete_track`].
    pub fn remove_track(&mut self, id: TrackId) -> bool {
        self.mutate(|state| {
            if state.tracks.len() <= 1 || state.track(id).is_none() {
                tracing::debug!(track_id = id, "remove_track refused");
                return None;
            }
            state.tracks.retain(|t| t.id != id);
            state.elements.retain(|e| e.track_id != id);
            if state
                .selected_element_id
                .as_deref()
                .is_some_and(|sel| state.element(sel).is_none())
            {
                state.selected_element_id = None;
            }
            Some(())
        })
        .is_some()
    }

    /// Reassign track ids to `1..=N` in current order and remap elements.
    /// Returns the old → new id map.
    pub fn renumber_tracks_and_remap_elements(&mut self) -> BTreeMap<TrackId, TrackId> {
        self.mutate(|state| Some(renumber_tracks(state)))
            .unwrap_or_default()
    }

    pub fn set_track_visibility(&mut self, id: TrackId, visible: bool) -> bool {
        self.mutate(|state| {
            let track = state.tracks.iter_mut().find(|t| t.id == id)?;
            track.is_visible = visible;
            Some(())
        })
        .is_some()
    }

    pub fn set_track_locked(&mut self, id: TrackId, locked: bool) -> bool {
        self.mutate(|state| {
            let track = state.tracks.iter_mut().find(|t| t.id == id)?;
            track.is_locked = locked;
            Some(())
        })
        .is_some()
    }

    // ---------------------------------------------------------------
    // Markers
    // ---------------------------------------------------------------

    pub fn add_marker(&mut self, marker: Marker) -> bool {
        self.mutate(|state| {
            if state.markers.iter().any(|m| m.id == marker.id) {
                return None;
            }
            state.markers.push(marker);
            Some(())
        })
        .is_some()
    }

    pub fn update_marker(&mut self, id: &str, patch: MarkerPatch) -> bool {
        self.mutate(|state| {
            let marker = state.markers.iter_mut().find(|m| m.id == id)?;
            marker.apply_patch(patch);
            Some(())
        })
        .is_some()
    }

    pub fn remove_marker(&mut self, id: &str) -> Option<Marker> {
        self.mutate(|state| {
            let index = state.markers.iter().position(|m| m.id == id)?;
            Some(state.markers.remove(index))
        })
    }

    // ---------------------------------------------------------------
    // Selection and transport
    // ---------------------------------------------------------------

    /// Select an element, or clear with `None`. Unknown ids are ignored.
    pub fn select(&mut self, id: Option<&str>) -> bool {
        self.mutate_transport(|state| match id {
            Some(id) if state.element(id).is_none() => false,
            _ => {
                state.selected_element_id = id.map(str::to_string);
                true
            }
        })
    }

    /// Move the playhead. Negative times clamp to zero.
    pub fn set_current_time(&mut self, time: f64) {
        let time = if time.is_finite() { time.max(0.0) } else { 0.0 };
        self.mutate_transport(|state| {
            state.current_time = time;
            true
        });
    }

    /// Move the playhead within `[0, total_duration]`. Play state is
    /// unchanged.
    pub fn seek(&mut self, time: f64) {
        let total = self.state.total_duration;
        self.set_current_time(if time.is_finite() { time.min(total) } else { 0.0 });
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.mutate_transport(|state| {
            state.is_playing = playing;
            true
        });
    }

    /// Replace elements, tracks, and markers from a history snapshot.
    /// Transport fields and the duration watermark are kept; the selection
    /// is cleared.
    pub fn restore(&mut self, snapshot: ProjectSnapshot) {
        self.mutate(|state| {
            state.elements = snapshot.elements;
            state.tracks = snapshot.tracks;
            state.markers = snapshot.markers;
            state.selected_element_id = None;
            Some(())
        });
    }

    /// Human-readable structural problems in the current state.
    pub fn validate(&self) -> Vec<String> {
        validate_state(&self.state)
    }
}

/// Structural problems in a snapshot as stored, before any repair.
pub fn validate_snapshot(snapshot: &ProjectSnapshot) -> Vec<String> {
    validate_state(&TimelineState::from_snapshot(snapshot.clone()))
}

/// Sort tracks by id, reassign ids `1..=N`, rename them positionally, and
/// rewrite every element's `track_id` through the same old → new map.
pub fn renumber_tracks(state: &mut TimelineState) -> BTreeMap<TrackId, TrackId> {
    state.tracks.sort_by_key(|t| t.id);

    let mut mapping = BTreeMap::new();
    for (index, track) in state.tracks.iter_mut().enumerate() {
        let new_id = index as TrackId + 1;
        mapping.insert(track.id, new_id);
        track.id = new_id;
        track.name = Track::positional_name(new_id);
    }

    for element in &mut state.elements {
        if let Some(&new_id) = mapping.get(&element.track_id) {
            element.track_id = new_id;
        }
    }

    tracing::debug!(tracks = state.tracks.len(), "Renumbered tracks");
    mapping
}

fn ids_are_dense(tracks: &[Track]) -> bool {
    let mut ids: Vec<TrackId> = tracks.iter().map(|t| t.id).collect();
    ids.sort_unstable();
    ids.iter().enumerate().all(|(i, &id)| id == i as TrackId + 1)
}

/// Defensive fixes applied to loaded state. Returns how many were needed.
fn repair(state: &mut TimelineState) -> usize {
    let mut repairs = 0;

    if state.tracks.is_empty() {
        state.tracks.push(Track::new(1, TrackKind::Video));
        repairs += 1;
    }

    let before = state.tracks.len();
    let mut seen = std::collections::BTreeSet::new();
    state.tracks.retain(|t| seen.insert(t.id));
    repairs += before - state.tracks.len();

    let track_ids: Vec<TrackId> = state.tracks.iter().map(|t| t.id).collect();
    for element in &mut state.elements {
        if !track_ids.contains(&element.track_id) {
            let nearest = track_ids
                .iter()
                .copied()
                .min_by_key(|&id| (id.abs_diff(element.track_id), id))
                .unwrap_or(1);
            tracing::debug!(
                element_id = %element.id,
                from = element.track_id,
                to = nearest,
                "Reassigned element with dangling track"
            );
            element.track_id = nearest;
            repairs += 1;
        }
        if !(element.start_time >= 0.0) {
            element.start_time = 0.0;
            repairs += 1;
        }
        if !(element.media_offset >= 0.0) {
            element.media_offset = 0.0;
            repairs += 1;
        }
        if !(element.duration > 0.0) {
            element.duration = REPAIRED_DURATION_SECS;
            repairs += 1;
        }
    }

    if !ids_are_dense(&state.tracks) {
        renumber_tracks(state);
        repairs += 1;
    } else {
        state.tracks.sort_by_key(|t| t.id);
    }

    if state
        .selected_element_id
        .as_deref()
        .is_some_and(|id| state.element(id).is_none())
    {
        state.selected_element_id = None;
    }

    repairs
}

fn validate_state(state: &TimelineState) -> Vec<String> {
    let mut issues = vec![];

    if state.tracks.is_empty() {
        issues.push("Project has no tracks".to_string());
    } else if !ids_are_dense(&state.tracks) {
        let ids: Vec<String> = state.tracks.iter().map(|t| t.id.to_string()).collect();
        issues.push(format!("Track ids are not dense: [{}]", ids.join(", ")));
    }

    for element in &state.elements {
        if state.track(element.track_id).is_none() {
            issues.push(format!(
                "Element '{}' references missing track {}",
                element.name, element.track_id
            ));
        }
    }

    for (i, a) in state.elements.iter().enumerate() {
        for b in &state.elements[i + 1..] {
            if a.track_id == b.track_id
                && intervals_overlap(a.start_time, a.end_time(), b.start_time, b.end_time())
            {
                issues.push(format!(
                    "Elements '{}' and '{}' overlap on track {}",
                    a.name, b.name, a.track_id
                ));
            }
        }
    }

    issues
}
