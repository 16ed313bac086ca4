//! Timeline state: the canonical collections plus transport fields.

use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::marker::Marker;
use crate::track::{Track, TrackId, TrackKind};

/// The persisted triple. Also the unit of undo/redo.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub markers: Vec<Marker>,
}

impl ProjectSnapshot {
    /// Snapshot of a fresh project.
    pub fn new() -> Self {
        Self {
            elements: vec![],
            tracks: default_tracks(),
            markers: vec![],
        }
    }

    /// Copy with ephemeral element handles removed.
    pub fn for_persistence(&self) -> Self {
        Self {
            elements: self.elements.iter().map(Element::for_persistence).collect(),
            tracks: self.tracks.clone(),
            markers: self.markers.clone(),
        }
    }

    /// Furthest element end time (0 for an empty timeline).
    pub fn content_end(&self) -> f64 {
        content_end(&self.elements)
    }
}

/// Complete editor-side timeline state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineState {
    /// Playhead position (seconds).
    pub current_time: f64,
    /// Duration watermark: only grows to cover the furthest element end.
    pub total_duration: f64,
    pub is_playing: bool,
    pub elements: Vec<Element>,
    pub tracks: Vec<Track>,
    pub markers: Vec<Marker>,
    pub selected_element_id: Option<String>,
}

/// Watermark of an empty project.
pub const DEFAULT_TOTAL_DURATION: f64 = 30.0;

impl Default for TimelineState {
    fn default() -> Self {
        Self::new()
    }
}

impl TimelineState {
    pub fn new() -> Self {
        Self::from_snapshot(ProjectSnapshot::new())
    }

    /// Build a stopped state at time 0 around a snapshot.
    pub fn from_snapshot(snapshot: ProjectSnapshot) -> Self {
        let total_duration = DEFAULT_TOTAL_DURATION.max(snapshot.content_end());
        Self {
            current_time: 0.0,
            total_duration,
            is_playing: false,
            elements: snapshot.elements,
            tracks: snapshot.tracks,
            markers: snapshot.markers,
            selected_element_id: None,
        }
    }

    pub fn snapshot(&self) -> ProjectSnapshot {
        ProjectSnapshot {
            elements: self.elements.clone(),
            tracks: self.tracks.clone(),
            markers: self.markers.clone(),
        }
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.selected_element_id
            .as_deref()
            .and_then(|id| self.element(id))
    }

    pub fn max_track_id(&self) -> TrackId {
        self.tracks.iter().map(|t| t.id).max().unwrap_or(0)
    }

    /// Elements on a track, in array order.
    pub fn elements_on_track(&self, track_id: TrackId) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(move |e| e.track_id == track_id)
    }

    /// Markers ordered by time.
    pub fn markers_by_time(&self) -> Vec<&Marker> {
        let mut markers: Vec<&Marker> = self.markers.iter().collect();
        markers.sort_by(|a, b| a.time.total_cmp(&b.time));
        markers
    }

    /// Raise the duration watermark to cover all elements. Never lowers it.
    pub fn raise_watermark(&mut self) {
        self.total_duration = self.total_duration.max(content_end(&self.elements));
    }
}

fn content_end(elements: &[Element]) -> f64 {
    elements
        .iter()
        .map(Element::end_time)
        .fold(0.0, f64::max)
}

/// Tracks a new project starts with.
pub fn default_tracks() -> Vec<Track> {
    vec![
        Track::new(1, TrackKind::Video),
        Track::new(2, TrackKind::Overlay),
        Track::new(3, TrackKind::Audio),
    ]
}
