//! Timeline elements: clips and layers placed on a track.

use serde::{Deserialize, Serialize};

use crate::props::ElementProps;
use crate::track::{TrackId, TrackKind};

/// Kind of content an element carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    Video,
    Audio,
    Text,
    Shape,
    Image,
    AiGenerated,
    Adjustment,
}

impl ElementType {
    /// Media with its own playback clock.
    pub fn is_time_based(self) -> bool {
        matches!(self, ElementType::Video | ElementType::Audio)
    }

    /// Whether the element paints anything on the canvas.
    pub fn is_visual(self) -> bool {
        !matches!(self, ElementType::Audio)
    }

    /// Track kind used when a new track has to be created for this type.
    pub fn preferred_track_kind(self) -> TrackKind {
        match self {
            ElementType::Audio => TrackKind::Audio,
            ElementType::Video | ElementType::Image => TrackKind::Video,
            _ => TrackKind::Overlay,
        }
    }

    /// Human-readable label used for default element names.
    pub fn label(self) -> &'static str {
        match self {
            ElementType::Video => "Video",
            ElementType::Audio => "Audio",
            ElementType::Text => "Text",
            ElementType::Shape => "Shape",
            ElementType::Image => "Image",
            ElementType::AiGenerated => "AI Component",
            ElementType::Adjustment => "Adjustment",
        }
    }
}

/// Transition style applied at an element's edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionKind {
    Fade,
    Dissolve,
    SlideLeft,
    SlideRight,
    Wipe,
    Zoom,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub kind: TransitionKind,
    pub duration_secs: f64,
}

/// Color label shown on the clip in the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClipColor {
    #[default]
    Default,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
}

/// A clip or layer placed on exactly one track.
///
/// Canvas geometry (`x`, `y`, `width`, `height`) is expressed as percentages
/// of the canvas and is zero for pure audio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: String,
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub track_id: TrackId,
    pub name: String,

    /// Placement in project time (seconds).
    pub start_time: f64,
    pub duration: f64,
    /// Source in-point for trimmed media (seconds).
    #[serde(default)]
    pub media_offset: f64,

    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,

    /// Paint order, independent of track.
    #[serde(default)]
    pub z_index: i64,
    #[serde(default)]
    pub flip_x: bool,
    #[serde(default)]
    pub flip_y: bool,
    #[serde(default)]
    pub lock_aspect_ratio: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_in: Option<Transition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_out: Option<Transition>,
    #[serde(default)]
    pub clip_color: ClipColor,

    /// Reference into the external asset store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,

    #[serde(default)]
    pub props: ElementProps,
}

impl Element {
    /// End of the element's interval (exclusive).
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Whether `time` falls inside the element's active window (inclusive).
    pub fn is_active_at(&self, time: f64) -> bool {
        self.start_time <= time && time <= self.end_time()
    }

    /// Position inside the source media for a given project time.
    pub fn media_time_at(&self, time: f64) -> f64 {
        time - self.start_time + self.media_offset
    }

    /// Copy suitable for persistence: the ephemeral source handle is dropped
    /// when it can be regenerated from the asset id.
    pub fn for_persistence(&self) -> Element {
        let mut element = self.clone();
        if element.asset_id.is_some() {
            element.props.src = None;
        }
        element
    }

    /// Apply a partial update. `props` merges one level deep.
    pub fn apply_patch(&mut self, patch: ElementPatch) {
        let ElementPatch {
            track_id,
            name,
            start_time,
            duration,
            media_offset,
            x,
            y,
            width,
            height,
            rotation,
            z_index,
            flip_x,
            flip_y,
            lock_aspect_ratio,
            transition_in,
            transition_out,
            clip_color,
            asset_id,
            props,
        } = patch;

        if let Some(v) = track_id {
            self.track_id = v;
        }
        if let Some(v) = name {
            self.name = v;
        }
        if let Some(v) = start_time {
            self.start_time = v.max(0.0);
        }
        if let Some(v) = duration {
            if v > 0.0 {
                self.duration = v;
            }
        }
        if let Some(v) = media_offset {
            self.media_offset = v.max(0.0);
        }
        if let Some(v) = x {
            self.x = v;
        }
        if let Some(v) = y {
            self.y = v;
        }
        if let Some(v) = width {
            self.width = v;
        }
        if let Some(v) = height {
            self.height = v;
        }
        if let Some(v) = rotation {
            self.rotation = v;
        }
        if let Some(v) = z_index {
            self.z_index = v;
        }
        if let Some(v) = flip_x {
            self.flip_x = v;
        }
        if let Some(v) = flip_y {
            self.flip_y = v;
        }
        if let Some(v) = lock_aspect_ratio {
            self.lock_aspect_ratio = v;
        }
        if let Some(v) = transition_in {
            self.transition_in = v;
        }
        if let Some(v) = transition_out {
            self.transition_out = v;
        }
        if let Some(v) = clip_color {
            self.clip_color = v;
        }
        if let Some(v) = asset_id {
            self.asset_id = v;
        }
        if let Some(v) = props {
            self.props.merge(v);
        }
    }
}

/// Partial element update. `None` leaves a field unchanged; nested options
/// (`Some(None)`) clear optional fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch {
    pub track_id: Option<TrackId>,
    pub name: Option<String>,
    pub start_time: Option<f64>,
    pub duration: Option<f64>,
    pub media_offset: Option<f64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub z_index: Option<i64>,
    pub flip_x: Option<bool>,
    pub flip_y: Option<bool>,
    pub lock_aspect_ratio: Option<bool>,
    pub transition_in: Option<Option<Transition>>,
    pub transition_out: Option<Option<Transition>>,
    pub clip_color: Option<ClipColor>,
    pub asset_id: Option<Option<String>>,
    pub props: Option<ElementProps>,
}

impl ElementPatch {
    pub fn timing(start_time: f64, duration: f64) -> Self {
        Self {
            start_time: Some(start_time),
            duration: Some(duration),
            ..Default::default()
        }
    }

    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn props(props: ElementProps) -> Self {
        Self {
            props: Some(props),
            ..Default::default()
        }
    }
}
