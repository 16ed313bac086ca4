//! Timeline tracks (lanes that elements are placed on).

use serde::{Deserialize, Serialize};

/// Track identifier. Dense and order-significant: ids are renumbered by
/// structural edits, so they are not stable keys.
pub type TrackId = u32;

/// What a track is primarily used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    #[default]
    Video,
    Audio,
    Overlay,
}

/// A lane on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub name: String,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub kind: TrackKind,
}

fn default_true() -> bool {
    true
}

impl Track {
    /// Create a visible, unlocked track with its positional name.
    pub fn new(id: TrackId, kind: TrackKind) -> Self {
        Self {
            id,
            name: Self::positional_name(id),
            is_visible: true,
            is_locked: false,
            kind,
        }
    }

    /// Label derived from a track's position.
    pub fn positional_name(id: TrackId) -> String {
        format!("Track {id}")
    }
}
