//! Timeline markers: annotations independent of tracks and elements.

use serde::{Deserialize, Serialize};

/// Marker color label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    #[default]
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
}

/// A named point in project time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: String,
    /// Position in seconds.
    pub time: f64,
    pub name: String,
    #[serde(default)]
    pub color: MarkerColor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Marker {
    /// Create a marker with a fresh id.
    pub fn new(time: f64, name: impl Into<String>, color: MarkerColor) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            time: time.max(0.0),
            name: name.into(),
            color,
            note: None,
        }
    }
}

/// Partial marker update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkerPatch {
    pub time: Option<f64>,
    pub name: Option<String>,
    pub color: Option<MarkerColor>,
    /// `Some(None)` clears the note.
    pub note: Option<Option<String>>,
}

impl Marker {
    pub fn apply_patch(&mut self, patch: MarkerPatch) {
        if let Some(time) = patch.time {
            self.time = time.max(0.0);
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(note) = patch.note {
            self.note = note;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_clamps_negative_time() {
        let marker = Marker::new(-2.0, "Intro", MarkerColor::Blue);
        assert_eq!(marker.time, 0.0);
    }

    #[test]
    fn test_marker_patch_clears_note() {
        let mut marker = Marker::new(4.0, "Beat", MarkerColor::Green);
        marker.note = Some("drop here".to_string());
        marker.apply_patch(MarkerPatch {
            note: Some(None),
            time: Some(5.5),
            ..Default::default()
        });
        assert_eq!(marker.note, None);
        assert_eq!(marker.time, 5.5);
        assert_eq!(marker.name, "Beat");
    }
}
