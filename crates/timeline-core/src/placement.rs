//! Placement Engine: choosing a track and time for new elements.

use layercut_project_model::{
    ClipColor, Element, ElementProps, ElementType, ShapeKind, TrackId,
};

use crate::geometry::find_free_track;
use crate::store::Store;

/// Per-type defaults used when creating an element.
#[derive(Debug, Clone)]
pub struct ElementDefaults {
    pub duration: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub lock_aspect_ratio: bool,
    pub props: ElementProps,
}

/// Fixed defaults table.
pub fn defaults_for(element_type: ElementType) -> ElementDefaults {
    let base = ElementDefaults {
        duration: 5.0,
        x: 0.0,
        y: 0.0,
        width: 100.0,
        height: 100.0,
        lock_aspect_ratio: false,
        props: ElementProps::default(),
    };

    match element_type {
        ElementType::Video => ElementDefaults {
            duration: 10.0,
            lock_aspect_ratio: true,
            props: ElementProps {
                volume: Some(1.0),
                is_muted: Some(false),
                opacity: Some(1.0),
                ..Default::default()
            },
            ..base
        },
        ElementType::Audio => ElementDefaults {
            duration: 30.0,
            width: 0.0,
            height: 0.0,
            props: ElementProps {
                volume: Some(1.0),
                is_muted: Some(false),
                ..Default::default()
            },
            ..base
        },
        ElementType::Text => ElementDefaults {
            x: 40.0,
            y: 45.0,
            width: 20.0,
            height: 10.0,
            props: ElementProps {
                text: Some("New Text".to_string()),
                font_size: Some(48.0),
                font_family: Some("Inter".to_string()),
                color: Some("#ffffff".to_string()),
                text_align: Some("center".to_string()),
                opacity: Some(1.0),
                ..Default::default()
            },
            ..base
        },
        ElementType::Shape => ElementDefaults {
            x: 40.0,
            y: 40.0,
            width: 20.0,
            height: 20.0,
            props: ElementProps {
                shape: Some(ShapeKind::Rectangle),
                color: Some("#3b82f6".to_string()),
                opacity: Some(1.0),
                ..Default::default()
            },
            ..base
        },
        ElementType::Image => ElementDefaults {
            lock_aspect_ratio: true,
            props: ElementProps {
                opacity: Some(1.0),
                ..Default::default()
            },
            ..base
        },
        ElementType::AiGenerated => ElementDefaults {
            x: 35.0,
            y: 35.0,
            width: 30.0,
            height: 30.0,
            props: ElementProps {
                opacity: Some(1.0),
                ..Default::default()
            },
            ..base
        },
        ElementType::Adjustment => base,
    }
}

/// What to create and, optionally, where.
#[derive(Debug, Clone)]
pub struct PlacementRequest {
    pub element_type: ElementType,
    /// Place on this track verbatim (drag/drop); overlap avoidance is the
    /// caller's responsibility.
    pub track_id: Option<TrackId>,
    /// Defaults to the playhead.
    pub start_time: Option<f64>,
    pub duration: Option<f64>,
    pub name: Option<String>,
    pub asset_id: Option<String>,
    /// Merged over the type defaults.
    pub props: ElementProps,
}

impl PlacementRequest {
    pub fn new(element_type: ElementType) -> Self {
        Self {
            element_type,
            track_id: None,
            start_time: None,
            duration: None,
            name: None,
            asset_id: None,
            props: ElementProps::default(),
        }
    }

    pub fn on_track(mut self, track_id: TrackId) -> Self {
        self.track_id = Some(track_id);
        self
    }

    pub fn at(mut self, start_time: f64) -> Self {
        self.start_time = Some(start_time);
        self
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_asset(mut self, asset_id: impl Into<String>) -> Self {
        self.asset_id = Some(asset_id.into());
        self
    }

    pub fn with_props(mut self, props: ElementProps) -> Self {
        self.props = props;
        self
    }
}

/// Create an element, choose its track, add it, and select it.
///
/// Without an explicit track the first free track (ascending id) is used;
/// if none is free a new track is appended after the current maximum id.
/// The new element paints above everything (`z_index` = element count).
/// Returns `None` when an explicit track does not exist.
pub fn place_new_element(store: &mut Store, request: PlacementRequest) -> Option<Element> {
    let defaults = defaults_for(request.element_type);
    let state = store.state();

    let start_time = request
        .start_time
        .unwrap_or(state.current_time)
        .max(0.0);
    let duration = request
        .duration
        .filter(|d| *d > 0.0)
        .unwrap_or(defaults.duration);
    let z_index = state.elements.len() as i64;

    let track_id = match request.track_id {
        Some(track_id) => {
            if state.track(track_id).is_none() {
                tracing::debug!(track_id, "Placement refused: unknown track");
                return None;
            }
            track_id
        }
        None => match find_free_track(
            &state.tracks,
            &state.elements,
            start_time,
            start_time + duration,
        ) {
            Some(track_id) => track_id,
            None => {
                let track_id = store.add_track(request.element_type.preferred_track_kind());
                tracing::debug!(track_id, "No free track; appended a new one");
                track_id
            }
        },
    };

    let mut props = defaults.props;
    props.merge(request.props);

    let element = Element {
        id: new_element_id(),
        element_type: request.element_type,
        track_id,
        name: request
            .name
            .unwrap_or_else(|| request.element_type.label().to_string()),
        start_time,
        duration,
        media_offset: 0.0,
        x: defaults.x,
        y: defaults.y,
        width: defaults.width,
        height: defaults.height,
        rotation: 0.0,
        z_index,
        flip_x: false,
        flip_y: false,
        lock_aspect_ratio: defaults.lock_aspect_ratio,
        transition_in: None,
        transition_out: None,
        clip_color: ClipColor::Default,
        asset_id: request.asset_id,
        props,
    };

    if !store.add_element(element.clone()) {
        return None;
    }
    store.select(Some(&element.id));

    tracing::debug!(
        element_id = %element.id,
        element_type = ?element.element_type,
        track_id,
        start = start_time,
        duration,
        "Placed element"
    );
    Some(element)
}

/// Fresh opaque element id.
pub fn new_element_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
