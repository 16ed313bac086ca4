//! Frame compositor: resolves which elements paint at a given time.
//!
//! For a project time `t` every element with `start <= t <= end` on a
//! visible track is turned into a [`Layer`], ordered by ascending
//! `z_index` (ties keep element order). Audio never paints; time-based
//! elements additionally contribute an [`AudioVoice`].

use serde::Serialize;

use layercut_project_model::{
    Element, ElementType, ShapeKind, TimelineState, TrackId,
};

use crate::style::ComposedStyle;

/// A single frame's composition instructions.
#[derive(Debug, Clone, Serialize)]
pub struct FrameComposition {
    /// Project time in seconds.
    pub time_secs: f64,

    /// Layers in paint order (bottom first).
    pub layers: Vec<Layer>,

    /// Audible media at this time.
    pub audio: Vec<AudioVoice>,
}

/// Placement on the canvas, in percent of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Degrees, clockwise.
    pub rotation: f64,
    pub flip_x: bool,
    pub flip_y: bool,
}

impl Transform {
    fn of(element: &Element) -> Self {
        Self {
            x: element.x,
            y: element.y,
            width: element.width,
            height: element.height,
            rotation: element.rotation,
            flip_x: element.flip_x,
            flip_y: element.flip_y,
        }
    }
}

/// What a layer draws.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerContent {
    /// Decoded media at a local media time.
    Media { src: String, media_time: f64 },
    /// Media whose source is not (yet) available.
    Placeholder { label: String },
    Text {
        text: String,
        color: Option<String>,
        font_size: Option<f64>,
        font_family: Option<String>,
        text_align: Option<String>,
    },
    Shape {
        shape: ShapeKind,
        color: Option<String>,
        border_radius: Option<f64>,
    },
    Html { html: String, css: String },
    /// Applies its style to everything painted below it.
    Adjustment,
}

/// One painted element.
#[derive(Debug, Clone, Serialize)]
pub struct Layer {
    pub element_id: String,
    pub element_type: ElementType,
    pub track_id: TrackId,
    pub z_index: i64,
    pub transform: Transform,
    pub style: ComposedStyle,
    pub content: LayerContent,
}

/// One audible time-based element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioVoice {
    pub element_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    pub media_time: f64,
    /// Effective gain in `[0, 1]`; 0 when muted.
    pub volume: f64,
}

/// Compute the composition of `state` at project time `time`.
pub fn compose_frame(state: &TimelineState, time: f64) -> FrameComposition {
    let mut visible: Vec<&Element> = state
        .elements
        .iter()
        .filter(|e| e.is_active_at(time) && e.element_type.is_visual())
        .filter(|e| state.track(e.track_id).is_some_and(|t| t.is_visible))
        .collect();
    // Stable: equal z_index keeps element order.
    visible.sort_by_key(|e| e.z_index);

    let layers = visible
        .into_iter()
        .map(|element| Layer {
            element_id: element.id.clone(),
            element_type: element.element_type,
            track_id: element.track_id,
            z_index: element.z_index,
            transform: Transform::of(element),
            style: ComposedStyle::for_element(element, time),
            content: layer_content(element, time),
        })
        .collect();

    let audio = state
        .elements
        .iter()
        .filter(|e| e.element_type.is_time_based() && e.is_active_at(time))
        .map(|element| AudioVoice {
            element_id: element.id.clone(),
            src: element.props.src.clone(),
            media_time: element.media_time_at(time),
            volume: if element.props.muted() {
                0.0
            } else {
                element.props.effective_volume()
            },
        })
        .collect();

    FrameComposition {
        time_secs: time,
        layers,
        audio,
    }
}

fn layer_content(element: &Element, time: f64) -> LayerContent {
    let props = &element.props;
    match element.element_type {
        ElementType::Video | ElementType::Image | ElementType::Audio => match &props.src {
            Some(src) if !src.is_empty() => LayerContent::Media {
                src: src.clone(),
                media_time: if element.element_type.is_time_based() {
                    element.media_time_at(time)
                } else {
                    0.0
                },
            },
            _ => {
                tracing::trace!(element_id = %element.id, "No source; painting placeholder");
                LayerContent::Placeholder {
                    label: element.name.clone(),
                }
            }
        },
        ElementType::Text => LayerContent::Text {
            text: props.text.clone().unwrap_or_default(),
            color: props.color.clone(),
            font_size: props.font_size,
            font_family: props.font_family.clone(),
            text_align: props.text_align.clone(),
        },
        ElementType::Shape => LayerContent::Shape {
            shape: props.shape.unwrap_or_default(),
            color: props.color.clone(),
            border_radius: props.border_radius,
        },
        ElementType::AiGenerated => match &props.html {
            Some(html) => LayerContent::Html {
                html: html.clone(),
                css: props.css.clone().unwrap_or_default(),
            },
            None => LayerContent::Placeholder {
                label: element.name.clone(),
            },
        },
        ElementType::Adjustment => LayerContent::Adjustment,
    }
}
