//! Type-specific element properties.
//!
//! Every element carries one [`ElementProps`] bag. Which fields are
//! meaningful depends on the element's [`ElementType`](crate::ElementType):
//! text fields only matter for text, `html`/`css` only for AI-generated
//! components, volume only for time-based media. Fields that do not apply
//! to a type are ignored by the compositor rather than rejected.

use serde::{Deserialize, Serialize};

/// Canvas compositing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    Difference,
    Exclusion,
}

/// Geometric primitive drawn by shape elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Circle,
    Triangle,
    Line,
}

/// Built-in color lookup presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LutPreset {
    #[default]
    None,
    Warm,
    Cool,
    Vintage,
    Noir,
    TealOrange,
}

/// Image filter parameters. Neutral values leave the image unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filters {
    /// Multiplier, 1.0 = neutral.
    pub brightness: f64,
    /// Multiplier, 1.0 = neutral.
    pub contrast: f64,
    /// Multiplier, 1.0 = neutral.
    pub saturation: f64,
    /// Blur radius in pixels.
    pub blur: f64,
    /// Hue rotation in degrees.
    pub hue_rotate: f64,
    /// Amount in `[0, 1]`.
    pub grayscale: f64,
    /// Amount in `[0, 1]`.
    pub sepia: f64,
    /// Amount in `[0, 1]`.
    pub invert: f64,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            contrast: 1.0,
            saturation: 1.0,
            blur: 0.0,
            hue_rotate: 0.0,
            grayscale: 0.0,
            sepia: 0.0,
            invert: 0.0,
        }
    }
}

/// Drop shadow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub color: String,
}

/// Crop insets as percentages of the element's own size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Crop {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Per-channel adjustment used by a color wheel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const fn splat(v: f64) -> Self {
        Self { r: v, g: v, b: v }
    }
}

/// Lift/gamma/gain color wheels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorWheels {
    /// Shadows offset, 0.0 = neutral.
    pub lift: Rgb,
    /// Midtone exponent, 1.0 = neutral.
    pub gamma: Rgb,
    /// Highlights multiplier, 1.0 = neutral.
    pub gain: Rgb,
}

impl Default for ColorWheels {
    fn default() -> Self {
        Self {
            lift: Rgb::splat(0.0),
            gamma: Rgb::splat(1.0),
            gain: Rgb::splat(1.0),
        }
    }
}

/// Open property bag shared by all element types.
///
/// All fields are optional so the same struct doubles as a patch for
/// [`ElementProps::merge`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementProps {
    /// Playable source handle. Ephemeral when the element has an asset id:
    /// it is regenerated from the asset store on load.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,

    // Fill / text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<ShapeKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,

    // Visual
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<BlendMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Filters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop: Option<Crop>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_wheels: Option<ColorWheels>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lut: Option<LutPreset>,

    // Audio
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_muted: Option<bool>,

    // AI-generated component payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,
}

macro_rules! merge_fields {
    ($dst:ident, $src:ident, $($field:ident),+ $(,)?) => {
        $(
            if $src.$field.is_some() {
                $dst.$field = $src.$field;
            }
        )+
    };
}

impl ElementProps {
    /// Overlay every field present in `patch`; absent fields keep their value.
    pub fn merge(&mut self, patch: ElementProps) {
        merge_fields!(
            self,
            patch,
            src,
            color,
            text,
            font_size,
            font_family,
            text_align,
            shape,
            border_radius,
            opacity,
            blend_mode,
            filters,
            shadow,
            crop,
            color_wheels,
            lut,
            volume,
            is_muted,
            html,
            css,
        );
    }

    /// Effective volume in `[0, 1]` (defaults to full).
    pub fn effective_volume(&self) -> f64 {
        self.volume.unwrap_or(1.0).clamp(0.0, 1.0)
    }

    pub fn muted(&self) -> bool {
        self.is_muted.unwrap_or(false)
    }
}
