//! Composed visual style.
//!
//! Opacity, filters, blend mode, shadow, crop, and color grading are folded
//! into one [`ComposedStyle`] per element and applied in a single pass, so
//! the result does not depend on the order the properties were set in.

use serde::Serialize;

use layercut_project_model::{
    BlendMode, ColorWheels, Crop, Element, Filters, LutPreset, Rgb, Shadow,
};

type Matrix = [[f64; 3]; 3];

const IDENTITY: Matrix = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Channel mixing matrix for a LUT preset.
pub fn lut_matrix(preset: LutPreset) -> Matrix {
    match preset {
        LutPreset::None => IDENTITY,
        LutPreset::Warm => [[1.1, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.9]],
        LutPreset::Cool => [[0.9, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.1]],
        LutPreset::Vintage => [[0.9, 0.1, 0.05], [0.05, 0.85, 0.05], [0.05, 0.1, 0.7]],
        LutPreset::Noir => [
            [0.299, 0.587, 0.114],
            [0.299, 0.587, 0.114],
            [0.299, 0.587, 0.114],
        ],
        LutPreset::TealOrange => [[1.1, 0.05, -0.05], [-0.05, 1.0, 0.05], [-0.1, 0.05, 1.1]],
    }
}

/// LUT matrix followed by lift/gamma/gain, as one per-pixel transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorTransform {
    pub matrix: Matrix,
    pub lift: Rgb,
    pub gamma: Rgb,
    pub gain: Rgb,
}

impl ColorTransform {
    /// Returns `None` when both inputs are neutral.
    pub fn from_grading(lut: LutPreset, wheels: ColorWheels) -> Option<Self> {
        if lut == LutPreset::None && wheels == ColorWheels::default() {
            return None;
        }
        Some(Self {
            matrix: lut_matrix(lut),
            lift: wheels.lift,
            gamma: wheels.gamma,
            gain: wheels.gain,
        })
    }

    /// Map a normalized `[r, g, b]` pixel.
    pub fn apply(&self, rgb: [f64; 3]) -> [f64; 3] {
        let m = &self.matrix;
        let mixed = [
            m[0][0] * rgb[0] + m[0][1] * rgb[1] + m[0][2] * rgb[2],
            m[1][0] * rgb[0] + m[1][1] * rgb[1] + m[1][2] * rgb[2],
            m[2][0] * rgb[0] + m[2][1] * rgb[1] + m[2][2] * rgb[2],
        ];
        [
            grade(mixed[0], self.lift.r, self.gamma.r, self.gain.r),
            grade(mixed[1], self.lift.g, self.gamma.g, self.gain.g),
            grade(mixed[2], self.lift.b, self.gamma.b, self.gain.b),
        ]
    }
}

fn grade(value: f64, lift: f64, gamma: f64, gain: f64) -> f64 {
    let x = value.clamp(0.0, 1.0);
    let lifted = (gain * (x + lift * (1.0 - x))).clamp(0.0, 1.0);
    lifted.powf(1.0 / gamma.max(1e-3)).clamp(0.0, 1.0)
}

/// Opacity multiplier from the element's edge transitions at `time`.
///
/// Ramps linearly from 0 to 1 over `transition_in` and back to 0 over
/// `transition_out`. Without transitions the ramp is 1.
pub fn transition_ramp(element: &Element, time: f64) -> f64 {
    let mut ramp: f64 = 1.0;
    if let Some(t) = element.transition_in.filter(|t| t.duration_secs > 0.0) {
        ramp = ramp.min((time - element.start_time) / t.duration_secs);
    }
    if let Some(t) = element.transition_out.filter(|t| t.duration_secs > 0.0) {
        ramp = ramp.min((element.end_time() - time) / t.duration_secs);
    }
    ramp.clamp(0.0, 1.0)
}

/// Everything needed to paint one element, merged into a single value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposedStyle {
    pub opacity: f64,
    pub filters: Filters,
    pub blend_mode: BlendMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop: Option<Crop>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorTransform>,
}

impl ComposedStyle {
    pub fn for_element(element: &Element, time: f64) -> Self {
        let props = &element.props;
        let base_opacity = props.opacity.unwrap_or(1.0).clamp(0.0, 1.0);

        Self {
            opacity: base_opacity * transition_ramp(element, time),
            filters: props.filters.unwrap_or_default(),
            blend_mode: props.blend_mode.unwrap_or_default(),
            shadow: props.shadow.clone(),
            crop: props.crop.filter(|c| *c != Crop::default()),
            color: ColorTransform::from_grading(
                props.lut.unwrap_or_default(),
                props.color_wheels.unwrap_or_default(),
            ),
        }
    }

    /// CSS-style filter chain with neutral entries omitted. Empty when
    /// nothing applies.
    pub fn filter_chain(&self) -> String {
        let f = &self.filters;
        let mut parts = Vec::new();
        if f.brightness != 1.0 {
            parts.push(format!("brightness({})", f.brightness));
        }
        if f.contrast != 1.0 {
            parts.push(format!("contrast({})", f.contrast));
        }
        if f.saturation != 1.0 {
            parts.push(format!("saturate({})", f.saturation));
        }
        if f.blur > 0.0 {
            parts.push(format!("blur({}px)", f.blur));
        }
        if f.hue_rotate != 0.0 {
            parts.push(format!("hue-rotate({}deg)", f.hue_rotate));
        }
        if f.grayscale > 0.0 {
            parts.push(format!("grayscale({})", f.grayscale));
        }
        if f.sepia > 0.0 {
            parts.push(format!("sepia({})", f.sepia));
        }
        if f.invert > 0.0 {
            parts.push(format!("invert({})", f.invert));
        }
        if let Some(shadow) = &self.shadow {
            parts.push(format!(
                "drop-shadow({}px {}px {}px {})",
                shadow.offset_x, shadow.offset_y, shadow.blur, shadow.color
            ));
        }
        parts.join(" ")
    }

    /// `inset(...)` clip for the crop, in percent of the element.
    pub fn clip_inset(&self) -> Option<String> {
        self.crop.map(|c| {
            format!(
                "inset({}% {}% {}% {}%)",
                c.top, c.right, c.bottom, c.left
            )
        })
    }
}
