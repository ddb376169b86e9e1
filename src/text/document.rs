use crate::{
    animation::anim::Lerp,
    foundation::core::{Color, Point, Vec2},
};

/// Horizontal justification of a text document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Justification {
    /// Flush left.
    #[default]
    Left,
    /// Flush right.
    Right,
    /// Centered.
    Center,
}

impl Justification {
    /// Map the raw justification value of the animation description (`1` right, `2` center).
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Self::Right,
            2 => Self::Center,
            _ => Self::Left,
        }
    }

    /// Horizontal anchor offset for a box of `width`.
    pub fn anchor_x(self, width: f64) -> f64 {
        match self {
            Self::Left => 0.0,
            Self::Right => width,
            Self::Center => width * 0.5,
        }
    }

    pub(crate) fn to_parley(self) -> parley::Alignment {
        match self {
            Self::Left => parley::Alignment::Start,
            Self::Right => parley::Alignment::End,
            Self::Center => parley::Alignment::Center,
        }
    }
}

/// Text content and styling at one keyframe.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextDocument {
    /// Source string.
    pub text: String,
    /// Font family name, matched against the font list.
    pub font_family: String,
    /// Font size in points.
    pub font_size: f64,
    /// Fill color.
    pub fill_color: Color,
    /// Stroke color; no stroke surface is shown without one.
    #[serde(default)]
    pub stroke_color: Option<Color>,
    /// Stroke width.
    #[serde(default)]
    pub stroke_width: Option<f64>,
    /// Tracking in thousandths of an em.
    #[serde(default)]
    pub tracking: f64,
    /// Line height in points.
    pub line_height: f64,
    /// Justification.
    #[serde(default)]
    pub justification: Justification,
    /// Explicit box size; measured when absent.
    #[serde(default)]
    pub frame_size: Option<Vec2>,
    /// Explicit box position.
    #[serde(default)]
    pub frame_position: Option<Point>,
    /// Baseline shift added to the ascent.
    #[serde(default)]
    pub baseline: Option<f64>,
    /// Draw the stroke surface above the fill surface.
    #[serde(default)]
    pub stroke_over_fill: bool,
}

impl TextDocument {
    /// Document with `text` in `font_family` at `font_size`, white fill, line height equal to
    /// the size.
    pub fn new(text: impl Into<String>, font_family: impl Into<String>, font_size: f64) -> Self {
        Self {
            text: text.into(),
            font_family: font_family.into(),
            font_size,
            fill_color: Color::WHITE,
            stroke_color: None,
            stroke_width: None,
            tracking: 0.0,
            line_height: font_size,
            justification: Justification::Left,
            frame_size: None,
            frame_position: None,
            baseline: None,
            stroke_over_fill: false,
        }
    }

    /// Paragraph line spacing derived from size and line height.
    pub fn line_spacing(&self) -> f64 {
        if self.line_height == 0.0 {
            return 0.0;
        }
        self.font_size / self.line_height * 6.0
    }
}

// Documents never blend: each key holds until the next one.
impl Lerp for TextDocument {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        if t >= 1.0 { b.clone() } else { a.clone() }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/document.rs"]
mod tests;
