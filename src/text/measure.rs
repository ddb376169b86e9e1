use std::borrow::Cow;

use crate::{
    foundation::core::Size,
    foundation::error::{AnimGraphError, AnimGraphResult},
    text::{document::Justification, fonts::ResolvedFont},
};

/// Attributes a string is measured with.
#[derive(Clone, Debug, PartialEq)]
pub struct TextAttributes<'a> {
    /// Resolved font.
    pub font: &'a ResolvedFont,
    /// Extra spacing between characters, in points.
    pub tracking: f64,
    /// Extra spacing between lines, in points.
    pub line_spacing: f64,
    /// Paragraph alignment.
    pub alignment: Justification,
}

/// Font metrics and layout measurement collaborator of text layers.
pub trait TextMeasurer {
    /// Ascent of `font` above the baseline.
    fn ascent(&mut self, font: &ResolvedFont) -> f64;

    /// Natural size of `text` laid out without width or height constraints.
    fn measure(&mut self, text: &str, attrs: &TextAttributes<'_>) -> Size;
}

/// Options for [`ParleyMeasurer`].
#[derive(Debug, Clone, Copy)]
pub struct MeasureOpts {
    pub(crate) display_scale: f32,
    pub(crate) quantize: bool,
}

impl Default for MeasureOpts {
    fn default() -> Self {
        Self {
            display_scale: 1.0,
            quantize: true,
        }
    }
}

impl MeasureOpts {
    /// Return options with a display scale passed to the layout builder.
    pub fn with_display_scale(mut self, display_scale: f32) -> Self {
        self.display_scale = display_scale;
        self
    }

    /// Return options with glyph position quantization toggled.
    pub fn with_quantize(mut self, quantize: bool) -> Self {
        self.quantize = quantize;
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct MeasureBrush;

/// [`TextMeasurer`] backed by Parley layouts.
///
/// Fonts are registered from bytes; families that were never registered fall back to whatever
/// the font context resolves for the name.
pub struct ParleyMeasurer {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<MeasureBrush>,
    opts: MeasureOpts,
}

impl Default for ParleyMeasurer {
    fn default() -> Self {
        Self::new(MeasureOpts::default())
    }
}

impl ParleyMeasurer {
    /// Measurer with fresh Parley contexts.
    pub fn new(opts: MeasureOpts) -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            opts,
        }
    }

    /// Register font bytes; returns the family names they provide.
    pub fn register_font(&mut self, font_bytes: &[u8]) -> AnimGraphResult<Vec<String>> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let mut names = Vec::with_capacity(families.len());
        for (id, _) in &families {
            if let Some(name) = self.font_ctx.collection.family_name(*id) {
                names.push(name.to_string());
            }
        }
        if names.is_empty() {
            return Err(AnimGraphError::asset(
                "no font families registered from font bytes",
            ));
        }
        Ok(names)
    }

    fn layout(
        &mut self,
        text: &str,
        font: &ResolvedFont,
        tracking: f64,
    ) -> parley::Layout<MeasureBrush> {
        let mut builder = self.layout_ctx.ranged_builder(
            &mut self.font_ctx,
            text,
            self.opts.display_scale,
            self.opts.quantize,
        );
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(font.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font.size as f32));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            font.weight.to_parley(),
        ));
        builder.push_default(parley::style::StyleProperty::LetterSpacing(tracking as f32));
        builder.push_default(parley::style::StyleProperty::Brush(MeasureBrush));
        builder.build(text)
    }
}

impl TextMeasurer for ParleyMeasurer {
    fn ascent(&mut self, font: &ResolvedFont) -> f64 {
        let mut layout = self.layout(" ", font, 0.0);
        layout.break_all_lines(None);
        layout
            .lines()
            .next()
            .map(|line| f64::from(line.metrics().ascent))
            .unwrap_or(font.size * 0.8)
    }

    fn measure(&mut self, text: &str, attrs: &TextAttributes<'_>) -> Size {
        let mut layout = self.layout(text, attrs.font, attrs.tracking);
        layout.break_all_lines(None);
        layout.align(
            None,
            attrs.alignment.to_parley(),
            parley::AlignmentOptions::default(),
        );
        let lines = layout.lines().count();
        let spacing = attrs.line_spacing * lines.saturating_sub(1) as f64;
        Size::new(
            f64::from(layout.width()),
            f64::from(layout.height()) + spacing,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/measure.rs"]
mod tests;
