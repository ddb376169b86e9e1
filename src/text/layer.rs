use std::sync::Arc;

use smallvec::SmallVec;

use crate::{
    animation::{anim::Keyframes, interpolator::KeyframeInterpolator},
    foundation::core::{Color, Frame, Point, Rect, Size, Transform3D, Vec2},
    foundation::math::remap,
    text::{
        animator::{SelectorBasis, TextAnimator, TextAnimatorNode},
        document::{Justification, TextDocument},
        fonts::{FontList, ResolvedFont, resolve_font},
        measure::{TextAttributes, TextMeasurer},
        provider::{DefaultTextProvider, TextProvider},
    },
};

/// Versioned capability flag enabling per-word surfaces, supplied by the decoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WordAnimation {
    /// Capability version.
    pub version: u32,
}

/// Decoded text layer.
#[derive(Clone, Debug)]
pub struct TextLayerModel {
    /// Keypath handed to the text provider.
    pub keypath: String,
    /// Keyframed document.
    pub document: Keyframes<TextDocument>,
    /// Keyframed anchor point of the layer transform.
    pub anchor_point: Keyframes<Point>,
    /// Animators in declaration order.
    pub animators: Vec<TextAnimator>,
    /// The layer is parented to another layer.
    pub has_parent: bool,
    /// Per-word surfaces requested by the animation.
    pub word_animation: Option<WordAnimation>,
}

impl TextLayerModel {
    /// Static layer showing `document`.
    pub fn new(keypath: impl Into<String>, document: TextDocument) -> Self {
        Self {
            keypath: keypath.into(),
            document: Keyframes::constant(document),
            anchor_point: Keyframes::constant(Point::ZERO),
            animators: Vec::new(),
            has_parent: false,
            word_animation: None,
        }
    }
}

/// Which backing surface an entry of the sublayer stack refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceRole {
    /// Fill surface.
    Fill,
    /// Stroke surface.
    Stroke,
}

/// Flavor of a text surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceKind {
    /// Plain laid-out text.
    Plain,
    /// Text revealed word by word.
    WordAnimated {
        /// The layer has a parent; the frame moves down by a full font size.
        shifted: bool,
        /// Basis of the first animator's selector.
        based_on: Option<SelectorBasis>,
    },
}

/// Stroke attributes of a text run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStroke {
    /// Stroke color.
    pub color: Color,
    /// Stroke width.
    pub width: f64,
}

/// Attributed string assigned to a text surface.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    /// Display text.
    pub text: String,
    /// Resolved font.
    pub font: ResolvedFont,
    /// Character spacing in points.
    pub tracking: f64,
    /// Foreground color.
    pub fill_color: Color,
    /// Stroke attributes, only on stroke runs.
    pub stroke: Option<TextStroke>,
    /// Paragraph line spacing.
    pub line_spacing: f64,
    /// Paragraph alignment.
    pub alignment: Justification,
}

/// Retained text surface handed to the host compositor.
#[derive(Clone, Debug, PartialEq)]
pub struct TextSurface {
    /// Surface flavor.
    pub kind: SurfaceKind,
    /// Current attributed string.
    pub run: Option<TextRun>,
    /// Hidden surfaces are skipped by the host.
    pub hidden: bool,
    /// Anchor point in unit coordinates of `frame`.
    pub anchor_point: Point,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Transform from the animator chain.
    pub transform: Transform3D,
    /// Surface font.
    pub font: Option<ResolvedFont>,
    /// Font size in points.
    pub font_size: f64,
    /// Foreground color.
    pub foreground: Color,
    /// Frame in layer space.
    pub frame: Rect,
    /// Text alignment.
    pub alignment: Justification,
    /// Backing scale.
    pub contents_scale: f64,
}

impl TextSurface {
    fn new(kind: SurfaceKind) -> Self {
        Self {
            kind,
            run: None,
            hidden: false,
            anchor_point: Point::new(0.5, 0.5),
            opacity: 1.0,
            transform: Transform3D::IDENTITY,
            font: None,
            font_size: 0.0,
            foreground: Color::BLACK,
            frame: Rect::ZERO,
            alignment: Justification::Left,
            contents_scale: 1.0,
        }
    }
}

/// Values resolved once per layout and shared by both surfaces.
struct Resolved {
    anchor_point: Point,
    opacity: f64,
    transform: Transform3D,
    font: ResolvedFont,
    font_size: f64,
    fill_color: Color,
    frame: Rect,
    alignment: Justification,
}

/// Text layer: keyframed document plus animator chain laid out into fill and stroke surfaces.
pub struct TextCompositionLayer {
    keypath: String,
    root_node: Option<TextAnimatorNode>,
    document: KeyframeInterpolator<TextDocument>,
    anchor_point: KeyframeInterpolator<Point>,
    fonts: Option<Arc<FontList>>,
    text_provider: Arc<dyn TextProvider>,
    fill: TextSurface,
    stroke: TextSurface,
    sublayers: SmallVec<[SurfaceRole; 2]>,
    render_scale: f64,
}

impl std::fmt::Debug for TextCompositionLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextCompositionLayer")
            .field("keypath", &self.keypath)
            .field("sublayers", &self.sublayers)
            .field("render_scale", &self.render_scale)
            .finish_non_exhaustive()
    }
}

impl TextCompositionLayer {
    /// Build the layer for `model`.
    pub fn new(
        model: TextLayerModel,
        text_provider: Arc<dyn TextProvider>,
        fonts: Option<Arc<FontList>>,
    ) -> Self {
        let kind = match model.word_animation {
            Some(_) => SurfaceKind::WordAnimated {
                shifted: model.has_parent,
                based_on: model
                    .animators
                    .first()
                    .and_then(|a| a.selector.as_ref())
                    .map(|s| s.based_on),
            },
            None => SurfaceKind::Plain,
        };

        Self {
            keypath: model.keypath,
            root_node: TextAnimatorNode::chain(model.animators),
            document: KeyframeInterpolator::from_keyframes(model.document),
            anchor_point: KeyframeInterpolator::from_keyframes(model.anchor_point),
            fonts,
            text_provider,
            fill: TextSurface::new(kind),
            stroke: TextSurface::new(kind),
            sublayers: SmallVec::from_buf([SurfaceRole::Fill, SurfaceRole::Stroke]),
            render_scale: 1.0,
        }
    }

    /// Layer with the default text provider and no font list.
    pub fn with_defaults(model: TextLayerModel) -> Self {
        Self::new(model, Arc::new(DefaultTextProvider), None)
    }

    /// Keypath of the layer.
    pub fn keypath(&self) -> &str {
        &self.keypath
    }

    /// Fill surface.
    pub fn fill_surface(&self) -> &TextSurface {
        &self.fill
    }

    /// Stroke surface.
    pub fn stroke_surface(&self) -> &TextSurface {
        &self.stroke
    }

    /// Sublayer stack, bottom first.
    pub fn sublayers(&self) -> &[SurfaceRole] {
        &self.sublayers
    }

    /// Animator chain root.
    pub fn root_node(&self) -> Option<&TextAnimatorNode> {
        self.root_node.as_ref()
    }

    /// Frame the document was last sampled at.
    pub fn last_updated_frame(&self) -> Option<Frame> {
        self.document.last_updated_frame()
    }

    /// Propagate the render scale to both surfaces.
    pub fn set_render_scale(&mut self, scale: f64) {
        self.render_scale = scale;
        self.fill.contents_scale = scale;
        self.stroke.contents_scale = scale;
    }

    /// Replace the text provider and redisplay the last frame with forced updates.
    pub fn set_text_provider(
        &mut self,
        text_provider: Arc<dyn TextProvider>,
        measurer: &mut dyn TextMeasurer,
    ) {
        self.text_provider = text_provider;
        if let Some(last) = self.document.last_updated_frame() {
            self.display_contents(last, true, measurer);
        }
    }

    /// Lay out the layer for `frame`.
    ///
    /// Does nothing, and returns `false`, when neither the document nor the animator chain
    /// changed and `force_updates` is unset.
    pub fn display_contents(
        &mut self,
        frame: Frame,
        force_updates: bool,
        measurer: &mut dyn TextMeasurer,
    ) -> bool {
        self.fill.contents_scale = self.render_scale;
        self.stroke.contents_scale = self.render_scale;

        let document_update = self.document.has_update(frame);
        let animator_update = match self.root_node.as_mut() {
            Some(root) => root.update_contents(frame, force_updates),
            None => force_updates,
        };
        if !(document_update || animator_update) {
            tracing::trace!(layer = %self.keypath, frame = frame.as_f64(), "text unchanged");
            return false;
        }

        let doc = self.document.value(frame);
        let anchor_offset = self.anchor_point.value(frame);
        let text = self.text_provider.text_for(&self.keypath, &doc.text);
        if let Some(root) = self.root_node.as_mut() {
            root.rebuild_outputs(frame, &text);
        }
        let output = self.root_node.as_ref().map(|r| r.output());

        let fill_color = output.and_then(|o| o.fill_color).unwrap_or(doc.fill_color);
        let stroke_color = output.and_then(|o| o.stroke_color).or(doc.stroke_color);
        let stroke_width = output
            .and_then(|o| o.stroke_width)
            .unwrap_or(doc.stroke_width.unwrap_or(0.0));
        let tracking_em = output.and_then(|o| o.tracking).unwrap_or(doc.tracking);
        let tracking = doc.font_size * tracking_em / 1000.0;
        let opacity = output.map_or(1.0, |o| o.opacity);
        let transform = output.map_or(Transform3D::IDENTITY, |o| o.transform);

        let font = resolve_font(self.fonts.as_deref(), &doc.font_family, doc.font_size);
        let ascent = measurer.ascent(&font);
        let line_spacing = doc.line_spacing();

        let size = match doc.frame_size {
            Some(s) => Size::new(s.x, s.y),
            None => measurer.measure(
                &text,
                &TextAttributes {
                    font: &font,
                    tracking,
                    line_spacing,
                    alignment: doc.justification,
                },
            ),
        };

        let text_anchor = Point::new(
            doc.justification.anchor_x(size.width),
            ascent + doc.baseline.unwrap_or(0.0),
        );
        let anchor = text_anchor + anchor_offset.to_vec2();
        let anchor_point = Point::new(
            remap(anchor.x, 0.0, size.width, 0.0, 1.0),
            remap(anchor.y, 0.0, size.height, 0.0, 1.0),
        );

        let font_size = doc.font_size;
        let frame_rect = match doc.frame_position {
            Some(p) => Rect::from_origin_size((p.x, p.y - font_size * 0.2), size),
            None => Rect::from_origin_size((-text_anchor.x, -font_size), size),
        };

        tracing::debug!(
            layer = %self.keypath,
            frame = frame.as_f64(),
            width = size.width,
            height = size.height,
            generic_font = font.generic,
            "text layout"
        );

        let fill_run = TextRun {
            text,
            font: font.clone(),
            tracking,
            fill_color,
            stroke: None,
            line_spacing,
            alignment: doc.justification,
        };
        let resolved = Resolved {
            anchor_point,
            opacity,
            transform,
            font,
            font_size,
            fill_color,
            frame: frame_rect,
            alignment: doc.justification,
        };

        match stroke_color {
            Some(color) => {
                self.stroke.hidden = false;
                let on_top = if doc.stroke_over_fill {
                    SurfaceRole::Stroke
                } else {
                    SurfaceRole::Fill
                };
                self.raise(on_top);
                setup_surface(&mut self.stroke, &resolved);
                self.stroke.run = Some(TextRun {
                    stroke: Some(TextStroke {
                        color,
                        width: stroke_width,
                    }),
                    ..fill_run.clone()
                });
            }
            None => self.stroke.hidden = true,
        }

        setup_surface(&mut self.fill, &resolved);
        self.fill.run = Some(fill_run);
        true
    }

    /// Remove `role` from the sublayer stack and append it on top.
    fn raise(&mut self, role: SurfaceRole) {
        self.sublayers.retain(|r| *r != role);
        self.sublayers.push(role);
    }
}

fn setup_surface(surface: &mut TextSurface, r: &Resolved) {
    surface.anchor_point = r.anchor_point;
    surface.opacity = r.opacity;
    surface.transform = r.transform;
    surface.font_size = r.font_size;
    surface.font = Some(r.font.clone());
    surface.foreground = r.fill_color;
    surface.frame = r.frame;
    if let SurfaceKind::WordAnimated { shifted, .. } = surface.kind {
        let fs = surface.font_size;
        surface.frame = if shifted {
            Rect::new(
                surface.frame.x0,
                surface.frame.y0 + fs,
                surface.frame.x1,
                surface.frame.y1 + 2.0 * fs,
            )
        } else {
            surface.frame + Vec2::new(0.0, fs / 5.0)
        };
    }
    surface.alignment = r.alignment;
}

#[cfg(test)]
#[path = "../../tests/unit/text/layer.rs"]
mod tests;
