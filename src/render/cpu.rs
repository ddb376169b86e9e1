use std::fmt;

use kurbo::PathEl;

use crate::{
    foundation::core::{Affine, BezPath, Canvas, Color},
    foundation::error::{AnimGraphError, AnimGraphResult},
    render::{
        backend::FrameRGBA,
        renderable::{FillRule, StrokeStyle},
    },
};

/// Options for an [`ImmediateCanvas`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuCanvasOpts {
    pub(crate) transform: Option<Affine>,
    pub(crate) clear_rgba: Option<[u8; 4]>,
}

impl CpuCanvasOpts {
    /// Return options with a transform applied to every path.
    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Return options with a configured clear color, straight RGBA8.
    pub fn with_clear_rgba(mut self, clear: Option<[u8; 4]>) -> Self {
        self.clear_rgba = clear;
        self
    }
}

/// Immediate-mode CPU canvas powered by `vello_cpu`.
///
/// Paint calls accumulate until [`ImmediateCanvas::readback`]; [`ImmediateCanvas::reset`] starts
/// a new frame.
pub struct ImmediateCanvas {
    width: u16,
    height: u16,
    opts: CpuCanvasOpts,
    ctx: vello_cpu::RenderContext,
    draw_calls: usize,
}

impl fmt::Debug for ImmediateCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImmediateCanvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("opts", &self.opts)
            .field("draw_calls", &self.draw_calls)
            .finish_non_exhaustive()
    }
}

impl ImmediateCanvas {
    /// Canvas of `canvas` size with default options.
    pub fn new(canvas: Canvas) -> AnimGraphResult<Self> {
        Self::with_opts(canvas, CpuCanvasOpts::default())
    }

    /// Canvas of `canvas` size.
    pub fn with_opts(canvas: Canvas, opts: CpuCanvasOpts) -> AnimGraphResult<Self> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(AnimGraphError::validation("canvas width/height must be > 0"));
        }
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| AnimGraphError::validation("canvas width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| AnimGraphError::validation("canvas height exceeds u16"))?;

        let mut this = Self {
            width,
            height,
            opts,
            ctx: vello_cpu::RenderContext::new(width, height),
            draw_calls: 0,
        };
        this.reset();
        Ok(this)
    }

    /// Canvas dimensions.
    pub fn size(&self) -> Canvas {
        Canvas {
            width: u32::from(self.width),
            height: u32::from(self.height),
        }
    }

    /// Paint calls issued since the last reset.
    pub fn draw_calls(&self) -> usize {
        self.draw_calls
    }

    /// Drop accumulated paint and start a new frame.
    pub fn reset(&mut self) {
        self.ctx = vello_cpu::RenderContext::new(self.width, self.height);
        self.draw_calls = 0;
        if let Some([r, g, b, a]) = self.opts.clear_rgba {
            self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            self.ctx
                .set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(self.width),
                f64::from(self.height),
            ));
        }
    }

    pub(crate) fn fill_path(&mut self, path: &BezPath, color: Color, alpha: f64, rule: FillRule) {
        self.begin_paint(color);
        self.ctx.set_fill_rule(rule.to_cpu());
        let alpha = alpha as f32;
        if alpha < 1.0 {
            self.ctx.push_opacity_layer(alpha);
        }
        self.ctx.fill_path(&bezpath_to_cpu(path));
        if alpha < 1.0 {
            self.ctx.pop_layer();
        }
        self.draw_calls += 1;
    }

    pub(crate) fn stroke_path(
        &mut self,
        path: &BezPath,
        color: Color,
        alpha: f64,
        style: StrokeStyle,
    ) {
        self.begin_paint(color);
        self.ctx.set_stroke(style.to_cpu());
        let alpha = alpha as f32;
        if alpha < 1.0 {
            self.ctx.push_opacity_layer(alpha);
        }
        self.ctx.stroke_path(&bezpath_to_cpu(path));
        if alpha < 1.0 {
            self.ctx.pop_layer();
        }
        self.draw_calls += 1;
    }

    /// Rasterize accumulated paint into a premultiplied frame.
    pub fn readback(&mut self) -> FrameRGBA {
        self.ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.render_to_pixmap(&mut pixmap);
        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    fn begin_paint(&mut self, color: Color) {
        let transform = self.opts.transform.unwrap_or(Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(transform));
        let [r, g, b, a] = color.to_rgba8();
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
