use std::sync::Arc;

use crate::{
    foundation::core::{BezPath, Canvas},
    foundation::error::AnimGraphResult,
    render::{
        cpu::{CpuCanvasOpts, ImmediateCanvas},
        renderable::Material,
    },
};

/// A rendered frame as RGBA8 pixels.
///
/// Frames read back from an [`ImmediateCanvas`] are **premultiplied alpha**. The `premultiplied`
/// flag makes this explicit at API boundaries.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)`, `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Available shape backend kinds.
///
/// - `Retained` stores path and materials for a host compositor.
/// - `Immediate` rasterizes on the CPU through `vello_cpu`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BackendKind {
    /// Geometry plus material object.
    #[default]
    Retained,
    /// Immediate-mode path fill/stroke calls.
    Immediate,
}

/// Retained geometry + material surface of a shape layer.
#[derive(Clone, Debug, Default)]
pub struct RetainedShape {
    /// Committed path.
    pub path: Option<Arc<BezPath>>,
    /// Committed paint.
    pub materials: Vec<Material>,
    /// Hidden surfaces are skipped by the host.
    pub hidden: bool,
}

/// Drawable surface of a shape layer, chosen once when the layer is built.
#[derive(Debug)]
pub enum ShapeBackend {
    /// Retained surface.
    Retained(RetainedShape),
    /// Immediate-mode canvas.
    Immediate(ImmediateCanvas),
}

impl ShapeBackend {
    /// Create the backend for `kind`; `opts` only apply to the immediate canvas.
    pub fn create(kind: BackendKind, canvas: Canvas, opts: CpuCanvasOpts) -> AnimGraphResult<Self> {
        match kind {
            BackendKind::Retained => Ok(Self::Retained(RetainedShape::default())),
            BackendKind::Immediate => Ok(Self::Immediate(ImmediateCanvas::with_opts(canvas, opts)?)),
        }
    }

    /// Kind of this backend.
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Retained(_) => BackendKind::Retained,
            Self::Immediate(_) => BackendKind::Immediate,
        }
    }

    /// Retained surface, if this is one.
    pub fn as_retained(&self) -> Option<&RetainedShape> {
        match self {
            Self::Retained(shape) => Some(shape),
            Self::Immediate(_) => None,
        }
    }

    /// Immediate canvas, if this is one.
    pub fn as_immediate_mut(&mut self) -> Option<&mut ImmediateCanvas> {
        match self {
            Self::Immediate(canvas) => Some(canvas),
            Self::Retained(_) => None,
        }
    }
}
