use crate::{
    foundation::core::{Affine, Canvas},
    render::{backend::BackendKind, cpu::CpuCanvasOpts},
    text::measure::MeasureOpts,
};

/// Options for a [`crate::scene::graph::SceneGraph`].
#[derive(Debug, Clone, Copy)]
pub struct SceneOpts {
    pub(crate) render_scale: f64,
    pub(crate) shape_backend: BackendKind,
    pub(crate) canvas: Canvas,
    pub(crate) clear_rgba: Option<[u8; 4]>,
    pub(crate) transform: Option<Affine>,
    pub(crate) measure: MeasureOpts,
}

impl Default for SceneOpts {
    fn default() -> Self {
        Self {
            render_scale: 1.0,
            shape_backend: BackendKind::Retained,
            canvas: Canvas {
                width: 512,
                height: 512,
            },
            clear_rgba: None,
            transform: None,
            measure: MeasureOpts::default(),
        }
    }
}

impl SceneOpts {
    /// Return options with a render scale applied to text surfaces.
    pub fn with_render_scale(mut self, render_scale: f64) -> Self {
        self.render_scale = render_scale;
        self
    }

    /// Return options selecting the backend every shape layer draws into.
    pub fn with_shape_backend(mut self, shape_backend: BackendKind) -> Self {
        self.shape_backend = shape_backend;
        self
    }

    /// Return options with the immediate canvas size.
    pub fn with_canvas(mut self, canvas: Canvas) -> Self {
        self.canvas = canvas;
        self
    }

    /// Return options with a configured clear color, straight RGBA8.
    pub fn with_clear_rgba(mut self, clear: Option<[u8; 4]>) -> Self {
        self.clear_rgba = clear;
        self
    }

    /// Return options with a transform applied to every immediate-mode path.
    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Return options for the default text measurer.
    pub fn with_measure(mut self, measure: MeasureOpts) -> Self {
        self.measure = measure;
        self
    }

    /// Render scale.
    pub fn render_scale(&self) -> f64 {
        self.render_scale
    }

    /// Shape backend kind.
    pub fn shape_backend(&self) -> BackendKind {
        self.shape_backend
    }

    pub(crate) fn canvas_opts(&self) -> CpuCanvasOpts {
        let opts = CpuCanvasOpts::default().with_clear_rgba(self.clear_rgba);
        match self.transform {
            Some(t) => opts.with_transform(t),
            None => opts,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/opts.rs"]
mod tests;
