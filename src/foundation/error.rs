/// Convenience result type used across animgraph.
pub type AnimGraphResult<T> = Result<T, AnimGraphError>;

/// Top-level error taxonomy used by construction-time APIs.
///
/// Per-frame work never fails: missing parents, missing stroke colors, unmatched fonts and similar
/// conditions resolve to documented fallbacks instead of errors.
#[derive(thiserror::Error, Debug)]
pub enum AnimGraphError {
    /// Structurally invalid scene graph input (bad node ids, wrong node kind).
    #[error("validation error: {0}")]
    Validation(String),

    /// Invalid keyframe data.
    #[error("animation error: {0}")]
    Animation(String),

    /// Asset bytes that fail to decode, rasterize or register.
    #[error("asset error: {0}")]
    Asset(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AnimGraphError {
    /// Build an [`AnimGraphError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`AnimGraphError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build an [`AnimGraphError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
