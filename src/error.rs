use crate::id::TextureId;
use thiserror::Error;

/// Errors reported by a [`TextureResolver`](crate::TextureResolver).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TextureError {
    #[error("texture {0} is not loaded")]
    TextureNotFound(TextureId),
    #[error("atlas has no room left for {0}")]
    AtlasFull(&'static str),
    #[error("dash pattern {0:?} cannot be rasterized into a stipple mask")]
    InvalidPattern(Vec<f32>),
}

/// Errors reported while preparing a [`LineShape`](crate::LineShape).
///
/// Every variant describes a caller contract violation. Degenerate geometry is not an error:
/// it is skipped during tessellation and may produce a shape that draws nothing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LineShapeError {
    #[error("a line needs at least 2 points, got {0}")]
    NotEnoughPoints(usize),
    #[error("line width must be finite and non-negative, got {0}")]
    InvalidWidth(f32),
    #[error("ground-to-pixel scale must be finite and positive, got {0}")]
    InvalidGroundToPixelScale(f32),
    #[error("dash pattern lengths must be finite and positive: {0:?}")]
    InvalidDashPattern(Vec<f32>),
    #[error("tessellation setting {name} must be finite and positive, got {value}")]
    InvalidConfig { name: &'static str, value: f32 },
    #[error("dash pattern would split the line into {splits} pieces, the limit is {limit}")]
    TooManyDashSplits { splits: f64, limit: usize },
    #[error("stipple region for {0} has an empty mask")]
    EmptyStippleMask(TextureId),
    #[error(transparent)]
    Texture(#[from] TextureError),
}
