//! Interface to the texture/atlas collaborator.
//!
//! Builders only need to know where a color or a dash mask lives inside an atlas page. Loading
//! and packing textures is the resolver's business; see [`SimpleAtlas`](crate::SimpleAtlas) for
//! an in-memory implementation.

use crate::color::Color;
use crate::error::TextureError;
use crate::id::TextureId;
use crate::stroke::DashPattern;

/// Normalized rectangle inside an atlas texture.
pub type TexRect = lyon::math::Box2D;

/// Location of a solid color inside the color atlas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorRegion {
    pub texture: TextureId,
    pub rect: TexRect,
}

impl ColorRegion {
    /// The texel every vertex of a uniformly colored line samples.
    pub fn tex_coords(&self) -> [f32; 2] {
        self.rect.center().to_array()
    }
}

/// Location of a rasterized dash pattern inside the stipple atlas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StippleRegion {
    pub texture: TextureId,
    /// Width and height of the mask, in texels. The width is one full pattern period.
    pub mask_pixel_size: (u32, u32),
    pub rect: TexRect,
}

/// Resolves logical colors and dash patterns into atlas regions.
///
/// Implementations are consulted once per shape, during `prepare`.
pub trait TextureResolver {
    fn color_region(&self, color: Color) -> Result<ColorRegion, TextureError>;
    fn stipple_region(&self, pattern: &DashPattern) -> Result<StippleRegion, TextureError>;
}

impl<T: TextureResolver + ?Sized> TextureResolver for &T {
    fn color_region(&self, color: Color) -> Result<ColorRegion, TextureError> {
        (**self).color_region(color)
    }

    fn stipple_region(&self, pattern: &DashPattern) -> Result<StippleRegion, TextureError> {
        (**self).stipple_region(pattern)
    }
}
