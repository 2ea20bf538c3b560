use crate::texture::StippleRegion;

/// Maps a distance along a dashed line to its coordinate in a stipple mask.
///
/// The produced coordinate also carries the horizontal extent of the mask rect and the row the
/// vertex samples, so the fragment stage can resolve the texel from a single attribute.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextureCoordGenerator {
    region: StippleRegion,
}

impl TextureCoordGenerator {
    /// The region's mask must be at least one texel wide.
    pub fn new(region: StippleRegion) -> Self {
        debug_assert!(region.mask_pixel_size.0 > 0);
        Self { region }
    }

    /// `(distance / mask length, rect min x, rect width, rect min y or max y)`.
    ///
    /// Left vertices sample the top row of the mask rect, right vertices the bottom one.
    pub fn tex_coords_by_distance(&self, distance: f32, is_left: bool) -> [f32; 4] {
        let rect = &self.region.rect;
        [
            distance / self.mask_length(),
            rect.min.x,
            rect.width(),
            if is_left { rect.min.y } else { rect.max.y },
        ]
    }

    /// Length of one mask period, in texels.
    pub fn mask_length(&self) -> f32 {
        self.region.mask_pixel_size.0 as f32
    }

    pub fn region(&self) -> &StippleRegion {
        &self.region
    }
}
