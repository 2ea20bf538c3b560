use crate::color::Color;
use crate::error::TextureError;
use crate::id::TextureId;
use crate::stroke::DashPattern;
use crate::texture::{ColorRegion, StippleRegion, TextureResolver};
use ahash::{HashMap, HashMapExt};
use lyon::math::{point, Box2D};
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};
use wgpu::util::DeviceExt;

/// Side of the square color atlas, in texels. Every color takes one texel.
pub const COLOR_ATLAS_SIZE: u32 = 64;
/// Width of the stipple atlas, in texels. Bounds the period of a dash pattern.
pub const STIPPLE_ATLAS_WIDTH: u32 = 512;
/// Number of stipple rows. Every distinct pattern takes one row.
pub const STIPPLE_ATLAS_HEIGHT: u32 = 64;

/// An in-memory [`TextureResolver`] with one color atlas page and one stipple atlas page.
///
/// Regions are allocated on first request and never freed. The texel data can be read back
/// with [`SimpleAtlas::texels`] or uploaded with
/// [`SimpleAtlas::create_textures`].
///
/// The atlas can be cloned and handed to other threads; clones share the same storage.
///
/// ```
/// use linework::{Color, DashPattern, SimpleAtlas, TextureResolver};
///
/// let atlas = SimpleAtlas::new();
/// let red = atlas.color_region(Color::rgb(255, 0, 0)).unwrap();
/// assert_eq!(red, atlas.color_region(Color::rgb(255, 0, 0)).unwrap());
///
/// let dashes = atlas.stipple_region(&DashPattern::from([10.0, 5.0])).unwrap();
/// assert_eq!(dashes.mask_pixel_size, (15, 1));
/// ```
#[derive(Clone, Debug)]
pub struct SimpleAtlas {
    color_texture: TextureId,
    stipple_texture: TextureId,
    storage: Arc<RwLock<AtlasStorage>>,
}

#[derive(Debug)]
struct AtlasStorage {
    colors: HashMap<Color, ColorRegion>,
    /// Keyed by the bit patterns of the dash lengths.
    stipples: HashMap<Vec<u32>, StippleRegion>,
    color_texels: Vec<u8>,
    stipple_texels: Vec<u8>,
}

impl Default for SimpleAtlas {
    fn default() -> Self {
        Self::new()
    }
}

impl SimpleAtlas {
    pub fn new() -> Self {
        Self::with_texture_ids(TextureId(1), TextureId(2))
    }

    /// Atlas whose pages are reported under the given ids.
    pub fn with_texture_ids(color_texture: TextureId, stipple_texture: TextureId) -> Self {
        Self {
            color_texture,
            stipple_texture,
            storage: Arc::new(RwLock::new(AtlasStorage {
                colors: HashMap::new(),
                stipples: HashMap::new(),
                color_texels: vec![0; (COLOR_ATLAS_SIZE * COLOR_ATLAS_SIZE * 4) as usize],
                stipple_texels: vec![0; (STIPPLE_ATLAS_WIDTH * STIPPLE_ATLAS_HEIGHT) as usize],
            })),
        }
    }

    pub fn color_texture(&self) -> TextureId {
        self.color_texture
    }

    pub fn stipple_texture(&self) -> TextureId {
        self.stipple_texture
    }

    pub fn color_count(&self) -> usize {
        self.storage.read().unwrap().colors.len()
    }

    pub fn stipple_count(&self) -> usize {
        self.storage.read().unwrap().stipples.len()
    }

    /// Row-major texels of one atlas page: RGBA8 for the color page, R8 coverage for the
    /// stipple page where 255 marks a drawn texel.
    ///
    /// # Returns
    /// - `Err(TextureError::TextureNotFound(texture))` if `texture` is not a page of this atlas.
    pub fn texels(&self, texture: TextureId) -> Result<Vec<u8>, TextureError> {
        let storage = self.storage.read().unwrap();
        if texture == self.color_texture {
            Ok(storage.color_texels.clone())
        } else if texture == self.stipple_texture {
            Ok(storage.stipple_texels.clone())
        } else {
            Err(TextureError::TextureNotFound(texture))
        }
    }

    /// Uploads both pages and returns the color and stipple textures.
    pub fn create_textures(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> (wgpu::Texture, wgpu::Texture) {
        let storage = self.storage.read().unwrap();
        let color = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("Line Color Atlas"),
                size: wgpu::Extent3d {
                    width: COLOR_ATLAS_SIZE,
                    height: COLOR_ATLAS_SIZE,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &storage.color_texels,
        );
        let stipple = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("Line Stipple Atlas"),
                size: wgpu::Extent3d {
                    width: STIPPLE_ATLAS_WIDTH,
                    height: STIPPLE_ATLAS_HEIGHT,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                // Mask texels are coverage, not color
                format: wgpu::TextureFormat::R8Unorm,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &storage.stipple_texels,
        );
        (color, stipple)
    }

    fn texel_rect(x: u32, y: u32, width: u32, height: u32, page: (u32, u32)) -> Box2D {
        let (page_width, page_height) = (page.0 as f32, page.1 as f32);
        Box2D::new(
            point(x as f32 / page_width, y as f32 / page_height),
            point(
                (x + width) as f32 / page_width,
                (y + height) as f32 / page_height,
            ),
        )
    }
}

impl TextureResolver for SimpleAtlas {
    fn color_region(&self, color: Color) -> Result<ColorRegion, TextureError> {
        if let Some(region) = self.storage.read().unwrap().colors.get(&color) {
            return Ok(*region);
        }

        let mut storage = self.storage.write().unwrap();
        // Another thread may have added it between the two locks.
        if let Some(region) = storage.colors.get(&color) {
            return Ok(*region);
        }

        let cell = storage.colors.len() as u32;
        if cell >= COLOR_ATLAS_SIZE * COLOR_ATLAS_SIZE {
            warn!("color atlas is full, {} colors allocated", cell);
            return Err(TextureError::AtlasFull("color"));
        }

        let (x, y) = (cell % COLOR_ATLAS_SIZE, cell / COLOR_ATLAS_SIZE);
        let offset = ((y * COLOR_ATLAS_SIZE + x) * 4) as usize;
        storage.color_texels[offset..offset + 4].copy_from_slice(&color.to_array());

        let region = ColorRegion {
            texture: self.color_texture,
            rect: Self::texel_rect(x, y, 1, 1, (COLOR_ATLAS_SIZE, COLOR_ATLAS_SIZE)),
        };
        storage.colors.insert(color, region);
        Ok(region)
    }

    fn stipple_region(&self, pattern: &DashPattern) -> Result<StippleRegion, TextureError> {
        let key: Vec<u32> = pattern.lengths().iter().map(|length| length.to_bits()).collect();
        if let Some(region) = self.storage.read().unwrap().stipples.get(&key) {
            return Ok(*region);
        }

        let mask = rasterize_stipple(pattern)?;
        let mask_width = mask.len() as u32;
        if mask_width > STIPPLE_ATLAS_WIDTH {
            return Err(TextureError::InvalidPattern(pattern.lengths().to_vec()));
        }

        let mut storage = self.storage.write().unwrap();
        if let Some(region) = storage.stipples.get(&key) {
            return Ok(*region);
        }

        let row = storage.stipples.len() as u32;
        if row >= STIPPLE_ATLAS_HEIGHT {
            warn!("stipple atlas is full, {} patterns allocated", row);
            return Err(TextureError::AtlasFull("stipple"));
        }

        let offset = (row * STIPPLE_ATLAS_WIDTH) as usize;
        storage.stipple_texels[offset..offset + mask.len()].copy_from_slice(&mask);

        let region = StippleRegion {
            texture: self.stipple_texture,
            mask_pixel_size: (mask_width, 1),
            rect: Self::texel_rect(
                0,
                row,
                mask_width,
                1,
                (STIPPLE_ATLAS_WIDTH, STIPPLE_ATLAS_HEIGHT),
            ),
        };
        debug!(
            "allocated stipple row {} for pattern {:?}, {} texels wide",
            row,
            pattern.lengths(),
            mask_width
        );
        storage.stipples.insert(key, region);
        Ok(region)
    }
}

/// Rasterizes one period of a dash pattern into a row of coverage texels.
///
/// Even entries of the pattern are drawn (255), odd entries are gaps (0). Lengths are rounded
/// to whole texels, with every entry taking at least one.
pub fn rasterize_stipple(pattern: &DashPattern) -> Result<Vec<u8>, TextureError> {
    if pattern.is_empty() || !pattern.is_valid() {
        return Err(TextureError::InvalidPattern(pattern.lengths().to_vec()));
    }

    let mut mask = Vec::with_capacity(pattern.period().ceil() as usize);
    for (index, length) in pattern.lengths().iter().enumerate() {
        let texels = (length.round() as usize).max(1);
        let value = if index % 2 == 0 { 255 } else { 0 };
        mask.extend(std::iter::repeat(value).take(texels));
    }
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_get_distinct_texels() {
        let atlas = SimpleAtlas::new();
        let red = atlas.color_region(Color::rgb(255, 0, 0)).unwrap();
        let blue = atlas.color_region(Color::rgb(0, 0, 255)).unwrap();
        assert_ne!(red.rect, blue.rect);
        assert_eq!(atlas.color_count(), 2);

        let size = COLOR_ATLAS_SIZE as f32;
        assert_eq!(red.tex_coords(), [0.5 / size, 0.5 / size]);
        assert_eq!(blue.tex_coords(), [1.5 / size, 0.5 / size]);

        let texels = atlas.texels(atlas.color_texture()).unwrap();
        assert_eq!(&texels[0..4], &[255, 0, 0, 255]);
        assert_eq!(&texels[4..8], &[0, 0, 255, 255]);
    }

    #[test]
    fn repeated_requests_reuse_region() {
        let atlas = SimpleAtlas::new();
        let pattern = DashPattern::from([4.0, 2.0]);
        let first = atlas.stipple_region(&pattern).unwrap();
        let clone = atlas.clone();
        assert_eq!(first, clone.stipple_region(&pattern).unwrap());
        assert_eq!(atlas.stipple_count(), 1);
    }

    #[test]
    fn stipple_row_matches_pattern() {
        let atlas = SimpleAtlas::new();
        atlas.stipple_region(&DashPattern::from([1.0])).unwrap();
        let region = atlas
            .stipple_region(&DashPattern::from([3.0, 2.0]))
            .unwrap();

        assert_eq!(region.texture, atlas.stipple_texture());
        assert_eq!(region.mask_pixel_size, (5, 1));
        let height = STIPPLE_ATLAS_HEIGHT as f32;
        assert_eq!(region.rect.min.y, 1.0 / height);
        assert_eq!(region.rect.max.y, 2.0 / height);
        assert_eq!(region.rect.width(), 5.0 / STIPPLE_ATLAS_WIDTH as f32);

        let texels = atlas.texels(atlas.stipple_texture()).unwrap();
        let row = STIPPLE_ATLAS_WIDTH as usize;
        assert_eq!(&texels[row..row + 6], &[255, 255, 255, 0, 0, 0]);
    }

    #[test]
    fn invalid_patterns_are_rejected() {
        let atlas = SimpleAtlas::new();
        assert_eq!(
            atlas.stipple_region(&DashPattern::from([4.0, -1.0])),
            Err(TextureError::InvalidPattern(vec![4.0, -1.0]))
        );
        assert!(atlas.stipple_region(&DashPattern::solid()).is_err());
        assert!(atlas
            .stipple_region(&DashPattern::from([400.0, 200.0]))
            .is_err());
    }

    #[test]
    fn short_entries_take_one_texel() {
        let mask = rasterize_stipple(&DashPattern::from([0.2, 1.6])).unwrap();
        assert_eq!(mask, vec![255, 0, 0]);
    }

    #[test]
    fn unknown_texture_has_no_texels() {
        let atlas = SimpleAtlas::with_texture_ids(TextureId(5), TextureId(6));
        assert_eq!(
            atlas.texels(TextureId(6)).unwrap().len(),
            (STIPPLE_ATLAS_WIDTH * STIPPLE_ATLAS_HEIGHT) as usize
        );
        assert_eq!(
            atlas.texels(TextureId(1)),
            Err(TextureError::TextureNotFound(TextureId(1)))
        );
    }
}
