use crate::batch::{AttributeProvider, Batcher};
use crate::builder::{
    BuilderKind, BuilderParams, DashedBuilderParams, DashedLineBuilder, SimpleLineBuilder,
    SolidLineBuilder, TessellationInput, TessellationStrategy, VERTICES_PER_QUAD,
};
use crate::color::Color;
use crate::config::{DeviceCaps, TessellationConfig};
use crate::error::LineShapeError;
use crate::geometry::GeoPoint;
use crate::render_state::DepthLayer;
use crate::spline::SharedSpline;
use crate::stroke::{DashPattern, LineCap, LineJoin};
use crate::texture::TextureResolver;
use std::fmt;
use std::sync::OnceLock;
use tracing::debug;

/// How a line is supposed to look.
///
/// ```
/// use linework::{Color, LineCap, LineViewParams};
///
/// let params = LineViewParams::default()
///     .with_color(Color::rgb(40, 90, 200))
///     .with_width(6.0)
///     .with_pattern([8.0, 4.0])
///     .with_cap(LineCap::Butt);
/// assert!(!params.pattern.is_empty());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct LineViewParams {
    pub color: Color,
    /// Full width in pixels.
    pub width: f32,
    /// Empty for a solid line.
    pub pattern: DashPattern,
    pub cap: LineCap,
    pub join: LineJoin,
    pub depth: f32,
    pub depth_test_enabled: bool,
    pub depth_layer: DepthLayer,
    /// Zoom level the shape is built for. Zero or negative when unknown.
    pub zoom_level: i32,
    /// Pixels per ground unit at the zoom level the shape is built for.
    pub base_gtop_scale: f32,
    /// Origin of the tile-local shape coordinates.
    pub tile_center: GeoPoint,
}

impl Default for LineViewParams {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
            pattern: DashPattern::solid(),
            cap: LineCap::default(),
            join: LineJoin::default(),
            depth: 0.0,
            depth_test_enabled: true,
            depth_layer: DepthLayer::default(),
            zoom_level: 0,
            base_gtop_scale: 1.0,
            tile_center: GeoPoint::origin(),
        }
    }
}

impl LineViewParams {
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<DashPattern>) -> Self {
        self.pattern = pattern.into();
        self
    }

    pub fn with_cap(mut self, cap: LineCap) -> Self {
        self.cap = cap;
        self
    }

    pub fn with_join(mut self, join: LineJoin) -> Self {
        self.join = join;
        self
    }

    pub fn with_depth(mut self, depth: f32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_depth_test(mut self, enabled: bool) -> Self {
        self.depth_test_enabled = enabled;
        self
    }

    pub fn with_depth_layer(mut self, depth_layer: DepthLayer) -> Self {
        self.depth_layer = depth_layer;
        self
    }

    pub fn with_zoom_level(mut self, zoom_level: i32) -> Self {
        self.zoom_level = zoom_level;
        self
    }

    pub fn with_base_gtop_scale(mut self, scale: f32) -> Self {
        self.base_gtop_scale = scale;
        self
    }

    pub fn with_tile_center(mut self, tile_center: GeoPoint) -> Self {
        self.tile_center = tile_center;
        self
    }
}

/// A polyline together with its look, tessellated on demand.
///
/// The builder is chosen and filled the first time the shape is prepared or drawn and kept for
/// the lifetime of the shape. Later calls reuse it, even when they pass different textures or
/// device caps.
///
/// ```
/// use linework::{DeviceCaps, DrawQueue, LineShape, LineViewParams, SimpleAtlas, Spline};
///
/// let spline: Spline = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)].into_iter().collect();
/// let shape = LineShape::new(spline.into_shared(), LineViewParams::default().with_width(2.0))?;
///
/// let atlas = SimpleAtlas::new();
/// let mut queue = DrawQueue::new();
/// shape.draw(&mut queue, &atlas, &DeviceCaps::default())?;
/// // body, joins and caps
/// assert_eq!(queue.len(), 3);
/// # Ok::<(), linework::LineShapeError>(())
/// ```
pub struct LineShape {
    spline: SharedSpline,
    params: LineViewParams,
    config: TessellationConfig,
    builder: OnceLock<Box<dyn TessellationStrategy>>,
}

impl fmt::Debug for LineShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineShape")
            .field("points", &self.spline.len())
            .field("params", &self.params)
            .field("builder", &self.builder_kind())
            .finish()
    }
}

impl LineShape {
    pub fn new(spline: SharedSpline, params: LineViewParams) -> Result<Self, LineShapeError> {
        if spline.len() < 2 {
            return Err(LineShapeError::NotEnoughPoints(spline.len()));
        }

        Ok(Self {
            spline,
            params,
            config: TessellationConfig::default(),
            builder: OnceLock::new(),
        })
    }

    /// Replaces the tessellation constants. Only affects a shape that was not prepared yet.
    pub fn with_config(mut self, config: TessellationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn spline(&self) -> &SharedSpline {
        &self.spline
    }

    pub fn params(&self) -> &LineViewParams {
        &self.params
    }

    pub fn config(&self) -> &TessellationConfig {
        &self.config
    }

    /// Chooses a builder and tessellates the path once. Does nothing if the shape is prepared.
    pub fn prepare<T>(
        &self,
        textures: &T,
        caps: &DeviceCaps,
    ) -> Result<&dyn TessellationStrategy, LineShapeError>
    where
        T: TextureResolver + ?Sized,
    {
        if let Some(builder) = self.builder.get() {
            return Ok(&**builder);
        }

        let builder = self.build(textures, caps)?;
        // A concurrent prepare may have won; its builder is equivalent.
        Ok(&**self.builder.get_or_init(|| builder))
    }

    /// Prepares the shape if needed and submits its geometry.
    ///
    /// The line body comes first, then joins and caps as triangle lists. Empty buffers are not
    /// submitted, so a shape whose points all coincide draws nothing.
    pub fn draw<B, T>(
        &self,
        batcher: &mut B,
        textures: &T,
        caps: &DeviceCaps,
    ) -> Result<(), LineShapeError>
    where
        B: Batcher + ?Sized,
        T: TextureResolver + ?Sized,
    {
        let builder = self.prepare(textures, caps)?;
        if builder.line_size() == 0 {
            return Ok(());
        }

        let line = AttributeProvider::new(builder.layout(), builder.line_data(), builder.line_size());
        if builder.kind() == BuilderKind::Simple {
            batcher.insert_line_strip(&builder.state(), &line);
            return Ok(());
        }

        batcher.insert_list_of_strip(&builder.state(), &line, VERTICES_PER_QUAD);

        if builder.join_size() > 0 {
            let joins = AttributeProvider::new(
                builder.cap_join_layout(),
                builder.join_data(),
                builder.join_size(),
            );
            batcher.insert_triangle_list(&builder.join_state(), &joins);
        }

        if builder.cap_size() > 0 {
            let cap_geometry = AttributeProvider::new(
                builder.cap_join_layout(),
                builder.cap_data(),
                builder.cap_size(),
            );
            batcher.insert_triangle_list(&builder.cap_state(), &cap_geometry);
        }

        Ok(())
    }

    /// True once the shape was prepared with the native line builder.
    pub fn is_simple(&self) -> bool {
        self.builder_kind() == Some(BuilderKind::Simple)
    }

    pub fn builder_kind(&self) -> Option<BuilderKind> {
        self.builder.get().map(|builder| builder.kind())
    }

    /// The filled builder, if the shape was prepared.
    pub fn geometry(&self) -> Option<&dyn TessellationStrategy> {
        self.builder.get().map(|builder| &**builder)
    }

    fn validate(&self) -> Result<(), LineShapeError> {
        let width = self.params.width;
        if !width.is_finite() || width < 0.0 {
            return Err(LineShapeError::InvalidWidth(width));
        }

        let shape_coord_scale = self.config.shape_coord_scale;
        if !is_positive(shape_coord_scale) {
            return Err(LineShapeError::InvalidConfig {
                name: "shape_coord_scale",
                value: shape_coord_scale,
            });
        }

        let pattern = &self.params.pattern;
        if !pattern.is_empty() {
            let factor = self.config.dash_quality_factor;
            if !is_positive(factor) {
                return Err(LineShapeError::InvalidConfig {
                    name: "dash_quality_factor",
                    value: factor,
                });
            }
            let scale = self.params.base_gtop_scale;
            if !is_positive(scale) {
                return Err(LineShapeError::InvalidGroundToPixelScale(scale));
            }
            if !pattern.is_valid() {
                return Err(LineShapeError::InvalidDashPattern(pattern.lengths().to_vec()));
            }
        }

        Ok(())
    }

    /// Thin lines outside of world overviews are drawn with native line primitives.
    fn can_be_simplified(&self, caps: &DeviceCaps) -> bool {
        let zoom_level = self.params.zoom_level;
        if zoom_level > 0 && zoom_level <= self.config.upper_country_scale {
            return false;
        }

        self.params.width <= self.config.simplified_width(caps)
    }

    fn build<T>(
        &self,
        textures: &T,
        caps: &DeviceCaps,
    ) -> Result<Box<dyn TessellationStrategy>, LineShapeError>
    where
        T: TextureResolver + ?Sized,
    {
        self.validate()?;

        let params = BuilderParams {
            color: textures.color_region(self.params.color)?,
            px_half_width: self.params.width / 2.0,
            depth: self.params.depth,
            depth_test_enabled: self.params.depth_test_enabled,
            depth_layer: self.params.depth_layer,
            cap: self.params.cap,
            join: self.params.join,
        };

        let path = self.spline.path();
        let mut builder: Box<dyn TessellationStrategy> = if self.params.pattern.is_empty() {
            if self.can_be_simplified(caps) {
                let line_width = (self.params.width as u32).max(1);
                Box::new(SimpleLineBuilder::new(params, path.len(), line_width))
            } else {
                Box::new(SolidLineBuilder::new(params, path.len(), &self.config))
            }
        } else {
            let stipple = textures.stipple_region(&self.params.pattern)?;
            if stipple.mask_pixel_size.0 == 0 {
                return Err(LineShapeError::EmptyStippleMask(stipple.texture));
            }
            let split_length = stipple.mask_pixel_size.0 as f64
                / self.params.base_gtop_scale as f64
                / self.config.dash_quality_factor as f64;
            let splits = self.spline.length() / split_length;
            if !splits.is_finite() || splits > self.config.max_dash_splits as f64 {
                return Err(LineShapeError::TooManyDashSplits {
                    splits,
                    limit: self.config.max_dash_splits,
                });
            }
            Box::new(DashedLineBuilder::new(
                DashedBuilderParams {
                    base: params,
                    stipple,
                    base_gtop_scale: self.params.base_gtop_scale,
                },
                path.len(),
                self.spline.length(),
                &self.config,
            ))
        };

        builder.construct(&TessellationInput::new(
            path,
            self.params.tile_center,
            &self.config,
        ));

        debug!(
            "{:?} line of {} points: {} line, {} join, {} cap vertices",
            builder.kind(),
            path.len(),
            builder.line_size(),
            builder.join_size(),
            builder.cap_size()
        );

        Ok(builder)
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::SimpleAtlas;
    use crate::batch::{DrawQueue, Topology};
    use crate::error::TextureError;
    use crate::spline::Spline;
    use crate::texture::{ColorRegion, StippleRegion};

    fn shape(points: &[(f64, f64)], params: LineViewParams) -> LineShape {
        let spline: Spline = points.iter().copied().collect();
        LineShape::new(spline.into_shared(), params).unwrap()
    }

    fn corner(params: LineViewParams) -> LineShape {
        shape(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)], params)
    }

    #[test]
    fn single_point_is_rejected() {
        let spline: Spline = [(1.0, 1.0)].into_iter().collect();
        let result = LineShape::new(spline.into_shared(), LineViewParams::default());
        assert_eq!(result.unwrap_err(), LineShapeError::NotEnoughPoints(1));
    }

    #[test]
    fn thin_lines_are_simplified() {
        let line = corner(LineViewParams::default().with_width(1.0));
        line.prepare(&SimpleAtlas::new(), &DeviceCaps::default()).unwrap();
        assert!(line.is_simple());
    }

    #[test]
    fn wide_device_lines_keep_native_width() {
        let line = corner(LineViewParams::default().with_width(2.5));
        let builder = line.prepare(&SimpleAtlas::new(), &DeviceCaps::new(4.0)).unwrap();
        assert_eq!(builder.kind(), BuilderKind::Simple);
        assert_eq!(builder.state().line_width, 2);
    }

    #[test]
    fn world_overviews_are_never_simplified() {
        let caps = DeviceCaps::new(4.0);
        let atlas = SimpleAtlas::new();

        let overview = corner(LineViewParams::default().with_zoom_level(10));
        overview.prepare(&atlas, &caps).unwrap();
        assert_eq!(overview.builder_kind(), Some(BuilderKind::Solid));

        let detailed = corner(LineViewParams::default().with_zoom_level(11));
        detailed.prepare(&atlas, &caps).unwrap();
        assert_eq!(detailed.builder_kind(), Some(BuilderKind::Simple));
    }

    #[test]
    fn patterns_select_dashed_builder() {
        let line = corner(LineViewParams::default().with_width(1.0).with_pattern([10.0, 5.0]));
        line.prepare(&SimpleAtlas::new(), &DeviceCaps::default()).unwrap();
        assert_eq!(line.builder_kind(), Some(BuilderKind::Dashed));
        assert!(!line.is_simple());
    }

    #[test]
    fn unprepared_shape_has_no_geometry() {
        let line = corner(LineViewParams::default());
        assert!(line.geometry().is_none());
        assert_eq!(line.builder_kind(), None);
    }

    #[test]
    fn invalid_params_are_reported() {
        let atlas = SimpleAtlas::new();
        let caps = DeviceCaps::default();

        let line = corner(LineViewParams::default().with_width(f32::NAN));
        assert!(matches!(
            line.prepare(&atlas, &caps),
            Err(LineShapeError::InvalidWidth(_))
        ));

        let line = corner(
            LineViewParams::default()
                .with_pattern([4.0, 4.0])
                .with_base_gtop_scale(0.0),
        );
        assert!(matches!(
            line.prepare(&atlas, &caps),
            Err(LineShapeError::InvalidGroundToPixelScale(_))
        ));

        let line = corner(LineViewParams::default().with_pattern([4.0, 0.0]));
        assert!(matches!(
            line.prepare(&atlas, &caps),
            Err(LineShapeError::InvalidDashPattern(_))
        ));
        assert!(line.geometry().is_none());
    }

    #[test]
    fn broken_config_is_reported() {
        let atlas = SimpleAtlas::new();
        let caps = DeviceCaps::default();
        let dashed = LineViewParams::default().with_pattern([4.0, 4.0]);

        for factor in [f32::NAN, -3.0, 0.0] {
            let line = corner(dashed.clone())
                .with_config(TessellationConfig::default().with_dash_quality_factor(factor));
            assert!(matches!(
                line.prepare(&atlas, &caps),
                Err(LineShapeError::InvalidConfig {
                    name: "dash_quality_factor",
                    ..
                })
            ));
            assert!(line.geometry().is_none());
        }

        for scale in [f32::INFINITY, -1.0] {
            let line = corner(LineViewParams::default().with_width(4.0))
                .with_config(TessellationConfig::default().with_shape_coord_scale(scale));
            assert!(matches!(
                line.prepare(&atlas, &caps),
                Err(LineShapeError::InvalidConfig {
                    name: "shape_coord_scale",
                    ..
                })
            ));
        }
    }

    #[test]
    fn huge_ground_to_pixel_scale_is_refused() {
        // 8 px mask at 1e10 px per unit splits every 2.7e-10 units.
        let line = shape(
            &[(0.0, 0.0), (10.0, 0.0)],
            LineViewParams::default()
                .with_pattern([4.0, 4.0])
                .with_base_gtop_scale(1.0e10),
        );
        let result = line.prepare(&SimpleAtlas::new(), &DeviceCaps::default());
        match result {
            Err(LineShapeError::TooManyDashSplits { splits, limit }) => {
                assert!(splits > 1.0e10);
                assert_eq!(limit, TessellationConfig::default().max_dash_splits);
            }
            other => panic!("unexpected result {:?}", other.map(|builder| builder.kind())),
        }
        assert!(line.geometry().is_none());
    }

    #[test]
    fn dash_split_limit_is_configurable() {
        // 15 px mask splits the 20 unit corner into 4 pieces.
        let params = LineViewParams::default().with_pattern([10.0, 5.0]);
        let atlas = SimpleAtlas::new();
        let caps = DeviceCaps::default();

        let limited = corner(params.clone())
            .with_config(TessellationConfig::default().with_max_dash_splits(3));
        assert!(matches!(
            limited.prepare(&atlas, &caps),
            Err(LineShapeError::TooManyDashSplits { limit: 3, .. })
        ));

        let allowed = corner(params)
            .with_config(TessellationConfig::default().with_max_dash_splits(4));
        assert_eq!(allowed.prepare(&atlas, &caps).unwrap().line_size(), 16);
    }

    struct EmptyMaskResolver;

    impl TextureResolver for EmptyMaskResolver {
        fn color_region(&self, _color: Color) -> Result<ColorRegion, TextureError> {
            SimpleAtlas::new().color_region(Color::BLACK)
        }

        fn stipple_region(&self, _pattern: &DashPattern) -> Result<StippleRegion, TextureError> {
            Ok(StippleRegion {
                texture: crate::id::TextureId(9),
                mask_pixel_size: (0, 0),
                rect: lyon::math::Box2D::zero(),
            })
        }
    }

    #[test]
    fn empty_stipple_mask_is_reported() {
        let line = corner(LineViewParams::default().with_pattern([4.0, 4.0]));
        let mut queue = DrawQueue::new();
        let result = line.draw(&mut queue, &EmptyMaskResolver, &DeviceCaps::default());
        assert_eq!(
            result,
            Err(LineShapeError::EmptyStippleMask(crate::id::TextureId(9)))
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn simple_line_draws_one_line_strip() {
        let line = corner(LineViewParams::default());
        let mut queue = DrawQueue::new();
        line.draw(&mut queue, &SimpleAtlas::new(), &DeviceCaps::default())
            .unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.calls()[0].topology, Topology::LineStrip);
        assert_eq!(queue.calls()[0].vertex_count, 3);
    }

    #[test]
    fn butt_caps_are_not_submitted() {
        let line = corner(
            LineViewParams::default()
                .with_width(4.0)
                .with_cap(LineCap::Butt),
        );
        let mut queue = DrawQueue::new();
        line.draw(&mut queue, &SimpleAtlas::new(), &DeviceCaps::default())
            .unwrap();
        let topologies: Vec<_> = queue.calls().iter().map(|call| call.topology).collect();
        assert_eq!(
            topologies,
            vec![
                Topology::ListOfStrip {
                    vertices_per_strip: 4
                },
                Topology::TriangleList
            ]
        );
    }
}
