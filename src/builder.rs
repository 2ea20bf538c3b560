//! Line builders: one tessellation strategy per way of drawing a line.
//!
//! A [`LineShape`](crate::LineShape) picks exactly one builder, runs its
//! [`TessellationStrategy::construct`] once and afterwards only reads it through the
//! [`LineGeometry`] accessors. Builders never mix: a simple line has no quads, a dashed line has
//! no joins or caps.

mod dashed;
mod simple;
mod solid;

pub use dashed::{DashedBuilderParams, DashedLineBuilder};
pub use simple::SimpleLineBuilder;
pub use solid::SolidLineBuilder;

use crate::buffer::ReservedBuffer;
use crate::config::TessellationConfig;
use crate::geometry::{equal_dx_dy, to_shape_vertex, GeoPoint};
use crate::render_state::{DepthLayer, Program, RenderState};
use crate::stroke::{LineCap, LineJoin};
use crate::texture::ColorRegion;
use crate::vertex::CAP_JOIN_VERTEX_LAYOUT;
use bytemuck::Pod;
use lyon::math::Point;

/// Vertices per segment quad of the line body.
pub const VERTICES_PER_QUAD: u32 = 4;

/// Which tessellation strategy a shape uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BuilderKind {
    /// Native line primitive, one vertex per path point.
    Simple,
    /// CPU-expanded quads with joins and caps.
    Solid,
    /// CPU-expanded quads sampling a dash mask.
    Dashed,
}

/// Read access to the buffers and GPU state of a finished builder.
pub trait LineGeometry {
    /// Layout of the line body vertices.
    fn layout(&self) -> &'static wgpu::VertexBufferLayout<'static>;
    /// State the line body is drawn with.
    fn state(&self) -> RenderState;
    fn line_data(&self) -> &[u8];
    /// Number of line body vertices.
    fn line_size(&self) -> u32;

    /// Layout of the join and cap vertices.
    fn cap_join_layout(&self) -> &'static wgpu::VertexBufferLayout<'static> {
        &CAP_JOIN_VERTEX_LAYOUT
    }

    fn cap_state(&self) -> RenderState {
        self.state()
    }

    fn join_state(&self) -> RenderState {
        self.state()
    }

    fn cap_data(&self) -> &[u8] {
        &[]
    }

    fn cap_size(&self) -> u32 {
        0
    }

    fn join_data(&self) -> &[u8] {
        &[]
    }

    fn join_size(&self) -> u32 {
        0
    }

    /// True if no buffer grew past the capacity reserved for it up front.
    fn fits_reservation(&self) -> bool;
}

/// A builder that can fill its own buffers from a path.
pub trait TessellationStrategy: LineGeometry + Send + Sync {
    fn kind(&self) -> BuilderKind;

    /// Walks the path once and fills the builder's buffers.
    fn construct(&mut self, input: &TessellationInput<'_>);
}

/// The path being tessellated, with what is needed to place its points in shape space.
#[derive(Clone, Copy, Debug)]
pub struct TessellationInput<'a> {
    pub path: &'a [GeoPoint],
    pub tile_center: GeoPoint,
    pub config: &'a TessellationConfig,
}

impl<'a> TessellationInput<'a> {
    pub fn new(path: &'a [GeoPoint], tile_center: GeoPoint, config: &'a TessellationConfig) -> Self {
        Self {
            path,
            tile_center,
            config,
        }
    }

    #[inline]
    pub fn shape_vertex(&self, point: GeoPoint) -> Point {
        to_shape_vertex(point, self.tile_center, self.config.shape_coord_scale)
    }

    /// True if the points are too close to form a segment.
    #[inline]
    pub fn is_degenerate(&self, a: GeoPoint, b: GeoPoint) -> bool {
        equal_dx_dy(a, b, self.config.point_accuracy)
    }
}

/// Parameters shared by every builder, resolved once per shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuilderParams {
    pub color: ColorRegion,
    pub px_half_width: f32,
    pub depth: f32,
    pub depth_test_enabled: bool,
    pub depth_layer: DepthLayer,
    pub cap: LineCap,
    pub join: LineJoin,
}

/// Line body buffer and the parameters every builder shares.
#[derive(Clone, Debug)]
pub(crate) struct BaseLineBuilder<V> {
    pub(crate) params: BuilderParams,
    pub(crate) geometry: ReservedBuffer<V>,
    pub(crate) color_coords: [f32; 2],
}

impl<V: Pod> BaseLineBuilder<V> {
    pub(crate) fn new(params: BuilderParams, geometry_size: usize) -> Self {
        Self {
            params,
            geometry: ReservedBuffer::with_reserved("line", geometry_size),
            color_coords: params.color.tex_coords(),
        }
    }

    #[inline]
    pub(crate) fn half_width(&self) -> f32 {
        self.params.px_half_width
    }

    pub(crate) fn base_state(&self, program: Program) -> RenderState {
        RenderState::new(program, self.params.depth_layer, self.params.color.texture)
            .with_depth_test(self.params.depth_test_enabled)
    }
}
