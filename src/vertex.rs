//! GPU vertex formats produced by the line builders.
//!
//! Every format has a process-wide `static` [`wgpu::VertexBufferLayout`], so the batching layer
//! can bind builders' buffers without any lazily initialized descriptor.

use bytemuck::{Pod, Zeroable};
use lyon::math::{Point, Vector};

/// Vertex of a simplified line drawn with the native line primitive.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct AreaVertex {
    /// Shape-space position, z carries the depth.
    pub position: [f32; 3],
    pub color_tex_coords: [f32; 2],
}

impl AreaVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &Self::ATTRIBUTES,
    };

    pub fn new(position: Point, depth: f32, color_tex_coords: [f32; 2]) -> Self {
        Self {
            position: [position.x, position.y, depth],
            color_tex_coords,
        }
    }
}

/// Vertex of a CPU-expanded solid line quad.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    /// Point on the path centerline, z carries the depth.
    pub position: [f32; 3],
    /// xy: half-width times the unit normal, z: half-width times the side sign.
    pub normal: [f32; 3],
    pub color_tex_coords: [f32; 2],
}

impl LineVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &Self::ATTRIBUTES,
    };

    pub fn new(
        position: Point,
        depth: f32,
        normal: Vector,
        half_width: f32,
        side: f32,
        color_tex_coords: [f32; 2],
    ) -> Self {
        Self {
            position: [position.x, position.y, depth],
            normal: [
                half_width * normal.x,
                half_width * normal.y,
                half_width * side,
            ],
            color_tex_coords,
        }
    }
}

/// Vertex of a cap or join triangle.
///
/// Every vertex of a triangle sits on the same pivot; the vertex shader moves it by the xy of
/// `normal`. For round shapes z is the disc radius the fragment stage clips against, for
/// square caps and bevel/miter joins it is the side-scaled half-width, as in [`LineVertex`].
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CapJoinVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color_tex_coords: [f32; 2],
}

impl CapJoinVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &Self::ATTRIBUTES,
    };

    pub fn new(pivot: Point, depth: f32, normal: [f32; 3], color_tex_coords: [f32; 2]) -> Self {
        Self {
            position: [pivot.x, pivot.y, depth],
            normal,
            color_tex_coords,
        }
    }
}

/// Vertex of a dashed line quad.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct DashedLineVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color_tex_coords: [f32; 2],
    /// x: distance along the mask, y: color rect min x, z: color rect width, w: mask row.
    pub mask_tex_coords: [f32; 4],
}

impl DashedLineVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x2,
        3 => Float32x4
    ];

    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &Self::ATTRIBUTES,
    };
}

pub static AREA_VERTEX_LAYOUT: wgpu::VertexBufferLayout<'static> = AreaVertex::LAYOUT;
pub static LINE_VERTEX_LAYOUT: wgpu::VertexBufferLayout<'static> = LineVertex::LAYOUT;
pub static CAP_JOIN_VERTEX_LAYOUT: wgpu::VertexBufferLayout<'static> = CapJoinVertex::LAYOUT;
pub static DASHED_LINE_VERTEX_LAYOUT: wgpu::VertexBufferLayout<'static> =
    DashedLineVertex::LAYOUT;
