//! Hand-off of finished geometry to the batching layer.
//!
//! [`LineShape::draw`](crate::LineShape::draw) talks to a [`Batcher`]. Renderers implement it
//! on top of their own command encoding; [`DrawQueue`] is a recording implementation that keeps
//! owned copies of every submission and can upload them with wgpu later.

use crate::render_state::RenderState;
use wgpu::util::DeviceExt;

/// How the vertices of a submission are assembled into primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Topology {
    /// Independent strips of `vertices_per_strip` vertices each.
    ListOfStrip { vertices_per_strip: u32 },
    TriangleList,
    LineStrip,
}

impl Topology {
    pub fn primitive_topology(&self) -> wgpu::PrimitiveTopology {
        match self {
            // Strips are expanded to indexed triangles so many of them fit in one draw.
            Topology::ListOfStrip { .. } | Topology::TriangleList => {
                wgpu::PrimitiveTopology::TriangleList
            }
            Topology::LineStrip => wgpu::PrimitiveTopology::LineStrip,
        }
    }

    /// Triangle-list indices for `vertex_count` vertices, if the topology needs them.
    pub fn indices(&self, vertex_count: u32) -> Option<Vec<u32>> {
        match *self {
            Topology::ListOfStrip { vertices_per_strip } if vertices_per_strip >= 3 => {
                let strips = vertex_count / vertices_per_strip;
                let triangles_per_strip = (vertices_per_strip - 2) as usize;
                let mut indices = Vec::with_capacity(strips as usize * triangles_per_strip * 3);
                for strip in 0..strips {
                    let base = strip * vertices_per_strip;
                    for i in 0..vertices_per_strip - 2 {
                        let v = base + i;
                        // Keep a consistent winding across the strip.
                        if i % 2 == 0 {
                            indices.extend_from_slice(&[v, v + 1, v + 2]);
                        } else {
                            indices.extend_from_slice(&[v + 1, v, v + 2]);
                        }
                    }
                }
                Some(indices)
            }
            _ => None,
        }
    }
}

/// One vertex stream of a submission: raw vertex bytes and how to read them.
#[derive(Clone, Copy, Debug)]
pub struct AttributeProvider<'a> {
    pub layout: &'static wgpu::VertexBufferLayout<'static>,
    pub data: &'a [u8],
    pub vertex_count: u32,
}

impl<'a> AttributeProvider<'a> {
    pub fn new(
        layout: &'static wgpu::VertexBufferLayout<'static>,
        data: &'a [u8],
        vertex_count: u32,
    ) -> Self {
        debug_assert_eq!(
            data.len() as u64,
            layout.array_stride * vertex_count as u64,
            "vertex data does not match its layout"
        );
        Self {
            layout,
            data,
            vertex_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }
}

/// Receiver of finished line geometry.
pub trait Batcher {
    /// Line body made of independent strips, e.g. one 4-vertex strip per segment quad.
    fn insert_list_of_strip(
        &mut self,
        state: &RenderState,
        provider: &AttributeProvider<'_>,
        vertices_per_strip: u32,
    );

    fn insert_triangle_list(&mut self, state: &RenderState, provider: &AttributeProvider<'_>);

    /// Connected native line through all vertices.
    fn insert_line_strip(&mut self, state: &RenderState, provider: &AttributeProvider<'_>);
}

/// An owned, recorded submission.
#[derive(Clone, Debug)]
pub struct DrawCall {
    pub state: RenderState,
    pub topology: Topology,
    pub layout: &'static wgpu::VertexBufferLayout<'static>,
    pub vertex_count: u32,
    pub data: Vec<u8>,
}

impl DrawCall {
    /// Vertices of the call reinterpreted as `V`. `V` must match the call's layout stride.
    pub fn vertices<V: bytemuck::Pod>(&self) -> Vec<V> {
        self.data
            .chunks_exact(std::mem::size_of::<V>())
            .map(bytemuck::pod_read_unaligned)
            .collect()
    }

    /// Uploads the vertices, and the strip indices if the topology needs them.
    pub fn create_buffers(&self, device: &wgpu::Device) -> (wgpu::Buffer, Option<wgpu::Buffer>) {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Line Vertex Buffer"),
            contents: &self.data,
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = self.topology.indices(self.vertex_count).map(|indices| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Line Strip Index Buffer"),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            })
        });

        (vertex_buffer, index_buffer)
    }
}

/// A [`Batcher`] that records every submission in order.
#[derive(Debug, Default)]
pub struct DrawQueue {
    calls: Vec<DrawCall>,
}

impl DrawQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    fn record(&mut self, state: &RenderState, topology: Topology, provider: &AttributeProvider<'_>) {
        self.calls.push(DrawCall {
            state: *state,
            topology,
            layout: provider.layout,
            vertex_count: provider.vertex_count,
            data: provider.data.to_vec(),
        });
    }
}

impl Batcher for DrawQueue {
    fn insert_list_of_strip(
        &mut self,
        state: &RenderState,
        provider: &AttributeProvider<'_>,
        vertices_per_strip: u32,
    ) {
        self.record(state, Topology::ListOfStrip { vertices_per_strip }, provider);
    }

    fn insert_triangle_list(&mut self, state: &RenderState, provider: &AttributeProvider<'_>) {
        self.record(state, Topology::TriangleList, provider);
    }

    fn insert_line_strip(&mut self, state: &RenderState, provider: &AttributeProvider<'_>) {
        self.record(state, Topology::LineStrip, provider);
    }
}
