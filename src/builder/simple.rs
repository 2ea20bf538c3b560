use super::{
    BaseLineBuilder, BuilderKind, BuilderParams, LineGeometry, TessellationInput,
    TessellationStrategy,
};
use crate::geometry::GeoPoint;
use crate::render_state::{Program, RenderState};
use crate::vertex::{AreaVertex, AREA_VERTEX_LAYOUT};
use tracing::trace;

/// Thin lines drawn with the native line primitive.
///
/// Every path point becomes one vertex, in order, so the batcher can submit the buffer as a
/// single line strip. Width is only a hint to the rasterizer.
#[derive(Clone, Debug)]
pub struct SimpleLineBuilder {
    base: BaseLineBuilder<AreaVertex>,
    line_width: u32,
}

impl SimpleLineBuilder {
    pub fn new(params: BuilderParams, points_in_spline: usize, line_width: u32) -> Self {
        Self {
            base: BaseLineBuilder::new(params, points_in_spline),
            line_width,
        }
    }

    pub fn vertices(&self) -> &[AreaVertex] {
        self.base.geometry.vertices()
    }

    fn submit_vertex(&mut self, input: &TessellationInput<'_>, point: GeoPoint) {
        let vertex = AreaVertex::new(
            input.shape_vertex(point),
            self.base.params.depth,
            self.base.color_coords,
        );
        self.base.geometry.push(vertex);
    }
}

impl LineGeometry for SimpleLineBuilder {
    fn layout(&self) -> &'static wgpu::VertexBufferLayout<'static> {
        &AREA_VERTEX_LAYOUT
    }

    fn state(&self) -> RenderState {
        self.base
            .base_state(Program::AreaOutline)
            .with_line(self.line_width)
    }

    fn line_data(&self) -> &[u8] {
        self.base.geometry.as_bytes()
    }

    fn line_size(&self) -> u32 {
        self.base.geometry.len()
    }

    fn fits_reservation(&self) -> bool {
        self.base.geometry.within_reservation()
    }
}

impl TessellationStrategy for SimpleLineBuilder {
    fn kind(&self) -> BuilderKind {
        BuilderKind::Simple
    }

    fn construct(&mut self, input: &TessellationInput<'_>) {
        let path = input.path;
        let has_segments = path
            .windows(2)
            .any(|pair| !input.is_degenerate(pair[0], pair[1]));
        if !has_segments {
            trace!("all {} points of a simple line coincide", path.len());
            return;
        }

        for &point in path {
            self.submit_vertex(input, point);
        }
    }
}
