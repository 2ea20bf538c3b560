use super::{
    BaseLineBuilder, BuilderKind, BuilderParams, LineGeometry, TessellationInput,
    TessellationStrategy,
};
use crate::config::TessellationConfig;
use crate::geometry::{side, SegmentFrame};
use crate::render_state::{Program, RenderState};
use crate::texture::StippleRegion;
use crate::texture_coords::TextureCoordGenerator;
use crate::vertex::{DashedLineVertex, DASHED_LINE_VERTEX_LAYOUT};
use lyon::math::{Point, Vector};
use tracing::{trace, warn};

/// Remainders shorter than this share of the split length are merged into the previous quad.
const SPLIT_TOLERANCE: f64 = 1.0e-6;

/// Parameters of a dashed line on top of the shared [`BuilderParams`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DashedBuilderParams {
    pub base: BuilderParams,
    pub stipple: StippleRegion,
    /// Ground-to-pixel scale of the zoom level the geometry is built for.
    pub base_gtop_scale: f32,
}

/// Dashed lines expanded into quads that each lie within one period of the dash mask.
///
/// The builder keeps a running offset along the path. A segment that would run past the end of
/// the current mask period is split at the boundary and the offset starts over, so the mask
/// coordinate interpolated across any quad never wraps.
#[derive(Clone, Debug)]
pub struct DashedLineBuilder {
    base: BaseLineBuilder<DashedLineVertex>,
    tex_coord_gen: TextureCoordGenerator,
    base_gtop_scale: f32,
    dash_quality_factor: f32,
}

impl DashedLineBuilder {
    /// `ground_length` is the length of the whole path and sizes the body buffer together with
    /// the point count.
    pub fn new(
        params: DashedBuilderParams,
        points_in_spline: usize,
        ground_length: f64,
        config: &TessellationConfig,
    ) -> Self {
        let tex_coord_gen = TextureCoordGenerator::new(params.stipple);
        let mask_length_g =
            tex_coord_gen.mask_length() / params.base_gtop_scale / config.dash_quality_factor;
        let splits = if mask_length_g > 0.0 {
            (ground_length / mask_length_g as f64).ceil() as usize
        } else {
            0
        };
        // One quad per segment and per period boundary, with one more per segment for a
        // boundary that falls within rounding distance of a segment end.
        let segments = points_in_spline.saturating_sub(1);
        let quads = 2 * segments + splits + 1;

        Self {
            base: BaseLineBuilder::new(params.base, quads * 4),
            tex_coord_gen,
            base_gtop_scale: params.base_gtop_scale,
            dash_quality_factor: config.dash_quality_factor,
        }
    }

    /// Length of one mask period in ground units at the base scale.
    pub fn mask_length_g(&self) -> f32 {
        self.tex_coord_gen.mask_length() / self.base_gtop_scale
    }

    /// Period the path is split at. Geometry is built once for the coarsest scale of a tile and
    /// must still be correct when the tile is shown at finer scales.
    pub fn split_length_g(&self) -> f32 {
        self.mask_length_g() / self.dash_quality_factor
    }

    pub fn vertices(&self) -> &[DashedLineVertex] {
        self.base.geometry.vertices()
    }

    fn submit_vertex(&mut self, pivot: Point, normal: Vector, is_left: bool, offset: f32) {
        let half_width = self.base.half_width();
        let normal = normal * half_width;
        self.base.geometry.push(DashedLineVertex {
            position: [pivot.x, pivot.y, self.base.params.depth],
            normal: [normal.x, normal.y, half_width * side(is_left)],
            color_tex_coords: self.base.color_coords,
            mask_tex_coords: self.tex_coord_gen.tex_coords_by_distance(offset, is_left),
        });
    }

    fn submit_quad(
        &mut self,
        frame: &SegmentFrame,
        (start, start_offset): (Point, f32),
        (end, end_offset): (Point, f32),
    ) {
        self.submit_vertex(start, frame.right_normal, false, start_offset);
        self.submit_vertex(start, frame.left_normal, true, start_offset);
        self.submit_vertex(end, frame.right_normal, false, end_offset);
        self.submit_vertex(end, frame.left_normal, true, end_offset);
    }
}

impl LineGeometry for DashedLineBuilder {
    fn layout(&self) -> &'static wgpu::VertexBufferLayout<'static> {
        &DASHED_LINE_VERTEX_LAYOUT
    }

    fn state(&self) -> RenderState {
        self.base
            .base_state(Program::DashedLine)
            .with_mask_texture(self.tex_coord_gen.region().texture)
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

impl TessellationStrategy for DashedLineBuilder {
    fn kind(&self) -> BuilderKind {
        BuilderKind::Dashed
    }

    fn construct(&mut self, input: &TessellationInput<'_>) {
        let path = input.path;
        let to_shape_factor = input.config.shape_coord_scale as f64;
        let split = self.split_length_g() as f64;
        if !(split.is_finite() && split > 0.0) {
            warn!("dashed line split length {} is not positive, nothing is tessellated", split);
            return;
        }
        let tolerance = split * SPLIT_TOLERANCE;

        let mut offset = 0.0_f64;
        for i in 1..path.len() {
            if input.is_degenerate(path[i], path[i - 1]) {
                trace!("skipping degenerate segment {} of a dashed line", i);
                continue;
            }

            let p1 = input.shape_vertex(path[i - 1]);
            let p2 = input.shape_vertex(path[i]);
            if p1 == p2 {
                continue;
            }
            let frame = SegmentFrame::new(p1, p2);
            let segment_length = (path[i] - path[i - 1]).length();

            // Every quad but the last ends on a period boundary.
            let quads = ((offset + segment_length) / split).floor() as usize + 1;
            let mut drawn = 0.0_f64;
            let mut curr_pivot = p1;
            for quad in 1..=quads {
                let rest = segment_length - drawn;
                let room = split - offset;
                if quad == quads || rest <= room + tolerance {
                    // Most segments fit into the rest of the current period.
                    let end_offset = (offset + rest).min(split);
                    self.submit_quad(
                        &frame,
                        (curr_pivot, offset as f32),
                        (p2, end_offset as f32),
                    );
                    offset = if end_offset >= split - tolerance {
                        0.0
                    } else {
                        end_offset
                    };
                    break;
                }

                drawn += room;
                let next_pivot = p1 + frame.tangent * ((drawn * to_shape_factor) as f32);
                self.submit_quad(
                    &frame,
                    (curr_pivot, offset as f32),
                    (next_pivot, split as f32),
                );
                curr_pivot = next_pivot;
                offset = 0.0;
            }
        }
    }
}
