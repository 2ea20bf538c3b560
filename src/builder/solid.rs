use super::{
    BaseLineBuilder, BuilderKind, BuilderParams, LineGeometry, TessellationInput,
    TessellationStrategy,
};
use crate::buffer::ReservedBuffer;
use crate::config::TessellationConfig;
use crate::geometry::{side, SegmentFrame};
use crate::render_state::{Program, RenderState};
use crate::stroke::{LineCap, LineJoin};
use crate::vertex::{CapJoinVertex, LineVertex, LINE_VERTEX_LAYOUT};
use lyon::math::{Point, Vector};
use tracing::trace;

const SQRT_3: f32 = 1.732_050_8;

/// Solid lines expanded into quads on the CPU.
///
/// Each non-degenerate segment becomes a 4-vertex strip; the vertex stage pushes every vertex
/// half the line width along its normal. Joins and caps go to their own triangle lists so the
/// batcher can draw them with a different program and depth function.
#[derive(Clone, Debug)]
pub struct SolidLineBuilder {
    base: BaseLineBuilder<LineVertex>,
    cap_geometry: ReservedBuffer<CapJoinVertex>,
    join_geometry: ReservedBuffer<CapJoinVertex>,
    join_generation_threshold: f32,
    miter_limit: f32,
    round_cap_scale: f32,
    round_join_scale: f32,
}

impl SolidLineBuilder {
    pub fn new(
        params: BuilderParams,
        points_in_spline: usize,
        config: &TessellationConfig,
    ) -> Self {
        let segments = points_in_spline.saturating_sub(1);
        let joins = points_in_spline.saturating_sub(2);
        let join_vertices = match params.join {
            LineJoin::Round | LineJoin::Bevel => 3,
            LineJoin::Miter => 6,
        };
        let cap_vertices = match params.cap {
            LineCap::Butt => 0,
            LineCap::Round => 3,
            LineCap::Square => 6,
        };

        Self {
            base: BaseLineBuilder::new(params, segments * 4),
            cap_geometry: ReservedBuffer::with_reserved("cap", cap_vertices * 2),
            join_geometry: ReservedBuffer::with_reserved("join", joins * join_vertices),
            join_generation_threshold: config.join_generation_threshold,
            miter_limit: config.miter_limit,
            round_cap_scale: config.round_cap_scale,
            round_join_scale: config.round_join_scale,
        }
    }

    pub fn vertices(&self) -> &[LineVertex] {
        self.base.geometry.vertices()
    }

    pub fn join_vertices(&self) -> &[CapJoinVertex] {
        self.join_geometry.vertices()
    }

    pub fn cap_vertices(&self) -> &[CapJoinVertex] {
        self.cap_geometry.vertices()
    }

    fn submit_vertex(&mut self, pivot: Point, normal: Vector, is_left: bool) {
        let vertex = LineVertex::new(
            pivot,
            self.base.params.depth,
            normal,
            self.base.half_width(),
            side(is_left),
            self.base.color_coords,
        );
        self.base.geometry.push(vertex);
    }

    fn submit_join(&mut self, pivot: Point, prev: &SegmentFrame, next: &SegmentFrame) {
        match self.base.params.join {
            LineJoin::Round => self.create_round_cap(pivot, false),
            LineJoin::Bevel => self.create_bevel_join(pivot, prev, next, false),
            LineJoin::Miter => self.create_bevel_join(pivot, prev, next, true),
        }
    }

    /// `outward` points away from the line, along the first or last segment.
    fn submit_cap(&mut self, pivot: Point, frame: &SegmentFrame, outward: Vector) {
        match self.base.params.cap {
            LineCap::Butt => {}
            LineCap::Round => self.create_round_cap(pivot, true),
            LineCap::Square => self.create_square_cap(pivot, frame, outward),
        }
    }

    // An equilateral triangle whose incircle is the disc; the fragment stage clips to the circle.
    fn create_round_cap(&mut self, pivot: Point, is_cap: bool) {
        let size = if is_cap {
            self.round_cap_scale
        } else {
            self.round_join_scale
        };
        let radius = self.base.half_width();
        let depth = self.base.params.depth;
        let color = self.base.color_coords;
        let bucket = if is_cap {
            &mut self.cap_geometry
        } else {
            &mut self.join_geometry
        };

        let r = radius * size;
        bucket.push(CapJoinVertex::new(pivot, depth, [-r * SQRT_3, -r, r], color));
        bucket.push(CapJoinVertex::new(pivot, depth, [r * SQRT_3, -r, r], color));
        bucket.push(CapJoinVertex::new(pivot, depth, [0.0, 2.0 * r, r], color));
    }

    fn create_square_cap(&mut self, pivot: Point, frame: &SegmentFrame, outward: Vector) {
        let half_width = self.base.half_width();
        let depth = self.base.params.depth;
        let color = self.base.color_coords;
        let corner = |normal: Vector, is_left: bool, extended: bool| {
            let offset = if extended {
                (normal + outward) * half_width
            } else {
                normal * half_width
            };
            CapJoinVertex::new(
                pivot,
                depth,
                [offset.x, offset.y, half_width * side(is_left)],
                color,
            )
        };

        let left = corner(frame.left_normal, true, false);
        let right = corner(frame.right_normal, false, false);
        let left_far = corner(frame.left_normal, true, true);
        let right_far = corner(frame.right_normal, false, true);

        for vertex in [left, right, left_far, left_far, right, right_far] {
            self.cap_geometry.push(vertex);
        }
    }

    /// Fills the wedge on the outer side of the turn, plus the miter tip if requested and the
    /// tip stays within the miter limit.
    fn create_bevel_join(
        &mut self,
        pivot: Point,
        prev: &SegmentFrame,
        next: &SegmentFrame,
        with_miter: bool,
    ) {
        let half_width = self.base.half_width();
        let depth = self.base.params.depth;
        let color = self.base.color_coords;

        // A left turn opens the gap on the right side and vice versa.
        let outer_is_left = prev.tangent.cross(next.tangent) < 0.0;
        let outer_side = half_width * side(outer_is_left);
        let n1 = prev.normal(outer_is_left) * half_width;
        let n2 = next.normal(outer_is_left) * half_width;

        let center = CapJoinVertex::new(pivot, depth, [0.0, 0.0, 0.0], color);
        let first = CapJoinVertex::new(pivot, depth, [n1.x, n1.y, outer_side], color);
        let second = CapJoinVertex::new(pivot, depth, [n2.x, n2.y, outer_side], color);

        let tip = if with_miter {
            self.miter_tip(prev, next, outer_is_left)
                .map(|tip| CapJoinVertex::new(pivot, depth, [tip.x, tip.y, outer_side], color))
        } else {
            None
        };

        for vertex in [center, first, second] {
            self.join_geometry.push(vertex);
        }
        if let Some(tip) = tip {
            for vertex in [first, tip, second] {
                self.join_geometry.push(vertex);
            }
        }
    }

    fn miter_tip(
        &self,
        prev: &SegmentFrame,
        next: &SegmentFrame,
        outer_is_left: bool,
    ) -> Option<Vector> {
        let n1 = prev.normal(outer_is_left);
        let bisector = n1 + next.normal(outer_is_left);
        if bisector.square_length() <= f32::EPSILON {
            return None;
        }
        let direction = bisector.normalize();
        let cos_half_angle = direction.dot(n1);
        if cos_half_angle <= 0.0 || 1.0 / cos_half_angle > self.miter_limit {
            return None;
        }
        Some(direction * (self.base.half_width() / cos_half_angle))
    }

    fn cap_join_state(&self, round: bool) -> RenderState {
        let program = if round { Program::CapJoin } else { Program::Line };
        self.base
            .base_state(program)
            .with_depth_function(wgpu::CompareFunction::Less)
    }
}

impl LineGeometry for SolidLineBuilder {
    fn layout(&self) -> &'static wgpu::VertexBufferLayout<'static> {
        &LINE_VERTEX_LAYOUT
    }

    fn state(&self) -> RenderState {
        self.base.base_state(Program::Line)
    }

    fn line_data(&self) -> &[u8] {
        self.base.geometry.as_bytes()
    }

    fn line_size(&self) -> u32 {
        self.base.geometry.len()
    }

    fn cap_state(&self) -> RenderState {
        match self.base.params.cap {
            LineCap::Butt => self.state(),
            LineCap::Round => self.cap_join_state(true),
            LineCap::Square => self.cap_join_state(false),
        }
    }

    fn join_state(&self) -> RenderState {
        self.cap_join_state(self.base.params.join == LineJoin::Round)
    }

    fn cap_data(&self) -> &[u8] {
        self.cap_geometry.as_bytes()
    }

    fn cap_size(&self) -> u32 {
        self.cap_geometry.len()
    }

    fn join_data(&self) -> &[u8] {
        self.join_geometry.as_bytes()
    }

    fn join_size(&self) -> u32 {
        self.join_geometry.len()
    }

    fn fits_reservation(&self) -> bool {
        self.base.geometry.within_reservation()
            && self.cap_geometry.within_reservation()
            && self.join_geometry.within_reservation()
    }
}

impl TessellationStrategy for SolidLineBuilder {
    fn kind(&self) -> BuilderKind {
        BuilderKind::Solid
    }

    fn construct(&mut self, input: &TessellationInput<'_>) {
        let path = input.path;
        let generate_joins = self.base.half_width() > self.join_generation_threshold;

        let mut first: Option<(Point, SegmentFrame)> = None;
        let mut last: Option<(Point, SegmentFrame)> = None;
        for i in 1..path.len() {
            if input.is_degenerate(path[i], path[i - 1]) {
                trace!("skipping degenerate segment {} of a solid line", i);
                continue;
            }

            let p1 = input.shape_vertex(path[i - 1]);
            let p2 = input.shape_vertex(path[i]);
            if p1 == p2 {
                continue;
            }
            let frame = SegmentFrame::new(p1, p2);

            if generate_joins {
                if let Some((_, prev)) = last {
                    self.submit_join(p1, &prev, &frame);
                }
            }

            self.submit_vertex(p1, frame.right_normal, false);
            self.submit_vertex(p1, frame.left_normal, true);
            self.submit_vertex(p2, frame.right_normal, false);
            self.submit_vertex(p2, frame.left_normal, true);

            first.get_or_insert((p1, frame));
            last = Some((p2, frame));
        }

        if let (Some((start, start_frame)), Some((end, end_frame))) = (first, last) {
            self.submit_cap(start, &start_frame, -start_frame.tangent);
            self.submit_cap(end, &end_frame, end_frame.tangent);
        } else {
            trace!("solid line of {} points has no drawable segments", path.len());
        }
    }
}
