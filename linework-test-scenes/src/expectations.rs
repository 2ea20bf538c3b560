use linework::{BuilderKind, DrawQueue, LineShape, Topology};

/// What a prepared line shape is expected to produce.
pub struct GeometryExpectation {
    pub kind: BuilderKind,
    pub line_vertices: u32,
    pub join_vertices: u32,
    pub cap_vertices: u32,
    /// Human-readable label for failure messages.
    pub label: &'static str,
}

impl GeometryExpectation {
    pub fn new(
        kind: BuilderKind,
        line_vertices: u32,
        join_vertices: u32,
        cap_vertices: u32,
        label: &'static str,
    ) -> Self {
        Self {
            kind,
            line_vertices,
            join_vertices,
            cap_vertices,
            label,
        }
    }

    /// Convenience: a native line with one vertex per point.
    pub fn simple(points: u32, label: &'static str) -> Self {
        Self::new(BuilderKind::Simple, points, 0, 0, label)
    }

    pub fn solid(line: u32, joins: u32, caps: u32, label: &'static str) -> Self {
        Self::new(BuilderKind::Solid, line, joins, caps, label)
    }

    /// Dashed lines never have joins or caps.
    pub fn dashed(line: u32, label: &'static str) -> Self {
        Self::new(BuilderKind::Dashed, line, 0, 0, label)
    }

    /// Convenience: a shape that draws nothing.
    pub fn empty(kind: BuilderKind, label: &'static str) -> Self {
        Self::new(kind, 0, 0, 0, label)
    }

    /// Draw calls in submission order.
    pub fn topologies(&self) -> Vec<Topology> {
        if self.line_vertices == 0 {
            return Vec::new();
        }
        if self.kind == BuilderKind::Simple {
            return vec![Topology::LineStrip];
        }

        let mut topologies = vec![Topology::ListOfStrip {
            vertices_per_strip: 4,
        }];
        if self.join_vertices > 0 {
            topologies.push(Topology::TriangleList);
        }
        if self.cap_vertices > 0 {
            topologies.push(Topology::TriangleList);
        }
        topologies
    }
}

/// Validates a drawn shape and the calls it recorded into `queue`.
///
/// Returns a list of human-readable failure descriptions. An empty list means the shape
/// matched the expectation.
pub fn check_geometry(
    shape: &LineShape,
    queue: &DrawQueue,
    expectation: &GeometryExpectation,
) -> Vec<String> {
    let label = expectation.label;
    let Some(geometry) = shape.geometry() else {
        return vec![format!("[{}] shape was never prepared", label)];
    };

    let mut failures = Vec::new();
    if geometry.kind() != expectation.kind {
        failures.push(format!(
            "[{}] expected a {:?} builder but got {:?}",
            label,
            expectation.kind,
            geometry.kind()
        ));
    }

    let counts = [
        ("line", geometry.line_size(), expectation.line_vertices),
        ("join", geometry.join_size(), expectation.join_vertices),
        ("cap", geometry.cap_size(), expectation.cap_vertices),
    ];
    for (buffer, actual, expected) in counts {
        if actual != expected {
            failures.push(format!(
                "[{}] expected {} {} vertices but got {}",
                label, expected, buffer, actual
            ));
        }
    }

    if !geometry.fits_reservation() {
        failures.push(format!("[{}] a buffer outgrew its reservation", label));
    }

    let topologies: Vec<Topology> = queue.calls().iter().map(|call| call.topology).collect();
    let expected_topologies = expectation.topologies();
    if topologies != expected_topologies {
        failures.push(format!(
            "[{}] expected draw calls {:?} but got {:?}",
            label, expected_topologies, topologies
        ));
    }

    for (index, call) in queue.calls().iter().enumerate() {
        let expected_len = call.layout.array_stride as usize * call.vertex_count as usize;
        if call.data.len() != expected_len {
            failures.push(format!(
                "[{}] draw call {} has {} bytes for {} vertices of stride {}",
                label,
                index,
                call.data.len(),
                call.vertex_count,
                call.layout.array_stride
            ));
        }
    }

    failures
}
