use bytemuck::Pod;
use tracing::warn;

/// A vertex buffer filled in a single pass after reserving its expected size.
///
/// Builders derive the reservation from the point count before tessellating. Pushing past it
/// still works but means the estimate was wrong and the hot loop reallocated, so it is reported
/// once per buffer.
#[derive(Clone, Debug)]
pub(crate) struct ReservedBuffer<V> {
    label: &'static str,
    vertices: Vec<V>,
    reserved: usize,
    overflow_reported: bool,
}

impl<V: Pod> ReservedBuffer<V> {
    pub(crate) fn with_reserved(label: &'static str, reserved: usize) -> Self {
        Self {
            label,
            vertices: Vec::with_capacity(reserved),
            reserved,
            overflow_reported: false,
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, vertex: V) {
        if self.vertices.len() == self.reserved && !self.overflow_reported {
            warn!(
                "{} buffer grew past its reservation of {} vertices",
                self.label, self.reserved
            );
            self.overflow_reported = true;
        }
        self.vertices.push(vertex);
    }

    pub(crate) fn len(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub(crate) fn vertices(&self) -> &[V] {
        &self.vertices
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// True if the buffer never outgrew its reservation.
    pub(crate) fn within_reservation(&self) -> bool {
        self.vertices.len() <= self.reserved
    }
}
