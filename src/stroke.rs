use smallvec::SmallVec;

/// How the two ends of an open line are terminated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum LineCap {
    /// The line stops exactly at the end point, no cap geometry is produced.
    Butt,
    /// A disc of the line's half-width centered on the end point.
    #[default]
    Round,
    /// The line is extended by half its width past the end point.
    Square,
}

/// How two consecutive segments are connected at an internal vertex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum LineJoin {
    /// A single triangle closes the gap between the outer corners.
    Bevel,
    /// A disc of the line's half-width centered on the shared vertex.
    #[default]
    Round,
    /// Outer edges are extended until they meet, falling back to a bevel past the miter limit.
    Miter,
}

/// A dash pattern as alternating on/off lengths in pixels.
///
/// An empty pattern means a solid line. Most map styles use two or four entries, so the
/// lengths are stored inline.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct DashPattern(SmallVec<[f32; 4]>);

impl DashPattern {
    pub fn solid() -> Self {
        Self(SmallVec::new())
    }

    pub fn new(lengths: impl IntoIterator<Item = f32>) -> Self {
        Self(lengths.into_iter().collect())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn lengths(&self) -> &[f32] {
        &self.0
    }

    /// Length of one full period of the pattern, in pixels.
    pub fn period(&self) -> f32 {
        self.0.iter().sum()
    }

    /// True if every length is finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.0.iter().all(|length| length.is_finite() && *length > 0.0)
    }
}

impl From<&[f32]> for DashPattern {
    fn from(value: &[f32]) -> Self {
        Self::new(value.iter().copied())
    }
}

impl<const N: usize> From<[f32; N]> for DashPattern {
    fn from(value: [f32; N]) -> Self {
        Self::new(value)
    }
}
