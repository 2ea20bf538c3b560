use crate::geometry::GeoPoint;
use std::sync::Arc;

/// An ordered polyline in geographic (ground) coordinates.
///
/// Splines are shared between the shapes of a feature, so they are handed around as
/// [`SharedSpline`] and never mutated once built.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Spline {
    path: Vec<GeoPoint>,
}

pub type SharedSpline = Arc<Spline>;

impl Spline {
    pub fn new(path: Vec<GeoPoint>) -> Self {
        Self { path }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            path: Vec::with_capacity(capacity),
        }
    }

    pub fn add_point(&mut self, point: GeoPoint) {
        self.path.push(point);
    }

    pub fn path(&self) -> &[GeoPoint] {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Sum of segment lengths in ground units.
    pub fn length(&self) -> f64 {
        self.path
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).length())
            .sum()
    }

    pub fn into_shared(self) -> SharedSpline {
        Arc::new(self)
    }
}

impl<P: Into<GeoPoint>> FromIterator<P> for Spline {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}
