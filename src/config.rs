//! Tuning constants for tessellation and the platform facts that feed the simplification
//! heuristic.
//!
//! Both structs are plain values with a `Default` and chainable setters. A renderer usually
//! builds one [`TessellationConfig`] and one [`DeviceCaps`] at startup and passes references to
//! every [`LineShape`](crate::LineShape) it prepares.

/// Tessellation tuning shared by every line shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TessellationConfig {
    /// Consecutive points closer than this on both axes form a degenerate segment.
    pub point_accuracy: f64,
    /// Divides the ground length of a dash mask so one mask period is never stretched across
    /// more than the target tile granularity. 2 would be the theoretical value; 3 removes the
    /// remaining artifacts at high visual scales.
    pub dash_quality_factor: f32,
    /// Upper bound, in pixels, of a line width that may be drawn with native line primitives.
    pub max_simplified_width: f32,
    /// Zoom levels in `1..=upper_country_scale` show world overviews and are never simplified.
    pub upper_country_scale: i32,
    /// Factor from ground units to tile-local shape coordinates.
    pub shape_coord_scale: f32,
    /// Joins are only generated for lines whose half-width in pixels is above this value.
    pub join_generation_threshold: f32,
    /// Maximum ratio of miter length to half-width before a miter join becomes a bevel.
    pub miter_limit: f32,
    /// Size of the incircle triangle relative to the half-width for round caps.
    pub round_cap_scale: f32,
    /// Size of the incircle triangle relative to the half-width for round joins.
    pub round_join_scale: f32,
    /// Most mask periods a dashed line may be split into before `prepare` refuses it.
    pub max_dash_splits: usize,
}

impl Default for TessellationConfig {
    fn default() -> Self {
        Self {
            point_accuracy: 1.0e-5,
            dash_quality_factor: 3.0,
            max_simplified_width: 2.5,
            upper_country_scale: 10,
            shape_coord_scale: 1.0,
            join_generation_threshold: 0.0,
            miter_limit: 4.0,
            round_cap_scale: 2.0,
            round_join_scale: 1.6,
            max_dash_splits: 1 << 18,
        }
    }
}

impl TessellationConfig {
    pub fn with_point_accuracy(mut self, point_accuracy: f64) -> Self {
        self.point_accuracy = point_accuracy;
        self
    }

    pub fn with_dash_quality_factor(mut self, factor: f32) -> Self {
        self.dash_quality_factor = factor;
        self
    }

    pub fn with_shape_coord_scale(mut self, scale: f32) -> Self {
        self.shape_coord_scale = scale;
        self
    }

    pub fn with_join_generation_threshold(mut self, threshold: f32) -> Self {
        self.join_generation_threshold = threshold;
        self
    }

    pub fn with_miter_limit(mut self, miter_limit: f32) -> Self {
        self.miter_limit = miter_limit;
        self
    }

    pub fn with_max_dash_splits(mut self, max_dash_splits: usize) -> Self {
        self.max_dash_splits = max_dash_splits;
        self
    }

    pub fn with_upper_country_scale(mut self, zoom_level: i32) -> Self {
        self.upper_country_scale = zoom_level;
        self
    }

    /// Width threshold for simplified lines on a device.
    pub(crate) fn simplified_width(&self, caps: &DeviceCaps) -> f32 {
        self.max_simplified_width.min(caps.max_line_width)
    }
}

/// Facts reported by the graphics platform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeviceCaps {
    /// Widest line, in device pixels, the native line primitive can rasterize.
    pub max_line_width: f32,
}

impl Default for DeviceCaps {
    /// wgpu only rasterizes one pixel wide line primitives.
    fn default() -> Self {
        Self {
            max_line_width: 1.0,
        }
    }
}

impl DeviceCaps {
    pub fn new(max_line_width: f32) -> Self {
        Self { max_line_width }
    }
}
