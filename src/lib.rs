pub use lyon;
pub use wgpu;

mod atlas;
mod batch;
mod buffer;
pub mod builder;
mod color;
mod config;
mod error;
mod geometry;
mod id;
mod line_shape;
mod render_state;
mod spline;
mod stroke;
mod texture;
mod texture_coords;
pub mod vertex;

pub use atlas::{
    rasterize_stipple, SimpleAtlas, COLOR_ATLAS_SIZE, STIPPLE_ATLAS_HEIGHT, STIPPLE_ATLAS_WIDTH,
};
pub use batch::{AttributeProvider, Batcher, DrawCall, DrawQueue, Topology};
pub use builder::{BuilderKind, LineGeometry, TessellationStrategy};
pub use color::Color;
pub use config::{DeviceCaps, TessellationConfig};
pub use error::{LineShapeError, TextureError};
pub use geometry::{equal_dx_dy, to_shape_vertex, GeoPoint, SegmentFrame};
pub use id::TextureId;
pub use line_shape::{LineShape, LineViewParams};
pub use render_state::{DepthLayer, Program, RenderState};
pub use spline::{SharedSpline, Spline};
pub use stroke::{DashPattern, LineCap, LineJoin};
pub use texture::{ColorRegion, StippleRegion, TexRect, TextureResolver};
pub use texture_coords::TextureCoordGenerator;
