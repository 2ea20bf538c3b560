pub mod expectations;
pub mod scene;

pub use expectations::{check_geometry, GeometryExpectation};
pub use scene::{build_scenes, Scene, SceneEnvironment};
