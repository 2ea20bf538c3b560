use linework::{
    BuilderKind, DeviceCaps, GeoPoint, LineCap, LineJoin, LineShape, LineViewParams, SharedSpline,
    SimpleAtlas, Spline,
};

use crate::expectations::GeometryExpectation;

/// A line shape paired with the geometry it must produce.
pub struct Scene {
    pub name: &'static str,
    pub shape: LineShape,
    pub expectation: GeometryExpectation,
}

/// Texture resolver and device caps every scene is prepared with.
pub struct SceneEnvironment {
    pub atlas: SimpleAtlas,
    pub caps: DeviceCaps,
}

impl Default for SceneEnvironment {
    fn default() -> Self {
        Self {
            atlas: SimpleAtlas::new(),
            caps: DeviceCaps::default(),
        }
    }
}

fn spline(points: &[(f64, f64)]) -> SharedSpline {
    points.iter().copied().collect::<Spline>().into_shared()
}

fn scene(
    name: &'static str,
    points: &[(f64, f64)],
    params: LineViewParams,
    expectation: GeometryExpectation,
) -> Scene {
    Scene {
        name,
        shape: LineShape::new(spline(points), params).expect("scene paths have two points"),
        expectation,
    }
}

const CORNER: &[(f64, f64)] = &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)];

/// Builds every canonical scene. The shapes are unprepared.
///
/// Shared between the integration tests and the benchmarks.
pub fn build_scenes() -> Vec<Scene> {
    vec![
        scene_01_solid_corner(),
        scene_02_dashed_corner(),
        scene_03_thin_corner(),
        scene_04_all_points_equal(),
        scene_05_butt_bevel_zigzag(),
        scene_06_square_miter(),
        scene_07_sharp_miter_falls_back(),
        scene_08_trailing_duplicate(),
        scene_09_world_overview(),
        scene_10_dashed_route_in_tile(),
    ]
}

fn scene_01_solid_corner() -> Scene {
    scene(
        "solid_corner",
        CORNER,
        LineViewParams::default().with_width(2.0),
        GeometryExpectation::solid(8, 3, 6, "solid corner"),
    )
}

fn scene_02_dashed_corner() -> Scene {
    // 15 texel mask, split every 5 ground units
    scene(
        "dashed_corner",
        CORNER,
        LineViewParams::default()
            .with_width(2.0)
            .with_pattern([10.0, 5.0]),
        GeometryExpectation::dashed(16, "dashed corner"),
    )
}

fn scene_03_thin_corner() -> Scene {
    scene(
        "thin_corner",
        CORNER,
        LineViewParams::default().with_width(1.0),
        GeometryExpectation::simple(3, "thin corner"),
    )
}

fn scene_04_all_points_equal() -> Scene {
    scene(
        "all_points_equal",
        &[(3.0, 3.0), (3.0, 3.0), (3.0, 3.0)],
        LineViewParams::default().with_width(2.0),
        GeometryExpectation::empty(BuilderKind::Solid, "all points equal"),
    )
}

fn scene_05_butt_bevel_zigzag() -> Scene {
    scene(
        "butt_bevel_zigzag",
        &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (20.0, 10.0)],
        LineViewParams::default()
            .with_width(4.0)
            .with_cap(LineCap::Butt)
            .with_join(LineJoin::Bevel),
        GeometryExpectation::solid(12, 6, 0, "butt bevel zigzag"),
    )
}

fn scene_06_square_miter() -> Scene {
    scene(
        "square_miter",
        CORNER,
        LineViewParams::default()
            .with_width(4.0)
            .with_cap(LineCap::Square)
            .with_join(LineJoin::Miter),
        GeometryExpectation::solid(8, 6, 12, "square miter"),
    )
}

fn scene_07_sharp_miter_falls_back() -> Scene {
    scene(
        "sharp_miter_falls_back",
        &[(0.0, 0.0), (10.0, 0.0), (0.0, 1.0)],
        LineViewParams::default()
            .with_width(4.0)
            .with_join(LineJoin::Miter),
        GeometryExpectation::solid(8, 3, 6, "sharp miter falls back"),
    )
}

fn scene_08_trailing_duplicate() -> Scene {
    scene(
        "trailing_duplicate",
        &[(0.0, 0.0), (10.0, 0.0), (10.0, 0.0), (10.0, 10.0)],
        LineViewParams::default().with_width(2.0),
        GeometryExpectation::solid(8, 3, 6, "trailing duplicate"),
    )
}

fn scene_09_world_overview() -> Scene {
    scene(
        "world_overview",
        CORNER,
        LineViewParams::default().with_width(1.0).with_zoom_level(5),
        GeometryExpectation::solid(8, 3, 6, "world overview"),
    )
}

fn scene_10_dashed_route_in_tile() -> Scene {
    // 12 texel mask at 2 px per unit splits every 2 units: 7 = 2+2+2+1, 10.5 = 1+2+2+2+2+1.5
    scene(
        "dashed_route_in_tile",
        &[(1000.0, 1000.0), (1007.0, 1000.0), (1007.0, 1010.5)],
        LineViewParams::default()
            .with_width(3.0)
            .with_pattern([6.0, 2.0, 2.0, 2.0])
            .with_base_gtop_scale(2.0)
            .with_tile_center(GeoPoint::new(1000.0, 1000.0)),
        GeometryExpectation::dashed(40, "dashed route in tile"),
    )
}
