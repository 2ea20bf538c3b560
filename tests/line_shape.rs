/// Geometry regression tests for line shapes.
///
/// Every canonical scene is drawn into a recording queue and checked against its expected
/// vertex counts and draw calls.
///
/// Run with:   cargo test --test line_shape
use linework::vertex::{CapJoinVertex, DashedLineVertex, LineVertex};
use linework::{
    BuilderKind, DeviceCaps, DrawQueue, GeoPoint, LineShape, LineViewParams, Program, SimpleAtlas,
    Spline, TessellationConfig, Topology,
};
use linework_test_scenes::{build_scenes, check_geometry, SceneEnvironment};

fn corner(params: LineViewParams) -> LineShape {
    let spline: Spline = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)].into_iter().collect();
    LineShape::new(spline.into_shared(), params).unwrap()
}

/// Main regression test: draws every scene and validates its geometry.
#[test]
fn canonical_scene_expectations() {
    let environment = SceneEnvironment::default();
    let mut failures = Vec::new();

    for scene in build_scenes() {
        let mut queue = DrawQueue::new();
        if let Err(error) = scene
            .shape
            .draw(&mut queue, &environment.atlas, &environment.caps)
        {
            failures.push(format!("[{}] draw failed: {}", scene.name, error));
            continue;
        }
        failures.extend(check_geometry(&scene.shape, &queue, &scene.expectation));
    }

    if !failures.is_empty() {
        let message = format!(
            "{} geometry expectation(s) failed:\n{}",
            failures.len(),
            failures.join("\n"),
        );
        panic!("{message}");
    }
}

/// Drawing twice submits the same bytes and never rebuilds the geometry.
#[test]
fn prepare_and_draw_are_idempotent() {
    let environment = SceneEnvironment::default();

    for scene in build_scenes() {
        let first = scene
            .shape
            .prepare(&environment.atlas, &environment.caps)
            .unwrap() as *const _ as *const u8;
        let second = scene
            .shape
            .prepare(&environment.atlas, &environment.caps)
            .unwrap() as *const _ as *const u8;
        assert_eq!(first, second, "{} was rebuilt", scene.name);

        let mut first_queue = DrawQueue::new();
        let mut second_queue = DrawQueue::new();
        scene
            .shape
            .draw(&mut first_queue, &environment.atlas, &environment.caps)
            .unwrap();
        scene
            .shape
            .draw(&mut second_queue, &environment.atlas, &environment.caps)
            .unwrap();

        assert_eq!(first_queue.len(), second_queue.len(), "{}", scene.name);
        for (a, b) in first_queue.calls().iter().zip(second_queue.calls()) {
            assert_eq!(a.data, b.data, "{}", scene.name);
            assert_eq!(a.state, b.state, "{}", scene.name);
        }
    }
}

/// Later calls keep the first builder even if the device would now allow a native line.
#[test]
fn first_prepare_decides_builder() {
    let atlas = SimpleAtlas::new();
    let shape = corner(LineViewParams::default().with_width(2.0));
    shape.prepare(&atlas, &DeviceCaps::default()).unwrap();
    shape.prepare(&atlas, &DeviceCaps::new(8.0)).unwrap();
    assert_eq!(shape.builder_kind(), Some(BuilderKind::Solid));
}

#[test]
fn solid_corner_geometry() {
    let atlas = SimpleAtlas::new();
    let shape = corner(LineViewParams::default().with_width(2.0));
    let mut queue = DrawQueue::new();
    shape.draw(&mut queue, &atlas, &DeviceCaps::default()).unwrap();

    let body: Vec<LineVertex> = queue.calls()[0].vertices();
    let positions: Vec<[f32; 2]> = body
        .iter()
        .map(|vertex| [vertex.position[0], vertex.position[1]])
        .collect();
    assert_eq!(
        positions,
        vec![
            [0.0, 0.0],
            [0.0, 0.0],
            [10.0, 0.0],
            [10.0, 0.0],
            [10.0, 0.0],
            [10.0, 0.0],
            [10.0, 10.0],
            [10.0, 10.0],
        ]
    );
    // right then left, half-width 1
    assert_eq!(body[0].normal, [0.0, -1.0, -1.0]);
    assert_eq!(body[1].normal, [0.0, 1.0, 1.0]);

    let joins: Vec<CapJoinVertex> = queue.calls()[1].vertices();
    assert!(joins.iter().all(|vertex| vertex.position[..2] == [10.0, 0.0]));

    let caps: Vec<CapJoinVertex> = queue.calls()[2].vertices();
    assert_eq!(caps[0].position[..2], [0.0, 0.0]);
    assert_eq!(caps[3].position[..2], [10.0, 10.0]);

    for call in &queue.calls()[1..] {
        assert_eq!(call.state.program, Program::CapJoin);
        assert_eq!(call.state.depth_compare(), linework::wgpu::CompareFunction::Less);
    }
    assert_eq!(queue.calls()[0].state.program, Program::Line);
}

/// Points are moved next to the tile center and scaled into shape coordinates.
#[test]
fn solid_corner_in_scaled_tile() {
    let spline: Spline = [(100.0, 50.0), (110.0, 50.0), (110.0, 60.0)]
        .into_iter()
        .collect();
    let params = LineViewParams::default()
        .with_width(2.0)
        .with_tile_center(GeoPoint::new(100.0, 50.0));
    let shape = LineShape::new(spline.into_shared(), params)
        .unwrap()
        .with_config(TessellationConfig::default().with_shape_coord_scale(4.0));
    let atlas = SimpleAtlas::new();
    let mut queue = DrawQueue::new();
    shape.draw(&mut queue, &atlas, &DeviceCaps::default()).unwrap();

    let body: Vec<LineVertex> = queue.calls()[0].vertices();
    let positions: Vec<[f32; 2]> = body
        .iter()
        .map(|vertex| [vertex.position[0], vertex.position[1]])
        .collect();
    assert_eq!(
        positions,
        vec![
            [0.0, 0.0],
            [0.0, 0.0],
            [40.0, 0.0],
            [40.0, 0.0],
            [40.0, 0.0],
            [40.0, 0.0],
            [40.0, 40.0],
            [40.0, 40.0],
        ]
    );

    let joins: Vec<CapJoinVertex> = queue.calls()[1].vertices();
    assert!(joins.iter().all(|vertex| vertex.position[..2] == [40.0, 0.0]));
    let caps: Vec<CapJoinVertex> = queue.calls()[2].vertices();
    assert_eq!(caps[0].position[..2], [0.0, 0.0]);
    assert_eq!(caps[3].position[..2], [40.0, 40.0]);
}

/// Split points advance by the ground period times the shape scale.
#[test]
fn dashed_corner_in_scaled_tile() {
    let spline: Spline = [(100.0, 50.0), (110.0, 50.0), (110.0, 60.0)]
        .into_iter()
        .collect();
    let params = LineViewParams::default()
        .with_width(2.0)
        .with_pattern([10.0, 5.0])
        .with_tile_center(GeoPoint::new(100.0, 50.0));
    let shape = LineShape::new(spline.into_shared(), params)
        .unwrap()
        .with_config(TessellationConfig::default().with_shape_coord_scale(4.0));
    let atlas = SimpleAtlas::new();
    let mut queue = DrawQueue::new();
    shape.draw(&mut queue, &atlas, &DeviceCaps::default()).unwrap();

    let vertices: Vec<DashedLineVertex> = queue.calls()[0].vertices();
    assert_eq!(vertices.len(), 16);
    let split_points: Vec<[f32; 2]> = vertices
        .chunks(4)
        .map(|quad| [quad[2].position[0], quad[2].position[1]])
        .collect();
    assert_eq!(
        split_points,
        vec![[20.0, 0.0], [40.0, 0.0], [40.0, 20.0], [40.0, 40.0]]
    );
}

#[test]
fn dashed_corner_splits_first_segment_in_two() {
    let atlas = SimpleAtlas::new();
    let shape = corner(
        LineViewParams::default()
            .with_width(2.0)
            .with_pattern([10.0, 5.0]),
    );
    let mut queue = DrawQueue::new();
    shape.draw(&mut queue, &atlas, &DeviceCaps::default()).unwrap();

    assert_eq!(queue.len(), 1);
    let call = &queue.calls()[0];
    assert_eq!(call.state.program, Program::DashedLine);
    assert_eq!(call.state.mask_texture, Some(atlas.stipple_texture()));
    assert_eq!(
        call.topology,
        Topology::ListOfStrip {
            vertices_per_strip: 4
        }
    );

    let vertices: Vec<DashedLineVertex> = call.vertices();
    let first_segment: Vec<f32> = vertices[..8]
        .iter()
        .map(|vertex| vertex.position[0])
        .collect();
    assert_eq!(first_segment, vec![0.0, 0.0, 5.0, 5.0, 5.0, 5.0, 10.0, 10.0]);
    assert!(vertices[8..].iter().all(|vertex| vertex.position[0] == 10.0));

    // every quad spans one full mask period
    for quad in vertices.chunks(4) {
        assert_eq!(quad[0].mask_tex_coords[0], 0.0);
        assert!((quad[2].mask_tex_coords[0] - 5.0 / 15.0).abs() < 1e-6);
    }
}

#[test]
fn coincident_points_draw_nothing() {
    let spline: Spline = [(7.0, 7.0), (7.0, 7.0)].into_iter().collect();
    let atlas = SimpleAtlas::new();
    for params in [
        LineViewParams::default().with_width(1.0),
        LineViewParams::default().with_width(4.0),
        LineViewParams::default().with_pattern([2.0, 2.0]),
    ] {
        let shape = LineShape::new(spline.clone().into_shared(), params).unwrap();
        let mut queue = DrawQueue::new();
        shape.draw(&mut queue, &atlas, &DeviceCaps::default()).unwrap();
        assert!(queue.is_empty());
        let geometry = shape.geometry().unwrap();
        assert_eq!(geometry.line_size(), 0);
        assert_eq!(geometry.join_size(), 0);
        assert_eq!(geometry.cap_size(), 0);
    }
}

/// A shape shared between threads stores exactly one builder.
#[test]
fn concurrent_prepare_shares_one_builder() {
    let atlas = SimpleAtlas::new();
    let shape = corner(LineViewParams::default().with_width(3.0));
    let caps = DeviceCaps::default();

    let builders: Vec<usize> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let atlas = atlas.clone();
                let shape = &shape;
                scope.spawn(move || {
                    shape.prepare(&atlas, &caps).unwrap() as *const _ as *const u8 as usize
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    assert!(builders.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(atlas.color_count(), 1);
}
