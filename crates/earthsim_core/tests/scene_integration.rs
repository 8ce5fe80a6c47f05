//! Integration tests for the scene pipeline
//!
//! These tests verify that scene templates, the graph, the view rig and the
//! animation work together:
//! 1. The default scene instantiates into a galaxy group with two bodies
//! 2. The moon's light follows the moon around its orbit
//! 3. View changes move everything inside the galaxy and nothing outside it
//! 4. Dirty flags mark exactly the nodes whose uniforms need updating

use earthsim_core::{
    Animation, GalaxyView, Node, NodeKey, NodeKind, Scene, SceneGraph, Transform, Vec3,
};
use earthsim_input::ViewControl;

const EPSILON: f32 = 1e-2;

fn approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPSILON
}

struct Built {
    graph: SceneGraph,
    galaxy: NodeKey,
    backdrop: NodeKey,
    animation: Animation,
}

/// Instantiate a scene the same way the application does
fn instantiate(scene: &Scene, view: &GalaxyView) -> Built {
    let mut graph = SceneGraph::new();
    let backdrop_template = scene.backdrop.as_ref().expect("scene should have a backdrop");
    let backdrop = graph.add_root(backdrop_template.to_node());
    let galaxy = graph.add_root(Node::group().with_name("galaxy").with_transform(view.transform()));

    let mut animation = Animation::new();
    for body in &scene.bodies {
        let key = graph.add_child(galaxy, body.to_node()).expect("galaxy exists");
        if let Some(light) = body.light_node() {
            graph.add_child(key, light).expect("body exists");
        }
        if body.spin_rate != 0.0 {
            animation.add_track(key, body.spin_rate);
        }
    }

    Built { graph, galaxy, backdrop, animation }
}

fn position_of(graph: &SceneGraph, name: &str) -> Vec3 {
    let (key, _) = graph.find_by_name(name).expect("node should exist");
    graph.world_position(key).expect("key is live")
}

// ==================== Instantiation Tests ====================

#[test]
fn test_default_scene_structure() {
    let built = instantiate(&Scene::earth_moon(), &GalaxyView::default());

    // backdrop, galaxy, earth, moon, moon light
    assert_eq!(built.graph.node_count(), 5);
    assert_eq!(built.graph.roots(), &[built.backdrop, built.galaxy]);
    assert_eq!(built.graph.get(built.galaxy).unwrap().children().len(), 2);
    assert_eq!(built.animation.tracks().len(), 2);

    let spheres = built
        .graph
        .iter()
        .filter(|(_, n)| matches!(n.kind, NodeKind::Sphere { .. }))
        .count();
    assert_eq!(spheres, 2);
}

#[test]
fn test_initial_positions() {
    let built = instantiate(&Scene::earth_moon(), &GalaxyView::default());

    assert!(approx(position_of(&built.graph, "earth"), Vec3::new(700.0, 450.0, 0.0)));
    assert!(approx(position_of(&built.graph, "moon"), Vec3::new(700.0, 450.0, -500.0)));
    assert!(approx(position_of(&built.graph, "backdrop"), Vec3::ZERO));
}

// ==================== Orbit Tests ====================

#[test]
fn test_moon_orbits_and_light_follows() {
    let mut built = instantiate(&Scene::earth_moon(), &GalaxyView::default());

    // Moon turns at 6 deg/s: 15 seconds is a quarter orbit
    for _ in 0..15 {
        built.animation.update(&mut built.graph, 1.0);
    }

    let moon = position_of(&built.graph, "moon");
    assert!(approx(moon, Vec3::new(200.0, 450.0, 0.0)), "moon at {:?}", moon);

    let lights: Vec<_> = built.graph.lights().collect();
    assert_eq!(lights.len(), 1);
    assert!(approx(lights[0].position, moon), "light at {:?}", lights[0].position);

    // Earth spins in place
    assert!(approx(position_of(&built.graph, "earth"), Vec3::new(700.0, 450.0, 0.0)));
}

#[test]
fn test_paused_animation_keeps_positions() {
    let mut built = instantiate(&Scene::earth_moon(), &GalaxyView::default());
    built.graph.clear_all_dirty();
    built.animation.toggle_pause();

    built.animation.update(&mut built.graph, 10.0);

    assert!(!built.graph.has_dirty_nodes());
    assert!(approx(position_of(&built.graph, "moon"), Vec3::new(700.0, 450.0, -500.0)));
}

// ==================== View Tests ====================

#[test]
fn test_view_depth_moves_galaxy_only() {
    let mut view = GalaxyView::default();
    let mut built = instantiate(&Scene::earth_moon(), &view);
    built.graph.clear_all_dirty();

    view.adjust_depth(300.0);
    assert!(built.graph.set_transform(built.galaxy, view.transform()));

    assert!(approx(position_of(&built.graph, "earth"), Vec3::new(700.0, 450.0, 300.0)));
    assert!(approx(position_of(&built.graph, "backdrop"), Vec3::ZERO));

    // galaxy, earth, moon, light
    assert_eq!(built.graph.dirty_nodes().count(), 4);
    assert!(!built.graph.get(built.backdrop).unwrap().is_dirty());
}

#[test]
fn test_view_rotation_swings_moon() {
    let mut view = GalaxyView::default();
    let mut built = instantiate(&Scene::earth_moon(), &view);

    view.set_drag_angles(0.0, 90.0);
    built.graph.set_transform(built.galaxy, view.transform());

    // The moon sits 500 in front of the pivot; a quarter turn about Y
    // swings it to the left of the rig center
    let moon = position_of(&built.graph, "moon");
    assert!(approx(moon, Vec3::new(200.0, 450.0, 0.0)), "moon at {:?}", moon);
}

#[test]
fn test_saved_scene_instantiates_identically() {
    let scene = Scene::earth_moon();
    let path = std::env::temp_dir().join(format!("earthsim_scene_{}.ron", std::process::id()));
    scene.save(&path).unwrap();
    let loaded = Scene::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let a = instantiate(&scene, &GalaxyView::default());
    let b = instantiate(&loaded, &GalaxyView::default());
    assert_eq!(a.graph.node_count(), b.graph.node_count());
    assert!(approx(position_of(&a.graph, "moon"), position_of(&b.graph, "moon")));
}

#[test]
fn test_transform_identity_light_sits_at_body_center() {
    let mut graph = SceneGraph::new();
    let body = graph.add_root(
        Node::group().with_transform(
            Transform::from_translation(Vec3::new(1.0, 2.0, 3.0)).with_offset(Vec3::new(0.0, 0.0, 10.0)),
        ),
    );
    graph.add_child(body, Node::point_light([1.0; 3])).unwrap();

    let light = graph.lights().next().unwrap();
    assert!(approx(light.position, Vec3::new(1.0, 2.0, 13.0)));
}
