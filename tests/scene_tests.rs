//! Scene graph tests
//!
//! Tests for:
//! - Composition order, parent resolution and all-or-nothing failure
//! - Name uniqueness and cycle rejection
//! - World transform propagation
//! - Subtree merging: counts, material slots, re-parenting of non-mesh nodes
//! - Shared and varied appearances
//! - Recipes

use forge::core::random::seeded;
use forge::core::{ErrorKind, ForgeError};
use forge::resources::primitives::{SphereOptions, create_cube, create_sphere};
use forge::resources::{ColorVariance, Material};
use forge::scene::{
    Appearance, Light, NodeContent, NodeDesc, Part, PartLink, Recipe, Scene, compose, merge_subtree,
};
use glam::{Vec3, Vec4};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() < EPSILON
}

fn cube(name: &str, location: Vec3) -> NodeDesc {
    NodeDesc::mesh(name, create_cube(Vec3::splat(0.2)).location(location).build().unwrap())
}

fn root(desc: NodeDesc) -> Part {
    (desc, None)
}

fn child(desc: NodeDesc, parent: &str) -> Part {
    (desc, Some(parent.to_string()))
}

fn world_position(scene: &Scene, name: &str) -> Vec3 {
    let handle = scene.node_by_name(name).unwrap();
    scene.compute_world_matrix(handle).unwrap().translation.into()
}

// ============================================================================
// Compose
// ============================================================================

#[test]
fn compose_returns_handles_in_order() {
    let mut scene = Scene::new();
    let mut rng = seeded(1);
    let handles = compose(
        &mut scene,
        vec![
            root(cube("Torso", Vec3::new(0.0, 0.0, 1.0))),
            child(cube("Head", Vec3::new(0.0, 0.0, 0.6)), "Torso"),
            child(cube("Arm_L", Vec3::new(-0.3, 0.0, 0.2)), "Torso"),
        ],
        &mut rng,
    )
    .unwrap();

    assert_eq!(handles.len(), 3);
    let names: Vec<&str> = handles
        .iter()
        .map(|&h| scene.get_node(h).unwrap().name())
        .collect();
    assert_eq!(names, ["Torso", "Head", "Arm_L"]);

    let torso = scene.get_node(handles[0]).unwrap();
    assert_eq!(torso.children(), &handles[1..]);
    assert_eq!(scene.root_nodes(), &[handles[0]]);
}

#[test]
fn compose_resolves_parents_already_in_scene() {
    let mut scene = Scene::new();
    let mut rng = seeded(1);
    compose(&mut scene, vec![root(NodeDesc::empty("Rig"))], &mut rng).unwrap();
    let handles = compose(&mut scene, vec![child(cube("Body", Vec3::ZERO), "Rig")], &mut rng).unwrap();

    let rig = scene.node_by_name("Rig").unwrap();
    assert_eq!(scene.get_node(handles[0]).unwrap().parent(), Some(rig));
}

#[test]
fn missing_parent_inserts_nothing() {
    let mut scene = Scene::new();
    let mut rng = seeded(1);
    let err = compose(
        &mut scene,
        vec![
            root(cube("Torso", Vec3::ZERO)),
            child(cube("Hand", Vec3::ZERO), "Arm"),
        ],
        &mut rng,
    )
    .unwrap_err();

    assert!(matches!(err, ForgeError::MissingParent { ref part, ref parent } if part == "Hand" && parent == "Arm"));
    assert_eq!(err.kind(), ErrorKind::Structure);
    assert_eq!(scene.node_count(), 0);
    assert_eq!(scene.material_count(), 0);
}

#[test]
fn parent_must_come_first() {
    let mut scene = Scene::new();
    let mut rng = seeded(1);
    let result = compose(
        &mut scene,
        vec![
            child(cube("Head", Vec3::ZERO), "Torso"),
            root(cube("Torso", Vec3::ZERO)),
        ],
        &mut rng,
    );
    assert!(matches!(result, Err(ForgeError::MissingParent { .. })));
    assert_eq!(scene.node_count(), 0);
}

#[test]
fn invalid_material_inserts_nothing() {
    let mut scene = Scene::new();
    let mut rng = seeded(1);
    let err = compose(
        &mut scene,
        vec![
            root(cube("Torso", Vec3::ZERO)),
            child(
                cube("Head", Vec3::new(0.0, 0.0, 0.6)).with_appearance(Material::new("Bad").with_color(Vec4::splat(2.0))),
                "Torso",
            ),
        ],
        &mut rng,
    )
    .unwrap_err();

    assert!(matches!(err, ForgeError::InvalidParameter(_)));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(scene.node_count(), 0);
    assert_eq!(scene.material_count(), 0);
}

#[test]
fn non_finite_color_variance_inserts_nothing() {
    let mut scene = Scene::new();
    let mut rng = seeded(1);
    let rock = Appearance::varied(
        Material::new("RockMaterial"),
        ColorVariance::symmetric(Vec3::new(0.1, f32::NAN, 0.1)),
    );
    let err = compose(
        &mut scene,
        vec![root(cube("Ground", Vec3::ZERO)), child(cube("Rock", Vec3::X).with_appearance(rock), "Ground")],
        &mut rng,
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(scene.node_count(), 0);

    let infinite = ColorVariance::additive(Vec3::new(0.0, f32::INFINITY, 0.0));
    assert!(matches!(infinite.validate(), Err(ForgeError::InvalidParameter(_))));
    assert!(ColorVariance::additive(Vec3::new(0.0, 0.5, 0.0)).validate().is_ok());
}

#[test]
fn duplicate_names_are_rejected() {
    let mut scene = Scene::new();
    let mut rng = seeded(1);

    let within_list = compose(
        &mut scene,
        vec![root(cube("Rock", Vec3::ZERO)), root(cube("Rock", Vec3::X))],
        &mut rng,
    );
    assert!(matches!(within_list, Err(ForgeError::DuplicateNode(ref n)) if n == "Rock"));
    assert_eq!(scene.node_count(), 0);

    compose(&mut scene, vec![root(cube("Rock", Vec3::ZERO))], &mut rng).unwrap();
    let against_scene = compose(&mut scene, vec![root(cube("Rock", Vec3::X))], &mut rng);
    assert!(matches!(against_scene, Err(ForgeError::DuplicateNode(_))));
    assert_eq!(scene.node_count(), 1);
}

#[test]
fn self_parent_is_a_cycle() {
    let mut scene = Scene::new();
    let mut rng = seeded(1);
    let result = compose(&mut scene, vec![child(cube("Loop", Vec3::ZERO), "Loop")], &mut rng);
    assert!(matches!(result, Err(ForgeError::CyclicHierarchy { .. })));
}

#[test]
fn attach_refuses_cycles() {
    let mut scene = Scene::new();
    let mut rng = seeded(1);
    let h = compose(
        &mut scene,
        vec![
            root(NodeDesc::empty("A")),
            child(NodeDesc::empty("B"), "A"),
            child(NodeDesc::empty("C"), "B"),
        ],
        &mut rng,
    )
    .unwrap();

    let err = scene.attach(h[0], h[2]).unwrap_err();
    assert!(matches!(err, ForgeError::CyclicHierarchy { .. }));
    assert!(scene.attach(h[1], h[1]).is_err());

    // The graph is untouched.
    assert_eq!(scene.root_nodes(), &[h[0]]);
    assert!(scene.is_ancestor(h[0], h[2]));
}

#[test]
fn detach_and_remove_subtree() {
    let mut scene = Scene::new();
    let mut rng = seeded(1);
    let h = compose(
        &mut scene,
        vec![
            root(NodeDesc::empty("A")),
            child(NodeDesc::empty("B"), "A"),
            child(NodeDesc::empty("C"), "B"),
        ],
        &mut rng,
    )
    .unwrap();

    scene.detach(h[1]).unwrap();
    assert_eq!(scene.root_nodes(), &[h[0], h[1]]);
    assert!(scene.get_node(h[0]).unwrap().children().is_empty());

    scene.remove_node(h[1]);
    assert_eq!(scene.node_count(), 1);
    assert!(scene.node_by_name("C").is_none());
    assert!(!scene.contains_name("B"));
}

// ============================================================================
// World transforms
// ============================================================================

#[test]
fn world_transforms_follow_parents() {
    let mut scene = Scene::new();
    let mut rng = seeded(1);
    compose(
        &mut scene,
        vec![
            root(NodeDesc::empty("Ship").at(Vec3::new(1.0, 2.0, 3.0))),
            child(NodeDesc::empty("Engine").at(Vec3::new(0.0, -1.5, 0.0)), "Ship"),
            child(
                NodeDesc::light("Glow", Light::point(Vec3::ONE, 10.0, 0.1), Vec3::new(0.0, -0.3, 0.0)),
                "Engine",
            ),
        ],
        &mut rng,
    )
    .unwrap();
    scene.update_matrix_world();

    let glow = scene.node_by_name("Glow").unwrap();
    let world: Vec3 = scene.get_node(glow).unwrap().world_matrix().translation.into();
    assert!(vec3_approx(world, Vec3::new(1.0, 0.2, 3.0)));
    assert!(vec3_approx(world_position(&scene, "Glow"), world));
}

#[test]
fn attach_keep_world_preserves_placement() {
    let mut scene = Scene::new();
    let mut rng = seeded(1);
    let h = compose(
        &mut scene,
        vec![
            root(NodeDesc::empty("Parent").at(Vec3::new(5.0, 0.0, 0.0))),
            root(NodeDesc::empty("Child").at(Vec3::new(1.0, 1.0, 1.0))),
        ],
        &mut rng,
    )
    .unwrap();

    scene.attach_keep_world(h[1], h[0]).unwrap();
    assert!(vec3_approx(world_position(&scene, "Child"), Vec3::new(1.0, 1.0, 1.0)));
    let local = scene.get_node(h[1]).unwrap().transform.position;
    assert!(vec3_approx(local, Vec3::new(-4.0, 1.0, 1.0)));
}

// ============================================================================
// Merge
// ============================================================================

fn body(scene: &mut Scene) -> Vec<forge::core::NodeHandle> {
    let mut rng = seeded(3);
    let skin = Material::new("Skin").with_rgb(Vec3::new(0.8, 0.6, 0.5));
    let cloth = Material::new("Cloth").with_rgb(Vec3::new(0.1, 0.1, 0.4));
    compose(
        scene,
        vec![
            root(cube("Torso", Vec3::new(0.0, 0.0, 1.0)).with_appearance(cloth.clone())),
            child(cube("Head", Vec3::new(0.0, 0.0, 0.6)).with_appearance(skin.clone()), "Torso"),
            child(cube("Arm_L", Vec3::new(-0.3, 0.0, 0.2)).with_appearance(skin), "Torso"),
            child(
                NodeDesc::light("HeadLamp", Light::point(Vec3::ONE, 5.0, 0.1), Vec3::new(0.0, 0.2, 0.1)),
                "Head",
            ),
            child(
                NodeDesc::mesh(
                    "Eye",
                    create_sphere(SphereOptions {
                        radius: 0.02,
                        segments: 8,
                        rings: 4,
                    })
                    .location(Vec3::new(0.05, 0.1, 0.0))
                    .build()
                    .unwrap(),
                )
                .with_appearance(cloth),
                "Head",
            ),
        ],
        &mut rng,
    )
    .unwrap()
}

#[test]
fn merge_preserves_vertex_and_face_totals() {
    let mut scene = Scene::new();
    let h = body(&mut scene);
    let eye_vertices = 8 * 3 + 2;
    let eye_faces = 8 * 4;

    let report = merge_subtree(&mut scene, h[0]).unwrap();
    assert_eq!(report.merged_nodes, 4);
    assert_eq!(report.vertex_count, 3 * 8 + eye_vertices);
    assert_eq!(report.face_count, 3 * 6 + eye_faces);

    let torso = scene.get_node(h[0]).unwrap();
    let geometry = torso.geometry().unwrap();
    assert_eq!(geometry.part_count(), 4);
    assert_eq!(geometry.vertex_count(), report.vertex_count);
}

#[test]
fn merge_dedupes_material_slots_in_first_seen_order() {
    let mut scene = Scene::new();
    let h = body(&mut scene);
    let report = merge_subtree(&mut scene, h[0]).unwrap();

    assert_eq!(report.material_slots, 2);
    let torso = scene.get_node(h[0]).unwrap();
    let names: Vec<&str> = torso
        .materials()
        .iter()
        .map(|&k| scene.get_material(k).unwrap().name.as_str())
        .collect();
    assert_eq!(names, ["Cloth", "Skin"]);

    let slots: Vec<Option<usize>> = torso
        .geometry()
        .unwrap()
        .parts()
        .iter()
        .map(|p| p.material_slot)
        .collect();
    assert_eq!(slots, [Some(0), Some(1), Some(0), Some(1)]);
}

#[test]
fn merge_leaves_unmaterialed_parts_without_a_slot() {
    let mut scene = Scene::new();
    let mut rng = seeded(1);
    let red = Material::new("Red").with_rgb(Vec3::new(1.0, 0.0, 0.0));
    let h = compose(
        &mut scene,
        vec![
            root(cube("Torso", Vec3::new(0.0, 0.0, 1.0))),
            child(cube("Head", Vec3::new(0.0, 0.0, 0.6)).with_appearance(red), "Torso"),
        ],
        &mut rng,
    )
    .unwrap();
    let report = merge_subtree(&mut scene, h[0]).unwrap();

    assert_eq!(report.material_slots, 1);
    let torso = scene.get_node(h[0]).unwrap();
    let names: Vec<&str> = torso
        .materials()
        .iter()
        .map(|&k| scene.get_material(k).unwrap().name.as_str())
        .collect();
    assert_eq!(names, ["Red"]);

    let geometry = torso.geometry().unwrap();
    let slots: Vec<Option<usize>> = geometry.parts().iter().map(|p| p.material_slot).collect();
    assert_eq!(slots, [None, Some(0)]);
    assert_eq!(geometry.slot_count(), 1);
}

#[test]
fn merge_keeps_part_placement() {
    let mut scene = Scene::new();
    let h = body(&mut scene);
    merge_subtree(&mut scene, h[0]).unwrap();

    let parts = scene.get_node(h[0]).unwrap().geometry().unwrap().parts();
    // Head offset is relative to the torso.
    assert!(vec3_approx(parts[1].offset.translation.into(), Vec3::new(0.0, 0.0, 0.6)));
    // Parts follow the subtree walk, so the eye comes before the arm.
    assert!(vec3_approx(parts[2].offset.translation.into(), Vec3::new(0.05, 0.1, 0.6)));
}

#[test]
fn merge_reparents_non_mesh_descendants() {
    let mut scene = Scene::new();
    let h = body(&mut scene);
    let before = world_position(&scene, "HeadLamp");

    merge_subtree(&mut scene, h[0]).unwrap();

    assert_eq!(scene.node_count(), 2);
    assert!(scene.node_by_name("Head").is_none());
    let lamp = scene.node_by_name("HeadLamp").unwrap();
    assert_eq!(scene.get_node(lamp).unwrap().parent(), Some(h[0]));
    assert!(vec3_approx(world_position(&scene, "HeadLamp"), before));
    assert!(matches!(scene.get_node(lamp).unwrap().content, NodeContent::Light(_)));
}

#[test]
fn merge_without_meshes_fails() {
    let mut scene = Scene::new();
    let mut rng = seeded(1);
    let h = compose(
        &mut scene,
        vec![root(NodeDesc::empty("Group")), child(NodeDesc::empty("Inner"), "Group")],
        &mut rng,
    )
    .unwrap();
    let err = merge_subtree(&mut scene, h[0]).unwrap_err();
    assert!(matches!(err, ForgeError::EmptyMerge(_)));
    assert_eq!(scene.node_count(), 2);
}

// ============================================================================
// Appearance
// ============================================================================

#[test]
fn shared_appearance_reuses_one_material() {
    let mut scene = Scene::new();
    let mut rng = seeded(1);
    let skin = Material::new("SkinMaterial").with_rgb(Vec3::new(0.8, 0.6, 0.5));
    let h = compose(
        &mut scene,
        vec![
            root(cube("A", Vec3::ZERO).with_appearance(skin.clone())),
            root(cube("B", Vec3::X).with_appearance(skin)),
        ],
        &mut rng,
    )
    .unwrap();

    assert_eq!(scene.material_count(), 1);
    let a = scene.get_node(h[0]).unwrap().materials()[0];
    let b = scene.get_node(h[1]).unwrap().materials()[0];
    assert_eq!(a, b);
}

#[test]
fn varied_appearance_makes_one_material_per_node() {
    let mut scene = Scene::new();
    let mut rng = seeded(9);
    let grass = Appearance::varied(
        Material::new("GrassMaterial").with_rgb(Vec3::new(0.1, 0.5, 0.1)),
        ColorVariance::additive(Vec3::new(0.0, 0.5, 0.0)),
    );
    let parts: Vec<Part> = (0..10)
        .map(|i| root(cube(&format!("GrassBlade_{i:03}"), Vec3::ZERO).with_appearance(grass.clone())))
        .collect();
    compose(&mut scene, parts, &mut rng).unwrap();

    assert_eq!(scene.material_count(), 10);
    for (_, material) in scene.iter_materials() {
        assert!(material.name.starts_with("GrassBlade_"));
        assert!(material.name.ends_with("_Material"));
        let c = material.base_color;
        assert!((c.x - 0.1).abs() < EPSILON);
        assert!((0.5..=1.0).contains(&c.y));
        assert_eq!(c.w, 1.0);
    }
}

#[test]
fn varied_material_names_get_suffixes() {
    let mut scene = Scene::new();
    let mut rng = seeded(1);
    scene.add_material(Material::new("Rock_Material")).unwrap();
    let rock = Appearance::varied(
        Material::new("RockMaterial").with_color(Vec4::new(0.2, 0.2, 0.2, 1.0)),
        ColorVariance::symmetric(Vec3::splat(0.1)),
    );
    compose(&mut scene, vec![root(cube("Rock", Vec3::ZERO).with_appearance(rock))], &mut rng).unwrap();
    assert!(scene.material_by_name("Rock_Material.001").is_some());
}

#[test]
fn duplicate_material_is_rejected() {
    let mut scene = Scene::new();
    scene.add_material(Material::new("Body")).unwrap();
    let err = scene.add_material(Material::new("Body")).unwrap_err();
    assert!(matches!(err, ForgeError::DuplicateMaterial(_)));
}

// ============================================================================
// Recipes
// ============================================================================

const BODY: Recipe = Recipe::new(
    "body",
    &[
        PartLink::root("Torso"),
        PartLink::child("Head", "Torso"),
        PartLink::child("Hat", "Head"),
    ],
);

#[test]
fn recipe_prefixes_names_and_parents() {
    let parts = BODY
        .instantiate("Npc_0_", |part| Ok(NodeDesc::empty(part)))
        .unwrap();
    let links: Vec<(&str, Option<&str>)> = parts
        .iter()
        .map(|(d, p)| (d.name.as_str(), p.as_deref()))
        .collect();
    assert_eq!(
        links,
        [
            ("Npc_0_Torso", None),
            ("Npc_0_Head", Some("Npc_0_Torso")),
            ("Npc_0_Hat", Some("Npc_0_Head")),
        ]
    );
    assert_eq!(BODY.parent_of("Hat"), Some("Head"));
    assert_eq!(BODY.parent_of("Torso"), None);
}

#[test]
fn recipe_can_be_instantiated_twice() {
    let mut scene = Scene::new();
    let mut rng = seeded(1);
    for i in 0..2 {
        let parts = BODY
            .instantiate(&format!("Npc_{i}_"), |part| Ok(NodeDesc::empty(part)))
            .unwrap();
        compose(&mut scene, parts, &mut rng).unwrap();
    }
    assert_eq!(scene.node_count(), 6);
    assert_eq!(scene.root_nodes().len(), 2);
}
