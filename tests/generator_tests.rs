//! Generator tests
//!
//! Tests for:
//! - The running figure end to end: merge, rig, bind, run cycle, export
//! - Every catalog generator running against the recording host
//! - Seeded reproducibility of randomized scenes
//! - Parameter validation of generators

use forge::animation::{Channel, Property};
use forge::assets::RecordingHost;
use forge::core::{ForgeError, GenerationSettings};
use forge::generators::figure::{ACTION_NAME, ARMATURE_NAME};
use forge::generators::{
    self, DetailedSpaceship, DynamicSpaceship, GrassAndRocks, LowPolyForest, NatureWalk, RunningFigure,
};
use forge::pass::{GenerationContext, build_scene};
use forge::scene::NodeContent;
use forge::{SceneGenerator, run_pass};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn seeded_defaults(generator: &dyn SceneGenerator, seed: u64) -> GenerationSettings {
    GenerationSettings {
        seed: Some(seed),
        ..generator.default_settings()
    }
}

fn build(generator: &dyn SceneGenerator, seed: u64) -> GenerationContext {
    build_scene(generator, seeded_defaults(generator, seed)).unwrap().0
}

fn quat(bone: &str, index: usize) -> Channel {
    Channel::bone(bone, Property::RotationQuaternion, index)
}

fn action_names(ctx: &GenerationContext) -> Vec<&str> {
    ctx.animations.iter().map(|(_, a)| a.name.as_str()).collect()
}

/// Small instances of every generator, cheap enough for a test run.
fn small_catalog() -> Vec<Box<dyn SceneGenerator>> {
    vec![
        Box::new(RunningFigure::default()),
        Box::new(DynamicSpaceship {
            engine_count: 2,
            pulse_frames: 10,
            ..DynamicSpaceship::default()
        }),
        Box::new(DetailedSpaceship::default()),
        Box::new(LowPolyForest {
            tree_count: 2,
            ..LowPolyForest::default()
        }),
        Box::new(GrassAndRocks {
            blade_count: 12,
            rock_count: 3,
            ..GrassAndRocks::default()
        }),
        Box::new(NatureWalk {
            tree_count: 2,
            grass_density: 16,
            ..NatureWalk::default()
        }),
    ]
}

// ============================================================================
// Running figure
// ============================================================================

#[test]
fn figure_body_is_one_merged_mesh() {
    let ctx = build(&RunningFigure::default(), 1);
    let meshes: Vec<_> = ctx.scene.iter_nodes().filter(|(_, n)| n.is_mesh()).collect();
    assert_eq!(meshes.len(), 1);

    let (_, torso) = meshes[0];
    assert_eq!(torso.name(), "Torso");
    let geometry = torso.geometry().unwrap();
    assert_eq!(geometry.part_count(), 6);
    assert_eq!(geometry.vertex_count(), 48);
    assert_eq!(geometry.face_count(), 36);
    assert_eq!(torso.materials().len(), 1);
    assert_eq!(ctx.scene.material_count(), 1);
}

#[test]
fn figure_rig_has_spine_with_five_children() {
    let ctx = build(&RunningFigure::default(), 1);
    let (_, armature) = ctx.scene.iter_armatures().next().unwrap();
    assert_eq!(armature.name, ARMATURE_NAME);
    assert_eq!(armature.bone_count(), 6);

    let spine = armature.bone("Spine").unwrap();
    assert!(spine.parent.is_none());
    assert_eq!(spine.children.len(), 5);
    for bone in ["Head", "Upper_Arm_R", "Upper_Arm_L", "Thigh_R", "Thigh_L"] {
        assert_eq!(armature.parent_of(bone).unwrap().name, "Spine");
    }
}

#[test]
fn figure_mesh_is_bound_under_rig() {
    let ctx = build(&RunningFigure::default(), 1);
    let torso = ctx.scene.node_by_name("Torso").unwrap();
    let rig = ctx.scene.node_by_name(ARMATURE_NAME).unwrap();
    let node = ctx.scene.get_node(torso).unwrap();
    assert_eq!(node.parent(), Some(rig));
    assert!(node.skin().is_some());
    assert!(matches!(ctx.scene.get_node(rig).unwrap().content, NodeContent::Armature(_)));
}

#[test]
fn run_cycle_covers_every_frame() {
    let ctx = build(&RunningFigure::default(), 1);
    let rig = ctx.scene.node_by_name(ARMATURE_NAME).unwrap();
    let key = ctx.animations.active_action(rig).unwrap();
    let action = ctx.action(key).unwrap();

    assert_eq!(action.name, ACTION_NAME);
    assert_eq!(action.tracks().len(), 24);
    for track in action.tracks() {
        assert_eq!(track.len(), 41);
        assert_eq!(track.frame_range(), Some((0, 40)));
    }
    assert_eq!(action.animated_bones().len(), 6);
}

#[test]
fn run_cycle_values() {
    let ctx = build(&RunningFigure::default(), 1);
    let (_, action) = ctx.animations.iter().next().unwrap();

    let spine = action.track(&quat("Spine", 1)).unwrap();
    assert!(approx(spine.value_at(0).unwrap(), 0.0));
    assert!(approx(spine.value_at(10).unwrap(), 0.1));
    assert!(spine.value_at(20).unwrap().abs() < 1e-4);
    assert!(approx(spine.value_at(40).unwrap(), spine.value_at(0).unwrap()));

    let w = action.track(&quat("Head", 0)).unwrap();
    assert!(w.keys().iter().all(|k| k.value == 1.0));

    // Left and right limbs swing in opposition.
    let arm_r = action.track(&quat("Upper_Arm_R", 3)).unwrap();
    let arm_l = action.track(&quat("Upper_Arm_L", 3)).unwrap();
    assert!(approx(arm_r.value_at(0).unwrap(), 0.5));
    for frame in 0..=40 {
        assert!((arm_r.value_at(frame).unwrap() + arm_l.value_at(frame).unwrap()).abs() < 1e-4);
    }
    let thigh_r = action.track(&quat("Thigh_R", 1)).unwrap();
    let thigh_l = action.track(&quat("Thigh_L", 1)).unwrap();
    assert!(approx(thigh_r.value_at(0).unwrap(), 0.7));
    assert!(approx(thigh_l.value_at(0).unwrap(), -0.7));
}

#[test]
fn figure_exports_through_host() {
    let figure = RunningFigure::default();
    let mut host = RecordingHost::new();
    let report = run_pass(&figure, seeded_defaults(&figure, 1), &mut host).unwrap();

    assert_eq!(report.generator, "running_figure");
    assert_eq!(report.bones, 6);
    assert_eq!(report.actions, 1);
    assert_eq!(report.keyframes, 24 * 41);
    assert_eq!(report.destination.to_str(), Some("running_person.fbx"));
    assert_eq!(report.export.keyframes, report.keyframes);

    assert_eq!(host.count("create_mesh"), 1);
    assert_eq!(host.count("create_bone"), 6);
    assert_eq!(host.count("create_armature_binding"), 1);
    assert_eq!(host.count("create_camera"), 1);
    assert_eq!(host.count("create_light"), 1);
    assert_eq!(host.count("export_to_interchange_format"), 1);
}

// ============================================================================
// Catalog
// ============================================================================

#[test]
fn catalog_lookup() {
    assert_eq!(generators::all().len(), generators::NAMES.len());
    for name in generators::NAMES {
        assert_eq!(generators::by_name(name).unwrap().name(), name);
    }
    assert!(generators::by_name("castle").is_none());
}

#[test]
fn every_generator_exports() {
    for generator in small_catalog() {
        let mut host = RecordingHost::new();
        let settings = GenerationSettings {
            frame_end: 12,
            ..seeded_defaults(generator.as_ref(), 5)
        };
        let report = run_pass(generator.as_ref(), settings, &mut host)
            .unwrap_or_else(|e| panic!("{} failed: {e}", generator.name()));

        assert!(report.nodes > 0, "{}", generator.name());
        assert!(report.actions > 0, "{}", generator.name());
        assert_eq!(report.export.nodes, report.nodes, "{}", generator.name());
        assert_eq!(
            host.commands().last().unwrap().operation(),
            "export_to_interchange_format",
            "{}",
            generator.name()
        );
    }
}

#[test]
fn every_scene_has_camera_and_sun() {
    for generator in small_catalog() {
        let ctx = build(generator.as_ref(), 2);
        assert!(ctx.scene.node_by_name("Camera").is_some(), "{}", generator.name());
        assert!(ctx.scene.node_by_name("Sun").is_some(), "{}", generator.name());
    }
}

#[test]
fn seeded_scenes_are_reproducible() {
    let journal = |seed| {
        let meadow = GrassAndRocks {
            blade_count: 8,
            rock_count: 4,
            ..GrassAndRocks::default()
        };
        let mut host = RecordingHost::new();
        run_pass(&meadow, seeded_defaults(&meadow, seed), &mut host).unwrap();
        host.to_json().unwrap()
    };
    assert_eq!(journal(42), journal(42));
    assert_ne!(journal(42), journal(43));
}

// ============================================================================
// Individual scenes
// ============================================================================

#[test]
fn dynamic_spaceship_pulses_every_engine() {
    let ship = DynamicSpaceship {
        engine_count: 4,
        pulse_frames: 20,
        ..DynamicSpaceship::default()
    };
    let ctx = build(&ship, 3);

    let names = action_names(&ctx);
    assert_eq!(names[0], "ComplexFlightPath");
    for i in 0..4 {
        assert!(names.contains(&format!("EnginePulse_EngineGlow_{i}").as_str()));
    }

    let (_, pulse) = ctx.animations.iter().nth(1).unwrap();
    let energy = &pulse.tracks()[0];
    assert_eq!(energy.len(), 21);
    assert!(energy.keys().iter().all(|k| (5.0..=15.0).contains(&k.value)));

    let (_, flight) = ctx.animations.iter().next().unwrap();
    let forward = flight.track(&Channel::object(Property::Location, 1)).unwrap();
    assert!(approx(forward.value_at(0).unwrap(), -10.0));
    assert!(approx(forward.value_at(300).unwrap(), 10.0));
}

#[test]
fn engine_glow_sits_behind_its_engine() {
    let ctx = build(&DynamicSpaceship::default(), 3);
    let engine = ctx.scene.node_by_name("Engine_0").unwrap();
    let glow = ctx.scene.node_by_name("EngineGlow_0").unwrap();
    assert_eq!(ctx.scene.get_node(glow).unwrap().parent(), Some(engine));

    let engine_y = ctx.scene.get_node(engine).unwrap().world_matrix().translation.y;
    let glow_y = ctx.scene.get_node(glow).unwrap().world_matrix().translation.y;
    assert!(approx(glow_y - engine_y, -0.3));
}

#[test]
fn detailed_spaceship_actions() {
    let ctx = build(&DetailedSpaceship::default(), 4);
    let mut names = action_names(&ctx);
    names.sort_unstable();
    assert_eq!(
        names,
        [
            "HoverAnimation",
            "ThrusterFlicker_ThrusterGlow_L",
            "ThrusterFlicker_ThrusterGlow_R",
            "WeaponRotation_Weapon_L",
            "WeaponRotation_Weapon_R",
        ]
    );
    // Body, the recipe's twelve children, camera and sun.
    assert_eq!(ctx.scene.node_count(), 15);
    let thruster = ctx.scene.node_by_name("Thruster_L").unwrap();
    let engine = ctx.scene.node_by_name("Engine_L").unwrap();
    assert_eq!(ctx.scene.get_node(thruster).unwrap().parent(), Some(engine));
}

#[test]
fn forest_trees_sway() {
    let forest = LowPolyForest {
        tree_count: 3,
        ..LowPolyForest::default()
    };
    let ctx = build(&forest, 6);

    for i in 0..3 {
        let trunk = ctx.scene.node_by_name(&format!("Tree_{i}_Trunk")).unwrap();
        let crown = ctx.scene.node_by_name(&format!("Tree_{i}_Crown")).unwrap();
        assert_eq!(ctx.scene.get_node(crown).unwrap().parent(), Some(trunk));
        let branches = ctx.scene.get_node(trunk).unwrap().children().len() - 1;
        assert!((3..=7).contains(&branches));
        assert!(ctx.animations.active_action(crown).is_some());
        assert!(ctx.animations.active_action(trunk).is_none());
    }
    let names = action_names(&ctx);
    assert!(names.iter().all(|n| n.starts_with("Sway_Tree_")));
}

#[test]
fn meadow_blades_get_their_own_materials() {
    let meadow = GrassAndRocks {
        blade_count: 10,
        rock_count: 2,
        ..GrassAndRocks::default()
    };
    let ctx = build(&meadow, 8);
    assert_eq!(ctx.animations.action_count(), 10);
    assert!(ctx.scene.node_by_name("GrassBlade_009").is_some());
    assert!(ctx.scene.node_by_name("Rock_01").is_some());
    // Ground, one per blade, one per rock.
    assert_eq!(ctx.scene.material_count(), 1 + 10 + 2);
}

#[test]
fn meadow_rejects_full_roughness() {
    let meadow = GrassAndRocks {
        rock_roughness: 1.0,
        ..GrassAndRocks::default()
    };
    let result = build_scene(&meadow, seeded_defaults(&meadow, 1));
    assert!(matches!(result, Err(ForgeError::InvalidParameter(_))));
}

#[test]
fn nature_walk_moves_the_rig() {
    let walk = NatureWalk {
        tree_count: 1,
        grass_density: 9,
        ..NatureWalk::default()
    };
    let ctx = build(&walk, 9);

    let rig = ctx.scene.node_by_name("Human_Armature").unwrap();
    let key = ctx.animations.active_action(rig).unwrap();
    let action = ctx.action(key).unwrap();
    assert_eq!(action.name, "WalkAction");

    let x = action.track(&Channel::object(Property::Location, 0)).unwrap();
    assert!(approx(x.value_at(0).unwrap(), 0.0));
    assert!(approx(x.value_at(50).unwrap(), 5.0));
    let z = action.track(&Channel::object(Property::Location, 2)).unwrap();
    assert!(z.keys().iter().all(|k| k.value.abs() <= 0.1 + EPSILON));

    let human = ctx.scene.node_by_name("Human").unwrap();
    assert_eq!(ctx.scene.get_node(human).unwrap().parent(), Some(rig));
}

#[test]
fn invalid_settings_stop_before_generation() {
    let figure = RunningFigure::default();
    let settings = GenerationSettings {
        fps: 0,
        ..figure.default_settings()
    };
    let mut host = RecordingHost::new();
    assert!(run_pass(&figure, settings, &mut host).is_err());
    assert!(host.commands().is_empty());
}
