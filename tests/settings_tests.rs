//! Settings tests
//!
//! Tests for:
//! - Defaults and partial JSON documents
//! - Overlaying a JSON patch on generator defaults
//! - Timeline and export option validation

use forge::core::settings::{ExportOptions, GenerationSettings, PathMode};
use forge::core::{ErrorKind, ForgeError};

#[test]
fn defaults_are_valid() {
    let settings = GenerationSettings::default();
    assert!(settings.validate().is_ok());
    assert_eq!(settings.fps, 24);
    assert_eq!(settings.frame_count(), 100);
    assert!(settings.seed.is_none());

    let export = ExportOptions::default();
    assert!(export.bake_all_actions);
    assert!(export.use_selection);
    assert!(export.embed_textures);
    assert_eq!(export.path_mode, PathMode::Copy);
}

#[test]
fn partial_document_keeps_defaults() {
    let settings = GenerationSettings::from_json_str(r#"{ "fps": 30, "seed": 7 }"#).unwrap();
    assert_eq!(settings.fps, 30);
    assert_eq!(settings.seed, Some(7));
    assert_eq!(settings.frame_end, 100);
    assert_eq!(settings.export, ExportOptions::default());
}

#[test]
fn nested_export_options_parse() {
    let settings = GenerationSettings::from_json_str(
        r#"{ "export": { "path_mode": "absolute", "bake_simplify_factor": 0.0 } }"#,
    )
    .unwrap();
    assert_eq!(settings.export.path_mode, PathMode::Absolute);
    assert_eq!(settings.export.bake_simplify_factor, 0.0);
    assert!(settings.export.bake_all_actions);
}

#[test]
fn overlay_only_touches_given_keys() {
    let base = GenerationSettings {
        fps: 30,
        frame_end: 300,
        output: "dynamic_spaceship.fbx".into(),
        ..GenerationSettings::default()
    };
    let merged = base
        .overlay_json(r#"{ "frame_end": 60, "export": { "embed_textures": false } }"#)
        .unwrap();

    assert_eq!(merged.fps, 30);
    assert_eq!(merged.frame_end, 60);
    assert_eq!(merged.output, base.output);
    assert!(!merged.export.embed_textures);
    assert!(merged.export.use_selection);
    assert_eq!(merged.export.sample_step, 1.0);
}

#[test]
fn overlay_can_clear_seed() {
    let base = GenerationSettings {
        seed: Some(3),
        ..GenerationSettings::default()
    };
    assert_eq!(base.overlay_json(r#"{ "seed": null }"#).unwrap().seed, None);
    assert_eq!(base.overlay_json("{}").unwrap(), base);
}

#[test]
fn invalid_timeline_is_rejected() {
    let zero_fps = GenerationSettings::from_json_str(r#"{ "fps": 0 }"#).unwrap_err();
    assert!(matches!(zero_fps, ForgeError::InvalidParameter(_)));

    let backwards = GenerationSettings::from_json_str(r#"{ "frame_start": 10, "frame_end": 5 }"#);
    assert!(backwards.is_err());

    let overlay = GenerationSettings::default().overlay_json(r#"{ "export": { "sample_step": -1.0 } }"#);
    assert!(matches!(overlay, Err(ForgeError::InvalidParameter(_))));
}

#[test]
fn frame_count_is_relative_to_start() {
    let settings = GenerationSettings {
        frame_start: 10,
        frame_end: 50,
        ..GenerationSettings::default()
    };
    assert_eq!(settings.frame_count(), 40);
}

#[test]
fn malformed_json_is_a_config_error() {
    let err = GenerationSettings::from_json_str("{ fps: ").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    let wrong_type = GenerationSettings::from_json_str(r#"{ "fps": "fast" }"#).unwrap_err();
    assert!(matches!(wrong_type, ForgeError::JsonError(_)));
}

#[test]
fn settings_file_round_trip() {
    let path = std::env::temp_dir().join(format!("forge_settings_{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "fps": 25, "output": "low_poly_trees.fbx" }"#).unwrap();
    let settings = GenerationSettings::from_json_file(&path).unwrap();
    assert_eq!(settings.fps, 25);
    assert_eq!(settings.output.to_str(), Some("low_poly_trees.fbx"));
    std::fs::remove_file(&path).ok();

    let missing = GenerationSettings::from_json_file(&path).unwrap_err();
    assert!(matches!(missing, ForgeError::IoError(_)));
}
