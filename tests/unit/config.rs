use super::*;

#[test]
fn defaults_match_documented_values() {
    let o = EngineOptions::default();
    assert_eq!(o.default_duration, 0.5);
    assert_eq!(o.default_ease, Ease::InOutQuad);
    assert_eq!(o.fps, 30);
    assert_eq!(o.marker_default_name, "m");
    assert!(o.validate().is_ok());
}

#[test]
fn patches_only_override_present_fields() {
    let patch: OptionsPatch =
        serde_json::from_str(r#"{"defaultDuration": 1.5, "defaultEase": "power2.out"}"#).unwrap();
    let o = EngineOptions::default().merged_with(&patch);
    assert_eq!(o.default_duration, 1.5);
    assert_eq!(o.default_ease, Ease::OutCubic);
    assert_eq!(o.fps, 30);

    let cli = OptionsPatch {
        fps: Some(60),
        default_duration: Some(2.0),
        ..OptionsPatch::default()
    };
    let layered = patch.then(&cli);
    assert_eq!(layered.default_duration, Some(2.0));
    assert_eq!(layered.default_ease, Some(Ease::OutCubic));
    assert_eq!(layered.fps, Some(60));
}

#[test]
fn unknown_patch_fields_are_rejected() {
    assert!(serde_json::from_str::<OptionsPatch>(r#"{"duration": 1}"#).is_err());
}

#[test]
fn invalid_options_fail_validation() {
    let mut o = EngineOptions::default();
    o.fps = 0;
    assert!(o.validate().is_err());
    let mut o = EngineOptions::default();
    o.default_duration = -1.0;
    assert!(o.validate().is_err());
    let mut o = EngineOptions::default();
    o.marker_default_name = " ".into();
    assert!(o.validate().is_err());
}

#[test]
fn options_load_from_a_file() {
    let dir = std::path::PathBuf::from("target").join("choreo_config_test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("opts.json");
    std::fs::write(&path, r#"{"fps": 24, "staticFrameElision": true}"#).unwrap();
    let o = EngineOptions::from_json_file(&path).unwrap();
    assert_eq!(o.fps, 24);
    assert!(o.static_frame_elision);
    assert!(EngineOptions::from_json_file(&dir.join("missing.json")).is_err());
}
