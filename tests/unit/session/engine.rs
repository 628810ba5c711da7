use super::*;
use crate::collab::renderer::RecordingRenderer;
use crate::export::fingerprint::fingerprint_sample;
use crate::session::sample::NodeSample;
use crate::session::state::AddOptions;
use crate::verbs::{AnimParams, Axes};

const SCRIPT: &str = r#"{
  "defaults": { "defaultDuration": 1.0, "defaultEase": "linear" },
  "commands": [
    { "op": "add", "id": "dot", "kind": "circle", "radius": 0.5 },
    { "op": "moveTo", "target": "dot", "x": 2 },
    { "op": "mark", "name": "half" },
    { "op": "fadeOut", "target": "dot", "t": "<0.5" }
  ]
}"#;

fn loaded() -> Engine {
    let mut engine = Engine::new();
    engine.load_script_blocking(SCRIPT).unwrap();
    engine
}

fn dot(sample: &SceneSample) -> &NodeSample {
    sample
        .nodes
        .iter()
        .find(|n| n.name.as_deref() == Some("dot"))
        .unwrap()
}

#[test]
fn an_empty_engine_can_be_scrubbed() {
    let mut engine = Engine::new();
    assert_eq!(engine.status(), LoadStatus::Empty);
    assert_eq!(engine.duration().unwrap(), 0.0);
    assert_eq!(engine.seek(3.0).unwrap(), 0.0);
    assert!(engine.sample_state().unwrap().nodes.is_empty());
}

#[test]
fn loading_builds_the_whole_timeline() {
    let engine = loaded();
    assert_eq!(engine.status(), LoadStatus::Ready);
    assert_eq!(engine.duration().unwrap(), 1.5);

    let summary = engine.timeline_summary().unwrap();
    assert_eq!(summary.animation_start_times, [0.0, 0.0, 0.5]);
    assert_eq!(
        summary.markers,
        [Marker {
            name: "half".to_owned(),
            time: 1.0
        }]
    );
    assert_eq!(engine.options().unwrap().default_duration, 1.0);
}

#[test]
fn seeking_samples_the_timeline() {
    let mut engine = loaded();
    engine.seek(0.5).unwrap();
    let s = engine.sample_state().unwrap();
    assert_eq!(dot(&s).transform.position.x, 1.0);
    assert!(dot(&s).visible);
    assert_eq!(s.materials[0].opacity, 1.0);

    engine.seek(1.0).unwrap();
    let s = engine.sample_state().unwrap();
    assert_eq!(dot(&s).transform.position.x, 2.0);
    assert_eq!(s.materials[0].opacity, 0.5);

    engine.seek(10.0).unwrap();
    assert_eq!(engine.time(), 1.5);
    assert!(!dot(&engine.sample_state().unwrap()).visible);
}

#[test]
fn sampled_state_does_not_depend_on_playback_history() {
    let mut played = loaded();
    played.play().unwrap();
    for _ in 0..3 {
        played.advance(0.2).unwrap();
    }
    played.pause();
    played.seek(0.1).unwrap();
    played.seek(1.2).unwrap();

    let mut fresh = loaded();
    fresh.seek(1.2).unwrap();

    let a = played.sample_state().unwrap();
    let b = fresh.sample_state().unwrap();
    assert_eq!(a, b);
    assert_eq!(fingerprint_sample(&a), fingerprint_sample(&b));
}

#[test]
fn advance_is_clamped_and_stops_at_the_end() {
    let mut engine = loaded();
    assert_eq!(engine.advance(0.1).unwrap(), 0.0);

    engine.play().unwrap();
    assert_eq!(engine.advance(10.0).unwrap(), 0.25);
    while engine.is_playing() {
        engine.advance(0.25).unwrap();
    }
    assert_eq!(engine.time(), 1.5);

    engine.play().unwrap();
    assert_eq!(engine.time(), 0.0);
}

#[test]
fn play_from_seeks_then_plays() {
    let mut engine = loaded();
    engine.play_from(1.0).unwrap();
    assert!(engine.is_playing());
    assert_eq!(engine.time(), 1.0);
    assert_eq!(engine.sample_state().unwrap().materials[0].opacity, 0.5);

    engine.play_from(-3.0).unwrap();
    assert_eq!(engine.time(), 0.0);
}

#[test]
fn overrides_win_over_script_defaults() {
    let overrides = OptionsPatch {
        default_duration: Some(2.0),
        ..OptionsPatch::default()
    };
    let mut engine = Engine::new().with_overrides(overrides);
    engine.load_script_blocking(SCRIPT).unwrap();
    assert_eq!(engine.options().unwrap().default_duration, 2.0);
    assert_eq!(engine.duration().unwrap(), 2.5);
}

#[test]
fn failed_loads_block_playback_until_the_next_load() {
    let mut engine = loaded();
    let err = engine.load_script_blocking("{ not json").unwrap_err();
    assert!(matches!(err, ChoreoError::Script(_)));
    assert_eq!(engine.status(), LoadStatus::Failed);
    assert!(engine.seek(0.5).is_err());
    assert!(engine.play().is_err());
    assert!(engine.draw(&mut RecordingRenderer::new()).is_err());

    engine.load_script_blocking(SCRIPT).unwrap();
    assert_eq!(engine.status(), LoadStatus::Ready);
    assert!(engine.seek(0.5).is_ok());
}

#[test]
fn invalid_options_fail_a_build() {
    let overrides = OptionsPatch {
        fps: Some(0),
        ..OptionsPatch::default()
    };
    let mut engine = loaded().with_overrides(overrides);
    assert_eq!(engine.status(), LoadStatus::Ready);

    let err = engine.build_blocking(|_| {}).unwrap_err();
    assert!(matches!(err, ChoreoError::Validation(_)));
    assert_eq!(engine.status(), LoadStatus::Failed);
    assert!(engine.seek(0.5).is_err());
}

#[test]
fn failing_assets_fail_the_load() {
    let mut engine = Engine::new();
    let script = r#"{ "commands": [
        { "op": "add", "id": "a", "kind": "circle" },
        { "op": "add", "id": "b", "kind": "model", "path": "missing:ship.glb" },
        { "op": "fadeIn", "target": "a" }
    ] }"#;
    let err = engine.load_script_blocking(script).unwrap_err();
    assert!(matches!(err, ChoreoError::Command { ordinal: 1, .. }));
    assert!(matches!(err.root(), ChoreoError::AssetLoadFailure(_)));
    assert_eq!(engine.status(), LoadStatus::Failed);
}

#[test]
fn reloading_discards_the_previous_scene() {
    let mut engine = loaded();
    engine.seek(1.0).unwrap();
    engine
        .load_script_blocking(r#"{ "commands": [ { "op": "wait", "duration": 3 } ] }"#)
        .unwrap();
    assert_eq!(engine.time(), 0.0);
    assert_eq!(engine.duration().unwrap(), 3.0);
    assert!(engine.markers().unwrap().is_empty());
    assert!(engine.sample_state().unwrap().nodes.is_empty());
}

#[test]
fn rust_built_scenes_run_like_scripts() {
    let mut engine = Engine::new();
    engine
        .build_blocking(|api| {
            api.add_circle(1.0, AddOptions::default())
                .move_to(Axes::xy(3.0, 0.0), AnimParams::default().duration(1.0));
            api.mark(Some("end"), None);
        })
        .unwrap();
    assert_eq!(engine.status(), LoadStatus::Ready);
    assert_eq!(engine.duration().unwrap(), 1.0);
    assert_eq!(engine.markers().unwrap()[0].time, 1.0);

    let mut renderer = RecordingRenderer::new();
    engine.seek(1.0).unwrap();
    engine.draw(&mut renderer).unwrap();
    assert_eq!(renderer.frames().len(), 1);
}
