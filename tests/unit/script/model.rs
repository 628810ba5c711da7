use super::*;
use crate::animation::ease::Ease;
use crate::verbs::Axes;

fn script_error(source: &str) -> String {
    match ScriptDef::parse(source) {
        Err(ChoreoError::Script(msg)) => msg,
        other => panic!("expected a script error, got {other:?}"),
    }
}

#[test]
fn every_op_parses() {
    let script = ScriptDef::parse(
        r##"{
      "defaults": { "fps": 24 },
      "commands": [
        { "op": "add", "id": "cam", "kind": "camera" },
        { "op": "add", "id": "title", "kind": "text", "text": "Hi", "color": "#ff0000" },
        { "op": "add", "id": "ball", "kind": "sphere", "parent": "title", "visible": false },
        { "op": "mark", "name": "intro" },
        { "op": "wait", "duration": 0.5 },
        { "op": "setDefaults", "defaultEase": "outCubic" },
        { "op": "spin", "target": "ball", "axis": "z", "radiansPerSec": 2.0 },
        { "op": "billboard", "target": "title", "camera": "cam" },
        { "op": "moveBy", "target": "ball", "x": 1, "t": "intro+0.25", "duration": 2 },
        { "op": "fadeIn", "target": "ball", "opacity": 0.5, "t": "<" },
        { "op": "remove", "target": "ball" }
      ]
    }"##,
    )
    .unwrap();

    assert_eq!(script.defaults.as_ref().unwrap().fps, Some(24));
    let ops: Vec<_> = script.commands.iter().map(CommandDef::op).collect();
    assert_eq!(
        ops,
        [
            "add",
            "add",
            "add",
            "mark",
            "wait",
            "setDefaults",
            "spin",
            "billboard",
            "moveBy",
            "fadeIn",
            "remove"
        ]
    );

    let CommandDef::Scene(SceneOp::Add(ball)) = &script.commands[2] else {
        panic!("expected add");
    };
    assert_eq!(ball.parent.as_deref(), Some("title"));
    assert_eq!(ball.kind, KindDef::Sphere { radius: 1.0 });
    assert!(!ball.options.visible);

    let CommandDef::Scene(SceneOp::SetDefaults(patch)) = &script.commands[5] else {
        panic!("expected setDefaults");
    };
    assert_eq!(patch.default_ease, Some(Ease::OutCubic));

    let CommandDef::Animate(anim) = &script.commands[8] else {
        panic!("expected an animation");
    };
    assert_eq!(anim.target, "ball");
    assert_eq!(
        anim.verb,
        Verb::MoveBy(Axes {
            x: Some(1.0),
            ..Axes::default()
        })
    );
    assert_eq!(anim.params.t, Some(TimeRef::marker("intro", 0.25)));
    assert_eq!(anim.params.duration, Some(2.0));

    let CommandDef::Animate(fade) = &script.commands[9] else {
        panic!("expected an animation");
    };
    assert_eq!(fade.verb, Verb::FadeIn { opacity: Some(0.5) });
    assert_eq!(fade.params.t, Some(TimeRef::with_prev(0.0)));
}

#[test]
fn vectors_accept_arrays_objects_and_scalars() {
    let script = ScriptDef::parse(
        r#"{ "commands": [
        { "op": "add", "id": "b", "kind": "box", "size": [1, 2, 3],
          "position": [1, 2, 3], "rotation": { "y": 1.5 }, "scale": 2 }
    ] }"#,
    )
    .unwrap();
    let CommandDef::Scene(SceneOp::Add(b)) = &script.commands[0] else {
        panic!("expected add");
    };
    assert_eq!(
        b.kind,
        KindDef::Box {
            size: Vec3::new(1.0, 2.0, 3.0)
        }
    );
    assert_eq!(b.options.position, Some(Vec3::new(1.0, 2.0, 3.0)));
    assert_eq!(b.options.rotation, Some(Vec3::new(0.0, 1.5, 0.0)));
    assert_eq!(b.options.scale, Some(Vec3::splat(2.0)));
}

#[test]
fn morph_targets_are_parsed_as_references() {
    let script = ScriptDef::parse(
        r#"{ "commands": [
        { "op": "add", "id": "a", "kind": "formula", "source": "x+1" },
        { "op": "add", "id": "b", "kind": "formula", "source": "x+2" },
        { "op": "morphTo", "target": "a", "into": "b", "reverse": true }
    ] }"#,
    )
    .unwrap();
    let CommandDef::Animate(m) = &script.commands[2] else {
        panic!("expected an animation");
    };
    assert_eq!(
        m.verb,
        Verb::MorphTo {
            into: "b".to_owned(),
            reverse: true
        }
    );
}

#[test]
fn references_must_be_declared_earlier() {
    let msg = script_error(
        r#"{ "commands": [
        { "op": "add", "id": "a", "kind": "group" },
        { "op": "moveTo", "target": "ghost", "x": 1 }
    ] }"#,
    );
    assert_eq!(msg, "command #1 (moveTo): unknown node id 'ghost'");

    let msg = script_error(
        r#"{ "commands": [
        { "op": "add", "id": "a", "kind": "formula", "source": "x" },
        { "op": "morphTo", "target": "a", "into": "b" },
        { "op": "add", "id": "b", "kind": "formula", "source": "y" }
    ] }"#,
    );
    assert_eq!(msg, "command #1 (morphTo): unknown node id 'b'");

    let msg = script_error(
        r#"{ "commands": [
        { "op": "add", "id": "child", "kind": "group", "parent": "later" }
    ] }"#,
    );
    assert_eq!(msg, "command #0 (add): unknown node id 'later'");
}

#[test]
fn ids_must_be_unique_and_non_empty() {
    let msg = script_error(
        r#"{ "commands": [
        { "op": "add", "id": "a", "kind": "group" },
        { "op": "add", "id": "a", "kind": "group" }
    ] }"#,
    );
    assert_eq!(msg, "command #1 (add): duplicate node id 'a'");

    let msg = script_error(r#"{ "commands": [ { "op": "add", "id": " ", "kind": "group" } ] }"#);
    assert_eq!(msg, "command #0 (add): empty id");
}

#[test]
fn malformed_commands_name_their_index() {
    let msg = script_error(r#"{ "commands": [ { "target": "a" } ] }"#);
    assert_eq!(msg, "command #0 has no \"op\" string");

    let msg = script_error(
        r#"{ "commands": [
        { "op": "add", "id": "a", "kind": "group" },
        { "op": "wiggle", "target": "a" }
    ] }"#,
    );
    assert!(msg.starts_with("command #1 (wiggle): "), "{msg}");

    let msg = script_error(r#"{ "commands": [ { "op": "wait" } ] }"#);
    assert!(msg.starts_with("command #0 (wait): "), "{msg}");

    let msg = script_error(r#"{ "commands": [ { "op": "add", "id": "a", "kind": "blob" } ] }"#);
    assert!(msg.starts_with("command #0 (add): "), "{msg}");
}

#[test]
fn unknown_top_level_fields_are_rejected() {
    let msg = script_error(r#"{ "commands": [], "extra": 1 }"#);
    assert!(msg.starts_with("invalid script: "), "{msg}");

    let msg = script_error(r#"{ "defaults": { "fpz": 2 } }"#);
    assert!(msg.starts_with("invalid script: "), "{msg}");
}

#[test]
fn bad_time_references_are_rejected() {
    let msg = script_error(
        r#"{ "commands": [
        { "op": "add", "id": "a", "kind": "group" },
        { "op": "show", "target": "a", "t": "<abc" }
    ] }"#,
    );
    assert!(msg.starts_with("command #1 (show): "), "{msg}");
}

#[test]
fn an_empty_document_is_an_empty_script() {
    let script = ScriptDef::parse("{}").unwrap();
    assert!(script.defaults.is_none());
    assert!(script.commands.is_empty());
}

#[test]
fn misspelled_command_fields_are_rejected() {
    let msg = script_error(
        r#"{ "commands": [
        { "op": "add", "id": "dot", "kind": "circle", "positon": [5, 5, 5] }
    ] }"#,
    );
    assert_eq!(msg, "command #0 (add): unknown field 'positon'");

    let msg = script_error(
        r#"{ "commands": [
        { "op": "add", "id": "dot", "kind": "circle" },
        { "op": "fadeIn", "target": "dot", "durration": 9 }
    ] }"#,
    );
    assert_eq!(msg, "command #1 (fadeIn): unknown field 'durration'");

    let msg = script_error(
        r#"{ "commands": [ { "op": "add", "id": "t", "kind": "text", "radius": 1 } ] }"#,
    );
    assert_eq!(msg, "command #0 (add): unknown field 'radius'");

    let msg = script_error(r#"{ "commands": [ { "op": "wait", "duration": 1, "t": 2 } ] }"#);
    assert_eq!(msg, "command #0 (wait): unknown field 't'");
}
