use super::*;
use crate::collab::factory::SyntheticFactory;
use crate::config::EngineOptions;
use crate::foundation::error::ChoreoError;
use crate::session::Session;

fn session() -> Session {
    Session::new(EngineOptions::default(), Rc::new(SyntheticFactory::new()))
}

fn labels(session: &Session) -> Vec<String> {
    session
        .with_state(|s| {
            Ok(s.timeline
                .placements()
                .iter()
                .map(|p| p.label.clone())
                .collect())
        })
        .unwrap()
}

#[tokio::test]
async fn handles_exist_before_their_commands_run() {
    let session = session();
    let api = session.api();
    let circle = api.add_circle(1.0, AddOptions::default());
    assert_eq!(circle.id(), NodeId(1));
    assert_eq!(session.queue().pending(), 1);
    assert!(
        !session
            .with_state(|s| Ok(s.graph.contains(circle.id())))
            .unwrap()
    );

    session.drain().await.unwrap();
    assert!(
        session
            .with_state(|s| Ok(s.graph.contains(circle.id())))
            .unwrap()
    );
}

#[tokio::test]
async fn chained_verbs_are_placed_in_call_order() {
    let session = session();
    let api = session.api();
    api.add_circle(1.0, AddOptions::default())
        .move_to(Axes::xy(1.0, 0.0), AnimParams::default())
        .fade_out(AnimParams::default())
        .grow(AnimParams::default());
    let report = session.drain().await.unwrap();
    assert_eq!(report.executed, 4);
    assert_eq!(labels(&session), ["add", "moveTo", "fadeOut", "grow"]);
}

#[tokio::test]
async fn glyph_children_take_ids_after_every_handle() {
    let session = session();
    let api = session.api();
    let text = api.add_text("ab", AddOptions::default());
    let circle = api.add_circle(1.0, AddOptions::default());
    assert_eq!((text.id(), circle.id()), (NodeId(1), NodeId(2)));

    session.drain().await.unwrap();
    let children = session
        .with_state(|s| Ok(s.graph.node(text.id())?.children.clone()))
        .unwrap();
    assert_eq!(children, [NodeId(3), NodeId(4)]);
}

#[tokio::test]
async fn asset_failures_name_the_command_and_drop_the_rest() {
    let session = session();
    let api = session.api();
    let circle = api.add_circle(1.0, AddOptions::default());
    api.add_model("missing:teapot.glb", AddOptions::default());
    circle.move_to(Axes::xy(1.0, 1.0), AnimParams::default());

    let err = session.drain().await.unwrap_err();
    match &err {
        ChoreoError::Command { ordinal, label, .. } => {
            assert_eq!(*ordinal, 1);
            assert_eq!(label, "add shape node#2");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(matches!(err.root(), ChoreoError::AssetLoadFailure(_)));
    assert_eq!(session.queue().pending(), 0);
    assert_eq!(labels(&session), ["add"]);
}

#[tokio::test]
async fn markers_and_waits_move_the_cursor() {
    let session = session();
    let api = session.api();
    let dot = api.add_circle(0.5, AddOptions::default());
    api.wait(1.0);
    api.mark(Some("here"), None);
    dot.move_by(Axes::xy(1.0, 0.0), AnimParams::at(TimeRef::marker("here", 0.25)));
    session.drain().await.unwrap();

    session
        .with_state(|s| {
            assert_eq!(s.timeline.resolve(&TimeRef::marker("here", 0.0))?, 1.0);
            let last = s.timeline.previous().unwrap();
            assert_eq!(last.start, 1.25);
            Ok(())
        })
        .unwrap();
}

#[tokio::test]
async fn defaults_apply_to_later_commands_only() {
    let session = session();
    let api = session.api();
    let dot = api.add_circle(1.0, AddOptions::default());
    dot.move_to(Axes::xy(1.0, 0.0), AnimParams::default());
    api.set_defaults(OptionsPatch {
        default_duration: Some(2.0),
        ..OptionsPatch::default()
    });
    dot.move_to(Axes::xy(0.0, 0.0), AnimParams::default());
    session.drain().await.unwrap();

    session
        .with_state(|s| {
            let spans: Vec<f64> = s
                .timeline
                .placements()
                .iter()
                .map(|p| p.end - p.start)
                .collect();
            assert_eq!(spans, [0.0, 0.5, 2.0]);
            Ok(())
        })
        .unwrap();
}

#[tokio::test]
async fn behaviors_and_removal_run_through_the_queue() {
    let session = session();
    let api = session.api();
    let camera = api.add_camera(50.0, AddOptions::default());
    let label = api.add_text("x", AddOptions::default());
    label
        .billboard(&camera)
        .spin(Axis::Z, 1.0, Some(TimeRef::from(0.5)));
    let gone = api.add_group(AddOptions::default());
    gone.remove();
    session.drain().await.unwrap();

    session
        .with_state(|s| {
            assert_eq!(s.behaviors.items().len(), 2);
            assert_eq!(s.behaviors.items()[1].since, 0.5);
            assert!(!s.graph.contains(gone.id()));
            Ok(())
        })
        .unwrap();
}

#[tokio::test]
async fn morphing_between_handles_uses_their_ids() {
    let session = session();
    let api = session.api();
    let a = api.add_formula("x+1", AddOptions::default());
    let b = api.add_formula("x+2", AddOptions::default().hidden());
    a.morph_to(&b, false, AnimParams::default());
    session.drain().await.unwrap();
    assert_eq!(labels(&session).last().map(String::as_str), Some("morphTo"));
}
