use super::*;
use crate::animation::ease::Ease;
use crate::animation::sub_timeline::SubTimeline;
use crate::animation::tween::{NodeField, Track, TrackValue};
use crate::foundation::ids::NodeId;
use crate::scene::node::{NodeKind, NodeState, SceneNode};

const X: Property = Property::Node(NodeId(1), NodeField::PosX);

fn fixture() -> (SceneGraph, MainTimeline) {
    let mut g = SceneGraph::new();
    g.attach(
        SceneNode::new(NodeId(1), NodeKind::Group, NodeState::default()),
        NodeId::ROOT,
    )
    .unwrap();
    let mut tl = MainTimeline::new();
    let mut sub = SubTimeline::new("move");
    sub.push(Track::tween(X, TrackValue::Fixed(4.0), 2.0, Ease::InOutQuad));
    tl.insert(&sub, 0.5, |p| g.rest_value(p)).unwrap();
    tl.add_marker("end", None).unwrap();
    (g, tl)
}

#[test]
fn seek_clamps_and_play_restarts_when_finished() {
    let mut pb = Playback::new();
    assert_eq!(pb.seek(-1.0, 3.0), 0.0);
    assert_eq!(pb.seek(9.0, 3.0), 3.0);
    assert_eq!(pb.seek(f64::NAN, 3.0), 0.0);
    pb.seek(3.0, 3.0);
    pb.play(3.0);
    assert!(pb.is_playing());
    assert_eq!(pb.time(), 0.0);
    pb.play(3.0);
    assert_eq!(pb.time(), 0.0);
}

#[test]
fn advance_clamps_steps_and_pauses_at_the_end() {
    let mut pb = Playback::new();
    assert_eq!(pb.advance(0.1, 1.0, 0.25), 0.0);
    pb.play_from(0.5, 1.0);
    assert_eq!(pb.advance(10.0, 1.0, 0.25), 0.75);
    assert_eq!(pb.advance(0.25, 1.0, 0.25), 1.0);
    assert!(!pb.is_playing());
    pb.pause();
    pb.pause();
    assert_eq!(pb.time(), 1.0);
}

#[test]
fn seek_after_playing_matches_a_fresh_seek() {
    let (mut g, tl) = fixture();
    let behaviors = BehaviorList::new();
    let target = 1.3;

    let mut pb = Playback::new();
    pb.play(tl.duration());
    for _ in 0..20 {
        let t = pb.advance(0.1, tl.duration(), 0.25);
        sample_into(&mut g, &tl, &behaviors, t).unwrap();
    }
    pb.pause();
    let t = pb.seek(target, tl.duration());
    sample_into(&mut g, &tl, &behaviors, t).unwrap();
    let played = g.node(NodeId(1)).unwrap().live;

    let (mut fresh, tl2) = fixture();
    let mut pb2 = Playback::new();
    let t = pb2.seek(target, tl2.duration());
    sample_into(&mut fresh, &tl2, &behaviors, t).unwrap();
    assert_eq!(fresh.node(NodeId(1)).unwrap().live, played);
}

#[test]
fn sampling_before_a_track_uses_rest() {
    let (mut g, tl) = fixture();
    sample_into(&mut g, &tl, &BehaviorList::new(), 0.25).unwrap();
    assert_eq!(g.node(NodeId(1)).unwrap().live.transform.position.x, 0.0);
    sample_into(&mut g, &tl, &BehaviorList::new(), 2.5).unwrap();
    assert_eq!(g.node(NodeId(1)).unwrap().live.transform.position.x, 4.0);
}

#[test]
fn summary_lists_starts_and_markers() {
    let (_, tl) = fixture();
    let s = TimelineSummary::of(&tl);
    assert_eq!(s.animation_start_times, [0.5]);
    assert_eq!(s.markers[0].name, "end");
    assert_eq!(s.markers[0].time, 2.5);
    assert_eq!(s.duration, 2.5);
    let json = serde_json::to_value(&s).unwrap();
    assert!(json.get("animationStartTimes").is_some());
}
