use super::*;
use crate::animation::tween::{MaterialField, TrackKind};
use crate::foundation::ids::MaterialId;
use crate::scene::node::{MaterialState, NodeKind, NodeState, SceneNode, ShapeKind};

struct Fixture {
    graph: SceneGraph,
    timeline: MainTimeline,
    shape_mat: MaterialId,
}

fn fixture() -> Fixture {
    let mut graph = SceneGraph::new();
    let shape_mat = graph.create_material(MaterialState::default());
    let mut shape = SceneNode::new(
        NodeId(1),
        NodeKind::Shape(ShapeKind::Circle { radius: 1.0 }),
        NodeState::default(),
    );
    shape.materials = vec![shape_mat];
    shape.local_bounds = Some(Aabb::centered(Vec3::new(1.0, 1.0, 0.0)));
    graph.attach(shape, NodeId::ROOT).unwrap();

    graph
        .attach(
            SceneNode::new(NodeId(2), NodeKind::Group, NodeState::default()),
            NodeId::ROOT,
        )
        .unwrap();
    for (id, x) in [(3u64, -1.0f32), (4, 1.0)] {
        let mut state = NodeState::default();
        state.transform.position.x = x;
        let mut glyph = SceneNode::new(NodeId(id), NodeKind::Generic, state);
        glyph.symbol = Some(format!("g{id}"));
        glyph.local_bounds = Some(Aabb::centered(Vec3::splat(0.25)));
        glyph.materials = vec![graph.create_material(MaterialState::default())];
        graph.attach(glyph, NodeId(2)).unwrap();
    }
    Fixture {
        graph,
        timeline: MainTimeline::new(),
        shape_mat,
    }
}

impl Fixture {
    fn place(&mut self, verb: &Verb, target: u64, params: AnimParams) -> (f64, f64) {
        let at = self.timeline.resolve(&params.time_ref()).unwrap();
        let sub = {
            let cx = VerbCtx {
                graph: &self.graph,
                timeline: &self.timeline,
                at,
                default_duration: 0.5,
                default_ease: Ease::Linear,
            };
            build(verb, NodeId(target), &params, &cx).unwrap()
        };
        let graph = &self.graph;
        let p = self
            .timeline
            .insert(&sub, at, |prop| graph.rest_value(prop))
            .unwrap();
        (p.start, p.end)
    }

    fn value(&self, prop: Property, t: f64) -> f64 {
        let rest = self.graph.rest_value(&prop).unwrap();
        self.timeline.value_at(&prop, t, rest)
    }
}

fn visible(id: u64) -> Property {
    Property::Node(NodeId(id), NodeField::Visible)
}

#[test]
fn move_to_only_tweens_present_axes() {
    let mut f = fixture();
    let (s, e) = f.place(&Verb::MoveTo(Axes::xy(2.0, 4.0)), 1, AnimParams::default());
    assert_eq!((s, e), (0.0, 0.5));
    assert_eq!(f.timeline.properties().count(), 2);
    assert_eq!(f.value(Property::Node(NodeId(1), NodeField::PosY), 0.25), 2.0);

    f.place(&Verb::MoveBy(Axes::xy(1.0, 0.0)), 1, AnimParams::default());
    assert_eq!(f.value(Property::Node(NodeId(1), NodeField::PosX), 1.0), 3.0);

    let err = {
        let cx = VerbCtx {
            graph: &f.graph,
            timeline: &f.timeline,
            at: 0.0,
            default_duration: 0.5,
            default_ease: Ease::Linear,
        };
        build(&Verb::MoveTo(Axes::default()), NodeId(1), &AnimParams::default(), &cx)
    };
    assert!(matches!(err, Err(ChoreoError::Validation(_))));
}

#[test]
fn sets_are_instantaneous_unless_timed() {
    let mut f = fixture();
    let (s, e) = f.place(&Verb::SetScale(Axes::splat(2.0)), 1, AnimParams::at(1.0));
    assert_eq!((s, e), (1.0, 1.0));
    assert_eq!(f.value(Property::Node(NodeId(1), NodeField::ScaleZ), 1.0), 2.0);
    assert_eq!(f.value(Property::Node(NodeId(1), NodeField::ScaleZ), 0.9), 1.0);

    f.place(&Verb::ScaleBy(Axes::splat(1.5)), 1, AnimParams::default());
    assert_eq!(f.value(Property::Node(NodeId(1), NodeField::ScaleX), 5.0), 3.0);
}

#[test]
fn fade_in_hides_until_it_begins() {
    let mut f = fixture();
    let op = Property::Material(f.shape_mat, MaterialField::Opacity);
    f.place(&Verb::FadeIn { opacity: None }, 1, AnimParams::at(1.0).duration(1.0));
    assert_eq!(f.value(visible(1), 0.5), 0.0);
    assert_eq!(f.value(op, 0.5), 0.0);
    assert_eq!(f.value(visible(1), 1.0), 1.0);
    assert_eq!(f.value(op, 1.5), 0.5);
    assert_eq!(f.value(op, 3.0), 1.0);
}

#[test]
fn partial_fade_out_keeps_the_node_visible() {
    let mut f = fixture();
    let op = Property::Material(f.shape_mat, MaterialField::Opacity);
    f.place(&Verb::FadeOut { opacity: Some(0.3) }, 1, AnimParams::default());
    let (_, end) = f.place(&Verb::FadeOut { opacity: None }, 1, AnimParams::default());
    assert_eq!(end, 1.0);
    assert_eq!(f.value(visible(1), 0.75), 1.0);
    assert_eq!(f.value(visible(1), 0.999), 1.0);
    assert_eq!(f.value(visible(1), 1.0), 0.0);
    assert_eq!(f.value(op, 0.5), 0.3);
    assert_eq!(f.value(op, end), 0.0);
}

#[test]
fn out_of_range_opacity_is_rejected() {
    let f = fixture();
    let cx = VerbCtx {
        graph: &f.graph,
        timeline: &f.timeline,
        at: 0.0,
        default_duration: 0.5,
        default_ease: Ease::Linear,
    };
    let r = build(
        &Verb::FadeIn { opacity: Some(1.5) },
        NodeId(1),
        &AnimParams::default(),
        &cx,
    );
    assert!(r.is_err());
    assert!(build(&Verb::Grow, NodeId(99), &AnimParams::default(), &cx).is_err());
}

#[test]
fn grow_starts_from_zero_and_restores_scale() {
    let mut f = fixture();
    f.place(&Verb::Grow, 1, AnimParams::at(1.0));
    let sx = Property::Node(NodeId(1), NodeField::ScaleX);
    assert_eq!(f.value(sx, 0.0), 0.0);
    assert_eq!(f.value(sx, 2.0), 1.0);
    f.place(&Verb::Shrink, 1, AnimParams::default());
    assert_eq!(f.value(sx, 2.0), 0.0);
    assert_eq!(f.value(visible(1), 2.0), 0.0);
}

#[test]
fn shake_ends_where_it_started() {
    let mut f = fixture();
    f.place(&Verb::SetPosition(Axes::xy(5.0, 0.0)), 1, AnimParams::default());
    let (s, e) = f.place(
        &Verb::Shake {
            strength: Some(0.5),
            count: Some(2),
        },
        1,
        AnimParams::default().duration(1.0),
    );
    let px = Property::Node(NodeId(1), NodeField::PosX);
    assert_eq!(f.value(px, s + 0.2), 5.5);
    assert_eq!(f.value(px, s + 0.4), 4.5);
    assert_eq!(f.value(px, e), 5.0);
    let shakes = f
        .timeline
        .tracks_for(&px)
        .iter()
        .filter(|t| t.kind == TrackKind::Tween && t.duration > 0.0)
        .count();
    assert_eq!(shakes, 5);
}

#[test]
fn explode_pushes_children_away_from_the_center() {
    let mut f = fixture();
    f.place(&Verb::Explode { distance: Some(2.0) }, 2, AnimParams::default().stagger(0.1));
    let left = Property::Node(NodeId(3), NodeField::PosX);
    let right = Property::Node(NodeId(4), NodeField::PosX);
    assert_eq!(f.value(left, 1.0), -3.0);
    assert_eq!(f.value(right, 1.0), 3.0);
    assert_eq!(f.timeline.tracks_for(&right)[0].start, 0.1);
    assert_eq!(f.value(visible(4), 0.59), 1.0);
    assert_eq!(f.value(visible(4), 0.6), 0.0);
    assert_eq!(f.timeline.duration(), 0.6);

    let cx = VerbCtx {
        graph: &f.graph,
        timeline: &f.timeline,
        at: 0.0,
        default_duration: 0.5,
        default_ease: Ease::Linear,
    };
    assert!(build(&Verb::Explode { distance: None }, NodeId(1), &AnimParams::default(), &cx).is_err());
}

#[test]
fn typewriter_shows_children_in_order() {
    let mut f = fixture();
    let (_, e) = f.place(&Verb::Typewriter, 2, AnimParams::at(1.0).duration(1.0));
    assert_eq!(e, 2.0);
    assert_eq!(f.value(visible(3), 0.9), 0.0);
    assert_eq!(f.value(visible(3), 1.0), 1.0);
    assert_eq!(f.value(visible(4), 1.4), 0.0);
    assert_eq!(f.value(visible(4), 1.5), 1.0);
}

#[test]
fn reveal_modes() {
    let mut f = fixture();
    f.place(
        &Verb::Reveal {
            mode: RevealMode::Clip,
        },
        1,
        AnimParams::default().duration(1.0),
    );
    let clip = Property::Node(NodeId(1), NodeField::ClipReveal);
    assert_eq!(f.value(clip, 0.5), 0.5);

    let (_, e) = f.place(
        &Verb::Reveal {
            mode: RevealMode::Stagger,
        },
        2,
        AnimParams::default().duration(1.0),
    );
    assert_eq!(e, 2.0);
    let m4 = f.graph.node(NodeId(4)).unwrap().materials[0];
    let op4 = Property::Material(m4, MaterialField::Opacity);
    assert_eq!(f.value(op4, 1.25), 0.0);
    assert_eq!(f.value(op4, 1.75), 0.5);
}

#[test]
fn colors_tween_every_channel() {
    let mut f = fixture();
    f.place(
        &Verb::ChangeColor {
            color: Rgba::rgb(1.0, 0.0, 0.5),
        },
        1,
        AnimParams::default(),
    );
    let g = Property::Material(f.shape_mat, MaterialField::ColorG);
    assert_eq!(f.value(g, 0.25), 0.5);
    assert_eq!(f.value(g, 1.0), 0.0);
}

#[test]
fn verbs_parse_from_script_json() {
    let v: Verb = serde_json::from_str(r#"{"op":"moveTo","x":1,"target":"a"}"#).unwrap();
    assert_eq!(
        v,
        Verb::MoveTo(Axes {
            x: Some(1.0),
            ..Axes::default()
        })
    );
    let v: Verb = serde_json::from_str(r#"{"op":"show","t":"<"}"#).unwrap();
    assert_eq!(v, Verb::Show);
    let v: Verb = serde_json::from_str(r##"{"op":"changeColor","color":"#ff0000"}"##).unwrap();
    assert_eq!(v.name(), "changeColor");

    let named: Verb<String> = serde_json::from_str(r#"{"op":"morphTo","into":"b"}"#).unwrap();
    assert_eq!(named.referenced().map(String::as_str), Some("b"));
    let bound = named
        .try_map_refs(|name| if name == "b" { Ok(NodeId(9)) } else { Err(()) })
        .unwrap();
    assert_eq!(
        bound,
        Verb::MorphTo {
            into: NodeId(9),
            reverse: false
        }
    );

    let p: AnimParams =
        serde_json::from_str(r#"{"t":"intro+0.5","duration":2,"ease":"power1.out"}"#).unwrap();
    assert_eq!(p.time_ref(), TimeRef::marker("intro", 0.5));
    assert_eq!(p.ease, Some(Ease::OutQuad));
    assert_eq!(AnimParams::default().time_ref(), TimeRef::RelativeToCursor(0.0));
}
