use crate::animation::sub_timeline::SubTimeline;
use crate::animation::tween::{MaterialField, NodeField, Property, Track, TrackValue};
use crate::foundation::core::Vec3;
use crate::foundation::error::{ChoreoError, ChoreoResult};
use crate::foundation::ids::NodeId;
use crate::scene::graph::SceneGraph;
use crate::verbs::fade::{appear, disappear, fade_in};
use crate::verbs::{RevealMode, Timing, VerbCtx, no_children, outward};

/// Scale from 0 up to the scale in effect at the start, showing the node first.
pub fn grow(target: NodeId, timing: Timing) -> SubTimeline {
    let mut sub = SubTimeline::new("grow");
    sub.push(appear(target));
    for f in NodeField::SCALE {
        sub.push(
            Track::tween(
                Property::Node(target, f),
                TrackValue::Current,
                timing.duration,
                timing.ease,
            )
            .from(TrackValue::Fixed(0.0))
            .immediate(),
        );
    }
    sub
}

/// Scale down to 0, then hide.
pub fn shrink(target: NodeId, timing: Timing) -> SubTimeline {
    let mut sub = SubTimeline::new("shrink");
    for f in NodeField::SCALE {
        sub.push(Track::tween(
            Property::Node(target, f),
            TrackValue::Fixed(0.0),
            timing.duration,
            timing.ease,
        ));
    }
    sub.push(disappear(target, timing.duration));
    sub
}

/// Back-and-forth along X, `count` times, ending where it started.
pub fn shake(
    cx: &VerbCtx<'_>,
    target: NodeId,
    strength: f64,
    count: u32,
    timing: Timing,
) -> ChoreoResult<SubTimeline> {
    if count == 0 || !strength.is_finite() {
        return Err(ChoreoError::validation(
            "shake needs count >= 1 and a finite strength",
        ));
    }
    let prop = Property::Node(target, NodeField::PosX);
    let base = cx.value(&prop)?;
    let segments = 2 * count + 1;
    let seg = timing.duration / f64::from(segments);

    let mut sub = SubTimeline::new("shake");
    for k in 0..segments {
        let to = if k + 1 == segments {
            base
        } else if k % 2 == 0 {
            base + strength
        } else {
            base - strength
        };
        sub.push_at(
            f64::from(k) * seg,
            Track::tween(prop, TrackValue::Fixed(to), seg, timing.ease),
        );
    }
    Ok(sub)
}

/// Push each child away from the target's bounds center by `distance`, fading it out.
///
/// Children start `stagger` apart (0 by default) in child order.
pub fn explode(
    cx: &VerbCtx<'_>,
    target: NodeId,
    distance: f64,
    timing: Timing,
) -> ChoreoResult<SubTimeline> {
    let children = cx.graph.node(target)?.children.clone();
    if children.is_empty() {
        return Err(no_children("explode", target));
    }
    let center = cx
        .local_bounds(target)?
        .map(|b| b.center())
        .unwrap_or(Vec3::ZERO);
    let stagger = timing.stagger.unwrap_or(0.0);

    let mut sub = SubTimeline::new("explode");
    for (i, child) in children.iter().enumerate() {
        let local = cx.transform(*child)?;
        let own = cx
            .local_bounds(*child)?
            .map(|b| b.center())
            .unwrap_or(Vec3::ZERO);
        let dir = outward(local.to_affine().transform_point3(own), center);
        let travel = dir * distance as f32;

        let mut piece = SubTimeline::new("explode");
        for (f, d) in NodeField::POSITION.into_iter().zip(travel.to_array()) {
            piece.push(Track::tween(
                Property::Node(*child, f),
                TrackValue::CurrentPlus(f64::from(d)),
                timing.duration,
                timing.ease,
            ));
        }
        for m in cx.graph.collect_materials(*child)? {
            piece.push(Track::tween(
                Property::Material(m, MaterialField::Opacity),
                TrackValue::Fixed(0.0),
                timing.duration,
                timing.ease,
            ));
        }
        piece.push(disappear(*child, timing.duration));
        sub.merge(piece, i as f64 * stagger);
    }
    Ok(sub)
}

/// Uncover `target`: a clipping-plane sweep, or its children fading in one by one.
///
/// Staggered reveals space children `stagger` apart (`duration / n` by default), each
/// fading over `duration / n`.
pub fn reveal(
    graph: &SceneGraph,
    target: NodeId,
    mode: RevealMode,
    timing: Timing,
) -> ChoreoResult<SubTimeline> {
    let mut sub = SubTimeline::new("reveal");
    match mode {
        RevealMode::Clip => {
            sub.push(appear(target));
            sub.push(
                Track::tween(
                    Property::Node(target, NodeField::ClipReveal),
                    TrackValue::Fixed(1.0),
                    timing.duration,
                    timing.ease,
                )
                .from(TrackValue::Fixed(0.0))
                .immediate(),
            );
        }
        RevealMode::Stagger => {
            let children = &graph.node(target)?.children;
            if children.is_empty() {
                return Err(no_children("reveal", target));
            }
            let each = timing.duration / children.len() as f64;
            let stagger = timing.stagger.unwrap_or(each);
            sub.push(Track::step(Property::Node(target, NodeField::Visible), 1.0));
            for (i, child) in children.iter().enumerate() {
                let piece = fade_in(
                    graph,
                    *child,
                    None,
                    Timing {
                        duration: each,
                        ..timing
                    },
                )?;
                sub.merge(piece, i as f64 * stagger);
            }
        }
    }
    Ok(sub)
}

/// Show children one at a time, `stagger` apart (`duration / n` by default).
pub fn typewriter(graph: &SceneGraph, target: NodeId, timing: Timing) -> ChoreoResult<SubTimeline> {
    let children = &graph.node(target)?.children;
    if children.is_empty() {
        return Err(no_children("typewriter", target));
    }
    let n = children.len() as f64;
    let stagger = timing.stagger.unwrap_or(timing.duration / n);

    let mut sub = SubTimeline::new("typewriter");
    sub.push(Track::step(Property::Node(target, NodeField::Visible), 1.0));
    for (i, child) in children.iter().enumerate() {
        sub.push_at(i as f64 * stagger, appear(*child));
    }
    sub.hold = n * stagger;
    Ok(sub)
}
