use crate::animation::sub_timeline::SubTimeline;
use crate::animation::tween::{MaterialField, NodeField, Property, Track, TrackValue};
use crate::diff::symbols::{EditOp, compute_transform};
use crate::foundation::core::Transform;
use crate::foundation::error::{ChoreoError, ChoreoResult};
use crate::foundation::ids::NodeId;
use crate::scene::graph::SceneGraph;
use crate::verbs::fade::disappear;
use crate::verbs::{Timing, VerbCtx};

fn symbols(graph: &SceneGraph, id: NodeId) -> ChoreoResult<Vec<(NodeId, String)>> {
    graph
        .node(id)?
        .children
        .iter()
        .map(|c| -> ChoreoResult<(NodeId, String)> {
            Ok((*c, graph.node(*c)?.symbol.clone().unwrap_or_default()))
        })
        .collect()
}

fn visible_step(id: NodeId, visible: bool, at: f64) -> Track {
    Track::step(
        Property::Node(id, NodeField::Visible),
        if visible { 1.0 } else { 0.0 },
    )
    .at(at)
}

/// Morph the symbols of `source` into those of `dest`.
///
/// Matched source symbols travel to their counterpart's placement (expressed in the
/// source symbol's parent frame) and hand over to it at the end; unmatched source symbols
/// fade out; destination-only symbols fade in. At the end `source` is hidden and `dest`
/// shows the destination rendering.
pub fn morph(
    cx: &VerbCtx<'_>,
    source: NodeId,
    dest: NodeId,
    reverse: bool,
    timing: Timing,
) -> ChoreoResult<SubTimeline> {
    if source == dest {
        return Err(ChoreoError::validation(format!(
            "cannot morph {source} into itself"
        )));
    }
    let src = symbols(cx.graph, source)?;
    let dst = symbols(cx.graph, dest)?;
    let src_names: Vec<&str> = src.iter().map(|(_, n)| n.as_str()).collect();
    let dst_names: Vec<&str> = dst.iter().map(|(_, n)| n.as_str()).collect();
    let ops = compute_transform(&src_names, &dst_names, reverse)?;

    let d = timing.duration;
    let mut sub = SubTimeline::hold("morphTo", d);
    sub.push(visible_step(dest, true, 0.0));

    for op in ops {
        match op {
            EditOp::Match { from, to } => {
                let (s, t) = (src[from].0, dst[to].0);
                let parent = cx.graph.node(s)?.parent.unwrap_or(NodeId::ROOT);
                let goal =
                    Transform::from_affine(cx.world(parent)?.inverse() * cx.world(t)?);
                let uniform = cx
                    .transform(s)?
                    .uniform_scale
                    .filter(|u| *u != 0.0)
                    .unwrap_or(1.0);
                let scale = goal.scale / uniform;

                let targets = NodeField::POSITION
                    .into_iter()
                    .zip(goal.position.to_array())
                    .chain(NodeField::SCALE.into_iter().zip(scale.to_array()));
                for (field, v) in targets {
                    sub.push(Track::tween(
                        Property::Node(s, field),
                        TrackValue::Fixed(f64::from(v)),
                        d,
                        timing.ease,
                    ));
                }
                sub.push(disappear(s, d));
                sub.push(visible_step(t, false, 0.0));
                sub.push(visible_step(t, true, d));
            }
            EditOp::Delete { from } => {
                let s = src[from].0;
                for m in cx.graph.collect_materials(s)? {
                    sub.push(Track::tween(
                        Property::Material(m, MaterialField::Opacity),
                        TrackValue::Fixed(0.0),
                        d,
                        timing.ease,
                    ));
                }
                sub.push(disappear(s, d));
            }
            EditOp::Insert { to } => {
                let t = dst[to].0;
                sub.push(visible_step(t, true, 0.0));
                for m in cx.graph.collect_materials(t)? {
                    sub.push(
                        Track::tween(
                            Property::Material(m, MaterialField::Opacity),
                            TrackValue::Rest,
                            d,
                            timing.ease,
                        )
                        .from(TrackValue::Fixed(0.0)),
                    );
                }
            }
        }
    }
    sub.push(disappear(source, d));
    Ok(sub)
}
