use crate::animation::sub_timeline::SubTimeline;
use crate::animation::tween::{MaterialField, NodeField, Property, Track, TrackValue};
use crate::foundation::core::Rgba;
use crate::foundation::error::{ChoreoError, ChoreoResult};
use crate::foundation::ids::{MaterialId, NodeId};
use crate::scene::graph::SceneGraph;
use crate::verbs::Timing;

/// Visible step at local 0 that also hides the node before it, when nothing earlier
/// drives its visibility.
pub(crate) fn appear(target: NodeId) -> Track {
    Track::step(Property::Node(target, NodeField::Visible), 1.0)
        .from(TrackValue::Fixed(0.0))
        .immediate()
}

/// Hidden step at local `at`.
pub(crate) fn disappear(target: NodeId, at: f64) -> Track {
    Track::step(Property::Node(target, NodeField::Visible), 0.0).at(at)
}

fn opacity_tracks(
    materials: &[MaterialId],
    from: Option<TrackValue>,
    to: TrackValue,
    timing: Timing,
) -> impl Iterator<Item = Track> + '_ {
    materials.iter().map(move |m| {
        let t = Track::tween(
            Property::Material(*m, MaterialField::Opacity),
            to,
            timing.duration,
            timing.ease,
        );
        match from {
            Some(from) => t.from(from).immediate(),
            None => t,
        }
    })
}

fn check_opacity(v: f64) -> ChoreoResult<f64> {
    if (0.0..=1.0).contains(&v) {
        Ok(v)
    } else {
        Err(ChoreoError::validation(format!(
            "opacity must be within [0, 1] (got {v})"
        )))
    }
}

/// Show at local 0, then fade every material under `target` from 0 to `opacity`.
pub fn fade_in(
    graph: &SceneGraph,
    target: NodeId,
    opacity: Option<f64>,
    timing: Timing,
) -> ChoreoResult<SubTimeline> {
    let to = match opacity {
        Some(v) => TrackValue::Fixed(check_opacity(v)?),
        None => TrackValue::Rest,
    };
    let materials = graph.collect_materials(target)?;
    let mut sub = SubTimeline::new("fadeIn");
    sub.push(appear(target));
    for t in opacity_tracks(&materials, Some(TrackValue::Fixed(0.0)), to, timing) {
        sub.push(t);
    }
    sub.hold = timing.duration;
    Ok(sub)
}

/// Fade every material under `target` to `opacity` (0 by default).
///
/// The node is hidden only when the target opacity is 0, and only once the fade ends.
pub fn fade_out(
    graph: &SceneGraph,
    target: NodeId,
    opacity: Option<f64>,
    timing: Timing,
) -> ChoreoResult<SubTimeline> {
    let to = check_opacity(opacity.unwrap_or(0.0))?;
    let materials = graph.collect_materials(target)?;
    let mut sub = SubTimeline::new("fadeOut");
    for t in opacity_tracks(&materials, None, TrackValue::Fixed(to), timing) {
        sub.push(t);
    }
    if to == 0.0 {
        sub.push(disappear(target, timing.duration));
    }
    sub.hold = timing.duration;
    Ok(sub)
}

/// Tween every material under `target` to `opacity` without touching visibility.
pub fn set_opacity(
    graph: &SceneGraph,
    target: NodeId,
    opacity: f64,
    timing: Timing,
) -> ChoreoResult<SubTimeline> {
    let to = TrackValue::Fixed(check_opacity(opacity)?);
    let materials = graph.collect_materials(target)?;
    let mut sub = SubTimeline::new("setOpacity");
    for t in opacity_tracks(&materials, None, to, timing) {
        sub.push(t);
    }
    Ok(sub)
}

/// Tween the color channels of every material under `target`.
pub fn change_color(
    graph: &SceneGraph,
    target: NodeId,
    color: Rgba,
    timing: Timing,
) -> ChoreoResult<SubTimeline> {
    let mut sub = SubTimeline::new("changeColor");
    for m in graph.collect_materials(target)? {
        for (field, v) in [
            (MaterialField::ColorR, color.r),
            (MaterialField::ColorG, color.g),
            (MaterialField::ColorB, color.b),
        ] {
            sub.push(Track::tween(
                Property::Material(m, field),
                TrackValue::Fixed(f64::from(v)),
                timing.duration,
                timing.ease,
            ));
        }
    }
    sub.hold = timing.duration;
    Ok(sub)
}

/// Instantaneous show or hide.
pub fn visibility(target: NodeId, visible: bool) -> SubTimeline {
    let mut sub = SubTimeline::new(if visible { "show" } else { "hide" });
    sub.push(Track::step(
        Property::Node(target, NodeField::Visible),
        if visible { 1.0 } else { 0.0 },
    ));
    sub
}
