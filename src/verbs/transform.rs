use crate::animation::sub_timeline::SubTimeline;
use crate::animation::tween::{NodeField, Property, Track, TrackValue};
use crate::foundation::error::{ChoreoError, ChoreoResult};
use crate::foundation::ids::NodeId;
use crate::verbs::{Axes, Timing};

/// One tween per present axis toward absolute values.
pub fn to(
    target: NodeId,
    fields: [NodeField; 3],
    axes: &Axes,
    timing: Timing,
) -> ChoreoResult<SubTimeline> {
    tracks(target, fields, axes, timing, TrackValue::Fixed)
}

/// One tween per present axis by offsets from the value at the start.
pub fn by(
    target: NodeId,
    fields: [NodeField; 3],
    axes: &Axes,
    timing: Timing,
) -> ChoreoResult<SubTimeline> {
    tracks(target, fields, axes, timing, TrackValue::CurrentPlus)
}

/// One tween per present axis multiplying the scale at the start.
pub fn scale_by(target: NodeId, axes: &Axes, timing: Timing) -> ChoreoResult<SubTimeline> {
    tracks(
        target,
        NodeField::SCALE,
        axes,
        timing,
        TrackValue::CurrentTimes,
    )
}

fn tracks(
    target: NodeId,
    fields: [NodeField; 3],
    axes: &Axes,
    timing: Timing,
    value: impl Fn(f64) -> TrackValue,
) -> ChoreoResult<SubTimeline> {
    if axes.is_empty() {
        return Err(ChoreoError::validation(format!(
            "transform of {target} names no axis"
        )));
    }
    let mut sub = SubTimeline::new("transform");
    for (field, v) in axes.zip(fields) {
        if !v.is_finite() {
            return Err(ChoreoError::validation(format!(
                "{field:?} target for {target} is not finite"
            )));
        }
        sub.push(Track::tween(
            Property::Node(target, field),
            value(v),
            timing.duration,
            timing.ease,
        ));
    }
    Ok(sub)
}
