//! Animation verbs. Every verb call produces exactly one [`SubTimeline`].

/// Grow, shrink, shake, explode, reveal and typewriter.
pub mod composite;
/// Opacity, color and visibility verbs.
pub mod fade;
/// Symbol-diff morph between two renderings.
pub mod morph;
/// Move, scale and rotate verbs.
pub mod transform;

use crate::animation::ease::Ease;
use crate::animation::sub_timeline::SubTimeline;
use crate::animation::tween::{NodeField, Property};
use crate::foundation::core::{Affine3A, Aabb, Rgba, Transform, Vec3, check_seconds};
use crate::foundation::error::{ChoreoError, ChoreoResult};
use crate::foundation::ids::NodeId;
use crate::scene::graph::SceneGraph;
use crate::timeline::main_timeline::MainTimeline;
use crate::timeline::time_ref::TimeRef;

/// Optional per-axis values. Absent axes are left alone.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Axes {
    /// X component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// Y component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// Z component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl Axes {
    /// All three axes.
    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
        }
    }

    /// Same value on every axis.
    pub fn splat(v: f64) -> Self {
        Self::xyz(v, v, v)
    }

    /// Only X and Y.
    pub fn xy(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: None,
        }
    }

    /// Present axes zipped with `fields`.
    pub fn zip(&self, fields: [NodeField; 3]) -> impl Iterator<Item = (NodeField, f64)> {
        [self.x, self.y, self.z]
            .into_iter()
            .zip(fields)
            .filter_map(|(v, f)| v.map(|v| (f, v)))
    }

    /// Return `true` when no axis is set.
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.z.is_none()
    }
}

impl From<Vec3> for Axes {
    fn from(v: Vec3) -> Self {
        Self::xyz(f64::from(v.x), f64::from(v.y), f64::from(v.z))
    }
}

/// How `reveal` uncovers its target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RevealMode {
    /// Children fade in one after another.
    #[default]
    Stagger,
    /// The clipping plane sweeps the whole node into view.
    Clip,
}

/// One animation request on a target node.
///
/// `R` is how other nodes are referenced: [`NodeId`] after binding, script-local names
/// before.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Verb<R = NodeId> {
    /// Tween position to absolute values.
    MoveTo(Axes),
    /// Tween position by offsets from the current value.
    MoveBy(Axes),
    /// Tween scale to absolute values.
    ScaleTo(Axes),
    /// Tween scale by factors of the current value.
    ScaleBy(Axes),
    /// Tween Euler rotation (radians) to absolute values.
    RotateTo(Axes),
    /// Tween Euler rotation by offsets.
    RotateBy(Axes),
    /// Set position (instantaneous unless a duration is given).
    SetPosition(Axes),
    /// Set scale (instantaneous unless a duration is given).
    SetScale(Axes),
    /// Set rotation (instantaneous unless a duration is given).
    SetRotation(Axes),
    /// Show, then fade every material from 0 to `opacity` (rest opacity by default).
    FadeIn {
        /// Target opacity.
        #[serde(default)]
        opacity: Option<f64>,
    },
    /// Fade every material to `opacity` (0 by default); hide at the end when it reaches 0.
    FadeOut {
        /// Target opacity.
        #[serde(default)]
        opacity: Option<f64>,
    },
    /// Set material opacity (instantaneous unless a duration is given).
    SetOpacity {
        /// Target opacity.
        opacity: f64,
    },
    /// Tween every material's color.
    ChangeColor {
        /// Target color (`"#rrggbb"` or channels).
        #[serde(deserialize_with = "crate::foundation::core::deserialize_color")]
        color: Rgba,
    },
    /// Make visible at the resolved time.
    Show,
    /// Hide at the resolved time.
    Hide,
    /// Scale up from 0 to the current scale.
    Grow,
    /// Scale down to 0, then hide.
    Shrink,
    /// Shake horizontally around the current position.
    Shake {
        /// Peak displacement.
        #[serde(default)]
        strength: Option<f64>,
        /// Number of back-and-forth cycles.
        #[serde(default)]
        count: Option<u32>,
    },
    /// Push children outward from the center and fade them out.
    Explode {
        /// Travel distance.
        #[serde(default)]
        distance: Option<f64>,
    },
    /// Uncover the target.
    Reveal {
        /// Reveal style.
        #[serde(default)]
        mode: RevealMode,
    },
    /// Show children one at a time.
    Typewriter,
    /// Morph this rendering into another by matching symbols.
    MorphTo {
        /// Destination rendering.
        into: R,
        /// Diff both sequences back to front.
        #[serde(default)]
        reverse: bool,
    },
}

impl<R> Verb<R> {
    /// Verb name as used in scripts and labels.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MoveTo(_) => "moveTo",
            Self::MoveBy(_) => "moveBy",
            Self::ScaleTo(_) => "scaleTo",
            Self::ScaleBy(_) => "scaleBy",
            Self::RotateTo(_) => "rotateTo",
            Self::RotateBy(_) => "rotateBy",
            Self::SetPosition(_) => "setPosition",
            Self::SetScale(_) => "setScale",
            Self::SetRotation(_) => "setRotation",
            Self::FadeIn { .. } => "fadeIn",
            Self::FadeOut { .. } => "fadeOut",
            Self::SetOpacity { .. } => "setOpacity",
            Self::ChangeColor { .. } => "changeColor",
            Self::Show => "show",
            Self::Hide => "hide",
            Self::Grow => "grow",
            Self::Shrink => "shrink",
            Self::Shake { .. } => "shake",
            Self::Explode { .. } => "explode",
            Self::Reveal { .. } => "reveal",
            Self::Typewriter => "typewriter",
            Self::MorphTo { .. } => "morphTo",
        }
    }

    /// Rebind node references.
    pub fn try_map_refs<T, E>(self, mut f: impl FnMut(R) -> Result<T, E>) -> Result<Verb<T>, E> {
        Ok(match self {
            Self::MoveTo(a) => Verb::MoveTo(a),
            Self::MoveBy(a) => Verb::MoveBy(a),
            Self::ScaleTo(a) => Verb::ScaleTo(a),
            Self::ScaleBy(a) => Verb::ScaleBy(a),
            Self::RotateTo(a) => Verb::RotateTo(a),
            Self::RotateBy(a) => Verb::RotateBy(a),
            Self::SetPosition(a) => Verb::SetPosition(a),
            Self::SetScale(a) => Verb::SetScale(a),
            Self::SetRotation(a) => Verb::SetRotation(a),
            Self::FadeIn { opacity } => Verb::FadeIn { opacity },
            Self::FadeOut { opacity } => Verb::FadeOut { opacity },
            Self::SetOpacity { opacity } => Verb::SetOpacity { opacity },
            Self::ChangeColor { color } => Verb::ChangeColor { color },
            Self::Show => Verb::Show,
            Self::Hide => Verb::Hide,
            Self::Grow => Verb::Grow,
            Self::Shrink => Verb::Shrink,
            Self::Shake { strength, count } => Verb::Shake { strength, count },
            Self::Explode { distance } => Verb::Explode { distance },
            Self::Reveal { mode } => Verb::Reveal { mode },
            Self::Typewriter => Verb::Typewriter,
            Self::MorphTo { into, reverse } => Verb::MorphTo {
                into: f(into)?,
                reverse,
            },
        })
    }

    /// Referenced node, if any.
    pub fn referenced(&self) -> Option<&R> {
        match self {
            Self::MorphTo { into, .. } => Some(into),
            _ => None,
        }
    }
}

/// Placement and timing shared by every verb.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnimParams {
    /// Insertion point; the append cursor when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t: Option<TimeRef>,
    /// Duration override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Easing override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ease: Option<Ease>,
    /// Delay between consecutive children for verbs acting on children.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stagger: Option<f64>,
}

impl AnimParams {
    /// Parameters placed at `t`.
    pub fn at(t: impl Into<TimeRef>) -> Self {
        Self {
            t: Some(t.into()),
            ..Self::default()
        }
    }

    /// Builder-style duration override.
    pub fn duration(mut self, secs: f64) -> Self {
        self.duration = Some(secs);
        self
    }

    /// Builder-style easing override.
    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = Some(ease);
        self
    }

    /// Builder-style stagger override.
    pub fn stagger(mut self, secs: f64) -> Self {
        self.stagger = Some(secs);
        self
    }

    /// Time reference to resolve (cursor when absent).
    pub fn time_ref(&self) -> TimeRef {
        self.t.clone().unwrap_or_default()
    }
}

/// Read-only view verbs build against: the scene and timeline as of the resolved start.
pub struct VerbCtx<'a> {
    /// Scene graph.
    pub graph: &'a SceneGraph,
    /// Main timeline before this verb's insertion.
    pub timeline: &'a MainTimeline,
    /// Resolved absolute start of the verb.
    pub at: f64,
    /// Duration used when a verb does not specify one.
    pub default_duration: f64,
    /// Easing used when a verb does not specify one.
    pub default_ease: Ease,
}

impl VerbCtx<'_> {
    /// Value `property` will have at the verb's start.
    pub fn value(&self, property: &Property) -> ChoreoResult<f64> {
        let rest = self.graph.rest_value(property)?;
        Ok(self.timeline.value_at(property, self.at, rest))
    }

    /// Node transform at the verb's start.
    pub fn transform(&self, id: NodeId) -> ChoreoResult<Transform> {
        let node = self.graph.node(id)?;
        let mut state = node.rest;
        for f in NodeField::POSITION
            .into_iter()
            .chain(NodeField::ROTATION)
            .chain(NodeField::SCALE)
        {
            state.set_field(f, self.value(&Property::Node(id, f))?);
        }
        Ok(state.transform)
    }

    /// World matrix of `id` at the verb's start.
    pub fn world(&self, id: NodeId) -> ChoreoResult<Affine3A> {
        self.graph.world_with(id, |n| self.transform(n))
    }

    /// Bounds of `id`'s subtree in its own frame at the verb's start.
    pub fn local_bounds(&self, id: NodeId) -> ChoreoResult<Option<Aabb>> {
        let mut local = |n: NodeId| self.transform(n);
        self.graph.subtree_bounds_with(id, &mut local)
    }

    fn duration(&self, params: &AnimParams) -> ChoreoResult<f64> {
        check_seconds(
            "duration",
            params.duration.unwrap_or(self.default_duration),
        )
    }

    fn ease(&self, params: &AnimParams) -> Ease {
        params.ease.unwrap_or(self.default_ease)
    }
}

/// Duration and easing after applying defaults.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timing {
    /// Seconds.
    pub duration: f64,
    /// Easing.
    pub ease: Ease,
    /// Optional child stagger.
    pub stagger: Option<f64>,
}

/// Build the sub-timeline of `verb` on `target`.
pub fn build(
    verb: &Verb,
    target: NodeId,
    params: &AnimParams,
    cx: &VerbCtx<'_>,
) -> ChoreoResult<SubTimeline> {
    cx.graph.node(target)?;
    let timing = Timing {
        duration: cx.duration(params)?,
        ease: cx.ease(params),
        stagger: params.stagger.map(|s| check_seconds("stagger", s)).transpose()?,
    };
    // Sets are instantaneous unless a duration was asked for.
    let set_timing = Timing {
        duration: check_seconds("duration", params.duration.unwrap_or(0.0))?,
        ..timing
    };

    let mut sub = match verb {
        Verb::MoveTo(a) => transform::to(target, NodeField::POSITION, a, timing)?,
        Verb::MoveBy(a) => transform::by(target, NodeField::POSITION, a, timing)?,
        Verb::ScaleTo(a) => transform::to(target, NodeField::SCALE, a, timing)?,
        Verb::ScaleBy(a) => transform::scale_by(target, a, timing)?,
        Verb::RotateTo(a) => transform::to(target, NodeField::ROTATION, a, timing)?,
        Verb::RotateBy(a) => transform::by(target, NodeField::ROTATION, a, timing)?,
        Verb::SetPosition(a) => transform::to(target, NodeField::POSITION, a, set_timing)?,
        Verb::SetScale(a) => transform::to(target, NodeField::SCALE, a, set_timing)?,
        Verb::SetRotation(a) => transform::to(target, NodeField::ROTATION, a, set_timing)?,
        Verb::FadeIn { opacity } => fade::fade_in(cx.graph, target, *opacity, timing)?,
        Verb::FadeOut { opacity } => fade::fade_out(cx.graph, target, *opacity, timing)?,
        Verb::SetOpacity { opacity } => {
            fade::set_opacity(cx.graph, target, *opacity, set_timing)?
        }
        Verb::ChangeColor { color } => fade::change_color(cx.graph, target, *color, timing)?,
        Verb::Show => fade::visibility(target, true),
        Verb::Hide => fade::visibility(target, false),
        Verb::Grow => composite::grow(target, timing),
        Verb::Shrink => composite::shrink(target, timing),
        Verb::Shake { strength, count } => composite::shake(
            cx,
            target,
            strength.unwrap_or(0.1),
            count.unwrap_or(3),
            timing,
        )?,
        Verb::Explode { distance } => {
            composite::explode(cx, target, distance.unwrap_or(1.0), timing)?
        }
        Verb::Reveal { mode } => composite::reveal(cx.graph, target, *mode, timing)?,
        Verb::Typewriter => composite::typewriter(cx.graph, target, timing)?,
        Verb::MorphTo { into, reverse } => morph::morph(cx, target, *into, *reverse, timing)?,
    };
    sub.label = verb.name().to_owned();
    Ok(sub)
}

/// Outward direction of a piece relative to a center, falling back to +Y.
pub(crate) fn outward(piece: Vec3, center: Vec3) -> Vec3 {
    (piece - center).try_normalize().unwrap_or(Vec3::Y)
}

pub(crate) fn no_children(verb: &str, target: NodeId) -> ChoreoError {
    ChoreoError::validation(format!("{verb} needs a node with children ({target} has none)"))
}

#[cfg(test)]
#[path = "../../tests/unit/verbs/mod.rs"]
mod tests;
