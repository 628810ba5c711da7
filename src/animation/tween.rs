use crate::animation::ease::Ease;
use crate::foundation::ids::{MaterialId, NodeId};

/// Animatable scalar field on a scene node.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum NodeField {
    /// Position X.
    PosX,
    /// Position Y.
    PosY,
    /// Position Z.
    PosZ,
    /// Euler rotation X (radians).
    RotX,
    /// Euler rotation Y (radians).
    RotY,
    /// Euler rotation Z (radians).
    RotZ,
    /// Scale X.
    ScaleX,
    /// Scale Y.
    ScaleY,
    /// Scale Z.
    ScaleZ,
    /// Visibility flag encoded as `0.0` / `1.0`.
    Visible,
    /// Clipping-plane reveal fraction in `[0, 1]`.
    ClipReveal,
}

impl NodeField {
    /// Position fields in axis order.
    pub const POSITION: [NodeField; 3] = [Self::PosX, Self::PosY, Self::PosZ];
    /// Rotation fields in axis order.
    pub const ROTATION: [NodeField; 3] = [Self::RotX, Self::RotY, Self::RotZ];
    /// Scale fields in axis order.
    pub const SCALE: [NodeField; 3] = [Self::ScaleX, Self::ScaleY, Self::ScaleZ];
}

/// Animatable scalar field on a material.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum MaterialField {
    /// Opacity in `[0, 1]`.
    Opacity,
    /// Red channel.
    ColorR,
    /// Green channel.
    ColorG,
    /// Blue channel.
    ColorB,
}

/// Field reference a track drives.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum Property {
    /// A field of a node.
    Node(NodeId, NodeField),
    /// A field of a material.
    Material(MaterialId, MaterialField),
}

/// Endpoint of a track, possibly relative to the value in effect at the track's start.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum TrackValue {
    /// A literal value.
    Fixed(f64),
    /// The value the timeline already produces at the track's start.
    Current,
    /// `Current` plus an offset.
    CurrentPlus(f64),
    /// `Current` multiplied by a factor.
    CurrentTimes(f64),
    /// The value the node or material was created with.
    Rest,
}

impl TrackValue {
    /// Resolve against the current and rest values of the driven property.
    pub fn resolve(self, current: f64, rest: f64) -> f64 {
        match self {
            Self::Fixed(v) => v,
            Self::Current => current,
            Self::CurrentPlus(d) => current + d,
            Self::CurrentTimes(f) => current * f,
            Self::Rest => rest,
        }
    }
}

/// How a track maps time to value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TrackKind {
    /// Eased interpolation from `from` to `to` over `duration`.
    Tween,
    /// Holds `from` before `offset` and switches to `to` at `offset`.
    Step,
}

/// One tween primitive inside a sub-timeline, positioned at a local offset.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Track {
    /// Driven field.
    pub property: Property,
    /// Local start offset within the owning sub-timeline.
    pub offset: f64,
    /// Duration in seconds (`0` means instantaneous).
    pub duration: f64,
    /// Easing applied to normalized progress.
    pub ease: Ease,
    /// Start value.
    pub from: TrackValue,
    /// End value.
    pub to: TrackValue,
    /// Interpolation kind.
    pub kind: TrackKind,
    /// When this is the earliest track on its property, render `from` before the start.
    pub immediate_render: bool,
}

impl Track {
    /// Tween `property` toward `to`, starting from whatever is current.
    pub fn tween(property: Property, to: TrackValue, duration: f64, ease: Ease) -> Self {
        Self {
            property,
            offset: 0.0,
            duration,
            ease,
            from: TrackValue::Current,
            to,
            kind: TrackKind::Tween,
            immediate_render: false,
        }
    }

    /// Instantaneous switch to `to`.
    pub fn step(property: Property, to: f64) -> Self {
        Self {
            property,
            offset: 0.0,
            duration: 0.0,
            ease: Ease::Linear,
            from: TrackValue::Current,
            to: TrackValue::Fixed(to),
            kind: TrackKind::Step,
            immediate_render: false,
        }
    }

    /// Replace the start value.
    pub fn from(mut self, from: TrackValue) -> Self {
        self.from = from;
        self
    }

    /// Set the local offset.
    pub fn at(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Render the start value before the track begins.
    pub fn immediate(mut self) -> Self {
        self.immediate_render = true;
        self
    }

    /// Local end offset.
    pub fn end(&self) -> f64 {
        self.offset + self.duration
    }
}

/// A track fixed onto the main timeline with resolved endpoints.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlacedTrack {
    /// Driven field.
    pub property: Property,
    /// Absolute start time.
    pub start: f64,
    /// Duration in seconds.
    pub duration: f64,
    /// Easing function.
    pub ease: Ease,
    /// Resolved start value.
    pub from: f64,
    /// Resolved end value.
    pub to: f64,
    /// Interpolation kind.
    pub kind: TrackKind,
    /// Whether `from` applies before `start` for the earliest track on a property.
    pub immediate_render: bool,
    /// Global insertion sequence, used to break ties between equal starts.
    pub seq: u64,
}

impl PlacedTrack {
    /// Absolute end time.
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// Value at absolute time `t`; a pure function of the track's own fields.
    pub fn value_at(&self, t: f64) -> f64 {
        if t < self.start {
            return self.from;
        }
        match self.kind {
            TrackKind::Step => self.to,
            TrackKind::Tween => {
                if self.duration <= 0.0 || t >= self.end() {
                    return self.to;
                }
                let p = self.ease.apply((t - self.start) / self.duration);
                self.from + (self.to - self.from) * p
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;
