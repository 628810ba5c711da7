use crate::foundation::core::Vec3;
use crate::foundation::error::ChoreoResult;
use crate::foundation::ids::{BehaviorId, NodeId};
use crate::scene::graph::SceneGraph;

/// Rotation axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// X axis.
    X,
    /// Y axis.
    Y,
    /// Z axis.
    Z,
}

/// What a behavior does to its node every frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "behavior", rename_all = "camelCase")]
pub enum BehaviorKind {
    /// Rotate the node so it faces `camera`.
    Billboard {
        /// Camera node to face.
        camera: NodeId,
    },
    /// Constant angular velocity around one axis.
    Spin {
        /// Axis of rotation.
        axis: Axis,
        /// Angular speed.
        radians_per_sec: f32,
    },
}

/// Per-frame rule bound to a node by id.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Behavior {
    /// Identity within the owning list.
    pub id: BehaviorId,
    /// Affected node.
    pub node: NodeId,
    /// Rule.
    pub kind: BehaviorKind,
    /// Timeline time the behavior starts at.
    pub since: f64,
}

/// Behaviors in insertion order.
#[derive(Clone, Debug, Default)]
pub struct BehaviorList {
    items: Vec<Behavior>,
}

impl BehaviorList {
    /// Empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a behavior starting at timeline time `since`.
    pub fn add(&mut self, node: NodeId, kind: BehaviorKind, since: f64) -> BehaviorId {
        let id = BehaviorId(self.items.len() as u32);
        self.items.push(Behavior {
            id,
            node,
            kind,
            since,
        });
        id
    }

    /// All behaviors.
    pub fn items(&self) -> &[Behavior] {
        &self.items
    }

    /// Return `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Apply every behavior to the live state for timeline time `t`.
    ///
    /// Must run after the timeline has been sampled into `graph`. Behaviors bound to
    /// detached nodes are skipped.
    pub fn apply(&self, graph: &mut SceneGraph, t: f64) -> ChoreoResult<()> {
        for b in &self.items {
            if !graph.contains(b.node) || t < b.since {
                continue;
            }
            match &b.kind {
                BehaviorKind::Spin {
                    axis,
                    radians_per_sec,
                } => {
                    let angle = (*radians_per_sec as f64 * (t - b.since)) as f32;
                    let rot = &mut graph.node_mut(b.node)?.live.transform.rotation;
                    match axis {
                        Axis::X => rot.x += angle,
                        Axis::Y => rot.y += angle,
                        Axis::Z => rot.z += angle,
                    }
                }
                BehaviorKind::Billboard { camera } => {
                    if !graph.contains(*camera) {
                        continue;
                    }
                    let eye = graph.live_world(*camera)?.translation;
                    let at = graph.live_world(b.node)?.translation;
                    let d = Vec3::from(eye - at);
                    if d.length_squared() <= f32::EPSILON {
                        continue;
                    }
                    let yaw = d.x.atan2(d.z);
                    let pitch = -d.y.atan2((d.x * d.x + d.z * d.z).sqrt());
                    let rot = &mut graph.node_mut(b.node)?.live.transform.rotation;
                    *rot = Vec3::new(pitch, yaw, 0.0);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/behaviors.rs"]
mod tests;
