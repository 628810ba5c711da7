use crate::foundation::core::{Rgba, Transform};
use crate::foundation::ids::{MaterialId, NodeId};
use crate::scene::graph::SceneGraph;

/// Sampled state of one attached node.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSample {
    /// Node id.
    pub id: NodeId,
    /// Name given at creation, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Own visibility flag (ancestors may still hide the node).
    pub visible: bool,
    /// Parent-relative transform.
    pub transform: Transform,
    /// Clipping-plane reveal fraction.
    pub clip_reveal: f32,
}

/// Sampled state of one material.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MaterialSample {
    /// Material id.
    pub id: MaterialId,
    /// Color.
    pub color: Rgba,
    /// Opacity.
    pub opacity: f32,
}

/// Every animatable value of the scene at one timeline position.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneSample {
    /// Timeline position in seconds.
    pub time: f64,
    /// Attached nodes, ordered by id (root excluded).
    pub nodes: Vec<NodeSample>,
    /// Materials, ordered by id.
    pub materials: Vec<MaterialSample>,
}

impl SceneSample {
    /// Read the live state of `graph`.
    pub fn capture(graph: &SceneGraph, time: f64) -> Self {
        Self {
            time,
            nodes: graph
                .nodes()
                .filter(|n| n.id != NodeId::ROOT)
                .map(|n| NodeSample {
                    id: n.id,
                    name: n.name.clone(),
                    visible: n.live.visible,
                    transform: n.live.transform,
                    clip_reveal: n.live.clip_reveal,
                })
                .collect(),
            materials: graph
                .materials()
                .iter()
                .map(|m| MaterialSample {
                    id: m.id,
                    color: m.live.color,
                    opacity: m.live.opacity,
                })
                .collect(),
        }
    }

    /// Sample of node `id`.
    pub fn node(&self, id: NodeId) -> Option<&NodeSample> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Sample of material `id`.
    pub fn material(&self, id: MaterialId) -> Option<&MaterialSample> {
        self.materials.iter().find(|m| m.id == id)
    }
}
