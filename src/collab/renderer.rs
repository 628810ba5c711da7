use crate::foundation::core::{Affine3A, Rgba};
use crate::foundation::error::ChoreoResult;
use crate::foundation::ids::NodeId;
use crate::scene::graph::SceneGraph;
use crate::scene::node::NodeKind;

/// One visible, drawable node with its sampled appearance.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DrawItem {
    /// Source node.
    pub node: NodeId,
    /// Kind tag (`text`, `shape`, ...) or `glyph` for symbol children.
    pub kind: String,
    /// World matrix.
    pub world: Affine3A,
    /// Base color.
    pub color: Rgba,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
    /// Wireframe flag.
    pub wireframe: bool,
    /// Clipping-plane reveal fraction.
    pub clip_reveal: f32,
}

/// Everything a renderer needs for one frame, in scene child order.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DrawList {
    /// First camera found in the scene, if any.
    pub camera: Option<NodeId>,
    /// Visible items.
    pub items: Vec<DrawItem>,
}

impl DrawList {
    /// Collect visible drawables from the live state of `graph`.
    ///
    /// A hidden node hides its whole subtree.
    pub fn from_graph(graph: &SceneGraph) -> ChoreoResult<Self> {
        let mut out = Self::default();
        let mut stack = vec![(NodeId::ROOT, Affine3A::IDENTITY)];
        while let Some((id, parent_world)) = stack.pop() {
            let node = graph.node(id)?;
            if !node.live.visible {
                continue;
            }
            let world = parent_world * node.live.transform.to_affine();

            if out.camera.is_none() && matches!(node.kind, NodeKind::Camera { .. }) {
                out.camera = Some(id);
            }
            if node.renderable.is_some() || node.symbol.is_some() {
                let material = match node.materials.first() {
                    Some(m) => Some(graph.material(*m)?.live),
                    None => None,
                };
                out.items.push(DrawItem {
                    node: id,
                    kind: if node.symbol.is_some() {
                        "glyph".to_owned()
                    } else {
                        node.kind.tag().to_owned()
                    },
                    world,
                    color: material.map(|m| m.color).unwrap_or_default(),
                    opacity: material.map(|m| m.opacity).unwrap_or(1.0),
                    wireframe: material.is_some_and(|m| m.wireframe),
                    clip_reveal: node.live.clip_reveal,
                });
            }
            for c in node.children.iter().rev() {
                stack.push((*c, world));
            }
        }
        Ok(out)
    }
}

/// Drawing collaborator. Implementations own all rasterization.
pub trait Renderer {
    /// Draw one frame.
    fn draw(&mut self, list: &DrawList) -> ChoreoResult<()>;
}

/// Renderer that keeps every frame it receives.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    frames: Vec<DrawList>,
}

impl RecordingRenderer {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames in draw order.
    pub fn frames(&self) -> &[DrawList] {
        &self.frames
    }

    /// Most recent frame.
    pub fn last(&self) -> Option<&DrawList> {
        self.frames.last()
    }
}

impl Renderer for RecordingRenderer {
    fn draw(&mut self, list: &DrawList) -> ChoreoResult<()> {
        self.frames.push(list.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/collab/renderer.rs"]
mod tests;
