use crate::animation::tween::{MaterialField, NodeField};
use crate::collab::factory::Renderable;
use crate::foundation::core::{Rgba, Transform, Vec3};
use crate::foundation::ids::{MaterialId, NodeId};

/// Geometric primitive payload for shape nodes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "shape", rename_all = "camelCase")]
pub enum ShapeKind {
    /// Flat circle.
    Circle {
        /// Radius.
        radius: f32,
    },
    /// Flat rectangle.
    Rect {
        /// Width.
        width: f32,
        /// Height.
        height: f32,
    },
    /// Sphere.
    Sphere {
        /// Radius.
        radius: f32,
    },
    /// Axis-aligned box.
    Box {
        /// Edge lengths.
        size: Vec3,
    },
    /// Externally loaded 3D model.
    Model {
        /// Model location handed to the renderable factory.
        path: String,
    },
}

/// Capability tag of a scene node. Kind-specific behavior matches on this.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NodeKind {
    /// Plain node with no renderable of its own (symbol glyphs use this).
    Generic,
    /// Container for other nodes.
    Group,
    /// Laid-out text; one child per glyph.
    Text {
        /// Source text.
        text: String,
    },
    /// Polyline through points.
    Line {
        /// Vertices in local space.
        points: Vec<Vec3>,
    },
    /// Typeset formula; one child per symbol.
    Formula {
        /// Formula source (TeX-like).
        source: String,
    },
    /// Camera.
    Camera {
        /// Vertical field of view in degrees.
        fov_deg: f32,
    },
    /// Camera frustum helper.
    Frustum {
        /// Near plane distance.
        near: f32,
        /// Far plane distance.
        far: f32,
    },
    /// Geometric primitive.
    Shape(ShapeKind),
}

impl NodeKind {
    /// Short tag used in labels and logs.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Group => "group",
            Self::Text { .. } => "text",
            Self::Line { .. } => "line",
            Self::Formula { .. } => "formula",
            Self::Camera { .. } => "camera",
            Self::Frustum { .. } => "frustum",
            Self::Shape(_) => "shape",
        }
    }

    /// Return `true` when the renderable factory must build content for this kind.
    pub fn needs_renderable(&self) -> bool {
        !matches!(self, Self::Generic | Self::Group | Self::Camera { .. })
    }

    /// Return `true` when the factory lays the content out as per-symbol children.
    pub fn has_symbols(&self) -> bool {
        matches!(self, Self::Text { .. } | Self::Formula { .. })
    }
}

/// Animatable per-node state.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NodeState {
    /// Parent-relative transform.
    pub transform: Transform,
    /// Visibility flag; hidden nodes hide their whole subtree.
    pub visible: bool,
    /// Clipping-plane reveal fraction (`1` is fully shown).
    pub clip_reveal: f32,
}

impl Default for NodeState {
    fn default() -> Self {
        Self {
            transform: Transform::default(),
            visible: true,
            clip_reveal: 1.0,
        }
    }
}

impl NodeState {
    /// Read one field as `f64`.
    pub fn field(&self, f: NodeField) -> f64 {
        let t = &self.transform;
        f64::from(match f {
            NodeField::PosX => t.position.x,
            NodeField::PosY => t.position.y,
            NodeField::PosZ => t.position.z,
            NodeField::RotX => t.rotation.x,
            NodeField::RotY => t.rotation.y,
            NodeField::RotZ => t.rotation.z,
            NodeField::ScaleX => t.scale.x,
            NodeField::ScaleY => t.scale.y,
            NodeField::ScaleZ => t.scale.z,
            NodeField::Visible => {
                if self.visible {
                    1.0
                } else {
                    0.0
                }
            }
            NodeField::ClipReveal => self.clip_reveal,
        })
    }

    /// Write one field.
    pub fn set_field(&mut self, f: NodeField, v: f64) {
        let v32 = v as f32;
        let t = &mut self.transform;
        match f {
            NodeField::PosX => t.position.x = v32,
            NodeField::PosY => t.position.y = v32,
            NodeField::PosZ => t.position.z = v32,
            NodeField::RotX => t.rotation.x = v32,
            NodeField::RotY => t.rotation.y = v32,
            NodeField::RotZ => t.rotation.z = v32,
            NodeField::ScaleX => t.scale.x = v32,
            NodeField::ScaleY => t.scale.y = v32,
            NodeField::ScaleZ => t.scale.z = v32,
            NodeField::Visible => self.visible = v >= 0.5,
            NodeField::ClipReveal => self.clip_reveal = v32.clamp(0.0, 1.0),
        }
    }
}

/// Animatable material appearance.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MaterialState {
    /// Base color (alpha channel ignored; see `opacity`).
    pub color: Rgba,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
    /// Draw as wireframe.
    pub wireframe: bool,
}

impl Default for MaterialState {
    fn default() -> Self {
        Self {
            color: Rgba::WHITE,
            opacity: 1.0,
            wireframe: false,
        }
    }
}

impl MaterialState {
    /// Read one field as `f64`.
    pub fn field(&self, f: MaterialField) -> f64 {
        f64::from(match f {
            MaterialField::Opacity => self.opacity,
            MaterialField::ColorR => self.color.r,
            MaterialField::ColorG => self.color.g,
            MaterialField::ColorB => self.color.b,
        })
    }

    /// Write one field, clamping into `[0, 1]`.
    pub fn set_field(&mut self, f: MaterialField, v: f64) {
        let v = (v as f32).clamp(0.0, 1.0);
        match f {
            MaterialField::Opacity => self.opacity = v,
            MaterialField::ColorR => self.color.r = v,
            MaterialField::ColorG => self.color.g = v,
            MaterialField::ColorB => self.color.b = v,
        }
    }
}

/// Material with resting and sampled state.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Identity.
    pub id: MaterialId,
    /// State the material was created with.
    pub rest: MaterialState,
    /// State after the latest timeline sample.
    pub live: MaterialState,
}

/// One user-visible entity (or group) in the scene graph.
#[derive(Clone, Debug)]
pub struct SceneNode {
    /// Identity, fixed when the `add` call returned.
    pub id: NodeId,
    /// Capability tag and payload.
    pub kind: NodeKind,
    /// Optional user-facing name.
    pub name: Option<String>,
    /// Stable symbol name for glyph children of text and formulas.
    pub symbol: Option<String>,
    /// Factory output; `None` for groups, cameras and glyph children.
    pub renderable: Option<Renderable>,
    /// Layout back-reference. Never used for ownership.
    pub parent: Option<NodeId>,
    /// Owned children in creation order.
    pub children: Vec<NodeId>,
    /// Materials drawn by this node.
    pub materials: Vec<MaterialId>,
    /// Local bounds of this node's own content.
    pub local_bounds: Option<crate::foundation::core::Aabb>,
    /// State the node was created with.
    pub rest: NodeState,
    /// State after the latest timeline sample.
    pub live: NodeState,
}

impl SceneNode {
    /// Fresh node with no content, resting at `state`.
    pub fn new(id: NodeId, kind: NodeKind, state: NodeState) -> Self {
        Self {
            id,
            kind,
            name: None,
            symbol: None,
            renderable: None,
            parent: None,
            children: Vec::new(),
            materials: Vec::new(),
            local_bounds: None,
            rest: state,
            live: state,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/node.rs"]
mod tests;
