use std::collections::{BTreeMap, HashSet};

use crate::animation::tween::Property;
use crate::foundation::core::{Aabb, Affine3A, Transform};
use crate::foundation::error::{ChoreoError, ChoreoResult};
use crate::foundation::ids::{MaterialId, NodeId};
use crate::scene::node::{Material, MaterialState, NodeKind, NodeState, SceneNode};

/// Arena of scene nodes and materials for one script run.
///
/// Node `0` is the root group and always exists.
#[derive(Clone, Debug)]
pub struct SceneGraph {
    nodes: BTreeMap<NodeId, SceneNode>,
    materials: Vec<Material>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Graph containing only the root group.
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            NodeId::ROOT,
            SceneNode::new(NodeId::ROOT, NodeKind::Group, NodeState::default()),
        );
        Self {
            nodes,
            materials: Vec::new(),
        }
    }

    /// Return `true` when `id` is attached.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Borrow a node.
    pub fn node(&self, id: NodeId) -> ChoreoResult<&SceneNode> {
        self.nodes
            .get(&id)
            .ok_or_else(|| ChoreoError::validation(format!("{id} is not in the scene")))
    }

    /// Mutably borrow a node.
    pub fn node_mut(&mut self, id: NodeId) -> ChoreoResult<&mut SceneNode> {
        self.nodes
            .get_mut(&id)
            .ok_or_else(|| ChoreoError::validation(format!("{id} is not in the scene")))
    }

    /// All nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.values()
    }

    /// Number of nodes including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Return `true` when only the root exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Create a material resting at `state`.
    pub fn create_material(&mut self, state: MaterialState) -> MaterialId {
        let id = MaterialId(self.materials.len() as u32);
        self.materials.push(Material {
            id,
            rest: state,
            live: state,
        });
        id
    }

    /// Borrow a material.
    pub fn material(&self, id: MaterialId) -> ChoreoResult<&Material> {
        self.materials
            .get(id.0 as usize)
            .ok_or_else(|| ChoreoError::validation(format!("material {} does not exist", id.0)))
    }

    /// All materials in creation order.
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Attach `node` as the last child of `parent`. Child order never changes afterwards.
    pub fn attach(&mut self, mut node: SceneNode, parent: NodeId) -> ChoreoResult<()> {
        if self.nodes.contains_key(&node.id) {
            return Err(ChoreoError::validation(format!(
                "{} is already attached",
                node.id
            )));
        }
        let id = node.id;
        self.node_mut(parent)?.children.push(id);
        node.parent = Some(parent);
        self.nodes.insert(id, node);
        Ok(())
    }

    /// Detach `id` and drop its whole subtree. Returns the removed ids.
    pub fn detach(&mut self, id: NodeId) -> ChoreoResult<Vec<NodeId>> {
        if id == NodeId::ROOT {
            return Err(ChoreoError::validation("the scene root cannot be removed"));
        }
        let removed = self.descendants(id)?;
        if let Some(parent) = self.node(id)?.parent {
            self.node_mut(parent)?.children.retain(|c| *c != id);
        }
        for r in &removed {
            self.nodes.remove(r);
        }
        Ok(removed)
    }

    /// `id` followed by its descendants in depth-first child order.
    pub fn descendants(&self, id: NodeId) -> ChoreoResult<Vec<NodeId>> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            let node = self.node(n)?;
            out.push(n);
            stack.extend(node.children.iter().rev().copied());
        }
        Ok(out)
    }

    /// Distinct materials under `id` (inclusive), in depth-first order.
    pub fn collect_materials(&self, id: NodeId) -> ChoreoResult<Vec<MaterialId>> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for n in self.descendants(id)? {
            for m in &self.node(n)?.materials {
                if seen.insert(*m) {
                    out.push(*m);
                }
            }
        }
        Ok(out)
    }

    /// Resting value of a property.
    pub fn rest_value(&self, property: &Property) -> ChoreoResult<f64> {
        match property {
            Property::Node(id, f) => Ok(self.node(*id)?.rest.field(*f)),
            Property::Material(id, f) => Ok(self.material(*id)?.rest.field(*f)),
        }
    }

    /// Write a sampled value.
    pub fn set_live(&mut self, property: &Property, v: f64) -> ChoreoResult<()> {
        match property {
            Property::Node(id, f) => self.node_mut(*id)?.live.set_field(*f, v),
            Property::Material(id, f) => {
                let m = self
                    .materials
                    .get_mut(id.0 as usize)
                    .ok_or_else(|| ChoreoError::validation("material does not exist"))?;
                m.live.set_field(*f, v);
            }
        }
        Ok(())
    }

    /// Reset every live state to its resting state.
    pub fn reset_live(&mut self) {
        for n in self.nodes.values_mut() {
            n.live = n.rest;
        }
        for m in &mut self.materials {
            m.live = m.rest;
        }
    }

    /// Parent chain from `id` up to (and including) the root.
    pub fn ancestors(&self, id: NodeId) -> ChoreoResult<Vec<NodeId>> {
        let mut out = vec![id];
        let mut cur = self.node(id)?.parent;
        while let Some(p) = cur {
            out.push(p);
            cur = self.node(p)?.parent;
        }
        Ok(out)
    }

    /// World matrix of `id` using `local` to look up each node's transform.
    pub fn world_with(
        &self,
        id: NodeId,
        mut local: impl FnMut(NodeId) -> ChoreoResult<Transform>,
    ) -> ChoreoResult<Affine3A> {
        let mut m = Affine3A::IDENTITY;
        for n in self.ancestors(id)?.into_iter().rev() {
            m *= local(n)?.to_affine();
        }
        Ok(m)
    }

    /// World matrix from live state.
    pub fn live_world(&self, id: NodeId) -> ChoreoResult<Affine3A> {
        self.world_with(id, |n| Ok(self.node(n)?.live.transform))
    }

    /// Bounds of `id`'s subtree in `id`'s own frame, using `local` for descendants.
    pub fn subtree_bounds_with(
        &self,
        id: NodeId,
        local: &mut impl FnMut(NodeId) -> ChoreoResult<Transform>,
    ) -> ChoreoResult<Option<Aabb>> {
        let node = self.node(id)?;
        let mut acc = node.local_bounds;
        for c in &node.children {
            let Some(b) = self.subtree_bounds_with(*c, local)? else {
                continue;
            };
            let b = b.transformed(&local(*c)?.to_affine());
            acc = Some(match acc {
                Some(a) => a.union(&b),
                None => b,
            });
        }
        Ok(acc)
    }

    /// World-space bounds of `id`'s subtree from live state.
    pub fn world_bounds(&self, id: NodeId) -> ChoreoResult<Option<Aabb>> {
        let mut local = |n: NodeId| Ok(self.node(n)?.live.transform);
        let Some(b) = self.subtree_bounds_with(id, &mut local)? else {
            return Ok(None);
        };
        Ok(Some(b.transformed(&self.live_world(id)?)))
    }

    /// Return `true` when `id` and all its ancestors are live-visible.
    pub fn effectively_visible(&self, id: NodeId) -> ChoreoResult<bool> {
        for n in self.ancestors(id)? {
            if !self.node(n)?.live.visible {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/graph.rs"]
mod tests;
