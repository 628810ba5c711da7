use std::cell::Cell;
use std::rc::Rc;

use crate::animation::sub_timeline::SubTimeline;
use crate::collab::factory::Renderable;
use crate::config::{EngineOptions, OptionsPatch};
use crate::foundation::core::{Rgba, Vec3};
use crate::foundation::error::ChoreoResult;
use crate::foundation::ids::NodeId;
use crate::scene::behaviors::{BehaviorKind, BehaviorList};
use crate::scene::graph::SceneGraph;
use crate::scene::node::{MaterialState, NodeKind, NodeState, SceneNode};
use crate::timeline::main_timeline::{MainTimeline, Placement};
use crate::timeline::time_ref::TimeRef;
use crate::verbs::fade::appear;
use crate::verbs::{AnimParams, Verb, VerbCtx, build};

/// Node id allocator shared by every handle of one engine.
///
/// Ids are handed out synchronously and never reused, not even across resets, so a handle
/// kept from an earlier run can never alias a node of the current one.
#[derive(Clone, Debug, Default)]
pub struct NodeIds(Rc<Cell<u64>>);

impl NodeIds {
    /// Allocator whose first id is 1 (0 is the root).
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id.
    pub fn next(&self) -> NodeId {
        let n = self.0.get() + 1;
        self.0.set(n);
        NodeId(n)
    }
}

/// Creation parameters of an `add` call.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AddOptions {
    /// Parent node; the scene root when absent.
    #[serde(skip)]
    pub parent: Option<NodeId>,
    /// User-facing name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Initial position.
    #[serde(
        default,
        deserialize_with = "crate::foundation::core::deserialize_opt_vec3",
        skip_serializing_if = "Option::is_none"
    )]
    pub position: Option<Vec3>,
    /// Initial Euler rotation in radians.
    #[serde(
        default,
        deserialize_with = "crate::foundation::core::deserialize_opt_vec3",
        skip_serializing_if = "Option::is_none"
    )]
    pub rotation: Option<Vec3>,
    /// Initial scale.
    #[serde(
        default,
        deserialize_with = "crate::foundation::core::deserialize_opt_vec3",
        skip_serializing_if = "Option::is_none"
    )]
    pub scale: Option<Vec3>,
    /// Material color.
    #[serde(
        default,
        deserialize_with = "crate::foundation::core::deserialize_opt_color",
        skip_serializing_if = "Option::is_none"
    )]
    pub color: Option<Rgba>,
    /// Material opacity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    /// Draw materials as wireframe.
    pub wireframe: bool,
    /// Shown from the insertion time on. Hidden nodes need an explicit `show` or `fadeIn`.
    pub visible: bool,
    /// Insertion time of the node's appearance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t: Option<TimeRef>,
}

impl Default for AddOptions {
    fn default() -> Self {
        Self {
            parent: None,
            name: None,
            position: None,
            rotation: None,
            scale: None,
            color: None,
            opacity: None,
            wireframe: false,
            visible: true,
            t: None,
        }
    }
}

impl AddOptions {
    /// Builder-style parent.
    pub fn parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Builder-style position.
    pub fn position(mut self, p: Vec3) -> Self {
        self.position = Some(p);
        self
    }

    /// Builder-style color.
    pub fn color(mut self, c: Rgba) -> Self {
        self.color = Some(c);
        self
    }

    /// Builder-style insertion time.
    pub fn at(mut self, t: impl Into<TimeRef>) -> Self {
        self.t = Some(t.into());
        self
    }

    /// Start hidden.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    fn node_state(&self) -> NodeState {
        let mut state = NodeState {
            visible: self.visible,
            ..NodeState::default()
        };
        let t = &mut state.transform;
        if let Some(p) = self.position {
            t.position = p;
        }
        if let Some(r) = self.rotation {
            t.rotation = r;
        }
        if let Some(s) = self.scale {
            t.scale = s;
        }
        state
    }

    fn material_state(&self) -> MaterialState {
        MaterialState {
            color: self.color.unwrap_or(Rgba::WHITE),
            opacity: self.opacity.unwrap_or(1.0).clamp(0.0, 1.0),
            wireframe: self.wireframe,
        }
    }
}

/// Everything one script run builds.
///
/// Only commands touch this state, one at a time, through the command queue.
#[derive(Debug)]
pub struct SessionState {
    /// Scene graph.
    pub graph: SceneGraph,
    /// Main timeline with its markers.
    pub timeline: MainTimeline,
    /// Per-frame behaviors.
    pub behaviors: BehaviorList,
    /// Options in effect for this run.
    pub options: EngineOptions,
    ids: NodeIds,
}

impl SessionState {
    /// Empty run state.
    pub fn new(options: EngineOptions, ids: NodeIds) -> Self {
        Self {
            graph: SceneGraph::new(),
            timeline: MainTimeline::new(),
            behaviors: BehaviorList::new(),
            options,
            ids,
        }
    }

    /// Place `sub` at `at`, resolving relative endpoints against rest values.
    pub fn place(&mut self, sub: &SubTimeline, at: f64) -> ChoreoResult<Placement> {
        let graph = &self.graph;
        self.timeline.insert(sub, at, |p| graph.rest_value(p))
    }

    /// Attach a constructed node and schedule its appearance.
    ///
    /// Symbol glyphs of `renderable` become child nodes in glyph order, each with its own
    /// material. The node shows up at the resolved time unless `opts.visible` is false.
    pub fn add_node(
        &mut self,
        id: NodeId,
        kind: NodeKind,
        opts: &AddOptions,
        renderable: Option<Renderable>,
    ) -> ChoreoResult<Placement> {
        let at = self.timeline.resolve(&opts.t.clone().unwrap_or_default())?;
        let parent = opts.parent.unwrap_or(NodeId::ROOT);
        self.graph.node(parent)?;

        let mut node = SceneNode::new(id, kind, opts.node_state());
        node.name = opts.name.clone();
        let material = opts.material_state();
        let mut glyphs = Vec::new();
        if let Some(r) = renderable {
            node.local_bounds = Some(r.local_bounds);
            for _ in 0..r.material_count {
                node.materials.push(self.graph.create_material(material));
            }
            for g in &r.symbols {
                let mut state = NodeState::default();
                state.transform.position = g.offset;
                state.transform.scale = Vec3::splat(g.scale);
                let mut glyph = SceneNode::new(self.ids.next(), NodeKind::Generic, state);
                glyph.symbol = Some(g.name.clone());
                glyph.local_bounds = Some(g.bounds);
                glyph.materials = vec![self.graph.create_material(material)];
                glyphs.push(glyph);
            }
            node.renderable = Some(r);
        }
        self.graph.attach(node, parent)?;
        for glyph in glyphs {
            self.graph.attach(glyph, id)?;
        }

        let mut sub = SubTimeline::new("add");
        if opts.visible {
            sub.push(appear(id));
        }
        self.place(&sub, at)
    }

    /// Build `verb` on `target` at its resolved start and place it.
    pub fn animate(
        &mut self,
        target: NodeId,
        verb: &Verb,
        params: &AnimParams,
    ) -> ChoreoResult<Placement> {
        let at = self.timeline.resolve(&params.time_ref())?;
        let sub = {
            let cx = VerbCtx {
                graph: &self.graph,
                timeline: &self.timeline,
                at,
                default_duration: self.options.default_duration,
                default_ease: self.options.default_ease,
            };
            build(verb, target, params, &cx)?
        };
        self.place(&sub, at)
    }

    /// Empty sub-timeline of `secs` at the cursor.
    pub fn wait(&mut self, secs: f64) -> ChoreoResult<Placement> {
        let at = self.timeline.cursor();
        self.place(&SubTimeline::hold("wait", secs), at)
    }

    /// Register a marker, falling back to the configured default name.
    pub fn mark(&mut self, name: Option<&str>, t: Option<&TimeRef>) -> ChoreoResult<String> {
        let base = name.unwrap_or(&self.options.marker_default_name).to_owned();
        self.timeline.add_marker(&base, t)
    }

    /// Attach a behavior starting at the resolved time.
    pub fn add_behavior(
        &mut self,
        node: NodeId,
        kind: BehaviorKind,
        t: Option<&TimeRef>,
    ) -> ChoreoResult<()> {
        self.graph.node(node)?;
        if let BehaviorKind::Billboard { camera } = &kind {
            self.graph.node(*camera)?;
        }
        let since = match t {
            Some(t) => self.timeline.resolve(t)?,
            None => 0.0,
        };
        self.behaviors.add(node, kind, since);
        Ok(())
    }

    /// Override options for the commands that follow.
    pub fn set_defaults(&mut self, patch: &OptionsPatch) -> ChoreoResult<()> {
        let next = self.options.merged_with(patch);
        next.validate()?;
        self.options = next;
        Ok(())
    }

    /// Detach `id` with its subtree.
    pub fn remove(&mut self, id: NodeId) -> ChoreoResult<Vec<NodeId>> {
        self.graph.detach(id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/state.rs"]
mod tests;
