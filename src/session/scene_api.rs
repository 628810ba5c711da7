use std::rc::Rc;

use futures::FutureExt as _;

use crate::collab::factory::RenderableFactory;
use crate::config::OptionsPatch;
use crate::foundation::core::{Rgba, Vec3};
use crate::foundation::ids::{CommandOrdinal, NodeId};
use crate::scene::behaviors::{Axis, BehaviorKind};
use crate::scene::node::{NodeKind, ShapeKind};
use crate::sequencer::queue::CommandQueue;
use crate::session::state::{AddOptions, NodeIds, SessionState};
use crate::timeline::time_ref::TimeRef;
use crate::verbs::{AnimParams, Axes, RevealMode, Verb};

/// Synchronous scene-building surface.
///
/// Every call returns at once and enqueues exactly one command; the work happens when the
/// queue drains, in call order.
#[derive(Clone)]
pub struct SceneApi {
    queue: CommandQueue<SessionState>,
    ids: NodeIds,
    factory: Rc<dyn RenderableFactory>,
}

impl SceneApi {
    pub(crate) fn new(
        queue: CommandQueue<SessionState>,
        ids: NodeIds,
        factory: Rc<dyn RenderableFactory>,
    ) -> Self {
        Self {
            queue,
            ids,
            factory,
        }
    }

    /// Add a node of `kind`. Its id is fixed now; its content is built when the command runs.
    pub fn add(&self, kind: NodeKind, opts: AddOptions) -> NodeHandle {
        let id = self.ids.next();
        let label = format!("add {} {id}", kind.tag());
        let factory = Rc::clone(&self.factory);
        self.queue.enqueue(label, move |ctx| {
            async move {
                let renderable = if kind.needs_renderable() {
                    Some(factory.create(&kind).await?)
                } else {
                    None
                };
                ctx.with_state(|s| s.add_node(id, kind, &opts, renderable).map(drop))
            }
            .boxed_local()
        });
        NodeHandle {
            id,
            api: self.clone(),
        }
    }

    /// Add laid-out text with one child per glyph.
    pub fn add_text(&self, text: impl Into<String>, opts: AddOptions) -> NodeHandle {
        self.add(NodeKind::Text { text: text.into() }, opts)
    }

    /// Add a typeset formula with one child per symbol.
    pub fn add_formula(&self, source: impl Into<String>, opts: AddOptions) -> NodeHandle {
        self.add(
            NodeKind::Formula {
                source: source.into(),
            },
            opts,
        )
    }

    /// Add a flat circle.
    pub fn add_circle(&self, radius: f32, opts: AddOptions) -> NodeHandle {
        self.add(NodeKind::Shape(ShapeKind::Circle { radius }), opts)
    }

    /// Add a flat rectangle.
    pub fn add_rect(&self, width: f32, height: f32, opts: AddOptions) -> NodeHandle {
        self.add(NodeKind::Shape(ShapeKind::Rect { width, height }), opts)
    }

    /// Add a sphere.
    pub fn add_sphere(&self, radius: f32, opts: AddOptions) -> NodeHandle {
        self.add(NodeKind::Shape(ShapeKind::Sphere { radius }), opts)
    }

    /// Add a box.
    pub fn add_box(&self, size: Vec3, opts: AddOptions) -> NodeHandle {
        self.add(NodeKind::Shape(ShapeKind::Box { size }), opts)
    }

    /// Add an externally loaded model.
    pub fn add_model(&self, path: impl Into<String>, opts: AddOptions) -> NodeHandle {
        self.add(NodeKind::Shape(ShapeKind::Model { path: path.into() }), opts)
    }

    /// Add a polyline.
    pub fn add_line(&self, points: Vec<Vec3>, opts: AddOptions) -> NodeHandle {
        self.add(NodeKind::Line { points }, opts)
    }

    /// Add an empty group.
    pub fn add_group(&self, opts: AddOptions) -> NodeHandle {
        self.add(NodeKind::Group, opts)
    }

    /// Add a camera.
    pub fn add_camera(&self, fov_deg: f32, opts: AddOptions) -> NodeHandle {
        self.add(NodeKind::Camera { fov_deg }, opts)
    }

    /// Register a marker at `t` (the cursor by default).
    pub fn mark(&self, name: Option<&str>, t: Option<TimeRef>) -> CommandOrdinal {
        let name = name.map(str::to_owned);
        let label = format!("mark {}", name.as_deref().unwrap_or("<default>"));
        self.queue.enqueue(label, move |ctx| {
            async move { ctx.with_state(|s| s.mark(name.as_deref(), t.as_ref()).map(drop)) }
                .boxed_local()
        })
    }

    /// Advance the cursor by `secs` with an empty sub-timeline.
    pub fn wait(&self, secs: f64) -> CommandOrdinal {
        self.queue.enqueue(format!("wait {secs}"), move |ctx| {
            async move { ctx.with_state(|s| s.wait(secs).map(drop)) }.boxed_local()
        })
    }

    /// Override defaults for every later command.
    pub fn set_defaults(&self, patch: OptionsPatch) -> CommandOrdinal {
        self.queue.enqueue("setDefaults", move |ctx| {
            async move { ctx.with_state(|s| s.set_defaults(&patch)) }.boxed_local()
        })
    }
}

/// Synchronously returned handle to a node whose content may not exist yet.
///
/// Verb methods enqueue one command each and return the handle for chaining.
#[derive(Clone)]
pub struct NodeHandle {
    id: NodeId,
    api: SceneApi,
}

impl std::fmt::Debug for NodeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeHandle").field("id", &self.id).finish()
    }
}

impl NodeHandle {
    /// Id of the node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Enqueue `verb` on this node.
    pub fn animate(&self, verb: Verb, params: AnimParams) -> &Self {
        let id = self.id;
        let label = format!("{} {id}", verb.name());
        self.api.queue.enqueue(label, move |ctx| {
            async move { ctx.with_state(|s| s.animate(id, &verb, &params).map(drop)) }
                .boxed_local()
        });
        self
    }

    /// Tween position to `to`.
    pub fn move_to(&self, to: impl Into<Axes>, params: AnimParams) -> &Self {
        self.animate(Verb::MoveTo(to.into()), params)
    }

    /// Tween position by `delta`.
    pub fn move_by(&self, delta: impl Into<Axes>, params: AnimParams) -> &Self {
        self.animate(Verb::MoveBy(delta.into()), params)
    }

    /// Tween scale to `to`.
    pub fn scale_to(&self, to: impl Into<Axes>, params: AnimParams) -> &Self {
        self.animate(Verb::ScaleTo(to.into()), params)
    }

    /// Tween scale by `factor` of its current value.
    pub fn scale_by(&self, factor: impl Into<Axes>, params: AnimParams) -> &Self {
        self.animate(Verb::ScaleBy(factor.into()), params)
    }

    /// Tween rotation to `to` (radians).
    pub fn rotate_to(&self, to: impl Into<Axes>, params: AnimParams) -> &Self {
        self.animate(Verb::RotateTo(to.into()), params)
    }

    /// Tween rotation by `delta` (radians).
    pub fn rotate_by(&self, delta: impl Into<Axes>, params: AnimParams) -> &Self {
        self.animate(Verb::RotateBy(delta.into()), params)
    }

    /// Set position.
    pub fn set_position(&self, to: impl Into<Axes>, params: AnimParams) -> &Self {
        self.animate(Verb::SetPosition(to.into()), params)
    }

    /// Set scale.
    pub fn set_scale(&self, to: impl Into<Axes>, params: AnimParams) -> &Self {
        self.animate(Verb::SetScale(to.into()), params)
    }

    /// Set rotation.
    pub fn set_rotation(&self, to: impl Into<Axes>, params: AnimParams) -> &Self {
        self.animate(Verb::SetRotation(to.into()), params)
    }

    /// Show and fade in to the rest opacity.
    pub fn fade_in(&self, params: AnimParams) -> &Self {
        self.animate(Verb::FadeIn { opacity: None }, params)
    }

    /// Fade out completely, then hide.
    pub fn fade_out(&self, params: AnimParams) -> &Self {
        self.animate(Verb::FadeOut { opacity: None }, params)
    }

    /// Fade to `opacity`; hides at the end only when `opacity` is 0.
    pub fn fade_out_to(&self, opacity: f64, params: AnimParams) -> &Self {
        self.animate(
            Verb::FadeOut {
                opacity: Some(opacity),
            },
            params,
        )
    }

    /// Set opacity.
    pub fn set_opacity(&self, opacity: f64, params: AnimParams) -> &Self {
        self.animate(Verb::SetOpacity { opacity }, params)
    }

    /// Tween color.
    pub fn change_color(&self, color: Rgba, params: AnimParams) -> &Self {
        self.animate(Verb::ChangeColor { color }, params)
    }

    /// Show instantly.
    pub fn show(&self, params: AnimParams) -> &Self {
        self.animate(Verb::Show, params)
    }

    /// Hide instantly.
    pub fn hide(&self, params: AnimParams) -> &Self {
        self.animate(Verb::Hide, params)
    }

    /// Scale up from nothing.
    pub fn grow(&self, params: AnimParams) -> &Self {
        self.animate(Verb::Grow, params)
    }

    /// Scale down to nothing, then hide.
    pub fn shrink(&self, params: AnimParams) -> &Self {
        self.animate(Verb::Shrink, params)
    }

    /// Shake horizontally.
    pub fn shake(&self, strength: Option<f64>, count: Option<u32>, params: AnimParams) -> &Self {
        self.animate(Verb::Shake { strength, count }, params)
    }

    /// Push children outward and fade them out.
    pub fn explode(&self, distance: Option<f64>, params: AnimParams) -> &Self {
        self.animate(Verb::Explode { distance }, params)
    }

    /// Uncover the node.
    pub fn reveal(&self, mode: RevealMode, params: AnimParams) -> &Self {
        self.animate(Verb::Reveal { mode }, params)
    }

    /// Show children one by one.
    pub fn typewriter(&self, params: AnimParams) -> &Self {
        self.animate(Verb::Typewriter, params)
    }

    /// Morph this rendering into `other` by matching symbols.
    pub fn morph_to(&self, other: &NodeHandle, reverse: bool, params: AnimParams) -> &Self {
        self.animate(
            Verb::MorphTo {
                into: other.id,
                reverse,
            },
            params,
        )
    }

    /// Spin around `axis` from the resolved time on.
    pub fn spin(&self, axis: Axis, radians_per_sec: f32, t: Option<TimeRef>) -> &Self {
        self.behavior(
            "spin",
            BehaviorKind::Spin {
                axis,
                radians_per_sec,
            },
            t,
        )
    }

    /// Keep facing `camera`.
    pub fn billboard(&self, camera: &NodeHandle) -> &Self {
        self.behavior("billboard", BehaviorKind::Billboard { camera: camera.id }, None)
    }

    /// Detach the node and its subtree.
    pub fn remove(&self) -> &Self {
        let id = self.id;
        self.api.queue.enqueue(format!("remove {id}"), move |ctx| {
            async move { ctx.with_state(|s| s.remove(id).map(drop)) }.boxed_local()
        });
        self
    }

    fn behavior(&self, name: &str, kind: BehaviorKind, t: Option<TimeRef>) -> &Self {
        let id = self.id;
        self.api.queue.enqueue(format!("{name} {id}"), move |ctx| {
            async move { ctx.with_state(|s| s.add_behavior(id, kind, t.as_ref())) }.boxed_local()
        });
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/scene_api.rs"]
mod tests;
