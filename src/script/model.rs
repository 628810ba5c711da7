use std::collections::BTreeSet;

use serde::Deserialize;

use crate::config::OptionsPatch;
use crate::foundation::core::Vec3;
use crate::foundation::error::{ChoreoError, ChoreoResult};
use crate::scene::behaviors::Axis;
use crate::scene::node::{NodeKind, ShapeKind};
use crate::session::state::AddOptions;
use crate::timeline::time_ref::TimeRef;
use crate::verbs::{AnimParams, Verb};

/// Ops handled by [`SceneOp`]; every other `op` is an animation verb.
const SCENE_OPS: [&str; 7] = [
    "add",
    "mark",
    "wait",
    "setDefaults",
    "spin",
    "billboard",
    "remove",
];

/// Keys every verb accepts besides its own parameters.
const VERB_KEYS: [&str; 6] = ["op", "target", "t", "duration", "ease", "stagger"];

/// Keys every `add` accepts besides its kind's parameters.
const ADD_KEYS: [&str; 13] = [
    "op",
    "id",
    "parent",
    "kind",
    "name",
    "position",
    "rotation",
    "scale",
    "color",
    "opacity",
    "wireframe",
    "visible",
    "t",
];

/// Keys accepted by command `op`, or `None` when its own model already rejects extras.
fn known_keys(op: &str, kind: Option<&str>) -> Option<Vec<&'static str>> {
    let own: &[&str] = match op {
        "setDefaults" => return None,
        "add" => {
            let kind_keys: &[&str] = match kind {
                Some("text") => &["text"],
                Some("formula") => &["source"],
                Some("line") => &["points"],
                Some("camera") => &["fov"],
                Some("frustum") => &["near", "far"],
                Some("circle" | "sphere") => &["radius"],
                Some("rect") => &["width", "height"],
                Some("box") => &["size"],
                Some("model") => &["path"],
                _ => &[],
            };
            return Some(ADD_KEYS.iter().chain(kind_keys).copied().collect());
        }
        "mark" => return Some(vec!["op", "name", "t"]),
        "wait" => return Some(vec!["op", "duration"]),
        "spin" => return Some(vec!["op", "target", "axis", "radiansPerSec", "t"]),
        "billboard" => return Some(vec!["op", "target", "camera"]),
        "remove" => return Some(vec!["op", "target"]),
        "moveTo" | "moveBy" | "scaleTo" | "scaleBy" | "rotateTo" | "rotateBy" | "setPosition"
        | "setScale" | "setRotation" => &["x", "y", "z"],
        "fadeIn" | "fadeOut" | "setOpacity" => &["opacity"],
        "changeColor" => &["color"],
        "shake" => &["strength", "count"],
        "explode" => &["distance"],
        "reveal" => &["mode"],
        "morphTo" => &["into", "reverse"],
        _ => &[],
    };
    Some(VERB_KEYS.iter().chain(own).copied().collect())
}

/// A parsed scene script.
#[derive(Clone, Debug, PartialEq)]
pub struct ScriptDef {
    /// Options overriding the engine base for this script.
    pub defaults: Option<OptionsPatch>,
    /// Commands in source order.
    pub commands: Vec<CommandDef>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawScript {
    #[serde(default)]
    defaults: Option<OptionsPatch>,
    #[serde(default)]
    commands: Vec<serde_json::Value>,
}

/// One script command.
#[derive(Clone, Debug, PartialEq)]
pub enum CommandDef {
    /// Scene mutation, marker or behavior.
    Scene(SceneOp),
    /// Animation verb on a target.
    Animate(AnimateDef),
}

/// Non-verb ops.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum SceneOp {
    /// Create a node.
    Add(AddDef),
    /// Register a marker.
    Mark(MarkDef),
    /// Advance the cursor.
    Wait(WaitDef),
    /// Override defaults for later commands.
    SetDefaults(OptionsPatch),
    /// Attach a spin behavior.
    Spin(SpinDef),
    /// Attach a billboard behavior.
    Billboard(BillboardDef),
    /// Detach a node.
    Remove(RemoveDef),
}

/// `add` command.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AddDef {
    /// Script-local id other commands refer to.
    pub id: String,
    /// Script-local id of the parent.
    #[serde(default)]
    pub parent: Option<String>,
    /// What to build.
    #[serde(flatten)]
    pub kind: KindDef,
    /// Initial state and insertion time.
    #[serde(flatten)]
    pub options: AddOptions,
}

/// Node kinds as scripts name them.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum KindDef {
    /// Text.
    Text {
        /// Source text.
        text: String,
    },
    /// Formula.
    Formula {
        /// TeX-like source.
        source: String,
    },
    /// Polyline.
    Line {
        /// Vertices.
        points: Vec<Vec3>,
    },
    /// Empty group.
    Group,
    /// Camera.
    Camera {
        /// Vertical field of view in degrees.
        #[serde(default = "default_fov")]
        fov: f32,
    },
    /// Camera frustum helper.
    Frustum {
        /// Near plane.
        near: f32,
        /// Far plane.
        far: f32,
    },
    /// Circle.
    Circle {
        /// Radius.
        #[serde(default = "default_one")]
        radius: f32,
    },
    /// Rectangle.
    Rect {
        /// Width.
        #[serde(default = "default_one")]
        width: f32,
        /// Height.
        #[serde(default = "default_one")]
        height: f32,
    },
    /// Sphere.
    Sphere {
        /// Radius.
        #[serde(default = "default_one")]
        radius: f32,
    },
    /// Box.
    Box {
        /// Edge lengths.
        #[serde(default = "default_unit_box")]
        size: Vec3,
    },
    /// External model.
    Model {
        /// Model location.
        path: String,
    },
}

fn default_fov() -> f32 {
    50.0
}

fn default_one() -> f32 {
    1.0
}

fn default_unit_box() -> Vec3 {
    Vec3::ONE
}

impl KindDef {
    /// Scene-graph kind.
    pub fn into_kind(self) -> NodeKind {
        match self {
            Self::Text { text } => NodeKind::Text { text },
            Self::Formula { source } => NodeKind::Formula { source },
            Self::Line { points } => NodeKind::Line { points },
            Self::Group => NodeKind::Group,
            Self::Camera { fov } => NodeKind::Camera { fov_deg: fov },
            Self::Frustum { near, far } => NodeKind::Frustum { near, far },
            Self::Circle { radius } => NodeKind::Shape(ShapeKind::Circle { radius }),
            Self::Rect { width, height } => NodeKind::Shape(ShapeKind::Rect { width, height }),
            Self::Sphere { radius } => NodeKind::Shape(ShapeKind::Sphere { radius }),
            Self::Box { size } => NodeKind::Shape(ShapeKind::Box { size }),
            Self::Model { path } => NodeKind::Shape(ShapeKind::Model { path }),
        }
    }
}

/// `mark` command.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MarkDef {
    /// Marker name; the configured default when absent.
    pub name: Option<String>,
    /// Marker time; the cursor when absent.
    pub t: Option<TimeRef>,
}

/// `wait` command.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct WaitDef {
    /// Seconds.
    pub duration: f64,
}

/// `spin` command.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinDef {
    /// Spinning node.
    pub target: String,
    /// Rotation axis.
    #[serde(default = "default_axis")]
    pub axis: Axis,
    /// Angular speed.
    pub radians_per_sec: f32,
    /// Start time; 0 when absent.
    #[serde(default)]
    pub t: Option<TimeRef>,
}

fn default_axis() -> Axis {
    Axis::Y
}

/// `billboard` command.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct BillboardDef {
    /// Node that keeps facing the camera.
    pub target: String,
    /// Camera node.
    pub camera: String,
}

/// `remove` command.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RemoveDef {
    /// Node to detach.
    pub target: String,
}

/// Animation command: `{"op": "<verb>", "target": "<id>", ...}`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AnimateDef {
    /// Animated node.
    pub target: String,
    /// Placement and timing.
    #[serde(flatten)]
    pub params: AnimParams,
    /// Verb and its parameters.
    #[serde(flatten)]
    pub verb: Verb<String>,
}

impl CommandDef {
    /// Script op name.
    pub fn op(&self) -> &'static str {
        match self {
            Self::Scene(SceneOp::Add(_)) => "add",
            Self::Scene(SceneOp::Mark(_)) => "mark",
            Self::Scene(SceneOp::Wait(_)) => "wait",
            Self::Scene(SceneOp::SetDefaults(_)) => "setDefaults",
            Self::Scene(SceneOp::Spin(_)) => "spin",
            Self::Scene(SceneOp::Billboard(_)) => "billboard",
            Self::Scene(SceneOp::Remove(_)) => "remove",
            Self::Animate(a) => a.verb.name(),
        }
    }

    fn from_value(index: usize, value: serde_json::Value) -> ChoreoResult<Self> {
        let op = value
            .get("op")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| ChoreoError::script(format!("command #{index} has no \"op\" string")))?
            .to_owned();
        let kind = value.get("kind").and_then(serde_json::Value::as_str);
        if let (Some(known), Some(fields)) = (known_keys(&op, kind), value.as_object())
            && let Some(key) = fields.keys().find(|k| !known.contains(&k.as_str()))
        {
            return Err(ChoreoError::script(format!(
                "command #{index} ({op}): unknown field '{key}'"
            )));
        }
        let parsed = if SCENE_OPS.contains(&op.as_str()) {
            serde_json::from_value(value).map(Self::Scene)
        } else {
            serde_json::from_value(value).map(Self::Animate)
        };
        parsed.map_err(|e| ChoreoError::script(format!("command #{index} ({op}): {e}")))
    }

    /// Script-local ids this command refers to (not the one it declares).
    fn references(&self) -> Vec<&str> {
        match self {
            Self::Scene(SceneOp::Add(a)) => a.parent.iter().map(String::as_str).collect(),
            Self::Scene(SceneOp::Spin(s)) => vec![s.target.as_str()],
            Self::Scene(SceneOp::Billboard(b)) => vec![b.target.as_str(), b.camera.as_str()],
            Self::Scene(SceneOp::Remove(r)) => vec![r.target.as_str()],
            Self::Scene(_) => Vec::new(),
            Self::Animate(a) => std::iter::once(a.target.as_str())
                .chain(a.verb.referenced().map(String::as_str))
                .collect(),
        }
    }
}

impl ScriptDef {
    /// Parse and check a JSON script.
    ///
    /// Every id must be declared by an earlier `add`, and each `add` id must be unique and
    /// non-empty. Errors name the offending command index.
    pub fn parse(source: &str) -> ChoreoResult<Self> {
        let raw: RawScript = serde_json::from_str(source)
            .map_err(|e| ChoreoError::script(format!("invalid script: {e}")))?;
        let commands = raw
            .commands
            .into_iter()
            .enumerate()
            .map(|(i, v)| CommandDef::from_value(i, v))
            .collect::<ChoreoResult<Vec<_>>>()?;
        let script = Self {
            defaults: raw.defaults,
            commands,
        };
        script.check_ids()?;
        Ok(script)
    }

    fn check_ids(&self) -> ChoreoResult<()> {
        let mut declared = BTreeSet::new();
        for (i, cmd) in self.commands.iter().enumerate() {
            for name in cmd.references() {
                if !declared.contains(name) {
                    return Err(ChoreoError::script(format!(
                        "command #{i} ({}): unknown node id '{name}'",
                        cmd.op()
                    )));
                }
            }
            if let CommandDef::Scene(SceneOp::Add(a)) = cmd {
                if a.id.trim().is_empty() {
                    return Err(ChoreoError::script(format!("command #{i} (add): empty id")));
                }
                if !declared.insert(a.id.as_str()) {
                    return Err(ChoreoError::script(format!(
                        "command #{i} (add): duplicate node id '{}'",
                        a.id
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/model.rs"]
mod tests;
