use std::collections::BTreeMap;

use crate::foundation::error::{ChoreoError, ChoreoResult};
use crate::script::model::{CommandDef, SceneOp, ScriptDef};
use crate::session::scene_api::{NodeHandle, SceneApi};

fn lookup<'a>(nodes: &'a BTreeMap<&str, NodeHandle>, name: &str) -> ChoreoResult<&'a NodeHandle> {
    nodes
        .get(name)
        .ok_or_else(|| ChoreoError::script(format!("unknown node id '{name}'")))
}

/// Enqueue every command of `script` on `api`, binding script ids to handles.
///
/// Returns the number of commands enqueued. Nothing runs until the queue drains.
pub fn enqueue_script(api: &SceneApi, script: &ScriptDef) -> ChoreoResult<usize> {
    let mut nodes: BTreeMap<&str, NodeHandle> = BTreeMap::new();
    for cmd in &script.commands {
        match cmd {
            CommandDef::Scene(SceneOp::Add(def)) => {
                let mut opts = def.options.clone();
                if let Some(parent) = &def.parent {
                    opts.parent = Some(lookup(&nodes, parent)?.id());
                }
                if opts.name.is_none() {
                    opts.name = Some(def.id.clone());
                }
                let handle = api.add(def.kind.clone().into_kind(), opts);
                nodes.insert(def.id.as_str(), handle);
            }
            CommandDef::Scene(SceneOp::Mark(m)) => {
                api.mark(m.name.as_deref(), m.t.clone());
            }
            CommandDef::Scene(SceneOp::Wait(w)) => {
                api.wait(w.duration);
            }
            CommandDef::Scene(SceneOp::SetDefaults(patch)) => {
                api.set_defaults(patch.clone());
            }
            CommandDef::Scene(SceneOp::Spin(s)) => {
                lookup(&nodes, &s.target)?.spin(s.axis, s.radians_per_sec, s.t.clone());
            }
            CommandDef::Scene(SceneOp::Billboard(b)) => {
                let camera = lookup(&nodes, &b.camera)?;
                lookup(&nodes, &b.target)?.billboard(camera);
            }
            CommandDef::Scene(SceneOp::Remove(r)) => {
                lookup(&nodes, &r.target)?.remove();
            }
            CommandDef::Animate(def) => {
                let verb = def
                    .verb
                    .clone()
                    .try_map_refs(|name| lookup(&nodes, &name).map(NodeHandle::id))?;
                lookup(&nodes, &def.target)?.animate(verb, def.params.clone());
            }
        }
    }
    tracing::debug!(commands = script.commands.len(), "script enqueued");
    Ok(script.commands.len())
}
