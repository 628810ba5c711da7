//! Session objects: per-run state, the command queue over it, and the driver.

/// Script/host driver.
pub mod engine;
/// Sampled scene values.
pub mod sample;
/// Synchronous scene-building handles.
pub mod scene_api;
/// Per-run state and its mutations.
pub mod state;

use std::rc::Rc;

use crate::collab::factory::RenderableFactory;
use crate::config::EngineOptions;
use crate::foundation::error::ChoreoResult;
use crate::sequencer::queue::{CommandQueue, DrainReport};
use crate::session::scene_api::SceneApi;
use crate::session::state::{NodeIds, SessionState};

/// Shared handle to one engine's run state and its command queue.
#[derive(Clone)]
pub struct Session {
    queue: CommandQueue<SessionState>,
    ids: NodeIds,
    factory: Rc<dyn RenderableFactory>,
}

impl Session {
    /// Empty session creating renderables through `factory`.
    pub fn new(options: EngineOptions, factory: Rc<dyn RenderableFactory>) -> Self {
        let ids = NodeIds::new();
        Self {
            queue: CommandQueue::new(SessionState::new(options, ids.clone())),
            ids,
            factory,
        }
    }

    /// Discard the scene, timeline, markers and pending commands, then start over.
    pub fn reset(&self, options: EngineOptions) -> ChoreoResult<()> {
        self.queue
            .reset(SessionState::new(options, self.ids.clone()))
    }

    /// Reset and release this handle. Commands still in flight become stragglers.
    pub fn dispose(self) -> ChoreoResult<()> {
        let options = self.queue.with_state(|s| Ok(s.options.clone()))?;
        self.reset(options)
    }

    /// Scene-building handle enqueuing into this session.
    pub fn api(&self) -> SceneApi {
        SceneApi::new(self.queue.clone(), self.ids.clone(), Rc::clone(&self.factory))
    }

    /// Run every pending command.
    pub async fn drain(&self) -> ChoreoResult<DrainReport> {
        self.queue.drain().await
    }

    /// Borrow the run state outside of a command.
    pub fn with_state<R>(
        &self,
        f: impl FnOnce(&mut SessionState) -> ChoreoResult<R>,
    ) -> ChoreoResult<R> {
        self.queue.with_state(f)
    }

    /// The underlying queue.
    pub fn queue(&self) -> &CommandQueue<SessionState> {
        &self.queue
    }
}
