use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use futures::future::LocalBoxFuture;

use crate::foundation::error::{ChoreoError, ChoreoResult};
use crate::foundation::ids::CommandOrdinal;

/// Boxed command body. It receives its context and returns the future doing the work.
pub type CommandFn<S> = Box<dyn FnOnce(CommandCtx<S>) -> LocalBoxFuture<'static, ChoreoResult<()>>>;

/// Observable queue state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum QueueState {
    /// Nothing pending and nothing running.
    Idle,
    /// Work is pending or a command is running.
    Draining,
}

/// Outcome of a completed drain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrainReport {
    /// Commands executed by this drain, including ones enqueued while it ran.
    pub executed: usize,
    /// Ordinal of the last executed command.
    pub last: Option<CommandOrdinal>,
    /// Epoch the drain ran under.
    pub epoch: u64,
}

struct Pending<S> {
    ordinal: CommandOrdinal,
    label: String,
    run: CommandFn<S>,
}

struct Shared<S> {
    state: RefCell<S>,
    epoch: Cell<u64>,
    pending: RefCell<VecDeque<Pending<S>>>,
    running: Cell<bool>,
    next_ordinal: Cell<u64>,
}

/// Handle a running command uses to reach shared state.
///
/// Every access goes through [`CommandCtx::with_state`], which refuses to run once the
/// queue was reset after this command was enqueued.
pub struct CommandCtx<S> {
    ordinal: CommandOrdinal,
    epoch: u64,
    shared: Rc<Shared<S>>,
}

impl<S> Clone for CommandCtx<S> {
    fn clone(&self) -> Self {
        Self {
            ordinal: self.ordinal,
            epoch: self.epoch,
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<S> CommandCtx<S> {
    /// Ordinal of the running command.
    pub fn ordinal(&self) -> CommandOrdinal {
        self.ordinal
    }

    /// Epoch the command was enqueued under.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Return `true` while the command's epoch is still current.
    pub fn is_current(&self) -> bool {
        self.shared.epoch.get() == self.epoch
    }

    /// Run `f` against the shared state if the epoch is still current.
    pub fn with_state<R>(&self, f: impl FnOnce(&mut S) -> ChoreoResult<R>) -> ChoreoResult<R> {
        if !self.is_current() {
            tracing::warn!(
                ordinal = self.ordinal.0,
                epoch = self.epoch,
                current = self.shared.epoch.get(),
                "discarding state access from a reset session"
            );
            return Err(ChoreoError::Superseded { epoch: self.epoch });
        }
        let mut state = self
            .shared
            .state
            .try_borrow_mut()
            .map_err(|_| ChoreoError::validation("session state is already borrowed"))?;
        f(&mut state)
    }
}

/// Single-worker FIFO of asynchronous commands over shared state `S`.
///
/// `enqueue` returns immediately. `drain` runs commands one at a time in enqueue order,
/// awaiting each to completion before starting the next, so suspension inside one command
/// never lets a later one start. Commands enqueued while draining run in the same drain.
/// The first failure discards everything still pending.
pub struct CommandQueue<S> {
    shared: Rc<Shared<S>>,
}

impl<S> Clone for CommandQueue<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<S: 'static> CommandQueue<S> {
    /// Empty queue owning `state`.
    pub fn new(state: S) -> Self {
        Self {
            shared: Rc::new(Shared {
                state: RefCell::new(state),
                epoch: Cell::new(0),
                pending: RefCell::new(VecDeque::new()),
                running: Cell::new(false),
                next_ordinal: Cell::new(0),
            }),
        }
    }

    /// Append a command and return its ordinal.
    pub fn enqueue<F>(&self, label: impl Into<String>, run: F) -> CommandOrdinal
    where
        F: FnOnce(CommandCtx<S>) -> LocalBoxFuture<'static, ChoreoResult<()>> + 'static,
    {
        let ordinal = CommandOrdinal(self.shared.next_ordinal.get());
        self.shared.next_ordinal.set(ordinal.0 + 1);
        let label = label.into();
        tracing::debug!(ordinal = ordinal.0, label = %label, "command enqueued");
        self.shared.pending.borrow_mut().push_back(Pending {
            ordinal,
            label,
            run: Box::new(run),
        });
        ordinal
    }

    /// Current state.
    pub fn state(&self) -> QueueState {
        if self.shared.running.get() || !self.shared.pending.borrow().is_empty() {
            QueueState::Draining
        } else {
            QueueState::Idle
        }
    }

    /// Number of commands waiting to run.
    pub fn pending(&self) -> usize {
        self.shared.pending.borrow().len()
    }

    /// Current epoch.
    pub fn epoch(&self) -> u64 {
        self.shared.epoch.get()
    }

    /// Drop all pending commands, replace the state and bump the epoch.
    ///
    /// A command still suspended from before the reset gets
    /// [`ChoreoError::Superseded`] from its next state access.
    pub fn reset(&self, state: S) -> ChoreoResult<()> {
        let mut slot = self
            .shared
            .state
            .try_borrow_mut()
            .map_err(|_| ChoreoError::validation("cannot reset while session state is borrowed"))?;
        *slot = state;
        drop(slot);

        let dropped = {
            let mut pending = self.shared.pending.borrow_mut();
            let n = pending.len();
            pending.clear();
            n
        };
        self.shared.epoch.set(self.shared.epoch.get() + 1);
        self.shared.next_ordinal.set(0);
        self.shared.running.set(false);
        tracing::debug!(epoch = self.epoch(), dropped, "command queue reset");
        Ok(())
    }

    /// Borrow the shared state outside of a command.
    pub fn with_state<R>(&self, f: impl FnOnce(&mut S) -> ChoreoResult<R>) -> ChoreoResult<R> {
        let mut state = self
            .shared
            .state
            .try_borrow_mut()
            .map_err(|_| ChoreoError::validation("session state is already borrowed"))?;
        f(&mut state)
    }

    /// Run every pending command in order until the queue is empty.
    pub async fn drain(&self) -> ChoreoResult<DrainReport> {
        if self.shared.running.get() {
            return Err(ChoreoError::validation(
                "drain called while the queue is already draining",
            ));
        }
        let epoch = self.epoch();
        self.shared.running.set(true);
        let _guard = RunningGuard {
            shared: &self.shared,
            epoch,
        };

        let mut report = DrainReport {
            executed: 0,
            last: None,
            epoch,
        };
        loop {
            let next = self.shared.pending.borrow_mut().pop_front();
            let Some(cmd) = next else {
                break;
            };
            tracing::debug!(ordinal = cmd.ordinal.0, label = %cmd.label, "command started");
            let ctx = CommandCtx {
                ordinal: cmd.ordinal,
                epoch,
                shared: Rc::clone(&self.shared),
            };
            let result = (cmd.run)(ctx).await;

            if self.epoch() != epoch {
                tracing::warn!(
                    ordinal = cmd.ordinal.0,
                    label = %cmd.label,
                    epoch,
                    "queue was reset while a command ran; abandoning drain"
                );
                return Err(ChoreoError::Superseded { epoch });
            }
            if let Err(err) = result {
                let dropped = {
                    let mut pending = self.shared.pending.borrow_mut();
                    let n = pending.len();
                    pending.clear();
                    n
                };
                tracing::debug!(
                    ordinal = cmd.ordinal.0,
                    label = %cmd.label,
                    dropped,
                    "command failed; remaining queue discarded"
                );
                return Err(ChoreoError::command(cmd.ordinal.0, cmd.label, err));
            }
            report.executed += 1;
            report.last = Some(cmd.ordinal);
        }
        Ok(report)
    }
}

struct RunningGuard<'a, S> {
    shared: &'a Shared<S>,
    epoch: u64,
}

impl<S> Drop for RunningGuard<'_, S> {
    fn drop(&mut self) {
        if self.shared.epoch.get() == self.epoch {
            self.shared.running.set(false);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequencer/queue.rs"]
mod tests;
