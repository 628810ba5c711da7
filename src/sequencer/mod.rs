//! Ordered execution of asynchronous scene commands.

/// FIFO command queue with epoch-guarded state access.
pub mod queue;
