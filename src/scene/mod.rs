//! Scene graph: tagged nodes, materials and per-frame behaviors.

/// Per-frame behaviors bound to nodes by id.
pub mod behaviors;
/// Arena-backed scene graph.
pub mod graph;
/// Node and material types.
pub mod node;
