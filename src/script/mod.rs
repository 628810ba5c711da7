//! JSON scene scripts: parsing with id checks, then binding onto the scene API.

/// Script document model.
pub mod model;
/// Binding of parsed commands to scene handles.
pub mod run;
