//! Collaborator contracts the engine consumes: renderable creation and drawing.

/// Asynchronous renderable creation.
pub mod factory;
/// Draw lists and the renderer contract.
pub mod renderer;
