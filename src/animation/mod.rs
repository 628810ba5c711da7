//! Tween primitives and their composition into sub-timelines.

/// Easing curves.
pub mod ease;
/// Sub-timeline bundles produced by one animation call.
pub mod sub_timeline;
/// Single-field tween tracks and their placed form.
pub mod tween;
