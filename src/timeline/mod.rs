//! Main timeline composition: time references, markers, insertion and playback.

/// Main timeline owning placed tracks, placements and markers.
pub mod main_timeline;
/// Named marker registry.
pub mod markers;
/// Play/pause/seek state and scene sampling.
pub mod playback;
/// Time reference resolution.
pub mod resolve;
/// Time expression parsing.
pub mod time_ref;
