//! Choreo schedules declarative scene animations onto one deterministic timeline.
//!
//! Scene construction and animation calls return immediately and are queued as commands.
//! Commands run strictly in call order, even when building a node's content suspends, and
//! each animation call places exactly one sub-timeline on the main timeline at a time
//! resolved from a symbolic [`TimeRef`].
//!
//! - Load a JSON script or build a scene in Rust through an [`Engine`]
//! - Seek, play and sample the finished timeline
//! - Stream frames into a [`SampleSink`]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod foundation;

/// Tween tracks, easing and sub-timelines.
pub mod animation;
/// Renderable creation and drawing contracts.
pub mod collab;
/// Engine options and their layering.
pub mod config;
/// Symbol sequence diff.
pub mod diff;
/// Frame export.
pub mod export;
/// Scene graph, materials and behaviors.
pub mod scene;
/// JSON scene scripts.
pub mod script;
/// Ordered command execution.
pub mod sequencer;
/// Sessions, the scene API and the engine driver.
pub mod session;
/// Main timeline, markers and playback.
pub mod timeline;
/// Animation verbs.
pub mod verbs;

pub use crate::foundation::core::{Aabb, Affine3A, EulerRot, Quat, Rgba, Transform, Vec3};
pub use crate::foundation::error::{ChoreoError, ChoreoResult};
pub use crate::foundation::ids::{BehaviorId, CommandOrdinal, MaterialId, NodeId, RenderableId};

pub use crate::animation::ease::Ease;
pub use crate::collab::factory::{Renderable, RenderableFactory, SymbolGlyph, SyntheticFactory};
pub use crate::collab::renderer::{DrawItem, DrawList, RecordingRenderer, Renderer};
pub use crate::config::{EngineOptions, OptionsPatch};
pub use crate::export::fingerprint::{SampleFingerprint, fingerprint_sample};
pub use crate::export::sink::{
    ExportConfig, ExportOpts, ExportStats, InMemorySink, JsonLinesSink, SampleSink,
    export_range,
};
pub use crate::scene::behaviors::Axis;
pub use crate::scene::node::{NodeKind, ShapeKind};
pub use crate::session::Session;
pub use crate::session::engine::{Engine, LoadStatus};
pub use crate::session::sample::{MaterialSample, NodeSample, SceneSample};
pub use crate::session::scene_api::{NodeHandle, SceneApi};
pub use crate::session::state::AddOptions;
pub use crate::timeline::markers::Marker;
pub use crate::timeline::playback::TimelineSummary;
pub use crate::timeline::time_ref::TimeRef;
pub use crate::verbs::{AnimParams, Axes, RevealMode, Verb};
