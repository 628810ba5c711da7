use std::rc::Rc;

use crate::collab::factory::{RenderableFactory, SyntheticFactory};
use crate::collab::renderer::{DrawList, Renderer};
use crate::config::{EngineOptions, OptionsPatch};
use crate::foundation::error::{ChoreoError, ChoreoResult};
use crate::script::model::ScriptDef;
use crate::script::run::enqueue_script;
use crate::session::Session;
use crate::session::sample::SceneSample;
use crate::session::scene_api::SceneApi;
use crate::timeline::markers::Marker;
use crate::timeline::playback::{Playback, TimelineSummary, sample_into};

/// Where the engine is in its load cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LoadStatus {
    /// Nothing loaded yet.
    Empty,
    /// Commands are being drained.
    Loading,
    /// The timeline is complete.
    Ready,
    /// The last load failed; the timeline must not be played.
    Failed,
}

/// Driver entry point: loads scripts, owns playback and answers timeline queries.
///
/// Seeking, playing and sampling never mutate the timeline; they only re-derive the scene
/// from it.
pub struct Engine {
    session: Session,
    options: EngineOptions,
    overrides: OptionsPatch,
    playback: Playback,
    status: LoadStatus,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Engine with default options and the built-in synthetic factory.
    pub fn new() -> Self {
        Self::with_factory(Rc::new(SyntheticFactory::new()))
    }

    /// Engine creating renderables through `factory`.
    pub fn with_factory(factory: Rc<dyn RenderableFactory>) -> Self {
        let options = EngineOptions::default();
        Self {
            session: Session::new(options.clone(), factory),
            options,
            overrides: OptionsPatch::default(),
            playback: Playback::new(),
            status: LoadStatus::Empty,
        }
    }

    /// Replace the base options every run starts from.
    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// Options applied on top of a script's own `defaults` block (CLI flags).
    pub fn with_overrides(mut self, overrides: OptionsPatch) -> Self {
        self.overrides = overrides;
        self
    }

    /// Load status.
    pub fn status(&self) -> LoadStatus {
        self.status
    }

    /// Session handle.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Parse a JSON script, reset the session, then run every command in order.
    #[tracing::instrument(skip(self, source), fields(bytes = source.len()))]
    pub async fn load_script(&mut self, source: &str) -> ChoreoResult<()> {
        let commands = match self.prepare(source) {
            Ok(n) => n,
            Err(err) => {
                self.status = LoadStatus::Failed;
                return Err(err);
            }
        };
        self.finish(commands).await
    }

    fn prepare(&mut self, source: &str) -> ChoreoResult<usize> {
        let script = ScriptDef::parse(source)?;
        let layered = script
            .defaults
            .clone()
            .unwrap_or_default()
            .then(&self.overrides);
        let options = self.options.merged_with(&layered);
        options.validate()?;
        self.start(options)?;
        enqueue_script(&self.session.api(), &script)
    }

    /// Blocking form of [`Engine::load_script`] for hosts without an executor.
    pub fn load_script_blocking(&mut self, source: &str) -> ChoreoResult<()> {
        pollster::block_on(self.load_script(source))
    }

    /// Reset the session, let `f` enqueue a Rust-authored scene, then run it.
    #[tracing::instrument(skip(self, f))]
    pub async fn build(&mut self, f: impl FnOnce(&SceneApi)) -> ChoreoResult<()> {
        let options = self.options.merged_with(&self.overrides);
        if let Err(err) = options.validate().and_then(|()| self.start(options)) {
            self.status = LoadStatus::Failed;
            return Err(err);
        }
        let api = self.session.api();
        f(&api);
        let commands = self.session.queue().pending();
        self.finish(commands).await
    }

    /// Blocking form of [`Engine::build`].
    pub fn build_blocking(&mut self, f: impl FnOnce(&SceneApi)) -> ChoreoResult<()> {
        pollster::block_on(self.build(f))
    }

    fn start(&mut self, options: EngineOptions) -> ChoreoResult<()> {
        self.session.reset(options)?;
        self.playback = Playback::new();
        self.status = LoadStatus::Loading;
        Ok(())
    }

    async fn finish(&mut self, commands: usize) -> ChoreoResult<()> {
        match self.session.drain().await {
            Ok(report) => {
                self.status = LoadStatus::Ready;
                self.resample()?;
                let (duration, markers) = self
                    .session
                    .with_state(|s| Ok((s.timeline.duration(), s.timeline.marker_list().len())))?;
                tracing::info!(
                    commands,
                    executed = report.executed,
                    duration,
                    markers,
                    "scene loaded"
                );
                Ok(())
            }
            Err(err) => {
                self.status = LoadStatus::Failed;
                Err(err)
            }
        }
    }

    fn ensure_playable(&self) -> ChoreoResult<()> {
        match self.status {
            LoadStatus::Empty | LoadStatus::Ready => Ok(()),
            LoadStatus::Loading => Err(ChoreoError::validation("scene is still loading")),
            LoadStatus::Failed => Err(ChoreoError::validation(
                "the last load failed; reload before playing",
            )),
        }
    }

    fn resample(&mut self) -> ChoreoResult<()> {
        let t = self.playback.time();
        self.session
            .with_state(|s| sample_into(&mut s.graph, &s.timeline, &s.behaviors, t))
    }

    /// Total timeline duration.
    pub fn duration(&self) -> ChoreoResult<f64> {
        self.session.with_state(|s| Ok(s.timeline.duration()))
    }

    /// Current playback position.
    pub fn time(&self) -> f64 {
        self.playback.time()
    }

    /// Return `true` while playing.
    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    /// Jump to `t` (clamped to `[0, duration]`) and resample. Returns the position.
    pub fn seek(&mut self, t: f64) -> ChoreoResult<f64> {
        self.ensure_playable()?;
        let duration = self.duration()?;
        self.playback.seek(t, duration);
        self.resample()?;
        Ok(self.playback.time())
    }

    /// Start playing.
    pub fn play(&mut self) -> ChoreoResult<()> {
        self.ensure_playable()?;
        let duration = self.duration()?;
        self.playback.play(duration);
        self.resample()
    }

    /// Seek to `t` (clamped) and start playing from there.
    pub fn play_from(&mut self, t: f64) -> ChoreoResult<()> {
        self.ensure_playable()?;
        let duration = self.duration()?;
        self.playback.play_from(t, duration);
        self.resample()
    }

    /// Pause at the current position.
    pub fn pause(&mut self) {
        self.playback.pause();
    }

    /// Step simulated time by `dt` (at most `maxFrameStep`) while playing and resample.
    pub fn advance(&mut self, dt: f64) -> ChoreoResult<f64> {
        let max_step = self.session.with_state(|s| Ok(s.options.max_frame_step))?;
        self.step(dt, max_step)
    }

    pub(crate) fn step(&mut self, dt: f64, max_step: f64) -> ChoreoResult<f64> {
        self.ensure_playable()?;
        let duration = self.duration()?;
        self.playback.advance(dt, duration, max_step);
        self.resample()?;
        Ok(self.playback.time())
    }

    /// Options of the current run (after script defaults and overrides).
    pub fn options(&self) -> ChoreoResult<EngineOptions> {
        self.session.with_state(|s| Ok(s.options.clone()))
    }

    /// Markers in registration order.
    pub fn markers(&self) -> ChoreoResult<Vec<Marker>> {
        self.session
            .with_state(|s| Ok(s.timeline.marker_list().to_vec()))
    }

    /// Sub-timeline starts, markers and duration.
    pub fn timeline_summary(&self) -> ChoreoResult<TimelineSummary> {
        self.session.with_state(|s| Ok(TimelineSummary::of(&s.timeline)))
    }

    /// Every sampled value at the current position.
    pub fn sample_state(&self) -> ChoreoResult<SceneSample> {
        let t = self.playback.time();
        self.session.with_state(|s| Ok(SceneSample::capture(&s.graph, t)))
    }

    /// Draw list at the current position.
    pub fn draw_list(&self) -> ChoreoResult<DrawList> {
        self.session.with_state(|s| DrawList::from_graph(&s.graph))
    }

    /// Hand the current frame to `renderer`.
    pub fn draw(&self, renderer: &mut dyn Renderer) -> ChoreoResult<()> {
        self.ensure_playable()?;
        let list = self.draw_list()?;
        renderer.draw(&list)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/engine.rs"]
mod tests;
