use std::io::Write;

use crate::export::fingerprint::{SampleFingerprint, fingerprint_sample};
use crate::foundation::error::{ChoreoError, ChoreoResult};
use crate::session::engine::Engine;
use crate::session::sample::SceneSample;

/// Configuration handed to a [`SampleSink`] before the first frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExportConfig {
    /// Frames per second.
    pub fps: u32,
    /// Number of frames that will be pushed.
    pub frames: u64,
    /// Timeline duration in seconds.
    pub duration: f64,
}

/// Sink contract for consuming sampled frames in timeline order.
///
/// `push_frame` is called with strictly increasing frame indices starting at 0.
pub trait SampleSink {
    /// Called once before any frame.
    fn begin(&mut self, cfg: ExportConfig) -> ChoreoResult<()>;
    /// Called once per frame.
    fn push_frame(&mut self, idx: u64, sample: &SceneSample) -> ChoreoResult<()>;
    /// Called once after the last frame.
    fn end(&mut self) -> ChoreoResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<ExportConfig>,
    frames: Vec<(u64, SceneSample)>,
}

impl InMemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration passed to `begin`.
    pub fn config(&self) -> Option<ExportConfig> {
        self.cfg
    }

    /// Frames in push order.
    pub fn frames(&self) -> &[(u64, SceneSample)] {
        &self.frames
    }
}

impl SampleSink for InMemorySink {
    fn begin(&mut self, cfg: ExportConfig) -> ChoreoResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, sample: &SceneSample) -> ChoreoResult<()> {
        self.frames.push((idx, sample.clone()));
        Ok(())
    }

    fn end(&mut self) -> ChoreoResult<()> {
        Ok(())
    }
}

#[derive(serde::Serialize)]
struct FrameLine<'a> {
    frame: u64,
    #[serde(flatten)]
    sample: &'a SceneSample,
}

/// Writes one JSON object per frame, one per line.
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    /// Sink writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

fn io_err(e: std::io::Error) -> ChoreoError {
    ChoreoError::Other(anyhow::Error::new(e).context("write export frame"))
}

impl<W: Write> SampleSink for JsonLinesSink<W> {
    fn begin(&mut self, _cfg: ExportConfig) -> ChoreoResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, sample: &SceneSample) -> ChoreoResult<()> {
        serde_json::to_writer(&mut self.out, &FrameLine { frame: idx, sample })?;
        self.out.write_all(b"\n").map_err(io_err)
    }

    fn end(&mut self) -> ChoreoResult<()> {
        self.out.flush().map_err(io_err)
    }
}

/// Options of one export run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExportOpts {
    /// Frames per second.
    pub fps: u32,
    /// Push the previous sample again when a frame's fingerprint is unchanged.
    pub static_frame_elision: bool,
}

/// Export statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportStats {
    /// Frames pushed.
    pub frames_total: u64,
    /// Frames that produced a fresh sample.
    pub frames_sampled: u64,
    /// Frames elided as identical to their predecessor.
    pub frames_elided: u64,
}

/// Number of frames covering `[0, duration]`, the final one landing on `duration`.
pub fn frame_count(duration: f64, fps: u32) -> u64 {
    let exact = duration * f64::from(fps);
    // Tolerate representation error in products such as 0.1 * 30.
    (exact - 1e-9).ceil().max(0.0) as u64 + 1
}

/// Play the engine's timeline from 0 and push every frame to `sink`.
///
/// Time advances by `1 / fps` per frame and stops at the end of the timeline.
pub fn export_range(
    engine: &mut Engine,
    opts: ExportOpts,
    sink: &mut dyn SampleSink,
) -> ChoreoResult<ExportStats> {
    if opts.fps == 0 {
        return Err(ChoreoError::validation("export fps must be > 0"));
    }
    let duration = engine.duration()?;
    let frames = frame_count(duration, opts.fps);
    let dt = 1.0 / f64::from(opts.fps);

    sink.begin(ExportConfig {
        fps: opts.fps,
        frames,
        duration,
    })?;

    engine.seek(0.0)?;
    engine.play()?;
    let mut stats = ExportStats::default();
    let mut previous: Option<(SampleFingerprint, SceneSample)> = None;
    for idx in 0..frames {
        if idx > 0 {
            engine.step(dt, dt)?;
        }
        let sample = engine.sample_state()?;
        stats.frames_total += 1;

        if opts.static_frame_elision {
            let fp = fingerprint_sample(&sample);
            if let Some((prev_fp, prev)) = &previous
                && *prev_fp == fp
            {
                stats.frames_elided += 1;
                sink.push_frame(idx, prev)?;
                continue;
            }
            stats.frames_sampled += 1;
            sink.push_frame(idx, &sample)?;
            previous = Some((fp, sample));
        } else {
            stats.frames_sampled += 1;
            sink.push_frame(idx, &sample)?;
        }
    }
    engine.pause();
    sink.end()?;

    tracing::debug!(
        frames = stats.frames_total,
        elided = stats.frames_elided,
        "export finished"
    );
    Ok(stats)
}

#[cfg(test)]
#[path = "../../tests/unit/export/sink.rs"]
mod tests;
