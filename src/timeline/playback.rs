use crate::animation::tween::Property;
use crate::foundation::error::ChoreoResult;
use crate::scene::behaviors::BehaviorList;
use crate::scene::graph::SceneGraph;
use crate::timeline::main_timeline::MainTimeline;
use crate::timeline::markers::Marker;

/// Play/pause/seek state of the global timeline.
///
/// Playback only tracks a position; the scene is re-derived from the main timeline at that
/// position by [`sample_into`], so the displayed state never depends on playback history.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Playback {
    time: f64,
    playing: bool,
}

impl Playback {
    /// Paused at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position in seconds.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Return `true` while playing.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Start playing. A finished timeline restarts from 0.
    pub fn play(&mut self, duration: f64) {
        if self.time >= duration {
            self.time = 0.0;
        }
        self.playing = true;
    }

    /// Start playing from `t` (clamped).
    pub fn play_from(&mut self, t: f64, duration: f64) {
        self.seek(t, duration);
        self.playing = true;
    }

    /// Stop advancing. The position is kept.
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Jump to `t`, clamped to `[0, duration]`. Non-finite input maps to 0.
    pub fn seek(&mut self, t: f64, duration: f64) -> f64 {
        self.time = if t.is_finite() {
            t.clamp(0.0, duration.max(0.0))
        } else {
            0.0
        };
        self.time
    }

    /// Advance by `dt` (clamped to `max_step`) while playing; pauses at the end.
    pub fn advance(&mut self, dt: f64, duration: f64, max_step: f64) -> f64 {
        if !self.playing || !dt.is_finite() {
            return self.time;
        }
        let step = dt.clamp(0.0, max_step.max(0.0));
        self.time = (self.time + step).min(duration.max(0.0));
        if self.time >= duration {
            self.playing = false;
        }
        self.time
    }
}

/// Write the state at `t` into `graph`'s live values.
///
/// Live state is reset to rest, every driven property is evaluated from `timeline`, then
/// behaviors are applied.
pub fn sample_into(
    graph: &mut SceneGraph,
    timeline: &MainTimeline,
    behaviors: &BehaviorList,
    t: f64,
) -> ChoreoResult<()> {
    graph.reset_live();
    for property in timeline.properties() {
        if let Property::Node(id, _) = property
            && !graph.contains(*id)
        {
            continue;
        }
        let rest = graph.rest_value(property)?;
        let v = timeline.value_at(property, t, rest);
        graph.set_live(property, v)?;
    }
    behaviors.apply(graph, t)
}

/// Shape of the timeline for scrubber UIs.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineSummary {
    /// Start of every inserted sub-timeline, in insertion order.
    pub animation_start_times: Vec<f64>,
    /// Markers in registration order.
    pub markers: Vec<Marker>,
    /// Total duration.
    pub duration: f64,
}

impl TimelineSummary {
    /// Summarize `timeline`.
    pub fn of(timeline: &MainTimeline) -> Self {
        Self {
            animation_start_times: timeline.placements().iter().map(|p| p.start).collect(),
            markers: timeline.marker_list().to_vec(),
            duration: timeline.duration(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/playback.rs"]
mod tests;
