use smallvec::SmallVec;

use crate::animation::tween::Track;
use crate::foundation::core::check_seconds;
use crate::foundation::error::ChoreoResult;

/// Bundle of tracks produced by one animation call, anchored at local time 0.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SubTimeline {
    /// Label used in logs and summaries (`fadeIn`, `move`, ...).
    pub label: String,
    /// Tracks in insertion order. Later tracks win ties on the same property.
    pub tracks: SmallVec<[Track; 4]>,
    /// Minimum duration regardless of tracks (used by `wait`).
    pub hold: f64,
}

impl SubTimeline {
    /// Empty sub-timeline with a label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            tracks: SmallVec::new(),
            hold: 0.0,
        }
    }

    /// Empty sub-timeline that still occupies `secs`.
    pub fn hold(label: impl Into<String>, secs: f64) -> Self {
        Self {
            hold: secs,
            ..Self::new(label)
        }
    }

    /// Add a track at its own offset (parallel with everything already present).
    pub fn push(&mut self, track: Track) -> &mut Self {
        self.tracks.push(track);
        self
    }

    /// Add a track at an explicit local offset.
    pub fn push_at(&mut self, offset: f64, track: Track) -> &mut Self {
        self.tracks.push(track.at(offset));
        self
    }

    /// Merge another sub-timeline so its local 0 lands on `offset`.
    pub fn merge(&mut self, other: SubTimeline, offset: f64) -> &mut Self {
        self.hold = self.hold.max(offset + other.hold);
        for t in other.tracks {
            let local = t.offset;
            self.tracks.push(t.at(offset + local));
        }
        self
    }

    /// Append another sub-timeline after everything currently present.
    pub fn then(&mut self, other: SubTimeline) -> &mut Self {
        let at = self.duration();
        self.merge(other, at)
    }

    /// Intrinsic duration: max over all tracks' local end, or `hold`.
    pub fn duration(&self) -> f64 {
        self.tracks.iter().map(Track::end).fold(self.hold, f64::max)
    }

    /// Return `true` when nothing would be placed.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Reject non-finite or negative offsets and durations.
    pub fn validate(&self) -> ChoreoResult<()> {
        check_seconds("sub-timeline hold", self.hold)?;
        for t in &self.tracks {
            check_seconds("track offset", t.offset)?;
            check_seconds("track duration", t.duration)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/sub_timeline.rs"]
mod tests;
