use std::collections::BTreeMap;

use crate::animation::sub_timeline::SubTimeline;
use crate::animation::tween::{PlacedTrack, Property};
use crate::foundation::core::check_seconds;
use crate::foundation::error::{ChoreoError, ChoreoResult};
use crate::timeline::markers::{Marker, MarkerRegistry};
use crate::timeline::resolve::{ResolveContext, resolve};
use crate::timeline::time_ref::TimeRef;

/// Extent of one inserted sub-timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Placement {
    /// Sub-timeline label.
    pub label: String,
    /// Absolute start.
    pub start: f64,
    /// Absolute end (`start + intrinsic duration`).
    pub end: f64,
    /// Number of tracks placed.
    pub tracks: usize,
}

/// The single shared timeline of one script run.
///
/// Tracks are indexed per property and kept sorted by `(start, seq)`, so the value of a
/// property at `t` is decided by the latest-starting track at or before `t`, with later
/// insertions winning ties.
#[derive(Clone, Debug, Default)]
pub struct MainTimeline {
    index: BTreeMap<Property, Vec<PlacedTrack>>,
    placements: Vec<Placement>,
    markers: MarkerRegistry,
    duration: f64,
    next_seq: u64,
}

impl MainTimeline {
    /// Empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total duration: latest end over all placements and markers.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Append cursor (`>`-style "after everything so far").
    pub fn cursor(&self) -> f64 {
        self.duration
    }

    /// Most recent placement, if any.
    pub fn previous(&self) -> Option<&Placement> {
        self.placements.last()
    }

    /// All placements in insertion order.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Marker registry.
    pub fn markers(&self) -> &MarkerRegistry {
        &self.markers
    }

    /// Context used to resolve the next time reference.
    pub fn resolve_context(&self) -> ResolveContext<'_> {
        let (prev_start, prev_end) = self
            .previous()
            .map(|p| (p.start, p.end))
            .unwrap_or((0.0, 0.0));
        ResolveContext {
            prev_start,
            prev_end,
            cursor: self.cursor(),
            markers: &self.markers,
        }
    }

    /// Resolve `time` against the current bookkeeping.
    pub fn resolve(&self, time: &TimeRef) -> ChoreoResult<f64> {
        resolve(time, &self.resolve_context())
    }

    /// Register a marker; `at` defaults to the append cursor. Returns the unique name.
    pub fn add_marker(&mut self, name: &str, at: Option<&TimeRef>) -> ChoreoResult<String> {
        let time = match at {
            Some(t) => self.resolve(t)?,
            None => self.cursor(),
        };
        let name = self.markers.add(name, time)?;
        self.duration = self.duration.max(time);
        tracing::debug!(marker = %name, time, "marker registered");
        Ok(name)
    }

    /// All markers in registration order.
    pub fn marker_list(&self) -> &[Marker] {
        self.markers.markers()
    }

    /// Place `sub` so its local 0 lands on `start`.
    ///
    /// `rest` yields the resting value of a property (used when no earlier track drives
    /// it). Either every track is placed or, on error, none is.
    pub fn insert(
        &mut self,
        sub: &SubTimeline,
        start: f64,
        rest: impl Fn(&Property) -> ChoreoResult<f64>,
    ) -> ChoreoResult<Placement> {
        if !start.is_finite() || start < 0.0 {
            return Err(ChoreoError::invalid_time(format!(
                "cannot insert '{}' at {start}",
                sub.label
            )));
        }
        sub.validate()?;

        let mut staged: Vec<PlacedTrack> = Vec::with_capacity(sub.tracks.len());
        for track in &sub.tracks {
            let abs = start + track.offset;
            let rest_v = rest(&track.property)?;
            let current = self.value_with(&track.property, abs, rest_v, &staged);
            let from = track.from.resolve(current, rest_v);
            let to = track.to.resolve(current, rest_v);
            if !from.is_finite() || !to.is_finite() {
                return Err(ChoreoError::validation(format!(
                    "'{}' produced a non-finite value for {:?}",
                    sub.label, track.property
                )));
            }
            staged.push(PlacedTrack {
                property: track.property,
                start: abs,
                duration: check_seconds("track duration", track.duration)?,
                ease: track.ease,
                from,
                to,
                kind: track.kind,
                immediate_render: track.immediate_render,
                seq: self.next_seq + staged.len() as u64,
            });
        }

        let placement = Placement {
            label: sub.label.clone(),
            start,
            end: start + sub.duration(),
            tracks: staged.len(),
        };

        self.next_seq += staged.len() as u64;
        for placed in staged {
            let list = self.index.entry(placed.property).or_default();
            let at = list.partition_point(|p| p.start <= placed.start);
            list.insert(at, placed);
        }
        self.duration = self.duration.max(placement.end);
        self.placements.push(placement.clone());

        tracing::debug!(
            label = %placement.label,
            start = placement.start,
            end = placement.end,
            tracks = placement.tracks,
            "sub-timeline inserted"
        );
        Ok(placement)
    }

    /// Value of `property` at `t`, falling back to `rest` when no track applies.
    pub fn value_at(&self, property: &Property, t: f64, rest: f64) -> f64 {
        self.value_with(property, t, rest, &[])
    }

    /// Every property driven by at least one track.
    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.index.keys()
    }

    /// Tracks placed on `property`, sorted by start.
    pub fn tracks_for(&self, property: &Property) -> &[PlacedTrack] {
        self.index.get(property).map(Vec::as_slice).unwrap_or(&[])
    }

    fn value_with(&self, property: &Property, t: f64, rest: f64, staged: &[PlacedTrack]) -> f64 {
        let placed = self.tracks_for(property);
        let staged = staged.iter().filter(|p| p.property == *property);

        let key = |p: &PlacedTrack| (p.start, p.seq);
        let later = |a: (f64, u64), b: (f64, u64)| a.0 > b.0 || (a.0 == b.0 && a.1 > b.1);

        let mut active: Option<&PlacedTrack> = {
            let idx = placed.partition_point(|p| p.start <= t);
            idx.checked_sub(1).map(|i| &placed[i])
        };
        let mut earliest: Option<&PlacedTrack> = placed.first();

        for s in staged {
            if s.start <= t && active.is_none_or(|a| later(key(s), key(a))) {
                active = Some(s);
            }
            if earliest.is_none_or(|e| later(key(e), key(s))) {
                earliest = Some(s);
            }
        }

        match (active, earliest) {
            (Some(a), _) => a.value_at(t),
            (None, Some(e)) if e.immediate_render => e.from,
            _ => rest,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/main_timeline.rs"]
mod tests;
