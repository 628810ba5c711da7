use std::collections::HashMap;

use crate::foundation::core::check_seconds;
use crate::foundation::error::{ChoreoError, ChoreoResult};
use crate::timeline::time_ref::TimeRef;

/// A named point on the main timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Marker {
    /// Unique name within one timeline.
    pub name: String,
    /// Absolute time in seconds.
    pub time: f64,
}

/// Registry of uniquely named markers, kept in registration order.
#[derive(Clone, Debug, Default)]
pub struct MarkerRegistry {
    markers: Vec<Marker>,
    by_name: HashMap<String, usize>,
    /// Names that read as `label+offset`, keyed by that reading.
    by_reading: HashMap<(String, u64), usize>,
}

impl MarkerRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a marker at `time`, disambiguating `name` with a numeric suffix
    /// (`name`, `name2`, `name3`, ...) if it is already taken. Returns the final name.
    ///
    /// Names a time expression would read as something other than a marker (`2`, `<1`,
    /// `+=1`) are rejected.
    pub fn add(&mut self, name: &str, time: f64) -> ChoreoResult<String> {
        if name.trim().is_empty() {
            return Err(ChoreoError::validation("marker name must be non-empty"));
        }
        if !matches!(TimeRef::parse(name), Ok(TimeRef::NamedMarker { .. })) {
            return Err(ChoreoError::validation(format!(
                "marker name '{name}' reads as a time expression"
            )));
        }
        check_seconds("marker time", time)?;

        let mut unique = name.to_owned();
        let mut n = 2u32;
        while self.by_name.contains_key(&unique) {
            unique = format!("{name}{n}");
            n += 1;
        }

        let index = self.markers.len();
        if let Ok(TimeRef::NamedMarker { name: base, offset }) = TimeRef::parse(&unique)
            && (base != unique || offset != 0.0)
        {
            self.by_reading.entry((base, offset.to_bits())).or_insert(index);
        }
        self.by_name.insert(unique.clone(), index);
        self.markers.push(Marker {
            name: unique.clone(),
            time,
        });
        Ok(unique)
    }

    /// Time of a registered marker.
    pub fn lookup(&self, name: &str) -> ChoreoResult<f64> {
        self.by_name
            .get(name)
            .map(|&i| self.markers[i].time)
            .ok_or_else(|| ChoreoError::unresolved_label(name))
    }

    /// Time of the marker a `name+offset` expression refers to.
    ///
    /// A marker whose own name reads as `name+offset` (say `part-1`) wins over `name`
    /// shifted by `offset`.
    pub fn lookup_offset(&self, name: &str, offset: f64) -> ChoreoResult<f64> {
        if let Some(&i) = self.by_reading.get(&(name.to_owned(), offset.to_bits())) {
            return Ok(self.markers[i].time);
        }
        Ok(self.lookup(name)? + offset)
    }

    /// Return `true` when a marker with exactly this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// All markers in registration order.
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Latest marker time, or `0` when empty.
    pub fn latest(&self) -> f64 {
        self.markers.iter().map(|m| m.time).fold(0.0, f64::max)
    }

    /// Number of registered markers.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Return `true` when no markers are registered.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/markers.rs"]
mod tests;
