use crate::foundation::error::{ChoreoError, ChoreoResult};
use crate::timeline::markers::MarkerRegistry;
use crate::timeline::time_ref::TimeRef;

/// Inputs a time reference is resolved against, captured at insertion time.
#[derive(Clone, Copy, Debug)]
pub struct ResolveContext<'a> {
    /// Start of the most recent insertion (`0` before any insertion).
    pub prev_start: f64,
    /// End of the most recent insertion (`0` before any insertion).
    pub prev_end: f64,
    /// Append cursor: end of everything placed so far.
    pub cursor: f64,
    /// Registered markers.
    pub markers: &'a MarkerRegistry,
}

/// Convert a time reference into an absolute main-timeline position.
pub fn resolve(time: &TimeRef, ctx: &ResolveContext<'_>) -> ChoreoResult<f64> {
    let t = match time {
        TimeRef::Absolute(v) => *v,
        TimeRef::RelativeToPrevStart(off) => ctx.prev_start + off,
        TimeRef::RelativeToPrevEnd(off) => ctx.prev_end + off,
        TimeRef::RelativeToCursor(off) => ctx.cursor + off,
        TimeRef::NamedMarker { name, offset } => ctx.markers.lookup_offset(name, *offset)?,
    };
    if !t.is_finite() || t < 0.0 {
        return Err(ChoreoError::invalid_time(format!(
            "'{time}' resolved to {t}"
        )));
    }
    Ok(t)
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/resolve.rs"]
mod tests;
