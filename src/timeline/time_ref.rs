use crate::foundation::error::{ChoreoError, ChoreoResult};

/// Where on the main timeline a sub-timeline (or marker) should be placed.
///
/// Parsed from the symbolic forms scripts use:
///
/// | text            | variant                         |
/// |-----------------|---------------------------------|
/// | `2.5`           | `Absolute(2.5)`                 |
/// | omitted / `""`  | `RelativeToCursor(0.0)`         |
/// | `<` / `<0.5`    | `RelativeToPrevStart(0.5)`      |
/// | `>` / `>-0.2`   | `RelativeToPrevEnd(-0.2)`       |
/// | `+=1` / `-=1`   | `RelativeToCursor(±1.0)`        |
/// | `intro+0.5`     | `NamedMarker("intro", 0.5)`     |
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawTimeRef", into = "RawTimeRef")]
pub enum TimeRef {
    /// Absolute seconds.
    Absolute(f64),
    /// Offset from the start of the previous insertion.
    RelativeToPrevStart(f64),
    /// Offset from the end of the previous insertion.
    RelativeToPrevEnd(f64),
    /// Offset from the append cursor (end of everything placed so far).
    RelativeToCursor(f64),
    /// Offset from a registered marker.
    NamedMarker {
        /// Marker name.
        name: String,
        /// Offset in seconds.
        offset: f64,
    },
}

impl Default for TimeRef {
    fn default() -> Self {
        Self::RelativeToCursor(0.0)
    }
}

impl From<f64> for TimeRef {
    fn from(secs: f64) -> Self {
        Self::Absolute(secs)
    }
}

impl TimeRef {
    /// Parse a time expression.
    pub fn parse(text: &str) -> ChoreoResult<Self> {
        let s = text.trim();
        if s.is_empty() {
            return Ok(Self::default());
        }
        if let Ok(v) = s.parse::<f64>() {
            return finite(text, v).map(Self::Absolute);
        }
        if let Some(rest) = s.strip_prefix("+=") {
            return parse_offset(text, rest).map(Self::RelativeToCursor);
        }
        if let Some(rest) = s.strip_prefix("-=") {
            return parse_offset(text, rest).map(|v| Self::RelativeToCursor(-v));
        }
        if let Some(rest) = s.strip_prefix('<') {
            return parse_signed_or_zero(text, rest).map(Self::RelativeToPrevStart);
        }
        if let Some(rest) = s.strip_prefix('>') {
            return parse_signed_or_zero(text, rest).map(Self::RelativeToPrevEnd);
        }

        // `label+0.5` / `label-1`: split at the last sign whose suffix is a number.
        for (idx, ch) in s.char_indices().rev() {
            if idx == 0 || (ch != '+' && ch != '-') {
                continue;
            }
            let (name, suffix) = s.split_at(idx);
            if let Ok(offset) = suffix.parse::<f64>() {
                let name = name.trim();
                if name.is_empty() {
                    break;
                }
                return finite(text, offset).map(|offset| Self::NamedMarker {
                    name: name.to_owned(),
                    offset,
                });
            }
        }
        Ok(Self::NamedMarker {
            name: s.to_owned(),
            offset: 0.0,
        })
    }

    /// Shorthand for `RelativeToPrevStart`.
    pub fn with_prev(offset: f64) -> Self {
        Self::RelativeToPrevStart(offset)
    }

    /// Shorthand for `RelativeToPrevEnd`.
    pub fn after_prev(offset: f64) -> Self {
        Self::RelativeToPrevEnd(offset)
    }

    /// Shorthand for `NamedMarker`.
    pub fn marker(name: impl Into<String>, offset: f64) -> Self {
        Self::NamedMarker {
            name: name.into(),
            offset,
        }
    }
}

impl std::fmt::Display for TimeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn signed(f: &mut std::fmt::Formatter<'_>, v: f64) -> std::fmt::Result {
            if v == 0.0 {
                Ok(())
            } else if v > 0.0 {
                write!(f, "+{v}")
            } else {
                write!(f, "{v}")
            }
        }

        match self {
            Self::Absolute(v) => write!(f, "{v}"),
            Self::RelativeToPrevStart(v) => {
                f.write_str("<")?;
                signed(f, *v)
            }
            Self::RelativeToPrevEnd(v) => {
                f.write_str(">")?;
                signed(f, *v)
            }
            Self::RelativeToCursor(v) if *v < 0.0 => write!(f, "-={}", -v),
            Self::RelativeToCursor(v) => write!(f, "+={v}"),
            Self::NamedMarker { name, offset } => {
                f.write_str(name)?;
                signed(f, *offset)
            }
        }
    }
}

impl std::str::FromStr for TimeRef {
    type Err = ChoreoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Wire form: JSON numbers are absolute seconds, strings are time expressions.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum RawTimeRef {
    /// Absolute seconds.
    Seconds(f64),
    /// Symbolic expression.
    Expr(String),
}

impl TryFrom<RawTimeRef> for TimeRef {
    type Error = ChoreoError;

    fn try_from(raw: RawTimeRef) -> Result<Self, Self::Error> {
        match raw {
            RawTimeRef::Seconds(v) => finite("time", v).map(Self::Absolute),
            RawTimeRef::Expr(s) => Self::parse(&s),
        }
    }
}

impl From<TimeRef> for RawTimeRef {
    fn from(t: TimeRef) -> Self {
        match t {
            TimeRef::Absolute(v) => Self::Seconds(v),
            other => Self::Expr(other.to_string()),
        }
    }
}

fn finite(text: &str, v: f64) -> ChoreoResult<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(ChoreoError::validation(format!(
            "time expression '{text}' is not finite"
        )))
    }
}

fn parse_offset(text: &str, rest: &str) -> ChoreoResult<f64> {
    let rest = rest.trim();
    rest.parse::<f64>()
        .map_err(|_| ChoreoError::validation(format!("malformed time expression '{text}'")))
        .and_then(|v| finite(text, v))
}

fn parse_signed_or_zero(text: &str, rest: &str) -> ChoreoResult<f64> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Ok(0.0);
    }
    parse_offset(text, rest)
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/time_ref.rs"]
mod tests;
