/// Convenience result type used across choreo.
pub type ChoreoResult<T> = Result<T, ChoreoError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum ChoreoError {
    /// A time reference names a marker that is not registered.
    #[error("unresolved label: {0}")]
    UnresolvedLabel(String),

    /// A time reference resolved to a negative or non-finite position.
    #[error("invalid time position: {0}")]
    InvalidTimePosition(String),

    /// A renderable collaborator failed to produce its content.
    #[error("asset load failure: {0}")]
    AssetLoadFailure(String),

    /// The symbol diff received inputs it cannot treat as name sequences.
    #[error("malformed diff input: {0}")]
    MalformedDiffInput(String),

    /// Invalid user-provided parameters or engine usage.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while parsing or binding a scene script.
    #[error("script error: {0}")]
    Script(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// A command resumed after its session was reset.
    #[error("command superseded: session epoch {epoch} is no longer current")]
    Superseded {
        /// Epoch the command was enqueued under.
        epoch: u64,
    },

    /// A queued command failed; the rest of its queue was discarded.
    #[error("command #{ordinal} ({label}) failed: {source}")]
    Command {
        /// Position of the failing command in enqueue order.
        ordinal: u64,
        /// Human-readable command label, e.g. `fadeIn node#3`.
        label: String,
        /// Underlying failure.
        #[source]
        source: Box<ChoreoError>,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ChoreoError {
    /// Build a [`ChoreoError::UnresolvedLabel`] value.
    pub fn unresolved_label(name: impl Into<String>) -> Self {
        Self::UnresolvedLabel(name.into())
    }

    /// Build a [`ChoreoError::InvalidTimePosition`] value.
    pub fn invalid_time(msg: impl Into<String>) -> Self {
        Self::InvalidTimePosition(msg.into())
    }

    /// Build a [`ChoreoError::AssetLoadFailure`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::AssetLoadFailure(msg.into())
    }

    /// Build a [`ChoreoError::MalformedDiffInput`] value.
    pub fn malformed_diff(msg: impl Into<String>) -> Self {
        Self::MalformedDiffInput(msg.into())
    }

    /// Build a [`ChoreoError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ChoreoError::Script`] value.
    pub fn script(msg: impl Into<String>) -> Self {
        Self::Script(msg.into())
    }

    /// Build a [`ChoreoError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Wrap a failure with the identity of the command that produced it.
    pub fn command(ordinal: u64, label: impl Into<String>, source: ChoreoError) -> Self {
        Self::Command {
            ordinal,
            label: label.into(),
            source: Box::new(source),
        }
    }

    /// Innermost error, looking through [`ChoreoError::Command`] wrappers.
    pub fn root(&self) -> &ChoreoError {
        match self {
            Self::Command { source, .. } => source.root(),
            other => other,
        }
    }

    /// Return `true` when this error only reports a reset session.
    pub fn is_superseded(&self) -> bool {
        matches!(self.root(), Self::Superseded { .. })
    }
}

impl From<serde_json::Error> for ChoreoError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
