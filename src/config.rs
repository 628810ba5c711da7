use std::path::Path;

use crate::animation::ease::Ease;
use crate::foundation::core::check_seconds;
use crate::foundation::error::{ChoreoError, ChoreoResult};

/// Engine-wide defaults applied to every script run.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineOptions {
    /// Duration of an animation call that does not specify one.
    pub default_duration: f64,
    /// Easing of an animation call that does not specify one.
    pub default_ease: Ease,
    /// Frames per second used by export.
    pub fps: u32,
    /// Largest step a single `advance` call may take.
    pub max_frame_step: f64,
    /// Skip re-sampling frames whose fingerprint matches the previous frame.
    pub static_frame_elision: bool,
    /// Base name for markers registered without a name.
    pub marker_default_name: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            default_duration: 0.5,
            default_ease: Ease::InOutQuad,
            fps: 30,
            max_frame_step: 0.25,
            static_frame_elision: false,
            marker_default_name: "m".to_owned(),
        }
    }
}

impl EngineOptions {
    /// Copy of `self` with every field present in `patch` replaced.
    pub fn merged_with(&self, patch: &OptionsPatch) -> Self {
        Self {
            default_duration: patch.default_duration.unwrap_or(self.default_duration),
            default_ease: patch.default_ease.unwrap_or(self.default_ease),
            fps: patch.fps.unwrap_or(self.fps),
            max_frame_step: patch.max_frame_step.unwrap_or(self.max_frame_step),
            static_frame_elision: patch
                .static_frame_elision
                .unwrap_or(self.static_frame_elision),
            marker_default_name: patch
                .marker_default_name
                .clone()
                .unwrap_or_else(|| self.marker_default_name.clone()),
        }
    }

    /// Reject options no run could use.
    pub fn validate(&self) -> ChoreoResult<()> {
        check_seconds("defaultDuration", self.default_duration)?;
        if self.fps == 0 {
            return Err(ChoreoError::validation("fps must be > 0"));
        }
        if !(self.max_frame_step.is_finite() && self.max_frame_step > 0.0) {
            return Err(ChoreoError::validation("maxFrameStep must be finite and > 0"));
        }
        if self.marker_default_name.trim().is_empty() {
            return Err(ChoreoError::validation(
                "markerDefaultName must be non-empty",
            ));
        }
        Ok(())
    }

    /// Defaults overlaid with the options in a JSON file.
    pub fn from_json_file(path: &Path) -> ChoreoResult<Self> {
        let opts = Self::default().merged_with(&OptionsPatch::from_json_file(path)?);
        opts.validate()?;
        Ok(opts)
    }
}

/// Partial options: every present field overrides the base it is merged onto.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct OptionsPatch {
    /// See [`EngineOptions::default_duration`].
    pub default_duration: Option<f64>,
    /// See [`EngineOptions::default_ease`].
    pub default_ease: Option<Ease>,
    /// See [`EngineOptions::fps`].
    pub fps: Option<u32>,
    /// See [`EngineOptions::max_frame_step`].
    pub max_frame_step: Option<f64>,
    /// See [`EngineOptions::static_frame_elision`].
    pub static_frame_elision: Option<bool>,
    /// See [`EngineOptions::marker_default_name`].
    pub marker_default_name: Option<String>,
}

impl OptionsPatch {
    /// Read a patch from a JSON file.
    pub fn from_json_file(path: &Path) -> ChoreoResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ChoreoError::Other(anyhow::Error::new(e).context(format!(
                "read options file '{}'",
                path.display()
            )))
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    /// `other` layered on top of `self`.
    pub fn then(&self, other: &OptionsPatch) -> OptionsPatch {
        OptionsPatch {
            default_duration: other.default_duration.or(self.default_duration),
            default_ease: other.default_ease.or(self.default_ease),
            fps: other.fps.or(self.fps),
            max_frame_step: other.max_frame_step.or(self.max_frame_step),
            static_frame_elision: other.static_frame_elision.or(self.static_frame_elision),
            marker_default_name: other
                .marker_default_name
                .clone()
                .or_else(|| self.marker_default_name.clone()),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
