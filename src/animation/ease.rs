use crate::foundation::error::{ChoreoError, ChoreoResult};

/// Easing functions used to map normalized animation progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    /// Linear interpolation.
    #[serde(alias = "linear", alias = "none")]
    Linear,
    /// Quadratic ease-in.
    #[serde(alias = "inQuad", alias = "power1.in")]
    InQuad,
    /// Quadratic ease-out.
    #[serde(alias = "outQuad", alias = "power1.out")]
    OutQuad,
    /// Quadratic ease-in/out.
    #[serde(alias = "inOutQuad", alias = "power1.inOut")]
    InOutQuad,
    /// Cubic ease-in.
    #[serde(alias = "inCubic", alias = "power2.in")]
    InCubic,
    /// Cubic ease-out.
    #[serde(alias = "outCubic", alias = "power2.out")]
    OutCubic,
    /// Cubic ease-in/out.
    #[serde(alias = "inOutCubic", alias = "power2.inOut")]
    InOutCubic,
    /// Sine ease-in.
    #[serde(alias = "inSine", alias = "sine.in")]
    InSine,
    /// Sine ease-out.
    #[serde(alias = "outSine", alias = "sine.out")]
    OutSine,
    /// Sine ease-in/out.
    #[serde(alias = "inOutSine", alias = "sine.inOut")]
    InOutSine,
    /// Overshoots the target slightly before settling.
    #[serde(alias = "outBack", alias = "back.out")]
    OutBack,
    /// Damped oscillation around the target.
    #[serde(alias = "outElastic", alias = "elastic.out")]
    OutElastic,
    /// Bounces against the target like a dropped ball.
    #[serde(alias = "outBounce", alias = "bounce.out")]
    OutBounce,
}

impl Ease {
    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        use std::f64::consts::PI;

        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::InSine => 1.0 - ((t * PI) / 2.0).cos(),
            Self::OutSine => ((t * PI) / 2.0).sin(),
            Self::InOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Self::OutBack => {
                const C1: f64 = 1.70158;
                const C3: f64 = C1 + 1.0;
                1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
            }
            Self::OutElastic => {
                if t == 0.0 || t == 1.0 {
                    t
                } else {
                    let c4 = (2.0 * PI) / 3.0;
                    2f64.powf(-10.0 * t) * ((t * 10.0 - 0.75) * c4).sin() + 1.0
                }
            }
            Self::OutBounce => {
                const N1: f64 = 7.5625;
                const D1: f64 = 2.75;
                if t < 1.0 / D1 {
                    N1 * t * t
                } else if t < 2.0 / D1 {
                    let t = t - 1.5 / D1;
                    N1 * t * t + 0.75
                } else if t < 2.5 / D1 {
                    let t = t - 2.25 / D1;
                    N1 * t * t + 0.9375
                } else {
                    let t = t - 2.625 / D1;
                    N1 * t * t + 0.984375
                }
            }
        }
    }

    /// Look up an easing function by any of its accepted names.
    pub fn from_name(name: &str) -> ChoreoResult<Self> {
        serde_json::from_value(serde_json::Value::String(name.to_owned()))
            .map_err(|_| ChoreoError::validation(format!("unknown easing function '{name}'")))
    }
}

impl std::str::FromStr for Ease {
    type Err = ChoreoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
