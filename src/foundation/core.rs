use crate::foundation::error::{ChoreoError, ChoreoResult};

pub use glam::{Affine3A, EulerRot, Quat, Vec3};

/// Local transform of a scene node.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform {
    /// Translation relative to the parent node.
    pub position: Vec3,
    /// Euler rotation in radians, applied in XYZ order.
    pub rotation: Vec3,
    /// Non-uniform scale.
    pub scale: Vec3,
    /// Optional uniform multiplier applied on top of `scale`.
    #[serde(default)]
    pub uniform_scale: Option<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            uniform_scale: None,
        }
    }
}

impl Transform {
    /// Scale after applying the optional uniform override.
    pub fn effective_scale(&self) -> Vec3 {
        match self.uniform_scale {
            Some(s) => self.scale * s,
            None => self.scale,
        }
    }

    /// Rotation as a quaternion.
    pub fn rotation_quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }

    /// Parent-relative affine matrix (scale, then rotate, then translate).
    pub fn to_affine(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(
            self.effective_scale(),
            self.rotation_quat(),
            self.position,
        )
    }

    /// Decompose an affine matrix back into a transform without uniform override.
    pub fn from_affine(m: Affine3A) -> Self {
        let (scale, rot, position) = m.to_scale_rotation_translation();
        let (x, y, z) = rot.to_euler(EulerRot::XYZ);
        Self {
            position,
            rotation: Vec3::new(x, y, z),
            scale,
            uniform_scale: None,
        }
    }
}

/// Straight-alpha color with `f32` channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rgba {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Rgba {
    /// Opaque white.
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    /// Build an opaque color.
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> ChoreoResult<Self> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| ChoreoError::validation(format!("color '{s}' must start with '#'")))?;
        let bad = || ChoreoError::validation(format!("invalid hex color '{s}'"));
        let digits: Vec<u8> = hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<_>>()
            .ok_or_else(bad)?;

        let channels: Vec<u8> = match digits.len() {
            3 => digits.iter().map(|d| d * 17).collect(),
            6 | 8 => digits.chunks(2).map(|p| p[0] * 16 + p[1]).collect(),
            _ => return Err(bad()),
        };
        let f = |v: u8| f32::from(v) / 255.0;
        Ok(Self {
            r: f(channels[0]),
            g: f(channels[1]),
            b: f(channels[2]),
            a: channels.get(3).copied().map(f).unwrap_or(1.0),
        })
    }
}

/// Deserialize a color from either `"#rrggbb"` text or an `{r, g, b, a?}` object.
pub(crate) fn deserialize_color<'de, D>(de: D) -> Result<Rgba, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize as _;
    use serde::de::Error as _;

    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Hex(String),
        Channels(Rgba),
    }

    match Raw::deserialize(de)? {
        Raw::Hex(s) => Rgba::from_hex(&s).map_err(D::Error::custom),
        Raw::Channels(c) => Ok(c),
    }
}

/// Optional variant of [`deserialize_color`].
pub(crate) fn deserialize_opt_color<'de, D>(de: D) -> Result<Option<Rgba>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(serde::Deserialize)]
    struct Wrap(#[serde(deserialize_with = "deserialize_color")] Rgba);

    Ok(<Option<Wrap> as serde::Deserialize>::deserialize(de)?.map(|w| w.0))
}

/// Deserialize an optional vector from `[x, y, z]`, `{x, y, z}` or a single number (splat).
pub(crate) fn deserialize_opt_vec3<'de, D>(de: D) -> Result<Option<Vec3>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Splat(f32),
        Arr([f32; 3]),
        Obj {
            #[serde(default)]
            x: f32,
            #[serde(default)]
            y: f32,
            #[serde(default)]
            z: f32,
        },
    }

    Ok(
        <Option<Repr> as serde::Deserialize>::deserialize(de)?.map(|r| match r {
            Repr::Splat(v) => Vec3::splat(v),
            Repr::Arr([x, y, z]) => Vec3::new(x, y, z),
            Repr::Obj { x, y, z } => Vec3::new(x, y, z),
        }),
    )
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Box spanning `min..max`.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box centered on the origin with the given half extents.
    pub fn centered(half: Vec3) -> Self {
        Self {
            min: -half,
            max: half,
        }
    }

    /// Center point.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Smallest box containing both inputs.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Bounds of this box after transforming its eight corners.
    pub fn transformed(&self, m: &Affine3A) -> Aabb {
        let mut out: Option<Aabb> = None;
        for i in 0..8u8 {
            let corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            let p = m.transform_point3(corner);
            let b = Aabb::new(p, p);
            out = Some(match out {
                Some(acc) => acc.union(&b),
                None => b,
            });
        }
        out.unwrap_or(*self)
    }
}

/// Validate that a time or duration in seconds is finite and non-negative.
pub(crate) fn check_seconds(what: &str, secs: f64) -> ChoreoResult<f64> {
    if !secs.is_finite() || secs < 0.0 {
        return Err(ChoreoError::validation(format!(
            "{what} must be finite and >= 0 (got {secs})"
        )));
    }
    Ok(secs)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
