use xxhash_rust::xxh3::Xxh3;

use crate::foundation::core::{Rgba, Transform, Vec3};
use crate::session::sample::SceneSample;

const XXH3_SEED: u64 = 0x5c3e_91a7_d04b_f26d;

/// 128-bit fingerprint of a sampled scene, ignoring the timeline position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SampleFingerprint {
    /// High 64 bits.
    pub hi: u64,
    /// Low 64 bits.
    pub lo: u64,
}

/// Fingerprint every node and material value of `sample`.
///
/// Two samples that would draw identically hash identically; `time` is not hashed.
pub fn fingerprint_sample(sample: &SceneSample) -> SampleFingerprint {
    let mut h = StableHasher::new();
    h.write_u32(sample.nodes.len() as u32);
    for n in &sample.nodes {
        h.write_u64(n.id.0);
        h.write_bool(n.visible);
        write_transform(&mut h, &n.transform);
        h.write_f32(n.clip_reveal);
    }
    h.write_u32(sample.materials.len() as u32);
    for m in &sample.materials {
        h.write_u32(m.id.0);
        write_color(&mut h, m.color);
        h.write_f32(m.opacity);
    }
    h.finish()
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_f32(&mut self, v: f32) {
        self.write_u32(v.to_bits());
    }

    fn write_vec3(&mut self, v: Vec3) {
        self.write_f32(v.x);
        self.write_f32(v.y);
        self.write_f32(v.z);
    }

    fn finish(self) -> SampleFingerprint {
        let v = self.inner.digest128();
        SampleFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

fn write_transform(h: &mut StableHasher, t: &Transform) {
    h.write_vec3(t.position);
    h.write_vec3(t.rotation);
    h.write_vec3(t.scale);
    match t.uniform_scale {
        Some(s) => {
            h.write_u8(1);
            h.write_f32(s);
        }
        None => h.write_u8(0),
    }
}

fn write_color(h: &mut StableHasher, c: Rgba) {
    h.write_f32(c.r);
    h.write_f32(c.g);
    h.write_f32(c.b);
    h.write_f32(c.a);
}

#[cfg(test)]
#[path = "../../tests/unit/export/fingerprint.rs"]
mod tests;
