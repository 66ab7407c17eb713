//! Curl vector fields built on [`NoiseField`].
//!
//! Particles are advected by a 3D vector field derived from scalar noise.
//! Two flavours are available, selected by [`NoiseType`]:
//!
//! | Type | Construction | Divergence |
//! |------|--------------|------------|
//! | [`NoiseType::ApproximateCurl`] | central differences of one field, each output axis sampled in its own offset region | approximately zero |
//! | [`NoiseType::TrueCurl`] | `∇φ × ∇ψ` over two independent fields | zero up to differencing error |
//!
//! The approximate variant has slow pockets where particles stall, which is
//! what the velocity-based extinction methods feed on. The true curl keeps
//! particles moving and pairs better with age or distance extinction.
//!
//! # Example
//!
//! ```ignore
//! let sampler = CurlSampler::new(NoiseType::ApproximateCurl, 42.0, DVec3::new(100.0, 0.0, -50.0));
//! let v = sampler.curl(0.1, 0.2, 0.3);
//! ```

use crate::error::ConfigError;
use crate::noise::{fold_seed, NoiseField};
use glam::{DVec3, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Finite-difference step used for every partial derivative.
pub const CURL_EPSILON: f64 = 1e-4;

/// Bits flipped in the folded seed to derive the second true-curl channel.
const SECONDARY_SEED_MASK: i32 = 0x5a5a;

/// Which vector field drives the particles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoiseType {
    /// Cheap curl approximation with stalling regions.
    #[default]
    #[serde(rename = "APPROXIMATE_CURL")]
    ApproximateCurl,
    /// Divergence-free field from two noise channels.
    #[serde(rename = "TRUE_CURL")]
    TrueCurl,
}

impl NoiseType {
    /// Name used in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            NoiseType::ApproximateCurl => "APPROXIMATE_CURL",
            NoiseType::TrueCurl => "TRUE_CURL",
        }
    }

    pub fn variants() -> &'static [&'static str] {
        &["APPROXIMATE_CURL", "TRUE_CURL"]
    }
}

impl fmt::Display for NoiseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NoiseType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "APPROXIMATE_CURL" => Ok(NoiseType::ApproximateCurl),
            "TRUE_CURL" => Ok(NoiseType::TrueCurl),
            other => Err(ConfigError::UnknownNoiseType(other.to_string())),
        }
    }
}

#[derive(Clone, Debug)]
enum Channels {
    Approximate(NoiseField),
    True { phi: NoiseField, psi: NoiseField },
}

/// Samples a curl field at particle positions.
///
/// Holds the noise tables plus the per-axis offsets that decorrelate the
/// three velocity components. The offsets move the noise query point only,
/// never the particle.
#[derive(Clone, Debug)]
pub struct CurlSampler {
    channels: Channels,
    offset: DVec3,
    scale: f64,
    flat: bool,
}

impl CurlSampler {
    /// Create a sampler with unit noise scale.
    pub fn new(noise_type: NoiseType, seed: f64, offset: DVec3) -> Self {
        let channels = match noise_type {
            NoiseType::ApproximateCurl => Channels::Approximate(NoiseField::new(seed)),
            NoiseType::TrueCurl => {
                let folded = fold_seed(seed);
                Channels::True {
                    phi: NoiseField::from_folded(folded),
                    psi: NoiseField::from_folded(folded ^ SECONDARY_SEED_MASK),
                }
            }
        };

        Self {
            channels,
            offset,
            scale: 1.0,
            flat: false,
        }
    }

    /// Multiply particle positions by `scale` before sampling.
    ///
    /// Smaller values give larger flow structures.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Sample the z coordinate from x, collapsing the field into sheets.
    pub fn with_flat(mut self, flat: bool) -> Self {
        self.flat = flat;
        self
    }

    pub fn noise_type(&self) -> NoiseType {
        match self.channels {
            Channels::Approximate(_) => NoiseType::ApproximateCurl,
            Channels::True { .. } => NoiseType::TrueCurl,
        }
    }

    pub fn offset(&self) -> DVec3 {
        self.offset
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// The primary scalar field.
    pub fn noise(&self) -> &NoiseField {
        match &self.channels {
            Channels::Approximate(noise) => noise,
            Channels::True { phi, .. } => phi,
        }
    }

    /// Field value at a particle position, in particle space.
    ///
    /// Applies the noise scale and flat mode, then narrows to `f32`.
    pub fn sample(&self, position: Vec3) -> Vec3 {
        let p = position.as_dvec3() * self.scale;
        let z = if self.flat { p.x } else { p.z };
        self.curl(p.x, p.y, z).as_vec3()
    }

    /// Field value at a point in noise space.
    pub fn curl(&self, x: f64, y: f64, z: f64) -> DVec3 {
        match &self.channels {
            Channels::Approximate(noise) => approximate_curl(noise, self.offset, x, y, z),
            Channels::True { phi, psi } => {
                let a = gradient(phi, x, y, z);
                let b = gradient(psi, x + self.offset.x, y + self.offset.y, z + self.offset.z);
                a.cross(b)
            }
        }
    }
}

/// Finite-difference curl with each component read from its own offset region.
fn approximate_curl(noise: &NoiseField, offset: DVec3, x: f64, y: f64, z: f64) -> DVec3 {
    let eps = CURL_EPSILON;
    let inv = 1.0 / (2.0 * eps);

    // x: rates of change along y and z, sampled at the x offset
    let ox = x + offset.x;
    let a = (noise.sample(ox, y + eps, z) - noise.sample(ox, y - eps, z)) * inv;
    let b = (noise.sample(ox, y, z + eps) - noise.sample(ox, y, z - eps)) * inv;
    let cx = a - b;

    // y: rates of change along z and x, sampled at the y offset
    let oy = y + offset.y;
    let a = (noise.sample(x, oy, z + eps) - noise.sample(x, oy, z - eps)) * inv;
    let b = (noise.sample(x + eps, oy, z) - noise.sample(x - eps, oy, z)) * inv;
    let cy = a - b;

    // z: rates of change along x and y, sampled at the z offset
    let oz = z + offset.z;
    let a = (noise.sample(x + eps, y, oz) - noise.sample(x - eps, y, oz)) * inv;
    let b = (noise.sample(x, y + eps, oz) - noise.sample(x, y - eps, oz)) * inv;
    let cz = a - b;

    DVec3::new(cx, cy, cz)
}

/// Central-difference gradient of a scalar field.
fn gradient(noise: &NoiseField, x: f64, y: f64, z: f64) -> DVec3 {
    let eps = CURL_EPSILON;
    let inv = 1.0 / (2.0 * eps);
    DVec3::new(
        (noise.sample(x + eps, y, z) - noise.sample(x - eps, y, z)) * inv,
        (noise.sample(x, y + eps, z) - noise.sample(x, y - eps, z)) * inv,
        (noise.sample(x, y, z + eps) - noise.sample(x, y, z - eps)) * inv,
    )
}
