//! Random sampling for particle spawning.
//!
//! [`SpawnContext`] owns the random source used whenever a particle is
//! created or respawned: positions inside the spawn sphere, the per-particle
//! speed factor and the life span draw.
//!
//! Unlike the noise field, spawn sampling carries no reproducibility
//! guarantee. Use [`SpawnContext::seeded`] when a test or benchmark needs a
//! repeatable sequence anyway.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// How points are distributed inside the spawn sphere.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SphereSampling {
    /// Uniform volumetric density.
    Uniform,
    /// Radius scaled by an extra uniform factor, piling points toward the center.
    #[default]
    Weighted,
}

impl SphereSampling {
    /// Pick the variant from the `useWeightedSphereSampling` flag.
    pub fn from_weighted(weighted: bool) -> Self {
        if weighted {
            SphereSampling::Weighted
        } else {
            SphereSampling::Uniform
        }
    }

    pub fn is_weighted(&self) -> bool {
        matches!(self, SphereSampling::Weighted)
    }
}

/// Random source with helpers for common spawn patterns.
///
/// ```ignore
/// let mut ctx = SpawnContext::new();
/// let position = ctx.sample_sphere(SphereSampling::Weighted, 0.5);
/// let speed = ctx.random();
/// ```
#[derive(Debug, Clone)]
pub struct SpawnContext {
    rng: SmallRng,
}

impl SpawnContext {
    /// Create a context seeded from system entropy.
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Create a context with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    // ========== Random primitives ==========

    /// Random f32 in `[0, 1)`.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in `[min, max]`. Returns `min` when the bounds are equal.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    // ========== Position helpers ==========

    /// Random point inside the unit ball by rejection from `[-1, 1]³`.
    pub fn random_in_unit_ball(&mut self) -> Vec3 {
        loop {
            let p = Vec3::new(
                self.rng.gen_range(-1.0..=1.0),
                self.rng.gen_range(-1.0..=1.0),
                self.rng.gen_range(-1.0..=1.0),
            );
            if p.length_squared() <= 1.0 {
                return p;
            }
        }
    }

    /// Uniformly distributed point within `diameter` of the origin.
    pub fn random_in_sphere(&mut self, diameter: f32) -> Vec3 {
        self.random_in_unit_ball() * diameter
    }

    /// Center-weighted point within `diameter` of the origin.
    ///
    /// The accepted unit-ball point is shrunk by an independent uniform
    /// factor, so small radii are over-represented.
    pub fn random_in_sphere_weighted(&mut self, diameter: f32) -> Vec3 {
        let p = self.random_in_unit_ball();
        p * (self.random() * diameter)
    }

    /// Sample a spawn position using `mode`.
    pub fn sample_sphere(&mut self, mode: SphereSampling, diameter: f32) -> Vec3 {
        match mode {
            SphereSampling::Uniform => self.random_in_sphere(diameter),
            SphereSampling::Weighted => self.random_in_sphere_weighted(diameter),
        }
    }
}

impl Default for SpawnContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_ball_bounds() {
        let mut ctx = SpawnContext::seeded(1);
        for _ in 0..1000 {
            assert!(ctx.random_in_unit_ball().length_squared() <= 1.0);
        }
    }

    #[test]
    fn test_random_in_sphere_bounds() {
        let mut ctx = SpawnContext::seeded(2);
        for mode in [SphereSampling::Uniform, SphereSampling::Weighted] {
            for _ in 0..1000 {
                let pos = ctx.sample_sphere(mode, 0.5);
                assert!(pos.length() <= 0.5 + 0.001);
            }
        }
    }

    #[test]
    fn test_random_range_degenerate() {
        let mut ctx = SpawnContext::seeded(3);
        assert_eq!(ctx.random_range(100.0, 100.0), 100.0);
        let v = ctx.random_range(1.0, 2.0);
        assert!((1.0..=2.0).contains(&v));
    }

    #[test]
    fn test_seeded_is_repeatable() {
        let mut a = SpawnContext::seeded(9);
        let mut b = SpawnContext::seeded(9);
        for _ in 0..10 {
            assert_eq!(a.random_in_unit_ball(), b.random_in_unit_ball());
        }
    }

    #[test]
    fn test_sampling_flag() {
        assert_eq!(SphereSampling::from_weighted(true), SphereSampling::Weighted);
        assert!(!SphereSampling::from_weighted(false).is_weighted());
    }
}
