//! Dense per-particle attribute buffers and the per-tick update.
//!
//! [`ParticleStore`] keeps one array per attribute, all indexed by particle
//! id `0..N`. The count is fixed at construction: "death" is an in-place
//! respawn, never a removal, so every index always holds a live particle.
//!
//! # Buffers
//!
//! | Attribute | Type | Flat view |
//! |-----------|------|-----------|
//! | position | `Vec3` | [`ParticleStore::position_data`] (3N floats) |
//! | velocity | `Vec3` | [`ParticleStore::velocity_data`] (3N floats) |
//! | color | `Vec4` (RGB + life fraction) | [`ParticleStore::color_data`] (4N floats) |
//! | speed | `f32` in `[0, 1)` | - |
//! | life | `f32` ticks remaining | - |
//! | age | `u32` ticks since spawn | - |
//!
//! The flat views are what a renderer uploads. They are stable between
//! ticks and rewritten by the next [`ParticleStore::step`].

use crate::curl::CurlSampler;
use crate::emitter::{Emitter, Spawned};
use crate::lifecycle::{ExtinctionProbe, Lifecycle};
use crate::palette::ColorMapper;
use crate::spawn::SpawnContext;
use glam::{Vec3, Vec4};

/// Speed bounds for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepParams {
    /// Step length for a particle whose speed factor is 0.
    pub min_speed: f32,
    /// Step length a speed factor of 1 approaches.
    pub max_speed: f32,
}

impl StepParams {
    /// Map a particle's speed factor onto `[min_speed, max_speed)`.
    #[inline]
    pub fn speed(&self, factor: f32) -> f32 {
        factor * (self.max_speed - self.min_speed) + self.min_speed
    }
}

/// Everything needed to place a replacement particle.
pub struct Respawn<'a> {
    pub emitter: &'a Emitter,
    pub colors: &'a ColorMapper,
    pub ctx: &'a mut SpawnContext,
}

/// Snapshot of a single particle, for inspection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub color: Vec4,
    pub speed: f32,
    pub life: f32,
    pub age: u32,
}

/// Struct-of-arrays storage for `N` particles.
#[derive(Clone, Debug)]
pub struct ParticleStore {
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    colors: Vec<Vec4>,
    speeds: Vec<f32>,
    life: Vec<f32>,
    age: Vec<u32>,
}

impl ParticleStore {
    /// Allocate `count` particles and spawn every one of them.
    pub fn spawn(count: usize, lifecycle: &Lifecycle, respawn: &mut Respawn<'_>) -> Self {
        let mut store = Self {
            positions: Vec::with_capacity(count),
            velocities: vec![Vec3::ZERO; count],
            colors: Vec::with_capacity(count),
            speeds: Vec::with_capacity(count),
            life: Vec::with_capacity(count),
            age: vec![0; count],
        };

        let span = lifecycle.life_span();
        for _ in 0..count {
            let s = respawn.emitter.emit(respawn.ctx, respawn.colors, &span);
            store.positions.push(s.position);
            store.colors.push(s.color);
            store.speeds.push(s.speed);
            store.life.push(s.life);
        }

        store
    }

    /// Number of particles. Never changes.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    // ========== Buffer access ==========

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    pub fn colors(&self) -> &[Vec4] {
        &self.colors
    }

    pub fn speeds(&self) -> &[f32] {
        &self.speeds
    }

    pub fn life(&self) -> &[f32] {
        &self.life
    }

    pub fn ages(&self) -> &[u32] {
        &self.age
    }

    /// Positions as `[x0, y0, z0, x1, ...]`.
    pub fn position_data(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Velocities as `[x0, y0, z0, x1, ...]`.
    pub fn velocity_data(&self) -> &[f32] {
        bytemuck::cast_slice(&self.velocities)
    }

    /// Colors as `[r0, g0, b0, a0, r1, ...]`.
    pub fn color_data(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Copy out one particle.
    pub fn particle(&self, index: usize) -> Option<Particle> {
        if index >= self.len() {
            return None;
        }
        Some(Particle {
            position: self.positions[index],
            velocity: self.velocities[index],
            color: self.colors[index],
            speed: self.speeds[index],
            life: self.life[index],
            age: self.age[index],
        })
    }

    // ========== Simulation ==========

    /// Advance every particle by one tick.
    ///
    /// For each particle: burn one tick of life, sample the field at the
    /// current position scaled by the particle's speed, then either respawn
    /// it (velocity keeps the step that killed it) or move it by that step.
    ///
    /// Returns how many particles were respawned.
    pub fn step(
        &mut self,
        params: &StepParams,
        field: &CurlSampler,
        lifecycle: &Lifecycle,
        respawn: &mut Respawn<'_>,
    ) -> usize {
        let fades = lifecycle.method().fades();
        let span = lifecycle.life_span();
        let mut respawned = 0;

        for i in 0..self.len() {
            self.life[i] -= 1.0;
            self.age[i] = self.age[i].saturating_add(1);

            let position = self.positions[i];
            let velocity = field.sample(position) * params.speed(self.speeds[i]);
            self.velocities[i] = velocity;

            let probe = ExtinctionProbe {
                position,
                velocity,
                life: self.life[i],
            };

            if lifecycle.is_extinct(&probe) {
                let spawned = respawn.emitter.emit(respawn.ctx, respawn.colors, &span);
                self.place(i, spawned);
                respawned += 1;
            } else {
                self.positions[i] = position + velocity;
                if fades {
                    self.colors[i].w = life_fraction(self.life[i], self.age[i]);
                }
            }
        }

        respawned
    }

    /// Overwrite every attribute except velocity.
    fn place(&mut self, index: usize, spawned: Spawned) {
        self.positions[index] = spawned.position;
        self.colors[index] = spawned.color;
        self.speeds[index] = spawned.speed;
        self.life[index] = spawned.life;
        self.age[index] = 0;
    }
}

/// Remaining share of the life a particle spawned with.
fn life_fraction(life: f32, age: u32) -> f32 {
    let initial = life + age as f32;
    if initial <= 0.0 {
        return 0.0;
    }
    (life / initial).clamp(0.0, 1.0)
}
