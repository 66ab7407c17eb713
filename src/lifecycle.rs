//! Particle lifecycle: extinction policies and life spans.
//!
//! Particles never leave the store. Each tick the active [`Extinction`]
//! policy decides whether a particle is respawned in place or keeps moving.
//!
//! # Extinction Methods
//!
//! | Method | Extinct when |
//! |--------|--------------|
//! | [`Extinction::Age`] | `life <= 0` |
//! | [`Extinction::MinVelocity`] | `|v| < v_min` |
//! | [`Extinction::MinVelocityPerAxis`] | `|vx|`, `|vy|` and `|vz|` all below `v_min` |
//! | [`Extinction::MinSoftVelocityPerAxis`] | `vx`, `vy` and `vz` all below `v_min` (signed) |
//! | [`Extinction::DistanceFromCenter`] | `|p| > extinction_distance` |
//!
//! The soft per-axis test compares signed components, so any particle moving
//! toward negative x, y and z at once is culled. It biases the swarm toward
//! positive directions and is kept as its own method for that look.
//!
//! # Quick Start
//!
//! ```ignore
//! let lifecycle = Lifecycle::new()
//!     .extinction(Extinction::Age)
//!     .lifetime_range(200.0, 800.0);
//! ```

use crate::error::ConfigError;
use crate::spawn::SpawnContext;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Per-particle values an extinction test may read.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExtinctionProbe {
    pub position: Vec3,
    /// Step vector computed this tick.
    pub velocity: Vec3,
    /// Remaining life after this tick's decrement.
    pub life: f32,
}

/// Thresholds shared by every particle during a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    pub v_min: f32,
    pub extinction_distance: f32,
}

/// A bound extinction predicate.
pub type ExtinctionFn = fn(&ExtinctionProbe, &Thresholds) -> bool;

/// Policy deciding when a particle is respawned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Extinction {
    /// Respawn when the life counter runs out.
    Age,
    /// Respawn when the step length falls below `v_min`.
    MinVelocity,
    /// Respawn when every axis of the step is below `v_min` in magnitude.
    MinVelocityPerAxis,
    /// Respawn when every signed axis of the step is below `v_min`.
    #[default]
    MinSoftVelocityPerAxis,
    /// Respawn when the particle leaves the extinction sphere.
    DistanceFromCenter,
}

impl Extinction {
    /// The pure predicate implementing this policy.
    pub fn predicate(self) -> ExtinctionFn {
        match self {
            Extinction::Age => out_of_life,
            Extinction::MinVelocity => below_min_speed,
            Extinction::MinVelocityPerAxis => below_min_per_axis,
            Extinction::MinSoftVelocityPerAxis => below_min_per_axis_signed,
            Extinction::DistanceFromCenter => beyond_distance,
        }
    }

    /// Evaluate this policy once.
    pub fn is_extinct(self, probe: &ExtinctionProbe, thresholds: &Thresholds) -> bool {
        (self.predicate())(probe, thresholds)
    }

    /// Whether the color alpha tracks the remaining life fraction.
    pub fn fades(self) -> bool {
        matches!(self, Extinction::Age)
    }

    /// Name used in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            Extinction::Age => "AGE",
            Extinction::MinVelocity => "MIN_VELOCITY",
            Extinction::MinVelocityPerAxis => "MIN_VELOCITY_PER_AXIS",
            Extinction::MinSoftVelocityPerAxis => "MIN_SOFT_VELOCITY_PER_AXIS",
            Extinction::DistanceFromCenter => "DISTANCE_FROM_CENTER",
        }
    }

    pub fn all() -> &'static [Extinction] {
        &[
            Extinction::Age,
            Extinction::MinVelocity,
            Extinction::MinVelocityPerAxis,
            Extinction::MinSoftVelocityPerAxis,
            Extinction::DistanceFromCenter,
        ]
    }
}

fn out_of_life(p: &ExtinctionProbe, _: &Thresholds) -> bool {
    p.life <= 0.0
}

fn below_min_speed(p: &ExtinctionProbe, t: &Thresholds) -> bool {
    p.velocity.length() < t.v_min
}

fn below_min_per_axis(p: &ExtinctionProbe, t: &Thresholds) -> bool {
    p.velocity.abs().cmplt(Vec3::splat(t.v_min)).all()
}

fn below_min_per_axis_signed(p: &ExtinctionProbe, t: &Thresholds) -> bool {
    p.velocity.cmplt(Vec3::splat(t.v_min)).all()
}

fn beyond_distance(p: &ExtinctionProbe, t: &Thresholds) -> bool {
    p.position.length() > t.extinction_distance
}

impl fmt::Display for Extinction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Extinction {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Extinction::all()
            .iter()
            .copied()
            .find(|e| e.name() == s)
            .ok_or_else(|| ConfigError::UnknownExtinction(s.to_string()))
    }
}

/// How much life a freshly spawned particle gets, in ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LifeSpan {
    /// Every particle gets the same span.
    Fixed(f32),
    /// Drawn uniformly from `[min, max]` at each spawn.
    Range { min: f32, max: f32 },
}

impl LifeSpan {
    /// Collapse equal bounds into a fixed span.
    pub fn between(min: f32, max: f32) -> Self {
        if min == max {
            LifeSpan::Fixed(min)
        } else {
            LifeSpan::Range { min, max }
        }
    }

    /// Draw a life value for one spawn.
    pub fn draw(&self, ctx: &mut SpawnContext) -> f32 {
        match *self {
            LifeSpan::Fixed(span) => span,
            LifeSpan::Range { min, max } => ctx.random_range(min, max),
        }
    }
}

impl Default for LifeSpan {
    fn default() -> Self {
        LifeSpan::Range {
            min: 100.0,
            max: 500.0,
        }
    }
}

/// Extinction policy bound together with its thresholds and the life span.
///
/// # Example
///
/// ```ignore
/// let lifecycle = Lifecycle::stall(0.0001).lifetime(1.0);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Lifecycle {
    extinction: Extinction,
    predicate: ExtinctionFn,
    thresholds: Thresholds,
    lifetime: LifeSpan,
}

impl Lifecycle {
    /// Default policy with zero thresholds.
    pub fn new() -> Self {
        let extinction = Extinction::default();
        Self {
            extinction,
            predicate: extinction.predicate(),
            thresholds: Thresholds {
                v_min: 0.0,
                extinction_distance: 0.0,
            },
            lifetime: LifeSpan::default(),
        }
    }

    // =========================================================================
    // PRESETS
    // =========================================================================

    /// Cull particles that stall in slow pockets of the field.
    pub fn stall(v_min: f32) -> Self {
        Self::new()
            .extinction(Extinction::MinVelocity)
            .v_min(v_min)
    }

    /// Give every particle a random life between `min` and `max` ticks.
    pub fn aging(min: f32, max: f32) -> Self {
        Self::new()
            .extinction(Extinction::Age)
            .lifetime_range(min, max)
    }

    /// Keep particles on a leash around the origin.
    pub fn leash(distance: f32) -> Self {
        Self::new()
            .extinction(Extinction::DistanceFromCenter)
            .extinction_distance(distance)
    }

    // =========================================================================
    // BUILDER METHODS
    // =========================================================================

    /// Bind a different extinction policy.
    pub fn extinction(mut self, extinction: Extinction) -> Self {
        self.set_extinction(extinction);
        self
    }

    /// Fixed life span in ticks.
    pub fn lifetime(mut self, ticks: f32) -> Self {
        self.lifetime = LifeSpan::Fixed(ticks);
        self
    }

    /// Random life span in `[min, max]` ticks.
    pub fn lifetime_range(mut self, min: f32, max: f32) -> Self {
        self.lifetime = LifeSpan::between(min, max);
        self
    }

    /// Speed threshold for the velocity policies.
    pub fn v_min(mut self, v_min: f32) -> Self {
        self.thresholds.v_min = v_min;
        self
    }

    /// Radius for [`Extinction::DistanceFromCenter`].
    pub fn extinction_distance(mut self, distance: f32) -> Self {
        self.thresholds.extinction_distance = distance;
        self
    }

    /// Rebind the strategy in place.
    pub fn set_extinction(&mut self, extinction: Extinction) {
        self.extinction = extinction;
        self.predicate = extinction.predicate();
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn method(&self) -> Extinction {
        self.extinction
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn life_span(&self) -> LifeSpan {
        self.lifetime
    }

    /// Run the bound predicate.
    #[inline]
    pub fn is_extinct(&self, probe: &ExtinctionProbe) -> bool {
        (self.predicate)(probe, &self.thresholds)
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
