//! # curl-swarm
//!
//! A CPU particle swarm advected through a seeded curl-noise field.
//!
//! Particles spawn inside a small sphere around the origin, follow the
//! divergence-free flow of the field, and respawn in place when an extinction
//! policy decides they are done. The crate owns the simulation only; the
//! flat attribute buffers are meant to be handed to a renderer as they are.
//!
//! ## Quick Start
//!
//! ```ignore
//! use curl_swarm::prelude::*;
//!
//! fn main() -> Result<(), SimulationError> {
//!     let mut sim = Simulation::builder()
//!         .with_particle_count(20_000)
//!         .with_noise_seed(42.0)
//!         .with_extinction(Extinction::MinSoftVelocityPerAxis)
//!         .with_palette(Palette::Desert)
//!         .build()?;
//!
//!     loop {
//!         sim.tick();
//!         draw(sim.particles().position_data(), sim.particles().color_data());
//!     }
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Field
//!
//! [`NoiseField`] is 3D simplex noise over permutation tables derived from a
//! seed. [`CurlSampler`] turns it into a velocity field, either the cheap
//! three-channel approximation or the true curl of two potentials.
//!
//! ### Lifecycle
//!
//! Every tick each particle burns one tick of life. The bound [`Extinction`]
//! policy then decides whether it respawns:
//!
//! | Policy | Respawns when |
//! |--------|---------------|
//! | `AGE` | life runs out (alpha fades with it) |
//! | `MIN_VELOCITY` | step length drops below `vMin` |
//! | `MIN_VELOCITY_PER_AXIS` | every axis of the step is below `vMin` in magnitude |
//! | `MIN_SOFT_VELOCITY_PER_AXIS` | every axis is below `vMin` (signed) |
//! | `DISTANCE_FROM_CENTER` | it wanders past `extinctionDistance` |
//!
//! ### Color
//!
//! Spawn colors come from cosine gradient [`Palette`]s keyed on distance from
//! the origin. Switching palettes only affects particles spawned afterwards.
//!
//! ## Configuration
//!
//! [`SimConfig`] holds every parameter and round-trips through JSON, see
//! [`config`] for the format.

pub mod config;
pub mod curl;
pub mod emitter;
pub mod error;
pub mod lifecycle;
pub mod noise;
pub mod palette;
pub mod particles;
mod simulation;
pub mod spawn;

pub use config::SimConfig;
pub use curl::{CurlSampler, NoiseType};
pub use emitter::Emitter;
pub use error::{ConfigError, SimulationError};
pub use glam::{DVec3, Vec3, Vec4};
pub use lifecycle::{Extinction, LifeSpan, Lifecycle};
pub use noise::{fold_seed, NoiseField};
pub use palette::{ColorMapper, Palette};
pub use particles::{Particle, ParticleStore, StepParams};
pub use simulation::{Requires, Simulation, SimulationBuilder, TickStats};
pub use spawn::{SpawnContext, SphereSampling};

/// Convenient imports for common usage.
///
/// ```ignore
/// use curl_swarm::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        ColorMapper, ConfigError, CurlSampler, Extinction, NoiseType, Palette, SimConfig,
        Simulation, SimulationError, SphereSampling, TickStats, Vec3, Vec4,
    };
}
