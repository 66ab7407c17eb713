//! Simulation orchestration.
//!
//! [`Simulation`] owns every component of a running swarm: the curl field,
//! the particle buffers, the color mapper, the emitter, the bound extinction
//! policy and the random source. Each [`Simulation::tick`] advances all
//! particles by one step using the current configuration snapshot.
//!
//! # Configuration changes
//!
//! Parameters split into two groups:
//!
//! | Group | Fields | Effect of [`Simulation::apply`] |
//! |-------|--------|---------------------------------|
//! | Runtime | speeds, `vMin`, extinction method and distance, life span, palette knobs | take effect on the next tick |
//! | Structural | particle count, noise seed/type/scale/offsets, flat mode, spawn diameter and sampling, rng seed | stored, reported as [`Requires::Reset`] |
//!
//! Structural changes only land when the caller invokes [`Simulation::reset`],
//! which rebuilds the field and replaces the whole store.
//!
//! # Example
//!
//! ```ignore
//! let mut sim = Simulation::builder()
//!     .with_particle_count(10_000)
//!     .with_noise_seed(42.0)
//!     .with_extinction(Extinction::Age)
//!     .build()?;
//!
//! for _ in 0..600 {
//!     let stats = sim.tick();
//!     upload(sim.particles().position_data());
//! }
//! ```

use crate::config::SimConfig;
use crate::curl::{CurlSampler, NoiseType};
use crate::emitter::Emitter;
use crate::error::SimulationError;
use crate::lifecycle::{Extinction, Lifecycle};
use crate::palette::{ColorMapper, Palette};
use crate::particles::{ParticleStore, Respawn, StepParams};
use crate::spawn::SpawnContext;
use glam::DVec3;

/// Outcome of one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickStats {
    /// 1-based index of the tick just run.
    pub tick: u64,
    /// Particles respawned during this tick.
    pub respawned: usize,
}

/// What the caller must do for an applied configuration to take full effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Requires {
    /// Everything is live.
    Nothing,
    /// Structural fields changed; call [`Simulation::reset`].
    Reset,
}

/// A running curl-noise particle swarm.
pub struct Simulation {
    config: SimConfig,
    /// Snapshot the field, emitter and store were last built from.
    built: SimConfig,
    field: CurlSampler,
    store: ParticleStore,
    colors: ColorMapper,
    emitter: Emitter,
    lifecycle: Lifecycle,
    params: StepParams,
    ctx: SpawnContext,
    ticks: u64,
    total_respawns: u64,
}

impl Simulation {
    /// Validate `config` and spawn a full swarm from it.
    pub fn new(config: SimConfig) -> Result<Self, SimulationError> {
        config.validate()?;

        let mut ctx = spawn_context(&config);
        let field = curl_field(&config);
        let colors = config.color_mapper();
        let emitter = Emitter::new(config.sphere_sampling(), config.spawn_sphere_diameter);
        let lifecycle = config.lifecycle();

        let store = ParticleStore::spawn(
            config.num_particles,
            &lifecycle,
            &mut Respawn {
                emitter: &emitter,
                colors: &colors,
                ctx: &mut ctx,
            },
        );

        log::info!(
            "spawned {} particles ({} noise, seed {}, {} extinction)",
            store.len(),
            config.noise_type,
            config.noise_seed,
            config.extinction_method,
        );

        Ok(Self {
            params: step_params(&config),
            built: config.clone(),
            config,
            field,
            store,
            colors,
            emitter,
            lifecycle,
            ctx,
            ticks: 0,
            total_respawns: 0,
        })
    }

    /// Start from [`SimConfig::default`] and override fields by chaining.
    pub fn builder() -> SimulationBuilder {
        SimulationBuilder::new()
    }

    // ========== Stepping ==========

    /// Advance every particle by one step.
    pub fn tick(&mut self) -> TickStats {
        let respawned = self.store.step(
            &self.params,
            &self.field,
            &self.lifecycle,
            &mut Respawn {
                emitter: &self.emitter,
                colors: &self.colors,
                ctx: &mut self.ctx,
            },
        );

        self.ticks += 1;
        self.total_respawns += respawned as u64;

        log::trace!("tick {}: {} respawned", self.ticks, respawned);
        if let Some(bad) = self.store.positions().iter().position(|p| !p.is_finite()) {
            log::warn!(
                "tick {}: particle {} has a non-finite position {:?}",
                self.ticks,
                bad,
                self.store.positions()[bad],
            );
        }

        TickStats {
            tick: self.ticks,
            respawned,
        }
    }

    /// Run `n` ticks, returning the total respawned.
    pub fn run(&mut self, n: u64) -> u64 {
        (0..n).map(|_| self.tick().respawned as u64).sum()
    }

    // ========== Configuration ==========

    /// Replace the configuration snapshot.
    ///
    /// Runtime parameters take effect immediately. Structural changes are
    /// stored and reported; the buffers and field stay as they are until
    /// [`Simulation::reset`].
    pub fn apply(&mut self, config: SimConfig) -> Result<Requires, SimulationError> {
        config.validate()?;

        let requires = if self.built.needs_reset(&config) {
            Requires::Reset
        } else {
            Requires::Nothing
        };

        if config.extinction_method != self.lifecycle.method() {
            log::debug!(
                "extinction {} -> {}",
                self.lifecycle.method(),
                config.extinction_method
            );
        }
        self.lifecycle = config.lifecycle();
        self.params = step_params(&config);
        self.colors = config.color_mapper();

        log::debug!("applied configuration ({:?})", requires);
        self.config = config;
        Ok(requires)
    }

    /// Rebuild the field and replace every particle from the current configuration.
    ///
    /// Tick counters restart at zero. With an `rngSeed` set, a reset replays
    /// the same swarm.
    pub fn reset(&mut self) {
        self.built = self.config.clone();
        self.ctx = spawn_context(&self.config);
        self.field = curl_field(&self.config);
        self.emitter = Emitter::new(
            self.config.sphere_sampling(),
            self.config.spawn_sphere_diameter,
        );
        self.store = ParticleStore::spawn(
            self.config.num_particles,
            &self.lifecycle,
            &mut Respawn {
                emitter: &self.emitter,
                colors: &self.colors,
                ctx: &mut self.ctx,
            },
        );
        self.ticks = 0;
        self.total_respawns = 0;

        log::info!(
            "reset: {} particles, seed {}",
            self.store.len(),
            self.config.noise_seed
        );
    }

    /// Swap in a noise field with a new seed. Particles keep their state.
    ///
    /// Only the seed changes; other pending noise settings still wait for
    /// [`Simulation::reset`].
    pub fn reseed(&mut self, seed: f64) {
        self.config.noise_seed = seed;
        self.built.noise_seed = seed;
        self.field = curl_field(&self.built);
        log::info!(
            "reseeded noise with {} (folded {})",
            seed,
            self.field.noise().folded_seed()
        );
    }

    /// Adopt a palette and its default knobs.
    ///
    /// Only particles spawned from now on use it; existing colors stay.
    pub fn switch_palette(&mut self, palette: Palette) {
        self.colors = ColorMapper::from_palette(palette);
        self.config.palette = palette;
        self.config.palette_saturation = self.colors.saturation;
        self.config.palette_offset = self.colors.offset;
        self.config.palette_scale = self.colors.scale;
        log::debug!("palette -> {}", palette);
    }

    /// Rebind the extinction policy.
    pub fn set_extinction(&mut self, extinction: Extinction) {
        log::debug!("extinction {} -> {}", self.lifecycle.method(), extinction);
        self.lifecycle.set_extinction(extinction);
        self.config.extinction_method = extinction;
    }

    // ========== Accessors ==========

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn particles(&self) -> &ParticleStore {
        &self.store
    }

    pub fn field(&self) -> &CurlSampler {
        &self.field
    }

    pub fn colors(&self) -> &ColorMapper {
        &self.colors
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    /// Whether applied structural changes are waiting for [`Simulation::reset`].
    pub fn reset_pending(&self) -> bool {
        self.built.needs_reset(&self.config)
    }

    /// Ticks run since construction or the last reset.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Respawns since construction or the last reset.
    pub fn total_respawns(&self) -> u64 {
        self.total_respawns
    }
}

fn spawn_context(config: &SimConfig) -> SpawnContext {
    match config.rng_seed {
        Some(seed) => SpawnContext::seeded(seed),
        None => SpawnContext::new(),
    }
}

fn curl_field(config: &SimConfig) -> CurlSampler {
    CurlSampler::new(config.noise_type, config.noise_seed, config.noise_offset())
        .with_scale(config.noise_scale)
        .with_flat(config.use_flat_curl_noise)
}

fn step_params(config: &SimConfig) -> StepParams {
    StepParams {
        min_speed: config.min_speed,
        max_speed: config.max_speed,
    }
}

/// Chained construction of a [`Simulation`].
///
/// Validation happens once, in [`SimulationBuilder::build`].
#[derive(Clone, Debug, Default)]
pub struct SimulationBuilder {
    config: SimConfig,
}

impl SimulationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every field at once.
    pub fn with_config(mut self, config: SimConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.config.num_particles = count;
        self
    }

    pub fn with_spawn_diameter(mut self, diameter: f32) -> Self {
        self.config.spawn_sphere_diameter = diameter;
        self
    }

    pub fn with_weighted_sampling(mut self, weighted: bool) -> Self {
        self.config.use_weighted_sphere_sampling = weighted;
        self
    }

    /// Step length bounds.
    pub fn with_speed(mut self, min: f32, max: f32) -> Self {
        self.config.min_speed = min;
        self.config.max_speed = max;
        self
    }

    pub fn with_v_min(mut self, v_min: f32) -> Self {
        self.config.v_min = v_min;
        self
    }

    pub fn with_noise_seed(mut self, seed: f64) -> Self {
        self.config.noise_seed = seed;
        self
    }

    pub fn with_noise_type(mut self, noise_type: NoiseType) -> Self {
        self.config.noise_type = noise_type;
        self
    }

    pub fn with_noise_scale(mut self, scale: f64) -> Self {
        self.config.noise_scale = scale;
        self
    }

    pub fn with_noise_offset(mut self, offset: DVec3) -> Self {
        self.config.noise_x_offset = offset.x;
        self.config.noise_y_offset = offset.y;
        self.config.noise_z_offset = offset.z;
        self
    }

    pub fn with_flat_noise(mut self, flat: bool) -> Self {
        self.config.use_flat_curl_noise = flat;
        self
    }

    pub fn with_extinction(mut self, extinction: Extinction) -> Self {
        self.config.extinction_method = extinction;
        self
    }

    pub fn with_life_span(mut self, min: f32, max: f32) -> Self {
        self.config.life_span_min = min;
        self.config.life_span_max = max;
        self
    }

    pub fn with_extinction_distance(mut self, distance: f32) -> Self {
        self.config.extinction_distance = distance;
        self
    }

    /// Palette with its default knobs.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        let (saturation, offset, scale) = palette.defaults();
        self.config.palette = palette;
        self.config.palette_saturation = saturation;
        self.config.palette_offset = offset;
        self.config.palette_scale = scale;
        self
    }

    pub fn with_palette_knobs(mut self, saturation: f32, offset: f32, scale: f32) -> Self {
        self.config.palette_saturation = saturation;
        self.config.palette_offset = offset;
        self.config.palette_scale = scale;
        self
    }

    /// Make spawn sampling reproducible.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.config.rng_seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<Simulation, SimulationError> {
        Simulation::new(self.config)
    }
}
