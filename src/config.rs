//! Simulation configuration.
//!
//! [`SimConfig`] is the single snapshot of tunable parameters a front end
//! hands to the simulation. It serializes to JSON with the camelCase keys the
//! parameter panels use, so saved configurations can be loaded by the runner:
//!
//! ```json
//! {
//!   "numParticles": 20000,
//!   "spawnSphereDiameter": 0.5,
//!   "minSpeed": 0.0001,
//!   "maxSpeed": 0.002,
//!   "vMin": 0.0001,
//!   "noiseType": "APPROXIMATE_CURL",
//!   "extinctionMethod": "MIN_SOFT_VELOCITY_PER_AXIS",
//!   "palette": "desert"
//! }
//! ```
//!
//! Missing keys take their [`Default`] values. Unknown enum names are
//! rejected at parse time rather than falling back to a default.

use crate::curl::NoiseType;
use crate::error::ConfigError;
use crate::lifecycle::{Extinction, Lifecycle};
use crate::palette::{ColorMapper, Palette};
use crate::spawn::SphereSampling;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Every parameter the simulation core reads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimConfig {
    /// Number of particles; fixed until the next reset.
    pub num_particles: usize,
    /// Spawn sphere size; also normalizes the spawn color parameter.
    pub spawn_sphere_diameter: f32,
    /// Center-weighted spawn distribution instead of uniform.
    pub use_weighted_sphere_sampling: bool,

    /// Step length for the slowest particles.
    pub min_speed: f32,
    /// Step length approached by the fastest particles.
    pub max_speed: f32,
    /// Speed threshold for the velocity extinction methods.
    pub v_min: f32,

    /// Noise seed; fractional values in (0, 1) are expanded.
    pub noise_seed: f64,
    /// Multiplier applied to positions before sampling the field.
    pub noise_scale: f64,
    pub noise_type: NoiseType,
    #[serde(rename = "noiseXOffset")]
    pub noise_x_offset: f64,
    #[serde(rename = "noiseYOffset")]
    pub noise_y_offset: f64,
    #[serde(rename = "noiseZOffset")]
    pub noise_z_offset: f64,
    /// Sample z from x, flattening the field into sheets.
    pub use_flat_curl_noise: bool,

    pub extinction_method: Extinction,
    /// Shortest life in ticks.
    pub life_span_min: f32,
    /// Longest life in ticks.
    pub life_span_max: f32,
    /// Radius for `DISTANCE_FROM_CENTER`.
    pub extinction_distance: f32,

    pub palette: Palette,
    pub palette_saturation: f32,
    pub palette_offset: f32,
    pub palette_scale: f32,

    /// Seed for spawn sampling. `None` draws from system entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rng_seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_particles: 20_000,
            spawn_sphere_diameter: 0.5,
            use_weighted_sphere_sampling: true,
            min_speed: 0.0001,
            max_speed: 0.002,
            v_min: 0.0001,
            noise_seed: 0.5,
            noise_scale: 1.0,
            noise_type: NoiseType::ApproximateCurl,
            noise_x_offset: 0.0,
            noise_y_offset: 0.0,
            noise_z_offset: 0.0,
            use_flat_curl_noise: false,
            extinction_method: Extinction::MinSoftVelocityPerAxis,
            life_span_min: 100.0,
            life_span_max: 500.0,
            extinction_distance: 2.0,
            palette: Palette::Default,
            palette_saturation: 1.0,
            palette_offset: 0.5,
            palette_scale: 1.0,
            rng_seed: None,
        }
    }
}

impl SimConfig {
    /// Look up a named preset.
    ///
    /// | Preset | Character |
    /// |--------|-----------|
    /// | `default` | the defaults |
    /// | `calm` | slow, long-lived particles aging out |
    /// | `nebula` | true curl on a wide sphere, leashed by distance |
    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "default" => Ok(Self::default()),
            "calm" => Ok(Self {
                num_particles: 10_000,
                min_speed: 0.00005,
                max_speed: 0.0008,
                extinction_method: Extinction::Age,
                life_span_min: 400.0,
                life_span_max: 1200.0,
                palette: Palette::CyanMauve,
                palette_saturation: 0.0,
                palette_offset: 0.0,
                ..Self::default()
            }),
            "nebula" => Ok(Self {
                num_particles: 50_000,
                spawn_sphere_diameter: 1.2,
                use_weighted_sphere_sampling: false,
                max_speed: 0.004,
                noise_type: NoiseType::TrueCurl,
                noise_scale: 0.6,
                noise_x_offset: 100.0,
                noise_y_offset: -40.0,
                noise_z_offset: 12.5,
                extinction_method: Extinction::DistanceFromCenter,
                extinction_distance: 1.5,
                palette: Palette::Nineties,
                palette_saturation: 0.0,
                palette_offset: 0.0,
                ..Self::default()
            }),
            other => Err(ConfigError::UnknownPreset(other.to_string())),
        }
    }

    pub fn preset_names() -> &'static [&'static str] {
        &["default", "calm", "nebula"]
    }

    // ========== Validation ==========

    /// Check every field, failing on the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_particles == 0 {
            return Err(ConfigError::InvalidParticleCount);
        }

        positive("spawnSphereDiameter", self.spawn_sphere_diameter as f64)?;
        non_negative("minSpeed", self.min_speed as f64)?;
        non_negative("maxSpeed", self.max_speed as f64)?;
        ordered("speed", self.min_speed as f64, self.max_speed as f64)?;
        non_negative("vMin", self.v_min as f64)?;

        finite("noiseSeed", self.noise_seed)?;
        positive("noiseScale", self.noise_scale)?;
        finite("noiseXOffset", self.noise_x_offset)?;
        finite("noiseYOffset", self.noise_y_offset)?;
        finite("noiseZOffset", self.noise_z_offset)?;

        non_negative("lifeSpanMin", self.life_span_min as f64)?;
        non_negative("lifeSpanMax", self.life_span_max as f64)?;
        ordered(
            "lifeSpan",
            self.life_span_min as f64,
            self.life_span_max as f64,
        )?;
        non_negative("extinctionDistance", self.extinction_distance as f64)?;

        finite("paletteSaturation", self.palette_saturation as f64)?;
        finite("paletteOffset", self.palette_offset as f64)?;
        finite("paletteScale", self.palette_scale as f64)?;

        Ok(())
    }

    // ========== Derived components ==========

    pub fn noise_offset(&self) -> DVec3 {
        DVec3::new(
            self.noise_x_offset,
            self.noise_y_offset,
            self.noise_z_offset,
        )
    }

    pub fn sphere_sampling(&self) -> SphereSampling {
        SphereSampling::from_weighted(self.use_weighted_sphere_sampling)
    }

    pub fn lifecycle(&self) -> Lifecycle {
        Lifecycle::new()
            .extinction(self.extinction_method)
            .lifetime_range(self.life_span_min, self.life_span_max)
            .v_min(self.v_min)
            .extinction_distance(self.extinction_distance)
    }

    pub fn color_mapper(&self) -> ColorMapper {
        ColorMapper::new(
            self.palette,
            self.palette_saturation,
            self.palette_offset,
            self.palette_scale,
        )
    }

    /// Whether switching from `self` to `other` needs new noise tables or buffers.
    pub fn needs_reset(&self, other: &SimConfig) -> bool {
        self.num_particles != other.num_particles
            || self.spawn_sphere_diameter != other.spawn_sphere_diameter
            || self.use_weighted_sphere_sampling != other.use_weighted_sphere_sampling
            || self.noise_seed.to_bits() != other.noise_seed.to_bits()
            || self.noise_scale != other.noise_scale
            || self.noise_type != other.noise_type
            || self.noise_offset() != other.noise_offset()
            || self.use_flat_curl_noise != other.use_flat_curl_noise
            || self.rng_seed != other.rng_seed
    }

    // ========== JSON ==========

    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            value,
            reason: "must be finite",
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::InvalidValue {
            field,
            value,
            reason: "must be >= 0",
        });
    }
    Ok(())
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value <= 0.0 {
        return Err(ConfigError::InvalidValue {
            field,
            value,
            reason: "must be > 0",
        });
    }
    Ok(())
}

fn ordered(field: &'static str, min: f64, max: f64) -> Result<(), ConfigError> {
    if min > max {
        Err(ConfigError::InvalidRange { field, min, max })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        SimConfig::default().validate().unwrap();
        for name in SimConfig::preset_names() {
            SimConfig::preset(name).unwrap().validate().unwrap();
        }
    }

    #[test]
    fn test_rejects_zero_particles() {
        let config = SimConfig {
            num_particles: 0,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParticleCount)
        ));
    }

    #[test]
    fn test_rejects_inverted_ranges() {
        let speeds = SimConfig {
            min_speed: 0.5,
            max_speed: 0.1,
            ..SimConfig::default()
        };
        assert!(matches!(
            speeds.validate(),
            Err(ConfigError::InvalidRange { field: "speed", .. })
        ));

        let life = SimConfig {
            life_span_min: 10.0,
            life_span_max: 5.0,
            ..SimConfig::default()
        };
        assert!(matches!(
            life.validate(),
            Err(ConfigError::InvalidRange {
                field: "lifeSpan",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_non_finite() {
        let config = SimConfig {
            noise_x_offset: f64::NAN,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "noiseXOffset",
                ..
            })
        ));

        let config = SimConfig {
            spawn_sphere_diameter: 0.0,
            ..SimConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_keys_are_camel_case() {
        let json = SimConfig::default().to_json().unwrap();
        assert!(json.contains("\"numParticles\""));
        assert!(json.contains("\"noiseXOffset\""));
        assert!(json.contains("\"spawnSphereDiameter\""));
        assert!(json.contains("\"MIN_SOFT_VELOCITY_PER_AXIS\""));
        assert!(!json.contains("rngSeed"));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = SimConfig::from_json(
            r#"{ "numParticles": 100, "extinctionMethod": "AGE", "palette": "desert" }"#,
        )
        .unwrap();
        assert_eq!(config.num_particles, 100);
        assert_eq!(config.extinction_method, Extinction::Age);
        assert_eq!(config.palette, Palette::Desert);
        assert_eq!(config.max_speed, SimConfig::default().max_speed);
    }

    #[test]
    fn test_unknown_enum_names_rejected() {
        let err = SimConfig::from_json(r#"{ "extinctionMethod": "MIN_SPEED" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        let err = SimConfig::from_json(r#"{ "noiseType": "VALUE" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_json_validation_runs() {
        let err = SimConfig::from_json(r#"{ "lifeSpanMin": 9, "lifeSpanMax": 1 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRange { .. }));
    }

    #[test]
    fn test_needs_reset() {
        let base = SimConfig::default();
        let faster = SimConfig {
            max_speed: 0.01,
            palette: Palette::Sludge,
            extinction_method: Extinction::Age,
            ..base.clone()
        };
        assert!(!base.needs_reset(&faster));

        let bigger = SimConfig {
            num_particles: base.num_particles + 1,
            ..base.clone()
        };
        assert!(base.needs_reset(&bigger));

        let reseeded = SimConfig {
            noise_seed: 0.25,
            ..base.clone()
        };
        assert!(base.needs_reset(&reseeded));
    }

    #[test]
    fn test_unknown_preset() {
        assert!(matches!(
            SimConfig::preset("storm"),
            Err(ConfigError::UnknownPreset(_))
        ));
    }
}
