//! Spawn source for new and respawned particles.
//!
//! The [`Emitter`] places new particles in a sphere of given diameter,
//! uniform or center-weighted, and colors them with the palette keyed on the
//! normalized distance from the origin. The life handed out comes from the
//! lifecycle's [`LifeSpan`].
//!
//! # Example
//!
//! ```ignore
//! let emitter = Emitter::new(SphereSampling::Weighted, 0.5);
//! let spawned = emitter.emit(&mut ctx, &colors, &LifeSpan::Fixed(300.0));
//! assert!(spawned.position.length() <= 0.5);
//! ```

use crate::lifecycle::LifeSpan;
use crate::palette::ColorMapper;
use crate::spawn::{SpawnContext, SphereSampling};
use glam::{Vec3, Vec4};

/// Attribute values for one freshly spawned particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spawned {
    pub position: Vec3,
    /// RGB from the palette, alpha 1.
    pub color: Vec4,
    /// Speed factor in `[0, 1)`.
    pub speed: f32,
    pub life: f32,
}

/// Spawns particles inside a sphere around the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Emitter {
    /// Radial distribution.
    pub sampling: SphereSampling,
    /// Sphere size; also normalizes the color parameter.
    pub diameter: f32,
}

impl Emitter {
    pub fn new(sampling: SphereSampling, diameter: f32) -> Self {
        Self { sampling, diameter }
    }

    /// Draw a complete set of spawn attributes.
    pub fn emit(
        &self,
        ctx: &mut SpawnContext,
        colors: &ColorMapper,
        lifetime: &LifeSpan,
    ) -> Spawned {
        let position = ctx.sample_sphere(self.sampling, self.diameter);
        let rgb = colors.color_at(position.length() / self.diameter);

        Spawned {
            position,
            color: rgb.extend(1.0),
            speed: ctx.random(),
            life: lifetime.draw(ctx),
        }
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new(SphereSampling::default(), 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Palette;

    #[test]
    fn test_emit_within_sphere() {
        let emitter = Emitter::new(SphereSampling::Uniform, 0.8);
        let colors = ColorMapper::default();
        let mut ctx = SpawnContext::seeded(5);
        for _ in 0..500 {
            let s = emitter.emit(&mut ctx, &colors, &LifeSpan::Fixed(12.0));
            assert!(s.position.length() <= 0.8 + 1e-5);
            assert!((0.0..1.0).contains(&s.speed));
            assert_eq!(s.life, 12.0);
            assert_eq!(s.color.w, 1.0);
        }
    }

    #[test]
    fn test_color_keyed_on_normalized_distance() {
        let emitter = Emitter::new(SphereSampling::Weighted, 2.0);
        let colors = ColorMapper::from_palette(Palette::Rainbow);
        let mut ctx = SpawnContext::seeded(6);
        let s = emitter.emit(&mut ctx, &colors, &LifeSpan::Fixed(1.0));
        let expected = colors.color_at(s.position.length() / 2.0);
        assert_eq!(s.color.truncate(), expected);
    }
}
