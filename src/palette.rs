//! Cosine color palettes.
//!
//! Particle colors come from a four-coefficient cosine gradient,
//! `a + b·cos(2π(c·t + d))`, evaluated per channel. A [`Palette`] names a
//! coefficient set; a [`ColorMapper`] pairs one with the saturation, offset
//! and scale knobs exposed to users.
//!
//! # Example
//!
//! ```ignore
//! let mut colors = ColorMapper::from_palette(Palette::Desert);
//! let rgb = colors.color_at(0.25);
//!
//! // Swap the gradient; colors already written to particles stay as they are
//! colors.switch_palette(Palette::Nineties);
//! ```

use crate::error::ConfigError;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use std::fmt;
use std::str::FromStr;

/// Coefficients of one cosine gradient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CosinePalette {
    /// Bias.
    pub a: Vec3,
    /// Amplitude.
    pub b: Vec3,
    /// Frequency.
    pub c: Vec3,
    /// Phase.
    pub d: Vec3,
}

/// Built-in palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Palette {
    /// Grey-ish spectrum sweep; responds strongly to saturation.
    #[default]
    Default,
    /// Full hue wheel.
    Rainbow,
    /// Cyan fading to mauve.
    CyanMauve,
    /// Murky greens and browns.
    Sludge,
    /// Sand, rust and pale sky.
    Desert,
    /// Loud teal, magenta and yellow.
    Nineties,
    /// Green through orange.
    GreenOrange,
}

impl Palette {
    /// Gradient coefficients for this palette.
    pub fn coefficients(&self) -> CosinePalette {
        let half = Vec3::splat(0.5);
        match self {
            Palette::Default => CosinePalette {
                a: half,
                b: half,
                c: Vec3::ONE,
                d: Vec3::ZERO,
            },
            Palette::Rainbow => CosinePalette {
                a: half,
                b: half,
                c: Vec3::ONE,
                d: Vec3::new(0.0, 0.333, 0.666),
            },
            Palette::CyanMauve => CosinePalette {
                a: half,
                b: half,
                c: Vec3::ONE,
                d: Vec3::new(0.3, 0.2, 0.2),
            },
            Palette::Sludge => CosinePalette {
                a: half,
                b: half,
                c: Vec3::new(1.0, 1.0, 0.5),
                d: Vec3::new(0.8, 0.9, 0.3),
            },
            Palette::Desert => CosinePalette {
                a: half,
                b: half,
                c: Vec3::new(1.0, 0.7, 0.4),
                d: Vec3::new(0.0, 0.15, 0.2),
            },
            Palette::Nineties => CosinePalette {
                a: half,
                b: half,
                c: Vec3::new(2.0, 1.0, 0.0),
                d: Vec3::new(0.5, 0.2, 0.25),
            },
            Palette::GreenOrange => CosinePalette {
                a: Vec3::new(0.8, 0.5, 0.4),
                b: Vec3::new(0.2, 0.4, 0.2),
                c: Vec3::new(2.0, 1.0, 0.0),
                d: Vec3::new(0.0, 0.25, 0.25),
            },
        }
    }

    /// Default `(saturation, offset, scale)` for this palette.
    pub fn defaults(&self) -> (f32, f32, f32) {
        match self {
            Palette::Default => (1.0, 0.5, 1.0),
            _ => (0.0, 0.0, 1.0),
        }
    }

    /// Name used in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            Palette::Default => "default",
            Palette::Rainbow => "rainbow",
            Palette::CyanMauve => "cyanMauve",
            Palette::Sludge => "sludge",
            Palette::Desert => "desert",
            Palette::Nineties => "nineties",
            Palette::GreenOrange => "greenOrange",
        }
    }

    pub fn all() -> &'static [Palette] {
        &[
            Palette::Default,
            Palette::Rainbow,
            Palette::CyanMauve,
            Palette::Sludge,
            Palette::Desert,
            Palette::Nineties,
            Palette::GreenOrange,
        ]
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Palette {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Palette::all()
            .iter()
            .copied()
            .find(|p| p.name() == s)
            .ok_or_else(|| ConfigError::UnknownPalette(s.to_string()))
    }
}

/// Maps a scalar (usually normalized distance from the origin) to RGB.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorMapper {
    palette: Palette,
    coefficients: CosinePalette,
    /// Spreads the red and blue phases apart by `0.1 * saturation`.
    pub saturation: f32,
    /// Added to the gradient parameter after scaling.
    pub offset: f32,
    /// Multiplies the (halved) gradient parameter.
    pub scale: f32,
}

impl ColorMapper {
    /// Mapper with explicit knob values.
    pub fn new(palette: Palette, saturation: f32, offset: f32, scale: f32) -> Self {
        Self {
            palette,
            coefficients: palette.coefficients(),
            saturation,
            offset,
            scale,
        }
    }

    /// Mapper using the palette's own default knobs.
    pub fn from_palette(palette: Palette) -> Self {
        let (saturation, offset, scale) = palette.defaults();
        Self::new(palette, saturation, offset, scale)
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    /// Swap the active coefficients. Knob values are kept.
    pub fn switch_palette(&mut self, palette: Palette) {
        self.palette = palette;
        self.coefficients = palette.coefficients();
    }

    /// Color at `t` using the mapper's knobs.
    pub fn color_at(&self, t: f32) -> Vec3 {
        self.color_with(t, self.saturation, self.offset, self.scale)
    }

    /// Color at `t` with explicit knobs. Total over all finite `t`.
    pub fn color_with(&self, t: f32, saturation: f32, offset: f32, scale: f32) -> Vec3 {
        let CosinePalette { a, b, c, d } = self.coefficients;
        let range = saturation * 0.1;
        let t = (t / 2.0) * scale + offset;
        let d = d + Vec3::new(-range, 0.0, range);

        let phase = (c * t + d) * TAU;
        a + b * Vec3::new(phase.x.cos(), phase.y.cos(), phase.z.cos())
    }
}

impl Default for ColorMapper {
    fn default() -> Self {
        Self::from_palette(Palette::Default)
    }
}
