//! Acceptance thresholds and named presets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Limits an avatar must satisfy to be accepted.
///
/// Brightness bounds are on the normalized `0..=100` scale and are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Minimum Laplacian variance; lower scores are blurry.
    pub blur_min: f64,
    /// Lowest acceptable brightness (inclusive).
    pub brightness_low: f64,
    /// Highest acceptable brightness (inclusive).
    pub brightness_high: f64,
    /// Minimum length of the image's short side, in pixels.
    pub resolution_min: u32,
    /// Eye-line tilt, in degrees, at or above which a face is not frontal.
    pub face_angle_max: f64,
}

impl Thresholds {
    /// Thresholds of a named preset.
    #[must_use]
    pub const fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Default => Self {
                blur_min: 50.0,
                brightness_low: 10.0,
                brightness_high: 90.0,
                resolution_min: 300,
                face_angle_max: 25.0,
            },
            Preset::Lenient => Self {
                blur_min: 30.0,
                brightness_low: 20.0,
                brightness_high: 80.0,
                resolution_min: 400,
                face_angle_max: 30.0,
            },
            Preset::Strict => Self {
                blur_min: 100.0,
                brightness_low: 30.0,
                brightness_high: 70.0,
                resolution_min: 640,
                face_angle_max: 20.0,
            },
        }
    }

    /// Checks that the values are internally consistent.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid value.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.blur_min.is_finite() && self.blur_min >= 0.0) {
            return Err(format!("blur_min must be >= 0, got {}", self.blur_min));
        }
        for (name, value) in [
            ("brightness_low", self.brightness_low),
            ("brightness_high", self.brightness_high),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(format!("{name} must be 0-100, got {value}"));
            }
        }
        if self.brightness_low > self.brightness_high {
            return Err(format!(
                "brightness_low ({}) must not exceed brightness_high ({})",
                self.brightness_low, self.brightness_high
            ));
        }
        if !(self.face_angle_max > 0.0 && self.face_angle_max <= 180.0) {
            return Err(format!(
                "face_angle_max must be in (0, 180], got {}",
                self.face_angle_max
            ));
        }
        Ok(())
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::preset(Preset::Default)
    }
}

/// Named threshold sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Balanced defaults.
    #[default]
    Default,
    /// Accepts softer, darker and smaller photos.
    Lenient,
    /// Demands sharp, evenly lit, large, level photos.
    Strict,
}

impl Preset {
    /// All presets, in declaration order.
    pub const ALL: [Self; 3] = [Self::Default, Self::Lenient, Self::Strict];

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Lenient => "lenient",
            Self::Strict => "strict",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown preset '{s}' (expected default, lenient or strict)"))
    }
}
