//! Global wind state, recomputed from elapsed time every tick.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::resources::config::WindConfig;

/// Resource representing the current wind conditions in the game world.
///
/// Direction sweeps clockwise through a full revolution over
/// [`WindConfig::period_ms`], and power is derived from where the direction
/// sits relative to the compass axes. Both are pure functions of elapsed
/// time (plus a bounded jitter term), never accumulated per tick, so the
/// cycle cannot drift.
#[derive(Resource, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Wind {
    /// Direction the wind blows toward, in radians (0 = East, PI/2 = North).
    pub direction: f32,
    /// Wind power scalar, clamped to the configured [min, max] range.
    pub power: f32,
}

impl Default for Wind {
    fn default() -> Self {
        Self {
            direction: 0.0, // blowing East
            power: 0.5,
        }
    }
}

impl Wind {
    /// Computes the wind state for a point in time.
    ///
    /// `jitter` is the caller-supplied random power offset; passing 0.0
    /// yields the deterministic part of the cycle. The final power is
    /// clamped to `[min_power, max_power]`, jitter included.
    pub fn sample(config: &WindConfig, elapsed_ms: u128, jitter: f32) -> Self {
        let period = config.period_ms.max(1) as u128;
        let cycle = (elapsed_ms % period) as f32 / period as f32;

        // Clockwise sweep: direction decreases as the cycle advances.
        let direction = -cycle * std::f32::consts::TAU;

        // Strongest along the north-south axis, weakest along east-west.
        let axis_alignment = direction.sin().abs();
        let mut power = config.min_power + (config.max_power - config.min_power) * axis_alignment;

        // A band around due east/west gets a flat bonus, so the lull at the
        // bottom of the cycle still leaves enough wind to sail out of.
        let off_axis_deg = axis_alignment.asin().to_degrees();
        if off_axis_deg <= config.axis_bonus_band_deg {
            power += config.axis_bonus;
        }

        Self {
            direction,
            power: (power + jitter).clamp(config.min_power, config.max_power),
        }
    }

    /// Returns the wind direction as a unit vector.
    pub fn direction_vec(&self) -> Vec2 {
        Vec2::new(self.direction.cos(), self.direction.sin())
    }

    /// Returns the wind velocity (direction * power).
    pub fn velocity(&self) -> Vec2 {
        self.direction_vec() * self.power
    }

    /// Returns a human-readable cardinal direction (N, NE, E, etc.)
    pub fn cardinal_direction(&self) -> &'static str {
        let deg = self.direction.to_degrees().rem_euclid(360.0);
        match deg as u32 {
            0..=22 | 338..=360 => "E",
            23..=67 => "NE",
            68..=112 => "N",
            113..=157 => "NW",
            158..=202 => "W",
            203..=247 => "SW",
            248..=292 => "S",
            293..=337 => "SE",
            _ => "?",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_wraps_over_period() {
        let config = WindConfig::default();
        let a = Wind::sample(&config, 0, 0.0);
        let b = Wind::sample(&config, config.period_ms as u128, 0.0);
        assert!((a.direction - b.direction).abs() < 1e-5);
        assert!((a.power - b.power).abs() < 1e-5);
    }

    #[test]
    fn test_direction_sweeps_clockwise() {
        let config = WindConfig::default();
        let early = Wind::sample(&config, 1_000, 0.0);
        let later = Wind::sample(&config, 10_000, 0.0);
        assert!(later.direction < early.direction);
    }

    #[test]
    fn test_power_peaks_on_north_south_axis() {
        let config = WindConfig::default();
        // A quarter period in, the direction is -PI/2: due south.
        let south = Wind::sample(&config, config.period_ms as u128 / 4, 0.0);
        assert!((south.power - config.max_power).abs() < 1e-4);

        // At the start of the cycle the wind blows east: floor plus bonus.
        let east = Wind::sample(&config, 0, 0.0);
        assert!((east.power - (config.min_power + config.axis_bonus)).abs() < 1e-4);
        assert!(east.power < south.power);
    }

    #[test]
    fn test_power_clamped_with_jitter() {
        let config = WindConfig::default();
        for step in 0..120 {
            let ms = step as u128 * (config.period_ms as u128 / 120);
            let high = Wind::sample(&config, ms, 10.0);
            let low = Wind::sample(&config, ms, -10.0);
            assert!(high.power <= config.max_power);
            assert!(low.power >= config.min_power);
        }
    }

    #[test]
    fn test_cardinal_names() {
        let east = Wind { direction: 0.0, power: 0.5 };
        assert_eq!(east.cardinal_direction(), "E");
        let north = Wind { direction: std::f32::consts::FRAC_PI_2, power: 0.5 };
        assert_eq!(north.cardinal_direction(), "N");
    }
}
