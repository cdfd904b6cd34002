//! Tuning resources for the vessel simulation.
//!
//! Every rate, floor, and force constant lives here so the host game can
//! rebalance (or persist) a whole configuration in one place. Contractual
//! clamp ranges (rudder, trim, turret swivel) are fixed constants next to
//! the types they bound, not tuning values.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Vessel force and helm tuning.
///
/// Forces are modeled as:
/// - **Thrust**: continuous force along the bow axis, scaled by aggregate
///   sail efficiency and wind power (Newtons)
/// - **Drag**: per-tick velocity multiplier, relieved by open sails and
///   built-up momentum
/// - **Turning**: rudder-proportional angular velocity change, resisted by
///   momentum and starved by furled sails
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct VesselPhysicsConfig {
    /// Thrust force at efficiency 1.0 under wind power 1.0 (Newtons).
    pub thrust_force: f32,
    /// Aggregate efficiency floor once at least one sail is open.
    pub min_fleet_efficiency: f32,
    /// Baseline drag rate (fraction of velocity shed per second).
    pub base_drag: f32,
    /// Drag relief at 100% average openness (0.5 = half drag under full sail).
    pub openness_drag_relief: f32,
    /// Drag relief at momentum 1.0. Kept small; momentum helps only marginally.
    pub momentum_drag_relief: f32,
    /// Below this speed with all sails furled, velocity snaps to zero.
    pub stop_speed_threshold: f32,
    /// Rudder slew rate at a standstill (degrees/second).
    pub rudder_rate: f32,
    /// Extra rudder rate per unit of speed (faster vessel answers the helm faster).
    pub rudder_speed_scale: f32,
    /// Self-centering rate when no steering order is given (degrees/second).
    pub rudder_center_rate: f32,
    /// Exponential decay rate of momentum (per second).
    pub momentum_decay: f32,
    /// Momentum gained per unit of speed per second.
    pub momentum_gain: f32,
    /// Angular acceleration per radian of rudder deflection (rad/s^2).
    pub turn_torque: f32,
    /// How strongly momentum resists turning (fraction lost at momentum 1.0).
    pub momentum_turn_penalty: f32,
    /// Turn effectiveness floor, regardless of momentum.
    pub min_turn_effectiveness: f32,
    /// Turning factor with sails fully furled; above zero so an opened sail
    /// can pivot the vessel from a standstill.
    pub min_sail_turn_factor: f32,
    /// Maximum angular speed (radians/second).
    pub max_angular_speed: f32,
    /// Torque is only applied above this speed, or while any sail is open.
    pub turn_speed_threshold: f32,
    /// Sail trim slew rate (degrees/second).
    pub trim_rate: f32,
}

impl Default for VesselPhysicsConfig {
    fn default() -> Self {
        Self {
            thrust_force: 300_000.0, // Balanced for ~1000kg hull with base_drag 0.8
            min_fleet_efficiency: 0.1,
            base_drag: 0.8,
            openness_drag_relief: 0.5,
            momentum_drag_relief: 0.15,
            stop_speed_threshold: 4.0,
            rudder_rate: 18.0,
            rudder_speed_scale: 0.05,
            rudder_center_rate: 24.0,
            momentum_decay: 0.5,
            momentum_gain: 0.004,
            turn_torque: 1.2,
            momentum_turn_penalty: 0.6,
            min_turn_effectiveness: 0.4,
            min_sail_turn_factor: 0.3,
            max_angular_speed: 1.2,
            turn_speed_threshold: 1.0,
            trim_rate: 35.0,
        }
    }
}

/// Cannon aiming and firing tuning.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct CannonConfig {
    /// Turret convergence rate toward its commanded angle (degrees/second).
    pub rotation_rate: f32,
    /// Reload time after each shot (seconds).
    pub reload_time: f32,
    /// Muzzle offset from the mount along the firing angle (world units).
    pub barrel_length: f32,
    /// Base projectile speed (world units/second).
    pub projectile_speed: f32,
    /// Fraction of the vessel's current speed inherited by the projectile.
    pub speed_inheritance: f32,
}

impl Default for CannonConfig {
    fn default() -> Self {
        Self {
            rotation_rate: 40.0,
            reload_time: 2.0, // Slower reload: 1 shot every 2 seconds
            barrel_length: 14.0,
            projectile_speed: 400.0,
            speed_inheritance: 0.5,
        }
    }
}

/// Wind cycle tuning.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct WindConfig {
    /// When false, the cycle stops recomputing and the host drives the
    /// `Wind` resource itself.
    pub auto_cycle: bool,
    /// Time for one full clockwise revolution of the wind direction (ms).
    pub period_ms: u64,
    /// Power when the wind blows along the east-west axis (the cycle floor).
    pub min_power: f32,
    /// Power when the wind blows along the north-south axis.
    pub max_power: f32,
    /// Flat bonus applied while the wind is close to due east or due west.
    pub axis_bonus: f32,
    /// Half-width of the east/west bonus band (degrees).
    pub axis_bonus_band_deg: f32,
    /// Bound of the per-tick random power jitter.
    pub jitter: f32,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            auto_cycle: true,
            period_ms: 300_000, // full revolution every 5 minutes
            min_power: 0.4,
            max_power: 1.0,
            axis_bonus: 0.15,
            axis_bonus_band_deg: 30.0,
            jitter: 0.05,
        }
    }
}
