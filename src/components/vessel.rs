//! The vessel's helm and inertia state.

use bevy::prelude::*;

use crate::resources::config::VesselPhysicsConfig;

/// Maximum rudder deflection, degrees. Port is negative.
pub const MAX_RUDDER_DEG: f32 = 30.0;

/// A steering order for the rudder or the sail trim, held until the
/// collaborator issues a different one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum SteerCommand {
    Port,
    Starboard,
    #[default]
    Center,
}

/// Simulation state for a sailing vessel.
///
/// Position, velocity, and heading live on the avian2d rigid body; this
/// component holds only what the physics engine does not: rudder deflection,
/// the momentum proxy, and the forces computed last tick (for the host's
/// instruments). Every numeric field is clamped on write, so callers can
/// never observe out-of-range state.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct Vessel {
    /// Rudder deflection in degrees, clamped to ±[`MAX_RUDDER_DEG`].
    pub rudder_angle: f32,
    /// Smoothed speed proxy in [0, 1]; a fast vessel resists turning.
    pub momentum: f32,
    /// Forward thrust applied last tick (Newtons).
    pub forward_force: f32,
    /// Turning impulse applied last tick (rad/s^2).
    pub turning_force: f32,
}

impl Vessel {
    /// Steps the rudder toward the given order.
    ///
    /// The slew rate grows with speed: a vessel with way on answers the helm
    /// faster. With no order the rudder self-centers, snapping to zero once
    /// within a single step.
    pub fn steer(&mut self, command: SteerCommand, speed: f32, config: &VesselPhysicsConfig, dt: f32) {
        let speed_factor = 1.0 + speed * config.rudder_speed_scale;
        match command {
            SteerCommand::Port => {
                let step = config.rudder_rate * speed_factor * dt;
                self.rudder_angle = (self.rudder_angle - step).clamp(-MAX_RUDDER_DEG, MAX_RUDDER_DEG);
            }
            SteerCommand::Starboard => {
                let step = config.rudder_rate * speed_factor * dt;
                self.rudder_angle = (self.rudder_angle + step).clamp(-MAX_RUDDER_DEG, MAX_RUDDER_DEG);
            }
            SteerCommand::Center => {
                let step = config.rudder_center_rate * speed_factor * dt;
                if self.rudder_angle.abs() <= step {
                    self.rudder_angle = 0.0;
                } else {
                    self.rudder_angle -= step * self.rudder_angle.signum();
                }
            }
        }
    }

    /// Updates the momentum proxy: exponential decay plus speed-proportional
    /// gain, saturating at 1.
    pub fn absorb_speed(&mut self, speed: f32, config: &VesselPhysicsConfig, dt: f32) {
        let decayed = self.momentum * (-config.momentum_decay * dt).exp();
        self.momentum = (decayed + speed * config.momentum_gain * dt).min(1.0);
    }

    /// Turning effectiveness at the current momentum: high momentum resists
    /// turning, down to a configured floor.
    pub fn turn_effectiveness(&self, config: &VesselPhysicsConfig) -> f32 {
        (1.0 - self.momentum * config.momentum_turn_penalty).max(config.min_turn_effectiveness)
    }
}
