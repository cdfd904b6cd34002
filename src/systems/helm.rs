//! Helm input buffering and rudder/turning dynamics.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::components::{ModuleRack, SteerCommand, Vessel};
use crate::resources::VesselPhysicsConfig;

/// Buffered command state for the simulation's fixed-timestep systems.
///
/// The host fills this each frame (from whatever input or AI layer it has);
/// the fixed schedule consumes it. Steering and trim orders are level state,
/// held until replaced. Fire, aim, and openness commands are one-shot and
/// cleared by [`consume_helm_input`] at the end of every tick.
#[derive(Resource, Debug, Default)]
pub struct HelmInputBuffer {
    /// Held rudder order.
    pub rudder: SteerCommand,
    /// Held sail-trim order.
    pub trim: SteerCommand,
    /// One-shot absolute sail openness, percent.
    pub set_openness: Option<f32>,
    /// One-shot order to fire all loaded cannons this tick.
    pub fire: bool,
    /// Optional world point the cannons aim at before firing.
    pub aim_target: Option<Vec2>,
}

impl HelmInputBuffer {
    /// Orders the rudder to port, starboard, or center.
    pub fn apply_rudder(&mut self, command: SteerCommand) {
        self.rudder = command;
    }

    /// Orders the sails trimmed to port, starboard, or held.
    pub fn rotate_sails(&mut self, command: SteerCommand) {
        self.trim = command;
    }

    /// Sets every sail's openness to the given percentage this tick.
    pub fn adjust_sails(&mut self, percent: f32) {
        self.set_openness = Some(percent);
    }

    pub fn open_sails(&mut self) {
        self.adjust_sails(100.0);
    }

    pub fn close_sails(&mut self) {
        self.adjust_sails(0.0);
    }

    /// Orders all loaded cannons to fire this tick, optionally aiming at a
    /// world point first.
    pub fn fire_cannons(&mut self, target: Option<Vec2>) {
        self.fire = true;
        self.aim_target = target;
    }
}

/// Rudder, momentum, and turning system.
///
/// Steering orders are honored only while a character mans the wheel; sail
/// orders are not gated. Torque is applied as an angular velocity change,
/// only with way on or with canvas showing, and the result is capped at the
/// configured maximum angular speed.
pub fn helm_system(
    input: Res<HelmInputBuffer>,
    config: Res<VesselPhysicsConfig>,
    time: Res<Time>,
    mut query: Query<(
        &mut Vessel,
        &mut ModuleRack,
        &LinearVelocity,
        &mut AngularVelocity,
    )>,
) {
    let dt = time.delta_secs();

    for (mut vessel, mut rack, lin_vel, mut ang_vel) in &mut query {
        let speed = lin_vel.0.length();

        let steer = if rack.wheel_manned() {
            input.rudder
        } else {
            SteerCommand::Center
        };
        vessel.steer(steer, speed, &config, dt);
        vessel.absorb_speed(speed, &config, dt);

        // Sail orders.
        let trim_step = match input.trim {
            SteerCommand::Port => config.trim_rate * dt,
            SteerCommand::Starboard => -config.trim_rate * dt,
            SteerCommand::Center => 0.0,
        };
        for sail in rack.sails_mut() {
            if trim_step != 0.0 {
                sail.trim_by(trim_step);
            }
            if let Some(percent) = input.set_openness {
                sail.set_openness(percent);
            }
        }

        // Turning torque: rudder deflection scaled down by momentum and by
        // furled sails, with floors so the vessel can always pivot once
        // canvas is up. Port rudder (negative) yaws the bow to port (CCW).
        let sail_factor = config.min_sail_turn_factor
            + (1.0 - config.min_sail_turn_factor) * (rack.average_openness() / 100.0);
        let torque = -vessel.rudder_angle.to_radians()
            * config.turn_torque
            * vessel.turn_effectiveness(&config)
            * sail_factor
            * rack.wheel_health_ratio();
        vessel.turning_force = torque;

        if speed > config.turn_speed_threshold || rack.any_sail_open() {
            ang_vel.0 += torque * dt;
        }
        ang_vel.0 = ang_vel.0.clamp(-config.max_angular_speed, config.max_angular_speed);
    }
}

/// Clears one-shot commands after the tick's systems have seen them.
/// Held steering and trim orders persist until the host replaces them.
pub fn consume_helm_input(mut input: ResMut<HelmInputBuffer>) {
    input.fire = false;
    input.aim_target = None;
    input.set_openness = None;
}
