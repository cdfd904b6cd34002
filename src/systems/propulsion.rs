//! Wind-driven propulsion and drag.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::components::{ModuleRack, Vessel};
use crate::events::VesselStopped;
use crate::resources::{VesselPhysicsConfig, Wind};
use crate::utils::frame::heading_of;

/// Physics-based propulsion system.
///
/// **Force model:**
/// ```text
/// F_thrust = thrust_force * wind.power * aggregate_efficiency * forward
/// v'       = v * (1 - drag * dt),  drag relieved by openness and momentum
/// ```
///
/// Thrust is always applied along the vessel's heading, never along the wind
/// vector: wind and trim only scale the magnitude, so steering is governed
/// solely by the rudder. Aggregate efficiency is the openness- and
/// health-weighted mean over open sails, floored so any open sail yields
/// some thrust. With every sail furled and speed below the stop threshold,
/// velocity is forced to exactly zero and momentum resets: a dead ship
/// does not drift forever.
pub fn propulsion_system(
    wind: Res<Wind>,
    config: Res<VesselPhysicsConfig>,
    time: Res<Time>,
    mut stopped: EventWriter<VesselStopped>,
    mut query: Query<(
        Entity,
        &mut Vessel,
        &ModuleRack,
        &Transform,
        &mut ExternalForce,
        &mut LinearVelocity,
    )>,
) {
    let dt = time.delta_secs();

    for (entity, mut vessel, rack, transform, mut force, mut lin_vel) in &mut query {
        let heading = heading_of(transform);

        let aggregate = aggregate_sail_efficiency(rack, wind.direction, heading, &config);
        let thrust = config.thrust_force * wind.power * aggregate;
        vessel.forward_force = thrust;
        *force = ExternalForce::new(Vec2::from_angle(heading) * thrust);

        // Drag as a velocity multiplier. Open canvas and built-up momentum
        // both shed less speed per tick.
        let avg_openness = rack.average_openness();
        let relief = (1.0 - config.openness_drag_relief * (avg_openness / 100.0))
            * (1.0 - config.momentum_drag_relief * vessel.momentum);
        let drag = config.base_drag * relief;
        lin_vel.0 *= (1.0 - drag * dt).max(0.0);

        if avg_openness == 0.0 && lin_vel.0.length() < config.stop_speed_threshold {
            if lin_vel.0 != Vec2::ZERO {
                stopped.send(VesselStopped { vessel: entity });
                lin_vel.0 = Vec2::ZERO;
            }
            vessel.momentum = 0.0;
        }
    }
}

/// Aggregate efficiency over open sails: each sail's efficiency weighted by
/// its openness and health, averaged, then floored so any open sail yields
/// some thrust. Returns 0.0 with every sail furled.
pub fn aggregate_sail_efficiency(
    rack: &ModuleRack,
    wind_direction: f32,
    heading: f32,
    config: &VesselPhysicsConfig,
) -> f32 {
    let mut weighted = 0.0;
    let mut open_sails = 0;
    for (module, sail) in rack.sails() {
        if !sail.is_open() {
            continue;
        }
        weighted +=
            sail.efficiency(wind_direction, heading) * (sail.openness / 100.0) * module.health_ratio();
        open_sails += 1;
    }
    if open_sails == 0 {
        return 0.0;
    }
    (weighted / open_sails as f32).max(config.min_fleet_efficiency)
}
