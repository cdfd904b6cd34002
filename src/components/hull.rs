//! Hull footprint and deck walkability queries.
//!
//! The hull is one closed curve, defined by six control points and
//! subdivided once into an outline polygon. The walkability test and the
//! rendered boundary both consume that outline, so collision and visuals
//! cannot diverge.

use bevy::prelude::*;

use crate::components::module::{
    ModuleRack, SlotFootprint, CANONICAL_SLOTS, LOOSE_MODULE_HALF_EXTENT,
};
use crate::utils::curve::{point_in_polygon, subdivide_closed_loop};
use crate::utils::frame::{local_to_world, world_to_local};

/// Outline points generated per hull control segment.
pub const HULL_SUBDIVISIONS: usize = 6;

/// Radius step between dismount search rings.
const DISMOUNT_RING_STEP: f32 = 8.0;
/// Directions sampled per ring.
const DISMOUNT_RING_SAMPLES: usize = 12;
/// Rings searched before falling back to the deck center.
const DISMOUNT_MAX_RINGS: usize = 8;

/// The vessel's hull footprint, in the local frame (+X bow, +Y port).
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Hull {
    /// The six defining control points, counter-clockwise from the bow tip.
    control_points: [Vec2; 6],
    /// Subdivided outline, built once from the control points.
    outline: Vec<Vec2>,
}

impl Default for Hull {
    fn default() -> Self {
        Self::standard()
    }
}

impl Hull {
    pub fn new(control_points: [Vec2; 6]) -> Self {
        let outline = subdivide_closed_loop(&control_points, HULL_SUBDIVISIONS);
        Self {
            control_points,
            outline,
        }
    }

    /// The standard hull: a bow tapering to a tip forward, a shorter taper
    /// to the stern post aft, straight rails between.
    pub fn standard() -> Self {
        Self::new([
            Vec2::new(110.0, 0.0),   // bow tip
            Vec2::new(55.0, 30.0),   // bow, port rail
            Vec2::new(-75.0, 30.0),  // stern, port rail
            Vec2::new(-100.0, 0.0),  // stern post
            Vec2::new(-75.0, -30.0), // stern, starboard rail
            Vec2::new(55.0, -30.0),  // bow, starboard rail
        ])
    }

    pub fn control_points(&self) -> &[Vec2; 6] {
        &self.control_points
    }

    /// The shared outline polygon, local space. This is also the boundary
    /// the host draws.
    pub fn outline(&self) -> &[Vec2] {
        &self.outline
    }

    /// Containment against the hull boundary, in local space.
    pub fn contains_local(&self, point: Vec2) -> bool {
        point_in_polygon(point, &self.outline)
    }
}

/// Tests whether a world point is on the walkable deck: inside the hull
/// boundary and outside every obstacle (mast circles, the wheel pedestal,
/// cannon bays, and any module mounted off-slot).
///
/// Pure: callable any number of times within a tick with no side effects.
pub fn is_position_on_deck(
    hull: &Hull,
    rack: &ModuleRack,
    vessel_position: Vec2,
    heading: f32,
    world_point: Vec2,
) -> bool {
    let local = world_to_local(world_point, vessel_position, heading);
    is_walkable_local(hull, rack, local)
}

fn is_walkable_local(hull: &Hull, rack: &ModuleRack, local: Vec2) -> bool {
    if !hull.contains_local(local) {
        return false;
    }
    for slot in CANONICAL_SLOTS {
        if footprint_contains(slot.footprint, slot.position, local) {
            return false;
        }
    }
    // Modules mounted off-slot block a small square at their position.
    for (_, module) in rack.iter() {
        if module.canonical {
            continue;
        }
        let offset = local - module.position;
        if offset.x.abs() <= LOOSE_MODULE_HALF_EXTENT && offset.y.abs() <= LOOSE_MODULE_HALF_EXTENT
        {
            return false;
        }
    }
    true
}

fn footprint_contains(footprint: SlotFootprint, position: Vec2, point: Vec2) -> bool {
    match footprint {
        SlotFootprint::Mast { radius } => position.distance_squared(point) <= radius * radius,
        SlotFootprint::Mount { half_extents } => {
            let offset = point - position;
            offset.x.abs() <= half_extents.x && offset.y.abs() <= half_extents.y
        }
    }
}

/// Finds a walkable position near `start` for dismounting a character.
///
/// A walkable start is returned unchanged. Otherwise concentric rings
/// around it are sampled in local space, nearest first; if no candidate
/// within the search radius is walkable, the deck center is returned (never
/// an obstacle location by construction of the slot layout).
pub fn find_safe_dismount_position(
    hull: &Hull,
    rack: &ModuleRack,
    vessel_position: Vec2,
    heading: f32,
    start: Vec2,
) -> Vec2 {
    if is_position_on_deck(hull, rack, vessel_position, heading, start) {
        return start;
    }

    let local_start = world_to_local(start, vessel_position, heading);
    for ring in 1..=DISMOUNT_MAX_RINGS {
        let radius = ring as f32 * DISMOUNT_RING_STEP;
        for sample in 0..DISMOUNT_RING_SAMPLES {
            let angle = sample as f32 * std::f32::consts::TAU / DISMOUNT_RING_SAMPLES as f32;
            let candidate = local_start + Vec2::from_angle(angle) * radius;
            if is_walkable_local(hull, rack, candidate) {
                return local_to_world(candidate, vessel_position, heading);
            }
        }
    }

    warn!(
        "no walkable dismount spot within {} units of ({:.1}, {:.1}), using deck center",
        DISMOUNT_MAX_RINGS as f32 * DISMOUNT_RING_STEP,
        start.x,
        start.y
    );
    local_to_world(Vec2::ZERO, vessel_position, heading)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::module::ShipModule;

    fn rigged_vessel() -> (Hull, ModuleRack) {
        (Hull::standard(), ModuleRack::standard_loadout())
    }

    #[test]
    fn test_deck_center_is_walkable() {
        let (hull, rack) = rigged_vessel();
        assert!(is_position_on_deck(&hull, &rack, Vec2::ZERO, 0.0, Vec2::ZERO));
    }

    #[test]
    fn test_outside_hull_is_not_walkable() {
        let (hull, rack) = rigged_vessel();
        assert!(!is_position_on_deck(&hull, &rack, Vec2::ZERO, 0.0, Vec2::new(130.0, 0.0)));
        assert!(!is_position_on_deck(&hull, &rack, Vec2::ZERO, 0.0, Vec2::new(0.0, 45.0)));
    }

    #[test]
    fn test_mast_center_never_walkable() {
        let (hull, rack) = rigged_vessel();
        let position = Vec2::new(300.0, -120.0);

        for i in 0..16 {
            let heading = i as f32 / 16.0 * std::f32::consts::TAU;
            // The foremast sits at local (45, 0); place the query right on it.
            let mast_world = local_to_world(Vec2::new(45.0, 0.0), position, heading);
            assert!(
                !is_position_on_deck(&hull, &rack, position, heading, mast_world),
                "mast center walkable at heading {heading}"
            );
        }
    }

    #[test]
    fn test_wheel_pedestal_blocks() {
        let (hull, rack) = rigged_vessel();
        assert!(!is_position_on_deck(&hull, &rack, Vec2::ZERO, 0.0, Vec2::new(-70.0, 0.0)));
        // Just clear of the pedestal is open deck again.
        assert!(is_position_on_deck(&hull, &rack, Vec2::ZERO, 0.0, Vec2::new(-70.0, 12.0)));
    }

    #[test]
    fn test_walkability_is_rotation_invariant() {
        let (hull, rack) = rigged_vessel();
        let samples = [
            Vec2::new(0.0, 0.0),
            Vec2::new(45.0, 0.0),  // foremast
            Vec2::new(20.0, 26.0), // cannon bay
            Vec2::new(-15.0, 15.0),
            Vec2::new(80.0, 0.0),
        ];

        for local in samples {
            let reference = is_walkable_local(&hull, &rack, local);
            for i in 1..12 {
                let heading = i as f32 / 12.0 * std::f32::consts::TAU;
                let world = local_to_world(local, Vec2::new(50.0, 9.0), heading);
                assert_eq!(
                    is_position_on_deck(&hull, &rack, Vec2::new(50.0, 9.0), heading, world),
                    reference,
                    "rotation changed the answer for local {local:?} at heading {heading}"
                );
            }
        }
    }

    #[test]
    fn test_off_slot_module_becomes_obstacle() {
        let (hull, mut rack) = rigged_vessel();
        let spot = Vec2::new(0.0, 14.0);
        assert!(is_position_on_deck(&hull, &rack, Vec2::ZERO, 0.0, spot));

        rack.add("cargo_gun", ShipModule::cannon(spot, 0.0));
        assert!(!is_position_on_deck(&hull, &rack, Vec2::ZERO, 0.0, spot));

        rack.remove("cargo_gun");
        assert!(is_position_on_deck(&hull, &rack, Vec2::ZERO, 0.0, spot));
    }

    #[test]
    fn test_dismount_returns_walkable_start_unchanged() {
        let (hull, rack) = rigged_vessel();
        let start = Vec2::new(10.0, 5.0);
        let result = find_safe_dismount_position(&hull, &rack, Vec2::ZERO, 0.0, start);
        assert_eq!(result, start);

        // The deck center is never an obstacle location, so it comes back
        // unchanged on the first check.
        let center = find_safe_dismount_position(&hull, &rack, Vec2::ZERO, 0.0, Vec2::ZERO);
        assert_eq!(center, Vec2::ZERO);
    }

    #[test]
    fn test_dismount_escapes_an_obstacle() {
        let (hull, rack) = rigged_vessel();
        // Start on the mainmast: blocked, so the search must move off it.
        let start = Vec2::new(-30.0, 0.0);
        let result = find_safe_dismount_position(&hull, &rack, Vec2::ZERO, 0.0, start);
        assert_ne!(result, start);
        assert!(is_position_on_deck(&hull, &rack, Vec2::ZERO, 0.0, result));
        assert!(result.distance(start) < 40.0, "should find a nearby ring hit");
    }

    #[test]
    fn test_dismount_falls_back_to_deck_center() {
        let (hull, rack) = rigged_vessel();
        // Far off the hull: no ring within the search radius reaches the deck.
        let position = Vec2::new(1000.0, 1000.0);
        let start = position + Vec2::new(400.0, 0.0);
        let result = find_safe_dismount_position(&hull, &rack, position, 0.3, start);
        assert_eq!(result, local_to_world(Vec2::ZERO, position, 0.3));
        assert!(is_position_on_deck(&hull, &rack, position, 0.3, result));
    }

    #[test]
    fn test_outline_passes_through_control_points() {
        let hull = Hull::standard();
        // Cardinal subdivision emits each control point at t = 0.
        for control in hull.control_points() {
            assert!(
                hull.outline().iter().any(|p| p.distance(*control) < 1e-4),
                "outline missing control point {control:?}"
            );
        }
    }
}
