//! Deck modules: sails, cannons, and the ship's wheel.
//!
//! Modules are a closed set of variants behind one struct, keyed by id in a
//! [`ModuleRack`]. The rack snaps mount positions to canonical slots at
//! registration time, so a module's stored position is authoritative for
//! both drawing and deck obstacle exclusion, with no side cache to
//! fall out of sync.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::resources::config::CannonConfig;
use crate::utils::frame::{shortest_arc_degrees, wrap_degrees};

/// Maximum sail trim offset from the mast, degrees.
pub const MAX_TRIM_DEG: f32 = 75.0;
/// Maximum turret deflection from the mount's rest orientation, degrees.
pub const MAX_TURRET_SWING_DEG: f32 = 45.0;
/// Sail efficiency floor, reached 90 degrees off the wind and held beyond.
pub const EFFICIENCY_FLOOR: f32 = 0.35;
/// Mount positions within this distance of a canonical slot snap to it.
pub const SLOT_SNAP_TOLERANCE: f32 = 10.0;
/// Half-extent of the walkability box around modules mounted off-slot.
pub const LOOSE_MODULE_HALF_EXTENT: f32 = 6.0;

/// Sail deployment and trim.
#[derive(Debug, Clone, Default, Reflect)]
pub struct SailState {
    /// Deployment percentage in [0, 100]; 0 = furled.
    pub openness: f32,
    /// Rotation offset from the mast in degrees, clamped to ±[`MAX_TRIM_DEG`].
    pub trim_angle: f32,
}

impl SailState {
    /// Sets deployment, clamped to [0, 100].
    pub fn set_openness(&mut self, percent: f32) {
        self.openness = percent.clamp(0.0, 100.0);
    }

    /// Rotates the trim by a delta, clamped to the trim range.
    pub fn trim_by(&mut self, delta_deg: f32) {
        self.trim_angle = (self.trim_angle + delta_deg).clamp(-MAX_TRIM_DEG, MAX_TRIM_DEG);
    }

    pub fn is_open(&self) -> bool {
        self.openness > 0.0
    }

    /// Efficiency of this sail under the given wind, in [[`EFFICIENCY_FLOOR`], 1].
    ///
    /// The sail's outward normal at zero trim is the bow axis; trim rotates
    /// it. Efficiency is 1.0 with the wind square on the normal, falls
    /// linearly to the floor at 90 degrees off, and stays flat beyond:
    /// sailing against the wind is slow but never impossible, which is what
    /// makes tacking work.
    pub fn efficiency(&self, wind_direction: f32, heading: f32) -> f32 {
        let normal = Vec2::from_angle(heading + self.trim_angle.to_radians());
        let wind = Vec2::from_angle(wind_direction);
        let off_wind_deg = normal.dot(wind).clamp(-1.0, 1.0).acos().to_degrees();
        if off_wind_deg <= 90.0 {
            1.0 - (1.0 - EFFICIENCY_FLOOR) * off_wind_deg / 90.0
        } else {
            EFFICIENCY_FLOOR
        }
    }
}

/// Turret and loading state for one cannon.
#[derive(Debug, Clone, Reflect)]
pub struct CannonState {
    /// Current barrel deflection from the mount, degrees.
    pub turret_angle: f32,
    /// Commanded deflection, degrees, clamped to ±[`MAX_TURRET_SWING_DEG`].
    pub target_turret_angle: f32,
    /// Seconds until the next round chambers. Counts only while unloaded.
    pub cooldown_remaining: f32,
    /// Whether a round is chambered.
    pub loaded: bool,
}

impl Default for CannonState {
    fn default() -> Self {
        Self {
            turret_angle: 0.0,
            target_turret_angle: 0.0,
            cooldown_remaining: 0.0,
            loaded: true,
        }
    }
}

impl CannonState {
    /// Rotates the barrel toward the commanded angle along the shorter arc.
    ///
    /// Snaps exactly onto the target once within a single step, so the
    /// barrel never oscillates around it.
    pub fn converge(&mut self, rate_deg_per_sec: f32, dt: f32) {
        let step = rate_deg_per_sec * dt;
        let diff = shortest_arc_degrees(self.turret_angle, self.target_turret_angle);
        if diff.abs() <= step {
            self.turret_angle = self.target_turret_angle;
        } else {
            self.turret_angle += step * diff.signum();
        }
    }

    /// Ticks the reload countdown; rechambers when it expires.
    pub fn reload_tick(&mut self, dt: f32) {
        if self.loaded {
            return;
        }
        self.cooldown_remaining -= dt;
        if self.cooldown_remaining <= 0.0 {
            self.cooldown_remaining = 0.0;
            self.loaded = true;
        }
    }

    /// Points the turret at a vessel-local target.
    ///
    /// The commanded deflection is recomputed from scratch from the mount
    /// position and clamped to the swivel range, so repeated calls cannot
    /// accumulate error. Cannons cannot swivel full circle.
    pub fn aim_at(&mut self, mount_position: Vec2, base_rotation_deg: f32, local_target: Vec2) {
        let to_target = local_target - mount_position;
        if to_target.length_squared() < 1e-6 {
            return;
        }
        let bearing_deg = to_target.y.atan2(to_target.x).to_degrees();
        // The muzzle rests at base rotation + 180 degrees; the deflection is
        // measured against that rest bearing.
        let deflection = wrap_degrees(bearing_deg - base_rotation_deg - 180.0);
        self.target_turret_angle = deflection.clamp(-MAX_TURRET_SWING_DEG, MAX_TURRET_SWING_DEG);
    }

    /// Consumes the chambered round and starts the reload countdown.
    ///
    /// Returns false, and does nothing, while unloaded; an empty cannon is
    /// a refusal, not an error.
    pub fn try_fire(&mut self, reload_time: f32) -> bool {
        if !self.loaded {
            return false;
        }
        self.loaded = false;
        self.cooldown_remaining = reload_time;
        true
    }
}

/// The ship's wheel.
#[derive(Debug, Clone, Default, Reflect)]
pub struct WheelState {
    /// Displayed wheel angle, mirroring the vessel's rudder angle (degrees).
    pub angle: f32,
    /// Whether a character is at the wheel. Steering orders require one.
    pub manned: bool,
}

/// The closed set of module variants.
#[derive(Debug, Clone, Reflect)]
pub enum ModuleKind {
    Sail(SailState),
    Cannon(CannonState),
    Wheel(WheelState),
}

/// A mounted deck module.
#[derive(Debug, Clone, Reflect)]
pub struct ShipModule {
    /// Mount position in the vessel-local frame. Authoritative for both
    /// drawing and deck obstacle exclusion.
    pub position: Vec2,
    /// Rest orientation of the mount, degrees in the local frame.
    pub base_rotation: f32,
    /// Current hit points. Degrades the module's contribution, never removes it.
    pub health: f32,
    /// Maximum hit points.
    pub max_health: f32,
    /// True once the position has snapped to a canonical slot.
    pub canonical: bool,
    pub kind: ModuleKind,
}

impl ShipModule {
    fn new(kind: ModuleKind, position: Vec2, base_rotation: f32) -> Self {
        Self {
            position,
            base_rotation,
            health: 100.0,
            max_health: 100.0,
            canonical: false,
            kind,
        }
    }

    pub fn sail(position: Vec2) -> Self {
        Self::new(ModuleKind::Sail(SailState::default()), position, 0.0)
    }

    pub fn cannon(position: Vec2, base_rotation: f32) -> Self {
        Self::new(ModuleKind::Cannon(CannonState::default()), position, base_rotation)
    }

    pub fn wheel(position: Vec2) -> Self {
        Self::new(ModuleKind::Wheel(WheelState::default()), position, 0.0)
    }

    /// Returns the ratio of current health to max health (0.0 to 1.0).
    pub fn health_ratio(&self) -> f32 {
        if self.max_health > 0.0 {
            (self.health / self.max_health).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Applies damage, saturating at zero.
    pub fn apply_damage(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
    }

    pub fn is_destroyed(&self) -> bool {
        self.health <= 0.0
    }

    /// Per-tick module update: turret convergence and reload for cannons,
    /// rudder mirroring for the wheel. Sails have no time-dependent state.
    pub fn update(&mut self, dt: f32, rudder_angle: f32, cannons: &CannonConfig) {
        match &mut self.kind {
            ModuleKind::Sail(_) => {}
            ModuleKind::Cannon(cannon) => {
                cannon.converge(cannons.rotation_rate, dt);
                cannon.reload_tick(dt);
            }
            ModuleKind::Wheel(wheel) => {
                wheel.angle = rudder_angle;
            }
        }
    }
}

/// Geometry of a canonical slot's deck obstacle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlotFootprint {
    /// A mast: circular obstacle.
    Mast { radius: f32 },
    /// A fitted mount (wheel pedestal, cannon bay): rectangular obstacle.
    Mount { half_extents: Vec2 },
}

/// A fixed, predefined mount position that modules snap to.
#[derive(Debug, Clone, Copy)]
pub struct CanonicalSlot {
    pub name: &'static str,
    /// Slot position in the vessel-local frame (+X bow, +Y port).
    pub position: Vec2,
    /// Rest orientation given to modules mounted here, degrees.
    pub base_rotation: f32,
    pub footprint: SlotFootprint,
}

/// The standard slot layout: two masts on the centerline, the wheel aft,
/// and two cannon bays per broadside. Cannon rest orientations face
/// inboard; the muzzle points 180 degrees from them, off the rail.
pub const CANONICAL_SLOTS: &[CanonicalSlot] = &[
    CanonicalSlot {
        name: "foremast",
        position: Vec2::new(45.0, 0.0),
        base_rotation: 0.0,
        footprint: SlotFootprint::Mast { radius: 9.0 },
    },
    CanonicalSlot {
        name: "mainmast",
        position: Vec2::new(-30.0, 0.0),
        base_rotation: 0.0,
        footprint: SlotFootprint::Mast { radius: 10.0 },
    },
    CanonicalSlot {
        name: "wheel",
        position: Vec2::new(-70.0, 0.0),
        base_rotation: 0.0,
        footprint: SlotFootprint::Mount { half_extents: Vec2::new(7.0, 5.0) },
    },
    CanonicalSlot {
        name: "port_bow_cannon",
        position: Vec2::new(20.0, 26.0),
        base_rotation: -90.0,
        footprint: SlotFootprint::Mount { half_extents: Vec2::new(9.0, 4.0) },
    },
    CanonicalSlot {
        name: "port_stern_cannon",
        position: Vec2::new(-40.0, 26.0),
        base_rotation: -90.0,
        footprint: SlotFootprint::Mount { half_extents: Vec2::new(9.0, 4.0) },
    },
    CanonicalSlot {
        name: "starboard_bow_cannon",
        position: Vec2::new(20.0, -26.0),
        base_rotation: 90.0,
        footprint: SlotFootprint::Mount { half_extents: Vec2::new(9.0, 4.0) },
    },
    CanonicalSlot {
        name: "starboard_stern_cannon",
        position: Vec2::new(-40.0, -26.0),
        base_rotation: 90.0,
        footprint: SlotFootprint::Mount { half_extents: Vec2::new(9.0, 4.0) },
    },
];

/// The vessel's mounted modules, keyed by id.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct ModuleRack {
    modules: HashMap<String, ShipModule>,
}

impl ModuleRack {
    /// The standard loadout: a sail on each mast, the wheel, and four
    /// cannons, all at canonical slots.
    pub fn standard_loadout() -> Self {
        let mut rack = Self::default();
        rack.add("foremast_sail", ShipModule::sail(Vec2::new(45.0, 0.0)));
        rack.add("mainmast_sail", ShipModule::sail(Vec2::new(-30.0, 0.0)));
        rack.add("wheel", ShipModule::wheel(Vec2::new(-70.0, 0.0)));
        rack.add("port_bow_cannon", ShipModule::cannon(Vec2::new(20.0, 26.0), -90.0));
        rack.add("port_stern_cannon", ShipModule::cannon(Vec2::new(-40.0, 26.0), -90.0));
        rack.add("starboard_bow_cannon", ShipModule::cannon(Vec2::new(20.0, -26.0), 90.0));
        rack.add("starboard_stern_cannon", ShipModule::cannon(Vec2::new(-40.0, -26.0), 90.0));
        rack
    }

    /// Mounts a module under the given id.
    ///
    /// A position within [`SLOT_SNAP_TOLERANCE`] of a canonical slot snaps
    /// to the slot's exact coordinates and adopts its rest orientation, so
    /// collision and visuals stay aligned however the module was
    /// constructed. Off-slot modules keep their position and become small
    /// square deck obstacles.
    pub fn add(&mut self, id: impl Into<String>, mut module: ShipModule) {
        if let Some(slot) = CANONICAL_SLOTS
            .iter()
            .find(|slot| slot.position.distance(module.position) <= SLOT_SNAP_TOLERANCE)
        {
            module.position = slot.position;
            module.base_rotation = slot.base_rotation;
            module.canonical = true;
        } else {
            module.canonical = false;
        }
        self.modules.insert(id.into(), module);
    }

    /// Unmounts and returns the module, if present.
    pub fn remove(&mut self, id: &str) -> Option<ShipModule> {
        self.modules.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&ShipModule> {
        self.modules.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut ShipModule> {
        self.modules.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ShipModule)> {
        self.modules.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut ShipModule)> {
        self.modules.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// All mounted sails with their owning modules.
    pub fn sails(&self) -> impl Iterator<Item = (&ShipModule, &SailState)> {
        self.modules.values().filter_map(|module| match &module.kind {
            ModuleKind::Sail(sail) => Some((module, sail)),
            _ => None,
        })
    }

    /// Mutable access to every sail.
    pub fn sails_mut(&mut self) -> impl Iterator<Item = &mut SailState> {
        self.modules.values_mut().filter_map(|module| match &mut module.kind {
            ModuleKind::Sail(sail) => Some(sail),
            _ => None,
        })
    }

    /// Average openness across all sails, 0 when none are mounted.
    pub fn average_openness(&self) -> f32 {
        let mut total = 0.0;
        let mut count = 0;
        for (_, sail) in self.sails() {
            total += sail.openness;
            count += 1;
        }
        if count == 0 {
            0.0
        } else {
            total / count as f32
        }
    }

    pub fn any_sail_open(&self) -> bool {
        self.sails().any(|(_, sail)| sail.is_open())
    }

    fn wheel_mut(&mut self) -> Option<&mut WheelState> {
        self.modules.values_mut().find_map(|module| match &mut module.kind {
            ModuleKind::Wheel(wheel) => Some(wheel),
            _ => None,
        })
    }

    /// Whether a character currently operates the wheel.
    pub fn wheel_manned(&self) -> bool {
        self.modules.values().any(|module| {
            matches!(&module.kind, ModuleKind::Wheel(wheel) if wheel.manned)
        })
    }

    /// Puts a character at the wheel. Returns false if no wheel is mounted.
    pub fn take_wheel(&mut self) -> bool {
        match self.wheel_mut() {
            Some(wheel) => {
                wheel.manned = true;
                true
            }
            None => false,
        }
    }

    /// Releases the wheel.
    pub fn release_wheel(&mut self) {
        if let Some(wheel) = self.wheel_mut() {
            wheel.manned = false;
        }
    }

    /// Steering-gear health: the wheel module's ratio, 1.0 with no wheel
    /// mounted (steering is already gated on occupancy).
    pub fn wheel_health_ratio(&self) -> f32 {
        self.modules
            .values()
            .find(|module| matches!(module.kind, ModuleKind::Wheel(_)))
            .map(ShipModule::health_ratio)
            .unwrap_or(1.0)
    }

    /// Damages a module by id. Returns false if the id is unknown.
    pub fn damage_module(&mut self, id: &str, amount: f32) -> bool {
        match self.modules.get_mut(id) {
            Some(module) => {
                module.apply_damage(amount);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sail_clamps_on_write() {
        let mut sail = SailState::default();
        sail.set_openness(250.0);
        assert_eq!(sail.openness, 100.0);
        sail.set_openness(-10.0);
        assert_eq!(sail.openness, 0.0);

        for _ in 0..100 {
            sail.trim_by(20.0);
        }
        assert_eq!(sail.trim_angle, MAX_TRIM_DEG);
        for _ in 0..100 {
            sail.trim_by(-20.0);
        }
        assert_eq!(sail.trim_angle, -MAX_TRIM_DEG);
    }

    #[test]
    fn test_efficiency_peaks_running_downwind() {
        // Heading east, wind blowing east, zero trim: wind square on the sail.
        let sail = SailState {
            openness: 100.0,
            trim_angle: 0.0,
        };
        let efficiency = sail.efficiency(0.0, 0.0);
        assert!((efficiency - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_efficiency_monotonic_then_flat() {
        let sail = SailState {
            openness: 100.0,
            trim_angle: 0.0,
        };

        // Non-increasing from 0 to 90 degrees off the wind.
        let mut previous = f32::INFINITY;
        for deg in 0..=90 {
            let wind = (deg as f32).to_radians();
            let efficiency = sail.efficiency(wind, 0.0);
            assert!(efficiency <= previous + 1e-5);
            previous = efficiency;
        }
        // Floor at 90 and flat beyond.
        assert!((sail.efficiency(std::f32::consts::FRAC_PI_2, 0.0) - EFFICIENCY_FLOOR).abs() < 1e-4);
        for deg in [120.0_f32, 150.0, 180.0] {
            let efficiency = sail.efficiency(deg.to_radians(), 0.0);
            assert!((efficiency - EFFICIENCY_FLOOR).abs() < 1e-4);
        }
    }

    #[test]
    fn test_trim_rotates_the_peak() {
        // Wind from the port quarter; trimming toward it recovers efficiency.
        let flat = SailState {
            openness: 100.0,
            trim_angle: 0.0,
        };
        let trimmed = SailState {
            openness: 100.0,
            trim_angle: 45.0,
        };
        let wind = 45.0_f32.to_radians();
        assert!(trimmed.efficiency(wind, 0.0) > flat.efficiency(wind, 0.0));
    }

    #[test]
    fn test_turret_converges_without_overshoot() {
        let mut cannon = CannonState {
            turret_angle: -40.0,
            target_turret_angle: 40.0,
            ..Default::default()
        };

        // A step of exactly one degree per tick keeps the arithmetic exact.
        let rate = 4.0; // deg/s
        let dt = 0.25;
        let step = rate * dt;
        let ticks_needed = (80.0 / step).ceil() as usize;

        for tick in 0..ticks_needed {
            assert_ne!(
                cannon.turret_angle, cannon.target_turret_angle,
                "converged early at tick {tick}"
            );
            cannon.converge(rate, dt);
            assert!(cannon.turret_angle <= cannon.target_turret_angle + step);
        }
        assert_eq!(cannon.turret_angle, 40.0, "must land exactly on target");

        // Holding after convergence does not oscillate.
        cannon.converge(rate, dt);
        assert_eq!(cannon.turret_angle, 40.0);
    }

    #[test]
    fn test_turret_takes_shorter_arc() {
        let mut cannon = CannonState {
            turret_angle: 170.0,
            target_turret_angle: -170.0,
            ..Default::default()
        };
        cannon.converge(40.0, 1.0 / 60.0);
        // Shorter arc crosses 180, so the angle keeps growing.
        assert!(cannon.turret_angle > 170.0);
    }

    #[test]
    fn test_aim_clamps_to_swivel_range() {
        let mut cannon = CannonState::default();
        // Port-side cannon: rest at -90, muzzle out at +90.
        let mount = Vec2::new(20.0, 26.0);

        // Target directly off the port rail: zero deflection.
        cannon.aim_at(mount, -90.0, Vec2::new(20.0, 200.0));
        assert!(cannon.target_turret_angle.abs() < 1e-4);

        // Target dead ahead: far outside the swivel range, clamps.
        cannon.aim_at(mount, -90.0, Vec2::new(500.0, 26.0));
        assert_eq!(cannon.target_turret_angle.abs(), MAX_TURRET_SWING_DEG);

        // Repeated aiming at the same target is stable.
        cannon.aim_at(mount, -90.0, Vec2::new(60.0, 200.0));
        let first = cannon.target_turret_angle;
        cannon.aim_at(mount, -90.0, Vec2::new(60.0, 200.0));
        assert_eq!(cannon.target_turret_angle, first);
    }

    #[test]
    fn test_fire_gated_by_loading() {
        let mut cannon = CannonState::default();
        assert!(cannon.try_fire(2.0));
        assert!(!cannon.loaded);
        assert!(!cannon.try_fire(2.0), "unloaded cannon must refuse");

        // Reload over 2 simulated seconds.
        for _ in 0..121 {
            cannon.reload_tick(1.0 / 60.0);
        }
        assert!(cannon.loaded);
        assert!(cannon.try_fire(2.0));
    }

    #[test]
    fn test_rack_snaps_to_canonical_slots() {
        let mut rack = ModuleRack::default();

        // Near the foremast: snaps to its exact coordinates.
        rack.add("sail", ShipModule::sail(Vec2::new(41.0, 3.0)));
        let module = rack.get("sail").unwrap();
        assert!(module.canonical);
        assert_eq!(module.position, Vec2::new(45.0, 0.0));

        // Mid-deck: no slot within tolerance, position kept.
        rack.add("crate", ShipModule::cannon(Vec2::new(0.0, 12.0), 0.0));
        let module = rack.get("crate").unwrap();
        assert!(!module.canonical);
        assert_eq!(module.position, Vec2::new(0.0, 12.0));
    }

    #[test]
    fn test_rack_wheel_occupancy() {
        let mut rack = ModuleRack::default();
        assert!(!rack.take_wheel(), "no wheel mounted yet");

        rack.add("wheel", ShipModule::wheel(Vec2::new(-70.0, 0.0)));
        assert!(!rack.wheel_manned());
        assert!(rack.take_wheel());
        assert!(rack.wheel_manned());
        rack.release_wheel();
        assert!(!rack.wheel_manned());
    }

    #[test]
    fn test_rack_openness_aggregates() {
        let mut rack = ModuleRack::standard_loadout();
        assert_eq!(rack.average_openness(), 0.0);
        assert!(!rack.any_sail_open());

        for sail in rack.sails_mut() {
            sail.set_openness(50.0);
        }
        assert!((rack.average_openness() - 50.0).abs() < 1e-5);
        assert!(rack.any_sail_open());
    }

    #[test]
    fn test_module_damage_saturates() {
        let mut rack = ModuleRack::standard_loadout();
        assert!(rack.damage_module("foremast_sail", 250.0));
        let sail = rack.get("foremast_sail").unwrap();
        assert_eq!(sail.health, 0.0);
        assert!(sail.is_destroyed());
        assert!(!rack.damage_module("no_such_module", 10.0));
    }
}
