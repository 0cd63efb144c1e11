use crate::agents::vehicle::Vehicle;
use crate::barrier::step_barrier::Tick;
use crate::conflicts::matrix::ConflictMatrix;
use crate::log_additional;
use crate::map::position::Position;
use crate::sync::priority::PRIORITY_AMBULANCE;
use crate::traffic_lights::controller::TrafficLight;
use crate::verbose::{EVENT_LIGHT_OVERRIDE, EVENT_PREEMPT_REQUEST};
use crate::zones::table::ZoneTable;
use crate::zones::zone::zone_for;
use std::sync::Arc;

/// An ambulance this close to its deadline bypasses the red light and takes
/// its zone reservation blockingly.
pub const AMBULANCE_OVERRIDE_WINDOW: Tick = 2;

/// An ambulance this close to its deadline is raised to the maximum
/// priority and announces a preemption request.
pub const AMBULANCE_PREEMPT_WINDOW: Tick = 1;

/// Combines traffic-light permission, conflict-matrix safety, intersection
/// capacity and zone reservation into one entry decision.
///
/// A `true` result means the target zone has been reserved for the vehicle;
/// the caller owns that reservation and must release it through the zone
/// table when the vehicle vacates the zone's cells.
#[derive(Debug)]
pub struct AdmissionController {
    traffic_light: Arc<TrafficLight>,
    zones: Arc<ZoneTable>,
    conflicts: Arc<ConflictMatrix>,
}

impl AdmissionController {
    pub fn new(
        traffic_light: Arc<TrafficLight>,
        zones: Arc<ZoneTable>,
        conflicts: Arc<ConflictMatrix>,
    ) -> Self {
        Self {
            traffic_light,
            zones,
            conflicts,
        }
    }

    /// Decides whether `vehicle` may move to `next_pos` this tick.
    ///
    /// Decision order:
    /// 1. Moves outside any zone are always allowed; only the cell lock
    ///    arbitrates them.
    /// 2. The traffic light must permit the move's axis. A denied normal
    ///    vehicle is done; a denied ambulance continues only inside the
    ///    override window.
    /// 3. Ambulances reserve at their (possibly maxed) priority, blockingly
    ///    inside the override window, and skip the conflict check.
    /// 4. Normal vehicles pass the conflict check and then try a
    ///    non-blocking reservation; capacity is taken before the zone lock
    ///    and restored if the zone lock loses the race.
    pub fn can_enter_intersection(
        &self,
        vehicle: &Vehicle,
        next_pos: Position,
        step: Tick,
    ) -> bool {
        let Some(zone) = zone_for(next_pos) else {
            return true;
        };

        if !self
            .traffic_light
            .can_vehicle_proceed(vehicle.position(), next_pos)
        {
            if !vehicle.is_ambulance() {
                return false;
            }
            let remaining = vehicle.remaining_time(step);
            if remaining > AMBULANCE_OVERRIDE_WINDOW {
                return false;
            }
            log_additional!(
                EVENT_LIGHT_OVERRIDE,
                "ambulance overriding red light",
                vehicle = %vehicle.id,
                step = step,
                remaining = remaining
            );
        }

        if vehicle.is_ambulance() {
            let remaining = vehicle.remaining_time(step);
            let mut priority = vehicle.priority(step);
            if remaining <= AMBULANCE_PREEMPT_WINDOW {
                priority = PRIORITY_AMBULANCE + 2;
                self.preempt_normal_vehicles(vehicle, step);
            }
            if remaining <= AMBULANCE_OVERRIDE_WINDOW {
                self.zones.reserve_blocking(vehicle.id, zone, priority);
                return true;
            }
            return self.zones.try_reserve(vehicle.id, zone, priority);
        }

        if !self.conflicts.is_safe(zone, vehicle.id, &self.zones) {
            return false;
        }
        self.zones
            .try_reserve(vehicle.id, zone, vehicle.priority(step))
    }

    /// Observational preemption hook: announces that an ambulance at
    /// maximum urgency is claiming the intersection. Holders are not
    /// evicted; the priority queues do the actual ordering.
    fn preempt_normal_vehicles(&self, ambulance: &Vehicle, step: Tick) {
        log_additional!(
            EVENT_PREEMPT_REQUEST,
            "ambulance requesting priority access",
            vehicle = %ambulance.id,
            step = step
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::vehicle::VehicleKind;
    use crate::map::routes::Gate;
    use crate::zones::table::INTERSECTION_CAPACITY;
    use crate::zones::zone::Zone;

    fn controller() -> AdmissionController {
        AdmissionController::new(
            Arc::new(TrafficLight::new()),
            Arc::new(ZoneTable::new()),
            Arc::new(ConflictMatrix::new()),
        )
    }

    fn normal_at(id: char, pos: Position) -> Vehicle {
        let vehicle = Vehicle::new(id)
            .with_origin(Gate::A)
            .with_destination(Gate::C)
            .build();
        vehicle.set_position(pos);
        vehicle
    }

    fn ambulance_at(id: char, pos: Position, golden_time: Tick) -> Vehicle {
        let vehicle = Vehicle::new(id)
            .with_kind(VehicleKind::Ambulance)
            .with_origin(Gate::A)
            .with_destination(Gate::C)
            .with_arrival(0)
            .with_golden_time(golden_time)
            .build();
        vehicle.set_position(pos);
        vehicle
    }

    #[test]
    fn test_non_zone_move_is_free() {
        let admission = controller();
        let vehicle = normal_at('1', Position::OUTSIDE);
        // First route cell of gate A lies outside every zone.
        assert!(admission.can_enter_intersection(&vehicle, Position::new(4, 0), 0));
        assert_eq!(admission.zones.occupied_count(), 0);
    }

    #[test]
    fn test_red_light_denies_normal_vehicle() {
        let admission = controller();
        // Initial phase is NS green; gate A traffic moves east-west.
        let vehicle = normal_at('1', Position::new(4, 0));
        assert!(!admission.can_enter_intersection(&vehicle, Position::new(4, 1), 0));
        assert_eq!(admission.zones.occupied_count(), 0);
    }

    #[test]
    fn test_green_light_reserves_zone() {
        let admission = controller();
        let vehicle = normal_at('2', Position::new(0, 2));
        assert!(admission.can_enter_intersection(&vehicle, Position::new(1, 2), 0));
        assert_eq!(admission.zones.holder(Zone::NorthEntry), Some('2'));
        assert_eq!(
            admission.zones.capacity_value(),
            INTERSECTION_CAPACITY - 1
        );
    }

    #[test]
    fn test_conflicting_zone_denies_normal_vehicle() {
        let admission = controller();
        // A north-south vehicle occupies the north entry.
        assert!(admission.zones.try_reserve('9', Zone::NorthEntry, 1));

        // Flip the light so an east-west vehicle gets green.
        let cell_locks = crate::grid::cell_locks::CellLockGrid::new();
        let blocked = normal_at('1', Position::new(4, 0));
        blocked.set_state(crate::agents::vehicle::VehicleState::Running);
        blocked.set_waiting_axis(Some(crate::map::position::Axis::EastWest));
        let vehicles =
            crate::agents::vehicles_storage::VehicleTable::from_vehicles(vec![blocked]);
        for step in 0..3 {
            admission.traffic_light.tick(&vehicles, &cell_locks, step);
        }

        // Green now, but the crossing axis holds a zone: conflict denies.
        let vehicle = normal_at('1', Position::new(4, 0));
        assert!(!admission.can_enter_intersection(&vehicle, Position::new(4, 1), 3));
        assert_eq!(admission.zones.holder(Zone::WestEntry), None);
    }

    #[test]
    fn test_distant_deadline_ambulance_respects_red() {
        let admission = controller();
        let vehicle = ambulance_at('9', Position::new(4, 0), 20);
        assert!(!admission.can_enter_intersection(&vehicle, Position::new(4, 1), 0));
    }

    #[test]
    fn test_urgent_ambulance_overrides_red() {
        let admission = controller();
        // Two ticks of slack left: the override window applies, the light
        // check is bypassed and the zone is reserved blockingly.
        let vehicle = ambulance_at('9', Position::new(4, 0), 5);
        assert!(admission.can_enter_intersection(&vehicle, Position::new(4, 1), 3));
        assert_eq!(admission.zones.holder(Zone::WestEntry), Some('9'));
    }

    #[test]
    fn test_ambulance_ignores_conflict_matrix() {
        let admission = controller();
        assert!(admission.zones.try_reserve('8', Zone::NorthEntry, 1));
        // A west-entry reservation conflicts for a normal vehicle, but an
        // ambulance with green (after emergency-window flip) skips the
        // conflict check and still gets its zone.
        let vehicle = ambulance_at('9', Position::new(4, 0), 4);
        assert!(admission.can_enter_intersection(&vehicle, Position::new(4, 1), 2));
        assert_eq!(admission.zones.holder(Zone::WestEntry), Some('9'));
    }
}
