use crate::agents::vehicle::{Vehicle, VehicleState};
use crate::agents::vehicles_storage::VehicleTable;
use crate::barrier::step_barrier::Tick;
use crate::grid::cell_locks::CellLockGrid;
use crate::log_main;
use crate::map::position::{Axis, Position};
use crate::sync::condvar::PriorityCondVar;
use crate::sync::mutex::PriorityMutex;
use crate::sync::priority::{PRIORITY_NORMAL_VEHICLE, PRIORITY_TRAFFIC_LIGHT};
use crate::verbose::{EVENT_LIGHT_EMERGENCY, EVENT_LIGHT_PHASE};
use crate::zones::zone::{Zone, zone_for};
use crate::traffic_lights::phase::LightPhase;
use std::sync::Mutex;

/// Minimum number of ticks a phase stays green before a routine flip.
pub const MIN_GREEN_DURATION: Tick = 3;

/// An ambulance within this many ticks of its deadline (and still in time)
/// triggers an emergency phase change when it is blocked on the red axis.
pub const AMBULANCE_EMERGENCY_WINDOW: Tick = 3;

#[derive(Debug)]
struct LightState {
    phase: LightPhase,
    green_duration: Tick,
    flips: u64,
}

/// The crossing's two-phase signal controller.
///
/// Decision paths (the per-tick update, the permission predicate and the
/// blocking wait) are serialised through one priority lock so the light
/// agent at priority [`PRIORITY_TRAFFIC_LIGHT`] is never starved by vehicle
/// queries. The phase fields themselves sit behind a plain mutex so readers
/// get a consistent snapshot.
#[derive(Debug)]
pub struct TrafficLight {
    control: PriorityMutex,
    state: Mutex<LightState>,
    phase_changed: PriorityCondVar,
}

impl Default for TrafficLight {
    fn default() -> Self {
        Self::new()
    }
}

impl TrafficLight {
    /// Creates the controller in its initial state: north-south green,
    /// duration counter at zero.
    pub fn new() -> Self {
        Self {
            control: PriorityMutex::new(),
            state: Mutex::new(LightState {
                phase: LightPhase::NsGreen,
                green_duration: 0,
                flips: 0,
            }),
            phase_changed: PriorityCondVar::new(),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> LightPhase {
        self.state.lock().expect("light state poisoned").phase
    }

    /// Ticks since the last phase change.
    pub fn green_duration(&self) -> Tick {
        self.state
            .lock()
            .expect("light state poisoned")
            .green_duration
    }

    /// Total number of phase changes so far.
    pub fn flips(&self) -> u64 {
        self.state.lock().expect("light state poisoned").flips
    }

    /// Permission predicate: may a vehicle step from `from` to `to` under
    /// the current phase?
    ///
    /// Straight moves are allowed iff their axis matches the green axis;
    /// anything that is not a straight single-cell step is permitted (routes
    /// never produce such moves inside the intersection).
    pub fn can_vehicle_proceed(&self, from: Position, to: Position) -> bool {
        let Some(axis) = from.axis_towards(to) else {
            return true;
        };
        self.control.acquire(PRIORITY_NORMAL_VEHICLE);
        let allowed = self.phase().axis() == axis;
        self.control.release();
        allowed
    }

    /// Blocks the caller until the axis serving its current entry zone is
    /// green. A no-op for vehicles outside an entry zone.
    pub fn wait_for_green(&self, vehicle: &Vehicle, step: Tick) {
        let Some(zone) = zone_for(vehicle.position()) else {
            return;
        };
        let Some(required) = zone.axis() else {
            return;
        };
        let priority = vehicle.priority(step);
        self.control.acquire(priority);
        while self.phase().axis() != required {
            self.phase_changed.wait(&self.control, priority);
        }
        self.control.release();
    }

    /// One tick of the light agent.
    ///
    /// Scans for an ambulance emergency, ages the green, and flips the phase
    /// when the opposing axis holds strictly more blocked vehicles (or the
    /// green axis serves nobody while the red one waits) and the hand-over
    /// is safe. An emergency flip skips both the minimum-green and the
    /// safety gate.
    pub fn tick(&self, vehicles: &VehicleTable, cell_locks: &CellLockGrid, step: Tick) {
        self.control.acquire(PRIORITY_TRAFFIC_LIGHT);

        let phase = self.phase();
        let emergency = ambulance_needs_other_phase(vehicles, phase, step);
        let green_duration = {
            let mut state = self.state.lock().expect("light state poisoned");
            state.green_duration += 1;
            state.green_duration
        };

        let mut should_change = false;
        if emergency {
            should_change = true;
            log_main!(
                EVENT_LIGHT_EMERGENCY,
                "emergency phase change for blocked ambulance",
                step = step
            );
        } else if green_duration >= MIN_GREEN_DURATION {
            let current = blocked_on_axis(vehicles, phase.axis());
            let opposing = blocked_on_axis(vehicles, phase.toggled().axis());
            if opposing > current || (current == 0 && opposing > 0) {
                should_change = safe_to_change(vehicles, cell_locks, phase);
            }
        }

        if should_change {
            let new_phase = {
                let mut state = self.state.lock().expect("light state poisoned");
                state.phase = state.phase.toggled();
                state.green_duration = 0;
                state.flips += 1;
                state.phase
            };
            log_main!(
                EVENT_LIGHT_PHASE,
                "traffic light changed",
                step = step,
                phase = %new_phase
            );
            self.phase_changed.broadcast(&self.control);
        }

        self.control.release();
    }
}

/// The long-lived agent driving the traffic light.
///
/// Participates in the step barrier like any vehicle: one decision per tick,
/// then rendezvous. It leaves the simulation once it is the only remaining
/// participant, which lets the final tick complete without minting empty
/// ticks after the last vehicle has exited.
pub struct LightAgent {
    light: std::sync::Arc<TrafficLight>,
    vehicles: std::sync::Arc<VehicleTable>,
    cell_locks: std::sync::Arc<CellLockGrid>,
    barrier: std::sync::Arc<crate::barrier::step_barrier::StepBarrier>,
}

impl LightAgent {
    pub fn new(
        light: std::sync::Arc<TrafficLight>,
        vehicles: std::sync::Arc<VehicleTable>,
        cell_locks: std::sync::Arc<CellLockGrid>,
        barrier: std::sync::Arc<crate::barrier::step_barrier::StepBarrier>,
    ) -> Self {
        Self {
            light,
            vehicles,
            cell_locks,
            barrier,
        }
    }

    pub fn run(self) {
        while self.barrier.active_agents() > 1 {
            let step = self.barrier.step();
            self.light.tick(&self.vehicles, &self.cell_locks, step);
            self.barrier.await_tick();
        }
        self.barrier.agent_finished();
    }
}

/// True iff some running ambulance close to its deadline (but still in time)
/// is blocked on the axis the current phase keeps red.
fn ambulance_needs_other_phase(vehicles: &VehicleTable, phase: LightPhase, step: Tick) -> bool {
    vehicles.values().any(|vehicle| {
        if !vehicle.is_ambulance() || vehicle.state() != VehicleState::Running {
            return false;
        }
        let remaining = vehicle.remaining_time(step);
        if remaining <= 0 || remaining > AMBULANCE_EMERGENCY_WINDOW {
            return false;
        }
        matches!(vehicle.waiting_axis(), Some(axis) if axis != phase.axis())
    })
}

/// Number of running vehicles currently blocked on a move along `axis`.
fn blocked_on_axis(vehicles: &VehicleTable, axis: Axis) -> usize {
    vehicles
        .values()
        .filter(|vehicle| vehicle.state() == VehicleState::Running)
        .filter(|vehicle| vehicle.waiting_axis() == Some(axis))
        .count()
}

/// A routine flip must not catch anyone mid-crossing: every vehicle holding
/// an intersection cell has to be one that is already blocked waiting for
/// the opposite axis. Any occupant still flowing with the green makes the
/// hand-over unsafe.
fn safe_to_change(vehicles: &VehicleTable, cell_locks: &CellLockGrid, phase: LightPhase) -> bool {
    for zone in Zone::ALL {
        for &cell in zone.cells() {
            let Some(holder) = cell_locks.holder(cell) else {
                continue;
            };
            let blocked_opposite = vehicles
                .get(holder)
                .is_some_and(|vehicle| {
                    matches!(vehicle.waiting_axis(), Some(axis) if axis != phase.axis())
                });
            if !blocked_opposite {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::vehicle::VehicleKind;
    use crate::map::routes::Gate;

    fn table_with(vehicles: Vec<Vehicle>) -> VehicleTable {
        VehicleTable::from_vehicles(vehicles)
    }

    #[test]
    fn test_permission_follows_phase() {
        let light = TrafficLight::new();
        // Initial phase is NS green.
        assert!(light.can_vehicle_proceed(Position::new(0, 2), Position::new(1, 2)));
        assert!(!light.can_vehicle_proceed(Position::new(4, 0), Position::new(4, 1)));
        // A non-straight displacement (entering from outside) is permitted.
        assert!(light.can_vehicle_proceed(Position::OUTSIDE, Position::new(4, 0)));
    }

    #[test]
    fn test_routine_flip_requires_minimum_green() {
        let light = TrafficLight::new();
        let cell_locks = CellLockGrid::new();
        let vehicle = Vehicle::new('1').build();
        vehicle.set_state(VehicleState::Running);
        vehicle.set_position(Position::new(4, 0));
        vehicle.set_waiting_axis(Some(Axis::EastWest));
        let vehicles = table_with(vec![vehicle]);

        light.tick(&vehicles, &cell_locks, 0);
        light.tick(&vehicles, &cell_locks, 1);
        assert_eq!(light.phase(), LightPhase::NsGreen, "flip before minimum green");
        light.tick(&vehicles, &cell_locks, 2);
        assert_eq!(light.phase(), LightPhase::EwGreen);
        assert_eq!(light.flips(), 1);
        assert_eq!(light.green_duration(), 0);
    }

    #[test]
    fn test_no_flip_without_opposing_demand() {
        let light = TrafficLight::new();
        let cell_locks = CellLockGrid::new();
        let vehicles = table_with(vec![]);
        for step in 0..6 {
            light.tick(&vehicles, &cell_locks, step);
        }
        assert_eq!(light.phase(), LightPhase::NsGreen);
        assert_eq!(light.flips(), 0);
    }

    #[test]
    fn test_flowing_occupant_blocks_routine_flip() {
        let light = TrafficLight::new();
        let cell_locks = CellLockGrid::new();

        // A vehicle moving with the green through the center.
        let flowing = Vehicle::new('1').build();
        flowing.set_state(VehicleState::Running);
        flowing.set_position(Position::new(3, 4));
        cell_locks.acquire(Position::new(3, 4), '1');

        // Another one blocked on the red axis outside.
        let blocked = Vehicle::new('2').build();
        blocked.set_state(VehicleState::Running);
        blocked.set_position(Position::new(4, 0));
        blocked.set_waiting_axis(Some(Axis::EastWest));

        let vehicles = table_with(vec![flowing, blocked]);
        for step in 0..6 {
            light.tick(&vehicles, &cell_locks, step);
        }
        assert_eq!(light.phase(), LightPhase::NsGreen, "flip caught a flowing vehicle");

        // Once the occupant leaves the intersection the flip commits.
        cell_locks.release(Position::new(3, 4), '1');
        light.tick(&vehicles, &cell_locks, 6);
        assert_eq!(light.phase(), LightPhase::EwGreen);
    }

    #[test]
    fn test_stranded_turner_allows_flip() {
        let light = TrafficLight::new();
        let cell_locks = CellLockGrid::new();

        // A turning vehicle stuck mid-center waiting for the other axis
        // must not freeze the light: the flip it needs is still safe even
        // though it holds a center cell.
        let turner = Vehicle::new('1').build();
        turner.set_state(VehicleState::Running);
        turner.set_position(Position::new(4, 2));
        turner.set_waiting_axis(Some(Axis::EastWest));
        cell_locks.acquire(Position::new(4, 2), '1');

        let vehicles = table_with(vec![turner]);
        for step in 0..3 {
            light.tick(&vehicles, &cell_locks, step);
        }
        assert_eq!(light.phase(), LightPhase::EwGreen);
    }

    #[test]
    fn test_emergency_flip_skips_minimum_green() {
        let light = TrafficLight::new();
        let cell_locks = CellLockGrid::new();

        let ambulance = Vehicle::new('9')
            .with_kind(VehicleKind::Ambulance)
            .with_origin(Gate::A)
            .with_destination(Gate::C)
            .with_arrival(0)
            .with_golden_time(3)
            .build();
        ambulance.set_state(VehicleState::Running);
        ambulance.set_position(Position::new(4, 1));
        ambulance.set_waiting_axis(Some(Axis::EastWest));
        let vehicles = table_with(vec![ambulance]);

        // Remaining time is 3: inside the emergency window on the very
        // first tick, well before the minimum green elapses.
        light.tick(&vehicles, &cell_locks, 0);
        assert_eq!(light.phase(), LightPhase::EwGreen);
        assert_eq!(light.flips(), 1);
    }

    #[test]
    fn test_wait_for_green_outside_entry_returns() {
        let light = TrafficLight::new();
        let vehicle = Vehicle::new('1').build();
        vehicle.set_position(Position::new(0, 0));
        // Not in an entry zone: must not block.
        light.wait_for_green(&vehicle, 0);
    }

    #[test]
    fn test_wait_for_green_wakes_on_phase_change() {
        use std::sync::Arc;
        use std::thread;

        let light = Arc::new(TrafficLight::new());
        let cell_locks = CellLockGrid::new();

        let vehicle = Vehicle::new('1').build();
        vehicle.set_state(VehicleState::Running);
        vehicle.set_position(Position::new(4, 1)); // west entry, needs EW
        vehicle.set_waiting_axis(Some(Axis::EastWest));
        let vehicles = Arc::new(table_with(vec![vehicle]));

        let waiter_light = Arc::clone(&light);
        let waiter_vehicle = Arc::clone(vehicles.get('1').unwrap());
        let handle = thread::spawn(move || {
            waiter_light.wait_for_green(&waiter_vehicle, 0);
        });

        // The blocked east-west demand flips the light once the minimum
        // green has elapsed; the broadcast must wake the waiter.
        let mut step = 0;
        while light.flips() == 0 {
            light.tick(&vehicles, &cell_locks, step);
            step += 1;
            assert!(step < 10, "light never flipped");
        }
        handle.join().unwrap();
        assert_eq!(light.phase(), LightPhase::EwGreen);
    }
}
