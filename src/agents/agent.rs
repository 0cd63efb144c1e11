use crate::agents::vehicle::{Vehicle, VehicleState};
use crate::barrier::step_barrier::Tick;
use crate::map::position::Position;
use crate::map::routes::route;
use crate::simulation::world::World;
use crate::verbose::{
    EVENT_AMBULANCE_DISPATCH, EVENT_AMBULANCE_FAILED, EVENT_AMBULANCE_STANDBY,
    EVENT_AMBULANCE_SUCCESS, EVENT_AMBULANCE_URGENT, EVENT_VEHICLE_ARRIVED, EVENT_VEHICLE_DONE,
    EVENT_VEHICLE_MOVE, EVENT_VEHICLE_START,
};
use crate::zones::zone::{Zone, zone_for};
use crate::{log_additional, log_detailed, log_main};
use std::fmt;
use std::sync::Arc;

/// Remaining-time window in which an ambulance switches from `try_acquire`
/// to blocking acquisition of its destination cell lock.
pub const AMBULANCE_FORCED_ENTRY_WINDOW: Tick = 2;

/// An ambulance announces standby this many ticks before its dispatch.
pub const AMBULANCE_STANDBY_WINDOW: Tick = 3;

/// An ambulance logs urgency once its remaining time drops to this window.
pub const AMBULANCE_URGENT_WINDOW: Tick = 3;

/// Result of one move attempt.
///
/// `Blocked` leaves no state behind: whatever was reserved during the
/// attempt has been returned, and the agent simply retries next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The vehicle advanced one cell; the route index moves forward.
    Moved,
    /// The move was denied or lost a race; retry at the next tick.
    Blocked,
}

impl fmt::Display for MoveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveOutcome::Moved => write!(f, "moved"),
            MoveOutcome::Blocked => write!(f, "blocked"),
        }
    }
}

/// The run loop driving one vehicle.
///
/// Per tick the agent attempts at most one cell advance - admission check,
/// hand-over-hand cell lock exchange, zone reservation bookkeeping - and
/// then rendezvouses at the step barrier whether it moved or not.
pub struct VehicleAgent {
    world: Arc<World>,
    vehicle: Arc<Vehicle>,
    route: &'static [Position],
    route_idx: usize,
    held_zone: Option<Zone>,
    dispatched: bool,
}

impl VehicleAgent {
    pub fn new(world: Arc<World>, vehicle: Arc<Vehicle>) -> Self {
        let route = route(vehicle.origin, vehicle.destination);
        Self {
            world,
            vehicle,
            route,
            route_idx: 0,
            held_zone: None,
            dispatched: false,
        }
    }

    /// Runs the vehicle to completion, then withdraws from the barrier.
    pub fn run(mut self) {
        log_main!(
            EVENT_VEHICLE_START,
            "vehicle agent started",
            vehicle = %self.vehicle.id,
            kind = %self.vehicle.kind,
            origin = %self.vehicle.origin,
            destination = %self.vehicle.destination
        );

        loop {
            let step = self.world.barrier().step();

            if self.vehicle.is_ambulance() && step < self.vehicle.arrival {
                let wait = self.vehicle.arrival - step;
                if wait <= AMBULANCE_STANDBY_WINDOW {
                    log_main!(
                        EVENT_AMBULANCE_STANDBY,
                        "ambulance on standby",
                        vehicle = %self.vehicle.id,
                        steps_until_dispatch = wait
                    );
                }
                self.world.barrier().await_tick();
                continue;
            }

            if self.vehicle.is_ambulance() && !self.dispatched {
                self.dispatched = true;
                log_main!(
                    EVENT_AMBULANCE_DISPATCH,
                    "ambulance dispatched",
                    vehicle = %self.vehicle.id,
                    step = step
                );
            }

            if self.vehicle.is_ambulance() && step > self.vehicle.golden_time {
                log_main!(
                    EVENT_AMBULANCE_FAILED,
                    "ambulance missed golden time",
                    vehicle = %self.vehicle.id,
                    step = step,
                    golden_time = self.vehicle.golden_time
                );
                self.abandon(step);
                break;
            }

            let next_pos = self.route[self.route_idx];
            if next_pos.is_outside() {
                self.exit_map(step);
                break;
            }

            if self.try_move(next_pos, step) == MoveOutcome::Moved {
                self.route_idx += 1;
                if self.vehicle.is_ambulance() {
                    let remaining = self.vehicle.remaining_time(step);
                    if remaining <= AMBULANCE_URGENT_WINDOW {
                        log_main!(
                            EVENT_AMBULANCE_URGENT,
                            "ambulance running out of time",
                            vehicle = %self.vehicle.id,
                            remaining = remaining
                        );
                    }
                }
            }

            self.world.barrier().await_tick();
        }

        self.world.barrier().agent_finished();
        log_additional!(
            EVENT_VEHICLE_DONE,
            "vehicle agent finished",
            vehicle = %self.vehicle.id
        );
    }

    /// One move attempt. See [`MoveOutcome`] for the failure contract.
    fn try_move(&mut self, next_pos: Position, step: Tick) -> MoveOutcome {
        let id = self.vehicle.id;
        let next_zone = zone_for(next_pos);

        // Admission is needed exactly when the move enters a zone the
        // vehicle does not already hold; success leaves us owning the
        // reservation for that zone.
        let mut reserved_now = false;
        if let Some(zone) = next_zone
            && self.held_zone != Some(zone)
        {
            if !self
                .world
                .admission()
                .can_enter_intersection(&self.vehicle, next_pos, step)
            {
                return self.blocked(next_pos);
            }
            reserved_now = true;
        }

        let forced = self.vehicle.is_ambulance()
            && self.vehicle.remaining_time(step) <= AMBULANCE_FORCED_ENTRY_WINDOW;
        let acquired = if forced {
            self.world.cell_locks().acquire(next_pos, id);
            true
        } else {
            self.world.cell_locks().try_acquire(next_pos, id)
        };
        if !acquired {
            if reserved_now {
                let zone = next_zone.expect("reservation implies a target zone");
                self.world.zones().release(id, zone);
            }
            return self.blocked(next_pos);
        }

        if self.vehicle.state() == VehicleState::Ready {
            self.vehicle.set_state(VehicleState::Running);
        } else {
            let prev = self.vehicle.position();
            self.world.cell_locks().release(prev, id);
            if let Some(prev_zone) = self.held_zone
                && next_zone != Some(prev_zone)
            {
                self.world.zones().release(id, prev_zone);
            }
        }

        self.held_zone = next_zone;
        self.vehicle.set_position(next_pos);
        self.vehicle.set_waiting_axis(None);
        log_detailed!(
            EVENT_VEHICLE_MOVE,
            "vehicle advanced",
            vehicle = %id,
            step = step,
            position = %next_pos
        );
        MoveOutcome::Moved
    }

    /// Records the axis this vehicle is blocked on so the traffic light can
    /// weigh demand, then reports the block.
    fn blocked(&self, next_pos: Position) -> MoveOutcome {
        self.vehicle
            .set_waiting_axis(self.vehicle.position().axis_towards(next_pos));
        MoveOutcome::Blocked
    }

    /// Normal termination: the route sentinel was reached. Returns the last
    /// cell and any held zone, then leaves the map.
    fn exit_map(&mut self, step: Tick) {
        let id = self.vehicle.id;
        self.world.cell_locks().release(self.vehicle.position(), id);
        if let Some(zone) = self.held_zone.take() {
            self.world.zones().release(id, zone);
        }
        self.vehicle.set_waiting_axis(None);
        self.vehicle.set_position(Position::OUTSIDE);
        self.vehicle.set_state(VehicleState::Finished);
        self.vehicle.record_finish(step, false);

        if self.vehicle.is_ambulance() {
            log_main!(
                EVENT_AMBULANCE_SUCCESS,
                "ambulance arrived in time",
                vehicle = %id,
                step = step,
                golden_time = self.vehicle.golden_time
            );
        } else {
            log_main!(
                EVENT_VEHICLE_ARRIVED,
                "vehicle arrived at destination",
                vehicle = %id,
                step = step
            );
        }
    }

    /// Deadline failure: release whatever is held and leave without
    /// reaching the destination.
    fn abandon(&mut self, step: Tick) {
        let id = self.vehicle.id;
        if self.vehicle.state() == VehicleState::Running {
            self.world.cell_locks().release(self.vehicle.position(), id);
        }
        if let Some(zone) = self.held_zone.take() {
            self.world.zones().release(id, zone);
        }
        self.vehicle.set_waiting_axis(None);
        self.vehicle.set_position(Position::OUTSIDE);
        self.vehicle.set_state(VehicleState::Finished);
        self.vehicle.record_finish(step, true);
    }
}
