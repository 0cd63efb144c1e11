use crate::barrier::step_barrier::Tick;
use crate::map::position::{Axis, Position};
use crate::map::routes::Gate;
use crate::sync::priority::{
    AMBULANCE_CRITICAL_DEADLINE, AMBULANCE_NEAR_DEADLINE, PRIORITY_AMBULANCE,
    PRIORITY_NORMAL_VEHICLE,
};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicI64, AtomicU8, Ordering};

pub type VehicleID = char; // Alias for VehicleID

/// The two classes of vehicles on the crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleKind {
    /// Regular traffic, lowest priority.
    Normal,
    /// Emergency vehicle with an arrival tick and a golden-time deadline.
    Ambulance,
}

impl fmt::Display for VehicleKind {
    /// Formats the vehicle kind for display.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use crossroads_sim_core::agents::VehicleKind;
    ///
    /// assert_eq!(format!("{}", VehicleKind::Normal), "normal");
    /// assert_eq!(format!("{}", VehicleKind::Ambulance), "ambulance");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleKind::Normal => write!(f, "normal"),
            VehicleKind::Ambulance => write!(f, "ambulance"),
        }
    }
}

/// Lifecycle of a vehicle. Transitions are strictly forward:
/// `Ready -> Running -> Finished`, or straight to `Finished` for an
/// ambulance that misses its deadline before entering the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum VehicleState {
    /// Not yet entered the map.
    Ready = 0,
    /// Occupies a cell on its route.
    Running = 1,
    /// Has exited the map (or given up on its deadline).
    Finished = 2,
}

impl VehicleState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => VehicleState::Ready,
            1 => VehicleState::Running,
            _ => VehicleState::Finished,
        }
    }
}

impl fmt::Display for VehicleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleState::Ready => write!(f, "ready"),
            VehicleState::Running => write!(f, "running"),
            VehicleState::Finished => write!(f, "finished"),
        }
    }
}

const WAITING_NONE: u8 = 0;
const WAITING_NS: u8 = 1;
const WAITING_EW: u8 = 2;

/// One vehicle on the crossing.
///
/// Static identity (id, kind, gates, deadline data) is immutable after
/// construction. The dynamic fields - state, position, blocked axis and the
/// finish bookkeeping - are atomics: the owning agent writes them, the
/// traffic light and the tick hook read them without taking any lock and
/// must tolerate observations that are one move stale.
#[derive(Debug)]
pub struct Vehicle {
    /// Unique identifier (one character from the descriptor).
    pub id: VehicleID,
    /// Vehicle class. See the ref. at `VehicleKind`.
    pub kind: VehicleKind,
    /// Gate the vehicle enters through.
    pub origin: Gate,
    /// Gate the vehicle must leave through.
    pub destination: Gate,
    /// Tick at which an ambulance is permitted to enter the map.
    pub arrival: Tick,
    /// Tick by which an ambulance must have exited. `-1` for normal vehicles.
    pub golden_time: Tick,

    state: AtomicU8,
    row: AtomicI32,
    col: AtomicI32,
    waiting_axis: AtomicU8,
    finished_at: AtomicI64,
    deadline_missed: AtomicBool,
}

impl PartialEq for Vehicle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.kind == other.kind
            && self.origin == other.origin
            && self.destination == other.destination
            && self.arrival == other.arrival
            && self.golden_time == other.golden_time
            && self.state.load(Ordering::SeqCst) == other.state.load(Ordering::SeqCst)
            && self.row.load(Ordering::SeqCst) == other.row.load(Ordering::SeqCst)
            && self.col.load(Ordering::SeqCst) == other.col.load(Ordering::SeqCst)
            && self.waiting_axis.load(Ordering::SeqCst) == other.waiting_axis.load(Ordering::SeqCst)
            && self.finished_at.load(Ordering::SeqCst) == other.finished_at.load(Ordering::SeqCst)
            && self.deadline_missed.load(Ordering::SeqCst) == other.deadline_missed.load(Ordering::SeqCst)
    }
}

impl Vehicle {
    /// Constructs a new `VehicleBuilder` for building a `Vehicle` object.
    ///
    /// # Arguments
    /// * `id` - A unique one-character identifier for the vehicle.
    ///
    /// # Example
    /// ```
    /// use crossroads_sim_core::agents::{Vehicle, VehicleKind};
    /// use crossroads_sim_core::map::Gate;
    ///
    /// let vehicle = Vehicle::new('1')
    ///     .with_origin(Gate::A)
    ///     .with_destination(Gate::C)
    ///     .build();
    /// assert_eq!(vehicle.kind, VehicleKind::Normal);
    /// ```
    pub fn new(id: VehicleID) -> VehicleBuilder {
        VehicleBuilder {
            vehicle: Vehicle {
                id,
                kind: VehicleKind::Normal,
                origin: Gate::A,
                destination: Gate::A,
                arrival: 0,
                golden_time: -1,
                state: AtomicU8::new(VehicleState::Ready as u8),
                row: AtomicI32::new(Position::OUTSIDE.row),
                col: AtomicI32::new(Position::OUTSIDE.col),
                waiting_axis: AtomicU8::new(WAITING_NONE),
                finished_at: AtomicI64::new(-1),
                deadline_missed: AtomicBool::new(false),
            },
        }
    }

    pub fn is_ambulance(&self) -> bool {
        self.kind == VehicleKind::Ambulance
    }

    /// Ticks left until the golden-time deadline. Only meaningful for
    /// ambulances.
    pub fn remaining_time(&self, step: Tick) -> Tick {
        self.golden_time - step
    }

    /// Effective waiter priority at the given step.
    ///
    /// Normal vehicles always queue at the baseline. An ambulance starts
    /// above every normal vehicle and the traffic light, and is bumped twice
    /// more as its deadline closes in.
    pub fn priority(&self, step: Tick) -> i32 {
        if !self.is_ambulance() {
            return PRIORITY_NORMAL_VEHICLE;
        }
        let remaining = self.remaining_time(step);
        if remaining <= AMBULANCE_CRITICAL_DEADLINE {
            PRIORITY_AMBULANCE + 2
        } else if remaining <= AMBULANCE_NEAR_DEADLINE {
            PRIORITY_AMBULANCE + 1
        } else {
            PRIORITY_AMBULANCE
        }
    }

    pub fn state(&self) -> VehicleState {
        VehicleState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Advances the lifecycle state.
    ///
    /// # Panics
    /// Panics on a backwards transition; states are never revisited.
    pub fn set_state(&self, new_state: VehicleState) {
        let current = self.state();
        assert!(
            new_state >= current,
            "vehicle '{}' state moving backwards: {} -> {}",
            self.id,
            current,
            new_state
        );
        self.state.store(new_state as u8, Ordering::SeqCst);
    }

    pub fn position(&self) -> Position {
        Position::new(
            self.row.load(Ordering::SeqCst),
            self.col.load(Ordering::SeqCst),
        )
    }

    pub fn set_position(&self, pos: Position) {
        self.row.store(pos.row, Ordering::SeqCst);
        self.col.store(pos.col, Ordering::SeqCst);
    }

    /// Axis the vehicle is currently blocked on, published for the traffic
    /// light's demand counting. `None` while the vehicle is moving freely.
    pub fn waiting_axis(&self) -> Option<Axis> {
        match self.waiting_axis.load(Ordering::SeqCst) {
            WAITING_NS => Some(Axis::NorthSouth),
            WAITING_EW => Some(Axis::EastWest),
            _ => None,
        }
    }

    pub fn set_waiting_axis(&self, axis: Option<Axis>) {
        let value = match axis {
            None => WAITING_NONE,
            Some(Axis::NorthSouth) => WAITING_NS,
            Some(Axis::EastWest) => WAITING_EW,
        };
        self.waiting_axis.store(value, Ordering::SeqCst);
    }

    /// Step at which the vehicle finished, or `None` while it is still out.
    pub fn finished_at(&self) -> Option<Tick> {
        match self.finished_at.load(Ordering::SeqCst) {
            -1 => None,
            step => Some(step),
        }
    }

    pub fn record_finish(&self, step: Tick, deadline_missed: bool) {
        self.finished_at.store(step, Ordering::SeqCst);
        self.deadline_missed.store(deadline_missed, Ordering::SeqCst);
    }

    pub fn deadline_missed(&self) -> bool {
        self.deadline_missed.load(Ordering::SeqCst)
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}' {}->{}",
            self.kind, self.id, self.origin, self.destination
        )
    }
}

/// A builder pattern implementation for constructing `Vehicle` objects.
pub struct VehicleBuilder {
    vehicle: Vehicle,
}

impl VehicleBuilder {
    /// Sets the vehicle class.
    pub fn with_kind(mut self, kind: VehicleKind) -> Self {
        self.vehicle.kind = kind;
        self
    }

    /// Sets the entry gate.
    pub fn with_origin(mut self, origin: Gate) -> Self {
        self.vehicle.origin = origin;
        self
    }

    /// Sets the exit gate.
    pub fn with_destination(mut self, destination: Gate) -> Self {
        self.vehicle.destination = destination;
        self
    }

    /// Sets the ambulance dispatch tick.
    pub fn with_arrival(mut self, arrival: Tick) -> Self {
        self.vehicle.arrival = arrival;
        self
    }

    /// Sets the ambulance golden-time deadline.
    pub fn with_golden_time(mut self, golden_time: Tick) -> Self {
        self.vehicle.golden_time = golden_time;
        self
    }

    /// Builds the final `Vehicle` object.
    ///
    /// # Panics
    /// Panics if an ambulance's deadline precedes its arrival tick.
    pub fn build(self) -> Vehicle {
        if self.vehicle.kind == VehicleKind::Ambulance {
            assert!(
                self.vehicle.arrival <= self.vehicle.golden_time,
                "ambulance '{}' arrives at {} after its deadline {}",
                self.vehicle.id,
                self.vehicle.arrival,
                self.vehicle.golden_time
            );
        }
        self.vehicle
    }
}
