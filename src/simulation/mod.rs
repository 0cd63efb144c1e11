//! # Simulation Module
//!
//! Wiring and lifecycle for a complete crossing run.
//!
//! ## Components
//!
//! - [`world::World`] - one value owning every subsystem (cell locks, zone
//!   table, conflict matrix, traffic light, step barrier, vehicle table),
//!   shared by reference with every agent thread. There is no global state.
//! - [`runner::SimulationSession`] - parses a vehicle descriptor, spawns one
//!   named thread per vehicle plus the traffic-light thread, joins them and
//!   reports a per-vehicle summary.
//! - [`states`] - per-tick snapshots of the crossing, with JSON export and
//!   an ASCII rendering for terminal visualisation.
//!
//! A session terminates when every agent has finished; the world is purely
//! in-memory and nothing persists between runs.
pub mod runner;
pub mod states;
pub mod world;

pub use self::runner::{SimulationSession, SimulationSummary, VehicleVerdict};
pub use self::states::CrossingState;
pub use self::world::World;
