//! # Barrier Module
//!
//! The global tick coordinator.
//!
//! Every agent (each vehicle plus the traffic light) rendezvouses at the
//! [`step_barrier::StepBarrier`] once per simulation step. The last arriving
//! agent advances the global tick, fires the tick hook and releases the rest,
//! so no agent ever observes another agent's next-tick state.
pub mod step_barrier;

pub use self::step_barrier::{StepBarrier, Tick};
