//! # Admission Module
//!
//! The single decision point for entering the intersection.
//!
//! [`controller::AdmissionController`] combines four checks: the traffic
//! light's permission predicate, the conflict matrix, the intersection
//! capacity and the per-zone reservation. Ambulances close to their deadline
//! may bypass the light (a per-call override that never changes the phase)
//! and, in the emergency window, reserve their target zone blockingly at
//! maximum priority.
pub mod controller;

pub use self::controller::AdmissionController;
