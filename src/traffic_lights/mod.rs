//! # Traffic Lights Module
//!
//! The two-phase signal controller for the crossing.
//!
//! One long-lived agent owns the light. Each tick it scans the vehicle
//! table for urgent ambulances, weighs the blocked demand per axis, and
//! flips the phase when the opposing axis deserves the green and the
//! intersection is quiet enough to hand over. Vehicles consult
//! [`controller::TrafficLight::can_vehicle_proceed`] through the admission
//! path before any move into an intersection zone.
//!
//! ## Components
//!
//! - [`phase::LightPhase`] - the two green phases and their axes
//! - [`controller::TrafficLight`] - the state machine and its tick logic
//!
//! The phase is guaranteed stable for at least
//! [`controller::MIN_GREEN_DURATION`] ticks unless an ambulance emergency
//! forces an early change.
pub mod controller;
pub mod phase;

pub use self::controller::{LightAgent, MIN_GREEN_DURATION, TrafficLight};
pub use self::phase::LightPhase;
