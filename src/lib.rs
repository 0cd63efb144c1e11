//! # crossroads_sim_core
//!
//! Core library for step-synchronised simulation of a signalised four-way
//! crossing.
//!
//! A fixed 7x7 map encodes the roadway; every vehicle follows a
//! predetermined cell-by-cell route between two of the four cardinal gates.
//! Vehicles run truly in parallel, one thread each, and advance in
//! lock-step: at most one cell move per global tick, enforced by a shared
//! step barrier. Two vehicle classes exist - normal traffic and ambulances
//! with an arrival tick and a golden-time deadline - and the whole crossing
//! is kept collision- and deadlock-free by layered mutual exclusion.
//!
//! ## Architecture
//!
//! ```text
//! sync            priority wait queue, semaphore, mutex, condvar
//!  └─ grid        one lock per map cell (finest exclusion)
//!  └─ zones       five intersection zones + capacity semaphore
//!  └─ conflicts   static zone conflict matrix
//! traffic_lights  two-phase controller with ambulance emergencies
//! admission       light + conflict + capacity + zone reservation in one
//! barrier         the global tick rendezvous
//! agents          vehicle records, descriptor parser, per-vehicle run loop
//! simulation      the owning World, the thread runner, tick snapshots
//! ```
//!
//! ## Quick start
//!
//! ```no_run
//! use crossroads_sim_core::simulation::SimulationSession;
//!
//! // One normal vehicle west->east, one ambulance dispatched at tick 5.
//! let session = SimulationSession::new("1AC:2BD5.30").unwrap().build();
//! let summary = session.run();
//! assert!(summary.all_arrived());
//! ```
//!
//! Everything an agent touches is owned by one
//! [`simulation::World`] value shared behind an `Arc`; the crate keeps no
//! global mutable state apart from the logging configuration in
//! [`verbose`].
pub mod admission;
pub mod agents;
pub mod barrier;
pub mod conflicts;
pub mod grid;
pub mod map;
pub mod simulation;
pub mod sync;
pub mod traffic_lights;
pub mod utils;
pub mod verbose;
pub mod zones;
