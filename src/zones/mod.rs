//! # Zones Module
//!
//! Coarse-grained partition of the intersection into five named regions and
//! the reservation machinery that guards them.
//!
//! ## Components
//!
//! - [`zone::Zone`] - the five intersection regions (four entries + center)
//! - [`zone::zone_for`] - pure mapping from grid position to zone
//! - [`table::ZoneTable`] - per-zone priority locks, occupancy bookkeeping
//!   and the intersection-wide capacity semaphore
//!
//! A vehicle must hold a zone reservation for every intersection cell it
//! occupies; reservations are taken through the admission path and returned
//! by the vehicle's own agent when it vacates the zone's cells.
pub mod table;
pub mod zone;

pub use self::table::ZoneTable;
pub use self::zone::{NUM_ZONES, Zone, zone_for};
