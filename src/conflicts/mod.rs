//! # Conflicts Module
//!
//! Static crossing-safety relation between intersection zones.
//!
//! The [`matrix::ConflictMatrix`] encodes which zone pairs must never be
//! held by different vehicles at the same time: the two axes conflict with
//! each other, the center conflicts with everything, and same-axis entries
//! are compatible. The admission path consults it before any normal vehicle
//! is allowed to reserve an intersection zone.
pub mod matrix;

pub use self::matrix::ConflictMatrix;
