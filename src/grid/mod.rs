//! # Grid Module
//!
//! Per-cell mutual exclusion for the crossing grid.
//!
//! The [`cell_locks::CellLockGrid`] owns one single-holder lock per grid
//! cell; a vehicle occupies a cell exactly while it holds that cell's lock.
//! Movement is hand-over-hand: the destination lock is taken before the
//! origin lock is dropped, so no observer ever sees two vehicles on one cell.
//!
//! Only vehicle agents and the admission path touch this grid. It is created
//! once at startup and never resized.
pub mod cell_locks;

pub use self::cell_locks::CellLockGrid;
