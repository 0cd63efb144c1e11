//! Priority levels shared across the simulation.
//!
//! These three constants, plus the deadline bumps applied by
//! [`Vehicle::priority`](crate::agents::vehicle::Vehicle::priority), are the
//! sole source of ordering between waiters anywhere in the crate.

/// Baseline priority of a normal vehicle.
pub const PRIORITY_NORMAL_VEHICLE: i32 = 1;

/// Priority at which the traffic-light agent takes its control lock.
pub const PRIORITY_TRAFFIC_LIGHT: i32 = 2;

/// Baseline priority of an ambulance; bumped as its deadline approaches.
pub const PRIORITY_AMBULANCE: i32 = 3;

/// Remaining-steps threshold for the first ambulance priority bump (+1).
pub const AMBULANCE_NEAR_DEADLINE: i64 = 5;

/// Remaining-steps threshold for the second ambulance priority bump (+2).
pub const AMBULANCE_CRITICAL_DEADLINE: i64 = 2;
