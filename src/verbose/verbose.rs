use std::fmt;
use std::sync::OnceLock;
use tracing::{Level, debug, info, trace};
use tracing_subscriber::{
    EnvFilter, fmt as tracing_fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Hierarchical logging levels for simulation debugging.
///
/// Each level includes all lower levels, providing increasingly detailed
/// output. Uses JSON structured logging via the `tracing` crate.
///
/// # Examples
///
/// ```rust
/// use crossroads_sim_core::verbose::{VerboseLevel, set_verbose_level};
///
/// // Set logging level
/// set_verbose_level(VerboseLevel::Main);
///
/// // Check current level
/// if VerboseLevel::Main.is_at_least(VerboseLevel::Additional) {
///     println!("Will log additional details");
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum VerboseLevel {
    /// No debug at all
    None = 0,
    /// Major simulation phases - `info` level
    Main = 1,
    /// Function-level details - `debug` level
    Additional = 2,
    /// Loop iterations and fine operations - `debug` level
    Detailed = 3,
    /// Everything including traces - `trace` level
    All = 4,
}

impl fmt::Display for VerboseLevel {
    /// Formats the verbosity level for display.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use crossroads_sim_core::verbose::VerboseLevel;
    ///
    /// assert_eq!(format!("{}", VerboseLevel::None), "none");
    /// assert_eq!(format!("{}", VerboseLevel::Main), "main");
    /// assert_eq!(format!("{}", VerboseLevel::All), "all");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VerboseLevel::None => "none",
            VerboseLevel::Main => "main",
            VerboseLevel::Additional => "additional",
            VerboseLevel::Detailed => "detailed",
            VerboseLevel::All => "all",
        };
        write!(f, "{}", s)
    }
}

impl From<VerboseLevel> for Level {
    fn from(level: VerboseLevel) -> Self {
        match level {
            VerboseLevel::None => Level::ERROR,
            VerboseLevel::Main => Level::INFO,
            VerboseLevel::Additional => Level::DEBUG,
            VerboseLevel::Detailed => Level::DEBUG,
            VerboseLevel::All => Level::TRACE,
        }
    }
}

// Event type constants
pub const EVENT_SESSION_START: &str = "session_start";
pub const EVENT_SESSION_DONE: &str = "session_done";
pub const EVENT_STEP: &str = "step";
pub const EVENT_VEHICLE_START: &str = "vehicle_start";
pub const EVENT_VEHICLE_MOVE: &str = "vehicle_move";
pub const EVENT_VEHICLE_ARRIVED: &str = "vehicle_arrived";
pub const EVENT_VEHICLE_DONE: &str = "vehicle_done";
pub const EVENT_AMBULANCE_STANDBY: &str = "ambulance_standby";
pub const EVENT_AMBULANCE_DISPATCH: &str = "ambulance_dispatch";
pub const EVENT_AMBULANCE_URGENT: &str = "ambulance_urgent";
pub const EVENT_AMBULANCE_SUCCESS: &str = "ambulance_success";
pub const EVENT_AMBULANCE_FAILED: &str = "ambulance_failed";
pub const EVENT_LIGHT_PHASE: &str = "light_phase";
pub const EVENT_LIGHT_EMERGENCY: &str = "light_emergency";
pub const EVENT_LIGHT_OVERRIDE: &str = "light_override";
pub const EVENT_PREEMPT_REQUEST: &str = "preempt_request";

// Global verbose level storage
static VERBOSE_LEVEL: OnceLock<VerboseLevel> = OnceLock::new();
static LOGGER_INITIALIZED: OnceLock<bool> = OnceLock::new();

/// Initialize the tracing logger once
pub fn init_logger() {
    if LOGGER_INITIALIZED.set(true).is_ok() {
        tracing_subscriber::registry()
            .with(
                tracing_fmt::layer()
                    .json()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(EnvFilter::from_default_env())
            .init();
    }
}

/// Sets the global verbose level and initialises the tracing subscriber
pub fn set_verbose_level(level: VerboseLevel) {
    let _ = VERBOSE_LEVEL.set(level);
    init_logger();
}

/// Gets the current global verbose level
pub fn get_verbose_level() -> VerboseLevel {
    *VERBOSE_LEVEL.get().unwrap_or(&VerboseLevel::None)
}

/// Checks if current global verbose level is at least the specified level
pub fn is_verbose_level(level: VerboseLevel) -> bool {
    get_verbose_level() >= level
}

/// Logs a message if the global verbose level allows it
pub fn verbose_log(level: VerboseLevel, event: &str, message: &str) {
    if !is_verbose_level(level) {
        return;
    }

    match level {
        VerboseLevel::None => {}
        VerboseLevel::Main => {
            info!(event = event, message);
        }
        VerboseLevel::Additional | VerboseLevel::Detailed => {
            debug!(event = event, message);
        }
        VerboseLevel::All => {
            trace!(event = event, message);
        }
    }
}

impl VerboseLevel {
    /// Checks if this level is at least the minimum level
    pub fn is_at_least(self, min_level: VerboseLevel) -> bool {
        self >= min_level
    }
}

/// Logs an info-level message if the global verbose level is
/// [`VerboseLevel::Main`] or higher.
///
/// Use for the externally visible events: agent start/stop, ambulance
/// dispatch and verdicts, traffic-light phase changes.
#[macro_export]
macro_rules! log_main {
    ($event:expr, $msg:literal) => {
        if $crate::verbose::is_verbose_level($crate::verbose::VerboseLevel::Main) {
            tracing::info!(event = $event, $msg);
        }
    };
    ($event:expr, $msg:literal, $($fields:tt)+) => {
        if $crate::verbose::is_verbose_level($crate::verbose::VerboseLevel::Main) {
            tracing::info!(event = $event, $($fields)+, $msg);
        }
    };
}

/// Logs a debug-level message if the global verbose level is
/// [`VerboseLevel::Additional`] or higher.
///
/// Use for function-level details such as admission overrides and
/// preemption announcements.
#[macro_export]
macro_rules! log_additional {
    ($event:expr, $msg:literal) => {
        if $crate::verbose::is_verbose_level($crate::verbose::VerboseLevel::Additional) {
            tracing::debug!(event = $event, $msg);
        }
    };
    ($event:expr, $msg:literal, $($fields:tt)+) => {
        if $crate::verbose::is_verbose_level($crate::verbose::VerboseLevel::Additional) {
            tracing::debug!(event = $event, $($fields)+, $msg);
        }
    };
}

/// Logs a debug-level message if the global verbose level is
/// [`VerboseLevel::Detailed`] or higher.
///
/// Use for fine-grained details such as per-tick cell moves.
#[macro_export]
macro_rules! log_detailed {
    ($event:expr, $msg:literal) => {
        if $crate::verbose::is_verbose_level($crate::verbose::VerboseLevel::Detailed) {
            tracing::debug!(event = $event, $msg);
        }
    };
    ($event:expr, $msg:literal, $($fields:tt)+) => {
        if $crate::verbose::is_verbose_level($crate::verbose::VerboseLevel::Detailed) {
            tracing::debug!(event = $event, $($fields)+, $msg);
        }
    };
}

/// Logs a trace-level message if the global verbose level is
/// [`VerboseLevel::All`].
#[macro_export]
macro_rules! log_all {
    ($event:expr, $msg:literal) => {
        if $crate::verbose::is_verbose_level($crate::verbose::VerboseLevel::All) {
            tracing::trace!(event = $event, $msg);
        }
    };
    ($event:expr, $msg:literal, $($fields:tt)+) => {
        if $crate::verbose::is_verbose_level($crate::verbose::VerboseLevel::All) {
            tracing::trace!(event = $event, $($fields)+, $msg);
        }
    };
}
