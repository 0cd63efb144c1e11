use crate::agents::vehicle::{Vehicle, VehicleID, VehicleKind};
use crate::barrier::step_barrier::Tick;
use crate::map::routes::Gate;
use std::collections::HashSet;
use std::fmt;

/// Maximum number of vehicles accepted from one descriptor.
pub const MAX_VEHICLES: usize = 16;

/// Custom error types for descriptor parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    /// A record is shorter than the mandatory `IdSrcDst` triple.
    RecordTooShort(String),
    /// A gate character outside `A..D`.
    InvalidGate { record: String, gate: char },
    /// The ambulance suffix is not `<arrival>.<golden_time>`.
    InvalidTiming(String),
    /// An ambulance whose deadline precedes its arrival.
    DeadlineBeforeArrival {
        id: VehicleID,
        arrival: Tick,
        golden_time: Tick,
    },
    /// Two records share the same vehicle id.
    DuplicateId(VehicleID),
    /// More than [`MAX_VEHICLES`] records.
    TooManyVehicles(usize),
}

impl fmt::Display for DescriptorError {
    /// Formats the error message for `DescriptorError`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorError::RecordTooShort(record) => {
                write!(f, "Record '{}' is too short, expected at least IdSrcDst", record)
            }
            DescriptorError::InvalidGate { record, gate } => {
                write!(f, "Record '{}' names invalid gate '{}'", record, gate)
            }
            DescriptorError::InvalidTiming(record) => {
                write!(
                    f,
                    "Record '{}' has a malformed ambulance suffix, expected <arrival>.<golden_time>",
                    record
                )
            }
            DescriptorError::DeadlineBeforeArrival {
                id,
                arrival,
                golden_time,
            } => {
                write!(
                    f,
                    "Ambulance '{}' arrives at {} after its golden time {}",
                    id, arrival, golden_time
                )
            }
            DescriptorError::DuplicateId(id) => {
                write!(f, "Vehicle id '{}' appears more than once", id)
            }
            DescriptorError::TooManyVehicles(count) => {
                write!(f, "Descriptor holds {} vehicles, at most {} allowed", count, MAX_VEHICLES)
            }
        }
    }
}

impl std::error::Error for DescriptorError {}

/// Parses a colon-separated vehicle descriptor.
///
/// Each record is `IdSrcDst` - a unique id character, an origin gate and a
/// destination gate - optionally suffixed for ambulances with
/// `<arrival>.<golden_time>`.
///
/// # Examples
///
/// ```rust
/// use crossroads_sim_core::agents::parser::parse_descriptor;
/// use crossroads_sim_core::agents::VehicleKind;
///
/// let vehicles = parse_descriptor("1AC:2BD5.12").unwrap();
/// assert_eq!(vehicles.len(), 2);
/// assert_eq!(vehicles[0].kind, VehicleKind::Normal);
/// assert_eq!(vehicles[1].kind, VehicleKind::Ambulance);
/// assert_eq!(vehicles[1].arrival, 5);
/// assert_eq!(vehicles[1].golden_time, 12);
/// ```
pub fn parse_descriptor(input: &str) -> Result<Vec<Vehicle>, DescriptorError> {
    let records: Vec<&str> = input
        .split(':')
        .filter(|record| !record.is_empty())
        .collect();
    if records.len() > MAX_VEHICLES {
        return Err(DescriptorError::TooManyVehicles(records.len()));
    }

    let mut vehicles = Vec::with_capacity(records.len());
    let mut seen_ids: HashSet<VehicleID> = HashSet::new();

    for record in records {
        let chars: Vec<char> = record.chars().collect();
        if chars.len() < 3 {
            return Err(DescriptorError::RecordTooShort(record.to_string()));
        }

        let id = chars[0];
        if !seen_ids.insert(id) {
            return Err(DescriptorError::DuplicateId(id));
        }
        let origin = Gate::from_char(chars[1]).map_err(|_| DescriptorError::InvalidGate {
            record: record.to_string(),
            gate: chars[1],
        })?;
        let destination = Gate::from_char(chars[2]).map_err(|_| DescriptorError::InvalidGate {
            record: record.to_string(),
            gate: chars[2],
        })?;

        let mut builder = Vehicle::new(id)
            .with_origin(origin)
            .with_destination(destination);

        if chars.len() > 3 {
            let suffix: String = chars[3..].iter().collect();
            let (arrival_text, golden_text) = suffix
                .split_once('.')
                .ok_or_else(|| DescriptorError::InvalidTiming(record.to_string()))?;
            let arrival: Tick = arrival_text
                .parse()
                .map_err(|_| DescriptorError::InvalidTiming(record.to_string()))?;
            let golden_time: Tick = golden_text
                .parse()
                .map_err(|_| DescriptorError::InvalidTiming(record.to_string()))?;
            if golden_time < arrival {
                return Err(DescriptorError::DeadlineBeforeArrival {
                    id,
                    arrival,
                    golden_time,
                });
            }
            builder = builder
                .with_kind(VehicleKind::Ambulance)
                .with_arrival(arrival)
                .with_golden_time(golden_time);
        }

        vehicles.push(builder.build());
    }

    Ok(vehicles)
}
