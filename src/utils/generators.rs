use crate::agents::parser::MAX_VEHICLES;
use crate::map::routes::Gate;
use crate::utils::rand::thread_rng;
use rand::Rng;

/// Id characters handed out to generated vehicles, in order.
const ID_POOL: &[u8] = b"123456789abcdefg";

/// Generates a random vehicle descriptor for stress scenarios.
///
/// Produces `vehicles_num` records (capped at the descriptor maximum) with
/// uniformly random origin and destination gates. Each record becomes an
/// ambulance with probability `ambulance_share`; ambulances get an arrival
/// within the first few ticks and a comfortably loose golden time, so
/// generated scenarios exercise priority paths without being predestined to
/// miss deadlines.
///
/// # Arguments
///
/// - `vehicles_num` - number of records to generate
/// - `ambulance_share` - probability in `[0, 1]` that a record is an ambulance
///
/// # Examples
///
/// ```rust
/// use crossroads_sim_core::utils::generators::generate_descriptor;
/// use crossroads_sim_core::agents::parser::parse_descriptor;
///
/// let descriptor = generate_descriptor(5, 0.2);
/// let vehicles = parse_descriptor(&descriptor).unwrap();
/// assert_eq!(vehicles.len(), 5);
/// ```
pub fn generate_descriptor(vehicles_num: usize, ambulance_share: f64) -> String {
    let mut rng = thread_rng();
    let count = vehicles_num.min(MAX_VEHICLES);
    let mut records = Vec::with_capacity(count);

    for index in 0..count {
        let id = ID_POOL[index] as char;
        let origin = Gate::ALL[rng.random_range(0..Gate::ALL.len())];
        let destination = Gate::ALL[rng.random_range(0..Gate::ALL.len())];
        let mut record = format!("{}{}{}", id, origin, destination);
        if rng.random_bool(ambulance_share.clamp(0.0, 1.0)) {
            let arrival: i64 = rng.random_range(0..6);
            let golden_time = arrival + rng.random_range(15..30);
            record.push_str(&format!("{}.{}", arrival, golden_time));
        }
        records.push(record);
    }

    records.join(":")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::parser::parse_descriptor;
    use crate::agents::vehicle::VehicleKind;

    #[test]
    fn test_generated_descriptor_parses() {
        let descriptor = generate_descriptor(8, 0.5);
        let vehicles = parse_descriptor(&descriptor).unwrap();
        assert_eq!(vehicles.len(), 8);
        for vehicle in &vehicles {
            if vehicle.kind == VehicleKind::Ambulance {
                assert!(vehicle.arrival <= vehicle.golden_time);
            }
        }
    }

    #[test]
    fn test_count_is_capped() {
        let descriptor = generate_descriptor(40, 0.0);
        let vehicles = parse_descriptor(&descriptor).unwrap();
        assert_eq!(vehicles.len(), MAX_VEHICLES);
    }

    #[test]
    fn test_all_normal_when_share_is_zero() {
        let descriptor = generate_descriptor(10, 0.0);
        let vehicles = parse_descriptor(&descriptor).unwrap();
        assert!(vehicles.iter().all(|v| v.kind == VehicleKind::Normal));
    }
}
