use crate::agents::vehicle::VehicleID;
use crate::zones::table::ZoneTable;
use crate::zones::zone::{NUM_ZONES, Zone};
use std::sync::RwLock;

/// Symmetric Boolean relation over zones: `true` means movement into one
/// zone is unsafe while the other is held by a different vehicle.
///
/// Built once at startup and only ever read afterwards; readers take the
/// shared side of the lock.
#[derive(Debug)]
pub struct ConflictMatrix {
    conflicting: RwLock<[[bool; NUM_ZONES]; NUM_ZONES]>,
}

impl Default for ConflictMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl ConflictMatrix {
    /// Builds the crossing relation: axis-crossing entry pairs conflict,
    /// the center conflicts with every other zone, same-axis entries do not.
    pub fn new() -> Self {
        let mut conflicting = [[false; NUM_ZONES]; NUM_ZONES];
        for a in Zone::ALL {
            for b in Zone::ALL {
                if a == b {
                    continue;
                }
                let crossing = match (a.axis(), b.axis()) {
                    // Two entry zones conflict iff their axes differ.
                    (Some(axis_a), Some(axis_b)) => axis_a != axis_b,
                    // The center is part of both axes.
                    _ => true,
                };
                conflicting[a.index()][b.index()] = crossing;
            }
        }
        Self {
            conflicting: RwLock::new(conflicting),
        }
    }

    /// True iff the pair is marked as conflicting.
    pub fn is_conflicting(&self, a: Zone, b: Zone) -> bool {
        let conflicting = self.conflicting.read().expect("conflict matrix poisoned");
        conflicting[a.index()][b.index()]
    }

    /// Checks whether `vehicle` may move into `to_zone` given the zones
    /// currently held by other vehicles: the move is safe iff no occupied
    /// zone with a different holder conflicts with the target.
    pub fn is_safe(&self, to_zone: Zone, vehicle: VehicleID, zones: &ZoneTable) -> bool {
        let conflicting = self.conflicting.read().expect("conflict matrix poisoned");
        for (held_zone, holder) in zones.occupied_zones() {
            if holder == vehicle {
                continue;
            }
            if conflicting[to_zone.index()][held_zone.index()] {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_shape() {
        let matrix = ConflictMatrix::new();
        // Same-axis entries are compatible.
        assert!(!matrix.is_conflicting(Zone::NorthEntry, Zone::SouthEntry));
        assert!(!matrix.is_conflicting(Zone::WestEntry, Zone::EastEntry));
        // Axis-crossing entries conflict.
        assert!(matrix.is_conflicting(Zone::NorthEntry, Zone::WestEntry));
        assert!(matrix.is_conflicting(Zone::SouthEntry, Zone::EastEntry));
        // The center conflicts with every other zone but not itself.
        for zone in [
            Zone::NorthEntry,
            Zone::SouthEntry,
            Zone::WestEntry,
            Zone::EastEntry,
        ] {
            assert!(matrix.is_conflicting(Zone::Center, zone));
            assert!(matrix.is_conflicting(zone, Zone::Center));
        }
        assert!(!matrix.is_conflicting(Zone::Center, Zone::Center));
    }

    #[test]
    fn test_symmetry() {
        let matrix = ConflictMatrix::new();
        for a in Zone::ALL {
            for b in Zone::ALL {
                assert_eq!(
                    matrix.is_conflicting(a, b),
                    matrix.is_conflicting(b, a),
                    "relation must be symmetric for {} / {}",
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn test_is_safe_against_occupancy() {
        let matrix = ConflictMatrix::new();
        let zones = ZoneTable::new();
        assert!(zones.try_reserve('1', Zone::NorthEntry, 1));

        // Same axis: a second vehicle may enter the south entry.
        assert!(matrix.is_safe(Zone::SouthEntry, '2', &zones));
        // Crossing axis: west entry is unsafe while the north entry is held.
        assert!(!matrix.is_safe(Zone::WestEntry, '2', &zones));
        // The holder itself is never blocked by its own reservation.
        assert!(matrix.is_safe(Zone::WestEntry, '1', &zones));

        zones.release('1', Zone::NorthEntry);
        assert!(matrix.is_safe(Zone::WestEntry, '2', &zones));
    }
}
