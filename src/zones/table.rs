use crate::agents::vehicle::VehicleID;
use crate::sync::mutex::PriorityMutex;
use crate::sync::semaphore::PrioritySemaphore;
use crate::zones::zone::{NUM_ZONES, Zone};
use std::sync::Mutex;

/// Upper bound on simultaneously reserved zones across the intersection.
pub const INTERSECTION_CAPACITY: i32 = 4;

#[derive(Debug, Default, Clone, Copy)]
struct ZoneOccupancy {
    occupied: bool,
    holder: Option<VehicleID>,
}

#[derive(Debug)]
struct ZoneSlot {
    lock: PriorityMutex,
    occupancy: Mutex<ZoneOccupancy>,
}

impl Default for ZoneSlot {
    fn default() -> Self {
        Self {
            lock: PriorityMutex::new(),
            occupancy: Mutex::new(ZoneOccupancy::default()),
        }
    }
}

/// Reservation table for the five intersection zones.
///
/// Every reservation consumes one unit of the intersection-wide capacity
/// semaphore *and* the target zone's priority lock, always in that order; a
/// failed zone grab returns the capacity unit before reporting failure.
/// Release runs in reverse order. The pairing invariant is strict: each
/// successful reserve is matched by exactly one release from the same
/// vehicle.
///
/// Multi-zone blocking acquisitions (the emergency ambulance path) are
/// serialised through a single resource-order lock so that no two agents can
/// build a wait cycle across zones.
#[derive(Debug)]
pub struct ZoneTable {
    slots: [ZoneSlot; NUM_ZONES],
    capacity: PrioritySemaphore,
    resource_order: Mutex<()>,
}

impl Default for ZoneTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoneTable {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| ZoneSlot::default()),
            capacity: PrioritySemaphore::new(INTERSECTION_CAPACITY),
            resource_order: Mutex::new(()),
        }
    }

    fn slot(&self, zone: Zone) -> &ZoneSlot {
        &self.slots[zone.index()]
    }

    fn mark_reserved(&self, vehicle: VehicleID, zone: Zone) {
        let mut occupancy = self
            .slot(zone)
            .occupancy
            .lock()
            .expect("zone occupancy poisoned");
        occupancy.occupied = true;
        occupancy.holder = Some(vehicle);
    }

    /// Attempts to reserve `zone` for `vehicle` without blocking.
    ///
    /// Takes a capacity unit first, then the zone lock; if the zone lock is
    /// contended the capacity unit is returned and the call fails.
    pub fn try_reserve(&self, vehicle: VehicleID, zone: Zone, priority: i32) -> bool {
        if !self.capacity.try_down(priority) {
            return false;
        }
        if !self.slot(zone).lock.try_acquire(priority) {
            self.capacity.up();
            return false;
        }
        self.mark_reserved(vehicle, zone);
        true
    }

    /// Blocking reservation, used only by the emergency ambulance path.
    ///
    /// Serialised through the resource-order lock so concurrent blocking
    /// reservations cannot deadlock against each other.
    pub fn reserve_blocking(&self, vehicle: VehicleID, zone: Zone, priority: i32) {
        let _ordering = self.resource_order.lock().expect("resource order poisoned");
        self.capacity.down(priority);
        self.slot(zone).lock.acquire(priority);
        self.mark_reserved(vehicle, zone);
    }

    /// Returns a reservation.
    ///
    /// # Panics
    /// Panics if `vehicle` does not hold the zone.
    pub fn release(&self, vehicle: VehicleID, zone: Zone) {
        {
            let mut occupancy = self
                .slot(zone)
                .occupancy
                .lock()
                .expect("zone occupancy poisoned");
            assert_eq!(
                occupancy.holder,
                Some(vehicle),
                "zone {} released by vehicle '{}' which does not hold it",
                zone,
                vehicle
            );
            occupancy.occupied = false;
            occupancy.holder = None;
        }
        self.slot(zone).lock.release();
        self.capacity.up();
    }

    /// Identity of the vehicle holding `zone`, if any.
    pub fn holder(&self, zone: Zone) -> Option<VehicleID> {
        self.slot(zone)
            .occupancy
            .lock()
            .expect("zone occupancy poisoned")
            .holder
    }

    pub fn is_occupied(&self, zone: Zone) -> bool {
        self.slot(zone)
            .occupancy
            .lock()
            .expect("zone occupancy poisoned")
            .occupied
    }

    /// Snapshot of every occupied zone and its holder.
    pub fn occupied_zones(&self) -> Vec<(Zone, VehicleID)> {
        Zone::ALL
            .iter()
            .filter_map(|&zone| self.holder(zone).map(|vehicle| (zone, vehicle)))
            .collect()
    }

    pub fn occupied_count(&self) -> usize {
        Zone::ALL.iter().filter(|&&z| self.is_occupied(z)).count()
    }

    /// Remaining capacity units, exposed for invariant checks.
    pub fn capacity_value(&self) -> i32 {
        self.capacity.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserve_release_round_trip() {
        let table = ZoneTable::new();
        assert!(table.try_reserve('1', Zone::Center, 1));
        assert_eq!(table.holder(Zone::Center), Some('1'));
        assert_eq!(table.capacity_value(), INTERSECTION_CAPACITY - 1);

        table.release('1', Zone::Center);
        assert_eq!(table.holder(Zone::Center), None);
        assert!(!table.is_occupied(Zone::Center));
        assert_eq!(table.capacity_value(), INTERSECTION_CAPACITY);
    }

    #[test]
    fn test_contended_zone_restores_capacity() {
        let table = std::sync::Arc::new(ZoneTable::new());
        assert!(table.try_reserve('1', Zone::WestEntry, 1));

        // A second vehicle fails on the zone lock and must give the
        // capacity unit back.
        let contender = std::sync::Arc::clone(&table);
        let reserved = std::thread::spawn(move || contender.try_reserve('2', Zone::WestEntry, 1))
            .join()
            .unwrap();
        assert!(!reserved);
        assert_eq!(table.capacity_value(), INTERSECTION_CAPACITY - 1);
        table.release('1', Zone::WestEntry);
    }

    #[test]
    fn test_capacity_bounds_distinct_zone_reservations() {
        let table = ZoneTable::new();
        assert!(table.try_reserve('1', Zone::NorthEntry, 1));
        assert!(table.try_reserve('2', Zone::SouthEntry, 1));
        assert!(table.try_reserve('3', Zone::WestEntry, 1));
        assert!(table.try_reserve('4', Zone::EastEntry, 1));
        // All capacity consumed: a fifth reservation fails even though the
        // center zone itself is free.
        assert!(!table.try_reserve('5', Zone::Center, 1));
        assert_eq!(table.occupied_count(), 4);
        for (zone, vehicle) in table.occupied_zones() {
            table.release(vehicle, zone);
        }
        assert_eq!(table.capacity_value(), INTERSECTION_CAPACITY);
    }

    #[test]
    #[should_panic(expected = "does not hold")]
    fn test_release_by_non_holder_panics() {
        let table = ZoneTable::new();
        assert!(table.try_reserve('1', Zone::Center, 1));
        table.release('2', Zone::Center);
    }
}
