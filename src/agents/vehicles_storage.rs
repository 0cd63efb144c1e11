use crate::agents::vehicle::{Vehicle, VehicleID};
use indexmap::IndexMap;
use std::sync::Arc;

/// Insertion-ordered storage of every vehicle in the run.
///
/// This wraps an internal `IndexMap<VehicleID, Arc<Vehicle>>` but hides the
/// map API behind the handful of accessors the simulation needs. Insertion
/// order is the descriptor order, which keeps logs and summaries stable.
/// The table itself is immutable once the world is built; per-vehicle
/// dynamic fields live inside [`Vehicle`] as atomics.
#[derive(Debug, Default)]
pub struct VehicleTable(IndexMap<VehicleID, Arc<Vehicle>>);

impl VehicleTable {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn from_vehicles(vehicles: Vec<Vehicle>) -> Self {
        let mut table = Self::new();
        for vehicle in vehicles {
            table.insert(vehicle);
        }
        table
    }

    pub fn insert(&mut self, vehicle: Vehicle) {
        self.0.insert(vehicle.id, Arc::new(vehicle));
    }

    pub fn get(&self, id: VehicleID) -> Option<&Arc<Vehicle>> {
        self.0.get(&id)
    }

    pub fn values(&self) -> indexmap::map::Values<'_, VehicleID, Arc<Vehicle>> {
        self.0.values()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, VehicleID, Arc<Vehicle>> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_preserved() {
        let mut table = VehicleTable::new();
        for id in ['3', '1', '2'] {
            table.insert(Vehicle::new(id).build());
        }
        let ids: Vec<VehicleID> = table.values().map(|v| v.id).collect();
        assert_eq!(ids, vec!['3', '1', '2']);
        assert_eq!(table.len(), 3);
        assert!(table.get('1').is_some());
        assert!(table.get('9').is_none());
    }
}
