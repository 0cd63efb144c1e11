use crate::admission::controller::AdmissionController;
use crate::agents::vehicle::Vehicle;
use crate::agents::vehicles_storage::VehicleTable;
use crate::barrier::step_barrier::{StepBarrier, Tick, TickHook};
use crate::conflicts::matrix::ConflictMatrix;
use crate::grid::cell_locks::CellLockGrid;
use crate::traffic_lights::controller::TrafficLight;
use crate::zones::table::ZoneTable;
use std::sync::Arc;
use uuid::Uuid;

/// The complete shared state of one crossing run.
///
/// A single `World` value owns every subsystem and is handed to each agent
/// behind an `Arc`; nothing in the crate lives in module-level statics. The
/// barrier quorum is the vehicle count plus one for the traffic-light agent.
#[derive(Debug)]
pub struct World {
    id: Uuid,
    vehicles: Arc<VehicleTable>,
    cell_locks: Arc<CellLockGrid>,
    zones: Arc<ZoneTable>,
    conflicts: Arc<ConflictMatrix>,
    traffic_light: Arc<TrafficLight>,
    barrier: Arc<StepBarrier>,
    admission: AdmissionController,
}

impl World {
    /// Constructs a new `WorldBuilder` for the given vehicles.
    ///
    /// # Example
    /// ```
    /// use crossroads_sim_core::agents::Vehicle;
    /// use crossroads_sim_core::map::Gate;
    /// use crossroads_sim_core::simulation::World;
    ///
    /// let vehicles = vec![
    ///     Vehicle::new('1')
    ///         .with_origin(Gate::A)
    ///         .with_destination(Gate::C)
    ///         .build(),
    /// ];
    /// let world = World::new(vehicles).build();
    /// assert_eq!(world.vehicles().len(), 1);
    /// ```
    pub fn new(vehicles: Vec<Vehicle>) -> WorldBuilder {
        WorldBuilder {
            vehicles,
            tick_hook: None,
        }
    }

    /// Unique identifier of this run.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn vehicles(&self) -> &VehicleTable {
        &self.vehicles
    }

    pub fn cell_locks(&self) -> &CellLockGrid {
        &self.cell_locks
    }

    pub fn zones(&self) -> &ZoneTable {
        &self.zones
    }

    pub fn conflicts(&self) -> &ConflictMatrix {
        &self.conflicts
    }

    pub fn traffic_light(&self) -> &TrafficLight {
        &self.traffic_light
    }

    pub fn barrier(&self) -> &StepBarrier {
        &self.barrier
    }

    pub fn admission(&self) -> &AdmissionController {
        &self.admission
    }

    /// Current global step, shorthand for the barrier's counter.
    pub fn step(&self) -> Tick {
        self.barrier.step()
    }

    pub(crate) fn traffic_light_arc(&self) -> Arc<TrafficLight> {
        Arc::clone(&self.traffic_light)
    }

    pub(crate) fn vehicles_arc(&self) -> Arc<VehicleTable> {
        Arc::clone(&self.vehicles)
    }

    pub(crate) fn cell_locks_arc(&self) -> Arc<CellLockGrid> {
        Arc::clone(&self.cell_locks)
    }

    pub(crate) fn barrier_arc(&self) -> Arc<StepBarrier> {
        Arc::clone(&self.barrier)
    }
}

/// A builder pattern implementation for constructing `World` objects.
pub struct WorldBuilder {
    vehicles: Vec<Vehicle>,
    tick_hook: Option<TickHook>,
}

impl WorldBuilder {
    /// Installs the per-tick callback fired by the barrier after every
    /// advance. It must not call back into the barrier.
    pub fn with_tick_hook(mut self, hook: TickHook) -> Self {
        self.tick_hook = Some(hook);
        self
    }

    /// Builds the final `World` object.
    pub fn build(self) -> World {
        let participants = self.vehicles.len() + 1; // vehicles + traffic light
        let traffic_light = Arc::new(TrafficLight::new());
        let zones = Arc::new(ZoneTable::new());
        let conflicts = Arc::new(ConflictMatrix::new());
        let admission = AdmissionController::new(
            Arc::clone(&traffic_light),
            Arc::clone(&zones),
            Arc::clone(&conflicts),
        );
        World {
            id: Uuid::new_v4(),
            vehicles: Arc::new(VehicleTable::from_vehicles(self.vehicles)),
            cell_locks: Arc::new(CellLockGrid::new()),
            zones,
            conflicts,
            traffic_light,
            barrier: Arc::new(StepBarrier::new(participants, self.tick_hook)),
            admission,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::routes::Gate;

    #[test]
    fn test_world_wiring() {
        let vehicles = vec![
            Vehicle::new('1')
                .with_origin(Gate::A)
                .with_destination(Gate::C)
                .build(),
            Vehicle::new('2')
                .with_origin(Gate::B)
                .with_destination(Gate::D)
                .build(),
        ];
        let world = World::new(vehicles).build();
        assert_eq!(world.vehicles().len(), 2);
        // Two vehicles plus the traffic light rendezvous at the barrier.
        assert_eq!(world.barrier().active_agents(), 3);
        assert_eq!(world.step(), 0);
        assert_eq!(world.zones().occupied_count(), 0);
    }
}
