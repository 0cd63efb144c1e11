use crate::agents::vehicle::{VehicleID, VehicleKind, VehicleState};
use crate::barrier::step_barrier::Tick;
use crate::grid::cell_locks::{GRID_COLS, GRID_ROWS};
use crate::map::position::Position;
use crate::simulation::world::World;
use crate::traffic_lights::phase::LightPhase;
use serde_json::{Value, json};

/// State of a single vehicle at a specific tick.
#[derive(Debug, Clone)]
pub struct VehicleSnapshot {
    pub id: VehicleID,
    pub kind: VehicleKind,
    pub state: VehicleState,
    pub position: Position,
}

/// State of the crossing at a specific tick.
///
/// Snapshots are taken from the tick hook, where every agent is parked at
/// the barrier, so the observed positions are a consistent picture of the
/// finished tick.
#[derive(Debug, Clone)]
pub struct CrossingState {
    pub step: Tick,
    pub phase: LightPhase,
    pub vehicles: Vec<VehicleSnapshot>,
    pub occupied_zones: usize,
}

impl CrossingState {
    /// Captures the current state of the world.
    pub fn capture(world: &World, step: Tick) -> Self {
        let vehicles = world
            .vehicles()
            .values()
            .map(|vehicle| VehicleSnapshot {
                id: vehicle.id,
                kind: vehicle.kind,
                state: vehicle.state(),
                position: vehicle.position(),
            })
            .collect();
        Self {
            step,
            phase: world.traffic_light().phase(),
            vehicles,
            occupied_zones: world.zones().occupied_count(),
        }
    }

    /// Serialises the snapshot for external visualisers.
    pub fn to_json(&self) -> Value {
        json!({
            "step": self.step,
            "phase": self.phase.to_string(),
            "occupied_zones": self.occupied_zones,
            "vehicles": self.vehicles.iter().map(|v| json!({
                "id": v.id.to_string(),
                "kind": v.kind.to_string(),
                "state": v.state.to_string(),
                "row": v.position.row,
                "col": v.position.col,
            })).collect::<Vec<Value>>(),
        })
    }

    /// Renders the grid as fixed-width ASCII, vehicles shown by id, road
    /// cells as `.`, off-road cells as blanks.
    pub fn render_ascii(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("step {:>3}  {}\n", self.step, self.phase));
        for row in 0..GRID_ROWS {
            for col in 0..GRID_COLS {
                let here = Position::new(row, col);
                let occupant = self
                    .vehicles
                    .iter()
                    .find(|v| v.state == VehicleState::Running && v.position == here);
                match occupant {
                    Some(v) => out.push(v.id),
                    None if is_road_cell(here) => out.push('.'),
                    None => out.push(' '),
                }
                out.push(' ');
            }
            out.push('\n');
        }
        out
    }
}

/// Road cells are the two crossing bands of the map (rows 2 and 4,
/// columns 2 and 4, plus the intersection block they enclose).
fn is_road_cell(pos: Position) -> bool {
    let band = |v: i32| (2..=4).contains(&v);
    band(pos.row) || band(pos.col)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::vehicle::Vehicle;
    use crate::map::routes::Gate;

    fn sample_world() -> World {
        World::new(vec![
            Vehicle::new('1')
                .with_origin(Gate::A)
                .with_destination(Gate::C)
                .build(),
        ])
        .build()
    }

    #[test]
    fn test_capture_reflects_vehicle_fields() {
        let world = sample_world();
        let vehicle = world.vehicles().get('1').unwrap();
        vehicle.set_state(VehicleState::Running);
        vehicle.set_position(Position::new(4, 0));

        let state = CrossingState::capture(&world, 3);
        assert_eq!(state.step, 3);
        assert_eq!(state.phase, LightPhase::NsGreen);
        assert_eq!(state.vehicles.len(), 1);
        assert_eq!(state.vehicles[0].position, Position::new(4, 0));
        assert_eq!(state.occupied_zones, 0);
    }

    #[test]
    fn test_json_shape() {
        let world = sample_world();
        let state = CrossingState::capture(&world, 0);
        let value = state.to_json();
        assert_eq!(value["step"], 0);
        assert_eq!(value["phase"], "ns_green");
        assert_eq!(value["vehicles"].as_array().unwrap().len(), 1);
        assert_eq!(value["vehicles"][0]["id"], "1");
        assert_eq!(value["vehicles"][0]["state"], "ready");
    }

    #[test]
    fn test_ascii_render_marks_vehicle() {
        let world = sample_world();
        let vehicle = world.vehicles().get('1').unwrap();
        vehicle.set_state(VehicleState::Running);
        vehicle.set_position(Position::new(4, 0));

        let drawing = CrossingState::capture(&world, 1).render_ascii();
        let rows: Vec<&str> = drawing.lines().collect();
        // Header line plus seven grid rows.
        assert_eq!(rows.len(), 8);
        assert!(rows[5].starts_with('1'), "vehicle missing from row 4: {}", rows[5]);
    }
}
