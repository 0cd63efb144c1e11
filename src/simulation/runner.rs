use crate::agents::agent::VehicleAgent;
use crate::agents::parser::{DescriptorError, parse_descriptor};
use crate::agents::vehicle::{Vehicle, VehicleID, VehicleKind};
use crate::barrier::step_barrier::{Tick, TickHook};
use crate::log_main;
use crate::simulation::world::World;
use crate::traffic_lights::controller::LightAgent;
use crate::verbose::{EVENT_SESSION_DONE, EVENT_SESSION_START};
use std::fmt;
use std::sync::Arc;
use std::thread;
use uuid::Uuid;

/// Outcome of one vehicle's run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleVerdict {
    /// A normal vehicle reached its destination.
    Arrived,
    /// An ambulance reached its destination within its golden time.
    ArrivedInTime,
    /// An ambulance gave up after its golden time passed.
    MissedDeadline,
}

impl fmt::Display for VehicleVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleVerdict::Arrived => write!(f, "arrived"),
            VehicleVerdict::ArrivedInTime => write!(f, "arrived_in_time"),
            VehicleVerdict::MissedDeadline => write!(f, "missed_deadline"),
        }
    }
}

/// Per-vehicle entry of a [`SimulationSummary`].
#[derive(Debug, Clone)]
pub struct VehicleResult {
    pub id: VehicleID,
    pub kind: VehicleKind,
    pub finished_at: Option<Tick>,
    pub verdict: VehicleVerdict,
}

/// Result of a completed run: final tick count plus one record per vehicle,
/// in descriptor order.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub session: Uuid,
    pub total_steps: Tick,
    pub results: Vec<VehicleResult>,
}

impl SimulationSummary {
    /// True iff every vehicle reached its destination (deadline misses
    /// count as not arrived).
    pub fn all_arrived(&self) -> bool {
        self.results
            .iter()
            .all(|result| result.verdict != VehicleVerdict::MissedDeadline)
    }

    pub fn deadline_misses(&self) -> usize {
        self.results
            .iter()
            .filter(|result| result.verdict == VehicleVerdict::MissedDeadline)
            .count()
    }

    pub fn result_for(&self, id: VehicleID) -> Option<&VehicleResult> {
        self.results.iter().find(|result| result.id == id)
    }
}

/// One complete crossing run: world construction, agent threads, join,
/// summary.
///
/// # Example
/// ```no_run
/// use crossroads_sim_core::simulation::SimulationSession;
///
/// let session = SimulationSession::new("1AC:2BD").unwrap().build();
/// let summary = session.run();
/// assert!(summary.all_arrived());
/// ```
pub struct SimulationSession {
    world: Arc<World>,
}

impl SimulationSession {
    /// Parses the vehicle descriptor and returns a builder for the session.
    pub fn new(descriptor: &str) -> Result<SimulationSessionBuilder, DescriptorError> {
        let vehicles = parse_descriptor(descriptor)?;
        Ok(SimulationSessionBuilder {
            vehicles,
            tick_hook: None,
        })
    }

    pub fn world(&self) -> &Arc<World> {
        &self.world
    }

    /// Spawns one named thread per vehicle plus the traffic-light thread,
    /// joins them all, and reports the per-vehicle outcomes.
    pub fn run(&self) -> SimulationSummary {
        let world = &self.world;
        log_main!(
            EVENT_SESSION_START,
            "crossing session started",
            session = %world.id(),
            vehicles = world.vehicles().len()
        );

        let light_agent = LightAgent::new(
            world.traffic_light_arc(),
            world.vehicles_arc(),
            world.cell_locks_arc(),
            world.barrier_arc(),
        );
        let mut handles = Vec::with_capacity(world.vehicles().len() + 1);
        handles.push(
            thread::Builder::new()
                .name("traffic-light".to_string())
                .spawn(move || light_agent.run())
                .expect("failed to spawn traffic-light thread"),
        );

        for vehicle in world.vehicles().values() {
            let agent = VehicleAgent::new(Arc::clone(world), Arc::clone(vehicle));
            handles.push(
                thread::Builder::new()
                    .name(format!("vehicle-{}", vehicle.id))
                    .spawn(move || agent.run())
                    .expect("failed to spawn vehicle thread"),
            );
        }

        for handle in handles {
            handle.join().expect("agent thread panicked");
        }

        let summary = self.summarise();
        log_main!(
            EVENT_SESSION_DONE,
            "crossing session finished",
            session = %world.id(),
            total_steps = summary.total_steps,
            deadline_misses = summary.deadline_misses()
        );
        summary
    }

    fn summarise(&self) -> SimulationSummary {
        let results = self
            .world
            .vehicles()
            .values()
            .map(|vehicle| {
                let verdict = match (vehicle.kind, vehicle.deadline_missed()) {
                    (VehicleKind::Normal, _) => VehicleVerdict::Arrived,
                    (VehicleKind::Ambulance, false) => VehicleVerdict::ArrivedInTime,
                    (VehicleKind::Ambulance, true) => VehicleVerdict::MissedDeadline,
                };
                VehicleResult {
                    id: vehicle.id,
                    kind: vehicle.kind,
                    finished_at: vehicle.finished_at(),
                    verdict,
                }
            })
            .collect();
        SimulationSummary {
            session: self.world.id(),
            total_steps: self.world.step(),
            results,
        }
    }
}

/// A builder pattern implementation for constructing `SimulationSession`
/// objects.
pub struct SimulationSessionBuilder {
    vehicles: Vec<Vehicle>,
    tick_hook: Option<TickHook>,
}

impl SimulationSessionBuilder {
    /// Installs a callback fired once per tick advance; used by tests to
    /// sample invariants and by visualisers to draw the map.
    pub fn with_tick_hook(mut self, hook: TickHook) -> Self {
        self.tick_hook = Some(hook);
        self
    }

    /// Builds the final `SimulationSession` object.
    pub fn build(self) -> SimulationSession {
        let mut builder = World::new(self.vehicles);
        if let Some(hook) = self.tick_hook {
            builder = builder.with_tick_hook(hook);
        }
        SimulationSession {
            world: Arc::new(builder.build()),
        }
    }
}
