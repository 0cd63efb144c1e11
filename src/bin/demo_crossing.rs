use crossroads_sim_core::simulation::{CrossingState, SimulationSession};
use crossroads_sim_core::verbose::{VerboseLevel, set_verbose_level};
use std::env;
use std::sync::Arc;

/// Runs a crossing scenario and draws the map after every tick.
///
/// Usage: `demo_crossing [descriptor]`, e.g. `demo_crossing "1AC:2BD5.20"`.
fn main() {
    set_verbose_level(VerboseLevel::Main);

    let descriptor = env::args()
        .nth(1)
        .unwrap_or_else(|| "1AC:2BD:3CA:4DB5.25".to_string());

    let builder = match SimulationSession::new(&descriptor) {
        Ok(builder) => builder,
        Err(err) => {
            eprintln!("bad descriptor '{}': {}", descriptor, err);
            std::process::exit(1);
        }
    };

    // The session has to exist before the hook can capture snapshots, so
    // wire the world reference in through a once-settable slot.
    let world_slot: Arc<std::sync::OnceLock<Arc<crossroads_sim_core::simulation::World>>> =
        Arc::new(std::sync::OnceLock::new());
    let hook_slot = Arc::clone(&world_slot);
    let session = builder
        .with_tick_hook(Box::new(move |step| {
            if let Some(world) = hook_slot.get() {
                let state = CrossingState::capture(world, step);
                println!("{}", state.render_ascii());
            }
        }))
        .build();
    let _ = world_slot.set(Arc::clone(session.world()));

    let summary = session.run();
    println!("finished after {} steps", summary.total_steps);
    for result in &summary.results {
        match result.finished_at {
            Some(step) => println!("  {} ({}): {} at step {}", result.id, result.kind, result.verdict, step),
            None => println!("  {} ({}): {}", result.id, result.kind, result.verdict),
        }
    }
}
