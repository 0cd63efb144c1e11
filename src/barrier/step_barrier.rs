use crate::verbose::EVENT_STEP;
use crate::log_detailed;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Condvar, Mutex};

/// The global discrete-time unit. Advanced only by the barrier.
pub type Tick = i64;

/// Callback fired once per tick advance, after the step counter increments
/// and before the waiting agents are released. It must not call back into
/// the barrier.
pub type TickHook = Box<dyn Fn(Tick) + Send + Sync>;

#[derive(Debug)]
struct BarrierState {
    total_active: usize,
    completed_this_tick: usize,
    generation: u64,
}

/// Step-synchronisation barrier shared by every agent.
///
/// Each active agent calls [`StepBarrier::await_tick`] exactly once per tick.
/// The last caller advances the global step, invokes the tick hook and wakes
/// everyone; all other callers sleep until that wakeup. An agent leaving the
/// simulation calls [`StepBarrier::agent_finished`] instead, which shrinks
/// the quorum and, when the remaining agents are all already parked,
/// performs the very same advance so the tick can never be lost.
pub struct StepBarrier {
    state: Mutex<BarrierState>,
    tick_advanced: Condvar,
    step: AtomicI64,
    hook: Option<TickHook>,
}

impl std::fmt::Debug for StepBarrier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepBarrier")
            .field("step", &self.step())
            .field("active_agents", &self.active_agents())
            .finish()
    }
}

impl StepBarrier {
    /// Creates a barrier for `total_active` participating agents.
    pub fn new(total_active: usize, hook: Option<TickHook>) -> Self {
        Self {
            state: Mutex::new(BarrierState {
                total_active,
                completed_this_tick: 0,
                generation: 0,
            }),
            tick_advanced: Condvar::new(),
            step: AtomicI64::new(0),
            hook,
        }
    }

    /// Current global step. Readable by anyone at any time.
    pub fn step(&self) -> Tick {
        self.step.load(Ordering::SeqCst)
    }

    /// Number of agents still participating in the rendezvous.
    pub fn active_agents(&self) -> usize {
        self.state.lock().expect("barrier state poisoned").total_active
    }

    /// Agents already parked at the barrier in the current tick.
    pub fn completed_this_tick(&self) -> usize {
        self.state
            .lock()
            .expect("barrier state poisoned")
            .completed_this_tick
    }

    /// Rendezvous point called once per tick by every active agent.
    ///
    /// Blocks until all `total_active` agents have arrived; the last arrival
    /// advances the step and releases the rest.
    pub fn await_tick(&self) {
        let mut state = self.state.lock().expect("barrier state poisoned");
        state.completed_this_tick += 1;

        if state.completed_this_tick < state.total_active {
            let generation = state.generation;
            while state.generation == generation {
                state = self
                    .tick_advanced
                    .wait(state)
                    .expect("barrier state poisoned");
            }
            return;
        }

        self.advance(state);
    }

    /// Removes the calling agent from the quorum.
    ///
    /// When every remaining agent is already parked, the tick advances here
    /// instead, otherwise the final tick of the run would never complete.
    pub fn agent_finished(&self) {
        let state = {
            let mut state = self.state.lock().expect("barrier state poisoned");
            assert!(state.total_active > 0, "agent_finished without active agents");
            state.total_active -= 1;
            if state.total_active > 0 && state.completed_this_tick >= state.total_active {
                Some(state)
            } else {
                None
            }
        };
        if let Some(state) = state {
            self.advance(state);
        }
    }

    /// Advance sequence run by whichever agent completed the quorum:
    /// reset the arrival count, bump the step, fire the hook with the
    /// barrier lock dropped, then re-take the lock and release the waiters.
    fn advance(&self, mut state: std::sync::MutexGuard<'_, BarrierState>) {
        state.completed_this_tick = 0;
        let new_step = self.step.fetch_add(1, Ordering::SeqCst) + 1;
        drop(state);

        log_detailed!(EVENT_STEP, "global step advanced", step = new_step);
        if let Some(hook) = &self.hook {
            hook(new_step);
        }

        let mut state = self.state.lock().expect("barrier state poisoned");
        state.generation += 1;
        drop(state);
        self.tick_advanced.notify_all();
    }
}
