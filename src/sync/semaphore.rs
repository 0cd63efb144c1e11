use crate::sync::waiters::PriorityWaitQueue;
use std::sync::Mutex;

#[derive(Debug)]
struct SemaphoreState {
    value: i32,
    waiters: PriorityWaitQueue,
}

/// Counting semaphore that releases waiters in priority order.
///
/// `down` consumes a permit or blocks; `up` hands the release directly to the
/// highest-priority waiter when one exists, so the permit can never be stolen
/// by a late arrival with a lower priority. Only when nobody is waiting does
/// `up` increment the counter.
///
/// # Examples
///
/// ```rust
/// use crossroads_sim_core::sync::PrioritySemaphore;
///
/// let sema = PrioritySemaphore::new(1);
/// assert!(sema.try_down(1));
/// assert!(!sema.try_down(1));
/// sema.up();
/// assert!(sema.try_down(1));
/// ```
#[derive(Debug)]
pub struct PrioritySemaphore {
    state: Mutex<SemaphoreState>,
}

impl PrioritySemaphore {
    /// Creates a semaphore holding `value` permits.
    ///
    /// # Panics
    /// Panics if `value` is negative.
    pub fn new(value: i32) -> Self {
        assert!(value >= 0, "semaphore initialised with negative value");
        Self {
            state: Mutex::new(SemaphoreState {
                value,
                waiters: PriorityWaitQueue::new(),
            }),
        }
    }

    /// Takes a permit, blocking at the given priority when none is available.
    pub fn down(&self, priority: i32) {
        let signal = {
            let mut state = self.state.lock().expect("semaphore state poisoned");
            if state.value > 0 {
                state.value -= 1;
                return;
            }
            state.waiters.enqueue(priority)
        };
        signal.wait();
    }

    /// Takes a permit iff one is available right now. Never blocks and never
    /// enqueues the caller.
    pub fn try_down(&self, _priority: i32) -> bool {
        let mut state = self.state.lock().expect("semaphore state poisoned");
        if state.value > 0 {
            state.value -= 1;
            return true;
        }
        false
    }

    /// Returns a permit. If agents are blocked, the permit is handed to the
    /// highest-priority one and the counter is left untouched.
    pub fn up(&self) {
        let woken = {
            let mut state = self.state.lock().expect("semaphore state poisoned");
            match state.waiters.pop_highest() {
                Some(signal) => Some(signal),
                None => {
                    state.value += 1;
                    None
                }
            }
        };
        if let Some(signal) = woken {
            signal.notify();
        }
    }

    /// Current permit count. Blocked waiters are not reflected here.
    pub fn value(&self) -> i32 {
        self.state.lock().expect("semaphore state poisoned").value
    }

    /// Number of agents currently blocked in [`PrioritySemaphore::down`].
    pub fn waiting(&self) -> usize {
        self.state
            .lock()
            .expect("semaphore state poisoned")
            .waiters
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_try_down_never_blocks() {
        let sema = PrioritySemaphore::new(2);
        assert!(sema.try_down(1));
        assert!(sema.try_down(1));
        assert!(!sema.try_down(1));
        assert_eq!(sema.value(), 0);
    }

    #[test]
    fn test_up_without_waiters_increments() {
        let sema = PrioritySemaphore::new(0);
        sema.up();
        sema.up();
        assert_eq!(sema.value(), 2);
    }

    #[test]
    fn test_down_up_leaves_value_unchanged() {
        let sema = PrioritySemaphore::new(3);
        sema.down(1);
        sema.up();
        assert_eq!(sema.value(), 3);
    }

    #[test]
    fn test_waiters_released_by_descending_priority() {
        let sema = Arc::new(PrioritySemaphore::new(0));
        let release_counter = Arc::new(AtomicUsize::new(0));
        let mut handles = Vec::new();

        for priority in [1, 3, 2] {
            let sema = Arc::clone(&sema);
            let release_counter = Arc::clone(&release_counter);
            handles.push(thread::spawn(move || {
                sema.down(priority);
                let order = release_counter.fetch_add(1, Ordering::SeqCst);
                (priority, order)
            }));
        }

        // Let all three threads park before releasing any permit.
        while sema.waiting() < 3 {
            thread::sleep(Duration::from_millis(1));
        }
        for _ in 0..3 {
            sema.up();
            thread::sleep(Duration::from_millis(10));
        }

        let mut results: Vec<(i32, usize)> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();
        results.sort_by_key(|&(_, order)| order);
        let priorities: Vec<i32> = results.into_iter().map(|(p, _)| p).collect();
        assert_eq!(priorities, vec![3, 2, 1]);
    }
}
