use crate::sync::mutex::PriorityMutex;
use crate::sync::waiters::PriorityWaitQueue;
use std::sync::Mutex;

/// Condition variable whose waiters are released in priority order.
///
/// Unlike a plain condvar there is no shared parking lot: each waiter blocks
/// on its own signal, which lets `signal` pick exactly the most urgent one.
/// All three operations require the caller to hold the associated
/// [`PriorityMutex`]; violating that is a programmer fault and panics.
#[derive(Debug, Default)]
pub struct PriorityCondVar {
    waiters: Mutex<PriorityWaitQueue>,
}

impl PriorityCondVar {
    pub fn new() -> Self {
        Self {
            waiters: Mutex::new(PriorityWaitQueue::new()),
        }
    }

    /// Atomically registers the caller as a waiter, releases `lock`, blocks
    /// until signalled, then re-acquires `lock` at the same priority.
    pub fn wait(&self, lock: &PriorityMutex, priority: i32) {
        assert!(
            lock.held_by_current_thread(),
            "condition wait without holding the associated lock"
        );
        let signal = self
            .waiters
            .lock()
            .expect("condvar waiters poisoned")
            .enqueue(priority);
        lock.release();
        signal.wait();
        lock.acquire(priority);
    }

    /// Wakes the highest-priority waiter, if any.
    pub fn signal(&self, lock: &PriorityMutex) {
        assert!(
            lock.held_by_current_thread(),
            "condition signal without holding the associated lock"
        );
        let woken = self
            .waiters
            .lock()
            .expect("condvar waiters poisoned")
            .pop_highest();
        if let Some(signal) = woken {
            signal.notify();
        }
    }

    /// Wakes every waiter, most urgent first.
    pub fn broadcast(&self, lock: &PriorityMutex) {
        assert!(
            lock.held_by_current_thread(),
            "condition broadcast without holding the associated lock"
        );
        let drained = self
            .waiters
            .lock()
            .expect("condvar waiters poisoned")
            .drain_all();
        for signal in drained {
            signal.notify();
        }
    }

    pub fn waiting(&self) -> usize {
        self.waiters.lock().expect("condvar waiters poisoned").len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_signal_wakes_single_waiter() {
        let lock = Arc::new(PriorityMutex::new());
        let cond = Arc::new(PriorityCondVar::new());

        let waiter_lock = Arc::clone(&lock);
        let waiter_cond = Arc::clone(&cond);
        let handle = thread::spawn(move || {
            waiter_lock.acquire(1);
            waiter_cond.wait(&waiter_lock, 1);
            waiter_lock.release();
        });

        while cond.waiting() == 0 {
            thread::sleep(Duration::from_millis(1));
        }
        lock.acquire(2);
        cond.signal(&lock);
        lock.release();
        handle.join().unwrap();
        assert_eq!(cond.waiting(), 0);
    }

    #[test]
    fn test_broadcast_wakes_everyone() {
        let lock = Arc::new(PriorityMutex::new());
        let cond = Arc::new(PriorityCondVar::new());
        let mut handles = Vec::new();

        for priority in 1..=3 {
            let waiter_lock = Arc::clone(&lock);
            let waiter_cond = Arc::clone(&cond);
            handles.push(thread::spawn(move || {
                waiter_lock.acquire(priority);
                waiter_cond.wait(&waiter_lock, priority);
                waiter_lock.release();
            }));
        }

        while cond.waiting() < 3 {
            thread::sleep(Duration::from_millis(1));
        }
        lock.acquire(2);
        cond.broadcast(&lock);
        lock.release();
        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    #[should_panic(expected = "without holding")]
    fn test_wait_without_lock_panics() {
        let lock = PriorityMutex::new();
        let cond = PriorityCondVar::new();
        cond.wait(&lock, 1);
    }
}
