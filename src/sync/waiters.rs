use std::sync::{Arc, Condvar, Mutex};

/// Private one-shot wake signal owned by a single blocked agent.
///
/// A waiter parks on its own signal instead of a shared condition so that a
/// release can wake exactly the chosen waiter and nobody else. The signal is
/// sticky: a `notify` delivered before `wait` is not lost.
#[derive(Debug, Default)]
pub struct WaiterSignal {
    woken: Mutex<bool>,
    bell: Condvar,
}

impl WaiterSignal {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            woken: Mutex::new(false),
            bell: Condvar::new(),
        })
    }

    /// Blocks the calling thread until [`WaiterSignal::notify`] has been called.
    pub fn wait(&self) {
        let mut woken = self.woken.lock().expect("waiter signal poisoned");
        while !*woken {
            woken = self.bell.wait(woken).expect("waiter signal poisoned");
        }
    }

    /// Wakes the owning waiter. Idempotent.
    pub fn notify(&self) {
        let mut woken = self.woken.lock().expect("waiter signal poisoned");
        *woken = true;
        self.bell.notify_one();
    }
}

#[derive(Debug)]
struct WaiterEntry {
    priority: i32,
    signal: Arc<WaiterSignal>,
}

/// Ordered container of blocked agents.
///
/// Entries are kept sorted by descending priority; entries of equal priority
/// keep their insertion order, so the queue realises "highest priority first,
/// FIFO within a priority class". The queue itself is not thread-safe - the
/// owning primitive guards it with its internal lock.
///
/// # Examples
///
/// ```rust
/// use crossroads_sim_core::sync::waiters::PriorityWaitQueue;
///
/// let mut queue = PriorityWaitQueue::new();
/// let low = queue.enqueue(1);
/// let high = queue.enqueue(3);
/// // The high-priority waiter is dequeued first even though it arrived later.
/// let first = queue.pop_highest().unwrap();
/// assert!(std::sync::Arc::ptr_eq(&first, &high));
/// let second = queue.pop_highest().unwrap();
/// assert!(std::sync::Arc::ptr_eq(&second, &low));
/// ```
#[derive(Debug, Default)]
pub struct PriorityWaitQueue {
    entries: Vec<WaiterEntry>,
}

impl PriorityWaitQueue {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registers a new waiter at the given priority and returns its private
    /// signal. The caller is expected to block on the signal after dropping
    /// whatever lock guards this queue.
    pub fn enqueue(&mut self, priority: i32) -> Arc<WaiterSignal> {
        let signal = WaiterSignal::new();
        let at = self
            .entries
            .iter()
            .position(|entry| entry.priority < priority)
            .unwrap_or(self.entries.len());
        self.entries.insert(
            at,
            WaiterEntry {
                priority,
                signal: Arc::clone(&signal),
            },
        );
        signal
    }

    /// Removes and returns the signal of the highest-priority waiter, if any.
    pub fn pop_highest(&mut self) -> Option<Arc<WaiterSignal>> {
        if self.entries.is_empty() {
            return None;
        }
        Some(self.entries.remove(0).signal)
    }

    /// Removes every waiter and returns their signals in release order.
    pub fn drain_all(&mut self) -> Vec<Arc<WaiterSignal>> {
        self.entries.drain(..).map(|entry| entry.signal).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descending_priority_order() {
        let mut queue = PriorityWaitQueue::new();
        let one = queue.enqueue(1);
        let three = queue.enqueue(3);
        let two = queue.enqueue(2);

        let popped = queue.pop_highest().unwrap();
        assert!(Arc::ptr_eq(&popped, &three));
        let popped = queue.pop_highest().unwrap();
        assert!(Arc::ptr_eq(&popped, &two));
        let popped = queue.pop_highest().unwrap();
        assert!(Arc::ptr_eq(&popped, &one));
        assert!(queue.pop_highest().is_none());
    }

    #[test]
    fn test_fifo_within_priority_class() {
        let mut queue = PriorityWaitQueue::new();
        let first = queue.enqueue(2);
        let second = queue.enqueue(2);
        let third = queue.enqueue(2);

        assert!(Arc::ptr_eq(&queue.pop_highest().unwrap(), &first));
        assert!(Arc::ptr_eq(&queue.pop_highest().unwrap(), &second));
        assert!(Arc::ptr_eq(&queue.pop_highest().unwrap(), &third));
    }

    #[test]
    fn test_sticky_notify_before_wait() {
        let signal = WaiterSignal::new();
        signal.notify();
        // Must not block: the wakeup was recorded before the wait started.
        signal.wait();
    }

    #[test]
    fn test_drain_all_preserves_order() {
        let mut queue = PriorityWaitQueue::new();
        let low = queue.enqueue(1);
        let high = queue.enqueue(5);
        let drained = queue.drain_all();
        assert_eq!(drained.len(), 2);
        assert!(Arc::ptr_eq(&drained[0], &high));
        assert!(Arc::ptr_eq(&drained[1], &low));
        assert!(queue.is_empty());
    }
}
