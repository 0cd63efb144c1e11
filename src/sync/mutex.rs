use crate::sync::semaphore::PrioritySemaphore;
use std::sync::Mutex;
use std::thread::{self, ThreadId};

/// Single-holder lock built on a one-permit [`PrioritySemaphore`].
///
/// The lock remembers which thread holds it. Releasing from any other thread
/// and re-acquiring while already held are programmer faults and panic.
/// Contended acquires park the caller at the supplied priority, so an urgent
/// agent is handed the lock before any patient one.
#[derive(Debug)]
pub struct PriorityMutex {
    semaphore: PrioritySemaphore,
    holder: Mutex<Option<ThreadId>>,
}

impl Default for PriorityMutex {
    fn default() -> Self {
        Self::new()
    }
}

impl PriorityMutex {
    pub fn new() -> Self {
        Self {
            semaphore: PrioritySemaphore::new(1),
            holder: Mutex::new(None),
        }
    }

    /// Acquires the lock, blocking at the given priority while it is held.
    ///
    /// # Panics
    /// Panics if the calling thread already holds this lock.
    pub fn acquire(&self, priority: i32) {
        assert!(
            !self.held_by_current_thread(),
            "recursive acquisition of a priority mutex"
        );
        self.semaphore.down(priority);
        let mut holder = self.holder.lock().expect("mutex holder poisoned");
        *holder = Some(thread::current().id());
    }

    /// Acquires the lock iff it is free right now.
    pub fn try_acquire(&self, priority: i32) -> bool {
        assert!(
            !self.held_by_current_thread(),
            "recursive acquisition of a priority mutex"
        );
        if !self.semaphore.try_down(priority) {
            return false;
        }
        let mut holder = self.holder.lock().expect("mutex holder poisoned");
        *holder = Some(thread::current().id());
        true
    }

    /// Releases the lock.
    ///
    /// # Panics
    /// Panics if the calling thread is not the current holder.
    pub fn release(&self) {
        {
            let mut holder = self.holder.lock().expect("mutex holder poisoned");
            assert_eq!(
                *holder,
                Some(thread::current().id()),
                "priority mutex released by a thread that does not hold it"
            );
            *holder = None;
        }
        self.semaphore.up();
    }

    /// True iff the calling thread is the current holder.
    pub fn held_by_current_thread(&self) -> bool {
        let holder = self.holder.lock().expect("mutex holder poisoned");
        *holder == Some(thread::current().id())
    }

    /// True iff any thread currently holds the lock.
    pub fn is_held(&self) -> bool {
        self.holder
            .lock()
            .expect("mutex holder poisoned")
            .is_some()
    }

    pub(crate) fn semaphore_value(&self) -> i32 {
        self.semaphore.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_release_restores_semaphore() {
        let lock = PriorityMutex::new();
        lock.acquire(1);
        assert!(lock.held_by_current_thread());
        lock.release();
        assert!(!lock.is_held());
        assert_eq!(lock.semaphore_value(), 1);
    }

    #[test]
    fn test_try_acquire_fails_when_held() {
        let lock = PriorityMutex::new();
        assert!(lock.try_acquire(1));
        let lock = std::sync::Arc::new(lock);
        let contender = std::sync::Arc::clone(&lock);
        let grabbed = std::thread::spawn(move || contender.try_acquire(2))
            .join()
            .unwrap();
        assert!(!grabbed);
        lock.release();
    }

    #[test]
    #[should_panic(expected = "recursive acquisition")]
    fn test_recursive_acquire_panics() {
        let lock = PriorityMutex::new();
        lock.acquire(1);
        lock.acquire(1);
    }

    #[test]
    #[should_panic(expected = "does not hold")]
    fn test_foreign_release_panics() {
        let lock = std::sync::Arc::new(PriorityMutex::new());
        let holder = std::sync::Arc::clone(&lock);
        std::thread::spawn(move || holder.acquire(1)).join().unwrap();
        lock.release();
    }
}
