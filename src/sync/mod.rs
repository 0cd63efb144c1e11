//! # Priority Synchronisation Module
//!
//! Priority-aware synchronisation primitives shared by every agent in the
//! simulation.
//!
//! All primitives are built on top of one container: the
//! [`waiters::PriorityWaitQueue`], an ordered queue of blocked agents where
//! each waiter carries its own single-shot wake signal. Releasing a resource
//! always wakes the highest-priority waiter first; waiters of equal priority
//! are released in arrival order.
//!
//! ## Components
//!
//! - [`waiters::PriorityWaitQueue`] - ordered waiter container
//! - [`waiters::WaiterSignal`] - private one-shot signal per blocked agent
//! - [`semaphore::PrioritySemaphore`] - counting semaphore with priority wakeups
//! - [`mutex::PriorityMutex`] - single-holder lock with holder tracking
//! - [`condvar::PriorityCondVar`] - condition variable over a [`mutex::PriorityMutex`]
//! - [`priority`] - the priority constants used across the whole crate
//!
//! ## Blocking contract
//!
//! `down`, `acquire` and `wait` may suspend the calling thread; every
//! `try_*` variant returns immediately. Misuse (releasing a lock the caller
//! does not hold, re-acquiring a held lock, waiting on a condition without
//! the lock) is a programmer fault and panics with a diagnostic.
pub mod condvar;
pub mod mutex;
pub mod priority;
pub mod semaphore;
pub mod waiters;

pub use self::condvar::PriorityCondVar;
pub use self::mutex::PriorityMutex;
pub use self::semaphore::PrioritySemaphore;
