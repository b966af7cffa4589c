//! In-memory implementations of the provider traits.
//!
//! Used by unit and integration tests and handy for offline demos. Each mock
//! is `Clone` and shares its state between clones, so a test can keep one
//! handle for assertions while the environment owns another.

pub mod catalog;
pub mod identity;
pub mod storage;

pub use catalog::MockCatalog;
pub use identity::MockIdentity;
pub use storage::InMemoryKvStore;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a mock's state, ignoring poisoning from a panicked test thread.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
