use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::store::Store;

/// Shared application state accessible from all handlers.
pub struct AppState {
    store: Mutex<Store>,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// Lock the store. Queries never leave it half-written, so a poisoned
    /// lock is still usable.
    pub fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
