use std::sync::Arc;

use crate::database::postgres::PgStore;
use crate::database::store::{ResourceStore, UserDirectory};
use crate::testing::MemoryStore;

/// Shared application state: the resource store and the user directory.
/// Both are trait objects so tests and the memory dev mode can swap the
/// backend without touching the handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ResourceStore>,
    pub users: Arc<dyn UserDirectory>,
}

impl AppState {
    pub fn new(store: Arc<dyn ResourceStore>, users: Arc<dyn UserDirectory>) -> Self {
        Self { store, users }
    }

    pub fn postgres() -> Self {
        let pg = Arc::new(PgStore);
        Self {
            store: pg.clone(),
            users: pg,
        }
    }

    pub fn in_memory() -> Self {
        let mem = Arc::new(MemoryStore::default());
        Self {
            store: mem.clone(),
            users: mem,
        }
    }
}
