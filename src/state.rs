//! Shared application state for request handlers.

use std::sync::Arc;

use crate::db::DataStore;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// The data store is built once at startup and only read afterwards.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DataStore>,
}

impl AppState {
    pub fn new(db: Arc<dyn DataStore>) -> Self {
        Self { db }
    }
}
