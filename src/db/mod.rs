//! Data-store access.
//!
//! Handlers talk to the managed database through the [`DataStore`] trait so
//! that the HTTP layer can be exercised against an in-memory fake. The
//! production implementation is [`SupabaseClient`], which speaks PostgREST.

mod supabase;

pub use supabase::SupabaseClient;

use async_trait::async_trait;
use serde_json::Value;

/// Table read by [`ping`]
pub const PING_TABLE: &str = "events";

/// Column read by [`ping`]
pub const PING_COLUMNS: &str = "id";

/// A single row as returned by the data store.
pub type Row = Value;

/// Error type for data-store operations
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// The data store rejected the query (missing table, bad column, auth).
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The request never completed (DNS, TLS, connection reset).
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("Unexpected response from data store: {0}")]
    Decode(String),
}

impl DbError {
    /// Message surfaced to HTTP clients.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Read-only access to the remote database.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Select `columns` from `table`, returning at most `limit` rows.
    async fn select(&self, table: &str, columns: &str, limit: usize) -> Result<Vec<Row>, DbError>;
}

/// Read up to one `id` from the `events` table.
///
/// Fails when the table does not exist, which makes this a stricter check
/// than simply reaching the database.
pub async fn ping(store: &dyn DataStore) -> Result<Vec<Row>, DbError> {
    store.select(PING_TABLE, PING_COLUMNS, 1).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingStore {
        calls: Mutex<Vec<(String, String, usize)>>,
    }

    #[async_trait]
    impl DataStore for RecordingStore {
        async fn select(&self, table: &str, columns: &str, limit: usize) -> Result<Vec<Row>, DbError> {
            self.calls
                .lock()
                .unwrap()
                .push((table.to_string(), columns.to_string(), limit));
            Ok(vec![json!({ "id": 1 })])
        }
    }

    #[tokio::test]
    async fn test_ping_reads_one_event_id() {
        let store = RecordingStore::default();
        let rows = ping(&store).await.unwrap();

        assert_eq!(rows, vec![json!({ "id": 1 })]);
        assert_eq!(
            store.calls.lock().unwrap().as_slice(),
            &[("events".to_string(), "id".to_string(), 1)]
        );
    }

    #[test]
    fn test_api_error_displays_message_verbatim() {
        let err = DbError::Api {
            status: 404,
            message: "relation \"public.events\" does not exist".to_string(),
        };
        assert_eq!(err.message(), "relation \"public.events\" does not exist");
    }
}
