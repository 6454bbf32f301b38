//! Health check endpoints.
//!
//! `/health` is a liveness probe that never touches the network. The other
//! two reach the data store: `/supabase-health` reads table metadata, which
//! only proves the connection and key work, while `/db-health` reads the
//! application's `events` table and so also fails if the schema is missing.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::db::{self, Row};
use crate::error::AppError;
use crate::state::AppState;

/// Catalog table queried by `/supabase-health`
pub const SCHEMA_TABLE: &str = "information_schema.tables";
pub const SCHEMA_COLUMNS: &str = "table_name";

/// Body shared by every health endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample: Option<Vec<Row>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            ok: true,
            sample: None,
            error: None,
        }
    }

    pub fn with_sample(sample: Vec<Row>) -> Self {
        Self {
            ok: true,
            sample: Some(sample),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            sample: None,
            error: Some(error.into()),
        }
    }
}

/// Liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Reads one row of table metadata from the data store.
pub async fn supabase_health(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, AppError> {
    let rows = state.db.select(SCHEMA_TABLE, SCHEMA_COLUMNS, 1).await?;
    Ok(Json(HealthResponse::with_sample(rows)))
}

/// Reads one event id through the accessor's ping helper.
pub async fn db_health(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    let rows = db::ping(state.db.as_ref())
        .await
        .map_err(AppError::ping_failed)?;
    Ok(Json(HealthResponse::with_sample(rows)))
}
