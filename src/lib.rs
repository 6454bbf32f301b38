//! Agent platform backend.
//!
//! Health-check endpoints over a Supabase data store, plus a thin client for
//! OpenRouter chat completions.

pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod llm;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use state::AppState;
