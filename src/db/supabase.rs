//! Supabase client over the PostgREST HTTP interface.

use async_trait::async_trait;
use serde_json::Value;

use super::{DataStore, DbError, Row};
use crate::config::{ConfigError, SupabaseConfig};

/// Path prefix of the PostgREST API on a Supabase project
const REST_PATH: &str = "rest/v1";

/// Long-lived handle to a Supabase project.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    rest_url: String,
    key: String,
}

impl SupabaseClient {
    pub fn new(url: &str, key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            rest_url: format!("{}/{}", url.trim_end_matches('/'), REST_PATH),
            key: key.to_string(),
        }
    }

    /// Build a client from validated configuration.
    pub fn from_config(config: &SupabaseConfig) -> Result<Self, ConfigError> {
        match (config.url.as_deref(), config.key.as_deref()) {
            (Some(url), Some(key)) if !url.is_empty() && !key.is_empty() => Ok(Self::new(url, key)),
            _ => Err(ConfigError::Validation(
                "Supabase URL and key are required".to_string(),
            )),
        }
    }

    pub fn rest_url(&self) -> &str {
        &self.rest_url
    }
}

#[async_trait]
impl DataStore for SupabaseClient {
    async fn select(&self, table: &str, columns: &str, limit: usize) -> Result<Vec<Row>, DbError> {
        let url = format!("{}/{}", self.rest_url, table);
        let limit_param = limit.to_string();
        tracing::debug!(%table, %columns, limit, "Selecting from data store");

        let resp = self
            .http
            .get(&url)
            .query(&[("select", columns), ("limit", limit_param.as_str())])
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            tracing::warn!(%table, status = status.as_u16(), "Data store rejected query");
            return Err(DbError::Api {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(rows)) => Ok(rows),
            Ok(other) => Err(DbError::Decode(format!("expected array, got {other}"))),
            Err(e) => Err(DbError::Decode(e.to_string())),
        }
    }
}

/// Pull the human-readable message out of a PostgREST error body.
///
/// PostgREST answers with `{"code", "details", "hint", "message"}`; anything
/// else (a proxy's HTML page, plain text) is passed through as-is.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_url_strips_trailing_slash() {
        let client = SupabaseClient::new("https://abc.supabase.co/", "key");
        assert_eq!(client.rest_url(), "https://abc.supabase.co/rest/v1");
    }

    #[test]
    fn test_from_config_requires_url_and_key() {
        let config = SupabaseConfig {
            url: Some("https://abc.supabase.co".to_string()),
            key: None,
        };
        assert!(SupabaseClient::from_config(&config).is_err());

        let config = SupabaseConfig {
            url: Some("https://abc.supabase.co".to_string()),
            key: Some("key".to_string()),
        };
        assert!(SupabaseClient::from_config(&config).is_ok());
    }

    #[test]
    fn test_error_message_from_postgrest_body() {
        let body = r#"{"code":"42P01","details":null,"hint":null,"message":"relation \"public.events\" does not exist"}"#;
        assert_eq!(
            error_message(body),
            "relation \"public.events\" does not exist"
        );
    }

    #[test]
    fn test_error_message_falls_back_to_body() {
        assert_eq!(error_message("Bad Gateway\n"), "Bad Gateway");
        assert_eq!(error_message(r#"{"error":"nope"}"#), r#"{"error":"nope"}"#);
    }
}
