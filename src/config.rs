//! Configuration loading and constants.
//!
//! `AppConfig` is read from an optional TOML file and then overlaid with
//! environment variables, so secrets never have to live in the file. It is
//! constructed once at startup and handed to each component by reference.

use const_format::formatcp;
use serde::Deserialize;
use std::path::Path;

// =============================================================================
// OpenRouter
// =============================================================================

/// Base URL of the OpenRouter API
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Chat completions endpoint
pub const OPENROUTER_CHAT_URL: &str = formatcp!("{}/chat/completions", OPENROUTER_BASE_URL);

/// Value sent in the `HTTP-Referer` header (OpenRouter app attribution)
pub const DEFAULT_OPENROUTER_REFERER: &str = "http://localhost:3001";

/// Value sent in the `X-Title` header (OpenRouter app attribution)
pub const DEFAULT_OPENROUTER_TITLE: &str = "ai-agent-platform";

/// Sampling temperature when the caller does not override it
pub const DEFAULT_TEMPERATURE: f64 = 0.2;

/// Output token cap when the caller does not override it
pub const DEFAULT_MAX_TOKENS: u32 = 800;

// =============================================================================
// Environment Variables
// =============================================================================

pub const ENV_SUPABASE_URL: &str = "SUPABASE_URL";
pub const ENV_SUPABASE_SERVICE_ROLE_KEY: &str = "SUPABASE_SERVICE_ROLE_KEY";
/// Used when no service role key is set
pub const ENV_SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";
pub const ENV_OPENROUTER_API_KEY: &str = "OPENROUTER_API_KEY";
pub const ENV_OPENROUTER_MODEL: &str = "OPENROUTER_MODEL";
pub const ENV_PORT: &str = "PORT";

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "agent_platform=debug,tower_http=debug";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";
pub const DEFAULT_HTTP_PORT: u16 = 3001;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Managed database (Supabase) connection
    #[serde(default)]
    pub supabase: SupabaseConfig,
    /// LLM gateway settings
    #[serde(default)]
    pub openrouter: OpenRouterConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }
}

/// Supabase project settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyzcompany.supabase.co`
    pub url: Option<String>,
    /// Service role or anon key
    pub key: Option<String>,
}

impl SupabaseConfig {
    pub fn has_credentials(&self) -> bool {
        self.key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

/// OpenRouter settings. Missing values only fail at call time.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenRouterConfig {
    pub api_key: Option<String>,
    /// Default model, used when a call does not name one
    pub model: Option<String>,
    #[serde(default = "OpenRouterConfig::default_endpoint")]
    pub endpoint: String,
    #[serde(default = "OpenRouterConfig::default_referer")]
    pub referer: String,
    #[serde(default = "OpenRouterConfig::default_title")]
    pub title: String,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: None,
            endpoint: Self::default_endpoint(),
            referer: Self::default_referer(),
            title: Self::default_title(),
        }
    }
}

impl OpenRouterConfig {
    fn default_endpoint() -> String {
        OPENROUTER_CHAT_URL.to_string()
    }

    fn default_referer() -> String {
        DEFAULT_OPENROUTER_REFERER.to_string()
    }

    fn default_title() -> String {
        DEFAULT_OPENROUTER_TITLE.to_string()
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl AppConfig {
    /// Parse a TOML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Load the file if it exists, otherwise start from defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Overlay values from the environment. Non-empty variables win over the file.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(url) = var(ENV_SUPABASE_URL) {
            self.supabase.url = Some(url);
        }
        if let Some(key) = var(ENV_SUPABASE_SERVICE_ROLE_KEY).or_else(|| var(ENV_SUPABASE_ANON_KEY)) {
            self.supabase.key = Some(key);
        }
        if let Some(key) = var(ENV_OPENROUTER_API_KEY) {
            self.openrouter.api_key = Some(key);
        }
        if let Some(model) = var(ENV_OPENROUTER_MODEL) {
            self.openrouter.model = Some(model);
        }
        if let Some(port) = var(ENV_PORT) {
            self.http.port = port
                .parse()
                .map_err(|_| ConfigError::Validation(format!("{ENV_PORT} is not a valid port: {port}")))?;
        }

        Ok(())
    }

    /// Check the settings the server cannot start without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.supabase.url.as_deref().map_or(true, str::is_empty) {
            return Err(ConfigError::Validation(format!(
                "Supabase URL not configured. Set {ENV_SUPABASE_URL} or [supabase] url"
            )));
        }
        if !self.supabase.has_credentials() {
            return Err(ConfigError::Validation(format!(
                "Supabase key not configured. Set {ENV_SUPABASE_SERVICE_ROLE_KEY} or [supabase] key"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_chat_url_is_built_from_base() {
        assert_eq!(
            OPENROUTER_CHAT_URL,
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.http.port, 3001);
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.openrouter.endpoint, OPENROUTER_CHAT_URL);
        assert_eq!(config.openrouter.title, "ai-agent-platform");
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[http]
port = 8080

[supabase]
url = "https://example.supabase.co"

[openrouter]
model = "openai/gpt-4o-mini"

[logging]
format = "json"
"#
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.http.host, DEFAULT_HTTP_HOST);
        assert_eq!(
            config.supabase.url.as_deref(),
            Some("https://example.supabase.co")
        );
        assert_eq!(config.openrouter.model.as_deref(), Some("openai/gpt-4o-mini"));
        assert_eq!(config.openrouter.referer, DEFAULT_OPENROUTER_REFERER);
        assert!(config.logging.is_json());
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[http\nport = ").unwrap();
        assert!(matches!(
            AppConfig::load(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_or_default(dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.http.port, DEFAULT_HTTP_PORT);
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = AppConfig::default();
        config.openrouter.model = Some("from-file".to_string());

        config
            .apply_env(env(&[
                (ENV_SUPABASE_URL, "https://env.supabase.co"),
                (ENV_SUPABASE_SERVICE_ROLE_KEY, "service"),
                (ENV_OPENROUTER_API_KEY, "sk-or"),
                (ENV_OPENROUTER_MODEL, "from-env"),
                (ENV_PORT, "4000"),
            ]))
            .unwrap();

        assert_eq!(config.supabase.url.as_deref(), Some("https://env.supabase.co"));
        assert_eq!(config.supabase.key.as_deref(), Some("service"));
        assert_eq!(config.openrouter.api_key.as_deref(), Some("sk-or"));
        assert_eq!(config.openrouter.model.as_deref(), Some("from-env"));
        assert_eq!(config.http.port, 4000);
    }

    #[test]
    fn test_env_anon_key_fallback() {
        let mut config = AppConfig::default();
        config
            .apply_env(env(&[(ENV_SUPABASE_ANON_KEY, "anon")]))
            .unwrap();
        assert_eq!(config.supabase.key.as_deref(), Some("anon"));
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let mut config = AppConfig::default();
        config.openrouter.api_key = Some("kept".to_string());
        config
            .apply_env(env(&[(ENV_OPENROUTER_API_KEY, "")]))
            .unwrap();
        assert_eq!(config.openrouter.api_key.as_deref(), Some("kept"));
    }

    #[test]
    fn test_invalid_port_env() {
        let mut config = AppConfig::default();
        let result = config.apply_env(env(&[(ENV_PORT, "not-a-port")]));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validate_requires_supabase() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_err());

        config.supabase.url = Some("https://example.supabase.co".to_string());
        assert!(config.validate().is_err());

        config.supabase.key = Some("key".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_ignores_missing_openrouter() {
        let mut config = AppConfig::default();
        config.supabase.url = Some("https://example.supabase.co".to_string());
        config.supabase.key = Some("key".to_string());
        assert!(!config.openrouter.has_api_key());
        assert!(config.validate().is_ok());
    }
}
