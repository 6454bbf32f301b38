//! Agent platform: backend entry point.
//!
//! Loads `.env` and the TOML configuration, initializes tracing, then either
//! serves the health-check API or sends a one-off prompt to the LLM gateway.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_platform::config::{AppConfig, LoggingConfig, DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER};
use agent_platform::db::SupabaseClient;
use agent_platform::http::start_server;
use agent_platform::llm::{ChatMessage, ChatOptions, OpenRouterClient};
use agent_platform::routes::create_router;
use agent_platform::state::AppState;

/// Agent platform backend
#[derive(Parser, Debug)]
#[command(name = "agent-platform", version, about)]
struct Args {
    /// Path to configuration file (optional; environment variables also apply)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Log level filter (e.g., "agent_platform=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Send a single prompt to the LLM gateway and print the reply
    Chat {
        /// User message
        prompt: String,
        /// Optional system prompt sent before the user message
        #[arg(short, long)]
        system: Option<String>,
        /// Model override (defaults to OPENROUTER_MODEL)
        #[arg(short, long)]
        model: Option<String>,
    },
}

fn init_tracing(log_filter: &str, logging: &LoggingConfig) {
    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(log_filter));

    if logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // A missing .env is normal in deployed environments
    let dotenv = dotenvy::dotenv();

    let mut config = AppConfig::load_or_default(&args.config)?;
    config.apply_env(|name| std::env::var(name).ok())?;

    // Priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    init_tracing(&log_filter, &config.logging);

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded .env");
    }

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Chat {
            prompt,
            system,
            model,
        } => chat(config, prompt, system, model).await,
    }
}

async fn serve(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;

    tracing::info!(
        supabase_url = config.supabase.url.as_deref().unwrap_or_default(),
        has_key = config.supabase.has_credentials(),
        "Supabase configured"
    );
    tracing::info!(
        endpoint = %config.openrouter.endpoint,
        model = config.openrouter.model.as_deref().unwrap_or("(unset)"),
        has_api_key = config.openrouter.has_api_key(),
        "OpenRouter configured"
    );

    let supabase = SupabaseClient::from_config(&config.supabase)?;
    let state = AppState::new(Arc::new(supabase));
    let app = create_router(state);

    start_server(app, &config.http).await?;
    Ok(())
}

async fn chat(
    config: AppConfig,
    prompt: String,
    system: Option<String>,
    model: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = OpenRouterClient::new(&config.openrouter);

    let mut messages = Vec::with_capacity(2);
    if let Some(system) = system {
        messages.push(ChatMessage::system(system));
    }
    messages.push(ChatMessage::user(prompt));

    let options = ChatOptions {
        model,
        ..Default::default()
    };

    let completion = client.chat(&messages, &options).await?;
    if let Some(usage) = completion.raw.get("usage") {
        tracing::debug!(%usage, "Chat completion usage");
    }
    println!("{}", completion.content);
    Ok(())
}
