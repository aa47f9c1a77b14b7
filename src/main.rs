use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use polychat::config::{Config, ProvidersConfig};
use polychat::history::ConversationStore;
use polychat::llm::create_provider;
use polychat::server::{AppState, build_app};

#[derive(Parser)]
#[command(
    name = "polychat",
    version,
    about = "A minimal self-hosted gateway for chat completions across multiple LLM providers"
)]
struct Args {
    /// Path to the server config file.
    #[arg(long, default_value = "polychat.yaml")]
    config: PathBuf,

    /// Override the configured bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the configured bind port.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = Config::load(&args.config)
        .await
        .context("failed to load server config")?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let providers = ProvidersConfig::from_env().context("failed to load provider config")?;
    let provider_config = providers.selected_config();
    let provider = create_provider(provider_config)?;
    info!(
        provider = %provider.provider_type(),
        default_model = %provider_config.default_model,
        models = ?provider_config.models,
        "Configured chat provider"
    );

    let state = AppState {
        provider,
        conversations: ConversationStore::new(),
    };
    let app = build_app(state, config.server.request_timeout_seconds);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutting down");
}
