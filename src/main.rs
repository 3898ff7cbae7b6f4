use anyhow::Result;
use clap::Parser;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

use prepcall::providers::{CallEvent, GenerationError, StartCallRequest};
use prepcall::{create_router, AppState, Config, InMemoryStore, SessionDefaults};

#[derive(Parser)]
#[command(name = "prepcall", about = "Voice mock-interview practice service")]
struct Args {
    /// Config file (without extension)
    #[arg(long, default_value = "config/prepcall")]
    config: String,

    /// Override the bind address from the config file
    #[arg(long)]
    bind: Option<String>,
}

/// Stand-in voice provider for runs without a configured vendor client.
struct OfflineVoice;

#[async_trait::async_trait]
impl prepcall::VoiceProvider for OfflineVoice {
    async fn start_call(&self, _req: StartCallRequest) -> Result<mpsc::Receiver<CallEvent>> {
        anyhow::bail!("no voice provider configured")
    }

    async fn stop_call(&self) -> Result<()> {
        Ok(())
    }
}

/// Stand-in generator for runs without a configured vendor client. Carries
/// the configured model name so failures say which model was expected.
struct OfflineGenerator {
    model: String,
}

#[async_trait::async_trait]
impl prepcall::TextGenerator for OfflineGenerator {
    async fn generate_text(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Provider(format!(
            "no provider client configured for model {}",
            self.model
        )))
    }

    async fn generate_structured(
        &self,
        _prompt: &str,
        _system: &str,
    ) -> Result<Value, GenerationError> {
        Err(GenerationError::Provider(format!(
            "no provider client configured for model {}",
            self.model
        )))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("prepcall v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded config: {}", cfg.service.name);

    let bind = args.bind.unwrap_or_else(|| cfg.service.http.bind.clone());
    let addr = format!("{}:{}", bind, cfg.service.http.port);

    warn!("Running with in-memory store and offline providers; wire real clients for production");

    let state = AppState::new(
        Arc::new(OfflineVoice),
        Arc::new(OfflineGenerator {
            model: cfg.generation.model.clone(),
        }),
        Arc::new(InMemoryStore::new()),
        SessionDefaults {
            assistant_id: cfg.voice.assistant_id.clone(),
            grace_delay: Duration::from_millis(cfg.voice.grace_delay_ms),
        },
    );

    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
