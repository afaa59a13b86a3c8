mod ask_form;
mod routes;

use anyhow::{Context, Result};
use docqa::{AnswerGenerator, GeneratorConfig};
use routes::{router, AppState};
use std::env;
use std::sync::Arc;

const DEFAULT_BIND: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment variables and logging
    dotenv::dotenv().ok();
    env_logger::init();

    let config = GeneratorConfig::from_env().context("invalid configuration")?;
    if !config.has_credentials() {
        log::warn!("Azure OpenAI credentials are missing; /ask will answer 503 until they are set");
    }

    let state = Arc::new(AppState::new(AnswerGenerator::new(config)));
    let app = router(state);

    let bind = env::var("DOCQA_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {}", bind))?;

    log::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
