use tracing_subscriber::EnvFilter;

use faq_service::api;
use faq_service::config::Config;
use faq_service::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!("Data directory: {}", config.data_dir.display());

    let state = AppState::new(config.clone())?;
    if state.gateway.has_api_key() {
        tracing::info!("LLM endpoint: {} ({})", config.llm.api_url, config.llm.model);
    } else {
        tracing::warn!("ANTHROPIC_API_KEY not set, chatbot answers come from the local summary");
    }
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
