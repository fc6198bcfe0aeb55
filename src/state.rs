use std::sync::Arc;
use std::time::Duration;

use crate::auth::TokenIssuer;
use crate::config::Config;
use crate::llm::gateway::LlmGateway;
use crate::store::FaqStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<FaqStore>,
    pub gateway: Arc<LlmGateway>,
    pub tokens: Arc<TokenIssuer>,
}

impl AppState {
    /// Open the on-disk store and build the outbound HTTP client.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.data_dir)?;
        let store = FaqStore::open(&config.db_path())?;

        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self::with_parts(config, store, http_client))
    }

    /// Assemble state from explicit collaborators.
    pub fn with_parts(config: Config, store: FaqStore, http_client: reqwest::Client) -> Self {
        let gateway = LlmGateway::new(http_client, config.llm.clone());
        let tokens = TokenIssuer::new(&config.jwt);
        Self {
            config,
            store: Arc::new(store),
            gateway: Arc::new(gateway),
            tokens: Arc::new(tokens),
        }
    }
}
