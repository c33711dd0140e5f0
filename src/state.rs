use std::sync::Arc;

use crate::config::Config;
use crate::qa::QaEngine;

/// Shared application state for the web UI.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub engine: Arc<QaEngine>,
}

impl AppState {
    pub fn new(config: Config, engine: QaEngine) -> Self {
        Self {
            config,
            engine: Arc::new(engine),
        }
    }

    /// Load the index from `config.index_dir` with a fresh HTTP client.
    pub fn load(config: Config) -> anyhow::Result<Self> {
        let client = crate::llm::http_client()?;
        let engine = QaEngine::load(&config, client)?;
        Ok(Self::new(config, engine))
    }
}
