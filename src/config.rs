use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Ollama's build of sentence-transformers/all-MiniLM-L6-v2.
pub const DEFAULT_EMBEDDING_MODEL: &str = "all-minilm";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// The PDF to ingest
    pub pdf_path: PathBuf,
    /// Where the vector index and chunk metadata are written
    pub index_dir: PathBuf,
    /// Web UI bind address
    pub bind_addr: String,
    /// Characters per chunk window
    pub chunk_size: usize,
    /// Characters shared between consecutive windows
    pub chunk_overlap: usize,
    /// Chunks retrieved per question
    pub top_k: usize,
    /// Embedding provider configuration
    pub embedding: EmbeddingConfig,
    /// Chat model used to phrase answers
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// "ollama" or "openai"
    pub provider: String,
    /// Base URL for the embedding API
    pub base_url: String,
    /// Model name for embeddings
    pub model: String,
    /// API key (only needed for cloud providers)
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// "ollama" or "openai"
    pub provider: String,
    /// Base URL for the chat API
    pub base_url: String,
    /// Model name for answers
    pub model: String,
    /// API key (only needed for cloud providers)
    pub api_key: Option<String>,
    pub temperature: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pdf_path: PathBuf::from("data/policy.pdf"),
            index_dir: PathBuf::from("index"),
            bind_addr: "127.0.0.1:7860".to_string(),
            chunk_size: 700,
            chunk_overlap: 120,
            top_k: 5,
            embedding: EmbeddingConfig::default(),
            chat: ChatConfig::default(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            base_url: "http://localhost:11434".to_string(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            api_key: None,
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            temperature: 0.2,
        }
    }
}

impl ChatConfig {
    /// Local providers are always usable; hosted ones need a key.
    pub fn is_enabled(&self) -> bool {
        match self.provider.as_str() {
            "ollama" => true,
            _ => self.api_key.as_deref().is_some_and(|k| !k.is_empty()),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `get` returns for each variable name.
    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let openai_key = get("OPENAI_API_KEY");

        if let Some(path) = get("DOC_QA_PDF") {
            config.pdf_path = PathBuf::from(path);
        }
        if let Some(dir) = get("DOC_QA_INDEX_DIR") {
            config.index_dir = PathBuf::from(dir);
        }
        if let Some(addr) = get("DOC_QA_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(val) = get("DOC_QA_CHUNK_SIZE") {
            if let Ok(v) = val.parse() {
                config.chunk_size = v;
            }
        }
        if let Some(val) = get("DOC_QA_CHUNK_OVERLAP") {
            if let Ok(v) = val.parse() {
                config.chunk_overlap = v;
            }
        }
        if let Some(val) = get("DOC_QA_TOP_K") {
            if let Ok(v) = val.parse() {
                config.top_k = v;
            }
        }

        // Embedding provider
        if let Some(provider) = get("EMBEDDING_PROVIDER") {
            config.embedding.provider = provider;
        }
        if let Some(url) = get("EMBEDDING_BASE_URL") {
            config.embedding.base_url = url;
        }
        if let Some(model) = get("EMBEDDING_MODEL") {
            config.embedding.model = model;
        }
        config.embedding.api_key = get("EMBEDDING_API_KEY").or_else(|| openai_key.clone());

        // Chat provider
        if let Some(provider) = get("LLM_PROVIDER") {
            config.chat.provider = provider;
        }
        if let Some(url) = get("LLM_BASE_URL") {
            config.chat.base_url = url;
        }
        if let Some(model) = get("LLM_CHAT_MODEL") {
            config.chat.model = model;
        }
        config.chat.api_key = get("LLM_API_KEY").or(openai_key);

        config
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.chunk_size == 0 {
            anyhow::bail!("chunk_size must be greater than zero");
        }
        if self.chunk_overlap >= self.chunk_size {
            anyhow::bail!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap,
                self.chunk_size
            );
        }
        if self.top_k == 0 {
            anyhow::bail!("top_k must be greater than zero");
        }
        Ok(())
    }
}
