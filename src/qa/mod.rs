//! Question answering over a loaded [`DocumentIndex`].
//!
//! ```text
//! question ──► follow-up rewrite ──► embed ──► flat search (top k)
//!                                                   │
//!                      no hits ◄────────────────────┤
//!                                                   ▼
//!                                   chat model (if enabled) ──► reply
//!                                         │ error / empty
//!                                         ▼
//!                                   extractive reply
//! ```

pub mod answer;

use anyhow::{Context, Result};

use crate::config::{ChatConfig, Config, EmbeddingConfig};
use crate::llm::embeddings::embed_single;
use crate::models::{Answer, AnswerMode, Hit};
use crate::search::store::DocumentIndex;

use answer::{answer_offline, build_prompt, rewrite_followup, NO_MATCH_REPLY};

/// Retrieval and answering state shared by the CLI and the web UI.
pub struct QaEngine {
    index: DocumentIndex,
    embedding: EmbeddingConfig,
    chat: ChatConfig,
    top_k: usize,
    client: reqwest::Client,
}

impl QaEngine {
    /// Queries are embedded with the model recorded in the index, whatever the
    /// configured model is.
    pub fn new(index: DocumentIndex, config: &Config, client: reqwest::Client) -> Self {
        let mut embedding = config.embedding.clone();
        let model_name = &index.meta().model_name;
        if &embedding.model != model_name {
            tracing::warn!(
                "Index was built with {model_name}, configured model is {}; using {model_name}",
                embedding.model
            );
            embedding.model = model_name.clone();
        }

        Self {
            index,
            embedding,
            chat: config.chat.clone(),
            top_k: config.top_k,
            client,
        }
    }

    pub fn load(config: &Config, client: reqwest::Client) -> Result<Self> {
        config.validate()?;
        let index = DocumentIndex::load(&config.index_dir)?;
        tracing::info!(
            "Loaded {} chunks ({}-dim, model {})",
            index.len(),
            index.dim(),
            index.meta().model_name
        );
        Ok(Self::new(index, config, client))
    }

    pub fn index(&self) -> &DocumentIndex {
        &self.index
    }

    pub fn chat_enabled(&self) -> bool {
        self.chat.is_enabled()
    }

    /// Top-k chunks for a query string.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<Hit>> {
        let query_embedding = embed_single(&self.client, &self.embedding, query)
            .await
            .context("Failed to embed question")?;
        self.index.search(&query_embedding, self.top_k)
    }

    /// Answer `question`, using `prev` to expand short follow-ups.
    pub async fn ask(&self, question: &str, prev: Option<&str>) -> Result<Answer> {
        let question = question.trim();
        if question.is_empty() {
            anyhow::bail!("Question is empty");
        }

        let query = rewrite_followup(question, prev);
        let hits = self.retrieve(&query).await?;
        tracing::debug!("Retrieved {} chunks for {query:?}", hits.len());

        if hits.is_empty() {
            return Ok(Answer {
                text: NO_MATCH_REPLY.to_string(),
                query,
                mode: AnswerMode::NoMatch,
                hits,
            });
        }

        if let Some(text) = self.answer_with_llm(&query, &hits).await {
            return Ok(Answer {
                text,
                query,
                mode: AnswerMode::Llm,
                hits,
            });
        }

        Ok(Answer {
            text: answer_offline(&hits),
            query,
            mode: AnswerMode::Extractive,
            hits,
        })
    }

    /// `None` means fall back to the extractive reply.
    async fn answer_with_llm(&self, question: &str, hits: &[Hit]) -> Option<String> {
        if !self.chat.is_enabled() {
            return None;
        }

        let prompt = build_prompt(question, hits);
        match crate::llm::chat::complete(&self.client, &self.chat, &prompt).await {
            Ok(text) if !text.is_empty() => Some(text),
            Ok(_) => {
                tracing::warn!("Chat model returned an empty reply; answering extractively");
                None
            }
            Err(e) => {
                tracing::warn!("Chat model failed, answering extractively: {e:#}");
                None
            }
        }
    }
}

/// Conversation state for one user: just the previous question.
#[derive(Debug, Default, Clone)]
pub struct Session {
    prev_question: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous_question(&self) -> Option<&str> {
        self.prev_question.as_deref()
    }

    /// The raw question (not the rewritten query) becomes the next turn's context.
    /// A failed turn leaves the context unchanged.
    pub async fn ask(&mut self, engine: &QaEngine, question: &str) -> Result<Answer> {
        let answer = engine.ask(question, self.previous_question()).await?;
        self.prev_question = Some(question.trim().to_string());
        Ok(answer)
    }

    pub fn clear(&mut self) {
        self.prev_question = None;
    }
}
