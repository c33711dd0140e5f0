use serde::{Deserialize, Serialize};

/// Cleaned text of one PDF page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageText {
    /// 1-based page number
    pub page: u32,
    pub text: String,
}

/// A window of page text, the unit that gets embedded and retrieved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// 1-based source page
    pub page: u32,
    pub text: String,
}

/// A retrieved chunk with its similarity score.
#[derive(Debug, Clone)]
pub struct Hit {
    /// Position of the chunk in the index
    pub id: usize,
    pub score: f32,
    pub chunk: Chunk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerMode {
    /// Phrased by the chat model
    Llm,
    /// Stitched together from the retrieved excerpts
    Extractive,
    /// Nothing was retrieved
    NoMatch,
}

/// A reply to one question.
#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    /// Query actually sent to the retriever (after follow-up rewriting)
    pub query: String,
    pub mode: AnswerMode,
    pub hits: Vec<Hit>,
}

/// Chat request from the web UI
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// The previous question in this browser session, if any
    #[serde(default)]
    pub prev_question: Option<String>,
}

/// Page citation returned alongside a reply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRef {
    pub rank: usize,
    pub page: u32,
    pub score: f32,
}

/// Chat response to the web UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    pub query: String,
    pub mode: AnswerMode,
    pub sources: Vec<SourceRef>,
    /// What the client should send back as `prev_question` next turn
    pub prev_question: String,
}

/// Index summary for the web UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub model_name: String,
    pub source: Option<String>,
    pub chunks: usize,
    pub dim: usize,
    pub chat_enabled: bool,
}
