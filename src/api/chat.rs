use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::models::{ChatRequest, ChatResponse, SourceRef};
use crate::state::AppState;

const MAX_CHAT_MESSAGE_LEN: usize = 2000;

/// POST /api/chat - Answer one question.
///
/// The server keeps no conversation state: the client sends back the
/// `prev_question` it received last turn, and clears it to reset.
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, String)> {
    let message = req.message.trim();
    if message.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Message is required".to_string()));
    }
    let message = truncate_to_char_boundary(message, MAX_CHAT_MESSAGE_LEN);

    let prev = req
        .prev_question
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| truncate_to_char_boundary(p, MAX_CHAT_MESSAGE_LEN));

    let answer = state
        .engine
        .ask(&message, prev.as_deref())
        .await
        .map_err(|e| {
            tracing::error!("Chat request failed: {e:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to answer: {e:#}"),
            )
        })?;

    let sources = answer
        .hits
        .iter()
        .enumerate()
        .map(|(i, h)| SourceRef {
            rank: i + 1,
            page: h.chunk.page,
            score: h.score,
        })
        .collect();

    Ok(Json(ChatResponse {
        reply: answer.text,
        query: answer.query,
        mode: answer.mode,
        sources,
        prev_question: message,
    }))
}

fn truncate_to_char_boundary(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    s.char_indices()
        .take_while(|(i, _)| *i < max_len)
        .map(|(_, c)| c)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate_to_char_boundary("hello", 100), "hello");
    }

    #[test]
    fn test_truncate_long_string() {
        let long = "a".repeat(3000);
        let result = truncate_to_char_boundary(&long, MAX_CHAT_MESSAGE_LEN);
        assert_eq!(result.len(), MAX_CHAT_MESSAGE_LEN);
    }

    #[test]
    fn test_truncate_unicode_safe() {
        let s = "Hello 🌍 world";
        let result = truncate_to_char_boundary(s, 8);
        assert!(result.is_char_boundary(result.len()));
    }
}
