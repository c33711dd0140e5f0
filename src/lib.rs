//! # doc-qa
//!
//! Question answering over a single PDF with page citations.
//!
//! ## Pipeline
//!
//! ```text
//!   ingest:  PDF ──► page text ──► overlapping char windows ──► embeddings
//!                                     (700 chars, 120 overlap)      │ unit length
//!                                                                   ▼
//!                                                index/index.json + index/meta.json
//!
//!   ask:     question ──► follow-up rewrite ──► embed ──► exact inner-product
//!                                                         search (top 5)
//!                                                              │
//!                                      ┌───────────────────────┴───────┐
//!                                      ▼                               ▼
//!                              chat model answer               extractive answer
//!                              (grounded prompt)        (no model, or model failed)
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for paths, chunking and providers
//! - [`models`] - Shared data types: `Chunk`, `Hit`, `Answer`, request/response types
//! - [`pdf`] - Per-page text extraction
//! - [`chunking`] - Whitespace cleaning and character-window chunking
//! - [`llm::embeddings`] - Batch embedding via Ollama or OpenAI-compatible APIs
//! - [`llm::chat`] - Single-turn chat completion used to phrase answers
//! - [`search::vector`] - Exact flat inner-product index
//! - [`search::store`] - Index + chunk metadata persistence
//! - [`ingest`] - PDF to index pipeline
//! - [`qa`] - Retrieval, follow-up handling, answer assembly and sessions
//! - [`repl`] - Terminal chat loop
//! - [`api`] - Axum handlers for the web chat UI
//! - [`state`] - Shared state for the web UI

pub mod api;
pub mod chunking;
pub mod config;
pub mod ingest;
pub mod llm;
pub mod models;
pub mod pdf;
pub mod qa;
pub mod repl;
pub mod search;
pub mod state;
