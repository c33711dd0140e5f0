use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::chunking::chunk_pages;
use crate::config::Config;
use crate::llm::embeddings::embed_batch;
use crate::search::store::{DocumentIndex, IndexMeta};

/// What an ingest run produced.
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub pages: usize,
    pub chunks: usize,
    pub dim: usize,
    pub index_file: PathBuf,
    pub meta_file: PathBuf,
}

/// Read the PDF, chunk and embed it, and write the index to `config.index_dir`.
pub async fn run_ingest(config: &Config, client: &reqwest::Client) -> Result<IngestReport> {
    config.validate()?;

    let pdf_path = config.pdf_path.clone();
    let pages = tokio::task::spawn_blocking(move || crate::pdf::read_pdf_pages(&pdf_path))
        .await
        .context("PDF extraction task failed")??;
    tracing::info!("Read {} pages from {}", pages.len(), config.pdf_path.display());

    let chunks = chunk_pages(&pages, config.chunk_size, config.chunk_overlap)?;
    if chunks.is_empty() {
        anyhow::bail!(
            "{} has no extractable text (scanned PDFs need OCR first)",
            config.pdf_path.display()
        );
    }
    tracing::info!("Total chunks: {}", chunks.len());

    tracing::info!("Embedding with model: {}", config.embedding.model);
    let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
    let embeddings = embed_batch(client, &config.embedding, &texts)
        .await
        .context("Failed to embed chunks")?;

    let mut meta = IndexMeta::new(&config.embedding.model, chunks);
    meta.source = Some(config.pdf_path.display().to_string());
    meta.chunk_size = Some(config.chunk_size);
    meta.chunk_overlap = Some(config.chunk_overlap);

    let index = DocumentIndex::build(meta, embeddings)?;
    let (index_file, meta_file) = index.save(&config.index_dir)?;

    tracing::info!("Index built successfully");
    tracing::info!("Files created: {}, {}", index_file.display(), meta_file.display());

    Ok(IngestReport {
        pages: pages.len(),
        chunks: index.len(),
        dim: index.dim(),
        index_file,
        meta_file,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_pdf_fails_before_embedding() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            pdf_path: dir.path().join("missing.pdf"),
            index_dir: dir.path().join("index"),
            ..Config::default()
        };
        let client = reqwest::Client::new();
        let err = run_ingest(&config, &client).await.unwrap_err();
        assert!(format!("{err:#}").contains("Could not find"));
        assert!(!config.index_dir.exists());
    }

    #[tokio::test]
    async fn test_invalid_chunking_rejected() {
        let config = Config {
            chunk_size: 10,
            chunk_overlap: 20,
            ..Config::default()
        };
        let client = reqwest::Client::new();
        assert!(run_ingest(&config, &client).await.is_err());
    }
}
