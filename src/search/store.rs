use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::DEFAULT_EMBEDDING_MODEL;
use crate::models::{Chunk, Hit};
use crate::search::vector::FlatIndex;

pub const INDEX_FILE: &str = "index.json";
pub const META_FILE: &str = "meta.json";

/// Everything about the index except the vectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexMeta {
    /// Embedding model the vectors were built with; queries must use the same one
    #[serde(default = "default_model_name")]
    pub model_name: String,
    /// Path of the ingested PDF
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub chunk_size: Option<usize>,
    #[serde(default)]
    pub chunk_overlap: Option<usize>,
    #[serde(default)]
    pub built_at: Option<DateTime<Utc>>,
    /// Parallel with the vectors in the flat index
    pub chunks: Vec<Chunk>,
}

fn default_model_name() -> String {
    DEFAULT_EMBEDDING_MODEL.to_string()
}

impl IndexMeta {
    pub fn new(model_name: &str, chunks: Vec<Chunk>) -> Self {
        Self {
            model_name: model_name.to_string(),
            source: None,
            chunk_size: None,
            chunk_overlap: None,
            built_at: Some(Utc::now()),
            chunks,
        }
    }
}

/// Flat vector index plus the chunk each vector came from.
#[derive(Debug, Clone)]
pub struct DocumentIndex {
    index: FlatIndex,
    meta: IndexMeta,
}

impl DocumentIndex {
    /// Pair chunk metadata with its embeddings (one per chunk, same order).
    pub fn build(meta: IndexMeta, embeddings: Vec<Vec<f32>>) -> Result<Self> {
        if embeddings.len() != meta.chunks.len() {
            anyhow::bail!(
                "Got {} embeddings for {} chunks",
                embeddings.len(),
                meta.chunks.len()
            );
        }
        let dim = embeddings
            .first()
            .map(|e| e.len())
            .context("Cannot build an index without embeddings")?;

        let mut index = FlatIndex::new(dim);
        index.add(embeddings)?;
        Ok(Self { index, meta })
    }

    pub fn meta(&self) -> &IndexMeta {
        &self.meta
    }

    pub fn dim(&self) -> usize {
        self.index.dim()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Top `k` chunks for a unit-length query embedding.
    pub fn search(&self, query_embedding: &[f32], k: usize) -> Result<Vec<Hit>> {
        let scored = self.index.search(query_embedding, k)?;
        Ok(scored
            .into_iter()
            .filter_map(|(id, score)| {
                self.meta.chunks.get(id).map(|chunk| Hit {
                    id,
                    score,
                    chunk: chunk.clone(),
                })
            })
            .collect())
    }

    /// Write `index.json` and `meta.json` under `dir`. Returns both paths.
    pub fn save(&self, dir: &Path) -> Result<(PathBuf, PathBuf)> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create index directory {}", dir.display()))?;

        let index_path = dir.join(INDEX_FILE);
        let meta_path = dir.join(META_FILE);

        write_atomic(&index_path, &serde_json::to_string(&self.index)?)?;
        write_atomic(&meta_path, &serde_json::to_string_pretty(&self.meta)?)?;

        Ok((index_path, meta_path))
    }

    pub fn load(dir: &Path) -> Result<Self> {
        let index_path = dir.join(INDEX_FILE);
        let meta_path = dir.join(META_FILE);

        if !(index_path.exists() && meta_path.exists()) {
            anyhow::bail!(
                "Vector index not found in {}. Run: doc-qa ingest",
                dir.display()
            );
        }

        let data = std::fs::read_to_string(&index_path)
            .with_context(|| format!("Failed to read {}", index_path.display()))?;
        let index: FlatIndex = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse {}", index_path.display()))?;
        index.validate()?;

        let data = std::fs::read_to_string(&meta_path)
            .with_context(|| format!("Failed to read {}", meta_path.display()))?;
        let meta: IndexMeta = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse {}", meta_path.display()))?;

        if index.len() != meta.chunks.len() {
            anyhow::bail!(
                "Index holds {} vectors but metadata lists {} chunks; re-run ingest",
                index.len(),
                meta.chunks.len()
            );
        }

        Ok(Self { index, meta })
    }
}

/// Write via temp file + rename so readers never see a partial file.
fn write_atomic(path: &Path, data: &str) -> Result<()> {
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, data)
        .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("Failed to move index file into place at {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(page: u32, text: &str) -> Chunk {
        Chunk {
            page,
            text: text.to_string(),
        }
    }

    fn sample() -> DocumentIndex {
        let meta = IndexMeta::new("all-minilm", vec![chunk(1, "travel rules"), chunk(2, "debt limits")]);
        DocumentIndex::build(meta, vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap()
    }

    #[test]
    fn test_build_requires_one_embedding_per_chunk() {
        let meta = IndexMeta::new("m", vec![chunk(1, "a"), chunk(1, "b")]);
        assert!(DocumentIndex::build(meta, vec![vec![1.0]]).is_err());
    }

    #[test]
    fn test_build_rejects_empty() {
        let meta = IndexMeta::new("m", vec![]);
        assert!(DocumentIndex::build(meta, vec![]).is_err());
    }

    #[test]
    fn test_search_returns_chunks() {
        let hits = sample().search(&[0.0, 1.0], 1).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
        assert_eq!(hits[0].chunk.page, 2);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let (index_path, meta_path) = sample().save(dir.path()).unwrap();
        assert!(index_path.ends_with(INDEX_FILE));
        assert!(meta_path.ends_with(META_FILE));
        assert!(!dir.path().join("index.json.tmp").exists());

        let loaded = DocumentIndex::load(dir.path()).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.dim(), 2);
        assert_eq!(loaded.meta().model_name, "all-minilm");
        assert_eq!(loaded.meta().chunks[1].text, "debt limits");
    }

    #[test]
    fn test_load_missing_index() {
        let dir = tempfile::tempdir().unwrap();
        let err = DocumentIndex::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("Vector index not found"));
    }

    #[test]
    fn test_meta_without_model_name_defaults() {
        let meta: IndexMeta =
            serde_json::from_str(r#"{"chunks":[{"page":1,"text":"x"}]}"#).unwrap();
        assert_eq!(meta.model_name, DEFAULT_EMBEDDING_MODEL);
        assert!(meta.built_at.is_none());
    }

    #[test]
    fn test_load_rejects_count_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        sample().save(dir.path()).unwrap();
        std::fs::write(
            dir.path().join(META_FILE),
            r#"{"model_name":"all-minilm","chunks":[{"page":1,"text":"only one"}]}"#,
        )
        .unwrap();
        let err = DocumentIndex::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("re-run ingest"));
    }
}
