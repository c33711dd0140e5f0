use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Exact inner-product index over fixed-dimension vectors.
///
/// Vectors are expected to be unit length, which makes the score a cosine
/// similarity. Ids are insertion positions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatIndex {
    dim: usize,
    vectors: Vec<Vec<f32>>,
}

impl FlatIndex {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            vectors: Vec::new(),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Append vectors; all of them must have the index dimension.
    pub fn add(&mut self, vectors: Vec<Vec<f32>>) -> Result<()> {
        if let Some((i, v)) = vectors.iter().enumerate().find(|(_, v)| v.len() != self.dim) {
            anyhow::bail!(
                "Vector {i} has dimension {}, index expects {}",
                v.len(),
                self.dim
            );
        }
        self.vectors.extend(vectors);
        Ok(())
    }

    /// Check every stored vector against the declared dimension.
    pub fn validate(&self) -> Result<()> {
        if let Some(i) = self.vectors.iter().position(|v| v.len() != self.dim) {
            anyhow::bail!(
                "Stored vector {i} has dimension {}, index declares {}",
                self.vectors[i].len(),
                self.dim
            );
        }
        Ok(())
    }

    /// The `k` best `(id, score)` pairs, highest score first.
    /// Equal scores keep the lower id first; NaN scores sort last.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>> {
        if query.len() != self.dim {
            anyhow::bail!(
                "Query has dimension {}, index expects {}",
                query.len(),
                self.dim
            );
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, inner_product(query, v)))
            .collect();

        scored.sort_by(|a, b| rank_key(b.1).total_cmp(&rank_key(a.1)).then(a.0.cmp(&b.0)));
        scored.truncate(k);
        Ok(scored)
    }
}

/// NaN ranks below every real score.
fn rank_key(score: f32) -> f32 {
    if score.is_nan() {
        f32::NEG_INFINITY
    } else {
        score
    }
}

fn inner_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
