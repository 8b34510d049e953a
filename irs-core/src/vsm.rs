use crate::error::{IrsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Anything that can project normalized text into the fixed vocabulary space.
pub trait Vectorizer {
    fn transform(&self, text: &str) -> Vec<f32>;
}

/// Dense row-major document-term matrix of non-negative term counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocTermMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl DocTermMatrix {
    pub fn new(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(IrsError::InvalidModel(format!(
                "matrix data length {} does not match {}x{}",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Self { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row(&self, i: usize) -> &[f32] {
        let start = i * self.cols;
        &self.data[start..start + self.cols]
    }
}

/// The loaded (vocabulary, matrix, doc_ids) triple. Immutable after
/// construction and shared read-only across concurrent queries.
#[derive(Debug)]
pub struct VectorModel {
    vocabulary: HashMap<String, usize>,
    matrix: DocTermMatrix,
    doc_ids: Vec<String>,
    row_of: HashMap<String, usize>,
}

impl VectorModel {
    /// Validates the alignment invariants before any query can be served:
    /// one matrix row per doc id, one column per vocabulary term, every
    /// vocabulary column in range.
    pub fn from_parts(
        vocabulary: HashMap<String, usize>,
        matrix: DocTermMatrix,
        doc_ids: Vec<String>,
    ) -> Result<Self> {
        if matrix.rows() != doc_ids.len() {
            return Err(IrsError::InvalidModel(format!(
                "{} matrix rows but {} doc ids",
                matrix.rows(),
                doc_ids.len()
            )));
        }
        if matrix.cols() != vocabulary.len() {
            return Err(IrsError::InvalidModel(format!(
                "{} matrix columns but {} vocabulary terms",
                matrix.cols(),
                vocabulary.len()
            )));
        }
        if let Some((term, &col)) = vocabulary.iter().find(|(_, &c)| c >= matrix.cols()) {
            return Err(IrsError::InvalidModel(format!(
                "vocabulary term {term:?} maps to column {col} outside the matrix"
            )));
        }
        let row_of = doc_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        Ok(Self { vocabulary, matrix, doc_ids, row_of })
    }

    /// Row index for a doc id, or `None` when the id is unknown to the model.
    pub fn row_of(&self, doc_id: &str) -> Option<usize> {
        self.row_of.get(doc_id).copied()
    }

    pub fn doc_vector(&self, row: usize) -> &[f32] {
        self.matrix.row(row)
    }

    pub fn doc_ids(&self) -> &[String] {
        &self.doc_ids
    }

    pub fn num_docs(&self) -> usize {
        self.doc_ids.len()
    }

    pub fn num_terms(&self) -> usize {
        self.vocabulary.len()
    }
}

impl Vectorizer for VectorModel {
    /// Bag-of-words counts over the fixed vocabulary. `text` is expected to be
    /// already normalized; terms outside the vocabulary are dropped silently.
    fn transform(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.matrix.cols()];
        for token in text.split_whitespace() {
            if let Some(&col) = self.vocabulary.get(token) {
                v[col] += 1.0;
            }
        }
        v
    }
}

/// Cosine similarity, defined as 0.0 when either vector has zero norm so an
/// undefined ratio never propagates into ranking.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut na = 0.0f32;
    let mut nb = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    dot / (na.sqrt() * nb.sqrt())
}
