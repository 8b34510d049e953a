use crate::error::{IrsError, Result};
use crate::index::{Candidate, IndexBackend};
use crate::preprocess;
use crate::vsm::{cosine_similarity, VectorModel, Vectorizer};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Final ranked output of a query. `backend_score` is the Stage-1 score kept
/// as informational metadata; it is never part of the sort key.
#[derive(Debug, Clone)]
pub struct RankedResult {
    pub doc_id: String,
    pub similarity: f32,
    pub source_label: String,
    pub title: String,
    pub content: String,
    pub backend_score: f32,
}

/// Caller-supplied cancellation signal, checked between Stage 1 and Stage 2.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Two-stage retrieval: term-based candidate generation, then cosine
/// reranking in the bag-of-words vector space.
///
/// The engine holds only read-only references; every call is independent, so
/// queries may run concurrently from multiple threads.
pub struct SearchEngine {
    model: Arc<VectorModel>,
    index: Arc<dyn IndexBackend>,
}

impl SearchEngine {
    pub fn new(model: Arc<VectorModel>, index: Arc<dyn IndexBackend>) -> Self {
        Self { model, index }
    }

    pub fn search(
        &self,
        query_text: &str,
        top_k: usize,
        max_candidates: Option<usize>,
    ) -> Result<Vec<RankedResult>> {
        self.search_cancellable(query_text, top_k, max_candidates, &CancelToken::new())
    }

    /// Returns at most `top_k` results, ranked by cosine similarity between
    /// the query vector and each Stage-1 candidate's document vector.
    ///
    /// A query that normalizes to nothing returns an empty result set without
    /// ever reaching Stage 1. Candidates whose doc id is absent from the
    /// vector model are dropped and the query still completes; every other
    /// failure aborts the call whole, with no partial output.
    pub fn search_cancellable(
        &self,
        query_text: &str,
        top_k: usize,
        max_candidates: Option<usize>,
        cancel: &CancelToken,
    ) -> Result<Vec<RankedResult>> {
        if top_k == 0 {
            return Err(IrsError::Config("top_k must be positive".into()));
        }
        if max_candidates == Some(0) {
            return Err(IrsError::Config("max_candidates must be positive".into()));
        }

        let q = preprocess::normalize(query_text);
        if q.is_empty() {
            tracing::debug!("query normalized to nothing, skipping retrieval");
            return Ok(Vec::new());
        }

        let candidates = self.index.search(&q, max_candidates)?;
        tracing::debug!(candidates = candidates.len(), "stage-1 retrieval done");
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        if cancel.is_cancelled() {
            return Err(IrsError::Cancelled);
        }

        let qv = self.model.transform(&q);
        let mut scored: Vec<(Candidate, f32)> = Vec::with_capacity(candidates.len());
        let mut dropped = 0usize;
        for c in candidates {
            match self.model.row_of(&c.doc_id) {
                Some(row) => {
                    let score = cosine_similarity(&qv, self.model.doc_vector(row));
                    scored.push((c, score));
                }
                // Index/model inconsistency for this one document; recover by
                // dropping it rather than failing the query.
                None => dropped += 1,
            }
        }
        if dropped > 0 {
            tracing::warn!(dropped, "candidates absent from the vector model");
        }

        // Stable sort: equal similarities keep their Stage-1 order.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        Ok(scored
            .into_iter()
            .map(|(c, similarity)| RankedResult {
                doc_id: c.doc_id,
                similarity,
                source_label: c.source_label,
                title: c.title,
                content: c.content,
                backend_score: c.backend_score,
            })
            .collect())
    }
}
