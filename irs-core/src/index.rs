use crate::error::{IrsError, Result};
use crate::persist::{self, IndexPaths};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub type TermId = u32;
/// Internal row id inside the term index; distinct from the composite string
/// doc id shared with the vector model.
pub type DocId = u32;

/// Stored per-document fields, written at build time so a candidate can be
/// rendered without touching the original dataset during ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocEntry {
    /// Composite id of the form `<label>_<fileIndex>_<rowIndex>`, 1-based.
    pub doc_id: String,
    pub source_label: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    /// Cosine-normalized tf-idf weight.
    pub weight: f32,
}

/// Stage-1 output: one term-matched document with its stored display fields.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub doc_id: String,
    pub source_label: String,
    pub title: String,
    pub content: String,
    pub backend_score: f32,
}

/// Term-based candidate retrieval over a persisted inverted index.
///
/// `limit = None` returns every match, which on a large corpus is an
/// unbounded-cost call; pass a cap unless the corpus is known to be small.
pub trait IndexBackend: Send + Sync {
    fn search(&self, query: &str, limit: Option<usize>) -> Result<Vec<Candidate>>;
}

/// Inverted-index backend persisted under an index directory. Header
/// structures (dictionary, df, doc entries) are held in memory; per-term
/// postings are loaded on demand.
pub struct TermIndex {
    paths: IndexPaths,
    dictionary: HashMap<String, TermId>,
    df: Vec<u32>,
    docs: HashMap<DocId, DocEntry>,
    num_docs: u32,
}

impl TermIndex {
    /// Opens a persisted index. A missing or unreadable index directory is a
    /// typed failure, never an empty index.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let paths = IndexPaths::new(&dir);
        let (dictionary, df, docs, meta) = persist::load_index_header(&paths)
            .map_err(|e| IrsError::IndexUnavailable(format!("{e:#}")))?;
        tracing::debug!(
            num_docs = meta.num_docs,
            num_terms = dictionary.len(),
            "term index opened"
        );
        Ok(Self { paths, dictionary, df, docs, num_docs: meta.num_docs })
    }

    pub fn num_docs(&self) -> u32 {
        self.num_docs
    }

    fn query_weights(&self, query: &str) -> HashMap<TermId, f32> {
        let mut tf_raw: HashMap<TermId, u32> = HashMap::new();
        for token in query.split_whitespace() {
            if let Some(&tid) = self.dictionary.get(token) {
                *tf_raw.entry(tid).or_insert(0) += 1;
            }
        }
        if tf_raw.is_empty() {
            return HashMap::new();
        }

        let n = self.num_docs.max(1);
        let mut weights: HashMap<TermId, f32> = HashMap::with_capacity(tf_raw.len());
        for (tid, tf) in tf_raw {
            let tf_w = 1.0 + (tf as f32).ln();
            let df_t = *self.df.get(tid as usize).unwrap_or(&1).max(&1);
            let idf = ((n as f32) / (df_t as f32)).ln();
            weights.insert(tid, tf_w * idf);
        }
        let mut norm = weights.values().map(|w| w * w).sum::<f32>().sqrt();
        if norm == 0.0 {
            norm = 1.0;
        }
        for w in weights.values_mut() {
            *w /= norm;
        }
        weights
    }
}

impl IndexBackend for TermIndex {
    fn search(&self, query: &str, limit: Option<usize>) -> Result<Vec<Candidate>> {
        let q_weights = self.query_weights(query);
        if q_weights.is_empty() {
            return Ok(Vec::new());
        }

        // Document weights are cosine-normalized at build time, so the
        // accumulated dot product is already a cosine score.
        let mut scores: HashMap<DocId, f32> = HashMap::new();
        for (tid, q_w) in &q_weights {
            let postings = persist::load_postings_for_term(&self.paths, *tid)
                .map_err(|e| IrsError::IndexUnavailable(format!("postings for term {tid}: {e:#}")))?;
            for p in postings {
                *scores.entry(p.doc_id).or_insert(0.0) += p.weight * q_w;
            }
        }

        let mut scored: Vec<(DocId, f32)> = scores.into_iter().collect();
        // Descending score; equal scores break by internal id so output is
        // deterministic across runs.
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        if let Some(k) = limit {
            scored.truncate(k);
        }

        let mut candidates = Vec::with_capacity(scored.len());
        for (doc_id, score) in scored {
            let entry = self.docs.get(&doc_id).ok_or_else(|| {
                IrsError::IndexUnavailable(format!("posting references unknown document {doc_id}"))
            })?;
            candidates.push(Candidate {
                doc_id: entry.doc_id.clone(),
                source_label: entry.source_label.clone(),
                title: entry.title.clone(),
                content: entry.content.clone(),
                backend_score: score,
            });
        }
        Ok(candidates)
    }
}
