use irs_core::{
    Candidate, CancelToken, DocTermMatrix, IndexBackend, IrsError, SearchEngine, VectorModel,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct StubIndex {
    candidates: Vec<Candidate>,
    calls: AtomicUsize,
    fail: bool,
}

impl StubIndex {
    fn with(candidates: Vec<Candidate>) -> Self {
        Self { candidates, calls: AtomicUsize::new(0), fail: false }
    }

    fn failing() -> Self {
        Self { candidates: Vec::new(), calls: AtomicUsize::new(0), fail: true }
    }
}

impl IndexBackend for StubIndex {
    fn search(&self, _query: &str, limit: Option<usize>) -> irs_core::Result<Vec<Candidate>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(IrsError::IndexUnavailable("stub backend down".into()));
        }
        let mut out = self.candidates.clone();
        if let Some(k) = limit {
            out.truncate(k);
        }
        Ok(out)
    }
}

fn candidate(doc_id: &str, backend_score: f32) -> Candidate {
    Candidate {
        doc_id: doc_id.to_string(),
        source_label: "news".to_string(),
        title: format!("title {doc_id}"),
        content: format!("content {doc_id}"),
        backend_score,
    }
}

// Vocabulary of already-stemmed terms so queries survive normalization intact.
fn model() -> Arc<VectorModel> {
    let vocabulary: HashMap<String, usize> =
        [("rust".to_string(), 0), ("cargo".to_string(), 1)].into_iter().collect();
    let matrix = DocTermMatrix::new(
        5,
        2,
        vec![
            1.0, 0.0, // d_1_1
            1.0, 1.0, // d_1_2
            0.0, 1.0, // d_1_3
            1.0, 1.0, // d_2_1
            1.0, 1.0, // d_2_2
        ],
    )
    .unwrap();
    let doc_ids = vec![
        "d_1_1".to_string(),
        "d_1_2".to_string(),
        "d_1_3".to_string(),
        "d_2_1".to_string(),
        "d_2_2".to_string(),
    ];
    Arc::new(VectorModel::from_parts(vocabulary, matrix, doc_ids).unwrap())
}

fn engine_with(index: StubIndex) -> (SearchEngine, Arc<StubIndex>) {
    let index = Arc::new(index);
    (SearchEngine::new(model(), index.clone()), index)
}

#[test]
fn caps_results_at_top_k() {
    let (engine, _) = engine_with(StubIndex::with(vec![
        candidate("d_1_1", 3.0),
        candidate("d_1_2", 2.0),
        candidate("d_1_3", 1.0),
    ]));
    let results = engine.search("rust cargo", 2, None).unwrap();
    assert!(results.len() <= 2);
}

#[test]
fn similarity_is_non_increasing() {
    let (engine, _) = engine_with(StubIndex::with(vec![
        candidate("d_1_3", 3.0),
        candidate("d_1_1", 2.0),
        candidate("d_1_2", 1.0),
    ]));
    let results = engine.search("rust", 3, None).unwrap();
    for pair in results.windows(2) {
        assert!(pair[0].similarity >= pair[1].similarity);
    }
}

#[test]
fn exact_match_ranks_first_with_unit_similarity() {
    let (engine, _) = engine_with(StubIndex::with(vec![
        candidate("d_1_2", 9.0),
        candidate("d_1_1", 1.0),
    ]));
    let results = engine.search("rust", 2, None).unwrap();
    assert_eq!(results[0].doc_id, "d_1_1");
    assert!((results[0].similarity - 1.0).abs() < 1e-6);
}

#[test]
fn ties_preserve_stage_one_order() {
    // d_2_2, d_1_2, d_2_1 share the same document vector, so "rust" scores
    // them identically; the Stage-1 order must survive the sort.
    let (engine, _) = engine_with(StubIndex::with(vec![
        candidate("d_2_2", 4.0),
        candidate("d_1_2", 3.0),
        candidate("d_2_1", 2.0),
        candidate("d_1_1", 1.0),
    ]));
    let results = engine.search("rust", 4, None).unwrap();
    let order: Vec<&str> = results.iter().map(|r| r.doc_id.as_str()).collect();
    assert_eq!(order, vec!["d_1_1", "d_2_2", "d_1_2", "d_2_1"]);
}

#[test]
fn empty_query_returns_nothing_without_stage_one() {
    let (engine, index) = engine_with(StubIndex::with(vec![candidate("d_1_1", 1.0)]));
    assert!(engine.search("   \t ", 10, None).unwrap().is_empty());
    assert!(engine.search("the and of", 10, None).unwrap().is_empty());
    assert_eq!(index.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn unknown_candidate_is_dropped_and_query_succeeds() {
    let (engine, _) = engine_with(StubIndex::with(vec![
        candidate("d_9_9", 5.0),
        candidate("d_1_1", 1.0),
    ]));
    let results = engine.search("rust", 10, None).unwrap();
    assert_eq!(results.len(), 1);
    assert!(results.iter().all(|r| r.doc_id != "d_9_9"));
}

#[test]
fn max_candidates_bounds_stage_one() {
    let stage_one = vec![
        candidate("d_1_1", 3.0),
        candidate("d_1_2", 2.0),
        candidate("d_1_3", 1.0),
    ];
    let (engine, _) = engine_with(StubIndex::with(stage_one.clone()));
    let results = engine.search("rust cargo", 10, Some(2)).unwrap();
    let first_two: Vec<&str> = stage_one[..2].iter().map(|c| c.doc_id.as_str()).collect();
    assert!(results.len() <= 2);
    for r in &results {
        assert!(first_two.contains(&r.doc_id.as_str()));
    }
}

#[test]
fn backend_failure_aborts_the_query() {
    let (engine, _) = engine_with(StubIndex::failing());
    assert!(matches!(
        engine.search("rust", 10, None),
        Err(IrsError::IndexUnavailable(_))
    ));
}

#[test]
fn cancellation_is_honored_between_stages() {
    let (engine, _) = engine_with(StubIndex::with(vec![candidate("d_1_1", 1.0)]));
    let cancel = CancelToken::new();
    cancel.cancel();
    assert!(matches!(
        engine.search_cancellable("rust", 10, None, &cancel),
        Err(IrsError::Cancelled)
    ));
}

#[test]
fn invalid_limits_are_config_errors() {
    let (engine, index) = engine_with(StubIndex::with(vec![candidate("d_1_1", 1.0)]));
    assert!(matches!(engine.search("rust", 0, None), Err(IrsError::Config(_))));
    assert!(matches!(engine.search("rust", 10, Some(0)), Err(IrsError::Config(_))));
    assert_eq!(index.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn backend_score_is_metadata_not_sort_key() {
    // Highest backend score belongs to the least similar document.
    let (engine, _) = engine_with(StubIndex::with(vec![
        candidate("d_1_3", 100.0),
        candidate("d_1_1", 0.1),
    ]));
    let results = engine.search("rust", 2, None).unwrap();
    assert_eq!(results[0].doc_id, "d_1_1");
    assert!((results[0].backend_score - 0.1).abs() < 1e-6);
}
