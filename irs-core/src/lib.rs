pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod index;
pub mod persist;
pub mod preprocess;
pub mod resolve;
pub mod vsm;

pub use config::SearchConfig;
pub use engine::{CancelToken, RankedResult, SearchEngine};
pub use error::{IrsError, Result};
pub use index::{Candidate, DocEntry, DocId, IndexBackend, Posting, TermId, TermIndex};
pub use resolve::DocLocation;
pub use vsm::{cosine_similarity, DocTermMatrix, VectorModel, Vectorizer};
