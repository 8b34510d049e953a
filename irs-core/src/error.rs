use thiserror::Error;

/// Typed failures surfaced to callers. Per-candidate index/model mismatch is
/// recovered inside the engine and never reaches this enum.
#[derive(Debug, Error)]
pub enum IrsError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("indexed data has not been loaded")]
    ModelNotLoaded,

    #[error("term index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("vector model is inconsistent: {0}")]
    InvalidModel(String),

    #[error("malformed document id {0:?}")]
    MalformedDocId(String),

    #[error("search cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, IrsError>;
