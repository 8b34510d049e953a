use crate::error::{IrsError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Query-time configuration, loaded once before the first query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Caps the number of returned results.
    pub top_k: usize,
    /// Caps Stage-1 retrieval; `None` means unbounded.
    #[serde(default)]
    pub max_candidates: Option<usize>,
    /// Display-only field truncation length; not part of ranking.
    pub truncate_len: usize,
}

#[derive(Deserialize)]
struct ConfigFile {
    configs: SearchConfig,
}

impl SearchConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| IrsError::Config(format!("read {}: {e}", path.display())))?;
        let file: ConfigFile = serde_json::from_str(&raw)
            .map_err(|e| IrsError::Config(format!("parse {}: {e}", path.display())))?;
        file.configs.validate()?;
        Ok(file.configs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(IrsError::Config("top_k must be positive".into()));
        }
        if self.max_candidates == Some(0) {
            return Err(IrsError::Config("max_candidates must be positive".into()));
        }
        if self.truncate_len == 0 {
            return Err(IrsError::Config("truncate_len must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_values() {
        let cfg = SearchConfig { top_k: 0, max_candidates: None, truncate_len: 100 };
        assert!(matches!(cfg.validate(), Err(IrsError::Config(_))));
        let cfg = SearchConfig { top_k: 30, max_candidates: Some(0), truncate_len: 100 };
        assert!(matches!(cfg.validate(), Err(IrsError::Config(_))));
    }

    #[test]
    fn unbounded_candidates_is_valid() {
        let cfg = SearchConfig { top_k: 30, max_candidates: None, truncate_len: 100 };
        assert!(cfg.validate().is_ok());
    }
}
