use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One record of a dataset CSV file. Header row: `title,content`.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetRow {
    pub title: String,
    pub content: String,
}

/// A loaded dataset file; position in the returned list is the zero-based
/// file index the composite doc ids refer to.
#[derive(Debug)]
pub struct DatasetFile {
    pub path: PathBuf,
    pub rows: Vec<DatasetRow>,
}

impl DatasetFile {
    pub fn label(&self) -> String {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("dataset")
            .to_string()
    }
}

/// Load every `*.csv` file under `dir`, sorted by path so file indices stay
/// stable between index builds and display-time resolution.
pub fn load_datasets<P: AsRef<Path>>(dir: P) -> Result<Vec<DatasetFile>> {
    let dir = dir.as_ref();
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
        let p = entry.path();
        if p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("csv") {
            paths.push(p.to_path_buf());
        }
    }
    paths.sort();

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let mut reader = csv::Reader::from_path(&path)
            .with_context(|| format!("open dataset {}", path.display()))?;
        let mut rows = Vec::new();
        for record in reader.deserialize() {
            let row: DatasetRow =
                record.with_context(|| format!("parse dataset {}", path.display()))?;
            rows.push(row);
        }
        tracing::debug!(path = %path.display(), rows = rows.len(), "dataset loaded");
        files.push(DatasetFile { path, rows });
    }
    Ok(files)
}
