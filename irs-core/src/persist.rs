use crate::index::{DocEntry, DocId, Posting, TermId};
use crate::vsm::DocTermMatrix;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub created_at: String,
    pub version: u32,
}

/// On-disk serialization of the trained vector model triple.
#[derive(Serialize, Deserialize)]
pub struct BowFile {
    pub vocabulary: HashMap<String, usize>,
    pub matrix: DocTermMatrix,
    pub doc_ids: Vec<String>,
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn dictionary(&self) -> PathBuf { self.root.join("dictionary.bin") }
    fn docs(&self) -> PathBuf { self.root.join("docs.bin") }
    fn meta(&self) -> PathBuf { self.root.join("meta.json") }
    fn postings_dir(&self) -> PathBuf { self.root.join("postings") }
    fn bow(&self) -> PathBuf { self.root.join("bow.bin") }
}

fn write_bincode<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let bytes = bincode::serialize(value)?;
    f.write_all(&bytes)?;
    Ok(())
}

fn read_bincode<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let value = bincode::deserialize(&buf).with_context(|| format!("decode {}", path.display()))?;
    Ok(value)
}

pub fn save_dictionary(paths: &IndexPaths, dict: &(HashMap<String, TermId>, Vec<u32>)) -> Result<()> {
    create_dir_all(&paths.root)?;
    write_bincode(&paths.dictionary(), dict)
}

pub fn load_dictionary(paths: &IndexPaths) -> Result<(HashMap<String, TermId>, Vec<u32>)> {
    read_bincode(&paths.dictionary())
}

pub fn save_docs(paths: &IndexPaths, docs: &HashMap<DocId, DocEntry>) -> Result<()> {
    create_dir_all(&paths.root)?;
    write_bincode(&paths.docs(), docs)
}

pub fn load_docs(paths: &IndexPaths) -> Result<HashMap<DocId, DocEntry>> {
    read_bincode(&paths.docs())
}

pub fn save_postings_for_term(paths: &IndexPaths, term_id: TermId, postings: &Vec<Posting>) -> Result<()> {
    let dir = paths.postings_dir();
    create_dir_all(&dir)?;
    write_bincode(&dir.join(format!("{term_id:08}.postings.bin")), postings)
}

pub fn load_postings_for_term(paths: &IndexPaths, term_id: TermId) -> Result<Vec<Posting>> {
    read_bincode(&paths.postings_dir().join(format!("{term_id:08}.postings.bin")))
}

pub fn save_meta(paths: &IndexPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> {
    let mut f = File::open(paths.meta()).with_context(|| format!("open {}", paths.meta().display()))?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    Ok(meta)
}

pub fn save_vector_model(paths: &IndexPaths, bow: &BowFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    write_bincode(&paths.bow(), bow)
}

pub fn load_vector_model(paths: &IndexPaths) -> Result<BowFile> {
    read_bincode(&paths.bow())
}

/// Load only the header structures required to search: dictionary, df, doc
/// entries, meta. Postings stay on disk and load per term.
pub fn load_index_header(
    paths: &IndexPaths,
) -> Result<(HashMap<String, TermId>, Vec<u32>, HashMap<DocId, DocEntry>, MetaFile)> {
    let (dict, df) = load_dictionary(paths)?;
    let docs = load_docs(paths)?;
    let meta = load_meta(paths)?;
    Ok((dict, df, docs, meta))
}
