use anyhow::Result;
use clap::{Parser, Subcommand};
use irs_core::dataset::{self, DatasetFile};
use irs_core::persist::{
    save_dictionary, save_docs, save_meta, save_postings_for_term, save_vector_model, BowFile,
    IndexPaths, MetaFile,
};
use irs_core::preprocess;
use irs_core::{DocEntry, DocId, DocTermMatrix, Posting, TermId};
use tracing_subscriber::{fmt, EnvFilter};

use std::collections::{BTreeSet, HashMap, HashSet};

#[derive(Parser)]
#[command(name = "irs-indexer")]
#[command(about = "Build the term index and bag-of-words model from CSV datasets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index and vector model from a directory of CSV dataset files
    Build {
        /// Directory containing the dataset CSV files (headers: title,content)
        #[arg(long)]
        datasets: String,
        /// Output index directory
        #[arg(long)]
        output: String,
        /// Label prefix for composite doc ids (<label>_<file>_<row>)
        #[arg(long, default_value = "d")]
        label: String,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { datasets, output, label } => build(&datasets, &output, &label),
    }
}

/// One corpus document after preprocessing, before any matrix/index layout.
struct PreparedDoc {
    doc_id: String,
    tokens: Vec<String>,
    entry: DocEntry,
}

fn build(datasets_dir: &str, output: &str, label: &str) -> Result<()> {
    let files = dataset::load_datasets(datasets_dir)?;
    anyhow::ensure!(!files.is_empty(), "no CSV dataset files under {datasets_dir}");

    let prepared = prepare_docs(&files, label);
    tracing::info!(files = files.len(), docs = prepared.len(), "datasets normalized");

    let out_paths = IndexPaths::new(output);
    build_vector_model(&prepared, &out_paths)?;
    build_term_index(&prepared, &out_paths)?;

    let meta = MetaFile {
        num_docs: prepared.len() as u32,
        created_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| "".into()),
        version: 1,
    };
    save_meta(&out_paths, &meta)?;

    tracing::info!(output, "index build complete");
    Ok(())
}

fn prepare_docs(files: &[DatasetFile], label: &str) -> Vec<PreparedDoc> {
    let mut prepared = Vec::new();
    for (file_pos, file) in files.iter().enumerate() {
        let source_label = file.label();
        for (row_pos, row) in file.rows.iter().enumerate() {
            // Composite ids are 1-based by convention.
            let doc_id = format!("{}_{}_{}", label, file_pos + 1, row_pos + 1);
            let tokens = preprocess::tokens(&row.content);
            prepared.push(PreparedDoc {
                entry: DocEntry {
                    doc_id: doc_id.clone(),
                    source_label: source_label.clone(),
                    title: row.title.clone(),
                    content: row.content.clone(),
                },
                doc_id,
                tokens,
            });
        }
    }
    prepared
}

/// Count matrix over a sorted vocabulary, one row per document, persisted as
/// the (vocabulary, matrix, doc_ids) triple the query process loads read-only.
fn build_vector_model(prepared: &[PreparedDoc], out_paths: &IndexPaths) -> Result<()> {
    let mut terms: BTreeSet<&str> = BTreeSet::new();
    for doc in prepared {
        for t in &doc.tokens {
            terms.insert(t);
        }
    }
    let vocabulary: HashMap<String, usize> = terms
        .iter()
        .enumerate()
        .map(|(col, term)| (term.to_string(), col))
        .collect();

    let cols = vocabulary.len();
    let mut data = vec![0.0f32; prepared.len() * cols];
    for (row, doc) in prepared.iter().enumerate() {
        for t in &doc.tokens {
            let col = vocabulary[t.as_str()];
            data[row * cols + col] += 1.0;
        }
    }
    let matrix = DocTermMatrix::new(prepared.len(), cols, data)?;
    let doc_ids: Vec<String> = prepared.iter().map(|d| d.doc_id.clone()).collect();

    tracing::info!(docs = prepared.len(), terms = cols, "vector model built");
    save_vector_model(out_paths, &BowFile { vocabulary, matrix, doc_ids })?;
    Ok(())
}

/// Inverted index with ln-scaled tf, ln(N/df) idf, and cosine-normalized
/// per-document weights, persisted one postings file per term.
fn build_term_index(prepared: &[PreparedDoc], out_paths: &IndexPaths) -> Result<()> {
    let mut next_term_id: TermId = 0;
    let mut dictionary: HashMap<String, TermId> = HashMap::new();
    let mut df: Vec<u32> = Vec::new();
    let mut postings_raw: HashMap<TermId, Vec<(DocId, u32)>> = HashMap::new();
    let mut docs: HashMap<DocId, DocEntry> = HashMap::new();

    for (row, doc) in prepared.iter().enumerate() {
        let internal_id = row as DocId;
        let mut tf_counts: HashMap<TermId, u32> = HashMap::new();
        let mut seen_in_doc: HashSet<TermId> = HashSet::new();
        for term in &doc.tokens {
            let tid = *dictionary.entry(term.clone()).or_insert_with(|| {
                let id = next_term_id;
                next_term_id += 1;
                if df.len() <= id as usize {
                    df.resize(id as usize + 1, 0);
                }
                id
            });
            *tf_counts.entry(tid).or_insert(0) += 1;
            if seen_in_doc.insert(tid) {
                df[tid as usize] += 1;
            }
        }
        for (tid, tf) in tf_counts {
            postings_raw.entry(tid).or_default().push((internal_id, tf));
        }
        docs.insert(internal_id, doc.entry.clone());
    }

    let n = (prepared.len() as u32).max(1);
    let mut doc_norms = vec![0.0f32; prepared.len()];
    let mut weighted: HashMap<TermId, Vec<(DocId, f32)>> = HashMap::with_capacity(postings_raw.len());
    for (tid, plist) in postings_raw {
        let df_t = df[tid as usize].max(1);
        let idf = ((n as f32) / (df_t as f32)).ln();
        let mut out = Vec::with_capacity(plist.len());
        for (doc_id, tf_raw) in plist {
            let tf = 1.0 + (tf_raw as f32).ln();
            let tfidf = tf * idf;
            doc_norms[doc_id as usize] += tfidf * tfidf;
            out.push((doc_id, tfidf));
        }
        weighted.insert(tid, out);
    }
    for dn in doc_norms.iter_mut() {
        *dn = dn.sqrt();
        if *dn == 0.0 {
            *dn = 1.0;
        }
    }

    for (tid, plist) in weighted {
        let mut out_postings: Vec<Posting> = plist
            .into_iter()
            .map(|(doc_id, tfidf)| Posting { doc_id, weight: tfidf / doc_norms[doc_id as usize] })
            .collect();
        out_postings.sort_by_key(|p| p.doc_id);
        save_postings_for_term(out_paths, tid, &out_postings)?;
    }

    save_dictionary(out_paths, &(dictionary.clone(), df))?;
    save_docs(out_paths, &docs)?;
    tracing::info!(terms = dictionary.len(), "term index built");
    Ok(())
}
