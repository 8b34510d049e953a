use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use irs_core::dataset::{self, DatasetFile};
use irs_core::persist::{load_vector_model, IndexPaths};
use irs_core::resolve::{display_content, display_title, DocLocation};
use irs_core::{IrsError, RankedResult, SearchConfig, SearchEngine, TermIndex, VectorModel};
use tracing_subscriber::{fmt, EnvFilter};

use std::io::{self, BufRead, Write};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "irs-cli")]
#[command(about = "Interactive two-stage document retrieval", long_about = None)]
struct Args {
    /// Directory holding the persisted term index and vector model
    #[arg(long, default_value = "content/index")]
    index: String,
    /// Directory containing the original dataset CSV files
    #[arg(long, default_value = "datasets")]
    datasets: String,
    /// JSON configuration file
    #[arg(long, default_value = "irs_config.json")]
    config: String,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let config = SearchConfig::load(&args.config)?;
    let datasets = dataset::load_datasets(&args.datasets)?;
    tracing::info!(files = datasets.len(), "datasets loaded for display resolution");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut engine: Option<SearchEngine> = None;

    loop {
        println!("--- {} ---", "Information Retrieval System".green().bold());
        println!("{} Load indexed data", "[1]".yellow());
        println!("{} Search query", "[2]".yellow());
        println!("{} Exit", "[3]".yellow());
        println!("------------------------------------");
        print!("{} ", ">".blue());
        io::stdout().flush()?;

        let choice = match lines.next() {
            Some(line) => line?,
            None => break,
        };

        match choice.trim() {
            "1" => {
                println!("{}", "Logs:".red());
                match load_engine(&args.index) {
                    Ok(loaded) => {
                        println!(
                            "{} Indexed data successfully loaded [{}]",
                            ">".red(),
                            format!("path: {}", args.index).yellow()
                        );
                        engine = Some(loaded);
                    }
                    Err(e) => {
                        println!("{} {}", ">".red(), e.to_string().red());
                    }
                }
            }
            "2" => {
                let Some(engine) = engine.as_ref() else {
                    println!(
                        "{} {}",
                        ">".yellow(),
                        IrsError::ModelNotLoaded.to_string().red()
                    );
                    println!();
                    continue;
                };

                print!("{} ", "Query:".blue());
                io::stdout().flush()?;
                let query = match lines.next() {
                    Some(line) => line?,
                    None => break,
                };

                match engine.search(&query, config.top_k, config.max_candidates) {
                    Ok(results) => {
                        if !results.is_empty() {
                            println!("Results for query '{}'", query.yellow());
                            println!(
                                "Showing the top {} documents:",
                                results.len().to_string().cyan()
                            );
                        }
                        display_results(&results, &datasets, config.truncate_len);
                    }
                    Err(e) => println!("{} {}", ">".red(), e.to_string().red()),
                }
            }
            "3" => break,
            _ => {
                println!("{} {}", ">".yellow(), "Option is not available".red());
            }
        }
        println!();
    }

    Ok(())
}

fn load_engine(index_dir: &str) -> irs_core::Result<SearchEngine> {
    let paths = IndexPaths::new(index_dir);
    let bow = load_vector_model(&paths)
        .map_err(|e| IrsError::IndexUnavailable(format!("{e:#}")))?;
    let model = VectorModel::from_parts(bow.vocabulary, bow.matrix, bow.doc_ids)?;
    let index = TermIndex::open(index_dir)?;
    tracing::info!(docs = model.num_docs(), terms = model.num_terms(), "vector model loaded");
    Ok(SearchEngine::new(Arc::new(model), Arc::new(index)))
}

fn display_results(results: &[RankedResult], datasets: &[DatasetFile], truncate_len: usize) {
    if results.is_empty() {
        println!("{} {}", ">".blue(), "No matching documents found".red());
        return;
    }

    for (i, result) in results.iter().enumerate() {
        // Resolve the composite id back to the original dataset row; ids that
        // do not resolve are skipped rather than failing the display pass.
        let Ok(loc) = DocLocation::parse(&result.doc_id) else {
            tracing::warn!(doc_id = %result.doc_id, "unresolvable doc id in results");
            continue;
        };
        let Some(row) = datasets
            .get(loc.file_pos())
            .and_then(|file| file.rows.get(loc.row_pos()))
        else {
            tracing::warn!(doc_id = %result.doc_id, "doc id points outside the loaded datasets");
            continue;
        };

        let source = datasets[loc.file_pos()].path.display().to_string();
        println!(
            "{} {} [{}] [{}]",
            format!("{}.", i + 1).red(),
            display_title(&row.title, truncate_len).green(),
            format!("sim: {:.3}%", result.similarity * 100.0).yellow(),
            format!("from: {}", source.blue()).yellow()
        );
        println!(
            "    {} {}",
            "->".yellow(),
            display_content(&row.content, truncate_len).white().dimmed()
        );
    }
}
