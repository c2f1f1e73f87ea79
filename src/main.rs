use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{info, warn};

use rollcall::config::Config;
use rollcall::input::csv::CsvTableReader;
use rollcall::input::read_all;
use rollcall::output::csv::{write_similarity_csv, CsvBatchWriter};
use rollcall::output::jsonl::JsonlBatchWriter;
use rollcall::output::terminal;
use rollcall::output::text::{write_name_list, TextListWriter};
use rollcall::output::RecordWriter;
use rollcall::pipeline::run::{assign_batch, run_batch, InvalidNamePolicy, PipelineOptions};
use rollcall::roster::classify::special_character_names;
use rollcall::similarity::download;
use rollcall::similarity::embeddings::OnnxNameEmbedder;
use rollcall::similarity::traits::{NameEmbedder, NoopEmbedder};

/// Rollcall: deterministic email assignment and name-similarity screening
/// for student rosters.
///
/// Reads roster sheets, derives a unique address for every student, flags
/// names with special characters, and ranks cross-gender name pairs whose
/// embeddings look suspiciously alike.
#[derive(Parser)]
#[command(name = "rollcall", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline over one or more roster sheets
    Run {
        /// Roster sheets (CSV), read and processed in the given order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Write the annotated batch as a CSV table
        #[arg(long)]
        out_csv: Option<PathBuf>,

        /// Write the annotated batch as JSON lines
        #[arg(long)]
        out_jsonl: Option<PathBuf>,

        /// Write a plain-text mailing list
        #[arg(long)]
        out_list: Option<PathBuf>,

        /// Write the ranked similarity pairs as CSV
        #[arg(long)]
        out_pairs: Option<PathBuf>,

        /// Write the special-character name list as plain text
        #[arg(long)]
        out_flagged: Option<PathBuf>,

        /// Override the configured similarity threshold
        #[arg(long)]
        threshold: Option<f64>,

        /// Emit the batch without similarity flags if the embedder fails
        #[arg(long)]
        degraded: bool,

        /// Fail the whole batch on an unusable name instead of skipping it
        #[arg(long)]
        fail_on_invalid: bool,
    },

    /// Assign emails only — no embedding model needed
    Assign {
        /// Roster sheets (CSV), read and processed in the given order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Write the annotated batch as a CSV table
        #[arg(long)]
        out_csv: Option<PathBuf>,

        /// Fail the whole batch on an unusable name instead of skipping it
        #[arg(long)]
        fail_on_invalid: bool,
    },

    /// Rank cross-gender name similarity without writing any artifacts
    Similarity {
        /// Roster sheets (CSV), read and processed in the given order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Override the configured similarity threshold
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Download the ONNX name-embedding model (~90 MB)
    DownloadModel,

    /// Show configuration and embedding model status
    Status,
}

fn pipeline_options(
    config: &Config,
    threshold: Option<f64>,
    degraded: bool,
    fail_on_invalid: bool,
) -> PipelineOptions {
    PipelineOptions {
        domain: config.email_domain.clone(),
        threshold: threshold.unwrap_or(config.similarity_threshold),
        allowed_punctuation: config.allowed_punctuation.clone(),
        invalid_names: if fail_on_invalid {
            InvalidNamePolicy::Fail
        } else {
            InvalidNamePolicy::Skip
        },
        degraded_similarity: degraded,
        embed_timeout: config.embed_timeout,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("rollcall=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let reader = CsvTableReader::new();

    match cli.command {
        Commands::Run {
            inputs,
            out_csv,
            out_jsonl,
            out_list,
            out_pairs,
            out_flagged,
            threshold,
            degraded,
            fail_on_invalid,
        } => {
            // With --degraded, a missing model downgrades to an embedder
            // that fails at encode time; the pipeline then emits the batch
            // without similarity flags instead of dying here.
            let embedder: Box<dyn NameEmbedder> = match config.require_embedder() {
                Ok(()) => Box::new(OnnxNameEmbedder::load(&config.model_dir)?),
                Err(err) if degraded => {
                    warn!(error = %err, "no embedding model, running degraded");
                    Box::new(NoopEmbedder)
                }
                Err(err) => return Err(err),
            };

            let rows = read_all(&reader, &inputs)?;
            info!(rows = rows.len(), sheets = inputs.len(), "read roster sheets");

            let opts = pipeline_options(&config, threshold, degraded, fail_on_invalid);
            let batch = run_batch(&rows, embedder.as_ref(), &opts).await?;

            let mut wrote_any = false;
            if let Some(dest) = &out_csv {
                CsvBatchWriter.write(&batch, dest)?;
                println!("Annotated batch written to {}", dest.display());
                wrote_any = true;
            }
            if let Some(dest) = &out_jsonl {
                JsonlBatchWriter.write(&batch, dest)?;
                println!("Annotated batch written to {}", dest.display());
                wrote_any = true;
            }
            if let Some(dest) = &out_list {
                TextListWriter.write(&batch, dest)?;
                println!("Mailing list written to {}", dest.display());
                wrote_any = true;
            }
            if let Some(dest) = &out_pairs {
                write_similarity_csv(&batch.pairs, dest)?;
                println!("Similarity pairs written to {}", dest.display());
                wrote_any = true;
            }
            if let Some(dest) = &out_flagged {
                let flagged =
                    special_character_names(&batch.records, &opts.allowed_punctuation);
                write_name_list(&flagged, dest)?;
                println!("Flagged names written to {}", dest.display());
                wrote_any = true;
            }

            terminal::display_batch_summary(&batch);
            if !wrote_any {
                terminal::display_similarity_list(&batch.pairs);
            }
        }

        Commands::Assign {
            inputs,
            out_csv,
            fail_on_invalid,
        } => {
            let rows = read_all(&reader, &inputs)?;
            info!(rows = rows.len(), sheets = inputs.len(), "read roster sheets");

            let opts = pipeline_options(&config, None, false, fail_on_invalid);
            let batch = assign_batch(&rows, &opts)?;

            match &out_csv {
                Some(dest) => {
                    CsvBatchWriter.write(&batch, dest)?;
                    println!("Annotated batch written to {}", dest.display());
                }
                None => {
                    for record in &batch.records {
                        println!(
                            "{:<28} {}",
                            record.name,
                            record.email.as_deref().unwrap_or_default()
                        );
                    }
                }
            }
            terminal::display_batch_summary(&batch);
        }

        Commands::Similarity { inputs, threshold } => {
            config.require_embedder()?;
            let embedder = OnnxNameEmbedder::load(&config.model_dir)?;

            let rows = read_all(&reader, &inputs)?;
            let opts = pipeline_options(&config, threshold, false, false);
            let batch = run_batch(&rows, &embedder, &opts).await?;

            terminal::display_similarity_list(&batch.pairs);
        }

        Commands::DownloadModel => {
            println!("Downloading the name embedding model...");
            download::download_model(&config.model_dir).await?;
            println!("\n{}", "Model ready.".green());
            println!("Next: rollcall run <sheet.csv>");
        }

        Commands::Status => {
            println!("Email domain: {}", config.email_domain);
            println!("Similarity threshold: {}", config.similarity_threshold);
            println!(
                "Allowed punctuation: {:?}",
                config.allowed_punctuation.iter().collect::<String>()
            );
            println!("Model directory: {}", config.model_dir.display());
            if download::model_files_present(&config.model_dir) {
                println!("Embedding model: {}", "present".green());
            } else {
                println!(
                    "Embedding model: {} (run `rollcall download-model`)",
                    "missing".yellow()
                );
            }
        }
    }

    Ok(())
}
