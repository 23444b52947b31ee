//! Command-line front-end for the review engine.
//!
//! Reads content from a file or stdin and prints the result as JSON:
//! a full quality report, a violation list, or an auto-fix result.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use review_engine::{ReviewEngine, SourcePolicy};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "review-cli",
    about = "Medical marketing content review: 의료법 compliance, AI-smell and SEO scoring",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Treat trusted-institution names as forbidden in-body mentions
    /// instead of citation sources
    #[arg(long, global = true)]
    forbid_source_mentions: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Full quality report (medical law, AI smell, SEO, optional fact check)
    Report {
        /// Content file (HTML or plain text); stdin if omitted
        file: Option<PathBuf>,

        /// Post title
        #[arg(short, long)]
        title: String,

        /// Target SEO keyword
        #[arg(short, long)]
        keyword: String,

        /// Externally supplied fact-check score (0-100)
        #[arg(long)]
        fact_check: Option<u8>,

        /// Use the lightweight preview weighting instead of the full report
        #[arg(long)]
        preview: bool,
    },
    /// Scan for medical advertising law violations only
    Scan {
        /// Content file (plain text); stdin if omitted
        file: Option<PathBuf>,
    },
    /// Rewrite violating and AI-flavored phrasing
    Fix {
        /// Content file (plain text); stdin if omitted
        file: Option<PathBuf>,

        /// Print only the fixed text instead of the JSON result
        #[arg(long)]
        text_only: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let policy = if cli.forbid_source_mentions {
        SourcePolicy::ForbiddenMention
    } else {
        SourcePolicy::CitationAllowlist
    };
    let engine = ReviewEngine::with_policy(policy).context("failed to build rule catalog")?;
    info!(rules = engine.catalog().len(), "catalog ready");

    match cli.command {
        Command::Report {
            file,
            title,
            keyword,
            fact_check,
            preview,
        } => {
            let body = read_input(file.as_deref())?;
            let report = if preview {
                engine.preview_score(&body, &title, &keyword)?
            } else {
                engine.build_report_with_fact_check(&body, &title, &keyword, fact_check)?
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Scan { file } => {
            let text = read_input(file.as_deref())?;
            let violations = engine.scan_violations(&text)?;
            println!("{}", serde_json::to_string_pretty(&violations)?);
        }
        Command::Fix { file, text_only } => {
            let text = read_input(file.as_deref())?;
            let result = engine.auto_fix(&text)?;
            if text_only {
                println!("{}", result.fixed_text);
            } else {
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
        }
    }

    Ok(())
}

fn read_input(path: Option<&std::path::Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}
