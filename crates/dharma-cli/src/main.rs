//! Dharma CLI - Scoring and auditing of agent action logs from the terminal
//!
//! Reads JSON action logs, runs the core evaluator/auditor/gate over them,
//! and prints formatted or JSON reports. The audit exit code encodes the
//! verdict: aligned 0, needs-review 1, misaligned 2, critical 3.

use anyhow::Context;
use clap::{Parser, Subcommand};
use dharma_core::audit::{parse_audit_log, AuditLogEntry, KarmicAuditor};
use dharma_core::boundary::DharmaBoundary;
use dharma_core::principles::DharmicEvaluator;
use dharma_core::types::{ConstrainedAction, EvaluatedAction};
use dharma_core::verses::VerseDatabase;
use std::path::{Path, PathBuf};

mod render;

/// Dharma CLI - Gita-grounded alignment scoring for AI agents
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit an action log and exit with the verdict code
    Audit {
        /// Path to a JSON array of action log entries
        file: PathBuf,

        /// Output the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Evaluate a single action against the dharmic principles
    Evaluate {
        /// Path to a JSON action record
        file: PathBuf,

        /// Output the evaluation as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a single action against the boundary rules
    Gate {
        /// Path to a JSON action record
        file: PathBuf,

        /// Output the decision as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the scriptural grounding verses
    Verses {
        /// Only verses grounding this topic (principle id, rule id, or guna)
        #[arg(long)]
        topic: Option<String>,
    },
}

fn load_entries(path: &Path) -> anyhow::Result<Vec<AuditLogEntry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read action log {:?}", path))?;
    // Non-array roots surface the serde shape error unchanged
    parse_audit_log(&content).with_context(|| format!("malformed action log {:?}", path))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Audit { file, json } => {
            let entries = load_entries(&file)?;
            let report = KarmicAuditor::new().audit(&entries);

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render::render_report(&report));
            }

            std::process::exit(report.verdict.exit_code());
        }
        Commands::Evaluate { file, json } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("cannot read action {:?}", file))?;
            let action: EvaluatedAction = serde_json::from_str(&content)
                .with_context(|| format!("malformed action record {:?}", file))?;

            let result = DharmicEvaluator::new().evaluate(&action);

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", render::render_evaluation(&result));
            }
        }
        Commands::Gate { file, json } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("cannot read action {:?}", file))?;
            let action: ConstrainedAction = serde_json::from_str(&content)
                .with_context(|| format!("malformed action record {:?}", file))?;

            let decision = DharmaBoundary::new().evaluate(&action);

            if json {
                println!("{}", serde_json::to_string_pretty(&decision)?);
            } else {
                print!("{}", render::render_decision(&decision));
            }
        }
        Commands::Verses { topic } => {
            let db = VerseDatabase::new();
            let verses: Vec<&dharma_core::verses::Verse> = match topic {
                Some(topic) => db.for_topic(&topic),
                None => db.all().iter().collect(),
            };

            if verses.is_empty() {
                println!("No verses ground that topic.");
            } else {
                print!("{}", render::render_verses(&verses));
            }
        }
    }

    Ok(())
}
