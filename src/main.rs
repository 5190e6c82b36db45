use std::path::PathBuf;

use anyhow::Context;
use bible_alignments::{AlignmentsConfig, Manager};
use clap::{Parser, ValueEnum};
use serde_json::json;
use tracing_subscriber::EnvFilter;

/// Output format for the run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Validate an alignment set and print verse views.
#[derive(Parser)]
#[command(name = "bible-alignments", version, about = "Validate and inspect Bible word alignments")]
struct Cli {
    /// Path to the YAML configuration naming the alignment set
    config: PathBuf,

    /// Verses (BBCCCVVV) to print
    verses: Vec<String>,

    /// Summary format (text or json)
    #[arg(long, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Print verses as an alignment grid instead of a table
    #[arg(long)]
    grid: bool,

    /// List every bad record
    #[arg(long)]
    show_bad: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let config = AlignmentsConfig::from_file(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    let set = config.require_alignment_set()?;
    let manager = Manager::from_alignment_set(set, &config.manager_config())
        .with_context(|| format!("building {set}"))?;
    let warnings = manager.check_integrity();

    match cli.output {
        OutputFormat::Text => {
            println!("{manager}");
            println!(
                "{} clean records, {} bad records",
                manager.clean_records().len(),
                manager.bad_records().len()
            );
            for (reason, count) in manager.bad_counts() {
                println!("  {reason}: {count} ({})", reason.message());
            }
            for warning in &warnings {
                println!("warning: {warning}");
            }
        }
        OutputFormat::Json => {
            let summary = json!({
                "alignment_set": set.identifier(),
                "clean": manager.clean_records().len(),
                "bad": manager.bad_records().len(),
                "reasons": manager.bad_counts(),
                "stats": manager.aggregation_stats(),
                "warnings": warnings.iter().map(ToString::to_string).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    if cli.show_bad {
        for bad in manager.bad_records().values() {
            println!("{}", bad.display());
        }
    }

    for verse in &cli.verses {
        let data = manager.get(verse)?;
        if cli.grid {
            println!("{verse}\n{}", data.render_grid("X", "."));
        } else {
            println!("{verse}\n{}", data.table());
        }
    }
    Ok(())
}

fn init_logging(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}
