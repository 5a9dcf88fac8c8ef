//! Process command - ingest a single invoice file.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use invscan_core::ProcessOutcome;

use super::{build_dispatcher, load_config, open_store};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (image, PDF or spreadsheet)
    #[arg(required = true)]
    input: PathBuf,

    /// SQLite database (overrides the configured path)
    #[arg(long)]
    db: Option<PathBuf>,
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let store = open_store(&config, args.db.as_deref())?;
    let mut dispatcher = build_dispatcher(&config, store)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Processing {}...", args.input.display()));

    let outcome = dispatcher.process_file(&args.input);

    pb.finish_and_clear();

    report(&args.input, &outcome)?;

    dispatcher.into_sink().close()?;

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Print the user-facing summary of one processed file.
pub fn report(path: &Path, outcome: &ProcessOutcome) -> anyhow::Result<()> {
    match outcome {
        ProcessOutcome::Unsupported => {
            println!(
                "{} Unsupported file format: {}",
                style("✗").red(),
                path.display()
            );
        }
        ProcessOutcome::Empty => {
            println!(
                "{} No text extracted from {}",
                style("!").yellow(),
                path.display()
            );
        }
        ProcessOutcome::ExtractionFailed => {
            println!(
                "{} Failed to extract invoice data from {}",
                style("✗").red(),
                path.display()
            );
        }
        ProcessOutcome::Extracted { record, saved } => {
            println!("Extracted Invoice Data:");
            println!("{}", serde_json::to_string_pretty(record)?);
            if *saved {
                println!("{} Data saved to database.", style("✓").green());
            } else {
                println!("{} Failed to save data to database.", style("✗").red());
            }
        }
        ProcessOutcome::Rows { saved, failed } => {
            println!(
                "{} Saved {} rows from {}",
                style("✓").green(),
                saved,
                path.display()
            );
            if *failed > 0 {
                println!("{} {} rows could not be saved", style("✗").red(), failed);
            }
        }
    }

    Ok(())
}
