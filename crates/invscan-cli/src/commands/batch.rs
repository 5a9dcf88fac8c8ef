//! Batch command - ingest every supported file matching a glob pattern.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use invscan_core::{ProcessOutcome, SourceKind};

use super::{build_dispatcher, load_config, open_store};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern, e.g. "inbox/*.pdf"
    #[arg(required = true)]
    input: String,

    /// SQLite database (overrides the configured path)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Keep going after a file yields no saved record
    #[arg(long)]
    continue_on_error: bool,

    /// Write a per-file CSV summary to this path
    #[arg(long)]
    summary: Option<PathBuf>,
}

/// Result of processing a single file.
struct FileReport {
    path: PathBuf,
    outcome: ProcessOutcome,
    processing_time_ms: u64,
}

impl FileReport {
    fn succeeded(&self) -> bool {
        self.outcome.saved_count() > 0
    }
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| SourceKind::from_path(p).is_some())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No supported files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let store = open_store(&config, args.db.as_deref())?;
    let mut dispatcher = build_dispatcher(&config, store)?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut reports = Vec::with_capacity(files.len());
    for path in files {
        let file_start = Instant::now();
        let outcome = dispatcher.process_file(&path);

        let report = FileReport {
            path,
            outcome,
            processing_time_ms: file_start.elapsed().as_millis() as u64,
        };
        pb.inc(1);

        if !report.succeeded() {
            warn!("Nothing saved from {}", report.path.display());
            if !args.continue_on_error {
                pb.abandon();
                let path = report.path.display().to_string();
                reports.push(report);
                finish(&args, &reports)?;
                dispatcher.into_sink().close()?;
                anyhow::bail!(
                    "Stopped at {}. Use --continue-on-error to process the remaining files.",
                    path
                );
            }
        }

        reports.push(report);
    }

    pb.finish_and_clear();
    finish(&args, &reports)?;
    dispatcher.into_sink().close()?;

    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        reports.len(),
        start.elapsed()
    );

    Ok(())
}

fn finish(args: &BatchArgs, reports: &[FileReport]) -> anyhow::Result<()> {
    if let Some(summary_path) = &args.summary {
        write_summary(summary_path, reports)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let saved: usize = reports.iter().map(|r| r.outcome.saved_count()).sum();
    let failed: Vec<_> = reports.iter().filter(|r| !r.succeeded()).collect();

    println!();
    println!(
        "   {} records saved, {} files without a saved record",
        style(saved).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Files without a saved record:").red());
        for report in &failed {
            println!("  - {}: {}", report.path.display(), status(&report.outcome));
        }
    }

    Ok(())
}

fn status(outcome: &ProcessOutcome) -> &'static str {
    match outcome {
        ProcessOutcome::Unsupported => "unsupported",
        ProcessOutcome::Empty => "empty",
        ProcessOutcome::ExtractionFailed => "extraction_failed",
        ProcessOutcome::Extracted { saved: true, .. } => "saved",
        ProcessOutcome::Extracted { saved: false, .. } => "save_failed",
        ProcessOutcome::Rows { .. } => "rows",
    }
}

fn write_summary(path: &Path, reports: &[FileReport]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "saved",
        "failed",
        "invoice_number",
        "due_date",
        "processing_time_ms",
    ])?;

    for report in reports {
        let filename = report
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        let (invoice_number, due_date) = match &report.outcome {
            ProcessOutcome::Extracted { record, .. } => {
                (record.invoice_number.as_str(), record.due_date.as_str())
            }
            _ => ("", ""),
        };
        let failed = match &report.outcome {
            ProcessOutcome::Rows { failed, .. } => *failed,
            _ => 0,
        };

        wtr.write_record([
            filename,
            status(&report.outcome),
            &report.outcome.saved_count().to_string(),
            &failed.to_string(),
            invoice_number,
            due_date,
            &report.processing_time_ms.to_string(),
        ])?;
    }

    wtr.flush()?;
    debug!("Wrote batch summary to {}", path.display());
    Ok(())
}
