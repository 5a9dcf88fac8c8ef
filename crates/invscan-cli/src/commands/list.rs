//! List command - print the records stored in the database.

use std::path::PathBuf;

use clap::Args;
use console::style;

use invscan_core::models::record::FIELD_NAMES;
use invscan_core::InvoiceRecord;

use super::{load_config, open_store};

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// SQLite database (overrides the configured path)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON array
    Json,
    /// CSV with a header row
    Csv,
    /// Plain text summary
    Text,
}

pub fn run(args: ListArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let store = open_store(&config, args.db.as_deref())?;

    let records = store.records()?;
    store.close()?;

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&records)?,
        OutputFormat::Csv => format_csv(&records)?,
        OutputFormat::Text => format_text(&records),
    };

    print!("{}", output);
    if matches!(args.format, OutputFormat::Json) {
        println!();
    }

    Ok(())
}

fn format_csv(records: &[InvoiceRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(FIELD_NAMES)?;
    for record in records {
        wtr.write_record(record.values())?;
    }

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(records: &[InvoiceRecord]) -> String {
    if records.is_empty() {
        return format!("{} No invoices stored.\n", style("ℹ").blue());
    }

    let mut output = String::new();
    for (i, record) in records.iter().enumerate() {
        output.push_str(&format!("#{} Invoice: {}\n", i + 1, record.invoice_number));
        output.push_str(&format!("   Name: {}\n", record.name));
        output.push_str(&format!("   Due: {}\n", record.due_date));
        output.push_str(&format!("   Description: {}\n", record.description));
    }
    output.push_str(&format!("\n{} invoices\n", records.len()));
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_csv() {
        let records = vec![InvoiceRecord::new("ACME, Inc", "A-1", "2024-01-31", "Bolts")];
        let csv = format_csv(&records).unwrap();
        assert_eq!(
            csv,
            "name,invoice_number,due_date,description\n\"ACME, Inc\",A-1,2024-01-31,Bolts\n"
        );
    }

    #[test]
    fn test_format_text_empty() {
        assert!(format_text(&[]).contains("No invoices stored."));
    }
}
