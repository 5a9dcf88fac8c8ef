//! Per-file dispatch: acquire, extract and persist.
//!
//! Every failure below this point is logged and folded into a
//! [`ProcessOutcome`]; nothing propagates to the caller.

use std::path::Path;

use tracing::{error, info, warn};

use crate::acquire::{Acquirer, SourceKind};
use crate::invoice::InvoiceParser;
use crate::models::record::InvoiceRecord;
use crate::sheet::SheetRow;
use crate::storage::RecordSink;

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The extension is not a supported input kind.
    Unsupported,
    /// Acquisition produced an empty string; nothing was extracted or saved.
    Empty,
    /// The parser failed; nothing was saved.
    ExtractionFailed,
    /// A record was extracted from text; `saved` reports the sink result.
    Extracted { record: InvoiceRecord, saved: bool },
    /// Spreadsheet rows were written individually.
    Rows { saved: usize, failed: usize },
}

impl ProcessOutcome {
    /// Number of records written to the sink.
    pub fn saved_count(&self) -> usize {
        match self {
            Self::Extracted { saved: true, .. } => 1,
            Self::Rows { saved, .. } => *saved,
            _ => 0,
        }
    }
}

/// Routes files to acquisition, extraction and persistence.
pub struct Dispatcher<A, P, S> {
    acquirer: A,
    parser: P,
    sink: S,
}

impl<A, P, S> Dispatcher<A, P, S>
where
    A: Acquirer,
    P: InvoiceParser,
    S: RecordSink,
{
    pub fn new(acquirer: A, parser: P, sink: S) -> Self {
        Self {
            acquirer,
            parser,
            sink,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Give back the sink, e.g. to close it explicitly.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Process one file end to end.
    pub fn process_file(&mut self, path: &Path) -> ProcessOutcome {
        let Some(kind) = SourceKind::from_path(path) else {
            warn!("Unsupported file format: {}", path.display());
            return ProcessOutcome::Unsupported;
        };

        info!("Processing {} as {}", path.display(), kind);

        match kind {
            SourceKind::Image | SourceKind::Pdf => {
                let text = self.acquire_text(kind, path);
                self.process_text(path, &text)
            }
            SourceKind::Spreadsheet => {
                let rows = match self.acquirer.extract_data_from_excel(path) {
                    Ok(rows) => rows,
                    Err(e) => {
                        error!("Failed to read spreadsheet {}: {}", path.display(), e);
                        Vec::new()
                    }
                };
                self.save_rows(&rows)
            }
        }
    }

    fn acquire_text(&self, kind: SourceKind, path: &Path) -> String {
        let result = match kind {
            SourceKind::Image => self.acquirer.extract_text_from_image(path),
            _ => self.acquirer.extract_text_from_pdf(path),
        };

        result.unwrap_or_else(|e| {
            error!("Failed to extract text from {} {}: {}", kind, path.display(), e);
            String::new()
        })
    }

    fn process_text(&mut self, path: &Path, text: &str) -> ProcessOutcome {
        if text.is_empty() {
            warn!("No text extracted from {}", path.display());
            return ProcessOutcome::Empty;
        }

        let extraction = match self.parser.parse(text) {
            Ok(extraction) => extraction,
            Err(e) => {
                error!("Failed to extract invoice data from {}: {}", path.display(), e);
                return ProcessOutcome::ExtractionFailed;
            }
        };

        for warning in &extraction.warnings {
            warn!("{}: {}", path.display(), warning);
        }

        let saved = match self.sink.save(&extraction.record) {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to save invoice from {}: {}", path.display(), e);
                false
            }
        };

        ProcessOutcome::Extracted {
            record: extraction.record,
            saved,
        }
    }

    fn save_rows(&mut self, rows: &[SheetRow]) -> ProcessOutcome {
        let mut saved = 0;
        let mut failed = 0;

        for (index, row) in rows.iter().enumerate() {
            let result = InvoiceRecord::try_from(row).and_then(|record| self.sink.save(&record));
            match result {
                Ok(()) => saved += 1,
                Err(e) => {
                    error!("Failed to save spreadsheet row {}: {}", index + 1, e);
                    failed += 1;
                }
            }
        }

        info!("Spreadsheet rows: {} saved, {} failed", saved, failed);
        ProcessOutcome::Rows { saved, failed }
    }
}
