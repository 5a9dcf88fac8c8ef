//! Core library for invoice ingestion.
//!
//! This crate provides:
//! - Text acquisition from images (OCR), PDFs and spreadsheets
//! - Label-based extraction of a four-field invoice record
//! - SQLite persistence of extracted records
//! - A dispatcher that runs one file through all three stages

pub mod acquire;
pub mod error;
pub mod invoice;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod pipeline;
pub mod sheet;
pub mod storage;

pub use acquire::{Acquirer, FileAcquirer, SourceKind};
pub use error::{InvscanError, Result};
pub use invoice::{ExtractionResult, InvoiceParser, RegexInvoiceParser};
pub use models::config::InvscanConfig;
pub use models::record::InvoiceRecord;
pub use ocr::{OcrBackend, OcrResult, TextBox};
#[cfg(feature = "native")]
pub use ocr::PureOcrEngine;
pub use pdf::{PdfContent, PdfExtractor, PdfProcessor};
pub use pipeline::{Dispatcher, ProcessOutcome};
pub use sheet::SheetRow;
pub use storage::{RecordSink, SqliteStore};
