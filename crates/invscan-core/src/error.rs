//! Error types for the invscan-core library.

use thiserror::Error;

/// Main error type for the invscan library.
#[derive(Error, Debug)]
pub enum InvscanError {
    /// Document acquisition error.
    #[error("acquisition error: {0}")]
    Acquisition(#[from] AcquisitionError),

    /// Invoice extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Persistence error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while turning a file into text or rows.
#[derive(Error, Debug)]
pub enum AcquisitionError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The image could not be decoded.
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    /// OCR failed.
    #[error("OCR failed: {0}")]
    Ocr(#[from] OcrError),

    /// PDF processing failed.
    #[error("PDF failed: {0}")]
    Pdf(#[from] PdfError),

    /// Spreadsheet reading failed.
    #[error("spreadsheet failed: {0}")]
    Sheet(#[from] SheetError),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// No OCR backend is configured for this build or run.
    #[error("no OCR backend available: {0}")]
    Unavailable(String),
}

/// Errors related to spreadsheet reading.
#[derive(Error, Debug)]
pub enum SheetError {
    /// The workbook could not be opened.
    #[error("failed to open workbook: {0}")]
    Open(String),

    /// The workbook contains no worksheet.
    #[error("workbook has no worksheets")]
    NoSheets,

    /// The worksheet could not be read.
    #[error("failed to read worksheet {sheet}: {reason}")]
    Range { sheet: String, reason: String },
}

/// Errors related to invoice field extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// A label pattern is invalid or lacks its `value` group.
    #[error("invalid pattern for {field}: {reason}")]
    Pattern { field: String, reason: String },

    /// A date format string is unusable.
    #[error("invalid date format: {0}")]
    DateFormat(String),
}

/// Errors related to persistence.
#[derive(Error, Debug)]
pub enum StorageError {
    /// SQLite reported an error.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A row handed to the sink lacks one of the record fields.
    #[error("record is missing field: {0}")]
    MissingField(String),
}

/// Result type for the invscan library.
pub type Result<T> = std::result::Result<T, InvscanError>;
