//! Text acquisition: turn an input file into a text blob or sheet rows.

use std::fmt;
use std::path::Path;

use tracing::info;

use crate::error::{AcquisitionError, OcrError};
use crate::models::config::{InvscanConfig, PdfConfig};
use crate::ocr::OcrBackend;
use crate::pdf::{PdfExtractor, PdfProcessor};
use crate::sheet::{self, SheetRow};

/// Input kind, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Image,
    Pdf,
    Spreadsheet,
}

impl SourceKind {
    /// Detect the kind of `path` from its extension, case-insensitively.
    ///
    /// Returns `None` for anything that is not png/jpg/jpeg, pdf or xls/xlsx.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" | "jpg" | "jpeg" => Some(Self::Image),
            "pdf" => Some(Self::Pdf),
            "xls" | "xlsx" => Some(Self::Spreadsheet),
            _ => None,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Pdf => write!(f, "PDF"),
            Self::Spreadsheet => write!(f, "spreadsheet"),
        }
    }
}

/// Source of raw invoice content.
pub trait Acquirer {
    /// OCR an image into newline-joined text in reading order.
    fn extract_text_from_image(&self, path: &Path) -> Result<String, AcquisitionError>;

    /// Extract the text of every PDF page in document order.
    fn extract_text_from_pdf(&self, path: &Path) -> Result<String, AcquisitionError>;

    /// Read the data rows of the first worksheet.
    fn extract_data_from_excel(&self, path: &Path) -> Result<Vec<SheetRow>, AcquisitionError>;
}

/// Reads inputs from the local filesystem.
pub struct FileAcquirer {
    ocr: Option<Box<dyn OcrBackend>>,
    ocr_unavailable: String,
    pdf: PdfConfig,
}

impl FileAcquirer {
    /// Create an acquirer without an OCR backend.
    pub fn new(pdf: PdfConfig) -> Self {
        Self {
            ocr: None,
            ocr_unavailable: "no OCR backend configured".to_string(),
            pdf,
        }
    }

    /// Use `backend` for image OCR.
    pub fn with_ocr(mut self, backend: Box<dyn OcrBackend>) -> Self {
        self.ocr = Some(backend);
        self
    }

    /// Build an acquirer from configuration, loading OCR models when present.
    ///
    /// Missing or broken models do not fail construction; image acquisition
    /// reports them instead.
    pub fn from_config(config: &InvscanConfig) -> Self {
        let mut acquirer = Self::new(config.pdf.clone());

        #[cfg(feature = "native")]
        {
            if config.models.is_complete() {
                match crate::ocr::PureOcrEngine::from_models(&config.models, config.ocr.clone()) {
                    Ok(engine) => acquirer = acquirer.with_ocr(Box::new(engine)),
                    Err(e) => {
                        tracing::warn!("OCR engine unavailable: {}", e);
                        acquirer.ocr_unavailable = e.to_string();
                    }
                }
            } else {
                tracing::debug!(
                    "OCR models not found in {}",
                    config.models.model_dir.display()
                );
                acquirer.ocr_unavailable = format!(
                    "OCR models not found in {}",
                    config.models.model_dir.display()
                );
            }
        }

        #[cfg(not(feature = "native"))]
        {
            acquirer.ocr_unavailable = "built without the native OCR engine".to_string();
        }

        acquirer
    }

    /// Whether image OCR is available.
    pub fn has_ocr(&self) -> bool {
        self.ocr.is_some()
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, AcquisitionError> {
    std::fs::read(path).map_err(|source| AcquisitionError::Read {
        path: path.display().to_string(),
        source,
    })
}

impl Acquirer for FileAcquirer {
    fn extract_text_from_image(&self, path: &Path) -> Result<String, AcquisitionError> {
        let data = read_file(path)?;
        let image = image::load_from_memory(&data)?;

        let engine = self
            .ocr
            .as_ref()
            .ok_or_else(|| OcrError::Unavailable(self.ocr_unavailable.clone()))?;

        let result = engine.recognize(&image)?;
        info!(
            "OCR of {}: {} boxes, {} chars",
            path.display(),
            result.boxes.len(),
            result.text.len()
        );
        Ok(result.text)
    }

    fn extract_text_from_pdf(&self, path: &Path) -> Result<String, AcquisitionError> {
        let data = read_file(path)?;

        let mut extractor = PdfExtractor::with_config(self.pdf.clone());
        extractor.load(&data)?;
        let text = extractor.extract_text()?;

        info!(
            "PDF {}: {} pages, {} chars",
            path.display(),
            extractor.page_count(),
            text.len()
        );
        Ok(text)
    }

    fn extract_data_from_excel(&self, path: &Path) -> Result<Vec<SheetRow>, AcquisitionError> {
        let rows = sheet::read_rows(path)?;
        info!("Spreadsheet {}: {} rows", path.display(), rows.len());
        Ok(rows)
    }
}
