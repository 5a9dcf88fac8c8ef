//! Configuration structures for the ingestion pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{InvscanError, Result};
use crate::invoice::rules::DEFAULT_DATE_FORMATS;

/// Main configuration for invscan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvscanConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// OCR model files.
    pub models: ModelConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Invoice extraction configuration.
    pub extraction: ExtractionConfig,

    /// Database configuration.
    pub storage: StorageConfig,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Keep `[UNK]` markers emitted for characters missing from the dictionary.
    pub keep_unk: bool,

    /// Vertical distance (pixels) under which text boxes count as one line.
    pub row_tolerance_px: f32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            keep_unk: false,
            row_tolerance_px: 20.0,
        }
    }
}

/// Model file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
        }
    }
}

impl ModelConfig {
    /// Full path to the detection model.
    pub fn detection_path(&self) -> PathBuf {
        self.model_dir.join(&self.detection_model)
    }

    /// Full path to the recognition model.
    pub fn recognition_path(&self) -> PathBuf {
        self.model_dir.join(&self.recognition_model)
    }

    /// Full path to the character dictionary.
    pub fn dictionary_path(&self) -> PathBuf {
        self.model_dir.join(&self.dictionary)
    }

    /// Whether all model files are present on disk.
    pub fn is_complete(&self) -> bool {
        self.detection_path().exists()
            && self.recognition_path().exists()
            && self.dictionary_path().exists()
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Inserted between the text of consecutive pages.
    pub page_separator: String,

    /// Retry with whole-document extraction when every page comes back empty.
    pub fallback_to_full_text: bool,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            page_separator: "\n".to_string(),
            fallback_to_full_text: true,
        }
    }
}

/// Invoice extraction configuration.
///
/// Pattern overrides must declare a named `value` capture group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Override for the customer name pattern.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_pattern: Option<String>,

    /// Override for the invoice number pattern.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number_pattern: Option<String>,

    /// Override for the due date pattern.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date_pattern: Option<String>,

    /// Override for the description pattern.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_pattern: Option<String>,

    /// `chrono` formats tried in order on the raw due date token.
    pub due_date_formats: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            name_pattern: None,
            invoice_number_pattern: None,
            due_date_pattern: None,
            description_pattern: None,
            due_date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file.
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("invoice_data.db"),
        }
    }
}

impl InvscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| InvscanError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| InvscanError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: InvscanConfig =
            serde_json::from_str(r#"{"storage": {"database_path": "other.db"}}"#).unwrap();

        assert_eq!(config.storage.database_path, PathBuf::from("other.db"));
        assert_eq!(config.models.detection_model, "det.onnx");
        assert_eq!(config.pdf.page_separator, "\n");
        assert_eq!(
            config.extraction.due_date_formats,
            vec!["%d/%m/%Y".to_string(), "%Y-%m-%d".to_string()]
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = InvscanConfig::default();
        config.extraction.name_pattern = Some(r"(?i)client:\s*(?P<value>\w+)".to_string());
        config.save(&path).unwrap();

        let loaded = InvscanConfig::from_file(&path).unwrap();
        assert_eq!(loaded.extraction.name_pattern, config.extraction.name_pattern);
        assert_eq!(loaded.storage.database_path, PathBuf::from("invoice_data.db"));
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        match InvscanConfig::from_file(&path) {
            Err(InvscanError::Config(msg)) => assert!(msg.contains("config.json")),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = InvscanConfig::from_file(Path::new("/nonexistent/invscan.json"));
        assert!(matches!(result, Err(InvscanError::Io(_))));
    }

    #[test]
    fn test_default_formats_match_parser_defaults() {
        assert_eq!(
            ExtractionConfig::default().due_date_formats,
            DEFAULT_DATE_FORMATS.to_vec()
        );
    }

    #[test]
    fn test_model_paths() {
        let models = ModelConfig {
            model_dir: PathBuf::from("/opt/models"),
            ..ModelConfig::default()
        };
        assert_eq!(models.detection_path(), PathBuf::from("/opt/models/det.onnx"));
        assert!(!models.is_complete());
    }
}
