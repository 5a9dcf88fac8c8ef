//! Regex invoice parser: four independent label searches with defaults.

use std::time::Instant;

use tracing::{debug, info};

use crate::models::config::ExtractionConfig;
use crate::models::record::{
    InvoiceRecord, DEFAULT_DESCRIPTION, DEFAULT_INVOICE_NUMBER, DEFAULT_NAME, INVALID_DATE,
};

use super::rules::{
    dates::{parse_due_date, OUTPUT_DATE_FORMAT},
    patterns::*,
    FieldExtractor, LabelExtractor, DEFAULT_DATE_FORMATS,
};
use super::Result;

/// Result of invoice extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted record.
    pub record: InvoiceRecord,
    /// Raw text the record was extracted from.
    pub raw_text: String,
    /// One entry per field that fell back to its default.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for invoice parsing.
pub trait InvoiceParser {
    /// Parse an invoice record from text.
    fn parse(&self, text: &str) -> Result<ExtractionResult>;
}

/// Best-effort parser built from label-then-capture patterns.
#[derive(Debug, Clone)]
pub struct RegexInvoiceParser {
    name: LabelExtractor,
    invoice_number: LabelExtractor,
    due_date: LabelExtractor,
    description: LabelExtractor,
    due_date_formats: Vec<String>,
}

impl RegexInvoiceParser {
    /// Create a parser with the built-in patterns and date formats.
    pub fn new() -> Self {
        Self {
            name: builtin("name", &NAME_LABEL),
            invoice_number: builtin("invoice_number", &INVOICE_NUMBER_LABEL),
            due_date: builtin("due_date", &DUE_DATE_LABEL),
            description: builtin("description", &DESCRIPTION_LABEL),
            due_date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Create a parser honoring pattern overrides from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        let mut parser = Self::new();

        if let Some(source) = &config.name_pattern {
            parser.name = LabelExtractor::compile("name", source)?;
        }
        if let Some(source) = &config.invoice_number_pattern {
            parser.invoice_number = LabelExtractor::compile("invoice_number", source)?;
        }
        if let Some(source) = &config.due_date_pattern {
            parser.due_date = LabelExtractor::compile("due_date", source)?;
        }
        if let Some(source) = &config.description_pattern {
            parser.description = LabelExtractor::compile("description", source)?;
        }
        if !config.due_date_formats.is_empty() {
            parser.due_date_formats = config.due_date_formats.clone();
        }

        Ok(parser)
    }

    /// Replace the due date formats, tried in order.
    pub fn with_due_date_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.due_date_formats = formats.into_iter().map(Into::into).collect();
        self
    }

    fn extract_field(&self, extractor: &LabelExtractor, text: &str) -> Option<String> {
        let found = extractor.extract(text)?;
        debug!(
            "Matched {} at {}..{}: {:?}",
            extractor.field(),
            found.position.0,
            found.position.1,
            found.value
        );
        Some(found.value)
    }

    fn extract_due_date(&self, text: &str) -> Result<Option<String>> {
        let Some(raw) = self.extract_field(&self.due_date, text) else {
            return Ok(None);
        };

        match parse_due_date(&raw, &self.due_date_formats)? {
            Some(date) => Ok(Some(date.format(OUTPUT_DATE_FORMAT).to_string())),
            None => {
                debug!("Due date token {:?} matches no known format", raw);
                Ok(None)
            }
        }
    }
}

impl Default for RegexInvoiceParser {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceParser for RegexInvoiceParser {
    fn parse(&self, text: &str) -> Result<ExtractionResult> {
        let start = Instant::now();
        let mut warnings = Vec::new();

        info!("Parsing invoice from {} characters of text", text.len());

        let name = self.extract_field(&self.name, text).unwrap_or_else(|| {
            warnings.push("Could not extract customer name".to_string());
            DEFAULT_NAME.to_string()
        });

        let invoice_number = self
            .extract_field(&self.invoice_number, text)
            .unwrap_or_else(|| {
                warnings.push("Could not extract invoice number".to_string());
                DEFAULT_INVOICE_NUMBER.to_string()
            });

        let due_date = self.extract_due_date(text)?.unwrap_or_else(|| {
            warnings.push("Could not extract a valid due date".to_string());
            INVALID_DATE.to_string()
        });

        let description = self
            .extract_field(&self.description, text)
            .unwrap_or_else(|| {
                warnings.push("Could not extract description".to_string());
                DEFAULT_DESCRIPTION.to_string()
            });

        let record = InvoiceRecord {
            name,
            invoice_number,
            due_date,
            description,
        };

        debug!(
            "Extracted invoice {} with {} defaulted fields",
            record.invoice_number,
            warnings.len()
        );

        Ok(ExtractionResult {
            record,
            raw_text: text.to_string(),
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

fn builtin(field: &'static str, pattern: &regex::Regex) -> LabelExtractor {
    // Built-in patterns always carry the `value` group
    LabelExtractor::new(field, pattern.clone())
        .unwrap_or_else(|e| unreachable!("built-in pattern for {}: {}", field, e))
}
