//! Rule-based field extractors.

pub mod dates;
pub mod patterns;

pub use dates::{normalize_due_date, parse_due_date, DEFAULT_DATE_FORMATS};
pub use patterns::*;

use regex::Regex;

use crate::error::ExtractionError;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;
}

/// A matched field value with its location in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte range of the whole label-and-value match.
    pub position: (usize, usize),
    /// Source text that was matched.
    pub source: String,
}

/// Label-then-capture extractor over a single regex.
#[derive(Debug, Clone)]
pub struct LabelExtractor {
    field: &'static str,
    pattern: Regex,
}

impl LabelExtractor {
    /// Wrap a compiled pattern. The pattern must declare a `value` group.
    pub fn new(field: &'static str, pattern: Regex) -> Result<Self, ExtractionError> {
        if !pattern.capture_names().flatten().any(|n| n == VALUE_GROUP) {
            return Err(ExtractionError::Pattern {
                field: field.to_string(),
                reason: format!("missing named group `{}`", VALUE_GROUP),
            });
        }
        Ok(Self { field, pattern })
    }

    /// Compile a pattern from source.
    pub fn compile(field: &'static str, source: &str) -> Result<Self, ExtractionError> {
        let pattern = Regex::new(source).map_err(|e| ExtractionError::Pattern {
            field: field.to_string(),
            reason: e.to_string(),
        })?;
        Self::new(field, pattern)
    }

    /// Field this extractor fills.
    pub fn field(&self) -> &'static str {
        self.field
    }
}

impl FieldExtractor for LabelExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let caps = self.pattern.captures(text)?;
        let whole = caps.get(0)?;
        let value = caps.name(VALUE_GROUP)?;

        Some(ExtractionMatch {
            value: value.as_str().trim().to_string(),
            position: (whole.start(), whole.end()),
            source: whole.as_str().to_string(),
        })
    }
}
