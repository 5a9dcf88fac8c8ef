//! Label-then-capture patterns for invoice fields.
//!
//! Each pattern matches a known label, skips an optional run of colons and
//! whitespace, then greedily captures the characters allowed for the field
//! into the `value` group. The capture does not stop at the next label, so
//! `"Name: Jane Doe Invoice Number: 7"` captures `"Jane Doe Invoice Number"`.

use lazy_static::lazy_static;
use regex::Regex;

/// Name of the capture group holding a field value.
pub const VALUE_GROUP: &str = "value";

pub const NAME_SOURCE: &str = r"(?i)(name|customer\s+name)[\s:]*(?P<value>[\w\s]+)";

pub const INVOICE_NUMBER_SOURCE: &str =
    r"(?i)(invoice\s*number|invoice\s*no|invoice#)[\s:]*(?P<value>[\w\d\-]+)";

pub const DUE_DATE_SOURCE: &str = r"(?i)(due\s*date|due)[\s:]*(?P<value>[\d\-/]+)";

pub const DESCRIPTION_SOURCE: &str = r"(?i)(description|items)[\s:]*(?P<value>[\w\s,]+)";

lazy_static! {
    // Customer name
    pub static ref NAME_LABEL: Regex = Regex::new(NAME_SOURCE).unwrap();

    // Invoice number (letters, digits, hyphens)
    pub static ref INVOICE_NUMBER_LABEL: Regex = Regex::new(INVOICE_NUMBER_SOURCE).unwrap();

    // Raw due date token (digits, hyphens, slashes)
    pub static ref DUE_DATE_LABEL: Regex = Regex::new(DUE_DATE_SOURCE).unwrap();

    // Description (words, spaces, commas)
    pub static ref DESCRIPTION_LABEL: Regex = Regex::new(DESCRIPTION_SOURCE).unwrap();
}
