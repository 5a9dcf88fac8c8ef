//! The four-field invoice record persisted by invscan.

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::sheet::SheetRow;

/// Value used when no customer name label is found.
pub const DEFAULT_NAME: &str = "Unknown";

/// Value used when no invoice number label is found.
pub const DEFAULT_INVOICE_NUMBER: &str = "Unknown";

/// Value used when the due date is absent or matches no known format.
pub const INVALID_DATE: &str = "Invalid Date";

/// Value used when no description label is found.
pub const DEFAULT_DESCRIPTION: &str = "No description provided.";

/// Column names, in table order.
pub const FIELD_NAMES: [&str; 4] = ["name", "invoice_number", "due_date", "description"];

/// A normalized invoice record.
///
/// Every field is always populated; extraction falls back to the
/// `DEFAULT_*` constants rather than leaving a field empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Customer name.
    pub name: String,

    /// Invoice number/identifier.
    pub invoice_number: String,

    /// Due date as `YYYY-MM-DD`, or [`INVALID_DATE`].
    pub due_date: String,

    /// Free-text description of the invoiced items.
    pub description: String,
}

impl InvoiceRecord {
    /// Create a record from explicit values.
    pub fn new(
        name: impl Into<String>,
        invoice_number: impl Into<String>,
        due_date: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            invoice_number: invoice_number.into(),
            due_date: due_date.into(),
            description: description.into(),
        }
    }

    /// Field values in table column order.
    pub fn values(&self) -> [&str; 4] {
        [
            &self.name,
            &self.invoice_number,
            &self.due_date,
            &self.description,
        ]
    }
}

impl Default for InvoiceRecord {
    fn default() -> Self {
        Self::new(
            DEFAULT_NAME,
            DEFAULT_INVOICE_NUMBER,
            INVALID_DATE,
            DEFAULT_DESCRIPTION,
        )
    }
}

/// Spreadsheet rows are trusted as already structured: the four columns are
/// copied verbatim, with no pattern matching or date normalization.
impl TryFrom<&SheetRow> for InvoiceRecord {
    type Error = StorageError;

    fn try_from(row: &SheetRow) -> Result<Self, Self::Error> {
        let field = |name: &str| {
            row.get(name)
                .map(str::to_string)
                .ok_or_else(|| StorageError::MissingField(name.to_string()))
        };

        Ok(Self {
            name: field("name")?,
            invoice_number: field("invoice_number")?,
            due_date: field("due_date")?,
            description: field("description")?,
        })
    }
}
