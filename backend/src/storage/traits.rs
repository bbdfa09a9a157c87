//! # Storage Traits
//!
//! Abstractions over the two persistence backends so the store and the
//! domain layer can be exercised against in-memory fakes.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// The remote spreadsheet as a keyed, tabular read/write capability.
///
/// Implementations expose exactly what the record store needs: read every
/// row as a header-keyed mapping, replace the whole sheet in one batch, and
/// best-effort number formatting for selected columns.
#[async_trait]
pub trait SpreadsheetApi: Send + Sync {
    /// Read all data rows, each as a `column header -> cell text` mapping.
    /// The header row itself is not included.
    async fn read_all_records(&self) -> Result<Vec<HashMap<String, String>>>;

    /// Clear the sheet, write the header row, then bulk-write all data rows
    /// in a single batch.
    async fn clear_and_write(&self, header: &[String], rows: &[Vec<String>]) -> Result<()>;

    /// Apply a number format (e.g. `"0.00"`) to the given zero-based data
    /// columns over `row_count` data rows. Callers treat a failure here as
    /// non-fatal; the data write has already happened.
    async fn format_columns(&self, columns: &[usize], pattern: &str, row_count: usize)
        -> Result<()>;
}
