//! CSV export of the current record set, for the presentation layer's
//! download action. Rendering uses the same nine columns and text
//! serialization as the persisted file, so an export can be re-imported by
//! dropping it in as the local fallback.

use anyhow::Result;
use log::info;

use crate::storage::rows::{header_row, record_to_row};
use shared::DepositRecord;

/// Export service that renders the record set as CSV text.
#[derive(Clone, Default)]
pub struct ExportService;

impl ExportService {
    pub fn new() -> Self {
        Self
    }

    /// Render the records as a CSV document (header plus one line per
    /// record); the caller hands the text to the user.
    pub fn export_csv(&self, records: &[DepositRecord]) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        writer.write_record(&header_row())?;
        for record in records {
            writer.write_record(&record_to_row(record))?;
        }

        let bytes = writer.into_inner()?;
        let csv_text = String::from_utf8(bytes)?;

        info!("📄 Exported {} deposits as CSV", records.len());
        Ok(csv_text)
    }
}
