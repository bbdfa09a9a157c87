//! REST client for the remote spreadsheet (Google Sheets v4 API).
//!
//! The store only ever uses this through the [`SpreadsheetApi`] trait, so
//! tests run against an in-memory fake instead of the network. The resolved
//! credential payload is sent as a bearer token; token minting is the
//! embedding shell's concern.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::info;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::config::SheetsConfig;
use crate::storage::traits::SpreadsheetApi;

const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";

/// The worksheet all records live on.
pub const WORKSHEET_NAME: &str = "Sheet1";

pub struct RestSheetsClient {
    http: reqwest::Client,
    base_url: String,
    spreadsheet_id: String,
    worksheet: String,
    credential: String,
}

impl RestSheetsClient {
    pub fn new(config: SheetsConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: SHEETS_BASE_URL.to_string(),
            spreadsheet_id: config.spreadsheet_id,
            worksheet: WORKSHEET_NAME.to_string(),
            credential: config.credential,
        }
    }

    fn values_url(&self, suffix: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}{}",
            self.base_url, self.spreadsheet_id, self.worksheet, suffix
        )
    }

    /// Resolve the numeric sheet id of the worksheet, needed for cell
    /// formatting requests.
    async fn worksheet_sheet_id(&self) -> Result<i64> {
        #[derive(Deserialize)]
        struct Spreadsheet {
            #[serde(default)]
            sheets: Vec<Sheet>,
        }
        #[derive(Deserialize)]
        struct Sheet {
            properties: SheetProperties,
        }
        #[derive(Deserialize)]
        struct SheetProperties {
            #[serde(rename = "sheetId")]
            sheet_id: i64,
            title: String,
        }

        let url = format!(
            "{}/v4/spreadsheets/{}?fields=sheets.properties",
            self.base_url, self.spreadsheet_id
        );
        let spreadsheet: Spreadsheet = self
            .http
            .get(&url)
            .bearer_auth(&self.credential)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("Failed to decode spreadsheet metadata")?;

        spreadsheet
            .sheets
            .into_iter()
            .find(|sheet| sheet.properties.title == self.worksheet)
            .map(|sheet| sheet.properties.sheet_id)
            .ok_or_else(|| anyhow!("Worksheet '{}' not found", self.worksheet))
    }
}

#[async_trait]
impl SpreadsheetApi for RestSheetsClient {
    async fn read_all_records(&self) -> Result<Vec<HashMap<String, String>>> {
        #[derive(Deserialize)]
        struct ValueRange {
            #[serde(default)]
            values: Vec<Vec<Value>>,
        }

        let range: ValueRange = self
            .http
            .get(self.values_url(""))
            .bearer_auth(&self.credential)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("Failed to decode sheet values")?;

        let records = values_to_records(range.values);
        info!("Fetched {} rows from remote sheet", records.len());
        Ok(records)
    }

    async fn clear_and_write(&self, header: &[String], rows: &[Vec<String>]) -> Result<()> {
        // Clear the whole worksheet first; the write below replaces it.
        self.http
            .post(self.values_url(":clear"))
            .bearer_auth(&self.credential)
            .json(&json!({}))
            .send()
            .await?
            .error_for_status()
            .context("Failed to clear remote sheet")?;

        let mut values: Vec<Vec<String>> = Vec::with_capacity(rows.len() + 1);
        values.push(header.to_vec());
        values.extend(rows.iter().cloned());

        // RAW keeps the destination from reinterpreting the text cells.
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}!A1?valueInputOption=RAW",
            self.base_url, self.spreadsheet_id, self.worksheet
        );
        self.http
            .put(&url)
            .bearer_auth(&self.credential)
            .json(&json!({ "values": values }))
            .send()
            .await?
            .error_for_status()
            .context("Failed to write rows to remote sheet")?;

        info!("Wrote {} data rows to remote sheet", rows.len());
        Ok(())
    }

    async fn format_columns(
        &self,
        columns: &[usize],
        pattern: &str,
        row_count: usize,
    ) -> Result<()> {
        if columns.is_empty() || row_count == 0 {
            return Ok(());
        }

        let sheet_id = self.worksheet_sheet_id().await?;

        // Data rows start below the header row.
        let requests: Vec<Value> = columns
            .iter()
            .map(|&column| {
                json!({
                    "repeatCell": {
                        "range": {
                            "sheetId": sheet_id,
                            "startRowIndex": 1,
                            "endRowIndex": row_count + 1,
                            "startColumnIndex": column,
                            "endColumnIndex": column + 1,
                        },
                        "cell": {
                            "userEnteredFormat": {
                                "numberFormat": { "type": "NUMBER", "pattern": pattern }
                            }
                        },
                        "fields": "userEnteredFormat.numberFormat",
                    }
                })
            })
            .collect();

        let url = format!(
            "{}/v4/spreadsheets/{}:batchUpdate",
            self.base_url, self.spreadsheet_id
        );
        self.http
            .post(&url)
            .bearer_auth(&self.credential)
            .json(&json!({ "requests": requests }))
            .send()
            .await?
            .error_for_status()
            .context("Failed to apply number formatting")?;

        Ok(())
    }
}

/// Convert the raw value grid into header-keyed row mappings. The first row
/// is the header; short rows simply omit the trailing columns, which the
/// record coercion later backfills.
fn values_to_records(values: Vec<Vec<Value>>) -> Vec<HashMap<String, String>> {
    let mut iter = values.into_iter();
    let header: Vec<String> = match iter.next() {
        Some(row) => row.into_iter().map(cell_text).collect(),
        None => return Vec::new(),
    };

    iter.map(|row| {
        header
            .iter()
            .zip(row.into_iter().map(cell_text))
            .map(|(column, cell)| (column.clone(), cell))
            .collect()
    })
    .collect()
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
