//! Row-level coercion shared by the remote and local repositories: turning a
//! header-keyed row into a `DepositRecord` with backfilled defaults, and
//! serializing a record back into the nine text columns.

use chrono::{Local, NaiveDate};
use std::collections::HashMap;

use shared::{DepositRecord, DATE_FORMAT, RECORD_COLUMNS};

/// Zero-based positions of the amount/rate columns inside `RECORD_COLUMNS`,
/// the ones that get `"0.00"` display formatting on the remote sheet.
pub const NUMERIC_COLUMNS: [usize; 3] = [2, 3, 7];

/// Coerce one stored row into a record, backfilling any absent field with a
/// type-appropriate default: `0.0` for amounts and rates, today for dates,
/// the empty string otherwise.
pub fn record_from_fields(fields: &HashMap<String, String>) -> DepositRecord {
    let text = |column: &str| fields.get(column).cloned().unwrap_or_default();
    let amount = |column: &str| parse_amount(fields.get(column).map(String::as_str));
    let date = |column: &str| match fields.get(column) {
        Some(raw) => normalize_date(raw),
        None => today(),
    };

    DepositRecord {
        bank: text("Bank"),
        account_number: text("FD_Number"),
        principal: amount("Principal"),
        rate: amount("Rate"),
        start_date: date("StartDate"),
        duration: text("Duration"),
        compounding: text("Compounding"),
        maturity_amount: amount("MaturityAmount"),
        maturity_date: date("MaturityDate"),
    }
}

/// Serialize a record into the nine storage columns. Numeric fields become
/// plain text so the destination cannot reinterpret them; dates are already
/// held as text in the record.
pub fn record_to_row(record: &DepositRecord) -> Vec<String> {
    vec![
        record.bank.clone(),
        record.account_number.clone(),
        record.principal.to_string(),
        record.rate.to_string(),
        record.start_date.clone(),
        record.duration.clone(),
        record.compounding.clone(),
        record.maturity_amount.to_string(),
        record.maturity_date.clone(),
    ]
}

/// The header row every backend writes.
pub fn header_row() -> Vec<String> {
    RECORD_COLUMNS.iter().map(|c| c.to_string()).collect()
}

/// Parse an amount cell; anything that is not a number (including an absent
/// cell) becomes `0.0`.
pub fn parse_amount(raw: Option<&str>) -> f64 {
    raw.and_then(|v| v.trim().parse::<f64>().ok()).unwrap_or(0.0)
}

/// Normalize a date cell to `YYYY-MM-DD` when it parses; otherwise the raw
/// text is retained so one bad cell never fails a whole load. An empty cell
/// is treated as absent and backfilled with today.
pub fn normalize_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return today();
    }
    match NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        Ok(date) => date.format(DATE_FORMAT).to_string(),
        // Sheets sometimes hands back datetimes; accept a date-time prefix.
        Err(_) => trimmed
            .get(..10)
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok())
            .map(|date| date.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|| trimmed.to_string()),
    }
}

fn today() -> String {
    Local::now().date_naive().format(DATE_FORMAT).to_string()
}
