//! The record store: loads and saves the full deposit table, preferring the
//! remote spreadsheet and degrading to the local CSV file on any
//! remote-tier failure. Only exhaustion of every fallback is surfaced to the
//! caller.

use anyhow::Result;
use log::{info, warn};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::config::ConfigResolver;
use crate::storage::csv::{CsvConnection, DepositRepository};
use crate::storage::rows::{header_row, record_from_fields, record_to_row, NUMERIC_COLUMNS};
use crate::storage::sheets::RestSheetsClient;
use crate::storage::traits::SpreadsheetApi;
use shared::DepositRecord;

/// Display pattern applied to the amount and rate columns on the remote
/// sheet so they are never reinterpreted as dates.
const NUMBER_FORMAT_PATTERN: &str = "0.00";

/// Internal classification of store failures. Remote-tier variants always
/// trigger the local fallback; only `LocalIo` reaches the caller.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("spreadsheet configuration not resolved")]
    ConfigUnresolved,

    #[error("remote spreadsheet error: {0}")]
    RemoteApi(anyhow::Error),

    #[error("local file error: {0}")]
    LocalIo(anyhow::Error),
}

/// Which backend actually served or accepted the record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageTier {
    /// The remote spreadsheet
    Remote,
    /// The local CSV fallback file
    LocalFile,
    /// Nothing persisted anywhere yet; a fresh empty record set
    Empty,
}

impl fmt::Display for StorageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageTier::Remote => f.write_str("remote spreadsheet"),
            StorageTier::LocalFile => f.write_str("local file"),
            StorageTier::Empty => f.write_str("empty record set"),
        }
    }
}

/// Result of a load, carrying the tier so the caller can surface the
/// informational "different backend used" notice.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub records: Vec<DepositRecord>,
    pub tier: StorageTier,
}

/// Result of a successful save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOutcome {
    pub tier: StorageTier,
    pub rows_written: usize,
}

/// Load/save of the flat deposit table with remote-first resolution.
#[derive(Clone)]
pub struct RecordStore {
    resolver: ConfigResolver,
    connection: CsvConnection,
    remote_override: Option<Arc<dyn SpreadsheetApi>>,
}

impl RecordStore {
    pub fn new(resolver: ConfigResolver, connection: CsvConnection) -> Self {
        Self {
            resolver,
            connection,
            remote_override: None,
        }
    }

    /// Create a store with an injected spreadsheet client (for testing
    /// against an in-memory fake). Configuration must still resolve for the
    /// remote tier to be attempted.
    pub fn with_remote(
        resolver: ConfigResolver,
        connection: CsvConnection,
        remote: Arc<dyn SpreadsheetApi>,
    ) -> Self {
        Self {
            resolver,
            connection,
            remote_override: Some(remote),
        }
    }

    /// Load the full record set: remote sheet first, then the local file,
    /// then an empty set with the full schema.
    pub async fn load(&self) -> Result<LoadOutcome> {
        match self.load_remote().await {
            Ok(records) => {
                info!("📥 Loaded {} deposits from the remote sheet", records.len());
                return Ok(LoadOutcome {
                    records,
                    tier: StorageTier::Remote,
                });
            }
            Err(StoreError::ConfigUnresolved) => {
                info!("No remote configuration resolved, using local storage");
            }
            Err(e) => {
                warn!("Error loading data from remote sheet: {}. Using local storage instead.", e);
            }
        }

        if self.connection.deposits_file_path().exists() {
            let repository = DepositRepository::new(self.connection.clone());
            let records = repository
                .read_deposits()
                .await
                .map_err(StoreError::LocalIo)?;
            info!("📥 Loaded {} deposits from the local file", records.len());
            Ok(LoadOutcome {
                records,
                tier: StorageTier::LocalFile,
            })
        } else {
            info!("No local file found, starting with an empty record set");
            Ok(LoadOutcome {
                records: Vec::new(),
                tier: StorageTier::Empty,
            })
        }
    }

    /// Save the full record set: remote sheet first, local file as the final
    /// fallback. A local write failure is the only error surfaced.
    pub async fn save(&self, records: &[DepositRecord]) -> Result<SaveOutcome> {
        match self.save_remote(records).await {
            Ok(()) => {
                info!("💾 Saved {} deposits to the remote sheet", records.len());
                return Ok(SaveOutcome {
                    tier: StorageTier::Remote,
                    rows_written: records.len(),
                });
            }
            Err(StoreError::ConfigUnresolved) => {
                info!("No remote configuration resolved, saving to local file");
            }
            Err(e) => {
                warn!("Error saving to remote sheet: {}. Saving to local file instead.", e);
            }
        }

        let repository = DepositRepository::new(self.connection.clone());
        repository
            .write_deposits(records)
            .await
            .map_err(StoreError::LocalIo)?;

        info!("💾 Saved {} deposits to the local file", records.len());
        Ok(SaveOutcome {
            tier: StorageTier::LocalFile,
            rows_written: records.len(),
        })
    }

    /// Resolve the remote capability, or `ConfigUnresolved` when the layered
    /// configuration yields no usable sheet id + credential pair.
    fn resolve_remote(&self) -> Result<Arc<dyn SpreadsheetApi>, StoreError> {
        let config = self
            .resolver
            .sheets_config()
            .ok_or(StoreError::ConfigUnresolved)?;

        if let Some(remote) = &self.remote_override {
            return Ok(Arc::clone(remote));
        }

        Ok(Arc::new(RestSheetsClient::new(config)))
    }

    async fn load_remote(&self) -> Result<Vec<DepositRecord>, StoreError> {
        let remote = self.resolve_remote()?;

        let rows = remote
            .read_all_records()
            .await
            .map_err(StoreError::RemoteApi)?;

        Ok(rows.iter().map(record_from_fields).collect())
    }

    async fn save_remote(&self, records: &[DepositRecord]) -> Result<(), StoreError> {
        let remote = self.resolve_remote()?;

        let rows: Vec<Vec<String>> = records.iter().map(record_to_row).collect();
        remote
            .clear_and_write(&header_row(), &rows)
            .await
            .map_err(StoreError::RemoteApi)?;

        // Formatting is cosmetic; the data write above already succeeded.
        if let Err(e) = remote
            .format_columns(&NUMERIC_COLUMNS, NUMBER_FORMAT_PATTERN, rows.len())
            .await
        {
            warn!("Could not apply number formatting: {}", e);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct FakeState {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
        format_calls: Vec<(Vec<usize>, String, usize)>,
    }

    /// In-memory stand-in for the remote sheet, with switchable failures.
    #[derive(Default)]
    struct FakeSheets {
        state: Mutex<FakeState>,
        fail_reads: bool,
        fail_writes: bool,
        fail_formatting: bool,
    }

    #[async_trait]
    impl SpreadsheetApi for FakeSheets {
        async fn read_all_records(&self) -> Result<Vec<HashMap<String, String>>> {
            if self.fail_reads {
                return Err(anyhow!("simulated API outage"));
            }
            let state = self.state.lock().unwrap();
            Ok(state
                .rows
                .iter()
                .map(|row| {
                    state
                        .header
                        .iter()
                        .cloned()
                        .zip(row.iter().cloned())
                        .collect()
                })
                .collect())
        }

        async fn clear_and_write(&self, header: &[String], rows: &[Vec<String>]) -> Result<()> {
            if self.fail_writes {
                return Err(anyhow!("simulated write failure"));
            }
            let mut state = self.state.lock().unwrap();
            state.header = header.to_vec();
            state.rows = rows.to_vec();
            Ok(())
        }

        async fn format_columns(
            &self,
            columns: &[usize],
            pattern: &str,
            row_count: usize,
        ) -> Result<()> {
            if self.fail_formatting {
                return Err(anyhow!("simulated formatting failure"));
            }
            let mut state = self.state.lock().unwrap();
            state
                .format_calls
                .push((columns.to_vec(), pattern.to_string(), row_count));
            Ok(())
        }
    }

    fn sample_record(account_number: &str) -> DepositRecord {
        DepositRecord {
            bank: "ICICI".to_string(),
            account_number: account_number.to_string(),
            principal: 10000.0,
            rate: 5.5,
            start_date: "2023-01-01".to_string(),
            duration: "1 years 0 months 0 days".to_string(),
            compounding: "Yearly".to_string(),
            maturity_amount: 10550.0,
            maturity_date: "2024-01-01".to_string(),
        }
    }

    fn unconfigured_store(temp_dir: &TempDir) -> RecordStore {
        let connection = CsvConnection::new(temp_dir.path()).unwrap();
        let resolver = ConfigResolver::for_data_directory(temp_dir.path());
        RecordStore::new(resolver, connection)
    }

    fn configured_store(temp_dir: &TempDir, fake: Arc<FakeSheets>) -> RecordStore {
        fs::write(
            temp_dir.path().join("secrets.yaml"),
            "spreadsheet_id: test-sheet\nsheets_credential: test-token\n",
        )
        .unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();
        let resolver = ConfigResolver::for_data_directory(temp_dir.path());
        RecordStore::with_remote(resolver, connection, fake)
    }

    #[tokio::test]
    async fn first_load_without_config_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = unconfigured_store(&temp_dir);

        let outcome = store.load().await.unwrap();
        assert_eq!(outcome.tier, StorageTier::Empty);
        assert!(outcome.records.is_empty());
    }

    #[tokio::test]
    async fn save_without_config_lands_in_local_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = unconfigured_store(&temp_dir);

        let records = vec![sample_record("FD-1")];
        let outcome = store.save(&records).await.unwrap();
        assert_eq!(outcome.tier, StorageTier::LocalFile);
        assert_eq!(outcome.rows_written, 1);

        let reloaded = store.load().await.unwrap();
        assert_eq!(reloaded.tier, StorageTier::LocalFile);
        assert_eq!(reloaded.records, records);
    }

    #[tokio::test]
    async fn local_round_trip_is_stable_across_two_cycles() {
        let temp_dir = TempDir::new().unwrap();
        let store = unconfigured_store(&temp_dir);

        let records = vec![sample_record("FD-1"), sample_record("007")];
        store.save(&records).await.unwrap();
        let first = store.load().await.unwrap().records;
        store.save(&first).await.unwrap();
        let second = store.load().await.unwrap().records;

        assert_eq!(first, records);
        assert_eq!(second, records);
    }

    #[tokio::test]
    async fn remote_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let fake = Arc::new(FakeSheets::default());
        let store = configured_store(&temp_dir, Arc::clone(&fake));

        let records = vec![sample_record("FD-9")];
        let outcome = store.save(&records).await.unwrap();
        assert_eq!(outcome.tier, StorageTier::Remote);

        {
            let state = fake.state.lock().unwrap();
            assert_eq!(state.header.len(), 9);
            assert_eq!(state.rows.len(), 1);
            // Numerics travel as text.
            assert_eq!(state.rows[0][2], "10000");
        }

        let reloaded = store.load().await.unwrap();
        assert_eq!(reloaded.tier, StorageTier::Remote);
        assert_eq!(reloaded.records, records);
    }

    #[tokio::test]
    async fn remote_save_requests_number_formatting() {
        let temp_dir = TempDir::new().unwrap();
        let fake = Arc::new(FakeSheets::default());
        let store = configured_store(&temp_dir, Arc::clone(&fake));

        store
            .save(&[sample_record("A"), sample_record("B")])
            .await
            .unwrap();

        let state = fake.state.lock().unwrap();
        assert_eq!(state.format_calls.len(), 1);
        let (columns, pattern, row_count) = &state.format_calls[0];
        assert_eq!(columns, &vec![2, 3, 7]);
        assert_eq!(pattern, "0.00");
        assert_eq!(*row_count, 2);
    }

    #[tokio::test]
    async fn formatting_failure_does_not_fail_the_save() {
        let temp_dir = TempDir::new().unwrap();
        let fake = Arc::new(FakeSheets {
            fail_formatting: true,
            ..FakeSheets::default()
        });
        let store = configured_store(&temp_dir, Arc::clone(&fake));

        let outcome = store.save(&[sample_record("A")]).await.unwrap();
        assert_eq!(outcome.tier, StorageTier::Remote);

        // The data itself still landed remotely.
        assert_eq!(fake.state.lock().unwrap().rows.len(), 1);
    }

    #[tokio::test]
    async fn remote_read_failure_falls_back_to_local_file() {
        let temp_dir = TempDir::new().unwrap();
        let fake = Arc::new(FakeSheets {
            fail_reads: true,
            ..FakeSheets::default()
        });
        let store = configured_store(&temp_dir, Arc::clone(&fake));

        // Seed the local fallback file.
        let connection = CsvConnection::new(temp_dir.path()).unwrap();
        DepositRepository::new(connection)
            .write_deposits(&[sample_record("LOCAL-1")])
            .await
            .unwrap();

        let outcome = store.load().await.unwrap();
        assert_eq!(outcome.tier, StorageTier::LocalFile);
        assert_eq!(outcome.records[0].account_number, "LOCAL-1");
    }

    #[tokio::test]
    async fn remote_write_failure_falls_back_to_local_file() {
        let temp_dir = TempDir::new().unwrap();
        let fake = Arc::new(FakeSheets {
            fail_writes: true,
            fail_reads: true,
            ..FakeSheets::default()
        });
        let store = configured_store(&temp_dir, Arc::clone(&fake));

        let records = vec![sample_record("FB-1")];
        let outcome = store.save(&records).await.unwrap();
        assert_eq!(outcome.tier, StorageTier::LocalFile);

        let reloaded = store.load().await.unwrap();
        assert_eq!(reloaded.tier, StorageTier::LocalFile);
        assert_eq!(reloaded.records, records);
    }

    #[tokio::test]
    async fn remote_row_missing_rate_is_backfilled() {
        let temp_dir = TempDir::new().unwrap();
        let fake = Arc::new(FakeSheets::default());
        {
            let mut state = fake.state.lock().unwrap();
            state.header = vec![
                "Bank".to_string(),
                "FD_Number".to_string(),
                "Principal".to_string(),
            ];
            state.rows = vec![vec![
                "SBI".to_string(),
                "FD-7".to_string(),
                "5000".to_string(),
            ]];
        }
        let store = configured_store(&temp_dir, Arc::clone(&fake));

        let outcome = store.load().await.unwrap();
        assert_eq!(outcome.tier, StorageTier::Remote);
        assert_eq!(outcome.records[0].rate, 0.0);
        assert_eq!(outcome.records[0].principal, 5000.0);
    }
}
