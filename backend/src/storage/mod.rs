//! # Storage Module
//!
//! Persistence for the deposit table. Two backends sit behind the
//! [`RecordStore`]: the remote spreadsheet (preferred, used whenever the
//! layered configuration resolves) and the local CSV file (the fallback that
//! absorbs every remote-tier failure).

pub mod csv;
pub mod rows;
pub mod sheets;
pub mod store;
pub mod traits;

pub use csv::{CsvConnection, DepositRepository};
pub use store::{LoadOutcome, RecordStore, SaveOutcome, StorageTier, StoreError};
pub use traits::SpreadsheetApi;
