//! Remote spreadsheet persistence: the preferred backend when credentials
//! and a sheet id resolve from configuration.

pub mod client;

pub use client::{RestSheetsClient, WORKSHEET_NAME};
