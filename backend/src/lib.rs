//! # Deposit Tracker Backend
//!
//! Non-UI core of the fixed-deposit record-keeper.
//!
//! This crate brings together:
//! - **Domain**: maturity calculation, the deposit session, the admin gate
//! - **Storage**: the remote spreadsheet and the local CSV fallback
//! - **Config**: layered resolution of credentials and the sheet id
//!
//! The backend is UI-agnostic: the presentation layer (forms, tabs, login
//! screen) talks to it only through [`AppState`] and the typed commands in
//! [`domain::commands`].
//!
//! ## Architecture
//!
//! ```text
//! Presentation layer (forms, buttons)
//!     ↓
//! Domain layer (services, session state)
//!     ↓
//! Storage layer (remote sheet → local CSV fallback)
//! ```

pub mod config;
pub mod domain;
pub mod storage;

use anyhow::Result;
use log::info;
use std::path::PathBuf;

use crate::config::ConfigResolver;
use crate::domain::{AuthService, DepositService, ExportService};
use crate::storage::{CsvConnection, RecordStore};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub deposit_service: DepositService,
    pub auth_service: AuthService,
    pub export_service: ExportService,
}

/// Initialize the backend with all required services. With no explicit data
/// directory, the default under the user's Documents folder is used.
pub fn initialize_backend(data_directory: Option<PathBuf>) -> Result<AppState> {
    info!("Setting up storage");
    let connection = match data_directory {
        Some(directory) => CsvConnection::new(directory)?,
        None => CsvConnection::new_default()?,
    };

    info!("Setting up configuration");
    let resolver = ConfigResolver::for_data_directory(connection.base_directory());

    info!("Setting up domain services");
    let store = RecordStore::new(resolver.clone(), connection);
    let app_state = AppState {
        deposit_service: DepositService::new(store),
        auth_service: AuthService::new(resolver),
        export_service: ExportService::new(),
    };

    Ok(app_state)
}
