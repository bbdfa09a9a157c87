//! # Configuration Module
//!
//! Layered configuration lookup for the deposit tracker. Values are resolved
//! from an ordered list of providers (secrets file, then environment, then
//! plain local files); the first provider that yields a value wins and a
//! missing source is skipped, never fatal. Resolution happens per call so a
//! credential dropped into the data directory is picked up without a restart.

pub mod providers;

use log::info;
use std::path::Path;
use std::sync::Arc;

pub use providers::{EnvProvider, LocalFileProvider, SecretsFileProvider};

/// Key for the remote spreadsheet identifier.
pub const KEY_SPREADSHEET_ID: &str = "spreadsheet_id";
/// Key for the remote spreadsheet credential payload.
pub const KEY_SHEETS_CREDENTIAL: &str = "sheets_credential";
/// Key for the admin login username.
pub const KEY_ADMIN_USERNAME: &str = "admin_username";
/// Key for the admin login password.
pub const KEY_ADMIN_PASSWORD: &str = "admin_password";

/// A single configuration source. Returning `None` means "not present here,
/// try the next provider".
pub trait ConfigProvider: Send + Sync {
    /// Short name used when logging which source won a lookup.
    fn name(&self) -> &'static str;

    /// Look up a configuration value by key.
    fn get(&self, key: &str) -> Option<String>;
}

/// Everything needed to talk to the remote spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub credential: String,
}

/// Admin login credentials, with the development fallbacks applied when no
/// provider resolves them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

/// Ordered list of configuration providers, tried first-to-last.
#[derive(Clone)]
pub struct ConfigResolver {
    providers: Vec<Arc<dyn ConfigProvider>>,
}

impl ConfigResolver {
    pub fn new(providers: Vec<Arc<dyn ConfigProvider>>) -> Self {
        Self { providers }
    }

    /// The standard provider chain for a data directory: `secrets.yaml`,
    /// then environment variables, then the `.local_config` /
    /// `credentials.json` files the original deployment keeps alongside the
    /// data.
    pub fn for_data_directory(data_directory: &Path) -> Self {
        Self::new(vec![
            Arc::new(SecretsFileProvider::new(data_directory.join("secrets.yaml"))),
            Arc::new(EnvProvider::new()),
            Arc::new(LocalFileProvider::new(data_directory.to_path_buf())),
        ])
    }

    /// Resolve a key through the provider chain, stopping at the first hit.
    pub fn resolve(&self, key: &str) -> Option<String> {
        for provider in &self.providers {
            if let Some(value) = provider.get(key) {
                info!("Resolved config key '{}' from {}", key, provider.name());
                return Some(value);
            }
        }
        None
    }

    /// Resolve the remote spreadsheet configuration. Both the sheet id and
    /// the credential must be present for the remote tier to be usable.
    pub fn sheets_config(&self) -> Option<SheetsConfig> {
        let spreadsheet_id = self.resolve(KEY_SPREADSHEET_ID)?;
        let credential = self.resolve(KEY_SHEETS_CREDENTIAL)?;
        Some(SheetsConfig {
            spreadsheet_id,
            credential,
        })
    }

    /// Resolve the admin login credentials, falling back to the local
    /// development defaults when no source provides them.
    pub fn admin_credentials(&self) -> AdminCredentials {
        AdminCredentials {
            username: self
                .resolve(KEY_ADMIN_USERNAME)
                .unwrap_or_else(|| "admin".to_string()),
            password: self
                .resolve(KEY_ADMIN_PASSWORD)
                .unwrap_or_else(|| "default_local_password".to_string()),
        }
    }
}
