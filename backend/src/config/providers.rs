//! Concrete configuration sources: a YAML secrets file, process environment
//! variables, and the plain local files (`.local_config`, `credentials.json`)
//! kept next to the data.

use log::warn;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use super::{ConfigProvider, KEY_SHEETS_CREDENTIAL, KEY_SPREADSHEET_ID};

/// Reads keys from a flat YAML mapping, e.g.
///
/// ```yaml
/// spreadsheet_id: 1AbC...
/// sheets_credential: ya29....
/// admin_username: admin
/// ```
///
/// The file is re-read on every lookup so edits take effect without a
/// restart. An absent file is a skipped source; a malformed file is skipped
/// with a warning.
pub struct SecretsFileProvider {
    path: PathBuf,
}

impl SecretsFileProvider {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_values(&self) -> Option<HashMap<String, serde_yaml::Value>> {
        let contents = fs::read_to_string(&self.path).ok()?;
        match serde_yaml::from_str(&contents) {
            Ok(values) => Some(values),
            Err(e) => {
                warn!(
                    "Secrets file {} is not valid YAML, skipping: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }
}

impl ConfigProvider for SecretsFileProvider {
    fn name(&self) -> &'static str {
        "secrets file"
    }

    fn get(&self, key: &str) -> Option<String> {
        let values = self.read_values()?;
        let value = values.get(key)?;
        match value {
            serde_yaml::Value::String(s) => Some(s.clone()),
            other => serde_yaml::to_string(other)
                .ok()
                .map(|s| s.trim_end().to_string()),
        }
    }
}

/// Reads keys from environment variables; the variable name is the key
/// upper-cased (`spreadsheet_id` -> `SPREADSHEET_ID`). Empty values count as
/// absent.
pub struct EnvProvider;

impl EnvProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EnvProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigProvider for EnvProvider {
    fn name(&self) -> &'static str {
        "environment"
    }

    fn get(&self, key: &str) -> Option<String> {
        let var = key.to_ascii_uppercase();
        std::env::var(var).ok().filter(|v| !v.trim().is_empty())
    }
}

/// The original deployment's loose files in the data directory:
/// `.local_config` holds the spreadsheet id on a single line and
/// `credentials.json` holds the raw credential payload. Other keys are not
/// served from here.
pub struct LocalFileProvider {
    directory: PathBuf,
}

impl LocalFileProvider {
    pub fn new(directory: PathBuf) -> Self {
        Self { directory }
    }

    fn read_trimmed(&self, file_name: &str) -> Option<String> {
        let contents = fs::read_to_string(self.directory.join(file_name)).ok()?;
        let trimmed = contents.trim().to_string();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}

impl ConfigProvider for LocalFileProvider {
    fn name(&self) -> &'static str {
        "local config file"
    }

    fn get(&self, key: &str) -> Option<String> {
        match key {
            KEY_SPREADSHEET_ID => self.read_trimmed(".local_config"),
            KEY_SHEETS_CREDENTIAL => self.read_trimmed("credentials.json"),
            _ => None,
        }
    }
}
