use anyhow::Result;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use shared::RECORD_COLUMNS;

/// Name of the local fallback file inside the data directory.
const DEPOSITS_FILE: &str = "fd_data.csv";

/// CsvConnection manages the data directory and ensures the deposits file
/// exists with its header row.
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Create a new CSV connection with a base directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// Create a new CSV connection in the default data directory,
    /// ~/Documents/Deposit Tracker.
    pub fn new_default() -> Result<Self> {
        let home_dir = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| anyhow::anyhow!("Could not determine home directory"))?;

        let data_dir = PathBuf::from(home_dir)
            .join("Documents")
            .join("Deposit Tracker");
        info!("Using default data directory: {}", data_dir.display());

        Self::new(data_dir)
    }

    /// Get the path of the local deposits file
    pub fn deposits_file_path(&self) -> PathBuf {
        self.base_directory.join(DEPOSITS_FILE)
    }

    /// Ensure the deposits file exists with the full nine-column header
    pub fn ensure_deposits_file_exists(&self) -> Result<()> {
        if !self.base_directory.exists() {
            fs::create_dir_all(&self.base_directory)?;
        }

        let file_path = self.deposits_file_path();
        if !file_path.exists() {
            let header = format!("{}\n", RECORD_COLUMNS.join(","));
            fs::write(&file_path, header)?;
        }

        Ok(())
    }

    /// Get the base directory path
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }
}
