use anyhow::Result;
use csv::{Reader, Writer};
use log::info;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};

use super::connection::CsvConnection;
use crate::storage::rows::{header_row, record_from_fields, record_to_row};
use shared::DepositRecord;

/// CSV-based deposit repository. The whole file is read and rewritten on
/// every operation; there is no incremental I/O.
#[derive(Clone)]
pub struct DepositRepository {
    connection: CsvConnection,
}

impl DepositRepository {
    /// Create a new CSV deposit repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Read all deposits from the local file
    pub async fn read_deposits(&self) -> Result<Vec<DepositRecord>> {
        self.connection.ensure_deposits_file_exists()?;

        let file_path = self.connection.deposits_file_path();
        let file = File::open(&file_path)?;
        let reader = BufReader::new(file);
        let mut csv_reader = Reader::from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let mut deposits = Vec::new();

        for result in csv_reader.records() {
            let record = result?;

            // Key each cell by its header so absent columns are backfilled
            // the same way remote rows are.
            let fields: HashMap<String, String> = headers
                .iter()
                .zip(record.iter())
                .map(|(header, value)| (header.to_string(), value.to_string()))
                .collect();

            deposits.push(record_from_fields(&fields));
        }

        info!(
            "Read {} deposits from {}",
            deposits.len(),
            file_path.display()
        );
        Ok(deposits)
    }

    /// Write all deposits to the local file, overwriting any prior copy
    pub async fn write_deposits(&self, deposits: &[DepositRecord]) -> Result<()> {
        self.connection.ensure_deposits_file_exists()?;

        let file_path = self.connection.deposits_file_path();

        // Temporary file for atomic replace
        let temp_path = file_path.with_extension("tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;

            let writer = BufWriter::new(file);
            let mut csv_writer = Writer::from_writer(writer);

            csv_writer.write_record(&header_row())?;
            for deposit in deposits {
                csv_writer.write_record(&record_to_row(deposit))?;
            }

            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &file_path)?;

        info!(
            "Wrote {} deposits to {}",
            deposits.len(),
            file_path.display()
        );
        Ok(())
    }
}
