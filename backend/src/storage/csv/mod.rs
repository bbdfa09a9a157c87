//! Local CSV persistence: the fallback backend when the remote spreadsheet
//! is unreachable or unconfigured.

pub mod connection;
pub mod deposit_repository;

pub use connection::CsvConnection;
pub use deposit_repository::DepositRepository;
