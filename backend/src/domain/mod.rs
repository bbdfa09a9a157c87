//! # Domain Module
//!
//! Business logic for the deposit tracker: the maturity calculator, the
//! deposit session (add/delete/save of the record set), the admin access
//! gate, and CSV export. It operates independently of any UI framework and
//! of the concrete storage backend.
//!
//! Validation lives here, at the edge: services reject zero durations,
//! blank account numbers, and out-of-bound amounts before the calculator or
//! the store ever see them — neither of those re-validates.

pub mod auth_service;
pub mod commands;
pub mod deposit_service;
pub mod export_service;
pub mod maturity_service;

pub use auth_service::*;
pub use deposit_service::*;
pub use export_service::*;
pub use maturity_service::*;
