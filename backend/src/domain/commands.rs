//! Domain-level command and query types. These are the typed inputs the
//! presentation layer hands to the services; it is responsible for mapping
//! its form state into them before calling in.

pub mod deposits {
    use chrono::NaiveDate;
    use shared::{CompoundingFrequency, DepositRecord, Term};

    /// Inputs of one maturity calculation.
    #[derive(Debug, Clone, Copy)]
    pub struct MaturityQuery {
        pub principal: f64,
        /// Annual rate in percent, e.g. `5.5`
        pub rate_percent: f64,
        pub start_date: NaiveDate,
        pub term: Term,
        pub compounding: CompoundingFrequency,
    }

    /// Input for adding a deposit to the session.
    #[derive(Debug, Clone)]
    pub struct AddDepositCommand {
        pub bank: String,
        pub account_number: String,
        pub principal: f64,
        pub rate_percent: f64,
        pub start_date: NaiveDate,
        pub term: Term,
        pub compounding: CompoundingFrequency,
    }

    impl AddDepositCommand {
        /// The calculation this deposit's maturity fields derive from.
        pub fn to_query(&self) -> MaturityQuery {
            MaturityQuery {
                principal: self.principal,
                rate_percent: self.rate_percent,
                start_date: self.start_date,
                term: self.term,
                compounding: self.compounding,
            }
        }
    }

    /// Result of adding a deposit.
    #[derive(Debug, Clone)]
    pub struct AddDepositResult {
        pub record: DepositRecord,
        /// Zero-based position of the new record in the session
        pub position: usize,
    }

    /// Input for deleting a deposit by display position.
    #[derive(Debug, Clone, Copy)]
    pub struct DeleteDepositCommand {
        /// Zero-based positional index
        pub index: usize,
    }

    /// Result of deleting a deposit.
    #[derive(Debug, Clone)]
    pub struct DeleteDepositResult {
        pub removed: DepositRecord,
        pub remaining: usize,
    }
}

pub mod auth {
    /// One login attempt from the presentation layer.
    #[derive(Debug, Clone)]
    pub struct LoginAttempt {
        pub username: String,
        pub password: String,
    }

    /// Outcome of a login attempt.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct LoginOutcome {
        pub success: bool,
        pub message: String,
        /// Failed attempts left before the cooldown arms; `None` once
        /// authenticated or while the cooldown is active.
        pub attempts_remaining: Option<u32>,
        /// Seconds until attempts are evaluated again, when locked out.
        pub cooldown_seconds: Option<u64>,
    }
}
