//! Deposit session management: the in-memory record set, the pending
//! calculation, and the explicit load/save lifecycle around the store.

use anyhow::Result;
use log::info;

use crate::domain::commands::deposits::{
    AddDepositCommand, AddDepositResult, DeleteDepositCommand, DeleteDepositResult, MaturityQuery,
};
use crate::domain::maturity_service::MaturityService;
use crate::storage::{RecordStore, SaveOutcome, StorageTier};
use shared::{DepositRecord, MaturityResult, DATE_FORMAT};

/// Session state owned by the caller: loaded once at session start, mutated
/// in memory by add/delete, flushed by an explicit save. There is no
/// autosave and no ambient global copy.
#[derive(Debug, Clone)]
pub struct DepositSession {
    /// Insertion-ordered record set; positional index is the deletion key.
    pub records: Vec<DepositRecord>,
    /// Last calculation result, consumed by the next add.
    pub pending_calculation: Option<MaturityResult>,
    /// Which backend served the initial load.
    pub loaded_from: StorageTier,
}

/// Service for deposit calculations and record-set mutations.
#[derive(Clone)]
pub struct DepositService {
    store: RecordStore,
    calculator: MaturityService,
}

impl DepositService {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            calculator: MaturityService::new(),
        }
    }

    /// Load the persisted record set and open a session around it.
    pub async fn start_session(&self) -> Result<DepositSession> {
        let outcome = self.store.load().await?;
        info!(
            "💰 Session started with {} deposits ({})",
            outcome.records.len(),
            outcome.tier
        );
        Ok(DepositSession {
            records: outcome.records,
            pending_calculation: None,
            loaded_from: outcome.tier,
        })
    }

    /// Run the maturity calculation and park the result on the session so a
    /// following add can reuse it.
    pub fn calculate(
        &self,
        query: MaturityQuery,
        session: &mut DepositSession,
    ) -> Result<MaturityResult> {
        if query.term.is_zero() {
            return Err(anyhow::anyhow!("Duration must be greater than 0"));
        }
        Self::validate_amounts(query.principal, query.rate_percent)?;

        let result = self.calculator.compute(&query);
        session.pending_calculation = Some(result);
        Ok(result)
    }

    /// Validate the command, derive the maturity fields, and append the new
    /// record to the session.
    pub fn add_deposit(
        &self,
        command: AddDepositCommand,
        session: &mut DepositSession,
    ) -> Result<AddDepositResult> {
        if command.term.is_zero() {
            return Err(anyhow::anyhow!("Duration must be greater than 0"));
        }
        if command.account_number.trim().is_empty() {
            return Err(anyhow::anyhow!("Please enter an FD Account Number"));
        }
        Self::validate_amounts(command.principal, command.rate_percent)?;

        // Reuse the parked calculation when present; compute fresh otherwise.
        let result = match session.pending_calculation.take() {
            Some(result) => result,
            None => self.calculator.compute(&command.to_query()),
        };

        let record = DepositRecord {
            bank: command.bank.clone(),
            account_number: command.account_number.clone(),
            principal: command.principal,
            rate: command.rate_percent,
            start_date: command.start_date.format(DATE_FORMAT).to_string(),
            duration: command.term.to_string(),
            compounding: command.compounding.label().to_string(),
            maturity_amount: result.maturity_amount,
            maturity_date: result.maturity_date.format(DATE_FORMAT).to_string(),
        };

        session.records.push(record.clone());
        let position = session.records.len() - 1;
        info!(
            "💰 Added deposit '{}' at position {}",
            record.account_number, position
        );

        Ok(AddDepositResult { record, position })
    }

    /// Remove the record at the given position; everything after it shifts
    /// down by one.
    pub fn delete_deposit(
        &self,
        command: DeleteDepositCommand,
        session: &mut DepositSession,
    ) -> Result<DeleteDepositResult> {
        if command.index >= session.records.len() {
            return Err(anyhow::anyhow!(
                "No deposit at position {} ({} records)",
                command.index,
                session.records.len()
            ));
        }

        let removed = session.records.remove(command.index);
        info!(
            "🗑️ Deleted deposit '{}' at position {}",
            removed.account_number, command.index
        );

        Ok(DeleteDepositResult {
            remaining: session.records.len(),
            removed,
        })
    }

    /// Flush the session's record set to the store. The in-memory records
    /// are left untouched either way.
    pub async fn save_session(&self, session: &DepositSession) -> Result<SaveOutcome> {
        self.store.save(&session.records).await
    }

    fn validate_amounts(principal: f64, rate_percent: f64) -> Result<()> {
        if !principal.is_finite() || principal < 0.0 {
            return Err(anyhow::anyhow!("Principal must be a non-negative amount"));
        }
        if !rate_percent.is_finite() || !(0.0..=20.0).contains(&rate_percent) {
            return Err(anyhow::anyhow!("Interest rate must be between 0 and 20"));
        }
        Ok(())
    }
}
