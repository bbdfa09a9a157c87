//! Maturity calculation for a fixed deposit.
//!
//! The duration-to-years conversion uses fixed divisors (12 for months, 365
//! for days) and the maturity date offset truncates `duration_years * 365`
//! to whole days. This is deliberately NOT calendar arithmetic: stored
//! records depend on this exact formula, so it must not be "corrected".

use chrono::Duration;

use crate::domain::commands::deposits::MaturityQuery;
use shared::MaturityResult;

/// Pure maturity calculator. Deterministic and side-effect free; callers
/// validate inputs (non-zero term, known compounding) before invoking it.
#[derive(Clone, Default)]
pub struct MaturityService;

impl MaturityService {
    pub fn new() -> Self {
        Self
    }

    /// Compute the maturity amount and date for the given deposit terms.
    ///
    /// An all-zero term is degenerate but defined: the principal comes back
    /// unchanged and the maturity date equals the start date.
    pub fn compute(&self, query: &MaturityQuery) -> MaturityResult {
        let rate = query.rate_percent / 100.0;
        let periods = query.compounding.periods_per_year() as f64;

        let duration_years = query.term.years as f64
            + query.term.months as f64 / 12.0
            + query.term.days as f64 / 365.0;

        let maturity_amount =
            query.principal * (1.0 + rate / periods).powf(periods * duration_years);

        // Truncating cast, matching the stored records' historical offsets.
        let offset_days = (duration_years * 365.0) as i64;
        let maturity_date = query.start_date + Duration::days(offset_days);

        MaturityResult {
            maturity_amount: round_to_cents(maturity_amount),
            maturity_date,
        }
    }
}

fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
