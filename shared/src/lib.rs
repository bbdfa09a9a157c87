use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column order of the persisted record table. Every storage backend (remote
/// sheet, local CSV, export) writes these nine columns in this order.
pub const RECORD_COLUMNS: [&str; 9] = [
    "Bank",
    "FD_Number",
    "Principal",
    "Rate",
    "StartDate",
    "Duration",
    "Compounding",
    "MaturityAmount",
    "MaturityDate",
];

/// Storage text format for all date-bearing fields.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One fixed deposit.
///
/// Date fields are kept as text: values that parse are normalized to
/// `YYYY-MM-DD` on load, values that don't are retained verbatim rather than
/// failing the whole load. `duration` and `compounding` hold the display text
/// the deposit was created with; the structured inputs only exist at
/// calculation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositRecord {
    /// Bank name or custom institution label
    #[serde(rename = "Bank")]
    pub bank: String,
    /// Account identifier, kept as text so leading zeros survive
    #[serde(rename = "FD_Number")]
    pub account_number: String,
    /// Deposited amount, non-negative
    #[serde(rename = "Principal")]
    pub principal: f64,
    /// Annual interest rate in percent (0-20, business bound)
    #[serde(rename = "Rate")]
    pub rate: f64,
    /// Deposit start date (`YYYY-MM-DD`, or raw text if unparseable)
    #[serde(rename = "StartDate")]
    pub start_date: String,
    /// Display text of the deposit term, e.g. "1 years 6 months 0 days"
    #[serde(rename = "Duration")]
    pub duration: String,
    /// Compounding frequency label, e.g. "Quarterly"
    #[serde(rename = "Compounding")]
    pub compounding: String,
    /// Derived maturity value, rounded to 2 decimal places
    #[serde(rename = "MaturityAmount")]
    pub maturity_amount: f64,
    /// Derived maturity date (`YYYY-MM-DD`, or raw text if unparseable)
    #[serde(rename = "MaturityDate")]
    pub maturity_date: String,
}

/// Deposit term split into calendar components. At least one component must
/// be positive for a deposit to be accepted; the all-zero term is degenerate
/// but defined for the calculator itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Term {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

impl Term {
    pub fn new(years: u32, months: u32, days: u32) -> Self {
        Self { years, months, days }
    }

    /// True when every component is zero (an invalid deposit duration).
    pub fn is_zero(&self) -> bool {
        self.years == 0 && self.months == 0 && self.days == 0
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} years {} months {} days",
            self.years, self.months, self.days
        )
    }
}

/// How often interest is compounded within a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompoundingFrequency {
    Yearly,
    HalfYearly,
    Quarterly,
    Monthly,
}

impl CompoundingFrequency {
    /// Compounding periods per year (the `n` of the interest formula).
    pub fn periods_per_year(&self) -> u32 {
        match self {
            CompoundingFrequency::Yearly => 1,
            CompoundingFrequency::HalfYearly => 2,
            CompoundingFrequency::Quarterly => 4,
            CompoundingFrequency::Monthly => 12,
        }
    }

    /// Display label, also the text stored in the `Compounding` column.
    pub fn label(&self) -> &'static str {
        match self {
            CompoundingFrequency::Yearly => "Yearly",
            CompoundingFrequency::HalfYearly => "Half Yearly",
            CompoundingFrequency::Quarterly => "Quarterly",
            CompoundingFrequency::Monthly => "Monthly",
        }
    }

    /// Parse a stored label. Anything outside the four known labels is a
    /// caller programming error and yields `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Yearly" => Some(CompoundingFrequency::Yearly),
            "Half Yearly" => Some(CompoundingFrequency::HalfYearly),
            "Quarterly" => Some(CompoundingFrequency::Quarterly),
            "Monthly" => Some(CompoundingFrequency::Monthly),
            _ => None,
        }
    }
}

impl fmt::Display for CompoundingFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Output of the maturity calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaturityResult {
    /// Maturity value rounded to 2 decimal places
    pub maturity_amount: f64,
    /// Start date plus the truncated day-count of the fractional term
    pub maturity_date: NaiveDate,
}
