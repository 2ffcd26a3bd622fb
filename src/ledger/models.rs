//! Data models for the daily activity ledger

use chrono::NaiveDate;
use serde::Serialize;

/// One day's slice of the debt report. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DebtEntry {
    pub date: NaiveDate,
    pub quota: u32,
    /// Distinct words recorded that day (0 when no record exists)
    pub actual: usize,
    /// `quota - actual`; negative on surplus days
    pub debt: i64,
}

/// Full debt report: total over the whole history, breakdown capped for
/// display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DebtReport {
    pub total_debt: i64,
    pub breakdown: Vec<DebtEntry>,
}

impl DebtReport {
    pub fn empty() -> Self {
        Self {
            total_debt: 0,
            breakdown: Vec::new(),
        }
    }
}
