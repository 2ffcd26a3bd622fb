//! Word-debt calculator.
//!
//! Debt is the running difference between the daily quota and the
//! distinct words actually reviewed each day, accumulated from the
//! first recorded day of activity through yesterday. Today is excluded
//! because its tally is still in progress. Days without any record
//! count fully against the quota; surplus days (actual > quota) carry
//! across days and cancel outstanding debt, but the total is clamped so
//! it never drops below zero — surplus cannot be banked.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::models::{DebtEntry, DebtReport};

/// Number of recent days included in the display breakdown. The total
/// always reflects the full history.
const BREAKDOWN_DISPLAY_DAYS: usize = 20;

/// Compute the debt report from per-day distinct-word counts.
pub fn compute_debt(
    counts: &BTreeMap<NaiveDate, usize>,
    quota: u32,
    today: NaiveDate,
) -> DebtReport {
    let earliest = match counts.keys().next() {
        Some(date) => *date,
        None => return DebtReport::empty(),
    };

    let mut total: i64 = 0;
    let mut date = earliest;
    while date < today {
        let actual = counts.get(&date).copied().unwrap_or(0);
        total += i64::from(quota) - actual as i64;
        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    let mut breakdown = Vec::new();
    let mut date = today.pred_opt();
    while let Some(current) = date {
        if current < earliest || breakdown.len() >= BREAKDOWN_DISPLAY_DAYS {
            break;
        }
        let actual = counts.get(&current).copied().unwrap_or(0);
        breakdown.push(DebtEntry {
            date: current,
            quota,
            actual,
            debt: i64::from(quota) - actual as i64,
        });
        date = current.pred_opt();
    }

    DebtReport {
        total_debt: total.max(0),
        breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    fn counts(entries: &[(u32, usize)]) -> BTreeMap<NaiveDate, usize> {
        entries.iter().map(|&(d, n)| (day(d), n)).collect()
    }

    #[test]
    fn test_no_history_means_no_debt() {
        let report = compute_debt(&BTreeMap::new(), 100, day(10));
        assert_eq!(report.total_debt, 0);
        assert!(report.breakdown.is_empty());
    }

    #[test]
    fn test_worked_example_surplus_carries_then_clamps() {
        // quota=100; day1: 80, day2: 120, day3: 0 (no record)
        let counts = counts(&[(1, 80), (2, 120)]);
        let report = compute_debt(&counts, 100, day(4));

        let debts: Vec<i64> = report.breakdown.iter().map(|e| e.debt).collect();
        // Most recent first: day3 (+100), day2 (-20), day1 (+20)
        assert_eq!(debts, vec![100, -20, 20]);
        assert_eq!(report.total_debt, 20 - 20 + 100);
    }

    #[test]
    fn test_total_never_negative() {
        let counts = counts(&[(1, 500)]);
        let report = compute_debt(&counts, 100, day(3));
        // day1 surplus 400, day2 deficit 100 -> clamped at 0
        assert_eq!(report.total_debt, 0);
    }

    #[test]
    fn test_gap_days_count_full_quota() {
        // Activity on day 1 only; days 2..=4 elapsed with no record
        let counts = counts(&[(1, 100)]);
        let report = compute_debt(&counts, 100, day(5));

        assert_eq!(report.total_debt, 300);
        assert_eq!(report.breakdown.len(), 4);
        for entry in report.breakdown.iter().take(3) {
            assert_eq!(entry.actual, 0);
            assert_eq!(entry.debt, 100);
        }
    }

    #[test]
    fn test_today_is_excluded() {
        // All activity happened today; nothing has elapsed yet
        let counts = counts(&[(10, 150)]);
        let report = compute_debt(&counts, 100, day(10));
        assert_eq!(report.total_debt, 0);
        assert!(report.breakdown.is_empty());
    }

    #[test]
    fn test_breakdown_capped_while_total_reflects_history() {
        let counts = counts(&[(1, 100)]);
        let report = compute_debt(&counts, 100, NaiveDate::from_ymd_opt(2026, 2, 5).unwrap());
        assert_eq!(report.breakdown.len(), 20);
        // 34 zero-activity days elapsed after day 1 (Jan 2 .. Feb 4)
        assert_eq!(report.total_debt, 34 * 100);
    }

    #[test]
    fn test_breakdown_is_most_recent_first() {
        let counts = counts(&[(1, 10), (2, 20)]);
        let report = compute_debt(&counts, 100, day(3));
        assert_eq!(report.breakdown[0].date, day(2));
        assert_eq!(report.breakdown[0].actual, 20);
        assert_eq!(report.breakdown[1].date, day(1));
    }
}
