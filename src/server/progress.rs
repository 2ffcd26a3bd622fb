//! Daily progress endpoints: the debt report and today's counter

use axum::extract::State;
use serde_json::json;

use crate::ledger::compute_debt;

use super::{success, ApiResult, AppState};

/// `GET /api/debt`
pub async fn get_debt(State(state): State<AppState>) -> ApiResult {
    let ledger = state.ledger.lock().unwrap();
    let counts = ledger.daily_counts()?;
    let report = compute_debt(&counts, state.daily_quota, ledger.today());

    Ok(success(json!({
        "total_debt": report.total_debt,
        "breakdown": report.breakdown,
    })))
}

/// `GET /api/daily-count` — the single authoritative daily counter,
/// queried by every page instead of per-page caches.
pub async fn get_daily_count(State(state): State<AppState>) -> ApiResult {
    let ledger = state.ledger.lock().unwrap();
    let count = ledger.count_for(ledger.today())?;
    Ok(success(json!({ "count": count })))
}
