mod debt;
mod models;
mod store;

pub use debt::compute_debt;
pub use models::{DebtEntry, DebtReport};
pub use store::ActivityLedger;
