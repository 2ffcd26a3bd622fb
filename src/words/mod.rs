pub mod history;
mod models;
mod store;

pub use history::{HistoryStore, ModificationKind};
pub use models::*;
pub use store::{WordStore, ALL_CATEGORIES};
