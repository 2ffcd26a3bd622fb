//! lexis — personal vocabulary trainer.
//!
//! A local HTTP API (and small CLI) over JSON-file stores: a word
//! catalog browsed by category, a daily activity ledger driving the
//! word-debt report, a quiz engine with simplified SM-2 scheduling, and
//! a wordbook XML importer.

pub mod assist;
pub mod config;
pub mod ledger;
pub mod quiz;
pub mod review;
pub mod server;
pub mod storage;
pub mod wordbook;
pub mod words;
