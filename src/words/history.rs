//! Word modification history.
//!
//! Append-only log of word snapshots, one record per qualifying
//! mutation. The display query collapses the log to the latest record
//! per calendar day so the history view shows one row per day.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::{read_json_or_default, write_json, Result};
use crate::words::Word;

/// What kind of mutation produced a history record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModificationKind {
    Created,
    Updated,
    Moved,
}

/// Snapshot of a word at the time of a mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HistoryRecord {
    pub id: Uuid,
    pub word_id: Uuid,
    pub word: String,
    pub translation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_sentence: Option<String>,
    pub category: String,
    pub modified_at: DateTime<Utc>,
    pub kind: ModificationKind,
}

/// A history record as served by the API: collapsed to its calendar day
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DailyHistoryEntry {
    pub word: String,
    pub translation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_sentence: Option<String>,
    pub category: String,
    pub modified_date: NaiveDate,
    pub kind: ModificationKind,
}

pub struct HistoryStore {
    history_file: PathBuf,
}

impl HistoryStore {
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self {
            history_file: data_dir.join("history.json"),
        })
    }

    fn list(&self) -> Result<Vec<HistoryRecord>> {
        read_json_or_default(&self.history_file)
    }

    /// Append a snapshot of `word`
    pub fn record(&self, word: &Word, kind: ModificationKind) -> Result<()> {
        let mut records = self.list()?;
        records.push(HistoryRecord {
            id: Uuid::new_v4(),
            word_id: word.id,
            word: word.word.clone(),
            translation: word.translation.clone(),
            example_sentence: word.example_sentence.clone(),
            category: word.category.clone(),
            modified_at: Utc::now(),
            kind,
        });
        write_json(&self.history_file, &records)
    }

    /// History for a word, at most one entry per calendar day (the
    /// latest record of each day), newest day first.
    pub fn daily_history(&self, word_id: Uuid) -> Result<Vec<DailyHistoryEntry>> {
        let mut records: Vec<HistoryRecord> = self
            .list()?
            .into_iter()
            .filter(|r| r.word_id == word_id)
            .collect();
        records.sort_by(|a, b| a.modified_at.cmp(&b.modified_at));

        // Later records replace earlier ones from the same day
        let mut per_day: Vec<DailyHistoryEntry> = Vec::new();
        for record in records {
            let date = record.modified_at.date_naive();
            let entry = DailyHistoryEntry {
                word: record.word,
                translation: record.translation,
                example_sentence: record.example_sentence,
                category: record.category,
                modified_date: date,
                kind: record.kind,
            };
            match per_day.last_mut() {
                Some(last) if last.modified_date == date => *last = entry,
                _ => per_day.push(entry),
            }
        }

        per_day.reverse();
        Ok(per_day)
    }
}
