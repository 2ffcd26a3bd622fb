//! Data models for the word catalog

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Review count assigned to a word created through the editor.
pub const NEW_WORD_REVIEW_COUNT: i32 = 2;

/// Review count assigned to a word created by wordbook import.
pub const IMPORTED_WORD_REVIEW_COUNT: i32 = 1;

/// Spaced-repetition scheduling state carried by each word.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SrsState {
    /// Current interval in days
    #[serde(default)]
    pub interval_days: i32,
    /// Consecutive successful recalls
    #[serde(default)]
    pub repetitions: i32,
    /// SM-2 ease factor (default 2.5)
    #[serde(default = "default_ease_factor")]
    pub ease_factor: f32,
    /// When the word is next due; `None` means never quizzed
    pub next_review: Option<DateTime<Utc>>,
}

fn default_ease_factor() -> f32 {
    2.5
}

impl Default for SrsState {
    fn default() -> Self {
        Self {
            interval_days: 0,
            repetitions: 0,
            ease_factor: default_ease_factor(),
            next_review: None,
        }
    }
}

/// A vocabulary word. The same word text may live in several categories;
/// translation, example sentence, image and review counters are shared
/// across those rows, while the text itself is edited per row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Word {
    pub id: Uuid,
    pub word: String,
    pub translation: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_sentence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_file: Option<String>,
    #[serde(default)]
    pub review_count: i32,
    pub last_reviewed: Option<DateTime<Utc>>,
    /// Daily cap marker for example-sentence edit bonuses
    #[serde(default)]
    pub last_sample_review_date: Option<NaiveDate>,
    #[serde(default)]
    pub srs: SrsState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Word {
    pub fn new(word: String, translation: String, category: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            word,
            translation,
            category,
            example_sentence: None,
            image_file: None,
            review_count: NEW_WORD_REVIEW_COUNT,
            last_reviewed: None,
            last_sample_review_date: None,
            srs: SrsState::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Sort orders for category browsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WordSort {
    /// Latest edits first (the default)
    #[default]
    UpdatedDesc,
    /// Oldest edits first
    UpdatedAsc,
    /// Most reviewed first
    ReviewCount,
}

impl WordSort {
    /// Parse the `sort_by` query parameter; unknown values fall back
    /// to the default.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("updated_at_asc") => Self::UpdatedAsc,
            Some("review_count") => Self::ReviewCount,
            _ => Self::UpdatedDesc,
        }
    }
}

/// Request to create a new word
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateWordRequest {
    pub word: String,
    pub translation: String,
    pub category: String,
    #[serde(default)]
    pub example_sentence: Option<String>,
}

/// Partial update for a word. Absent fields are left untouched; an empty
/// `example_sentence` or `image_file` clears the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UpdateWordRequest {
    pub word: Option<String>,
    pub translation: Option<String>,
    pub example_sentence: Option<String>,
    pub image_file: Option<String>,
}

/// A category with its word count
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct CategorySummary {
    pub name: String,
    pub word_count: usize,
}

/// A word plus its browse position inside the active filter
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PositionedWord {
    #[serde(flatten)]
    pub word: Word,
    pub total_in_category: usize,
    pub current_index: usize,
}

/// Deletion scope for words present in several categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteScope {
    CurrentCategory,
    AllCategories,
}

impl DeleteScope {
    pub fn from_param(param: &str) -> Option<Self> {
        match param {
            "current_category" => Some(Self::CurrentCategory),
            "all_categories" => Some(Self::AllCategories),
            _ => None,
        }
    }
}

/// Outcome of a delete request
#[derive(Debug, Clone)]
pub enum DeleteOutcome {
    /// Rows were removed
    Deleted { word: String, removed: usize },
    /// The word exists elsewhere and no scope was given; the caller must
    /// confirm which scope to delete
    RequiresConfirmation {
        word: String,
        current_category: String,
        other_categories: Vec<String>,
    },
}
