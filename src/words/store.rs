//! Word catalog storage.
//!
//! All words live in a single `words.json` array. Mutations load the
//! list, edit it in memory and rewrite the file. Uniqueness of
//! (word text, category) is enforced here; the shared-field rule (same
//! text in several categories shares translation, example sentence,
//! image and review counters) is applied on update.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::storage::{read_json_or_default, write_json, Result, StorageError};

use super::models::*;

/// Maximum number of rows returned by a search.
const SEARCH_LIMIT: usize = 100;

/// Category name spanning the whole catalog.
pub const ALL_CATEGORIES: &str = "All";

pub struct WordStore {
    words_file: PathBuf,
}

impl WordStore {
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self {
            words_file: data_dir.join("words.json"),
        })
    }

    /// Load the full word list
    pub fn list(&self) -> Result<Vec<Word>> {
        read_json_or_default(&self.words_file)
    }

    fn save(&self, words: &[Word]) -> Result<()> {
        write_json(&self.words_file, &words)
    }

    // ===== Browsing =====

    /// List all categories with their word counts, sorted by name
    pub fn categories(&self) -> Result<Vec<CategorySummary>> {
        let words = self.list()?;
        let mut summaries: Vec<CategorySummary> = Vec::new();

        for word in &words {
            match summaries.iter_mut().find(|s| s.name == word.category) {
                Some(summary) => summary.word_count += 1,
                None => summaries.push(CategorySummary {
                    name: word.category.clone(),
                    word_count: 1,
                }),
            }
        }

        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(summaries)
    }

    /// Get the word at `index` within `category` under the given sort
    /// order. The index is clamped into range; `Ok(None)` means the
    /// category holds no words at all.
    pub fn page(
        &self,
        category: &str,
        index: usize,
        sort: WordSort,
    ) -> Result<Option<PositionedWord>> {
        let mut words = self.in_category(category)?;
        if words.is_empty() {
            return Ok(None);
        }

        sort_words(&mut words, sort);
        let index = index.min(words.len() - 1);

        Ok(Some(PositionedWord {
            word: words[index].clone(),
            total_in_category: words.len(),
            current_index: index,
        }))
    }

    /// Index of a word within its own category under the given sort
    pub fn position(&self, id: Uuid, sort: WordSort) -> Result<PositionedWord> {
        let word = self.get(id)?;
        let mut words = self.in_category(&word.category)?;
        sort_words(&mut words, sort);

        let index = words
            .iter()
            .position(|w| w.id == id)
            .ok_or(StorageError::WordNotFound(id))?;

        Ok(PositionedWord {
            total_in_category: words.len(),
            current_index: index,
            word,
        })
    }

    fn in_category(&self, category: &str) -> Result<Vec<Word>> {
        let words = self.list()?;
        if category == ALL_CATEGORIES {
            return Ok(words);
        }
        Ok(words.into_iter().filter(|w| w.category == category).collect())
    }

    /// Substring search over word text and translation. Matches on the
    /// word text rank before translation-only matches.
    pub fn search(&self, query: &str) -> Result<Vec<Word>> {
        let needle = query.to_lowercase();
        let mut matches: Vec<Word> = self
            .list()?
            .into_iter()
            .filter(|w| {
                w.word.to_lowercase().contains(&needle)
                    || w.translation.to_lowercase().contains(&needle)
            })
            .collect();

        matches.sort_by(|a, b| {
            let a_in_word = a.word.to_lowercase().contains(&needle);
            let b_in_word = b.word.to_lowercase().contains(&needle);
            b_in_word
                .cmp(&a_in_word)
                .then_with(|| a.word.cmp(&b.word))
        });
        matches.truncate(SEARCH_LIMIT);
        Ok(matches)
    }

    // ===== CRUD =====

    pub fn get(&self, id: Uuid) -> Result<Word> {
        self.list()?
            .into_iter()
            .find(|w| w.id == id)
            .ok_or(StorageError::WordNotFound(id))
    }

    /// Categories (other than this row's) holding the same word text
    pub fn other_categories(&self, id: Uuid) -> Result<Vec<String>> {
        let word = self.get(id)?;
        Ok(self
            .list()?
            .into_iter()
            .filter(|w| w.word == word.word && w.id != id)
            .map(|w| w.category)
            .collect())
    }

    /// Create a new word. Rejects a text that already exists in ANY
    /// category, reporting where it lives.
    pub fn create(&self, request: CreateWordRequest) -> Result<Word> {
        let text = request.word.trim().to_string();
        let translation = request.translation.trim().to_string();
        let category = request.category.trim().to_string();

        if text.is_empty() {
            return Err(StorageError::InvalidOperation("Word is required".to_string()));
        }
        if translation.is_empty() {
            return Err(StorageError::InvalidOperation(
                "Translation is required".to_string(),
            ));
        }
        if category.is_empty() {
            return Err(StorageError::InvalidOperation(
                "Category is required".to_string(),
            ));
        }

        let mut words = self.list()?;
        if let Some(existing) = words.iter().find(|w| w.word == text) {
            return Err(StorageError::DuplicateWord {
                word: text,
                category: existing.category.clone(),
            });
        }

        let mut word = Word::new(text, translation, category);
        word.example_sentence = request
            .example_sentence
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        words.push(word.clone());
        self.save(&words)?;
        Ok(word)
    }

    /// Any row holding the given text (used for duplicate reporting)
    pub fn find_by_text(&self, text: &str) -> Result<Option<Word>> {
        Ok(self.list()?.into_iter().find(|w| w.word == text))
    }

    /// Apply a partial update. Translation, example sentence and image
    /// propagate to every row with the same text; the word text itself
    /// changes only on this row. A *changed* example sentence bumps the
    /// shared review count at most once per ledger day (`today`).
    pub fn update(&self, id: Uuid, updates: UpdateWordRequest, today: NaiveDate) -> Result<Word> {
        let mut words = self.list()?;
        let current = words
            .iter()
            .find(|w| w.id == id)
            .cloned()
            .ok_or(StorageError::WordNotFound(id))?;

        let now = Utc::now();
        let new_sample = updates
            .example_sentence
            .as_ref()
            .map(|s| s.trim().to_string());
        let sample_changed = match &new_sample {
            Some(s) => s.as_str() != current.example_sentence.as_deref().unwrap_or("").trim(),
            None => false,
        };
        let sample_bonus = sample_changed && current.last_sample_review_date != Some(today);

        for word in words.iter_mut().filter(|w| w.word == current.word) {
            if let Some(translation) = &updates.translation {
                word.translation = translation.clone();
            }
            if let Some(sample) = &new_sample {
                word.example_sentence = if sample.is_empty() {
                    None
                } else {
                    Some(sample.clone())
                };
            }
            if let Some(image) = &updates.image_file {
                let trimmed = image.trim();
                word.image_file = if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                };
            }
            if sample_bonus {
                word.review_count += 1;
                word.last_reviewed = Some(now);
                word.last_sample_review_date = Some(today);
            }
            word.updated_at = now;
        }

        if let Some(text) = &updates.word {
            let text = text.trim();
            if text.is_empty() {
                return Err(StorageError::InvalidOperation(
                    "Word cannot be empty".to_string(),
                ));
            }
            let word = words
                .iter_mut()
                .find(|w| w.id == id)
                .ok_or(StorageError::WordNotFound(id))?;
            word.word = text.to_string();
            word.updated_at = now;
        }

        self.save(&words)?;
        self.get(id)
    }

    /// Move a word to another category, rejecting the move when the text
    /// already exists there.
    pub fn move_category(&self, id: Uuid, new_category: &str) -> Result<Word> {
        let new_category = new_category.trim();
        if new_category.is_empty() {
            return Err(StorageError::InvalidOperation(
                "Category cannot be empty".to_string(),
            ));
        }

        let mut words = self.list()?;
        let text = words
            .iter()
            .find(|w| w.id == id)
            .map(|w| w.word.clone())
            .ok_or(StorageError::WordNotFound(id))?;

        if words
            .iter()
            .any(|w| w.word == text && w.category == new_category)
        {
            return Err(StorageError::DuplicateWord {
                word: text,
                category: new_category.to_string(),
            });
        }

        let word = words
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(StorageError::WordNotFound(id))?;
        word.category = new_category.to_string();
        word.updated_at = Utc::now();
        let updated = word.clone();

        self.save(&words)?;
        Ok(updated)
    }

    /// Delete a word. Without a scope, a text present in other
    /// categories yields `RequiresConfirmation` instead of deleting.
    pub fn delete(&self, id: Uuid, scope: Option<DeleteScope>) -> Result<DeleteOutcome> {
        let mut words = self.list()?;
        let current = words
            .iter()
            .find(|w| w.id == id)
            .cloned()
            .ok_or(StorageError::WordNotFound(id))?;

        let other_categories: Vec<String> = words
            .iter()
            .filter(|w| w.word == current.word && w.id != id)
            .map(|w| w.category.clone())
            .collect();

        if !other_categories.is_empty() && scope.is_none() {
            return Ok(DeleteOutcome::RequiresConfirmation {
                word: current.word,
                current_category: current.category,
                other_categories,
            });
        }

        let len_before = words.len();
        match scope {
            Some(DeleteScope::AllCategories) => words.retain(|w| w.word != current.word),
            _ => words.retain(|w| w.id != id),
        }
        let removed = len_before - words.len();

        self.save(&words)?;
        Ok(DeleteOutcome::Deleted {
            word: current.word,
            removed,
        })
    }

    // ===== Review & quiz support =====

    /// Increment the review counter and stamp the review timestamps
    pub fn record_review(&self, id: Uuid) -> Result<Word> {
        let mut words = self.list()?;
        let word = words
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(StorageError::WordNotFound(id))?;

        let now = Utc::now();
        word.review_count += 1;
        word.last_reviewed = Some(now);
        word.updated_at = now;
        let updated = word.clone();

        self.save(&words)?;
        Ok(updated)
    }

    /// Persist a quiz outcome: new scheduling state plus the legacy
    /// review-count debt metric.
    pub fn apply_quiz_result(&self, id: Uuid, srs: SrsState, review_count: i32) -> Result<Word> {
        let mut words = self.list()?;
        let word = words
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(StorageError::WordNotFound(id))?;

        let now = Utc::now();
        word.srs = srs;
        word.review_count = review_count;
        word.last_reviewed = Some(now);
        word.updated_at = now;
        let updated = word.clone();

        self.save(&words)?;
        Ok(updated)
    }

    /// Next word due for quizzing: `review_count >= 1`, due now or never
    /// scheduled, most overdue first, never-scheduled last, oldest edit
    /// as the tie breaker.
    pub fn next_quiz_word(
        &self,
        category: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Option<Word>> {
        let mut candidates: Vec<Word> = self
            .list()?
            .into_iter()
            .filter(|w| w.review_count >= 1)
            .filter(|w| match category {
                Some(c) if c != ALL_CATEGORIES => w.category == c,
                _ => true,
            })
            .filter(|w| match w.srs.next_review {
                Some(due) => due <= now,
                None => true,
            })
            .collect();

        candidates.sort_by(|a, b| match (a.srs.next_review, b.srs.next_review) {
            (Some(a_due), Some(b_due)) => {
                a_due.cmp(&b_due).then_with(|| a.updated_at.cmp(&b.updated_at))
            }
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.updated_at.cmp(&b.updated_at),
        });

        Ok(candidates.into_iter().next())
    }

    /// Insert a word during import, skipping (text, category) duplicates.
    /// Returns true when a row was added.
    pub fn import_word(
        &self,
        text: &str,
        translation: &str,
        category: &str,
    ) -> Result<bool> {
        let mut words = self.list()?;
        if words
            .iter()
            .any(|w| w.word == text && w.category == category)
        {
            return Ok(false);
        }

        let mut word = Word::new(
            text.to_string(),
            translation.to_string(),
            category.to_string(),
        );
        word.review_count = IMPORTED_WORD_REVIEW_COUNT;
        words.push(word);
        self.save(&words)?;
        Ok(true)
    }
}

/// Order words for browsing; the id is the final tie breaker so
/// paging is stable.
fn sort_words(words: &mut [Word], sort: WordSort) {
    match sort {
        WordSort::UpdatedDesc => words.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| b.id.cmp(&a.id))
        }),
        WordSort::UpdatedAsc => words.sort_by(|a, b| {
            a.updated_at
                .cmp(&b.updated_at)
                .then_with(|| a.id.cmp(&b.id))
        }),
        WordSort::ReviewCount => words.sort_by(|a, b| {
            b.review_count
                .cmp(&a.review_count)
                .then_with(|| b.updated_at.cmp(&a.updated_at))
                .then_with(|| b.id.cmp(&a.id))
        }),
    }
}
