//! Data models for the quiz engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A generated multiple-choice question. The correct index stays on the
/// server; clients only ever see [`ClientQuestion`].
#[derive(Debug, Clone)]
pub struct QuizQuestion {
    pub word_id: Uuid,
    /// The translation shown as the prompt
    pub prompt: String,
    /// Shuffled answer options (correct text plus distractors)
    pub options: Vec<String>,
    pub correct_index: usize,
}

impl QuizQuestion {
    pub fn to_client(&self) -> ClientQuestion {
        ClientQuestion {
            word_id: self.word_id,
            prompt: self.prompt.clone(),
            options: self.options.clone(),
        }
    }
}

/// The client-facing view of a question: no answer key
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ClientQuestion {
    pub word_id: Uuid,
    pub prompt: String,
    pub options: Vec<String>,
}

/// Grading result for one question
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct QuestionResult {
    pub word_id: Uuid,
    /// The option the user picked; `None` = unanswered (counts as wrong)
    pub selected: Option<usize>,
    pub correct_index: usize,
    pub correct: bool,
}

/// Grading result for a whole session
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct QuizScore {
    pub correct_count: usize,
    pub total: usize,
    pub results: Vec<QuestionResult>,
}

/// An active quiz session held in memory until graded
#[derive(Debug, Clone)]
pub struct QuizSession {
    pub id: Uuid,
    pub questions: Vec<QuizQuestion>,
    pub created_at: DateTime<Utc>,
}

impl QuizSession {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        Self {
            id: Uuid::new_v4(),
            questions,
            created_at: Utc::now(),
        }
    }
}

/// Self-assessment outcome in flashcard mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizOutcome {
    Remember,
    NotRemember,
}

/// Aggregate quiz statistics
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct QuizStats {
    /// Words eligible for quizzing (review_count >= 1)
    pub quizzable_words: usize,
    /// Eligible words due right now
    pub due_now: usize,
    /// Distinct words recorded in today's ledger
    pub reviews_today: usize,
    /// Consecutive days with ledger activity
    pub streak_days: u32,
}
