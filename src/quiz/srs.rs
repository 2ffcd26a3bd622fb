//! Simplified SM-2 scheduling for flashcard-mode quiz results.
//!
//! A remembered word graduates through intervals of 1 day, 6 days, then
//! `interval * ease_factor`. A forgotten word resets to an immediate
//! re-queue and loses a little ease. Alongside the schedule, the legacy
//! review-count debt metric moves in the opposite direction of mastery:
//! remembering decrements it toward zero, forgetting increments it.

use chrono::{DateTime, Duration, Utc};

use crate::words::SrsState;

use super::models::QuizOutcome;

/// Minimum ease factor allowed
const MIN_EASE_FACTOR: f32 = 1.3;

/// Ease lost on a failed recall
const EASE_PENALTY: f32 = 0.15;

/// Outcome of applying a quiz result to a word's schedule
#[derive(Debug, Clone)]
pub struct ScheduleUpdate {
    pub srs: SrsState,
    pub review_count: i32,
}

/// Apply a flashcard outcome to the current schedule.
pub fn apply_outcome(
    state: &SrsState,
    review_count: i32,
    outcome: QuizOutcome,
    now: DateTime<Utc>,
) -> ScheduleUpdate {
    let mut interval = state.interval_days;
    let mut repetitions = state.repetitions;
    let mut ease_factor = state.ease_factor;
    let new_count;

    match outcome {
        QuizOutcome::Remember => {
            interval = match repetitions {
                0 => 1,
                1 => 6,
                _ => (interval as f32 * ease_factor).round() as i32,
            };
            repetitions += 1;
            new_count = (review_count - 1).max(0);
        }
        QuizOutcome::NotRemember => {
            repetitions = 0;
            interval = 0;
            ease_factor = (ease_factor - EASE_PENALTY).max(MIN_EASE_FACTOR);
            new_count = review_count + 1;
        }
    }

    // Interval 0 re-queues immediately
    let next_review = if interval == 0 {
        now
    } else {
        now + Duration::days(i64::from(interval))
    };

    ScheduleUpdate {
        srs: SrsState {
            interval_days: interval,
            repetitions,
            ease_factor,
            next_review: Some(next_review),
        },
        review_count: new_count,
    }
}
