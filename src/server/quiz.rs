//! Quiz endpoints: session generation and grading, flashcard results,
//! next-word selection and statistics

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::quiz::{engine, srs, ClientQuestion, QuizOutcome, QuizSession, QuizStats};
use crate::words::ALL_CATEGORIES;

use super::{success, ApiError, ApiResult, AppState};

/// Default number of questions per generated session
const DEFAULT_SESSION_SIZE: usize = 10;

#[derive(Deserialize)]
pub struct GenerateRequest {
    category: Option<String>,
    limit: Option<usize>,
}

/// `POST /api/quiz/generate` — build a multiple-choice session from the
/// words most due for review. Clients receive the options without the
/// answer key.
pub async fn generate_quiz(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> ApiResult {
    let category = request.category.as_deref().unwrap_or(ALL_CATEGORIES);
    let limit = request.limit.unwrap_or(DEFAULT_SESSION_SIZE).max(1);

    let candidates = {
        let now = Utc::now();
        let all = state.words.lock().unwrap().list()?;
        let mut due: Vec<_> = all
            .into_iter()
            .filter(|w| w.review_count >= 1)
            .filter(|w| category == ALL_CATEGORIES || w.category == category)
            .filter(|w| w.srs.next_review.map_or(true, |d| d <= now))
            .collect();
        // Most overdue first, never-scheduled last, oldest edit breaks ties
        due.sort_by(|a, b| match (a.srs.next_review, b.srs.next_review) {
            (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.updated_at.cmp(&b.updated_at)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.updated_at.cmp(&b.updated_at),
        });
        due.truncate(limit);
        due
    };

    if candidates.is_empty() {
        return Err(ApiError::NotFound(
            "No words found for review in this category.".to_string(),
        ));
    }

    let questions = engine::generate_questions(&candidates);
    let client_questions: Vec<ClientQuestion> =
        questions.iter().map(|q| q.to_client()).collect();

    let session = QuizSession::new(questions);
    let session_id = session.id;
    state.sessions.lock().unwrap().insert(session);

    Ok(success(json!({
        "session_id": session_id,
        "questions": client_questions,
    })))
}

#[derive(Deserialize)]
pub struct NextWordQuery {
    category: Option<String>,
}

/// `GET /api/quiz/next-word`
pub async fn get_next_word(
    State(state): State<AppState>,
    Query(query): Query<NextWordQuery>,
) -> ApiResult {
    let word = state
        .words
        .lock()
        .unwrap()
        .next_quiz_word(query.category.as_deref(), Utc::now())?;

    match word {
        Some(word) => Ok(success(json!({ "word": word }))),
        None => Err(ApiError::NotFound(
            "No words found for review in this category.".to_string(),
        )),
    }
}

/// A quiz result: either a graded multiple-choice session or a single
/// flashcard self-assessment.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum ResultRequest {
    Session {
        session_id: Uuid,
        answers: Vec<Option<usize>>,
    },
    Flashcard {
        word_id: Uuid,
        result: QuizOutcome,
    },
}

/// `POST /api/quiz/result`
pub async fn submit_result(
    State(state): State<AppState>,
    Json(request): Json<ResultRequest>,
) -> ApiResult {
    match request {
        ResultRequest::Session {
            session_id,
            answers,
        } => grade_session(&state, session_id, &answers),
        ResultRequest::Flashcard { word_id, result } => apply_flashcard(&state, word_id, result),
    }
}

fn grade_session(state: &AppState, session_id: Uuid, answers: &[Option<usize>]) -> ApiResult {
    let session = state
        .sessions
        .lock()
        .unwrap()
        .take(session_id)
        .ok_or_else(|| ApiError::NotFound("Quiz session not found".to_string()))?;

    let score = engine::score(&session.questions, answers);

    // Correct answers count as remembered: schedule forward and record
    // daily activity through the guard
    let now = Utc::now();
    for result in score.results.iter().filter(|r| r.correct) {
        let outcome = {
            let words = state.words.lock().unwrap();
            match words.get(result.word_id) {
                Ok(word) => {
                    let update =
                        srs::apply_outcome(&word.srs, word.review_count, QuizOutcome::Remember, now);
                    words
                        .apply_quiz_result(result.word_id, update.srs, update.review_count)
                        .map(|_| ())
                }
                Err(e) => Err(e),
            }
        };
        match outcome {
            Ok(()) => state.record_activity(result.word_id),
            Err(e) => log::warn!(
                "Failed to apply quiz result for {}: {}",
                result.word_id,
                e
            ),
        }
    }

    Ok(success(json!({
        "correct_count": score.correct_count,
        "total": score.total,
        "results": score.results,
    })))
}

fn apply_flashcard(state: &AppState, word_id: Uuid, result: QuizOutcome) -> ApiResult {
    let now = Utc::now();
    let (old_count, updated) = {
        let words = state.words.lock().unwrap();
        let word = words.get(word_id)?;
        let update = srs::apply_outcome(&word.srs, word.review_count, result, now);
        let updated = words.apply_quiz_result(word_id, update.srs, update.review_count)?;
        (word.review_count, updated)
    };

    // Only a successful recall counts toward the daily quota
    if result == QuizOutcome::Remember {
        state.record_activity(word_id);
    }

    Ok(success(json!({
        "word_id": word_id,
        "old_count": old_count,
        "new_count": updated.review_count,
        "srs": {
            "interval": updated.srs.interval_days,
            "repetitions": updated.srs.repetitions,
            "next_review": updated.srs.next_review,
        },
    })))
}

/// `GET /api/quiz/stats`
pub async fn get_stats(State(state): State<AppState>) -> ApiResult {
    let now = Utc::now();
    let (quizzable, due_now) = {
        let words = state.words.lock().unwrap().list()?;
        let quizzable = words.iter().filter(|w| w.review_count >= 1).count();
        let due = words
            .iter()
            .filter(|w| w.review_count >= 1)
            .filter(|w| w.srs.next_review.map_or(true, |d| d <= now))
            .count();
        (quizzable, due)
    };

    let (reviews_today, streak_days) = {
        let ledger = state.ledger.lock().unwrap();
        (ledger.count_for(ledger.today())?, ledger.streak_days()?)
    };

    let stats = QuizStats {
        quizzable_words: quizzable,
        due_now,
        reviews_today,
        streak_days,
    };
    Ok(success(json!({ "stats": stats })))
}
