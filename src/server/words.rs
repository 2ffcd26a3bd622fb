//! Word catalog endpoints

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::words::{
    CreateWordRequest, DeleteOutcome, DeleteScope, ModificationKind, UpdateWordRequest, WordSort,
};

use super::{success, ApiError, ApiResult, AppState};

/// `GET /api/categories`
pub async fn get_categories(State(state): State<AppState>) -> ApiResult {
    let categories = state.words.lock().unwrap().categories()?;
    Ok(success(json!({ "categories": categories })))
}

#[derive(Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    index: usize,
    sort_by: Option<String>,
}

/// `GET /api/words/{key}` — word details when `key` is an id, indexed
/// category browsing otherwise.
pub async fn get_word_or_page(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<PageQuery>,
) -> ApiResult {
    if let Ok(id) = Uuid::parse_str(&key) {
        return get_word_details(&state, id);
    }

    let sort = WordSort::from_param(query.sort_by.as_deref());
    let page = state.words.lock().unwrap().page(&key, query.index, sort)?;
    match page {
        Some(word) => Ok(success(json!({ "word": word }))),
        None => Err(ApiError::NotFound("No words found".to_string())),
    }
}

fn get_word_details(state: &AppState, id: Uuid) -> ApiResult {
    let words = state.words.lock().unwrap();
    let word = words.get(id)?;
    let other_categories = words.other_categories(id)?;
    let is_unique = other_categories.is_empty();
    Ok(success(json!({
        "word": word,
        "other_categories": other_categories,
        "is_unique": is_unique,
    })))
}

/// `POST /api/words`
pub async fn create_word(
    State(state): State<AppState>,
    Json(request): Json<CreateWordRequest>,
) -> ApiResult {
    let word = {
        let words = state.words.lock().unwrap();
        match words.create(request) {
            Ok(word) => word,
            Err(crate::storage::StorageError::DuplicateWord { word, category }) => {
                // Report where the text already lives
                let existing_id = words.find_by_text(&word)?.map(|w| w.id);
                return Err(ApiError::Duplicate {
                    message: format!(
                        "Word \"{word}\" already exists in category \"{category}\""
                    ),
                    existing_id,
                    existing_category: Some(category),
                });
            }
            Err(e) => return Err(e.into()),
        }
    };

    if let Err(e) = state
        .history
        .lock()
        .unwrap()
        .record(&word, ModificationKind::Created)
    {
        log::warn!("Failed to record history for {}: {}", word.id, e);
    }
    state.record_activity(word.id);

    Ok(success(json!({
        "message": format!("Word \"{}\" added to category \"{}\"", word.word, word.category),
        "word_id": word.id,
    })))
}

/// `PUT /api/words/{id}`
pub async fn update_word(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(request): Json<UpdateWordRequest>,
) -> ApiResult {
    let id = parse_word_id(&key)?;
    let today = state.ledger.lock().unwrap().today();

    let word = state.words.lock().unwrap().update(id, request, today)?;

    if let Err(e) = state
        .history
        .lock()
        .unwrap()
        .record(&word, ModificationKind::Updated)
    {
        log::warn!("Failed to record history for {}: {}", id, e);
    }
    state.record_activity(id);

    Ok(success(json!({ "message": "Word updated successfully" })))
}

#[derive(Deserialize)]
pub struct MoveRequest {
    new_category: String,
}

/// `PUT /api/words/{id}/category`
pub async fn move_word(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(request): Json<MoveRequest>,
) -> ApiResult {
    let id = parse_word_id(&key)?;
    let word = state
        .words
        .lock()
        .unwrap()
        .move_category(id, &request.new_category)?;

    if let Err(e) = state
        .history
        .lock()
        .unwrap()
        .record(&word, ModificationKind::Moved)
    {
        log::warn!("Failed to record history for {}: {}", id, e);
    }

    Ok(success(json!({
        "message": format!("Word moved to category \"{}\"", word.category),
    })))
}

#[derive(Deserialize)]
pub struct DeleteQuery {
    scope: Option<String>,
}

/// `DELETE /api/words/{id}?scope=`
pub async fn delete_word(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> ApiResult {
    let id = parse_word_id(&key)?;
    let scope = match query.scope.as_deref() {
        Some(param) => Some(DeleteScope::from_param(param).ok_or_else(|| {
            ApiError::Validation(format!("Invalid scope: {param}"))
        })?),
        None => None,
    };

    let outcome = state.words.lock().unwrap().delete(id, scope)?;

    match outcome {
        DeleteOutcome::RequiresConfirmation {
            word,
            current_category,
            other_categories,
        } => {
            // Not an error: the caller must pick a scope and retry
            let plural = if other_categories.len() == 1 { "y" } else { "ies" };
            let message = format!(
                "Word \"{}\" also exists in {} other categor{}",
                word,
                other_categories.len(),
                plural
            );
            Ok(Json(json!({
                "success": false,
                "requires_confirmation": true,
                "word": word,
                "current_category": current_category,
                "other_categories": other_categories,
                "message": message,
            })))
        }
        DeleteOutcome::Deleted { word, removed } => {
            state.record_activity(id);
            Ok(success(json!({
                "message": format!("Word \"{}\" deleted ({} row(s))", word, removed),
            })))
        }
    }
}

/// `POST /api/words/{id}/review`
pub async fn review_word(State(state): State<AppState>, Path(key): Path<String>) -> ApiResult {
    let id = parse_word_id(&key)?;
    let word = state.words.lock().unwrap().record_review(id)?;

    if let Err(e) = state
        .history
        .lock()
        .unwrap()
        .record(&word, ModificationKind::Updated)
    {
        log::warn!("Failed to record history for {}: {}", id, e);
    }
    state.record_activity(id);

    Ok(success(json!({
        "review_count": word.review_count,
        "last_reviewed": word.last_reviewed,
    })))
}

#[derive(Deserialize)]
pub struct PositionQuery {
    sort_by: Option<String>,
}

/// `GET /api/words/{id}/position`
pub async fn get_word_position(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<PositionQuery>,
) -> ApiResult {
    let id = parse_word_id(&key)?;
    let sort = WordSort::from_param(query.sort_by.as_deref());
    let position = state.words.lock().unwrap().position(id, sort)?;

    Ok(success(json!({
        "index": position.current_index,
        "total_count": position.total_in_category,
        "category": position.word.category,
    })))
}

/// `GET /api/words/{id}/history`
pub async fn get_word_history(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult {
    let id = parse_word_id(&key)?;
    // 404 for unknown words, not an empty history
    state.words.lock().unwrap().get(id)?;
    let history = state.history.lock().unwrap().daily_history(id)?;

    Ok(success(json!({
        "word_id": id,
        "count": history.len(),
        "history": history,
    })))
}

#[derive(Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
}

/// `GET /api/words/search?q=`
pub async fn search_words(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult {
    let q = query.q.as_deref().unwrap_or("").trim().to_string();
    if q.is_empty() {
        return Err(ApiError::Validation("Search query is required".to_string()));
    }
    if q.chars().count() < 2 {
        return Err(ApiError::Validation(
            "Search query must be at least 2 characters".to_string(),
        ));
    }

    let results = state.words.lock().unwrap().search(&q)?;
    Ok(success(json!({
        "query": q,
        "count": results.len(),
        "results": results,
    })))
}

fn parse_word_id(key: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(key).map_err(|_| ApiError::Validation(format!("Invalid word id: {key}")))
}
