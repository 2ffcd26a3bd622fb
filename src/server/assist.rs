//! AI generation endpoints (external collaborator)

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::assist::{AssistClient, TranslationMode};

use super::{success, ApiError, ApiResult, AppState};

#[derive(Deserialize)]
pub struct GenerateRequest {
    word: String,
    model: Option<String>,
    mode: Option<String>,
}

fn client(state: &AppState) -> Result<Arc<AssistClient>, ApiError> {
    state.assist.clone().ok_or_else(|| {
        ApiError::Unavailable(
            "Assist API key not configured. Set LEXIS_ASSIST_API_KEY or the assist.api_key \
             config entry."
                .to_string(),
        )
    })
}

/// `POST /api/generate-sample`
pub async fn generate_sample(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> ApiResult {
    let word = request.word.trim();
    if word.is_empty() {
        return Err(ApiError::Validation("Word cannot be empty".to_string()));
    }

    let sentence = client(&state)?
        .generate_sample(word, request.model.as_deref())
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(success(json!({ "sentence": sentence })))
}

/// `POST /api/generate-translation`
pub async fn generate_translation(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> ApiResult {
    let word = request.word.trim();
    if word.is_empty() {
        return Err(ApiError::Validation("Text cannot be empty".to_string()));
    }

    let mode = TranslationMode::from_param(request.mode.as_deref());
    let translation = client(&state)?
        .generate_translation(word, mode, request.model.as_deref())
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(success(json!({ "translation": translation })))
}
