//! Wordbook upload endpoint

use axum::extract::{Multipart, State};
use serde_json::json;

use crate::wordbook::{self, ImportError};

use super::{success, ApiError, ApiResult, AppState};

/// `POST /api/upload` — multipart upload of a wordbook XML file
pub async fn upload_wordbook(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult {
    let mut content: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Invalid upload: {e}")))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or_default().to_string();
            if filename.is_empty() {
                return Err(ApiError::Validation("No file selected".to_string()));
            }
            if !filename.to_lowercase().ends_with(".xml") {
                return Err(ApiError::Validation(
                    "Invalid file type. Only XML files are allowed.".to_string(),
                ));
            }
            let text = field
                .text()
                .await
                .map_err(|e| ApiError::Validation(format!("Failed to read upload: {e}")))?;
            content = Some(text);
        }
    }

    let content = content.ok_or_else(|| ApiError::Validation("No file provided".to_string()))?;

    let stats = {
        let words = state.words.lock().unwrap();
        wordbook::import_str(&words, &content).map_err(|e| match e {
            ImportError::Xml(_) | ImportError::InvalidRoot(_) | ImportError::NoItems => {
                ApiError::Validation(format!("XML parsing error: {e}"))
            }
            other => ApiError::Internal(other.to_string()),
        })?
    };

    let mut message = format!("Import completed: {} words added", stats.added);
    if stats.skipped_duplicates > 0 {
        message.push_str(&format!(
            ", {} duplicates skipped",
            stats.skipped_duplicates
        ));
    }
    if stats.errors > 0 {
        message.push_str(&format!(", {} errors encountered", stats.errors));
    }

    Ok(success(json!({ "stats": stats, "message": message })))
}
