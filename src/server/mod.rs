//! Embedded HTTP server exposing the vocabulary API.
//!
//! All responses share the `{"success": bool, ...}` envelope the
//! frontend reads. Failures map to: validation 400,
//! not-found 404 (an exhausted filter is an empty state, not an error),
//! duplicate 409 with a `duplicate` flag, assist-unconfigured 503,
//! anything else 500. Nothing here is fatal to the process.

mod assist;
mod import;
mod progress;
mod quiz;
mod words;

use std::sync::{Arc, Mutex};

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use crate::assist::AssistClient;
use crate::config::Config;
use crate::ledger::ActivityLedger;
use crate::quiz::SessionStore;
use crate::storage::StorageError;
use crate::words::{HistoryStore, WordStore};

/// Shared state behind every handler
#[derive(Clone)]
pub struct AppState {
    pub words: Arc<Mutex<WordStore>>,
    pub history: Arc<Mutex<HistoryStore>>,
    pub ledger: Arc<Mutex<ActivityLedger>>,
    pub sessions: Arc<Mutex<SessionStore>>,
    pub assist: Option<Arc<AssistClient>>,
    pub daily_quota: u32,
}

impl AppState {
    pub fn new(config: &Config, data_dir: std::path::PathBuf) -> crate::storage::Result<Self> {
        Ok(Self {
            words: Arc::new(Mutex::new(WordStore::new(data_dir.clone())?)),
            history: Arc::new(Mutex::new(HistoryStore::new(data_dir.clone())?)),
            ledger: Arc::new(Mutex::new(ActivityLedger::new(
                data_dir,
                config.utc_offset_hours,
            )?)),
            sessions: Arc::new(Mutex::new(SessionStore::new())),
            assist: AssistClient::from_config(&config.assist).map(Arc::new),
            daily_quota: config.daily_quota,
        })
    }

    /// Record ledger activity for a word. Persistence failures are
    /// logged and swallowed: the triggering operation must complete.
    fn record_activity(&self, word_id: Uuid) {
        let ledger = self.ledger.lock().unwrap();
        let today = ledger.today();
        if let Err(e) = ledger.record_activity(word_id, today) {
            log::warn!("Failed to record daily activity for {}: {}", word_id, e);
        }
    }
}

/// API error taxonomy, rendered into the JSON envelope
#[derive(Debug)]
pub enum ApiError {
    /// Bad or missing input (400)
    Validation(String),
    /// Missing word / empty filter (404)
    NotFound(String),
    /// Duplicate (word, category) conflict (409)
    Duplicate {
        message: String,
        existing_id: Option<Uuid>,
        existing_category: Option<String>,
    },
    /// Assist collaborator not configured (503)
    Unavailable(String),
    /// Anything else (500)
    Internal(String),
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::WordNotFound(_) => Self::NotFound("Word not found".to_string()),
            StorageError::DuplicateWord { .. } => Self::Duplicate {
                message: err.to_string(),
                existing_id: None,
                existing_category: None,
            },
            StorageError::InvalidOperation(message) => Self::Validation(message),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Validation(error) => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "error": error }),
            ),
            Self::NotFound(error) => (
                StatusCode::NOT_FOUND,
                json!({ "success": false, "error": error }),
            ),
            Self::Duplicate {
                message,
                existing_id,
                existing_category,
            } => {
                let mut body = json!({
                    "success": false,
                    "error": message,
                    "duplicate": true,
                });
                if let Some(id) = existing_id {
                    body["existing_word_id"] = json!(id);
                }
                if let Some(category) = existing_category {
                    body["existing_category"] = json!(category);
                }
                (StatusCode::CONFLICT, body)
            }
            Self::Unavailable(error) => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "success": false, "error": error }),
            ),
            Self::Internal(error) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "success": false, "error": error }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult = std::result::Result<Json<Value>, ApiError>;

/// Wrap handler output in the success envelope.
fn success(mut body: Value) -> Json<Value> {
    if let Some(obj) = body.as_object_mut() {
        obj.insert("success".to_string(), json!(true));
    }
    Json(body)
}

/// Build the full API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/categories", get(words::get_categories))
        .route("/api/words", post(words::create_word))
        .route("/api/words/search", get(words::search_words))
        // `{key}` carries either a word id (details) or a category name
        // (indexed browsing)
        .route(
            "/api/words/{key}",
            get(words::get_word_or_page)
                .put(words::update_word)
                .delete(words::delete_word),
        )
        .route("/api/words/{key}/category", put(words::move_word))
        .route("/api/words/{key}/review", post(words::review_word))
        .route("/api/words/{key}/position", get(words::get_word_position))
        .route("/api/words/{key}/history", get(words::get_word_history))
        .route("/api/debt", get(progress::get_debt))
        .route("/api/daily-count", get(progress::get_daily_count))
        .route("/api/quiz/generate", post(quiz::generate_quiz))
        .route("/api/quiz/next-word", get(quiz::get_next_word))
        .route("/api/quiz/result", post(quiz::submit_result))
        .route("/api/quiz/stats", get(quiz::get_stats))
        .route("/api/upload", post(import::upload_wordbook))
        .route("/api/generate-sample", post(assist::generate_sample))
        .route("/api/generate-translation", post(assist::generate_translation))
        // Wordbook uploads can be large
        .layer(DefaultBodyLimit::max(16 * 1024 * 1024))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(state: AppState, port: u16) -> std::io::Result<()> {
    let app = router(state);
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    log::info!("Vocabulary API listening on http://localhost:{}", port);
    axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_app(dir: &std::path::Path) -> (AppState, Router) {
        let state = AppState::new(&Config::default(), dir.to_path_buf()).unwrap();
        let app = router(state.clone());
        (state, app)
    }

    async fn send(
        app: Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn word_body(word: &str, category: &str) -> Value {
        json!({
            "word": word,
            "translation": format!("{} translation", word),
            "category": category,
        })
    }

    #[tokio::test]
    async fn test_create_then_duplicate_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let (_state, app) = test_app(dir.path());

        let (status, body) =
            send(app.clone(), "POST", "/api/words", Some(word_body("apple", "Fruit"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));

        // Same text in a different category is still a conflict
        let (status, body) =
            send(app.clone(), "POST", "/api/words", Some(word_body("apple", "Daily"))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["duplicate"], json!(true));
        assert_eq!(body["existing_category"], json!("Fruit"));

        // And no second row appeared
        let (_, body) = send(app, "GET", "/api/categories", None).await;
        assert_eq!(
            body["categories"],
            json!([{ "name": "Fruit", "word_count": 1 }])
        );
    }

    #[tokio::test]
    async fn test_review_increments_and_daily_count_dedups() {
        let dir = tempfile::tempdir().unwrap();
        let (_state, app) = test_app(dir.path());

        let (_, body) =
            send(app.clone(), "POST", "/api/words", Some(word_body("apple", "Fruit"))).await;
        let id = body["word_id"].as_str().unwrap().to_string();

        let (status, body) =
            send(app.clone(), "POST", &format!("/api/words/{id}/review"), None).await;
        assert_eq!(status, StatusCode::OK);
        // New words start at 2; one review click makes 3
        assert_eq!(body["review_count"], json!(3));

        // Create + review of the same word count once toward the quota
        let (_, body) = send(app, "GET", "/api/daily-count", None).await;
        assert_eq!(body["count"], json!(1));
    }

    #[tokio::test]
    async fn test_debt_endpoint_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let (_state, app) = test_app(dir.path());

        let (status, body) = send(app, "GET", "/api/debt", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_debt"], json!(0));
        assert_eq!(body["breakdown"], json!([]));
    }

    #[tokio::test]
    async fn test_search_validation_and_results() {
        let dir = tempfile::tempdir().unwrap();
        let (_state, app) = test_app(dir.path());

        let (status, _) = send(app.clone(), "GET", "/api/words/search?q=a", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(app.clone(), "GET", "/api/words/search", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        send(app.clone(), "POST", "/api/words", Some(word_body("apple", "Fruit"))).await;
        let (status, body) = send(app, "GET", "/api/words/search?q=app", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], json!(1));
    }

    #[tokio::test]
    async fn test_browse_category_and_empty_filter() {
        let dir = tempfile::tempdir().unwrap();
        let (_state, app) = test_app(dir.path());

        // An empty filter is a 404, rendered as an empty state client-side
        let (status, _) = send(app.clone(), "GET", "/api/words/Nothing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        send(app.clone(), "POST", "/api/words", Some(word_body("apple", "Fruit"))).await;
        send(app.clone(), "POST", "/api/words", Some(word_body("pear", "Fruit"))).await;

        let (status, body) =
            send(app.clone(), "GET", "/api/words/Fruit?index=1&sort_by=updated_at", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["word"]["total_in_category"], json!(2));
        assert_eq!(body["word"]["current_index"], json!(1));
        assert_eq!(body["word"]["word"], json!("apple"));

        // Word-id lookups share the route
        let id = body["word"]["id"].as_str().unwrap().to_string();
        let (status, body) = send(app, "GET", &format!("/api/words/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_unique"], json!(true));
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation_then_scoped_delete() {
        let dir = tempfile::tempdir().unwrap();
        let (state, app) = test_app(dir.path());

        let (_, body) =
            send(app.clone(), "POST", "/api/words", Some(word_body("apple", "Fruit"))).await;
        let id = body["word_id"].as_str().unwrap().to_string();
        // Second category via import (bypasses the global duplicate check)
        state
            .words
            .lock()
            .unwrap()
            .import_word("apple", "apple translation", "Daily")
            .unwrap();

        let (status, body) = send(app.clone(), "DELETE", &format!("/api/words/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["requires_confirmation"], json!(true));
        assert_eq!(body["other_categories"], json!(["Daily"]));

        let (status, body) = send(
            app,
            "DELETE",
            &format!("/api/words/{id}?scope=all_categories"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
    }

    #[tokio::test]
    async fn test_quiz_generate_hides_answers_and_grades_server_side() {
        let dir = tempfile::tempdir().unwrap();
        let (_state, app) = test_app(dir.path());

        for word in ["alpha", "beta", "gamma"] {
            send(app.clone(), "POST", "/api/words", Some(word_body(word, "Quiz"))).await;
        }

        let (status, body) =
            send(app.clone(), "POST", "/api/quiz/generate", Some(json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        let questions = body["questions"].as_array().unwrap();
        assert_eq!(questions.len(), 3);
        // The answer key never leaves the server
        assert!(questions[0].get("correct_index").is_none());

        let session_id = body["session_id"].as_str().unwrap().to_string();
        let (status, body) = send(
            app.clone(),
            "POST",
            "/api/quiz/result",
            Some(json!({ "session_id": session_id, "answers": [null, null, null] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["correct_count"], json!(0));
        assert_eq!(body["total"], json!(3));

        // Sessions are consumed on grading
        let (status, _) = send(
            app,
            "POST",
            "/api/quiz/result",
            Some(json!({ "session_id": session_id, "answers": [] })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_flashcard_result_updates_schedule() {
        let dir = tempfile::tempdir().unwrap();
        let (_state, app) = test_app(dir.path());

        let (_, body) =
            send(app.clone(), "POST", "/api/words", Some(word_body("apple", "Quiz"))).await;
        let id = body["word_id"].as_str().unwrap().to_string();

        let (status, body) = send(
            app.clone(),
            "POST",
            "/api/quiz/result",
            Some(json!({ "word_id": id, "result": "remember" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["old_count"], json!(2));
        assert_eq!(body["new_count"], json!(1));
        assert_eq!(body["srs"]["interval"], json!(1));

        let (_, body) = send(
            app,
            "POST",
            "/api/quiz/result",
            Some(json!({ "word_id": id, "result": "not_remember" })),
        )
        .await;
        assert_eq!(body["new_count"], json!(2));
        assert_eq!(body["srs"]["interval"], json!(0));
    }

    #[tokio::test]
    async fn test_upload_wordbook_multipart() {
        let dir = tempfile::tempdir().unwrap();
        let (_state, app) = test_app(dir.path());

        let xml = "<wordbook>\
            <item><word>apple</word><trans><![CDATA[a fruit]]></trans><tags>Fruit</tags></item>\
            <item><word>pear</word><trans><![CDATA[another fruit]]></trans><tags>Fruit</tags></item>\
            <item><trans><![CDATA[no word]]></trans><tags>Fruit</tags></item>\
        </wordbook>";
        let boundary = "lexis-test-boundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"words.xml\"\r\n\
             Content-Type: text/xml\r\n\r\n\
             {xml}\r\n\
             --{boundary}--\r\n"
        );

        let request = Request::builder()
            .method("POST")
            .uri("/api/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["stats"]["added"], json!(2));
        assert_eq!(value["stats"]["total_processed"], json!(2));
        assert_eq!(value["stats"]["errors"], json!(1));

        let (_, body) = send(app, "GET", "/api/categories", None).await;
        assert_eq!(body["categories"][0]["word_count"], json!(2));
    }

    #[tokio::test]
    async fn test_assist_unconfigured_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let (_state, app) = test_app(dir.path());

        let (status, body) = send(
            app,
            "POST",
            "/api/generate-sample",
            Some(json!({ "word": "apple" })),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["success"], json!(false));
    }
}
