pub mod engine;
mod models;
pub mod srs;

use std::collections::HashMap;

use uuid::Uuid;

pub use models::*;

/// In-memory store of active quiz sessions. Sessions are consumed when
/// graded; an abandoned session simply lingers until the process exits
/// (single-user tool, nothing to reap).
#[derive(Default)]
pub struct SessionStore {
    sessions: HashMap<Uuid, QuizSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, session: QuizSession) {
        self.sessions.insert(session.id, session);
    }

    /// Remove and return a session for grading
    pub fn take(&mut self, id: Uuid) -> Option<QuizSession> {
        self.sessions.remove(&id)
    }
}
