//! View-model for the word review card.
//!
//! The active screen owns one explicit session value and every
//! transition goes through it; nothing about the current word, category
//! or index lives in ambient state. `Empty` and `Error` absorb
//! navigation and editing; only a filter change (or refresh) leaves
//! them, by returning to `Loading` at index 0.

use crate::words::WordSort;

/// Which field of the card is being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    WordText,
    Translation,
    ExampleSentence,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the word at the current index to load
    Loading,
    /// Showing the word at `index`
    Displaying { index: usize },
    /// Editing one field of the word at `index`
    Editing { index: usize, field: EditField },
    /// The active filter holds no words
    Empty,
    /// A load failed; the message is shown until the user re-triggers
    Error { message: String },
}

/// Review session for one category + sort filter
#[derive(Debug, Clone)]
pub struct ReviewSession {
    pub category: String,
    pub sort: WordSort,
    total: usize,
    state: SessionState,
}

impl ReviewSession {
    pub fn new(category: impl Into<String>, sort: WordSort) -> Self {
        Self {
            category: category.into(),
            sort,
            total: 0,
            state: SessionState::Loading,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Index the view should fetch next (valid in `Loading` after
    /// navigation, 0 after a filter change)
    pub fn current_index(&self) -> usize {
        match self.state {
            SessionState::Displaying { index } | SessionState::Editing { index, .. } => index,
            _ => 0,
        }
    }

    /// A load finished: `total` words exist in the active filter
    pub fn loaded(&mut self, total: usize, index: usize) {
        self.total = total;
        self.state = if total == 0 {
            SessionState::Empty
        } else {
            SessionState::Displaying {
                index: index.min(total - 1),
            }
        };
    }

    /// A load failed
    pub fn fail(&mut self, message: impl Into<String>) {
        if !matches!(self.state, SessionState::Empty) {
            self.state = SessionState::Error {
                message: message.into(),
            };
        }
    }

    pub fn next(&mut self) {
        if let SessionState::Displaying { index } = self.state {
            if index + 1 < self.total {
                self.state = SessionState::Displaying { index: index + 1 };
            }
        }
    }

    pub fn prev(&mut self) {
        if let SessionState::Displaying { index } = self.state {
            if index > 0 {
                self.state = SessionState::Displaying { index: index - 1 };
            }
        }
    }

    pub fn begin_edit(&mut self, field: EditField) {
        if let SessionState::Displaying { index } = self.state {
            self.state = SessionState::Editing { index, field };
        }
    }

    /// Leave editing, back to the same card (save and cancel both land
    /// here; persistence is the caller's concern)
    pub fn end_edit(&mut self) {
        if let SessionState::Editing { index, .. } = self.state {
            self.state = SessionState::Displaying { index };
        }
    }

    /// Switch category and/or sort: back to `Loading` at index 0
    pub fn change_filter(&mut self, category: impl Into<String>, sort: WordSort) {
        self.category = category.into();
        self.sort = sort;
        self.total = 0;
        self.state = SessionState::Loading;
    }

    /// Re-fetch the current index (after a mutation changed the list)
    pub fn refresh(&mut self) {
        self.state = SessionState::Loading;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn displaying(session: &ReviewSession) -> usize {
        match session.state() {
            SessionState::Displaying { index } => *index,
            other => panic!("expected Displaying, got {other:?}"),
        }
    }

    #[test]
    fn test_load_into_display_and_navigate() {
        let mut session = ReviewSession::new("Fruit", WordSort::UpdatedDesc);
        assert_eq!(*session.state(), SessionState::Loading);

        session.loaded(3, 0);
        assert_eq!(displaying(&session), 0);

        session.next();
        session.next();
        assert_eq!(displaying(&session), 2);
        // Clamped at the end
        session.next();
        assert_eq!(displaying(&session), 2);

        session.prev();
        assert_eq!(displaying(&session), 1);
    }

    #[test]
    fn test_empty_filter_is_absorbing() {
        let mut session = ReviewSession::new("Empty", WordSort::UpdatedDesc);
        session.loaded(0, 0);
        assert_eq!(*session.state(), SessionState::Empty);

        // Navigation and editing are ignored
        session.next();
        session.begin_edit(EditField::Translation);
        session.fail("late error");
        assert_eq!(*session.state(), SessionState::Empty);

        // Only a filter change leaves Empty
        session.change_filter("Fruit", WordSort::ReviewCount);
        assert_eq!(*session.state(), SessionState::Loading);
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn test_edit_toggles_back_to_displaying() {
        let mut session = ReviewSession::new("Fruit", WordSort::UpdatedDesc);
        session.loaded(2, 1);

        session.begin_edit(EditField::WordText);
        assert_eq!(
            *session.state(),
            SessionState::Editing {
                index: 1,
                field: EditField::WordText
            }
        );

        // Navigation is ignored while editing
        session.next();
        assert!(matches!(session.state(), SessionState::Editing { .. }));

        session.end_edit();
        assert_eq!(displaying(&session), 1);
    }

    #[test]
    fn test_category_change_resets_to_loading_index_zero() {
        let mut session = ReviewSession::new("Fruit", WordSort::UpdatedDesc);
        session.loaded(5, 0);
        session.next();
        session.next();

        session.change_filter("Math", WordSort::UpdatedAsc);
        assert_eq!(*session.state(), SessionState::Loading);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.category, "Math");
    }

    #[test]
    fn test_load_failure_reaches_error() {
        let mut session = ReviewSession::new("Fruit", WordSort::UpdatedDesc);
        session.fail("connection refused");
        assert!(matches!(session.state(), SessionState::Error { .. }));

        // Retry via refresh
        session.refresh();
        assert_eq!(*session.state(), SessionState::Loading);
    }

    #[test]
    fn test_loaded_clamps_stale_index() {
        let mut session = ReviewSession::new("Fruit", WordSort::UpdatedDesc);
        // A delete shrank the list; reloading index 4 of now-3 words
        session.loaded(3, 4);
        assert_eq!(displaying(&session), 2);
    }
}
