mod session;

pub use session::{EditField, ReviewSession, SessionState};
