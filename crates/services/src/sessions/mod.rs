mod runner;
mod service;
mod view;

// Public API of the session subsystem.
pub use crate::error::ExamServiceError;
pub use runner::{SessionHandle, TICK_PERIOD, spawn_runner};
pub use service::{ExamService, StartedSession};
pub use view::{QuestionView, SessionOutcome, SessionSnapshot};
