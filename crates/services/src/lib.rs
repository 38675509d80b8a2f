#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;

pub use exam_core::Clock;

pub use error::ExamServiceError;
pub use sessions::{
    ExamService, QuestionView, SessionHandle, SessionOutcome, SessionSnapshot, StartedSession,
    spawn_runner,
};
