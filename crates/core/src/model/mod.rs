mod answers;
mod bank;
mod config;
mod countdown;
mod ids;
mod question;

pub use answers::{AnswerChange, AnswerMap};
pub use bank::QuestionBank;
pub use config::{QuestionCount, SessionConfig, SessionDraft, SetupError};
pub use countdown::{Countdown, Tick, format_clock};
pub use ids::{ParseIdError, QuestionId};
pub use question::{MIN_OPTIONS, Question, QuestionDraft, QuestionError};
