use exam_core::model::Question;
use exam_core::scoring::{QuestionReview, ResultStats};
use exam_core::session::{ExamSession, SessionStatus, Submission};

/// Presentation-agnostic picture of a session at one instant.
///
/// Published by the runner after every command and tick. No pre-formatted
/// strings; the presenter decides how to render the clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    /// `None` before the session starts.
    pub remaining_secs: Option<u32>,
    pub timer_active: bool,
    pub total: usize,
    pub answered: usize,
    pub unanswered: usize,
    /// Only set while confirming a submission.
    pub estimated_score: Option<i32>,
}

impl SessionSnapshot {
    #[must_use]
    pub fn of(session: &ExamSession) -> Self {
        Self {
            status: session.status(),
            remaining_secs: session.remaining_secs(),
            timer_active: session.timer_active(),
            total: session.questions().len(),
            answered: session.answered_count(),
            unanswered: session.unanswered_count(),
            estimated_score: session.estimated_score(),
        }
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.status == SessionStatus::Submitted
    }
}

/// One question as the learner sees it: position, content and current pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    /// 1-based position in the session.
    pub index: usize,
    pub total: usize,
    pub question: Question,
    pub selected: Option<String>,
}

impl QuestionView {
    #[must_use]
    pub fn of(session: &ExamSession, index: usize) -> Option<Self> {
        let question = session.question(index)?.clone();
        let selected = session
            .answers()
            .and_then(|answers| answers.get(question.id()))
            .map(str::to_owned);
        Some(Self {
            index,
            total: session.questions().len(),
            question,
            selected,
        })
    }
}

/// Everything the results screen needs once a session is submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome {
    pub submission: Submission,
    pub stats: ResultStats,
    pub review: Vec<QuestionReview>,
}

impl SessionOutcome {
    /// `None` until the session has been submitted.
    #[must_use]
    pub fn of(session: &ExamSession) -> Option<Self> {
        Some(Self {
            submission: *session.submission()?,
            stats: session.result()?,
            review: session.review()?,
        })
    }
}
