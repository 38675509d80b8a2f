use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::distributor::{EligiblePool, distribute};
use crate::model::{
    AnswerChange, AnswerMap, Countdown, Question, QuestionBank, QuestionId, SessionConfig,
    SessionDraft, SetupError, Tick,
};
use crate::overview::SessionOverview;
use crate::scoring::{QuestionReview, ResultStats, estimated_score, review};
use crate::time::elapsed_secs;

//
// ─── STATUS & EVENTS ───────────────────────────────────────────────────────────
//

/// Coarse lifecycle position of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    Setup,
    InProgress,
    PendingConfirmation,
    Submitted,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionStatus::Setup => "setup",
            SessionStatus::InProgress => "in progress",
            SessionStatus::PendingConfirmation => "pending confirmation",
            SessionStatus::Submitted => "submitted",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitReason {
    /// The learner approved the confirmation step.
    Manual,
    /// The countdown reached zero.
    TimeExpired,
}

/// Everything that can happen to a running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Toggle `option` on a question.
    Select {
        question_id: QuestionId,
        option: String,
    },
    /// One second of the countdown elapsed.
    Tick,
    /// Ask to submit; opens the confirmation step.
    RequestSubmit,
    /// Close the confirmation step and keep going.
    CancelSubmit,
    /// Confirm submission.
    ApproveSubmit,
}

/// What `ExamSession::dispatch` did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Answered(AnswerChange),
    Ticked { remaining_secs: u32 },
    Confirming { estimated_score: i32 },
    Resumed,
    Submitted(SubmitReason),
    /// The event is not legal in the current state. Nothing changed.
    Ignored,
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// How and when a session ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Submission {
    pub reason: SubmitReason,
    pub submitted_at: DateTime<Utc>,
    pub remaining_secs: u32,
    /// Wall-clock time from start to submit.
    pub duration_secs: f64,
}

/// Counts reported when a session starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartSummary {
    pub requested: usize,
    pub selected: usize,
    pub per_subject: Vec<usize>,
    pub backfilled: usize,
}

impl StartSummary {
    #[must_use]
    pub fn is_underfilled(&self) -> bool {
        self.selected < self.requested
    }
}

#[derive(Debug, Clone)]
struct ActiveExam {
    config: SessionConfig,
    questions: Vec<Question>,
    answers: AnswerMap,
    countdown: Countdown,
    started_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct SubmittedExam {
    config: SessionConfig,
    questions: Vec<Question>,
    answers: AnswerMap,
    started_at: DateTime<Utc>,
    submission: Submission,
}

impl ActiveExam {
    fn submit(mut self, reason: SubmitReason, now: DateTime<Utc>) -> SubmittedExam {
        self.countdown.cancel();
        let submission = Submission {
            reason,
            submitted_at: now,
            remaining_secs: self.countdown.remaining_secs(),
            duration_secs: elapsed_secs(self.started_at, now),
        };
        SubmittedExam {
            config: self.config,
            questions: self.questions,
            answers: self.answers,
            started_at: self.started_at,
            submission,
        }
    }

    fn select(&mut self, question_id: QuestionId, option: String) -> Dispatch {
        let Some(question) = self.questions.iter().find(|q| q.id() == question_id) else {
            return Dispatch::Ignored;
        };
        if !question.has_option(&option) {
            return Dispatch::Ignored;
        }
        let change = self.answers.toggle(question_id, option);
        tracing::debug!(%question_id, ?change, "answer toggled");
        Dispatch::Answered(change)
    }
}

/// Each variant owns exactly the data valid in that state, so a submitted
/// session carries no countdown and a session in setup carries no answers.
#[derive(Debug, Clone)]
enum SessionState {
    Setup(SessionDraft),
    InProgress(ActiveExam),
    PendingConfirmation {
        exam: ActiveExam,
        estimated_score: i32,
    },
    Submitted(SubmittedExam),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One timed exam attempt, from setup through submission.
///
/// All mutation goes through `start` and `dispatch`; the caller provides the
/// current instant so time stays deterministic in tests.
#[derive(Debug, Clone)]
pub struct ExamSession {
    state: SessionState,
}

impl ExamSession {
    #[must_use]
    pub fn new(draft: SessionDraft) -> Self {
        Self {
            state: SessionState::Setup(draft),
        }
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        match &self.state {
            SessionState::Setup(_) => SessionStatus::Setup,
            SessionState::InProgress(_) => SessionStatus::InProgress,
            SessionState::PendingConfirmation { .. } => SessionStatus::PendingConfirmation,
            SessionState::Submitted(_) => SessionStatus::Submitted,
        }
    }

    /// Setup form, editable until the session starts.
    pub fn draft_mut(&mut self) -> Option<&mut SessionDraft> {
        match &mut self.state {
            SessionState::Setup(draft) => Some(draft),
            _ => None,
        }
    }

    /// Validate the setup, pick questions and start the countdown.
    ///
    /// An eligible pool smaller than the question count is not an error: the
    /// session starts with what is available, possibly nothing.
    ///
    /// # Errors
    ///
    /// Returns `SetupError` when the question count is missing or unsupported
    /// (the session stays in setup), or `SetupError::AlreadyStarted`.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        bank: &QuestionBank,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<StartSummary, SetupError> {
        let SessionState::Setup(draft) = &self.state else {
            return Err(SetupError::AlreadyStarted);
        };
        let config = draft.validate()?;

        let pool = EligiblePool::filter(bank, &config);
        let distribution = distribute(&pool, config.question_count().as_usize(), rng);
        let summary = StartSummary {
            requested: distribution.requested,
            selected: distribution.questions.len(),
            per_subject: distribution.per_subject,
            backfilled: distribution.backfilled,
        };

        tracing::info!(
            requested = summary.requested,
            selected = summary.selected,
            eligible = pool.len(),
            underfilled = summary.is_underfilled(),
            "exam session started"
        );

        self.state = SessionState::InProgress(ActiveExam {
            countdown: Countdown::start(config.question_count()),
            config,
            questions: distribution.questions,
            answers: AnswerMap::new(),
            started_at: now,
        });
        Ok(summary)
    }

    /// Apply an event. Illegal events return `Dispatch::Ignored`.
    pub fn dispatch(&mut self, event: SessionEvent, now: DateTime<Utc>) -> Dispatch {
        let from = self.status();
        let outcome = match event {
            SessionEvent::Select {
                question_id,
                option,
            } => self.select(question_id, option),
            SessionEvent::Tick => self.tick(now),
            SessionEvent::RequestSubmit => self.request_submit(),
            SessionEvent::CancelSubmit => self.cancel_submit(),
            SessionEvent::ApproveSubmit => self.approve_submit(now),
        };

        let to = self.status();
        if from != to {
            tracing::debug!(%from, %to, "session transition");
        }
        outcome
    }

    fn select(&mut self, question_id: QuestionId, option: String) -> Dispatch {
        match &mut self.state {
            SessionState::InProgress(exam) | SessionState::PendingConfirmation { exam, .. } => {
                exam.select(question_id, option)
            }
            _ => Dispatch::Ignored,
        }
    }

    fn tick(&mut self, now: DateTime<Utc>) -> Dispatch {
        let tick = match &mut self.state {
            SessionState::InProgress(exam) | SessionState::PendingConfirmation { exam, .. } => {
                exam.countdown.tick()
            }
            _ => return Dispatch::Ignored,
        };

        match tick {
            Tick::Running(remaining_secs) => Dispatch::Ticked { remaining_secs },
            Tick::Expired => self.submit(SubmitReason::TimeExpired, now),
            Tick::Stopped => Dispatch::Ignored,
        }
    }

    fn request_submit(&mut self) -> Dispatch {
        let state = self.take_state();
        let (state, outcome) = match state {
            SessionState::InProgress(exam) => {
                let estimated_score = estimated_score(exam.answers.answered_count());
                (
                    SessionState::PendingConfirmation {
                        exam,
                        estimated_score,
                    },
                    Dispatch::Confirming { estimated_score },
                )
            }
            other => (other, Dispatch::Ignored),
        };
        self.state = state;
        outcome
    }

    fn cancel_submit(&mut self) -> Dispatch {
        let state = self.take_state();
        let (state, outcome) = match state {
            SessionState::PendingConfirmation { exam, .. } => {
                (SessionState::InProgress(exam), Dispatch::Resumed)
            }
            other => (other, Dispatch::Ignored),
        };
        self.state = state;
        outcome
    }

    fn approve_submit(&mut self, now: DateTime<Utc>) -> Dispatch {
        if self.status() == SessionStatus::PendingConfirmation {
            self.submit(SubmitReason::Manual, now)
        } else {
            Dispatch::Ignored
        }
    }

    fn submit(&mut self, reason: SubmitReason, now: DateTime<Utc>) -> Dispatch {
        let state = self.take_state();
        let (state, outcome) = match state {
            SessionState::InProgress(exam) | SessionState::PendingConfirmation { exam, .. } => {
                let submitted = exam.submit(reason, now);
                tracing::info!(
                    ?reason,
                    answered = submitted.answers.answered_count(),
                    questions = submitted.questions.len(),
                    duration_secs = submitted.submission.duration_secs,
                    "exam session submitted"
                );
                (SessionState::Submitted(submitted), Dispatch::Submitted(reason))
            }
            other => (other, Dispatch::Ignored),
        };
        self.state = state;
        outcome
    }

    fn take_state(&mut self) -> SessionState {
        std::mem::replace(&mut self.state, SessionState::Setup(SessionDraft::default()))
    }

    //
    // ─── READS ─────────────────────────────────────────────────────────────────
    //

    fn parts(&self) -> Option<(&SessionConfig, &[Question], &AnswerMap)> {
        match &self.state {
            SessionState::Setup(_) => None,
            SessionState::InProgress(exam) | SessionState::PendingConfirmation { exam, .. } => {
                Some((&exam.config, exam.questions.as_slice(), &exam.answers))
            }
            SessionState::Submitted(done) => {
                Some((&done.config, done.questions.as_slice(), &done.answers))
            }
        }
    }

    #[must_use]
    pub fn config(&self) -> Option<&SessionConfig> {
        self.parts().map(|(config, _, _)| config)
    }

    /// The session's questions in navigation order; empty during setup.
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        self.parts()
            .map(|(_, questions, _)| questions)
            .unwrap_or_default()
    }

    /// Question at a 1-based session index.
    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        index.checked_sub(1).and_then(|i| self.questions().get(i))
    }

    #[must_use]
    pub fn answers(&self) -> Option<&AnswerMap> {
        self.parts().map(|(_, _, answers)| answers)
    }

    /// Started but without a single question to answer.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status() != SessionStatus::Setup && self.questions().is_empty()
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        match &self.state {
            SessionState::Setup(_) => None,
            SessionState::InProgress(exam) | SessionState::PendingConfirmation { exam, .. } => {
                Some(exam.started_at)
            }
            SessionState::Submitted(done) => Some(done.started_at),
        }
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers().map_or(0, AnswerMap::answered_count)
    }

    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.answers()
            .map_or(0, |answers| answers.unanswered_count(self.questions().len()))
    }

    /// Seconds left on the countdown; frozen after submission.
    #[must_use]
    pub fn remaining_secs(&self) -> Option<u32> {
        match &self.state {
            SessionState::Setup(_) => None,
            SessionState::InProgress(exam) | SessionState::PendingConfirmation { exam, .. } => {
                Some(exam.countdown.remaining_secs())
            }
            SessionState::Submitted(done) => Some(done.submission.remaining_secs),
        }
    }

    /// True while the countdown is running.
    #[must_use]
    pub fn timer_active(&self) -> bool {
        match &self.state {
            SessionState::InProgress(exam) | SessionState::PendingConfirmation { exam, .. } => {
                exam.countdown.is_active()
            }
            _ => false,
        }
    }

    /// Optimistic score shown while confirming.
    #[must_use]
    pub fn estimated_score(&self) -> Option<i32> {
        match &self.state {
            SessionState::PendingConfirmation {
                estimated_score, ..
            } => Some(*estimated_score),
            _ => None,
        }
    }

    #[must_use]
    pub fn overview(&self) -> Option<SessionOverview> {
        self.parts().map(|(config, questions, answers)| {
            SessionOverview::build(questions, answers, config.subjects())
        })
    }

    #[must_use]
    pub fn submission(&self) -> Option<&Submission> {
        match &self.state {
            SessionState::Submitted(done) => Some(&done.submission),
            _ => None,
        }
    }

    /// Final scores; only available once submitted.
    #[must_use]
    pub fn result(&self) -> Option<ResultStats> {
        match &self.state {
            SessionState::Submitted(done) => Some(ResultStats::compute(
                &done.questions,
                &done.answers,
                done.config.subjects(),
                done.submission.duration_secs,
            )),
            _ => None,
        }
    }

    /// Per-question review; only available once submitted.
    #[must_use]
    pub fn review(&self) -> Option<Vec<QuestionReview>> {
        match &self.state {
            SessionState::Submitted(done) => Some(review(&done.questions, &done.answers)),
            _ => None,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::question;
    use crate::time::{Clock, fixed_now};
    use chrono::Duration;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn bank(per_subject: u64) -> QuestionBank {
        let physics = (1..=per_subject).map(|id| question(id, "Physics", "ch1"));
        let chemistry = (1..=per_subject).map(|id| question(1_000 + id, "Chemistry", "ch1"));
        physics.chain(chemistry).collect()
    }

    fn draft(count: u32) -> SessionDraft {
        SessionDraft::new(["Physics", "Chemistry"])
            .with_question_count(count)
            .with_chapters(["ch1"])
    }

    fn started(count: u32, per_subject: u64) -> ExamSession {
        let mut session = ExamSession::new(draft(count));
        session
            .start(&bank(per_subject), &mut StdRng::seed_from_u64(1), fixed_now())
            .unwrap();
        session
    }

    fn select(id: QuestionId, option: &str) -> SessionEvent {
        SessionEvent::Select {
            question_id: id,
            option: option.into(),
        }
    }

    #[test]
    fn missing_question_count_keeps_session_in_setup() {
        let mut session = ExamSession::new(SessionDraft::new(["Physics"]));
        let err = session
            .start(&bank(5), &mut StdRng::seed_from_u64(1), fixed_now())
            .unwrap_err();

        assert_eq!(err, SetupError::MissingQuestionCount);
        assert_eq!(session.status(), SessionStatus::Setup);
        assert!(session.questions().is_empty());

        session.draft_mut().unwrap().question_count = Some(30);
        session
            .start(&bank(5), &mut StdRng::seed_from_u64(1), fixed_now())
            .unwrap();
        assert_eq!(session.status(), SessionStatus::InProgress);
    }

    #[test]
    fn unsupported_question_count_is_rejected() {
        let mut session = ExamSession::new(draft(45));
        let err = session
            .start(&bank(50), &mut StdRng::seed_from_u64(1), fixed_now())
            .unwrap_err();
        assert_eq!(err, SetupError::UnsupportedQuestionCount(45));
        assert_eq!(session.status(), SessionStatus::Setup);
    }

    #[test]
    fn start_initialises_questions_and_timer() {
        let session = started(30, 40);

        assert_eq!(session.questions().len(), 30);
        assert_eq!(session.remaining_secs(), Some(1_800));
        assert!(session.timer_active());
        assert_eq!(session.answered_count(), 0);
        assert_eq!(session.unanswered_count(), 30);
        assert_eq!(session.started_at(), Some(fixed_now()));
    }

    #[test]
    fn start_twice_is_rejected() {
        let mut session = started(30, 40);
        let err = session
            .start(&bank(40), &mut StdRng::seed_from_u64(2), fixed_now())
            .unwrap_err();
        assert_eq!(err, SetupError::AlreadyStarted);
        assert!(session.draft_mut().is_none());
    }

    #[test]
    fn underfilled_session_starts_with_what_is_available() {
        let mut session = ExamSession::new(
            SessionDraft::new(["Physics"])
                .with_question_count(30)
                .with_chapters(["ch1"]),
        );
        let summary = session
            .start(&bank(3), &mut StdRng::seed_from_u64(1), fixed_now())
            .unwrap();

        assert!(summary.is_underfilled());
        assert_eq!(summary.selected, 3);
        assert_eq!(session.status(), SessionStatus::InProgress);
        assert!(!session.is_empty());
    }

    #[test]
    fn empty_pool_starts_an_empty_session() {
        let mut session = ExamSession::new(draft(30).with_chapters(["nothing"]));
        session
            .start(&bank(10), &mut StdRng::seed_from_u64(1), fixed_now())
            .unwrap();

        assert!(session.is_empty());
        assert!(session.overview().unwrap().is_empty());

        session.dispatch(SessionEvent::RequestSubmit, fixed_now());
        session.dispatch(SessionEvent::ApproveSubmit, fixed_now());
        let result = session.result().unwrap();
        assert_eq!(result.accuracy_percent, 0);
        assert_eq!(result.average_time_per_question_secs, 0.0);
    }

    #[test]
    fn select_toggles_and_ignores_foreign_ids() {
        let mut session = started(30, 40);
        let id = session.questions()[0].id();

        assert_eq!(
            session.dispatch(select(id, "4"), fixed_now()),
            Dispatch::Answered(AnswerChange::Selected)
        );
        assert_eq!(session.answered_count(), 1);
        assert_eq!(
            session.dispatch(select(id, "4"), fixed_now()),
            Dispatch::Answered(AnswerChange::Cleared)
        );
        assert_eq!(session.answered_count(), 0);

        let foreign = QuestionId::new(999_999);
        assert_eq!(session.dispatch(select(foreign, "4"), fixed_now()), Dispatch::Ignored);
        assert_eq!(session.dispatch(select(id, "nope"), fixed_now()), Dispatch::Ignored);
        assert!(session.answers().unwrap().is_empty());
    }

    #[test]
    fn select_is_ignored_outside_running_states() {
        let mut setup = ExamSession::new(draft(30));
        assert_eq!(
            setup.dispatch(select(QuestionId::new(1), "4"), fixed_now()),
            Dispatch::Ignored
        );

        let mut session = started(30, 40);
        let id = session.questions()[0].id();
        session.dispatch(select(id, "4"), fixed_now());
        session.dispatch(SessionEvent::RequestSubmit, fixed_now());
        session.dispatch(SessionEvent::ApproveSubmit, fixed_now());

        assert_eq!(session.dispatch(select(id, "4"), fixed_now()), Dispatch::Ignored);
        assert_eq!(session.answers().unwrap().get(id), Some("4"));
    }

    #[test]
    fn confirmation_exposes_estimate_and_keeps_answers_live() {
        let mut session = started(30, 40);
        let ids: Vec<QuestionId> = session.questions().iter().map(Question::id).collect();
        session.dispatch(select(ids[0], "4"), fixed_now());
        session.dispatch(select(ids[1], "3"), fixed_now());

        assert_eq!(
            session.dispatch(SessionEvent::RequestSubmit, fixed_now()),
            Dispatch::Confirming { estimated_score: 8 }
        );
        assert_eq!(session.status(), SessionStatus::PendingConfirmation);
        assert_eq!(session.estimated_score(), Some(8));

        session.dispatch(select(ids[2], "5"), fixed_now());
        assert_eq!(session.answered_count(), 3);

        assert_eq!(
            session.dispatch(SessionEvent::CancelSubmit, fixed_now()),
            Dispatch::Resumed
        );
        assert_eq!(session.status(), SessionStatus::InProgress);
        assert_eq!(session.estimated_score(), None);
        assert_eq!(session.answered_count(), 3);
    }

    #[test]
    fn approve_requires_confirmation_step() {
        let mut session = started(30, 40);
        assert_eq!(
            session.dispatch(SessionEvent::ApproveSubmit, fixed_now()),
            Dispatch::Ignored
        );
        assert_eq!(
            session.dispatch(SessionEvent::CancelSubmit, fixed_now()),
            Dispatch::Ignored
        );
        assert_eq!(session.status(), SessionStatus::InProgress);
    }

    #[test]
    fn manual_submit_freezes_state_and_is_idempotent() {
        let mut clock = Clock::fixed(fixed_now());
        let mut session = ExamSession::new(draft(30));
        session
            .start(&bank(40), &mut StdRng::seed_from_u64(3), clock.now())
            .unwrap();
        let first = session.questions()[0].clone();
        session.dispatch(select(first.id(), "4"), clock.now());
        session.dispatch(SessionEvent::Tick, clock.now());

        clock.advance(Duration::seconds(300));
        session.dispatch(SessionEvent::RequestSubmit, clock.now());
        assert_eq!(
            session.dispatch(SessionEvent::ApproveSubmit, clock.now()),
            Dispatch::Submitted(SubmitReason::Manual)
        );
        assert_eq!(session.status(), SessionStatus::Submitted);
        assert!(!session.timer_active());

        let submission = *session.submission().unwrap();
        assert_eq!(submission.remaining_secs, 1_799);
        assert_eq!(submission.duration_secs, 300.0);

        for event in [
            SessionEvent::RequestSubmit,
            SessionEvent::ApproveSubmit,
            SessionEvent::CancelSubmit,
            SessionEvent::Tick,
        ] {
            assert_eq!(session.dispatch(event, clock.now()), Dispatch::Ignored);
        }
        assert_eq!(session.remaining_secs(), Some(1_799));

        let result = session.result().unwrap();
        assert_eq!(result.total_score, 4);
        assert_eq!(result.max_score, 120);
        assert_eq!(result.average_time_per_question_secs, 10.0);
        assert_eq!(session.result().unwrap(), result);
        assert_eq!(session.review().unwrap().len(), 30);
    }

    #[test]
    fn countdown_auto_submits_exactly_once() {
        let mut session = started(30, 40);
        let mut auto_submits = 0;

        for _ in 0..30 * 60 {
            if let Dispatch::Submitted(SubmitReason::TimeExpired) =
                session.dispatch(SessionEvent::Tick, fixed_now())
            {
                auto_submits += 1;
            }
        }

        assert_eq!(session.remaining_secs(), Some(0));
        assert_eq!(session.status(), SessionStatus::Submitted);
        assert_eq!(auto_submits, 1);

        for _ in 0..10 {
            assert_eq!(session.dispatch(SessionEvent::Tick, fixed_now()), Dispatch::Ignored);
        }
        assert_eq!(session.remaining_secs(), Some(0));
        assert_eq!(
            session.submission().unwrap().reason,
            SubmitReason::TimeExpired
        );
    }

    #[test]
    fn countdown_keeps_running_during_confirmation() {
        let mut session = started(30, 40);
        for _ in 0..1_790 {
            session.dispatch(SessionEvent::Tick, fixed_now());
        }
        session.dispatch(SessionEvent::RequestSubmit, fixed_now());

        let mut last = Dispatch::Ignored;
        for _ in 0..10 {
            last = session.dispatch(SessionEvent::Tick, fixed_now());
        }

        assert_eq!(last, Dispatch::Submitted(SubmitReason::TimeExpired));
        assert_eq!(session.status(), SessionStatus::Submitted);
        assert_eq!(
            session.dispatch(SessionEvent::ApproveSubmit, fixed_now()),
            Dispatch::Ignored
        );
    }

    #[test]
    fn overview_updates_after_every_answer() {
        let mut session = started(30, 40);
        let id = session.questions()[5].id();

        assert_eq!(session.overview().unwrap().answered, 0);
        session.dispatch(select(id, "6"), fixed_now());
        let overview = session.overview().unwrap();
        assert_eq!(overview.answered, 1);
        assert!(overview.entry(6).unwrap().answered);
        session.dispatch(select(id, "6"), fixed_now());
        assert_eq!(session.overview().unwrap().answered, 0);
    }

    #[test]
    fn question_lookup_is_one_based() {
        let session = started(30, 40);
        assert_eq!(session.question(1), session.questions().first());
        assert!(session.question(0).is_none());
        assert!(session.question(31).is_none());
    }
}
