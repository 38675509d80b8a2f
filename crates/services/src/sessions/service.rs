use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use exam_core::model::{QuestionBank, SessionDraft};
use exam_core::session::{ExamSession, StartSummary};
use storage::QuestionBankRepository;

use super::runner::{SessionHandle, spawn_runner};
use crate::Clock;
use crate::error::ExamServiceError;

/// A freshly started session plus what the distributor reported.
#[derive(Debug)]
pub struct StartedSession {
    pub session: ExamSession,
    pub summary: StartSummary,
}

/// Loads the question bank and starts exam sessions from setup drafts.
#[derive(Clone)]
pub struct ExamService {
    clock: Clock,
    bank: Arc<dyn QuestionBankRepository>,
    seed: Option<u64>,
}

impl ExamService {
    #[must_use]
    pub fn new(clock: Clock, bank: Arc<dyn QuestionBankRepository>) -> Self {
        Self {
            clock,
            bank,
            seed: None,
        }
    }

    /// Use a fixed shuffle seed so question selection is reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Subjects available in the bank.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::Storage` if the bank cannot be read.
    pub async fn subjects(&self) -> Result<Vec<String>, ExamServiceError> {
        Ok(self.bank.list_subjects().await?)
    }

    /// Load the questions for `subjects`.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::Storage` if the bank cannot be read.
    pub async fn load(&self, subjects: &[String]) -> Result<QuestionBank, ExamServiceError> {
        Ok(self.bank.load_subjects(subjects).await?)
    }

    /// Validate `draft`, draw questions and start the countdown.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::Setup` for an invalid draft (checked before
    /// the bank is touched) or `ExamServiceError::Storage` on load failure.
    pub async fn start_session(
        &self,
        draft: SessionDraft,
    ) -> Result<StartedSession, ExamServiceError> {
        let config = draft.validate()?;
        let bank = self.load(config.subjects()).await?;

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut session = ExamSession::new(draft);
        let summary = session.start(&bank, &mut rng, self.clock.now())?;

        Ok(StartedSession { session, summary })
    }

    /// Start a session and hand it to a background runner.
    ///
    /// # Errors
    ///
    /// Same as [`ExamService::start_session`].
    pub async fn launch(
        &self,
        draft: SessionDraft,
    ) -> Result<(SessionHandle, StartSummary), ExamServiceError> {
        let StartedSession { session, summary } = self.start_session(draft).await?;
        Ok((spawn_runner(session, self.clock), summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::{QuestionDraft, QuestionId, SetupError};
    use exam_core::session::SessionStatus;
    use exam_core::time::fixed_now;
    use storage::InMemoryQuestionBank;

    fn bank() -> Arc<InMemoryQuestionBank> {
        let bank = InMemoryQuestionBank::new();
        for (subject, base) in [("Physics", 100), ("Chemistry", 200)] {
            for n in 0..20 {
                let question = QuestionDraft {
                    id: QuestionId::new(base + n),
                    text: format!("{subject} question {n}"),
                    options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                    correct_answer: "b".into(),
                    subject: subject.into(),
                    chapter_id: "ch1".into(),
                }
                .validate()
                .unwrap();
                bank.insert(question).unwrap();
            }
        }
        Arc::new(bank)
    }

    fn service(seed: u64) -> ExamService {
        ExamService::new(Clock::fixed(fixed_now()), bank()).with_seed(Some(seed))
    }

    fn draft() -> SessionDraft {
        SessionDraft::new(["Physics", "Chemistry"]).with_chapters(["ch1"])
    }

    #[tokio::test]
    async fn start_session_selects_questions_and_starts_timer() {
        let started = service(1)
            .start_session(draft().with_question_count(30))
            .await
            .unwrap();

        assert_eq!(started.session.status(), SessionStatus::InProgress);
        assert_eq!(started.summary.selected, 30);
        assert_eq!(started.summary.per_subject, vec![15, 15]);
        assert_eq!(started.session.remaining_secs(), Some(1800));
        assert_eq!(started.session.started_at(), Some(fixed_now()));
    }

    #[tokio::test]
    async fn missing_question_count_is_rejected() {
        let err = service(1).start_session(draft()).await.unwrap_err();
        assert!(matches!(
            err,
            ExamServiceError::Setup(SetupError::MissingQuestionCount)
        ));
    }

    #[tokio::test]
    async fn seeded_service_is_reproducible() {
        let a = service(77)
            .start_session(draft().with_question_count(30))
            .await
            .unwrap();
        let b = service(77)
            .start_session(draft().with_question_count(30))
            .await
            .unwrap();

        let ids = |s: &ExamSession| s.questions().iter().map(|q| q.id()).collect::<Vec<_>>();
        assert_eq!(ids(&a.session), ids(&b.session));
    }

    #[tokio::test]
    async fn subjects_come_from_the_bank() {
        let subjects = service(1).subjects().await.unwrap();
        assert_eq!(subjects, vec!["Chemistry".to_owned(), "Physics".to_owned()]);
    }
}
