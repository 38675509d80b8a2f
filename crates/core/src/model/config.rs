use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Validation failures raised while a session is still in setup.
///
/// None of these are fatal: the session stays in setup and the caller shows
/// the message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SetupError {
    #[error("select the number of questions before starting")]
    MissingQuestionCount,

    #[error("{0} is not a supported question count (choose 30, 50, 90, 120, 150 or 180)")]
    UnsupportedQuestionCount(u32),

    #[error("session has already started")]
    AlreadyStarted,
}

//
// ─── QUESTION COUNT ────────────────────────────────────────────────────────────
//

/// The fixed set of exam lengths a learner can choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum QuestionCount {
    Thirty,
    Fifty,
    Ninety,
    OneTwenty,
    OneFifty,
    OneEighty,
}

impl QuestionCount {
    pub const ALL: [QuestionCount; 6] = [
        QuestionCount::Thirty,
        QuestionCount::Fifty,
        QuestionCount::Ninety,
        QuestionCount::OneTwenty,
        QuestionCount::OneFifty,
        QuestionCount::OneEighty,
    ];

    #[must_use]
    pub fn get(self) -> u32 {
        match self {
            QuestionCount::Thirty => 30,
            QuestionCount::Fifty => 50,
            QuestionCount::Ninety => 90,
            QuestionCount::OneTwenty => 120,
            QuestionCount::OneFifty => 150,
            QuestionCount::OneEighty => 180,
        }
    }

    /// Target number of questions as a `usize` for slicing.
    #[must_use]
    pub fn as_usize(self) -> usize {
        // At most 180, always fits.
        self.get() as usize
    }

    /// Exam duration: one minute per question.
    #[must_use]
    pub fn duration_secs(self) -> u32 {
        self.get() * 60
    }
}

impl TryFrom<u32> for QuestionCount {
    type Error = SetupError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|count| count.get() == value)
            .ok_or(SetupError::UnsupportedQuestionCount(value))
    }
}

impl From<QuestionCount> for u32 {
    fn from(value: QuestionCount) -> Self {
        value.get()
    }
}

impl fmt::Display for QuestionCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

//
// ─── SESSION DRAFT ─────────────────────────────────────────────────────────────
//

/// Setup form state: everything the learner picks before an exam starts.
///
/// `question_count` is optional because the learner may not have chosen one
/// yet; `validate` turns the draft into a `SessionConfig`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionDraft {
    pub question_count: Option<u32>,
    pub subjects: Vec<String>,
    pub selected_chapters: HashSet<String>,
    pub blacklisted_question_ids: HashSet<QuestionId>,
}

impl SessionDraft {
    #[must_use]
    pub fn new(subjects: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            subjects: subjects.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_question_count(mut self, count: u32) -> Self {
        self.question_count = Some(count);
        self
    }

    #[must_use]
    pub fn with_chapters(mut self, chapters: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.selected_chapters = chapters.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_blacklist(mut self, ids: impl IntoIterator<Item = QuestionId>) -> Self {
        self.blacklisted_question_ids = ids.into_iter().collect();
        self
    }

    /// Validate the draft.
    ///
    /// Subjects are de-duplicated keeping their first position.
    ///
    /// # Errors
    ///
    /// Returns `SetupError::MissingQuestionCount` when no count was chosen and
    /// `SetupError::UnsupportedQuestionCount` when it is outside the fixed set.
    pub fn validate(&self) -> Result<SessionConfig, SetupError> {
        let raw = self
            .question_count
            .ok_or(SetupError::MissingQuestionCount)?;
        let question_count = QuestionCount::try_from(raw)?;

        let mut seen = HashSet::with_capacity(self.subjects.len());
        let subjects = self
            .subjects
            .iter()
            .filter(|s| seen.insert(s.as_str()))
            .cloned()
            .collect();

        Ok(SessionConfig {
            question_count,
            subjects,
            selected_chapters: self.selected_chapters.clone(),
            blacklisted_question_ids: self.blacklisted_question_ids.clone(),
        })
    }
}

//
// ─── SESSION CONFIG ────────────────────────────────────────────────────────────
//

/// Validated, immutable configuration of one exam session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    question_count: QuestionCount,
    subjects: Vec<String>,
    selected_chapters: HashSet<String>,
    blacklisted_question_ids: HashSet<QuestionId>,
}

impl SessionConfig {
    #[must_use]
    pub fn question_count(&self) -> QuestionCount {
        self.question_count
    }

    #[must_use]
    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    #[must_use]
    pub fn selected_chapters(&self) -> &HashSet<String> {
        &self.selected_chapters
    }

    #[must_use]
    pub fn blacklisted_question_ids(&self) -> &HashSet<QuestionId> {
        &self.blacklisted_question_ids
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
