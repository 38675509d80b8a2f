use async_trait::async_trait;
use exam_core::model::{Question, QuestionBank, QuestionDraft, QuestionId};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by question-bank adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid question {id}: {reason}")]
    InvalidRecord { id: QuestionId, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Wire shape of a question as served by the question bank.
///
/// Field names follow the bank's camelCase JSON; snake_case is accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: QuestionId,
    pub text: String,
    pub options: Vec<String>,
    #[serde(alias = "correct_answer")]
    pub correct_answer: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(alias = "chapter_id")]
    pub chapter_id: String,
}

impl QuestionRecord {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            id: question.id(),
            text: question.text().to_owned(),
            options: question.options().to_vec(),
            correct_answer: question.correct_answer().to_owned(),
            subject: Some(question.subject().to_owned()),
            chapter_id: question.chapter_id().to_owned(),
        }
    }

    /// Validate the record into a domain `Question`.
    ///
    /// The record is filed under `subject`. A record that names a different
    /// subject of its own is rejected, since it would be unreachable.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidRecord` if the subjects disagree or
    /// validation fails.
    pub fn into_question(self, subject: &str) -> Result<Question, StorageError> {
        let id = self.id;
        if let Some(own) = self.subject.as_deref().filter(|own| *own != subject) {
            return Err(StorageError::InvalidRecord {
                id,
                reason: format!("record names subject {own:?} but is listed under {subject:?}"),
            });
        }
        QuestionDraft {
            id,
            text: self.text,
            options: self.options,
            correct_answer: self.correct_answer,
            subject: subject.to_owned(),
            chapter_id: self.chapter_id,
        }
        .validate()
        .map_err(|e| StorageError::InvalidRecord {
            id,
            reason: e.to_string(),
        })
    }
}

/// Read-only access to the question bank.
///
/// Retrieval happens once, before a session is set up.
#[async_trait]
pub trait QuestionBankRepository: Send + Sync {
    /// List the subjects the bank can serve, sorted.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the bank cannot be read.
    async fn list_subjects(&self) -> Result<Vec<String>, StorageError>;

    /// Load every question for the given subjects.
    ///
    /// Unknown subjects contribute nothing.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the bank cannot be read or a record is invalid.
    async fn load_subjects(&self, subjects: &[String]) -> Result<QuestionBank, StorageError>;
}

/// Simple in-memory question bank for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryQuestionBank {
    bank: Arc<Mutex<QuestionBank>>,
}

impl InMemoryQuestionBank {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_bank(bank: QuestionBank) -> Self {
        Self {
            bank: Arc::new(Mutex::new(bank)),
        }
    }

    /// Add a question under its own subject.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn insert(&self, question: Question) -> Result<(), StorageError> {
        let mut guard = self
            .bank
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(question);
        Ok(())
    }
}

#[async_trait]
impl QuestionBankRepository for InMemoryQuestionBank {
    async fn list_subjects(&self) -> Result<Vec<String>, StorageError> {
        let guard = self
            .bank
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.subjects().into_iter().map(str::to_owned).collect())
    }

    async fn load_subjects(&self, subjects: &[String]) -> Result<QuestionBank, StorageError> {
        let guard = self
            .bank
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(subjects
            .iter()
            .flat_map(|s| guard.questions(s).iter().cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, answer: &str) -> QuestionRecord {
        QuestionRecord {
            id: QuestionId::new(id),
            text: "Speed of light?".into(),
            options: vec!["c".into(), "2c".into(), "c/2".into(), "0".into()],
            correct_answer: answer.into(),
            subject: None,
            chapter_id: "optics".into(),
        }
    }

    #[test]
    fn record_takes_subject_from_caller_when_missing() {
        let question = record(1, "c").into_question("Physics").unwrap();
        assert_eq!(question.subject(), "Physics");
        assert_eq!(QuestionRecord::from_question(&question).subject.as_deref(), Some("Physics"));
    }

    #[test]
    fn record_with_matching_subject_is_accepted() {
        let mut rec = record(2, "c");
        rec.subject = Some("Physics".into());
        assert_eq!(rec.into_question("Physics").unwrap().subject(), "Physics");
    }

    #[test]
    fn record_naming_another_subject_is_rejected() {
        let mut rec = record(3, "c");
        rec.subject = Some("Chemistry".into());
        match rec.into_question("Physics").unwrap_err() {
            StorageError::InvalidRecord { id, reason } => {
                assert_eq!(id, QuestionId::new(3));
                assert!(reason.contains("Chemistry"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn invalid_record_reports_its_id() {
        let err = record(7, "3c").into_question("Physics").unwrap_err();
        match err {
            StorageError::InvalidRecord { id, reason } => {
                assert_eq!(id, QuestionId::new(7));
                assert!(reason.contains("3c"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn record_accepts_camel_and_snake_case() {
        let camel = r#"{"id":1,"text":"t","options":["a","b"],"correctAnswer":"a","chapterId":"c1"}"#;
        let snake = r#"{"id":1,"text":"t","options":["a","b"],"correct_answer":"a","chapter_id":"c1"}"#;
        let a: QuestionRecord = serde_json::from_str(camel).unwrap();
        let b: QuestionRecord = serde_json::from_str(snake).unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn in_memory_bank_filters_by_subject() {
        let repo = InMemoryQuestionBank::new();
        repo.insert(record(1, "c").into_question("Physics").unwrap())
            .unwrap();
        repo.insert(record(2, "c").into_question("Chemistry").unwrap())
            .unwrap();

        assert_eq!(repo.list_subjects().await.unwrap(), vec!["Chemistry", "Physics"]);

        let bank = repo.load_subjects(&["Physics".to_owned()]).await.unwrap();
        assert_eq!(bank.len(), 1);
        assert!(bank.questions("Chemistry").is_empty());
    }
}
