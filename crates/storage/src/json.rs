//! Question bank backed by a JSON document.
//!
//! The document maps each subject name to its ordered questions:
//!
//! ```json
//! {
//!   "Physics": [
//!     { "id": 1, "text": "...", "options": ["a", "b", "c", "d"],
//!       "correctAnswer": "a", "chapterId": "optics" }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use exam_core::model::QuestionBank;

use crate::repository::{QuestionBankRepository, QuestionRecord, StorageError};

type RawBank = BTreeMap<String, Vec<QuestionRecord>>;

/// Parse and validate a whole bank document.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for malformed JSON and
/// `StorageError::InvalidRecord` for the first question that fails validation.
pub fn parse_bank(json: &str) -> Result<QuestionBank, StorageError> {
    let raw: RawBank =
        serde_json::from_str(json).map_err(|e| StorageError::Serialization(e.to_string()))?;
    bank_from_raw(raw, None)
}

fn bank_from_raw(raw: RawBank, only: Option<&[String]>) -> Result<QuestionBank, StorageError> {
    let mut bank = QuestionBank::new();
    for (subject, records) in raw {
        if only.is_some_and(|wanted| !wanted.contains(&subject)) {
            continue;
        }
        for record in records {
            bank.insert(record.into_question(&subject)?);
        }
    }
    Ok(bank)
}

/// Reads the bank file on every load, so edits are picked up between sessions.
#[derive(Debug, Clone)]
pub struct JsonQuestionBank {
    path: PathBuf,
}

impl JsonQuestionBank {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_raw(&self) -> Result<RawBank, StorageError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound);
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&text).map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

#[async_trait]
impl QuestionBankRepository for JsonQuestionBank {
    async fn list_subjects(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.read_raw().await?.into_keys().collect())
    }

    async fn load_subjects(&self, subjects: &[String]) -> Result<QuestionBank, StorageError> {
        let raw = self.read_raw().await?;
        bank_from_raw(raw, Some(subjects))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANK: &str = r#"{
        "Physics": [
            {"id": 1, "text": "F = ?", "options": ["ma", "mv", "m/a", "a/m"],
             "correctAnswer": "ma", "chapterId": "motion"},
            {"id": 2, "text": "Unit of charge?", "options": ["C", "A", "V", "W"],
             "correctAnswer": "C", "chapterId": "electricity"}
        ],
        "Chemistry": [
            {"id": 10, "text": "pH of water?", "options": ["7", "1", "14", "0"],
             "correctAnswer": "7", "chapterId": "acids"}
        ]
    }"#;

    #[test]
    fn parses_every_subject() {
        let bank = parse_bank(BANK).unwrap();
        assert_eq!(bank.subjects(), vec!["Chemistry", "Physics"]);
        assert_eq!(bank.questions("Physics").len(), 2);
        assert_eq!(bank.questions("Physics")[1].chapter_id(), "electricity");
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let err = parse_bank("{ not json").unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn invalid_question_is_rejected() {
        let json = r#"{"Maths": [{"id": 5, "text": "1+1", "options": ["2"],
            "correctAnswer": "2", "chapterId": "arith"}]}"#;
        let err = parse_bank(json).unwrap_err();
        assert!(matches!(err, StorageError::InvalidRecord { .. }));
    }

    #[tokio::test]
    async fn loads_requested_subjects_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank.json");
        tokio::fs::write(&path, BANK).await.unwrap();

        let repo = JsonQuestionBank::new(&path);
        assert_eq!(repo.list_subjects().await.unwrap(), vec!["Chemistry", "Physics"]);

        let bank = repo.load_subjects(&["Chemistry".to_owned()]).await.unwrap();
        assert_eq!(bank.len(), 1);
        assert!(bank.questions("Physics").is_empty());
    }

    #[tokio::test]
    async fn record_listed_under_another_subject_is_rejected() {
        let json = r#"{"Physics": [{"id": 4, "text": "pH of water?", "options": ["7", "1"],
            "correctAnswer": "7", "chapterId": "acids", "subject": "Chemistry"}]}"#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank.json");
        tokio::fs::write(&path, json).await.unwrap();
        let repo = JsonQuestionBank::new(&path);

        let err = repo.load_subjects(&["Physics".to_owned()]).await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidRecord { .. }));
        assert!(matches!(
            parse_bank(json).unwrap_err(),
            StorageError::InvalidRecord { .. }
        ));
    }

    #[test]
    fn record_repeating_its_own_subject_loads() {
        let json = r#"{"Physics": [{"id": 4, "text": "F = ?", "options": ["ma", "mv"],
            "correctAnswer": "ma", "chapterId": "motion", "subject": "Physics"}]}"#;
        let bank = parse_bank(json).unwrap();
        assert_eq!(bank.questions("Physics").len(), 1);
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let repo = JsonQuestionBank::new("/definitely/not/here.json");
        let err = repo.list_subjects().await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }
}
