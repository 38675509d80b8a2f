use std::collections::HashMap;

use crate::model::question::Question;

/// In-memory question bank: subject name to its ordered questions.
///
/// Questions are grouped by their own `subject`, so a question always sits
/// under the subject it reports. Loaded in full by a storage adapter before a
/// session is set up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBank {
    by_subject: HashMap<String, Vec<Question>>,
}

impl QuestionBank {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a question to its subject, keeping bank order.
    pub fn insert(&mut self, question: Question) {
        self.by_subject
            .entry(question.subject().to_owned())
            .or_default()
            .push(question);
    }

    #[must_use]
    pub fn from_questions(questions: impl IntoIterator<Item = Question>) -> Self {
        let mut bank = Self::new();
        for question in questions {
            bank.insert(question);
        }
        bank
    }

    /// Questions for a subject; empty when the subject is unknown.
    #[must_use]
    pub fn questions(&self, subject: &str) -> &[Question] {
        self.by_subject
            .get(subject)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Subject names, sorted for stable presentation.
    #[must_use]
    pub fn subjects(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_subject.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Distinct chapter ids across the given subjects, sorted.
    #[must_use]
    pub fn chapters<'a>(&'a self, subjects: &[String]) -> Vec<&'a str> {
        let mut chapters: Vec<&str> = subjects
            .iter()
            .flat_map(|s| self.questions(s))
            .map(Question::chapter_id)
            .collect();
        chapters.sort_unstable();
        chapters.dedup();
        chapters
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_subject.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_subject.values().all(Vec::is_empty)
    }
}

impl FromIterator<Question> for QuestionBank {
    fn from_iter<T: IntoIterator<Item = Question>>(iter: T) -> Self {
        Self::from_questions(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::question;

    #[test]
    fn groups_questions_by_their_subject() {
        let bank: QuestionBank = vec![
            question(1, "Physics", "optics"),
            question(2, "Chemistry", "acids"),
            question(3, "Physics", "motion"),
        ]
        .into_iter()
        .collect();

        assert_eq!(bank.subjects(), vec!["Chemistry", "Physics"]);
        let physics: Vec<u64> = bank.questions("Physics").iter().map(|q| q.id().value()).collect();
        assert_eq!(physics, vec![1, 3]);
        assert!(bank.questions("Biology").is_empty());
        assert_eq!(bank.len(), 3);
    }

    #[test]
    fn chapters_are_distinct_and_limited_to_subjects() {
        let bank = QuestionBank::from_questions(vec![
            question(1, "Physics", "optics"),
            question(2, "Physics", "optics"),
            question(3, "Chemistry", "acids"),
        ]);
        assert_eq!(bank.chapters(&["Physics".to_owned()]), vec!["optics"]);
    }
}
