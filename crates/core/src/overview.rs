use crate::model::{AnswerMap, Question, QuestionId};

/// One question's slot in the overview grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverviewEntry {
    /// 1-based position across the whole session, not reset per subject.
    pub index: usize,
    pub question_id: QuestionId,
    pub answered: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectOverview {
    pub subject: String,
    pub entries: Vec<OverviewEntry>,
    pub answered: usize,
    pub unanswered: usize,
}

impl SubjectOverview {
    #[must_use]
    pub fn total(&self) -> usize {
        self.entries.len()
    }
}

/// Answered/unanswered breakdown of a session, per subject and overall.
///
/// Built fresh from the question list and answers on every call; there is no
/// cached copy to go stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOverview {
    pub subjects: Vec<SubjectOverview>,
    pub total: usize,
    pub answered: usize,
    pub unanswered: usize,
}

impl SessionOverview {
    #[must_use]
    pub fn build(questions: &[Question], answers: &AnswerMap, subjects: &[String]) -> Self {
        let subjects: Vec<SubjectOverview> = partition_by_subject(questions, subjects)
            .into_iter()
            .map(|(subject, indexed)| {
                let entries: Vec<OverviewEntry> = indexed
                    .into_iter()
                    .map(|(index, q)| OverviewEntry {
                        index,
                        question_id: q.id(),
                        answered: answers.is_answered(q.id()),
                    })
                    .collect();
                let answered = entries.iter().filter(|e| e.answered).count();
                SubjectOverview {
                    subject: subject.to_owned(),
                    unanswered: entries.len() - answered,
                    answered,
                    entries,
                }
            })
            .collect();

        let total = questions.len();
        let answered = subjects.iter().map(|s| s.answered).sum();
        Self {
            subjects,
            total,
            answered,
            unanswered: total - answered,
        }
    }

    /// True when the session has no questions at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Look up a question by its 1-based session index.
    #[must_use]
    pub fn entry(&self, index: usize) -> Option<&OverviewEntry> {
        self.subjects
            .iter()
            .flat_map(|s| s.entries.iter())
            .find(|e| e.index == index)
    }
}

/// Group questions by subject in `subjects` order, tagging each with its
/// 1-based position in the session list.
///
/// Subjects missing from `subjects` follow in first-seen order.
pub(crate) fn partition_by_subject<'a>(
    questions: &'a [Question],
    subjects: &[String],
) -> Vec<(&'a str, Vec<(usize, &'a Question)>)> {
    let mut groups: Vec<(&'a str, Vec<(usize, &'a Question)>)> = Vec::new();
    let mut extras: Vec<(&'a str, Vec<(usize, &'a Question)>)> = Vec::new();

    for subject in subjects {
        let indexed: Vec<(usize, &Question)> = questions
            .iter()
            .enumerate()
            .filter(|(_, q)| q.subject() == subject)
            .map(|(i, q)| (i + 1, q))
            .collect();
        if let Some(&(_, first)) = indexed.first() {
            groups.push((first.subject(), indexed));
        }
    }

    for (i, question) in questions.iter().enumerate() {
        if subjects.iter().any(|s| s == question.subject()) {
            continue;
        }
        match extras.iter_mut().find(|(s, _)| *s == question.subject()) {
            Some((_, indexed)) => indexed.push((i + 1, question)),
            None => extras.push((question.subject(), vec![(i + 1, question)])),
        }
    }

    groups.extend(extras);
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::question;

    fn subjects(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_owned()).collect()
    }

    fn session() -> Vec<Question> {
        vec![
            question(10, "Physics", "ch"),
            question(11, "Physics", "ch"),
            question(20, "Chemistry", "ch"),
            question(21, "Chemistry", "ch"),
            question(22, "Chemistry", "ch"),
        ]
    }

    #[test]
    fn indices_run_across_the_whole_session() {
        let overview = SessionOverview::build(
            &session(),
            &AnswerMap::new(),
            &subjects(&["Physics", "Chemistry"]),
        );

        let chemistry: Vec<usize> = overview.subjects[1].entries.iter().map(|e| e.index).collect();
        assert_eq!(chemistry, vec![3, 4, 5]);
        assert_eq!(overview.entry(4).unwrap().question_id, QuestionId::new(21));
        assert!(overview.entry(6).is_none());
    }

    #[test]
    fn counts_reflect_current_answers() {
        let questions = session();
        let names = subjects(&["Physics", "Chemistry"]);
        let mut answers = AnswerMap::new();
        answers.toggle(QuestionId::new(11), "4");
        answers.toggle(QuestionId::new(20), "3");

        let overview = SessionOverview::build(&questions, &answers, &names);
        assert_eq!((overview.total, overview.answered, overview.unanswered), (5, 2, 3));
        assert_eq!(overview.subjects[0].answered, 1);
        assert_eq!(overview.subjects[1].unanswered, 2);
        assert!(overview.entry(2).unwrap().answered);

        answers.toggle(QuestionId::new(11), "4");
        let overview = SessionOverview::build(&questions, &answers, &names);
        assert_eq!(overview.answered, 1);
        assert!(!overview.entry(2).unwrap().answered);
    }

    #[test]
    fn subjects_follow_configured_order_and_skip_empty_ones() {
        let overview = SessionOverview::build(
            &session(),
            &AnswerMap::new(),
            &subjects(&["Chemistry", "Biology", "Physics"]),
        );
        let names: Vec<&str> = overview.subjects.iter().map(|s| s.subject.as_str()).collect();
        assert_eq!(names, vec!["Chemistry", "Physics"]);
        assert_eq!(overview.subjects[1].entries[0].index, 1);
    }

    #[test]
    fn empty_session_reports_empty() {
        let overview = SessionOverview::build(&[], &AnswerMap::new(), &subjects(&["Physics"]));
        assert!(overview.is_empty());
        assert!(overview.subjects.is_empty());
        assert_eq!(overview.unanswered, 0);
    }
}
