//! Negative-marking scorer.
//!
//! Each question is worth `+4` when answered correctly, `-1` when answered
//! incorrectly and `0` when left blank. Only questions in the session list
//! are scored.

use crate::model::{AnswerMap, Question, QuestionId};
use crate::overview::partition_by_subject;

pub const MARKS_CORRECT: i32 = 4;
pub const MARKS_INCORRECT: i32 = -1;
pub const MARKS_UNSELECTED: i32 = 0;

//
// ─── OUTCOME ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
    Unselected,
}

impl Outcome {
    #[must_use]
    pub fn of(question: &Question, answers: &AnswerMap) -> Self {
        match answers.get(question.id()) {
            None => Outcome::Unselected,
            Some(selected) if question.is_correct(selected) => Outcome::Correct,
            Some(_) => Outcome::Incorrect,
        }
    }

    #[must_use]
    pub fn marks(self) -> i32 {
        match self {
            Outcome::Correct => MARKS_CORRECT,
            Outcome::Incorrect => MARKS_INCORRECT,
            Outcome::Unselected => MARKS_UNSELECTED,
        }
    }
}

fn to_i32(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

/// Optimistic score shown while confirming a submission: every answered
/// question counted as correct, no negative marking.
#[must_use]
pub fn estimated_score(answered_count: usize) -> i32 {
    to_i32(answered_count).saturating_mul(MARKS_CORRECT)
}

/// Best possible score for a session of `question_count` questions.
#[must_use]
pub fn max_score(question_count: usize) -> i32 {
    to_i32(question_count).saturating_mul(MARKS_CORRECT)
}

//
// ─── TALLY ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Tally {
    score: i32,
    correct: usize,
    incorrect: usize,
    unselected: usize,
}

impl Tally {
    fn add(&mut self, outcome: Outcome) {
        self.score += outcome.marks();
        match outcome {
            Outcome::Correct => self.correct += 1,
            Outcome::Incorrect => self.incorrect += 1,
            Outcome::Unselected => self.unselected += 1,
        }
    }

    fn total(&self) -> usize {
        self.correct + self.incorrect + self.unselected
    }
}

//
// ─── RESULT STATS ──────────────────────────────────────────────────────────────
//

/// Score breakdown for one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectResult {
    pub subject: String,
    pub score: i32,
    pub max_score: i32,
    pub correct: usize,
    pub incorrect: usize,
    pub unselected: usize,
    pub total: usize,
}

/// Final result handed to the presenter.
///
/// A pure function of the question list, answers and elapsed time; computing
/// it again gives the same value.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultStats {
    pub total_score: i32,
    pub max_score: i32,
    pub correct_count: usize,
    pub incorrect_count: usize,
    pub unselected_count: usize,
    /// `round(100 * correct / total)`, 0 for an empty session.
    pub accuracy_percent: u32,
    /// Wall-clock seconds per question, 2 decimals, 0 for an empty session.
    pub average_time_per_question_secs: f64,
    pub by_subject: Vec<SubjectResult>,
}

impl ResultStats {
    #[must_use]
    pub fn compute(
        questions: &[Question],
        answers: &AnswerMap,
        subjects: &[String],
        duration_secs: f64,
    ) -> Self {
        let mut overall = Tally::default();
        let by_subject = partition_by_subject(questions, subjects)
            .into_iter()
            .map(|(subject, indexed)| {
                let mut tally = Tally::default();
                for (_, question) in indexed {
                    let outcome = Outcome::of(question, answers);
                    tally.add(outcome);
                    overall.add(outcome);
                }
                SubjectResult {
                    subject: subject.to_owned(),
                    score: tally.score,
                    max_score: max_score(tally.total()),
                    correct: tally.correct,
                    incorrect: tally.incorrect,
                    unselected: tally.unselected,
                    total: tally.total(),
                }
            })
            .collect();

        Self {
            total_score: overall.score,
            max_score: max_score(questions.len()),
            correct_count: overall.correct,
            incorrect_count: overall.incorrect,
            unselected_count: overall.unselected,
            accuracy_percent: accuracy_percent(overall.correct, questions.len()),
            average_time_per_question_secs: average_time(duration_secs, questions.len()),
            by_subject,
        }
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.correct_count + self.incorrect_count + self.unselected_count
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn accuracy_percent(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (100.0 * correct as f64 / total as f64).round() as u32
}

#[allow(clippy::cast_precision_loss)]
fn average_time(duration_secs: f64, total: usize) -> f64 {
    if total == 0 || !duration_secs.is_finite() {
        return 0.0;
    }
    (duration_secs.max(0.0) / total as f64 * 100.0).round() / 100.0
}

//
// ─── REVIEW ────────────────────────────────────────────────────────────────────
//

/// Per-question line of the post-submission review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionReview {
    /// 1-based position in the session.
    pub index: usize,
    pub question_id: QuestionId,
    pub subject: String,
    pub selected: Option<String>,
    pub correct_answer: String,
    pub outcome: Outcome,
    pub marks: i32,
}

/// Review every question in session order.
#[must_use]
pub fn review(questions: &[Question], answers: &AnswerMap) -> Vec<QuestionReview> {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let outcome = Outcome::of(q, answers);
            QuestionReview {
                index: i + 1,
                question_id: q.id(),
                subject: q.subject().to_owned(),
                selected: answers.get(q.id()).map(str::to_owned),
                correct_answer: q.correct_answer().to_owned(),
                outcome,
                marks: outcome.marks(),
            }
        })
        .collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
