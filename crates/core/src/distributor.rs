//! Eligibility filtering and proportional question distribution.
//!
//! A session draws `N` questions from several subjects: each subject first
//! gets `floor(N / subjects)` random picks, then any shortfall is backfilled
//! from whatever eligible questions remain, regardless of subject.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::model::{Question, QuestionBank, QuestionId, SessionConfig};

//
// ─── ELIGIBLE POOL ─────────────────────────────────────────────────────────────
//

/// Eligible questions for one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectPool {
    pub subject: String,
    pub questions: Vec<Question>,
}

/// Questions left after chapter and blacklist filtering, grouped by subject
/// in configured order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EligiblePool {
    groups: Vec<SubjectPool>,
}

impl EligiblePool {
    /// Keep a question iff its chapter is selected and its id is not blacklisted.
    #[must_use]
    pub fn filter(bank: &QuestionBank, config: &SessionConfig) -> Self {
        let chapters = config.selected_chapters();
        let blacklist = config.blacklisted_question_ids();

        let groups = config
            .subjects()
            .iter()
            .map(|subject| SubjectPool {
                subject: subject.clone(),
                questions: bank
                    .questions(subject)
                    .iter()
                    .filter(|q| chapters.contains(q.chapter_id()) && !blacklist.contains(&q.id()))
                    .cloned()
                    .collect(),
            })
            .collect();

        Self { groups }
    }

    /// Build a pool directly from pre-filtered groups.
    #[must_use]
    pub fn from_groups(groups: Vec<SubjectPool>) -> Self {
        Self { groups }
    }

    #[must_use]
    pub fn groups(&self) -> &[SubjectPool] {
        &self.groups
    }

    /// Total eligible questions across all subjects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.questions.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//
// ─── DISTRIBUTION ──────────────────────────────────────────────────────────────
//

/// Outcome of a distribution run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    /// Final questions, grouped by subject in configured order.
    pub questions: Vec<Question>,
    /// Questions each subject contributed before backfill, in subject order.
    pub per_subject: Vec<usize>,
    /// Questions added by the backfill pass.
    pub backfilled: usize,
    pub requested: usize,
}

impl Distribution {
    /// Fewer questions were available than requested. Not an error.
    #[must_use]
    pub fn is_underfilled(&self) -> bool {
        self.questions.len() < self.requested
    }
}

/// Select up to `target` questions from `pool`.
///
/// Shuffling uses `rng`, so a seeded generator gives a reproducible selection.
pub fn distribute<R: Rng + ?Sized>(
    pool: &EligiblePool,
    target: usize,
    rng: &mut R,
) -> Distribution {
    let groups = pool.groups();
    if groups.is_empty() || target == 0 {
        return Distribution {
            questions: Vec::new(),
            per_subject: vec![0; groups.len()],
            backfilled: 0,
            requested: target,
        };
    }

    let per_subject_target = target / groups.len();
    let mut seen: HashSet<QuestionId> = HashSet::with_capacity(target);
    let mut selected: Vec<(usize, &Question)> = Vec::with_capacity(target);
    let mut per_subject = Vec::with_capacity(groups.len());

    for (index, group) in groups.iter().enumerate() {
        let mut candidates: Vec<&Question> = group.questions.iter().collect();
        candidates.shuffle(rng);

        let mut taken = 0;
        for question in candidates {
            if taken == per_subject_target {
                break;
            }
            if seen.insert(question.id()) {
                selected.push((index, question));
                taken += 1;
            }
        }
        per_subject.push(taken);
    }

    let mut backfilled = 0;
    if selected.len() < target {
        let mut remaining: Vec<(usize, &Question)> = groups
            .iter()
            .enumerate()
            .flat_map(|(index, g)| g.questions.iter().map(move |q| (index, q)))
            .filter(|(_, q)| !seen.contains(&q.id()))
            .collect();
        remaining.shuffle(rng);

        while selected.len() < target {
            let Some((index, question)) = remaining.pop() else {
                break;
            };
            if seen.insert(question.id()) {
                selected.push((index, question));
                backfilled += 1;
            }
        }
    }

    // Stable: ties keep selection order.
    selected.sort_by_key(|(index, _)| *index);

    let distribution = Distribution {
        questions: selected.into_iter().map(|(_, q)| q.clone()).collect(),
        per_subject,
        backfilled,
        requested: target,
    };

    if distribution.is_underfilled() {
        tracing::warn!(
            requested = target,
            selected = distribution.questions.len(),
            "eligible pool smaller than requested question count"
        );
    }

    distribution
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
