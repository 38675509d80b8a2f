use std::collections::HashMap;

use crate::model::ids::QuestionId;

/// What a call to `AnswerMap::toggle` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerChange {
    /// The question had no answer and now has one.
    Selected,
    /// A different option replaced the previous one.
    Replaced { previous: String },
    /// The same option was chosen again and the answer was cleared.
    Cleared,
}

/// Selected option per question, at most one each.
///
/// The map knows nothing about which questions exist; `ExamSession` only
/// passes ids from its own question list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerMap {
    selected: HashMap<QuestionId, String>,
}

impl AnswerMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `option` for `id`, or clear it when it is already selected.
    pub fn toggle(&mut self, id: QuestionId, option: impl Into<String>) -> AnswerChange {
        let option = option.into();
        match self.selected.get(&id) {
            Some(current) if *current == option => {
                self.selected.remove(&id);
                AnswerChange::Cleared
            }
            _ => match self.selected.insert(id, option) {
                Some(previous) => AnswerChange::Replaced { previous },
                None => AnswerChange::Selected,
            },
        }
    }

    #[must_use]
    pub fn get(&self, id: QuestionId) -> Option<&str> {
        self.selected.get(&id).map(String::as_str)
    }

    #[must_use]
    pub fn is_answered(&self, id: QuestionId) -> bool {
        self.selected.contains_key(&id)
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.selected.len()
    }

    /// Questions out of `total` that have no answer yet.
    #[must_use]
    pub fn unanswered_count(&self, total: usize) -> usize {
        total.saturating_sub(self.selected.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

impl FromIterator<(QuestionId, String)> for AnswerMap {
    fn from_iter<T: IntoIterator<Item = (QuestionId, String)>>(iter: T) -> Self {
        Self {
            selected: iter.into_iter().collect(),
        }
    }
}
