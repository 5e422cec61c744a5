use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{OptionId, QuestionId};

//
// ─── QUESTION TYPES ────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {id} has an empty prompt")]
    EmptyPrompt { id: QuestionId },

    #[error("question {id} has no answer options")]
    NoOptions { id: QuestionId },
}

/// One selectable answer of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: OptionId,
    pub text: String,
    pub is_correct: bool,
}

impl AnswerOption {
    #[must_use]
    pub fn new(id: OptionId, text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            id,
            text: text.into(),
            is_correct,
        }
    }
}

/// A multiple-choice question: a word or sentence plus its ordered options.
///
/// The backend is expected to flag exactly one option as correct, but nothing
/// upstream guarantees it. `correct_index` takes the first flagged option; a
/// question with none can never be answered correctly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<AnswerOption>,
}

impl Question {
    /// Build a question, rejecting blank prompts and empty option lists.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` or `QuestionError::NoOptions`.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: Vec<AnswerOption>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt { id });
        }
        if options.is_empty() {
            return Err(QuestionError::NoOptions { id });
        }
        Ok(Self {
            id,
            prompt,
            options,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    /// Index of the first option flagged correct, if any.
    #[must_use]
    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|opt| opt.is_correct)
    }

    /// Whether selecting `index` scores. Out-of-range indexes never score.
    #[must_use]
    pub fn is_correct(&self, index: usize) -> bool {
        self.correct_index() == Some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(flags: &[bool]) -> Vec<AnswerOption> {
        flags
            .iter()
            .enumerate()
            .map(|(i, flag)| AnswerOption::new(OptionId::new(i as u64), format!("opt {i}"), *flag))
            .collect()
    }

    #[test]
    fn rejects_blank_prompt() {
        let err = Question::new(QuestionId::new(1), "   ", options(&[true])).unwrap_err();
        assert_eq!(err, QuestionError::EmptyPrompt { id: QuestionId::new(1) });
    }

    #[test]
    fn rejects_missing_options() {
        let err = Question::new(QuestionId::new(2), "apple", Vec::new()).unwrap_err();
        assert_eq!(err, QuestionError::NoOptions { id: QuestionId::new(2) });
    }

    #[test]
    fn first_flagged_option_wins() {
        let q = Question::new(QuestionId::new(3), "apple", options(&[false, true, true])).unwrap();
        assert_eq!(q.correct_index(), Some(1));
        assert!(q.is_correct(1));
        assert!(!q.is_correct(2));
    }

    #[test]
    fn question_without_correct_option_never_scores() {
        let q = Question::new(QuestionId::new(4), "pear", options(&[false, false])).unwrap();
        assert_eq!(q.correct_index(), None);
        assert!((0..4).all(|i| !q.is_correct(i)));
    }
}
