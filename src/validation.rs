//! Answer validation for the interview questions
//!
//! The interview accepts answers verbatim; validation only decides whether
//! an answer counts as one. Rejected answers consume the retry budget.

use crate::state_machine::state::QuestionKey;

/// Decides whether an utterance is an acceptable answer to a question
pub trait AnswerValidator: Send + Sync {
    /// `Err` carries a short reason for the logs
    fn validate(&self, key: QuestionKey, answer: &str) -> Result<(), String>;
}

/// Rejects answers that are empty or whitespace only
#[derive(Debug, Clone, Copy, Default)]
pub struct NonBlankAnswers;

impl AnswerValidator for NonBlankAnswers {
    fn validate(&self, _key: QuestionKey, answer: &str) -> Result<(), String> {
        if answer.trim().is_empty() {
            Err("blank answer".to_string())
        } else {
            Ok(())
        }
    }
}
