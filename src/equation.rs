use serde::Serialize;

use crate::constants::EQUALS;

/// A normalized fragment split into a question and the student's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquationCandidate {
    /// Text left of the first `=`.
    pub expression:     String,
    /// Text right of the first `=`; `None` iff there was no `=`.
    pub claimed_answer: Option<String>,
}

impl EquationCandidate {
    /// The student's answer, or `None` when it is missing or blank.
    pub fn answer(&self) -> Option<&str> {
        self.claimed_answer.as_deref().filter(|a| !a.is_empty())
    }

    /// Whether the candidate has both a question and an answer to grade.
    pub fn is_gradable(&self) -> bool {
        !self.expression.is_empty() && self.answer().is_some()
    }
}

/// Splits normalized text around the first equality delimiter.
///
/// Later delimiters remain part of the claimed answer.
pub fn split(normalized_text: &str) -> EquationCandidate {
    match normalized_text.split_once(EQUALS) {
        Some((lhs, rhs)) => EquationCandidate {
            expression:     lhs.trim().to_string(),
            claimed_answer: Some(rhs.trim().to_string()),
        },
        None => EquationCandidate {
            expression:     normalized_text.trim().to_string(),
            claimed_answer: None,
        },
    }
}
