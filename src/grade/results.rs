use std::fmt::Display;

use serde::Serialize;

use crate::{symbolic::SymbolicValue, types::BoundingBox};

#[derive(Debug, Clone, PartialEq, Serialize)]
/// The graded outcome of one equation on the page
pub struct Verdict {
    /// * `raw_text`: the token as recognized
    pub(crate) raw_text:      String,
    /// * `question`: normalized text left of `=`
    pub(crate) question:      String,
    /// * `claim`: normalized text right of `=`
    pub(crate) claim:         String,
    /// * `expected`: exact value of the question
    pub(crate) expected:      SymbolicValue,
    /// * `student_claim`: exact value of the claim, `None` if it did not
    ///   evaluate
    pub(crate) student_claim: Option<SymbolicValue>,
    /// * `is_correct`: whether the claim is equivalent to the question
    pub(crate) is_correct:    bool,
    /// * `bounding_box`: where the token sits on the page
    pub(crate) bounding_box:  BoundingBox,
}

impl Verdict {
    /// Returns the token text as recognized.
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Returns the normalized question.
    pub fn question(&self) -> &str {
        &self.question
    }

    /// Returns the normalized claimed answer.
    pub fn claim(&self) -> &str {
        &self.claim
    }

    /// Returns the exact value of the question.
    pub fn expected(&self) -> &SymbolicValue {
        &self.expected
    }

    /// Returns the exact value of the claim, if it evaluated.
    pub fn student_claim(&self) -> Option<&SymbolicValue> {
        self.student_claim.as_ref()
    }

    /// Returns whether the student answered correctly.
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    /// Returns the token's bounding box.
    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
/// Score and verdicts for one page
pub struct GradeReport {
    /// * `total_gradable`: equations with a parseable question and an answer
    total_gradable: usize,
    /// * `total_correct`: equations answered correctly
    total_correct:  usize,
    /// * `score_percent`: `floor(100 * correct / gradable)`, `0` for an empty
    ///   page
    score_percent:  u8,
    /// * `verdicts`: one per gradable equation, in recognition order
    verdicts:       Vec<Verdict>,
}

impl GradeReport {
    /// Tallies verdicts into a report.
    pub fn from_verdicts(verdicts: Vec<Verdict>) -> Self {
        let total_gradable = verdicts.len();
        let total_correct = verdicts.iter().filter(|v| v.is_correct).count();
        Self {
            total_gradable,
            total_correct,
            score_percent: score_percent(total_correct, total_gradable),
            verdicts,
        }
    }

    /// Returns the number of gradable equations.
    pub fn total_gradable(&self) -> usize {
        self.total_gradable
    }

    /// Returns the number of correct answers.
    pub fn total_correct(&self) -> usize {
        self.total_correct
    }

    /// Returns the score in `[0, 100]`.
    pub fn score_percent(&self) -> u8 {
        self.score_percent
    }

    /// Returns the verdicts in recognition order.
    pub fn verdicts(&self) -> &[Verdict] {
        &self.verdicts
    }
}

impl Display for GradeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Final Grade: {}/100 ({} of {} correct)",
            self.score_percent, self.total_correct, self.total_gradable
        )
    }
}

/// Floor of `100 * correct / total`, or `0` when nothing was gradable.
fn score_percent(correct: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    u8::try_from(correct.min(total) * 100 / total).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_floors() {
        assert_eq!(score_percent(2, 3), 66);
        assert_eq!(score_percent(1, 3), 33);
        assert_eq!(score_percent(3, 3), 100);
        assert_eq!(score_percent(0, 7), 0);
    }

    #[test]
    fn empty_page_scores_zero() {
        let report = GradeReport::from_verdicts(Vec::new());
        assert_eq!(report.score_percent(), 0);
        assert_eq!(report.total_gradable(), 0);
        assert_eq!(report.to_string(), "Final Grade: 0/100 (0 of 0 correct)");
    }
}
