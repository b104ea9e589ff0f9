use std::sync::Arc;

use bon::Builder;
use rayon::prelude::*;

use super::{
    observer::{GradeEvent, GradeObserver, TracingObserver},
    results::{GradeReport, Verdict},
};
use crate::{
    compare::equivalent_values,
    config,
    constants::EQUALS,
    equation::split,
    normalize::ConfusionTable,
    symbolic::evaluate,
    types::Token,
};

#[derive(Clone, Builder)]
/// Grades the recognized tokens of a page.
pub struct Grader {
    /// substitutions applied to raw text before splitting
    #[builder(default)]
    confusions: ConfusionTable,
    /// receives one event per token
    #[builder(default = Arc::new(TracingObserver) as Arc<dyn GradeObserver>)]
    observer:   Arc<dyn GradeObserver>,
}

impl Default for Grader {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Grader {
    /// A grader using the configured confusion table.
    pub fn from_config() -> anyhow::Result<Self> {
        let config = config::ensure_initialized()?;
        Ok(Self::builder().confusions(config.confusions().clone()).build())
    }

    /// Returns the confusion table in use.
    pub fn confusions(&self) -> &ConfusionTable {
        &self.confusions
    }

    /// Grades one token; `None` when it does not count towards the score.
    pub fn grade_token(&self, index: usize, token: &Token) -> Option<Verdict> {
        let raw = token.raw_text.as_str();
        if !raw.contains(EQUALS) && !raw.chars().any(|c| c.is_ascii_digit()) {
            self.observer.observe(&GradeEvent::Rejected {
                index,
                raw_text: raw,
            });
            return None;
        }

        let candidate = split(&self.confusions.normalize(raw));
        let Some(claim) = candidate.answer() else {
            self.observer.observe(&GradeEvent::Unanswered {
                index,
                candidate: &candidate,
            });
            return None;
        };

        let expected = match evaluate(&candidate.expression) {
            Ok(value) => value,
            Err(reason) => {
                self.observer.observe(&GradeEvent::UnparseableQuestion {
                    index,
                    candidate: &candidate,
                    reason: &reason,
                });
                return None;
            }
        };

        let (student_claim, claim_error) = match evaluate(claim) {
            Ok(value) => (Some(value), None),
            Err(reason) => (None, Some(reason)),
        };

        let verdict = Verdict {
            raw_text: token.raw_text.clone(),
            question: candidate.expression.clone(),
            claim: claim.to_string(),
            is_correct: student_claim
                .as_ref()
                .is_some_and(|claim| equivalent_values(&expected, claim)),
            expected,
            student_claim,
            bounding_box: token.bounding_box,
        };

        self.observer.observe(&GradeEvent::Graded {
            index,
            verdict: &verdict,
            claim_error: claim_error.as_ref(),
        });
        Some(verdict)
    }

    /// Grades every token in order.
    pub fn grade(&self, tokens: &[Token]) -> GradeReport {
        let verdicts = tokens
            .iter()
            .enumerate()
            .filter_map(|(index, token)| self.grade_token(index, token))
            .collect();
        GradeReport::from_verdicts(verdicts)
    }

    /// Grades tokens in parallel; the report keeps recognition order.
    ///
    /// Observer events may arrive out of order.
    pub fn grade_concurrently(&self, tokens: &[Token]) -> GradeReport {
        let verdicts: Vec<Option<Verdict>> = tokens
            .par_iter()
            .enumerate()
            .map(|(index, token)| self.grade_token(index, token))
            .collect();
        GradeReport::from_verdicts(verdicts.into_iter().flatten().collect())
    }
}

/// Grades tokens with the default confusion table.
pub fn grade(tokens: &[Token]) -> GradeReport {
    Grader::default().grade(tokens)
}
