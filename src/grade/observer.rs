use super::results::Verdict;
use crate::{equation::EquationCandidate, symbolic::Unparseable};

/// What happened to one token during grading.
#[derive(Debug, Clone, Copy)]
pub enum GradeEvent<'a> {
    /// The raw text has neither a digit nor `=`.
    Rejected {
        /// Position of the token on the page.
        index:    usize,
        /// The token as recognized.
        raw_text: &'a str,
    },
    /// There is no answer to grade.
    Unanswered {
        /// Position of the token on the page.
        index:     usize,
        /// The split fragment.
        candidate: &'a EquationCandidate,
    },
    /// The question itself does not evaluate, so it is left out of the score.
    UnparseableQuestion {
        /// Position of the token on the page.
        index:     usize,
        /// The split fragment.
        candidate: &'a EquationCandidate,
        /// Why evaluation failed.
        reason:    &'a Unparseable,
    },
    /// The token counted towards the score.
    Graded {
        /// Position of the token on the page.
        index:       usize,
        /// The outcome.
        verdict:     &'a Verdict,
        /// Why the claim failed to evaluate, if it did.
        claim_error: Option<&'a Unparseable>,
    },
}

/// Receives per-token diagnostics from a [`super::Grader`].
pub trait GradeObserver: Send + Sync {
    /// Called once per token, in the order tokens are graded.
    fn observe(&self, event: &GradeEvent<'_>);
}

impl<F> GradeObserver for F
where
    F: Fn(&GradeEvent<'_>) + Send + Sync,
{
    fn observe(&self, event: &GradeEvent<'_>) {
        self(event)
    }
}

/// Forwards grading events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl GradeObserver for TracingObserver {
    fn observe(&self, event: &GradeEvent<'_>) {
        match event {
            GradeEvent::Rejected { index, raw_text } => {
                tracing::trace!(index, raw_text, "not an equation");
            }
            GradeEvent::Unanswered { index, candidate } => {
                tracing::debug!(index, question = %candidate.expression, "no answer given");
            }
            GradeEvent::UnparseableQuestion {
                index,
                candidate,
                reason,
            } => {
                tracing::debug!(
                    index,
                    question = %candidate.expression,
                    %reason,
                    "question skipped"
                );
            }
            GradeEvent::Graded {
                index,
                verdict,
                claim_error,
            } => {
                tracing::info!(
                    index,
                    raw_text = verdict.raw_text(),
                    question = verdict.question(),
                    student = verdict.claim(),
                    expected = %verdict.expected(),
                    correct = verdict.is_correct(),
                    "graded"
                );
                if let Some(reason) = claim_error {
                    tracing::debug!(index, %reason, "answer did not evaluate");
                }
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl GradeObserver for NullObserver {
    fn observe(&self, _event: &GradeEvent<'_>) {}
}
