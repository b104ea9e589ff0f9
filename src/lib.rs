//! # sheetgrade
//!
//! Grades arithmetic worksheets. Recognized text fragments are repaired,
//! split into a question and an answer, evaluated exactly, and compared by
//! value rather than by spelling.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Overlay marks and the textual report
pub mod annotate;
/// Exact comparison of a claimed answer with an expected value
pub mod compare;
/// Runtime configuration read from the environment
pub mod config;
/// A module defining a bunch of constant values to be used throughout
pub mod constants;
/// Splitting fragments into question and answer
pub mod equation;
/// Scoring pages of recognized tokens
pub mod grade;
/// Repairing recognition confusions
pub mod normalize;
/// For all parsers used
pub mod parsers;
/// Subprocess helpers
pub mod process;
/// The recognition collaborator boundary
pub mod recognize;
/// Exact evaluation of arithmetic
pub mod symbolic;
/// Tokens and bounding boxes
pub mod types;

use std::path::Path;

pub use annotate::{Annotations, Mark, MarkKind, annotate};
pub use compare::equivalent;
pub use equation::{EquationCandidate, split};
pub use grade::{GradeReport, Grader, Verdict, grade};
pub use normalize::{ConfusionTable, normalize};
pub use symbolic::{SymbolicValue, Unparseable, evaluate};
pub use types::{BoundingBox, Token};

use recognize::{RecognitionError, Recognizer};

/// Recognizes the page at `image` and grades it.
///
/// Recognition failures abort the page; problems with individual equations
/// never do.
pub async fn grade_page<R: Recognizer>(
    recognizer: &R,
    grader: &Grader,
    image: &Path,
) -> Result<GradeReport, RecognitionError> {
    let tokens = recognizer.recognize(image).await?;
    tracing::info!(image = %image.display(), tokens = tokens.len(), "recognized page");
    Ok(grader.grade(&tokens))
}
