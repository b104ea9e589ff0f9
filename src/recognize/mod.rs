/// Plain-text OCR dumps, one token per line.
pub mod lines;
/// The tesseract command-line engine.
pub mod tesseract;
/// Tesseract's TSV output format.
pub mod tsv;

use std::{path::PathBuf, process::ExitStatus};

pub use lines::tokens_from_lines;
pub use tesseract::TesseractRecognizer;
pub use tsv::parse_tsv;

use crate::types::Token;

/// Failures of the recognition collaborator. Any of these aborts grading of
/// the page.
#[derive(thiserror::Error, Debug)]
pub enum RecognitionError {
    /// The input could not be read.
    #[error("Could not read `{path}`")]
    Io {
        /// The file being read.
        path:   PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The engine ran but reported failure.
    #[error("The recognition engine exited with {status}:\n{stderr}")]
    EngineFailed {
        /// Exit status of the engine.
        status: ExitStatus,
        /// What the engine wrote to stderr.
        stderr: String,
    },
    /// The engine's output could not be understood.
    #[error("Line {line} of the recognition output is malformed: {reason}")]
    MalformedOutput {
        /// 1-based line number.
        line:   usize,
        /// What the parser expected.
        reason: String,
    },
    /// Anything else, e.g. a spawn failure or timeout.
    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

/// Turns a page image into positioned text tokens.
pub trait Recognizer {
    /// Recognizes the text on the page at `image`, in reading order.
    fn recognize(
        &self,
        image: &std::path::Path,
    ) -> impl Future<Output = Result<Vec<Token>, RecognitionError>> + Send;
}
