use std::path::Path;

use super::{RecognitionError, Recognizer, tsv::parse_tsv};
use crate::{config::TesseractEnv, process::run_collect, types::Token};

/// Runs the `tesseract` binary and reads its TSV output.
#[derive(Debug, Clone, Default)]
pub struct TesseractRecognizer {
    /// How to invoke tesseract.
    env: TesseractEnv,
}

impl TesseractRecognizer {
    /// Creates a recognizer with explicit settings.
    pub fn new(env: TesseractEnv) -> Self {
        Self { env }
    }

    /// Command-line arguments for recognizing `image`.
    pub fn args(&self, image: &Path) -> Vec<String> {
        vec![
            image.display().to_string(),
            "stdout".to_string(),
            "--psm".to_string(),
            self.env.psm().to_string(),
            "tsv".to_string(),
        ]
    }
}

impl Recognizer for TesseractRecognizer {
    async fn recognize(&self, image: &Path) -> Result<Vec<Token>, RecognitionError> {
        if !image.exists() {
            return Err(RecognitionError::Io {
                path:   image.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such image"),
            });
        }

        tracing::debug!(image = %image.display(), program = self.env.program(), "running tesseract");
        let args = self.args(image);
        let out = run_collect(self.env.program(), &args, Some(self.env.timeout())).await?;
        if !out.status.success() {
            return Err(RecognitionError::EngineFailed {
                status: out.status,
                stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
            });
        }

        parse_tsv(&String::from_utf8_lossy(&out.stdout))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn builds_tsv_arguments() {
        let env = TesseractEnv::new("tesseract", 6, Duration::from_secs(1));
        let recognizer = TesseractRecognizer::new(env);
        assert_eq!(
            recognizer.args(Path::new("page.png")),
            ["page.png", "stdout", "--psm", "6", "tsv"]
        );
    }

    #[tokio::test]
    async fn missing_image_is_an_io_error() {
        let err = TesseractRecognizer::default()
            .recognize(Path::new("definitely/not/here.png"))
            .await
            .expect_err("missing image");
        assert!(matches!(err, RecognitionError::Io { .. }));
    }
}
