use super::RecognitionError;
use crate::{
    parsers::parser,
    types::{BoundingBox, Token},
};

/// Tesseract's level for individual words.
const WORD_LEVEL: u32 = 5;

/// One data row of `tesseract ... tsv` output.
#[derive(Debug, Clone, PartialEq)]
pub struct TsvRow {
    /// 1 page, 2 block, 3 paragraph, 4 line, 5 word
    pub level:      u32,
    /// Page number.
    pub page:       u32,
    /// Block number.
    pub block:      u32,
    /// Paragraph number.
    pub paragraph:  u32,
    /// Line number.
    pub line:       u32,
    /// Word number.
    pub word:       u32,
    /// Left edge.
    pub left:       u32,
    /// Top edge.
    pub top:        u32,
    /// Width.
    pub width:      u32,
    /// Height.
    pub height:     u32,
    /// `None` when tesseract reported `-1`.
    pub confidence: Option<f32>,
    /// Recognized text, possibly empty.
    pub text:       String,
}

impl TsvRow {
    /// The row as a token, if it is a word with text.
    pub fn into_token(self) -> Option<Token> {
        let text = self.text.trim();
        if self.level != WORD_LEVEL || text.is_empty() {
            return None;
        }
        Some(Token {
            raw_text:     text.to_string(),
            bounding_box: BoundingBox::new(self.left, self.top, self.width, self.height),
            confidence:   self.confidence,
        })
    }
}

/// Parses `tesseract <image> stdout tsv` output into word tokens.
pub fn parse_tsv(tsv: &str) -> Result<Vec<Token>, RecognitionError> {
    let mut tokens = Vec::new();
    for (i, line) in tsv.lines().enumerate() {
        if line.trim().is_empty() || line.starts_with("level") {
            continue;
        }
        let row = parser::tsv_row(line).map_err(|e| RecognitionError::MalformedOutput {
            line:   i + 1,
            reason: e.to_string(),
        })?;
        tokens.extend(row.into_token());
    }
    Ok(tokens)
}
