use crate::types::{BoundingBox, Token};

/// One token per non-empty line of plain recognized text.
///
/// Plain text has no geometry, so every box is empty.
pub fn tokens_from_lines(text: &str) -> Vec<Token> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| Token::new(line, BoundingBox::default()))
        .collect()
}
