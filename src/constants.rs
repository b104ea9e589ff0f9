/// The equality delimiter separating a question from its answer.
pub const EQUALS: char = '=';

/// Glyphs that recognition engines routinely emit in place of digits and
/// operators on arithmetic worksheets.
pub const DEFAULT_CONFUSIONS: [(char, char); 8] = [
    ('t', '+'),
    ('T', '+'),
    ('s', '5'),
    ('S', '5'),
    ('l', '1'),
    ('I', '1'),
    ('O', '0'),
    ('|', '1'),
];

/// Largest exponent magnitude the evaluator will expand.
pub const MAX_EXPONENT: u32 = 4096;

/// Longest question or answer, in characters, the evaluator will parse.
pub const MAX_EXPRESSION_CHARS: usize = 256;

/// Deepest nesting of parentheses, or longest run of prefix signs, the
/// evaluator will parse.
pub const MAX_NESTING: usize = 64;

/// Horizontal offset of a verdict mark from the right edge of its box.
pub const DEFAULT_MARK_OFFSET_X: i64 = -300;

/// Vertical offset of a verdict mark below the bottom edge of its box.
pub const DEFAULT_MARK_OFFSET_Y: i64 = 40;

/// Default tesseract page segmentation mode (single uniform block of
/// vertically aligned text).
pub const DEFAULT_PSM: u8 = 5;

/// Default recognition timeout, in seconds.
pub const DEFAULT_OCR_TIMEOUT_SECS: u64 = 60;

/// Label drawn next to a correct answer.
pub const CORRECT_LABEL: &str = "✓";

/// Prefix of the label drawn next to an incorrect answer.
pub const INCORRECT_LABEL: &str = "✗";
