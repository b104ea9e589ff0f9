use bon::Builder;
use serde::{Deserialize, Serialize};

/// Axis-aligned box in page-pixel coordinates, origin at the top-left.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge.
    pub x:      u32,
    /// Top edge.
    pub y:      u32,
    /// Width in pixels.
    pub width:  u32,
    /// Height in pixels.
    pub height: u32,
}

impl BoundingBox {
    /// Creates a new bounding box.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (`x + width`).
    pub fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    /// Bottom edge (`y + height`).
    pub fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }
}

/// One recognized text fragment from the source page.
#[derive(Debug, Clone, Default, PartialEq, Builder, Serialize, Deserialize)]
#[builder(on(String, into))]
pub struct Token {
    /// Text exactly as the recognizer emitted it.
    pub raw_text:     String,
    /// Where on the page the fragment was found.
    #[builder(default)]
    pub bounding_box: BoundingBox,
    /// Recognizer confidence in `[0, 100]`, when the engine reports one.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub confidence:   Option<f32>,
}

impl Token {
    /// Creates a token without a confidence score.
    pub fn new(raw_text: impl Into<String>, bounding_box: BoundingBox) -> Self {
        Self {
            raw_text: raw_text.into(),
            bounding_box,
            confidence: None,
        }
    }
}

impl From<&str> for Token {
    fn from(raw_text: &str) -> Self {
        Token::new(raw_text, BoundingBox::default())
    }
}
