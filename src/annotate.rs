use serde::Serialize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Panel, Style, object::Rows},
};

use crate::{
    constants::{CORRECT_LABEL, DEFAULT_MARK_OFFSET_X, DEFAULT_MARK_OFFSET_Y, INCORRECT_LABEL},
    grade::{GradeReport, Verdict},
};

/// How a mark should be coloured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkKind {
    /// The answer was correct.
    Positive,
    /// The answer was wrong.
    Negative,
}

/// One drawing instruction for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mark {
    /// Horizontal anchor in page pixels; may be negative near the left edge.
    pub x:     i64,
    /// Vertical anchor (text baseline) in page pixels.
    pub y:     i64,
    /// Colour class.
    pub kind:  MarkKind,
    /// Text to draw.
    pub label: String,
}

/// Where marks are placed relative to a verdict's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkLayout {
    /// Offset from the box's right edge.
    pub offset_x: i64,
    /// Offset from the box's bottom edge.
    pub offset_y: i64,
}

impl Default for MarkLayout {
    fn default() -> Self {
        Self {
            offset_x: DEFAULT_MARK_OFFSET_X,
            offset_y: DEFAULT_MARK_OFFSET_Y,
        }
    }
}

impl MarkLayout {
    /// The mark for a single verdict.
    pub fn mark(&self, verdict: &Verdict) -> Mark {
        let bbox = verdict.bounding_box();
        let (kind, label) = if verdict.is_correct() {
            (MarkKind::Positive, CORRECT_LABEL.to_string())
        } else {
            (MarkKind::Negative, format!("{INCORRECT_LABEL} ({})", verdict.expected()))
        };
        Mark {
            x: bbox.right() + self.offset_x,
            y: bbox.bottom() + self.offset_y,
            kind,
            label,
        }
    }

    /// Marks and the text report for a set of verdicts.
    pub fn annotate(&self, verdicts: &[Verdict]) -> Annotations {
        Annotations {
            marks:  verdicts.iter().map(|v| self.mark(v)).collect(),
            report: render_report(verdicts),
        }
    }
}

/// Drawing instructions plus the line-oriented report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotations {
    /// One mark per verdict, in verdict order.
    pub marks:  Vec<Mark>,
    /// One line per verdict, in verdict order.
    pub report: String,
}

/// Annotates verdicts with the default layout.
pub fn annotate(verdicts: &[Verdict]) -> Annotations {
    MarkLayout::default().annotate(verdicts)
}

/// Renders one report line per verdict.
pub fn render_report(verdicts: &[Verdict]) -> String {
    verdicts.iter().map(report_line).collect()
}

/// A single newline-terminated report line.
fn report_line(verdict: &Verdict) -> String {
    let status = if verdict.is_correct() {
        format!("{CORRECT_LABEL} correct")
    } else {
        format!("{INCORRECT_LABEL} incorrect")
    };
    format!(
        "Question: {} | Student: {} | Expected: {} | {status}\n",
        verdict.question(),
        verdict.claim(),
        verdict.expected(),
    )
}

#[derive(Tabled)]
/// A verdict as a table row
struct VerdictRow {
    #[tabled(rename = "Read")]
    /// * `raw`: the recognized text
    raw:      String,
    #[tabled(rename = "Question")]
    /// * `question`: normalized question
    question: String,
    #[tabled(rename = "Student")]
    /// * `student`: normalized answer
    student:  String,
    #[tabled(rename = "Expected")]
    /// * `expected`: exact value of the question
    expected: String,
    #[tabled(rename = "Result")]
    /// * `result`: check or cross
    result:   &'static str,
}

impl From<&Verdict> for VerdictRow {
    fn from(verdict: &Verdict) -> Self {
        Self {
            raw:      verdict.raw_text().to_string(),
            question: verdict.question().to_string(),
            student:  verdict.claim().to_string(),
            expected: verdict.expected().to_string(),
            result:   if verdict.is_correct() {
                CORRECT_LABEL
            } else {
                INCORRECT_LABEL
            },
        }
    }
}

/// Renders a report as a boxed table with the score in the footer.
pub fn render_table(report: &GradeReport) -> String {
    let rows: Vec<VerdictRow> = report.verdicts().iter().map(VerdictRow::from).collect();
    Table::new(rows)
        .with(Panel::header("Analyzed math problems"))
        .with(Panel::footer(report.to_string()))
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .with(Modify::new(Rows::last()).with(Alignment::center()))
        .with(Style::modern())
        .to_string()
}
