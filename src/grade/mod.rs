/// Token-by-token grading.
pub mod grader;
/// Per-token diagnostic events.
pub mod observer;
/// Verdicts and page reports.
pub mod results;

pub use grader::{Grader, grade};
pub use observer::{GradeEvent, GradeObserver, NullObserver, TracingObserver};
pub use results::{GradeReport, Verdict};
