//! Change detection
//!
//! Decides whether an artifact edit is large enough to be worth an automatic
//! reconciliation pass.

pub mod detector;

pub use detector::{
    ChangeAssessment, ChangeDetector, DEFAULT_EDIT_THRESHOLD, DEFAULT_LINE_CEILING,
    DetectionStrategy, DetectorConfig, lcs_length, line_edit_distance, split_lines,
};
