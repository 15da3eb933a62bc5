//! Line-level change detection for the shared artifact.
//!
//! Two tiers:
//!
//! - **Exact**: both inputs within [`DetectorConfig::line_ceiling`] lines.
//!   Edit distance is `(len(current) - lcs) + (len(previous) - lcs)`, i.e.
//!   inserted plus deleted lines, with the LCS computed by a rolling-row
//!   dynamic program (O(m·n) time, O(min(m, n)) memory).
//! - **Heuristic**: either input above the ceiling. Significant when the line
//!   counts differ by at least the threshold, or when at least threshold lines
//!   of the current text appear nowhere in the previous text.
//!
//! Both tiers compare with `>=` against [`DetectorConfig::edit_threshold`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default line ceiling above which the heuristic tier is used.
pub const DEFAULT_LINE_CEILING: usize = 600;
/// Default number of edited lines that makes a change significant.
pub const DEFAULT_EDIT_THRESHOLD: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorConfig {
    pub line_ceiling: usize,
    pub edit_threshold: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            line_ceiling: DEFAULT_LINE_CEILING,
            edit_threshold: DEFAULT_EDIT_THRESHOLD,
        }
    }
}

/// Which tier produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionStrategy {
    /// Inputs were byte-identical; nothing was computed.
    Identical,
    Exact,
    Heuristic,
}

/// Verdict plus the evidence behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeAssessment {
    pub strategy: DetectionStrategy,
    /// Exact edit distance, or for the heuristic tier the larger of the
    /// line-count delta and the number of novel lines counted.
    pub edits: usize,
    pub significant: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeDetector {
    config: DetectorConfig,
}

impl ChangeDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Whether `current` differs enough from `previous` to warrant a
    /// reconciliation pass.
    pub fn is_significant(&self, previous: &str, current: &str) -> bool {
        self.assess(previous, current).significant
    }

    pub fn assess(&self, previous: &str, current: &str) -> ChangeAssessment {
        if previous == current {
            return ChangeAssessment {
                strategy: DetectionStrategy::Identical,
                edits: 0,
                significant: false,
            };
        }

        let before = split_lines(previous);
        let after = split_lines(current);
        let threshold = self.config.edit_threshold;

        if before.len() > self.config.line_ceiling || after.len() > self.config.line_ceiling {
            let edits = heuristic_edits(&before, &after, threshold);
            return ChangeAssessment {
                strategy: DetectionStrategy::Heuristic,
                edits,
                significant: edits >= threshold,
            };
        }

        let edits = line_edit_distance(&before, &after);
        ChangeAssessment {
            strategy: DetectionStrategy::Exact,
            edits,
            significant: edits >= threshold,
        }
    }
}

/// Newline-delimited lines. An empty string is one empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

/// Inserted plus deleted lines between two line sequences.
pub fn line_edit_distance(previous: &[&str], current: &[&str]) -> usize {
    let lcs = lcs_length(previous, current);
    (current.len() - lcs) + (previous.len() - lcs)
}

/// Length of the longest common subsequence.
///
/// Keeps a single row sized by the shorter input.
pub fn lcs_length(a: &[&str], b: &[&str]) -> usize {
    let (outer, inner) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    if inner.is_empty() {
        return 0;
    }

    let mut row = vec![0usize; inner.len() + 1];
    for outer_line in outer {
        // diagonal holds row[j - 1] from the previous outer iteration
        let mut diagonal = 0;
        for (j, inner_line) in inner.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if outer_line == inner_line {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }
    row[inner.len()]
}

/// Cheap estimate for inputs above the ceiling. Stops counting novel lines
/// once the threshold is reached.
fn heuristic_edits(previous: &[&str], current: &[&str], threshold: usize) -> usize {
    let count_delta = previous.len().abs_diff(current.len());
    if count_delta >= threshold {
        return count_delta;
    }

    let known: HashSet<&str> = previous.iter().copied().collect();
    let mut novel = 0;
    for line in current {
        if !known.contains(line) {
            novel += 1;
            if novel >= threshold {
                break;
            }
        }
    }
    count_delta.max(novel)
}
