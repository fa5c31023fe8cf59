//! Line-by-line comparison of actual against expected output

use std::fmt::Write as _;

use crate::ComparisonResult;

/// Stands in for a line that one side does not have
pub const MISSING_LINE: &str = "(없음)";

const EXPECTED_LABEL: &str = "기대";
const ACTUAL_LABEL: &str = "실제";

/// Compare `actual` with `expected` after trimming both
///
/// On a mismatch the diff lists only the differing lines, each as a
/// `Line N:` header followed by the quoted expected and actual values.
#[must_use]
pub fn compare(actual: &str, expected: &str) -> ComparisonResult {
    let actual = actual.trim();
    let expected = expected.trim();

    if actual == expected {
        return ComparisonResult::matched();
    }

    let actual_lines: Vec<&str> = actual.split('\n').collect();
    let expected_lines: Vec<&str> = expected.split('\n').collect();
    let max_lines = actual_lines.len().max(expected_lines.len());

    let mut diff = String::new();
    for i in 0..max_lines {
        let actual_line = actual_lines.get(i).copied();
        let expected_line = expected_lines.get(i).copied();

        // Compared before substitution so a literal sentinel line still differs
        // from an absent one.
        if actual_line != expected_line {
            let actual_line = actual_line.unwrap_or(MISSING_LINE);
            let expected_line = expected_line.unwrap_or(MISSING_LINE);
            if !diff.is_empty() {
                diff.push('\n');
            }
            let _ = write!(
                diff,
                "Line {}:\n  {EXPECTED_LABEL}: \"{expected_line}\"\n  {ACTUAL_LABEL}: \"{actual_line}\"",
                i + 1
            );
        }
    }

    ComparisonResult::mismatched(diff)
}
