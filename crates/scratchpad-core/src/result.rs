//! Execution and comparison result types

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Result of one script execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    /// Whether the script ran to completion
    pub success: bool,

    /// Captured console lines joined by `\n`
    ///
    /// On failure this holds whatever was captured before the failure point.
    pub captured_output: String,

    /// Human-readable failure message, always present when `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Wall-clock time of the run in fractional milliseconds
    pub elapsed_millis: f64,
}

impl ExecutionResult {
    /// Build a successful result. An empty capture is reported as `placeholder`.
    #[must_use]
    pub fn succeeded(lines: &[String], elapsed: Duration, placeholder: &str) -> Self {
        let captured_output = if lines.is_empty() {
            placeholder.to_string()
        } else {
            lines.join("\n")
        };

        Self {
            success: true,
            captured_output,
            error_message: None,
            elapsed_millis: millis(elapsed),
        }
    }

    /// Build a failed result carrying the partial capture
    #[must_use]
    pub fn failed(lines: &[String], message: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            success: false,
            captured_output: lines.join("\n"),
            error_message: Some(message.into()),
            elapsed_millis: millis(elapsed),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.success
    }

    /// Elapsed time as a `Duration`, zero if the stored value is not a valid span
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        Duration::try_from_secs_f64(self.elapsed_millis / 1000.0).unwrap_or_default()
    }
}

fn millis(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() * 1000.0
}

/// Verdict of comparing actual output against expected output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub is_match: bool,

    /// Line-indexed mismatch report, absent on a match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

impl ComparisonResult {
    #[must_use]
    pub const fn matched() -> Self {
        Self {
            is_match: true,
            diff: None,
        }
    }

    #[must_use]
    pub const fn mismatched(diff: String) -> Self {
        Self {
            is_match: false,
            diff: Some(diff),
        }
    }
}
