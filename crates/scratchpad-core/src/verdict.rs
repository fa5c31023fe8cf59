//! Full pipeline: preprocess, execute, compare

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ComparisonResult, ExecutionResult, Executor, RunnerConfig, compare};

/// Outcome of running one script against one test case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub execution: ExecutionResult,

    /// Present only when the run succeeded and an expected output was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonResult>,
}

impl Verdict {
    /// Whether the run succeeded and, if compared, matched
    #[must_use]
    pub fn passed(&self) -> bool {
        self.execution.success && self.comparison.as_ref().is_none_or(|c| c.is_match)
    }
}

/// Run `source` on `raw_input` and compare against `expected` when given
///
/// A blank `expected` counts as not given. A failed run is never compared.
#[must_use]
pub fn judge(
    source: &str,
    raw_input: &str,
    expected: Option<&str>,
    config: &RunnerConfig,
) -> Verdict {
    let execution = Executor::new(config.clone()).run(source, raw_input);

    let comparison = match expected {
        Some(expected) if execution.success && !expected.trim().is_empty() => {
            Some(compare(&execution.captured_output, expected))
        }
        _ => None,
    };

    Verdict {
        execution,
        comparison,
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let execution = &self.execution;

        if !execution.success {
            writeln!(
                f,
                "[ERROR] {} ({:.2} ms)",
                execution.error_message.as_deref().unwrap_or_default(),
                execution.elapsed_millis
            )?;
            if !execution.captured_output.is_empty() {
                writeln!(f, "\n--- output before failure ---")?;
                writeln!(f, "{}", execution.captured_output)?;
            }
            return Ok(());
        }

        writeln!(f, "[OK] finished in {:.2} ms", execution.elapsed_millis)?;
        writeln!(f, "\n--- output ---")?;
        writeln!(f, "{}", execution.captured_output)?;

        match &self.comparison {
            Some(comparison) if comparison.is_match => {
                writeln!(f, "\n--- verdict: match ---")?;
            }
            Some(comparison) => {
                writeln!(f, "\n--- verdict: mismatch ---")?;
                writeln!(f, "{}", comparison.diff.as_deref().unwrap_or_default())?;
            }
            None => {}
        }

        Ok(())
    }
}
