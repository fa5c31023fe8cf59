//! # scratchpad-core
//!
//! Runs algorithm-study scripts the way a judge would, without a judge.
//!
//! This crate provides:
//! - A preprocessor that rewrites stdin-acquisition idioms into comments
//! - An executor that evaluates the script in a fresh JavaScript scope with
//!   injected input bindings and captured `console` output
//! - A comparator that diffs captured output against expected output
//! - A JSON protocol and report rendering for the page layer

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod compare;
pub mod config;
pub mod error;
pub mod executor;
pub mod preprocess;
pub mod protocol;
pub mod result;
pub mod sandbox;
pub mod verdict;

pub use compare::compare;
pub use config::RunnerConfig;
pub use error::ScratchpadError;
pub use executor::Executor;
pub use result::{ComparisonResult, ExecutionResult};
pub use verdict::{Verdict, judge};

/// Crate-level result type
pub type Result<T> = std::result::Result<T, ScratchpadError>;

/// Preprocess and execute `source_code` against `raw_input` with the default
/// configuration
#[must_use]
pub fn run(source_code: &str, raw_input: &str) -> ExecutionResult {
    Executor::default().run(source_code, raw_input)
}
