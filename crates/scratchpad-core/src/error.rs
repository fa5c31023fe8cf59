//! Error types for scratchpad-core
//!
//! Failures raised by a user script are not errors at this level: the
//! executor turns them into a failed [`ExecutionResult`](crate::ExecutionResult).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScratchpadError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("protocol error: {0}")]
    Protocol(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
