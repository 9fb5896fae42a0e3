//! Test runner error types.

use thiserror::Error;

/// Errors raised by a running test.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunnerError {
    /// An answer arrived after the test was finalized.
    #[error("test has already finished; no further answers are accepted")]
    AlreadyFinished,
}
