//! CLI-specific error types and exit code mapping

use caseflow_core::error::CaseflowError;

/// CLI-specific error type.
///
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// The test set ran, but some cases failed.
    #[error("{failed} of {total} test case(s) failed")]
    SuiteFailed { failed: usize, total: usize },

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from caseflow-core.
    #[error("{0}")]
    Core(#[from] CaseflowError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                               |
    /// |------|---------------------------------------|
    /// | 0    | Success                               |
    /// | 1    | Command error or failed test cases    |
    /// | 2    | Configuration error                   |
    /// | 10   | IO error                              |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Core(CaseflowError::Config(_)) => 2,
            Self::Io(_) | Self::Core(CaseflowError::Io(_)) => 10,
            Self::Command(_) | Self::SuiteFailed { .. } | Self::JsonSerialize(_) | Self::Core(_) => 1,
        }
    }
}
