use thiserror::Error;

/// Main error type for the triage tool.
///
/// Only the input/CLI layer produces these. The engine's `analyze` and
/// `recover` entry points are total: degenerate buffers yield degenerate
/// profiles and strategy-internal failures are folded into a `failed`
/// outcome, never surfaced as errors.
#[derive(Error, Debug)]
pub enum TriageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Memory mapping error: {0}")]
    Mmap(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Input too large: {size} bytes exceeds limit of {limit} bytes")]
    InputTooLarge { size: u64, limit: u64 },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type alias for triage operations
pub type Result<T> = std::result::Result<T, TriageError>;
