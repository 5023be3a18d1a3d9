//! Encryption profiling and heuristic recovery engine
//!
//! This library takes an arbitrary byte buffer and produces:
//! - A statistical classification of whether and how it is encrypted
//!   (Shannon entropy, byte-distribution stats, header signatures,
//!   block-repetition and XOR-pattern flags)
//! - A best-effort recovery attempt from a bank of heuristic strategies,
//!   each result graded by a 0-100 plausibility score
//!
//! The scoring is a plausibility heuristic, not proof of correctness: a
//! "full" outcome means the recovered bytes look like structured content,
//! not that decryption is verified. Fabricated placeholder content from
//! the low-confidence fallback branches is always tagged as simulated.

pub mod cache;
pub mod classifier;
pub mod cli;
pub mod engine;
pub mod entropy;
pub mod error;
pub mod executor;
pub mod input;
pub mod profiler;
pub mod scorer;
pub mod strategy;
pub mod types;

// Re-export commonly used types
pub use cache::ResultCache;
pub use engine::{AnalysisReport, TriageEngine, DEFAULT_ATTEMPT_TIMEOUT};
pub use entropy::shannon_entropy;
pub use error::{Result, TriageError};
pub use executor::{xor_decrypt, ExecBudget};
pub use input::MappedInput;
pub use profiler::profile;
pub use scorer::plausibility_score;
pub use strategy::{ProcessingPriority, RecoveryStrategy, StrategyKind, StrategyTuning};
pub use types::{
    AttemptId, EncryptionProfile, EncryptionType, FileType, RecoveredContent, RecoveryOutcome,
    SuccessLevel,
};
