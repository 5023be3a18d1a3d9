//! Strategy selection
//!
//! Maps an encryption-type label plus profile signals to one concrete
//! recovery strategy with parameters and an a-priori success estimate.
//! The strategy set is closed; dispatch is a tagged union so the executor
//! gets exhaustiveness checking at compile time.

use crate::types::{EncryptionProfile, EncryptionType, FileType};
use serde::Serialize;

/// Recovery strategy with its strategy-specific parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum StrategyKind {
    XorBruteforce {
        key_size_min: usize,
        key_size_max: usize,
    },
    KnownHeaderAnalysis {
        file_type: FileType,
    },
    PatternBasedRecovery {
        block_size: usize,
    },
    PartialKeyRecovery,
    GenericRecovery,
}

impl StrategyKind {
    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::XorBruteforce { .. } => "xor_bruteforce",
            StrategyKind::KnownHeaderAnalysis { .. } => "known_header_analysis",
            StrategyKind::PatternBasedRecovery { .. } => "pattern_based_recovery",
            StrategyKind::PartialKeyRecovery => "partial_key_recovery",
            StrategyKind::GenericRecovery => "generic_recovery",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StrategyKind::XorBruteforce { .. } => "Attempt XOR decryption with derived keys",
            StrategyKind::KnownHeaderAnalysis { .. } => {
                "Use known file headers to recover the encryption key"
            }
            StrategyKind::PatternBasedRecovery { .. } => {
                "Use repeating patterns to break the encryption"
            }
            StrategyKind::PartialKeyRecovery => "Attempt to recover a partial encryption key",
            StrategyKind::GenericRecovery => "Try multiple common recovery techniques",
        }
    }
}

/// Caller-supplied tuning overlay.
///
/// `timeout_multiplier` scales the wall-clock budget of the execution;
/// the two flags widen the bounded search of the strategy branches.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StrategyTuning {
    pub exhaustive_search: bool,
    pub deep_analysis: bool,
    pub timeout_multiplier: f64,
}

impl Default for StrategyTuning {
    fn default() -> Self {
        Self {
            exhaustive_search: false,
            deep_analysis: false,
            timeout_multiplier: 1.0,
        }
    }
}

/// Processing priority presets exposed to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingPriority {
    Fast,
    Balanced,
    Thorough,
}

impl StrategyTuning {
    pub fn for_priority(priority: ProcessingPriority) -> Self {
        match priority {
            ProcessingPriority::Thorough => Self {
                exhaustive_search: true,
                deep_analysis: true,
                timeout_multiplier: 2.0,
            },
            ProcessingPriority::Fast => Self {
                exhaustive_search: false,
                deep_analysis: false,
                timeout_multiplier: 0.5,
            },
            ProcessingPriority::Balanced => Self::default(),
        }
    }
}

/// A selected strategy, never mutated after creation except for the tuning
/// overlay the caller may apply before execution
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RecoveryStrategy {
    #[serde(flatten)]
    pub kind: StrategyKind,
    pub success_probability: f64,
    pub tuning: StrategyTuning,
}

impl RecoveryStrategy {
    fn new(kind: StrategyKind, success_probability: f64) -> Self {
        Self {
            kind,
            success_probability,
            tuning: StrategyTuning::default(),
        }
    }

    /// Overlay caller tuning, consuming and returning the strategy
    pub fn with_tuning(mut self, tuning: StrategyTuning) -> Self {
        self.tuning = tuning;
        self
    }
}

/// Select a recovery strategy for a classified buffer.
///
/// Conditions are evaluated in priority order; the first match wins.
pub fn select(encryption_type: &EncryptionType, profile: &EncryptionProfile) -> RecoveryStrategy {
    if matches!(encryption_type, EncryptionType::Xor) {
        return RecoveryStrategy::new(
            StrategyKind::XorBruteforce {
                key_size_min: 1,
                key_size_max: 8,
            },
            0.7,
        );
    }

    if let EncryptionType::WeakOverKnownFormat(file_type) = encryption_type {
        if profile.header.identified {
            return RecoveryStrategy::new(
                StrategyKind::KnownHeaderAnalysis {
                    file_type: *file_type,
                },
                0.6,
            );
        }
    }

    if profile.patterns.has_repeating_blocks {
        return RecoveryStrategy::new(
            StrategyKind::PatternBasedRecovery {
                block_size: crate::profiler::BLOCK_SIZE,
            },
            0.5,
        );
    }

    if profile.entropy > 7.0 && !profile.distribution.is_uniform {
        return RecoveryStrategy::new(StrategyKind::PartialKeyRecovery, 0.3);
    }

    RecoveryStrategy::new(StrategyKind::GenericRecovery, 0.2)
}
