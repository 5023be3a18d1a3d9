//! Engine facade
//!
//! The three call boundaries the core exposes to its caller:
//! `analyze` (profiler + classifier + selector), `recover` (executor), and
//! `fetch_cached` (result cache lookup). Both `analyze` and `recover` are
//! total: they return structured results rather than errors for any input
//! buffer, including an empty one.

use crate::cache::ResultCache;
use crate::classifier;
use crate::executor::{self, ExecBudget};
use crate::profiler;
use crate::strategy::{self, RecoveryStrategy};
use crate::types::{EncryptionType, RecoveryOutcome};
use log::info;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default wall-clock budget for one recovery attempt, before the tuning
/// multiplier is applied
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(30);

/// Composition of profiling, classification, and strategy selection
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub encryption_type: EncryptionType,
    pub file_size: usize,
    pub entropy: f64,
    pub analysis_time: Duration,
    pub strategy: RecoveryStrategy,
}

/// Encryption profiling and recovery engine.
///
/// Owns the result cache; all shared state flows through it. Independent
/// buffers may be analyzed and recovered concurrently from multiple
/// threads.
pub struct TriageEngine {
    cache: ResultCache,
    base_timeout: Duration,
}

impl TriageEngine {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_ATTEMPT_TIMEOUT)
    }

    pub fn with_timeout(base_timeout: Duration) -> Self {
        info!("triage engine initialized");
        Self {
            cache: ResultCache::new(),
            base_timeout,
        }
    }

    /// Analyze a buffer and propose a recovery strategy
    pub fn analyze(&self, data: &[u8]) -> AnalysisReport {
        info!("starting encryption analysis of {} bytes", data.len());
        let started = Instant::now();

        let profile = profiler::profile(data);
        let encryption_type = classifier::classify(&profile);
        let selected = strategy::select(&encryption_type, &profile);

        let report = AnalysisReport {
            encryption_type,
            file_size: data.len(),
            entropy: profile.entropy,
            analysis_time: started.elapsed(),
            strategy: selected,
        };

        info!(
            "analysis complete: {} -> strategy {}",
            report.encryption_type,
            report.strategy.kind.name()
        );
        report
    }

    /// Run a recovery attempt, deriving the wall-clock budget from the
    /// strategy's tuning overlay
    pub fn recover(&self, data: &[u8], strategy: &RecoveryStrategy) -> RecoveryOutcome {
        let budget = ExecBudget::from_tuning(&strategy.tuning, self.base_timeout);
        executor::execute(&self.cache, data, strategy, &budget)
    }

    /// Run a recovery attempt under an explicit execution budget
    pub fn recover_with_budget(
        &self,
        data: &[u8],
        strategy: &RecoveryStrategy,
        budget: &ExecBudget,
    ) -> RecoveryOutcome {
        executor::execute(&self.cache, data, strategy, budget)
    }

    /// Retrieve a previously recovered buffer by attempt id
    pub fn fetch_cached(&self, id: &str) -> Option<Arc<Vec<u8>>> {
        self.cache.get(id)
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}

impl Default for TriageEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::xor_decrypt;
    use crate::strategy::{StrategyKind, StrategyTuning};
    use crate::types::SuccessLevel;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|window| window == needle)
    }

    #[test]
    fn test_analyze_reports_basic_metrics() {
        let engine = TriageEngine::new();
        let mut data = b"PK\x03\x04".to_vec();
        data.extend(vec![0u8; 1000]);

        let report = engine.analyze(&data);
        assert_eq!(report.file_size, 1004);
        assert!(report.entropy >= 0.0 && report.entropy <= 8.0);
        assert_eq!(report.encryption_type, EncryptionType::NoEncryption);
        // the zero run repeats at block granularity
        assert_eq!(
            report.strategy.kind,
            StrategyKind::PatternBasedRecovery { block_size: 16 }
        );
    }

    #[test]
    fn test_analyze_empty_buffer_is_total() {
        let engine = TriageEngine::new();
        let report = engine.analyze(b"");
        assert_eq!(report.file_size, 0);
        assert_eq!(report.entropy, 0.0);
        assert_eq!(report.encryption_type, EncryptionType::NoEncryption);
    }

    #[test]
    fn test_recover_via_selected_strategy_caches_on_success() {
        let engine = TriageEngine::new();
        let plaintext = b"ordinary readable content, repeated enough to analyze. ".repeat(8);
        let encrypted = xor_decrypt(&plaintext, &[0x5A]);

        let strategy = RecoveryStrategy {
            kind: StrategyKind::XorBruteforce {
                key_size_min: 1,
                key_size_max: 8,
            },
            success_probability: 0.7,
            tuning: StrategyTuning::default(),
        };
        let outcome = engine.recover(&encrypted, &strategy);

        let cached_iff_successful = matches!(
            outcome.success_level,
            SuccessLevel::Full | SuccessLevel::Partial
        );
        assert_eq!(outcome.cache_key.is_some(), cached_iff_successful);

        if let Some(id) = &outcome.cache_key {
            let cached = engine.fetch_cached(id.as_str()).expect("cached bytes");
            assert_eq!(
                cached.as_slice(),
                outcome.content.as_ref().unwrap().bytes()
            );
        }
    }

    #[test]
    fn test_fetch_cached_unknown_id() {
        let engine = TriageEngine::new();
        assert!(engine.fetch_cached("attempt_20200101000000_0").is_none());
    }

    #[test]
    fn test_cancelled_recovery_leaves_no_cache_entry() {
        let engine = TriageEngine::new();
        let strategy = RecoveryStrategy {
            kind: StrategyKind::GenericRecovery,
            success_probability: 0.2,
            tuning: StrategyTuning {
                exhaustive_search: false,
                deep_analysis: false,
                timeout_multiplier: 0.0,
            },
        };

        let outcome = engine.recover(b"some buffer worth recovering", &strategy);
        assert_eq!(outcome.success_level, SuccessLevel::Failed);
        assert!(outcome.cache_key.is_none());
        assert_eq!(engine.cache_len(), 0);
    }

    #[test]
    fn test_concurrent_recoveries_do_not_cross_contaminate() {
        let engine = TriageEngine::new();
        let strategy = RecoveryStrategy {
            kind: StrategyKind::PartialKeyRecovery,
            success_probability: 0.3,
            tuning: StrategyTuning::default(),
        };

        std::thread::scope(|scope| {
            for i in 0..100usize {
                let engine = &engine;
                let strategy = &strategy;
                scope.spawn(move || {
                    let marker = format!("distinct buffer payload number {:03} ", i);
                    let data = marker.repeat(30).into_bytes();

                    let outcome = engine.recover(&data, strategy);
                    assert_eq!(outcome.success_level, SuccessLevel::Partial);

                    let id = outcome.cache_key.expect("cache key");
                    let cached = engine.fetch_cached(id.as_str()).expect("cached bytes");
                    assert_eq!(cached.len(), data.len());
                    assert!(contains(&cached, marker.as_bytes()));
                });
            }
        });

        // one entry per attempt, nothing lost or merged
        assert_eq!(engine.cache_len(), 100);
    }
}
