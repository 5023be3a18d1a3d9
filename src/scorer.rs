//! Plausibility scorer
//!
//! Rates a buffer 0-100 for how plaintext-like it looks. Additive bonus
//! table: known magic bytes, printable-text prefix with HTML/XML/JSON
//! shape detection, and low prefix entropy. Used by the executor to rank
//! candidate decryptions.

use crate::entropy::shannon_entropy;
use crate::profiler::signatures::{is_printable_byte, match_magic};

pub const MAX_SCORE: u32 = 100;

/// Scoring inspects at most this many leading bytes for text heuristics
const PREFIX_LEN: usize = 1000;

const PRINTABLE_RATIO_THRESHOLD: f64 = 0.9;

/// Score a candidate buffer for likelihood of being valid content.
///
/// Zero-length input scores 0; the score is capped at 100.
pub fn plausibility_score(data: &[u8]) -> u32 {
    if data.is_empty() {
        return 0;
    }

    let mut score = 0u32;

    if let Some(sig) = match_magic(data) {
        score += sig.score_bonus;
    }

    let prefix = &data[..data.len().min(PREFIX_LEN)];
    let printable = prefix.iter().filter(|&&b| is_printable_byte(b)).count();
    let printable_ratio = printable as f64 / prefix.len() as f64;

    if printable_ratio >= PRINTABLE_RATIO_THRESHOLD {
        score += 40;

        let sample = String::from_utf8_lossy(prefix);
        let trimmed = sample.trim();
        if trimmed.starts_with("<!DOCTYPE") || trimmed.starts_with("<html") {
            score += 20;
        } else if trimmed.starts_with("<?xml") {
            score += 20;
        } else if trimmed.starts_with('{') && trimmed.ends_with('}') {
            score += 15;
        }
    }

    // Decrypted content usually has lower entropy than ciphertext
    let prefix_entropy = shannon_entropy(prefix);
    if prefix_entropy < 6.0 {
        score += 20;
    } else if prefix_entropy < 7.0 {
        score += 10;
    }

    score.min(MAX_SCORE)
}
