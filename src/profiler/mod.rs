//! Statistical profiler
//!
//! Computes the full `EncryptionProfile` for a raw buffer in one call:
//! Shannon entropy, byte-distribution statistics, header identification,
//! and the pattern flags (ECB-style block repetition, XOR periodicity,
//! ransomware markers). Never fails; an empty buffer yields entropy 0 and
//! an unidentified header.

pub mod signatures;

use crate::entropy::{byte_histogram, entropy_band, entropy_from_histogram, shannon_entropy};
use crate::types::{ByteDistribution, EncryptionProfile, FileType, HeaderAnalysis, PatternFlags};
use ahash::{AHashMap, AHashSet};
use log::debug;

const HEADER_LEN: usize = 16;

/// Cipher block size assumed by the repetition test
pub const BLOCK_SIZE: usize = 16;

/// A block value recurring more often than this flags the buffer
const BLOCK_REPEAT_THRESHOLD: u32 = 3;

/// Frequency standard deviation below this marks the distribution uniform
const UNIFORMITY_THRESHOLD: f64 = 0.002;

const XOR_MIN_LEN: usize = 100;
const XOR_SAMPLE_WINDOW: usize = 1000;
const XOR_SAMPLE_STRIDE: usize = 10;
const XOR_DIVERSITY_THRESHOLD: f64 = 0.5;

/// Profile a buffer
pub fn profile(data: &[u8]) -> EncryptionProfile {
    let histogram = byte_histogram(data);
    let entropy = entropy_from_histogram(&histogram, data.len());
    let distribution = analyze_distribution(&histogram, data.len());
    let header = analyze_header(data);
    let patterns = detect_patterns(data);

    debug!(
        "profiled {} bytes: entropy={:.3} ({}), file_type={}, uniform={}",
        data.len(),
        entropy,
        entropy_band(entropy),
        header.file_type,
        distribution.is_uniform
    );

    EncryptionProfile {
        entropy,
        distribution,
        header,
        patterns,
    }
}

fn analyze_distribution(histogram: &[u32; 256], len: usize) -> ByteDistribution {
    if len == 0 {
        return ByteDistribution::default();
    }

    let total = len as f64;
    let nonzero: Vec<f64> = histogram
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| count as f64 / total)
        .collect();

    let max_frequency = nonzero.iter().cloned().fold(0.0f64, f64::max);
    let min_frequency = nonzero.iter().cloned().fold(f64::MAX, f64::min);
    let mean_frequency = nonzero.iter().sum::<f64>() / nonzero.len() as f64;
    let variance = nonzero
        .iter()
        .map(|p| (p - mean_frequency).powi(2))
        .sum::<f64>()
        / nonzero.len() as f64;
    let std_frequency = variance.sqrt();

    ByteDistribution {
        max_frequency,
        min_frequency,
        mean_frequency,
        std_frequency,
        zero_byte_ratio: histogram[0] as f64 / total,
        is_uniform: std_frequency < UNIFORMITY_THRESHOLD,
    }
}

fn analyze_header(data: &[u8]) -> HeaderAnalysis {
    if data.len() < HEADER_LEN {
        return HeaderAnalysis::default();
    }

    let header = &data[..HEADER_LEN];
    let header_hex: String = header.iter().map(|b| format!("{:02x}", b)).collect();

    if let Some(sig) = signatures::match_magic(header) {
        return HeaderAnalysis {
            identified: true,
            file_type: sig.file_type,
            header_hex,
            header_entropy: None,
            possible_encryption: false,
        };
    }

    if header.iter().all(|&b| signatures::is_printable_byte(b)) {
        return HeaderAnalysis {
            identified: true,
            file_type: FileType::Text,
            header_hex,
            header_entropy: None,
            possible_encryption: false,
        };
    }

    let mut result = HeaderAnalysis {
        identified: false,
        file_type: FileType::Unknown,
        header_hex,
        header_entropy: None,
        possible_encryption: false,
    };

    let header_entropy = shannon_entropy(header);
    if header_entropy > 7.0 {
        result.possible_encryption = true;
        result.header_entropy = Some(header_entropy);
    }

    result
}

fn detect_patterns(data: &[u8]) -> PatternFlags {
    PatternFlags {
        has_repeating_blocks: has_repeating_blocks(data, BLOCK_SIZE),
        possible_xor: has_xor_periodicity(data),
        has_ransomware_markers: signatures::RANSOMWARE_MARKERS.is_match(data),
    }
}

/// Repeating-block test: any fixed-size block value recurring more than the
/// threshold indicates a block-cipher mode without inter-block diffusion
pub fn has_repeating_blocks(data: &[u8], block_size: usize) -> bool {
    if block_size == 0 || data.len() < block_size * 2 {
        return false;
    }

    let mut counts: AHashMap<&[u8], u32> = AHashMap::new();
    for block in data.chunks_exact(block_size) {
        let count = counts.entry(block).or_insert(0);
        *count += 1;
        if *count > BLOCK_REPEAT_THRESHOLD {
            return true;
        }
    }

    false
}

/// Count repetition over blocks, including a trailing partial block.
///
/// Returns (distinct block values occurring at least twice, total blocks).
pub fn count_block_repetition(data: &[u8], block_size: usize) -> (usize, usize) {
    if block_size == 0 || data.is_empty() {
        return (0, 0);
    }

    let mut counts: AHashMap<&[u8], u32> = AHashMap::new();
    let mut total = 0usize;
    for block in data.chunks(block_size) {
        *counts.entry(block).or_insert(0) += 1;
        total += 1;
    }

    let repeating = counts.values().filter(|&&count| count > 1).count();
    (repeating, total)
}

/// XOR-pattern test: sample evenly spaced bytes and XOR adjacent samples;
/// low diversity among the results suggests a short repeating key
fn has_xor_periodicity(data: &[u8]) -> bool {
    if data.len() < XOR_MIN_LEN {
        return false;
    }

    let samples: Vec<u8> = (0..data.len().min(XOR_SAMPLE_WINDOW))
        .step_by(XOR_SAMPLE_STRIDE)
        .map(|i| data[i])
        .collect();

    if samples.len() < 2 {
        return false;
    }

    let mut distinct: AHashSet<u8> = AHashSet::new();
    for pair in samples.windows(2) {
        distinct.insert(pair[0] ^ pair[1]);
    }

    let total = samples.len() - 1;
    (distinct.len() as f64 / total as f64) < XOR_DIVERSITY_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer_profile() {
        let profile = profile(b"");
        assert_eq!(profile.entropy, 0.0);
        assert!(!profile.header.identified);
        assert_eq!(profile.header.file_type, FileType::Unknown);
        assert!(!profile.patterns.has_repeating_blocks);
    }

    #[test]
    fn test_zip_signature_identified() {
        let mut data = b"PK\x03\x04".to_vec();
        data.extend(std::iter::repeat(0u8).take(1000));
        let profile = profile(&data);
        assert!(profile.header.identified);
        assert_eq!(profile.header.file_type, FileType::Zip);
    }

    #[test]
    fn test_text_header_identified() {
        let data = b"The quick brown fox jumps over the lazy dog";
        let profile = profile(data);
        assert!(profile.header.identified);
        assert_eq!(profile.header.file_type, FileType::Text);
    }

    #[test]
    fn test_uniform_distribution_flag() {
        let data: Vec<u8> = (0..8192).map(|i| (i % 256) as u8).collect();
        let profile = profile(&data);
        assert!(profile.distribution.is_uniform);
        assert!((profile.entropy - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_skewed_distribution_not_uniform() {
        let mut data = vec![b'a'; 900];
        data.extend_from_slice(b"some trailing variety 0123456789");
        let profile = profile(&data);
        assert!(!profile.distribution.is_uniform);
        assert!(profile.distribution.max_frequency > 0.5);
    }

    #[test]
    fn test_zero_byte_ratio() {
        let mut data = vec![0u8; 50];
        data.extend(vec![1u8; 50]);
        let profile = profile(&data);
        assert!((profile.distribution.zero_byte_ratio - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_repeating_blocks_detected() {
        // The same 16-byte block five times trips the threshold
        let block = b"ABCDEFGHIJKLMNOP";
        let mut data = Vec::new();
        for _ in 0..5 {
            data.extend_from_slice(block);
        }
        assert!(has_repeating_blocks(&data, BLOCK_SIZE));

        // Distinct blocks do not
        let distinct: Vec<u8> = (0..80u8).collect();
        assert!(!has_repeating_blocks(&distinct, BLOCK_SIZE));
    }

    #[test]
    fn test_block_repetition_counts() {
        let block = b"ABCDEFGHIJKLMNOP";
        let mut data = Vec::new();
        for _ in 0..4 {
            data.extend_from_slice(block);
        }
        let (repeating, total) = count_block_repetition(&data, BLOCK_SIZE);
        assert_eq!(repeating, 1);
        assert_eq!(total, 4);
    }

    #[test]
    fn test_xor_periodicity_detected() {
        // Zero plaintext under a 2-byte repeating key: sampled bytes all
        // equal, so adjacent XORs collapse to a single value
        let data: Vec<u8> = (0..256).map(|i| if i % 2 == 0 { 0xAA } else { 0x55 }).collect();
        let profile = profile(&data);
        assert!(profile.patterns.possible_xor);
    }

    #[test]
    fn test_xor_periodicity_absent_in_diverse_data() {
        // LCG byte stream has high XOR diversity between samples
        let mut state = 1u32;
        let data: Vec<u8> = (0..1000)
            .map(|_| {
                state = state.wrapping_mul(1103515245).wrapping_add(12345);
                (state >> 16) as u8
            })
            .collect();
        let profile = profile(&data);
        assert!(!profile.patterns.possible_xor);
    }

    #[test]
    fn test_ransomware_markers_flagged() {
        let data = b"all your data is gone, read HOW_TO_DECRYPT now";
        let profile = profile(data);
        assert!(profile.patterns.has_ransomware_markers);
    }
}
