//! Shannon entropy over the 256-symbol byte alphabet
//!
//! Single pass, fixed 256-bin histogram, no allocations:
//! `H = -Σ(p_i * log2(p_i))` for every byte value with observed frequency.
//! The histogram is exposed so the profiler can reuse it for distribution
//! statistics without a second pass over the buffer.

/// Count byte frequencies into a 256-bin histogram
#[inline]
pub fn byte_histogram(data: &[u8]) -> [u32; 256] {
    let mut histogram = [0u32; 256];
    for &byte in data {
        histogram[byte as usize] += 1;
    }
    histogram
}

/// Calculate Shannon entropy of data
///
/// Returns a value between 0.0 (single repeated byte value) and 8.0
/// (all 256 values equally represented). An empty buffer has entropy 0.
pub fn shannon_entropy(data: &[u8]) -> f64 {
    entropy_from_histogram(&byte_histogram(data), data.len())
}

/// Calculate entropy from a precomputed byte-frequency histogram
pub fn entropy_from_histogram(histogram: &[u32; 256], total_bytes: usize) -> f64 {
    if total_bytes == 0 {
        return 0.0;
    }

    let total = total_bytes as f64;
    let mut entropy = 0.0f64;

    for &count in histogram.iter() {
        if count > 0 {
            let probability = count as f64 / total;
            entropy -= probability * probability.log2();
        }
    }

    entropy
}

/// Entropy band label for logging
#[inline]
pub fn entropy_band(entropy: f64) -> &'static str {
    if entropy > 7.8 {
        "very_high"
    } else if entropy > 7.0 {
        "high"
    } else if entropy > 6.0 {
        "medium"
    } else if entropy > 3.0 {
        "text_like"
    } else {
        "low"
    }
}
