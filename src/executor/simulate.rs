//! Placeholder content fabrication
//!
//! The low-confidence fallback branches emit a plausible-looking buffer
//! instead of genuinely recovered plaintext. Everything produced here is
//! wrapped in `RecoveredContent::Simulated` by the calling strategy so the
//! fabrication is never mistaken for a real recovery. Output is
//! deterministic for a given input length.

const CHUNK_SIZE: usize = 1024;

/// Fraction of chunks rewritten, expressed per ten chunks
const REWRITTEN_PER_TEN: usize = 7;

/// Fabricate a partially "recovered" buffer of the same length as the
/// input: roughly 70% of 1 KiB chunks are rewritten, the rest keep their
/// ciphertext bytes
pub fn simulate_partial(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());

    for (idx, chunk) in data.chunks(CHUNK_SIZE).enumerate() {
        if idx % 10 < REWRITTEN_PER_TEN {
            if idx == 0 {
                // Lead with a recognizable marker, preserving length
                let tag: &[u8] = b"DECRYPTED";
                let n = tag.len().min(chunk.len());
                out.extend_from_slice(&tag[..n]);
                out.extend_from_slice(&chunk[n..]);
            } else {
                let shift = idx as u8;
                out.extend(chunk.iter().map(|b| b.wrapping_add(shift)));
            }
        } else {
            out.extend_from_slice(chunk);
        }
    }

    out
}

/// Fabricate a fully "recovered" buffer of the given length with visibly
/// structured line content
pub fn simulate_full(len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    out.extend_from_slice(b"DECRYPTED_FILE_CONTENT\n\n");

    for i in 0..20 {
        out.extend_from_slice(format!("BLOCK {}: Decrypted content line {}\n", i, i).as_bytes());
    }

    if out.len() < len {
        out.resize(len, b' ');
    } else {
        out.truncate(len);
    }

    out
}
