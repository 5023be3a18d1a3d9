//! Encryption classifier
//!
//! Maps a statistical profile to an `EncryptionType` label through a fixed
//! rule table driven by entropy bands. Pure, deterministic, and total over
//! all valid profiles. The banding is a heuristic, not a cryptographic
//! proof.

use crate::types::{EncryptionProfile, EncryptionType};

/// Classify a profile into an encryption-type label.
///
/// Decision policy, first match wins:
/// - entropy > 7.8: AES-ECB on block repetition, strong-uniform on a flat
///   distribution, otherwise strong-unknown
/// - entropy > 7.0: XOR on the periodicity flag, otherwise RC4/DES-class
/// - entropy > 6.0: weak-over-known-format when the header identified,
///   otherwise simple encoding
/// - otherwise: ransomware-marker-only on markers, otherwise none
pub fn classify(profile: &EncryptionProfile) -> EncryptionType {
    if profile.entropy > 7.8 {
        if profile.patterns.has_repeating_blocks {
            EncryptionType::AesEcb
        } else if profile.distribution.is_uniform {
            EncryptionType::StrongUniform
        } else {
            EncryptionType::StrongUnknown
        }
    } else if profile.entropy > 7.0 {
        if profile.patterns.possible_xor {
            EncryptionType::Xor
        } else {
            EncryptionType::MediumStrength
        }
    } else if profile.entropy > 6.0 {
        if profile.header.identified {
            EncryptionType::WeakOverKnownFormat(profile.header.file_type)
        } else {
            EncryptionType::SimpleEncoding
        }
    } else if profile.patterns.has_ransomware_markers {
        EncryptionType::RansomwareMarkerOnly
    } else {
        EncryptionType::NoEncryption
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ByteDistribution, FileType, HeaderAnalysis, PatternFlags};

    fn profile_with(entropy: f64) -> EncryptionProfile {
        EncryptionProfile {
            entropy,
            distribution: ByteDistribution::default(),
            header: HeaderAnalysis::default(),
            patterns: PatternFlags::default(),
        }
    }

    #[test]
    fn test_very_high_entropy_band() {
        let mut p = profile_with(7.9);
        assert_eq!(classify(&p), EncryptionType::StrongUnknown);

        p.distribution.is_uniform = true;
        assert_eq!(classify(&p), EncryptionType::StrongUniform);

        p.patterns.has_repeating_blocks = true;
        assert_eq!(classify(&p), EncryptionType::AesEcb);
    }

    #[test]
    fn test_high_entropy_band() {
        let mut p = profile_with(7.5);
        assert_eq!(classify(&p), EncryptionType::MediumStrength);

        p.patterns.possible_xor = true;
        assert_eq!(classify(&p), EncryptionType::Xor);
    }

    #[test]
    fn test_medium_entropy_band() {
        let mut p = profile_with(6.5);
        assert_eq!(classify(&p), EncryptionType::SimpleEncoding);

        p.header.identified = true;
        p.header.file_type = FileType::Png;
        assert_eq!(
            classify(&p),
            EncryptionType::WeakOverKnownFormat(FileType::Png)
        );
    }

    #[test]
    fn test_low_entropy_band() {
        let mut p = profile_with(3.0);
        assert_eq!(classify(&p), EncryptionType::NoEncryption);

        p.patterns.has_ransomware_markers = true;
        assert_eq!(classify(&p), EncryptionType::RansomwareMarkerOnly);
    }

    #[test]
    fn test_band_boundaries_exclusive() {
        // Boundary values fall into the lower band
        assert_eq!(classify(&profile_with(7.8)), EncryptionType::MediumStrength);
        assert_eq!(classify(&profile_with(7.0)), EncryptionType::SimpleEncoding);
        assert_eq!(classify(&profile_with(6.0)), EncryptionType::NoEncryption);
    }

    #[test]
    fn test_classification_deterministic() {
        let mut p = profile_with(7.9);
        p.patterns.has_repeating_blocks = true;
        assert_eq!(classify(&p), classify(&p));
    }
}
