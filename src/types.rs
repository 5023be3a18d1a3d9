use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;

/// File type identified from magic bytes or header shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Zip,
    Png,
    Pdf,
    #[serde(rename = "exe")]
    Pe,
    Jpeg,
    Text,
    Unknown,
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FileType::Zip => "zip",
            FileType::Png => "png",
            FileType::Pdf => "pdf",
            FileType::Pe => "exe",
            FileType::Jpeg => "jpeg",
            FileType::Text => "text",
            FileType::Unknown => "unknown",
        };
        write!(f, "{}", label)
    }
}

/// Byte-frequency statistics over a buffer
///
/// min/mean/std are taken over non-zero frequencies only. A standard
/// deviation below 0.002 marks the distribution as uniform, which is
/// evidence of strong encryption or compression.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ByteDistribution {
    pub max_frequency: f64,
    pub min_frequency: f64,
    pub mean_frequency: f64,
    pub std_frequency: f64,
    pub zero_byte_ratio: f64,
    pub is_uniform: bool,
}

/// Result of inspecting the first 16 bytes of a buffer
#[derive(Debug, Clone, Serialize)]
pub struct HeaderAnalysis {
    pub identified: bool,
    pub file_type: FileType,
    pub header_hex: String,
    /// Entropy of the header itself, populated only when the header is
    /// unidentified and its entropy exceeds 7.0
    pub header_entropy: Option<f64>,
    pub possible_encryption: bool,
}

impl Default for HeaderAnalysis {
    fn default() -> Self {
        Self {
            identified: false,
            file_type: FileType::Unknown,
            header_hex: String::new(),
            header_entropy: None,
            possible_encryption: false,
        }
    }
}

/// Flags raised by the pattern detectors
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PatternFlags {
    /// Identical 16-byte blocks recurring (ECB-style repetition)
    pub has_repeating_blocks: bool,
    /// Low diversity among XORed sample pairs (short repeating key)
    pub possible_xor: bool,
    /// Known ransomware note/extension markers present
    pub has_ransomware_markers: bool,
}

/// Statistical profile of a buffer, produced once per call and immutable
/// after construction
#[derive(Debug, Clone, Default, Serialize)]
pub struct EncryptionProfile {
    /// Shannon entropy in [0, 8]
    pub entropy: f64,
    pub distribution: ByteDistribution,
    pub header: HeaderAnalysis,
    pub patterns: PatternFlags,
}

/// Encryption-type label derived deterministically from a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EncryptionType {
    AesEcb,
    StrongUniform,
    StrongUnknown,
    Xor,
    MediumStrength,
    WeakOverKnownFormat(FileType),
    SimpleEncoding,
    RansomwareMarkerOnly,
    NoEncryption,
}

impl std::fmt::Display for EncryptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncryptionType::AesEcb => write!(f, "AES-ECB"),
            EncryptionType::StrongUniform => write!(f, "Strong encryption (AES/RSA)"),
            EncryptionType::StrongUnknown => write!(f, "Strong encryption (unknown type)"),
            EncryptionType::Xor => write!(f, "XOR encryption"),
            EncryptionType::MediumStrength => {
                write!(f, "Medium-strength encryption (possibly RC4, DES)")
            }
            EncryptionType::WeakOverKnownFormat(ft) => {
                write!(f, "Weak encryption over {} file", ft)
            }
            EncryptionType::SimpleEncoding => write!(f, "Simple encryption or encoding"),
            EncryptionType::RansomwareMarkerOnly => {
                write!(f, "Possible ransomware marker, no strong encryption")
            }
            EncryptionType::NoEncryption => write!(f, "No encryption detected"),
        }
    }
}

/// Graded outcome level of a recovery attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuccessLevel {
    Full,
    Partial,
    Failed,
}

impl SuccessLevel {
    /// Grade a confidence score against the fixed thresholds.
    ///
    /// Full requires confidence > 0.8 and recovered bytes; partial requires
    /// confidence > 0.3 and recovered bytes; anything else is failed.
    pub fn grade(confidence: f64, has_content: bool) -> Self {
        if has_content && confidence > 0.8 {
            SuccessLevel::Full
        } else if has_content && confidence > 0.3 {
            SuccessLevel::Partial
        } else {
            SuccessLevel::Failed
        }
    }
}

impl std::fmt::Display for SuccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SuccessLevel::Full => "full",
            SuccessLevel::Partial => "partial",
            SuccessLevel::Failed => "failed",
        };
        write!(f, "{}", label)
    }
}

/// Recovered bytes, tagged by provenance.
///
/// `Recovered` carries content the executor actually reconstructed;
/// `Simulated` carries a fabricated placeholder emitted by the low-confidence
/// fallback branches. Callers must not treat the two alike.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveredContent {
    Recovered(Vec<u8>),
    Simulated(Vec<u8>),
}

impl RecoveredContent {
    pub fn bytes(&self) -> &[u8] {
        match self {
            RecoveredContent::Recovered(b) | RecoveredContent::Simulated(b) => b,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            RecoveredContent::Recovered(b) | RecoveredContent::Simulated(b) => b,
        }
    }

    pub fn is_simulated(&self) -> bool {
        matches!(self, RecoveredContent::Simulated(_))
    }

    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes().is_empty()
    }
}

/// Opaque identifier for a cached recovery attempt
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AttemptId(pub String);

impl AttemptId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AttemptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Terminal value of a recovery attempt
#[derive(Debug, Clone)]
pub struct RecoveryOutcome {
    pub success_level: SuccessLevel,
    pub content: Option<RecoveredContent>,
    /// Confidence in [0, 1]
    pub confidence: f64,
    pub key_found: bool,
    pub message: String,
    pub execution_time: Duration,
    /// Diagnostic key/value pairs specific to the strategy that ran
    pub details: Map<String, Value>,
    /// Set iff the recovered buffer was inserted into the result cache
    pub cache_key: Option<AttemptId>,
}

impl RecoveryOutcome {
    /// True iff a cache entry was created for this outcome
    pub fn is_cached(&self) -> bool {
        self.cache_key.is_some()
    }
}
