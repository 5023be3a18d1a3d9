use crate::types::FileType;
use lazy_static::lazy_static;
use regex::bytes::Regex;

/// Magic-byte signature with metadata
pub struct MagicSignature {
    pub file_type: FileType,
    pub magic: &'static [u8],
    /// Plausibility bonus awarded when a buffer starts with this magic
    pub score_bonus: u32,
}

/// Detection signatures, checked in order; first prefix match wins
pub const MAGIC_SIGNATURES: &[MagicSignature] = &[
    MagicSignature {
        file_type: FileType::Zip,
        magic: b"PK\x03\x04",
        score_bonus: 50,
    },
    MagicSignature {
        file_type: FileType::Png,
        magic: b"\x89PNG\r\n\x1a\n",
        score_bonus: 50,
    },
    MagicSignature {
        file_type: FileType::Pdf,
        magic: b"%PDF",
        score_bonus: 50,
    },
    MagicSignature {
        file_type: FileType::Pe,
        magic: b"MZ",
        score_bonus: 40,
    },
    MagicSignature {
        file_type: FileType::Jpeg,
        magic: b"\xff\xd8\xff",
        score_bonus: 50,
    },
];

lazy_static! {
    /// Ransomware note/extension markers; any hit flags the buffer
    pub static ref RANSOMWARE_MARKERS: Regex = Regex::new(
        r"\.encrypted|\.locked|\.crypto|\.crypt|\.enc|DECRYPT_INSTRUCTION|HOW_TO_DECRYPT|YOUR_FILES_ARE_ENCRYPTED"
    )
    .expect("Invalid marker pattern");
}

/// Match a buffer prefix against the detection signature table
#[inline]
pub fn match_magic(data: &[u8]) -> Option<&'static MagicSignature> {
    MAGIC_SIGNATURES.iter().find(|sig| data.starts_with(sig.magic))
}

/// Expected plaintext header used for header-derived key recovery.
///
/// These differ from the detection magics where the original format pins a
/// longer prefix (PDF version marker, HTML doctype for text).
pub fn expected_header(file_type: FileType) -> Option<&'static [u8]> {
    match file_type {
        FileType::Zip => Some(b"PK\x03\x04"),
        FileType::Png => Some(b"\x89PNG\r\n\x1a\n"),
        FileType::Pdf => Some(b"%PDF-1."),
        FileType::Pe => Some(b"MZ"),
        FileType::Jpeg => Some(b"\xff\xd8\xff"),
        FileType::Text => Some(b"<!DOCTYPE"),
        FileType::Unknown => None,
    }
}

/// Printable ASCII or whitespace (TAB, LF, CR)
#[inline]
pub fn is_printable_byte(b: u8) -> bool {
    (0x20..=0x7E).contains(&b) || b == 0x09 || b == 0x0A || b == 0x0D
}
