use crate::error::{Result, TriageError};
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

/// Zero-copy memory-mapped input buffer.
///
/// Plays the upload-intake role for the CLI: the engine itself only ever
/// borrows `&[u8]`. Empty files are representable (mapping an empty file is
/// not), and a size ceiling is enforced at open time.
#[derive(Debug)]
pub struct MappedInput {
    mmap: Option<Mmap>,
    path: String,
}

impl MappedInput {
    /// Open an input file with memory mapping and no size ceiling
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_limit(path, u64::MAX)
    }

    /// Open an input file, rejecting anything larger than `max_bytes`
    pub fn open_with_limit<P: AsRef<Path>>(path: P, max_bytes: u64) -> Result<Self> {
        let path_ref = path.as_ref();
        let path_str = path_ref.to_string_lossy().into_owned();

        let file = File::open(path_ref).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TriageError::FileNotFound(path_str.clone())
            } else {
                TriageError::Io(e)
            }
        })?;

        let size = file.metadata()?.len();
        if size > max_bytes {
            return Err(TriageError::InputTooLarge {
                size,
                limit: max_bytes,
            });
        }

        let mmap = if size == 0 {
            None
        } else {
            Some(unsafe {
                Mmap::map(&file)
                    .map_err(|e| TriageError::Mmap(format!("Failed to mmap input: {}", e)))?
            })
        };

        Ok(Self {
            mmap,
            path: path_str,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_open_and_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"mapped content").unwrap();

        let input = MappedInput::open(file.path()).unwrap();
        assert_eq!(input.bytes(), b"mapped content");
        assert_eq!(input.len(), 14);
    }

    #[test]
    fn test_empty_file_maps_to_empty_slice() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let input = MappedInput::open(file.path()).unwrap();
        assert!(input.is_empty());
        assert_eq!(input.bytes(), b"");
    }

    #[test]
    fn test_size_ceiling_enforced() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0u8; 64]).unwrap();

        let err = MappedInput::open_with_limit(file.path(), 16).unwrap_err();
        assert!(matches!(err, TriageError::InputTooLarge { size: 64, limit: 16 }));
    }

    #[test]
    fn test_missing_file() {
        let err = MappedInput::open("definitely/not/here.bin").unwrap_err();
        assert!(matches!(err, TriageError::FileNotFound(_)));
    }
}
