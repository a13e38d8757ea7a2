//! Temp-file staging for uploads
//!
//! The provider upload reads from a path, so each request's bytes are written
//! to a uniquely named temp file that carries the original extension.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::Result;

/// Uploaded bytes staged on disk for the lifetime of one request.
///
/// Removed by [`StagedFile::cleanup`] or, failing that, on drop.
#[derive(Debug)]
pub struct StagedFile {
    file: NamedTempFile,
}

impl StagedFile {
    /// Write `data` to a fresh temp file in the system temp dir
    pub fn write(data: &[u8], suffix: &str) -> Result<Self> {
        Self::write_in(std::env::temp_dir(), data, suffix)
    }

    /// Write `data` to a fresh temp file inside `dir`
    pub fn write_in(dir: impl AsRef<Path>, data: &[u8], suffix: &str) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(suffix)
            .tempfile_in(dir)?;
        file.write_all(data)?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Remove the file. Failures are logged and otherwise ignored.
    pub fn cleanup(self) {
        let path: PathBuf = self.file.path().to_path_buf();
        if let Err(e) = self.file.close() {
            tracing::warn!("Failed to remove temp file {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staged_file_keeps_suffix_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let staged = StagedFile::write_in(dir.path(), b"# Title\n", ".md").unwrap();

        assert!(staged.path().exists());
        assert!(staged.path().to_string_lossy().ends_with(".md"));
        assert_eq!(std::fs::read(staged.path()).unwrap(), b"# Title\n");

        let path = staged.path().to_path_buf();
        staged.cleanup();
        assert!(!path.exists());
    }

    #[test]
    fn test_drop_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = {
            let staged = StagedFile::write_in(dir.path(), b"%PDF", ".pdf").unwrap();
            staged.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_cleanup_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let staged = StagedFile::write_in(dir.path(), b"x", ".pdf").unwrap();
        std::fs::remove_file(staged.path()).unwrap();
        staged.cleanup();
    }

    #[test]
    fn test_unique_paths() {
        let dir = tempfile::tempdir().unwrap();
        let a = StagedFile::write_in(dir.path(), b"a", ".pdf").unwrap();
        let b = StagedFile::write_in(dir.path(), b"b", ".pdf").unwrap();
        assert_ne!(a.path(), b.path());
    }
}
