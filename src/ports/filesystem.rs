//! Filesystem port for config file I/O.

use std::path::Path;

/// Provides filesystem access for reading and rewriting JSON documents.
///
/// Abstracting the filesystem lets fixture code run against an in-memory
/// double in tests without touching the real disk.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not valid UTF-8.
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;

    /// Replaces the file at `path` with `contents`.
    ///
    /// Readers observe either the old contents or the new ones, never a
    /// partially written file.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (permissions, disk full, etc.).
    /// The original file is left in place on failure.
    fn write_atomic(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
