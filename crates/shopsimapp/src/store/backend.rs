use crate::error::Result;
use std::path::{Path, PathBuf};

/// Abstract interface for raw payload I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while RecordStore handles the "what" (typing, caching, ids, storage modes).
///
/// All methods take `&self`; implementations must be shareable across threads.
pub trait StorageBackend: Send + Sync {
    /// Read a payload.
    /// Returns Ok(None) if the file does not exist.
    /// Returns Err only on actual I/O errors (permissions, disk failure).
    fn read(&self, dir: &Path, file_name: &str) -> Result<Option<String>>;

    /// Write a payload, replacing any previous content.
    /// Creates `dir` if needed.
    fn write(&self, dir: &Path, file_name: &str, payload: &str) -> Result<()>;

    /// Delete a payload. Deleting a missing file is not an error.
    fn delete(&self, dir: &Path, file_name: &str) -> Result<()>;

    /// List file names in `dir` starting with `prefix` and ending with `ext`.
    /// A missing directory lists as empty.
    fn list(&self, dir: &Path, prefix: &str, ext: &str) -> Result<Vec<String>>;

    /// The location a payload lives at.
    /// For FsBackend, this is the real path. For MemBackend, a virtual path.
    fn path_of(&self, dir: &Path, file_name: &str) -> PathBuf;
}
