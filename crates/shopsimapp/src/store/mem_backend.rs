use super::backend::StorageBackend;
use crate::error::{Result, StoreError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

/// In-memory storage backend for testing.
///
/// Files are keyed by `(dir, file_name)`. Behaves like [`super::fs_backend::FsBackend`]
/// for every operation the record store uses, and can be told to fail writes.
#[derive(Default)]
pub struct MemBackend {
    files: Mutex<BTreeMap<(PathBuf, String), String>>,
    simulate_write_error: AtomicBool,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.store(simulate, Ordering::SeqCst);
    }

    /// Test helper: put raw bytes in place without going through the store.
    pub fn insert_raw(&self, dir: &Path, file_name: &str, payload: &str) {
        if let Ok(mut files) = self.files() {
            files.insert((dir.to_path_buf(), file_name.to_string()), payload.to_string());
        }
    }

    /// Number of files currently held in `dir`.
    pub fn file_count(&self, dir: &Path) -> usize {
        self.files()
            .map(|files| files.keys().filter(|(d, _)| d == dir).count())
            .unwrap_or(0)
    }

    fn files(&self) -> Result<MutexGuard<'_, BTreeMap<(PathBuf, String), String>>> {
        self.files
            .lock()
            .map_err(|_| StoreError::Store("memory backend lock poisoned".to_string()))
    }

    fn check_writable(&self) -> Result<()> {
        if self.simulate_write_error.load(Ordering::SeqCst) {
            return Err(StoreError::Io(std::io::Error::other(
                "Simulated write error",
            )));
        }
        Ok(())
    }
}

impl StorageBackend for MemBackend {
    fn read(&self, dir: &Path, file_name: &str) -> Result<Option<String>> {
        let files = self.files()?;
        Ok(files
            .get(&(dir.to_path_buf(), file_name.to_string()))
            .cloned())
    }

    fn write(&self, dir: &Path, file_name: &str, payload: &str) -> Result<()> {
        self.check_writable()?;
        let mut files = self.files()?;
        files.insert(
            (dir.to_path_buf(), file_name.to_string()),
            payload.to_string(),
        );
        Ok(())
    }

    fn delete(&self, dir: &Path, file_name: &str) -> Result<()> {
        self.check_writable()?;
        let mut files = self.files()?;
        files.remove(&(dir.to_path_buf(), file_name.to_string()));
        Ok(())
    }

    fn list(&self, dir: &Path, prefix: &str, ext: &str) -> Result<Vec<String>> {
        let files = self.files()?;
        Ok(files
            .keys()
            .filter(|(d, name)| d == dir && name.starts_with(prefix) && name.ends_with(ext))
            .map(|(_, name)| name.clone())
            .collect())
    }

    fn path_of(&self, dir: &Path, file_name: &str) -> PathBuf {
        PathBuf::from(format!("memory://{}", dir.join(file_name).display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_read_delete() {
        let backend = MemBackend::new();
        let dir = Path::new("data");

        backend.write(dir, "Client.txt", "[]").unwrap();
        assert_eq!(
            backend.read(dir, "Client.txt").unwrap(),
            Some("[]".to_string())
        );

        backend.delete(dir, "Client.txt").unwrap();
        assert_eq!(backend.read(dir, "Client.txt").unwrap(), None);
    }

    #[test]
    fn list_filters_by_dir_prefix_and_ext() {
        let backend = MemBackend::new();
        let dir = Path::new("data/receipts");
        backend.write(dir, "Receipt_1.txt", "{}").unwrap();
        backend.write(dir, "Receipt_2.txt", "{}").unwrap();
        backend.write(dir, "Receipt_3.json", "{}").unwrap();
        backend.write(dir, "Other_1.txt", "{}").unwrap();
        backend.write(Path::new("data"), "Receipt_4.txt", "{}").unwrap();

        let names = backend.list(dir, "Receipt_", ".txt").unwrap();
        assert_eq!(names, vec!["Receipt_1.txt", "Receipt_2.txt"]);
    }

    #[test]
    fn simulated_write_error_fails_writes_only() {
        let backend = MemBackend::new();
        let dir = Path::new("data");
        backend.write(dir, "a.txt", "1").unwrap();

        backend.set_simulate_write_error(true);
        assert!(backend.write(dir, "a.txt", "2").is_err());
        assert_eq!(backend.read(dir, "a.txt").unwrap(), Some("1".to_string()));
    }
}
