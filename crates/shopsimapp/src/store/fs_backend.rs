use super::backend::StorageBackend;
use crate::error::{Result, StoreError};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Filesystem backend. Directories handed to it are already resolved
/// against the data root by the record store.
#[derive(Debug, Default, Clone)]
pub struct FsBackend;

impl FsBackend {
    pub fn new() -> Self {
        Self
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(StoreError::Io)?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn read(&self, dir: &Path, file_name: &str) -> Result<Option<String>> {
        let path = dir.join(file_name);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(StoreError::Io)?;
        Ok(Some(content))
    }

    fn write(&self, dir: &Path, file_name: &str, payload: &str) -> Result<()> {
        self.ensure_dir(dir)?;

        let target_path = dir.join(file_name);

        // Atomic Write
        let tmp_path = dir.join(format!(".{}-{}.tmp", file_name, Uuid::new_v4()));
        fs::write(&tmp_path, payload).map_err(StoreError::Io)?;
        if let Err(e) = fs::rename(&tmp_path, target_path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(StoreError::Io(e));
        }

        Ok(())
    }

    fn delete(&self, dir: &Path, file_name: &str) -> Result<()> {
        let path = dir.join(file_name);
        if path.exists() {
            fs::remove_file(path).map_err(StoreError::Io)?;
        }
        Ok(())
    }

    fn list(&self, dir: &Path, prefix: &str, ext: &str) -> Result<Vec<String>> {
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        let entries = fs::read_dir(dir).map_err(StoreError::Io)?;

        for entry in entries {
            let entry = entry.map_err(StoreError::Io)?;
            let path = entry.path();
            if path.is_file() {
                if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                    if name.starts_with(prefix) && name.ends_with(ext) {
                        names.push(name.to_string());
                    }
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn path_of(&self, dir: &Path, file_name: &str) -> PathBuf {
        dir.join(file_name)
    }
}
