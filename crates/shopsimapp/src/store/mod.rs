//! # Storage Layer
//!
//! Every domain record lives in flat files organized by type, like tables in a
//! small embedded database. [`RecordStore`] is the single entry point; domain
//! services never touch files themselves.
//!
//! ## Layers
//!
//! ```text
//! RecordStore         add / update / remove / find, type registry
//!   ├── CollectionCache   per-type list, lazily loaded, one lock per type
//!   ├── ids               id assignment and duplicate rejection
//!   ├── codec             pretty JSON, ISO-8601 dates
//!   └── StorageBackend    raw payload I/O (FsBackend, MemBackend)
//! ```
//!
//! ## Storage Modes
//!
//! Each type is bound to a [`TypeDescriptor`] once, before first use:
//!
//! - **Collection**: the whole list is one file, rewritten on every mutation.
//! - **Sharded**: one file per record, `<TypeName>_<id>.txt`. A mutation writes
//!   or deletes only that record's file. Unreadable files, and files whose
//!   name does not carry the id they contain, are skipped (with a warning)
//!   when the collection is loaded.
//!
//! ## Caching
//!
//! The first read or write of a type loads its collection; after that the
//! in-memory list is authoritative and every mutation is written through
//! synchronously. Files edited out of band are not noticed until the cache is
//! cleared ([`RecordStore::clear_cache`]) or the process restarts.
//!
//! ## Failure Semantics
//!
//! A failed write leaves the in-memory list already mutated: memory stays
//! consistent, disk may lag. Duplicate ids are rejected before anything
//! changes. [`RecordStore::save_all`] keeps going past individual sharded
//! records that fail to save and reports them in [`SaveReport`].
//!
//! ## Storage Layout
//!
//! ```text
//! <data>/
//! ├── shopsim.toml        # Configuration
//! ├── Client.txt          # Collection files
//! ├── Product.txt
//! ├── ...
//! └── receipts/
//!     ├── Receipt_1.txt   # Sharded records
//!     └── Receipt_2.txt
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::model::RecordId;

pub mod backend;
pub mod cache;
pub mod codec;
pub mod fs_backend;
pub mod ids;
pub mod mem_backend;
pub mod record_store;

pub use record_store::RecordStore;

pub const DEFAULT_FILE_EXT: &str = ".txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// One file holds the whole list.
    Collection,
    /// One file per record.
    Sharded,
}

/// Where and how a record type is stored. Fixed once registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub type_name: &'static str,
    /// Collection file name (used in Collection mode).
    pub file_name: String,
    /// Absolute, or already resolved against the data root.
    pub directory: PathBuf,
    pub mode: StorageMode,
}

impl TypeDescriptor {
    /// Prefix shared by every shard file of this type.
    pub fn shard_prefix(&self) -> String {
        format!("{}_", self.type_name)
    }

    pub fn shard_file_name(&self, id: RecordId, file_ext: &str) -> String {
        format!("{}{}{}", self.shard_prefix(), id, file_ext)
    }
}

/// Report from [`RecordStore::save_all`].
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SaveReport {
    pub types_saved: usize,
    pub records_written: usize,
    pub records_failed: usize,
}

impl SaveReport {
    pub fn merge(&mut self, other: SaveReport) {
        self.types_saved += other.types_saved;
        self.records_written += other.records_written;
        self.records_failed += other.records_failed;
    }
}

/// Normalize an extension to start with a dot.
pub fn normalize_ext(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shard_file_names() {
        let descriptor = TypeDescriptor {
            type_name: "Receipt",
            file_name: "Receipt.txt".to_string(),
            directory: PathBuf::from("data/receipts"),
            mode: StorageMode::Sharded,
        };
        assert_eq!(descriptor.shard_prefix(), "Receipt_");
        assert_eq!(descriptor.shard_file_name(12, ".txt"), "Receipt_12.txt");
    }

    #[test]
    fn ext_normalization() {
        assert_eq!(normalize_ext("json"), ".json");
        assert_eq!(normalize_ext(".txt"), ".txt");
    }

    #[test]
    fn reports_merge() {
        let mut total = SaveReport::default();
        total.merge(SaveReport {
            types_saved: 1,
            records_written: 3,
            records_failed: 0,
        });
        total.merge(SaveReport {
            types_saved: 1,
            records_written: 1,
            records_failed: 2,
        });
        assert_eq!(
            total,
            SaveReport {
                types_saved: 2,
                records_written: 4,
                records_failed: 2
            }
        );
    }
}
