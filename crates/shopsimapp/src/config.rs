//! # Configuration
//!
//! Shopsim configuration is managed by [`clapfig`], which handles layered
//! loading from TOML files, environment variables and compiled defaults.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `SHOPSIM__FILE_EXT`, `SHOPSIM__RECEIPTS_DIR`, ...
//! 2. **Data-directory config**: `<data>/shopsim.toml`.
//! 3. **Compiled defaults**: `#[config(default = ...)]` below.
//!
//! A missing or unreadable file falls back to the defaults.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `file_ext` | `.txt` | Extension of every data file |
//! | `receipts_dir` | `receipts` | Receipt directory, relative to the data root |
//! | `receipts_sharded` | `true` | One file per receipt instead of a single list |

use confique::Config;
use serde::{Deserialize, Serialize};

use crate::store::{normalize_ext, StorageMode};

/// Configuration for shopsim, stored in `shopsim.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ShopConfig {
    /// Extension for data files (e.g. ".txt", ".json")
    #[config(default = ".txt")]
    pub file_ext: String,

    /// Directory receipts are written to. Relative paths resolve against the
    /// data directory.
    #[config(default = "receipts")]
    pub receipts_dir: String,

    /// Store each receipt in its own file.
    #[config(default = true)]
    pub receipts_sharded: bool,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            file_ext: ".txt".to_string(),
            receipts_dir: "receipts".to_string(),
            receipts_sharded: true,
        }
    }
}

impl ShopConfig {
    /// The file extension, normalized to start with a dot.
    pub fn file_ext(&self) -> String {
        normalize_ext(&self.file_ext)
    }

    pub fn receipts_mode(&self) -> StorageMode {
        if self.receipts_sharded {
            StorageMode::Sharded
        } else {
            StorageMode::Collection
        }
    }
}
