//! # Startup
//!
//! [`initialize`] turns a data directory into a ready [`ShopContext`]:
//!
//! 1. Resolve the data directory (see [`resolve_data_dir`]).
//! 2. Load `shopsim.toml` from it through `clapfig`.
//! 3. Build a file-system [`RecordStore`] rooted there.
//! 4. Register every domain type ([`register_domain_types`]).
//!
//! Nothing is read from disk beyond the config file; collections load lazily
//! or through [`RecordStore::load_all`].
//!
//! ## Data Directory Resolution
//!
//! 1. An explicit path (the CLI's `--data`).
//! 2. The `SHOPSIM_DATA` environment variable.
//! 3. The OS-appropriate data directory (via the `directories` crate).

use crate::config::ShopConfig;
use crate::error::{Result, StoreError};
use crate::model::{CashDesk, Cashier, Client, Product, Receipt, Store};
use crate::store::backend::StorageBackend;
use crate::store::fs_backend::FsBackend;
use crate::store::RecordStore;
use clapfig::{Clapfig, SearchMode, SearchPath};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub const DATA_ENV_VAR: &str = "SHOPSIM_DATA";
pub const CONFIG_FILE_NAME: &str = "shopsim.toml";

pub struct ShopContext {
    pub store: RecordStore<FsBackend>,
    pub config: ShopConfig,
    pub data_dir: PathBuf,
}

pub fn resolve_data_dir(data_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = data_override {
        return Ok(path);
    }
    if let Some(path) = std::env::var_os(DATA_ENV_VAR).filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    ProjectDirs::from("com", "shopsim", "shopsim")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| StoreError::Store("could not determine a data directory".to_string()))
}

pub fn load_config(data_dir: &Path) -> ShopConfig {
    Clapfig::builder()
        .app_name("shopsim")
        .file_name(CONFIG_FILE_NAME)
        .search_paths(vec![SearchPath::Path(data_dir.to_path_buf())])
        .search_mode(SearchMode::Merge)
        .load()
        .unwrap_or_default()
}

/// Binds every domain type to its file: receipts under
/// `config.receipts_dir`, everything else one collection file each.
pub fn register_domain_types<B: StorageBackend>(
    store: &RecordStore<B>,
    config: &ShopConfig,
) -> Result<()> {
    store.register_type::<Client>(None)?;
    store.register_type::<Cashier>(None)?;
    store.register_type::<Product>(None)?;
    store.register_type::<Store>(None)?;
    store.register_type::<CashDesk>(None)?;
    store.register_type_with_custom_dir::<Receipt>(&config.receipts_dir, config.receipts_mode())
}

pub fn initialize(data_override: Option<PathBuf>) -> Result<ShopContext> {
    let data_dir = resolve_data_dir(data_override)?;
    let config = load_config(&data_dir);

    let store = RecordStore::new_fs(data_dir.clone()).with_file_ext(&config.file_ext());
    register_domain_types(&store, &config)?;

    tracing::debug!(data_dir = %data_dir.display(), "initialized shop context");
    Ok(ShopContext {
        store,
        config,
        data_dir,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StorageMode;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_data_dir_wins() {
        let temp = TempDir::new().unwrap();
        let resolved = resolve_data_dir(Some(temp.path().to_path_buf())).unwrap();
        assert_eq!(resolved, temp.path());
    }

    #[test]
    fn test_initialize_registers_domain_types() {
        let temp = TempDir::new().unwrap();
        let ctx = initialize(Some(temp.path().to_path_buf())).unwrap();

        let receipts = ctx.store.descriptor::<Receipt>().unwrap();
        assert_eq!(receipts.mode, StorageMode::Sharded);
        assert_eq!(receipts.directory, temp.path().join("receipts"));

        let names: Vec<&str> = ctx
            .store
            .registered_types()
            .unwrap()
            .iter()
            .map(|d| d.type_name)
            .collect();
        assert_eq!(
            names,
            vec!["CashDesk", "Cashier", "Client", "Product", "Receipt", "Store"]
        );
    }

    #[test]
    fn test_config_file_is_honored() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "file_ext = \"json\"\nreceipts_dir = \"sales\"\nreceipts_sharded = false\n",
        )
        .unwrap();

        let ctx = initialize(Some(temp.path().to_path_buf())).unwrap();
        assert_eq!(ctx.config.file_ext(), ".json");
        assert_eq!(ctx.store.file_ext(), ".json");

        let receipts = ctx.store.descriptor::<Receipt>().unwrap();
        assert_eq!(receipts.mode, StorageMode::Collection);
        assert_eq!(receipts.directory, temp.path().join("sales"));
        assert_eq!(receipts.file_name, "Receipt.json");
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let ctx = initialize(Some(temp.path().to_path_buf())).unwrap();
        assert_eq!(ctx.config, ShopConfig::default());
    }
}
