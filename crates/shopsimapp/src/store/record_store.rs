use super::backend::StorageBackend;
use super::cache::{lock, CollectionCache};
use super::fs_backend::FsBackend;
use super::{codec, ids, normalize_ext, SaveReport, StorageMode, TypeDescriptor, DEFAULT_FILE_EXT};
use crate::error::{Result, StoreError};
use crate::model::{Record, RecordId};
use std::any::TypeId;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, warn};

type LoadFn<B> = fn(&RecordStore<B>) -> Result<usize>;
type SaveFn<B> = fn(&RecordStore<B>) -> Result<SaveReport>;

struct Registration<B: StorageBackend> {
    descriptor: TypeDescriptor,
    load: LoadFn<B>,
    save: SaveFn<B>,
}

/// Typed record persistence over a [`StorageBackend`].
///
/// Share one instance (by reference or `Arc`) between every service and
/// thread of the process. Operations on different types never block each
/// other; operations on the same type are serialized.
pub struct RecordStore<B: StorageBackend> {
    root: PathBuf,
    file_ext: String,
    backend: B,
    registry: RwLock<HashMap<TypeId, Registration<B>>>,
    cache: CollectionCache,
}

impl RecordStore<FsBackend> {
    /// A store writing under `root` on the local file system.
    pub fn new_fs(root: impl Into<PathBuf>) -> Self {
        Self::new(root, FsBackend::new())
    }
}

impl<B: StorageBackend> RecordStore<B> {
    pub fn new(root: impl Into<PathBuf>, backend: B) -> Self {
        Self {
            root: root.into(),
            file_ext: DEFAULT_FILE_EXT.to_string(),
            backend,
            registry: RwLock::new(HashMap::new()),
            cache: CollectionCache::new(),
        }
    }

    /// Use `ext` instead of `.txt` for every file. Call before registering types.
    pub fn with_file_ext(mut self, ext: &str) -> Self {
        self.file_ext = normalize_ext(ext);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn file_ext(&self) -> &str {
        &self.file_ext
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // --- Registration ---

    /// Binds `T` to a collection file in the data root.
    /// `file_name` defaults to `<TypeName><ext>`.
    pub fn register_type<T: Record>(&self, file_name: Option<&str>) -> Result<()> {
        let file_name = file_name
            .map(str::to_string)
            .unwrap_or_else(|| self.default_file_name::<T>());
        self.install::<T>(TypeDescriptor {
            type_name: T::TYPE_NAME,
            file_name,
            directory: self.root.clone(),
            mode: StorageMode::Collection,
        })
    }

    /// Binds `T` to `dir` (relative paths resolve against the data root) in
    /// the given mode.
    pub fn register_type_with_custom_dir<T: Record>(
        &self,
        dir: impl AsRef<Path>,
        mode: StorageMode,
    ) -> Result<()> {
        let dir = dir.as_ref();
        let directory = if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            self.root.join(dir)
        };
        self.install::<T>(TypeDescriptor {
            type_name: T::TYPE_NAME,
            file_name: self.default_file_name::<T>(),
            directory,
            mode,
        })
    }

    /// The descriptor `T` is stored under. An unregistered type is registered
    /// with the defaults on first use.
    pub fn descriptor<T: Record>(&self) -> Result<TypeDescriptor> {
        {
            let registry = self.registry.read().map_err(|_| poisoned())?;
            if let Some(registration) = registry.get(&TypeId::of::<T>()) {
                return Ok(registration.descriptor.clone());
            }
        }
        let descriptor = TypeDescriptor {
            type_name: T::TYPE_NAME,
            file_name: self.default_file_name::<T>(),
            directory: self.root.clone(),
            mode: StorageMode::Collection,
        };
        let mut registry = self.registry.write().map_err(|_| poisoned())?;
        let registration = registry
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Self::registration::<T>(descriptor));
        Ok(registration.descriptor.clone())
    }

    /// Descriptors of every known type, ordered by type name.
    pub fn registered_types(&self) -> Result<Vec<TypeDescriptor>> {
        let registry = self.registry.read().map_err(|_| poisoned())?;
        let mut descriptors: Vec<TypeDescriptor> = registry
            .values()
            .map(|registration| registration.descriptor.clone())
            .collect();
        descriptors.sort_by_key(|descriptor| descriptor.type_name);
        Ok(descriptors)
    }

    fn install<T: Record>(&self, descriptor: TypeDescriptor) -> Result<()> {
        let mut registry = self.registry.write().map_err(|_| poisoned())?;
        if let Some(existing) = registry.get(&TypeId::of::<T>()) {
            if existing.descriptor == descriptor {
                return Ok(());
            }
            return Err(StoreError::Store(format!(
                "{} is already registered as {:?} in {}",
                T::TYPE_NAME,
                existing.descriptor.mode,
                existing.descriptor.directory.display()
            )));
        }
        debug!(
            type_name = T::TYPE_NAME,
            dir = %descriptor.directory.display(),
            mode = ?descriptor.mode,
            "registered record type"
        );
        registry.insert(TypeId::of::<T>(), Self::registration::<T>(descriptor));
        Ok(())
    }

    fn registration<T: Record>(descriptor: TypeDescriptor) -> Registration<B> {
        Registration {
            descriptor,
            load: Self::load_type::<T>,
            save: Self::save_type::<T>,
        }
    }

    fn default_file_name<T: Record>(&self) -> String {
        format!("{}{}", T::TYPE_NAME, self.file_ext)
    }

    // --- Mutations ---

    /// Appends `record` and persists it.
    ///
    /// An id of 0 is replaced with `max + 1`; any other id must be unused.
    /// Returns the record as stored. If the write fails the record stays in
    /// memory and the error is returned.
    pub fn add<T: Record>(&self, mut record: T) -> Result<T> {
        self.with_collection::<T, _, _>(|descriptor, records| {
            let id = ids::assign_id(records, &mut record)?;
            records.push(record.clone());
            match descriptor.mode {
                StorageMode::Collection => self.write_collection(descriptor, records)?,
                StorageMode::Sharded => self.write_shard(descriptor, &record)?,
            }
            debug!(type_name = T::TYPE_NAME, id, "added record");
            Ok(record)
        })
    }

    /// Replaces the first record matching `matcher` with `record`.
    ///
    /// A zero id on `record` keeps the replaced record's id. Changing the id
    /// of a sharded record moves it to a new file.
    pub fn update<T, F>(&self, mut record: T, matcher: F) -> Result<T>
    where
        T: Record,
        F: Fn(&T) -> bool,
    {
        self.with_collection::<T, _, _>(|descriptor, records| {
            let Some(position) = records.iter().position(|item| matcher(item)) else {
                return Err(StoreError::not_found(
                    T::TYPE_NAME,
                    "no record matches the update",
                ));
            };
            let previous_id = records[position].id();
            if record.id() == 0 {
                record.set_id(previous_id);
            }
            let new_id = record.id();
            if new_id != previous_id && records.iter().any(|item| item.id() == new_id) {
                return Err(StoreError::DuplicateKey {
                    type_name: T::TYPE_NAME,
                    id: new_id,
                });
            }

            records[position] = record.clone();
            match descriptor.mode {
                StorageMode::Collection => self.write_collection(descriptor, records)?,
                StorageMode::Sharded => {
                    self.write_shard(descriptor, &record)?;
                    if new_id != previous_id {
                        self.delete_shard(descriptor, previous_id)?;
                    }
                }
            }
            debug!(type_name = T::TYPE_NAME, id = new_id, "updated record");
            Ok(record)
        })
    }

    /// Removes the first record matching `matcher` and returns it.
    ///
    /// A sharded record's file is deleted before the record leaves memory, so
    /// a failed delete keeps both in place.
    pub fn remove<T, F>(&self, matcher: F) -> Result<T>
    where
        T: Record,
        F: Fn(&T) -> bool,
    {
        self.with_collection::<T, _, _>(|descriptor, records| {
            let Some(position) = records.iter().position(|item| matcher(item)) else {
                return Err(StoreError::not_found(
                    T::TYPE_NAME,
                    "no record matches the removal",
                ));
            };
            let removed = match descriptor.mode {
                StorageMode::Collection => {
                    let removed = records.remove(position);
                    self.write_collection(descriptor, records)?;
                    removed
                }
                StorageMode::Sharded => {
                    self.delete_shard(descriptor, records[position].id())?;
                    records.remove(position)
                }
            };
            debug!(type_name = T::TYPE_NAME, id = removed.id(), "removed record");
            Ok(removed)
        })
    }

    // --- Queries ---

    /// Snapshot of every record of `T`, in stored order.
    pub fn collection<T: Record>(&self) -> Result<Vec<T>> {
        self.with_collection::<T, _, _>(|_, records| Ok(records.clone()))
    }

    pub fn count<T: Record>(&self) -> Result<usize> {
        self.with_collection::<T, _, _>(|_, records| Ok(records.len()))
    }

    pub fn find_one<T, F>(&self, predicate: F) -> Result<Option<T>>
    where
        T: Record,
        F: Fn(&T) -> bool,
    {
        self.with_collection::<T, _, _>(|_, records| {
            Ok(records.iter().find(|item| predicate(item)).cloned())
        })
    }

    pub fn find_all<T, F>(&self, predicate: F) -> Result<Vec<T>>
    where
        T: Record,
        F: Fn(&T) -> bool,
    {
        self.with_collection::<T, _, _>(|_, records| {
            Ok(records
                .iter()
                .filter(|item| predicate(item))
                .cloned()
                .collect())
        })
    }

    pub fn find_by_id<T: Record>(&self, id: RecordId) -> Result<Option<T>> {
        self.find_one(|item: &T| item.id() == id)
    }

    /// Where a sharded record's file lives. Only meaningful in Sharded mode.
    pub fn file_path_for_record<T: Record>(&self, record: &T) -> Result<PathBuf> {
        let descriptor = self.descriptor::<T>()?;
        if descriptor.mode != StorageMode::Sharded {
            return Err(StoreError::Store(format!(
                "{} is not stored one file per record",
                T::TYPE_NAME
            )));
        }
        let file_name = descriptor.shard_file_name(record.id(), &self.file_ext);
        Ok(self.backend.path_of(&descriptor.directory, &file_name))
    }

    // --- Whole-store operations ---

    /// Loads every registered type that is not yet in memory.
    /// Returns the total number of records held afterwards.
    pub fn load_all(&self) -> Result<usize> {
        let loaders: Vec<LoadFn<B>> = {
            let registry = self.registry.read().map_err(|_| poisoned())?;
            registry.values().map(|registration| registration.load).collect()
        };
        let mut total = 0;
        for load in loaders {
            total += load(self)?;
        }
        debug!(records = total, "loaded all collections");
        Ok(total)
    }

    /// Writes every loaded collection back to its files.
    ///
    /// Collection-mode write errors are returned immediately. Sharded records
    /// that fail to write are logged, counted in the report and skipped.
    pub fn save_all(&self) -> Result<SaveReport> {
        let savers: Vec<SaveFn<B>> = {
            let registry = self.registry.read().map_err(|_| poisoned())?;
            registry.values().map(|registration| registration.save).collect()
        };
        let mut report = SaveReport::default();
        for save in savers {
            report.merge(save(self)?);
        }
        debug!(
            types = report.types_saved,
            written = report.records_written,
            failed = report.records_failed,
            "saved all collections"
        );
        Ok(report)
    }

    /// Forgets every in-memory collection; the next access reloads from disk.
    pub fn clear_cache(&self) -> Result<()> {
        self.cache.clear()
    }

    /// Forgets the in-memory collection of `T` only.
    pub fn evict<T: Record>(&self) -> Result<()> {
        self.cache.evict::<T>()
    }

    /// Names of the types currently held in memory.
    pub fn loaded_types(&self) -> Result<Vec<&'static str>> {
        self.cache.loaded_types()
    }

    // --- Internals ---

    /// Runs `f` on the collection of `T` with the type's lock held,
    /// loading it from the backend first if needed.
    fn with_collection<T, R, F>(&self, f: F) -> Result<R>
    where
        T: Record,
        F: FnOnce(&TypeDescriptor, &mut Vec<T>) -> Result<R>,
    {
        let descriptor = self.descriptor::<T>()?;
        let slot = self.cache.slot::<T>()?;
        let mut guard = lock(&slot)?;
        let records = match guard.take() {
            Some(records) => records,
            None => self.read_collection::<T>(&descriptor)?,
        };
        let records = guard.insert(records);
        f(&descriptor, records)
    }

    fn read_collection<T: Record>(&self, descriptor: &TypeDescriptor) -> Result<Vec<T>> {
        let records = match descriptor.mode {
            StorageMode::Collection => {
                match self.backend.read(&descriptor.directory, &descriptor.file_name)? {
                    Some(payload) => codec::decode_list(&payload)?,
                    None => Vec::new(),
                }
            }
            StorageMode::Sharded => self.read_shards(descriptor)?,
        };
        debug!(
            type_name = T::TYPE_NAME,
            count = records.len(),
            "loaded collection"
        );
        Ok(records)
    }

    fn read_shards<T: Record>(&self, descriptor: &TypeDescriptor) -> Result<Vec<T>> {
        let names = self.backend.list(
            &descriptor.directory,
            &descriptor.shard_prefix(),
            &self.file_ext,
        )?;

        let prefix = descriptor.shard_prefix();
        let mut records: Vec<T> = Vec::with_capacity(names.len());
        for name in names {
            let file_id = name
                .strip_prefix(&prefix)
                .and_then(|rest| rest.strip_suffix(&self.file_ext))
                .and_then(|id| id.parse::<RecordId>().ok())
                .filter(|id| *id != 0);
            let Some(file_id) = file_id else {
                warn!(file = %name, "skipping shard without a valid id in its name");
                continue;
            };

            let decoded = self
                .backend
                .read(&descriptor.directory, &name)
                .and_then(|payload| match payload {
                    Some(payload) => codec::decode::<T>(&payload).map(Some),
                    None => Ok(None),
                });
            match decoded {
                Ok(Some(record)) => {
                    if record.id() != file_id {
                        warn!(
                            file = %name,
                            id = record.id(),
                            "skipping shard whose id does not match its file name"
                        );
                        continue;
                    }
                    if records.iter().any(|item| item.id() == record.id()) {
                        warn!(file = %name, id = record.id(), "skipping shard with duplicate id");
                        continue;
                    }
                    records.push(record);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(file = %name, error = %e, "skipping unreadable shard");
                }
            }
        }
        records.sort_by_key(Record::id);
        Ok(records)
    }

    fn write_collection<T: Record>(&self, descriptor: &TypeDescriptor, records: &[T]) -> Result<()> {
        let payload = codec::encode_list(records)?;
        self.backend.write(&descriptor.directory, &descriptor.file_name, &payload)
    }

    fn write_shard<T: Record>(&self, descriptor: &TypeDescriptor, record: &T) -> Result<()> {
        let payload = codec::encode(record)?;
        let file_name = descriptor.shard_file_name(record.id(), &self.file_ext);
        self.backend.write(&descriptor.directory, &file_name, &payload)
    }

    fn delete_shard(&self, descriptor: &TypeDescriptor, id: RecordId) -> Result<()> {
        let file_name = descriptor.shard_file_name(id, &self.file_ext);
        self.backend.delete(&descriptor.directory, &file_name)
    }

    fn load_type<T: Record>(store: &RecordStore<B>) -> Result<usize> {
        store.count::<T>()
    }

    fn save_type<T: Record>(store: &RecordStore<B>) -> Result<SaveReport> {
        let descriptor = store.descriptor::<T>()?;
        let slot = store.cache.slot::<T>()?;
        let guard = lock(&slot)?;
        let Some(records) = guard.as_ref() else {
            return Ok(SaveReport::default());
        };

        let mut report = SaveReport {
            types_saved: 1,
            ..SaveReport::default()
        };
        match descriptor.mode {
            StorageMode::Collection => {
                store.write_collection(&descriptor, records)?;
                report.records_written = records.len();
            }
            StorageMode::Sharded => {
                for record in records {
                    match store.write_shard(&descriptor, record) {
                        Ok(()) => report.records_written += 1,
                        Err(e) => {
                            warn!(
                                type_name = T::TYPE_NAME,
                                id = record.id(),
                                error = %e,
                                "failed to save record"
                            );
                            report.records_failed += 1;
                        }
                    }
                }
            }
        }
        Ok(report)
    }
}

fn poisoned() -> StoreError {
    StoreError::Store("type registry lock poisoned".to_string())
}
