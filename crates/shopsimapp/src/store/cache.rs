//! # Collection Cache
//!
//! One slot per record type, created on first touch and kept for the lifetime
//! of the owning [`super::RecordStore`]. A slot is `None` until its collection
//! has been loaded from the backend.
//!
//! The outer map is behind an `RwLock` so two types can be touched for the
//! first time concurrently. Each slot has its own `Mutex`; the record store
//! holds it across load, mutation and persistence, which serializes all
//! writers of one type without blocking other types.

use crate::error::{Result, StoreError};
use crate::model::Record;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

pub type Slot<T> = Mutex<Option<Vec<T>>>;

type ErasedSlot = Arc<dyn Any + Send + Sync>;

struct Entry {
    type_name: &'static str,
    slot: ErasedSlot,
    reset: fn(&(dyn Any + Send + Sync)) -> Result<()>,
    is_loaded: fn(&(dyn Any + Send + Sync)) -> bool,
}

#[derive(Default)]
pub struct CollectionCache {
    entries: RwLock<HashMap<TypeId, Entry>>,
}

impl CollectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The slot for `T`, created empty (unloaded) if this is the first touch.
    pub fn slot<T: Record>(&self) -> Result<Arc<Slot<T>>> {
        let key = TypeId::of::<T>();
        {
            let entries = self.entries.read().map_err(|_| poisoned())?;
            if let Some(entry) = entries.get(&key) {
                return downcast::<T>(entry);
            }
        }

        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        let entry = entries.entry(key).or_insert_with(|| Entry {
            type_name: T::TYPE_NAME,
            slot: Arc::new(Slot::<T>::new(None)),
            reset: reset_slot::<T>,
            is_loaded: slot_loaded::<T>,
        });
        downcast::<T>(entry)
    }

    /// Replace the cached list for `T`.
    pub fn put<T: Record>(&self, records: Vec<T>) -> Result<()> {
        let slot = self.slot::<T>()?;
        *lock(&slot)? = Some(records);
        Ok(())
    }

    pub fn is_loaded<T: Record>(&self) -> Result<bool> {
        let slot = self.slot::<T>()?;
        let guard = lock(&slot)?;
        Ok(guard.is_some())
    }

    /// Forget the cached list for `T`; the next access reloads from disk.
    pub fn evict<T: Record>(&self) -> Result<()> {
        let slot = self.slot::<T>()?;
        *lock(&slot)? = None;
        Ok(())
    }

    /// Forget every cached list.
    pub fn clear(&self) -> Result<()> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        for entry in entries.values() {
            (entry.reset)(entry.slot.as_ref())?;
        }
        Ok(())
    }

    /// Names of the types whose collection is currently in memory.
    pub fn loaded_types(&self) -> Result<Vec<&'static str>> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        let mut names: Vec<&'static str> = entries
            .values()
            .filter(|entry| (entry.is_loaded)(entry.slot.as_ref()))
            .map(|entry| entry.type_name)
            .collect();
        names.sort_unstable();
        Ok(names)
    }
}

pub(crate) fn lock<X>(mutex: &Mutex<X>) -> Result<MutexGuard<'_, X>> {
    mutex.lock().map_err(|_| poisoned())
}

fn poisoned() -> StoreError {
    StoreError::Store("collection cache lock poisoned".to_string())
}

fn downcast<T: Record>(entry: &Entry) -> Result<Arc<Slot<T>>> {
    Arc::clone(&entry.slot)
        .downcast::<Slot<T>>()
        .map_err(|_| StoreError::Store(format!("cache slot type mismatch for {}", T::TYPE_NAME)))
}

fn reset_slot<T: Record>(slot: &(dyn Any + Send + Sync)) -> Result<()> {
    if let Some(slot) = slot.downcast_ref::<Slot<T>>() {
        *lock(slot)? = None;
    }
    Ok(())
}

fn slot_loaded<T: Record>(slot: &(dyn Any + Send + Sync)) -> bool {
    slot.downcast_ref::<Slot<T>>()
        .and_then(|slot| slot.lock().ok().map(|guard| guard.is_some()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cashier, Client};

    #[test]
    fn slots_start_unloaded() {
        let cache = CollectionCache::new();
        assert!(!cache.is_loaded::<Client>().unwrap());
        assert!(cache.loaded_types().unwrap().is_empty());
    }

    #[test]
    fn put_then_evict() {
        let cache = CollectionCache::new();
        cache.put(vec![Client::new("Ana", 1.0)]).unwrap();
        assert!(cache.is_loaded::<Client>().unwrap());

        cache.evict::<Client>().unwrap();
        assert!(!cache.is_loaded::<Client>().unwrap());
    }

    #[test]
    fn same_slot_is_returned_per_type() {
        let cache = CollectionCache::new();
        let a = cache.slot::<Client>().unwrap();
        let b = cache.slot::<Client>().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn clear_resets_every_type() {
        let cache = CollectionCache::new();
        cache.put(vec![Client::new("Ana", 1.0)]).unwrap();
        cache.put(vec![Cashier::new("Ivo", 900.0)]).unwrap();
        assert_eq!(cache.loaded_types().unwrap(), vec!["Cashier", "Client"]);

        cache.clear().unwrap();
        assert!(cache.loaded_types().unwrap().is_empty());
    }
}
