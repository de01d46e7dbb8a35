use super::{require_name, DataService};
use crate::error::Result;
use crate::model::{RecordId, Store};
use crate::store::backend::StorageBackend;
use crate::store::RecordStore;

pub struct StoreService<'s, B: StorageBackend> {
    store: &'s RecordStore<B>,
}

impl<'s, B: StorageBackend> StoreService<'s, B> {
    pub fn new(store: &'s RecordStore<B>) -> Self {
        Self { store }
    }

    pub fn find_by_name(&self, name: &str) -> Result<Option<Store>> {
        let wanted = name.trim().to_lowercase();
        self.find_entity_by_filter(|shop| shop.name.trim().to_lowercase() == wanted)
    }

    /// Stores that employ the given cashier.
    pub fn stores_for_cashier(&self, cashier_id: RecordId) -> Result<Vec<Store>> {
        self.find_entities_by_filter(|shop| shop.cashier_ids.contains(&cashier_id))
    }
}

impl<B: StorageBackend> DataService<B> for StoreService<'_, B> {
    type Entity = Store;

    fn store(&self) -> &RecordStore<B> {
        self.store
    }

    fn validate_entity(&self, shop: &Store) -> Result<()> {
        require_name(shop, &shop.name)
    }
}
