use super::{require_assigned, DataService};
use crate::error::Result;
use crate::model::{CashDesk, RecordId};
use crate::store::backend::StorageBackend;
use crate::store::RecordStore;

pub struct CashDeskService<'s, B: StorageBackend> {
    store: &'s RecordStore<B>,
}

impl<'s, B: StorageBackend> CashDeskService<'s, B> {
    pub fn new(store: &'s RecordStore<B>) -> Self {
        Self { store }
    }

    pub fn desks_for_store(&self, store_id: RecordId) -> Result<Vec<CashDesk>> {
        self.find_entities_by_filter(|desk| desk.store_id == store_id)
    }
}

impl<B: StorageBackend> DataService<B> for CashDeskService<'_, B> {
    type Entity = CashDesk;

    fn store(&self) -> &RecordStore<B> {
        self.store
    }

    fn validate_entity(&self, desk: &CashDesk) -> Result<()> {
        require_assigned(desk, "cashier", desk.cashier_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::StoreFixture;

    #[test]
    fn desks_group_by_store() {
        let fixture = StoreFixture::new();
        let service = CashDeskService::new(&fixture.store);
        service.create_entity(CashDesk::new(1, 10)).unwrap();
        service.create_entity(CashDesk::new(1, 11)).unwrap();
        service.create_entity(CashDesk::new(2, 12)).unwrap();

        assert_eq!(service.desks_for_store(1).unwrap().len(), 2);
        assert_eq!(service.desks_for_store(3).unwrap().len(), 0);
    }

    #[test]
    fn desk_needs_a_cashier() {
        let fixture = StoreFixture::new();
        let service = CashDeskService::new(&fixture.store);
        let err = service.create_entity(CashDesk::new(1, 0)).unwrap_err();
        assert!(err.to_string().contains("cashier must be assigned"));
    }
}
