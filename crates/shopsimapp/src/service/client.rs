use super::{require_name, require_non_negative, DataService};
use crate::error::Result;
use crate::model::Client;
use crate::store::backend::StorageBackend;
use crate::store::RecordStore;

pub struct ClientService<'s, B: StorageBackend> {
    store: &'s RecordStore<B>,
}

impl<'s, B: StorageBackend> ClientService<'s, B> {
    pub fn new(store: &'s RecordStore<B>) -> Self {
        Self { store }
    }

    /// First client whose name matches, ignoring case and surrounding spaces.
    pub fn find_by_name(&self, name: &str) -> Result<Option<Client>> {
        let wanted = name.trim().to_lowercase();
        self.find_entity_by_filter(|client| client.name.trim().to_lowercase() == wanted)
    }
}

impl<B: StorageBackend> DataService<B> for ClientService<'_, B> {
    type Entity = Client;

    fn store(&self) -> &RecordStore<B> {
        self.store
    }

    fn validate_entity(&self, client: &Client) -> Result<()> {
        require_name(client, &client.name)?;
        require_non_negative(client, "balance", client.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::test_utils::StoreFixture;

    #[test]
    fn create_assigns_id_and_persists() {
        let fixture = StoreFixture::new();
        let service = ClientService::new(&fixture.store);

        let ana = service.create_entity(Client::new("Ana", 120.0)).unwrap();
        assert_eq!(ana.id, 1);
        assert_eq!(service.find_entity_by_id(1).unwrap(), Some(ana));
    }

    #[test]
    fn negative_balance_is_rejected_before_storing() {
        let fixture = StoreFixture::new();
        let service = ClientService::new(&fixture.store);

        let err = service.create_entity(Client::new("Ana", -5.0)).unwrap_err();
        assert!(matches!(err, StoreError::InvalidEntity { type_name: "Client", .. }));
        assert!(err.to_string().contains("balance"));
        assert!(service.get_all_entities().unwrap().is_empty());
    }

    #[test]
    fn update_keeps_other_records() {
        let fixture = StoreFixture::new().with_clients(&["Ana", "Bo", "Cy"]);
        let service = ClientService::new(&fixture.store);

        let mut bo = service.find_by_name("bo").unwrap().unwrap();
        bo.balance = 7.5;
        service.update_entity(bo.clone()).unwrap();

        let all = service.get_all_entities().unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(service.find_entity_by_id(bo.id).unwrap(), Some(bo));
    }

    #[test]
    fn update_of_unknown_id_is_not_found() {
        let fixture = StoreFixture::new();
        let service = ClientService::new(&fixture.store);

        let mut ghost = Client::new("Ghost", 1.0);
        ghost.id = 9;
        let err = service.update_entity(ghost).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn remove_by_id() {
        let fixture = StoreFixture::new().with_clients(&["Ana", "Bo"]);
        let service = ClientService::new(&fixture.store);

        let removed = service.remove_entity_by_id(1).unwrap();
        assert_eq!(removed.name, "Ana");
        assert!(service.find_by_name("Ana").unwrap().is_none());
        assert!(matches!(
            service.remove_entity_by_id(1).unwrap_err(),
            StoreError::NotFound { .. }
        ));
    }
}
