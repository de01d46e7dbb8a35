//! # Domain Services
//!
//! One service per record type. A service borrows the shared [`RecordStore`]
//! and adds two things on top of it: validation before every write, and a few
//! type-specific queries.
//!
//! The generic CRUD surface lives in [`DataService`] as provided methods, so a
//! concrete service only states its entity type, hands out its store and
//! implements [`DataService::validate_entity`].
//!
//! ```ignore
//! let clients = ClientService::new(&store);
//! let ana = clients.create_entity(Client::new("Ana", 120.0))?;
//! assert_eq!(clients.find_entity_by_id(ana.id)?, Some(ana));
//! ```

use crate::error::{Result, StoreError};
use crate::model::{Record, RecordId};
use crate::store::backend::StorageBackend;
use crate::store::RecordStore;

pub mod cash_desk;
pub mod cashier;
pub mod client;
pub mod product;
pub mod receipt;
pub mod store;

pub use cash_desk::CashDeskService;
pub use cashier::CashierService;
pub use client::ClientService;
pub use product::ProductService;
pub use receipt::ReceiptService;
pub use store::StoreService;

/// Validated CRUD over one record type.
pub trait DataService<B: StorageBackend> {
    type Entity: Record;

    fn store(&self) -> &RecordStore<B>;

    /// Checks the type's invariants. Fails with [`StoreError::InvalidEntity`].
    fn validate_entity(&self, entity: &Self::Entity) -> Result<()>;

    /// Validates, then stores `entity` under a fresh id (or its own, if set).
    fn create_entity(&self, entity: Self::Entity) -> Result<Self::Entity> {
        self.validate_entity(&entity)?;
        self.store().add(entity)
    }

    /// Validates, then replaces the stored record with the same id.
    fn update_entity(&self, entity: Self::Entity) -> Result<Self::Entity> {
        self.validate_entity(&entity)?;
        let id = entity.id();
        self.store()
            .update(entity, |stored: &Self::Entity| stored.id() == id)
    }

    fn find_entity_by_id(&self, id: RecordId) -> Result<Option<Self::Entity>> {
        self.store().find_by_id(id)
    }

    fn get_all_entities(&self) -> Result<Vec<Self::Entity>> {
        self.store().collection()
    }

    fn find_entity_by_filter<F>(&self, filter: F) -> Result<Option<Self::Entity>>
    where
        F: Fn(&Self::Entity) -> bool,
    {
        self.store().find_one(filter)
    }

    fn find_entities_by_filter<F>(&self, filter: F) -> Result<Vec<Self::Entity>>
    where
        F: Fn(&Self::Entity) -> bool,
    {
        self.store().find_all(filter)
    }

    fn remove_entity_by_id(&self, id: RecordId) -> Result<Self::Entity> {
        self.store()
            .remove(|stored: &Self::Entity| stored.id() == id)
    }
}

// --- Validation helpers ---

pub(crate) fn require_name<T: Record>(entity: &T, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(invalid(entity, "name must not be empty"));
    }
    Ok(())
}

pub(crate) fn require_non_negative<T: Record>(entity: &T, field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(invalid(entity, format!("{field} must be a finite number")));
    }
    if value < 0.0 {
        return Err(invalid(entity, format!("{field} must not be negative ({value})")));
    }
    Ok(())
}

pub(crate) fn require_assigned<T: Record>(entity: &T, field: &str, id: RecordId) -> Result<()> {
    if id == 0 {
        return Err(invalid(entity, format!("{field} must be assigned")));
    }
    Ok(())
}

pub(crate) fn invalid<T: Record>(entity: &T, reason: impl AsRef<str>) -> StoreError {
    StoreError::invalid(
        T::TYPE_NAME,
        format!("{} (id {})", reason.as_ref(), entity.id()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Client;

    #[test]
    fn reasons_name_field_and_id() {
        let mut client = Client::new("Ana", -1.0);
        client.id = 4;
        let err = require_non_negative(&client, "balance", client.balance).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid Client: balance must not be negative (-1) (id 4)"
        );
    }

    #[test]
    fn blank_names_are_rejected() {
        let client = Client::new("   ", 1.0);
        assert!(require_name(&client, &client.name).is_err());
        assert!(require_name(&client, "Ana").is_ok());
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let client = Client::new("Ana", f64::NAN);
        assert!(require_non_negative(&client, "balance", client.balance).is_err());
        assert!(require_non_negative(&client, "balance", f64::INFINITY).is_err());
        assert!(require_non_negative(&client, "balance", 0.0).is_ok());
    }

    #[test]
    fn unassigned_references_are_rejected() {
        let client = Client::new("Ana", 1.0);
        let err = require_assigned(&client, "cashier", 0).unwrap_err();
        assert!(err.to_string().contains("cashier must be assigned"));
        assert!(require_assigned(&client, "cashier", 3).is_ok());
    }
}
