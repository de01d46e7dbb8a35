use super::{require_name, require_non_negative, DataService};
use crate::error::Result;
use crate::model::Cashier;
use crate::store::backend::StorageBackend;
use crate::store::RecordStore;

pub struct CashierService<'s, B: StorageBackend> {
    store: &'s RecordStore<B>,
}

impl<'s, B: StorageBackend> CashierService<'s, B> {
    pub fn new(store: &'s RecordStore<B>) -> Self {
        Self { store }
    }

    /// Sum of every cashier's salary.
    pub fn total_salaries(&self) -> Result<f64> {
        Ok(self
            .get_all_entities()?
            .iter()
            .map(|cashier| cashier.salary)
            .sum())
    }
}

impl<B: StorageBackend> DataService<B> for CashierService<'_, B> {
    type Entity = Cashier;

    fn store(&self) -> &RecordStore<B> {
        self.store
    }

    fn validate_entity(&self, cashier: &Cashier) -> Result<()> {
        require_name(cashier, &cashier.name)?;
        require_non_negative(cashier, "salary", cashier.salary)
    }
}
