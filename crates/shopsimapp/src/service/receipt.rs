use super::{invalid, require_assigned, require_non_negative, DataService};
use crate::error::Result;
use crate::model::{Receipt, RecordId};
use crate::store::backend::StorageBackend;
use crate::store::RecordStore;
use std::path::PathBuf;

pub struct ReceiptService<'s, B: StorageBackend> {
    store: &'s RecordStore<B>,
}

impl<'s, B: StorageBackend> ReceiptService<'s, B> {
    pub fn new(store: &'s RecordStore<B>) -> Self {
        Self { store }
    }

    /// The file a stored receipt lives in. Receipts must be registered sharded.
    pub fn receipt_path(&self, receipt: &Receipt) -> Result<PathBuf> {
        self.store.file_path_for_record(receipt)
    }

    pub fn receipts_for_client(&self, client_id: RecordId) -> Result<Vec<Receipt>> {
        self.find_entities_by_filter(|receipt| receipt.client_id == client_id)
    }
}

impl<B: StorageBackend> DataService<B> for ReceiptService<'_, B> {
    type Entity = Receipt;

    fn store(&self) -> &RecordStore<B> {
        self.store
    }

    fn validate_entity(&self, receipt: &Receipt) -> Result<()> {
        require_assigned(receipt, "client", receipt.client_id)?;
        require_assigned(receipt, "cashier", receipt.cashier_id)?;
        require_non_negative(receipt, "total price", receipt.total_price)?;
        if receipt.purchased_products.is_empty() {
            return Err(invalid(receipt, "at least one purchased product is required"));
        }
        if let Some(line) = receipt
            .purchased_products
            .iter()
            .find(|line| line.quantity == 0)
        {
            return Err(invalid(
                receipt,
                format!("quantity of {} must be positive", line.product.name),
            ));
        }
        Ok(())
    }
}
