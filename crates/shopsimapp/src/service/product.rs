use super::{require_name, require_non_negative, DataService};
use crate::error::Result;
use crate::model::Product;
use crate::store::backend::StorageBackend;
use crate::store::RecordStore;
use chrono::NaiveDate;

pub struct ProductService<'s, B: StorageBackend> {
    store: &'s RecordStore<B>,
}

impl<'s, B: StorageBackend> ProductService<'s, B> {
    pub fn new(store: &'s RecordStore<B>) -> Self {
        Self { store }
    }

    /// Products that have not expired on `today`.
    pub fn sellable_products(&self, today: NaiveDate) -> Result<Vec<Product>> {
        self.find_entities_by_filter(|product| product.is_sellable(today))
    }
}

impl<B: StorageBackend> DataService<B> for ProductService<'_, B> {
    type Entity = Product;

    fn store(&self) -> &RecordStore<B> {
        self.store
    }

    fn validate_entity(&self, product: &Product) -> Result<()> {
        require_name(product, &product.name)?;
        require_non_negative(product, "unit purchase price", product.unit_purchase_price)?;
        require_non_negative(product, "unit sale price", product.unit_sale_price)
    }
}
