//! Fixtures shared by unit tests (and by other crates with the
//! `test_utils` feature).

use crate::config::ShopConfig;
use crate::init::register_domain_types;
use crate::model::{Client, Product, ProductCategory};
use crate::store::mem_backend::MemBackend;
use crate::store::RecordStore;
use chrono::{NaiveDate, NaiveDateTime};

/// An in-memory store with every domain type registered the way
/// `initialize` registers them.
pub struct StoreFixture {
    pub store: RecordStore<MemBackend>,
}

impl Default for StoreFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreFixture {
    pub fn new() -> Self {
        let store = RecordStore::new("data", MemBackend::new());
        register_domain_types(&store, &ShopConfig::default())
            .expect("domain types register on a fresh store");
        Self { store }
    }

    pub fn with_clients(self, names: &[&str]) -> Self {
        for (i, name) in names.iter().enumerate() {
            self.store
                .add(Client::new(*name, 10.0 * (i + 1) as f64))
                .expect("fixture client");
        }
        self
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}

pub fn sample_time() -> NaiveDateTime {
    date(2025, 3, 10)
        .and_hms_opt(14, 5, 9)
        .expect("valid fixture time")
}

/// A food product selling at `sale_price`, expiring in 2030.
pub fn sample_product(name: &str, sale_price: f64) -> Product {
    let mut product = Product::new(name, sale_price / 2.0, ProductCategory::Food, date(2030, 1, 1));
    product.unit_sale_price = sale_price;
    product
}
