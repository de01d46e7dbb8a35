//! # Domain Model
//!
//! Every persisted type implements [`Record`]: a type name used for file naming
//! plus an integer identifier the store can read and assign. There is no
//! reflection involved; each type states its own identity.
//!
//! ## Identifiers
//!
//! - `0` means "not yet persisted". The store assigns `max + 1` on insert.
//! - Any other value is an explicit identifier and must be unique within its type.
//!
//! ## Records
//!
//! | Type | Storage (default) | Notes |
//! |------|-------------------|-------|
//! | [`Client`] | `Client.txt` | name + balance |
//! | [`Cashier`] | `Cashier.txt` | name + salary |
//! | [`Product`] | `Product.txt` | prices, category, expiration date |
//! | [`Store`] | `Store.txt` | staff, receipts and inventory by product id |
//! | [`CashDesk`] | `CashDesk.txt` | store + assigned cashier |
//! | [`Receipt`] | `receipts/Receipt_<id>.txt` | one file per receipt |
//!
//! Dates are encoded through [`crate::store::codec`] so the on-disk form is
//! always ISO-8601.

use crate::store::codec::{iso_date, iso_datetime};
use chrono::{NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type RecordId = u64;

/// A persistable domain entity with a unique-within-type identifier.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + 'static {
    /// Name used for default file names (`<TYPE_NAME>.txt`, `<TYPE_NAME>_<id>.txt`).
    const TYPE_NAME: &'static str;

    fn id(&self) -> RecordId;

    fn set_id(&mut self, id: RecordId);

    fn is_persisted(&self) -> bool {
        self.id() != 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductCategory {
    Food,
    NonFood,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(default)]
    pub id: RecordId,
    pub name: String,
    pub balance: f64,
}

impl Client {
    pub fn new(name: impl Into<String>, balance: f64) -> Self {
        Self {
            id: 0,
            name: name.into(),
            balance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cashier {
    #[serde(default)]
    pub id: RecordId,
    pub name: String,
    pub salary: f64,
}

impl Cashier {
    pub fn new(name: impl Into<String>, salary: f64) -> Self {
        Self {
            id: 0,
            name: name.into(),
            salary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub id: RecordId,
    pub name: String,
    pub unit_purchase_price: f64,
    #[serde(default)]
    pub unit_sale_price: f64,
    pub category: ProductCategory,
    #[serde(with = "iso_date")]
    pub expiration_date: NaiveDate,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        unit_purchase_price: f64,
        category: ProductCategory,
        expiration_date: NaiveDate,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            unit_purchase_price,
            unit_sale_price: 0.0,
            category,
            expiration_date,
        }
    }

    /// Expired strictly after the expiration date; the last day is still sellable.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        today > self.expiration_date
    }

    pub fn is_sellable(&self, today: NaiveDate) -> bool {
        !self.is_expired(today)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    #[serde(default)]
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub cashier_ids: Vec<RecordId>,
    #[serde(default)]
    pub receipt_ids: Vec<RecordId>,
    /// Quantity on hand, keyed by product id.
    #[serde(default)]
    pub products_in_stock: BTreeMap<RecordId, u32>,
    /// Quantity sold, keyed by product id.
    #[serde(default)]
    pub products_sold: BTreeMap<RecordId, u32>,
    #[serde(default)]
    pub markup_percentages: BTreeMap<ProductCategory, f64>,
    #[serde(default)]
    pub days_before_expiration_threshold: i64,
    #[serde(default)]
    pub discount_percent_near_expiration: f64,
}

impl Store {
    pub fn new(
        name: impl Into<String>,
        markup_percentages: BTreeMap<ProductCategory, f64>,
        days_before_expiration_threshold: i64,
        discount_percent_near_expiration: f64,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            cashier_ids: Vec::new(),
            receipt_ids: Vec::new(),
            products_in_stock: BTreeMap::new(),
            products_sold: BTreeMap::new(),
            markup_percentages,
            days_before_expiration_threshold,
            discount_percent_near_expiration,
        }
    }

    pub fn add_cashier_id(&mut self, cashier_id: RecordId) {
        if !self.cashier_ids.contains(&cashier_id) {
            self.cashier_ids.push(cashier_id);
        }
    }

    pub fn remove_cashier_id(&mut self, cashier_id: RecordId) {
        self.cashier_ids.retain(|id| *id != cashier_id);
    }

    pub fn add_receipt_id(&mut self, receipt_id: RecordId) {
        if !self.receipt_ids.contains(&receipt_id) {
            self.receipt_ids.push(receipt_id);
        }
    }

    pub fn remove_receipt_id(&mut self, receipt_id: RecordId) {
        self.receipt_ids.retain(|id| *id != receipt_id);
    }

    pub fn add_product_stock(&mut self, product_id: RecordId, quantity: u32) {
        *self.products_in_stock.entry(product_id).or_insert(0) += quantity;
    }

    /// Takes `quantity` out of stock. Returns false (and leaves stock alone)
    /// when there is not enough on hand.
    pub fn remove_product_stock(&mut self, product_id: RecordId, quantity: u32) -> bool {
        take_quantity(&mut self.products_in_stock, product_id, quantity)
    }

    pub fn add_product_sold(&mut self, product_id: RecordId, quantity: u32) {
        *self.products_sold.entry(product_id).or_insert(0) += quantity;
    }

    pub fn remove_product_sold(&mut self, product_id: RecordId, quantity: u32) -> bool {
        take_quantity(&mut self.products_sold, product_id, quantity)
    }

    pub fn product_stock(&self, product_id: RecordId) -> u32 {
        self.products_in_stock
            .get(&product_id)
            .copied()
            .unwrap_or(0)
    }
}

fn take_quantity(counts: &mut BTreeMap<RecordId, u32>, key: RecordId, quantity: u32) -> bool {
    let current = counts.get(&key).copied().unwrap_or(0);
    if current < quantity {
        return false;
    }
    counts.insert(key, current - quantity);
    true
}

/// One receipt line: the product as it was sold, plus the quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchasedProduct {
    pub product: Product,
    pub quantity: u32,
}

impl PurchasedProduct {
    pub fn line_total(&self) -> f64 {
        self.product.unit_sale_price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    #[serde(default)]
    pub id: RecordId,
    pub client_id: RecordId,
    pub cashier_id: RecordId,
    #[serde(with = "iso_datetime")]
    pub date_time: NaiveDateTime,
    pub purchased_products: Vec<PurchasedProduct>,
    pub total_price: f64,
}

impl Receipt {
    pub fn new(
        client_id: RecordId,
        cashier_id: RecordId,
        date_time: NaiveDateTime,
        purchased_products: Vec<PurchasedProduct>,
    ) -> Self {
        let total_price = purchased_products.iter().map(|p| p.line_total()).sum();
        Self {
            id: 0,
            client_id,
            cashier_id,
            date_time,
            purchased_products,
            total_price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashDesk {
    #[serde(default)]
    pub id: RecordId,
    pub store_id: RecordId,
    pub cashier_id: RecordId,
}

impl CashDesk {
    pub fn new(store_id: RecordId, cashier_id: RecordId) -> Self {
        Self {
            id: 0,
            store_id,
            cashier_id,
        }
    }
}

macro_rules! impl_record {
    ($($ty:ident),* $(,)?) => {
        $(
            impl Record for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                fn id(&self) -> RecordId {
                    self.id
                }

                fn set_id(&mut self, id: RecordId) {
                    self.id = id;
                }
            }
        )*
    };
}

impl_record!(Client, Cashier, Product, Store, Receipt, CashDesk);
