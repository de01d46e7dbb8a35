//! Command handlers. Each returns the JSON value the command prints.

use super::setup::RecordKind;
use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use serde_json::{json, Value};
use shopsimapp::init::ShopContext;
use shopsimapp::model::RecordId;
use shopsimapp::service::{
    CashDeskService, CashierService, ClientService, DataService, ProductService, ReceiptService,
    StoreService,
};
use shopsimapp::store::fs_backend::FsBackend;
use shopsimapp::store::RecordStore;

type Store = RecordStore<FsBackend>;

/// Binds `$service` to the service for `$kind` and evaluates `$body`.
macro_rules! with_service {
    ($kind:expr, $store:expr, $service:ident => $body:expr) => {
        match $kind {
            RecordKind::Client => {
                let $service = ClientService::new($store);
                $body
            }
            RecordKind::Cashier => {
                let $service = CashierService::new($store);
                $body
            }
            RecordKind::Product => {
                let $service = ProductService::new($store);
                $body
            }
            RecordKind::Store => {
                let $service = StoreService::new($store);
                $body
            }
            RecordKind::Receipt => {
                let $service = ReceiptService::new($store);
                $body
            }
            RecordKind::CashDesk => {
                let $service = CashDeskService::new($store);
                $body
            }
        }
    };
}

pub fn list(store: &Store, kind: RecordKind) -> Result<Value> {
    with_service!(kind, store, service => list_entities(&service))
}

pub fn show(store: &Store, kind: RecordKind, id: RecordId) -> Result<Value> {
    with_service!(kind, store, service => show_entity(&service, kind, id))
}

pub fn add(store: &Store, kind: RecordKind, json: &str) -> Result<Value> {
    with_service!(kind, store, service => add_entity(&service, kind, json))
}

pub fn remove(store: &Store, kind: RecordKind, id: RecordId) -> Result<Value> {
    with_service!(kind, store, service => remove_entity(&service, kind, id))
}

pub fn receipt_path(store: &Store, id: RecordId) -> Result<Value> {
    let receipts = ReceiptService::new(store);
    let receipt = receipts
        .find_entity_by_id(id)?
        .ok_or_else(|| anyhow!("receipt {id} not found"))?;
    let path = receipts.receipt_path(&receipt)?;
    Ok(json!({ "id": id, "path": path.display().to_string() }))
}

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub checked: usize,
    pub invalid: Vec<Problem>,
}

#[derive(Debug, Serialize)]
pub struct Problem {
    pub kind: String,
    pub reason: String,
}

/// Re-validates every stored record. Any invalid record makes the command
/// fail, with the full report in the error.
pub fn check(store: &Store) -> Result<Value> {
    let mut report = CheckReport {
        checked: 0,
        invalid: Vec::new(),
    };
    for kind in RecordKind::ALL {
        let (count, reasons) = with_service!(kind, store, service => check_entities(&service)?);
        report.checked += count;
        report.invalid.extend(reasons.into_iter().map(|reason| Problem {
            kind: kind.to_string(),
            reason,
        }));
    }

    if !report.invalid.is_empty() {
        bail!(
            "{} invalid record(s)\n{}",
            report.invalid.len(),
            serde_json::to_string_pretty(&report)?
        );
    }
    Ok(serde_json::to_value(report)?)
}

pub fn show_config(ctx: &ShopContext) -> Value {
    json!({
        "data_dir": ctx.data_dir.display().to_string(),
        "file_ext": ctx.config.file_ext(),
        "receipts_dir": ctx.config.receipts_dir,
        "receipts_sharded": ctx.config.receipts_sharded,
    })
}

fn list_entities<S: DataService<FsBackend>>(service: &S) -> Result<Value> {
    Ok(serde_json::to_value(service.get_all_entities()?)?)
}

fn show_entity<S: DataService<FsBackend>>(
    service: &S,
    kind: RecordKind,
    id: RecordId,
) -> Result<Value> {
    let entity = service
        .find_entity_by_id(id)?
        .ok_or_else(|| anyhow!("{kind} {id} not found"))?;
    Ok(serde_json::to_value(entity)?)
}

fn add_entity<S: DataService<FsBackend>>(
    service: &S,
    kind: RecordKind,
    json: &str,
) -> Result<Value> {
    let entity: S::Entity =
        serde_json::from_str(json).with_context(|| format!("invalid {kind} JSON"))?;
    let stored = service.create_entity(entity)?;
    tracing::info!(%kind, "record added");
    Ok(serde_json::to_value(stored)?)
}

fn remove_entity<S: DataService<FsBackend>>(
    service: &S,
    kind: RecordKind,
    id: RecordId,
) -> Result<Value> {
    let removed = service
        .remove_entity_by_id(id)
        .with_context(|| format!("cannot remove {kind} {id}"))?;
    Ok(serde_json::to_value(removed)?)
}

fn check_entities<S: DataService<FsBackend>>(service: &S) -> Result<(usize, Vec<String>)> {
    let entities = service.get_all_entities()?;
    let problems = entities
        .iter()
        .filter_map(|entity| service.validate_entity(entity).err())
        .map(|e| e.to_string())
        .collect();
    Ok((entities.len(), problems))
}
