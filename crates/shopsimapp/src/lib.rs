//! # Shopsim Architecture
//!
//! Shopsim is the persistence core of a retail purchasing simulator: clients,
//! cashiers, products, stores, cash desks and receipts, kept in plain files
//! that a person can open and read.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (the `shopsim` binary)                                 │
//! │  - Parses arguments, prints JSON, owns exit codes           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Services (service/)                                        │
//! │  - One per record type, validation before every write      │
//! │  - DataService trait supplies the CRUD surface              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage (store/)                                           │
//! │  - RecordStore: type registry, cache, ids, storage modes    │
//! │  - StorageBackend: FsBackend (production), MemBackend       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no global state. [`init::initialize`] builds one
//! [`store::RecordStore`] and every service borrows it; the caller decides
//! when to [`store::RecordStore::save_all`].
//!
//! ## Records
//!
//! Every stored type implements [`model::Record`]: a type name used for file
//! names and an unsigned id. Id `0` means "not stored yet"; the store assigns
//! `max + 1` on insert.

pub mod config;
pub mod error;
pub mod init;
pub mod model;
pub mod service;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
