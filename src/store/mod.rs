// src/store/mod.rs

//! Persistent, mutex-guarded job record store.

pub mod document;
pub mod record_store;

pub use document::{StoreDocument, write_document};
pub use record_store::{RecordStore, StoreGuard};
