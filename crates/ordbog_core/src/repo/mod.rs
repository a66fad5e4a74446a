//! Persistence capabilities for word stores.
//!
//! # Responsibility
//! - Define the durable key/value contract a `WordStore` writes through to.
//! - Isolate SQLite and file-format details from store/engine logic.
//!
//! # Invariants
//! - Every batch write is all-or-nothing per namespace.
//! - Reads return entries in storage (insertion) order.

pub mod entry_repo;
pub mod json_file_repo;
