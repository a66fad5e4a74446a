//! Word store domain model.
//!
//! # Responsibility
//! - Define the entry record shared by every store and backend.
//! - Name the persistence namespaces a store can bind to.
//!
//! # Invariants
//! - Keys are unique within one namespace.
//! - Namespaces never share entries.

pub mod entry;
