//! Store and reconciliation use-cases.
//!
//! # Responsibility
//! - Own word stores on top of repository implementations.
//! - Orchestrate cross-store reconciliation.
//!
//! # Invariants
//! - Services never bypass repository persistence contracts.
//! - Services remain storage-agnostic.

pub mod reconcile;
pub mod stats;
pub mod word_store;
