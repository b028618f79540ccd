//! Storage backends and abstractions.
//!
//! This module provides the storage layer abstraction. The storage system is
//! pluggable: real deployments put a networked document database behind
//! [`DocumentStoreProvider`], and the crate ships an in-memory
//! implementation for tests and temporary data.
//!
//! # Contract
//!
//! A store exposes three data primitives:
//! - `fetch` - get a document by id; absence is a normal outcome
//! - `put` - write a whole document atomically, arbitrated by a revision
//!   check; a stale revision is a conflict, not a silent overwrite
//! - `query_index` - look up documents through a precomputed field index
//!
//! The store performs no validation and no timestamping. Those belong to
//! the transaction layer, so storage semantics stay independent of business
//! rules.
//!
//! # Configuration
//!
//! Store construction takes an explicit configuration value implementing
//! [`StoreConfigProvider`]. There is no process-wide default configuration.

mod document_store;
pub mod memory;
mod store_config;

pub use document_store::*;
pub use store_config::*;
