#![allow(dead_code, unused_imports)]
//! # Inkstore - Transactional Document Store
//!
//! Inkstore is the storage core of a small content-management backend. It
//! serves blog posts by slug and keeps per-user preference documents, and it
//! does both on top of a multi-reader/multi-writer document store with
//! optimistic concurrency control.
//!
//! ## Key Features
//!
//! - **Documents**: Schema-flexible key-value documents addressable by id
//! - **Optimistic Concurrency**: Every write presents the revision it last
//!   read; the store arbitrates conflicting writers
//! - **Transactions**: A bounded fetch-mutate-validate-write retry loop that
//!   never persists invalid state and never clobbers a concurrent writer
//! - **Validation**: Pluggable per-collection validators gating persistence
//! - **Timestamps**: Opt-in server-assigned `created_at`/`updated_at` fields
//! - **Indexes**: Precomputed field indexes for slug-style lookups
//! - **Pluggable Storage**: Store backends behind a provider trait, with an
//!   in-memory implementation included
//! - **Clean API**: PIMPL pattern provides a stable, encapsulated interface
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use inkstore::cms::{preferences_collection, PreferencesService};
//! use inkstore::inkstore::Inkstore;
//! use inkstore::doc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Open an in-memory database with a preferences collection
//! let db = Inkstore::builder()
//!     .collection(preferences_collection())
//!     .open_or_create()?;
//!
//! // Read (or lazily create) a user's preferences
//! let prefs = PreferencesService::new(&db)?;
//! let doc = prefs.read_or_create("alice")?;
//!
//! // Update them; invalid values are rejected before they are stored
//! let updated = prefs.update("alice", &doc!{ color: "blue" })?;
//! assert_eq!(updated.get("color"), "blue".into());
//!
//! db.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`cms`] - Preferences and blog services built on the core
//! - [`collection`] - Documents, collection configuration, and handles
//! - [`common`] - Common types, validators, and utilities
//! - [`errors`] - Error types and result definitions
//! - [`inkstore`] - Core database interface
//! - [`inkstore_builder`] - Database builder for initialization
//! - [`inkstore_config`] - Database configuration
//! - [`store`] - Storage backend abstractions
//! - [`transaction`] - The transaction executor

use crate::common::*;

pub mod cms;
pub mod collection;
pub mod common;
pub mod errors;
pub mod inkstore;
pub mod inkstore_builder;
pub mod inkstore_config;
pub mod store;
pub mod transaction;
