//! Document collections and their configuration.
//!
//! A collection is a named set of documents sharing one configuration: an
//! optional validator, a timestamping flag, an auto-create flag, and the
//! fields that carry a precomputed index. [`DocumentCollection`] is the
//! runtime handle through which documents are read and transacted on.

mod collection_config;
mod document;
mod document_collection;

pub use collection_config::*;
pub use document::*;
pub use document_collection::*;
