//! Storage backends for prodflow.
//!
//! The engine talks to an opaque document store through the [`Store`]
//! trait: load, insert, list, and compare-and-swap keyed on the entity's
//! `version` counter. Two backends ship here: an in-memory store for
//! tests and a JSON-file store for the CLI. The read-only team directory
//! lives behind its own [`Directory`] trait.

#![warn(missing_docs)]

mod trait_;
mod memory;
mod json_store;
mod directory;

pub use trait_::{Result, StorageError, Store};
pub use memory::MemoryStore;
pub use json_store::JsonStore;
pub use directory::{Directory, MemoryDirectory};
