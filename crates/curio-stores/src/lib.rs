//! curio-stores - ItemStore implementations for curio.
//!
//! Two backends:
//! - [`InMemoryItemStore`]: collection held in memory, for tests and hosts
//!   that persist elsewhere.
//! - [`JsonFileStore`]: whole-collection JSON document at a path, mirroring
//!   the original catalog's browser-local persistence (single document,
//!   fixed capacity ceiling, lenient reminder parsing).

mod json_file;
mod memory;

pub use json_file::{JsonFileStore, DEFAULT_CAPACITY_BYTES};
pub use memory::InMemoryItemStore;
