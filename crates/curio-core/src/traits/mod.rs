//! Collaborator traits.

mod item_store;

pub use item_store::{ItemPatch, ItemStore};
