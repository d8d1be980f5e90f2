//! Catalog state and its persisted selection fragment

pub mod fragment;
pub mod store;

pub use fragment::{FileFragmentStore, FragmentStore, MemoryFragmentStore};
pub use store::{CatalogState, CatalogStore, StateUpdate};
