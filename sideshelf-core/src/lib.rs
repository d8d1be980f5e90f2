//! Sideshelf core library
//!
//! Catalog fetching, state, filtering and view models for a sideload app
//! browser. Front ends live in separate crates.

pub mod catalog;
pub mod config;
pub mod error;
pub mod i18n;
pub mod install;
pub mod session;
pub mod state;
pub mod theme;
pub mod view;

pub use error::FetchError;
pub use session::{CatalogSession, ErrorAffordance, SwitchOutcome};
