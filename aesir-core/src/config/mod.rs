//! src/config/mod.rs
//!
//! Loads `config.yml` into an immutable [`ConfigSnapshot`] and keeps the
//! current snapshot behind an `ArcSwap`, so a reload is a single pointer
//! swap and readers never block.

mod loader;

pub use loader::{ConfigLoader, ReloadOutcome};

use std::sync::Arc;
use arc_swap::ArcSwap;
use aesir_common::models::ConfigSnapshot;

/// Shared handle to the live configuration snapshot.
pub type ConfigHandle = Arc<ArcSwap<ConfigSnapshot>>;

pub fn new_config_handle(snapshot: ConfigSnapshot) -> ConfigHandle {
    Arc::new(ArcSwap::from_pointee(snapshot))
}
