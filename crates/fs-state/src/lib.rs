//! fs-state: Save snapshots, file store, export/import
//!
//! Persists the idle session between runs and plugs into the slot machine as
//! its [`fs_slot_lab::StateSink`].

mod error;
mod snapshot;
mod store;

pub use error::*;
pub use snapshot::*;
pub use store::*;
