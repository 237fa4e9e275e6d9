//! Persistence of the symbol tree between builds

pub mod metadata;
pub mod persistence;

pub use metadata::{SNAPSHOT_VERSION, SnapshotMetadata};
pub use persistence::{SnapshotPersistence, SymbolSnapshot};
