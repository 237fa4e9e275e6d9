//! Metadata stored alongside a symbol snapshot

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Current snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// Version of the snapshot format
    pub version: u32,

    /// Reachable nodes, root included
    pub symbol_count: u32,

    /// Documents contributing at least one declaration
    pub document_count: u32,

    /// Seconds since the Unix epoch (UTC)
    pub saved_at: u64,
}

impl Default for SnapshotMetadata {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            symbol_count: 0,
            document_count: 0,
            saved_at: get_utc_timestamp(),
        }
    }
}

impl SnapshotMetadata {
    pub fn new(symbol_count: u32, document_count: u32) -> Self {
        Self {
            symbol_count,
            document_count,
            ..Self::default()
        }
    }

    pub fn is_supported(&self) -> bool {
        self.version == SNAPSHOT_VERSION
    }
}

pub fn get_utc_timestamp() -> u64 {
    Utc::now().timestamp() as u64
}
