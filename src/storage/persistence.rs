//! JSON snapshots of the project-wide symbol tree
//!
//! A snapshot lets an incremental build start from the tree of the previous
//! run. Lookup keys taken before saving resolve against the reloaded tree.

use crate::domain::CppDomain;
use crate::error::{ErrorContext, SymbolError, SymbolResult};
use crate::storage::SnapshotMetadata;
use crate::symbol::{Symbol, SymbolTree, TraceConfig};
use crate::Settings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk form of a tree: the arena as is, detached slots included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolSnapshot {
    pub metadata: SnapshotMetadata,
    pub nodes: Vec<Symbol>,
}

impl SymbolSnapshot {
    pub fn capture(domain: &CppDomain) -> Self {
        let tree = domain.tree();
        Self {
            metadata: SnapshotMetadata::new(
                tree.all_symbols().count() as u32,
                domain.documents().len() as u32,
            ),
            nodes: tree.nodes().to_vec(),
        }
    }

    pub fn restore(self, trace: TraceConfig) -> SymbolResult<CppDomain> {
        if !self.metadata.is_supported() {
            return Err(SymbolError::Serialization(format!(
                "unsupported snapshot version {}",
                self.metadata.version
            )));
        }
        SymbolTree::from_nodes(self.nodes, trace).map(CppDomain::from_tree)
    }
}

/// Reads and writes snapshots at a fixed path
#[derive(Debug)]
pub struct SnapshotPersistence {
    path: PathBuf,
}

impl SnapshotPersistence {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.snapshot_path.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Write `domain` to disk
    #[must_use = "Save errors should be handled to ensure the tree is persisted"]
    pub fn save(&self, domain: &CppDomain) -> SymbolResult<SnapshotMetadata> {
        let snapshot = SymbolSnapshot::capture(domain);
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).persisting(&self.path)?;
        }
        let json = serde_json::to_string(&snapshot).persisting(&self.path)?;
        fs::write(&self.path, json).persisting(&self.path)?;

        tracing::debug!(
            target: "cppsym::storage",
            "saved {} symbols from {} documents to {}",
            snapshot.metadata.symbol_count,
            snapshot.metadata.document_count,
            self.path.display()
        );
        Ok(snapshot.metadata)
    }

    /// Read the snapshot back, validating every link of the tree
    #[must_use = "Load errors should be handled appropriately"]
    pub fn load(&self, trace: TraceConfig) -> SymbolResult<CppDomain> {
        let json = fs::read_to_string(&self.path).loading(&self.path)?;
        let snapshot: SymbolSnapshot = serde_json::from_str(&json).loading(&self.path)?;
        tracing::debug!(
            target: "cppsym::storage",
            "loaded snapshot v{} with {} symbols",
            snapshot.metadata.version,
            snapshot.metadata.symbol_count
        );
        snapshot.restore(trace)
    }

    /// Like [`load`](Self::load), but an absent snapshot is an empty domain.
    pub fn load_or_default(&self, trace: TraceConfig) -> SymbolResult<CppDomain> {
        if self.exists() {
            self.load(trace)
        } else {
            Ok(CppDomain::new(trace))
        }
    }
}
