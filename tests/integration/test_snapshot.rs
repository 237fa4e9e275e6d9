//! Persisting the project tree between builds

use crate::common::{child, class, domain_with, function, templated};
use anyhow::Result;
use cppsym::{Settings, SnapshotPersistence, TargetType};
use tempfile::TempDir;

#[test]
fn test_keys_survive_snapshot_round_trip() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut settings = Settings::default();
    settings.snapshot_path = temp_dir.path().join(".cppsym").join("symbols.json");
    let persistence = SnapshotPersistence::from_settings(&settings);

    let domain = domain_with(
        "api",
        vec![
            templated(class("N::Box"), &[&["T"]]),
            function("N::Box::get", &["int"]),
            function("N::Box::get", &["const char*"]),
        ],
    );
    let keys: Vec<_> = domain
        .tree()
        .all_symbols()
        .filter(|&id| domain.tree().symbol(id).declaration().is_some())
        .map(|id| domain.tree().get_lookup_key(id))
        .collect();
    assert_eq!(keys.len(), 4);

    persistence.save(&domain)?;
    assert!(persistence.exists());

    let loaded = persistence.load(settings.trace_config())?;
    for key in &keys {
        let id = loaded
            .tree()
            .direct_lookup(key)
            .unwrap_or_else(|| panic!("key {key} did not resolve after reload"));
        assert_eq!(&loaded.tree().get_lookup_key(id), key);
    }
    Ok(())
}

#[test]
fn test_reloaded_tree_keeps_resolving_and_growing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let persistence = SnapshotPersistence::new(temp_dir.path().join("symbols.json"));
    persistence.save(&domain_with("a", vec![function("N::f", &[])]))?;

    let mut loaded = persistence.load(Default::default())?;
    let root = loaded.root();
    let added = loaded.add_declaration(root, function("N::g", &[]), "b", 1)?;
    assert!(added.diagnostic.is_none());

    let n = child(loaded.tree(), &["N"]).unwrap();
    assert_eq!(loaded.tree().symbol(added.symbol).parent(), Some(n));
    assert!(loaded.resolve_xref(None, "N::f", TargetType::Function).is_found());
    Ok(())
}
