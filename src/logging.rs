//! Tracing subscriber setup.
//!
//! The engine only emits `tracing` events; installing a subscriber is up to
//! the host. `init_tracing` is the default one, driven by `CPPSYM_LOG`:
//!
//! ```bash
//! # Duplicate-declaration warnings only
//! CPPSYM_LOG=warn my-doc-build
//!
//! # Full lookup traces (also set lookup.debug_lookup in settings)
//! CPPSYM_LOG="cppsym=debug" my-doc-build
//! ```

use tracing_subscriber::EnvFilter;

/// Filter from `CPPSYM_LOG`, falling back to `RUST_LOG`.
fn build_filter() -> Option<EnvFilter> {
    if let Ok(val) = std::env::var("CPPSYM_LOG") {
        Some(EnvFilter::builder().parse_lossy(val))
    } else if std::env::var("RUST_LOG").is_ok() {
        Some(EnvFilter::from_default_env())
    } else {
        None
    }
}

/// Install a stderr subscriber when `CPPSYM_LOG` or `RUST_LOG` is set.
///
/// Returns `false` when nothing was installed, either because no filter was
/// requested or because the host already set a global subscriber.
pub fn init_tracing() -> bool {
    let Some(filter) = build_filter() else {
        return false;
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .is_ok()
}
