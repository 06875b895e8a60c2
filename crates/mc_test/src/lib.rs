//! Shared helpers for the golden-file harness in `tests/harness.rs`.

use std::path::PathBuf;

/// `tests/fixtures/` at the workspace root.
pub fn fixtures_dir() -> PathBuf {
    // CARGO_MANIFEST_DIR is crates/mc_test/, so go up two levels to workspace root.
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("tests")
        .join("fixtures")
}
