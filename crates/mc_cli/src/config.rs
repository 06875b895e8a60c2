//! Optional JSON configuration file.
//!
//! ```json
//! {
//!   "syntax": { "escape": "\\", "comment": "!" },
//!   "override_rules": [{ "new_scope_contains": "source/Simulation" }],
//!   "max_depth": 32
//! }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use mc_ast::MacroSyntax;
use mc_defs::OverridePolicy;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub syntax: MacroSyntax,
    pub override_rules: OverridePolicy,
    pub max_depth: Option<usize>,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("invalid config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_gives_defaults() {
        assert_eq!(Config::load(None).unwrap(), Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mcproc.json");
        std::fs::write(
            &path,
            r#"{ "syntax": { "escape": "\\" }, "override_rules": [{ "previous_scope_contains": "/bin" }] }"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.syntax.escape, '\\');
        assert_eq!(config.syntax.marker, '@');
        assert_eq!(config.override_rules.rules.len(), 1);
        assert_eq!(config.max_depth, None);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mcproc.json");
        std::fs::write(&path, r#"{ "max_dept": 3 }"#).unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }
}
