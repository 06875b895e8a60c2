//! Directory batch mode: load every `.ini` in a directory (plus an optional
//! variant subdirectory) and translate every `-mc` file next to them.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mc_defs::MacroRegistry;
use mc_expand::Expander;
use tracing::info;

use crate::config::Config;

pub const DEFINITION_SUFFIX: &str = ".ini";
pub const MACRO_SOURCE_SUFFIX: &str = "-mc";

/// Regular files in `dir` whose name ends with `suffix`, sorted. A missing
/// directory yields nothing.
pub fn files_with_suffix(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if !dir.is_dir() {
        return Ok(files);
    }
    for entry in std::fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file()
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(suffix))
        {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Definition files for `dir`: its own first, then the variant's, so the
/// more specific variant definitions override.
pub fn definition_files(dir: &Path, variant: Option<&str>) -> Result<Vec<PathBuf>> {
    let mut defs = files_with_suffix(dir, DEFINITION_SUFFIX)?;
    if let Some(variant) = variant {
        defs.extend(files_with_suffix(&dir.join(variant), DEFINITION_SUFFIX)?);
    }
    Ok(defs)
}

/// Translate every `-mc` file in `dir` into `out_dir`, returning the outputs.
pub fn process_directory(
    dir: &Path,
    out_dir: &Path,
    variant: Option<&str>,
    config: &Config,
) -> Result<Vec<PathBuf>> {
    let defs = definition_files(dir, variant)?;
    let mut registry = MacroRegistry::with_policy(config.override_rules.clone());
    registry.load_all(&defs)?;
    info!(dir = %dir.display(), files = defs.len(), macros = registry.len(), "loaded definitions");

    let mut expander = Expander::new(&registry, config.syntax.clone())?;
    if let Some(depth) = config.max_depth {
        expander = expander.with_max_depth(depth);
    }

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let mut outputs = Vec::new();
    for input in files_with_suffix(dir, MACRO_SOURCE_SUFFIX)? {
        let Some(name) = input
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_suffix(MACRO_SOURCE_SUFFIX))
            .filter(|n| !n.is_empty())
        else {
            continue;
        };
        let output = out_dir.join(name);
        expander.translate_file(&input, &output)?;
        outputs.push(output);
    }
    Ok(outputs)
}

/// Header, underline and contents of a translated file, as printed by `-p`.
pub fn render_listing(path: &Path, contents: &str) -> String {
    let header = format!("CONTENTS OF TRANSLATED FILE: {}", path.display());
    let underline = "-".repeat(header.chars().count());
    format!("{header}\n{underline}\n{contents}\n")
}
