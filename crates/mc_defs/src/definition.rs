//! Turns definition-file sections into `MacroDefinition` records.
//!
//! Recognised keys per section:
//!
//! | key            | required | meaning                                   |
//! |----------------|----------|-------------------------------------------|
//! | `definition`   | yes      | template body (trimmed)                   |
//! | `args`         | no       | comma-separated parameter names           |
//! | `type`         | no       | free-form tag                             |
//! | `line_indents` | no       | comma-separated per-line indents, `0` by default |

use std::path::{Component, Path, PathBuf};

use mc_ast::MacroDefinition;
use tracing::debug;

use crate::error::DefinitionError;
use crate::ini::{parse_ini, IniDocument, IniSection};

/// Read a definition file. The origin scope of every record is the file's
/// absolute parent directory, with `.` and `..` resolved.
pub fn parse_definitions(path: &Path) -> Result<Vec<MacroDefinition>, DefinitionError> {
    let io_err = |source| DefinitionError::Io {
        path: path.to_path_buf(),
        source,
    };
    let text = std::fs::read_to_string(path).map_err(io_err)?;
    let absolute = normalize(&std::path::absolute(path).map_err(io_err)?);
    let scope = absolute.parent().map(Path::to_path_buf).unwrap_or_default();

    let defs = parse_definitions_str(&text, path, &scope)?;
    debug!(path = %path.display(), count = defs.len(), "parsed definition file");
    Ok(defs)
}

/// Resolve `.` and `..` without touching the filesystem. `..` at the root
/// stays at the root.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Parse definition text that was read from `path`, tagging records with `scope`.
pub fn parse_definitions_str(
    text: &str,
    path: &Path,
    scope: &Path,
) -> Result<Vec<MacroDefinition>, DefinitionError> {
    let doc = parse_ini(text).map_err(|e| DefinitionError::Parse {
        path: path.to_path_buf(),
        line: e.line,
        message: e.message,
    })?;

    doc.sections
        .iter()
        .map(|section| section_to_definition(&doc, section, path, scope))
        .collect()
}

fn section_to_definition(
    doc: &IniDocument,
    section: &IniSection,
    path: &Path,
    scope: &Path,
) -> Result<MacroDefinition, DefinitionError> {
    let body = doc
        .get(section, "definition")
        .ok_or_else(|| DefinitionError::MissingField {
            path: path.to_path_buf(),
            section: section.name.clone(),
            field: "definition",
        })?;

    let parameters = match doc.get(section, "args").map(str::trim) {
        Some(args) if !args.is_empty() => args.split(',').map(|a| a.trim().to_string()).collect(),
        _ => Vec::new(),
    };

    let indent_ladder = match doc.get(section, "line_indents") {
        Some(indents) => parse_indents(indents).map_err(|value| DefinitionError::InvalidIndent {
            path: path.to_path_buf(),
            section: section.name.clone(),
            value,
        })?,
        None => vec![0],
    };

    Ok(MacroDefinition {
        name: section.name.clone(),
        body: body.trim().to_string(),
        parameters,
        kind: doc.get(section, "type").unwrap_or_default().to_string(),
        indent_ladder,
        origin_scope: PathBuf::from(scope),
    })
}

/// Returns the offending entry on failure.
fn parse_indents(text: &str) -> Result<Vec<usize>, String> {
    text.trim()
        .split(',')
        .map(|entry| entry.trim().parse::<usize>().map_err(|_| entry.trim().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Vec<MacroDefinition>, DefinitionError> {
        parse_definitions_str(text, Path::new("defs.ini"), Path::new("/src"))
    }

    #[test]
    fn full_section() {
        let defs = parse(
            "[GREET]\ndefinition =\n  print(name)\n  return\ntype = io\nargs = name , other\nline_indents = 0, 2\n",
        )
        .unwrap();
        assert_eq!(defs.len(), 1);
        let greet = &defs[0];
        assert_eq!(greet.name, "GREET");
        assert_eq!(greet.body, "print(name)\nreturn");
        assert_eq!(greet.parameters, vec!["name", "other"]);
        assert_eq!(greet.kind, "io");
        assert_eq!(greet.indent_ladder, vec![0, 2]);
        assert_eq!(greet.origin_scope, PathBuf::from("/src"));
    }

    #[test]
    fn optional_fields_default() {
        let defs = parse("[A]\ndefinition = x\n[B]\ndefinition = y\nargs =\n").unwrap();
        assert_eq!(defs.len(), 2);
        for def in &defs {
            assert!(def.parameters.is_empty());
            assert_eq!(def.kind, "");
            assert_eq!(def.indent_ladder, vec![0]);
        }
    }

    #[test]
    fn missing_definition_is_fatal() {
        let err = parse("[A]\nargs = x\n").unwrap_err();
        assert!(matches!(
            err,
            DefinitionError::MissingField { ref section, field: "definition", .. } if section == "A"
        ));
    }

    #[test]
    fn bad_indent_is_fatal() {
        let err = parse("[A]\ndefinition = x\nline_indents = 0, two\n").unwrap_err();
        match err {
            DefinitionError::InvalidIndent { value, .. } => assert_eq!(value, "two"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn negative_indent_is_fatal() {
        assert!(parse("[A]\ndefinition = x\nline_indents = -1\n").is_err());
    }

    #[test]
    fn reader_errors_carry_path_and_line() {
        let err = parse("[A]\ndefinition = x\nnonsense\n").unwrap_err();
        assert_eq!(err.to_string(), "defs.ini:3: expected `key = value`, found `nonsense`");
    }

    #[test]
    fn reads_from_disk_with_parent_scope() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("macros.ini");
        std::fs::write(&path, "[A]\ndefinition = x\n").unwrap();

        let defs = parse_definitions(&path).unwrap();
        assert_eq!(defs[0].origin_scope, std::path::absolute(dir.path()).unwrap());
    }

    #[test]
    fn scope_resolves_dot_segments() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("/../x")), PathBuf::from("/x"));

        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("a")).unwrap();
        std::fs::create_dir(dir.path().join("b")).unwrap();
        let path = dir.path().join("a/../b/macros.ini");
        std::fs::write(&path, "[A]\ndefinition = x\n").unwrap();

        let defs = parse_definitions(&path).unwrap();
        assert_eq!(
            defs[0].origin_scope,
            std::path::absolute(dir.path().join("b")).unwrap()
        );
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = parse_definitions(Path::new("/definitely/not/here.ini")).unwrap_err();
        assert!(matches!(err, DefinitionError::Io { .. }));
    }
}
