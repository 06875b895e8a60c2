use std::path::PathBuf;

/// Failure while reading definition sources or merging them into a registry.
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    #[error("failed to read definitions from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("{}: macro {section} has no `{field}` field", path.display())]
    MissingField {
        path: PathBuf,
        section: String,
        field: &'static str,
    },

    #[error("{}: macro {section} has invalid line_indents entry `{value}`", path.display())]
    InvalidIndent {
        path: PathBuf,
        section: String,
        value: String,
    },

    #[error(
        "macro {name} defined in parallel directories {} and {}, can't inherit properly",
        previous_scope.display(),
        new_scope.display()
    )]
    RedefinitionConflict {
        name: String,
        previous_scope: PathBuf,
        new_scope: PathBuf,
    },
}
