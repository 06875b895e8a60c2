use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ExpandError {
    #[error("argument list expected for macro {name}")]
    MissingArguments { name: String },

    #[error("macro recursion loop: {}", chain.join(" -> "))]
    RecursionCycle { chain: Vec<String> },

    #[error("macro expansion nested deeper than {limit} levels: {}", chain.join(" -> "))]
    ExpansionTooDeep { limit: usize, chain: Vec<String> },

    #[error("invalid macro pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: {source}", path.display())]
    AtLine {
        path: PathBuf,
        line: usize,
        #[source]
        source: Box<ExpandError>,
    },
}
