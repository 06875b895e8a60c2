//! Shared data model for mcproc.
//!
//! - `MacroDefinition`: one named template loaded from a definition file
//! - `Invocation`: a parsed `@M NAME(args)` occurrence inside a line
//! - `MacroSyntax`: the designated characters that drive scanning and rendering

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A named, optionally parameterized text template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroDefinition {
    pub name: String,
    /// Template text, trimmed, lines separated by `\n`.
    pub body: String,
    /// Formal parameter names, substituted positionally.
    pub parameters: Vec<String>,
    /// Free-form `type` tag. Not interpreted by the expander.
    pub kind: String,
    /// Extra spaces per body line. The last entry repeats for the remaining lines.
    pub indent_ladder: Vec<usize>,
    /// Directory the definition was loaded from.
    pub origin_scope: PathBuf,
}

impl MacroDefinition {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
            parameters: Vec::new(),
            kind: String::new(),
            indent_ladder: vec![0],
            origin_scope: PathBuf::new(),
        }
    }

    pub fn with_parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters = parameters.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_indent_ladder(mut self, ladder: Vec<usize>) -> Self {
        self.indent_ladder = ladder;
        self
    }

    pub fn with_origin_scope(mut self, scope: impl Into<PathBuf>) -> Self {
        self.origin_scope = scope.into();
        self
    }

    /// Extra indentation for body line `line`, repeating the last ladder step.
    pub fn indent_for_line(&self, line: usize) -> usize {
        match self.indent_ladder.len() {
            0 => 0,
            n => self.indent_ladder[line.min(n - 1)],
        }
    }
}

/// A parsed occurrence of the invocation syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation<'a> {
    /// Whitespace preceding the marker.
    pub leading_whitespace: &'a str,
    /// May be empty for a bare `@M`.
    pub macro_name: &'a str,
    /// Text between the outer parentheses, if any were supplied.
    pub raw_arguments: Option<&'a str>,
}

/// Designated characters used by the scanner, binder and renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacroSyntax {
    /// Starts an invocation.
    pub marker: char,
    /// Token that must follow the marker.
    pub keyword: String,
    /// Lines starting with this are never indented or inlined.
    pub directive: char,
    /// Toggles string-literal state while looking for comments.
    pub string_delim: char,
    /// Everything after this (outside a string) is ignored by the scanner.
    pub comment: char,
    /// Escapes commas and itself inside argument lists.
    pub escape: char,
}

impl Default for MacroSyntax {
    fn default() -> Self {
        Self {
            marker: '@',
            keyword: "M".to_string(),
            directive: '#',
            string_delim: '"',
            comment: '!',
            escape: '%',
        }
    }
}
