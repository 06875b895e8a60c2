//! Recursive macro expansion.
//!
//! Processing order for each line:
//! 1. Scan: find `@M NAME(args)` invocations before any comment
//! 2. Expand: bind arguments and render the template for each invocation
//! 3. Re-expand: if the rendered text contains invocations, process each of
//!    its lines again with the macro pushed on the ancestry stack

use std::collections::HashMap;
use std::path::Path;

use mc_ast::MacroSyntax;
use mc_defs::MacroRegistry;
use tracing::{debug, trace};

use crate::error::ExpandError;

pub mod args;
pub mod render;
pub mod scan;

use args::bind_arguments;
use render::{render, ParameterPatterns};
use scan::InvocationPatterns;

/// Default limit on nested expansions of distinct macros.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Expands invocations against a loaded registry.
pub struct Expander<'a> {
    registry: &'a MacroRegistry,
    syntax: MacroSyntax,
    patterns: InvocationPatterns,
    /// Compiled once per registered macro.
    parameters: HashMap<String, ParameterPatterns>,
    max_depth: usize,
}

impl<'a> Expander<'a> {
    pub fn new(registry: &'a MacroRegistry, syntax: MacroSyntax) -> Result<Self, ExpandError> {
        let patterns = InvocationPatterns::new(&syntax)?;
        let parameters = registry
            .iter()
            .map(|def| -> Result<_, ExpandError> {
                Ok((def.name.clone(), ParameterPatterns::compile(def)?))
            })
            .collect::<Result<HashMap<_, _>, _>>()?;
        Ok(Self {
            registry,
            syntax,
            patterns,
            parameters,
            max_depth: DEFAULT_MAX_DEPTH,
        })
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Expand every invocation in `line`. Text outside invocations, including
    /// comments and the line terminator, is kept as is.
    pub fn process_line(&self, line: &str) -> Result<String, ExpandError> {
        let mut ancestry = Vec::new();
        self.process_line_in(line, &mut ancestry)
    }

    fn process_line_in(
        &self,
        line: &str,
        ancestry: &mut Vec<String>,
    ) -> Result<String, ExpandError> {
        let mut out = line.to_string();
        for raw in self.patterns.scan_line(line, &self.syntax) {
            let expansion = self.expand_invocation(raw, ancestry)?;
            out = out.replacen(raw, &expansion, 1);
        }
        Ok(out)
    }

    /// Expand one raw invocation. `ancestry` holds the macros currently being
    /// expanded on this chain and is restored before returning.
    ///
    /// Unknown macro names are not an error: the invocation text is returned
    /// unchanged.
    pub fn expand_invocation(
        &self,
        raw: &str,
        ancestry: &mut Vec<String>,
    ) -> Result<String, ExpandError> {
        let Some(invocation) = self.patterns.parse(raw) else {
            return Ok(raw.to_string());
        };
        let name = invocation.macro_name;

        if ancestry.iter().any(|n| n == name) {
            let mut chain = ancestry.clone();
            chain.push(name.to_string());
            return Err(ExpandError::RecursionCycle { chain });
        }

        let (Some(def), Some(parameters)) =
            (self.registry.lookup(name), self.parameters.get(name))
        else {
            trace!(invocation = raw.trim(), "unresolved macro left in place");
            return Ok(raw.to_string());
        };

        let args = bind_arguments(def, invocation.raw_arguments, self.syntax.escape)?;
        let expansion = render(
            def,
            parameters,
            &args,
            invocation.leading_whitespace,
            self.syntax.directive,
        );
        trace!(macro_name = name, args = args.len(), "expanded macro");

        if !self.patterns.contains_invocation(&expansion) {
            return Ok(expansion);
        }

        if ancestry.len() >= self.max_depth {
            let mut chain = ancestry.clone();
            chain.push(name.to_string());
            return Err(ExpandError::ExpansionTooDeep {
                limit: self.max_depth,
                chain,
            });
        }

        ancestry.push(def.name.clone());
        let lines: Result<Vec<String>, ExpandError> = expansion
            .split('\n')
            .map(|line| self.process_line_in(line, ancestry))
            .collect();
        ancestry.pop();

        Ok(lines?.join("\n"))
    }

    /// Expand a whole text, line by line. `origin` only labels errors.
    pub fn translate_str(&self, text: &str, origin: &Path) -> Result<String, ExpandError> {
        let mut out = String::with_capacity(text.len());
        for (idx, line) in text.split_inclusive('\n').enumerate() {
            let processed = self
                .process_line(line)
                .map_err(|e| ExpandError::AtLine {
                    path: origin.to_path_buf(),
                    line: idx + 1,
                    source: Box::new(e),
                })?;
            out.push_str(&processed);
        }
        Ok(out)
    }

    /// Translate `input` into `output`. Nothing is written if any line fails.
    pub fn translate_file(&self, input: &Path, output: &Path) -> Result<(), ExpandError> {
        let text = std::fs::read_to_string(input).map_err(|source| ExpandError::Read {
            path: input.to_path_buf(),
            source,
        })?;
        let translated = self.translate_str(&text, input)?;
        std::fs::write(output, translated).map_err(|source| ExpandError::Write {
            path: output.to_path_buf(),
            source,
        })?;
        debug!(input = %input.display(), output = %output.display(), "translated file");
        Ok(())
    }
}
