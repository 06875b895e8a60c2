//! Template rendering: parameter substitution and per-line indentation.

use mc_ast::MacroDefinition;
use regex::{NoExpand, Regex};

use crate::error::ExpandError;

/// Whole-word patterns for a definition's parameters, in parameter order.
/// Empty parameter names have no pattern and are never substituted.
#[derive(Debug)]
pub struct ParameterPatterns(Vec<Option<Regex>>);

impl ParameterPatterns {
    pub fn compile(def: &MacroDefinition) -> Result<Self, ExpandError> {
        def.parameters
            .iter()
            .map(|param| -> Result<Option<Regex>, ExpandError> {
                if param.is_empty() {
                    return Ok(None);
                }
                Ok(Some(Regex::new(&format!(r"\b{}\b", regex::escape(param)))?))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

/// Substitute `args` into `def.body` and indent every line.
///
/// Parameters are replaced one after another on the progressively edited
/// body, so text inserted for an earlier parameter is visible to later ones.
/// Callers relying on simultaneous substitution will be surprised.
pub fn render(
    def: &MacroDefinition,
    patterns: &ParameterPatterns,
    args: &[String],
    indent: &str,
    directive: char,
) -> String {
    let mut body = def.body.clone();
    for (word, arg) in patterns.0.iter().zip(args) {
        if let Some(word) = word {
            body = word.replace_all(&body, NoExpand(arg)).into_owned();
        }
    }

    let mut lines: Vec<String> = body.split('\n').map(str::to_string).collect();

    // Keep a leading directive off the invocation's line.
    if lines[0].trim().starts_with(directive) {
        lines[0].insert(0, '\n');
    }

    for (i, line) in lines.iter_mut().enumerate() {
        if line.trim().starts_with(directive) {
            continue;
        }
        let lead = format!("{indent}{}", " ".repeat(def.indent_for_line(i)));
        line.insert_str(0, &lead);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn render_with(def: &MacroDefinition, args: &[String], indent: &str) -> String {
        let patterns = ParameterPatterns::compile(def).unwrap();
        render(def, &patterns, args, indent, '#')
    }

    #[test]
    fn substitutes_whole_words_only() {
        let def = MacroDefinition::new("M", "x = xyz + x_1 + x").with_parameters(["x"]);
        let out = render_with(&def, &args(&["7"]), "");
        assert_eq!(out, "7 = xyz + x_1 + 7");
    }

    #[test]
    fn substitution_is_sequential() {
        let def = MacroDefinition::new("M", "a + b").with_parameters(["a", "b"]);
        let out = render_with(&def, &args(&["b", "c"]), "");
        assert_eq!(out, "c + c");
    }

    #[test]
    fn extra_arguments_are_ignored() {
        let def = MacroDefinition::new("M", "f(a)").with_parameters(["a"]);
        let out = render_with(&def, &args(&["1", "2"]), "");
        assert_eq!(out, "f(1)");
    }

    #[test]
    fn arguments_are_inserted_literally() {
        let def = MacroDefinition::new("M", "v = a").with_parameters(["a"]);
        let out = render_with(&def, &args(&["$1 \\1"]), "");
        assert_eq!(out, "v = $1 \\1");
    }

    #[test]
    fn empty_parameter_names_are_skipped() {
        let def = MacroDefinition::new("M", "a + b").with_parameters(["a", "", "b"]);
        let out = render_with(&def, &args(&["1", "unused", "2"]), "");
        assert_eq!(out, "1 + 2");
    }

    #[test]
    fn ladder_repeats_after_invocation_indent() {
        let def = MacroDefinition::new("M", "a\nb\nc\nd").with_indent_ladder(vec![0, 2, 2]);
        let out = render_with(&def, &[], "  ");
        assert_eq!(out, "  a\n    b\n    c\n    d");
    }

    #[test]
    fn directive_lines_are_never_indented() {
        let def = MacroDefinition::new("M", "call a()\n#ifdef DEBUG\ncall b()\n#endif")
            .with_indent_ladder(vec![0, 3]);
        let out = render_with(&def, &[], "  ");
        assert_eq!(out, "  call a()\n#ifdef DEBUG\n     call b()\n#endif");
    }

    #[test]
    fn leading_directive_moves_to_its_own_line() {
        let def = MacroDefinition::new("M", "#if X\ny\n#endif");
        let out = render_with(&def, &[], "    ");
        assert_eq!(out, "\n#if X\n    y\n#endif");
    }
}
