//! Finding invocations in a line.
//!
//! The invocation syntax is `@M NAME(args)`, with whitespace allowed around
//! every piece. Marker and keyword come from `MacroSyntax`.

use mc_ast::{Invocation, MacroSyntax};
use regex::Regex;

/// Compiled scan and parse patterns for one `MacroSyntax`.
#[derive(Debug, Clone)]
pub struct InvocationPatterns {
    scan: Regex,
    parse: Regex,
}

impl InvocationPatterns {
    pub fn new(syntax: &MacroSyntax) -> Result<Self, regex::Error> {
        let marker = regex::escape(&syntax.marker.to_string());
        let keyword = regex::escape(&syntax.keyword);
        Ok(Self {
            scan: Regex::new(&format!(r"\s*{marker}\s*{keyword}\s*\w*(?:\s*\(.*\))?"))?,
            parse: Regex::new(&format!(
                r"^(?P<indent>\s*){marker}\s*{keyword}\s*(?P<name>\w*)(?:\s*\((?P<args>.*)\))?"
            ))?,
        })
    }

    /// Raw invocation substrings of `line`, left to right, ignoring anything
    /// after a comment.
    pub fn scan_line<'a>(&self, line: &'a str, syntax: &MacroSyntax) -> Vec<&'a str> {
        let code = strip_comment(line, syntax);
        if code.trim().is_empty() {
            return Vec::new();
        }
        self.scan.find_iter(code).map(|m| m.as_str()).collect()
    }

    pub fn contains_invocation(&self, text: &str) -> bool {
        self.scan.is_match(text)
    }

    pub fn parse<'a>(&self, raw: &'a str) -> Option<Invocation<'a>> {
        let caps = self.parse.captures(raw)?;
        Some(Invocation {
            leading_whitespace: caps.name("indent").map_or("", |m| m.as_str()),
            macro_name: caps.name("name").map_or("", |m| m.as_str()),
            raw_arguments: caps.name("args").map(|m| m.as_str()),
        })
    }
}

/// Cut `line` at the first comment marker that is not inside a string.
pub fn strip_comment<'a>(line: &'a str, syntax: &MacroSyntax) -> &'a str {
    let mut in_string = false;
    for (i, ch) in line.char_indices() {
        if ch == syntax.string_delim {
            in_string = !in_string;
        }
        if ch == syntax.comment && !in_string {
            return &line[..i];
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns() -> (InvocationPatterns, MacroSyntax) {
        let syntax = MacroSyntax::default();
        (InvocationPatterns::new(&syntax).unwrap(), syntax)
    }

    #[test]
    fn finds_invocation_with_indent() {
        let (p, s) = patterns();
        assert_eq!(p.scan_line("  @M GREET(world)", &s), vec!["  @M GREET(world)"]);
    }

    #[test]
    fn parses_parts() {
        let (p, _) = patterns();
        let inv = p.parse("   @ M  FOO (a, b)").unwrap();
        assert_eq!(inv.leading_whitespace, "   ");
        assert_eq!(inv.macro_name, "FOO");
        assert_eq!(inv.raw_arguments, Some("a, b"));

        let bare = p.parse("@M BAR").unwrap();
        assert_eq!(bare.macro_name, "BAR");
        assert_eq!(bare.raw_arguments, None);

        let nameless = p.parse("@M").unwrap();
        assert_eq!(nameless.macro_name, "");
    }

    #[test]
    fn several_invocations_in_order() {
        let (p, s) = patterns();
        assert_eq!(
            p.scan_line("x = @M A + @M B", &s),
            vec![" @M A", " @M B"]
        );
    }

    #[test]
    fn comment_truncates_scan() {
        let (p, s) = patterns();
        assert_eq!(p.scan_line("call f() ! @M HIDDEN", &s), Vec::<&str>::new());
        assert_eq!(p.scan_line("@M SHOWN ! @M HIDDEN", &s), vec!["@M SHOWN"]);
    }

    #[test]
    fn comment_marker_inside_string_is_not_a_comment() {
        let (p, s) = patterns();
        assert_eq!(
            strip_comment(r#"print *, "hi!" ! real"#, &s),
            r#"print *, "hi!" "#
        );
        assert_eq!(
            p.scan_line(r#"print *, "wow!", @M X"#, &s),
            vec![" @M X"]
        );
    }

    #[test]
    fn blank_and_comment_only_lines_scan_nothing() {
        let (p, s) = patterns();
        assert!(p.scan_line("", &s).is_empty());
        assert!(p.scan_line("   \t", &s).is_empty());
        assert!(p.scan_line("  ! @M X", &s).is_empty());
    }

    #[test]
    fn custom_marker_and_keyword() {
        let syntax = MacroSyntax {
            marker: '$',
            keyword: "MAC".into(),
            ..MacroSyntax::default()
        };
        let p = InvocationPatterns::new(&syntax).unwrap();
        assert_eq!(p.scan_line("a $MAC X(1)", &syntax), vec![" $MAC X(1)"]);
        assert!(p.scan_line("a @M X(1)", &syntax).is_empty());
    }
}
