//! Reader for the section/key-value format used by definition files.
//!
//! ```text
//! #! comment
//! [NAME]
//! definition =
//!     first line
//!     #ifdef FOO
//!     second line
//! args = a, b
//! ```
//!
//! Lines whose trimmed text starts with `#!` are comments. A plain `#` is
//! content, so directives survive inside template bodies. A line indented
//! deeper than the key that opened the current value continues that value.

use std::collections::HashSet;

const COMMENT_PREFIX: &str = "#!";
const DEFAULT_SECTION: &str = "DEFAULT";

/// Raw error from the reader. The caller attaches the file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniError {
    /// 1-based line number.
    pub line: usize,
    pub message: String,
}

impl IniError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniSection {
    pub name: String,
    /// 1-based line of the `[NAME]` header.
    pub line: usize,
    entries: Vec<(String, String)>,
}

impl IniSection {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A parsed document: named sections in file order plus the `[DEFAULT]` fallbacks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    pub sections: Vec<IniSection>,
    pub defaults: IniSection,
}

impl IniDocument {
    /// Look up `key` in `section`, falling back to `[DEFAULT]`.
    pub fn get<'a>(&'a self, section: &'a IniSection, key: &str) -> Option<&'a str> {
        section.get(key).or_else(|| self.defaults.get(key))
    }
}

/// Where the value currently being built lives.
enum Target {
    Defaults,
    Section(usize),
}

struct OpenValue {
    target: Target,
    entry: usize,
    indent: usize,
    lines: Vec<String>,
}

pub fn parse_ini(text: &str) -> Result<IniDocument, IniError> {
    let mut doc = IniDocument {
        defaults: IniSection {
            name: DEFAULT_SECTION.to_string(),
            ..Default::default()
        },
        ..Default::default()
    };
    let mut seen_sections: HashSet<String> = HashSet::new();
    let mut current: Option<Target> = None;
    let mut open: Option<OpenValue> = None;

    for (idx, raw) in text.lines().enumerate() {
        let lineno = idx + 1;
        let trimmed = raw.trim();

        if trimmed.starts_with(COMMENT_PREFIX) {
            continue;
        }

        if trimmed.is_empty() {
            if let Some(value) = open.as_mut() {
                value.lines.push(String::new());
            }
            continue;
        }

        let indent = raw.len() - raw.trim_start().len();

        if let Some(value) = open.as_mut() {
            if indent > value.indent {
                value.lines.push(trimmed.to_string());
                continue;
            }
        }

        // Anything else closes the value being built.
        if let Some(value) = open.take() {
            close_value(&mut doc, value);
        }

        // The header runs to the last `]`; anything after it is ignored.
        if let Some(name) = section_header(trimmed) {
            if name == DEFAULT_SECTION {
                current = Some(Target::Defaults);
                continue;
            }
            if !seen_sections.insert(name.to_string()) {
                return Err(IniError::new(
                    lineno,
                    format!("section [{name}] appears more than once"),
                ));
            }
            doc.sections.push(IniSection {
                name: name.to_string(),
                line: lineno,
                entries: Vec::new(),
            });
            current = Some(Target::Section(doc.sections.len() - 1));
            continue;
        }

        let Some(delim) = trimmed.find(['=', ':']) else {
            return Err(IniError::new(
                lineno,
                format!("expected `key = value`, found `{trimmed}`"),
            ));
        };
        let key = trimmed[..delim].trim();
        let value = trimmed[delim + 1..].trim();
        if key.is_empty() {
            return Err(IniError::new(lineno, "empty key"));
        }

        let section = match &current {
            Some(Target::Defaults) => &mut doc.defaults,
            Some(Target::Section(i)) => &mut doc.sections[*i],
            None => {
                return Err(IniError::new(
                    lineno,
                    format!("`{key}` appears before any [section] header"),
                ))
            }
        };
        if section.get(key).is_some() {
            return Err(IniError::new(
                lineno,
                format!("key `{key}` repeated in section [{}]", section.name),
            ));
        }
        section.entries.push((key.to_string(), String::new()));

        open = Some(OpenValue {
            target: match &current {
                Some(Target::Section(i)) => Target::Section(*i),
                _ => Target::Defaults,
            },
            entry: section.entries.len() - 1,
            indent,
            lines: vec![value.to_string()],
        });
    }

    if let Some(value) = open.take() {
        close_value(&mut doc, value);
    }

    Ok(doc)
}

fn section_header(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('[')?;
    let close = rest.rfind(']')?;
    (close > 0).then(|| &rest[..close])
}

fn close_value(doc: &mut IniDocument, value: OpenValue) {
    let section = match value.target {
        Target::Defaults => &mut doc.defaults,
        Target::Section(i) => &mut doc.sections[i],
    };
    let joined = value.lines.join("\n");
    section.entries[value.entry].1 = joined.trim_end().to_string();
}
