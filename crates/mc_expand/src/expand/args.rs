//! Argument binding: splits `a%,b,c` style argument text into values.

use mc_ast::MacroDefinition;

use crate::error::ExpandError;

/// Bind the raw argument text of an invocation to `def`.
///
/// Macros without parameters never look at the text. Macros with parameters
/// require it.
pub fn bind_arguments(
    def: &MacroDefinition,
    raw: Option<&str>,
    escape: char,
) -> Result<Vec<String>, ExpandError> {
    if def.parameters.is_empty() {
        return Ok(Vec::new());
    }
    let raw = raw.ok_or_else(|| ExpandError::MissingArguments {
        name: def.name.clone(),
    })?;
    Ok(split_arguments(raw, escape))
}

/// Split on unescaped commas and drop the escape markers.
///
/// `escape ,` is a literal comma, `escape escape` a literal escape character,
/// and an escape before anything else is removed.
pub fn split_arguments(raw: &str, escape: char) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c == escape {
            match chars.peek() {
                Some(&next) if next == escape || next == ',' => {
                    current.push(next);
                    chars.next();
                }
                _ => {}
            }
        } else if c == ',' {
            args.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }

    args.push(current);
    args
}
