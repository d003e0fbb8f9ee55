//! Parameter extraction from a method header.
//!
//! Only the text between the first `(` and the next `)` on the same line is
//! looked at. Nothing is parsed: `(int a, int b)` inside a string literal or
//! a call expression is taken just the same if it comes first.

use std::fmt;

/// One comma-separated entry of a parameter list.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExtractedParameter {
    /// First token of the entry, when it has two or more.
    pub type_token: Option<String>,
    /// Last token of the entry; empty for an empty entry.
    pub name: String,
}

impl ExtractedParameter {
    pub fn new(type_token: Option<&str>, name: &str) -> Self {
        ExtractedParameter {
            type_token: type_token.map(str::to_string),
            name: name.to_string(),
        }
    }
}

/// `type name`, or just `name` without a type token.
impl fmt::Display for ExtractedParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.type_token {
            Some(ty) => write!(f, "{ty} {}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Extract the parameter list of the first parenthesized region.
///
/// Never fails: no region, or an empty one, yields an empty list. Empty
/// entries are kept (with an empty name) so positions line up with the
/// commas in the source.
pub fn extract_parameters(snippet: &str) -> Vec<ExtractedParameter> {
    match first_parenthesized(snippet) {
        Some(interior) if !interior.is_empty() => interior.split(',').map(parse_entry).collect(),
        _ => Vec::new(),
    }
}

/// Interior of the first `(` ... `)` pair that sits on one line.
fn first_parenthesized(text: &str) -> Option<&str> {
    text.match_indices('(').find_map(|(open, _)| {
        let after = &text[open + 1..];
        let line = after.find('\n').map_or(after, |end| &after[..end]);
        line.find(')').map(|close| &line[..close])
    })
}

fn parse_entry(entry: &str) -> ExtractedParameter {
    let tokens: Vec<&str> = entry.split_whitespace().collect();
    match tokens.as_slice() {
        [] => ExtractedParameter::new(None, ""),
        [name] => ExtractedParameter::new(None, name),
        [ty, .., name] => ExtractedParameter::new(Some(ty), name),
    }
}
