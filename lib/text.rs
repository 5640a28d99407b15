//! Small string helpers shared by the descriptor builder and the connector configuration.

use regex::Regex;
use std::sync::LazyLock;

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Separator between the key and the value of a raw property. ASCII whitespace only.
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u:\s)+").expect("Invalid regex pattern"));

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Whether the value contains at least one character that is not ASCII whitespace.
pub fn has_text(value: &str) -> bool {
    value.chars().any(|c| !is_blank(c))
}

/// Same set as the `(?-u:\s)` class: space, `\t`, `\n`, vertical tab, form feed, `\r`.
fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

/// Remove one leading and one trailing double quote, each only if present.
///
/// Inner quotes are kept, so `""a""` becomes `"a"`.
pub fn strip_enclosing_quotes(value: &str) -> &str {
    let value = value.strip_prefix('"').unwrap_or(value);
    value.strip_suffix('"').unwrap_or(value)
}

/// Split a raw property into `(key, value)` on the first run of whitespace.
///
/// Enclosing quotes are stripped first. Returns `None` when there is no
/// whitespace to split on or the key is empty.
pub fn split_property(raw: &str) -> Option<(&str, &str)> {
    let mut parts = WHITESPACE_RUN.splitn(strip_enclosing_quotes(raw), 2);
    let key = parts.next()?;
    let value = parts.next()?;
    if key.is_empty() {
        return None;
    }
    Some((key, value))
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
