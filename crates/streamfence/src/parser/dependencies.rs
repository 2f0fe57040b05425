//! Lenient extraction of the leading dependency block.
//!
//! Models routinely emit this block with trailing commas, missing commas or
//! nesting, so it is not parsed as JSON. Instead every `"key": "value"` pair
//! is picked out of the text, the same way a global regex scan for
//! `"([^"]*)"\s*:\s*"([^"]*)"` would.

use alloc::{collections::BTreeMap, string::String};

/// Package name to version specifier.
pub type DependencyMap = BTreeMap<String, String>;

/// Extracts every quoted key/value pair from `payload`.
///
/// Keys and values are trimmed; pairs with an empty key or value are
/// dropped. A later duplicate key overrides an earlier one.
pub(crate) fn extract_dependencies(payload: &str) -> DependencyMap {
    let mut dependencies = DependencyMap::new();
    let mut from = 0;
    while let Some(offset) = payload[from..].find('"') {
        let start = from + offset;
        match match_pair(&payload[start..]) {
            Some((key, value, len)) => {
                let (key, value) = (key.trim(), value.trim());
                if !key.is_empty() && !value.is_empty() {
                    dependencies.insert(key.into(), value.into());
                }
                from = start + len;
            }
            None => from = start + 1,
        }
    }
    dependencies
}

/// Matches a pair at the start of `input`, which begins with `"`.
///
/// Returns the key, the value, and the byte length of the match.
fn match_pair(input: &str) -> Option<(&str, &str, usize)> {
    let key_end = 1 + input[1..].find('"')?;
    let key = &input[1..key_end];

    let mut pos = key_end + 1;
    pos += leading_whitespace(&input[pos..]);
    pos += input[pos..].strip_prefix(':').map(|_| 1)?;
    pos += leading_whitespace(&input[pos..]);
    pos += input[pos..].strip_prefix('"').map(|_| 1)?;

    let value_end = pos + input[pos..].find('"')?;
    Some((key, &input[pos..value_end], value_end + 1))
}

fn leading_whitespace(s: &str) -> usize {
    s.len() - s.trim_start().len()
}
