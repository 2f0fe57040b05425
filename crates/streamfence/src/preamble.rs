/// Drops commentary lines a model wrote before the first `import`.
///
/// Returns `code` starting at the first line whose first token is an
/// `import` statement, or `code` unchanged when there is none. This is a
/// presentation policy for finished code segments; the parser never applies
/// it on its own.
///
/// ```rust
/// use streamfence::trim_before_import;
///
/// let code = "Here is the component:\nimport React from 'react';\n";
/// assert_eq!(trim_before_import(code), "import React from 'react';\n");
/// ```
#[must_use]
pub fn trim_before_import(code: &str) -> &str {
    let mut offset = 0;
    for line in code.split_inclusive('\n') {
        if is_import(line.trim_start()) {
            return &code[offset..];
        }
        offset += line.len();
    }
    code
}

fn is_import(line: &str) -> bool {
    line.strip_prefix("import").is_some_and(|rest| {
        rest.starts_with(|c: char| c.is_whitespace() || matches!(c, '{' | '"' | '\'' | '*'))
    })
}
