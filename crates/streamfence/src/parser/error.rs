use alloc::string::String;

use thiserror::Error;

/// Errors raised while configuring a parser.
///
/// Streaming itself never fails: malformed dependency blocks and unterminated
/// fences are resolved into well-defined fallback output instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParserError {
    /// The delimiter pattern is not a valid regular expression.
    #[error("invalid delimiter pattern `{pattern}`: {reason}")]
    InvalidDelimiter {
        /// The rejected pattern.
        pattern: String,
        /// Why it failed to compile.
        reason: String,
    },
    /// The delimiter pattern matches the empty string, so it could match
    /// without consuming input and stall scanning between writes.
    #[error("delimiter pattern `{pattern}` matches the empty string")]
    EmptyMatchDelimiter {
        /// The rejected pattern.
        pattern: String,
    },
}
