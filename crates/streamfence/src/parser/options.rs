#[cfg(feature = "delimiter")]
use super::Delimiter;

/// Configuration options for the streaming parser.
///
/// # Examples
///
/// ```rust
/// use streamfence::{ParserOptions, StreamingParser};
///
/// let parser = StreamingParser::new(ParserOptions {
///     coalesce_code_updates: true,
///     ..Default::default()
/// });
/// ```
///
/// # Default
///
/// All flags default to `false` and no delimiter is configured.
#[derive(Debug, Clone, Default)]
pub struct ParserOptions {
    /// Whether to treat the stream as having no leading dependency block.
    ///
    /// By default the parser captures a dependency block when the first
    /// non-whitespace character of the stream is `{`, buffering until the
    /// closing `}}` arrives. When `true`, the stream is scanned for prose and
    /// code from its first character and `{` has no special meaning.
    ///
    /// # Default
    ///
    /// `false`
    pub skip_dependency_block: bool,

    /// Whether to coalesce code block updates.
    ///
    /// When `false`, a `CodeBlockUpdate` carrying the whole body so far is
    /// emitted for every character appended to an open code block. Enabling
    /// this emits at most one update per `write` call, plus one right before
    /// the block's `Code` event if the body grew since the last update.
    ///
    /// # Default
    ///
    /// `false`
    pub coalesce_code_updates: bool,

    /// An additional pattern to split the stream on.
    ///
    /// Every match over the content following the dependency block is
    /// reported as a `Match` event, in the same order and with the same text
    /// as a whole-content search. A match is reported once no further input
    /// can change it, or when the stream ends.
    ///
    /// # Default
    ///
    /// `None`
    #[cfg(feature = "delimiter")]
    pub delimiter: Option<Delimiter>,
}
