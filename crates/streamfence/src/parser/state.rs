use alloc::string::String;

/// Which part of the stream the parser is reading.
///
/// The parser starts in [`Mode::DependencyCapture`] and moves to
/// [`Mode::Scanning`] at most once per stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Mode {
    /// Buffering a leading dependency block until `}}` is seen.
    #[default]
    DependencyCapture,
    /// Splitting the stream into prose and fenced code.
    Scanning,
}

/// The parser's cursor into the stream.
///
/// Exposed read-only through
/// [`StreamingParser::state`](crate::StreamingParser::state) for inspection
/// between writes. Every field returns to its default on `end` or `reset`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParserState {
    /// Current mode.
    pub mode: Mode,
    /// Consecutive backticks seen but not yet classified, always below 3.
    pub backtick_run: u8,
    /// Whether a code block is open.
    pub in_code_block: bool,
    /// Whether the language tag after an opening fence is still being read.
    pub reading_language: bool,
    /// Language tag of the open block. Raw while `reading_language` is set,
    /// normalized afterwards.
    pub language_id: String,
    /// Raw text received since dependency capture began.
    pub pending_dependency_buffer: String,
    /// Body of the open code block.
    pub code_buffer: String,
    /// All plain text emitted so far.
    pub display_buffer: String,
    /// Plain text received but not yet emitted.
    pub text_buffer: String,
}
