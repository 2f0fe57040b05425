//! The streaming response parser.
//!
//! Overview
//! - A stream opens in `DependencyCapture` mode. If its first non-whitespace
//!   character is `{`, raw input is buffered until the first `}}`; the
//!   buffered prefix up to and including `}}` is the dependency block, and
//!   whatever follows is replayed as ordinary content. Any other first
//!   character means the stream has no dependency block, and the buffer is
//!   replayed at once.
//! - In `Scanning` mode input is consumed one character at a time. Runs of
//!   three backticks are fences: an opening fence switches to reading the
//!   language tag up to the next newline, a closing fence emits the finished
//!   block. Shorter runs are ordinary characters. Everything else goes to the
//!   open code block or to the pending plain text.
//! - Pending plain text is emitted at the end of every `write` and before each
//!   code block starts, so prose is never held back across writes and stays
//!   ordered relative to code.
//!
//! All state survives chunk boundaries, so the output depends only on the
//! concatenated input, never on where it was split (apart from how `Text`
//! fragments and coalesced updates are grouped).

mod dependencies;
#[cfg(feature = "delimiter")]
mod delimiter;
mod error;
mod fence;
mod options;
mod state;

#[cfg(test)]
mod tests;

use alloc::{
    collections::{VecDeque, vec_deque},
    string::String,
};
use core::mem;

pub use dependencies::DependencyMap;
use dependencies::extract_dependencies;
#[cfg(feature = "delimiter")]
pub use delimiter::Delimiter;
#[cfg(feature = "delimiter")]
use delimiter::DelimiterScan;
pub use error::ParserError;
use fence::{FENCE_LEN, normalize_language};
pub use options::ParserOptions;
pub use state::{Mode, ParserState};
use tracing::{debug, trace};

use crate::ParseEvent;

/// The streaming response parser.
///
/// Feed chunks with [`write`](Self::write) and close the stream with
/// [`end`](Self::end). Both return the events produced by that call. After
/// `end` the parser is back in its initial state and can take a new stream.
///
/// # Examples
///
/// ```rust
/// use streamfence::{ParseEvent, ParserOptions, StreamingParser};
///
/// let mut parser = StreamingParser::new(ParserOptions::default());
/// let events: Vec<_> = parser.write("{\"zod\": \"3.22.4\"}}Done.").collect();
/// assert_eq!(
///     events[1],
///     ParseEvent::Text {
///         fragment: "Done.".into(),
///         display: "Done.".into(),
///     }
/// );
/// assert_eq!(parser.end().count(), 0);
/// ```
#[derive(Debug)]
pub struct StreamingParser {
    state: ParserState,
    events: VecDeque<ParseEvent>,

    skip_dependency_block: bool,
    coalesce_code_updates: bool,
    /// Code grew since the last coalesced update.
    code_dirty: bool,

    #[cfg(feature = "delimiter")]
    delimiter: Option<DelimiterScan>,
}

impl Default for StreamingParser {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}

/// Events produced by one [`StreamingParser::write`] or
/// [`StreamingParser::end`] call, in order.
///
/// Events left unread when this iterator is dropped are discarded.
#[derive(Debug)]
pub struct Events<'a> {
    inner: vec_deque::Drain<'a, ParseEvent>,
}

impl Iterator for Events<'_> {
    type Item = ParseEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Events<'_> {}

impl StreamingParser {
    /// Creates a new `StreamingParser` with the given options.
    #[must_use]
    pub fn new(options: ParserOptions) -> Self {
        Self {
            state: ParserState::default(),
            events: VecDeque::new(),
            skip_dependency_block: options.skip_dependency_block,
            coalesce_code_updates: options.coalesce_code_updates,
            code_dirty: false,
            #[cfg(feature = "delimiter")]
            delimiter: options.delimiter.map(DelimiterScan::new),
        }
    }

    /// Creates a parser that also reports matches of `pattern`.
    ///
    /// # Errors
    ///
    /// Fails if `pattern` is rejected by [`Delimiter::new`].
    #[cfg(feature = "delimiter")]
    pub fn with_delimiter(pattern: &str) -> Result<Self, ParserError> {
        Ok(Self::new(ParserOptions {
            delimiter: Some(Delimiter::new(pattern)?),
            ..ParserOptions::default()
        }))
    }

    /// Returns the current parse state.
    #[must_use]
    pub fn state(&self) -> &ParserState {
        &self.state
    }

    /// Feeds a chunk of the response.
    ///
    /// The chunk may split a word, a fence or the dependency block anywhere.
    /// Plain text received in this chunk is always emitted before returning;
    /// an unfinished fence or dependency block is kept for the next call.
    ///
    /// ```rust
    /// # use streamfence::{ParseEvent, StreamingParser};
    /// let mut parser = StreamingParser::default();
    /// assert_eq!(parser.write("{\"react\":").count(), 0);
    /// assert_eq!(parser.state().pending_dependency_buffer, "{\"react\":");
    /// ```
    pub fn write(&mut self, chunk: &str) -> Events<'_> {
        match self.state.mode {
            Mode::DependencyCapture => self.capture_dependencies(chunk),
            Mode::Scanning => self.scan(chunk),
        }
        self.flush_code_update();
        self.flush_text();
        #[cfg(feature = "delimiter")]
        self.drain_matches(false);
        #[cfg(any(test, feature = "fuzzing"))]
        self.assert_invariants();
        self.drain()
    }

    /// Ends the stream and flushes everything still pending.
    ///
    /// An unterminated dependency block is replayed as ordinary content, an
    /// open code block is emitted as a final `Code` event, and remaining text
    /// is emitted. The parser is then reset; calling `end` again yields
    /// nothing.
    pub fn end(&mut self) -> Events<'_> {
        if !self.state.pending_dependency_buffer.is_empty() {
            let pending = mem::take(&mut self.state.pending_dependency_buffer);
            debug!("stream ended without closing dependency block");
            self.state.mode = Mode::Scanning;
            self.scan(&pending);
        }
        self.release_backticks();
        if self.state.reading_language {
            self.finish_language();
        }
        if self.state.in_code_block {
            trace!("closing unterminated code block");
            self.close_code_block();
        }
        self.flush_text();
        #[cfg(feature = "delimiter")]
        self.drain_matches(true);

        self.reset_state();
        self.drain()
    }

    /// Returns every state field to its initial value and drops queued
    /// events.
    pub fn reset(&mut self) {
        trace!("parser reset");
        self.reset_state();
        self.events.clear();
    }

    fn reset_state(&mut self) {
        self.state = ParserState::default();
        self.code_dirty = false;
        #[cfg(feature = "delimiter")]
        if let Some(scan) = &mut self.delimiter {
            scan.clear();
        }
    }

    #[cfg(any(test, feature = "fuzzing"))]
    fn assert_invariants(&self) {
        let state = &self.state;
        assert!(state.backtick_run < FENCE_LEN, "fence not consumed");
        assert!(state.text_buffer.is_empty(), "plain text held across writes");
        if state.mode == Mode::Scanning {
            assert!(state.pending_dependency_buffer.is_empty());
        }
        if state.reading_language {
            assert!(state.in_code_block && state.code_buffer.is_empty());
        }
        if !state.in_code_block {
            assert!(state.code_buffer.is_empty() && state.language_id.is_empty());
        }
    }

    fn drain(&mut self) -> Events<'_> {
        Events {
            inner: self.events.drain(..),
        }
    }

    // --------------------------------------------------------------------------------------------
    // Dependency capture
    // --------------------------------------------------------------------------------------------

    fn capture_dependencies(&mut self, chunk: &str) {
        if self.skip_dependency_block {
            self.state.mode = Mode::Scanning;
            self.scan(chunk);
            return;
        }

        self.state.pending_dependency_buffer.push_str(chunk);
        let first = self.state.pending_dependency_buffer.trim_start().chars().next();
        match first {
            None => return,
            Some('{') => {}
            Some(_) => {
                debug!("no dependency block, scanning");
                let pending = mem::take(&mut self.state.pending_dependency_buffer);
                self.state.mode = Mode::Scanning;
                self.scan(&pending);
                return;
            }
        }

        let Some(close) = self.state.pending_dependency_buffer.find("}}") else {
            return;
        };
        let pending = mem::take(&mut self.state.pending_dependency_buffer);
        let (block, rest) = pending.split_at(close + 2);
        let dependencies = extract_dependencies(block);
        debug!(count = dependencies.len(), "dependency block captured");
        self.events
            .push_back(ParseEvent::DependenciesReady { dependencies });
        self.state.mode = Mode::Scanning;
        if !rest.is_empty() {
            self.scan(rest);
        }
    }

    // --------------------------------------------------------------------------------------------
    // Scanning
    // --------------------------------------------------------------------------------------------

    fn scan(&mut self, text: &str) {
        #[cfg(feature = "delimiter")]
        if let Some(scan) = &mut self.delimiter {
            scan.push(text);
        }
        for ch in text.chars() {
            self.step(ch);
        }
    }

    fn step(&mut self, ch: char) {
        if self.state.reading_language {
            if ch == '\n' {
                self.finish_language();
            } else {
                self.state.language_id.push(ch);
            }
            return;
        }

        if ch == '`' {
            self.state.backtick_run += 1;
            if self.state.backtick_run == FENCE_LEN {
                self.state.backtick_run = 0;
                self.fence();
            }
            return;
        }

        self.release_backticks();
        self.push_content(ch);
    }

    /// Handles a complete fence marker.
    fn fence(&mut self) {
        if self.state.in_code_block {
            self.close_code_block();
        } else {
            self.flush_text();
            self.state.in_code_block = true;
            self.state.reading_language = true;
            self.state.language_id.clear();
        }
    }

    fn finish_language(&mut self) {
        self.state.reading_language = false;
        let language = normalize_language(&self.state.language_id);
        trace!(language = %language, "code block opened");
        self.state.language_id.clone_from(&language);
        self.events
            .push_back(ParseEvent::CodeBlockStart { language });
    }

    fn close_code_block(&mut self) {
        self.flush_code_update();
        self.state.in_code_block = false;
        let code = mem::take(&mut self.state.code_buffer);
        let language = mem::take(&mut self.state.language_id);
        trace!(language = %language, len = code.len(), "code block closed");
        self.events.push_back(ParseEvent::Code { code, language });
    }

    /// Turns a short backtick run back into ordinary characters.
    fn release_backticks(&mut self) {
        for _ in 0..mem::take(&mut self.state.backtick_run) {
            self.push_content('`');
        }
    }

    fn push_content(&mut self, ch: char) {
        if !self.state.in_code_block {
            self.state.text_buffer.push(ch);
            return;
        }

        self.state.code_buffer.push(ch);
        if self.coalesce_code_updates {
            self.code_dirty = true;
        } else {
            self.events.push_back(ParseEvent::CodeBlockUpdate {
                code: self.state.code_buffer.clone(),
            });
        }
    }

    fn flush_code_update(&mut self) {
        if mem::take(&mut self.code_dirty) && self.state.in_code_block {
            self.events.push_back(ParseEvent::CodeBlockUpdate {
                code: self.state.code_buffer.clone(),
            });
        }
    }

    fn flush_text(&mut self) {
        if self.state.text_buffer.is_empty() {
            return;
        }
        let fragment: String = mem::take(&mut self.state.text_buffer);
        self.state.display_buffer.push_str(&fragment);
        self.events.push_back(ParseEvent::Text {
            fragment,
            display: self.state.display_buffer.clone(),
        });
    }

    #[cfg(feature = "delimiter")]
    fn drain_matches(&mut self, at_end: bool) {
        if let Some(scan) = &mut self.delimiter {
            scan.drain_matches(at_end, &mut self.events);
        }
    }
}
