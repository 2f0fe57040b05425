//! Incremental delimiter matching.
//!
//! Matches are the non-overlapping leftmost-first matches the pattern would
//! report over the whole content, whatever the chunking. Every char boundary
//! opens an anchored DFA search. A search is settled once its DFA state is
//! dead, or at end of stream. Only text from the earliest unsettled start is
//! retained, plus one char of look-behind.

use alloc::{
    collections::VecDeque,
    string::{String, ToString},
};
use core::fmt;

use regex_automata::{
    Anchored, Input,
    dfa::{Automaton, StartKind, dense},
    nfa::thompson::NFA,
    util::primitives::StateID,
};

use super::ParserError;
use crate::ParseEvent;

const DFA_SIZE_LIMIT: usize = 10 * (1 << 20);

/// A validated pattern to split the stream on.
///
/// # Examples
///
/// ```rust
/// use streamfence::{Delimiter, ParserError};
///
/// assert!(Delimiter::new(r"<hr\s*/?>").is_ok());
/// assert!(matches!(
///     Delimiter::new("x*"),
///     Err(ParserError::EmptyMatchDelimiter { .. })
/// ));
/// ```
#[derive(Clone)]
pub struct Delimiter {
    pattern: String,
    dfa: dense::DFA<alloc::vec::Vec<u32>>,
}

impl Delimiter {
    /// Compiles `pattern`.
    ///
    /// # Errors
    ///
    /// Fails if the pattern does not compile, if it can match the empty
    /// string, or if it uses a Unicode word boundary (`\b` without `(?-u)`).
    pub fn new(pattern: &str) -> Result<Self, ParserError> {
        let invalid = |reason: String| ParserError::InvalidDelimiter {
            pattern: pattern.into(),
            reason,
        };
        let nfa = NFA::new(pattern).map_err(|err| invalid(err.to_string()))?;
        if nfa.has_empty() {
            return Err(ParserError::EmptyMatchDelimiter {
                pattern: pattern.into(),
            });
        }
        let dfa = dense::Builder::new()
            .configure(
                dense::Config::new()
                    .start_kind(StartKind::Anchored)
                    .dfa_size_limit(Some(DFA_SIZE_LIMIT)),
            )
            .build(pattern)
            .map_err(|err| invalid(err.to_string()))?;
        Ok(Self {
            pattern: pattern.into(),
            dfa,
        })
    }

    /// Returns the source pattern.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.pattern
    }
}

impl fmt::Debug for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Delimiter").field(&self.pattern).finish()
    }
}

/// An anchored search that started at stream offset `start`.
#[derive(Debug, Clone)]
struct Candidate {
    start: usize,
    state: StateID,
    /// End of the longest preferred match seen so far.
    end: Option<usize>,
    settled: bool,
}

impl Candidate {
    /// Feeds the byte at stream offset `at`. DFA matches are reported one
    /// byte late, so a match state here means a match ending at `at`.
    fn step(&mut self, dfa: &dense::DFA<alloc::vec::Vec<u32>>, byte: u8, at: usize) {
        self.state = dfa.next_state(self.state, byte);
        if dfa.is_match_state(self.state) {
            self.end = Some(at);
        } else if dfa.is_dead_state(self.state) || dfa.is_quit_state(self.state) {
            self.settled = true;
        }
    }

    fn finish(&mut self, dfa: &dense::DFA<alloc::vec::Vec<u32>>, at: usize) {
        self.state = dfa.next_eoi_state(self.state);
        if dfa.is_match_state(self.state) {
            self.end = Some(at);
        }
        self.settled = true;
    }
}

/// Scans content for delimiter matches across writes.
#[derive(Debug, Clone)]
pub(crate) struct DelimiterScan {
    delimiter: Delimiter,
    /// Retained content. `window[0]` sits at stream offset `base`.
    window: String,
    base: usize,
    /// Stream offset of the next byte to feed to the searches.
    fed: usize,
    /// Open and settled searches, ordered by start.
    candidates: VecDeque<Candidate>,
}

impl DelimiterScan {
    pub(crate) fn new(delimiter: Delimiter) -> Self {
        Self {
            delimiter,
            window: String::new(),
            base: 0,
            fed: 0,
            candidates: VecDeque::new(),
        }
    }

    pub(crate) fn push(&mut self, text: &str) {
        self.window.push_str(text);
    }

    /// Feeds pushed content to the searches and queues a `Match` for every
    /// settled one, in stream order.
    pub(crate) fn drain_matches(&mut self, at_end: bool, events: &mut VecDeque<ParseEvent>) {
        while self.fed < self.base + self.window.len() {
            self.feed_next();
            self.settle(events);
        }
        if at_end {
            let dfa = &self.delimiter.dfa;
            for candidate in self.candidates.iter_mut().filter(|c| !c.settled) {
                candidate.finish(dfa, self.fed);
            }
            self.settle(events);
            self.clear();
        } else {
            self.trim();
        }
    }

    fn feed_next(&mut self) {
        let at = self.fed;
        let local = at - self.base;
        if self.window.is_char_boundary(local) {
            let input = Input::new(&self.window)
                .range(local..)
                .anchored(Anchored::Yes);
            match self.delimiter.dfa.start_state_forward(&input) {
                Ok(state) => self.candidates.push_back(Candidate {
                    start: at,
                    state,
                    end: None,
                    settled: false,
                }),
                Err(err) => tracing::warn!(%err, at, "delimiter search not started"),
            }
        }
        let byte = self.window.as_bytes()[local];
        let dfa = &self.delimiter.dfa;
        for candidate in self.candidates.iter_mut().filter(|c| !c.settled) {
            candidate.step(dfa, byte, at);
        }
        self.fed += 1;
    }

    /// Emits settled searches from the front. An unsettled search blocks
    /// everything after it, since it may still produce the leftmost match.
    fn settle(&mut self, events: &mut VecDeque<ParseEvent>) {
        while self.candidates.front().is_some_and(|c| c.settled) {
            let Some(candidate) = self.candidates.pop_front() else {
                break;
            };
            let Some(end) = candidate.end else {
                continue;
            };
            let span = candidate.start - self.base..end - self.base;
            if let Some(text) = self.window.get(span) {
                events.push_back(ParseEvent::Match { text: text.into() });
            }
            self.candidates.retain(|c| c.start >= end);
        }
    }

    /// Drops text no open search can reach, keeping one char of look-behind.
    fn trim(&mut self) {
        let keep = self.candidates.front().map_or(self.fed, |c| c.start) - self.base;
        let cut = self
            .window
            .get(..keep)
            .and_then(|head| head.char_indices().next_back())
            .map_or(0, |(index, _)| index);
        if cut > 0 {
            self.window.drain(..cut);
            self.base += cut;
        }
    }

    pub(crate) fn clear(&mut self) {
        self.window.clear();
        self.base = 0;
        self.fed = 0;
        self.candidates.clear();
    }

    #[cfg(test)]
    pub(super) fn retained_len(&self) -> usize {
        self.window.len()
    }
}
