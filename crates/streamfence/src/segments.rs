//! Folding parser events into a list of prose and code segments.

use alloc::{borrow::ToOwned, string::String, vec::Vec};

use crate::{DependencyMap, ParseEvent, ParserOptions, StreamingParser, trim_before_import};

/// One classified span of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "lowercase"))]
pub enum Segment {
    /// Prose outside code blocks.
    Markdown {
        /// The markdown text.
        content: String,
    },
    /// A fenced code block.
    Code {
        /// The code body, updated in place while the block is open.
        content: String,
        /// Normalized language tag.
        language: String,
    },
}

/// Options for [`SegmentCollector`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentOptions {
    /// Whether to apply [`trim_before_import`] to each finished code block.
    ///
    /// # Default
    ///
    /// `false`
    pub trim_before_import: bool,
}

/// Everything collected from a response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParsedResponse {
    /// Dependencies declared by the leading block.
    pub dependencies: DependencyMap,
    /// Prose and code segments in stream order.
    pub segments: Vec<Segment>,
}

/// Builds [`Segment`]s from parser events as they arrive.
///
/// Consecutive prose is merged into one markdown segment. A code segment is
/// created when its block starts and rewritten by each update, so the last
/// segment always reflects the code received so far.
#[derive(Debug, Clone, Default)]
pub struct SegmentCollector {
    options: SegmentOptions,
    response: ParsedResponse,
    code_open: bool,
}

impl SegmentCollector {
    /// Creates an empty collector.
    #[must_use]
    pub fn new(options: SegmentOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Folds one event into the segments.
    pub fn apply(&mut self, event: &ParseEvent) {
        match event {
            ParseEvent::DependenciesReady { dependencies } => {
                self.response
                    .dependencies
                    .extend(dependencies.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
            ParseEvent::Text { fragment, .. } => match self.response.segments.last_mut() {
                Some(Segment::Markdown { content }) if !self.code_open => content.push_str(fragment),
                _ => self.response.segments.push(Segment::Markdown {
                    content: fragment.clone(),
                }),
            },
            ParseEvent::CodeBlockStart { language } => {
                self.response.segments.push(Segment::Code {
                    content: String::new(),
                    language: language.clone(),
                });
                self.code_open = true;
            }
            ParseEvent::CodeBlockUpdate { code } => {
                if let Some(content) = self.open_code() {
                    content.clone_from(code);
                }
            }
            ParseEvent::Code { code, language } => {
                let code = if self.options.trim_before_import {
                    trim_before_import(code)
                } else {
                    code
                };
                match self.open_code() {
                    Some(content) => code.clone_into(content),
                    None => self.response.segments.push(Segment::Code {
                        content: code.into(),
                        language: language.clone(),
                    }),
                }
                self.code_open = false;
            }
            ParseEvent::Match { .. } => {}
        }
    }

    /// Returns the segments collected so far.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.response.segments
    }

    /// Returns the dependencies collected so far.
    #[must_use]
    pub fn dependencies(&self) -> &DependencyMap {
        &self.response.dependencies
    }

    /// Returns `true` while the last segment is an unfinished code block.
    #[must_use]
    pub fn is_code_open(&self) -> bool {
        self.code_open
    }

    /// Consumes the collector.
    #[must_use]
    pub fn finish(self) -> ParsedResponse {
        self.response
    }

    fn open_code(&mut self) -> Option<&mut String> {
        if !self.code_open {
            return None;
        }
        match self.response.segments.last_mut() {
            Some(Segment::Code { content, .. }) => Some(content),
            _ => None,
        }
    }
}

/// Parses a complete response in one go.
///
/// ```rust
/// use streamfence::{Segment, parse_response};
///
/// let parsed = parse_response("{\"vite\": \"5.0.0\"}}Run:\n```sh\nnpm i\n```");
/// assert_eq!(parsed.dependencies["vite"], "5.0.0");
/// assert_eq!(
///     parsed.segments[1],
///     Segment::Code {
///         content: "npm i\n".into(),
///         language: "sh".into(),
///     }
/// );
/// ```
#[must_use]
pub fn parse_response(text: &str) -> ParsedResponse {
    let mut parser = StreamingParser::new(ParserOptions::default());
    let mut collector = SegmentCollector::new(SegmentOptions::default());
    for event in parser.write(text) {
        collector.apply(&event);
    }
    for event in parser.end() {
        collector.apply(&event);
    }
    collector.finish()
}
