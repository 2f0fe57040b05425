use alloc::string::String;

use crate::parser::DependencyMap;

/// An event produced while parsing a streamed response.
///
/// Events are yielded in the order the corresponding input was consumed.
/// Each event is yielded exactly once; an event dropped unread is lost.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", rename_all = "kebab-case"))]
pub enum ParseEvent {
    /// The leading dependency block was closed by `}}`.
    ///
    /// The map may be empty when the block held no recognizable pairs.
    DependenciesReady {
        /// Package name to version specifier.
        dependencies: DependencyMap,
    },
    /// Plain text outside any code block.
    Text {
        /// Text added since the previous `Text` event.
        fragment: String,
        /// All plain text of the stream so far, `fragment` included.
        display: String,
    },
    /// An opening fence and its language tag were read.
    CodeBlockStart {
        /// Normalized language tag, empty when the fence had none.
        language: String,
    },
    /// The body of the open code block grew.
    CodeBlockUpdate {
        /// The whole body received so far.
        code: String,
    },
    /// A code block was closed, by a fence or by the end of the stream.
    Code {
        /// The complete body.
        code: String,
        /// Normalized language tag.
        language: String,
    },
    /// The configured delimiter matched.
    Match {
        /// The matched text.
        text: String,
    },
}

impl ParseEvent {
    /// Returns the kind of this event.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            ParseEvent::DependenciesReady { .. } => EventKind::DependenciesReady,
            ParseEvent::Text { .. } => EventKind::Text,
            ParseEvent::CodeBlockStart { .. } => EventKind::CodeBlockStart,
            ParseEvent::CodeBlockUpdate { .. } => EventKind::CodeBlockUpdate,
            ParseEvent::Code { .. } => EventKind::Code,
            ParseEvent::Match { .. } => EventKind::Match,
        }
    }
}

/// The kind of a [`ParseEvent`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum EventKind {
    /// See [`ParseEvent::DependenciesReady`].
    DependenciesReady,
    /// See [`ParseEvent::Text`].
    Text,
    /// See [`ParseEvent::CodeBlockStart`].
    CodeBlockStart,
    /// See [`ParseEvent::CodeBlockUpdate`].
    CodeBlockUpdate,
    /// See [`ParseEvent::Code`].
    Code,
    /// See [`ParseEvent::Match`].
    Match,
}
