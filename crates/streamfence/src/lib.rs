//! An incremental parser for streamed LLM chat responses.
//!
//! Model responses that generate application code conventionally open with a
//! JSON-like dependency block, followed by markdown prose with fenced code
//! blocks. [`StreamingParser`] consumes such a response chunk by chunk, with
//! chunk boundaries falling anywhere, and yields [`ParseEvent`]s as soon as
//! each piece of the response can be classified.
//!
//! ```rust
//! use streamfence::{ParseEvent, ParserOptions, StreamingParser};
//!
//! let mut parser = StreamingParser::new(ParserOptions::default());
//! let mut events: Vec<ParseEvent> = vec![];
//! for chunk in ["{\"react\": \"18.2.0\"}}Here:\n``", "`js\nconsole.log(1);\n```"] {
//!     events.extend(parser.write(chunk));
//! }
//! events.extend(parser.end());
//!
//! assert!(events.contains(&ParseEvent::Code {
//!     code: "console.log(1);\n".into(),
//!     language: "js".into(),
//! }));
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod event;
mod listeners;
mod parser;
#[cfg(feature = "segments")]
mod preamble;
#[cfg(feature = "segments")]
mod segments;


pub use event::{EventKind, ParseEvent};
pub use listeners::{Listeners, ListeningParser};
#[cfg(feature = "delimiter")]
pub use parser::Delimiter;
pub use parser::{
    DependencyMap, Events, Mode, ParserError, ParserOptions, ParserState, StreamingParser,
};
#[cfg(feature = "segments")]
pub use preamble::trim_before_import;
#[cfg(feature = "segments")]
pub use segments::{ParsedResponse, Segment, SegmentCollector, SegmentOptions, parse_response};
