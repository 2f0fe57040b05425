//! Subscription-style delivery on top of [`StreamingParser`].

use alloc::{boxed::Box, vec::Vec};
use core::fmt;

use crate::{EventKind, ParseEvent, ParserOptions, ParserState, StreamingParser};

type Handler<'h> = Box<dyn FnMut(&ParseEvent) + 'h>;

/// Handlers registered per [`EventKind`].
///
/// Any number of handlers may be registered for a kind. Handlers for the
/// same kind run in registration order.
#[derive(Default)]
pub struct Listeners<'h> {
    handlers: Vec<(EventKind, Handler<'h>)>,
}

impl fmt::Debug for Listeners<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.handlers.iter().map(|(kind, _)| kind))
            .finish()
    }
}

impl<'h> Listeners<'h> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for events of `kind`.
    pub fn on(&mut self, kind: EventKind, handler: impl FnMut(&ParseEvent) + 'h) {
        self.handlers.push((kind, Box::new(handler)));
    }

    /// Removes every handler.
    pub fn remove_all_listeners(&mut self) {
        self.handlers.clear();
    }

    /// Returns the number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Calls every handler registered for the kind of `event`.
    pub fn emit(&mut self, event: &ParseEvent) {
        let kind = event.kind();
        for (_, handler) in self.handlers.iter_mut().filter(|(k, _)| *k == kind) {
            handler(event);
        }
    }
}

/// A [`StreamingParser`] that pushes its events to registered handlers.
///
/// # Examples
///
/// ```rust
/// use std::cell::RefCell;
///
/// use streamfence::{EventKind, ListeningParser, ParseEvent, ParserOptions};
///
/// let blocks = RefCell::new(vec![]);
/// let mut parser = ListeningParser::new(ParserOptions::default());
/// parser.on(EventKind::Code, |ev| {
///     if let ParseEvent::Code { code, .. } = ev {
///         blocks.borrow_mut().push(code.clone());
///     }
/// });
/// parser.write("```js\nlet a;\n``");
/// parser.write("`");
/// parser.end();
/// drop(parser);
/// assert_eq!(blocks.into_inner(), ["let a;\n"]);
/// ```
#[derive(Debug, Default)]
pub struct ListeningParser<'h> {
    parser: StreamingParser,
    listeners: Listeners<'h>,
}

impl<'h> ListeningParser<'h> {
    /// Creates a parser with no handlers.
    #[must_use]
    pub fn new(options: ParserOptions) -> Self {
        Self {
            parser: StreamingParser::new(options),
            listeners: Listeners::new(),
        }
    }

    /// Registers `handler` for events of `kind`.
    pub fn on(&mut self, kind: EventKind, handler: impl FnMut(&ParseEvent) + 'h) {
        self.listeners.on(kind, handler);
    }

    /// Removes every handler.
    pub fn remove_all_listeners(&mut self) {
        self.listeners.remove_all_listeners();
    }

    /// Feeds a chunk, calling handlers for each event before returning.
    pub fn write(&mut self, chunk: &str) {
        for event in self.parser.write(chunk) {
            self.listeners.emit(&event);
        }
    }

    /// Ends the stream, calling handlers for the flushed events.
    pub fn end(&mut self) {
        for event in self.parser.end() {
            self.listeners.emit(&event);
        }
    }

    /// Resets the parser. Handlers stay registered.
    pub fn reset(&mut self) {
        self.parser.reset();
    }

    /// Returns the current parse state.
    #[must_use]
    pub fn state(&self) -> &ParserState {
        self.parser.state()
    }
}
