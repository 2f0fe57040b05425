use alloc::{string::String, vec, vec::Vec};

use super::*;

fn run(parser: &mut StreamingParser, chunks: &[&str]) -> Vec<ParseEvent> {
    let mut events = vec![];
    for chunk in chunks {
        events.extend(parser.write(chunk));
    }
    events.extend(parser.end());
    events
}

fn without_updates(events: Vec<ParseEvent>) -> Vec<ParseEvent> {
    events
        .into_iter()
        .filter(|ev| !matches!(ev, ParseEvent::CodeBlockUpdate { .. }))
        .collect()
}

fn text(fragment: &str, display: &str) -> ParseEvent {
    ParseEvent::Text {
        fragment: fragment.into(),
        display: display.into(),
    }
}

fn start(language: &str) -> ParseEvent {
    ParseEvent::CodeBlockStart {
        language: language.into(),
    }
}

fn code(code: &str, language: &str) -> ParseEvent {
    ParseEvent::Code {
        code: code.into(),
        language: language.into(),
    }
}

fn dependencies(pairs: &[(&str, &str)]) -> ParseEvent {
    ParseEvent::DependenciesReady {
        dependencies: pairs
            .iter()
            .map(|(k, v)| (String::from(*k), String::from(*v)))
            .collect(),
    }
}

#[test]
fn dependency_block_then_text() {
    let mut parser = StreamingParser::default();
    let events = run(
        &mut parser,
        &[r#"{"react": "18.2.0", "typescript": "5.0.4"}}Here is your app."#],
    );
    assert_eq!(
        events,
        vec![
            dependencies(&[("react", "18.2.0"), ("typescript", "5.0.4")]),
            text("Here is your app.", "Here is your app."),
        ]
    );
}

#[test]
fn dependency_block_split_across_writes() {
    let mut parser = StreamingParser::default();
    assert_eq!(parser.write("{\"react\": \"18.2.0\"").count(), 0);
    assert_eq!(parser.write("}").count(), 0);
    assert_eq!(parser.state().mode, Mode::DependencyCapture);

    let events: Vec<_> = parser.write("}Hi").collect();
    assert_eq!(
        events,
        vec![dependencies(&[("react", "18.2.0")]), text("Hi", "Hi")]
    );
    assert_eq!(parser.state().mode, Mode::Scanning);
    assert!(parser.state().pending_dependency_buffer.is_empty());
}

#[test]
fn empty_dependency_block_still_reported() {
    let mut parser = StreamingParser::default();
    let events = run(&mut parser, &["{}}", "ok"]);
    assert_eq!(events, vec![dependencies(&[]), text("ok", "ok")]);
}

#[test]
fn later_closing_braces_are_text() {
    let mut parser = StreamingParser::default();
    let events = run(&mut parser, &["{\"a\": \"1\"}}x}}", "y}}"]);
    assert_eq!(
        events,
        vec![
            dependencies(&[("a", "1")]),
            text("x}}", "x}}"),
            text("y}}", "x}}y}}"),
        ]
    );
}

#[test]
fn leading_whitespace_before_dependency_block() {
    let mut parser = StreamingParser::default();
    assert_eq!(parser.write("  \n").count(), 0);
    assert_eq!(parser.state().pending_dependency_buffer, "  \n");

    let events = run(&mut parser, &["{\"vite\": \"5.0.0\"}}\nHi"]);
    assert_eq!(
        events,
        vec![dependencies(&[("vite", "5.0.0")]), text("\nHi", "\nHi")]
    );
}

#[test]
fn no_dependency_block() {
    let mut parser = StreamingParser::default();
    let events: Vec<_> = parser.write("Hello").collect();
    assert_eq!(events, vec![text("Hello", "Hello")]);
    assert_eq!(parser.state().mode, Mode::Scanning);
}

#[test]
fn unterminated_dependency_block_is_replayed() {
    let mut parser = StreamingParser::default();
    assert_eq!(parser.write("{\"react\": \"18").count(), 0);
    let events: Vec<_> = parser.end().collect();
    assert_eq!(
        events,
        vec![text("{\"react\": \"18", "{\"react\": \"18")]
    );
}

#[test]
fn skip_dependency_block() {
    let mut parser = StreamingParser::new(ParserOptions {
        skip_dependency_block: true,
        ..Default::default()
    });
    let events = run(&mut parser, &["{\"a\": \"1\"}} b"]);
    assert_eq!(
        events,
        vec![text("{\"a\": \"1\"}} b", "{\"a\": \"1\"}} b")]
    );
}

#[test]
fn simple_code_block() {
    let mut parser = StreamingParser::default();
    let events = run(&mut parser, &["```js\nconsole.log(1);\n```"]);

    assert_eq!(events.first(), Some(&start("js")));
    assert_eq!(events.last(), Some(&code("console.log(1);\n", "js")));

    let updates: Vec<&str> = events
        .iter()
        .filter_map(|ev| match ev {
            ParseEvent::CodeBlockUpdate { code } => Some(code.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(updates.len(), "console.log(1);\n".len());
    assert_eq!(updates[0], "c");
    assert_eq!(updates.last(), Some(&"console.log(1);\n"));
    assert_eq!(events.len(), updates.len() + 2);
}

#[test]
fn fences_split_across_writes() {
    let mut parser = StreamingParser::default();
    let events = run(
        &mut parser,
        &["Intro\n``", "`ts:\nlet a", " = 1;\n``", "`\nOutro"],
    );
    assert_eq!(
        without_updates(events),
        vec![
            text("Intro\n", "Intro\n"),
            start("ts"),
            code("let a = 1;\n", "ts"),
            text("\nOutro", "Intro\n\nOutro"),
        ]
    );
}

#[test]
fn language_tag_split_across_writes() {
    let mut parser = StreamingParser::default();
    assert_eq!(parser.write("```type").count(), 0);
    assert!(parser.state().in_code_block);
    assert!(parser.state().reading_language);
    assert_eq!(parser.state().language_id, "type");

    let events: Vec<_> = parser.write("script: \n").collect();
    assert_eq!(events, vec![start("typescript")]);
    assert!(!parser.state().reading_language);
    assert_eq!(parser.state().language_id, "typescript");
}

#[test]
fn text_is_flushed_before_code() {
    let mut parser = StreamingParser::default();
    let events = run(&mut parser, &["Before\n```\ncode\n```\nAfter"]);
    assert_eq!(
        without_updates(events),
        vec![
            text("Before\n", "Before\n"),
            start(""),
            code("code\n", ""),
            text("\nAfter", "Before\n\nAfter"),
        ]
    );
}

#[test]
fn multiple_code_blocks_are_isolated() {
    let mut parser = StreamingParser::default();
    let events = run(
        &mut parser,
        &["```css\na{}\n```\nand\n```html\n<p></p>\n```"],
    );
    assert_eq!(
        without_updates(events),
        vec![
            start("css"),
            code("a{}\n", "css"),
            text("\nand\n", "\nand\n"),
            start("html"),
            code("<p></p>\n", "html"),
        ]
    );
}

#[test]
fn short_backtick_runs_are_text() {
    let mut parser = StreamingParser::default();
    let events: Vec<_> = parser.write("use `x` and ``y``").collect();
    // The trailing run could still become a fence.
    assert_eq!(events, vec![text("use `x` and ``y", "use `x` and ``y")]);
    assert_eq!(parser.state().backtick_run, 2);

    let events: Vec<_> = parser.end().collect();
    assert_eq!(events, vec![text("``", "use `x` and ``y``")]);
}

#[test]
fn short_backtick_runs_inside_code() {
    let mut parser = StreamingParser::default();
    let events = run(&mut parser, &["```sh\necho `date` ``x``\n```"]);
    assert_eq!(
        without_updates(events),
        vec![start("sh"), code("echo `date` ``x``\n", "sh")]
    );
}

#[test]
fn unterminated_code_block_is_flushed() {
    let mut parser = StreamingParser::default();
    let events = run(&mut parser, &["```py\nprint(1)"]);
    assert_eq!(
        without_updates(events),
        vec![start("py"), code("print(1)", "py")]
    );
}

#[test]
fn unterminated_fence_header_is_flushed() {
    let mut parser = StreamingParser::default();
    let events = run(&mut parser, &["Look: ```rust"]);
    assert_eq!(
        events,
        vec![text("Look: ", "Look: "), start("rust"), code("", "rust")]
    );
}

#[test]
fn second_end_is_silent() {
    let mut parser = StreamingParser::default();
    let events = run(&mut parser, &["{\"a\": \"1\"}}text ```js\nx"]);
    assert!(!events.is_empty());
    assert_eq!(parser.end().count(), 0);
    assert_eq!(parser.state(), &ParserState::default());
}

#[test]
fn reset_restores_initial_state() {
    let mut parser = StreamingParser::default();
    let _ = parser.write("{\"a\": \"1\"}}").count();
    let _ = parser.write("```x\nfoo``").count();
    parser.reset();
    assert_eq!(parser.state(), &ParserState::default());

    let input = ["{\"b\": \"2\"}}", "text\n```y\nbar\n```"];
    let mut fresh = StreamingParser::default();
    assert_eq!(run(&mut parser, &input), run(&mut fresh, &input));
}

#[test]
fn coalesced_code_updates() {
    let mut parser = StreamingParser::new(ParserOptions {
        coalesce_code_updates: true,
        ..Default::default()
    });
    let first: Vec<_> = parser.write("```js\nlet").collect();
    assert_eq!(
        first,
        vec![
            start("js"),
            ParseEvent::CodeBlockUpdate { code: "let".into() }
        ]
    );

    let second: Vec<_> = parser.write(" x;\n```").collect();
    assert_eq!(
        second,
        vec![
            ParseEvent::CodeBlockUpdate {
                code: "let x;\n".into()
            },
            code("let x;\n", "js"),
        ]
    );
}

#[test]
fn multibyte_characters() {
    let mut parser = StreamingParser::default();
    let events = run(&mut parser, &["Grüße ", "🚀\n```txt\nñ\n```"]);
    assert_eq!(
        without_updates(events),
        vec![
            text("Grüße ", "Grüße "),
            text("🚀\n", "Grüße 🚀\n"),
            start("txt"),
            code("ñ\n", "txt"),
        ]
    );
}

#[cfg(feature = "delimiter")]
mod delimiter_matches {
    use super::*;

    fn matched(text: &str) -> ParseEvent {
        ParseEvent::Match { text: text.into() }
    }

    #[test]
    fn matches_are_settled_across_writes() {
        let mut parser = StreamingParser::with_delimiter(r"\d+").unwrap();

        let first: Vec<_> = parser.write("12 3").collect();
        assert_eq!(first, vec![text("12 3", "12 3"), matched("12")]);

        let second: Vec<_> = parser.write("4 x").collect();
        assert_eq!(second, vec![text("4 x", "12 34 x"), matched("34")]);

        assert_eq!(parser.end().count(), 0);
    }

    #[test]
    fn trailing_match_is_emitted_at_end() {
        let mut parser = StreamingParser::with_delimiter(r"\d+").unwrap();
        let events = run(&mut parser, &["{\"a\": \"1\"}}v2"]);
        assert_eq!(
            events,
            vec![dependencies(&[("a", "1")]), text("v2", "v2"), matched("2")]
        );
    }

    fn matches_of(pattern: &str, chunks: &[&str]) -> Vec<ParseEvent> {
        let mut parser = StreamingParser::with_delimiter(pattern).unwrap();
        run(&mut parser, chunks)
            .into_iter()
            .filter(|ev| matches!(ev, ParseEvent::Match { .. }))
            .collect()
    }

    #[test]
    fn start_anchor_matches_once() {
        assert_eq!(matches_of("^a", &["aaa"]), vec![matched("a")]);
        assert_eq!(matches_of("^a", &["a", "aa"]), vec![matched("a")]);
    }

    #[test]
    fn word_boundary_sees_previous_write() {
        let pattern = r"(?-u:\b)foo";
        assert_eq!(matches_of(pattern, &["xfo", "o foo"]), vec![matched("foo")]);
        assert_eq!(matches_of(pattern, &["x", "foo foo"]), vec![matched("foo")]);
    }

    #[test]
    fn preferred_longer_branch_waits_for_input() {
        assert_eq!(matches_of("abcd|ab", &["abcd"]), vec![matched("abcd")]);
        assert_eq!(matches_of("abcd|ab", &["abc", "d"]), vec![matched("abcd")]);
        assert_eq!(matches_of("abcd|ab", &["abc", "x"]), vec![matched("ab")]);
        assert_eq!(matches_of("abcd|ab", &["ab"]), vec![matched("ab")]);
    }

    #[test]
    fn retained_text_stays_bounded() {
        let mut parser = StreamingParser::with_delimiter("<hr>").unwrap();
        let chunk = "plain prose without any break.\n";
        for _ in 0..1000 {
            assert_eq!(parser.write(chunk).count(), 1);
        }
        let scan = parser.delimiter.as_ref().unwrap();
        assert!(scan.retained_len() <= 4, "retained {}", scan.retained_len());

        let events: Vec<_> = parser.write("<h").collect();
        assert_eq!(events.len(), 1);
        assert!(parser.delimiter.as_ref().unwrap().retained_len() <= 3);
        let events: Vec<_> = parser.write("r> tail").collect();
        assert_eq!(events[1], matched("<hr>"));
    }

    #[test]
    fn rejects_bad_patterns() {
        assert!(matches!(
            Delimiter::new("("),
            Err(ParserError::InvalidDelimiter { .. })
        ));
        assert_eq!(
            Delimiter::new("a*").unwrap_err(),
            ParserError::EmptyMatchDelimiter {
                pattern: "a*".into()
            }
        );
        assert!(StreamingParser::with_delimiter("^").is_err());
        assert!(matches!(
            Delimiter::new(r"\b"),
            Err(ParserError::EmptyMatchDelimiter { .. })
        ));
        assert!(matches!(
            Delimiter::new(r"\bword"),
            Err(ParserError::InvalidDelimiter { .. })
        ));
        assert_eq!(Delimiter::new("-{3}").unwrap().as_str(), "-{3}");
    }
}
