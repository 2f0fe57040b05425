#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use streamfence::{ParseEvent, ParserOptions, StreamingParser};

#[derive(Debug, Arbitrary)]
struct Input {
    flags: u8,
    split_seed: u64,
    text: String,
}

fn options(flags: u8) -> ParserOptions {
    ParserOptions {
        skip_dependency_block: flags & 1 != 0,
        coalesce_code_updates: flags & 2 != 0,
        ..Default::default()
    }
}

/// What must not depend on how the input was chunked.
#[derive(Debug, Default, PartialEq)]
struct Outcome {
    dependencies: Vec<ParseEvent>,
    blocks: Vec<ParseEvent>,
    display: String,
}

fn parse<'a>(flags: u8, chunks: impl IntoIterator<Item = &'a str>) -> Outcome {
    let mut parser = StreamingParser::new(options(flags));
    let mut events = Vec::new();
    for chunk in chunks {
        events.extend(parser.write(chunk));
    }
    events.extend(parser.end());
    assert_eq!(parser.end().count(), 0, "second end must be silent");

    let mut outcome = Outcome::default();
    for event in events {
        match event {
            ParseEvent::DependenciesReady { .. } => outcome.dependencies.push(event),
            ParseEvent::CodeBlockStart { .. } | ParseEvent::Code { .. } => outcome.blocks.push(event),
            ParseEvent::Text { display, .. } => outcome.display = display,
            ParseEvent::CodeBlockUpdate { .. } | ParseEvent::Match { .. } => {}
        }
    }
    outcome
}

fuzz_target!(|input: Input| {
    if input.text.is_empty() {
        return;
    }
    let whole = parse(input.flags, [input.text.as_str()]);
    let chunked = parse(input.flags, split_into_safe_chunks(&input.text, input.split_seed));
    assert_eq!(whole, chunked);
});

/// Split a UTF-8 `&str` into boundary-safe chunks using a deterministic random
/// value to generate splits.
///
/// * `split_seed` may be any `u64`.
/// * Each chunk is at least one byte.
/// * Every slice ends on a valid UTF-8 boundary, so it can’t panic.
fn split_into_safe_chunks(text: &str, split_seed: u64) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let len = text.len();
    let mut seed = split_seed;

    while start < len {
        let remaining = len - start;

        let mut size = usize::try_from(seed % remaining as u64).unwrap_or(0) + 1;
        seed = seed.rotate_left(7) ^ 0x9E37_79B9_7F4A_7C15;

        // Bump `size` forward until it lands on a char boundary
        // (or hits the end of the string, which is always a boundary).
        while start + size < len && !text.is_char_boundary(start + size) {
            size += 1;
        }

        chunks.push(&text[start..start + size]);
        start += size;
    }

    chunks
}
