//! Demonstrates driving a live chat UI from a streamed model response.
//!
//! The assistant was asked to build a small React app. Its reply opens with
//! the packages the app needs, then explains itself in prose and emits the
//! code in a fenced block. As the chunks arrive we
//!
//! 1. merge the dependency list as soon as the leading block closes,
//! 2. print prose incrementally, and
//! 3. show the code pane updating while the block is still open.
//!
//! Run with
//!
//! ```bash
//! cargo run -p streamfence --example chat_stream
//! ```

use std::{cell::RefCell, thread, time::Duration};

use streamfence::{EventKind, ListeningParser, ParseEvent, ParserOptions, SegmentCollector};

fn main() {
    // In real life this would come from the network.
    let simulated_stream: [&str; 8] = [
        r#"{"react": "^18.2.0", "#,
        r#""canvas-confetti": "^1.9.2"}}"#,
        "Here's a button that celebrates",
        " every click:\n\n``",
        "`jsx\nimport confetti from 'canvas-confetti';\n\n",
        "export default function App() {\n  return <button onClick={() => confetti()}>",
        "Party</button>;\n}\n```\n\n",
        "Install the dependencies and run `npm start`.",
    ];

    let segments = RefCell::new(SegmentCollector::default());
    let mut parser = ListeningParser::new(ParserOptions {
        coalesce_code_updates: true,
        ..Default::default()
    });

    parser.on(EventKind::DependenciesReady, |ev| {
        if let ParseEvent::DependenciesReady { dependencies } = ev {
            for (name, version) in dependencies {
                println!("[deps] {name}@{version}");
            }
        }
    });
    parser.on(EventKind::Text, |ev| {
        if let ParseEvent::Text { fragment, .. } = ev {
            println!("[text] {fragment:?}");
        }
    });
    parser.on(EventKind::CodeBlockUpdate, |ev| {
        if let ParseEvent::CodeBlockUpdate { code } = ev {
            println!("[code pane] {} lines so far", code.lines().count());
        }
    });
    parser.on(EventKind::Code, |ev| {
        if let ParseEvent::Code { code, language } = ev {
            println!("[code done] {language}:\n{code}");
        }
    });
    for kind in [
        EventKind::DependenciesReady,
        EventKind::Text,
        EventKind::CodeBlockStart,
        EventKind::CodeBlockUpdate,
        EventKind::Code,
    ] {
        parser.on(kind, |ev| segments.borrow_mut().apply(ev));
    }

    for chunk in simulated_stream {
        parser.write(chunk);
        thread::sleep(Duration::from_millis(50));
    }
    parser.end();
    drop(parser);

    let parsed = segments.into_inner().finish();
    println!("{} segments, {} dependencies", parsed.segments.len(), parsed.dependencies.len());
}
