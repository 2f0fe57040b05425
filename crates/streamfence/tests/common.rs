#![allow(missing_docs)]
#![allow(dead_code)]

pub const ORIGINAL: &str = concat!(
    r#"{"react": "^18.2.0", "react-dom": "^18.2.0",}}"#,
    "I'll build a counter.\n\n",
    "```jsx:\n",
    "import React from 'react';\n\n",
    "export default function App() {\n",
    "  return <p>`hi`</p>;\n",
    "}\n",
    "```\n\n",
    "Style it:\n",
    "```css\n",
    "p { color: red; }\n",
    "```",
);

// This stream simulates a model response delivered in irregular chunks. It
// intentionally cuts on the seams the parser has to carry across writes.
#[rustfmt::skip]
pub const STREAM: [&str; 9] = [
    r#"{"react": "^18.2.0", "re"#,                                  // inside the dependency block
    r#"act-dom": "^18.2.0",}"#,                                     // ends with half of '}}'
    "}I'll build a coun",                                           // closes the block, prose follows
    "ter.\n\n``",                                                   // ends with two thirds of a fence
    "`jsx",                                                         // fence completes, tag is partial
    ":\nimport React from 'react';\n\nexport default function App() {\n", // tag ends, code starts
    "  return <p>`hi`</p>;\n}\n`",                                  // stray backticks, then a third of a fence
    "``\n\nStyle it:\n```css\np { color: red; }\n",                  // close, prose, open in one chunk
    "```",                                                          // closing fence alone
];

#[test]
fn assert_stream_example() {
    assert_eq!(STREAM.concat(), ORIGINAL);
}
