//! Integration tests that validate parser output against expected trees.
//!
//! Small fixtures are compared as JSON through serializable mirror types,
//! larger behaviors structurally. The JSON shape mirrors the stable tree
//! output: every block carries `type`, `start_line`, `start_column`,
//! `end_line`, and one of `children`, `string_content`, `inline_content`.

use markdoxide::{parse, parse_inlines, BlockKind, Inline, NodeId, Tree};
use serde::Serialize;
use serde_json::{json, Value};

// --- JSON mirror types ---

#[derive(Serialize)]
struct JsonBlock {
    #[serde(rename = "type")]
    kind: &'static str,
    start_line: usize,
    start_column: usize,
    end_line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    level: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tight: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fence_char: Option<char>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fence_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    string_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_content: Option<Vec<JsonInline>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    children: Option<Vec<JsonBlock>>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum JsonInline {
    Str { text: String },
    Entity { text: String },
    Html { text: String },
    Code { text: String },
    Hardbreak,
    Softbreak,
    Emphasis { content: Vec<JsonInline> },
    Strong { content: Vec<JsonInline> },
    Link { destination: String, title: String, label: Vec<JsonInline> },
    Image { destination: String, title: String, label: Vec<JsonInline> },
}

fn inline_to_json(inline: &Inline) -> JsonInline {
    match inline {
        Inline::Str(text) => JsonInline::Str { text: text.clone() },
        Inline::Entity(text) => JsonInline::Entity { text: text.clone() },
        Inline::Html(text) => JsonInline::Html { text: text.clone() },
        Inline::Code(text) => JsonInline::Code { text: text.clone() },
        Inline::Hardbreak => JsonInline::Hardbreak,
        Inline::Softbreak => JsonInline::Softbreak,
        Inline::Emphasis(content) => JsonInline::Emphasis {
            content: content.iter().map(inline_to_json).collect(),
        },
        Inline::Strong(content) => JsonInline::Strong {
            content: content.iter().map(inline_to_json).collect(),
        },
        Inline::Link {
            destination,
            title,
            label,
        } => JsonInline::Link {
            destination: destination.clone(),
            title: title.clone(),
            label: label.iter().map(inline_to_json).collect(),
        },
        Inline::Image {
            destination,
            title,
            label,
        } => JsonInline::Image {
            destination: destination.clone(),
            title: title.clone(),
            label: label.iter().map(inline_to_json).collect(),
        },
    }
}

fn block_to_json(tree: &Tree, id: NodeId) -> JsonBlock {
    let block = &tree[id];
    let mut out = JsonBlock {
        kind: block.kind.name(),
        start_line: block.start_line,
        start_column: block.start_column,
        end_line: block.end_line,
        level: None,
        tight: None,
        fence_char: None,
        fence_length: None,
        info: None,
        string_content: None,
        inline_content: None,
        children: None,
    };
    match &block.kind {
        BlockKind::Document | BlockKind::BlockQuote | BlockKind::ListItem { .. } => {
            out.children = Some(
                block
                    .children
                    .iter()
                    .map(|&child| block_to_json(tree, child))
                    .collect(),
            );
        }
        BlockKind::List { tight, .. } => {
            out.tight = Some(*tight);
            out.children = Some(
                block
                    .children
                    .iter()
                    .map(|&child| block_to_json(tree, child))
                    .collect(),
            );
        }
        BlockKind::Paragraph => {
            out.inline_content = Some(block.inline_content.iter().map(inline_to_json).collect());
        }
        BlockKind::AtxHeader { level } | BlockKind::SetextHeader { level } => {
            out.level = Some(*level);
            out.inline_content = Some(block.inline_content.iter().map(inline_to_json).collect());
        }
        BlockKind::FencedCode {
            fence_char,
            fence_length,
            info,
            ..
        } => {
            out.fence_char = Some(*fence_char);
            out.fence_length = Some(*fence_length);
            out.info = Some(info.clone());
            out.string_content = Some(block.string_content.clone());
        }
        BlockKind::IndentedCode | BlockKind::HtmlBlock | BlockKind::ReferenceDef => {
            out.string_content = Some(block.string_content.clone());
        }
        BlockKind::HorizontalRule => {}
    }
    out
}

fn tree_json(input: &str) -> Value {
    let tree = parse(input).expect("parse is total");
    serde_json::to_value(block_to_json(&tree, tree.root())).expect("mirror serializes")
}

// --- JSON fixtures ---

#[test]
fn atx_header_document() {
    assert_eq!(
        tree_json("# hi\n"),
        json!({
            "type": "Document",
            "start_line": 1,
            "start_column": 1,
            "end_line": 1,
            "children": [
                {
                    "type": "ATXHeader",
                    "start_line": 1,
                    "start_column": 1,
                    "end_line": 1,
                    "level": 1,
                    "inline_content": [ { "type": "Str", "text": "hi" } ],
                }
            ],
        })
    );
}

#[test]
fn two_paragraph_document() {
    assert_eq!(
        tree_json("a\n\nb\n"),
        json!({
            "type": "Document",
            "start_line": 1,
            "start_column": 1,
            "end_line": 2,
            "children": [
                {
                    "type": "Paragraph",
                    "start_line": 1,
                    "start_column": 1,
                    "end_line": 1,
                    "inline_content": [ { "type": "Str", "text": "a" } ],
                },
                {
                    "type": "Paragraph",
                    "start_line": 3,
                    "start_column": 1,
                    "end_line": 3,
                    "inline_content": [ { "type": "Str", "text": "b" } ],
                }
            ],
        })
    );
}

#[test]
fn fenced_code_document() {
    assert_eq!(
        tree_json("```\ncode\n```\n"),
        json!({
            "type": "Document",
            "start_line": 1,
            "start_column": 1,
            "end_line": 2,
            "children": [
                {
                    "type": "FencedCode",
                    "start_line": 1,
                    "start_column": 1,
                    "end_line": 2,
                    "fence_char": "`",
                    "fence_length": 3,
                    "info": "",
                    "string_content": "code\n",
                }
            ],
        })
    );
}

// --- structural scenarios ---

fn kind_of(tree: &Tree, id: NodeId) -> &BlockKind {
    &tree[id].kind
}

#[test]
fn block_quotes_split_by_blank_line() {
    let tree = parse("> a\n> b\n\n> c\n").unwrap();
    let root = tree.root();
    assert_eq!(tree[root].children.len(), 2);

    let first = tree[root].children[0];
    assert_eq!(*kind_of(&tree, first), BlockKind::BlockQuote);
    let para = tree[first].children[0];
    assert_eq!(
        tree[para].inline_content,
        vec![
            Inline::Str("a".into()),
            Inline::Softbreak,
            Inline::Str("b".into()),
        ]
    );

    let second = tree[root].children[1];
    let para = tree[second].children[0];
    assert_eq!(tree[para].inline_content, vec![Inline::Str("c".into())]);
}

#[test]
fn blank_separated_items_stay_in_one_loose_list() {
    let tree = parse("- x\n- y\n\n- z\n").unwrap();
    let root = tree.root();
    assert_eq!(tree[root].children.len(), 1);

    let list = tree[root].children[0];
    match kind_of(&tree, list) {
        BlockKind::List { tight, .. } => assert!(!tight, "blank line forces loose"),
        other => panic!("expected list, got {other:?}"),
    }
    assert_eq!(tree[list].children.len(), 3);
    for &item in &tree[list].children {
        assert!(matches!(*kind_of(&tree, item), BlockKind::ListItem { .. }));
    }
}

#[test]
fn nested_emphasis_scenario() {
    assert_eq!(
        parse_inlines("*foo **bar** baz*"),
        vec![Inline::Emphasis(vec![
            Inline::Str("foo ".into()),
            Inline::Strong(vec![Inline::Str("bar".into())]),
            Inline::Str(" baz".into()),
        ])]
    );
}

// --- laws ---

#[test]
fn line_ending_forms_parse_identically() {
    let unix = "# h\n\npara one\npara two\n\n- a\n- b\n";
    let windows = unix.replace('\n', "\r\n");
    let legacy_mac = unix.replace('\n', "\r");
    let with_lf = parse(unix).unwrap();
    assert_eq!(with_lf, parse(&windows).unwrap());
    assert_eq!(with_lf, parse(&legacy_mac).unwrap());
}

#[test]
fn tab_and_spaces_at_same_column_parse_identically() {
    assert_eq!(
        parse("\tcode\n").unwrap(),
        parse("    code\n").unwrap(),
        "leading tab is four spaces"
    );
    assert_eq!(
        parse("ab\tcd\n").unwrap(),
        parse("ab  cd\n").unwrap(),
        "tab after two columns is two spaces"
    );
}

#[test]
fn fence_content_round_trips() {
    let body = ["fn main() {", "    let x = 1;", "}"];
    let input = format!("```rust\n{}\n```\n", body.join("\n"));
    let tree = parse(&input).unwrap();
    let code = tree[tree.root()].children[0];
    assert_eq!(tree[code].string_content, body.join("\n") + "\n");
}

#[test]
fn unclosed_emphasis_is_byte_preserving() {
    for subject in ["*foo", "**foo", "***foo", "a *b **c", "_ x _y"] {
        let rendered: String = parse_inlines(subject)
            .iter()
            .map(|inline| match inline {
                Inline::Str(text) => text.clone(),
                other => panic!("expected literal fallback, got {other:?}"),
            })
            .collect();
        assert_eq!(rendered, subject, "delimiters must survive verbatim");
    }
}

#[test]
fn lists_merge_only_on_matching_markers() {
    // Same bullet: one list.
    let tree = parse("- a\n- b\n").unwrap();
    assert_eq!(tree[tree.root()].children.len(), 1);

    // Different bullet: two lists.
    let tree = parse("- a\n* b\n").unwrap();
    assert_eq!(tree[tree.root()].children.len(), 2);

    // Ordered start numbers don't matter, delimiters do.
    let tree = parse("1. a\n9. b\n").unwrap();
    assert_eq!(tree[tree.root()].children.len(), 1);
    let tree = parse("1. a\n2) b\n").unwrap();
    assert_eq!(tree[tree.root()].children.len(), 2);
}

#[test]
fn every_returned_block_is_finalized() {
    let inputs = [
        "# h\n",
        "para\n",
        "> q\n\n- a\n  - b\n\n```\nunclosed fence",
        "",
        "<div>\nraw\n",
    ];
    for input in inputs {
        let tree = parse(input).unwrap();
        let mut stack = vec![tree.root()];
        while let Some(id) = stack.pop() {
            assert!(!tree[id].open, "open block in output for {input:?}");
            assert!(tree[id].start_line <= tree[id].end_line);
            assert!(tree[id].start_column >= 1);
            for &child in &tree[id].children {
                assert_eq!(tree[child].parent, Some(id), "parent link mismatch");
                stack.push(child);
            }
        }
    }
}
