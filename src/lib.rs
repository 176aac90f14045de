#![doc = include_str!("../README.md")]
#![deny(missing_docs, unsafe_code)]

pub mod diagnostic;
mod lines;
mod parser;
mod scan;
pub mod tree;

pub use diagnostic::ParseError;
pub use parser::{DocumentParser, InlineParser};
pub use tree::{Block, BlockKind, Inline, ListData, ListKind, NodeId, Tree};

/// Parse a Markdown document into its block tree.
///
/// Runs both phases: the line-oriented block parse and the per-leaf
/// inline parse. Parsing is total — every input produces a tree — so the
/// error variant only reports a violated internal invariant.
///
/// ```
/// use markdoxide::{parse, BlockKind};
///
/// let tree = parse("# Title\n").unwrap();
/// let header = tree[tree.root()].children[0];
/// assert_eq!(tree[header].kind, BlockKind::AtxHeader { level: 1 });
/// ```
///
/// # Errors
///
/// Returns [`ParseError`] if an internal invariant is violated; never
/// expected for any input.
pub fn parse(input: &str) -> Result<Tree, ParseError> {
    parser::parse_document(input)
}

/// Parse a string as inline content, outside any block structure.
///
/// ```
/// use markdoxide::{parse_inlines, Inline};
///
/// let inlines = parse_inlines("*hi*");
/// assert_eq!(inlines, vec![Inline::Emphasis(vec![Inline::Str("hi".into())])]);
/// ```
#[must_use]
pub fn parse_inlines(input: &str) -> Vec<Inline> {
    InlineParser::new().parse(input)
}
