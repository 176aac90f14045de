//! The two parsing phases and the pipeline that chains them.
//!
//! The **block phase** ([`DocumentParser`]) consumes the document line by
//! line and produces the block tree. The **inline phase**
//! ([`InlineParser`]) then rewrites each inline-capable leaf's string
//! content into inline nodes. Block-phase effects on a node always precede
//! inline-phase effects on it; the inline walk runs only after every block
//! is finalized.

pub(crate) mod block;
pub(crate) mod inline;

use std::mem;

pub use block::DocumentParser;
pub use inline::InlineParser;

use crate::diagnostic::ParseError;
use crate::lines;
use crate::tree::{BlockKind, NodeId, Tree};

/// Run the complete pipeline: normalize, incorporate every line, finalize,
/// inline-parse.
pub(crate) fn parse_document(input: &str) -> Result<Tree, ParseError> {
    let normalized = lines::normalize_newlines(input);
    let mut parser = DocumentParser::new();
    let mut line_count = 0;
    for (index, line) in lines::document_lines(&normalized).enumerate() {
        parser.incorporate_line(line, index + 1)?;
        line_count = index + 1;
    }
    Ok(parser.finalize_all(line_count))
}

/// Replace the string content of inline-capable leaves under `id` with
/// parsed inline nodes.
pub(crate) fn process_inlines(tree: &mut Tree, inline: &mut InlineParser, id: NodeId) {
    let inline_capable = matches!(
        tree.block(id).kind,
        BlockKind::Paragraph | BlockKind::AtxHeader { .. } | BlockKind::SetextHeader { .. }
    );
    if inline_capable {
        let content = mem::take(&mut tree.block_mut(id).string_content);
        tree.block_mut(id).inline_content = inline.parse(content.trim());
    }
    let children = tree.block(id).children.clone();
    for child in children {
        process_inlines(tree, inline, child);
    }
}
