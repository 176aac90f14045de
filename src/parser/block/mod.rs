//! Line-oriented block parser.
//!
//! [`DocumentParser`] maintains the open spine of the block tree — the
//! chain of blocks from the Document root down to the `tip`, all with
//! `open == true`. Each incorporated line is matched against the spine's
//! continuation rules, may open new blocks below the deepest matching
//! container, and finally lands in a line-accepting leaf. Finalizing a
//! block derives its string content, closes it forever, and moves the tip
//! back to its parent.

mod lists;

use std::mem;

use crate::diagnostic::ParseError;
use crate::parser::inline::InlineParser;
use crate::parser::process_inlines;
use crate::{lines, scan};
use crate::tree::{Block, BlockKind, NodeId, Tree};

/// Columns of indentation that start or continue an indented code block.
const CODE_INDENT: usize = 4;

/// The block-phase parser: a streaming surface fed one line at a time.
#[derive(Debug)]
pub struct DocumentParser {
    tree: Tree,
    /// Deepest open block; the only block that may receive lines or
    /// children without something being finalized first.
    tip: NodeId,
    /// Tip as of the start of the current line; consumed by
    /// [`close_unmatched`](Self::close_unmatched).
    oldtip: NodeId,
    /// Deepest container whose continuation rule matched the current line.
    last_matched: NodeId,
    line_number: usize,
    inline: InlineParser,
}

impl Default for DocumentParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentParser {
    /// Creates a parser holding an open Document root.
    #[must_use]
    pub fn new() -> Self {
        let tree = Tree::new();
        let root = tree.root();
        Self {
            tree,
            tip: root,
            oldtip: root,
            last_matched: root,
            line_number: 0,
            inline: InlineParser::new(),
        }
    }

    /// Incorporate one line into the tree. Lines must be fed in order
    /// with 1-based, increasing `line_number`s.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if a line would be appended to a closed
    /// container — an internal invariant violation, never expected on
    /// lines fed through [`parse`](crate::parse).
    #[allow(clippy::too_many_lines)]
    pub fn incorporate_line(&mut self, line: &str, line_number: usize) -> Result<(), ParseError> {
        self.line_number = line_number;
        self.oldtip = self.tip;
        let detabbed = lines::detab_line(line);
        let ln: &str = &detabbed;

        let mut all_matched = true;
        let mut offset = 0usize;
        let mut blank = false;

        // Walk the open spine, applying each container's continuation
        // rule and consuming its line prefix.
        let mut container = self.tree.root();
        loop {
            let Some(&last_child) = self.tree.block(container).children.last() else {
                break;
            };
            if !self.tree.block(last_child).open {
                break;
            }
            container = last_child;

            let first_nonspace = match scan::first_non_space(ln, offset) {
                Some(pos) => {
                    blank = false;
                    pos
                }
                None => {
                    blank = true;
                    ln.len()
                }
            };
            let indent = first_nonspace - offset;

            match self.tree.block(container).kind.clone() {
                BlockKind::BlockQuote => {
                    if indent <= 3 && ln[first_nonspace..].starts_with('>') {
                        offset = first_nonspace + 1;
                        if ln[offset..].starts_with(' ') {
                            offset += 1;
                        }
                    } else {
                        all_matched = false;
                    }
                }
                BlockKind::ListItem { data } => {
                    if indent >= data.marker_offset + data.padding {
                        offset += data.marker_offset + data.padding;
                    } else if blank {
                        offset = first_nonspace;
                    } else {
                        all_matched = false;
                    }
                }
                BlockKind::IndentedCode => {
                    if indent >= CODE_INDENT {
                        offset += CODE_INDENT;
                    } else if blank {
                        offset = first_nonspace;
                    } else {
                        all_matched = false;
                    }
                }
                BlockKind::AtxHeader { .. }
                | BlockKind::SetextHeader { .. }
                | BlockKind::HorizontalRule => {
                    // Single-line blocks never take a second line.
                    all_matched = false;
                }
                BlockKind::FencedCode { fence_offset, .. } => {
                    let mut skip = fence_offset;
                    while skip > 0 && ln[offset..].starts_with(' ') {
                        offset += 1;
                        skip -= 1;
                    }
                }
                BlockKind::HtmlBlock => {
                    if blank {
                        all_matched = false;
                    }
                }
                BlockKind::Paragraph => {
                    if blank {
                        self.tree.block_mut(container).last_line_blank = true;
                        all_matched = false;
                    }
                }
                // Document and List always match; acceptance is decided
                // by their children.
                _ => {}
            }
            if !all_matched {
                container = self
                    .tree
                    .block(container)
                    .parent
                    .unwrap_or_else(|| self.tree.root());
                break;
            }
        }
        self.last_matched = container;

        // A second consecutive blank line ends the enclosing list.
        if blank && self.tree.block(container).last_line_blank {
            self.break_out_of_lists(container, line_number);
        }

        // Try to open new blocks until the line lands in a leaf.
        loop {
            let container_kind = &self.tree.block(container).kind;
            if matches!(
                container_kind,
                BlockKind::FencedCode { .. } | BlockKind::IndentedCode | BlockKind::HtmlBlock
            ) || !scan::may_open_block(ln, offset)
            {
                break;
            }

            let first_nonspace = match scan::first_non_space(ln, offset) {
                Some(pos) => {
                    blank = false;
                    pos
                }
                None => {
                    blank = true;
                    ln.len()
                }
            };
            let indent = first_nonspace - offset;

            if indent >= CODE_INDENT {
                // Indented code, unless this is paragraph text or a blank
                // line that merely happens to be deeply indented.
                if !matches!(self.tree.block(self.tip).kind, BlockKind::Paragraph) && !blank {
                    offset += CODE_INDENT;
                    self.close_unmatched();
                    container = self.add_child(BlockKind::IndentedCode, line_number, offset);
                } else {
                    break;
                }
            } else if ln[first_nonspace..].starts_with('>') {
                offset = first_nonspace + 1;
                if ln[offset..].starts_with(' ') {
                    offset += 1;
                }
                self.close_unmatched();
                container = self.add_child(BlockKind::BlockQuote, line_number, offset);
            } else if let Some(caps) = scan::captures_at(&scan::ATX_HEADER_OPEN, ln, first_nonspace)
            {
                let matched = caps.get(0).map_or("", |m| m.as_str());
                let level = matched.trim().len();
                offset = first_nonspace + matched.len();
                self.close_unmatched();
                container = self.add_child(BlockKind::AtxHeader { level }, line_number, first_nonspace);
                // The content is captured now, trailing `#` run stripped
                // unless escaped.
                let text = scan::ATX_HEADER_TRAILER.replace(&ln[offset..], "$1").into_owned();
                self.tree.block_mut(container).strings.push(text);
                break;
            } else if let Some((fence_char, fence_length)) = scan::open_fence(ln, first_nonspace) {
                self.close_unmatched();
                let kind = BlockKind::FencedCode {
                    fence_offset: first_nonspace - offset,
                    fence_length,
                    fence_char,
                    info: String::new(),
                };
                container = self.add_child(kind, line_number, first_nonspace);
                offset = first_nonspace + fence_length;
                break;
            } else if scan::is_match_at(&scan::HTML_BLOCK_OPEN, ln, first_nonspace) {
                self.close_unmatched();
                container = self.add_child(BlockKind::HtmlBlock, line_number, first_nonspace);
                // Offset stays put: the tag is part of the block's text.
                break;
            } else if self.single_line_paragraph(container)
                && scan::is_match_at(&scan::SETEXT_LINE, ln, first_nonspace)
            {
                // Underline: rewrite the paragraph into a setext header.
                self.close_unmatched();
                let level = if ln[first_nonspace..].starts_with('=') { 1 } else { 2 };
                self.tree.block_mut(container).kind = BlockKind::SetextHeader { level };
                offset = ln.len();
                break;
            } else if scan::is_match_at(&scan::HRULE, ln, first_nonspace) {
                self.close_unmatched();
                container = self.add_child(BlockKind::HorizontalRule, line_number, first_nonspace);
                offset = ln.len().saturating_sub(1);
                break;
            } else if let Some(data) = lists::parse_list_marker(ln, first_nonspace, indent) {
                self.close_unmatched();
                offset = first_nonspace + data.padding;
                let continues = match &self.tree.block(container).kind {
                    BlockKind::List { data: existing, .. } => existing.matches(&data),
                    _ => false,
                };
                if !continues {
                    let kind = BlockKind::List {
                        data: data.clone(),
                        tight: true,
                    };
                    container = self.add_child(kind, line_number, first_nonspace);
                }
                container = self.add_child(BlockKind::ListItem { data }, line_number, first_nonspace);
            } else {
                break;
            }

            if self.tree.block(container).kind.accepts_lines() {
                // A line container can't contain other blocks.
                break;
            }
        }

        // Append what remains of the line.
        let first_nonspace = match scan::first_non_space(ln, offset) {
            Some(pos) => {
                blank = false;
                pos
            }
            None => {
                blank = true;
                ln.len()
            }
        };
        let indent = first_nonspace - offset;

        let tip_block = self.tree.block(self.tip);
        let lazy = self.tip != self.last_matched
            && !blank
            && matches!(tip_block.kind, BlockKind::Paragraph)
            && !tip_block.strings.is_empty();
        if lazy {
            // Lazy paragraph continuation: the unmatched blocks stay open.
            self.tree.block_mut(self.tip).last_line_blank = false;
            self.add_line(ln, offset)?;
            return Ok(());
        }

        self.close_unmatched();

        let remembers = blank && self.tree.block(container).remembers_blank_line(line_number);
        self.tree.block_mut(container).last_line_blank = remembers;
        let mut ancestor = container;
        while let Some(parent) = self.tree.block(ancestor).parent {
            self.tree.block_mut(parent).last_line_blank = false;
            ancestor = parent;
        }

        match self.tree.block(container).kind.clone() {
            BlockKind::IndentedCode | BlockKind::HtmlBlock => {
                self.add_line(ln, offset)?;
            }
            BlockKind::FencedCode {
                fence_char,
                fence_length,
                ..
            } => {
                let closes = indent <= 3
                    && ln[first_nonspace..].starts_with(fence_char)
                    && scan::closing_fence(ln, first_nonspace)
                        .is_some_and(|(ch, len)| ch == fence_char && len >= fence_length);
                if closes {
                    // The closing fence is consumed, not stored.
                    self.finalize(container, line_number);
                } else {
                    self.add_line(ln, offset)?;
                }
            }
            BlockKind::AtxHeader { .. }
            | BlockKind::SetextHeader { .. }
            | BlockKind::HorizontalRule => {
                // Content was captured when the block opened.
            }
            kind => {
                if kind.accepts_lines() {
                    self.add_line(ln, first_nonspace)?;
                } else if !blank {
                    let paragraph = self.add_child(BlockKind::Paragraph, line_number, first_nonspace);
                    debug_assert_eq!(paragraph, self.tip);
                    self.add_line(ln, first_nonspace)?;
                }
            }
        }

        Ok(())
    }

    /// Finalize every still-open block and run the inline phase,
    /// returning the finished tree.
    ///
    /// `line_number` is the number of the last line fed to
    /// [`incorporate_line`](Self::incorporate_line).
    #[must_use]
    pub fn finalize_all(mut self, line_number: usize) -> Tree {
        loop {
            let tip = self.tip;
            self.finalize(tip, line_number);
            if tip == self.tree.root() {
                break;
            }
        }
        let DocumentParser {
            mut tree,
            mut inline,
            ..
        } = self;
        let root = tree.root();
        process_inlines(&mut tree, &mut inline, root);
        tree
    }

    // -- spine maintenance --------------------------------------------------

    /// Whether `id` is a paragraph holding exactly one line — the only
    /// shape a setext underline may rewrite.
    fn single_line_paragraph(&self, id: NodeId) -> bool {
        let block = self.tree.block(id);
        matches!(block.kind, BlockKind::Paragraph) && block.strings.len() == 1
    }

    /// Open a new block as a child of the tip, finalizing blocks that
    /// cannot contain it first. The new block becomes the tip.
    fn add_child(&mut self, kind: BlockKind, line_number: usize, offset: usize) -> NodeId {
        while !self.tree.block(self.tip).kind.can_contain(&kind) {
            let tip = self.tip;
            self.finalize(tip, line_number);
        }
        let parent = self.tip;
        let mut block = Block::new(kind, line_number, offset + 1);
        block.parent = Some(parent);
        let id = self.tree.push(block);
        self.tree.block_mut(parent).children.push(id);
        self.tip = id;
        id
    }

    /// Finalize every open block below the last matched container.
    fn close_unmatched(&mut self) {
        while self.oldtip != self.last_matched {
            let unmatched = self.oldtip;
            let parent = self.tree.block(unmatched).parent;
            self.finalize(unmatched, self.line_number);
            self.oldtip = parent.unwrap_or_else(|| self.tree.root());
        }
    }

    /// Append the tail of `line` starting at `offset` to the tip.
    fn add_line(&mut self, line: &str, offset: usize) -> Result<(), ParseError> {
        let tip = self.tree.block_mut(self.tip);
        if !tip.open {
            return Err(ParseError {
                line: self.line_number,
                container: tip.kind.name(),
            });
        }
        tip.strings.push(line[offset..].to_string());
        Ok(())
    }

    /// Close a block: record its end line, derive its string content,
    /// resolve list tightness, and move the tip to its parent.
    fn finalize(&mut self, id: NodeId, line_number: usize) {
        {
            let block = self.tree.block_mut(id);
            if !block.open {
                return;
            }
            block.open = false;
            block.end_line = if line_number > block.start_line {
                line_number - 1
            } else {
                line_number
            };
        }

        let strings = mem::take(&mut self.tree.block_mut(id).strings);
        match self.tree.block(id).kind.clone() {
            BlockKind::Paragraph => {
                let mut content = scan::LEADING_SPACES
                    .replace_all(&strings.join("\n"), "")
                    .into_owned();
                // Peel leading link reference definitions. When nothing
                // but references remains, the paragraph was never prose.
                while content.starts_with('[') && self.inline.parse_reference(&mut content) {
                    if scan::is_blank(&content) {
                        self.tree.block_mut(id).kind = BlockKind::ReferenceDef;
                        break;
                    }
                }
                self.tree.block_mut(id).string_content = content;
            }
            BlockKind::AtxHeader { .. } | BlockKind::SetextHeader { .. } | BlockKind::HtmlBlock => {
                self.tree.block_mut(id).string_content = strings.join("\n");
            }
            BlockKind::IndentedCode => {
                let content = scan::TRAILING_BLANK_LINES
                    .replace(&strings.join("\n"), "\n")
                    .into_owned();
                self.tree.block_mut(id).string_content = content;
            }
            BlockKind::FencedCode { .. } => {
                // The first accumulated line is the info string.
                let info = scan::unescape(strings.first().map_or("", |s| s.as_str()).trim());
                let content = if strings.len() <= 1 {
                    String::new()
                } else {
                    strings[1..].join("\n") + "\n"
                };
                let block = self.tree.block_mut(id);
                if let BlockKind::FencedCode { info: slot, .. } = &mut block.kind {
                    *slot = info;
                }
                block.string_content = content;
            }
            BlockKind::List { .. } => {
                let tight = lists::resolve_tight(&self.tree, id);
                if let BlockKind::List { tight: slot, .. } = &mut self.tree.block_mut(id).kind {
                    *slot = tight;
                }
            }
            _ => {}
        }

        if let Some(parent) = self.tree.block(id).parent {
            self.tip = parent;
        }
    }

    /// Finalize everything up to and including the outermost enclosing
    /// list, leaving the tip at that list's parent.
    fn break_out_of_lists(&mut self, container: NodeId, line_number: usize) {
        let mut outermost_list = None;
        let mut cursor = Some(container);
        while let Some(id) = cursor {
            if matches!(self.tree.block(id).kind, BlockKind::List { .. }) {
                outermost_list = Some(id);
            }
            cursor = self.tree.block(id).parent;
        }

        let Some(list) = outermost_list else { return };
        let mut current = container;
        while current != list {
            let parent = self.tree.block(current).parent;
            self.finalize(current, line_number);
            current = parent.unwrap_or_else(|| self.tree.root());
        }
        self.finalize(list, line_number);
        if let Some(parent) = self.tree.block(list).parent {
            self.tip = parent;
        }
    }
}
