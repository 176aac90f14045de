//! Block tree data model produced by the parser.
//!
//! The tree is arena-backed: a [`Tree`] owns a flat `Vec` of [`Block`]s and
//! hands out [`NodeId`] indices. Parent links are plain `Option<NodeId>`
//! back-references, so the structure has single ownership and no cycles of
//! ownership. During the block phase the rightmost spine of the tree (the
//! chain of blocks with `open == true`) is the only part that may still
//! change shape; the inline phase later fills `inline_content` on leaves
//! without touching the shape at all.

use std::fmt;
use std::ops::Index;

use smallvec::SmallVec;

// ---------------------------------------------------------------------------
// NodeId
// ---------------------------------------------------------------------------

/// An index identifying a [`Block`] inside one [`Tree`].
///
/// Ids are only meaningful for the tree that produced them.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

// ---------------------------------------------------------------------------
// List data
// ---------------------------------------------------------------------------

/// The flavor of a list: bulleted or ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// A bullet list; `marker` is one of `*`, `+`, or `-`.
    Bullet {
        /// The bullet character.
        marker: char,
    },
    /// An ordered list.
    Ordered {
        /// The number of the first item.
        start: u64,
        /// The delimiter after the number: `.` or `)`.
        delimiter: char,
    },
}

impl ListKind {
    /// Whether two list kinds belong to the same list.
    ///
    /// Bullet lists match on the bullet character; ordered lists match on
    /// the delimiter. The ordered `start` is deliberately ignored, so
    /// consecutive items continue one list regardless of their numbers.
    #[must_use]
    pub fn matches(&self, other: &ListKind) -> bool {
        match (self, other) {
            (ListKind::Bullet { marker: a }, ListKind::Bullet { marker: b }) => a == b,
            (ListKind::Ordered { delimiter: a, .. }, ListKind::Ordered { delimiter: b, .. }) => {
                a == b
            }
            _ => false,
        }
    }
}

/// Marker geometry shared by a list and its items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListData {
    /// Bullet or ordered, with the marker payload.
    pub kind: ListKind,
    /// Columns of indentation before the marker.
    pub marker_offset: usize,
    /// Columns from the marker to the item content.
    pub padding: usize,
}

impl ListData {
    /// Whether an item with marker data `other` continues the list this
    /// data belongs to. See [`ListKind::matches`].
    #[must_use]
    pub fn matches(&self, other: &ListData) -> bool {
        self.kind.matches(&other.kind)
    }
}

// ---------------------------------------------------------------------------
// Block kinds
// ---------------------------------------------------------------------------

/// The kind of a block node, with per-kind payload.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    /// The root of the tree.
    Document,
    /// A run of inline-parsed text lines.
    Paragraph,
    /// A `>`-prefixed container.
    BlockQuote,
    /// A list container; holds only [`BlockKind::ListItem`] children.
    List {
        /// Marker data shared with the items.
        data: ListData,
        /// Whether the list is tight (no blank-separated content).
        /// Provisional until the list is finalized.
        tight: bool,
    },
    /// One item of a list.
    ListItem {
        /// Marker data for this item.
        data: ListData,
    },
    /// An ATX (`#`-prefixed) header.
    AtxHeader {
        /// Header level, 1–6.
        level: usize,
    },
    /// A setext header (paragraph underlined with `=` or `-`).
    SetextHeader {
        /// Header level: 1 for `=`, 2 for `-`.
        level: usize,
    },
    /// A code block formed by 4-space indentation.
    IndentedCode,
    /// A code block delimited by backtick or tilde fences.
    FencedCode {
        /// Columns of indentation before the opening fence.
        fence_offset: usize,
        /// Length of the opening fence run.
        fence_length: usize,
        /// The fence character: `` ` `` or `~`.
        fence_char: char,
        /// The trimmed, unescaped info string from the opening fence line.
        info: String,
    },
    /// A raw HTML block.
    HtmlBlock,
    /// A paragraph that consisted only of link reference definitions.
    ReferenceDef,
    /// A thematic break.
    HorizontalRule,
}

impl BlockKind {
    /// A stable name for the kind, used in diagnostics and tree output.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            BlockKind::Document => "Document",
            BlockKind::Paragraph => "Paragraph",
            BlockKind::BlockQuote => "BlockQuote",
            BlockKind::List { .. } => "List",
            BlockKind::ListItem { .. } => "ListItem",
            BlockKind::AtxHeader { .. } => "ATXHeader",
            BlockKind::SetextHeader { .. } => "SetextHeader",
            BlockKind::IndentedCode => "IndentedCode",
            BlockKind::FencedCode { .. } => "FencedCode",
            BlockKind::HtmlBlock => "HtmlBlock",
            BlockKind::ReferenceDef => "ReferenceDef",
            BlockKind::HorizontalRule => "HorizontalRule",
        }
    }

    /// Whether a block of this kind may contain a child of kind `child`.
    ///
    /// Document, block quotes, and list items accept any block; a list
    /// accepts only list items; leaves accept nothing.
    #[must_use]
    pub fn can_contain(&self, child: &BlockKind) -> bool {
        match self {
            BlockKind::Document | BlockKind::BlockQuote | BlockKind::ListItem { .. } => true,
            BlockKind::List { .. } => matches!(child, BlockKind::ListItem { .. }),
            _ => false,
        }
    }

    /// Whether a block of this kind accumulates raw text lines.
    #[must_use]
    pub fn accepts_lines(&self) -> bool {
        matches!(
            self,
            BlockKind::Paragraph | BlockKind::IndentedCode | BlockKind::FencedCode { .. }
        )
    }
}

// ---------------------------------------------------------------------------
// Inline nodes
// ---------------------------------------------------------------------------

/// An inline node produced by the inline phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// A literal text run.
    Str(String),
    /// An HTML entity reference, including `&` and `;`.
    Entity(String),
    /// A raw inline HTML tag.
    Html(String),
    /// A code span with collapsed interior whitespace.
    Code(String),
    /// A hard line break.
    Hardbreak,
    /// A soft line break.
    Softbreak,
    /// Emphasized content.
    Emphasis(Vec<Inline>),
    /// Strongly emphasized content.
    Strong(Vec<Inline>),
    /// A link.
    Link {
        /// Link destination.
        destination: String,
        /// Link title, empty when absent.
        title: String,
        /// Display content.
        label: Vec<Inline>,
    },
    /// An image.
    Image {
        /// Image source.
        destination: String,
        /// Image title, empty when absent.
        title: String,
        /// Alternative content.
        label: Vec<Inline>,
    },
}

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

/// One node of the block tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// The block kind and its payload.
    pub kind: BlockKind,
    /// 1-based line where the block opened.
    pub start_line: usize,
    /// 1-based column where the block opened.
    pub start_column: usize,
    /// 1-based line where the block ended; set at finalization.
    pub end_line: usize,
    /// True until the block is finalized, then false forever.
    pub open: bool,
    /// Whether the last line incorporated into this block was blank.
    /// Feeds list tight/loose resolution.
    pub last_line_blank: bool,
    /// The containing block; `None` only for the document root.
    pub parent: Option<NodeId>,
    /// Child blocks in document order.
    pub children: Vec<NodeId>,
    /// Concatenated text content, derived from the accumulated lines at
    /// finalization. Empty for containers and for inline-parsed leaves
    /// after the inline phase has run.
    pub string_content: String,
    /// Inline nodes, written exactly once by the inline phase.
    pub inline_content: Vec<Inline>,
    /// Raw line fragments accumulated during the block phase; consumed
    /// and emptied at finalization.
    pub(crate) strings: SmallVec<[String; 4]>,
}

impl Block {
    /// Creates an open block of the given kind at a source position.
    #[must_use]
    pub fn new(kind: BlockKind, start_line: usize, start_column: usize) -> Self {
        Self {
            kind,
            start_line,
            start_column,
            end_line: start_line,
            open: true,
            last_line_blank: false,
            parent: None,
            children: Vec::new(),
            string_content: String::new(),
            inline_content: Vec::new(),
            strings: SmallVec::new(),
        }
    }

    /// Whether a blank line incorporated on `line_number` should be
    /// remembered for list tightness.
    ///
    /// Block quotes and fenced code don't count blanks for tightness, and
    /// neither does a list item that is still empty on its own start line.
    pub(crate) fn remembers_blank_line(&self, line_number: usize) -> bool {
        !(matches!(
            self.kind,
            BlockKind::BlockQuote | BlockKind::FencedCode { .. }
        ) || (matches!(self.kind, BlockKind::ListItem { .. })
            && self.children.is_empty()
            && self.start_line == line_number))
    }
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// An arena-backed block tree rooted at a Document node.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    nodes: Vec<Block>,
    root: NodeId,
}

impl Tree {
    /// Creates a tree holding a single open Document root at line 1,
    /// column 1.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![Block::new(BlockKind::Document, 1, 1)],
            root: NodeId(0),
        }
    }

    /// The document root.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The block identified by `id`.
    #[must_use]
    pub fn block(&self, id: NodeId) -> &Block {
        &self.nodes[id.0]
    }

    pub(crate) fn block_mut(&mut self, id: NodeId) -> &mut Block {
        &mut self.nodes[id.0]
    }

    /// Appends a detached block to the arena and returns its id.
    /// Linking it to a parent is the caller's responsibility.
    pub(crate) fn push(&mut self, block: Block) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(block);
        id
    }

    /// Number of blocks in the tree, including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree is empty. Never true for parser output, which
    /// always contains at least the root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Index<NodeId> for Tree {
    type Output = Block;

    fn index(&self, id: NodeId) -> &Block {
        self.block(id)
    }
}
