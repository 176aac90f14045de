//! Inline parser: decomposes leaf text into a sequence of inline nodes.
//!
//! The parser is a cursor over the subject string. Each call to
//! [`Scanner::parse_inline`] consumes one construct — a break, an escape, a
//! code span, an emphasis span, an autolink, an entity, or a plain string
//! run — and appends the result to the growing inline list. Emphasis is the
//! one construct that edits the list retroactively: opening delimiter runs
//! go in as provisional [`Inline::Str`] nodes and are rewritten into
//! [`Inline::Emphasis`]/[`Inline::Strong`] wrappers when a closer arrives
//! (see [`emphasis`]).

mod emphasis;
mod links;

use regex::Regex;

use crate::scan;
use crate::tree::Inline;

// ---------------------------------------------------------------------------
// Public surface
// ---------------------------------------------------------------------------

/// The inline-phase parser.
///
/// Stateless between calls; it exists as a value because the block phase
/// holds one for reference extraction during paragraph finalization.
#[derive(Debug, Default)]
pub struct InlineParser {}

impl InlineParser {
    /// Creates an inline parser.
    #[must_use]
    pub fn new() -> Self {
        Self {}
    }

    /// Parse `subject` into a sequence of inline nodes.
    ///
    /// Total: every subject yields a sequence, with unmatched delimiters
    /// degrading to literal [`Inline::Str`] runs.
    pub fn parse(&mut self, subject: &str) -> Vec<Inline> {
        let mut scanner = Scanner::new(subject);
        let mut inlines = Vec::new();
        while scanner.parse_inline(&mut inlines) {}
        inlines
    }

    /// Try to parse one link reference definition off the front of
    /// `content`, removing it on success.
    ///
    /// Reference definitions are resolved by the surrounding processor,
    /// not by this crate; this hook is the seam paragraph finalization
    /// calls through, and here it always reports no reference.
    pub fn parse_reference(&mut self, _content: &mut String) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

/// Cursor state for one inline parse.
pub(crate) struct Scanner<'s> {
    subject: &'s str,
    pos: usize,
}

impl<'s> Scanner<'s> {
    fn new(subject: &'s str) -> Self {
        Self { subject, pos: 0 }
    }

    /// The character at the cursor, if any.
    fn peek(&self) -> Option<char> {
        self.subject[self.pos..].chars().next()
    }

    /// Match an anchored pattern at the cursor and advance past it.
    fn scan_anchored(&mut self, re: &Regex) -> Option<&'s str> {
        let subject = self.subject;
        let m = re.find(&subject[self.pos..])?;
        let text = &subject[self.pos..self.pos + m.end()];
        self.pos += m.end();
        Some(text)
    }

    /// Find the next match of a pattern at or after the cursor and
    /// advance past it.
    fn scan_forward(&mut self, re: &Regex) -> Option<&'s str> {
        let subject = self.subject;
        let m = re.find(&subject[self.pos..])?;
        let text = &subject[self.pos + m.start()..self.pos + m.end()];
        self.pos += m.end();
        Some(text)
    }

    /// Parse one inline construct, appending to `inlines`.
    ///
    /// Returns false only at end of subject; otherwise at least one
    /// character is consumed.
    pub(crate) fn parse_inline(&mut self, inlines: &mut Vec<Inline>) -> bool {
        let Some(c) = self.peek() else {
            return false;
        };
        let handled = match c {
            '\n' => self.parse_newline(inlines),
            '\\' => self.parse_backslash(inlines),
            '`' => self.parse_backticks(inlines),
            '*' | '_' => self.parse_emphasis(inlines),
            '[' => self.parse_link(inlines),
            '!' => self.parse_image(inlines),
            '<' => self.parse_autolink(inlines) || self.parse_html_tag(inlines),
            '&' => self.parse_entity(inlines),
            _ => false,
        };
        if handled {
            true
        } else {
            self.parse_string(inlines)
        }
    }

    // -- constructs ---------------------------------------------------------

    /// Newline: a hard break when the preceding string ends in two or
    /// more spaces, a soft break otherwise. Trailing spaces are stripped
    /// from the preceding string either way.
    fn parse_newline(&mut self, inlines: &mut Vec<Inline>) -> bool {
        if self.peek() != Some('\n') {
            return false;
        }
        self.pos += 1;
        let mut stripped = 0;
        if let Some(Inline::Str(s)) = inlines.last_mut() {
            let kept = s.trim_end_matches(' ').len();
            stripped = s.len() - kept;
            s.truncate(kept);
        }
        inlines.push(if stripped >= 2 {
            Inline::Hardbreak
        } else {
            Inline::Softbreak
        });
        true
    }

    /// Backslash escape: `\` + newline is a hard break, `\` + escapable
    /// punctuation is that character literally, anything else keeps the
    /// backslash itself.
    fn parse_backslash(&mut self, inlines: &mut Vec<Inline>) -> bool {
        if self.peek() != Some('\\') {
            return false;
        }
        match self.subject[self.pos + 1..].chars().next() {
            Some('\n') => {
                self.pos += 2;
                inlines.push(Inline::Hardbreak);
            }
            Some(c) if scan::is_escapable(c) => {
                self.pos += 1 + c.len_utf8();
                inlines.push(Inline::Str(c.to_string()));
            }
            _ => {
                self.pos += 1;
                inlines.push(Inline::Str("\\".to_string()));
            }
        }
        true
    }

    /// Code span: an opening backtick run closed by the next run of
    /// exactly the same length. Interior whitespace runs collapse to one
    /// space and the result is trimmed. Without a closer the opening run
    /// stays literal and the cursor backtracks to just past it.
    fn parse_backticks(&mut self, inlines: &mut Vec<Inline>) -> bool {
        let Some(ticks) = self.scan_anchored(&scan::TICKS_OPEN) else {
            return false;
        };
        let after_open = self.pos;
        while let Some(closer) = self.scan_forward(&scan::TICKS) {
            if closer.len() == ticks.len() {
                let raw = &self.subject[after_open..self.pos - closer.len()];
                let collapsed = scan::WHITESPACE_RUN.replace_all(raw, " ");
                inlines.push(Inline::Code(collapsed.trim().to_string()));
                return true;
            }
        }
        inlines.push(Inline::Str(ticks.to_string()));
        self.pos = after_open;
        true
    }

    /// Entity reference, kept verbatim including `&` and `;`.
    fn parse_entity(&mut self, inlines: &mut Vec<Inline>) -> bool {
        match self.scan_anchored(&scan::ENTITY) {
            Some(m) => {
                inlines.push(Inline::Entity(m.to_string()));
                true
            }
            None => false,
        }
    }

    /// A maximal run that does not begin another construct.
    fn parse_string(&mut self, inlines: &mut Vec<Inline>) -> bool {
        match self.scan_anchored(&scan::MAIN_RUN) {
            Some(m) => {
                inlines.push(Inline::Str(m.to_string()));
                true
            }
            None => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
