//! Emphasis and strong emphasis via delimiter-run scanning.
//!
//! Opening `*`/`_` runs are emitted as provisional [`Inline::Str`] nodes.
//! When a matching closer is found, the inlines between opener and closer
//! are spliced out of the outer list and wrapped, and the provisional
//! string is replaced by the wrapper in place. A run that never closes
//! simply remains the literal string it was emitted as.

use super::Scanner;
use crate::tree::Inline;

/// Result of scanning a delimiter run at a position.
pub(super) struct DelimRun {
    /// Length of the run.
    pub count: usize,
    /// Whether the run may open emphasis here.
    pub can_open: bool,
    /// Whether the run may close emphasis here.
    pub can_close: bool,
}

/// Examine the `delim` run starting at `pos` without moving the cursor.
///
/// A run of 1–3 may open when not followed by whitespace and may close
/// when not preceded by whitespace. For `_` the run additionally must not
/// be flanked by an alphanumeric on the opening (before) or closing
/// (after) side, which keeps underscores inside words literal.
pub(super) fn scan_delims(subject: &str, pos: usize, delim: char) -> DelimRun {
    let char_before = if pos == 0 {
        '\n'
    } else {
        subject[..pos].chars().next_back().unwrap_or('\n')
    };
    let mut count = 0;
    let mut rest = subject[pos..].chars();
    let char_after = loop {
        match rest.next() {
            Some(c) if c == delim => count += 1,
            Some(c) => break c,
            None => break '\n',
        }
    };
    let mut can_open = count > 0 && count <= 3 && !char_after.is_whitespace();
    let mut can_close = count > 0 && count <= 3 && !char_before.is_whitespace();
    if delim == '_' {
        can_open = can_open && !char_before.is_ascii_alphanumeric();
        can_close = can_close && !char_after.is_ascii_alphanumeric();
    }
    DelimRun {
        count,
        can_open,
        can_close,
    }
}

impl Scanner<'_> {
    /// Parse an emphasis construct opened by the `*`/`_` run at the
    /// cursor.
    pub(super) fn parse_emphasis(&mut self, inlines: &mut Vec<Inline>) -> bool {
        let Some(delim) = self.peek() else {
            return false;
        };
        if delim != '*' && delim != '_' {
            return false;
        }

        let run = scan_delims(self.subject, self.pos, delim);
        let numdelims = run.count;
        if numdelims == 0 {
            return false;
        }
        self.pos += numdelims;
        // Provisional literal, rewritten in place if a closer arrives.
        inlines.push(Inline::Str(
            self.subject[self.pos - numdelims..self.pos].to_string(),
        ));
        let opener = inlines.len() - 1;
        if !run.can_open {
            return true;
        }

        match numdelims {
            1 => loop {
                let close = scan_delims(self.subject, self.pos, delim);
                if close.count >= 1 && close.can_close {
                    self.pos += 1;
                    let content = inlines.split_off(opener + 1);
                    inlines[opener] = Inline::Emphasis(content);
                    break;
                } else if !self.parse_inline(inlines) {
                    break;
                }
            },
            2 => loop {
                let close = scan_delims(self.subject, self.pos, delim);
                if close.count >= 2 && close.can_close {
                    self.pos += 2;
                    let content = inlines.split_off(opener + 1);
                    inlines[opener] = Inline::Strong(content);
                    break;
                } else if !self.parse_inline(inlines) {
                    break;
                }
            },
            3 => self.close_triple(inlines, delim, opener),
            _ => {}
        }
        true
    }

    /// Close a `***`/`___` opener. The first closer splits the run into a
    /// deep and a shallow span; the second closer (of a different length)
    /// determines which of the two nests inside the other.
    fn close_triple(&mut self, inlines: &mut Vec<Inline>, delim: char, opener: usize) {
        // (index of the provisional closer string, its delimiter count)
        let mut first_close: Option<(usize, usize)> = None;
        loop {
            let close = scan_delims(self.subject, self.pos, delim);
            let repeats_first = first_close.is_some_and(|(_, n)| n == close.count);
            if (1..=3).contains(&close.count) && close.can_close && !repeats_first {
                // A triple closer acts as a single one.
                let consumed = if close.count == 3 { 1 } else { close.count };
                self.pos += consumed;
                if let Some((fc_index, fc_count)) = first_close {
                    let mut rest = inlines.split_off(opener + 1);
                    let fc_rel = fc_index - (opener + 1);
                    let mut shallow = rest.split_off(fc_rel + 1);
                    rest.truncate(fc_rel); // drop the provisional closer string
                    let deep = if fc_count == 1 {
                        Inline::Emphasis(rest)
                    } else {
                        Inline::Strong(rest)
                    };
                    let mut wrapped = Vec::with_capacity(1 + shallow.len());
                    wrapped.push(deep);
                    wrapped.append(&mut shallow);
                    inlines[opener] = if fc_count == 1 {
                        Inline::Strong(wrapped)
                    } else {
                        Inline::Emphasis(wrapped)
                    };
                    break;
                }
                // First closer: provisional literal until its partner shows up.
                inlines.push(Inline::Str(
                    self.subject[self.pos - consumed..self.pos].to_string(),
                ));
                first_close = Some((inlines.len() - 1, consumed));
            } else if !self.parse_inline(inlines) {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::inline::InlineParser;

    fn parse(subject: &str) -> Vec<Inline> {
        InlineParser::new().parse(subject)
    }

    fn s(text: &str) -> Inline {
        Inline::Str(text.into())
    }

    // ── scan_delims ──────────────────────────────────────────────────

    #[test]
    fn delim_run_counts() {
        let run = scan_delims("***x", 0, '*');
        assert_eq!(run.count, 3);
        assert!(run.can_open);

        let run = scan_delims("****x", 0, '*');
        assert_eq!(run.count, 4);
        assert!(!run.can_open, "runs longer than 3 never open");
    }

    #[test]
    fn whitespace_blocks_opening_and_closing() {
        let run = scan_delims("* x", 0, '*');
        assert!(!run.can_open, "delimiter followed by space cannot open");

        let run = scan_delims("x *", 2, '*');
        assert!(!run.can_close, "delimiter preceded by space cannot close");
        assert!(!run.can_open, "nothing follows");
    }

    #[test]
    fn underscore_blocked_inside_words() {
        let run = scan_delims("foo_bar", 3, '_');
        assert!(!run.can_open, "preceded by an alphanumeric");
        assert!(!run.can_close, "followed by an alphanumeric");

        let run = scan_delims("foo *bar", 4, '*');
        assert!(run.can_open, "star has no word-boundary rule");
    }

    // ── single and double runs ───────────────────────────────────────

    #[test]
    fn single_star_emphasis() {
        assert_eq!(parse("*foo*"), vec![Inline::Emphasis(vec![s("foo")])]);
    }

    #[test]
    fn double_star_strong() {
        assert_eq!(parse("**foo**"), vec![Inline::Strong(vec![s("foo")])]);
    }

    #[test]
    fn underscore_emphasis() {
        assert_eq!(parse("_foo_"), vec![Inline::Emphasis(vec![s("foo")])]);
    }

    #[test]
    fn intraword_underscore_is_literal() {
        assert_eq!(parse("foo_bar_baz"), vec![s("foo"), s("_"), s("bar"), s("_"), s("baz")]);
    }

    #[test]
    fn intraword_star_still_works() {
        assert_eq!(
            parse("foo*bar*baz"),
            vec![s("foo"), Inline::Emphasis(vec![s("bar")]), s("baz")]
        );
    }

    #[test]
    fn nested_strong_inside_emphasis() {
        assert_eq!(
            parse("*foo **bar** baz*"),
            vec![Inline::Emphasis(vec![
                s("foo "),
                Inline::Strong(vec![s("bar")]),
                s(" baz"),
            ])]
        );
    }

    #[test]
    fn emphasis_closer_takes_one_delimiter() {
        // The closing run is longer than needed; one star closes, the
        // rest is left for the following text.
        assert_eq!(
            parse("*foo**"),
            vec![Inline::Emphasis(vec![s("foo")]), s("*")]
        );
    }

    // ── unmatched runs stay literal ──────────────────────────────────

    #[test]
    fn unclosed_star_is_literal() {
        assert_eq!(parse("*foo"), vec![s("*"), s("foo")]);
    }

    #[test]
    fn unclosed_double_star_is_literal() {
        assert_eq!(parse("**foo"), vec![s("**"), s("foo")]);
    }

    #[test]
    fn four_star_run_is_literal() {
        assert_eq!(parse("****foo"), vec![s("****"), s("foo")]);
    }

    #[test]
    fn space_after_opener_keeps_run_literal() {
        assert_eq!(parse("* foo*"), vec![s("*"), s(" foo"), s("*")]);
    }

    #[test]
    fn unmatched_runs_preserve_bytes() {
        // Concatenating the literal pieces reproduces the input exactly.
        let subject = "**a *b";
        let rendered: String = parse(subject)
            .iter()
            .map(|node| match node {
                Inline::Str(text) => text.as_str(),
                other => panic!("expected only literal strings, got {other:?}"),
            })
            .collect();
        assert_eq!(rendered, subject);
    }

    // ── triple runs ──────────────────────────────────────────────────

    #[test]
    fn triple_star_closed_by_triple() {
        assert_eq!(
            parse("***foo***"),
            vec![Inline::Strong(vec![Inline::Emphasis(vec![s("foo")])])]
        );
    }

    #[test]
    fn triple_star_split_one_then_two() {
        assert_eq!(
            parse("***foo*bar**"),
            vec![Inline::Strong(vec![
                Inline::Emphasis(vec![s("foo")]),
                s("bar"),
            ])]
        );
    }

    #[test]
    fn triple_star_split_two_then_one() {
        assert_eq!(
            parse("***foo**bar*"),
            vec![Inline::Emphasis(vec![
                Inline::Strong(vec![s("foo")]),
                s("bar"),
            ])]
        );
    }

    #[test]
    fn unclosed_triple_is_literal() {
        assert_eq!(parse("***foo"), vec![s("***"), s("foo")]);
    }

    // ── interaction with other constructs ────────────────────────────

    #[test]
    fn code_span_inside_emphasis() {
        assert_eq!(
            parse("*a `b` c*"),
            vec![Inline::Emphasis(vec![
                s("a "),
                Inline::Code("b".into()),
                s(" c"),
            ])]
        );
    }

    #[test]
    fn escaped_star_does_not_close() {
        assert_eq!(
            parse(r"*foo\*"),
            vec![s("*"), s("foo"), s("*")]
        );
    }
}
