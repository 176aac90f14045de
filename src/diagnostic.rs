//! Structured errors produced during block parsing.
//!
//! The parser is total — every input is a valid document — so the only
//! error is the defensive one: an attempt to append a line to a container
//! that has already been finalized. It carries structured data rather than
//! a rendered message so that consumers can build their own reports.

use std::error::Error;
use std::fmt;

/// The defensive error surfaced by
/// [`DocumentParser::incorporate_line`](crate::DocumentParser::incorporate_line).
///
/// Never expected on input that reaches the parser through
/// [`parse`](crate::parse); it indicates a violated internal invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// 1-based line number being incorporated when the violation occurred.
    pub line: usize,
    /// Name of the closed container that was targeted for a line append.
    pub container: &'static str,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: cannot add a line to closed {} container",
            self.line, self.container
        )
    }
}

impl Error for ParseError {}
