//! Compiled patterns and line-scanning helpers shared by both phases.
//!
//! Every pattern is compiled once into a [`Lazy`] static. Patterns used for
//! anchored match-from-position are written with a leading `^` and applied
//! to a slice starting at the position of interest; the `regex` crate has
//! no lookahead, so the reference formulations that use one (closing code
//! fences, fence openers) are restated as a capture plus a rest-of-line
//! check.

use once_cell::sync::Lazy;
use regex::Regex;

// ---------------------------------------------------------------------------
// Block-phase patterns
// ---------------------------------------------------------------------------

/// Opening run of an ATX header: 1–6 `#` followed by a space or end.
pub(crate) static ATX_HEADER_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#{1,6}( +|$)").expect("ATX header pattern"));

/// Closing `#` run of an ATX header. An escaped `\#` is kept (group 1).
pub(crate) static ATX_HEADER_TRAILER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:(\\#) *#*| *#+) *$").expect("ATX trailer pattern"));

/// Opening code fence run; the rest-of-line check lives in [`open_fence`].
static OPEN_FENCE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(`{3,}|~{3,})").expect("open fence pattern"));

/// Closing code fence: a fence run followed only by spaces.
static CLOSE_FENCE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(`{3,}|~{3,}) *$").expect("close fence pattern"));

/// A horizontal rule: three or more `*`, `_`, or `-`, optionally spaced.
pub(crate) static HRULE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?:\* *){3,}|(?:_ *){3,}|(?:- *){3,}) *$").expect("hrule pattern")
});

/// A setext header underline: a run of `=` or `-` plus trailing spaces.
pub(crate) static SETEXT_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:=+|-+) *$").expect("setext pattern"));

/// A bullet list marker with its trailing spaces.
pub(crate) static BULLET_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([*+-])( +|$)").expect("bullet marker pattern"));

/// An ordered list marker: digits, `.` or `)`, trailing spaces.
pub(crate) static ORDERED_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)([.)])( +|$)").expect("ordered marker pattern"));

/// Tag names that open an HTML block.
const BLOCK_TAG_NAME: &str = "(?:article|header|aside|hgroup|blockquote|hr|iframe|body|li|map\
|button|object|canvas|ol|caption|output|col|p|colgroup|pre|dd|progress|div|section|dl|table\
|td|dt|tbody|embed|textarea|fieldset|tfoot|figcaption|th|figure|thead|footer|tr|form|ul\
|h1|h2|h3|h4|h5|h6|video|script|style)";

/// Start of an HTML block: an open or close tag of a block-level element,
/// or a `<!`/`<?` declaration.
pub(crate) static HTML_BLOCK_OPEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "(?i)^<(?:{BLOCK_TAG_NAME}[ \\t/>]|/{BLOCK_TAG_NAME}[ \\t>]|[?!])"
    ))
    .expect("HTML block open pattern")
});

// ---------------------------------------------------------------------------
// Inline-phase patterns
// ---------------------------------------------------------------------------

/// An entity reference: numeric (decimal or hex) or named.
pub(crate) static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^&(?:#x[a-f0-9]{1,8}|#[0-9]{1,8}|[a-z][a-z0-9]{1,31});")
        .expect("entity pattern")
});

/// An email autolink, capturing the address between the angle brackets.
pub(crate) static EMAIL_AUTOLINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^<([a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*)>",
    )
    .expect("email autolink pattern")
});

/// URI schemes recognized in autolinks.
const AUTOLINK_SCHEMES: &str = "coap|doi|javascript|aaa|aaas|about|acap|cap|cid|crid|data|dav\
|dict|dns|file|ftp|geo|go|gopher|h323|http|https|iax|icap|im|imap|info|ipp|iris|iris.beep\
|iris.xpc|iris.xpcs|iris.lwz|ldap|mailto|mid|msrp|msrps|mtqp|mupdate|news|nfs|ni|nih|nntp\
|opaquelocktoken|pop|pres|rtsp|service|session|shttp|sieve|sip|sips|sms|snmp|soap.beep\
|soap.beeps|tag|tel|telnet|tftp|thismessage|tn3270|tip|tv|urn|vemmi|ws|wss|xcon|xcon-userid\
|xmlrpc.beep|xmlrpc.beeps|xmpp|z39.50r|z39.50s|adiumxtra|afp|afs|aim|apt|attachment|aw\
|beshare|bitcoin|bolo|callto|chrome|chrome-extension|com-eventbrite-attendee|content|cvs\
|dlna-playsingle|dlna-playcontainer|dtn|dvb|ed2k|facetime|feed|finger|fish|gg|git\
|gizmoproject|gtalk|hcp|icon|ipn|irc|irc6|ircs|itms|jar|jms|keyparc|lastfm|ldaps|magnet\
|maps|market|message|mms|ms-help|msnim|mumble|mvn|notes|oid|palm|paparazzi|platform|proxy\
|psyc|query|res|resource|rmi|rsync|rtmp|secondlife|sftp|sgn|skype|smb|soldat|spotify|ssh\
|steam|svn|teamspeak|things|udp|unreal|ut2004|ventrilo|view-source|webcal|wtai|wyciwyg\
|xfire|xri|ymsgr";

/// A URI autolink: a registered scheme, `:`, and bracket/control-free text.
pub(crate) static URI_AUTOLINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "(?i)^<(?:{AUTOLINK_SCHEMES}):[^<>\\x00-\\x20]*>"
    ))
    .expect("URI autolink pattern")
});

/// Opening backtick run of a code span.
pub(crate) static TICKS_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^`+").expect("ticks-open pattern"));

/// Any backtick run; scanned forward when looking for a closer.
pub(crate) static TICKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"`+").expect("ticks pattern"));

/// A maximal string run: either a single special character or a run free
/// of them. Always matches somewhere short of end of input, which is what
/// guarantees the inline loop makes progress.
pub(crate) static MAIN_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[\n`\[\]\\!<&*_]|[^\n`\[\]\\!<&*_]+)").expect("string run pattern")
});

/// Interior whitespace collapsed inside code spans.
pub(crate) static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \n]+").expect("whitespace run pattern"));

// ---------------------------------------------------------------------------
// Finalization patterns
// ---------------------------------------------------------------------------

/// Trailing blank lines of an indented code block, replaced by one `\n`.
pub(crate) static TRAILING_BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\n *)*$").expect("trailing blank pattern"));

/// Leading spaces on each line of paragraph content.
pub(crate) static LEADING_SPACES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^ +").expect("leading spaces pattern"));

/// A backslash escape of an ASCII punctuation character.
static BACKSLASH_ESCAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\([!-/:-@\[-`{-~])").expect("backslash escape pattern"));

/// ASCII punctuation that a backslash may escape.
const ESCAPABLE: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Byte position of the first non-space at or after `offset`, or `None`
/// when only spaces remain. Tabs never appear here; lines are detabbed.
pub(crate) fn first_non_space(line: &str, offset: usize) -> Option<usize> {
    line[offset..].find(|c| c != ' ').map(|i| offset + i)
}

/// Whether the character at `offset` could begin a new block. Cheap
/// pre-check before attempting the individual block openers.
pub(crate) fn may_open_block(line: &str, offset: usize) -> bool {
    matches!(
        line.as_bytes().get(offset).copied(),
        Some(
            b' ' | b'#'
                | b'`'
                | b'~'
                | b'*'
                | b'+'
                | b'_'
                | b'='
                | b'<'
                | b'>'
                | b'-'
                | b'0'..=b'9'
        )
    )
}

/// Whether `text` is empty or entirely whitespace.
pub(crate) fn is_blank(text: &str) -> bool {
    text.chars().all(char::is_whitespace)
}

/// Whether `c` may be backslash-escaped.
pub(crate) fn is_escapable(c: char) -> bool {
    c.is_ascii() && ESCAPABLE.contains(c)
}

/// Remove backslash escapes from `text`.
pub(crate) fn unescape(text: &str) -> String {
    BACKSLASH_ESCAPE.replace_all(text, "$1").into_owned()
}

/// Match an anchored pattern at `offset`, returning the match length.
pub(crate) fn match_len(re: &Regex, line: &str, offset: usize) -> Option<usize> {
    re.find(&line[offset..]).map(|m| m.end())
}

/// Whether an anchored pattern matches at `offset`.
pub(crate) fn is_match_at(re: &Regex, line: &str, offset: usize) -> bool {
    re.is_match(&line[offset..])
}

/// Capture an anchored pattern at `offset`.
pub(crate) fn captures_at<'t>(
    re: &Regex,
    line: &'t str,
    offset: usize,
) -> Option<regex::Captures<'t>> {
    re.captures(&line[offset..])
}

/// Recognize an opening code fence at `offset`.
///
/// Returns the fence character and run length. The rest of the line must
/// not repeat the fence character (that text is the info string, and a
/// backtick info string would be ambiguous with an inline code span).
pub(crate) fn open_fence(line: &str, offset: usize) -> Option<(char, usize)> {
    let caps = OPEN_FENCE_RUN.captures(&line[offset..])?;
    let run = caps.get(1)?.as_str();
    let fence_char = run.chars().next()?;
    if line[offset + run.len()..].contains(fence_char) {
        return None;
    }
    Some((fence_char, run.len()))
}

/// Recognize a closing code fence at `offset`, returning its character
/// and run length. Fence-length and character comparison against the
/// opener is the caller's job.
pub(crate) fn closing_fence(line: &str, offset: usize) -> Option<(char, usize)> {
    let caps = CLOSE_FENCE_RUN.captures(&line[offset..])?;
    let run = caps.get(1)?.as_str();
    Some((run.chars().next()?, run.len()))
}
