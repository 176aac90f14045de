//! Autolinks plus the link, image, and raw-HTML interface stubs.
//!
//! Full link and image syntax (destinations, titles, reference labels) and
//! raw inline HTML are recognized by the surrounding processor, not by
//! this crate. The handlers exist so the dispatch table is complete and
//! the constructs degrade to literal text here.

use super::Scanner;
use crate::scan;
use crate::tree::Inline;

impl Scanner<'_> {
    /// Autolink in angle brackets: an email address or a `scheme:` URI.
    pub(super) fn parse_autolink(&mut self, inlines: &mut Vec<Inline>) -> bool {
        let subject = self.subject;
        if let Some(caps) = scan::captures_at(&scan::EMAIL_AUTOLINK, subject, self.pos) {
            let whole_len = caps.get(0).map_or(0, |m| m.end());
            let address = caps.get(1).map_or("", |m| m.as_str());
            inlines.push(Inline::Link {
                destination: address.to_string(),
                title: String::new(),
                label: vec![Inline::Str(format!("mailto:{address}"))],
            });
            self.pos += whole_len;
            return true;
        }
        if let Some(len) = scan::match_len(&scan::URI_AUTOLINK, subject, self.pos) {
            let uri = &subject[self.pos + 1..self.pos + len - 1];
            inlines.push(Inline::Link {
                destination: uri.to_string(),
                title: String::new(),
                label: vec![Inline::Str(uri.to_string())],
            });
            self.pos += len;
            return true;
        }
        false
    }

    /// Full link syntax is out of scope here; always declines.
    pub(super) fn parse_link(&mut self, _inlines: &mut [Inline]) -> bool {
        false
    }

    /// Image syntax is out of scope here; always declines.
    pub(super) fn parse_image(&mut self, _inlines: &mut [Inline]) -> bool {
        false
    }

    /// Raw inline HTML tags are out of scope here; always declines.
    pub(super) fn parse_html_tag(&mut self, _inlines: &mut [Inline]) -> bool {
        false
    }
}
