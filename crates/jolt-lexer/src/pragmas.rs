//! Comment pragma scanning.
//!
//! Comment text is scanned once, when the comment is skipped. Pragmas are
//! recognized by prefix match after `@` or `#`; the `sourceMappingURL`
//! directive is special-cased to comment offset 2, where toolchains emit
//! it.

use jolt_common::span::Span;
use memchr::memchr2_iter;

use crate::lexer::Lexer;

impl Lexer<'_> {
    /// Inspect one comment (span covers the whole comment including the
    /// `//` or `/*` delimiters) and record any pragmas it carries.
    pub(crate) fn scan_comment_pragmas(&mut self, span: Span) {
        let text = span.slice(self.contents);
        let base = span.start as usize;

        // `//!` and `/*!` comments are legal comments by convention
        if text.as_bytes().get(2) == Some(&b'!') {
            self.legal_comments.push(span);
        }

        // `//# sourceMappingURL=...` or `//@ sourceMappingURL=...`,
        // recognized only directly after the comment opener
        if text.len() > 2 {
            let rest = &text[2..];
            for prefix in ["# sourceMappingURL=", "@ sourceMappingURL="] {
                if let Some(url) = rest.strip_prefix(prefix) {
                    let url_start = base + 2 + prefix.len();
                    let url_len = url
                        .find(|c: char| c.is_whitespace() || c == '*')
                        .unwrap_or(url.len());
                    self.source_mapping_url =
                        Some(Span::new(url_start as u32, (url_start + url_len) as u32));
                }
            }
        }

        // Everything else is found by prefix match after '@' or '#'
        for at in memchr2_iter(b'@', b'#', text.as_bytes()) {
            let after = &text[at + 1..];
            if after.starts_with("__PURE__") {
                self.has_pure_comment_before = true;
            } else if after.starts_with("__KEY__") {
                self.has_key_comment_before = true;
            } else if after.starts_with("__NO_SIDE_EFFECTS__") {
                self.has_no_side_effects_comment_before = true;
            } else if after.starts_with("preserve") || after.starts_with("license") {
                if !self.legal_comments.contains(&span) {
                    self.legal_comments.push(span);
                }
            } else if let Some(value) = after.strip_prefix("jsxRuntime") {
                self.jsx_runtime_pragma = pragma_value_span(base + at + 1 + "jsxRuntime".len(), value);
            } else if let Some(value) = after.strip_prefix("jsxImportSource") {
                self.jsx_import_source_pragma =
                    pragma_value_span(base + at + 1 + "jsxImportSource".len(), value);
            } else if let Some(value) = after.strip_prefix("jsxFrag") {
                self.jsx_fragment_pragma = pragma_value_span(base + at + 1 + "jsxFrag".len(), value);
            } else if let Some(value) = after.strip_prefix("jsx") {
                self.jsx_factory_pragma = pragma_value_span(base + at + 1 + "jsx".len(), value);
            }
        }
    }
}

/// The span of the whitespace-separated value following a pragma word,
/// e.g. the `h` of `@jsx h`.
fn pragma_value_span(value_offset: usize, rest: &str) -> Option<Span> {
    let trimmed = rest.trim_start();
    if trimmed.is_empty() {
        return None;
    }
    let skipped = rest.len() - trimmed.len();
    let len = trimmed
        .find(|c: char| c.is_whitespace() || c == '*')
        .unwrap_or(trimmed.len());
    if len == 0 {
        return None;
    }
    let start = value_offset + skipped;
    Some(Span::new(start as u32, (start + len) as u32))
}
