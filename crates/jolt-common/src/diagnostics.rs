//! Diagnostic types and the build log.
//!
//! Structural errors (symbol conflicts, unsupported features) are reported
//! here as messages with a primary range and optional notes; the build
//! continues when possible. Lexical errors also land here after the parser
//! catches the lexer's panic at a statement boundary.
//!
//! The log deduplicates by `(kind, location, text)` so a statement that is
//! re-scanned after error recovery does not produce the same diagnostic
//! twice.

use rustc_hash::FxHashSet;
use serde::Serialize;
use std::sync::Mutex;

use crate::source::Source;
use crate::span::Span;

/// Diagnostic severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum MsgKind {
    Error,
    Warning,
    Info,
    Debug,
}

impl MsgKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            MsgKind::Error => "error",
            MsgKind::Warning => "warning",
            MsgKind::Info => "info",
            MsgKind::Debug => "debug",
        }
    }
}

/// A resolved source location for display.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct MsgLocation {
    /// Path shown to the user
    pub file: String,
    /// 1-based line number
    pub line: u32,
    /// 0-based column in UTF-16 code units
    pub column: u32,
    /// Length of the highlighted range in UTF-16 code units
    pub length: u32,
    /// Text of the containing line
    pub line_text: String,
}

/// The text and optional location of one message or note.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct MsgData {
    pub text: String,
    pub location: Option<MsgLocation>,
}

impl MsgData {
    /// Build message data pointing at a span of a source file.
    pub fn with_span(source: &Source, span: Span, text: String) -> MsgData {
        let lc = source.line_and_column(span.start);
        let end = source.line_and_column(span.end.min(lc.line_end));
        let length = if end.line == lc.line {
            end.column.saturating_sub(lc.column)
        } else {
            // Clamp multi-line ranges to the first line
            let line_text = &source.contents[lc.line_start as usize..lc.line_end as usize];
            (line_text.chars().map(|c| c.len_utf16() as u32).sum::<u32>()).saturating_sub(lc.column)
        };
        MsgData {
            text,
            location: Some(MsgLocation {
                file: source.pretty_path.clone(),
                line: lc.line + 1,
                column: lc.column,
                length,
                line_text: source.contents[lc.line_start as usize..lc.line_end as usize]
                    .to_string(),
            }),
        }
    }

    /// Build message data with no location.
    pub fn plain(text: String) -> MsgData {
        MsgData {
            text,
            location: None,
        }
    }
}

/// A complete diagnostic: severity, primary data, and follow-up notes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Msg {
    pub kind: MsgKind,
    pub data: MsgData,
    pub notes: Vec<MsgData>,
}

/// Thread-safe sink for diagnostics.
///
/// Workers push messages concurrently during parallel phases; the host
/// drains them in one batch after the build settles. `sort_key` on each
/// message is not needed because callers attach the stable source index via
/// the location's file path and drain order is made deterministic by the
/// final sort in `take_msgs`.
pub struct Log {
    inner: Mutex<LogInner>,
}

struct LogInner {
    msgs: Vec<Msg>,
    seen: FxHashSet<(MsgKind, Option<(String, u32, u32)>, String)>,
    errors: usize,
    warnings: usize,
}

impl Log {
    #[must_use]
    pub fn new() -> Log {
        Log {
            inner: Mutex::new(LogInner {
                msgs: Vec::new(),
                seen: FxHashSet::default(),
                errors: 0,
                warnings: 0,
            }),
        }
    }

    /// Add a message, dropping exact duplicates by `(kind, loc, text)`.
    pub fn add_msg(&self, msg: Msg) {
        let key = (
            msg.kind,
            msg.data
                .location
                .as_ref()
                .map(|l| (l.file.clone(), l.line, l.column)),
            msg.data.text.clone(),
        );
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if !inner.seen.insert(key) {
            return;
        }
        match msg.kind {
            MsgKind::Error => inner.errors += 1,
            MsgKind::Warning => inner.warnings += 1,
            _ => {}
        }
        inner.msgs.push(msg);
    }

    /// Report an error at a span.
    pub fn add_error(&self, source: &Source, span: Span, text: String) {
        self.add_msg(Msg {
            kind: MsgKind::Error,
            data: MsgData::with_span(source, span, text),
            notes: Vec::new(),
        });
    }

    /// Report an error with follow-up notes.
    pub fn add_error_with_notes(
        &self,
        source: &Source,
        span: Span,
        text: String,
        notes: Vec<MsgData>,
    ) {
        self.add_msg(Msg {
            kind: MsgKind::Error,
            data: MsgData::with_span(source, span, text),
            notes,
        });
    }

    /// Report a warning at a span.
    pub fn add_warning(&self, source: &Source, span: Span, text: String) {
        self.add_msg(Msg {
            kind: MsgKind::Warning,
            data: MsgData::with_span(source, span, text),
            notes: Vec::new(),
        });
    }

    /// Number of errors reported so far.
    pub fn has_errors(&self) -> bool {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).errors > 0
    }

    /// Drain all messages, sorted by `(file, line, column)` so output is
    /// deterministic regardless of worker scheduling.
    pub fn take_msgs(&self) -> Vec<Msg> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let mut msgs = std::mem::take(&mut inner.msgs);
        msgs.sort_by(|a, b| {
            let ka = a
                .data
                .location
                .as_ref()
                .map(|l| (l.file.clone(), l.line, l.column));
            let kb = b
                .data
                .location
                .as_ref()
                .map(|l| (l.file.clone(), l.line, l.column));
            ka.cmp(&kb)
        });
        msgs
    }
}

impl Default for Log {
    fn default() -> Self {
        Log::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> Source {
        Source::for_testing(0, "app.js", "let x = 1;\nlet x = 2;\n")
    }

    #[test]
    fn locations_are_one_based_lines() {
        let s = source();
        let log = Log::new();
        log.add_error(&s, Span::new(15, 16), "duplicate binding \"x\"".to_string());
        let msgs = log.take_msgs();
        assert_eq!(msgs.len(), 1);
        let loc = msgs[0].data.location.as_ref().unwrap();
        assert_eq!(loc.line, 2);
        assert_eq!(loc.column, 4);
        assert_eq!(loc.line_text, "let x = 2;");
    }

    #[test]
    fn duplicate_messages_are_dropped() {
        let s = source();
        let log = Log::new();
        log.add_error(&s, Span::new(4, 5), "oops".to_string());
        log.add_error(&s, Span::new(4, 5), "oops".to_string());
        assert_eq!(log.take_msgs().len(), 1);
    }

    #[test]
    fn errors_and_warnings_are_counted_separately() {
        let s = source();
        let log = Log::new();
        log.add_warning(&s, Span::new(0, 3), "unused".to_string());
        assert!(!log.has_errors());
        log.add_error(&s, Span::new(4, 5), "bad".to_string());
        assert!(log.has_errors());
    }

    #[test]
    fn drain_is_sorted_by_position() {
        let s = source();
        let log = Log::new();
        log.add_error(&s, Span::new(15, 16), "second".to_string());
        log.add_error(&s, Span::new(4, 5), "first".to_string());
        let msgs = log.take_msgs();
        assert_eq!(msgs[0].data.text, "first");
        assert_eq!(msgs[1].data.text, "second");
    }
}
