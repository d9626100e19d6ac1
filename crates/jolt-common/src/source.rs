//! Source file handles.
//!
//! A `Source` couples the contents of one input file with the stable index
//! the bundler assigned to it. Stable indices are handed out in entry-point
//! discovery order (a DFS over the module graph), never in worker-thread
//! completion order, so every downstream ordering derived from them is
//! deterministic.

use serde::{Deserialize, Serialize};

use crate::span::Span;

/// A single input file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Source {
    /// Stable index of this source within the build. Determined by the
    /// DFS order of entry-point discovery, not by which worker finished
    /// parsing first.
    pub index: u32,

    /// The path used to open the file. May refer into a zip archive.
    pub key_path: String,

    /// The path shown to humans in diagnostics and source maps.
    pub pretty_path: String,

    /// The file contents, decoded as UTF-8 (invalid sequences replaced).
    pub contents: String,
}

impl Source {
    /// Create a source for tests and synthetic inputs.
    pub fn for_testing(index: u32, path: &str, contents: &str) -> Source {
        Source {
            index,
            key_path: path.to_string(),
            pretty_path: path.to_string(),
            contents: contents.to_string(),
        }
    }

    /// Get the text covered by a span.
    #[inline]
    pub fn text_for(&self, span: Span) -> &str {
        span.slice(&self.contents)
    }

    /// Compute the 0-based line and UTF-16 column of a byte offset.
    ///
    /// Used when rendering diagnostics. Columns are counted in UTF-16 code
    /// units to match how editors and source maps count them.
    pub fn line_and_column(&self, offset: u32) -> LineColumn {
        let offset = (offset as usize).min(self.contents.len());
        let mut line = 0u32;
        let mut line_start = 0usize;

        for (i, ch) in self.contents[..offset].char_indices() {
            match ch {
                '\n' => {
                    line += 1;
                    line_start = i + 1;
                }
                // A \r\n pair is counted once, at the \n
                '\r' => {
                    if self.contents.as_bytes().get(i + 1) != Some(&b'\n') {
                        line += 1;
                        line_start = i + 1;
                    }
                }
                '\u{2028}' | '\u{2029}' => {
                    line += 1;
                    line_start = i + ch.len_utf8();
                }
                _ => {}
            }
        }

        let column = self.contents[line_start..offset]
            .chars()
            .map(|ch| ch.len_utf16() as u32)
            .sum();

        // The text of the containing line, for diagnostic rendering
        let rest = &self.contents[line_start..];
        let line_len = rest
            .find(['\n', '\r', '\u{2028}', '\u{2029}'])
            .unwrap_or(rest.len());

        LineColumn {
            line,
            column,
            line_start: line_start as u32,
            line_end: (line_start + line_len) as u32,
        }
    }
}

/// The result of resolving a byte offset to a line and column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineColumn {
    /// 0-based line number
    pub line: u32,
    /// 0-based column in UTF-16 code units
    pub column: u32,
    /// Byte offset of the start of the containing line
    pub line_start: u32,
    /// Byte offset of the end of the containing line (before the terminator)
    pub line_end: u32,
}
