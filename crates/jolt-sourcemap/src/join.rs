//! Joining chunk mappings and replaying column shifts.
//!
//! Chunks are generated in parallel, each relative to the zero state. The
//! joiner stitches them into one `mappings` string by rewriting only the
//! first mapping of each chunk against the previous chunk's end state;
//! everything after the first mapping is already correct and is copied
//! verbatim.
//!
//! All producers feeding the joiner are internal, so malformed input here
//! is a programmer error and panics rather than returning a result.

use crate::chunk::{Chunk, SourceMapState};
use crate::vlq;

/// Accumulates the joined `mappings` text.
pub struct MappingsJoiner {
    out: Vec<u8>,
    prev_end_state: SourceMapState,
}

impl MappingsJoiner {
    pub fn new() -> MappingsJoiner {
        MappingsJoiner {
            out: Vec::new(),
            prev_end_state: SourceMapState::default(),
        }
    }

    /// Append one chunk.
    ///
    /// `start_state` positions the chunk within the joined output:
    /// `generated_line` line breaks are inserted before it (emitted as
    /// standalone semicolons), `generated_column` offsets a chunk starting
    /// mid-line, and `source_index` rebases the chunk's file-relative
    /// source indices.
    pub fn append_chunk(&mut self, mut start_state: SourceMapState, chunk: &Chunk) {
        // Line breaks between the previous chunk and this one
        if start_state.generated_line > 0 {
            for _ in 0..start_state.generated_line {
                self.out.push(b';');
            }
            self.prev_end_state.generated_column = 0;
            start_state.generated_column = 0;
        }

        let mut buffer = chunk.buffer.as_slice();

        // Leading semicolons belong to lines without mappings; copy them
        // through and reset the column state
        let mut leading = 0;
        while leading < buffer.len() && buffer[leading] == b';' {
            leading += 1;
        }
        if leading > 0 {
            self.out.extend_from_slice(&buffer[..leading]);
            buffer = &buffer[leading..];
            self.prev_end_state.generated_column = 0;
            start_state.generated_column = 0;
        }

        if buffer.is_empty() {
            return;
        }

        // Strip the chunk's first mapping and decode it; it was encoded
        // relative to the zero state and must be rebased twice: onto the
        // chunk's start state, then re-encoded against the previous end
        let (generated_column, i) = decode_or_panic(buffer, 0);
        let (source_index, i) = decode_or_panic(buffer, i);
        let (original_line, i) = decode_or_panic(buffer, i);
        let (original_column, i) = decode_or_panic(buffer, i);
        let rest = &buffer[i..];

        start_state.generated_column += generated_column;
        start_state.source_index += source_index;
        start_state.original_line += original_line;
        start_state.original_column += original_column;

        match self.out.last() {
            None | Some(b';') => {}
            Some(_) => self.out.push(b','),
        }
        vlq::encode_into(
            &mut self.out,
            start_state.generated_column - self.prev_end_state.generated_column,
        );
        vlq::encode_into(
            &mut self.out,
            start_state.source_index - self.prev_end_state.source_index,
        );
        vlq::encode_into(
            &mut self.out,
            start_state.original_line - self.prev_end_state.original_line,
        );
        vlq::encode_into(
            &mut self.out,
            start_state.original_column - self.prev_end_state.original_column,
        );

        // Everything after the first mapping is valid as-is
        self.out.extend_from_slice(rest);

        // The chunk's end state is relative to its own zero state; rebase
        // the source index so the next chunk's deltas line up
        self.prev_end_state = chunk.end_state;
        self.prev_end_state.source_index += start_state.source_index - source_index;
    }

    /// The joined mappings text.
    pub fn finish(self) -> Vec<u8> {
        self.out
    }
}

impl Default for MappingsJoiner {
    fn default() -> Self {
        MappingsJoiner::new()
    }
}

fn decode_or_panic(buffer: &[u8], start: usize) -> (i32, usize) {
    let (value, next) = vlq::decode(buffer, start);
    assert!(
        next > start,
        "malformed source map chunk produced by an internal printer"
    );
    (value, next)
}

// =============================================================================
// Shift replay
// =============================================================================

/// A line/column position in generated output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LineColumnOffset {
    pub lines: i32,
    pub columns: i32,
}

impl LineColumnOffset {
    #[inline]
    fn comes_before_or_at(&self, other: LineColumnOffset) -> bool {
        self.lines < other.lines || (self.lines == other.lines && self.columns <= other.columns)
    }

    /// Advance this offset across a piece of output text.
    pub fn advance(&mut self, text: &str) {
        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    self.lines += 1;
                    self.columns = 0;
                }
                '\n' | '\u{2028}' | '\u{2029}' => {
                    self.lines += 1;
                    self.columns = 0;
                }
                _ => self.columns += ch.len_utf16() as i32,
            }
        }
    }
}

/// One substitution's effect on generated positions: text at `before` in
/// the pre-substitution output now ends at `after`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SourceMapShift {
    pub before: LineColumnOffset,
    pub after: LineColumnOffset,
}

/// A source map split around its `mappings` string, so late string
/// substitutions only have to re-encode the mappings.
#[derive(Clone, Debug, Default)]
pub struct SourceMapPieces {
    pub prefix: Vec<u8>,
    pub mappings: Vec<u8>,
    pub suffix: Vec<u8>,
}

impl SourceMapPieces {
    /// Apply recorded substitution shifts to the mappings and reassemble
    /// the map.
    ///
    /// Shifts must not cross line boundaries: substitutions never contain
    /// newlines, and a shift that claims otherwise is a programmer error.
    pub fn finalize(&self, shifts: &[SourceMapShift]) -> Vec<u8> {
        assert!(!shifts.is_empty(), "expected at least the zero shift");
        for shift in shifts {
            assert_eq!(
                shift.before.lines, shift.after.lines,
                "source map shifts must not span line boundaries"
            );
        }

        // No substitutions moved anything: stitch the pieces unchanged
        if shifts.len() == 1 {
            let mut out =
                Vec::with_capacity(self.prefix.len() + self.mappings.len() + self.suffix.len());
            out.extend_from_slice(&self.prefix);
            out.extend_from_slice(&self.mappings);
            out.extend_from_slice(&self.suffix);
            return out;
        }

        let mappings = self.mappings.as_slice();
        let mut shifts = shifts;
        let mut out = Vec::with_capacity(self.prefix.len() + mappings.len() + self.suffix.len());
        out.extend_from_slice(&self.prefix);

        let mut start_of_run = 0usize;
        let mut current = 0usize;
        let mut generated = LineColumnOffset::default();
        let mut prev_shift_column_delta = 0i32;

        while current < mappings.len() {
            if mappings[current] == b';' {
                generated.lines += 1;
                generated.columns = 0;
                prev_shift_column_delta = 0;
                current += 1;
                continue;
            }

            let potential_end_of_run = current;
            let (generated_column_delta, next) = decode_or_panic(mappings, current);
            generated.columns += generated_column_delta;
            current = next;
            let potential_start_of_run = current;

            // Skip the original position: source index, line, column
            let (_, next) = decode_or_panic(mappings, current);
            let (_, next) = decode_or_panic(mappings, next);
            let (_, next) = decode_or_panic(mappings, next);
            current = next;
            if current < mappings.len() && mappings[current] == b',' {
                current += 1;
            }

            // Move past any shift boundaries this mapping crossed
            let mut crossed = false;
            while shifts.len() > 1 && shifts[1].before.comes_before_or_at(generated) {
                shifts = &shifts[1..];
                crossed = true;
            }
            if !crossed {
                continue;
            }

            // A shift on an earlier line has no effect on this mapping
            let shift = shifts[0];
            if shift.after.lines != generated.lines {
                continue;
            }

            // Copy all untouched mappings in one run, then re-encode this
            // mapping's generated column with the shift applied
            out.extend_from_slice(&mappings[start_of_run..potential_end_of_run]);
            let shift_column_delta = shift.after.columns - shift.before.columns;
            vlq::encode_into(
                &mut out,
                generated_column_delta + shift_column_delta - prev_shift_column_delta,
            );
            prev_shift_column_delta = shift_column_delta;
            start_of_run = potential_start_of_run;
        }

        out.extend_from_slice(&mappings[start_of_run..]);
        out.extend_from_slice(&self.suffix);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(buffer: &[u8], end_state: SourceMapState) -> Chunk {
        Chunk {
            buffer: buffer.to_vec(),
            end_state,
            final_generated_column: 0,
            should_ignore: buffer.is_empty(),
        }
    }

    #[test]
    fn joins_chunks_across_a_line_break() {
        let mut joiner = MappingsJoiner::new();
        joiner.append_chunk(
            SourceMapState::default(),
            &chunk(
                b"AAAA",
                SourceMapState {
                    generated_line: 0,
                    generated_column: 0,
                    source_index: 0,
                    original_line: 0,
                    original_column: 0,
                },
            ),
        );
        // Second chunk starts one generated line down; its body maps
        // gen-col 1 to original line 2
        joiner.append_chunk(
            SourceMapState {
                generated_line: 1,
                ..Default::default()
            },
            &chunk(
                b"CAEA",
                SourceMapState {
                    generated_line: 0,
                    generated_column: 1,
                    source_index: 0,
                    original_line: 2,
                    original_column: 0,
                },
            ),
        );
        assert_eq!(joiner.finish(), b"AAAA;CAEA");
    }

    #[test]
    fn rebases_source_indices_between_files() {
        // Two single-mapping chunks from different files. The second
        // chunk's source index delta is rewritten from 0 to +1.
        let end = SourceMapState::default();
        let mut joiner = MappingsJoiner::new();
        joiner.append_chunk(SourceMapState::default(), &chunk(b"AAAA", end));
        joiner.append_chunk(
            SourceMapState {
                generated_line: 1,
                source_index: 1,
                ..Default::default()
            },
            &chunk(b"AAAA", end),
        );
        assert_eq!(joiner.finish(), b"AAAA;ACAA");
    }

    #[test]
    fn chunks_on_the_same_line_get_column_deltas() {
        // First chunk: one mapping at column 0, five columns of text
        let mut joiner = MappingsJoiner::new();
        joiner.append_chunk(SourceMapState::default(), &chunk(b"AAAA", SourceMapState::default()));
        // Next chunk continues on the same line, five columns in; its first
        // mapping is re-encoded relative to the previous chunk's last one
        joiner.append_chunk(
            SourceMapState {
                generated_column: 5,
                ..Default::default()
            },
            &chunk(b"AAAA", SourceMapState::default()),
        );
        assert_eq!(joiner.finish(), b"AAAA,KAAA");
    }

    #[test]
    fn shift_replay_reencodes_columns() {
        let pieces = SourceMapPieces {
            prefix: Vec::new(),
            mappings: b"AAAA,CAAA".to_vec(),
            suffix: Vec::new(),
        };
        let shifts = [
            SourceMapShift::default(),
            SourceMapShift {
                before: LineColumnOffset { lines: 0, columns: 1 },
                after: LineColumnOffset { lines: 0, columns: 4 },
            },
        ];
        assert_eq!(pieces.finalize(&shifts), b"AAAA,IAAA");
    }

    #[test]
    fn shift_replay_without_shifts_is_identity() {
        let pieces = SourceMapPieces {
            prefix: b"{\"mappings\":\"".to_vec(),
            mappings: b"AAAA;CACA".to_vec(),
            suffix: b"\"}".to_vec(),
        };
        assert_eq!(
            pieces.finalize(&[SourceMapShift::default()]),
            b"{\"mappings\":\"AAAA;CACA\"}"
        );
    }

    #[test]
    fn shift_carry_resets_at_line_breaks() {
        // Shift applies on line 0; the mapping on line 1 is untouched
        let pieces = SourceMapPieces {
            prefix: Vec::new(),
            mappings: b"CAAA;CACA".to_vec(),
            suffix: Vec::new(),
        };
        let shifts = [
            SourceMapShift::default(),
            SourceMapShift {
                before: LineColumnOffset { lines: 0, columns: 1 },
                after: LineColumnOffset { lines: 0, columns: 3 },
            },
        ];
        assert_eq!(pieces.finalize(&shifts), b"GAAA;CACA");
    }

    #[test]
    #[should_panic(expected = "line boundaries")]
    fn line_crossing_shift_panics() {
        let pieces = SourceMapPieces::default();
        let shifts = [
            SourceMapShift::default(),
            SourceMapShift {
                before: LineColumnOffset { lines: 0, columns: 1 },
                after: LineColumnOffset { lines: 1, columns: 0 },
            },
        ];
        pieces.finalize(&shifts);
    }
}
