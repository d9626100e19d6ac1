//! Source-map chunk builder.
//!
//! A printer emits output text interleaved with source locations. The
//! builder turns that stream into the VLQ `mappings` text for one chunk,
//! keeping every delta relative to a zero start state so chunks for
//! different files can be built in parallel and joined later.
//!
//! If the input file carries no nested source map, the builder repeats the
//! last mapping at the start of any otherwise-unmapped line: a widely-used
//! consumer returns null for positions on lines that have no mapping at
//! all. When remapping through an existing source map this padding is
//! skipped because that map may legitimately leave lines unmapped.

use crate::line_table::{LineOffsetTable, column_for_offset, line_for_offset};
use crate::vlq;

/// Absolute values of one mapping; deltas are computed against the
/// previous state when encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SourceMapState {
    pub generated_line: i32,
    pub generated_column: i32,
    pub source_index: i32,
    pub original_line: i32,
    pub original_column: i32,
}

/// The output of building one chunk.
#[derive(Clone, Debug)]
pub struct Chunk {
    /// Encoded mappings, relative to the zero state
    pub buffer: Vec<u8>,
    /// State after the last mapping (generated line counts `;` emitted)
    pub end_state: SourceMapState,
    /// Generated column at the end of the chunk's last line
    pub final_generated_column: i32,
    /// True when the chunk contains no mappings at all
    pub should_ignore: bool,
}

/// Builds the mappings for one chunk of printed output.
pub struct ChunkBuilder<'a> {
    source_index: i32,
    line_tables: &'a [LineOffsetTable],
    cover_lines_without_mappings: bool,

    buffer: Vec<u8>,
    prev_loc: u32,
    prev_state: SourceMapState,
    has_prev_state: bool,
    generated_column: i32,
    line_has_mapping: bool,
    mapping_count: usize,
}

impl<'a> ChunkBuilder<'a> {
    /// `has_nested_source_map` disables the unmapped-line padding.
    pub fn new(
        source_index: u32,
        line_tables: &'a [LineOffsetTable],
        has_nested_source_map: bool,
    ) -> ChunkBuilder<'a> {
        ChunkBuilder {
            source_index: source_index as i32,
            line_tables,
            cover_lines_without_mappings: !has_nested_source_map,
            buffer: Vec::new(),
            prev_loc: u32::MAX,
            prev_state: SourceMapState::default(),
            has_prev_state: false,
            generated_column: 0,
            line_has_mapping: false,
            mapping_count: 0,
        }
    }

    /// Record a mapping from the original location `loc` (a byte offset in
    /// the source) to the current generated position.
    pub fn add_source_mapping(&mut self, loc: u32) {
        // The printer visits nested nodes at the same position; only the
        // first mapping for a location is interesting
        if loc == self.prev_loc {
            return;
        }
        self.prev_loc = loc;

        let line = line_for_offset(self.line_tables, loc);
        let table = &self.line_tables[line];
        let column = column_for_offset(table, loc);

        let state = SourceMapState {
            generated_line: self.prev_state.generated_line,
            generated_column: self.generated_column,
            source_index: self.source_index,
            original_line: line as i32,
            original_column: column as i32,
        };
        self.append_mapping(state);
        self.line_has_mapping = true;
    }

    /// Advance the generated position across newly printed output.
    pub fn advance(&mut self, output: &str) {
        let mut chars = output.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    self.break_line();
                }
                '\n' | '\u{2028}' | '\u{2029}' => self.break_line(),
                _ => self.generated_column += ch.len_utf16() as i32,
            }
        }
    }

    /// Finish the chunk.
    pub fn generate_chunk(self) -> Chunk {
        Chunk {
            should_ignore: self.mapping_count == 0,
            buffer: self.buffer,
            end_state: self.prev_state,
            final_generated_column: self.generated_column,
        }
    }

    fn break_line(&mut self) {
        // Pad the line we are leaving with a mapping if it never got one
        if self.cover_lines_without_mappings && !self.line_has_mapping && self.has_prev_state {
            let state = SourceMapState {
                generated_line: self.prev_state.generated_line,
                generated_column: 0,
                source_index: self.prev_state.source_index,
                original_line: self.prev_state.original_line,
                original_column: self.prev_state.original_column,
            };
            self.append_mapping(state);
        }
        self.prev_state.generated_line += 1;
        self.prev_state.generated_column = 0;
        self.generated_column = 0;
        self.buffer.push(b';');
        self.line_has_mapping = false;
    }

    fn append_mapping(&mut self, state: SourceMapState) {
        match self.buffer.last() {
            None | Some(b';') => {}
            Some(_) => self.buffer.push(b','),
        }
        vlq::encode_into(
            &mut self.buffer,
            state.generated_column - self.prev_state.generated_column,
        );
        vlq::encode_into(&mut self.buffer, state.source_index - self.prev_state.source_index);
        vlq::encode_into(&mut self.buffer, state.original_line - self.prev_state.original_line);
        vlq::encode_into(
            &mut self.buffer,
            state.original_column - self.prev_state.original_column,
        );
        self.prev_state = state;
        self.has_prev_state = true;
        self.mapping_count += 1;
    }
}
