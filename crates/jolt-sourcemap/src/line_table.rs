//! Line offset tables.
//!
//! Mapping a byte offset in the original source to a line and a UTF-16
//! column happens once per emitted mapping, so it has to be cheap. Lines
//! that are pure ASCII need only the line's starting byte offset: the
//! column is the byte distance. Lines with non-ASCII text carry a tail
//! array translating byte offsets at or past the first non-ASCII byte into
//! UTF-16 columns.

/// Per-line lookup data. See the module docs for the ASCII fast path.
#[derive(Clone, Debug, Default)]
pub struct LineOffsetTable {
    /// Byte offset of the start of this line
    pub byte_offset_to_start_of_line: u32,
    /// Byte offset (relative to line start) of the first non-ASCII
    /// character, or `u32::MAX` when the line is pure ASCII
    pub byte_offset_to_first_non_ascii: u32,
    /// UTF-16 column for each byte at or past the first non-ASCII byte
    pub columns_for_non_ascii: Vec<u32>,
}

/// Build the line tables for one source file.
///
/// `approximate_line_count` is the newline count the lexer accumulated, used
/// to preallocate.
pub fn generate_line_offset_tables(
    contents: &str,
    approximate_line_count: usize,
) -> Vec<LineOffsetTable> {
    let mut tables = Vec::with_capacity(approximate_line_count.max(1));
    let bytes = contents.as_bytes();

    let mut line_start = 0usize;
    let mut first_non_ascii = u32::MAX;
    let mut columns: Vec<u32> = Vec::new();
    let mut column = 0u32;

    let mut i = 0usize;
    while i < bytes.len() {
        let b = bytes[i];
        if b < 0x80 {
            if first_non_ascii != u32::MAX {
                columns.push(column);
            }
            if b == b'\n' || b == b'\r' {
                // \r\n is one terminator
                let mut next = i + 1;
                if b == b'\r' && bytes.get(next) == Some(&b'\n') {
                    if first_non_ascii != u32::MAX {
                        columns.push(column);
                    }
                    next += 1;
                }
                tables.push(LineOffsetTable {
                    byte_offset_to_start_of_line: line_start as u32,
                    byte_offset_to_first_non_ascii: first_non_ascii,
                    columns_for_non_ascii: std::mem::take(&mut columns),
                });
                line_start = next;
                first_non_ascii = u32::MAX;
                column = 0;
                i = next;
                continue;
            }
            column += 1;
            i += 1;
        } else {
            let ch = contents[i..].chars().next().unwrap_or('\u{FFFD}');
            let width = ch.len_utf8();
            if first_non_ascii == u32::MAX {
                first_non_ascii = (i - line_start) as u32;
            }
            // One column entry per byte of the character
            for _ in 0..width {
                columns.push(column);
            }
            if ch == '\u{2028}' || ch == '\u{2029}' {
                tables.push(LineOffsetTable {
                    byte_offset_to_start_of_line: line_start as u32,
                    byte_offset_to_first_non_ascii: first_non_ascii,
                    columns_for_non_ascii: std::mem::take(&mut columns),
                });
                line_start = i + width;
                first_non_ascii = u32::MAX;
                column = 0;
            } else {
                column += ch.len_utf16() as u32;
            }
            i += width;
        }
    }

    tables.push(LineOffsetTable {
        byte_offset_to_start_of_line: line_start as u32,
        byte_offset_to_first_non_ascii: first_non_ascii,
        columns_for_non_ascii: columns,
    });
    tables
}

/// Find the 0-based line containing a byte offset.
pub fn line_for_offset(tables: &[LineOffsetTable], offset: u32) -> usize {
    // Binary search for the last line starting at or before the offset
    let mut lo = 0usize;
    let mut hi = tables.len();
    while lo + 1 < hi {
        let mid = (lo + hi) / 2;
        if tables[mid].byte_offset_to_start_of_line <= offset {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Translate a byte offset to a UTF-16 column within its line.
pub fn column_for_offset(table: &LineOffsetTable, offset: u32) -> u32 {
    let within = offset.saturating_sub(table.byte_offset_to_start_of_line);
    if within < table.byte_offset_to_first_non_ascii {
        // ASCII prefix: byte distance is the column
        return within;
    }
    let idx = (within - table.byte_offset_to_first_non_ascii) as usize;
    table
        .columns_for_non_ascii
        .get(idx)
        .copied()
        .unwrap_or_else(|| table.columns_for_non_ascii.last().copied().unwrap_or(within))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_lines_have_no_tail() {
        let tables = generate_line_offset_tables("ab\ncd\n", 2);
        assert_eq!(tables.len(), 3);
        assert_eq!(tables[0].byte_offset_to_start_of_line, 0);
        assert_eq!(tables[0].byte_offset_to_first_non_ascii, u32::MAX);
        assert_eq!(tables[1].byte_offset_to_start_of_line, 3);
        assert_eq!(column_for_offset(&tables[1], 4), 1);
    }

    #[test]
    fn crlf_is_one_terminator() {
        let tables = generate_line_offset_tables("a\r\nb", 2);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[1].byte_offset_to_start_of_line, 3);
    }

    #[test]
    fn non_ascii_columns_count_utf16_units() {
        // 'é' is 2 bytes, 1 UTF-16 unit; '𐀀' is 4 bytes, 2 units
        let src = "aé𐀀b";
        let tables = generate_line_offset_tables(src, 1);
        let t = &tables[0];
        assert_eq!(t.byte_offset_to_first_non_ascii, 1);
        assert_eq!(column_for_offset(t, 0), 0); // a
        assert_eq!(column_for_offset(t, 1), 1); // é
        assert_eq!(column_for_offset(t, 3), 2); // 𐀀
        assert_eq!(column_for_offset(t, 7), 4); // b, after a two-unit char
    }

    #[test]
    fn line_lookup_by_offset() {
        let tables = generate_line_offset_tables("one\ntwo\nthree", 3);
        assert_eq!(line_for_offset(&tables, 0), 0);
        assert_eq!(line_for_offset(&tables, 3), 0);
        assert_eq!(line_for_offset(&tables, 4), 1);
        assert_eq!(line_for_offset(&tables, 12), 2);
    }

    #[test]
    fn unicode_line_separators_break_lines() {
        let tables = generate_line_offset_tables("a\u{2028}b", 1);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[1].byte_offset_to_start_of_line, 4);
    }
}
