//! Source map generation and joining for the jolt bundler.
//!
//! This crate provides:
//! - `vlq` - Base64 VLQ encoding and decoding
//! - `LineOffsetTable` - O(1) byte offset to UTF-16 column translation
//! - `ChunkBuilder` - Per-chunk mapping generation (parallel-safe)
//! - `MappingsJoiner` - Joins chunk mappings relative to prior end states
//! - `SourceMapPieces` - Shift replay for late string substitutions
//! - Source Map v3 JSON output, inline data URLs, and a decoder
//!
//! Chunks are encoded relative to a zero state so they can be generated in
//! parallel across files; the serial join pass rewrites only each chunk's
//! first mapping.

pub mod vlq;

pub mod line_table;
pub use line_table::{LineOffsetTable, generate_line_offset_tables};

pub mod chunk;
pub use chunk::{Chunk, ChunkBuilder, SourceMapState};

pub mod join;
pub use join::{LineColumnOffset, MappingsJoiner, SourceMapPieces, SourceMapShift};

pub mod output;
pub use output::{Mapping, SourceMap, decode_mappings, encode_mappings, inline_url_comment, serialize};
