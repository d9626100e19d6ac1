//! Source Map v3 output and decoding.
//!
//! The JSON format: `version: 3`, `sources`, optional `sourcesContent`,
//! and a single `mappings` string of semicolon-separated lines of
//! comma-separated four-field VLQ segments. All columns are UTF-16 code
//! unit counts.

use base64::Engine;
use serde::Serialize;

use crate::vlq;

/// One decoded mapping, all fields absolute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Mapping {
    pub generated_line: i32,
    pub generated_column: i32,
    pub source_index: i32,
    pub original_line: i32,
    pub original_column: i32,
}

/// A decoded source map: sources plus mappings sorted by generated
/// position.
#[derive(Clone, Debug, Default)]
pub struct SourceMap {
    pub sources: Vec<String>,
    pub sources_content: Option<Vec<Option<String>>>,
    pub mappings: Vec<Mapping>,
}

impl SourceMap {
    /// Find the mapping for a generated position: the last mapping at or
    /// before `(line, column)`.
    pub fn find(&self, line: i32, column: i32) -> Option<&Mapping> {
        let idx = self
            .mappings
            .partition_point(|m| (m.generated_line, m.generated_column) <= (line, column));
        if idx == 0 {
            return None;
        }
        let mapping = &self.mappings[idx - 1];
        if mapping.generated_line == line {
            Some(mapping)
        } else {
            None
        }
    }
}

/// The serialized form of a source map.
#[derive(Serialize)]
struct SourceMapJson<'a> {
    version: i32,
    sources: &'a [String],
    #[serde(rename = "sourcesContent", skip_serializing_if = "Option::is_none")]
    sources_content: Option<&'a [Option<String>]>,
    mappings: &'a str,
}

/// Serialize a source map with an already-encoded mappings string.
pub fn serialize(
    sources: &[String],
    sources_content: Option<&[Option<String>]>,
    mappings: &str,
) -> String {
    let json = SourceMapJson {
        version: 3,
        sources,
        sources_content,
        mappings,
    };
    serde_json::to_string(&json).unwrap_or_default()
}

/// Generate an inline `sourceMappingURL` comment carrying the whole map.
pub fn inline_url_comment(map_json: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(map_json.as_bytes());
    format!("//# sourceMappingURL=data:application/json;base64,{encoded}")
}

/// Encode mappings to the v3 `mappings` string.
pub fn encode_mappings(mappings: &[Mapping]) -> String {
    let mut out = Vec::new();
    let mut prev = Mapping::default();
    for m in mappings {
        while prev.generated_line < m.generated_line {
            out.push(b';');
            prev.generated_line += 1;
            prev.generated_column = 0;
        }
        match out.last() {
            None | Some(b';') => {}
            Some(_) => out.push(b','),
        }
        vlq::encode_into(&mut out, m.generated_column - prev.generated_column);
        vlq::encode_into(&mut out, m.source_index - prev.source_index);
        vlq::encode_into(&mut out, m.original_line - prev.original_line);
        vlq::encode_into(&mut out, m.original_column - prev.original_column);
        prev = *m;
    }
    String::from_utf8(out).unwrap_or_default()
}

/// Decode a v3 `mappings` string. Segments shorter than four fields (pure
/// generated positions) are ignored; five-field segments have their name
/// index skipped.
pub fn decode_mappings(text: &str) -> Vec<Mapping> {
    let bytes = text.as_bytes();
    let mut out = Vec::new();
    let mut state = Mapping::default();
    let mut i = 0usize;

    while i < bytes.len() {
        match bytes[i] {
            b';' => {
                state.generated_line += 1;
                state.generated_column = 0;
                i += 1;
            }
            b',' => i += 1,
            _ => {
                let (gc, next) = vlq::decode(bytes, i);
                if next == i {
                    break;
                }
                state.generated_column += gc;
                i = next;

                // A one-field segment has no original position
                if matches!(bytes.get(i), None | Some(b',') | Some(b';')) {
                    continue;
                }
                let (si, next) = vlq::decode(bytes, i);
                let (ol, next) = vlq::decode(bytes, next);
                let (oc, next) = vlq::decode(bytes, next);
                i = next;
                state.source_index += si;
                state.original_line += ol;
                state.original_column += oc;

                // Optional name index
                if !matches!(bytes.get(i), None | Some(b',') | Some(b';')) {
                    let (_, next) = vlq::decode(bytes, i);
                    i = next;
                }
                out.push(state);
            }
        }
    }
    out
}
