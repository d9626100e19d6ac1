//! The scan driver.
//!
//! Reads each entry point through the filesystem (zip overlay included),
//! runs the tokenizer to the end of the file, and collects diagnostics.
//! The parser and printer sit above this layer; the driver exists so the
//! scanning path can be exercised end to end against both the real and
//! mock filesystems.

use std::sync::Arc;

use anyhow::anyhow;
use tracing::debug;

use jolt_common::diagnostics::Log;
use jolt_common::source::Source;
use jolt_fs::Fs;
use jolt_lexer::{Lexer, T, catch_lexer_panic};

use crate::loader::Loader;

/// The result of scanning the entry points.
pub struct ScanResult {
    /// One source per successfully read entry, indexed by discovery order
    /// (which is what makes later orderings stable).
    pub sources: Vec<Source>,
    /// Approximate total newline count, used to size output buffers.
    pub total_lines: usize,
}

/// Read and tokenize every entry point. I/O failures become errors on the
/// log; lexical errors are already there. Returns `Err` only when nothing
/// could be done at all (no entry points).
pub fn scan_entry_points(
    fs: &Arc<dyn Fs>,
    log: &Log,
    entry_points: &[String],
    loader: Loader,
) -> anyhow::Result<ScanResult> {
    if entry_points.is_empty() {
        return Err(anyhow!("No entry points supplied"));
    }

    let mut sources = Vec::with_capacity(entry_points.len());
    let mut total_lines = 0usize;

    for (index, entry) in entry_points.iter().enumerate() {
        let path = fs
            .abs(entry)
            .ok_or_else(|| anyhow!("Cannot resolve entry point {entry:?}"))?;

        let contents = match fs.read_file(&path) {
            Ok(contents) => contents,
            Err(err) => {
                log.add_msg(jolt_common::diagnostics::Msg {
                    kind: jolt_common::diagnostics::MsgKind::Error,
                    data: jolt_common::diagnostics::MsgData::plain(format!(
                        "Could not read {entry:?}: {err}"
                    )),
                    notes: Vec::new(),
                });
                continue;
            }
        };

        let source = Source {
            index: index as u32,
            key_path: path.clone(),
            pretty_path: entry.clone(),
            contents,
        };

        let effective = if loader == Loader::Default {
            Loader::for_extension(&fs.ext(&path))
        } else {
            loader
        };
        debug!(entry, ?effective, "scanning");

        total_lines += scan_one(log, &source, effective);
        sources.push(source);
    }

    Ok(ScanResult {
        sources,
        total_lines,
    })
}

/// Tokenize one file to the end, counting newlines. A lexer panic stops
/// the scan of this file; its diagnostic is already on the log.
fn scan_one(log: &Log, source: &Source, loader: Loader) -> usize {
    let result = catch_lexer_panic(|| {
        let mut lexer = if loader == Loader::Json {
            Lexer::new_json(log, source)
        } else {
            Lexer::new(log, source)
        };
        while lexer.token != T::EndOfFile {
            lexer.next();
        }
        lexer.approximate_newline_count
    });
    result.unwrap_or(0)
}
