//! Zip archive overlay.
//!
//! Wraps any [`Fs`] so that a `.zip` anywhere inside a path behaves like a
//! directory, which is how Yarn's Plug'n'Play installation strategy stores
//! packages. Every call delegates to the inner filesystem first; only when
//! that reports the path as missing does the overlay look for an enclosing
//! archive.
//!
//! Each archive is opened and indexed at most once: concurrent lookups for
//! the same archive share a single open through a per-archive once cell,
//! and open errors are cached the same way. Each file inside an archive is
//! decompressed at most once, under a per-file lock. Entry lookup is
//! case-insensitive, matching how these archives are produced on
//! case-preserving filesystems.

use rustc_hash::FxHashMap;
use std::io::Read;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::debug;

use crate::entries::{DirEntries, Entry, EntryKind};
use crate::modkey::{ModKey, ModKeyError};
use crate::{CanonicalError, Dialect, Fs, FsError, OpenedFile, WatchData};

/// Filesystem overlay that reads through `.zip` archives.
pub struct ZipFs {
    inner: Arc<dyn Fs>,
    archives: Mutex<FxHashMap<String, Arc<ArchiveSlot>>>,
}

#[derive(Default)]
struct ArchiveSlot {
    cell: OnceLock<Result<Arc<ArchiveIndex>, FsError>>,
}

struct ArchiveIndex {
    zip_path: String,
    /// Lowercased sub-path ("" is the archive root) -> directory listing
    dirs: FxHashMap<String, ZipDir>,
    /// Lowercased sub-path -> file entry
    files: FxHashMap<String, Arc<ZipFileEntry>>,
}

struct ZipDir {
    /// Original-case sub-path
    path: String,
    /// Lowercased base -> (original base, kind)
    entries: FxHashMap<String, (String, EntryKind)>,
}

struct ZipFileEntry {
    method: u16,
    compressed_size: u64,
    uncompressed_size: u64,
    crc32: u32,
    local_header_offset: u64,
    contents: Mutex<Option<Result<Arc<Vec<u8>>, FsError>>>,
}

const METHOD_STORED: u16 = 0;
const METHOD_DEFLATE: u16 = 8;

impl ZipFs {
    pub fn new(inner: Arc<dyn Fs>) -> ZipFs {
        ZipFs {
            inner,
            archives: Mutex::new(FxHashMap::default()),
        }
    }

    /// Does this error mean "keep looking in an enclosing archive"?
    fn should_try_zip(err: &FsError) -> bool {
        matches!(
            err.canonical,
            CanonicalError::DoesNotExist | CanonicalError::NotDirectory
        )
    }

    /// Split `path` into an archive path and the sub-path inside it.
    /// With `for_dir` set, a path ending in `.zip` maps to the archive root.
    fn split_zip_path(path: &str, for_dir: bool) -> Option<(String, String)> {
        let normalized = path.replace('\\', "/");
        if let Some(i) = normalized.find(".zip/") {
            let zip = path[..i + 4].to_string();
            let tail = normalized[i + 5..].trim_end_matches('/').to_string();
            return Some((zip, tail));
        }
        if for_dir && normalized.ends_with(".zip") {
            return Some((path.to_string(), String::new()));
        }
        None
    }

    /// Get (opening if necessary) the index for an archive. Concurrent
    /// callers for the same archive share one open; the first caller
    /// produces the result and the rest wait on the once cell.
    fn archive(&self, zip_path: &str) -> Result<Arc<ArchiveIndex>, FsError> {
        let slot = {
            let mut archives = self.archives.lock().unwrap_or_else(|e| e.into_inner());
            Arc::clone(archives.entry(zip_path.to_string()).or_default())
        };
        slot.cell
            .get_or_init(|| {
                debug!(zip_path, "opening zip archive");
                open_archive(self.inner.as_ref(), zip_path)
            })
            .clone()
    }

    fn lookup(&self, path: &str, for_dir: bool) -> Option<(Arc<ArchiveIndex>, String)> {
        let (zip_path, tail) = Self::split_zip_path(path, for_dir)?;
        match self.archive(&zip_path) {
            Ok(index) => Some((index, tail)),
            Err(_) => None,
        }
    }

    fn rewrite(&self, path: &str) -> String {
        mangle_yarn_pnp_virtual_path(path)
    }
}

impl Fs for ZipFs {
    fn read_directory(&self, dir: &str) -> Result<Arc<DirEntries>, FsError> {
        let dir = self.rewrite(dir);
        let inner_result = self.inner.read_directory(&dir);
        let err = match inner_result {
            Ok(entries) => return Ok(entries),
            Err(err) if Self::should_try_zip(&err) => err,
            Err(err) => return Err(err),
        };

        let Some((index, tail)) = self.lookup(&dir, true) else {
            return Err(err);
        };
        let Some(zip_dir) = index.dirs.get(&tail.to_lowercase()) else {
            return Err(err);
        };

        let listing_dir = if zip_dir.path.is_empty() {
            index.zip_path.clone()
        } else {
            format!("{}/{}", index.zip_path, zip_dir.path)
        };
        let mut data = FxHashMap::default();
        for (key, (base, kind)) in &zip_dir.entries {
            data.insert(
                key.clone(),
                Arc::new(Entry::with_kind(listing_dir.clone(), base.clone(), *kind)),
            );
        }
        Ok(Arc::new(DirEntries::new(listing_dir, data)))
    }

    fn read_file(&self, path: &str) -> Result<String, FsError> {
        let path = self.rewrite(path);
        let err = match self.inner.read_file(&path) {
            Ok(contents) => return Ok(contents),
            Err(err) if Self::should_try_zip(&err) => err,
            Err(err) => return Err(err),
        };

        let Some((index, tail)) = self.lookup(&path, false) else {
            return Err(err);
        };
        let Some(file) = index.files.get(&tail.to_lowercase()) else {
            return Err(err);
        };
        let bytes = read_archive_file(self.inner.as_ref(), &index.zip_path, file)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn open_file(&self, path: &str) -> Result<Box<dyn OpenedFile>, FsError> {
        let path = self.rewrite(path);
        let err = match self.inner.open_file(&path) {
            Ok(file) => return Ok(file),
            Err(err) if Self::should_try_zip(&err) => err,
            Err(err) => return Err(err),
        };

        let Some((index, tail)) = self.lookup(&path, false) else {
            return Err(err);
        };
        let Some(file) = index.files.get(&tail.to_lowercase()) else {
            return Err(err);
        };
        let bytes = read_archive_file(self.inner.as_ref(), &index.zip_path, file)?;
        Ok(Box::new(DecompressedFile { bytes }))
    }

    fn mod_key(&self, path: &str) -> Result<ModKey, ModKeyError> {
        self.inner.mod_key(&self.rewrite(path))
    }

    fn kind(&self, dir: &str, base: &str) -> (Option<String>, Option<EntryKind>) {
        let dir = self.rewrite(dir);
        let (symlink, kind) = self.inner.kind(&dir, base);
        if kind.is_some() {
            return (symlink, kind);
        }
        let joined = self.join(&[&dir, base]);
        if let Some((index, tail)) = self.lookup(&joined, true) {
            let key = tail.to_lowercase();
            if index.files.contains_key(&key) {
                return (None, Some(EntryKind::File));
            }
            if index.dirs.contains_key(&key) {
                return (None, Some(EntryKind::Dir));
            }
        }
        (None, None)
    }

    fn eval_symlinks(&self, path: &str) -> Option<String> {
        self.inner.eval_symlinks(path)
    }

    fn watch_data(&self) -> WatchData {
        self.inner.watch_data()
    }

    fn dialect(&self) -> Dialect {
        self.inner.dialect()
    }

    fn cwd(&self) -> &str {
        self.inner.cwd()
    }
}

struct DecompressedFile {
    bytes: Arc<Vec<u8>>,
}

impl OpenedFile for DecompressedFile {
    fn len(&self) -> Result<u64, FsError> {
        Ok(self.bytes.len() as u64)
    }

    fn read(&self, start: u64, end: u64) -> Result<Vec<u8>, FsError> {
        let start = start as usize;
        let end = (end as usize).min(self.bytes.len());
        if start > end {
            return Err(FsError::new(CanonicalError::Other, "read range out of bounds"));
        }
        Ok(self.bytes[start..end].to_vec())
    }
}

// =============================================================================
// Archive parsing
// =============================================================================

const EOCD_SIG: u32 = 0x0605_4b50;
const CENTRAL_SIG: u32 = 0x0201_4b50;
const LOCAL_SIG: u32 = 0x0403_4b50;

fn read_u16(b: &[u8], i: usize) -> u16 {
    u16::from_le_bytes([b[i], b[i + 1]])
}

fn read_u32(b: &[u8], i: usize) -> u32 {
    u32::from_le_bytes([b[i], b[i + 1], b[i + 2], b[i + 3]])
}

fn parse_error(zip_path: &str, msg: &str) -> FsError {
    FsError::new(
        CanonicalError::Other,
        format!("invalid zip archive {zip_path:?}: {msg}"),
    )
}

/// Open and index an archive: parse the central directory, record every
/// file entry, and synthesize any missing parent directories. Entries that
/// are neither regular files nor directories (symlinks) are skipped.
fn open_archive(inner: &dyn Fs, zip_path: &str) -> Result<Arc<ArchiveIndex>, FsError> {
    let file = inner.open_file(zip_path)?;
    let len = file.len()?;

    // Find the end-of-central-directory record in the trailing bytes
    let tail_len = len.min(65_557);
    let tail = file.read(len - tail_len, len)?;
    let mut eocd = None;
    if tail.len() >= 22 {
        let mut i = tail.len() - 22;
        loop {
            if read_u32(&tail, i) == EOCD_SIG {
                eocd = Some(i);
                break;
            }
            if i == 0 {
                break;
            }
            i -= 1;
        }
    }
    let Some(eocd) = eocd else {
        return Err(parse_error(zip_path, "missing end of central directory"));
    };

    let cd_size = read_u32(&tail, eocd + 12) as u64;
    let cd_offset = read_u32(&tail, eocd + 16) as u64;
    if cd_offset + cd_size > len {
        return Err(parse_error(zip_path, "central directory out of bounds"));
    }
    let cd = file.read(cd_offset, cd_offset + cd_size)?;

    let mut index = ArchiveIndex {
        zip_path: zip_path.to_string(),
        dirs: FxHashMap::default(),
        files: FxHashMap::default(),
    };
    index.dirs.insert(
        String::new(),
        ZipDir {
            path: String::new(),
            entries: FxHashMap::default(),
        },
    );

    let mut i = 0usize;
    while i + 46 <= cd.len() {
        if read_u32(&cd, i) != CENTRAL_SIG {
            break;
        }
        let method = read_u16(&cd, i + 10);
        let crc32 = read_u32(&cd, i + 16);
        let compressed_size = read_u32(&cd, i + 20) as u64;
        let uncompressed_size = read_u32(&cd, i + 24) as u64;
        let name_len = read_u16(&cd, i + 28) as usize;
        let extra_len = read_u16(&cd, i + 30) as usize;
        let comment_len = read_u16(&cd, i + 32) as usize;
        let external_attrs = read_u32(&cd, i + 38);
        let local_header_offset = read_u32(&cd, i + 42) as u64;

        if i + 46 + name_len > cd.len() {
            return Err(parse_error(zip_path, "truncated central directory entry"));
        }
        let name = String::from_utf8_lossy(&cd[i + 46..i + 46 + name_len]).into_owned();
        i += 46 + name_len + extra_len + comment_len;

        let name = name.replace('\\', "/");
        let name = name.trim_start_matches('/');

        // Unix mode lives in the high 16 bits of the external attributes.
        // Skip anything that is not a regular file or a directory.
        let unix_mode = external_attrs >> 16;
        let is_dir = name.ends_with('/') || (unix_mode & 0o170_000) == 0o040_000;
        let is_symlink = (unix_mode & 0o170_000) == 0o120_000;
        if is_symlink {
            continue;
        }

        if is_dir {
            add_directory(&mut index, name.trim_end_matches('/'));
        } else if !name.is_empty() {
            add_file(
                &mut index,
                name,
                ZipFileEntry {
                    method,
                    compressed_size,
                    uncompressed_size,
                    crc32,
                    local_header_offset,
                    contents: Mutex::new(None),
                },
            );
        }
    }

    Ok(Arc::new(index))
}

/// Ensure a directory (and all its ancestors) exist in the index, and
/// register it in its parent's listing.
fn add_directory(index: &mut ArchiveIndex, dir_path: &str) {
    if dir_path.is_empty() || index.dirs.contains_key(&dir_path.to_lowercase()) {
        return;
    }
    let (parent, base) = match dir_path.rfind('/') {
        Some(i) => (&dir_path[..i], &dir_path[i + 1..]),
        None => ("", dir_path),
    };
    add_directory(index, parent);
    index.dirs.insert(
        dir_path.to_lowercase(),
        ZipDir {
            path: dir_path.to_string(),
            entries: FxHashMap::default(),
        },
    );
    if let Some(parent_dir) = index.dirs.get_mut(&parent.to_lowercase()) {
        parent_dir
            .entries
            .insert(base.to_lowercase(), (base.to_string(), EntryKind::Dir));
    }
}

fn add_file(index: &mut ArchiveIndex, file_path: &str, entry: ZipFileEntry) {
    let (parent, base) = match file_path.rfind('/') {
        Some(i) => (&file_path[..i], &file_path[i + 1..]),
        None => ("", file_path),
    };
    add_directory(index, parent);
    index
        .files
        .insert(file_path.to_lowercase(), Arc::new(entry));
    if let Some(parent_dir) = index.dirs.get_mut(&parent.to_lowercase()) {
        parent_dir
            .entries
            .insert(base.to_lowercase(), (base.to_string(), EntryKind::File));
    }
}

/// Read and decompress one archive entry, caching the result under the
/// per-file lock so the work happens at most once.
fn read_archive_file(
    inner: &dyn Fs,
    zip_path: &str,
    entry: &ZipFileEntry,
) -> Result<Arc<Vec<u8>>, FsError> {
    let mut contents = entry.contents.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(cached) = contents.as_ref() {
        return cached.clone();
    }

    let result = (|| -> Result<Arc<Vec<u8>>, FsError> {
        let file = inner.open_file(zip_path)?;

        // The local header's name/extra lengths can differ from the central
        // directory's copy, so the data offset comes from the local header
        let header = file.read(entry.local_header_offset, entry.local_header_offset + 30)?;
        if read_u32(&header, 0) != LOCAL_SIG {
            return Err(parse_error(zip_path, "bad local file header"));
        }
        let name_len = read_u16(&header, 26) as u64;
        let extra_len = read_u16(&header, 28) as u64;
        let data_start = entry.local_header_offset + 30 + name_len + extra_len;
        let compressed = file.read(data_start, data_start + entry.compressed_size)?;

        let bytes = match entry.method {
            METHOD_STORED => compressed,
            METHOD_DEFLATE => {
                let mut out = Vec::with_capacity(entry.uncompressed_size as usize);
                flate2::read::DeflateDecoder::new(compressed.as_slice())
                    .read_to_end(&mut out)
                    .map_err(|e| parse_error(zip_path, &format!("inflate failed: {e}")))?;
                out
            }
            other => {
                return Err(parse_error(
                    zip_path,
                    &format!("unsupported compression method {other}"),
                ));
            }
        };

        let mut crc = flate2::Crc::new();
        crc.update(&bytes);
        if crc.sum() != entry.crc32 {
            return Err(parse_error(zip_path, "crc32 mismatch"));
        }
        Ok(Arc::new(bytes))
    })();

    *contents = Some(result.clone());
    result
}

// =============================================================================
// Yarn PnP virtual paths
// =============================================================================

/// Resolve one `__virtual__` (or legacy `$$virtual`) marker in a path.
///
/// `…/__virtual__/<tag>/<N>/<suffix>` resolves by applying the `..`
/// operator N times starting at the marker directory itself, then
/// appending the suffix: `/x/y/__virtual__/tag/2/a/b` becomes `/x/a/b`.
pub fn parse_yarn_pnp_virtual_path(path: &str) -> Option<String> {
    let bytes = path.as_bytes();
    let is_sep = |b: u8| b == b'/' || b == b'\\';

    let mut seg_start = 0usize;
    let mut i = 0usize;
    while i <= bytes.len() {
        let at_end = i == bytes.len();
        if at_end || is_sep(bytes[i]) {
            let seg = &path[seg_start..i];
            if seg == "__virtual__" || seg == "$$virtual" {
                let marker_end = i;
                // Expect <tag>/<count>[/<suffix>] after the marker
                let rest = &path[marker_end..];
                let mut parts = rest
                    .split(|c| c == '/' || c == '\\')
                    .filter(|s| !s.is_empty());
                let _tag = parts.next()?;
                let count: u64 = parts.next()?.parse().ok()?;
                let suffix: Vec<&str> = parts.collect();

                // Apply ".." `count` times; the first application cancels
                // the marker directory itself
                let mut prefix = &path[..marker_end];
                for _ in 0..count {
                    let trimmed = prefix.trim_end_matches(|c| c == '/' || c == '\\');
                    match trimmed.rfind(|c| c == '/' || c == '\\') {
                        Some(j) => prefix = &path[..j],
                        None => {
                            prefix = "";
                            break;
                        }
                    }
                }

                let sep = if path.contains('\\') { '\\' } else { '/' };
                let mut out = String::from(prefix);
                for part in suffix {
                    if !out.is_empty() && !out.ends_with(sep) {
                        out.push(sep);
                    }
                    out.push_str(part);
                }
                if out.is_empty() {
                    out.push(sep);
                }
                return Some(out);
            }
            seg_start = i + 1;
        }
        i += 1;
    }
    None
}

/// Apply [`parse_yarn_pnp_virtual_path`] until no marker remains.
pub fn mangle_yarn_pnp_virtual_path(path: &str) -> String {
    let mut current = path.to_string();
    while let Some(next) = parse_yarn_pnp_virtual_path(&current) {
        if next == current {
            break;
        }
        current = next;
    }
    current
}

#[cfg(test)]
#[path = "tests/zip_tests.rs"]
mod tests;
