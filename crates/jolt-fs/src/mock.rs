//! In-memory filesystem for tests.
//!
//! Takes a mapping from absolute path to file contents plus a dialect flag,
//! so resolver and overlay behavior can be exercised under both POSIX and
//! Windows path conventions without touching the disk.

use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::entries::{DirEntries, Entry, EntryKind};
use crate::modkey::{ModKey, ModKeyError};
use crate::{Dialect, Fs, FsError, OpenedFile, WatchData, path};

/// In-memory implementation of [`Fs`].
pub struct MockFs {
    dialect: Dialect,
    cwd: String,
    files: FxHashMap<String, String>,
    dirs: FxHashMap<String, Arc<DirEntries>>,
}

impl MockFs {
    /// Build a mock filesystem from `(path, contents)` pairs.
    ///
    /// Parent directories are synthesized for every file.
    pub fn new(input: &[(&str, &str)], dialect: Dialect, cwd: &str) -> MockFs {
        let mut files = FxHashMap::default();
        // dir -> lowercased base -> (original base, kind)
        let mut tree: FxHashMap<String, FxHashMap<String, (String, EntryKind)>> =
            FxHashMap::default();

        for (p, contents) in input {
            let clean = path::clean(dialect, p);
            files.insert(clean.clone(), contents.to_string());

            // Walk up, adding this file and each ancestor directory to its
            // parent's listing
            let mut child = clean;
            let mut kind = EntryKind::File;
            loop {
                let parent = path::dir(dialect, &child);
                if parent == child {
                    break;
                }
                let base = path::base(dialect, &child);
                tree.entry(parent.clone())
                    .or_default()
                    .entry(base.to_lowercase())
                    .or_insert_with(|| (base, kind));
                child = parent;
                kind = EntryKind::Dir;
            }
        }

        let mut dirs = FxHashMap::default();
        for (dir, listing) in tree {
            let mut data = FxHashMap::default();
            for (key, (base, kind)) in listing {
                data.insert(
                    key,
                    Arc::new(Entry::with_kind(dir.clone(), base, kind)),
                );
            }
            dirs.insert(dir.clone(), Arc::new(DirEntries::new(dir, data)));
        }

        MockFs {
            dialect,
            cwd: cwd.to_string(),
            files,
            dirs,
        }
    }
}

impl Fs for MockFs {
    fn read_directory(&self, dir: &str) -> Result<Arc<DirEntries>, FsError> {
        let clean = path::clean(self.dialect, dir);
        match self.dirs.get(&clean) {
            Some(entries) => Ok(Arc::clone(entries)),
            None => Err(FsError::does_not_exist(dir)),
        }
    }

    fn read_file(&self, p: &str) -> Result<String, FsError> {
        let clean = path::clean(self.dialect, p);
        match self.files.get(&clean) {
            Some(contents) => Ok(contents.clone()),
            None => Err(FsError::does_not_exist(p)),
        }
    }

    fn open_file(&self, p: &str) -> Result<Box<dyn OpenedFile>, FsError> {
        let contents = self.read_file(p)?;
        Ok(Box::new(MockOpenedFile {
            bytes: contents.into_bytes(),
        }))
    }

    fn mod_key(&self, _path: &str) -> Result<ModKey, ModKeyError> {
        // Mock files have no underlying stat; force content comparisons
        Err(ModKeyError::Unusable)
    }

    fn kind(&self, dir: &str, base: &str) -> (Option<String>, Option<EntryKind>) {
        let clean = path::clean(self.dialect, dir);
        let kind = self
            .dirs
            .get(&clean)
            .and_then(|entries| entries.get(base).0)
            .and_then(|entry| {
                // Kind was preset at construction; no stat needed
                entry.kind(self)
            });
        (None, kind)
    }

    fn eval_symlinks(&self, _path: &str) -> Option<String> {
        None
    }

    fn watch_data(&self) -> WatchData {
        WatchData {
            paths: FxHashMap::default(),
        }
    }

    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn cwd(&self) -> &str {
        &self.cwd
    }
}

struct MockOpenedFile {
    bytes: Vec<u8>,
}

impl OpenedFile for MockOpenedFile {
    fn len(&self) -> Result<u64, FsError> {
        Ok(self.bytes.len() as u64)
    }

    fn read(&self, start: u64, end: u64) -> Result<Vec<u8>, FsError> {
        let start = start as usize;
        let end = (end as usize).min(self.bytes.len());
        if start > end {
            return Err(FsError::new(
                crate::CanonicalError::Other,
                "read range out of bounds",
            ));
        }
        Ok(self.bytes[start..end].to_vec())
    }
}
