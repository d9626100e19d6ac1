//! Directory listings with lazily stat-ed entries.
//!
//! A listing maps lowercased base names to entries so lookups are
//! case-insensitive; each entry remembers its original casing and reports
//! it when a query matched with different case, which resolvers surface as
//! a diagnostic. The `kind` of an entry is computed by one `stat` on first
//! query, under a per-entry lock, and cached.

use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex};

use crate::Fs;

/// What a directory entry is, once stat-ed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
}

#[derive(Debug)]
struct EntryInfo {
    need_stat: bool,
    symlink: Option<String>,
    kind: Option<EntryKind>,
}

/// One directory entry. Cheap to create; the stat happens on first access.
#[derive(Debug)]
pub struct Entry {
    dir: String,
    base: String,
    info: Mutex<EntryInfo>,
}

impl Entry {
    pub fn new(dir: String, base: String) -> Entry {
        Entry {
            dir,
            base,
            info: Mutex::new(EntryInfo {
                need_stat: true,
                symlink: None,
                kind: None,
            }),
        }
    }

    /// Create an entry whose kind is already known (zip overlay, mock FS).
    pub fn with_kind(dir: String, base: String, kind: EntryKind) -> Entry {
        Entry {
            dir,
            base,
            info: Mutex::new(EntryInfo {
                need_stat: false,
                symlink: None,
                kind: Some(kind),
            }),
        }
    }

    /// The original-case base name.
    #[inline]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// The directory containing this entry.
    #[inline]
    pub fn dir(&self) -> &str {
        &self.dir
    }

    /// The kind of the entry, stat-ing on first call.
    pub fn kind(&self, fs: &dyn Fs) -> Option<EntryKind> {
        let mut info = self.info.lock().unwrap_or_else(|e| e.into_inner());
        if info.need_stat {
            info.need_stat = false;
            let (symlink, kind) = fs.kind(&self.dir, &self.base);
            info.symlink = symlink;
            info.kind = kind;
        }
        info.kind
    }

    /// The symlink target, if the entry is a symlink. Stats on first call.
    pub fn symlink(&self, fs: &dyn Fs) -> Option<String> {
        let mut info = self.info.lock().unwrap_or_else(|e| e.into_inner());
        if info.need_stat {
            info.need_stat = false;
            let (symlink, kind) = fs.kind(&self.dir, &self.base);
            info.symlink = symlink;
            info.kind = kind;
        }
        info.symlink.clone()
    }
}

/// Observations watch mode records about one directory listing.
///
/// Two modes: individual present/absent observations per queried name, or
/// the exact sorted listing once all keys were observed. A rebuild fires
/// iff an observation made during the previous build would now differ.
#[derive(Default, Debug)]
pub struct AccessedEntries {
    /// Name (lowercased) -> whether it was present when queried.
    pub was_present: FxHashMap<String, bool>,
    /// Set when the full sorted key set was observed.
    pub all_entries: Option<Vec<String>>,
}

/// A directory listing.
#[derive(Debug)]
pub struct DirEntries {
    dir: String,
    data: FxHashMap<String, Arc<Entry>>,
    accessed: Option<Arc<Mutex<AccessedEntries>>>,
}

impl DirEntries {
    pub fn new(dir: String, data: FxHashMap<String, Arc<Entry>>) -> DirEntries {
        DirEntries {
            dir,
            data,
            accessed: None,
        }
    }

    pub fn empty(dir: String) -> DirEntries {
        DirEntries::new(dir, FxHashMap::default())
    }

    /// The directory this listing describes.
    pub fn dir(&self) -> &str {
        &self.dir
    }

    /// Attach an access recorder; used by watch mode.
    pub fn set_accessed_entries(&mut self, accessed: Arc<Mutex<AccessedEntries>>) {
        self.accessed = Some(accessed);
    }

    /// Look up an entry case-insensitively.
    ///
    /// The second element reports the entry's actual casing when the query
    /// matched with different case, so callers can warn about imports that
    /// work locally but break on case-sensitive filesystems.
    pub fn get(&self, query: &str) -> (Option<Arc<Entry>>, Option<String>) {
        let key = query.to_lowercase();
        let entry = self.data.get(&key).cloned();

        if let Some(accessed) = &self.accessed {
            let mut accessed = accessed.lock().unwrap_or_else(|e| e.into_inner());
            accessed.was_present.insert(key, entry.is_some());
        }

        match entry {
            Some(e) if e.base() != query => {
                let case = e.base().to_string();
                (Some(e), Some(case))
            }
            other => (other, None),
        }
    }

    /// All original-case base names, sorted.
    ///
    /// Calling this counts as observing the complete key set: watch mode
    /// switches from per-name checks to a full listing comparison.
    pub fn sorted_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.data.values().map(|e| e.base().to_string()).collect();
        keys.sort();

        if let Some(accessed) = &self.accessed {
            let mut accessed = accessed.lock().unwrap_or_else(|e| e.into_inner());
            accessed.all_entries = Some(keys.clone());
        }
        keys
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
