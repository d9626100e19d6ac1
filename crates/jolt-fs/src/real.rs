//! The OS-backed filesystem.
//!
//! Directory listings are cached for the lifetime of a build: a cache miss
//! performs the `read_dir` outside the cache mutex, then re-acquires it to
//! install the result. A failed read is cached too, so re-resolving through
//! a missing directory does not retry the syscall. A global semaphore
//! bounds concurrent open file handles.
//!
//! With watch mode on, every read records enough state to later decide
//! whether the observation would differ today: directory listings record
//! either per-name presence or the full sorted key set, and files record
//! one of missing / has-mod-key / unusable-mod-key / needs-mod-key.

use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

use jolt_common::sync::{self, FILE_HANDLE_LIMIT, Semaphore};

use crate::entries::{AccessedEntries, DirEntries, Entry, EntryKind};
use crate::modkey::{ModKey, ModKeyError, mod_key_from_metadata};
use crate::{Dialect, Fs, FsError, OpenedFile, WatchData, canonicalize_io_error};

/// Whether to record watch data during reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchMode {
    Off,
    On,
}

/// Construction options for [`RealFs`].
#[derive(Clone, Debug)]
pub struct RealFsOptions {
    pub watch: WatchMode,
    /// Disable the directory-entry cache. Used by long-lived serve
    /// processes where directories change between builds.
    pub do_not_cache_entries: bool,
}

impl Default for RealFsOptions {
    fn default() -> Self {
        RealFsOptions {
            watch: WatchMode::Off,
            do_not_cache_entries: false,
        }
    }
}

enum WatchEntryState {
    DirHasAccessedEntries(Arc<Mutex<AccessedEntries>>),
    DirMissing,
    FileNeedModKey { contents: String },
    FileHasModKey { key: ModKey },
    FileUnusableModKey { contents: String },
    FileMissing,
}

/// OS-backed implementation of [`Fs`].
pub struct RealFs {
    dialect: Dialect,
    cwd: String,
    options: RealFsOptions,
    entries: Mutex<FxHashMap<String, Result<Arc<DirEntries>, FsError>>>,
    file_semaphore: Arc<Semaphore>,
    watch: Mutex<FxHashMap<String, WatchEntryState>>,
}

impl RealFs {
    /// Create a filesystem rooted at the process working directory.
    pub fn new(options: RealFsOptions) -> std::io::Result<RealFs> {
        let cwd = std::env::current_dir()?
            .to_string_lossy()
            .into_owned();
        Ok(RealFs::with_cwd(options, cwd))
    }

    /// Create a filesystem with an explicit working directory.
    pub fn with_cwd(options: RealFsOptions, cwd: String) -> RealFs {
        let dialect = if cfg!(windows) {
            Dialect::WINDOWS
        } else {
            Dialect::UNIX
        };
        RealFs {
            dialect,
            cwd,
            options,
            entries: Mutex::new(FxHashMap::default()),
            file_semaphore: Arc::new(Semaphore::new(FILE_HANDLE_LIMIT)),
            watch: Mutex::new(FxHashMap::default()),
        }
    }

    fn watching(&self) -> bool {
        self.options.watch == WatchMode::On
    }

    fn read_dir_names(&self, dir: &str) -> Result<Vec<String>, FsError> {
        let _permit = self.file_semaphore.acquire();
        let iter = std::fs::read_dir(dir).map_err(|e| canonicalize_io_error(self.dialect, &e))?;
        let mut names = Vec::new();
        for item in iter {
            let item = item.map_err(|e| canonicalize_io_error(self.dialect, &e))?;
            names.push(item.file_name().to_string_lossy().into_owned());
        }
        // A directory read of a file is ENOTDIR on POSIX; Windows reports it
        // as missing, which `canonicalize_io_error` already handles.
        Ok(names)
    }

    fn build_entries(&self, dir: &str, names: Vec<String>) -> DirEntries {
        let mut data = FxHashMap::default();
        for name in names {
            data.insert(
                name.to_lowercase(),
                Arc::new(Entry::new(dir.to_string(), name)),
            );
        }
        DirEntries::new(dir.to_string(), data)
    }
}

impl Fs for RealFs {
    fn read_directory(&self, dir: &str) -> Result<Arc<DirEntries>, FsError> {
        if !self.options.do_not_cache_entries {
            let cache = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(cached) = cache.get(dir) {
                return cached.clone();
            }
        }

        // I/O happens outside the cache mutex
        let names = self.read_dir_names(dir);
        let result = match names {
            Ok(names) => {
                let mut entries = self.build_entries(dir, names);
                if self.watching() {
                    let accessed = Arc::new(Mutex::new(AccessedEntries::default()));
                    entries.set_accessed_entries(Arc::clone(&accessed));
                    let mut watch = self.watch.lock().unwrap_or_else(|e| e.into_inner());
                    watch.insert(
                        dir.to_string(),
                        WatchEntryState::DirHasAccessedEntries(accessed),
                    );
                }
                Ok(Arc::new(entries))
            }
            Err(err) => {
                debug!(dir, error = %err, "read_directory failed");
                if self.watching() {
                    let mut watch = self.watch.lock().unwrap_or_else(|e| e.into_inner());
                    watch.insert(dir.to_string(), WatchEntryState::DirMissing);
                }
                Err(err)
            }
        };

        if !self.options.do_not_cache_entries {
            let mut cache = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            // Another worker may have installed a result while we were doing
            // I/O; keep the first one so every reader shares the same Arc.
            return cache.entry(dir.to_string()).or_insert(result).clone();
        }
        result
    }

    fn read_file(&self, path: &str) -> Result<String, FsError> {
        let _permit = self.file_semaphore.acquire();
        let result = std::fs::read(path)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .map_err(|e| canonicalize_io_error(self.dialect, &e));

        if self.watching() {
            let mut watch = self.watch.lock().unwrap_or_else(|e| e.into_inner());
            match &result {
                Ok(contents) => {
                    // Keep an existing mod-key state if one was already
                    // established for this path
                    let state = watch.remove(path);
                    let next = match state {
                        Some(s @ WatchEntryState::FileHasModKey { .. }) => s,
                        Some(s @ WatchEntryState::FileUnusableModKey { .. }) => s,
                        _ => WatchEntryState::FileNeedModKey {
                            contents: contents.clone(),
                        },
                    };
                    watch.insert(path.to_string(), next);
                }
                Err(_) => {
                    watch.insert(path.to_string(), WatchEntryState::FileMissing);
                }
            }
        }
        result
    }

    fn open_file(&self, path: &str) -> Result<Box<dyn OpenedFile>, FsError> {
        let permit = sync::acquire_owned(&self.file_semaphore);
        let file =
            std::fs::File::open(path).map_err(|e| canonicalize_io_error(self.dialect, &e))?;
        Ok(Box::new(RealOpenedFile {
            file,
            dialect: self.dialect,
            _permit: permit,
        }))
    }

    fn mod_key(&self, path: &str) -> Result<ModKey, ModKeyError> {
        let result = {
            let _permit = self.file_semaphore.acquire();
            std::fs::metadata(path)
                .map_err(|e| ModKeyError::Io(e.to_string()))
                .and_then(|meta| mod_key_from_metadata(&meta))
        };

        if self.watching() {
            let mut watch = self.watch.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(WatchEntryState::FileNeedModKey { contents }) = watch.remove(path) {
                // First key query for this file decides the tracking mode
                let next = match &result {
                    Ok(key) => WatchEntryState::FileHasModKey { key: *key },
                    Err(_) => WatchEntryState::FileUnusableModKey { contents },
                };
                watch.insert(path.to_string(), next);
            }
        }
        result
    }

    fn kind(&self, dir: &str, base: &str) -> (Option<String>, Option<EntryKind>) {
        let entry_path = self.join(&[dir, base]);
        let _permit = self.file_semaphore.acquire();

        let Ok(meta) = std::fs::symlink_metadata(&entry_path) else {
            return (None, None);
        };
        let mut file_type = meta.file_type();
        let mut symlink = None;

        if file_type.is_symlink() {
            let Some(link) = self.eval_symlinks(&entry_path) else {
                return (None, None);
            };
            let Ok(target_meta) = std::fs::metadata(&link) else {
                return (Some(link), None);
            };
            file_type = target_meta.file_type();
            symlink = Some(link);
        }

        let kind = if file_type.is_dir() {
            Some(EntryKind::Dir)
        } else if file_type.is_file() {
            Some(EntryKind::File)
        } else {
            None
        };
        (symlink, kind)
    }

    fn eval_symlinks(&self, path: &str) -> Option<String> {
        std::fs::canonicalize(path)
            .ok()
            .map(|p| p.to_string_lossy().into_owned())
    }

    fn watch_data(&self) -> WatchData {
        let watch = self.watch.lock().unwrap_or_else(|e| e.into_inner());
        let mut paths: FxHashMap<String, crate::WatchProbe> = FxHashMap::default();

        for (path, state) in watch.iter() {
            let path = path.clone();
            let dialect = self.dialect;
            let probe: crate::WatchProbe = match state {
                WatchEntryState::DirMissing => {
                    let p = path.clone();
                    Box::new(move || {
                        // The directory was missing; it changing means it
                        // can now be read
                        if std::fs::read_dir(&p).is_ok() {
                            Some(p.clone())
                        } else {
                            None
                        }
                    })
                }
                WatchEntryState::DirHasAccessedEntries(accessed) => {
                    let p = path.clone();
                    let snapshot = {
                        let accessed = accessed.lock().unwrap_or_else(|e| e.into_inner());
                        (
                            accessed.all_entries.clone(),
                            accessed
                                .was_present
                                .iter()
                                .map(|(k, v)| (k.clone(), *v))
                                .collect::<Vec<_>>(),
                        )
                    };
                    Box::new(move || {
                        let Ok(iter) = std::fs::read_dir(&p) else {
                            return Some(p.clone());
                        };
                        let mut names: Vec<String> = iter
                            .filter_map(|e| e.ok())
                            .map(|e| e.file_name().to_string_lossy().into_owned())
                            .collect();
                        let (all_entries, was_present) = &snapshot;
                        if let Some(all) = all_entries {
                            // The whole listing was observed; compare it
                            names.sort();
                            if names != *all {
                                return Some(p.clone());
                            }
                        } else {
                            // Only individual names were observed; check for
                            // present/absent flips
                            let lower: Vec<String> =
                                names.iter().map(|n| n.to_lowercase()).collect();
                            for (name, was) in was_present {
                                let is = lower.iter().any(|n| n == name);
                                if is != *was {
                                    return Some(crate::path::join(dialect, &[&p, name]));
                                }
                            }
                        }
                        None
                    })
                }
                WatchEntryState::FileMissing => {
                    let p = path.clone();
                    Box::new(move || {
                        if std::fs::metadata(&p).is_ok() {
                            Some(p.clone())
                        } else {
                            None
                        }
                    })
                }
                WatchEntryState::FileHasModKey { key } => {
                    let p = path.clone();
                    let key = *key;
                    Box::new(move || {
                        match std::fs::metadata(&p)
                            .map_err(|e| ModKeyError::Io(e.to_string()))
                            .and_then(|m| mod_key_from_metadata(&m))
                        {
                            Ok(now) if now == key => None,
                            _ => Some(p.clone()),
                        }
                    })
                }
                WatchEntryState::FileNeedModKey { contents }
                | WatchEntryState::FileUnusableModKey { contents } => {
                    let p = path.clone();
                    let contents = contents.clone();
                    Box::new(move || {
                        match std::fs::read(&p) {
                            Ok(bytes) if String::from_utf8_lossy(&bytes) == contents => None,
                            _ => Some(p.clone()),
                        }
                    })
                }
            };
            paths.insert(path, probe);
        }
        WatchData { paths }
    }

    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn cwd(&self) -> &str {
        &self.cwd
    }
}

struct RealOpenedFile {
    file: std::fs::File,
    dialect: Dialect,
    _permit: sync::OwnedSemaphorePermit,
}

impl OpenedFile for RealOpenedFile {
    fn len(&self) -> Result<u64, FsError> {
        self.file
            .metadata()
            .map(|m| m.len())
            .map_err(|e| canonicalize_io_error(self.dialect, &e))
    }

    fn read(&self, start: u64, end: u64) -> Result<Vec<u8>, FsError> {
        use std::io::{Read, Seek, SeekFrom};
        let mut file = &self.file;
        file.seek(SeekFrom::Start(start))
            .map_err(|e| canonicalize_io_error(self.dialect, &e))?;
        let mut buf = vec![0u8; (end - start) as usize];
        file.read_exact(&mut buf)
            .map_err(|e| canonicalize_io_error(self.dialect, &e))?;
        Ok(buf)
    }
}

#[cfg(test)]
#[path = "tests/real_tests.rs"]
mod tests;
