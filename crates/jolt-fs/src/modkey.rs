//! Modification keys for cheap change detection.
//!
//! A key fingerprints the stable stat attributes of a file. Equal usable
//! keys imply the file is unchanged; unequal or unusable keys force a
//! content comparison. A key is only usable once the file has been quiet
//! for a few seconds because FAT-class filesystems round mtimes to 2s and
//! a write can land inside the same rounded timestamp.

use std::time::{SystemTime, UNIX_EPOCH};

/// Files modified within this many seconds of "now" get unusable keys.
pub const MODKEY_SAFETY_GAP_SECS: i64 = 3;

/// A stable fingerprint of one file's metadata. Opaque to consumers; two
/// keys compare equal iff their tuples are identical.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModKey {
    pub inode: u64,
    pub size: u64,
    pub mtime_sec: i64,
    pub mtime_nsec: i64,
    pub mode: u32,
    pub uid: u32,
}

/// Why a modification key could not be produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModKeyError {
    /// The stat succeeded but the key must not be trusted (mtime zeroed by
    /// the platform, or the file was modified too recently).
    Unusable,
    /// The stat itself failed.
    Io(String),
}

impl std::fmt::Display for ModKeyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModKeyError::Unusable => f.write_str("modification key is unusable"),
            ModKeyError::Io(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ModKeyError {}

/// Build a key from file metadata, applying the usability rules.
pub fn mod_key_from_metadata(meta: &std::fs::Metadata) -> Result<ModKey, ModKeyError> {
    let key = platform_mod_key(meta);

    // Zero mtime means the platform does not report one
    if key.mtime_sec <= 0 {
        return Err(ModKeyError::Unusable);
    }

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0);
    if now - key.mtime_sec < MODKEY_SAFETY_GAP_SECS {
        return Err(ModKeyError::Unusable);
    }

    Ok(key)
}

#[cfg(unix)]
fn platform_mod_key(meta: &std::fs::Metadata) -> ModKey {
    use std::os::unix::fs::MetadataExt;
    ModKey {
        inode: meta.ino(),
        size: meta.size(),
        mtime_sec: meta.mtime(),
        mtime_nsec: meta.mtime_nsec(),
        mode: meta.mode(),
        uid: meta.uid(),
    }
}

#[cfg(not(unix))]
fn platform_mod_key(meta: &std::fs::Metadata) -> ModKey {
    let mtime = meta
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok());
    ModKey {
        inode: 0,
        size: meta.len(),
        mtime_sec: mtime.map(|d| d.as_secs() as i64).unwrap_or(0),
        mtime_nsec: mtime.map(|d| d.subsec_nanos() as i64).unwrap_or(0),
        mode: 0,
        uid: 0,
    }
}
