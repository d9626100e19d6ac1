//! Uniform read-only filesystem for the jolt bundler.
//!
//! This crate provides:
//! - `path` - Pure lexical path algebra portable across POSIX and Windows
//! - `Fs` - The filesystem contract the resolver and loaders read through
//! - `RealFs` - OS-backed implementation with caching and watch data
//! - `MockFs` - In-memory implementation for tests
//! - `ZipFs` - Overlay that reads through `.zip` archives (Yarn PnP)
//!
//! Errors carry both the original OS error and a canonicalized variant so
//! the resolver can key on the canonical one: Windows reports `ENOTDIR`
//! (and `ERROR_INVALID_NAME`) in places where traversal should simply
//! continue as if the file did not exist.

pub mod path;
pub use path::{Dialect, RelError};

mod entries;
pub use entries::{AccessedEntries, DirEntries, Entry, EntryKind};

mod modkey;
pub use modkey::{MODKEY_SAFETY_GAP_SECS, ModKey, ModKeyError};

mod real;
pub use real::{RealFs, RealFsOptions, WatchMode};

mod mock;
pub use mock::MockFs;

mod zip;
pub use zip::{ZipFs, mangle_yarn_pnp_virtual_path, parse_yarn_pnp_virtual_path};

use rustc_hash::FxHashMap;
use std::sync::Arc;

/// The canonicalized form of an I/O error.
///
/// Resolvers branch on this instead of the raw OS error so that the same
/// logic works on every platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CanonicalError {
    /// `ENOENT`, and also Windows `ENOTDIR`/`ERROR_INVALID_NAME`, which
    /// Windows produces even for paths that simply do not exist.
    DoesNotExist,
    /// `ENOTDIR` on POSIX (reading a file as a directory).
    NotDirectory,
    /// `EISDIR` (reading a directory as a file).
    IsDirectory,
    /// `EACCES` and friends.
    AccessDenied,
    /// Anything else.
    Other,
}

/// An I/O failure carrying both the canonical classification and the
/// original error text for diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FsError {
    pub canonical: CanonicalError,
    pub original: String,
}

impl FsError {
    pub fn new(canonical: CanonicalError, original: impl Into<String>) -> FsError {
        FsError {
            canonical,
            original: original.into(),
        }
    }

    /// Shorthand for a missing file or directory.
    pub fn does_not_exist(path: &str) -> FsError {
        FsError {
            canonical: CanonicalError::DoesNotExist,
            original: format!("no such file or directory: {path}"),
        }
    }

    #[inline]
    pub fn is_does_not_exist(&self) -> bool {
        self.canonical == CanonicalError::DoesNotExist
    }
}

impl std::fmt::Display for FsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.original)
    }
}

impl std::error::Error for FsError {}

/// Classify an `std::io::Error`, preserving its message.
///
/// On Windows, `NotADirectory` and invalid-name errors canonicalize to
/// [`CanonicalError::DoesNotExist`] so resolver traversal continues.
pub fn canonicalize_io_error(dialect: Dialect, err: &std::io::Error) -> FsError {
    use std::io::ErrorKind;
    let canonical = match err.kind() {
        ErrorKind::NotFound => CanonicalError::DoesNotExist,
        ErrorKind::NotADirectory => {
            if dialect.is_windows {
                CanonicalError::DoesNotExist
            } else {
                CanonicalError::NotDirectory
            }
        }
        ErrorKind::IsADirectory => CanonicalError::IsDirectory,
        ErrorKind::PermissionDenied => CanonicalError::AccessDenied,
        ErrorKind::InvalidInput if dialect.is_windows => CanonicalError::DoesNotExist,
        _ => CanonicalError::Other,
    };
    FsError::new(canonical, err.to_string())
}

/// An open file handle supporting random-access reads.
pub trait OpenedFile: Send {
    /// Total length in bytes.
    fn len(&self) -> Result<u64, FsError>;

    /// Read the byte range `[start, end)`.
    fn read(&self, start: u64, end: u64) -> Result<Vec<u8>, FsError>;
}

/// A watch-mode probe. Returns the changed path when the observation made
/// during the previous build would now differ, `None` otherwise.
pub type WatchProbe = Box<dyn Fn() -> Option<String> + Send + Sync>;

/// Everything watch mode needs to decide whether to rebuild.
pub struct WatchData {
    /// One probe per path that was accessed during the build.
    pub paths: FxHashMap<String, WatchProbe>,
}

/// The filesystem contract.
///
/// All methods take paths as strings in the dialect of the implementation.
/// Read results are cached; re-reading a path that previously failed
/// returns the cached failure without retrying.
pub trait Fs: Send + Sync {
    /// List a directory. The same `Arc` is returned for repeated reads.
    fn read_directory(&self, dir: &str) -> Result<Arc<DirEntries>, FsError>;

    /// Read an entire file as (lossily decoded) UTF-8 text.
    fn read_file(&self, path: &str) -> Result<String, FsError>;

    /// Open a file for random-access binary reads.
    fn open_file(&self, path: &str) -> Result<Box<dyn OpenedFile>, FsError>;

    /// Compute the modification key for change detection.
    fn mod_key(&self, path: &str) -> Result<ModKey, ModKeyError>;

    /// Stat one directory entry: `(symlink target, kind)`.
    /// Used by the lazy per-entry stat in [`DirEntries`].
    fn kind(&self, dir: &str, base: &str) -> (Option<String>, Option<EntryKind>);

    /// Resolve symlinks lexically where possible. `None` when resolution
    /// fails or is unsupported.
    fn eval_symlinks(&self, path: &str) -> Option<String>;

    /// Snapshot the watch probes for everything accessed so far.
    fn watch_data(&self) -> WatchData;

    /// The path dialect of this filesystem.
    fn dialect(&self) -> Dialect;

    /// The absolute working directory.
    fn cwd(&self) -> &str;

    // Path algebra, delegating to the `path` module with this filesystem's
    // dialect.

    fn is_abs(&self, p: &str) -> bool {
        path::is_abs(self.dialect(), p)
    }

    /// Make a path absolute against the working directory.
    fn abs(&self, p: &str) -> Option<String> {
        if self.is_abs(p) {
            Some(path::clean(self.dialect(), p))
        } else {
            Some(path::join(self.dialect(), &[self.cwd(), p]))
        }
    }

    fn dir(&self, p: &str) -> String {
        path::dir(self.dialect(), p)
    }

    fn base(&self, p: &str) -> String {
        path::base(self.dialect(), p)
    }

    fn ext(&self, p: &str) -> String {
        path::ext(self.dialect(), p)
    }

    fn join(&self, parts: &[&str]) -> String {
        path::join(self.dialect(), parts)
    }

    fn rel(&self, base: &str, target: &str) -> Result<String, RelError> {
        path::rel(self.dialect(), base, target)
    }
}
