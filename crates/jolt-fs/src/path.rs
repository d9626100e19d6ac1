//! Pure lexical path algebra.
//!
//! These functions never touch the disk. They are parameterized by a
//! [`Dialect`] so both POSIX and Windows conventions can be exercised on any
//! host, which is how the mock filesystem simulates Windows path handling in
//! tests.
//!
//! The cleaning rules are the classic Plan 9 ones: collapse separators,
//! eliminate `.`, cancel inner `..`, strip `..` that would climb above a
//! rooted path, reduce the empty result to `.`.

/// Path convention configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dialect {
    /// Recognize drive letters, UNC prefixes, `\` separators, and reserved
    /// device names.
    pub is_windows: bool,
    /// The separator used in produced paths.
    pub separator: char,
}

impl Dialect {
    pub const UNIX: Dialect = Dialect {
        is_windows: false,
        separator: '/',
    };
    pub const WINDOWS: Dialect = Dialect {
        is_windows: true,
        separator: '\\',
    };

    /// Is this byte a separator in this dialect? Windows accepts both.
    #[inline]
    pub fn is_separator(&self, b: u8) -> bool {
        b == b'/' || (self.is_windows && b == b'\\')
    }

    /// Case-insensitive comparison on Windows, exact elsewhere.
    #[inline]
    pub fn same_word(&self, a: &str, b: &str) -> bool {
        if self.is_windows {
            a.eq_ignore_ascii_case(b)
        } else {
            a == b
        }
    }
}

/// Device names that Windows resolves regardless of directory.
const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

fn is_reserved_name(path: &str) -> bool {
    RESERVED_NAMES
        .iter()
        .any(|r| path.eq_ignore_ascii_case(r))
}

/// Length of the leading volume name.
///
/// Returns 0 on POSIX. On Windows returns 2 for `C:` and the length of the
/// `\\server\share` prefix for UNC paths.
pub fn volume_name_len(d: Dialect, path: &str) -> usize {
    if !d.is_windows {
        return 0;
    }
    let b = path.as_bytes();
    if b.len() >= 2 && b[1] == b':' && b[0].is_ascii_alphabetic() {
        return 2;
    }
    // UNC: \\server\share
    let l = b.len();
    if l >= 5 && d.is_separator(b[0]) && d.is_separator(b[1]) && !d.is_separator(b[2]) && b[2] != b'.'
    {
        let mut n = 3;
        while n < l - 1 {
            if d.is_separator(b[n]) {
                n += 1;
                if !d.is_separator(b[n]) {
                    if b[n] == b'.' {
                        break;
                    }
                    while n < l {
                        if d.is_separator(b[n]) {
                            break;
                        }
                        n += 1;
                    }
                    return n;
                }
                break;
            }
            n += 1;
        }
    }
    0
}

/// Is this path absolute?
pub fn is_abs(d: Dialect, path: &str) -> bool {
    if d.is_windows {
        if is_reserved_name(path) {
            return true;
        }
        let l = volume_name_len(d, path);
        if l == 0 {
            return false;
        }
        let rest = &path.as_bytes()[l..];
        !rest.is_empty() && d.is_separator(rest[0])
    } else {
        path.starts_with('/')
    }
}

/// Convert `/` to the dialect separator in a cleaned path.
fn from_slash(d: Dialect, path: String) -> String {
    if d.separator == '/' {
        path
    } else {
        path.replace('/', &d.separator.to_string())
    }
}

/// Apply the Plan 9 cleaning rules.
///
/// The result never ends in a separator unless it is the root, and is `.`
/// when the input reduces to nothing. `clean` is idempotent.
pub fn clean(d: Dialect, path: &str) -> String {
    let original = path;
    let vol_len = volume_name_len(d, path);
    let path = &path.as_bytes()[vol_len..];
    let vol = &original[..vol_len];

    if path.is_empty() {
        if vol_len > 1 && original.as_bytes()[1] != b':' {
            // UNC volume with nothing after it
            return from_slash(d, original.to_string());
        }
        return format!("{original}.");
    }

    let rooted = d.is_separator(path[0]);
    let n = path.len();
    let mut out: Vec<u8> = Vec::with_capacity(n + vol_len);
    let mut r = 0usize;
    let mut dotdot = 0usize;

    if rooted {
        out.push(d.separator as u8);
        r = 1;
        dotdot = 1;
    }

    while r < n {
        if d.is_separator(path[r]) {
            r += 1;
        } else if path[r] == b'.' && (r + 1 == n || d.is_separator(path[r + 1])) {
            // "." element
            r += 1;
        } else if path[r] == b'.'
            && path[r + 1] == b'.'
            && (r + 2 == n || d.is_separator(path[r + 2]))
        {
            // ".." element
            r += 2;
            if out.len() > dotdot {
                // Cancel the previous element along with its separator
                let mut w = out.len() - 1;
                while w > dotdot && !d.is_separator(out[w]) {
                    w -= 1;
                }
                out.truncate(w);
            } else if !rooted {
                // Cannot back up; keep the ".."
                if !out.is_empty() {
                    out.push(d.separator as u8);
                }
                out.extend_from_slice(b"..");
                dotdot = out.len();
            }
        } else {
            // Real element; add a separator if needed
            if (rooted && out.len() != 1) || (!rooted && !out.is_empty()) {
                out.push(d.separator as u8);
            }
            while r < n && !d.is_separator(path[r]) {
                out.push(path[r]);
                r += 1;
            }
        }
    }

    if out.is_empty() {
        out.push(b'.');
    }

    let cleaned = String::from_utf8(out).unwrap_or_default();
    from_slash(d, format!("{vol}{cleaned}"))
}

fn is_unc(d: Dialect, path: &str) -> bool {
    volume_name_len(d, path) > 2
}

/// Join path elements and clean the result.
///
/// On Windows, a join of non-UNC components must not fabricate a UNC path:
/// `join(["\\", "a", "b"])` is `\a\b`, never `\\a\b`.
pub fn join(d: Dialect, parts: &[&str]) -> String {
    let Some(first_idx) = parts.iter().position(|p| !p.is_empty()) else {
        return String::new();
    };
    let parts = &parts[first_idx..];

    if d.is_windows {
        return join_non_empty_windows(d, parts);
    }
    clean(d, &parts.join("/"))
}

fn join_non_empty_windows(d: Dialect, parts: &[&str]) -> String {
    let first = parts[0];
    let sep = d.separator.to_string();

    if first.len() == 2 && first.as_bytes()[1] == b':' {
        // First element is a drive letter without a trailing separator.
        // Keep the path drive-relative rather than inserting a separator.
        let rest: Vec<&str> = parts[1..].iter().copied().filter(|p| !p.is_empty()).collect();
        return clean(d, &format!("{}{}", first, rest.join(&sep)));
    }

    let joined = clean(d, &parts.join(&sep));
    if !is_unc(d, &joined) {
        return joined;
    }
    // The join created a UNC path; only allow that when the head was one.
    let head = clean(d, first);
    if is_unc(d, &head) {
        return joined;
    }
    let tail = clean(d, &parts[1..].join(&sep));
    if head.as_bytes().last().is_some_and(|&b| d.is_separator(b)) {
        format!("{head}{tail}")
    } else {
        format!("{head}{sep}{tail}")
    }
}

/// The directory portion of a path: everything but the last element.
pub fn dir(d: Dialect, path: &str) -> String {
    let vol_len = volume_name_len(d, path);
    let vol = &path[..vol_len];
    let b = path.as_bytes();
    let mut i = b.len();
    while i > vol_len && !d.is_separator(b[i - 1]) {
        i -= 1;
    }
    let cleaned = clean(d, &path[vol_len..i]);
    if cleaned == "." && vol_len > 2 {
        return vol.to_string();
    }
    format!("{vol}{cleaned}")
}

/// The last element of a path. Trailing separators are removed first.
/// An empty path yields `.`; an all-separator path yields the separator.
pub fn base(d: Dialect, path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }
    let mut path = &path[volume_name_len(d, path)..];
    // Strip trailing separators
    while let Some(&last) = path.as_bytes().last() {
        if d.is_separator(last) && path.len() > 0 {
            path = &path[..path.len() - 1];
        } else {
            break;
        }
    }
    if path.is_empty() {
        return d.separator.to_string();
    }
    // Find the last separator
    let b = path.as_bytes();
    let mut i = b.len();
    while i > 0 && !d.is_separator(b[i - 1]) {
        i -= 1;
    }
    path[i..].to_string()
}

/// The extension of the last element, including the dot. Empty when the
/// last element has no dot.
pub fn ext(d: Dialect, path: &str) -> String {
    let b = path.as_bytes();
    let mut i = b.len();
    while i > 0 && !d.is_separator(b[i - 1]) {
        i -= 1;
        if b[i] == b'.' {
            return path[i..].to_string();
        }
    }
    String::new()
}

/// Why [`rel`] could not produce a relative path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelError {
    pub base: String,
    pub target: String,
}

impl std::fmt::Display for RelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cannot make {:?} relative to {:?}",
            self.target, self.base
        )
    }
}

impl std::error::Error for RelError {}

/// Compute a relative path from `base` to `target`.
///
/// Fails when the result would require knowledge of the current working
/// directory: differing absolute/relative polarity, or differing volumes on
/// Windows.
pub fn rel(d: Dialect, base_path: &str, targ_path: &str) -> Result<String, RelError> {
    let fail = || RelError {
        base: base_path.to_string(),
        target: targ_path.to_string(),
    };

    let base_vol_len = volume_name_len(d, base_path);
    let targ_vol_len = volume_name_len(d, targ_path);
    let base_clean = clean(d, base_path);
    let targ_clean = clean(d, targ_path);

    if d.same_word(&targ_clean, &base_clean) {
        return Ok(".".to_string());
    }

    let base_vol = &base_clean[..base_vol_len.min(base_clean.len())];
    let targ_vol = &targ_clean[..targ_vol_len.min(targ_clean.len())];
    let mut base = &base_clean[base_vol.len()..];
    let targ = &targ_clean[targ_vol.len()..];
    if base == "." {
        base = "";
    }

    let base_slashed = base.as_bytes().first().is_some_and(|&b| d.is_separator(b));
    let targ_slashed = targ.as_bytes().first().is_some_and(|&b| d.is_separator(b));
    if base_slashed != targ_slashed || !d.same_word(base_vol, targ_vol) {
        return Err(fail());
    }

    // Position both paths at the first differing element
    let (bl, tl) = (base.len(), targ.len());
    let (bb, tb) = (base.as_bytes(), targ.as_bytes());
    let (mut b0, mut bi, mut t0, mut ti) = (0usize, 0usize, 0usize, 0usize);
    loop {
        while bi < bl && !d.is_separator(bb[bi]) {
            bi += 1;
        }
        while ti < tl && !d.is_separator(tb[ti]) {
            ti += 1;
        }
        if !d.same_word(&targ[t0..ti], &base[b0..bi]) {
            break;
        }
        if bi < bl {
            bi += 1;
        }
        if ti < tl {
            ti += 1;
        }
        b0 = bi;
        t0 = ti;
    }

    if &base[b0..bi] == ".." {
        return Err(fail());
    }

    if b0 != bl {
        // Base has elements left over; climb out of them first
        let seps = base[b0..bl]
            .as_bytes()
            .iter()
            .filter(|&&b| d.is_separator(b))
            .count();
        let mut out = String::from("..");
        for _ in 0..seps {
            out.push(d.separator);
            out.push_str("..");
        }
        if t0 != tl {
            out.push(d.separator);
            out.push_str(&targ[t0..]);
        }
        return Ok(out);
    }
    Ok(targ[t0..].to_string())
}

#[cfg(test)]
#[path = "tests/path_tests.rs"]
mod tests;
