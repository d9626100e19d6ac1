//! Semantic versions and their ordering.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A compact engine version. The components fit in 16/8/8 bits, which
/// covers every browser and Node release scheme in the tables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version {
    pub major: u16,
    pub minor: u8,
    pub patch: u8,
}

impl Version {
    #[inline]
    pub const fn new(major: u16, minor: u8, patch: u8) -> Version {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Compare against a generalized parts list (missing right-hand parts
    /// compare as zero).
    pub fn compare_to_parts(&self, parts: &[u32]) -> Ordering {
        let mine = [self.major as u32, self.minor as u32, self.patch as u32];
        for i in 0..3 {
            let theirs = parts.get(i).copied().unwrap_or(0);
            match mine[i].cmp(&theirs) {
                Ordering::Equal => {}
                other => return other,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch).cmp(&(other.major, other.minor, other.patch))
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.patch != 0 {
            write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
        } else if self.minor != 0 {
            write!(f, "{}.{}", self.major, self.minor)
        } else {
            write!(f, "{}", self.major)
        }
    }
}

/// A generalized version: integer parts plus an optional pre-release
/// suffix. `1.2.3-beta.1` parses as `([1, 2, 3], "-beta.1")`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedVersion {
    pub parts: Vec<u32>,
    pub pre_release: String,
}

/// Parse a version string. Returns `None` for anything that does not
/// start with a numeric part.
pub fn parse_version(text: &str) -> Option<ParsedVersion> {
    let mut parts = Vec::new();
    let mut rest = text;

    loop {
        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits_end == 0 {
            return None;
        }
        parts.push(rest[..digits_end].parse().ok()?);
        rest = &rest[digits_end..];

        if let Some(stripped) = rest.strip_prefix('.') {
            if stripped.starts_with(|c: char| c.is_ascii_digit()) {
                rest = stripped;
                continue;
            }
        }
        break;
    }

    let pre_release = if rest.starts_with('-') || rest.starts_with('+') {
        rest.to_string()
    } else if rest.is_empty() {
        String::new()
    } else {
        return None;
    };

    Some(ParsedVersion {
        parts,
        pre_release,
    })
}

/// Compare two parsed versions.
///
/// Part-wise comparison with missing parts on either side treated as
/// zero; a pre-release suffix makes a version strictly less than the same
/// parts without one.
pub fn compare_versions(a: &ParsedVersion, b: &ParsedVersion) -> Ordering {
    let len = a.parts.len().max(b.parts.len());
    for i in 0..len {
        let av = a.parts.get(i).copied().unwrap_or(0);
        let bv = b.parts.get(i).copied().unwrap_or(0);
        match av.cmp(&bv) {
            Ordering::Equal => {}
            other => return other,
        }
    }
    match (a.pre_release.is_empty(), b.pre_release.is_empty()) {
        (true, true) => Ordering::Equal,
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (false, false) => a.pre_release.cmp(&b.pre_release),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(text: &str) -> ParsedVersion {
        parse_version(text).unwrap()
    }

    #[test]
    fn parses_versions() {
        assert_eq!(parsed("12").parts, vec![12]);
        assert_eq!(parsed("12.19.0").parts, vec![12, 19, 0]);
        assert_eq!(parsed("1.2.3-beta.1").pre_release, "-beta.1");
        assert!(parse_version("").is_none());
        assert!(parse_version("v12").is_none());
        assert!(parse_version("1.x").is_none());
    }

    #[test]
    fn missing_parts_compare_as_zero() {
        assert_eq!(compare_versions(&parsed("1.0.0"), &parsed("1")), Ordering::Equal);
        assert_eq!(compare_versions(&parsed("1.2"), &parsed("1")), Ordering::Greater);
        assert_eq!(compare_versions(&parsed("1"), &parsed("1.0.1")), Ordering::Less);
    }

    #[test]
    fn pre_release_sorts_before_release() {
        assert_eq!(
            compare_versions(&parsed("1.0.0-beta"), &parsed("1.0.0")),
            Ordering::Less
        );
        assert_eq!(
            compare_versions(&parsed("1.0.0"), &parsed("1.0.0-beta")),
            Ordering::Greater
        );
    }

    #[test]
    fn comparison_is_antisymmetric_and_transitive() {
        let versions = ["1", "1.0.1", "1.2", "1.2-rc", "2", "10.0"];
        for a in &versions {
            for b in &versions {
                let ab = compare_versions(&parsed(a), &parsed(b));
                let ba = compare_versions(&parsed(b), &parsed(a));
                assert_eq!(ab, ba.reverse(), "antisymmetry failed for {a} {b}");
            }
        }
        for a in &versions {
            for b in &versions {
                for c in &versions {
                    let ab = compare_versions(&parsed(a), &parsed(b));
                    let bc = compare_versions(&parsed(b), &parsed(c));
                    let ac = compare_versions(&parsed(a), &parsed(c));
                    if ab == bc {
                        assert_eq!(ac, ab, "transitivity failed for {a} {b} {c}");
                    }
                }
            }
        }
    }

    #[test]
    fn compact_versions_order_lexicographically() {
        assert!(Version::new(1, 2, 3) < Version::new(1, 3, 0));
        assert!(Version::new(10, 0, 0) > Version::new(9, 9, 9));
        assert_eq!(Version::new(58, 0, 0).to_string(), "58");
        assert_eq!(Version::new(12, 19, 0).to_string(), "12.19");
    }
}
