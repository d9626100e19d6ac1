//! JavaScript identifier predicates.
//!
//! ASCII is handled inline; everything else falls through to binary search
//! over the Unicode range tables in `ident_tables.rs`. The lexer's tight
//! inner loop never reaches these functions for plain ASCII identifiers.

use super::ident_tables::{ID_CONTINUE_EXTRA_RANGES, ID_START_RANGES};

#[inline]
fn in_ranges(ranges: &[(u32, u32)], cp: u32) -> bool {
    ranges
        .binary_search_by(|&(lo, hi)| {
            if hi < cp {
                std::cmp::Ordering::Less
            } else if lo > cp {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        })
        .is_ok()
}

/// Can this code point start an identifier?
#[inline]
pub fn is_identifier_start(cp: i32) -> bool {
    match cp {
        0x61..=0x7A | 0x41..=0x5A => true, // a-z A-Z
        0x5F | 0x24 => true,               // _ $
        0..=0x7F => false,
        _ => cp > 0 && in_ranges(ID_START_RANGES, cp as u32),
    }
}

/// Can this code point continue an identifier?
///
/// Includes ZWNJ and ZWJ, which the identifier grammar admits after the
/// first character.
#[inline]
pub fn is_identifier_continue(cp: i32) -> bool {
    match cp {
        0x61..=0x7A | 0x41..=0x5A | 0x30..=0x39 => true, // a-z A-Z 0-9
        0x5F | 0x24 => true,                             // _ $
        0x200C | 0x200D => true,                         // ZWNJ, ZWJ
        0..=0x7F => false,
        _ => {
            cp > 0
                && (in_ranges(ID_START_RANGES, cp as u32)
                    || in_ranges(ID_CONTINUE_EXTRA_RANGES, cp as u32))
        }
    }
}

/// Is this code point whitespace as JavaScript defines it?
///
/// Line terminators are not included; the lexer tracks those separately.
#[inline]
pub fn is_whitespace(cp: i32) -> bool {
    matches!(
        cp,
        0x09 // tab
        | 0x0B // vertical tab
        | 0x0C // form feed
        | 0x20 // space
        | 0xA0 // no-break space
        | 0x1680 // ogham space mark
        | 0x2000..=0x200A // en quad .. hair space
        | 0x202F // narrow no-break space
        | 0x205F // medium mathematical space
        | 0x3000 // ideographic space
        | 0xFEFF // zero width no-break space (BOM)
    )
}

/// Check whether a string is a valid JavaScript identifier.
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if is_identifier_start(first as i32) => {}
        _ => return false,
    }
    chars.all(|ch| is_identifier_continue(ch as i32))
}

/// Force a string into a valid identifier.
///
/// Invalid code points are replaced with `_`, and a leading `_` is added
/// when the first code point cannot start an identifier. Used by the
/// numbering renamer when it derives readable names from arbitrary text
/// (file names, string keys).
pub fn force_valid_identifier(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    // Skip leading characters that cannot appear anywhere in an identifier
    while let Some(&ch) = chars.peek() {
        if is_identifier_continue(ch as i32) {
            break;
        }
        chars.next();
    }

    match chars.next() {
        Some(first) if is_identifier_start(first as i32) => out.push(first),
        Some(first) => {
            out.push('_');
            if is_identifier_continue(first as i32) {
                out.push(first);
            }
        }
        None => return "_".to_string(),
    }

    for ch in chars {
        if is_identifier_continue(ch as i32) {
            out.push(ch);
        } else {
            out.push('_');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_identifiers() {
        assert!(is_identifier("foo"));
        assert!(is_identifier("_bar"));
        assert!(is_identifier("$baz0"));
        assert!(!is_identifier("0abc"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("a-b"));
    }

    #[test]
    fn unicode_identifiers() {
        assert!(is_identifier("π"));
        assert!(is_identifier("日本語"));
        assert!(is_identifier("Ωmega"));
        // Combining mark can continue but not start
        assert!(!is_identifier_start(0x0301));
        assert!(is_identifier_continue(0x0301));
    }

    #[test]
    fn zwj_zwnj_continue_only() {
        assert!(is_identifier_continue(0x200C));
        assert!(is_identifier_continue(0x200D));
        assert!(!is_identifier_start(0x200C));
    }

    #[test]
    fn whitespace_classification() {
        assert!(is_whitespace(' ' as i32));
        assert!(is_whitespace('\t' as i32));
        assert!(is_whitespace(0xFEFF));
        assert!(is_whitespace(0x3000));
        assert!(!is_whitespace('\n' as i32));
        assert!(!is_whitespace('a' as i32));
    }

    #[test]
    fn forcing_identifiers() {
        assert_eq!(force_valid_identifier("foo"), "foo");
        assert_eq!(force_valid_identifier("foo.js"), "foo_js");
        assert_eq!(force_valid_identifier("123"), "_123");
        assert_eq!(force_valid_identifier(""), "_");
        assert_eq!(force_valid_identifier("--"), "_");
    }
}
