//! Numeric literal scanning.
//!
//! Small integers (at most nine digits, no dot, exponent, or separator)
//! take a hand-rolled accumulator fast path. Everything else is scanned
//! with full validation and then re-parsed from the raw text after
//! underscore removal.
//!
//! Separator rules: an underscore must sit between two digits of the
//! literal's base, never doubled, never at either edge, and never inside
//! a legacy octal literal. A trailing `n` promotes to BigInt (kept as
//! text to preserve precision) and is rejected after a fraction, an
//! exponent, or a legacy-octal leading zero.

use jolt_common::span::Span;
use jolt_common::utf::is_identifier_start;

use crate::lexer::{IdentifierText, Lexer};
use crate::tokens::T;

impl Lexer<'_> {
    /// Scan a numeric literal. The current code point is the first digit
    /// or a leading `.`.
    pub(crate) fn scan_number(&mut self) {
        self.token = T::NumericLiteral;
        let bytes = self.contents.as_bytes();
        let first = self.code_point;

        // Fast path: a short plain integer
        if first != '.' as i32 && !(first == '0' as i32 && self.peek_byte().is_ascii_digit()) {
            let mut i = self.start;
            let mut value: u64 = 0;
            let mut digits = 0usize;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                value = value * 10 + (bytes[i] - b'0') as u64;
                digits += 1;
                i += 1;
                if digits > 9 {
                    break;
                }
            }
            let terminator = bytes.get(i).copied().unwrap_or(0);
            let plain_end = digits <= 9
                && !matches!(terminator, b'.' | b'e' | b'E' | b'_' | b'n')
                && !(first == '0' as i32 && matches!(terminator, b'b' | b'B' | b'o' | b'O' | b'x' | b'X'));
            if plain_end {
                self.number = value as f64;
                self.current = i;
                self.step();
                self.check_number_terminator();
                return;
            }
        }

        self.step();

        let mut has_dot = first == '.' as i32;
        let mut has_exponent = false;
        let mut is_legacy_octal = false;
        let mut is_invalid_legacy_octal = false;
        let mut base: u32 = 0;

        if first == '0' as i32 {
            match self.code_point {
                0x62 | 0x42 => {
                    // 'b' 'B'
                    self.step();
                    base = 2;
                }
                0x6F | 0x4F => {
                    // 'o' 'O'
                    self.step();
                    base = 8;
                }
                0x78 | 0x58 => {
                    // 'x' 'X'
                    self.step();
                    base = 16;
                }
                0x30..=0x39 => {
                    // A leading zero followed by digits: legacy octal,
                    // with 8 and 9 flagged separately
                    is_legacy_octal = true;
                }
                _ => {}
            }
        }

        if base != 0 {
            self.scan_radix_digits(base);
        } else {
            self.scan_decimal(
                &mut has_dot,
                &mut has_exponent,
                is_legacy_octal,
                &mut is_invalid_legacy_octal,
            );
            // An 8 or 9 in a "legacy octal" makes it decimal again
            if is_invalid_legacy_octal {
                is_legacy_octal = false;
            }
        }

        // BigInt suffix
        if self.code_point == 'n' as i32 {
            let span = Span::new(self.start as u32, (self.end + 1) as u32);
            if has_dot || has_exponent {
                self.add_error(span, "A BigInt literal cannot have a fraction or exponent".to_string());
            }
            if is_legacy_octal || is_invalid_legacy_octal {
                self.add_error(span, "A BigInt literal cannot use a legacy octal form".to_string());
            }
            // Keep the digits as text; f64 cannot hold them
            let digits = Span::new(self.start as u32, self.end as u32);
            self.identifier = IdentifierText::Span(digits);
            self.token = T::BigIntegerLiteral;
            self.step();
            self.check_number_terminator();
            return;
        }

        // Compute the value from the raw text
        let raw = &self.contents[self.start..self.end];
        self.number = match base {
            0 => {
                if is_legacy_octal {
                    let mut value = 0.0f64;
                    for b in raw[1..].bytes() {
                        value = value * 8.0 + (b - b'0') as f64;
                    }
                    value
                } else if raw.contains('_') {
                    let cleaned: String = raw.chars().filter(|&c| c != '_').collect();
                    cleaned.parse().unwrap_or(f64::NAN)
                } else {
                    raw.parse().unwrap_or(f64::NAN)
                }
            }
            radix => {
                let mut value = 0.0f64;
                for b in raw[2..].bytes() {
                    if b == b'_' {
                        continue;
                    }
                    let digit = match b {
                        b'0'..=b'9' => (b - b'0') as u32,
                        b'a'..=b'f' => (b - b'a' + 10) as u32,
                        b'A'..=b'F' => (b - b'A' + 10) as u32,
                        _ => 0,
                    };
                    value = value * radix as f64 + digit as f64;
                }
                value
            }
        };

        self.check_number_terminator();
    }

    fn peek_byte(&self) -> u8 {
        self.contents.as_bytes().get(self.current).copied().unwrap_or(0)
    }

    /// Scan binary/octal/hex digits after the base prefix.
    fn scan_radix_digits(&mut self, base: u32) {
        let mut digit_count = 0usize;
        let mut last_was_underscore = false;
        let mut first = true;

        loop {
            let is_digit = match self.code_point {
                0x30..=0x39 => (self.code_point - 0x30) < base as i32,
                0x61..=0x66 | 0x41..=0x46 => base == 16,
                _ => false,
            };
            if is_digit {
                digit_count += 1;
                last_was_underscore = false;
                first = false;
                self.step();
                continue;
            }
            if self.code_point == '_' as i32 {
                let span = Span::new(self.end as u32, (self.end + 1) as u32);
                if first {
                    self.add_error(span, "Numeric separator cannot follow the base prefix".to_string());
                }
                if last_was_underscore {
                    self.add_error(span, "Numeric separators cannot be adjacent".to_string());
                }
                last_was_underscore = true;
                self.step();
                continue;
            }
            break;
        }

        let span = Span::new(self.start as u32, self.end as u32);
        if digit_count == 0 {
            self.add_error(span, "Invalid number".to_string());
        }
        if last_was_underscore {
            self.add_error(span, "Numeric separator cannot be trailing".to_string());
        }
    }

    /// Scan a decimal literal: digits, optional fraction, optional
    /// exponent. Already past the first character.
    fn scan_decimal(
        &mut self,
        has_dot: &mut bool,
        has_exponent: &mut bool,
        is_legacy_octal: bool,
        is_invalid_legacy_octal: &mut bool,
    ) {
        let mut last_was_underscore = false;
        // The first character (a digit or the dot) was already consumed;
        // a separator may not appear immediately after the dot
        let mut last_was_digit = !*has_dot;

        loop {
            match self.code_point {
                0x30..=0x39 => {
                    if is_legacy_octal && self.code_point >= 0x38 {
                        *is_invalid_legacy_octal = true;
                    }
                    last_was_underscore = false;
                    last_was_digit = true;
                    self.step();
                }
                0x5F => {
                    // '_'
                    let span = Span::new(self.end as u32, (self.end + 1) as u32);
                    if is_legacy_octal {
                        self.add_error(span, "Numeric separator cannot appear in a legacy octal literal".to_string());
                    }
                    if last_was_underscore {
                        self.add_error(span, "Numeric separators cannot be adjacent".to_string());
                    }
                    if !last_was_digit {
                        self.add_error(span, "Numeric separator must sit between digits".to_string());
                    }
                    last_was_underscore = true;
                    last_was_digit = false;
                    self.step();
                }
                0x2E => {
                    // '.'
                    if *has_dot || *has_exponent || is_legacy_octal {
                        break;
                    }
                    if last_was_underscore {
                        let span = Span::new(self.end as u32, (self.end + 1) as u32);
                        self.add_error(span, "Numeric separator must sit between digits".to_string());
                    }
                    *has_dot = true;
                    last_was_digit = false;
                    self.step();
                }
                0x65 | 0x45 => {
                    // 'e' 'E'
                    if *has_exponent || is_legacy_octal {
                        break;
                    }
                    if last_was_underscore {
                        let span = Span::new(self.end as u32, (self.end + 1) as u32);
                        self.add_error(span, "Numeric separator must sit between digits".to_string());
                    }
                    *has_exponent = true;
                    self.step();
                    if self.code_point == '+' as i32 || self.code_point == '-' as i32 {
                        self.step();
                    }
                    if !matches!(self.code_point, 0x30..=0x39) {
                        let span = Span::new(self.start as u32, self.end as u32);
                        self.add_error(span, "Invalid number".to_string());
                    }
                    last_was_digit = false;
                    last_was_underscore = false;
                }
                _ => break,
            }
        }

        if last_was_underscore {
            let span = Span::new(self.start as u32, self.end as u32);
            self.add_error(span, "Numeric separator cannot be trailing".to_string());
        }
    }

    /// A number must not run directly into an identifier or another digit.
    fn check_number_terminator(&mut self) {
        if is_identifier_start(self.code_point) || matches!(self.code_point, 0x30..=0x39) {
            self.syntax_error();
        }
    }
}

#[cfg(test)]
#[path = "tests/number_tests.rs"]
mod tests;
