//! String and template literal scanning and decoding.
//!
//! Scanning only finds the end of the literal and remembers whether the
//! slow path is needed; decoding into UTF-16 code units happens on demand
//! via [`Lexer::string_literal`]. The split matters for tagged templates,
//! which must keep the raw text even when the cooked form is invalid.

use jolt_common::span::Span;
use jolt_common::utf::{EOF_SENTINEL, push_utf16};

use crate::lexer::{Lexer, LexerKind};
use crate::tokens::T;

impl Lexer<'_> {
    /// Scan a string or template literal. The current code point is the
    /// opening quote.
    pub(crate) fn scan_string_literal(&mut self) {
        let quote = self.code_point;
        if self.kind == LexerKind::Json && quote == '\'' as i32 {
            let span = Span::new(self.end as u32, (self.end + 1) as u32);
            self.add_error(span, "JSON strings must use double quotes".to_string());
        }
        self.step();

        let (suffix_len, ended_in_substitution) = self.scan_string_body(quote);

        self.token = if quote == '`' as i32 {
            if ended_in_substitution {
                T::TemplateHead
            } else {
                T::NoSubstitutionTemplateLiteral
            }
        } else {
            T::StringLiteral
        };
        self.string_inner = Span::new(
            (self.start + 1) as u32,
            (self.end - suffix_len) as u32,
        );
    }

    /// Re-scan a `}` as the continuation of a template literal. The
    /// parser calls this after finishing the expression inside `${...}`.
    pub fn rescan_close_brace_as_template_token(&mut self) {
        if self.token != T::CloseBrace {
            self.expected(T::CloseBrace);
        }
        self.decoded_string = None;
        let (suffix_len, ended_in_substitution) = self.scan_string_body('`' as i32);
        self.token = if ended_in_substitution {
            T::TemplateMiddle
        } else {
            T::TemplateTail
        };
        self.string_inner = Span::new(
            (self.start + 1) as u32,
            (self.end - suffix_len) as u32,
        );
    }

    /// Scan until the closing delimiter. Returns the delimiter length at
    /// the end of the token (1 for a quote, 2 for `${`) and whether a
    /// template ended in a substitution.
    fn scan_string_body(&mut self, quote: i32) -> (usize, bool) {
        let is_template = quote == '`' as i32;
        let mut needs_decoding = false;

        loop {
            if self.code_point == quote {
                self.step();
                self.string_needs_decoding = needs_decoding;
                return (1, false);
            }
            match self.code_point {
                0x5C => {
                    // '\\' defers decoding
                    needs_decoding = true;
                    self.step();
                    match self.code_point {
                        EOF_SENTINEL => {
                            let span = Span::new(self.end as u32, self.end as u32);
                            self.add_error(span, "Unterminated string literal".to_string());
                        }
                        0x0D => {
                            // Escaped \r\n line continuation
                            self.step();
                            if self.code_point == 0x0A {
                                self.step();
                            }
                        }
                        _ => self.step(),
                    }
                }
                0x0D | 0x0A => {
                    if !is_template {
                        let span = Span::new(self.end as u32, self.end as u32);
                        self.add_error(span, "Unterminated string literal".to_string());
                    }
                    // Raw template text later normalizes \r and \r\n
                    needs_decoding = true;
                    self.step();
                }
                0x24 if is_template => {
                    // '$'
                    self.step();
                    if self.code_point == '{' as i32 {
                        self.step();
                        self.string_needs_decoding = needs_decoding;
                        return (2, true);
                    }
                }
                EOF_SENTINEL => {
                    let span = Span::new(self.end as u32, self.end as u32);
                    self.add_error(span, "Unterminated string literal".to_string());
                }
                cp if cp >= 0x80 => {
                    needs_decoding = true;
                    self.step();
                }
                cp if cp < 0x20 && self.kind == LexerKind::Json => {
                    let span = Span::new(self.end as u32, (self.end + 1) as u32);
                    self.add_error(
                        span,
                        "Control characters must be escaped in JSON strings".to_string(),
                    );
                }
                _ => self.step(),
            }
        }
    }

    /// The raw source text between the delimiters of the current
    /// string-like token.
    pub fn string_raw(&self) -> &str {
        self.string_inner.slice(self.contents)
    }

    /// The raw text of a template token with line endings normalized:
    /// `\r\n` and lone `\r` become `\n`, as required for tagged template
    /// raw strings.
    pub fn raw_template_contents(&self) -> String {
        let raw = self.string_raw();
        if !raw.contains('\r') {
            return raw.to_string();
        }
        let mut out = String::with_capacity(raw.len());
        let mut chars = raw.chars().peekable();
        while let Some(ch) = chars.next() {
            if ch == '\r' {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            } else {
                out.push(ch);
            }
        }
        out
    }

    /// The decoded UTF-16 value of the current string-like token,
    /// computed on first call and cached. Invalid escapes raise a lexer
    /// error; use [`Lexer::cooked_template_contents`] for tagged
    /// templates where invalid escapes are legal.
    pub fn string_literal(&mut self) -> Vec<u16> {
        if let Some(cached) = &self.decoded_string {
            return cached.clone();
        }

        let decoded = if !self.string_needs_decoding {
            // Fast path: the scan proved the contents are plain ASCII
            self.string_raw().bytes().map(u16::from).collect()
        } else {
            let is_template = matches!(
                self.token,
                T::NoSubstitutionTemplateLiteral
                    | T::TemplateHead
                    | T::TemplateMiddle
                    | T::TemplateTail
            );
            match self.decode_escapes(is_template) {
                Ok(units) => units,
                Err((span, message)) => self.add_error(span, message),
            }
        };
        self.decoded_string = Some(decoded.clone());
        decoded
    }

    /// Like [`Lexer::string_literal`] but returns `None` instead of
    /// raising when a template contains an invalid escape. Tagged
    /// templates have no cooked value in that case, only a raw one.
    pub fn cooked_template_contents(&mut self) -> Option<Vec<u16>> {
        if !self.string_needs_decoding {
            return Some(self.string_raw().bytes().map(u16::from).collect());
        }
        self.decode_escapes(true).ok()
    }

    /// Decode the escape sequences of the current literal into UTF-16
    /// code units.
    fn decode_escapes(&self, is_template: bool) -> Result<Vec<u16>, (Span, String)> {
        let raw = self.string_raw();
        let base = self.string_inner.start as usize;
        let json = self.kind == LexerKind::Json;
        let mut out: Vec<u16> = Vec::with_capacity(raw.len());
        let bytes = raw.as_bytes();
        let mut i = 0usize;

        let err = |at: usize, len: usize, msg: &str| {
            Err((
                Span::new((base + at) as u32, (base + at + len) as u32),
                msg.to_string(),
            ))
        };

        while i < bytes.len() {
            let b = bytes[i];
            if b == b'\r' {
                // Template raw text normalization applies to cooked too
                out.push('\n' as u16);
                i += 1;
                if bytes.get(i) == Some(&b'\n') {
                    i += 1;
                }
                continue;
            }
            if b != b'\\' {
                let ch = raw[i..].chars().next().unwrap_or('\u{FFFD}');
                push_utf16(&mut out, ch as u32);
                i += ch.len_utf8();
                continue;
            }

            // An escape sequence
            let escape_at = i;
            i += 1;
            let Some(&e) = bytes.get(i) else {
                return err(escape_at, 1, "Unterminated escape sequence");
            };
            match e {
                b'b' => {
                    out.push(0x08);
                    i += 1;
                }
                b'f' => {
                    out.push(0x0C);
                    i += 1;
                }
                b'n' => {
                    out.push(0x0A);
                    i += 1;
                }
                b'r' => {
                    out.push(0x0D);
                    i += 1;
                }
                b't' => {
                    out.push(0x09);
                    i += 1;
                }
                b'v' => {
                    if json {
                        return err(escape_at, 2, "The escape \"\\v\" is not allowed in JSON");
                    }
                    out.push(0x0B);
                    i += 1;
                }
                b'0'..=b'7' => {
                    // Legacy octal, up to three digits with value <= 0o377.
                    // "\0" not followed by a digit is just NUL.
                    let mut value = (e - b'0') as u32;
                    let mut len = 1usize;
                    while len < 3 {
                        match bytes.get(i + len) {
                            Some(&d @ b'0'..=b'7') if value * 8 + (d - b'0') as u32 <= 0o377 => {
                                value = value * 8 + (d - b'0') as u32;
                                len += 1;
                            }
                            _ => break,
                        }
                    }
                    let is_plain_nul =
                        e == b'0' && len == 1 && !matches!(bytes.get(i + 1), Some(b'0'..=b'9'));
                    if json {
                        return err(escape_at, 1 + len, "Octal escapes are not allowed in JSON");
                    }
                    if is_template && !is_plain_nul {
                        return err(
                            escape_at,
                            1 + len,
                            "Octal escapes are not allowed in template literals",
                        );
                    }
                    out.push(value as u16);
                    i += len;
                }
                b'8' | b'9' => {
                    // Not octal, but still flagged: strict mode and
                    // templates reject these
                    if json {
                        return err(escape_at, 2, "Octal escapes are not allowed in JSON");
                    }
                    if is_template {
                        return err(
                            escape_at,
                            2,
                            "The escapes \"\\8\" and \"\\9\" are not allowed in template literals",
                        );
                    }
                    out.push(e as u16);
                    i += 1;
                }
                b'x' => {
                    if json {
                        return err(escape_at, 2, "Hex escapes are not allowed in JSON");
                    }
                    let (Some(h1), Some(h2)) = (
                        bytes.get(i + 1).copied().and_then(hex_digit),
                        bytes.get(i + 2).copied().and_then(hex_digit),
                    ) else {
                        return err(escape_at, 2, "Invalid hexadecimal escape");
                    };
                    out.push((h1 * 16 + h2) as u16);
                    i += 3;
                }
                b'u' => {
                    if bytes.get(i + 1) == Some(&b'{') {
                        if json {
                            return err(escape_at, 3, "Code point escapes are not allowed in JSON");
                        }
                        let Some(close) = raw[i + 2..].find('}').map(|j| i + 2 + j) else {
                            return err(escape_at, 3, "Unterminated Unicode escape");
                        };
                        let digits = &raw[i + 2..close];
                        let value = u32::from_str_radix(digits, 16).ok();
                        match value {
                            Some(cp) if cp <= 0x10FFFF && !digits.is_empty() => {
                                push_utf16(&mut out, cp);
                            }
                            _ => {
                                return err(escape_at, close + 1 - escape_at, "Invalid Unicode escape");
                            }
                        }
                        i = close + 1;
                    } else {
                        let mut value = 0u32;
                        for k in 0..4 {
                            let Some(d) = bytes.get(i + 1 + k).copied().and_then(hex_digit) else {
                                return err(escape_at, 2, "Invalid Unicode escape");
                            };
                            value = value * 16 + d as u32;
                        }
                        // May be an unpaired surrogate; UTF-16 admits it
                        out.push(value as u16);
                        i += 5;
                    }
                }
                b'\r' => {
                    if json {
                        return err(escape_at, 2, "Line continuations are not allowed in JSON");
                    }
                    // Line continuation: produces nothing
                    i += 1;
                    if bytes.get(i) == Some(&b'\n') {
                        i += 1;
                    }
                }
                b'\n' => {
                    if json {
                        return err(escape_at, 2, "Line continuations are not allowed in JSON");
                    }
                    i += 1;
                }
                _ => {
                    let ch = raw[i..].chars().next().unwrap_or('\u{FFFD}');
                    if ch == '\u{2028}' || ch == '\u{2029}' {
                        if json {
                            return err(escape_at, 1 + ch.len_utf8(), "Line continuations are not allowed in JSON");
                        }
                        i += ch.len_utf8();
                        continue;
                    }
                    if json && !matches!(ch, '"' | '\\' | '/') {
                        return err(escape_at, 1 + ch.len_utf8(), "Invalid escape in JSON string");
                    }
                    // Any other escaped character stands for itself
                    push_utf16(&mut out, ch as u32);
                    i += ch.len_utf8();
                }
            }
        }
        Ok(out)
    }
}

fn hex_digit(b: u8) -> Option<u32> {
    match b {
        b'0'..=b'9' => Some((b - b'0') as u32),
        b'a'..=b'f' => Some((b - b'a' + 10) as u32),
        b'A'..=b'F' => Some((b - b'A' + 10) as u32),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/string_tests.rs"]
mod tests;
