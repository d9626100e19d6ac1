//! JSX tokenizer modes.
//!
//! JSX text and attributes are not JavaScript: free text runs until `{`
//! or `<`, attribute identifiers may contain `-`, and strings decode HTML
//! entities instead of backslash escapes. The parser switches the lexer
//! into these modes explicitly.

use jolt_common::span::Span;
use jolt_common::utf::{
    EOF_SENTINEL, is_identifier_continue, is_identifier_start, is_whitespace, push_utf16,
};

use crate::lexer::{IdentifierText, Lexer};
use crate::tokens::T;

impl Lexer<'_> {
    /// Tokenize inside a JSX element tag (between `<` and `>`).
    pub fn next_inside_jsx_element(&mut self) {
        self.has_comment_before = false;
        self.decoded_string = None;

        loop {
            self.start = self.end;
            self.token = T::EndOfFile;

            match self.code_point {
                EOF_SENTINEL => {}

                0x0D | 0x0A | 0x2028 | 0x2029 => {
                    self.step();
                    self.has_newline_before = true;
                    continue;
                }

                0x09 | 0x20 => {
                    self.step();
                    continue;
                }

                0x2F => {
                    // '//' and '/*' comments also exist inside tags
                    self.step();
                    match self.code_point {
                        0x2F => {
                            self.scan_line_comment_jsx();
                            continue;
                        }
                        0x2A => {
                            self.scan_block_comment_jsx();
                            continue;
                        }
                        _ => self.token = T::Slash,
                    }
                }

                0x7B => {
                    self.step();
                    self.token = T::OpenBrace;
                }
                0x7D => {
                    self.step();
                    self.token = T::CloseBrace;
                }
                0x3C => {
                    self.step();
                    self.token = T::LessThan;
                }
                0x3E => {
                    self.step();
                    self.token = T::GreaterThan;
                }
                0x2E => {
                    self.step();
                    self.token = T::Dot;
                }
                0x3A => {
                    self.step();
                    self.token = T::Colon;
                }
                0x3D => {
                    self.step();
                    self.token = T::Equals;
                }

                0x22 | 0x27 => {
                    // JSX attribute string: runs to the matching quote
                    // with no escape processing; entities decode later
                    let quote = self.code_point;
                    let mut needs_decoding = false;
                    self.step();
                    loop {
                        match self.code_point {
                            EOF_SENTINEL => {
                                let span = Span::new(self.end as u32, self.end as u32);
                                self.add_error(span, "Unterminated string literal".to_string());
                            }
                            cp if cp == quote => {
                                self.step();
                                break;
                            }
                            cp => {
                                if cp == '&' as i32 || cp >= 0x80 {
                                    needs_decoding = true;
                                }
                                self.step();
                            }
                        }
                    }
                    self.token = T::StringLiteral;
                    self.string_inner =
                        Span::new((self.start + 1) as u32, (self.end - 1) as u32);
                    self.string_needs_decoding = false;
                    self.decoded_string = Some(if needs_decoding {
                        decode_jsx_entities(self.string_inner.slice(self.contents))
                    } else {
                        self.string_inner
                            .slice(self.contents)
                            .bytes()
                            .map(u16::from)
                            .collect()
                    });
                }

                cp if is_identifier_start(cp) => {
                    // JSX identifiers also allow '-' (e.g. data-foo)
                    loop {
                        self.step();
                        if !is_identifier_continue(self.code_point)
                            && self.code_point != '-' as i32
                        {
                            break;
                        }
                    }
                    self.token = T::Identifier;
                    self.identifier =
                        IdentifierText::Span(Span::new(self.start as u32, self.end as u32));
                }

                cp if is_whitespace(cp) => {
                    self.step();
                    continue;
                }

                _ => self.syntax_error(),
            }
            return;
        }
    }

    /// Tokenize a JSX child position: free text up to `{` or `<` becomes
    /// a string literal with entity decoding and whitespace folding.
    pub fn next_jsx_element_child(&mut self) {
        self.has_comment_before = false;
        self.decoded_string = None;
        self.start = self.end;

        match self.code_point {
            EOF_SENTINEL => {
                self.token = T::EndOfFile;
            }
            0x7B => {
                self.step();
                self.token = T::OpenBrace;
            }
            0x3C => {
                self.step();
                self.token = T::LessThan;
            }
            _ => {
                // Text child
                loop {
                    match self.code_point {
                        EOF_SENTINEL | 0x7B | 0x3C => break,
                        0x7D => {
                            let span = Span::new(self.end as u32, (self.end + 1) as u32);
                            self.add_error(
                                span,
                                "The character \"}\" is not valid inside a JSX element".to_string(),
                            );
                        }
                        _ => self.step(),
                    }
                }
                self.token = T::StringLiteral;
                self.string_inner = Span::new(self.start as u32, self.end as u32);
                self.string_needs_decoding = false;
                let text = self.string_inner.slice(self.contents);
                self.decoded_string = Some(fold_jsx_whitespace_and_decode(text));
            }
        }
    }

    fn scan_line_comment_jsx(&mut self) {
        loop {
            self.step();
            match self.code_point {
                0x0D | 0x0A | 0x2028 | 0x2029 | EOF_SENTINEL => break,
                _ => {}
            }
        }
        self.has_comment_before = true;
    }

    fn scan_block_comment_jsx(&mut self) {
        self.step();
        loop {
            match self.code_point {
                0x2A => {
                    self.step();
                    if self.code_point == '/' as i32 {
                        self.step();
                        break;
                    }
                }
                0x0D | 0x0A | 0x2028 | 0x2029 => {
                    self.has_newline_before = true;
                    self.step();
                }
                EOF_SENTINEL => {
                    let span = Span::new(self.start as u32, self.end as u32);
                    self.add_error(
                        span,
                        "Expected \"*/\" to terminate multi-line comment".to_string(),
                    );
                }
                _ => self.step(),
            }
        }
        self.has_comment_before = true;
    }
}

/// Trim each line of JSX text, drop the lines that end up empty, and join
/// the remainder with single spaces; then decode entities.
fn fold_jsx_whitespace_and_decode(text: &str) -> Vec<u16> {
    let mut folded = String::with_capacity(text.len());
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !folded.is_empty() {
            folded.push(' ');
        }
        folded.push_str(line);
    }
    decode_jsx_entities(&folded)
}

/// Decode HTML entities into UTF-16 code units. Unknown entities pass
/// through literally, matching how browsers treat them in practice.
fn decode_jsx_entities(text: &str) -> Vec<u16> {
    let mut out: Vec<u16> = Vec::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        for ch in rest[..amp].chars() {
            push_utf16(&mut out, ch as u32);
        }
        rest = &rest[amp..];

        let Some(semi) = rest.find(';') else {
            break;
        };
        let entity = &rest[1..semi];
        let decoded: Option<u32> = if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
            u32::from_str_radix(hex, 16).ok()
        } else if let Some(dec) = entity.strip_prefix('#') {
            dec.parse().ok()
        } else {
            named_entity(entity)
        };

        match decoded.filter(|&cp| cp <= 0x10FFFF) {
            Some(cp) => {
                push_utf16(&mut out, cp);
                rest = &rest[semi + 1..];
            }
            None => {
                push_utf16(&mut out, '&' as u32);
                rest = &rest[1..];
            }
        }
    }
    for ch in rest.chars() {
        push_utf16(&mut out, ch as u32);
    }
    out
}

fn named_entity(name: &str) -> Option<u32> {
    let cp = match name {
        "amp" => '&' as u32,
        "apos" => '\'' as u32,
        "copy" => 0x00A9,
        "gt" => '>' as u32,
        "lt" => '<' as u32,
        "nbsp" => 0x00A0,
        "quot" => '"' as u32,
        _ => return None,
    };
    Some(cp)
}

#[cfg(test)]
#[path = "tests/jsx_tests.rs"]
mod tests;
