//! Regular expression scanning.
//!
//! The lexer cannot know on its own whether `/` starts a regular
//! expression or a division; the parser knows from grammar position and
//! calls [`Lexer::scan_regexp`] explicitly while the current token is a
//! `/` or `/=`.

use jolt_common::span::Span;
use jolt_common::utf::{EOF_SENTINEL, is_identifier_continue};
use smallvec::SmallVec;

use crate::lexer::Lexer;
use crate::tokens::T;

impl Lexer<'_> {
    /// Scan the rest of a regular expression literal. The raw text of the
    /// whole literal (including flags) is available via [`Lexer::raw`]
    /// afterwards.
    pub fn scan_regexp(&mut self) {
        if self.token != T::Slash && self.token != T::SlashEquals {
            self.expected(T::Slash);
        }
        // A `/=` token means the regexp body starts with '='; it was
        // already consumed and stays part of the raw text

        let mut in_class = false;
        loop {
            match self.code_point {
                0x2F if !in_class => {
                    // The closing '/'
                    self.step();
                    break;
                }
                0x5B => {
                    in_class = true;
                    self.step();
                }
                0x5D => {
                    // ']' inside a class only ends it when unescaped
                    in_class = false;
                    self.step();
                }
                0x5C => {
                    self.step();
                    match self.code_point {
                        EOF_SENTINEL | 0x0D | 0x0A | 0x2028 | 0x2029 => {
                            let span = Span::new(self.end as u32, self.end as u32);
                            self.add_error(span, "Unterminated regular expression".to_string());
                        }
                        _ => self.step(),
                    }
                }
                EOF_SENTINEL | 0x0D | 0x0A | 0x2028 | 0x2029 => {
                    let span = Span::new(self.end as u32, self.end as u32);
                    self.add_error(span, "Unterminated regular expression".to_string());
                }
                _ => self.step(),
            }
        }

        // Flags: d g i m s u v y, each at most once
        let mut seen: SmallVec<[(i32, Span); 8]> = SmallVec::new();
        while is_identifier_continue(self.code_point) {
            let flag_span = Span::new(self.end as u32, (self.end + 1) as u32);
            match self.code_point {
                0x64 | 0x67 | 0x69 | 0x6D | 0x73 | 0x75 | 0x76 | 0x79 => {
                    if let Some((_, first)) = seen.iter().find(|(cp, _)| *cp == self.code_point) {
                        let first = *first;
                        let flag = char::from_u32(self.code_point as u32).unwrap_or('?');
                        let note = self.note_at(
                            first,
                            format!("The first {flag:?} flag is here:"),
                        );
                        self.add_error_with_notes(
                            flag_span,
                            format!("Duplicate regular expression flag {flag:?}"),
                            vec![note],
                        );
                    }
                    seen.push((self.code_point, flag_span));
                }
                cp => {
                    let flag = char::from_u32(cp as u32).unwrap_or('?');
                    self.add_error(
                        flag_span,
                        format!("Invalid regular expression flag {flag:?}"),
                    );
                }
            }
            self.step();
        }
    }
}
