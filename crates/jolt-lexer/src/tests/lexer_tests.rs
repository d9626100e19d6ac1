use super::*;
use jolt_common::diagnostics::Log;
use jolt_common::source::Source;

fn tokens_of(src: &str) -> Vec<T> {
    let log = Log::new();
    let source = Source::for_testing(0, "test.js", src);
    let mut lexer = Lexer::new(&log, &source);
    let mut out = Vec::new();
    while lexer.token != T::EndOfFile {
        out.push(lexer.token);
        lexer.next();
    }
    out
}

fn first_error(src: &str) -> String {
    let log = Log::new();
    let source = Source::for_testing(0, "test.js", src);
    let result = catch_lexer_panic(|| {
        let mut lexer = Lexer::new(&log, &source);
        while lexer.token != T::EndOfFile {
            lexer.next();
        }
    });
    assert!(result.is_err(), "expected a lexer error for {src:?}");
    let msgs = log.take_msgs();
    assert!(!msgs.is_empty(), "error was raised but nothing was logged");
    msgs[0].data.text.clone()
}

#[test]
fn punctuation_tokens() {
    assert_eq!(
        tokens_of("( ) [ ] { } , : ; @ ~"),
        vec![
            T::OpenParen,
            T::CloseParen,
            T::OpenBracket,
            T::CloseBracket,
            T::OpenBrace,
            T::CloseBrace,
            T::Comma,
            T::Colon,
            T::Semicolon,
            T::At,
            T::Tilde,
        ]
    );
}

#[test]
fn operators_take_longest_match() {
    assert_eq!(
        tokens_of("= == === => ! != !== < <= << <<="),
        vec![
            T::Equals,
            T::EqualsEquals,
            T::EqualsEqualsEquals,
            T::EqualsGreaterThan,
            T::Exclamation,
            T::ExclamationEquals,
            T::ExclamationEqualsEquals,
            T::LessThan,
            T::LessThanEquals,
            T::LessThanLessThan,
            T::LessThanLessThanEquals,
        ]
    );
    assert_eq!(
        tokens_of("> >= >> >>= >>> >>>="),
        vec![
            T::GreaterThan,
            T::GreaterThanEquals,
            T::GreaterThanGreaterThan,
            T::GreaterThanGreaterThanEquals,
            T::GreaterThanGreaterThanGreaterThan,
            T::GreaterThanGreaterThanGreaterThanEquals,
        ]
    );
    assert_eq!(
        tokens_of("? ?? ??= ?. + ++ += - -- -= * ** *= **="),
        vec![
            T::Question,
            T::QuestionQuestion,
            T::QuestionQuestionEquals,
            T::QuestionDot,
            T::Plus,
            T::PlusPlus,
            T::PlusEquals,
            T::Minus,
            T::MinusMinus,
            T::MinusEquals,
            T::Asterisk,
            T::AsteriskAsterisk,
            T::AsteriskEquals,
            T::AsteriskAsteriskEquals,
        ]
    );
    assert_eq!(
        tokens_of("& && &= &&= | || |= ||= ^ ^= % %= / /="),
        vec![
            T::Ampersand,
            T::AmpersandAmpersand,
            T::AmpersandEquals,
            T::AmpersandAmpersandEquals,
            T::Bar,
            T::BarBar,
            T::BarEquals,
            T::BarBarEquals,
            T::Caret,
            T::CaretEquals,
            T::Percent,
            T::PercentEquals,
            T::Slash,
            T::SlashEquals,
        ]
    );
}

#[test]
fn question_dot_before_digit_is_conditional() {
    // "?.5" must lex as "?" then ".5" so "a ? .5 : 1" parses
    assert_eq!(
        tokens_of("a?.5:b"),
        vec![T::Identifier, T::Question, T::NumericLiteral, T::Colon, T::Identifier]
    );
}

#[test]
fn dots_and_spreads() {
    assert_eq!(tokens_of(". ... .5"), vec![T::Dot, T::DotDotDot, T::NumericLiteral]);
}

#[test]
fn keywords_and_identifiers() {
    let log = Log::new();
    let source = Source::for_testing(0, "test.js", "if foo instanceof");
    let mut lexer = Lexer::new(&log, &source);
    assert_eq!(lexer.token, T::If);
    lexer.next();
    assert_eq!(lexer.token, T::Identifier);
    assert_eq!(lexer.identifier_text(), "foo");
    assert!(!lexer.identifier_was_escaped());
    lexer.next();
    assert_eq!(lexer.token, T::Instanceof);
}

#[test]
fn unicode_identifiers() {
    let log = Log::new();
    let source = Source::for_testing(0, "test.js", "日本語 π $let _x");
    let mut lexer = Lexer::new(&log, &source);
    assert_eq!(lexer.identifier_text(), "日本語");
    lexer.next();
    assert_eq!(lexer.identifier_text(), "π");
    lexer.next();
    assert_eq!(lexer.identifier_text(), "$let");
    lexer.next();
    assert_eq!(lexer.identifier_text(), "_x");
}

#[test]
fn escaped_identifiers_are_decoded_and_owned() {
    let log = Log::new();
    let source = Source::for_testing(0, "test.js", "\\u0066oo \\u{1D400}");
    let mut lexer = Lexer::new(&log, &source);
    assert_eq!(lexer.token, T::Identifier);
    assert_eq!(lexer.identifier_text(), "foo");
    assert!(lexer.identifier_was_escaped());
    lexer.next();
    assert_eq!(lexer.identifier_text(), "𝐀");
}

#[test]
fn escaped_keyword_is_not_a_keyword_token() {
    // "if" spells "if" but must not lex as the keyword
    let log = Log::new();
    let source = Source::for_testing(0, "test.js", "\\u0069f");
    let lexer = Lexer::new(&log, &source);
    assert_eq!(lexer.token, T::EscapedKeyword);
    assert_eq!(lexer.identifier_text(), "if");
}

#[test]
fn escaped_text_must_be_a_valid_identifier() {
    let error = first_error("\\u0020");
    assert!(error.contains("Invalid identifier"), "{error}");
}

#[test]
fn private_identifiers() {
    let log = Log::new();
    let source = Source::for_testing(0, "test.js", "#field");
    let lexer = Lexer::new(&log, &source);
    assert_eq!(lexer.token, T::PrivateIdentifier);
    assert_eq!(lexer.identifier_text(), "#field");
}

#[test]
fn hashbang_is_skipped() {
    assert_eq!(tokens_of("#!/usr/bin/env node\nlet x"), vec![T::Identifier, T::Identifier]);
}

#[test]
fn newline_tracking_for_asi() {
    let log = Log::new();
    let source = Source::for_testing(0, "test.js", "a\nb c");
    let mut lexer = Lexer::new(&log, &source);
    assert!(lexer.has_newline_before); // start of file counts
    lexer.next();
    assert!(lexer.has_newline_before); // after the \n
    lexer.next();
    assert!(!lexer.has_newline_before);
}

#[test]
fn expect_or_insert_semicolon_applies_asi() {
    let log = Log::new();
    let source = Source::for_testing(0, "test.js", "a\nb");
    let mut lexer = Lexer::new(&log, &source);
    lexer.next(); // past "a"; newline before "b"
    lexer.expect_or_insert_semicolon();
    assert_eq!(lexer.token, T::Identifier);
    assert_eq!(lexer.raw(), "b");
}

#[test]
fn expect_less_than_splits_compound_tokens() {
    let log = Log::new();
    let source = Source::for_testing(0, "test.js", "<<=");
    let mut lexer = Lexer::new(&log, &source);
    assert_eq!(lexer.token, T::LessThanLessThanEquals);
    lexer.expect_less_than(false);
    assert_eq!(lexer.token, T::LessThanEquals);
    assert_eq!(lexer.raw(), "<=");
    lexer.expect_less_than(false);
    assert_eq!(lexer.token, T::Equals);
    assert_eq!(lexer.raw(), "=");
}

#[test]
fn expect_greater_than_splits_compound_tokens() {
    let log = Log::new();
    let source = Source::for_testing(0, "test.js", "x >>>= y");
    let mut lexer = Lexer::new(&log, &source);
    lexer.next(); // past "x"
    assert_eq!(lexer.token, T::GreaterThanGreaterThanGreaterThanEquals);
    lexer.expect_greater_than(false);
    assert_eq!(lexer.token, T::GreaterThanGreaterThanEquals);
    lexer.expect_greater_than(false);
    assert_eq!(lexer.token, T::GreaterThanEquals);
    lexer.expect_greater_than(false);
    assert_eq!(lexer.token, T::Equals);
}

#[test]
fn comments_are_skipped_and_flagged() {
    let log = Log::new();
    let source = Source::for_testing(0, "test.js", "a // one\n/* two */ b");
    let mut lexer = Lexer::new(&log, &source);
    assert!(!lexer.has_comment_before);
    lexer.next();
    assert!(lexer.has_comment_before);
    assert!(lexer.has_newline_before);
    assert_eq!(lexer.raw(), "b");
}

#[test]
fn block_comment_newline_counts_for_asi() {
    let log = Log::new();
    let source = Source::for_testing(0, "test.js", "a /* \n */ b");
    let mut lexer = Lexer::new(&log, &source);
    lexer.next();
    assert!(lexer.has_newline_before);
}

#[test]
fn unterminated_block_comment_is_an_error() {
    let error = first_error("/* never closed");
    assert!(error.contains("*/"), "{error}");
}

#[test]
fn pure_pragmas_are_detected() {
    let log = Log::new();
    let source = Source::for_testing(0, "test.js", "/* @__PURE__ */ f()");
    let lexer = Lexer::new(&log, &source);
    assert!(lexer.has_pure_comment_before);

    let source = Source::for_testing(0, "test.js", "//#__PURE__\ng()");
    let lexer = Lexer::new(&log, &source);
    assert!(lexer.has_pure_comment_before);

    let source = Source::for_testing(0, "test.js", "/* @__NO_SIDE_EFFECTS__ */ h()");
    let lexer = Lexer::new(&log, &source);
    assert!(lexer.has_no_side_effects_comment_before);
}

#[test]
fn pragma_flags_reset_on_next_token() {
    let log = Log::new();
    let source = Source::for_testing(0, "test.js", "/* @__PURE__ */ f g");
    let mut lexer = Lexer::new(&log, &source);
    assert!(lexer.has_pure_comment_before);
    lexer.next();
    assert!(!lexer.has_pure_comment_before);
}

#[test]
fn legal_comments_are_collected() {
    let log = Log::new();
    let source = Source::for_testing(0, "test.js", "//! keep me\n/* @license MIT */\n/* @preserve */ x");
    let lexer = Lexer::new(&log, &source);
    assert_eq!(lexer.legal_comments.len(), 3);
}

#[test]
fn source_mapping_url_is_recorded() {
    let log = Log::new();
    let source = Source::for_testing(0, "test.js", "x\n//# sourceMappingURL=out.js.map\n");
    let mut lexer = Lexer::new(&log, &source);
    lexer.next();
    let span = lexer.source_mapping_url.expect("url should be recorded");
    assert_eq!(span.slice(&source.contents), "out.js.map");
}

#[test]
fn jsx_pragmas_record_value_spans() {
    let log = Log::new();
    let source = Source::for_testing(0, "test.js", "/* @jsx h */\n/* @jsxFrag Fragment */ x");
    let lexer = Lexer::new(&log, &source);
    let factory = lexer.jsx_factory_pragma.expect("factory");
    assert_eq!(factory.slice(&source.contents), "h");
    let fragment = lexer.jsx_fragment_pragma.expect("fragment");
    assert_eq!(fragment.slice(&source.contents), "Fragment");
}

#[test]
fn regexp_scanning() {
    let log = Log::new();
    let source = Source::for_testing(0, "test.js", "/foo[/]bar/gim x");
    let mut lexer = Lexer::new(&log, &source);
    assert_eq!(lexer.token, T::Slash);
    lexer.scan_regexp();
    assert_eq!(lexer.raw(), "/foo[/]bar/gim");
    lexer.next();
    assert_eq!(lexer.raw(), "x");
}

#[test]
fn regexp_duplicate_flags_report_both_occurrences() {
    let log = Log::new();
    let source = Source::for_testing(0, "test.js", "/x/gg");
    let result = catch_lexer_panic(|| {
        let mut lexer = Lexer::new(&log, &source);
        lexer.scan_regexp();
    });
    assert!(result.is_err());
    let msgs = log.take_msgs();
    assert!(msgs[0].data.text.contains("Duplicate regular expression flag"));
    assert_eq!(msgs[0].notes.len(), 1);
}

#[test]
fn regexp_newline_is_an_error() {
    let log = Log::new();
    let source = Source::for_testing(0, "test.js", "/abc\ndef/");
    let result = catch_lexer_panic(|| {
        let mut lexer = Lexer::new(&log, &source);
        lexer.scan_regexp();
    });
    assert!(result.is_err());
}

#[test]
fn errors_at_one_location_are_logged_once() {
    let log = Log::new();
    let source = Source::for_testing(0, "test.js", "\u{0001}");
    for _ in 0..2 {
        let _ = catch_lexer_panic(|| {
            let _lexer = Lexer::new(&log, &source);
        });
    }
    // Two lexers, but deduplication happens in the shared log
    assert_eq!(log.take_msgs().len(), 1);
}

#[test]
fn bom_is_skipped() {
    assert_eq!(tokens_of("\u{FEFF}let"), vec![T::Identifier]);
}

#[test]
fn unexpected_character_is_a_syntax_error() {
    let error = first_error("¶");
    assert!(error.contains("Syntax error"), "{error}");
}
