//! Character and string literals: escape handling shared between
//! `char_literal` and `string_literal`.
//!
//! A literal's body is either a direct character or, after a backslash,
//! one of four escape forms, tried in order: a single-letter mapping
//! (`\n`, `\t`, ...), a numeric code point (decimal, `\o`-octal, or
//! `\x`-hex), an ASCII mnemonic (`\BEL`, `\SOH`, ...), or a caret control
//! (`\^A`). String literals additionally allow the empty escape `\&` and
//! a whitespace "gap" `\ ...  \`, both of which contribute no character.

use crate::combinator::char::{digit_char, hex_digit_char, oct_digit_char, satisfy, string_};
use crate::combinator::multi::{many, some};
use crate::error::{Message, ParseError};
use crate::lib::std::string::String;
use crate::lib::std::vec::Vec;
use crate::parser::{alt, bind, label, pure, try_, Outcome, Parser, ParserExt, State};
use crate::stream::Stream;
use crate::trace::trace;

use super::Lexer;

impl Lexer {
    /// `char_literal`: `'` then one character-char then `'`.
    pub fn char_literal<'a, S, U>(&'a self) -> impl FnMut(State<S, U>) -> Outcome<S, char, U> + 'a
    where
        S: Stream<Token = char> + Clone,
        U: Clone,
    {
        trace("char_literal", self.lexeme(char_literal_body()))
    }

    /// `string_literal`: `"` then zero or more string-chars then `"`.
    pub fn string_literal<'a, S, U>(
        &'a self,
    ) -> impl FnMut(State<S, U>) -> Outcome<S, String, U> + 'a
    where
        S: Stream<Token = char> + Clone,
        U: Clone,
    {
        trace("string_literal", self.lexeme(string_literal_body()))
    }
}

fn char_literal_body<S, U>() -> impl FnMut(State<S, U>) -> Outcome<S, char, U>
where
    S: Stream<Token = char> + Clone,
    U: Clone,
{
    bind(crate::combinator::char::char_('\''), |_| {
        bind(char_char(), |c| {
            bind(crate::combinator::char::char_('\''), move |_| pure(c))
        })
    })
}

fn string_literal_body<S, U>() -> impl FnMut(State<S, U>) -> Outcome<S, String, U>
where
    S: Stream<Token = char> + Clone,
    U: Clone,
{
    bind(crate::combinator::char::char_('"'), |_| {
        bind(many(string_char()), |chars: Vec<Option<char>>| {
            bind(crate::combinator::char::char_('"'), move |_| {
                let text: String = chars.iter().flatten().collect();
                pure(text)
            })
        })
    })
}

/// A character-char: a direct character (not `'`, not `\`, code > 26) or
/// an escape after `\`.
fn char_char<S, U>() -> impl FnMut(State<S, U>) -> Outcome<S, char, U>
where
    S: Stream<Token = char> + Clone,
    U: Clone,
{
    trace(
        "char_char",
        alt(
            satisfy(|c: char| c != '\'' && c != '\\' && (c as u32) > 26),
            bind(crate::combinator::char::char_('\\'), |_| escape_code()),
        ),
    )
}

/// A string-char: a direct character (not `"`, not `\`, code > 26) or a
/// string-escape — `None` for the forms that contribute nothing.
fn string_char<S, U>() -> impl FnMut(State<S, U>) -> Outcome<S, Option<char>, U>
where
    S: Stream<Token = char> + Clone,
    U: Clone,
{
    trace(
        "string_char",
        alt(
            satisfy(|c: char| c != '"' && c != '\\' && (c as u32) > 26).map(Some),
            bind(crate::combinator::char::char_('\\'), |_| string_escape()),
        ),
    )
}

/// A string-escape: an escape code, the empty escape `\&`, or a
/// whitespace gap `\<whitespace>+\`.
fn string_escape<S, U>() -> impl FnMut(State<S, U>) -> Outcome<S, Option<char>, U>
where
    S: Stream<Token = char> + Clone,
    U: Clone,
{
    trace("string_escape", move |state: State<S, U>| {
        let empty = try_(crate::combinator::char::char_('&')).parse(state.clone());
        if let Ok(success) = empty.result {
            return Outcome::ok(true, None, success.state, success.error);
        }

        let gap = try_(bind(
            some(satisfy::<S, U>(|c: char| c.is_whitespace())),
            |_| crate::combinator::char::char_('\\'),
        ))
        .parse(state.clone());
        if let Ok(success) = gap.result {
            return Outcome::ok(true, None, success.state, success.error);
        }

        let code = escape_code().parse(state);
        match code.result {
            Ok(success) => Outcome::ok(code.consumed, Some(success.value), success.state, success.error),
            Err(e) => Outcome::err(code.consumed, e),
        }
    })
}

/// An escape code after the leading `\` has been consumed: a letter
/// mapping, a numeric code point, an ASCII mnemonic, or a caret control.
fn escape_code<S, U>() -> impl FnMut(State<S, U>) -> Outcome<S, char, U>
where
    S: Stream<Token = char> + Clone,
    U: Clone,
{
    trace(
        "escape_code",
        label(
            alt(
                alt(try_(letter_escape()), try_(numeric_escape())),
                alt(try_(ascii_mnemonic_escape()), caret_escape()),
            ),
            "escape code",
        ),
    )
}

fn letter_escape<S, U>() -> impl FnMut(State<S, U>) -> Outcome<S, char, U>
where
    S: Stream<Token = char> + Clone,
{
    trace(
        "letter_escape",
        satisfy(|c: char| "abfnrtv\\\"'".contains(c)).map(|c: char| match c {
            'a' => '\u{07}',
            'b' => '\u{08}',
            'f' => '\u{0C}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{0B}',
            '\\' => '\\',
            '"' => '"',
            '\'' => '\'',
            other => other,
        }),
    )
}

fn numeric_escape<S, U>() -> impl FnMut(State<S, U>) -> Outcome<S, char, U>
where
    S: Stream<Token = char> + Clone,
    U: Clone,
{
    trace("numeric_escape", move |state: State<S, U>| {
        let octal = try_(bind(crate::combinator::char::char_('o'), |_| {
            some(oct_digit_char())
        }))
        .parse(state.clone());
        if let Ok(success) = octal.result {
            return finish_escape_char(digits_radix(&success.value, 8), true, success.state, success.error);
        }

        let hex = try_(bind(crate::combinator::char::char_('x'), |_| {
            some(hex_digit_char())
        }))
        .parse(state.clone());
        if let Ok(success) = hex.result {
            return finish_escape_char(digits_radix(&success.value, 16), true, success.state, success.error);
        }

        let decimal = some(digit_char()).parse(state);
        match decimal.result {
            Ok(success) => finish_escape_char(
                digits_radix(&success.value, 10),
                decimal.consumed,
                success.state,
                success.error,
            ),
            Err(e) => Outcome::err(decimal.consumed, e),
        }
    })
}

fn digits_radix(digits: &[char], radix: u32) -> Option<u32> {
    digits.iter().try_fold(0u32, |acc, c| {
        let d = c.to_digit(radix)?;
        acc.checked_mul(radix)?.checked_add(d)
    })
}

fn finish_escape_char<S, U>(
    code: Option<u32>,
    consumed: bool,
    state: State<S, U>,
    error: ParseError,
) -> Outcome<S, char, U> {
    match code.and_then(char::from_u32) {
        Some(ch) => Outcome::ok(consumed, ch, state, error),
        None => Outcome::err(
            consumed,
            ParseError::new_message(
                state.position.clone(),
                Message::Message("invalid numeric escape".into()),
            ),
        ),
    }
}

/// Standard ASCII control-code mnemonics, in the canonical order that
/// resolves prefix ambiguity (`"SOH"` is tried before `"SO"`).
const ASCII_MNEMONICS: &[(&str, char)] = &[
    ("NUL", '\u{00}'),
    ("SOH", '\u{01}'),
    ("STX", '\u{02}'),
    ("ETX", '\u{03}'),
    ("EOT", '\u{04}'),
    ("ENQ", '\u{05}'),
    ("ACK", '\u{06}'),
    ("BEL", '\u{07}'),
    ("BS", '\u{08}'),
    ("HT", '\u{09}'),
    ("LF", '\u{0A}'),
    ("VT", '\u{0B}'),
    ("FF", '\u{0C}'),
    ("CR", '\u{0D}'),
    ("SO", '\u{0E}'),
    ("SI", '\u{0F}'),
    ("DLE", '\u{10}'),
    ("DC1", '\u{11}'),
    ("DC2", '\u{12}'),
    ("DC3", '\u{13}'),
    ("DC4", '\u{14}'),
    ("NAK", '\u{15}'),
    ("SYN", '\u{16}'),
    ("ETB", '\u{17}'),
    ("CAN", '\u{18}'),
    ("EM", '\u{19}'),
    ("SUB", '\u{1A}'),
    ("ESC", '\u{1B}'),
    ("FS", '\u{1C}'),
    ("GS", '\u{1D}'),
    ("RS", '\u{1E}'),
    ("US", '\u{1F}'),
    ("SP", '\u{20}'),
    ("DEL", '\u{7F}'),
];

fn ascii_mnemonic_escape<S, U>() -> impl FnMut(State<S, U>) -> Outcome<S, char, U>
where
    S: Stream<Token = char> + Clone,
    U: Clone,
{
    trace("ascii_mnemonic_escape", move |state: State<S, U>| {
        for (name, code) in ASCII_MNEMONICS {
            let attempt = try_(string_::<S, U>(*name)).parse(state.clone());
            if let Ok(success) = attempt.result {
                return Outcome::ok(true, *code, success.state, success.error);
            }
        }
        Outcome::err(
            false,
            ParseError::new_message(
                state.position.clone(),
                Message::Expected("ASCII mnemonic escape".into()),
            ),
        )
    })
}

fn caret_escape<S, U>() -> impl FnMut(State<S, U>) -> Outcome<S, char, U>
where
    S: Stream<Token = char> + Clone,
{
    trace("caret_escape", move |state: State<S, U>| {
        let caret = crate::combinator::char::char_('^').parse(state);
        let consumed0 = caret.consumed;
        let success = match caret.result {
            Err(e) => return Outcome::err(consumed0, e),
            Ok(s) => s,
        };

        let letter = satisfy::<S, U>(|c: char| c.is_ascii_uppercase()).parse(success.state);
        let consumed1 = consumed0 || letter.consumed;
        match letter.result {
            Err(e) => Outcome::err(consumed1, success.error.merge(e)),
            Ok(letter_success) => {
                let code = (letter_success.value as u32) - 64;
                let ch = char::from_u32(code).expect("uppercase letter minus 64 is a valid control code");
                Outcome::ok(
                    consumed1,
                    ch,
                    letter_success.state,
                    success.error.merge(letter_success.error),
                )
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::super::LanguageDef;
    use super::*;
    use crate::lib::std::rc::Rc;
    use crate::parser::run;

    fn lexer() -> Lexer {
        Lexer::new(LanguageDef {
            comment_start: "".into(),
            comment_end: "".into(),
            comment_line: "".into(),
            nested_comments: false,
            ident_start: Rc::new(|c: char| c.is_alphabetic()),
            ident_letter: Rc::new(|c: char| c.is_alphanumeric()),
            op_start: Rc::new(|c: char| "+-".contains(c)),
            op_letter: Rc::new(|c: char| "+-".contains(c)),
            reserved_names: crate::lib::std::vec![],
            reserved_op_names: crate::lib::std::vec![],
            case_sensitive: true,
        })
    }

    #[test]
    fn char_literal_parses_a_direct_character() {
        let lexer = lexer();
        let (v, _) = run(&mut lexer.char_literal::<&str, ()>(), "t", (), "'a' x").unwrap();
        assert_eq!(v, 'a');
    }

    #[test]
    fn char_literal_parses_letter_escapes() {
        let lexer = lexer();
        let (v, _) = run(&mut lexer.char_literal::<&str, ()>(), "t", (), "'\\n'").unwrap();
        assert_eq!(v, '\n');
    }

    #[test]
    fn char_literal_parses_numeric_escapes() {
        let lexer = lexer();
        let (v, _) = run(&mut lexer.char_literal::<&str, ()>(), "t", (), "'\\65'").unwrap();
        assert_eq!(v, 'A');
        let (v, _) = run(&mut lexer.char_literal::<&str, ()>(), "t", (), "'\\x41'").unwrap();
        assert_eq!(v, 'A');
        let (v, _) = run(&mut lexer.char_literal::<&str, ()>(), "t", (), "'\\o101'").unwrap();
        assert_eq!(v, 'A');
    }

    #[test]
    fn char_literal_parses_ascii_mnemonics_and_caret_controls() {
        let lexer = lexer();
        let (v, _) = run(&mut lexer.char_literal::<&str, ()>(), "t", (), "'\\BEL'").unwrap();
        assert_eq!(v, '\u{07}');
        let (v, _) = run(&mut lexer.char_literal::<&str, ()>(), "t", (), "'\\SOH'").unwrap();
        assert_eq!(v, '\u{01}');
        let (v, _) = run(&mut lexer.char_literal::<&str, ()>(), "t", (), "'\\^A'").unwrap();
        assert_eq!(v, '\u{01}');
    }

    #[test]
    fn string_literal_collects_mixed_direct_and_escaped_chars() {
        let lexer = lexer();
        let (v, _) = run(
            &mut lexer.string_literal::<&str, ()>(),
            "t",
            (),
            "\"ab\\ncd\"",
        )
        .unwrap();
        assert_eq!(v, "ab\ncd");
    }

    #[test]
    fn string_literal_empty_escape_contributes_nothing() {
        let lexer = lexer();
        let (v, _) = run(&mut lexer.string_literal::<&str, ()>(), "t", (), "\"a\\&b\"").unwrap();
        assert_eq!(v, "ab");
    }

    #[test]
    fn string_literal_gap_is_skipped() {
        let lexer = lexer();
        let (v, _) = run(
            &mut lexer.string_literal::<&str, ()>(),
            "t",
            (),
            "\"a\\   \\b\"",
        )
        .unwrap();
        assert_eq!(v, "ab");
    }
}
