//! Character primitives: [`satisfy`], [`char_`],
//! [`string_`], the digit/letter classes, [`one_of`], [`none_of`].
//!
//! Every primitive here is built directly on [`token_prim`][crate::parser::token_prim]
//! or [`tokens`][crate::parser::tokens] — none of them reach into the stream
//! themselves.

use crate::lib::std::string::String;
use crate::lib::std::vec::Vec;

use crate::parser::{label, token_prim, tokens, Outcome, Parser, State};
use crate::position::Position;
use crate::stream::Stream;
use crate::trace::trace;

fn show_char(c: &char) -> String {
    format!("{c:?}")
}

fn advance_char(pos: &Position, ch: &char, tab_width: u32) -> Position {
    pos.advance(*ch, tab_width)
}

/// `satisfy(pred)`: consume one character for which `pred` holds.
pub fn satisfy<S, U>(mut pred: impl FnMut(char) -> bool) -> impl FnMut(State<S, U>) -> Outcome<S, char, U>
where
    S: Stream<Token = char>,
{
    trace(
        "satisfy",
        token_prim(show_char, advance_char, move |c: char| {
            if pred(c) {
                Some(c)
            } else {
                None
            }
        }),
    )
}

/// `char_(c)`: match exactly `c`, labelled with `c`'s own display form.
pub fn char_<S, U>(c: char) -> impl FnMut(State<S, U>) -> Outcome<S, char, U>
where
    S: Stream<Token = char>,
{
    trace("char_", label(satisfy(move |t| t == c), show_char(&c)))
}

/// `one_of(cs)`: consume one character that appears in `cs`.
pub fn one_of<S, U>(cs: impl Into<String>) -> impl FnMut(State<S, U>) -> Outcome<S, char, U>
where
    S: Stream<Token = char>,
{
    let set: String = cs.into();
    trace("one_of", satisfy(move |c| set.contains(c)))
}

/// `none_of(cs)`: consume one character that does *not* appear in `cs`.
pub fn none_of<S, U>(cs: impl Into<String>) -> impl FnMut(State<S, U>) -> Outcome<S, char, U>
where
    S: Stream<Token = char>,
{
    let set: String = cs.into();
    trace("none_of", satisfy(move |c| !set.contains(c)))
}

/// `string_(s)`: match a fixed character sequence, all-or-nothing on an
/// empty prefix (`tokens`). Commits as soon as one character has matched.
pub fn string_<S, U>(s: impl Into<String>) -> impl FnMut(State<S, U>) -> Outcome<S, String, U>
where
    S: Stream<Token = char>,
{
    let s: String = s.into();
    let expected: Vec<char> = s.chars().collect();
    let show = |toks: &[char]| -> String {
        let rendered: String = toks.iter().collect();
        format!("{rendered:?}")
    };
    let mut inner = tokens::<S, U>(show, advance_char, expected);
    trace("string_", move |state: State<S, U>| {
        let outcome = inner.parse(state);
        match outcome.result {
            Ok(success) => Outcome::ok(
                outcome.consumed,
                success.value.into_iter().collect(),
                success.state,
                success.error,
            ),
            Err(error) => Outcome::err(outcome.consumed, error),
        }
    })
}

/// `any_char`: consume any single character.
pub fn any_char<S, U>() -> impl FnMut(State<S, U>) -> Outcome<S, char, U>
where
    S: Stream<Token = char>,
{
    trace("any_char", satisfy(|_| true))
}

/// `digit_char`: an ASCII decimal digit, labelled `"digit"`.
pub fn digit_char<S, U>() -> impl FnMut(State<S, U>) -> Outcome<S, char, U>
where
    S: Stream<Token = char>,
{
    trace("digit_char", label(satisfy(|c: char| c.is_ascii_digit()), "digit"))
}

/// `hex_digit_char`: an ASCII hex digit, labelled `"hexadecimal digit"`.
pub fn hex_digit_char<S, U>() -> impl FnMut(State<S, U>) -> Outcome<S, char, U>
where
    S: Stream<Token = char>,
{
    trace(
        "hex_digit_char",
        label(satisfy(|c: char| c.is_ascii_hexdigit()), "hexadecimal digit"),
    )
}

/// `oct_digit_char`: an octal digit `0..=7`, labelled `"octal digit"`.
pub fn oct_digit_char<S, U>() -> impl FnMut(State<S, U>) -> Outcome<S, char, U>
where
    S: Stream<Token = char>,
{
    trace(
        "oct_digit_char",
        label(satisfy(|c: char| ('0'..='7').contains(&c)), "octal digit"),
    )
}

/// `letter_char`: a Unicode alphabetic character, labelled `"letter"`.
pub fn letter_char<S, U>() -> impl FnMut(State<S, U>) -> Outcome<S, char, U>
where
    S: Stream<Token = char>,
{
    trace("letter_char", label(satisfy(|c: char| c.is_alphabetic()), "letter"))
}

/// `alpha_num_char`: a Unicode alphanumeric character, labelled `"letter or digit"`.
pub fn alpha_num_char<S, U>() -> impl FnMut(State<S, U>) -> Outcome<S, char, U>
where
    S: Stream<Token = char>,
{
    trace(
        "alpha_num_char",
        label(satisfy(|c: char| c.is_alphanumeric()), "letter or digit"),
    )
}

/// `space_char`: a Unicode whitespace character, labelled `"space"`.
pub fn space_char<S, U>() -> impl FnMut(State<S, U>) -> Outcome<S, char, U>
where
    S: Stream<Token = char>,
{
    trace("space_char", label(satisfy(|c: char| c.is_whitespace()), "space"))
}

/// `upper_char`: a Unicode uppercase letter, labelled `"uppercase letter"`.
pub fn upper_char<S, U>() -> impl FnMut(State<S, U>) -> Outcome<S, char, U>
where
    S: Stream<Token = char>,
{
    trace(
        "upper_char",
        label(satisfy(|c: char| c.is_uppercase()), "uppercase letter"),
    )
}

/// `lower_char`: a Unicode lowercase letter, labelled `"lowercase letter"`.
pub fn lower_char<S, U>() -> impl FnMut(State<S, U>) -> Outcome<S, char, U>
where
    S: Stream<Token = char>,
{
    trace(
        "lower_char",
        label(satisfy(|c: char| c.is_lowercase()), "lowercase letter"),
    )
}

/// `eol`: matches `"\n"` or `"\r\n"`, trying the two-character form first so
/// that a lone `'\r'` is reported rather than silently swallowed.
pub fn eol<S, U>() -> impl FnMut(State<S, U>) -> Outcome<S, String, U>
where
    S: Stream<Token = char> + Clone,
    U: Clone,
{
    trace(
        "eol",
        crate::parser::alt(crate::parser::try_(string_("\r\n")), string_("\n")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::run;

    #[test]
    fn satisfy_consumes_matching_char() {
        let (v, _) = run(&mut satisfy(|c: char| c == 'a'), "t", (), "abc").unwrap();
        assert_eq!(v, 'a');
    }

    #[test]
    fn char_reports_its_own_label_on_mismatch() {
        let err = run(&mut char_('a'), "t", (), "b").unwrap_err();
        assert_eq!(err.render(), "t:1:1: unexpected 'b'\nexpecting 'a'");
    }

    #[test]
    fn one_of_and_none_of() {
        let (v, _) = run(&mut one_of("abc"), "t", (), "b").unwrap();
        assert_eq!(v, 'b');
        assert!(run(&mut one_of("abc"), "t", (), "x").is_err());
        let (v, _) = run(&mut none_of("abc"), "t", (), "x").unwrap();
        assert_eq!(v, 'x');
    }

    #[test]
    fn string_matches_whole_prefix_and_commits() {
        let (v, state) = run(&mut string_("let"), "t", (), "letrec").unwrap();
        assert_eq!(v, "let");
        assert_eq!(state.position.column(), 4);
    }

    #[test]
    fn alt_commits_to_the_first_matching_prefix() {
        // `alt(string("let"), string("letrec"))` on "letrec" commits to
        // "let" because it consumed input before succeeding;
        // `alt` never gets to try the second branch.
        let mut p = crate::parser::alt(string_("let"), string_("letrec"));
        let (v, state) = run(&mut p, "t", (), "letrec").unwrap();
        assert_eq!(v, "let");
        assert_eq!(state.position.column(), 4);
    }

    #[test]
    fn try_reopens_the_alternative_after_a_consumed_failure() {
        // Wrapping the first branch in `try_` lets `alt` fall through to
        // the second branch even though the first consumed input.
        let mut p = crate::parser::alt(crate::parser::try_(string_("letrec")), string_("let"));
        let (v, _) = run(&mut p, "t", (), "letrec").unwrap();
        assert_eq!(v, "letrec");
    }

    #[test]
    fn eol_matches_crlf_and_lf() {
        let (v, _) = run(&mut eol(), "t", (), "\r\nx").unwrap();
        assert_eq!(v, "\r\n");
        let (v, _) = run(&mut eol(), "t", (), "\nx").unwrap();
        assert_eq!(v, "\n");
    }

    #[test]
    fn digit_classes() {
        assert!(run(&mut digit_char(), "t", (), "5").is_ok());
        assert!(run(&mut hex_digit_char(), "t", (), "f").is_ok());
        assert!(run(&mut oct_digit_char(), "t", (), "8").is_err());
        assert!(run(&mut letter_char(), "t", (), "Z").is_ok());
        assert!(run(&mut alpha_num_char(), "t", (), "9").is_ok());
        assert!(run(&mut space_char(), "t", (), " ").is_ok());
        assert!(run(&mut upper_char(), "t", (), "A").is_ok());
        assert!(run(&mut lower_char(), "t", (), "a").is_ok());
    }
}
