//! The concrete end-to-end scenarios from the design notes (S1-S6):
//! `many`/commit/backtracking behavior, a labelled-error rendering, and a
//! case-insensitive lexer built from a `LanguageDef`.

use parsec::combinator::char::{char_, digit_char, string_};
use parsec::combinator::multi::many;
use parsec::lexer::{Lexer, LanguageDef};
use parsec::parser::{alt, label, try_};
use parsec::run;
use std::rc::Rc;

#[test]
fn s1_many_digits_stops_at_the_first_non_digit() {
    let (value, state) = run(&mut many(digit_char()), "s1", (), "123abc").unwrap();
    assert_eq!(value, vec!['1', '2', '3']);
    assert_eq!(state.position.column(), 4);
    assert_eq!(state.input, "abc");
}

#[test]
fn s2_alt_without_try_commits_to_the_first_matching_prefix() {
    // `string("let")` consumes "let" out of "letrec" and succeeds; since it
    // consumed input, alt never attempts the second branch.
    let mut grammar = alt(string_("let"), string_("letrec"));
    let (value, state) = run(&mut grammar, "s2", (), "letrec").unwrap();
    assert_eq!(value, "let");
    assert_eq!(state.input, "rec");
}

#[test]
fn s3_try_lets_a_failed_consumed_prefix_backtrack() {
    let mut grammar = alt(try_(string_("let")), string_("letrec"));
    let (value, state) = run(&mut grammar, "s3", (), "letrec").unwrap();
    assert_eq!(value, "let");
    assert_eq!(state.input, "rec");

    let mut grammar2 = alt(try_(string_("letrec")), string_("let"));
    let (value2, state2) = run(&mut grammar2, "s3", (), "letrec").unwrap();
    assert_eq!(value2, "letrec");
    assert_eq!(state2.input, "");
}

#[test]
fn s4_a_custom_label_replaces_the_expected_message() {
    let mut grammar = label(char_('a'), "A");
    let err = run(&mut grammar, "s4", (), "b").unwrap_err();
    assert_eq!(err.render(), "s4:1:1: unexpected 'b'\nexpecting A");
}

fn case_insensitive_lexer() -> Lexer {
    Lexer::new(LanguageDef {
        comment_start: "".into(),
        comment_end: "".into(),
        comment_line: "".into(),
        nested_comments: false,
        ident_start: Rc::new(|c: char| c.is_alphabetic()),
        ident_letter: Rc::new(|c: char| c.is_alphanumeric()),
        op_start: Rc::new(|c: char| "+-*/".contains(c)),
        op_letter: Rc::new(|c: char| "+-*/".contains(c)),
        reserved_names: vec!["IF".into()],
        reserved_op_names: vec![],
        case_sensitive: false,
    })
}

#[test]
fn s5_case_insensitive_reserved_words() {
    let lexer = case_insensitive_lexer();
    let err = run(&mut lexer.identifier::<&str, ()>(), "s5", (), "if x").unwrap_err();
    assert!(err.render().contains("reserved word \"if\""));

    let (_, state) = run(&mut lexer.reserved::<&str, ()>("IF"), "s5", (), "If").unwrap();
    assert_eq!(state.input, "");
}

#[test]
fn s6_float_parses_an_exponent_and_rejects_a_bare_dot() {
    let lexer = case_insensitive_lexer();
    let (value, _) = run(&mut lexer.float::<&str, ()>(), "s6", (), "3.14e-2").unwrap();
    assert!((value - 0.0314).abs() < 1e-12);

    assert!(run(&mut lexer.float::<&str, ()>(), "s6", (), "3.").is_err());
}
