//! Algebraic properties of the core combinators (bind/return monad laws,
//! the alternative laws, `try` idempotence, the commit invariant, and
//! position/error monotonicity).

use parsec::combinator::char::{char_, digit_char, string_};
use parsec::parser::{alt, bind, fail, pure, try_};
use parsec::run;
use parsec::ParseError;
use parsec::Position;
use proptest::prelude::*;

#[test]
fn left_identity_bind_return_f_equals_f() {
    let mut lhs = bind(pure(5), |x: i32| pure(x * 2));
    let mut rhs = pure(10);
    let (lv, ls) = run(&mut lhs, "t", (), "rest").unwrap();
    let (rv, rs) = run(&mut rhs, "t", (), "rest").unwrap();
    assert_eq!(lv, rv);
    assert_eq!(ls.input, rs.input);
}

#[test]
fn right_identity_bind_return_equals_p() {
    let mut lhs = bind(digit_char(), pure);
    let mut rhs = digit_char();
    let (lv, ls) = run(&mut lhs, "t", (), "7x").unwrap();
    let (rv, rs) = run(&mut rhs, "t", (), "7x").unwrap();
    assert_eq!(lv, rv);
    assert_eq!(ls.input, rs.input);
}

#[test]
fn bind_is_associative() {
    let f = |x: char| pure(x.to_ascii_uppercase());
    let g = |x: char| pure(format!("{x}!"));

    let mut lhs = bind(bind(digit_char(), f), g);
    let mut rhs = bind(digit_char(), move |x| bind(f(x), g));

    let (lv, _) = run(&mut lhs, "t", (), "5").unwrap();
    let (rv, _) = run(&mut rhs, "t", (), "5").unwrap();
    assert_eq!(lv, rv);
}

#[test]
fn alt_with_an_empty_failing_left_branch_falls_through() {
    let mut lhs = alt(fail::<&str, char, ()>("nope"), char_('a'));
    let mut rhs = char_('a');
    let (lv, ls) = run(&mut lhs, "t", (), "abc").unwrap();
    let (rv, rs) = run(&mut rhs, "t", (), "abc").unwrap();
    assert_eq!(lv, rv);
    assert_eq!(ls.input, rs.input);
}

#[test]
fn alt_with_an_empty_failing_right_branch_is_a_no_op() {
    let mut lhs = alt(char_('a'), fail::<&str, char, ()>("nope"));
    let mut rhs = char_('a');
    let (lv, ls) = run(&mut lhs, "t", (), "abc").unwrap();
    let (rv, rs) = run(&mut rhs, "t", (), "abc").unwrap();
    assert_eq!(lv, rv);
    assert_eq!(ls.input, rs.input);
}

#[test]
fn alt_is_associative() {
    let mut lhs = alt(alt(char_('a'), char_('b')), char_('c'));
    let mut rhs = alt(char_('a'), alt(char_('b'), char_('c')));
    for input in ["a", "b", "c"] {
        let (lv, _) = run(&mut lhs, "t", (), input).unwrap();
        let (rv, _) = run(&mut rhs, "t", (), input).unwrap();
        assert_eq!(lv, rv);
    }
    assert!(run(&mut lhs, "t", (), "d").is_err());
    assert!(run(&mut rhs, "t", (), "d").is_err());
}

#[test]
fn try_is_idempotent() {
    let mut once = try_(string_("letrec"));
    let mut twice = try_(try_(string_("letrec")));
    let once_err = run(&mut once, "t", (), "let").unwrap_err();
    let twice_err = run(&mut twice, "t", (), "let").unwrap_err();
    assert_eq!(once_err.render(), twice_err.render());
}

#[test]
fn consumed_outcome_commits_alt_to_the_first_branch() {
    // "letrec" makes `string("let")` consume, so `alt` never tries the
    // second branch even though the combined grammar would otherwise match.
    let mut grammar = alt(string_("let"), string_("le"));
    let (value, state) = run(&mut grammar, "t", (), "letrec").unwrap();
    assert_eq!(value, "let");
    assert_eq!(state.input, "rec");
}

#[test]
fn label_only_changes_empty_outcomes() {
    // Once `string("let")` has consumed a character, a later failure keeps
    // its low-level `Unexpected`/`Expected` messages rather than the label.
    let mut grammar = parsec::parser::label(string_("let"), "keyword");
    let err = run(&mut grammar, "t", (), "lexeme").unwrap_err();
    assert!(!err.render().contains("keyword"));

    let mut empty_failure = parsec::parser::label(char_('a'), "keyword");
    let err2 = run(&mut empty_failure, "t", (), "b").unwrap_err();
    assert!(err2.render().contains("keyword"));
}

proptest! {
    #[test]
    fn many_terminates_within_the_input_length(n in 0usize..200) {
        let input: String = "1".repeat(n);
        let mut p = parsec::combinator::multi::many(char_('1'));
        let (value, _) = run(&mut p, "t", (), input.as_str()).unwrap();
        prop_assert_eq!(value.len(), n);
    }

    #[test]
    fn merging_two_unknown_errors_keeps_the_further_position(a in 0u32..50, b in 0u32..50) {
        let pos_a = advance_columns(Position::new("t"), a);
        let pos_b = advance_columns(Position::new("t"), b);
        let merged = ParseError::unknown(pos_a.clone()).merge(ParseError::unknown(pos_b.clone()));
        let expected = if pos_a >= pos_b { pos_a } else { pos_b };
        prop_assert_eq!(merged.position().column(), expected.column());
    }
}

fn advance_columns(mut pos: Position, n: u32) -> Position {
    for _ in 0..n {
        pos = pos.advance('x', parsec::position::DEFAULT_TAB_WIDTH);
    }
    pos
}

#[test]
fn position_is_monotonic_after_a_successful_run() {
    let mut p = parsec::combinator::multi::many(digit_char());
    let start = Position::new("t");
    let (_, state) = run(&mut p, "t", (), "42").unwrap();
    assert!(state.position >= start);
}

#[test]
fn an_unlabelled_fail_message_is_preserved() {
    let mut p = fail::<&str, (), ()>("custom failure");
    let err = run(&mut p, "t", (), "").unwrap_err();
    assert_eq!(err.render(), "t:1:1: custom failure");
}
