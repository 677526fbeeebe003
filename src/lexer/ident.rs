//! Identifiers and reserved words.
//!
//! `identifier` is `lexeme(try(ident_start . many(ident_letter)))`, with a
//! post-hoc rejection of names that appear in the (pre-sorted,
//! case-folded) `reserved_names` list. `reserved(name)` is the mirror
//! image: match the literal text, then require it is *not* immediately
//! followed by another `ident_letter`, so `reserved("if")` does not
//! accidentally match the prefix of `ifElse`.

use crate::combinator::char::satisfy;
use crate::combinator::multi::{many, not_followed_by};
use crate::error::{Message, ParseError};
use crate::lib::std::string::{String, ToString};
use crate::parser::{try_, Outcome, Parser, State};
use crate::stream::Stream;
use crate::trace::trace;

use super::Lexer;

impl Lexer {
    /// `identifier`: an `ident_start` followed by zero or more
    /// `ident_letter`s, rejected if the result is a reserved name.
    pub fn identifier<'a, S, U>(&'a self) -> impl FnMut(State<S, U>) -> Outcome<S, String, U> + 'a
    where
        S: Stream<Token = char> + Clone,
        U: Clone,
    {
        trace(
            "identifier",
            self.lexeme(try_(move |state: State<S, U>| self.raw_identifier(state))),
        )
    }

    fn raw_identifier<S, U>(&self, state: State<S, U>) -> Outcome<S, String, U>
    where
        S: Stream<Token = char> + Clone,
        U: Clone,
    {
        let start = self.ident_start.clone();
        let first = satisfy::<S, U>(move |c| start(c)).parse(state);
        let consumed0 = first.consumed;
        let first_success = match first.result {
            Err(e) => return Outcome::err(consumed0, e),
            Ok(s) => s,
        };

        let letter = self.ident_letter.clone();
        let rest = many(satisfy::<S, U>(move |c| letter(c))).parse(first_success.state);
        let consumed1 = consumed0 || rest.consumed;
        match rest.result {
            Err(e) => Outcome::err(consumed1, first_success.error.merge(e)),
            Ok(rest_success) => {
                let mut name = String::new();
                name.push(first_success.value);
                name.extend(rest_success.value.iter());

                if self.is_reserved_name(&name) {
                    let error = ParseError::new_message(
                        rest_success.state.position.clone(),
                        Message::Unexpected(format!("reserved word {name:?}")),
                    );
                    Outcome::err(consumed1, error)
                } else {
                    Outcome::ok(
                        consumed1,
                        name,
                        rest_success.state,
                        first_success.error.merge(rest_success.error),
                    )
                }
            }
        }
    }

    /// `reserved(name) = lexeme(try(case_string(name) <* not_followed_by(ident_letter)))`.
    pub fn reserved<'a, S, U>(
        &'a self,
        name: impl Into<String>,
    ) -> impl FnMut(State<S, U>) -> Outcome<S, (), U> + 'a
    where
        S: Stream<Token = char> + Clone,
        U: Clone,
    {
        let name = name.into();
        let case_sensitive = self.case_sensitive;
        trace(
            "reserved",
            self.lexeme(try_(move |state: State<S, U>| {
                let matched = case_string::<S, U>(case_sensitive, name.clone()).parse(state);
                let consumed0 = matched.consumed;
                let success = match matched.result {
                    Err(e) => return Outcome::err(consumed0, e),
                    Ok(s) => s,
                };

                let letter = self.ident_letter.clone();
                let nfb =
                    not_followed_by(satisfy::<S, U>(move |c| letter(c))).parse(success.state);
                let consumed1 = consumed0 || nfb.consumed;
                match nfb.result {
                    Ok(nfb_success) => Outcome::ok(
                        consumed1,
                        (),
                        nfb_success.state,
                        success.error.merge(nfb_success.error),
                    ),
                    Err(e) => Outcome::err(consumed1, success.error.merge(e)),
                }
            })),
        )
    }
}

/// Match `expected` character by character, case-sensitively or folding
/// case per `case_sensitive`. The matched text retains `expected`'s own
/// casing rather than the input's.
fn case_string<S, U>(
    case_sensitive: bool,
    expected: String,
) -> impl FnMut(State<S, U>) -> Outcome<S, String, U>
where
    S: Stream<Token = char> + Clone,
    U: Clone,
{
    trace("case_string", move |state: State<S, U>| {
        let mut cur = state;
        let mut consumed = false;
        for want in expected.chars() {
            let step = satisfy::<S, U>(move |c| {
                if case_sensitive {
                    c == want
                } else {
                    c.to_lowercase().eq(want.to_lowercase())
                }
            })
            .parse(cur);
            match step.result {
                Ok(success) => {
                    consumed = true;
                    cur = success.state;
                }
                Err(e) => return Outcome::err(consumed, e),
            }
        }
        let pos = cur.position.clone();
        Outcome::ok(consumed, expected.to_string(), cur, ParseError::unknown(pos))
    })
}

#[cfg(test)]
mod tests {
    use super::super::LanguageDef;
    use super::*;
    use crate::lib::std::rc::Rc;
    use crate::parser::run;

    fn lexer(case_sensitive: bool) -> Lexer {
        Lexer::new(LanguageDef {
            comment_start: "".into(),
            comment_end: "".into(),
            comment_line: "".into(),
            nested_comments: false,
            ident_start: Rc::new(|c: char| c.is_alphabetic() || c == '_'),
            ident_letter: Rc::new(|c: char| c.is_alphanumeric() || c == '_'),
            op_start: Rc::new(|c: char| "+-".contains(c)),
            op_letter: Rc::new(|c: char| "+-".contains(c)),
            reserved_names: crate::lib::std::vec!["if".into(), "IF".into()],
            reserved_op_names: crate::lib::std::vec![],
            case_sensitive,
        })
    }

    #[test]
    fn identifier_parses_a_plain_name() {
        let lexer = lexer(true);
        let (v, state) = run(&mut lexer.identifier::<&str, ()>(), "t", (), "foo_1 bar").unwrap();
        assert_eq!(v, "foo_1");
        assert_eq!(state.input, "bar");
    }

    #[test]
    fn identifier_rejects_reserved_names() {
        let lexer = lexer(true);
        let err = run(&mut lexer.identifier::<&str, ()>(), "t", (), "if x").unwrap_err();
        assert!(err.render().contains("reserved word \"if\""));
    }

    #[test]
    fn identifier_case_folds_reserved_check() {
        // case_sensitive=false, reserved_names=["IF"]; "if" is rejected.
        let lexer = lexer(false);
        let err = run(&mut lexer.identifier::<&str, ()>(), "t", (), "if x").unwrap_err();
        assert!(err.render().contains("reserved word"));
    }

    #[test]
    fn reserved_matches_case_insensitively_when_configured() {
        // reserved("IF") on "If" succeeds when case_sensitive=false.
        let lexer = lexer(false);
        assert!(run(&mut lexer.reserved::<&str, ()>("IF"), "t", (), "If x").is_ok());
    }

    #[test]
    fn reserved_does_not_swallow_a_longer_identifier() {
        let lexer = lexer(true);
        assert!(run(&mut lexer.reserved::<&str, ()>("if"), "t", (), "ifElse").is_err());
    }
}
