//! Operators and reserved operators — the symmetric counterpart of
//! [`super::ident`]'s identifiers/reserved words, built from
//! `op_start`/`op_letter` instead of `ident_start`/`ident_letter`. Unlike
//! `reserved`, `reserved_op` always matches case-sensitively: the
//! `LanguageDef::case_sensitive` flag governs `reserved`/`identifier` only.

use crate::combinator::char::{satisfy, string_};
use crate::combinator::multi::{many, not_followed_by};
use crate::error::{Message, ParseError};
use crate::lib::std::string::String;
use crate::parser::{try_, Outcome, Parser, State};
use crate::stream::Stream;
use crate::trace::trace;

use super::Lexer;

impl Lexer {
    /// `operator`: an `op_start` followed by zero or more `op_letter`s,
    /// rejected if the result is a reserved operator.
    pub fn operator<'a, S, U>(&'a self) -> impl FnMut(State<S, U>) -> Outcome<S, String, U> + 'a
    where
        S: Stream<Token = char> + Clone,
        U: Clone,
    {
        trace(
            "operator",
            self.lexeme(try_(move |state: State<S, U>| self.raw_operator(state))),
        )
    }

    fn raw_operator<S, U>(&self, state: State<S, U>) -> Outcome<S, String, U>
    where
        S: Stream<Token = char> + Clone,
        U: Clone,
    {
        let start = self.op_start.clone();
        let first = satisfy::<S, U>(move |c| start(c)).parse(state);
        let consumed0 = first.consumed;
        let first_success = match first.result {
            Err(e) => return Outcome::err(consumed0, e),
            Ok(s) => s,
        };

        let letter = self.op_letter.clone();
        let rest = many(satisfy::<S, U>(move |c| letter(c))).parse(first_success.state);
        let consumed1 = consumed0 || rest.consumed;
        match rest.result {
            Err(e) => Outcome::err(consumed1, first_success.error.merge(e)),
            Ok(rest_success) => {
                let mut text = String::new();
                text.push(first_success.value);
                text.extend(rest_success.value.iter());

                if self.is_reserved_op(&text) {
                    let error = ParseError::new_message(
                        rest_success.state.position.clone(),
                        Message::Unexpected(format!("reserved operator {text:?}")),
                    );
                    Outcome::err(consumed1, error)
                } else {
                    Outcome::ok(
                        consumed1,
                        text,
                        rest_success.state,
                        first_success.error.merge(rest_success.error),
                    )
                }
            }
        }
    }

    /// `reserved_op(name) = lexeme(try(string(name) <* not_followed_by(op_letter)))`.
    pub fn reserved_op<'a, S, U>(
        &'a self,
        name: impl Into<String>,
    ) -> impl FnMut(State<S, U>) -> Outcome<S, (), U> + 'a
    where
        S: Stream<Token = char> + Clone,
        U: Clone,
    {
        let name = name.into();
        trace(
            "reserved_op",
            self.lexeme(try_(move |state: State<S, U>| {
                let matched = string_::<S, U>(name.clone()).parse(state);
                let consumed0 = matched.consumed;
                let success = match matched.result {
                    Err(e) => return Outcome::err(consumed0, e),
                    Ok(s) => s,
                };

                let letter = self.op_letter.clone();
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
