//! Whitespace and comment skipping.
//!
//! Skips spaces plus whichever comment forms the `LanguageDef` enables,
//! nesting block comments when `nested_comments` is set.

use crate::combinator::char::{any_char, satisfy, string_};
use crate::combinator::multi::{skip_many, some};
use crate::error::{Message, ParseError};
use crate::parser::{Outcome, Parser, ParserExt, State};
use crate::stream::Stream;
use crate::trace::trace;

use super::Lexer;

impl Lexer {
    /// Skip zero or more of: a run of Unicode whitespace, a line comment,
    /// or a block comment.
    pub fn white_space<S, U>(&self) -> impl FnMut(State<S, U>) -> Outcome<S, (), U> + '_
    where
        S: Stream<Token = char> + Clone,
        U: Clone,
    {
        trace("white_space", skip_many(self.whitespace_unit()))
    }

    fn whitespace_unit<S, U>(&self) -> impl FnMut(State<S, U>) -> Outcome<S, (), U> + '_
    where
        S: Stream<Token = char> + Clone,
        U: Clone,
    {
        let space = some(satisfy::<S, U>(|c: char| c.is_whitespace())).value(());
        let line = self.line_comment();
        let block = self.block_comment();
        let mut p = crate::parser::alt(crate::parser::alt(space, line), block);
        trace("whitespace_unit", move |state: State<S, U>| p.parse(state))
    }

    fn line_comment<S, U>(&self) -> impl FnMut(State<S, U>) -> Outcome<S, (), U> + '_
    where
        S: Stream<Token = char> + Clone,
        U: Clone,
    {
        let enabled = !self.comment_line.is_empty();
        let prefix = self.comment_line.clone();
        trace("line_comment", move |state: State<S, U>| {
            if !enabled {
                return Outcome::err(
                    false,
                    ParseError::new_message(
                        state.position.clone(),
                        Message::Expected("line comment".into()),
                    ),
                );
            }
            let outcome = string_::<S, U>(prefix.clone()).parse(state);
            match outcome.result {
                Err(e) => Outcome::err(outcome.consumed, e),
                Ok(success) => {
                    let mut rest_of_line = skip_many(satisfy::<S, U>(|c: char| c != '\n'));
                    let line_outcome = rest_of_line.parse(success.state);
                    let consumed = outcome.consumed || line_outcome.consumed;
                    match line_outcome.result {
                        Ok(line_success) => Outcome::ok(
                            consumed,
                            (),
                            line_success.state,
                            success.error.merge(line_success.error),
                        ),
                        Err(e) => Outcome::err(consumed, success.error.merge(e)),
                    }
                }
            }
        })
    }

    fn block_comment<S, U>(&self) -> impl FnMut(State<S, U>) -> Outcome<S, (), U> + '_
    where
        S: Stream<Token = char> + Clone,
        U: Clone,
    {
        let enabled = !self.comment_start.is_empty();
        trace("block_comment", move |state: State<S, U>| {
            if !enabled {
                return Outcome::err(
                    false,
                    ParseError::new_message(
                        state.position.clone(),
                        Message::Expected("comment".into()),
                    ),
                );
            }
            let outcome = string_::<S, U>(self.comment_start.clone()).parse(state);
            let (mut consumed, mut error, mut rest) = match outcome.result {
                Err(e) => return Outcome::err(outcome.consumed, e),
                Ok(success) => (outcome.consumed, success.error, success.state),
            };
            let mut depth = 1usize;
            loop {
                let end_outcome = string_::<S, U>(self.comment_end.clone()).parse(rest.clone());
                if let Ok(end_success) = end_outcome.result {
                    consumed = consumed || end_outcome.consumed;
                    error = error.merge(end_success.error);
                    rest = end_success.state;
                    depth -= 1;
                    if depth == 0 {
                        return Outcome::ok(consumed, (), rest, error);
                    }
                    continue;
                }

                if self.nested_comments {
                    let nest_outcome =
                        string_::<S, U>(self.comment_start.clone()).parse(rest.clone());
                    if let Ok(nest_success) = nest_outcome.result {
                        consumed = consumed || nest_outcome.consumed;
                        error = error.merge(nest_success.error);
                        rest = nest_success.state;
                        depth += 1;
                        continue;
                    }
                }

                let any_outcome = any_char::<S, U>().parse(rest.clone());
                match any_outcome.result {
                    Ok(any_success) => {
                        consumed = true;
                        error = error.merge(any_success.error);
                        rest = any_success.state;
                    }
                    Err(_) => {
                        let eof_error = ParseError::new_message(
                            rest.position.clone(),
                            Message::Expected(format!("end of comment ({:?})", self.comment_end)),
                        );
                        return Outcome::err(true, error.merge(eof_error));
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::LanguageDef;
    use super::*;
    use crate::lib::std::rc::Rc;
    use crate::parser::run;

    fn lexer(nested: bool) -> Lexer {
        Lexer::new(LanguageDef {
            comment_start: "/*".into(),
            comment_end: "*/".into(),
            comment_line: "//".into(),
            nested_comments: nested,
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
    fn skips_spaces_and_line_comments() {
        let lexer = lexer(true);
        let (_, state) = run(&mut lexer.white_space::<&str, ()>(), "t", (), "  // hi\nx").unwrap();
        assert_eq!(state.input, "x");
    }

    #[test]
    fn skips_nested_block_comments() {
        let lexer = lexer(true);
        let (_, state) = run(
            &mut lexer.white_space::<&str, ()>(),
            "t",
            (),
            "/* outer /* inner */ still outer */x",
        )
        .unwrap();
        assert_eq!(state.input, "x");
    }

    #[test]
    fn non_nesting_comments_close_at_first_end_marker() {
        let lexer = lexer(false);
        let (_, state) = run(
            &mut lexer.white_space::<&str, ()>(),
            "t",
            (),
            "/* a */ b",
        )
        .unwrap();
        assert_eq!(state.input, "b");
    }

    #[test]
    fn unterminated_block_comment_is_an_error() {
        let lexer = lexer(true);
        assert!(run(&mut lexer.white_space::<&str, ()>(), "t", (), "/* never closes").is_err());
    }
}
