//! The primitive parser abstraction: `State`, the
//! four-outcome [`Outcome`], the [`Parser`] trait, and the primitives built
//! directly on top of it (`pure`, `fail`, `bind`, `alt`, `try_`,
//! `look_ahead`, `label`, `hidden`, `token_prim`, `tokens`,
//! `not_followed_by`, `eof`, the state/position accessors, and [`run`]).
//!
//! The central invariant is the *consumed vs. empty* distinction recorded
//! on every [`Outcome`]: [`alt`] only tries its second branch when the
//! first returned empty, which is what gives this engine predictive,
//! LL(1)-flavored parsing without explicit lookahead tokens. [`try_`] is
//! the only primitive that can turn a consumed failure back into an empty
//! one, and is therefore the one source of unbounded backtracking.

use crate::error::{Message, ParseError};
use crate::lib::std::string::{String, ToString};
use crate::position::{Position, DEFAULT_TAB_WIDTH};
use crate::stream::Stream;
use crate::trace::trace;

mod ext;
pub use ext::ParserExt;

/// The stream, position, user state, and tab width threaded through a parse.
///
/// `user_state` is a caller-chosen value threaded unchanged except by
/// [`get_state`]/[`put_state`]/[`modify_state`].
#[derive(Debug, Clone)]
pub struct State<S, U> {
    /// The not-yet-consumed remainder of the input.
    pub input: S,
    /// The position of `input`'s first token.
    pub position: Position,
    /// Caller-chosen state threaded through the parse unchanged.
    pub user: U,
    /// The tab width used when advancing `position` past a `'\t'`.
    pub tab_width: u32,
}

impl<S, U> State<S, U> {
    /// The initial state for a fresh parse: position `(source_name, 1, 1)`.
    pub fn new(source_name: impl Into<String>, user: U, input: S) -> Self {
        Self {
            input,
            position: Position::new(source_name),
            user,
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}

/// A successful parse: the produced value, the resulting state, and a
/// "hidden" error accumulator.
///
/// The accumulator is not an error that occurred — it is the merged set of
/// expectations gathered on the way to this success, kept around so that
/// [`bind`] can fold it into a later, sibling failure (this is how Parsec
/// preserves expectation messages even through a `p >>= f` whose `p` half
/// succeeded but whose `f` half failed empty).
#[derive(Debug, Clone)]
pub struct Success<S, O, U> {
    /// The parsed value.
    pub value: O,
    /// The state after parsing.
    pub state: State<S, U>,
    /// Accumulated expectation messages from this parse's successful branch.
    pub error: ParseError,
}

/// The result of running a [`Parser`]: whether it consumed input, and
/// whether it succeeded or failed.
///
/// A tagged-result representation of the four-continuation dispatch, chosen
/// to avoid a closure allocation per primitive call; the four outcomes are
/// `(consumed, Ok(_))`, `(consumed, Err(_))`, `(!consumed, Ok(_))`,
/// `(!consumed, Err(_))`.
#[derive(Debug, Clone)]
pub struct Outcome<S, O, U> {
    /// Whether at least one token was consumed from the input.
    pub consumed: bool,
    /// The parse's value or error.
    pub result: Result<Success<S, O, U>, ParseError>,
}

impl<S, O, U> Outcome<S, O, U> {
    /// Build a `Consumed-Ok`/`Empty-Ok` outcome.
    pub fn ok(consumed: bool, value: O, state: State<S, U>, error: ParseError) -> Self {
        Self {
            consumed,
            result: Ok(Success { value, state, error }),
        }
    }

    /// Build a `Consumed-Error`/`Empty-Error` outcome.
    pub fn err(consumed: bool, error: ParseError) -> Self {
        Self {
            consumed,
            result: Err(error),
        }
    }

    /// `true` for the `Consumed-Ok`/`Empty-Ok` outcomes.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// The error carried by this outcome, whether it is a hard failure or
    /// just the hidden accumulator of a success.
    pub fn error(&self) -> &ParseError {
        match &self.result {
            Ok(success) => &success.error,
            Err(error) => error,
        }
    }
}

/// All parsers implement this trait: running one against a [`State`]
/// produces an [`Outcome`].
pub trait Parser<S, O, U = ()> {
    /// Run this parser against `state`.
    fn parse(&mut self, state: State<S, U>) -> Outcome<S, O, U>;
}

impl<S, O, U, F> Parser<S, O, U> for F
where
    F: FnMut(State<S, U>) -> Outcome<S, O, U>,
{
    fn parse(&mut self, state: State<S, U>) -> Outcome<S, O, U> {
        (self)(state)
    }
}


/// Run `parser` over `input`, from the start of a source named `source_name`,
/// threading `user_state` through.
///
/// Returns the parsed value and the final state for `Consumed-Ok`/`Empty-Ok`,
/// or the [`ParseError`] for `Consumed-Error`/`Empty-Error`.
pub fn run<S, O, U>(
    parser: &mut impl Parser<S, O, U>,
    source_name: impl Into<String>,
    user_state: U,
    input: S,
) -> Result<(O, State<S, U>), ParseError> {
    let state = State::new(source_name, user_state, input);
    match parser.parse(state).result {
        Ok(success) => Ok((success.value, success.state)),
        Err(error) => Err(error),
    }
}

/// `return(x)`: succeeds without consuming input.
pub fn pure<S, O: Clone, U>(value: O) -> impl FnMut(State<S, U>) -> Outcome<S, O, U> {
    trace("pure", move |state: State<S, U>| {
        let error = ParseError::unknown(state.position.clone());
        Outcome::ok(false, value.clone(), state, error)
    })
}

/// `fail(msg)`: fails without consuming input, with a free-form message.
pub fn fail<S, O, U>(message: impl Into<String>) -> impl FnMut(State<S, U>) -> Outcome<S, O, U> {
    let message = message.into();
    trace("fail", move |state: State<S, U>| {
        let error =
            ParseError::new_message(state.position.clone(), Message::Message(message.clone()));
        Outcome::err(false, error)
    })
}

/// `bind(p, f)`: sequence `p` then `f(value)`, propagating "consumed" and
/// merging `p`'s hidden error accumulator into whatever `f` produces.
pub fn bind<S, O1, O2, U, P1, F, P2>(
    mut p: P1,
    mut f: F,
) -> impl FnMut(State<S, U>) -> Outcome<S, O2, U>
where
    P1: Parser<S, O1, U>,
    F: FnMut(O1) -> P2,
    P2: Parser<S, O2, U>,
{
    trace("bind", move |state: State<S, U>| {
        let outcome = p.parse(state);
        match outcome.result {
            Err(error) => Outcome {
                consumed: outcome.consumed,
                result: Err(error),
            },
            Ok(success) => {
                let mut next = f(success.value);
                let next_outcome = next.parse(success.state);
                let consumed = outcome.consumed || next_outcome.consumed;
                match next_outcome.result {
                    Ok(next_success) => Outcome::ok(
                        consumed,
                        next_success.value,
                        next_success.state,
                        success.error.merge(next_success.error),
                    ),
                    Err(error) => Outcome::err(consumed, success.error.merge(error)),
                }
            }
        }
    })
}

/// `alt(p, q)` (`<|>`): try `p`; only try `q` if `p` returned an *empty*
/// outcome (success or failure). Any consumed outcome from `p` is final —
/// this is the commit rule that makes alternation predictive.
pub fn alt<S: Clone, O, U: Clone>(
    mut p: impl Parser<S, O, U>,
    mut q: impl Parser<S, O, U>,
) -> impl FnMut(State<S, U>) -> Outcome<S, O, U> {
    trace("alt", move |state: State<S, U>| {
        let snapshot = state.clone();
        let outcome = p.parse(state);
        if outcome.consumed {
            return outcome;
        }
        match outcome.result {
            Ok(_) => outcome,
            Err(e1) => {
                let outcome2 = q.parse(snapshot);
                match outcome2.result {
                    Ok(success) => Outcome::ok(
                        outcome2.consumed,
                        success.value,
                        success.state,
                        e1.merge(success.error),
                    ),
                    Err(e2) => Outcome::err(outcome2.consumed, e1.merge(e2)),
                }
            }
        }
    })
}

/// `try_(p)`: run `p`; if it fails after consuming input, rewind the state
/// and report an *empty* failure instead. Successes pass through unchanged.
/// This is the only primitive that can undo a commit, and is therefore the
/// sole source of unbounded backtracking.
pub fn try_<S: Clone, O, U: Clone>(
    mut p: impl Parser<S, O, U>,
) -> impl FnMut(State<S, U>) -> Outcome<S, O, U> {
    trace("try_", move |state: State<S, U>| {
        let outcome = p.parse(state);
        match outcome.result {
            Ok(_) => outcome,
            Err(error) => Outcome::err(false, error),
        }
    })
}

/// `look_ahead(p)`: run `p`; on success, rewind to the pre-`p` state and
/// report an empty success carrying `p`'s value. On failure, the failure
/// (and its consumed flag) passes through unchanged.
pub fn look_ahead<S: Clone, O, U: Clone>(
    mut p: impl Parser<S, O, U>,
) -> impl FnMut(State<S, U>) -> Outcome<S, O, U> {
    trace("look_ahead", move |state: State<S, U>| {
        let snapshot = state.clone();
        let outcome = p.parse(state);
        match outcome.result {
            Ok(success) => Outcome::ok(false, success.value, snapshot, success.error),
            Err(_) => outcome,
        }
    })
}

/// `label(p, name)` (`<?>`): replace the `Expected` messages of `p`'s
/// *empty* outcomes with a single `Expected(name)`. Consumed outcomes are
/// untouched — once input is consumed, the low-level expectation is more
/// informative than the user-level label.
pub fn label<S, O, U>(
    mut p: impl Parser<S, O, U>,
    name: impl Into<String>,
) -> impl FnMut(State<S, U>) -> Outcome<S, O, U> {
    let name = name.into();
    trace("label", move |state: State<S, U>| {
        let outcome = p.parse(state);
        if outcome.consumed {
            return outcome;
        }
        let relabel = |error: ParseError| {
            error
                .clear_expected()
                .add_message(Message::Expected(name.clone()))
        };
        match outcome.result {
            Ok(success) => Outcome::ok(
                false,
                success.value,
                success.state,
                relabel(success.error),
            ),
            Err(error) => Outcome::err(false, relabel(error)),
        }
    })
}

/// `hidden(p)`: like `label(p, "")` but removes `Expected` entirely on
/// empty outcomes, rather than replacing it with an empty label.
pub fn hidden<S, O, U>(mut p: impl Parser<S, O, U>) -> impl FnMut(State<S, U>) -> Outcome<S, O, U> {
    trace("hidden", move |state: State<S, U>| {
        let outcome = p.parse(state);
        if outcome.consumed {
            return outcome;
        }
        match outcome.result {
            Ok(success) => Outcome::ok(
                false,
                success.value,
                success.state,
                success.error.clear_expected(),
            ),
            Err(error) => Outcome::err(false, error.clear_expected()),
        }
    })
}

/// `token_prim(show_tok, next_pos, match)`: the atomic token consumer all
/// character/token primitives are built from. Peeks one token; `None` from
/// `match_token` is an empty failure, `Some(v)` is a consumed success with
/// the position advanced by `next_pos`.
pub fn token_prim<S, O, U>(
    mut show_tok: impl FnMut(&S::Token) -> String,
    mut next_pos: impl FnMut(&Position, &S::Token, u32) -> Position,
    mut match_token: impl FnMut(S::Token) -> Option<O>,
) -> impl FnMut(State<S, U>) -> Outcome<S, O, U>
where
    S: Stream,
{
    trace("token_prim", move |state: State<S, U>| {
        match state.input.clone().uncons() {
            None => Outcome::err(
                false,
                ParseError::new_message(
                    state.position.clone(),
                    Message::Unexpected("end of input".to_string()),
                ),
            ),
            Some((tok, rest)) => match match_token(tok.clone()) {
                Some(value) => {
                    let position = next_pos(&state.position, &tok, state.tab_width);
                    let new_state = State {
                        input: rest,
                        position: position.clone(),
                        user: state.user,
                        tab_width: state.tab_width,
                    };
                    Outcome::ok(true, value, new_state, ParseError::unknown(position))
                }
                None => Outcome::err(
                    false,
                    ParseError::new_message(
                        state.position.clone(),
                        Message::Unexpected(show_tok(&tok)),
                    ),
                ),
            },
        }
    })
}

/// `tokens(show, next_pos, expected)`: match a fixed sequence of tokens
/// (used for [`string_`][crate::combinator::char::string_]). A mismatch at
/// offset 0 is an empty failure; a mismatch after some tokens matched is a
/// consumed failure, since a prefix was already committed to.
pub fn tokens<S, U>(
    show: impl Fn(&[S::Token]) -> String,
    mut next_pos: impl FnMut(&Position, &S::Token, u32) -> Position,
    expected: crate::lib::std::vec::Vec<S::Token>,
) -> impl FnMut(State<S, U>) -> Outcome<S, crate::lib::std::vec::Vec<S::Token>, U>
where
    S: Stream,
    S::Token: PartialEq,
{
    trace("tokens", move |state: State<S, U>| {
        let mut input = state.input.clone();
        let mut position = state.position.clone();
        let mut matched = crate::lib::std::vec::Vec::with_capacity(expected.len());
        for (i, want) in expected.iter().enumerate() {
            match input.clone().uncons() {
                Some((tok, rest)) if tok == *want => {
                    position = next_pos(&position, &tok, state.tab_width);
                    matched.push(tok);
                    input = rest;
                }
                got => {
                    let unexpected = match got {
                        Some((tok, _)) => show(core::slice::from_ref(&tok)),
                        None => "end of input".to_string(),
                    };
                    let error = ParseError::new_message(
                        state.position.clone(),
                        Message::Unexpected(unexpected),
                    )
                    .add_message(Message::Expected(show(&expected)));
                    return Outcome::err(i > 0, error);
                }
            }
        }
        let new_state = State {
            input,
            position: position.clone(),
            user: state.user,
            tab_width: state.tab_width,
        };
        Outcome::ok(
            !expected.is_empty(),
            matched,
            new_state,
            ParseError::unknown(position),
        )
    })
}

/// `not_followed_by(p)`: succeed (empty, no value) only if `p` would fail;
/// fail (empty) if `p` would succeed. Whichever way `p` goes, the state is
/// rewound to the snapshot taken before running it.
pub fn not_followed_by<S: Clone, O, U: Clone>(
    mut p: impl Parser<S, O, U>,
) -> impl FnMut(State<S, U>) -> Outcome<S, (), U> {
    trace("not_followed_by", move |state: State<S, U>| {
        let snapshot = state.clone();
        let outcome = p.parse(state);
        match outcome.result {
            Ok(_) => Outcome::err(
                false,
                ParseError::new_message(
                    snapshot.position.clone(),
                    Message::Unexpected("that token".to_string()),
                ),
            ),
            Err(_) => {
                let pos = snapshot.position.clone();
                Outcome::ok(false, (), snapshot, ParseError::unknown(pos))
            }
        }
    })
}

/// `eof`: succeeds (empty) at the end of input; otherwise fails (empty)
/// with the token actually found plus `expected("end of input")`.
pub fn eof<S, U>() -> impl FnMut(State<S, U>) -> Outcome<S, (), U>
where
    S: Stream + Clone,
    S::Token: crate::lib::std::fmt::Debug,
{
    trace("eof", move |state: State<S, U>| match state.input.clone().uncons() {
        None => {
            let pos = state.position.clone();
            Outcome::ok(false, (), state, ParseError::unknown(pos))
        }
        Some((tok, _)) => {
            let error = ParseError::new_message(
                state.position.clone(),
                Message::Unexpected(format!("{tok:?}")),
            )
            .add_message(Message::Expected("end of input".to_string()));
            Outcome::err(false, error)
        }
    })
}

/// `get_state`: read the current user state (empty).
pub fn get_state<S, U: Clone>() -> impl FnMut(State<S, U>) -> Outcome<S, U, U> {
    trace("get_state", move |state: State<S, U>| {
        let value = state.user.clone();
        let pos = state.position.clone();
        Outcome::ok(false, value, state, ParseError::unknown(pos))
    })
}

/// `put_state`: replace the user state (empty).
pub fn put_state<S, U: Clone>(new_user: U) -> impl FnMut(State<S, U>) -> Outcome<S, (), U> {
    trace("put_state", move |mut state: State<S, U>| {
        state.user = new_user.clone();
        let pos = state.position.clone();
        Outcome::ok(false, (), state, ParseError::unknown(pos))
    })
}

/// `modify_state`: update the user state with `f` (empty).
pub fn modify_state<S, U>(
    mut f: impl FnMut(U) -> U,
) -> impl FnMut(State<S, U>) -> Outcome<S, (), U> {
    trace("modify_state", move |mut state: State<S, U>| {
        state.user = f(state.user);
        let pos = state.position.clone();
        Outcome::ok(false, (), state, ParseError::unknown(pos))
    })
}

/// `get_position`: read the current position (empty).
pub fn get_position<S, U>() -> impl FnMut(State<S, U>) -> Outcome<S, Position, U> {
    trace("get_position", move |state: State<S, U>| {
        let value = state.position.clone();
        let pos = state.position.clone();
        Outcome::ok(false, value, state, ParseError::unknown(pos))
    })
}

/// `set_position`: overwrite the current position (empty).
pub fn set_position<S, U>(
    new_position: Position,
) -> impl FnMut(State<S, U>) -> Outcome<S, (), U> {
    trace("set_position", move |mut state: State<S, U>| {
        state.position = new_position.clone();
        Outcome::ok(false, (), state, ParseError::unknown(new_position.clone()))
    })
}

/// `get_input`: read the current remaining stream (empty).
pub fn get_input<S: Clone, U>() -> impl FnMut(State<S, U>) -> Outcome<S, S, U> {
    trace("get_input", move |state: State<S, U>| {
        let value = state.input.clone();
        let pos = state.position.clone();
        Outcome::ok(false, value, state, ParseError::unknown(pos))
    })
}

/// `set_input`: overwrite the current remaining stream (empty).
pub fn set_input<S, U>(new_input: S) -> impl FnMut(State<S, U>) -> Outcome<S, (), U>
where
    S: Clone,
{
    trace("set_input", move |mut state: State<S, U>| {
        state.input = new_input.clone();
        let pos = state.position.clone();
        Outcome::ok(false, (), state, ParseError::unknown(pos))
    })
}
