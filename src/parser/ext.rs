//! Fluent sugar over the free-function primitives in [`super`].
//!
//! `bind`/`alt`/... are free functions; this module adds winnow-style method
//! chaining on top (`winnow`'s `combinator/core.rs` defines
//! `Map`/`FlatMap`/`Value` the same way) without introducing any new
//! semantics — each method here is a thin named-struct wrapper over the
//! corresponding primitive.

use crate::lib::std::marker::PhantomData;

use super::{Outcome, Parser, State};

/// `.map(f)`: transform a successful value, leaving consumed/empty and the
/// hidden error accumulator untouched.
pub struct Map<P, F, O1> {
    parser: P,
    f: F,
    _marker: PhantomData<fn() -> O1>,
}

impl<S, O1, O2, U, P, F> Parser<S, O2, U> for Map<P, F, O1>
where
    P: Parser<S, O1, U>,
    F: FnMut(O1) -> O2,
{
    fn parse(&mut self, state: State<S, U>) -> Outcome<S, O2, U> {
        let outcome = self.parser.parse(state);
        match outcome.result {
            Ok(success) => Outcome::ok(
                outcome.consumed,
                (self.f)(success.value),
                success.state,
                success.error,
            ),
            Err(error) => Outcome::err(outcome.consumed, error),
        }
    }
}

/// `.and_then(f)`: `bind` with method syntax — `f` receives the value and
/// returns the next parser to run.
pub struct AndThen<P, F, O1> {
    parser: P,
    f: F,
    _marker: PhantomData<fn() -> O1>,
}

impl<S, O1, O2, U, P, F, P2> Parser<S, O2, U> for AndThen<P, F, O1>
where
    P: Parser<S, O1, U>,
    F: FnMut(O1) -> P2,
    P2: Parser<S, O2, U>,
{
    fn parse(&mut self, state: State<S, U>) -> Outcome<S, O2, U> {
        super::bind(&mut self.parser, &mut self.f).parse(state)
    }
}

/// `.value(v)`: discard the parsed value, replacing it with a fixed `v`.
pub struct Value<P, O1, O2> {
    parser: P,
    value: O2,
    _marker: PhantomData<fn() -> O1>,
}

impl<S, O1, O2: Clone, U, P> Parser<S, O2, U> for Value<P, O1, O2>
where
    P: Parser<S, O1, U>,
{
    fn parse(&mut self, state: State<S, U>) -> Outcome<S, O2, U> {
        let outcome = self.parser.parse(state);
        match outcome.result {
            Ok(success) => Outcome::ok(
                outcome.consumed,
                self.value.clone(),
                success.state,
                success.error,
            ),
            Err(error) => Outcome::err(outcome.consumed, error),
        }
    }
}

/// Extension methods available on every [`Parser`].
pub trait ParserExt<S, O, U>: Parser<S, O, U> + Sized {
    /// Map the parsed value through `f`.
    fn map<O2, F>(self, f: F) -> Map<Self, F, O>
    where
        F: FnMut(O) -> O2,
    {
        Map {
            parser: self,
            f,
            _marker: PhantomData,
        }
    }

    /// Sequence this parser with `f(value)`, Parsec's `bind`/`>>=`.
    fn and_then<O2, P2, F>(self, f: F) -> AndThen<Self, F, O>
    where
        P2: Parser<S, O2, U>,
        F: FnMut(O) -> P2,
    {
        AndThen {
            parser: self,
            f,
            _marker: PhantomData,
        }
    }

    /// Replace a successful value with a fixed `value`.
    fn value<O2: Clone>(self, value: O2) -> Value<Self, O, O2> {
        Value {
            parser: self,
            value,
            _marker: PhantomData,
        }
    }
}

impl<S, O, U, P: Parser<S, O, U>> ParserExt<S, O, U> for P {}
