//! Structured parse tracing: an indented, optionally colored log of each
//! traced parser's entry and exit — position, whether it consumed input,
//! whether it succeeded — written to stderr when the `debug` feature is
//! enabled.
//!
//! There is no `log`/`tracing` dependency anywhere in this crate: parser
//! tracing *is* its logging story.

#[cfg(feature = "debug")]
mod internals;

use crate::lib::std::fmt;
use crate::parser::{Outcome, Parser, State};

#[cfg(all(feature = "debug", not(feature = "std")))]
compile_error!("`debug` requires `std`");

/// Wrap `parser` so that, under the `debug` feature, every call it makes
/// logs its name, the position it started at, and whether it consumed
/// input and succeeded. Without `debug` this compiles away to `parser`
/// itself — `trace` is zero-cost when the feature is off.
#[cfg_attr(not(feature = "debug"), allow(unused_variables))]
pub fn trace<S, O, U>(
    name: impl fmt::Display,
    mut parser: impl Parser<S, O, U>,
) -> impl FnMut(State<S, U>) -> Outcome<S, O, U> {
    #[cfg(feature = "debug")]
    {
        let mut call_count = 0usize;
        move |state: State<S, U>| {
            let depth = internals::Depth::new();
            let position = state.position.clone();
            internals::start(*depth, &name, call_count, &position);

            let outcome = parser.parse(state);

            let severity = internals::Severity::classify(outcome.consumed, outcome.is_ok());
            internals::end(*depth, &name, call_count, severity);
            call_count += 1;

            outcome
        }
    }
    #[cfg(not(feature = "debug"))]
    {
        move |state: State<S, U>| parser.parse(state)
    }
}
