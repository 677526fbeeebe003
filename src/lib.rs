//! # `parsec`, predictive parsing with Parsec-quality errors
//!
//! `parsec` is a monadic parser-combinator engine in the Parsec lineage. A
//! grammar is described by composing small parsers over a stream of tokens;
//! running one produces either a structured value or a precise, mergeable
//! [`ParseError`][error::ParseError].
//!
//! The engine is built around one discipline: every primitive reports not
//! just success/failure but whether it *consumed* input before reaching that
//! outcome (see [`Outcome`][parser::Outcome]). [`alt`][parser::alt] only
//! tries its second branch when the first returned empty — this gives
//! predictive, LL(1)-flavored parsing without explicit lookahead tokens,
//! while [`try_`][combinator::multi::try_] remains the one escape hatch for
//! unbounded backtracking.
//!
//! ## Example
//!
//! ```rust
//! use parsec::prelude::*;
//! use parsec::combinator::char::digit_char;
//! use parsec::combinator::multi::many;
//!
//! let mut digits = many(digit_char());
//! let (value, _state) = parsec::run(&mut digits, "src", (), "123abc").unwrap();
//! assert_eq!(value, vec!['1', '2', '3']);
//! ```
//!
//! ## Layered design
//!
//! | Module | Responsibility |
//! |---|---|
//! | [`position`] | Source position tracking, tab-aware column advance |
//! | [`error`] | `ParseError` representation, classification, and the merge algebra |
//! | [`stream`] | Uniform token-at-a-time view over byte/char sequences |
//! | [`parser`] | The `Parser` trait, `State`, and the four-outcome primitives |
//! | [`combinator::char`] | `satisfy`, `char_`, `string_`, digit classes, `one_of`, `none_of` |
//! | [`combinator::multi`] | `many`, `some`, `sep_by`, `between`, `choice`, `option`, ... |
//! | [`lexer`] | Builds a record of lexeme parsers from a [`LanguageDef`][lexer::LanguageDef] |
//!
//! File I/O, an expression-precedence parser, a permutation-parser
//! combinator, an operator-table module, and a CLI are explicitly out of
//! scope for this crate; they are collaborators that would sit on top of
//! [`run`].
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

#[cfg(feature = "alloc")]
#[cfg_attr(not(feature = "std"), macro_use)]
extern crate alloc;

/// `std` facade allowing `std`/`core`+`alloc` to be interchangeable.
///
/// Every module routes its `String`/`Vec`/`BTreeSet`/`Box` usage through
/// this facade rather than `std`/`alloc` directly, so the crate builds
/// under `--no-default-features --features alloc`.
pub mod lib {
    #[cfg(not(feature = "std"))]
    #[doc(hidden)]
    pub mod std {
        #[cfg(feature = "alloc")]
        pub use alloc::{borrow, boxed, collections, rc, string, vec};

        pub use core::{cell, cmp, convert, fmt, iter, mem, ops, option, result, slice, str};
    }

    #[cfg(feature = "std")]
    #[doc(hidden)]
    pub mod std {
        pub use std::{
            borrow, boxed, cell, cmp, collections, convert, fmt, hash, iter, mem, ops, option,
            rc, result, slice, str, string, vec,
        };
    }
}

pub mod position;
pub mod error;
pub mod stream;

pub mod parser;

pub mod combinator;
pub mod lexer;

pub mod trace;

pub use error::ParseError;
pub use parser::{run, Outcome, Parser, State};
pub use position::Position;

/// Core types available for glob import.
pub mod prelude {
    pub use crate::error::ParseError;
    pub use crate::parser::{Parser as _, ParserExt as _};
}
