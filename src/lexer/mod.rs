//! The lexer generator: build a record of lexeme parsers from a
//! declarative [`LanguageDef`].
//!
//! Every parser [`Lexer`] exposes skips its own trailing whitespace
//! (`lexeme`); [`Lexer::white_space`] is the shared definition of what
//! counts as whitespace — spaces plus whichever comment forms the
//! `LanguageDef` enables (see [`whitespace`]).
//!
//! `Lexer` is exposed as a set of methods on a builder rather than a
//! struct-of-parser-values record, which keeps dispatch monomorphic at
//! call sites without boxing every lexeme parser.
//!
//! `ident_start`/`ident_letter`/`op_start`/`op_letter` are modeled as
//! [`CharPredicate`] (`Rc<dyn Fn(char) -> bool>`) rather than arbitrary
//! sub-parsers: every realistic language definition passes a
//! `satisfy`-style predicate for these fields, and storing the predicate
//! directly lets [`identifier`][ident] and [`reserved`][ident] reuse the
//! same `ident_letter` test without cloning a boxed parser.

mod ident;
mod literal;
mod number;
mod operator;
mod whitespace;

pub use number::{Number, SignedNumber};

use crate::combinator::char::string_;
use crate::combinator::multi::{between, sep_by, sep_by1};
use crate::lib::std::rc::Rc;
use crate::lib::std::string::{String, ToString};
use crate::lib::std::vec::Vec;
use crate::parser::{Outcome, Parser, State};
use crate::stream::Stream;
use crate::trace::trace;

/// A boolean test over a single character, used for `ident_start`,
/// `ident_letter`, `op_start`, and `op_letter`.
pub type CharPredicate = Rc<dyn Fn(char) -> bool>;

/// The declarative description [`Lexer::new`] builds a lexer from.
pub struct LanguageDef {
    /// Opening delimiter of a block comment, or `""` to disable block
    /// comments entirely.
    pub comment_start: String,
    /// Closing delimiter of a block comment.
    pub comment_end: String,
    /// Prefix of a line comment, or `""` to disable line comments.
    pub comment_line: String,
    /// Whether block comments may nest.
    pub nested_comments: bool,
    /// First character of an identifier.
    pub ident_start: CharPredicate,
    /// Subsequent characters of an identifier.
    pub ident_letter: CharPredicate,
    /// First character of an operator.
    pub op_start: CharPredicate,
    /// Subsequent characters of an operator.
    pub op_letter: CharPredicate,
    /// Identifiers that `identifier` must reject as reserved words.
    pub reserved_names: Vec<String>,
    /// Operators that `operator` must reject as reserved operators.
    pub reserved_op_names: Vec<String>,
    /// Whether `reserved`/`identifier` matching folds case.
    pub case_sensitive: bool,
}

/// A record of lexeme parsers built from a [`LanguageDef`].
///
/// Each lexeme-producing method borrows `self` and returns a fresh,
/// independently runnable parser value; the same `Lexer` can therefore
/// back any number of concurrent parses (it holds no mutable state of its
/// own).
pub struct Lexer {
    comment_start: String,
    comment_end: String,
    comment_line: String,
    nested_comments: bool,
    ident_start: CharPredicate,
    ident_letter: CharPredicate,
    op_start: CharPredicate,
    op_letter: CharPredicate,
    reserved_names: Vec<String>,
    reserved_op_names: Vec<String>,
    case_sensitive: bool,
}

impl Lexer {
    /// Build a `Lexer` from a `LanguageDef`, pre-sorting (and, unless
    /// `case_sensitive`, case-folding) the reserved lists so `identifier`
    /// and `operator` can reject reserved words with a binary search
    /// rather than a linear scan.
    pub fn new(def: LanguageDef) -> Self {
        let mut reserved_names: Vec<String> = def
            .reserved_names
            .iter()
            .map(|name| fold_case(name, def.case_sensitive))
            .collect();
        reserved_names.sort();

        let mut reserved_op_names = def.reserved_op_names.clone();
        reserved_op_names.sort();

        Self {
            comment_start: def.comment_start,
            comment_end: def.comment_end,
            comment_line: def.comment_line,
            nested_comments: def.nested_comments,
            ident_start: def.ident_start,
            ident_letter: def.ident_letter,
            op_start: def.op_start,
            op_letter: def.op_letter,
            reserved_names,
            reserved_op_names,
            case_sensitive: def.case_sensitive,
        }
    }

    fn is_reserved_name(&self, name: &str) -> bool {
        let probe = fold_case(name, self.case_sensitive);
        self.reserved_names.binary_search(&probe).is_ok()
    }

    fn is_reserved_op(&self, name: &str) -> bool {
        self.reserved_op_names.binary_search(&name.to_string()).is_ok()
    }

    /// `lexeme(p) = p <* white_space`: run `p`, then discard any trailing
    /// whitespace/comments. Every other lexeme-producing method on `Lexer`
    /// is built on this one.
    pub fn lexeme<'a, S, O, U>(
        &'a self,
        mut p: impl Parser<S, O, U> + 'a,
    ) -> impl FnMut(State<S, U>) -> Outcome<S, O, U> + 'a
    where
        S: Stream<Token = char> + Clone,
        U: Clone,
    {
        trace("lexeme", move |state: State<S, U>| {
            let outcome = p.parse(state);
            let consumed = outcome.consumed;
            match outcome.result {
                Err(e) => Outcome::err(consumed, e),
                Ok(success) => {
                    let mut ws = self.white_space();
                    let ws_outcome = ws(success.state);
                    let consumed = consumed || ws_outcome.consumed;
                    match ws_outcome.result {
                        Ok(ws_success) => Outcome::ok(
                            consumed,
                            success.value,
                            ws_success.state,
                            success.error.merge(ws_success.error),
                        ),
                        Err(e) => Outcome::err(consumed, success.error.merge(e)),
                    }
                }
            }
        })
    }

    /// `symbol(s) = lexeme(string(s))`.
    pub fn symbol<'a, S, U>(
        &'a self,
        s: impl Into<String>,
    ) -> impl FnMut(State<S, U>) -> Outcome<S, String, U> + 'a
    where
        S: Stream<Token = char> + Clone,
        U: Clone,
    {
        trace("symbol", self.lexeme(string_(s)))
    }

    /// `parens(p) = between(symbol("("), symbol(")"), p)`.
    pub fn parens<'a, S, O, U>(
        &'a self,
        p: impl Parser<S, O, U> + 'a,
    ) -> impl FnMut(State<S, U>) -> Outcome<S, O, U> + 'a
    where
        S: Stream<Token = char> + Clone,
        U: Clone,
    {
        trace("parens", between(self.symbol("("), self.symbol(")"), p))
    }

    /// `braces(p) = between(symbol("{"), symbol("}"), p)`.
    pub fn braces<'a, S, O, U>(
        &'a self,
        p: impl Parser<S, O, U> + 'a,
    ) -> impl FnMut(State<S, U>) -> Outcome<S, O, U> + 'a
    where
        S: Stream<Token = char> + Clone,
        U: Clone,
    {
        trace("braces", between(self.symbol("{"), self.symbol("}"), p))
    }

    /// `angles(p) = between(symbol("<"), symbol(">"), p)`.
    pub fn angles<'a, S, O, U>(
        &'a self,
        p: impl Parser<S, O, U> + 'a,
    ) -> impl FnMut(State<S, U>) -> Outcome<S, O, U> + 'a
    where
        S: Stream<Token = char> + Clone,
        U: Clone,
    {
        trace("angles", between(self.symbol("<"), self.symbol(">"), p))
    }

    /// `brackets(p) = between(symbol("["), symbol("]"), p)`.
    pub fn brackets<'a, S, O, U>(
        &'a self,
        p: impl Parser<S, O, U> + 'a,
    ) -> impl FnMut(State<S, U>) -> Outcome<S, O, U> + 'a
    where
        S: Stream<Token = char> + Clone,
        U: Clone,
    {
        trace("brackets", between(self.symbol("["), self.symbol("]"), p))
    }

    /// `semicolon = symbol(";")`.
    pub fn semicolon<'a, S, U>(&'a self) -> impl FnMut(State<S, U>) -> Outcome<S, String, U> + 'a
    where
        S: Stream<Token = char> + Clone,
        U: Clone,
    {
        trace("semicolon", self.symbol(";"))
    }

    /// `comma = symbol(",")`.
    pub fn comma<'a, S, U>(&'a self) -> impl FnMut(State<S, U>) -> Outcome<S, String, U> + 'a
    where
        S: Stream<Token = char> + Clone,
        U: Clone,
    {
        trace("comma", self.symbol(","))
    }

    /// `colon = symbol(":")`.
    pub fn colon<'a, S, U>(&'a self) -> impl FnMut(State<S, U>) -> Outcome<S, String, U> + 'a
    where
        S: Stream<Token = char> + Clone,
        U: Clone,
    {
        trace("colon", self.symbol(":"))
    }

    /// `dot = symbol(".")`.
    pub fn dot<'a, S, U>(&'a self) -> impl FnMut(State<S, U>) -> Outcome<S, String, U> + 'a
    where
        S: Stream<Token = char> + Clone,
        U: Clone,
    {
        trace("dot", self.symbol("."))
    }

    /// `comma_sep(p) = sep_by(p, comma)`.
    pub fn comma_sep<'a, S, O, U>(
        &'a self,
        p: impl Parser<S, O, U> + 'a,
    ) -> impl FnMut(State<S, U>) -> Outcome<S, Vec<O>, U> + 'a
    where
        S: Stream<Token = char> + Clone,
        U: Clone,
    {
        trace("comma_sep", sep_by(p, self.comma()))
    }

    /// `comma_sep1(p) = sep_by1(p, comma)`.
    pub fn comma_sep1<'a, S, O, U>(
        &'a self,
        p: impl Parser<S, O, U> + 'a,
    ) -> impl FnMut(State<S, U>) -> Outcome<S, Vec<O>, U> + 'a
    where
        S: Stream<Token = char> + Clone,
        U: Clone,
    {
        trace("comma_sep1", sep_by1(p, self.comma()))
    }

    /// `semicolon_sep(p) = sep_by(p, semicolon)`.
    pub fn semicolon_sep<'a, S, O, U>(
        &'a self,
        p: impl Parser<S, O, U> + 'a,
    ) -> impl FnMut(State<S, U>) -> Outcome<S, Vec<O>, U> + 'a
    where
        S: Stream<Token = char> + Clone,
        U: Clone,
    {
        trace("semicolon_sep", sep_by(p, self.semicolon()))
    }

    /// `semicolon_sep1(p) = sep_by1(p, semicolon)`.
    pub fn semicolon_sep1<'a, S, O, U>(
        &'a self,
        p: impl Parser<S, O, U> + 'a,
    ) -> impl FnMut(State<S, U>) -> Outcome<S, Vec<O>, U> + 'a
    where
        S: Stream<Token = char> + Clone,
        U: Clone,
    {
        trace("semicolon_sep1", sep_by1(p, self.semicolon()))
    }
}

fn fold_case(name: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        name.to_string()
    } else {
        name.to_lowercase()
    }
}
