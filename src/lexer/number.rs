//! Numeric literals: unsigned `decimal`, `hexadecimal`, `octal`;
//! `integer`/`integer'`; `float`/`float'`; and the disambiguating
//! `number`/`number'` that try `float` before falling back to `integer`
//! (`try` is required since e.g. `"12"` is a valid prefix of `"12.5"`).
//!
//! `signed`'s whitespace (see `DESIGN.md`) is resolved as: the sign sits
//! directly against the digits, and only the complete signed number's
//! trailing whitespace is skipped by `lexeme`.

use crate::combinator::char::{char_, digit_char, hex_digit_char, oct_digit_char};
use crate::combinator::multi::{option, some};
use crate::error::{Message, ParseError};
use crate::lib::std::string::String;
use crate::lib::std::vec::Vec;
use crate::parser::{alt, bind, try_, Outcome, Parser, ParserExt, State};
use crate::stream::Stream;
use crate::trace::trace;

use super::Lexer;

/// The value `number`/`Lexer::number` produces: whichever branch of
/// `try(float) <|> integer` matched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// An integer literal: no decimal point, no exponent.
    Integer(u64),
    /// A literal with a decimal point and/or an exponent.
    Float(f64),
}

/// The signed counterpart of [`Number`], produced by `Lexer::number_signed`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SignedNumber {
    /// A signed integer literal.
    Integer(i64),
    /// A signed floating-point literal.
    Float(f64),
}

impl Lexer {
    /// `decimal`: one or more `0..9`, read as an unsigned integer.
    pub fn decimal<'a, S, U>(&'a self) -> impl FnMut(State<S, U>) -> Outcome<S, u64, U> + 'a
    where
        S: Stream<Token = char> + Clone,
        U: Clone,
    {
        trace("decimal", self.lexeme(raw_decimal()))
    }

    /// `hexadecimal`: `0[xX]` then one or more hex digits.
    pub fn hexadecimal<'a, S, U>(&'a self) -> impl FnMut(State<S, U>) -> Outcome<S, u64, U> + 'a
    where
        S: Stream<Token = char> + Clone,
        U: Clone,
    {
        trace("hexadecimal", self.lexeme(raw_hexadecimal()))
    }

    /// `octal`: `0[oO]` then one or more octal digits.
    pub fn octal<'a, S, U>(&'a self) -> impl FnMut(State<S, U>) -> Outcome<S, u64, U> + 'a
    where
        S: Stream<Token = char> + Clone,
        U: Clone,
    {
        trace("octal", self.lexeme(raw_octal()))
    }

    /// `integer = decimal`.
    pub fn integer<'a, S, U>(&'a self) -> impl FnMut(State<S, U>) -> Outcome<S, u64, U> + 'a
    where
        S: Stream<Token = char> + Clone,
        U: Clone,
    {
        trace("integer", self.decimal())
    }

    /// `integer'`: `integer` with an optional leading sign adjacent to the digits.
    pub fn integer_signed<'a, S, U>(&'a self) -> impl FnMut(State<S, U>) -> Outcome<S, i64, U> + 'a
    where
        S: Stream<Token = char> + Clone,
        U: Clone,
    {
        trace("integer_signed", self.lexeme(raw_signed_integer()))
    }

    /// `float`: `digits '.' digits [exponent]` or `digits exponent`.
    pub fn float<'a, S, U>(&'a self) -> impl FnMut(State<S, U>) -> Outcome<S, f64, U> + 'a
    where
        S: Stream<Token = char> + Clone,
        U: Clone,
    {
        trace("float", self.lexeme(raw_float()))
    }

    /// `float'`: `float` with an optional leading sign adjacent to the digits.
    pub fn float_signed<'a, S, U>(&'a self) -> impl FnMut(State<S, U>) -> Outcome<S, f64, U> + 'a
    where
        S: Stream<Token = char> + Clone,
        U: Clone,
    {
        trace("float_signed", self.lexeme(raw_signed_float()))
    }

    /// `number = try(float) <|> integer`.
    pub fn number<'a, S, U>(&'a self) -> impl FnMut(State<S, U>) -> Outcome<S, Number, U> + 'a
    where
        S: Stream<Token = char> + Clone,
        U: Clone,
    {
        trace(
            "number",
            self.lexeme(alt(
                try_(raw_float()).map(Number::Float),
                raw_decimal().map(Number::Integer),
            )),
        )
    }

    /// `number'`: `number` with an optional leading sign adjacent to the digits.
    pub fn number_signed<'a, S, U>(
        &'a self,
    ) -> impl FnMut(State<S, U>) -> Outcome<S, SignedNumber, U> + 'a
    where
        S: Stream<Token = char> + Clone,
        U: Clone,
    {
        trace(
            "number_signed",
            self.lexeme(alt(
                try_(raw_signed_float()).map(SignedNumber::Float),
                raw_signed_integer().map(SignedNumber::Integer),
            )),
        )
    }
}

fn digits_to_u64(digits: &[char]) -> u64 {
    digits.iter().fold(0u64, |acc, c| {
        acc.wrapping_mul(10)
            .wrapping_add(c.to_digit(10).expect("digit_char guarantees 0-9") as u64)
    })
}

fn raw_decimal<S, U>() -> impl FnMut(State<S, U>) -> Outcome<S, u64, U>
where
    S: Stream<Token = char> + Clone,
    U: Clone,
{
    trace("raw_decimal", some(digit_char()).map(|ds: Vec<char>| digits_to_u64(&ds)))
}

fn raw_hexadecimal<S, U>() -> impl FnMut(State<S, U>) -> Outcome<S, u64, U>
where
    S: Stream<Token = char> + Clone,
    U: Clone,
{
    trace("raw_hexadecimal", move |state: State<S, U>| {
        let zero = char_('0').parse(state);
        let consumed0 = zero.consumed;
        let zero_success = match zero.result {
            Err(e) => return Outcome::err(consumed0, e),
            Ok(s) => s,
        };

        let marker = alt(char_('x'), char_('X')).parse(zero_success.state);
        let consumed1 = consumed0 || marker.consumed;
        let marker_success = match marker.result {
            Err(e) => return Outcome::err(consumed1, zero_success.error.merge(e)),
            Ok(s) => s,
        };

        let digits = some(hex_digit_char()).parse(marker_success.state);
        let consumed2 = consumed1 || digits.consumed;
        match digits.result {
            Err(e) => Outcome::err(consumed2, marker_success.error.merge(e)),
            Ok(success) => {
                let value = success.value.iter().fold(0u64, |acc, c| {
                    acc.wrapping_mul(16) + c.to_digit(16).expect("hex_digit_char guarantees 0-9a-fA-F") as u64
                });
                Outcome::ok(consumed2, value, success.state, marker_success.error.merge(success.error))
            }
        }
    })
}

fn raw_octal<S, U>() -> impl FnMut(State<S, U>) -> Outcome<S, u64, U>
where
    S: Stream<Token = char> + Clone,
    U: Clone,
{
    trace("raw_octal", move |state: State<S, U>| {
        let zero = char_('0').parse(state);
        let consumed0 = zero.consumed;
        let zero_success = match zero.result {
            Err(e) => return Outcome::err(consumed0, e),
            Ok(s) => s,
        };

        let marker = alt(char_('o'), char_('O')).parse(zero_success.state);
        let consumed1 = consumed0 || marker.consumed;
        let marker_success = match marker.result {
            Err(e) => return Outcome::err(consumed1, zero_success.error.merge(e)),
            Ok(s) => s,
        };

        let digits = some(oct_digit_char()).parse(marker_success.state);
        let consumed2 = consumed1 || digits.consumed;
        match digits.result {
            Err(e) => Outcome::err(consumed2, marker_success.error.merge(e)),
            Ok(success) => {
                let value = success.value.iter().fold(0u64, |acc, c| {
                    acc.wrapping_mul(8) + c.to_digit(8).expect("oct_digit_char guarantees 0-7") as u64
                });
                Outcome::ok(consumed2, value, success.state, marker_success.error.merge(success.error))
            }
        }
    })
}

/// `+1`/`-1` for an optional leading sign, defaulting to `+1` when absent.
fn sign_factor<S, U>() -> impl FnMut(State<S, U>) -> Outcome<S, i64, U>
where
    S: Stream<Token = char> + Clone,
    U: Clone,
{
    trace(
        "sign_factor",
        option(1i64, alt(char_('-').value(-1i64), char_('+').value(1i64))),
    )
}

fn raw_signed_integer<S, U>() -> impl FnMut(State<S, U>) -> Outcome<S, i64, U>
where
    S: Stream<Token = char> + Clone,
    U: Clone,
{
    trace(
        "raw_signed_integer",
        bind(sign_factor(), |sign: i64| {
            raw_decimal().map(move |n: u64| sign * (n as i64))
        }),
    )
}

fn raw_signed_float<S, U>() -> impl FnMut(State<S, U>) -> Outcome<S, f64, U>
where
    S: Stream<Token = char> + Clone,
    U: Clone,
{
    trace(
        "raw_signed_float",
        bind(sign_factor(), |sign: i64| {
            raw_float().map(move |f: f64| sign as f64 * f)
        }),
    )
}

/// `[eE][+-]?digits`, rendered back out as e.g. `"e-2"` for `f64::parse`.
fn exponent_suffix<S, U>() -> impl FnMut(State<S, U>) -> Outcome<S, String, U>
where
    S: Stream<Token = char> + Clone,
    U: Clone,
{
    trace("exponent_suffix", move |state: State<S, U>| {
        let e = alt(char_('e'), char_('E')).parse(state);
        let consumed0 = e.consumed;
        let e_success = match e.result {
            Err(err) => return Outcome::err(consumed0, err),
            Ok(s) => s,
        };

        let sign = option('\0', alt(char_('+'), char_('-'))).parse(e_success.state);
        let consumed1 = consumed0 || sign.consumed;
        let sign_success = match sign.result {
            Err(err) => return Outcome::err(consumed1, e_success.error.merge(err)),
            Ok(s) => s,
        };

        let digits = some(digit_char()).parse(sign_success.state);
        let consumed2 = consumed1 || digits.consumed;
        match digits.result {
            Err(err) => Outcome::err(consumed2, sign_success.error.merge(err)),
            Ok(digits_success) => {
                let mut text = String::new();
                text.push('e');
                if sign_success.value != '\0' {
                    text.push(sign_success.value);
                }
                text.extend(digits_success.value.iter());
                Outcome::ok(
                    consumed2,
                    text,
                    digits_success.state,
                    sign_success.error.merge(digits_success.error),
                )
            }
        }
    })
}

fn finish_float<S, U>(
    text: String,
    consumed: bool,
    state: State<S, U>,
    error: ParseError,
) -> Outcome<S, f64, U> {
    match text.parse::<f64>() {
        Ok(value) => Outcome::ok(consumed, value, state, error),
        Err(_) => Outcome::err(
            consumed,
            ParseError::new_message(
                state.position.clone(),
                Message::Message("invalid float literal".into()),
            ),
        ),
    }
}

fn raw_float<S, U>() -> impl FnMut(State<S, U>) -> Outcome<S, f64, U>
where
    S: Stream<Token = char> + Clone,
    U: Clone,
{
    trace("raw_float", move |state: State<S, U>| {
        let int_outcome = some(digit_char()).parse(state);
        let consumed0 = int_outcome.consumed;
        let int_success = match int_outcome.result {
            Err(e) => return Outcome::err(consumed0, e),
            Ok(s) => s,
        };

        let dot_outcome = char_('.').parse(int_success.state.clone());
        match dot_outcome.result {
            Ok(dot_success) => {
                let consumed1 = consumed0 || dot_outcome.consumed;
                let frac_outcome = some(digit_char()).parse(dot_success.state);
                let consumed2 = consumed1 || frac_outcome.consumed;
                match frac_outcome.result {
                    Err(e) => Outcome::err(
                        consumed2,
                        int_success.error.clone().merge(dot_success.error).merge(e),
                    ),
                    Ok(frac_success) => {
                        let prior_error = int_success
                            .error
                            .clone()
                            .merge(dot_success.error)
                            .merge(frac_success.error.clone());

                        let exp_outcome = exponent_suffix().parse(frac_success.state.clone());
                        match exp_outcome.result {
                            Ok(exp_success) => {
                                let consumed3 = consumed2 || exp_outcome.consumed;
                                let mut text = String::new();
                                text.extend(int_success.value.iter());
                                text.push('.');
                                text.extend(frac_success.value.iter());
                                text.push_str(&exp_success.value);
                                finish_float(text, consumed3, exp_success.state, prior_error.merge(exp_success.error))
                            }
                            Err(e) if exp_outcome.consumed => Outcome::err(true, prior_error.merge(e)),
                            Err(_) => {
                                let mut text = String::new();
                                text.extend(int_success.value.iter());
                                text.push('.');
                                text.extend(frac_success.value.iter());
                                finish_float(text, consumed2, frac_success.state, prior_error)
                            }
                        }
                    }
                }
            }
            Err(_) => {
                let exp_outcome = exponent_suffix().parse(int_success.state);
                let consumed1 = consumed0 || exp_outcome.consumed;
                match exp_outcome.result {
                    Err(e) => Outcome::err(consumed1, int_success.error.merge(e)),
                    Ok(exp_success) => {
                        let mut text = String::new();
                        text.extend(int_success.value.iter());
                        text.push_str(&exp_success.value);
                        finish_float(
                            text,
                            consumed1,
                            exp_success.state,
                            int_success.error.merge(exp_success.error),
                        )
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::super::LanguageDef;
    use super::*;
    use crate::lib::std::rc::Rc;
    use crate::parser::run;

    fn lexer() -> Lexer {
        Lexer::new(LanguageDef {
            comment_start: "".into(),
            comment_end: "".into(),
            comment_line: "".into(),
            nested_comments: false,
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
    fn decimal_reads_an_unsigned_integer() {
        let lexer = lexer();
        let (v, _) = run(&mut lexer.decimal::<&str, ()>(), "t", (), "123 x").unwrap();
        assert_eq!(v, 123);
    }

    #[test]
    fn hexadecimal_and_octal_require_their_prefix() {
        let lexer = lexer();
        let (v, _) = run(&mut lexer.hexadecimal::<&str, ()>(), "t", (), "0xFF").unwrap();
        assert_eq!(v, 255);
        let (v, _) = run(&mut lexer.octal::<&str, ()>(), "t", (), "0o17").unwrap();
        assert_eq!(v, 15);
    }

    #[test]
    fn integer_signed_keeps_sign_adjacent_to_digits() {
        let lexer = lexer();
        let (v, _) = run(&mut lexer.integer_signed::<&str, ()>(), "t", (), "-42").unwrap();
        assert_eq!(v, -42);
        let (v, _) = run(&mut lexer.integer_signed::<&str, ()>(), "t", (), "42").unwrap();
        assert_eq!(v, 42);
    }

    #[test]
    fn float_parses_fraction_and_exponent_forms() {
        let lexer = lexer();
        let (v, _) = run(&mut lexer.float::<&str, ()>(), "t", (), "3.14e-2").unwrap();
        assert!((v - 0.0314).abs() < 1e-12);

        let (v, _) = run(&mut lexer.float::<&str, ()>(), "t", (), "2e10").unwrap();
        assert_eq!(v, 2e10);
    }

    #[test]
    fn float_requires_a_digit_after_the_dot() {
        // "3." is a parse error.
        let lexer = lexer();
        assert!(run(&mut lexer.float::<&str, ()>(), "t", (), "3.").is_err());
    }

    #[test]
    fn number_disambiguates_integer_from_float_via_try() {
        let lexer = lexer();
        let (v, state) = run(&mut lexer.number::<&str, ()>(), "t", (), "12").unwrap();
        assert_eq!(v, Number::Integer(12));
        assert_eq!(state.input, "");

        let (v, _) = run(&mut lexer.number::<&str, ()>(), "t", (), "12.5").unwrap();
        assert_eq!(v, Number::Float(12.5));
    }

    #[test]
    fn number_signed_applies_the_sign_to_either_branch() {
        let lexer = lexer();
        let (v, _) = run(&mut lexer.number_signed::<&str, ()>(), "t", (), "-12.5").unwrap();
        assert_eq!(v, SignedNumber::Float(-12.5));
        let (v, _) = run(&mut lexer.number_signed::<&str, ()>(), "t", (), "-12").unwrap();
        assert_eq!(v, SignedNumber::Integer(-12));
    }
}
