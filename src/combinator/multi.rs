//! Generic combinators: [`many`], [`some`], [`sep_by`]
//! and its `1`/`end_by`/`sep_end_by` relatives, [`between`], [`choice`],
//! [`option`], [`optional`], [`many_till`], [`count`], [`skip_many`],
//! [`skip_some`].
//!
//! [`try_`][crate::parser::try_], [`look_ahead`][crate::parser::look_ahead],
//! and [`not_followed_by`][crate::parser::not_followed_by] are primitives
//! defined directly on [`crate::parser::State`], and are re-exported from
//! here alongside the rest of this module's combinators.

use crate::error::ParseError;
use crate::lib::std::boxed::Box;
use crate::lib::std::vec::Vec;

pub use crate::parser::{look_ahead, not_followed_by, try_};

use crate::parser::{alt, fail, pure, Outcome, Parser, State};
use crate::trace::trace;

/// `many(p)`: zero or more repetitions of `p`, collected into a `Vec`.
///
/// `p` must consume input on every successful iteration; a `p` that
/// succeeds without consuming would loop forever. Since that is a grammar
/// bug rather than an input-dependent failure, this panics rather than
/// hanging.
pub fn many<S, O, U>(
    mut p: impl Parser<S, O, U>,
) -> impl FnMut(State<S, U>) -> Outcome<S, Vec<O>, U>
where
    S: Clone,
    U: Clone,
{
    trace("many", move |mut state: State<S, U>| {
        let mut values = Vec::new();
        let mut consumed_overall = false;
        let mut error = ParseError::unknown(state.position.clone());
        loop {
            let outcome = p.parse(state.clone());
            let step_consumed = outcome.consumed;
            match outcome.result {
                Err(e) => {
                    if step_consumed {
                        return Outcome::err(true, e);
                    }
                    return Outcome::ok(consumed_overall, values, state, error.merge(e));
                }
                Ok(success) => {
                    if !step_consumed {
                        panic!(
                            "many: parser succeeded without consuming input, would loop forever"
                        );
                    }
                    consumed_overall = true;
                    error = success.error;
                    state = success.state;
                    values.push(success.value);
                }
            }
        }
    })
}

/// `some(p) = p *> many(p)`: one or more repetitions of `p`.
pub fn some<S, O, U>(
    mut p: impl Parser<S, O, U>,
) -> impl FnMut(State<S, U>) -> Outcome<S, Vec<O>, U>
where
    S: Clone,
    U: Clone,
{
    trace("some", move |state: State<S, U>| {
        let first = p.parse(state);
        let first_consumed = first.consumed;
        match first.result {
            Err(e) => Outcome::err(first_consumed, e),
            Ok(first_success) => {
                let mut values = crate::lib::std::vec![first_success.value];
                let mut consumed_overall = first_consumed;
                let mut error = first_success.error;
                let mut state = first_success.state;
                loop {
                    let outcome = p.parse(state.clone());
                    let step_consumed = outcome.consumed;
                    match outcome.result {
                        Err(e) => {
                            if step_consumed {
                                return Outcome::err(true, e);
                            }
                            return Outcome::ok(consumed_overall, values, state, error.merge(e));
                        }
                        Ok(success) => {
                            if !step_consumed {
                                panic!(
                                    "some: parser succeeded without consuming input, would loop forever"
                                );
                            }
                            consumed_overall = true;
                            error = success.error;
                            state = success.state;
                            values.push(success.value);
                        }
                    }
                }
            }
        }
    })
}

/// `choice(ps) = foldr alt fail ps`: try each parser in `ps` in order,
/// moving to the next only when the previous returned an *empty* outcome.
pub fn choice<S, O, U>(
    mut ps: Vec<Box<dyn Parser<S, O, U>>>,
) -> impl FnMut(State<S, U>) -> Outcome<S, O, U>
where
    S: Clone,
    U: Clone,
{
    trace("choice", move |state: State<S, U>| {
        if ps.is_empty() {
            return fail("non-empty alternative").parse(state);
        }
        let mut iter = ps.iter_mut();
        let first = iter.next().expect("checked non-empty above");
        let mut outcome = first.parse(state.clone());
        for next in iter {
            if outcome.consumed {
                return outcome;
            }
            match outcome.result {
                Ok(_) => return outcome,
                Err(e1) => {
                    let outcome2 = next.parse(state.clone());
                    outcome = match outcome2.result {
                        Ok(success) => Outcome::ok(
                            outcome2.consumed,
                            success.value,
                            success.state,
                            e1.merge(success.error),
                        ),
                        Err(e2) => Outcome::err(outcome2.consumed, e1.merge(e2)),
                    };
                }
            }
        }
        outcome
    })
}

/// `option(default, p) = alt(p, return(default))`.
pub fn option<S, O, U>(
    default: O,
    p: impl Parser<S, O, U>,
) -> impl FnMut(State<S, U>) -> Outcome<S, O, U>
where
    S: Clone,
    O: Clone,
    U: Clone,
{
    trace("option", alt(p, pure(default)))
}

/// `optional(p) = alt(p *> return(()), return(()))`: run `p` for its
/// effect, discarding both its value and, if it failed without consuming,
/// its failure.
pub fn optional<S, O, U>(p: impl Parser<S, O, U>) -> impl FnMut(State<S, U>) -> Outcome<S, (), U>
where
    S: Clone,
    O: Clone,
    U: Clone,
{
    trace("optional", alt(crate::parser::bind(p, |_| pure(())), pure(())))
}

/// `between(open, close, p) = open *> p <* close`.
pub fn between<S, OOpen, OClose, O, U>(
    mut open: impl Parser<S, OOpen, U>,
    mut close: impl Parser<S, OClose, U>,
    mut p: impl Parser<S, O, U>,
) -> impl FnMut(State<S, U>) -> Outcome<S, O, U> {
    trace("between", move |state: State<S, U>| {
        let o = open.parse(state);
        let o_consumed = o.consumed;
        match o.result {
            Err(e) => Outcome::err(o_consumed, e),
            Ok(o_success) => {
                let v = p.parse(o_success.state);
                let consumed1 = o_consumed || v.consumed;
                match v.result {
                    Err(e) => Outcome::err(consumed1, o_success.error.merge(e)),
                    Ok(v_success) => {
                        let c = close.parse(v_success.state);
                        let consumed2 = consumed1 || c.consumed;
                        match c.result {
                            Err(e) => Outcome::err(consumed2, v_success.error.merge(e)),
                            Ok(c_success) => Outcome::ok(
                                consumed2,
                                v_success.value,
                                c_success.state,
                                v_success.error.merge(c_success.error),
                            ),
                        }
                    }
                }
            }
        }
    })
}

/// `sep_by(p, sep)`: zero or more `p`, separated by `sep`.
pub fn sep_by<S, O, OS, U>(
    p: impl Parser<S, O, U>,
    sep: impl Parser<S, OS, U>,
) -> impl FnMut(State<S, U>) -> Outcome<S, Vec<O>, U>
where
    S: Clone,
    U: Clone,
{
    trace("sep_by", option(Vec::new(), sep_by1(p, sep)))
}

/// `sep_by1(p, sep)`: one or more `p`, separated by `sep`.
pub fn sep_by1<S, O, OS, U>(
    mut p: impl Parser<S, O, U>,
    mut sep: impl Parser<S, OS, U>,
) -> impl FnMut(State<S, U>) -> Outcome<S, Vec<O>, U>
where
    S: Clone,
    U: Clone,
{
    trace("sep_by1", move |state: State<S, U>| {
        let first = p.parse(state);
        let first_consumed = first.consumed;
        match first.result {
            Err(e) => Outcome::err(first_consumed, e),
            Ok(first_success) => {
                let mut values = crate::lib::std::vec![first_success.value];
                let mut consumed_overall = first_consumed;
                let mut error = first_success.error;
                let mut state = first_success.state;
                loop {
                    let sep_outcome = sep.parse(state.clone());
                    let sep_consumed = sep_outcome.consumed;
                    match sep_outcome.result {
                        Err(e) => {
                            if sep_consumed {
                                return Outcome::err(true, e);
                            }
                            return Outcome::ok(consumed_overall, values, state, error.merge(e));
                        }
                        Ok(sep_success) => {
                            let item_outcome = p.parse(sep_success.state);
                            let item_consumed = item_outcome.consumed;
                            match item_outcome.result {
                                Err(e) => {
                                    if sep_consumed || item_consumed {
                                        return Outcome::err(true, sep_success.error.merge(e));
                                    }
                                    return Outcome::ok(
                                        consumed_overall,
                                        values,
                                        state,
                                        error.merge(sep_success.error).merge(e),
                                    );
                                }
                                Ok(item_success) => {
                                    consumed_overall = consumed_overall || sep_consumed || item_consumed;
                                    error = sep_success.error.merge(item_success.error);
                                    state = item_success.state;
                                    values.push(item_success.value);
                                }
                            }
                        }
                    }
                }
            }
        }
    })
}

/// `end_by(p, sep)`: zero or more occurrences of `p`, each one followed by
/// `sep`. A `p` with no following `sep` is a hard (consumed) failure rather
/// than a dropped trailing item.
pub fn end_by<S, O, OS, U>(
    mut p: impl Parser<S, O, U>,
    mut sep: impl Parser<S, OS, U>,
) -> impl FnMut(State<S, U>) -> Outcome<S, Vec<O>, U>
where
    S: Clone,
    U: Clone,
{
    trace("end_by", move |mut state: State<S, U>| {
        let mut values = Vec::new();
        let mut consumed_overall = false;
        let mut error = ParseError::unknown(state.position.clone());
        loop {
            let p_outcome = p.parse(state.clone());
            let p_consumed = p_outcome.consumed;
            match p_outcome.result {
                Err(e) => {
                    if p_consumed {
                        return Outcome::err(true, e);
                    }
                    return Outcome::ok(consumed_overall, values, state, error.merge(e));
                }
                Ok(p_success) => {
                    let sep_outcome = sep.parse(p_success.state);
                    let sep_consumed = sep_outcome.consumed;
                    match sep_outcome.result {
                        Err(e) => {
                            if p_consumed || sep_consumed {
                                return Outcome::err(true, p_success.error.merge(e));
                            }
                            return Outcome::ok(
                                consumed_overall,
                                values,
                                state,
                                error.merge(p_success.error).merge(e),
                            );
                        }
                        Ok(sep_success) => {
                            consumed_overall = true;
                            error = p_success.error.merge(sep_success.error);
                            state = sep_success.state;
                            values.push(p_success.value);
                        }
                    }
                }
            }
        }
    })
}

/// `end_by1(p, sep)`: [`end_by`], requiring at least one `p`/`sep` pair.
pub fn end_by1<S, O, OS, U>(
    p: impl Parser<S, O, U>,
    sep: impl Parser<S, OS, U>,
) -> impl FnMut(State<S, U>) -> Outcome<S, Vec<O>, U>
where
    S: Clone,
    U: Clone,
{
    let mut inner = end_by(p, sep);
    trace("end_by1", move |state: State<S, U>| {
        let outcome = inner.parse(state);
        match outcome.result {
            Ok(success) if success.value.is_empty() => Outcome::err(outcome.consumed, success.error),
            other => Outcome {
                consumed: outcome.consumed,
                result: other,
            },
        }
    })
}

/// `sep_end_by(p, sep)`: zero or more `p`, each optionally followed by a
/// trailing `sep`.
pub fn sep_end_by<S, O, OS, U>(
    p: impl Parser<S, O, U>,
    sep: impl Parser<S, OS, U>,
) -> impl FnMut(State<S, U>) -> Outcome<S, Vec<O>, U>
where
    S: Clone,
    U: Clone,
{
    trace("sep_end_by", option(Vec::new(), sep_end_by1(p, sep)))
}

/// `sep_end_by1(p, sep)`: one or more `p`, each optionally followed by a
/// trailing `sep`.
pub fn sep_end_by1<S, O, OS, U>(
    mut p: impl Parser<S, O, U>,
    mut sep: impl Parser<S, OS, U>,
) -> impl FnMut(State<S, U>) -> Outcome<S, Vec<O>, U>
where
    S: Clone,
    U: Clone,
{
    trace("sep_end_by1", move |state: State<S, U>| {
        let first = p.parse(state);
        let first_consumed = first.consumed;
        match first.result {
            Err(e) => Outcome::err(first_consumed, e),
            Ok(first_success) => {
                let mut values = crate::lib::std::vec![first_success.value];
                let mut consumed_overall = first_consumed;
                let mut error = first_success.error;
                let mut state = first_success.state;
                loop {
                    let sep_outcome = sep.parse(state.clone());
                    let sep_consumed = sep_outcome.consumed;
                    match sep_outcome.result {
                        Err(e) => {
                            if sep_consumed {
                                return Outcome::err(true, e);
                            }
                            return Outcome::ok(consumed_overall, values, state, error.merge(e));
                        }
                        Ok(sep_success) => {
                            let next_outcome = p.parse(sep_success.state.clone());
                            let next_consumed = next_outcome.consumed;
                            match next_outcome.result {
                                Err(e) => {
                                    if sep_consumed || next_consumed {
                                        return Outcome::err(true, sep_success.error.merge(e));
                                    }
                                    // trailing separator with nothing following it
                                    return Outcome::ok(
                                        consumed_overall || sep_consumed,
                                        values,
                                        sep_success.state,
                                        sep_success.error.merge(e),
                                    );
                                }
                                Ok(next_success) => {
                                    consumed_overall = consumed_overall || sep_consumed || next_consumed;
                                    error = sep_success.error.merge(next_success.error);
                                    state = next_success.state;
                                    values.push(next_success.value);
                                }
                            }
                        }
                    }
                }
            }
        }
    })
}

/// `many_till(p, end)`: repeat `p` until `end` succeeds. `end` is tried
/// first at each iteration; an empty failure of `end` falls through to
/// trying `p`.
pub fn many_till<S, O, OE, U>(
    mut p: impl Parser<S, O, U>,
    mut end: impl Parser<S, OE, U>,
) -> impl FnMut(State<S, U>) -> Outcome<S, (Vec<O>, OE), U>
where
    S: Clone,
    U: Clone,
{
    trace("many_till", move |mut state: State<S, U>| {
        let mut values = Vec::new();
        let mut consumed_overall = false;
        loop {
            let end_outcome = end.parse(state.clone());
            let end_consumed = end_outcome.consumed;
            match end_outcome.result {
                Ok(end_success) => {
                    let consumed = consumed_overall || end_consumed;
                    return Outcome::ok(
                        consumed,
                        (values, end_success.value),
                        end_success.state,
                        end_success.error,
                    );
                }
                Err(end_error) => {
                    if end_consumed {
                        return Outcome::err(true, end_error);
                    }
                    let p_outcome = p.parse(state);
                    let p_consumed = p_outcome.consumed;
                    match p_outcome.result {
                        Err(e) => {
                            return Outcome::err(consumed_overall || p_consumed, end_error.merge(e));
                        }
                        Ok(p_success) => {
                            if !p_consumed {
                                panic!(
                                    "many_till: inner parser succeeded without consuming input, would loop forever"
                                );
                            }
                            consumed_overall = true;
                            values.push(p_success.value);
                            state = p_success.state;
                        }
                    }
                }
            }
        }
    })
}

/// `count(n, p)`: exactly `n` repetitions of `p`; fails as soon as one does.
pub fn count<S, O, U>(
    n: usize,
    mut p: impl Parser<S, O, U>,
) -> impl FnMut(State<S, U>) -> Outcome<S, Vec<O>, U>
where
    S: Clone,
    U: Clone,
{
    trace("count", move |mut state: State<S, U>| {
        let mut values = Vec::with_capacity(n);
        let mut consumed_overall = false;
        let mut error = ParseError::unknown(state.position.clone());
        for _ in 0..n {
            let outcome = p.parse(state.clone());
            let step_consumed = outcome.consumed;
            match outcome.result {
                Err(e) => return Outcome::err(consumed_overall || step_consumed, error.merge(e)),
                Ok(success) => {
                    consumed_overall = consumed_overall || step_consumed;
                    error = success.error;
                    state = success.state;
                    values.push(success.value);
                }
            }
        }
        Outcome::ok(consumed_overall, values, state, error)
    })
}

/// `skip_many(p)`: like [`many`], discarding the collected values.
pub fn skip_many<S, O, U>(p: impl Parser<S, O, U>) -> impl FnMut(State<S, U>) -> Outcome<S, (), U>
where
    S: Clone,
    U: Clone,
{
    let mut inner = many(p);
    trace("skip_many", move |state: State<S, U>| {
        let outcome = inner.parse(state);
        match outcome.result {
            Ok(success) => Outcome::ok(outcome.consumed, (), success.state, success.error),
            Err(e) => Outcome::err(outcome.consumed, e),
        }
    })
}

/// `skip_some(p)`: like [`some`], discarding the collected values.
pub fn skip_some<S, O, U>(p: impl Parser<S, O, U>) -> impl FnMut(State<S, U>) -> Outcome<S, (), U>
where
    S: Clone,
    U: Clone,
{
    let mut inner = some(p);
    trace("skip_some", move |state: State<S, U>| {
        let outcome = inner.parse(state);
        match outcome.result {
            Ok(success) => Outcome::ok(outcome.consumed, (), success.state, success.error),
            Err(e) => Outcome::err(outcome.consumed, e),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinator::char::{char_, digit_char};
    use crate::parser::run;

    #[test]
    fn many_collects_zero_or_more() {
        let (v, state) = run(&mut many(digit_char()), "t", (), "123abc").unwrap();
        assert_eq!(v, crate::lib::std::vec!['1', '2', '3']);
        assert_eq!(state.position.column(), 4);
    }

    #[test]
    fn many_on_non_matching_input_is_empty_ok() {
        let (v, _) = run(&mut many(digit_char()), "t", (), "abc").unwrap();
        assert!(v.is_empty());
    }

    #[test]
    fn some_requires_at_least_one() {
        assert!(run(&mut some(digit_char()), "t", (), "abc").is_err());
        let (v, _) = run(&mut some(digit_char()), "t", (), "12a").unwrap();
        assert_eq!(v, crate::lib::std::vec!['1', '2']);
    }

    #[test]
    fn sep_by_collects_separated_items() {
        let (v, _) = run(&mut sep_by(digit_char(), char_(',')), "t", (), "1,2,3;").unwrap();
        assert_eq!(v, crate::lib::std::vec!['1', '2', '3']);
        let (v, _) = run(&mut sep_by(digit_char(), char_(',')), "t", (), "x").unwrap();
        assert!(v.is_empty());
    }

    #[test]
    fn sep_by1_requires_one() {
        assert!(run(&mut sep_by1(digit_char(), char_(',')), "t", (), "x").is_err());
    }

    #[test]
    fn between_parses_the_inner_value() {
        let (v, _) = run(
            &mut between(char_('('), char_(')'), digit_char()),
            "t",
            (),
            "(5)",
        )
        .unwrap();
        assert_eq!(v, '5');
    }

    #[test]
    fn end_by_requires_trailing_separator() {
        let (v, _) = run(&mut end_by(digit_char(), char_(';')), "t", (), "1;2;").unwrap();
        assert_eq!(v, crate::lib::std::vec!['1', '2']);
        assert!(run(&mut end_by(digit_char(), char_(';')), "t", (), "1;2").is_err());
    }

    #[test]
    fn sep_end_by_allows_optional_trailing_separator() {
        let (v, _) = run(&mut sep_end_by(digit_char(), char_(';')), "t", (), "1;2").unwrap();
        assert_eq!(v, crate::lib::std::vec!['1', '2']);
        let (v, _) = run(&mut sep_end_by(digit_char(), char_(';')), "t", (), "1;2;").unwrap();
        assert_eq!(v, crate::lib::std::vec!['1', '2']);
    }

    #[test]
    fn count_fails_if_any_repetition_fails() {
        assert!(run(&mut count(3, digit_char()), "t", (), "12a").is_err());
        let (v, _) = run(&mut count(3, digit_char()), "t", (), "123a").unwrap();
        assert_eq!(v, crate::lib::std::vec!['1', '2', '3']);
    }

    #[test]
    fn many_till_stops_at_end_marker() {
        let (v, _) = run(&mut many_till(digit_char(), char_(';')), "t", (), "12;").unwrap();
        assert_eq!(v.0, crate::lib::std::vec!['1', '2']);
        assert_eq!(v.1, ';');
    }

    #[test]
    fn choice_tries_alternatives_in_order() {
        let ps: Vec<Box<dyn Parser<&str, char, ()>>> =
            crate::lib::std::vec![Box::new(char_('a')), Box::new(char_('b'))];
        let (v, _) = run(&mut choice(ps), "t", (), "b").unwrap();
        assert_eq!(v, 'b');
    }

    #[test]
    fn option_falls_back_to_default() {
        let (v, _) = run(&mut option('z', char_('a')), "t", (), "b").unwrap();
        assert_eq!(v, 'z');
    }

    #[test]
    fn optional_discards_the_value() {
        let (v, state) = run(&mut optional(char_('a')), "t", (), "a").unwrap();
        assert_eq!(v, ());
        assert_eq!(state.position.column(), 2);
        let (_, state) = run(&mut optional(char_('a')), "t", (), "b").unwrap();
        assert_eq!(state.position.column(), 1);
    }
}
