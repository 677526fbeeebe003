//! Error representation, classification, and merging.
//!
//! A [`ParseError`] pairs a [`Position`] with a deduplicated set of
//! [`Message`]s. The merge algebra below is what gives Parsec-style errors
//! their "expected A, B or C" shape without losing information when several
//! alternatives are tried and all fail.

use crate::lib::std::collections::BTreeSet;
use crate::lib::std::fmt;
use crate::lib::std::string::String;
use crate::lib::std::vec::Vec;
use crate::position::Position;

/// One piece of information about why a parser failed or what it wanted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Message {
    /// What the parser actually saw, e.g. `"'x'"` or `"end of input"`.
    Unexpected(String),
    /// What the parser wanted, e.g. `"digit"` or `"';'"`.
    Expected(String),
    /// A free-form message, as installed by [`fail`][crate::parser::fail].
    Message(String),
}

/// A position-tagged, mergeable parse error.
///
/// The three message kinds merge with different rules:
/// - [`Message::Unexpected`]: last write wins — only the most recently
///   installed one is kept.
/// - [`Message::Expected`] and [`Message::Message`]: they accumulate into a
///   deduplicated set.
///
/// Two errors at different positions always merge to the one further into
/// the input ("longest match wins for error reporting"); at equal
/// positions, their message sets are unioned.
#[derive(Debug, Clone)]
pub struct ParseError {
    position: Position,
    unexpected: Option<String>,
    expected: BTreeSet<String>,
    messages: Vec<String>,
}

impl ParseError {
    /// An error at `position` carrying no messages at all.
    pub fn unknown(position: Position) -> Self {
        Self {
            position,
            unexpected: None,
            expected: BTreeSet::new(),
            messages: Vec::new(),
        }
    }

    /// An error at `position` carrying a single message.
    pub fn new_message(position: Position, message: Message) -> Self {
        Self::unknown(position).add_message(message)
    }

    /// The position this error is attached to.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Whether this error carries no messages (the `unknown(pos)` case).
    pub fn is_unknown(&self) -> bool {
        self.unexpected.is_none() && self.expected.is_empty() && self.messages.is_empty()
    }

    /// Fold a new message into this error, applying the per-kind merge rule.
    pub fn add_message(mut self, message: Message) -> Self {
        match message {
            Message::Unexpected(text) => {
                self.unexpected = Some(text);
            }
            Message::Expected(text) => {
                self.expected.insert(text);
            }
            Message::Message(text) => {
                if !self.messages.iter().any(|m| m == &text) {
                    self.messages.push(text);
                }
            }
        }
        self
    }

    /// Re-tag this error with a different position, discarding none of its messages.
    pub fn set_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Discard the accumulated `Expected` messages, e.g. for [`label`][crate::parser::label].
    pub fn clear_expected(mut self) -> Self {
        self.expected.clear();
        self
    }

    /// The merge algebra:
    ///
    /// 1. If `self`'s position is strictly further, return `self`.
    /// 2. If `other`'s position is strictly further, return `other`.
    /// 3. Otherwise (equal positions) union the `Expected`/`Message` sets,
    ///    keeping `other`'s `Unexpected` if it has one, else `self`'s.
    pub fn merge(self, other: Self) -> Self {
        use crate::lib::std::cmp::Ordering::*;
        match self.position.cmp(&other.position) {
            Greater => self,
            Less => other,
            Equal => {
                let unexpected = other.unexpected.clone().or_else(|| self.unexpected.clone());
                let mut expected = self.expected;
                expected.extend(other.expected);
                let mut messages = self.messages;
                for m in other.messages {
                    if !messages.iter().any(|existing| existing == &m) {
                        messages.push(m);
                    }
                }
                Self {
                    position: self.position,
                    unexpected,
                    expected,
                    messages,
                }
            }
        }
    }

    /// Render the error body:
    ///
    /// ```text
    /// pos: unexpected X
    /// expecting A, B or C
    /// msg1
    /// msg2
    /// ```
    ///
    /// Sections with nothing to say are omitted entirely; if every section
    /// is empty the whole body is `"unknown parse error"`.
    pub fn render(&self) -> String {
        let mut body: Vec<String> = Vec::new();
        if let Some(unexpected) = &self.unexpected {
            body.push(format!("unexpected {unexpected}"));
        }
        if !self.expected.is_empty() {
            body.push(format!("expecting {}", join_expected(&self.expected)));
        }
        body.extend(self.messages.iter().cloned());

        if body.is_empty() {
            return format!("{}: unknown parse error", self.position.render());
        }

        let mut lines = body.into_iter();
        let first = lines.next().expect("checked non-empty above");
        let mut out = format!("{}: {}", self.position.render(), first);
        for line in lines {
            out.push('\n');
            out.push_str(&line);
        }
        out
    }
}

fn join_expected(expected: &BTreeSet<String>) -> String {
    let items: Vec<&String> = expected.iter().collect();
    match items.len() {
        0 => String::new(),
        1 => items[0].clone(),
        _ => {
            let (last, rest) = items.split_last().expect("non-empty checked above");
            format!(
                "{} or {}",
                rest.iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                last
            )
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {}
