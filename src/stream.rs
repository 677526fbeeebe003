//! Token streams.
//!
//! A [`Stream`] is any value that can hand back its first token and the
//! remainder of itself. The engine is polymorphic over the token type, but
//! in practice the token is almost always a `char`. Implementations are
//! provided for borrowed UTF-8 (`&str`, [`Utf8Bytes`]), an owned character
//! sequence ([`OwnedChars`]), a lazily-produced chunked sequence
//! ([`RopeStream`]), and — for non-character grammars — any `&[T]`.

use crate::lib::std::rc::Rc;

/// A uniform, token-at-a-time view over an input sequence.
///
/// `uncons` must be O(1) amortized: it is called once per token consumed by
/// the primitive parsers, so any implementation that made it linear in the
/// remaining input would make every parser quadratic.
pub trait Stream: Sized + Clone {
    /// The element type this stream yields one at a time.
    type Token: Clone;

    /// Split off the first token, if any, returning it along with the
    /// remainder of the stream.
    fn uncons(self) -> Option<(Self::Token, Self)>;
}

impl<'a> Stream for &'a str {
    type Token = char;

    fn uncons(self) -> Option<(char, Self)> {
        let mut chars = self.chars();
        let c = chars.next()?;
        Some((c, chars.as_str()))
    }
}

impl<'a, T: Clone> Stream for &'a [T] {
    type Token = T;

    fn uncons(self) -> Option<(T, Self)> {
        let (first, rest) = self.split_first()?;
        Some((first.clone(), rest))
    }
}

/// A borrowed UTF-8 byte sequence, decoded one Unicode scalar at a time.
///
/// Unlike `&str`, this accepts a raw `&[u8]` and performs UTF-8 decoding
/// lazily as tokens are pulled; a malformed byte is reported as the
/// replacement character so that `uncons` never fails outright (a
/// `satisfy`-based grammar can still reject it by predicate).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Utf8Bytes<'a> {
    bytes: &'a [u8],
}

impl<'a> Utf8Bytes<'a> {
    /// Wrap a byte slice for character-at-a-time decoding.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// The remaining undecoded bytes.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl<'a> Stream for Utf8Bytes<'a> {
    type Token = char;

    fn uncons(self) -> Option<(char, Self)> {
        if self.bytes.is_empty() {
            return None;
        }
        let width = utf8_char_width(self.bytes[0]);
        let (head, tail) = self.bytes.split_at(width.min(self.bytes.len()));
        let c = core::str::from_utf8(head)
            .ok()
            .and_then(|s| s.chars().next())
            .unwrap_or(core::char::REPLACEMENT_CHARACTER);
        Some((c, Utf8Bytes::new(tail)))
    }
}

fn utf8_char_width(first_byte: u8) -> usize {
    if first_byte & 0x80 == 0 {
        1
    } else if first_byte & 0xE0 == 0xC0 {
        2
    } else if first_byte & 0xF0 == 0xE0 {
        3
    } else if first_byte & 0xF8 == 0xF0 {
        4
    } else {
        1
    }
}

/// An owned character sequence: a reference-counted string plus a byte
/// offset, so cloning a position in the stream (which `alt`, `try_`, and
/// `look_ahead` all do to snapshot/rewind state) is O(1).
#[derive(Debug, Clone)]
pub struct OwnedChars {
    text: Rc<str>,
    offset: usize,
}

impl OwnedChars {
    /// Take ownership of `text` (via an internal `Rc`) for streaming.
    pub fn new(text: impl Into<crate::lib::std::string::String>) -> Self {
        let text: crate::lib::std::string::String = text.into();
        Self {
            text: Rc::from(text),
            offset: 0,
        }
    }

    /// The remaining, not-yet-consumed text.
    pub fn remainder(&self) -> &str {
        &self.text[self.offset..]
    }
}

impl Stream for OwnedChars {
    type Token = char;

    fn uncons(self) -> Option<(char, Self)> {
        let c = self.remainder().chars().next()?;
        Some((
            c,
            OwnedChars {
                text: self.text,
                offset: self.offset + c.len_utf8(),
            },
        ))
    }
}

/// A chunk producer for a [`RopeStream`]: called at most once per chunk
/// boundary, and only when the stream is actually advanced past the
/// previous chunk (laziness).
pub trait ChunkSource {
    /// Produce the next chunk, or `None` once the source is exhausted.
    fn next_chunk(&mut self) -> Option<Rc<str>>;
}

impl<F: FnMut() -> Option<Rc<str>>> ChunkSource for F {
    fn next_chunk(&mut self) -> Option<Rc<str>> {
        (self)()
    }
}

struct RopeNode {
    chunk: Rc<str>,
    offset: usize,
    rest: RopeTail,
}

#[derive(Clone)]
enum RopeTail {
    Done,
    Pending(Rc<crate::lib::std::cell::RefCell<dyn ChunkSource>>),
}

/// A lazy, rope-like chunked character stream.
///
/// Chunks already consumed are dropped (nothing keeps the whole input
/// resident), and chunks not yet needed are never produced: [`uncons`][Stream::uncons]
/// only pulls the next chunk from the underlying [`ChunkSource`] the
/// moment the current one runs dry.
#[derive(Clone)]
pub struct RopeStream {
    node: Option<Rc<RopeNode>>,
}

impl RopeStream {
    /// Build a rope stream whose chunks are produced on demand by `source`.
    pub fn new(mut source: impl ChunkSource + 'static) -> Self {
        let chunk = source.next_chunk();
        let tail = RopeTail::Pending(Rc::new(crate::lib::std::cell::RefCell::new(source)));
        Self::from_chunk(chunk, tail)
    }

    /// Build a rope stream over a fixed, already-materialized list of chunks.
    pub fn from_chunks(chunks: impl IntoIterator<Item = Rc<str>>) -> Self {
        let mut chunks = chunks.into_iter();
        let chunk = chunks.next();
        // Adapt the remaining iterator into a `ChunkSource`.
        let mut remaining = chunks;
        let source = move || remaining.next();
        Self::from_chunk(chunk, RopeTail::Pending(Rc::new(crate::lib::std::cell::RefCell::new(source))))
    }

    fn from_chunk(chunk: Option<Rc<str>>, tail: RopeTail) -> Self {
        match chunk {
            Some(chunk) if !chunk.is_empty() => Self {
                node: Some(Rc::new(RopeNode {
                    chunk,
                    offset: 0,
                    rest: tail,
                })),
            },
            Some(_) => Self::pull(tail),
            None => Self { node: None },
        }
    }

    fn pull(tail: RopeTail) -> Self {
        match tail {
            RopeTail::Done => Self { node: None },
            RopeTail::Pending(source) => {
                let chunk = source.borrow_mut().next_chunk();
                Self::from_chunk(chunk, RopeTail::Pending(source))
            }
        }
    }
}

impl Stream for RopeStream {
    type Token = char;

    fn uncons(self) -> Option<(char, Self)> {
        let node = self.node?;
        let remainder = &node.chunk[node.offset..];
        let c = remainder.chars().next()?;
        let next_offset = node.offset + c.len_utf8();
        let rest = if next_offset < node.chunk.len() {
            Self {
                node: Some(Rc::new(RopeNode {
                    chunk: Rc::clone(&node.chunk),
                    offset: next_offset,
                    rest: node.rest.clone(),
                })),
            }
        } else {
            Self::pull(node.rest.clone())
        };
        Some((c, rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lib::std::vec::Vec;

    #[test]
    fn str_uncons_splits_first_char() {
        let (c, rest) = "abc".uncons().unwrap();
        assert_eq!(c, 'a');
        assert_eq!(rest, "bc");
    }

    #[test]
    fn utf8_bytes_decodes_multibyte() {
        let bytes = Utf8Bytes::new("héllo".as_bytes());
        let mut out = Vec::new();
        let mut cur = bytes;
        while let Some((c, rest)) = cur.uncons() {
            out.push(c);
            cur = rest;
        }
        assert_eq!(out, vec!['h', 'é', 'l', 'l', 'o']);
    }

    #[test]
    fn owned_chars_round_trips() {
        let mut cur = OwnedChars::new("xyz");
        let mut out = crate::lib::std::string::String::new();
        while let Some((c, rest)) = cur.uncons() {
            out.push(c);
            cur = rest;
        }
        assert_eq!(out, "xyz");
    }

    #[test]
    fn rope_stream_lazily_concatenates_chunks() {
        let chunks: Vec<Rc<str>> = vec![Rc::from("ab"), Rc::from(""), Rc::from("cd")];
        let mut cur = RopeStream::from_chunks(chunks);
        let mut out = crate::lib::std::string::String::new();
        while let Some((c, rest)) = cur.uncons() {
            out.push(c);
            cur = rest;
        }
        assert_eq!(out, "abcd");
    }

    #[test]
    fn slice_stream_works_over_non_char_tokens() {
        let tokens: &[u32] = &[1, 2, 3];
        let (t, rest) = tokens.uncons().unwrap();
        assert_eq!(t, 1);
        assert_eq!(rest, &[2, 3]);
    }
}
