//! Source position tracking.

use crate::lib::std::fmt;

/// The tab width Parsec itself uses, and the default for [`State`][crate::parser::State].
pub const DEFAULT_TAB_WIDTH: u32 = 8;

/// A position within a named source: a 1-based line and column.
///
/// Two positions compare by `(line, column)` only: within a single parse run
/// the source name is a constant carried alongside the position, not a sort
/// key, and positions are only ever compared within the same source.
#[derive(Debug, Clone)]
pub struct Position {
    source_name: crate::lib::std::string::String,
    line: u32,
    column: u32,
}

impl Position {
    /// A fresh position at the start of a named source: line 1, column 1.
    pub fn new(source_name: impl Into<crate::lib::std::string::String>) -> Self {
        Self {
            source_name: source_name.into(),
            line: 1,
            column: 1,
        }
    }

    /// The name of the source this position is within (a file path, `"<repl>"`, ...).
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// The 1-based line number.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// The 1-based column number.
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Advance past one character, applying the tab rule below.
    ///
    /// - `'\n'` moves to the next line, column 1.
    /// - `'\t'` rounds the column up to the next `tab_width` stop.
    /// - everything else advances the column by one.
    pub fn advance(&self, ch: char, tab_width: u32) -> Self {
        match ch {
            '\n' => Self {
                source_name: self.source_name.clone(),
                line: self.line + 1,
                column: 1,
            },
            '\t' => {
                let column = ((self.column - 1) / tab_width) * tab_width + tab_width + 1;
                Self {
                    source_name: self.source_name.clone(),
                    line: self.line,
                    column,
                }
            }
            _ => Self {
                source_name: self.source_name.clone(),
                line: self.line,
                column: self.column + 1,
            },
        }
    }

    /// Advance past an entire chunk of text, character by character.
    pub fn update(&self, chunk: &str, tab_width: u32) -> Self {
        let mut pos = self.clone();
        for ch in chunk.chars() {
            pos = pos.advance(ch, tab_width);
        }
        pos
    }

    /// Render as `name:line:col`, the form used in rendered [`ParseError`][crate::error::ParseError]s.
    pub fn render(&self) -> crate::lib::std::string::String {
        crate::lib::std::string::ToString::to_string(self)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source_name, self.line, self.column)
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.line == other.line && self.column == other.column
    }
}

impl Eq for Position {}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<crate::lib::std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> crate::lib::std::cmp::Ordering {
        (self.line, self.column).cmp(&(other.line, other.column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_line_and_column() {
        let p = Position::new("src");
        let p = p.update("ab\ncd", DEFAULT_TAB_WIDTH);
        assert_eq!((p.line(), p.column()), (2, 3));
    }

    #[test]
    fn tab_rounds_up_to_stop() {
        let p = Position::new("src");
        assert_eq!(p.advance('\t', 8).column(), 9);
        let p2 = p.advance('a', 8); // column 2
        assert_eq!(p2.advance('\t', 8).column(), 9);
        let mut p3 = p2;
        for _ in 0..7 {
            p3 = p3.advance('a', 8);
        }
        assert_eq!(p3.column(), 9);
        assert_eq!(p3.advance('\t', 8).column(), 17);
    }

    #[test]
    fn ordering_ignores_source_name() {
        let a = Position::new("a");
        let b = Position::new("b").advance('x', 8);
        assert!(a < b);
    }

    #[test]
    fn renders_as_name_line_col() {
        let p = Position::new("input.txt").advance('\n', 8);
        assert_eq!(p.render(), "input.txt:2:1");
    }
}
