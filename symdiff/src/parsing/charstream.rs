use crate::utils::errors::{DiffError, Result};

/// Character returned by [`CharStream::peek`] once the line is exhausted.
pub const END_OF_LINE: char = '\n';

/// # CharStream
/// Cursor over a single line of input. The parser only talks to the line
/// through these primitives.
#[derive(Debug, Clone)]
pub struct CharStream {
    chars: Vec<char>,
    pos: usize,
}

impl CharStream {
    pub fn new(line: &str) -> CharStream {
        // a trailing line terminator is not part of the expression
        let line = line.trim_end_matches(&['\n', '\r'][..]);
        CharStream {
            chars: line.chars().collect(),
            pos: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn peek(&self) -> char {
        self.chars.get(self.pos).copied().unwrap_or(END_OF_LINE)
    }

    pub fn advance(&mut self) -> char {
        let ch = self.peek();
        if self.pos < self.chars.len() {
            self.pos += 1;
        }
        ch
    }

    pub fn skip_blanks(&mut self) {
        while matches!(self.peek(), ' ' | '\t') {
            self.pos += 1;
        }
    }

    pub fn is_at_newline(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// Reads an unsigned real literal: digits, an optional fraction and an
    /// optional exponent. The exponent is only taken when digits follow it.
    /// Literals too large for an `f64` are rejected.
    pub fn read_number(&mut self) -> Result<f64> {
        let start = self.pos;
        self.eat_digits();
        if self.peek() == '.' {
            self.pos += 1;
            self.eat_digits();
        }
        if matches!(self.peek(), 'e' | 'E') {
            let mark = self.pos;
            self.pos += 1;
            if matches!(self.peek(), '+' | '-') {
                self.pos += 1;
            }
            if self.eat_digits() == 0 {
                self.pos = mark;
            }
        }
        let literal: String = self.chars[start..self.pos].iter().collect();
        let value = literal.parse::<f64>()?;
        if !value.is_finite() {
            return Err(DiffError::NumberOutOfRange(literal));
        }
        Ok(value)
    }

    /// Consumes and returns everything left on the line.
    pub fn consume_line(&mut self) -> String {
        let rest: String = self.chars[self.pos..].iter().collect();
        self.pos = self.chars.len();
        rest
    }

    fn eat_digits(&mut self) -> usize {
        let start = self.pos;
        while self.peek().is_ascii_digit() {
            self.pos += 1;
        }
        self.pos - start
    }
}
