//! Datasets of (x, y) pairs and the text parser that builds them
//!
//! The parser is deliberately narrow: it accepts numeric pairs and nothing
//! else. Two layouts are recognised:
//!
//! - a bracketed list of pairs: `[(2, 7), (4, 11), (5, 13), (6, 20)]`
//!   (pairs may also be written `[x, y]`, the outer brackets are optional)
//! - one pair per line, separated by a comma, semicolon, tab or spaces,
//!   with `#` starting a comment line

use crate::error::{CalcError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

impl DataPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for DataPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Ordered, immutable sequence of observations
///
/// Every coordinate is finite. A dataset may be empty; the engines reject
/// empty datasets with [`CalcError::EmptyDataset`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    points: Vec<DataPoint>,
}

impl Dataset {
    /// Build a dataset, rejecting non-finite coordinates
    pub fn new(points: Vec<DataPoint>) -> Result<Self> {
        if let Some((i, p)) = points
            .iter()
            .enumerate()
            .find(|(_, p)| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(CalcError::InvalidInput(format!(
                "point {} {} has a non-finite coordinate",
                i + 1,
                p
            )));
        }
        Ok(Self { points })
    }

    /// Build a dataset from plain tuples
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self> {
        Self::new(pairs.iter().map(|&(x, y)| DataPoint::new(x, y)).collect())
    }

    /// Parse a dataset from text (see the module docs for the accepted layouts)
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim_start();
        let points = match trimmed.as_bytes().first() {
            None => {
                return Err(CalcError::Parse {
                    line: 1,
                    column: 1,
                    reason: "no data given".to_string(),
                })
            }
            Some(b'[') | Some(b'(') => Cursor::new(text, 0).parse_pair_list()?,
            Some(_) => parse_lines(text)?,
        };
        tracing::debug!(points = points.len(), "parsed dataset");
        Self::new(points)
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DataPoint> {
        self.points.iter()
    }

    pub fn xs(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.x)
    }

    pub fn ys(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.y)
    }

    /// True when every x value is identical (including the single-point case)
    pub fn has_constant_x(&self) -> bool {
        all_equal(self.xs())
    }

    /// True when every y value is identical (including the single-point case)
    pub fn has_constant_y(&self) -> bool {
        all_equal(self.ys())
    }
}

impl FromStr for Dataset {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a DataPoint;
    type IntoIter = std::slice::Iter<'a, DataPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

fn all_equal(mut values: impl Iterator<Item = f64>) -> bool {
    match values.next() {
        Some(first) => values.all(|v| v == first),
        None => true,
    }
}

fn parse_lines(text: &str) -> Result<Vec<DataPoint>> {
    let mut points = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let content = line.trim();
        if content.is_empty() || content.starts_with('#') {
            continue;
        }
        points.push(Cursor::new(line, idx).parse_line_pair()?);
    }
    Ok(points)
}

/// Byte cursor over the input; errors report 1-based line and column
struct Cursor<'a> {
    text: &'a str,
    pos: usize,
    first_line: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str, first_line: usize) -> Self {
        Self {
            text,
            pos: 0,
            first_line,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn peek_char(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Skip whitespace, returning whether anything was consumed
    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            self.bump();
        }
        self.pos > start
    }

    fn error(&self, reason: impl Into<String>) -> CalcError {
        let before = &self.text[..self.pos];
        let line = self.first_line + before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        CalcError::Parse {
            line,
            column,
            reason: reason.into(),
        }
    }

    fn unexpected(&self, expected: &str) -> CalcError {
        match self.peek_char() {
            Some(c) => self.error(format!("expected {}, found '{}'", expected, c)),
            None => self.error(format!("expected {}, found end of input", expected)),
        }
    }

    fn expect(&mut self, byte: u8) -> Result<()> {
        self.skip_ws();
        if self.peek() == Some(byte) {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{}'", byte as char)))
        }
    }

    /// Decimal literal: optional sign, digits with optional fraction, optional exponent
    fn parse_number(&mut self) -> Result<f64> {
        self.skip_ws();
        let start = self.pos;

        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.bump();
        }
        let mut digits = self.eat_digits();
        if self.peek() == Some(b'.') {
            self.bump();
            digits += self.eat_digits();
        }
        if digits == 0 {
            self.pos = start;
            return Err(self.unexpected("a number"));
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.bump();
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.bump();
            }
            if self.eat_digits() == 0 {
                return Err(self.unexpected("exponent digits"));
            }
        }

        let literal = &self.text[start..self.pos];
        let value: f64 = literal.parse().map_err(|_| {
            let mut at = Cursor::new(self.text, self.first_line);
            at.pos = start;
            at.error(format!("'{}' is not a valid number", literal))
        })?;
        if !value.is_finite() {
            let mut at = Cursor::new(self.text, self.first_line);
            at.pos = start;
            return Err(at.error(format!("'{}' is out of range", literal)));
        }
        Ok(value)
    }

    fn eat_digits(&mut self) -> usize {
        let start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.bump();
        }
        self.pos - start
    }

    /// `(x, y)` or `[x, y]`
    fn parse_bracketed_pair(&mut self) -> Result<DataPoint> {
        let close = match self.peek() {
            Some(b'(') => b')',
            Some(b'[') => b']',
            _ => return Err(self.unexpected("'(' or '['")),
        };
        self.bump();
        let x = self.parse_number()?;
        self.expect(b',')?;
        let y = self.parse_number()?;
        self.expect(close)?;
        Ok(DataPoint::new(x, y))
    }

    /// An opening '[' starts the outer list when it is followed by a pair,
    /// a closing ']' or nothing; `[1, 2]` on its own is a bracketed pair.
    fn opens_outer_list(&self) -> bool {
        if self.peek() != Some(b'[') {
            return false;
        }
        let rest = self.text[self.pos + 1..].trim_start();
        matches!(rest.as_bytes().first(), None | Some(b'(' | b'[' | b']'))
    }

    fn parse_pair_list(&mut self) -> Result<Vec<DataPoint>> {
        self.skip_ws();
        let outer = self.opens_outer_list();
        if outer {
            self.bump();
        }

        let mut points = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some(b']') if outer => {
                    self.bump();
                    break;
                }
                None if outer => return Err(self.unexpected("']'")),
                None => break,
                Some(b'(' | b'[') => points.push(self.parse_bracketed_pair()?),
                Some(_) => return Err(self.unexpected("'(' or '['")),
            }

            self.skip_ws();
            match self.peek() {
                Some(b',') => self.bump(),
                Some(b'(' | b'[') | None => {}
                Some(b']') if outer => {}
                Some(_) => return Err(self.unexpected("',' between pairs")),
            }
        }

        self.skip_ws();
        if !self.at_end() {
            return Err(self.unexpected("end of input"));
        }
        Ok(points)
    }

    /// `x,y`, `x;y`, `x<TAB>y` or `x y` on a single line
    fn parse_line_pair(&mut self) -> Result<DataPoint> {
        let x = self.parse_number()?;
        let spaced = self.skip_ws();
        match self.peek() {
            Some(b',' | b';') => self.bump(),
            _ if spaced => {}
            _ => return Err(self.unexpected("a separator")),
        }
        let y = self.parse_number()?;
        self.skip_ws();
        if !self.at_end() {
            return Err(self.unexpected("end of line"));
        }
        Ok(DataPoint::new(x, y))
    }
}
