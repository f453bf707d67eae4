//! Recursive-descent reader for the text key-value format.
//!
//! Grammar (whitespace and `//` comments between tokens are skipped):
//!
//! ```text
//! document := pair* EOF
//! block    := "{" pair* "}"
//! pair     := STRING (STRING | block)
//! ```
//!
//! Strings are double-quoted. `\\`, `\"`, `\n` and `\t` are unescaped; any
//! other backslash sequence is kept as written (Windows paths show up in
//! these files with single backslashes more often than not).

use core::fmt;
use std::{iter::Peekable, str::Chars};

use crate::vdf::record::Record;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    UnterminatedString,
    UnexpectedChar(char),
    UnexpectedCloseBrace,
    /// A `{` where a key was expected.
    ExpectedKey,
    /// Input ended after a key, before its value.
    UnexpectedEof,
    /// Input ended inside a block; position is the block's `{`.
    UnclosedBlock,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::UnterminatedString => f.write_str("unterminated string"),
            ParseErrorKind::UnexpectedChar(c) => write!(f, "unexpected character {c:?}"),
            ParseErrorKind::UnexpectedCloseBrace => f.write_str("unexpected '}'"),
            ParseErrorKind::ExpectedKey => f.write_str("expected a quoted key, found '{'"),
            ParseErrorKind::UnexpectedEof => f.write_str("unexpected end of input after key"),
            ParseErrorKind::UnclosedBlock => f.write_str("block is never closed"),
        }
    }
}

/// 1-based position of the offending token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub kind: ParseErrorKind,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}: {}", self.line, self.column, self.kind)
    }
}

impl std::error::Error for ParseError {}

/// Parse a whole document into its top-level record.
pub fn parse(text: &str) -> Result<Record, ParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut p = Parser {
        chars: text.chars().peekable(),
        line: 1,
        column: 1,
    };
    p.pairs(None)
}

enum Token {
    Str(String),
    Open,
    Close,
}

struct Spanned {
    tok: Token,
    line: usize,
    column: usize,
}

struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
}

impl Parser<'_> {
    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn err_at(line: usize, column: usize, kind: ParseErrorKind) -> ParseError {
        ParseError { line, column, kind }
    }

    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() {
                self.bump();
            } else if c == '/' {
                let (line, column) = (self.line, self.column);
                self.bump();
                if self.chars.peek() != Some(&'/') {
                    return Err(Self::err_at(line, column, ParseErrorKind::UnexpectedChar('/')));
                }
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
        Ok(())
    }

    fn next_token(&mut self) -> Result<Option<Spanned>, ParseError> {
        self.skip_trivia()?;
        let (line, column) = (self.line, self.column);
        let Some(c) = self.bump() else {
            return Ok(None);
        };
        let tok = match c {
            '{' => Token::Open,
            '}' => Token::Close,
            '"' => Token::Str(self.string_body(line, column)?),
            other => return Err(Self::err_at(line, column, ParseErrorKind::UnexpectedChar(other))),
        };
        Ok(Some(Spanned { tok, line, column }))
    }

    // Opening quote already consumed.
    fn string_body(&mut self, line: usize, column: usize) -> Result<String, ParseError> {
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(Self::err_at(line, column, ParseErrorKind::UnterminatedString)),
                Some('"') => return Ok(out),
                Some('\\') => match self.bump() {
                    None => {
                        return Err(Self::err_at(line, column, ParseErrorKind::UnterminatedString));
                    }
                    Some('\\') => out.push('\\'),
                    Some('"') => out.push('"'),
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(other) => {
                        out.push('\\');
                        out.push(other);
                    }
                },
                Some(c) => out.push(c),
            }
        }
    }

    /// Read pairs until EOF (top level, `opened_at == None`) or the `}` closing
    /// the block opened at `opened_at`.
    fn pairs(&mut self, opened_at: Option<(usize, usize)>) -> Result<Record, ParseError> {
        let mut rec = Record::new();
        loop {
            let Some(t) = self.next_token()? else {
                return match opened_at {
                    None => Ok(rec),
                    Some((line, column)) => {
                        Err(Self::err_at(line, column, ParseErrorKind::UnclosedBlock))
                    }
                };
            };
            let key = match t.tok {
                Token::Str(key) => key,
                Token::Close if opened_at.is_some() => return Ok(rec),
                Token::Close => {
                    return Err(Self::err_at(t.line, t.column, ParseErrorKind::UnexpectedCloseBrace));
                }
                Token::Open => {
                    return Err(Self::err_at(t.line, t.column, ParseErrorKind::ExpectedKey));
                }
            };
            match self.next_token()? {
                None => {
                    return Err(Self::err_at(self.line, self.column, ParseErrorKind::UnexpectedEof));
                }
                Some(Spanned {
                    tok: Token::Str(value),
                    ..
                }) => {
                    rec.insert(key, value);
                }
                Some(Spanned {
                    tok: Token::Open,
                    line,
                    column,
                }) => {
                    let child = self.pairs(Some((line, column)))?;
                    rec.insert(key, child);
                }
                Some(Spanned {
                    tok: Token::Close,
                    line,
                    column,
                }) => {
                    return Err(Self::err_at(line, column, ParseErrorKind::UnexpectedCloseBrace));
                }
            }
        }
    }
}
