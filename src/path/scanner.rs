//! Tokenizer for path expressions.
//!
//! Tokens are produced into a queue that the parser drains; a fetch cycle
//! that neither queues a token nor reaches end of input trips the activity
//! counter and aborts, so a wedged scanner cannot loop forever. Quoted and
//! flow map keys are measured here and handed to the YAML parser as one
//! complete fragment.

use std::collections::VecDeque;

use crate::document::parser::parse_key_fragment;

use super::error::PathError;
use super::reader::Reader;
use super::token::{Span, Token, TokenKind};

/// Name-start class for simple keys, aliases and anchors.
fn is_first_alpha(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

/// Name-continuation class.
fn is_alnum(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_flow_key_start(c: char) -> bool {
    matches!(c, '"' | '\'' | '{' | '[')
}

/// Streaming tokenizer over a path expression.
pub struct Scanner {
    reader: Reader,
    queue: VecDeque<Token>,
    stream_start_produced: bool,
    stream_end_produced: bool,
    token_activity: usize,
}

impl Scanner {
    pub fn new(input: &str) -> Self {
        Self {
            reader: Reader::new(input),
            queue: VecDeque::new(),
            stream_start_produced: false,
            stream_end_produced: false,
            token_activity: 0,
        }
    }

    /// Removes and returns the next token, fetching more as needed.
    pub fn next_token(&mut self) -> Result<Token, PathError> {
        loop {
            if let Some(token) = self.queue.pop_front() {
                return Ok(token);
            }
            if self.stream_end_produced {
                // produce stream end continuously
                let here = self.reader.pos();
                return Ok(Token::new(TokenKind::StreamEnd, Span::new(here, here)));
            }
            let before = self.token_activity;
            self.fetch_tokens()?;
            if self.token_activity == before {
                // the fetch state machine is stuck
                return Err(PathError::internal(
                    "out of tokens and failed to produce any more",
                ));
            }
        }
    }

    fn queue_token(&mut self, kind: TokenKind, span: Span) {
        self.queue.push_back(Token::new(kind, span));
        self.token_activity += 1;
    }

    fn fetch_tokens(&mut self) -> Result<(), PathError> {
        if !self.stream_start_produced {
            let here = self.reader.pos();
            self.queue_token(TokenKind::StreamStart, Span::new(here, here));
            self.stream_start_produced = true;
            return Ok(());
        }

        let Some(c) = self.reader.peek() else {
            // produced continuously once the input runs out
            let here = self.reader.pos();
            self.queue_token(TokenKind::StreamEnd, Span::new(here, here));
            self.stream_end_produced = true;
            return Ok(());
        };

        let start = self.reader.pos();

        // single- and double-character tokens
        let simple = match c {
            '/' => Some((TokenKind::Slash, 1)),
            '^' => Some((TokenKind::Root, 1)),
            ':' => Some((TokenKind::Sibling, 1)),
            '$' => Some((TokenKind::ScalarFilter, 1)),
            '%' => Some((TokenKind::CollectionFilter, 1)),
            ',' => Some((TokenKind::Comma, 1)),
            '[' if self.reader.peek_at(1) == Some(']') => Some((TokenKind::SeqFilter, 2)),
            '{' if self.reader.peek_at(1) == Some('}') => Some((TokenKind::MapFilter, 2)),
            '.' => {
                if self.reader.peek_at(1) == Some('.') {
                    Some((TokenKind::Parent, 2))
                } else {
                    Some((TokenKind::This, 1))
                }
            }
            '*' => {
                if self.reader.peek_at(1) == Some('*') {
                    Some((TokenKind::EveryChildRecursive, 2))
                } else if !self.reader.peek_at(1).is_some_and(is_first_alpha) {
                    Some((TokenKind::EveryChild, 1))
                } else {
                    None // alias, handled below
                }
            }
            _ => None,
        };
        if let Some((kind, width)) = simple {
            self.reader.advance(width);
            self.queue_token(kind, self.reader.span_from(start));
            return Ok(());
        }

        if c == '*' {
            return self.fetch_alias();
        }
        if is_first_alpha(c) {
            return self.fetch_simple_key();
        }
        if is_flow_key_start(c) {
            return self.fetch_flow_key();
        }
        if c.is_ascii_digit() || (c == '-' && self.reader.peek_at(1).is_some_and(|d| d.is_ascii_digit()))
        {
            return self.fetch_seq_index_or_slice();
        }

        Err(PathError::syntax(
            "bad path expression starts here",
            Span::new(start, start + 1),
        ))
    }

    fn fetch_alias(&mut self) -> Result<(), PathError> {
        let start = self.reader.pos();
        self.reader.advance(1); // the `*`
        let mut name = String::new();
        while let Some(c) = self.reader.peek() {
            if !is_alnum(c) {
                break;
            }
            name.push(c);
            self.reader.advance(1);
        }
        self.queue_token(TokenKind::Alias(name), self.reader.span_from(start));
        Ok(())
    }

    fn fetch_simple_key(&mut self) -> Result<(), PathError> {
        let start = self.reader.pos();
        let mut name = String::new();
        while let Some(c) = self.reader.peek() {
            if !is_alnum(c) {
                break;
            }
            name.push(c);
            self.reader.advance(1);
        }
        self.queue_token(TokenKind::SimpleKey(name), self.reader.span_from(start));
        Ok(())
    }

    /// Measures one complete quoted/flow construct and parses it as a key
    /// fragment.
    fn fetch_flow_key(&mut self) -> Result<(), PathError> {
        let start = self.reader.pos();
        let width = self.flow_extent(start)?;
        let text = self.reader.peek_text(width);
        self.reader.advance(width);
        let span = self.reader.span_from(start);

        let fragment = parse_key_fragment(&text)
            .map_err(|err| PathError::syntax(format!("{:#}", err), span))?;
        self.queue_token(TokenKind::FlowKey(fragment), span);
        Ok(())
    }

    /// Width in code points of the flow construct at the cursor, delimiters
    /// included. Quotes honor their escape style; braces and brackets balance
    /// by nesting count.
    fn flow_extent(&self, start: usize) -> Result<usize, PathError> {
        let open = self.reader.peek().unwrap_or_default();
        let truncated = |end: usize| PathError::Truncated {
            construct: "flow map key",
            span: Span::new(start, end),
        };

        match open {
            '"' => {
                let mut i = 1;
                loop {
                    match self.reader.peek_at(i) {
                        None => return Err(truncated(start + i)),
                        Some('\\') => i += 2,
                        Some('"') => return Ok(i + 1),
                        Some(_) => i += 1,
                    }
                }
            }
            '\'' => {
                let mut i = 1;
                loop {
                    match self.reader.peek_at(i) {
                        None => return Err(truncated(start + i)),
                        Some('\'') => {
                            if self.reader.peek_at(i + 1) == Some('\'') {
                                i += 2; // doubled quote is an escape
                            } else {
                                return Ok(i + 1);
                            }
                        }
                        Some(_) => i += 1,
                    }
                }
            }
            '{' | '[' => {
                let close = if open == '{' { '}' } else { ']' };
                let mut nest = 1;
                let mut i = 1;
                loop {
                    match self.reader.peek_at(i) {
                        None => return Err(truncated(start + i)),
                        Some(c) if c == open => nest += 1,
                        Some(c) if c == close => {
                            nest -= 1;
                            if nest == 0 {
                                return Ok(i + 1);
                            }
                        }
                        Some(_) => {}
                    }
                    i += 1;
                }
            }
            _ => Err(PathError::internal("flow extent on a non-flow character")),
        }
    }

    fn fetch_seq_index_or_slice(&mut self) -> Result<(), PathError> {
        let start = self.reader.pos();
        let negative = self.reader.peek() == Some('-');
        if negative {
            self.reader.advance(1);
        }
        let first = self.read_number(start)?;
        let first = if negative { -first } else { first };

        // a nonnegative number followed by `:` extends into a slice; the
        // second bound is optional and means "to end"
        if !negative && self.reader.peek() == Some(':') {
            if self.reader.peek_at(1).is_some_and(|d| d.is_ascii_digit()) {
                self.reader.advance(1);
                let second = self.read_number(start)?;
                self.queue_token(
                    TokenKind::SeqSlice {
                        start: first,
                        end: Some(second),
                    },
                    self.reader.span_from(start),
                );
                return Ok(());
            }
            self.reader.advance(1);
            self.queue_token(
                TokenKind::SeqSlice {
                    start: first,
                    end: None,
                },
                self.reader.span_from(start),
            );
            return Ok(());
        }

        self.queue_token(TokenKind::SeqIndex(first), self.reader.span_from(start));
        Ok(())
    }

    /// Reads a run of decimal digits with overflow checking. A leading zero
    /// is only valid as a lone digit.
    fn read_number(&mut self, token_start: usize) -> Result<i32, PathError> {
        let mut value: i32 = 0;
        let mut digits = 0;
        let mut leading_zero = false;
        while let Some(c) = self.reader.peek() {
            let Some(digit) = c.to_digit(10) else {
                break;
            };
            if digits == 0 {
                leading_zero = digit == 0;
            }
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(digit as i32))
                .ok_or_else(|| PathError::Overflow {
                    span: Span::new(token_start, self.reader.pos() + 1),
                })?;
            digits += 1;
            self.reader.advance(1);
        }
        if digits == 0 || (leading_zero && digits > 1) {
            return Err(PathError::syntax(
                "bad number",
                Span::new(token_start, self.reader.pos()),
            ));
        }
        Ok(value)
    }
}
