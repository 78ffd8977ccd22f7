//! Tokenizer state machine.
//!
//! The tokenizer produces one token per call. Trivia (whitespace, line
//! breaks and comments) is scanned like any other token but skipped by the
//! lookahead API, except that `peek_sameline` reports a line break so that a
//! grammar consumer can apply automatic semicolon insertion.
//!
//! # Division and regular expressions
//!
//! `advance` always classifies a leading `/` as `Div` (or `DivAssign`). A
//! grammar consumer that knows a regular expression is legal at the current
//! position calls `next_with_regexp` instead, which re-scans the pending
//! slash token in regular-expression mode.
//!
//! # Errors
//!
//! Lexical problems surface as `Error` tokens that are converted to a
//! `SyntaxError` when they are consumed. Once an error has been returned the
//! tokenizer is poisoned: every later call fails with `tokenizer_poisoned`.

use crate::char_codes::{CharSet, is_ident_start, is_line_terminator};
use crate::stream::TokenStream;
use crate::token::{Token, TokenKind, is_punctuator_prefix, keyword_kind, punctuator_kind};
use jsl_common::SyntaxError;
use smallvec::SmallVec;

pub struct Tokenizer<'a> {
    stream: TokenStream<'a>,
    /// Skipped trivia followed by one significant token
    peeked: SmallVec<[Token; 4]>,
    poisoned: bool,
    /// Set once the iterator has yielded `Eof` or an error
    exhausted: bool,
}

impl<'a> Tokenizer<'a> {
    /// Tokenize `text`, whose first character sits at absolute `origin`.
    pub fn new(text: &'a str, origin: u32) -> Self {
        Self::with_debug(text, origin, false)
    }

    pub fn with_debug(text: &'a str, origin: u32, debug: bool) -> Self {
        Tokenizer {
            stream: TokenStream::with_debug(text, origin, debug),
            peeked: SmallVec::new(),
            poisoned: false,
            exhausted: false,
        }
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// The next significant token, without consuming it.
    ///
    /// Error tokens are returned as-is; they are raised when consumed.
    pub fn peek(&mut self) -> Result<&Token, SyntaxError> {
        self.fill()?;
        let offset = self.stream.offset();
        self.peeked
            .last()
            .ok_or_else(|| SyntaxError::new(offset, "syntax_error"))
    }

    /// Like `peek`, but returns the first `Eol` among the skipped trivia
    /// when the next significant token is on a later line.
    pub fn peek_sameline(&mut self) -> Result<&Token, SyntaxError> {
        self.fill()?;
        let offset = self.stream.offset();
        let trivia = self.peeked.len().saturating_sub(1);
        self.peeked[..trivia]
            .iter()
            .find(|t| t.kind == TokenKind::Eol)
            .or_else(|| self.peeked.last())
            .ok_or_else(|| SyntaxError::new(offset, "syntax_error"))
    }

    /// Consume the next significant token, classifying `/` as division.
    pub fn advance(&mut self) -> Result<Token, SyntaxError> {
        let token = self.take_peeked()?;
        self.raise_if_error(token)
    }

    /// Consume the next significant token, re-scanning a pending `/` or
    /// `/=` as a regular-expression literal.
    pub fn next_with_regexp(&mut self) -> Result<Token, SyntaxError> {
        let token = self.take_peeked()?;
        if !matches!(token.kind, TokenKind::Div | TokenKind::DivAssign) {
            return self.raise_if_error(token);
        }

        let start = token.start_offset;
        if !self.stream.seek(start) {
            return self.poison(SyntaxError::new(start, "syntax_error"));
        }
        let rescanned = match self.stream.read_char().and_then(|_| self.scan_regexp(start)) {
            Ok(token) => token,
            Err(err) => return self.poison(err),
        };
        self.raise_if_error(rescanned)
    }

    /// Consume the next significant token, which must be of `kind`.
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, SyntaxError> {
        let token = self.advance()?;
        if token.kind != kind {
            return self.poison(
                SyntaxError::new(token.start_offset, "expected_tok").with_arg("token", kind.text()),
            );
        }
        Ok(token)
    }

    /// Consume an identifier name: a plain name or a keyword, as allowed
    /// after `.` in member expressions.
    pub fn expect_identifier_name(&mut self) -> Result<Token, SyntaxError> {
        let token = self.advance()?;
        if token.kind != TokenKind::Name && !token.kind.is_keyword() {
            return self.poison(SyntaxError::new(token.start_offset, "syntax_error"));
        }
        Ok(token)
    }

    fn fill(&mut self) -> Result<(), SyntaxError> {
        self.check_poisoned()?;
        if !self.peeked.is_empty() {
            return Ok(());
        }
        loop {
            let token = match self.next_raw() {
                Ok(token) => token,
                Err(err) => {
                    self.peeked.clear();
                    return self.poison(err);
                }
            };
            let trivia = token.kind.is_trivia();
            self.peeked.push(token);
            if !trivia {
                return Ok(());
            }
        }
    }

    fn take_peeked(&mut self) -> Result<Token, SyntaxError> {
        self.fill()?;
        let offset = self.stream.offset();
        let token = self.peeked.pop();
        self.peeked.clear();
        token.ok_or_else(|| SyntaxError::new(offset, "syntax_error"))
    }

    fn raise_if_error(&mut self, token: Token) -> Result<Token, SyntaxError> {
        if token.kind != TokenKind::Error {
            return Ok(token);
        }
        let key = token.error_key.as_deref().unwrap_or("syntax_error");
        let err = SyntaxError::new(token.start_offset, key);
        self.poison(err)
    }

    fn poison<T>(&mut self, err: SyntaxError) -> Result<T, SyntaxError> {
        tracing::debug!(offset = err.offset, key = %err.message_key, "tokenizer error");
        self.poisoned = true;
        Err(err)
    }

    fn check_poisoned(&self) -> Result<(), SyntaxError> {
        if self.poisoned {
            return Err(SyntaxError::new(self.stream.offset(), "tokenizer_poisoned"));
        }
        Ok(())
    }

    /// Scan one token, trivia included.
    fn next_raw(&mut self) -> Result<Token, SyntaxError> {
        self.stream.watch();
        let start = self.stream.offset();
        if self.stream.eof() {
            return Ok(Token::new(TokenKind::Eof, start, start));
        }

        let c = self.stream.read_char()?;

        if CharSet::Blank.contains(c) {
            let mut line_break = is_line_terminator(c);
            loop {
                if self.stream.read_char_in(CharSet::LineTerminator).is_some() {
                    line_break = true;
                } else if self.stream.read_char_in(CharSet::Whitespace).is_none() {
                    break;
                }
            }
            let kind = if line_break {
                TokenKind::Eol
            } else {
                TokenKind::Space
            };
            return Ok(Token::new(kind, start, self.stream.last_offset()));
        }

        if c == '/' {
            if self.stream.read_char_if('/').is_some() {
                self.skip_to_line_end()?;
                return Ok(self.comment(TokenKind::CppComment, start, 2, 0));
            }
            if self.stream.read_char_if('*').is_some() {
                loop {
                    if self.stream.eof() {
                        let offset = self.stream.last_offset();
                        return Ok(Token::error(offset, Some("unterminated_comment")));
                    }
                    let c = self.stream.read_char()?;
                    if c == '*' && self.stream.read_char_if('/').is_some() {
                        return Ok(self.comment(TokenKind::CComment, start, 2, 2));
                    }
                }
            }
        }

        if c == '<' && self.stream.read_text_if("!--") {
            self.skip_to_line_end()?;
            return Ok(self.comment(TokenKind::HtmlComment, start, 4, 0));
        }

        if c == '\'' || c == '"' {
            loop {
                let next = self.stream.read_char()?;
                if next == c {
                    break;
                }
                if next == '\\' {
                    self.stream.read_char()?;
                }
            }
            let text = self.stream.collect();
            let atom = &text[1..text.len() - 1];
            return Ok(Token::new(TokenKind::String, start, self.stream.last_offset()).with_atom(atom));
        }

        if c.is_ascii_digit() || (c == '.' && self.stream.peek_char_in(CharSet::Digit)) {
            return self.scan_number(c, start);
        }

        if is_ident_start(c) {
            while self.stream.read_char_in(CharSet::IdentPart).is_some() {}
            let atom = self.stream.collect();
            let kind = keyword_kind(atom).unwrap_or(TokenKind::Name);
            return Ok(Token::new(kind, start, self.stream.last_offset()).with_atom(atom));
        }

        self.scan_punctuator(c, start)
    }

    fn skip_to_line_end(&mut self) -> Result<(), SyntaxError> {
        while !self.stream.eof() && !self.stream.peek_char_in(CharSet::LineTerminator) {
            self.stream.read_char()?;
        }
        Ok(())
    }

    /// Build a comment token whose atom drops `open` leading and `close`
    /// trailing delimiter bytes.
    fn comment(&self, kind: TokenKind, start: u32, open: usize, close: usize) -> Token {
        let text = self.stream.collect();
        let atom = &text[open..text.len() - close];
        Token::new(kind, start, self.stream.last_offset()).with_atom(atom)
    }

    fn scan_number(&mut self, first: char, start: u32) -> Result<Token, SyntaxError> {
        if first == '0' && self.stream.read_char_in(CharSet::Chars("xX")).is_some() {
            while self.stream.read_char_in(CharSet::HexDigit).is_some() {}
        } else if first == '0' && self.stream.peek_char_in(CharSet::Digit) {
            // Legacy octal. Digits 8 and 9 are accepted here as well.
            while self.stream.read_char_in(CharSet::Digit).is_some() {}
        } else {
            if first != '.' {
                while self.stream.read_char_in(CharSet::Digit).is_some() {}
                self.stream.read_char_if('.');
            }
            while self.stream.read_char_in(CharSet::Digit).is_some() {}
            if self.stream.read_char_in(CharSet::Chars("eE")).is_some() {
                self.stream.read_char_in(CharSet::Chars("+-"));
                if self.stream.read_char_in(CharSet::Digit).is_none() {
                    return Err(SyntaxError::new(self.stream.offset(), "syntax_error"));
                }
                while self.stream.read_char_in(CharSet::Digit).is_some() {}
            }
        }

        if self.stream.peek_char_in(CharSet::Ident) {
            return Ok(Token::error(self.stream.last_offset(), None));
        }
        let atom = self.stream.collect();
        Ok(Token::new(TokenKind::Number, start, self.stream.last_offset()).with_atom(atom))
    }

    fn scan_punctuator(&mut self, first: char, start: u32) -> Result<Token, SyntaxError> {
        let mut text = String::from(first);
        if !is_punctuator_prefix(&text) {
            return Err(SyntaxError::new(self.stream.last_offset(), "syntax_error"));
        }
        while let Some(next) = self.stream.peek_char() {
            text.push(next);
            if !is_punctuator_prefix(&text) {
                text.pop();
                break;
            }
            self.stream.read_char()?;
        }
        match punctuator_kind(&text) {
            Some(kind) => Ok(Token::new(kind, start, self.stream.last_offset())),
            None => Err(SyntaxError::new(self.stream.offset(), "syntax_error")),
        }
    }

    /// Scan the body and flags of a regular expression whose opening slash
    /// at `start` has already been read.
    fn scan_regexp(&mut self, start: u32) -> Result<Token, SyntaxError> {
        loop {
            let c = self.stream.read_char()?;
            if is_line_terminator(c) {
                return Ok(Token::error(self.stream.last_offset(), None));
            }
            match c {
                '\\' => {
                    if is_line_terminator(self.stream.read_char()?) {
                        return Ok(Token::error(self.stream.last_offset(), None));
                    }
                }
                '[' => loop {
                    let c = self.stream.read_char()?;
                    if is_line_terminator(c) {
                        return Ok(Token::error(self.stream.last_offset(), None));
                    }
                    if c == '\\' {
                        if is_line_terminator(self.stream.read_char()?) {
                            return Ok(Token::error(self.stream.last_offset(), None));
                        }
                    } else if c == ']' {
                        break;
                    }
                },
                '/' => break,
                _ => {}
            }
        }

        // Flags are not validated.
        while self.stream.read_char_in(CharSet::IdentPart).is_some() {}

        let atom = self.stream.collect();
        Ok(Token::new(TokenKind::Regexp, start, self.stream.last_offset()).with_atom(atom))
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Token, SyntaxError>;

    /// Yields significant tokens, stopping after `Eof` or the first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        match self.advance() {
            Ok(token) if token.kind == TokenKind::Eof => {
                self.exhausted = true;
                None
            }
            Ok(token) => Some(Ok(token)),
            Err(err) => {
                self.exhausted = true;
                Some(Err(err))
            }
        }
    }
}
