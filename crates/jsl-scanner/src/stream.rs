//! Code-point cursor over source text.

use crate::char_codes::CharSet;
use jsl_common::SyntaxError;

/// A cursor over the code points of a string.
///
/// Offsets reported by the stream are absolute: `origin` plus the byte
/// position inside `content`. In debug mode every character read is emitted
/// as a `trace` event.
#[derive(Clone, Debug)]
pub struct TokenStream<'a> {
    content: &'a str,
    origin: u32,
    pos: usize,
    /// Byte position of the last character read
    last: usize,
    watched: usize,
    debug: bool,
}

impl<'a> TokenStream<'a> {
    pub fn new(content: &'a str, origin: u32) -> Self {
        Self::with_debug(content, origin, false)
    }

    pub fn with_debug(content: &'a str, origin: u32, debug: bool) -> Self {
        TokenStream {
            content,
            origin,
            pos: 0,
            last: 0,
            watched: 0,
            debug,
        }
    }

    pub fn content(&self) -> &'a str {
        self.content
    }

    pub fn origin(&self) -> u32 {
        self.origin
    }

    /// Absolute offset of the next character.
    #[inline]
    pub fn offset(&self) -> u32 {
        self.origin + self.pos as u32
    }

    /// Absolute offset of the last character read.
    #[inline]
    pub fn last_offset(&self) -> u32 {
        self.origin + self.last as u32
    }

    #[inline]
    pub fn eof(&self) -> bool {
        self.pos >= self.content.len()
    }

    #[inline]
    pub fn peek_char(&self) -> Option<char> {
        self.content[self.pos..].chars().next()
    }

    pub fn peek_char_if(&self, c: char) -> bool {
        self.peek_char() == Some(c)
    }

    pub fn peek_char_in(&self, set: CharSet) -> bool {
        self.peek_char().is_some_and(|c| set.contains(c))
    }

    /// Read one character, failing with `unexpected_eof` at the end of input.
    pub fn read_char(&mut self) -> Result<char, SyntaxError> {
        let Some(c) = self.peek_char() else {
            return Err(SyntaxError::new(self.final_char_offset(), "unexpected_eof"));
        };
        if self.debug {
            tracing::trace!(offset = self.offset(), ch = ?c, "read");
        }
        self.last = self.pos;
        self.pos += c.len_utf8();
        Ok(c)
    }

    pub fn read_char_if(&mut self, c: char) -> Option<char> {
        if self.peek_char_if(c) {
            self.read_char().ok()
        } else {
            None
        }
    }

    pub fn read_char_in(&mut self, set: CharSet) -> Option<char> {
        if self.peek_char_in(set) {
            self.read_char().ok()
        } else {
            None
        }
    }

    /// Consume `literal` if the remaining input starts with it.
    pub fn read_text_if(&mut self, literal: &str) -> bool {
        if !self.content[self.pos..].starts_with(literal) {
            return false;
        }
        for _ in literal.chars() {
            if self.read_char().is_err() {
                return false;
            }
        }
        true
    }

    /// Mark the current position for `collect`.
    pub fn watch(&mut self) {
        self.watched = self.pos;
    }

    /// Everything consumed since the last `watch`.
    pub fn collect(&self) -> &'a str {
        &self.content[self.watched..self.pos]
    }

    /// Move the cursor to an absolute offset and watch from there.
    ///
    /// Offsets outside the content, or inside a character, leave the cursor
    /// untouched and return `false`.
    pub fn seek(&mut self, offset: u32) -> bool {
        let Some(pos) = offset.checked_sub(self.origin).map(|p| p as usize) else {
            return false;
        };
        if pos > self.content.len() || !self.content.is_char_boundary(pos) {
            return false;
        }
        self.pos = pos;
        self.watched = pos;
        true
    }

    /// Offset of the last character of the input.
    fn final_char_offset(&self) -> u32 {
        let last = self
            .content
            .char_indices()
            .next_back()
            .map_or(0, |(idx, _)| idx);
        self.origin + last as u32
    }
}
