//! Character classes used by the scanner.

/// A closed set of character classes.
///
/// Identifier characters are ASCII only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharSet {
    /// Space, tab, vertical tab, form feed, NBSP and U+FFFF
    Whitespace,
    /// LF, CR, U+2028 and U+2029
    LineTerminator,
    /// Either `Whitespace` or `LineTerminator`
    Blank,
    Digit,
    HexDigit,
    /// `[A-Za-z$_]`
    Ident,
    /// `Ident` plus digits
    IdentPart,
    /// Any character of the given string
    Chars(&'static str),
}

impl CharSet {
    #[inline]
    pub fn contains(self, c: char) -> bool {
        match self {
            CharSet::Whitespace => is_whitespace(c),
            CharSet::LineTerminator => is_line_terminator(c),
            CharSet::Blank => is_whitespace(c) || is_line_terminator(c),
            CharSet::Digit => c.is_ascii_digit(),
            CharSet::HexDigit => c.is_ascii_hexdigit(),
            CharSet::Ident => is_ident_start(c),
            CharSet::IdentPart => is_ident_start(c) || c.is_ascii_digit(),
            CharSet::Chars(chars) => chars.contains(c),
        }
    }
}

#[inline]
pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{0B}' | '\u{0C}' | '\u{A0}' | '\u{FFFF}')
}

#[inline]
pub fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

#[inline]
pub fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '$' || c == '_'
}

#[inline]
pub fn is_ident_part(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}
