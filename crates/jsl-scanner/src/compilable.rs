//! Compilable-unit probe.
//!
//! Used by the HTML extractor to decide whether the text between a
//! `<script>` start tag and the next `</script>` is a complete program, or
//! whether the script body contains a literal `</script>` (inside a string,
//! comment or regular expression) and the fragment continues past it.

use crate::token::TokenKind;
use crate::tokenizer::Tokenizer;

/// Whether a `/` after `prev` starts a regular expression.
fn slash_starts_regexp(prev: Option<TokenKind>) -> bool {
    match prev {
        None => true,
        Some(kind) if kind.is_punctuator() => !matches!(
            kind,
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace
        ),
        Some(kind) if kind.is_keyword() => !matches!(
            kind,
            TokenKind::This | TokenKind::True | TokenKind::False | TokenKind::Null
        ),
        Some(_) => false,
    }
}

/// Whether `text` forms a complete unit of source.
///
/// Text that ends inside a string, comment or regular expression, or with
/// unbalanced open brackets, is incomplete. Any other lexical error means
/// the text is complete but broken, which is left for the parser to report.
pub fn is_compilable_unit(text: &str) -> bool {
    let mut tokenizer = Tokenizer::new(text, 0);
    let mut depth = 0usize;
    let mut prev = None;

    loop {
        let result = if slash_starts_regexp(prev) {
            tokenizer.next_with_regexp()
        } else {
            tokenizer.advance()
        };
        let token = match result {
            Ok(token) => token,
            Err(err) => {
                return !matches!(
                    err.message_key.as_str(),
                    "unexpected_eof" | "unterminated_comment"
                );
            }
        };
        match token.kind {
            TokenKind::Eof => return depth == 0,
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                depth = depth.saturating_sub(1);
            }
            _ => {}
        }
        prev = Some(token.kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_programs() {
        assert!(is_compilable_unit(""));
        assert!(is_compilable_unit("var x = 1;"));
        assert!(is_compilable_unit("function f() { return a / b; }"));
        assert!(is_compilable_unit("var re = /[/]/g;"));
    }

    #[test]
    fn test_open_string_is_incomplete() {
        assert!(!is_compilable_unit("document.write(\"<script>"));
    }

    #[test]
    fn test_open_comment_is_incomplete() {
        assert!(!is_compilable_unit("/* a"));
    }

    #[test]
    fn test_open_regexp_is_incomplete() {
        assert!(!is_compilable_unit("x = /<"));
    }

    #[test]
    fn test_unbalanced_brackets_are_incomplete() {
        assert!(!is_compilable_unit("if (a) {"));
        assert!(!is_compilable_unit("f(["));
    }

    #[test]
    fn test_broken_but_complete() {
        assert!(is_compilable_unit("var 3x;"));
        assert!(is_compilable_unit("a # b"));
    }
}
