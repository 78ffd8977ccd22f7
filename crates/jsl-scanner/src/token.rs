//! Token kinds and token values.

use serde::{Deserialize, Serialize};

/// The closed set of token kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Trivia
    Eol,
    Space,
    CComment,
    CppComment,
    HtmlComment,
    Eof,
    Error,

    // Literals and names
    Name,
    Number,
    String,
    Regexp,

    // Keywords
    Break,
    Case,
    Catch,
    Const,
    Continue,
    Debugger,
    Default,
    Delete,
    Do,
    Else,
    False,
    Finally,
    For,
    Function,
    If,
    In,
    Instanceof,
    New,
    Null,
    Return,
    Switch,
    This,
    Throw,
    True,
    Try,
    Typeof,
    Var,
    Void,
    While,
    With,

    // Punctuators
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Semi,
    Comma,
    Dot,
    Hook,
    Colon,
    BitNot,
    Not,
    Assign,
    Eq,
    StrictEq,
    Ne,
    StrictNe,
    Lt,
    Le,
    Lsh,
    LshAssign,
    Gt,
    Ge,
    Rsh,
    RshAssign,
    Ursh,
    UrshAssign,
    Plus,
    PlusAssign,
    Inc,
    Minus,
    MinusAssign,
    Dec,
    Star,
    StarAssign,
    Div,
    DivAssign,
    Mod,
    ModAssign,
    BitAnd,
    BitAndAssign,
    And,
    BitOr,
    BitOrAssign,
    Or,
    BitXor,
    BitXorAssign,
}

/// Punctuator spellings. Every prefix of an entry is itself an entry.
pub(crate) static PUNCTUATORS: &[(&str, TokenKind)] = &[
    ("{", TokenKind::LBrace),
    ("}", TokenKind::RBrace),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("[", TokenKind::LBracket),
    ("]", TokenKind::RBracket),
    (";", TokenKind::Semi),
    (",", TokenKind::Comma),
    (".", TokenKind::Dot),
    ("?", TokenKind::Hook),
    (":", TokenKind::Colon),
    ("~", TokenKind::BitNot),
    ("!", TokenKind::Not),
    ("!=", TokenKind::Ne),
    ("!==", TokenKind::StrictNe),
    ("=", TokenKind::Assign),
    ("==", TokenKind::Eq),
    ("===", TokenKind::StrictEq),
    ("<", TokenKind::Lt),
    ("<=", TokenKind::Le),
    ("<<", TokenKind::Lsh),
    ("<<=", TokenKind::LshAssign),
    (">", TokenKind::Gt),
    (">=", TokenKind::Ge),
    (">>", TokenKind::Rsh),
    (">>=", TokenKind::RshAssign),
    (">>>", TokenKind::Ursh),
    (">>>=", TokenKind::UrshAssign),
    ("+", TokenKind::Plus),
    ("+=", TokenKind::PlusAssign),
    ("++", TokenKind::Inc),
    ("-", TokenKind::Minus),
    ("-=", TokenKind::MinusAssign),
    ("--", TokenKind::Dec),
    ("*", TokenKind::Star),
    ("*=", TokenKind::StarAssign),
    ("/", TokenKind::Div),
    ("/=", TokenKind::DivAssign),
    ("%", TokenKind::Mod),
    ("%=", TokenKind::ModAssign),
    ("&", TokenKind::BitAnd),
    ("&=", TokenKind::BitAndAssign),
    ("&&", TokenKind::And),
    ("|", TokenKind::BitOr),
    ("|=", TokenKind::BitOrAssign),
    ("||", TokenKind::Or),
    ("^", TokenKind::BitXor),
    ("^=", TokenKind::BitXorAssign),
];

/// Look up an exact punctuator spelling.
pub(crate) fn punctuator_kind(text: &str) -> Option<TokenKind> {
    PUNCTUATORS
        .iter()
        .find(|(spelling, _)| *spelling == text)
        .map(|(_, kind)| *kind)
}

/// Whether some punctuator starts with `prefix`.
pub(crate) fn is_punctuator_prefix(prefix: &str) -> bool {
    PUNCTUATORS
        .iter()
        .any(|(spelling, _)| spelling.starts_with(prefix))
}

/// Classify an identifier-shaped atom.
pub fn keyword_kind(atom: &str) -> Option<TokenKind> {
    let kind = match atom {
        "break" => TokenKind::Break,
        "case" => TokenKind::Case,
        "catch" => TokenKind::Catch,
        "const" => TokenKind::Const,
        "continue" => TokenKind::Continue,
        "debugger" => TokenKind::Debugger,
        "default" => TokenKind::Default,
        "delete" => TokenKind::Delete,
        "do" => TokenKind::Do,
        "else" => TokenKind::Else,
        "false" => TokenKind::False,
        "finally" => TokenKind::Finally,
        "for" => TokenKind::For,
        "function" => TokenKind::Function,
        "if" => TokenKind::If,
        "in" => TokenKind::In,
        "instanceof" => TokenKind::Instanceof,
        "new" => TokenKind::New,
        "null" => TokenKind::Null,
        "return" => TokenKind::Return,
        "switch" => TokenKind::Switch,
        "this" => TokenKind::This,
        "throw" => TokenKind::Throw,
        "true" => TokenKind::True,
        "try" => TokenKind::Try,
        "typeof" => TokenKind::Typeof,
        "var" => TokenKind::Var,
        "void" => TokenKind::Void,
        "while" => TokenKind::While,
        "with" => TokenKind::With,
        _ => return None,
    };
    Some(kind)
}

impl TokenKind {
    /// Trivia never reaches the grammar consumer.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Eol
                | TokenKind::Space
                | TokenKind::CComment
                | TokenKind::CppComment
                | TokenKind::HtmlComment
        )
    }

    pub fn is_keyword(self) -> bool {
        (TokenKind::Break as u8..=TokenKind::With as u8).contains(&(self as u8))
    }

    pub fn is_punctuator(self) -> bool {
        (TokenKind::LBrace as u8..=TokenKind::BitXorAssign as u8).contains(&(self as u8))
    }

    /// Source spelling for keywords and punctuators, a descriptive name
    /// otherwise. Used in `expected_tok` messages.
    pub fn text(self) -> &'static str {
        if let Some((spelling, _)) = PUNCTUATORS.iter().find(|(_, kind)| *kind == self) {
            return spelling;
        }
        match self {
            TokenKind::Eol => "end of line",
            TokenKind::Space => "whitespace",
            TokenKind::CComment | TokenKind::CppComment | TokenKind::HtmlComment => "comment",
            TokenKind::Eof => "end of file",
            TokenKind::Error => "error",
            TokenKind::Name => "identifier",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Regexp => "regular expression",
            TokenKind::Break => "break",
            TokenKind::Case => "case",
            TokenKind::Catch => "catch",
            TokenKind::Const => "const",
            TokenKind::Continue => "continue",
            TokenKind::Debugger => "debugger",
            TokenKind::Default => "default",
            TokenKind::Delete => "delete",
            TokenKind::Do => "do",
            TokenKind::Else => "else",
            TokenKind::False => "false",
            TokenKind::Finally => "finally",
            TokenKind::For => "for",
            TokenKind::Function => "function",
            TokenKind::If => "if",
            TokenKind::In => "in",
            TokenKind::Instanceof => "instanceof",
            TokenKind::New => "new",
            TokenKind::Null => "null",
            TokenKind::Return => "return",
            TokenKind::Switch => "switch",
            TokenKind::This => "this",
            TokenKind::Throw => "throw",
            TokenKind::True => "true",
            TokenKind::Try => "try",
            TokenKind::Typeof => "typeof",
            TokenKind::Var => "var",
            TokenKind::Void => "void",
            TokenKind::While => "while",
            TokenKind::With => "with",
            _ => "punctuator",
        }
    }
}

/// A scanned token.
///
/// `end_offset` is inclusive. `Eof` has `start_offset == end_offset == `
/// the offset just past the input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atom: Option<String>,
    pub start_offset: u32,
    pub end_offset: u32,
    /// Diagnostic key for `Error` tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_key: Option<String>,
}

impl Token {
    pub fn new(kind: TokenKind, start_offset: u32, end_offset: u32) -> Self {
        Token {
            kind,
            atom: None,
            start_offset,
            end_offset,
            error_key: None,
        }
    }

    pub fn with_atom(mut self, atom: impl Into<String>) -> Self {
        self.atom = Some(atom.into());
        self
    }

    /// An error token positioned at a single offset.
    pub fn error(offset: u32, key: Option<&str>) -> Self {
        Token {
            kind: TokenKind::Error,
            atom: None,
            start_offset: offset,
            end_offset: offset,
            error_key: key.map(str::to_string),
        }
    }

    pub fn atom(&self) -> &str {
        self.atom.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_punctuator_prefix_is_a_punctuator() {
        for (spelling, _) in PUNCTUATORS {
            for end in 1..spelling.len() {
                assert!(
                    punctuator_kind(&spelling[..end]).is_some(),
                    "prefix {:?} of {spelling:?} is not a punctuator",
                    &spelling[..end]
                );
            }
        }
    }

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(keyword_kind("function"), Some(TokenKind::Function));
        assert_eq!(keyword_kind("Function"), None);
        assert_eq!(keyword_kind("let"), None);
    }

    #[test]
    fn test_kind_ranges() {
        assert!(TokenKind::Break.is_keyword());
        assert!(TokenKind::With.is_keyword());
        assert!(!TokenKind::Name.is_keyword());
        assert!(TokenKind::LBrace.is_punctuator());
        assert!(TokenKind::Div.is_punctuator());
        assert!(!TokenKind::With.is_punctuator());
        assert!(TokenKind::CppComment.is_trivia());
        assert!(!TokenKind::Eof.is_trivia());
    }

    #[test]
    fn test_text() {
        assert_eq!(TokenKind::UrshAssign.text(), ">>>=");
        assert_eq!(TokenKind::Var.text(), "var");
        assert_eq!(TokenKind::Name.text(), "identifier");
    }
}
