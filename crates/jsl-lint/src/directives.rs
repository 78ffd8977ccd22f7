//! Control comments.
//!
//! A control comment is either `/*jsl:keyword params*/` or the legacy
//! `/*@keyword params@*/`. Keywords are case-insensitive and must be followed
//! by whitespace or the end of the comment.

use jsl_scanner::char_codes::{is_ident_part, is_ident_start};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DirectiveKeyword {
    IgnoreAll,
    Ignore,
    End,
    OptionExplicit,
    Import,
    Fallthru,
    Pass,
    Declare,
    Unused,
    ContentType,
}

/// Keyword spellings, longest first.
const KEYWORDS: &[(&str, DirectiveKeyword)] = &[
    ("option explicit", DirectiveKeyword::OptionExplicit),
    ("content-type", DirectiveKeyword::ContentType),
    ("ignoreall", DirectiveKeyword::IgnoreAll),
    ("fallthru", DirectiveKeyword::Fallthru),
    ("declare", DirectiveKeyword::Declare),
    ("ignore", DirectiveKeyword::Ignore),
    ("import", DirectiveKeyword::Import),
    ("unused", DirectiveKeyword::Unused),
    ("pass", DirectiveKeyword::Pass),
    ("end", DirectiveKeyword::End),
];

impl DirectiveKeyword {
    pub fn as_str(self) -> &'static str {
        KEYWORDS
            .iter()
            .find(|(_, kw)| *kw == self)
            .map(|(text, _)| *text)
            .unwrap_or("")
    }

    fn takes_params(self) -> bool {
        matches!(
            self,
            DirectiveKeyword::Import
                | DirectiveKeyword::Declare
                | DirectiveKeyword::Unused
                | DirectiveKeyword::ContentType
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectiveSyntax {
    /// `jsl:keyword`
    Jsl,
    /// `@keyword@`
    Legacy,
}

impl DirectiveSyntax {
    /// Diagnostic name for a comment in this syntax that is not understood.
    pub fn not_understood(self) -> &'static str {
        match self {
            DirectiveSyntax::Jsl => "jsl_cc_not_understood",
            DirectiveSyntax::Legacy => "legacy_cc_not_understood",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlDirective {
    pub keyword: DirectiveKeyword,
    pub params: String,
    pub syntax: DirectiveSyntax,
}

impl ControlDirective {
    /// Whether the parameters fit the keyword.
    ///
    /// `declare` and `unused` take one identifier, `import` and
    /// `content-type` take any non-empty text, the rest take nothing.
    pub fn has_valid_params(&self) -> bool {
        match self.keyword {
            DirectiveKeyword::Declare | DirectiveKeyword::Unused => is_identifier(&self.params),
            kw if kw.takes_params() => !self.params.is_empty(),
            _ => self.params.is_empty(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DirectiveParse {
    NotDirective,
    Directive(ControlDirective),
    NotUnderstood(DirectiveSyntax),
}

/// Classify the text of a comment (without delimiters).
pub fn parse_control_comment(atom: &str) -> DirectiveParse {
    let atom = atom.trim();

    let (body, syntax) = if atom
        .get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("jsl:"))
    {
        (&atom[4..], DirectiveSyntax::Jsl)
    } else if atom.len() >= 2 && atom.starts_with('@') && atom.ends_with('@') {
        // Conditional compilation, not a directive
        if atom.starts_with("@cc_on") {
            return DirectiveParse::NotDirective;
        }
        (&atom[1..atom.len() - 1], DirectiveSyntax::Legacy)
    } else {
        return DirectiveParse::NotDirective;
    };

    for &(text, keyword) in KEYWORDS {
        let Some(head) = body.get(..text.len()) else {
            continue;
        };
        if !head.eq_ignore_ascii_case(text) {
            continue;
        }
        let rest = &body[text.len()..];
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            return DirectiveParse::Directive(ControlDirective {
                keyword,
                params: rest.trim().to_string(),
                syntax,
            });
        }
    }

    DirectiveParse::NotUnderstood(syntax)
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(is_ident_start) && chars.all(is_ident_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directive(atom: &str) -> ControlDirective {
        match parse_control_comment(atom) {
            DirectiveParse::Directive(d) => d,
            other => panic!("{atom:?} parsed as {other:?}"),
        }
    }

    #[test]
    fn test_jsl_syntax() {
        let d = directive(" jsl:declare foo ");
        assert_eq!(d.keyword, DirectiveKeyword::Declare);
        assert_eq!(d.params, "foo");
        assert_eq!(d.syntax, DirectiveSyntax::Jsl);
        assert!(d.has_valid_params());
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert_eq!(directive("JSL:IgnoreAll").keyword, DirectiveKeyword::IgnoreAll);
        assert_eq!(directive("jsl:Option Explicit").keyword, DirectiveKeyword::OptionExplicit);
    }

    #[test]
    fn test_keyword_needs_a_separator() {
        assert_eq!(directive("jsl:ignore").keyword, DirectiveKeyword::Ignore);
        assert_eq!(directive("jsl:ignoreall").keyword, DirectiveKeyword::IgnoreAll);
        assert_eq!(
            parse_control_comment("jsl:ignored"),
            DirectiveParse::NotUnderstood(DirectiveSyntax::Jsl)
        );
        assert_eq!(
            parse_control_comment("jsl:endless"),
            DirectiveParse::NotUnderstood(DirectiveSyntax::Jsl)
        );
    }

    #[test]
    fn test_legacy_syntax() {
        let d = directive("@fallthru@");
        assert_eq!(d.keyword, DirectiveKeyword::Fallthru);
        assert_eq!(d.syntax, DirectiveSyntax::Legacy);

        let d = directive("@import lib.js@");
        assert_eq!(d.params, "lib.js");

        assert_eq!(
            parse_control_comment("@bogus@"),
            DirectiveParse::NotUnderstood(DirectiveSyntax::Legacy)
        );
    }

    #[test]
    fn test_conditional_compilation_is_not_a_directive() {
        assert_eq!(parse_control_comment("@cc_on @"), DirectiveParse::NotDirective);
        assert_eq!(parse_control_comment("@cc_on"), DirectiveParse::NotDirective);
    }

    #[test]
    fn test_plain_comments() {
        assert_eq!(parse_control_comment(" just a comment "), DirectiveParse::NotDirective);
        assert_eq!(parse_control_comment("@param x"), DirectiveParse::NotDirective);
        assert_eq!(parse_control_comment("jsl"), DirectiveParse::NotDirective);
    }

    #[test]
    fn test_param_validation() {
        assert!(!directive("jsl:declare").has_valid_params());
        assert!(!directive("jsl:declare 1abc").has_valid_params());
        assert!(!directive("jsl:unused a b").has_valid_params());
        assert!(directive("jsl:unused $el").has_valid_params());
        assert!(!directive("jsl:import").has_valid_params());
        assert!(directive("jsl:content-type text/javascript").has_valid_params());
        assert!(!directive("jsl:fallthru please").has_valid_params());
        assert!(directive("jsl:pass").has_valid_params());
    }
}
