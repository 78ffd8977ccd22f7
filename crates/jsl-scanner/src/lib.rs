//! JavaScript tokenizer for the jsl lint engine.
//!
//! This crate provides the lexical analysis phase:
//! - `CharSet` - Character classes used by the scanner
//! - `TokenStream` - Code-point cursor with an absolute offset origin
//! - `Tokenizer` - Token state machine with one-token lookahead and the
//!   division/regular-expression re-scan
//! - `is_compilable_unit` - Probe for whether a text fragment is complete

pub mod char_codes;
pub use char_codes::CharSet;

pub mod token;
pub use token::{Token, TokenKind};

pub mod stream;
pub use stream::TokenStream;

pub mod tokenizer;
pub use tokenizer::Tokenizer;

pub mod compilable;
pub use compilable::is_compilable_unit;
