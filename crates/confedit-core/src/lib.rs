//! Core engine for editing a VCL-shaped configuration language: the token
//! model, gap scanner, pattern compiler, matcher, capture substituter and
//! formatter underlying the `confedit` CLI's five commands.

pub mod capture;
pub mod error;
pub mod formatter;
pub mod gap;
pub mod lexer;
pub mod matcher;
pub mod pattern;
pub mod source;
pub mod token;

pub use error::{Error, ErrorKind, Result};
pub use formatter::FormatterState;
pub use matcher::{pattern_match, try_pattern_match, tokens_match_after, tokens_match_before, Capture, MatchResult};
pub use pattern::{compile_pattern, Pattern, PatternElement};
pub use source::Source;
pub use token::{Token, TokenKind, TokenRef, TokenStream};
