//! Source buffer: the immutable byte sequence plus its lexed token stream.

use crate::lexer;
use crate::token::{TokenRef, TokenStream};

#[derive(Debug, Clone)]
pub struct Source {
    pub name: String,
    pub buffer: String,
    pub tokens: TokenStream,
}

impl Source {
    pub fn new(name: impl Into<String>, buffer: impl Into<String>) -> Self {
        let buffer = buffer.into();
        let tokens = lexer::lex(&buffer);
        Self {
            name: name.into(),
            buffer,
            tokens,
        }
    }

    /// Builds a source from an already-lexed stream, used by the pattern
    /// compiler's synthetic comment-only sources.
    pub fn from_parts(name: impl Into<String>, buffer: impl Into<String>, tokens: TokenStream) -> Self {
        Self {
            name: name.into(),
            buffer: buffer.into(),
            tokens,
        }
    }

    pub fn text(&self, r: TokenRef) -> &str {
        let t = self.tokens.get(r);
        &self.buffer[t.begin..t.end]
    }
}
