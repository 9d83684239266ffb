//! Concrete host lexer for the VCL-shaped configuration language.
//!
//! The host lexer is treated as an external collaborator with only its
//! output contract specified elsewhere: `(kind, begin, end)` triples over
//! the source buffer, plus SOI/EOI sentinels. This is one concrete instance
//! of that contract, built on `logos` the way `rhai-rowan` lexes rhai
//! source. Comments, directives and whitespace are trivia the lexer skips;
//! the gap scanner independently re-derives and classifies those same byte
//! ranges. An inline host source block (`C{ ... }C`) is not trivia: it
//! lexes as a single `Csrc` token spanning the whole block.

use logos::{Lexer, Logos};

use crate::token::{Token, TokenKind, TokenStream};

fn skip_block_comment(lex: &mut Lexer<RawToken>) -> logos::Skip {
    let rem = lex.remainder();
    match rem.find("*/") {
        Some(pos) => lex.bump(pos + 2),
        None => lex.bump(rem.len()),
    }
    logos::Skip
}

fn skip_to_newline(lex: &mut Lexer<RawToken>) -> logos::Skip {
    let rem = lex.remainder();
    let end = rem.find('\n').unwrap_or(rem.len());
    lex.bump(end);
    logos::Skip
}

/// Consumes an inline host source block up to and including its closing
/// `}C`, or to the end of the buffer if unterminated. Unlike trivia, this
/// is a real token: `C{ ... }C` lexes as one `Csrc` span.
fn lex_csrc(lex: &mut Lexer<RawToken>) -> bool {
    let rem = lex.remainder();
    match rem.find("}C") {
        Some(pos) => lex.bump(pos + 2),
        None => lex.bump(rem.len()),
    }
    true
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
    #[regex(r"[ \t\r\n]+", logos::skip)]
    #[token("/*", skip_block_comment)]
    #[token("#", skip_to_newline)]
    #[token("//", skip_to_newline)]
    #[token("$", skip_to_newline)]
    Trivia,

    #[token("C{", lex_csrc)]
    Csrc,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Id,

    #[regex(r"[0-9]+\.[0-9]+")]
    FNum,

    #[regex(r"[0-9]+")]
    CNum,

    #[regex(r#""([^"\\]|\\.)*""#)]
    CStr,

    /// The host grammar's punctuation set. Anything outside it (e.g. a
    /// stray `@`) is left unclaimed between tokens, where the gap scanner's
    /// own classification loop picks it up as unknown content.
    #[regex(r"[{}();.,=:*/+\-!<>&|\[\]]")]
    Punct,

    #[error]
    Error,
}

/// Lexes `buffer` into a token stream with a leading SOI and trailing EOI.
/// Bytes the lexer can't classify are skipped without emitting a token,
/// leaving them in the gap between the surrounding real tokens.
pub fn lex(buffer: &str) -> TokenStream {
    let mut stream = TokenStream::default();

    let soi = push(&mut stream, TokenKind::Soi, 0, 0);
    stream.head = Some(soi);

    let mut raw = RawToken::lexer(buffer);
    let mut prev = soi;
    while let Some(result) = raw.next() {
        let span = raw.span();
        let kind = match result {
            Ok(RawToken::Trivia) | Err(()) => continue,
            Ok(RawToken::Csrc) => TokenKind::Csrc,
            Ok(RawToken::Id) => TokenKind::Id,
            Ok(RawToken::CNum) => TokenKind::CNum,
            Ok(RawToken::FNum) => TokenKind::FNum,
            Ok(RawToken::CStr) => TokenKind::CStr,
            Ok(RawToken::Punct) => TokenKind::Punct(buffer.as_bytes()[span.start]),
        };
        let r = push(&mut stream, kind, span.start, span.end);
        link(&mut stream, prev, r);
        prev = r;
    }

    let eoi = push(&mut stream, TokenKind::Eoi, buffer.len(), buffer.len());
    link(&mut stream, prev, eoi);
    stream.tail = Some(eoi);

    stream
}

fn push(stream: &mut TokenStream, kind: TokenKind, begin: usize, end: usize) -> usize {
    let r = stream.tokens.len();
    stream.tokens.push(Token {
        kind,
        begin,
        end,
        prev: None,
        next: None,
    });
    r
}

fn link(stream: &mut TokenStream, prev: usize, next: usize) {
    stream.tokens[prev].next = Some(next);
    stream.tokens[next].prev = Some(prev);
}
