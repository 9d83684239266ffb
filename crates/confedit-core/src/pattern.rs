//! Pattern compiler: turns a user-supplied pattern string into a compiled
//! vector of `PatternElement`s, grounded on `pattern.c`'s `preprocess_wildcards`
//! and `build_pattern`.

use crate::gap::{scan_gap, GapKind};
use crate::source::Source;
use crate::token::{TokenKind, TokenRef};

/// A compiled pattern element. `MultiWildcard` as the original's sentinel
/// pointer becomes a tagged variant, removing the punning hazard between
/// "this slot is a literal token" and "this slot is the multi-wildcard".
#[derive(Debug, Clone, Copy)]
pub enum PatternElement {
    Literal(TokenRef),
    Single,
    Multi,
}

/// A compiled pattern together with the source its literal tokens borrow from.
#[derive(Debug, Clone)]
pub struct Pattern {
    pub source: Source,
    pub elements: Vec<PatternElement>,
}

impl Pattern {
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn has_multi(&self) -> bool {
        self.elements.iter().any(|e| matches!(e, PatternElement::Multi))
    }
}

/// Expands runs of `*` into space-separated individual stars (so the host
/// lexer can't fuse them into `**=`-style compound operators) and inserts a
/// space between `{` and a following `"` (so `{"..."}` long-string syntax
/// doesn't swallow the wildcard). Only applies outside double-quoted regions.
pub fn preprocess_wildcards(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len() + 8);
    let mut in_string = false;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'"' {
            in_string = !in_string;
            out.push(b);
            i += 1;
            continue;
        }
        if !in_string && b == b'*' {
            let start = i;
            while i < bytes.len() && bytes[i] == b'*' {
                i += 1;
            }
            let n = i - start;
            if !out.last().map_or(true, |c| c.is_ascii_whitespace()) {
                out.push(b' ');
            }
            let pairs = if n >= 3 && n % 2 == 1 { (n - 3) / 2 } else { n / 2 };
            let mut first = true;
            for _ in 0..pairs {
                if !first {
                    out.push(b' ');
                }
                out.extend_from_slice(b"* *");
                first = false;
            }
            if n >= 3 && n % 2 == 1 {
                if !first {
                    out.push(b' ');
                }
                out.extend_from_slice(b"* * *");
                first = false;
            }
            if n == 1 {
                if !first {
                    out.push(b' ');
                }
                out.push(b'*');
            }
            let next_is_ws = i >= bytes.len() || bytes[i].is_ascii_whitespace();
            if !next_is_ws {
                out.push(b' ');
            }
            continue;
        }
        if !in_string && b == b'{' && i + 1 < bytes.len() && bytes[i + 1] == b'"' {
            out.push(b'{');
            out.push(b' ');
            out.push(b'"');
            in_string = true;
            i += 2;
            continue;
        }
        out.push(b);
        i += 1;
    }
    String::from_utf8(out).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

/// Folds the lexed, preprocessed pattern source's real tokens into
/// `PatternElement`s, collapsing each run of `*` tokens.
pub fn build_pattern(source: &Source) -> Vec<PatternElement> {
    let mut elements = Vec::new();
    let mut cur = source.tokens.first_real();
    while let Some(r) = cur {
        let tok = *source.tokens.get(r);
        if tok.kind == TokenKind::Punct(b'*') {
            let mut run_len = 0usize;
            let mut last_star = r;
            let mut walk = Some(r);
            while let Some(w) = walk {
                if source.tokens.get(w).kind != TokenKind::Punct(b'*') {
                    break;
                }
                run_len += 1;
                last_star = w;
                walk = source.tokens.next_real(w);
            }
            let s = run_len;
            if s >= 3 && s % 2 == 1 {
                for _ in 0..(s - 3) / 2 {
                    elements.push(PatternElement::Single);
                }
                elements.push(PatternElement::Multi);
            } else {
                for _ in 0..s / 2 {
                    elements.push(PatternElement::Single);
                }
                if s == 1 {
                    elements.push(PatternElement::Literal(r));
                }
            }
            cur = source.tokens.next_real(last_star);
            continue;
        }
        elements.push(PatternElement::Literal(r));
        cur = source.tokens.next_real(r);
    }
    elements
}

/// Builds a single-element `Literal(COMMENT)` pattern from text whose only
/// recognizable content is a comment (no real tokens survive lexing). Used
/// when `build_pattern` on the normal path yields nothing.
fn make_comment_source(text: &str) -> Option<Source> {
    let buf = text.as_bytes();
    for span in scan_gap(buf, 0, buf.len()) {
        if span.kind == GapKind::Comment {
            let mut stream = crate::token::TokenStream::default();
            let soi = stream.tokens.len();
            stream.tokens.push(crate::token::Token {
                kind: TokenKind::Soi,
                begin: 0,
                end: 0,
                prev: None,
                next: None,
            });
            stream.head = Some(soi);
            let comment = stream.insert_after(
                soi,
                crate::token::Token {
                    kind: TokenKind::Comment,
                    begin: span.begin,
                    end: span.end,
                    prev: None,
                    next: None,
                },
            );
            let eoi = stream.insert_after(
                comment,
                crate::token::Token {
                    kind: TokenKind::Eoi,
                    begin: text.len(),
                    end: text.len(),
                    prev: None,
                    next: None,
                },
            );
            stream.tail = Some(eoi);
            return Some(Source::from_parts("<pattern>", text, stream));
        }
    }
    None
}

/// Compiles a user-supplied pattern string end to end: preprocess, lex,
/// build. An empty pattern (source with no real tokens and no recognizable
/// comment) compiles to an empty element vector, which matches nothing for
/// look-around roles but is "always satisfied" for look-around constraints;
/// callers decide which semantics apply.
pub fn compile_pattern(text: &str) -> Pattern {
    let preprocessed = preprocess_wildcards(text);
    let source = Source::new("<pattern>", preprocessed);
    let elements = build_pattern(&source);
    if elements.is_empty() {
        if let Some(comment_source) = make_comment_source(text) {
            let comment_elements = build_pattern(&comment_source);
            return Pattern {
                source: comment_source,
                elements: comment_elements,
            };
        }
    }
    Pattern { source, elements }
}
