//! Gap scanner: classifies the raw byte ranges between lexed tokens.
//!
//! Grounded on `edit.c`'s `check_unknown_gaps`/`add_comment_tokens` and
//! `format.c`'s `emit_gap`/`fmt_emit_gap_comments`: all four operate on the
//! same classification loop over a `[from, to)` byte range, differing only
//! in what they do with each classified span.

use crate::error::{Error, Result};
use crate::source::Source;
use crate::token::{Token, TokenKind, TokenRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapKind {
    Comment,
    Directive,
    Unknown,
}

#[derive(Debug, Clone, Copy)]
pub struct GapSpan {
    pub kind: GapKind,
    pub begin: usize,
    pub end: usize,
}

/// Classifies every comment/directive/unknown span within `buf[from..to)`,
/// skipping ASCII whitespace between them.
pub fn scan_gap(buf: &[u8], from: usize, to: usize) -> Vec<GapSpan> {
    let mut spans = Vec::new();
    let mut pos = from;
    while pos < to {
        while pos < to && matches!(buf[pos], b' ' | b'\t' | b'\r' | b'\n') {
            pos += 1;
        }
        if pos >= to {
            break;
        }
        if buf[pos] == b'/' && pos + 1 < to && buf[pos + 1] == b'*' {
            let begin = pos;
            pos += 2;
            while pos + 1 < to && !(buf[pos] == b'*' && buf[pos + 1] == b'/') {
                pos += 1;
            }
            pos = if pos + 1 < to { pos + 2 } else { to };
            spans.push(GapSpan { kind: GapKind::Comment, begin, end: pos });
        } else if buf[pos] == b'#' || (buf[pos] == b'/' && pos + 1 < to && buf[pos + 1] == b'/') {
            let begin = pos;
            while pos < to && buf[pos] != b'\n' {
                pos += 1;
            }
            spans.push(GapSpan { kind: GapKind::Comment, begin, end: pos });
        } else if buf[pos] == b'$' {
            let begin = pos;
            while pos < to && buf[pos] != b'\n' {
                pos += 1;
            }
            spans.push(GapSpan { kind: GapKind::Directive, begin, end: pos });
        } else {
            let begin = pos;
            while pos < to && buf[pos] != b'\n' {
                pos += 1;
            }
            spans.push(GapSpan { kind: GapKind::Unknown, begin, end: pos });
        }
    }
    spans
}

/// Byte ranges between every consecutive pair of tokens in stream order,
/// paired with the token preceding each range (used to anchor insertions).
fn gap_ranges(source: &Source) -> Vec<(TokenRef, usize, usize)> {
    let mut out = Vec::new();
    let mut cur = source.tokens.head;
    while let Some(r) = cur {
        if let Some(n) = source.tokens.get(r).next {
            out.push((r, source.tokens.get(r).end, source.tokens.get(n).begin));
            cur = Some(n);
        } else {
            cur = None;
        }
    }
    out
}

/// Returns an error iff any gap in `source` contains unparseable content.
pub fn check_unknown_gaps(source: &Source) -> Result<()> {
    let buf = source.buffer.as_bytes();
    for (_, from, to) in gap_ranges(source) {
        for span in scan_gap(buf, from, to) {
            if span.kind == GapKind::Unknown {
                let snippet = String::from_utf8_lossy(&buf[span.begin..span.end]).into_owned();
                return Err(Error::syntax(snippet));
            }
        }
    }
    Ok(())
}

/// Inserts a synthetic `Comment` token for every comment span found in any
/// gap, preserving byte-offset order.
pub fn add_comment_tokens(source: &mut Source) {
    let ranges = gap_ranges(source);
    let buf = source.buffer.as_bytes().to_vec();
    for (token_before, from, to) in ranges {
        let mut after = token_before;
        for span in scan_gap(&buf, from, to) {
            if span.kind == GapKind::Comment {
                let token = Token {
                    kind: TokenKind::Comment,
                    begin: span.begin,
                    end: span.end,
                    prev: None,
                    next: None,
                };
                after = source.tokens.insert_after(after, token);
            }
        }
    }
}

/// Label used by `tokens --processed` for gap content.
pub fn label(kind: GapKind) -> &'static str {
    match kind {
        GapKind::Comment => "COMMENT",
        GapKind::Directive => "DIRECTIVE",
        GapKind::Unknown => "UNKNOWN",
    }
}

/// All gaps in stream order, for diagnostic enumeration (`tokens --processed`).
pub fn all_gaps(source: &Source) -> Vec<GapSpan> {
    let buf = source.buffer.as_bytes();
    let mut out = Vec::new();
    for (_, from, to) in gap_ranges(source) {
        out.extend(scan_gap(buf, from, to));
    }
    out
}
