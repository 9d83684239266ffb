//! Pretty-printer: a linear state machine, not a line-wrapping algorithm.
//! Grounded on `format.c`'s `fmt_emit`/`fmt_emit_raw`/`fmt_emit_source`.

use crate::capture;
use crate::gap::{scan_gap, GapKind};
use crate::matcher::Capture;
use crate::source::Source;
use crate::token::TokenKind;

const INDENT_UNIT: &str = "    ";
/// Per-comment cap; overlong comments are truncated rather than rejected.
const GAP_COMMENT_CAP: usize = 8 * 1024;

#[derive(Debug, Clone)]
pub struct FormatterState {
    pub indent_depth: i32,
    pub need_newline: bool,
    pub need_blank: bool,
    pub first_emission: bool,
    pub previous_token_kind: Option<TokenKind>,
    pub out: String,
}

impl Default for FormatterState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatterState {
    pub fn new() -> Self {
        Self {
            indent_depth: 0,
            need_newline: false,
            need_blank: false,
            first_emission: true,
            previous_token_kind: None,
            out: String::new(),
        }
    }

    fn push_indent(&mut self) {
        for _ in 0..self.indent_depth.max(0) {
            self.out.push_str(INDENT_UNIT);
        }
    }

    /// Emits one token, applying the leading-whitespace cascade and the
    /// post-emission flag updates, in order.
    pub fn emit(&mut self, buf: &str, kind: TokenKind, begin: usize, end: usize, override_text: Option<&str>) {
        if kind == TokenKind::Punct(b'}') {
            self.indent_depth = (self.indent_depth - 1).max(0);
        }

        if self.first_emission {
            // no leading whitespace
        } else if self.need_blank {
            self.out.push_str("\n\n");
            self.push_indent();
        } else if self.need_newline {
            self.out.push('\n');
            self.push_indent();
        } else if matches!(kind, TokenKind::Punct(b';') | TokenKind::Punct(b')') | TokenKind::Punct(b'.') | TokenKind::Csrc) {
            // tight before
        } else if matches!(self.previous_token_kind, Some(TokenKind::Punct(b'(')) | Some(TokenKind::Punct(b'.'))) {
            // tight after
        } else if self.previous_token_kind.map_or(false, TokenKind::is_numeric) && kind == TokenKind::Id {
            // unit suffix, e.g. `5s`
        } else {
            self.out.push(' ');
        }

        self.need_newline = false;
        self.need_blank = false;
        self.first_emission = false;

        match override_text {
            Some(t) => self.out.push_str(t),
            None => self.out.push_str(&buf[begin..end]),
        }

        match kind {
            TokenKind::Punct(b'{') => {
                self.indent_depth += 1;
                self.need_newline = true;
            }
            TokenKind::Punct(b'}') => {
                self.need_newline = true;
                if self.indent_depth == 0 {
                    self.need_blank = true;
                }
            }
            TokenKind::Punct(b';') | TokenKind::Csrc => {
                self.need_newline = true;
                if self.indent_depth == 0 {
                    self.need_blank = true;
                }
            }
            _ => {}
        }

        self.previous_token_kind = Some(kind);
    }

    /// Same leading-whitespace cascade, but the payload is an opaque unit
    /// (raw text, not a single token) and `previous_token_kind` is left
    /// untouched since the raw text carries no single kind of its own.
    pub fn emit_raw(&mut self, text: &str) {
        if self.first_emission {
            // no leading whitespace
        } else if self.need_blank {
            self.out.push_str("\n\n");
            self.push_indent();
        } else if self.need_newline {
            self.out.push('\n');
            self.push_indent();
        } else if matches!(self.previous_token_kind, Some(TokenKind::Punct(b'(')) | Some(TokenKind::Punct(b'.'))) {
            // tight after
        } else {
            self.out.push(' ');
        }

        self.need_newline = false;
        self.need_blank = false;
        self.first_emission = false;
        self.out.push_str(text);
        self.need_newline = true;
    }

    /// Re-emits any comments recognized in `source.buffer[from..to)` verbatim.
    pub fn emit_gap_comments(&mut self, source: &Source, from: usize, to: usize) {
        let buf = source.buffer.as_bytes();
        for span in scan_gap(buf, from, to) {
            if span.kind == GapKind::Comment {
                let capped_end = span.begin + (span.end - span.begin).min(GAP_COMMENT_CAP);
                self.emit_raw(&source.buffer[span.begin..capped_end]);
            }
        }
    }

    /// Walks `source`'s real tokens, emitting gap comments ahead of each.
    pub fn emit_source(&mut self, source: &Source) {
        let mut prev_end = source.tokens.head.map(|h| source.tokens.get(h).end).unwrap_or(0);
        let mut cur = source.tokens.first_real();
        while let Some(r) = cur {
            let t = *source.tokens.get(r);
            self.emit_gap_comments(source, prev_end, t.begin);
            self.emit(&source.buffer, t.kind, t.begin, t.end, None);
            prev_end = t.end;
            cur = source.tokens.next_real(r);
        }
    }

    /// Like `emit_source`, but substitutes `**N` references, both bare
    /// three-token sequences and references embedded in a token's own text.
    pub fn emit_source_caps(&mut self, source: &Source, buf: &str, captures: &[Capture]) {
        let mut prev_end = source.tokens.head.map(|h| source.tokens.get(h).end).unwrap_or(0);
        let mut cur = source.tokens.first_real();
        while let Some(r) = cur {
            let t = *source.tokens.get(r);
            self.emit_gap_comments(source, prev_end, t.begin);

            if let Some((n, last_ref)) = capture::match_bare_capture(source, r) {
                if n <= captures.len() {
                    let (cb, ce) = captures[n - 1];
                    self.emit(&source.buffer, t.kind, t.begin, t.end, Some(&buf[cb..ce]));
                } else {
                    self.emit(&source.buffer, t.kind, t.begin, t.end, None);
                }
                let last_tok = *source.tokens.get(last_ref);
                prev_end = last_tok.end;
                cur = source.tokens.next_real(last_ref);
                continue;
            }

            let text = source.text(r);
            if capture::has_capture_ref(text) {
                let substituted = capture::substitute_captures(buf, text, captures);
                self.emit(&source.buffer, t.kind, t.begin, t.end, Some(&substituted));
            } else {
                self.emit(&source.buffer, t.kind, t.begin, t.end, None);
            }
            prev_end = t.end;
            cur = source.tokens.next_real(r);
        }
    }

    /// Finalizes the buffer, ensuring pretty-printed output always ends
    /// with exactly one newline regardless of whether the last emitted
    /// token set `need_newline` (there's no following token to flush it).
    pub fn finish(mut self) -> String {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
        self.out
    }
}
