//! Capture substituter: resolves `**N` references against a match's
//! captured byte ranges. Grounded on `pattern.c`'s `substitute_captures`,
//! `match_bare_capture`, `has_capture_ref` and `fixup_gap_captures`.

use crate::matcher::Capture;
use crate::pattern::PatternElement;
use crate::source::Source;
use crate::token::TokenRef;

/// Fixed-size capture arrays are a genuine design limit coupled to the
/// `**1`..`**9` syntax, not an arbitrary buffer size.
pub const MAX_CAPTURES: usize = 9;

const SUBSTITUTION_CAP: usize = 4 * 1024;

/// Replaces every `**N` occurrence in `template` with `captures[N-1]`'s
/// byte slice (read out of `buf`). Strips a capture's surrounding quotes
/// when the template itself opens inside a quoted string, so `"**1"`
/// substituted with a capture of `"X"` yields `"X"`, not `""X""`.
pub fn substitute_captures(buf: &str, template: &str, captures: &[Capture]) -> String {
    let bytes = template.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(template.len());
    let starts_in_string = template.starts_with('"');
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'*'
            && i + 2 < bytes.len()
            && bytes[i + 1] == b'*'
            && bytes[i + 2].is_ascii_digit()
            && bytes[i + 2] != b'0'
        {
            let n = (bytes[i + 2] - b'0') as usize;
            if n <= captures.len() {
                let (cb, ce) = captures[n - 1];
                let mut slice = &buf[cb..ce];
                if starts_in_string && slice.len() >= 2 && slice.starts_with('"') && slice.ends_with('"') {
                    slice = &slice[1..slice.len() - 1];
                }
                push_capped(&mut out, slice.as_bytes());
                i += 3;
                continue;
            }
        }
        if out.len() < SUBSTITUTION_CAP {
            out.push(bytes[i]);
        }
        i += 1;
    }
    String::from_utf8(out).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

fn push_capped(out: &mut Vec<u8>, slice: &[u8]) {
    let remaining = SUBSTITUTION_CAP.saturating_sub(out.len());
    let n = remaining.min(slice.len());
    out.extend_from_slice(&slice[..n]);
}

/// Detects the three-token sequence `*`, `*`, digit(1-9) in a replacement
/// token stream, i.e. an unquoted `**N` reference spelled out as separate
/// tokens after the pattern compiler's preprocessing. Returns the captured
/// index and the ref of the trailing digit token.
pub fn match_bare_capture(source: &Source, at: TokenRef) -> Option<(usize, TokenRef)> {
    if source.text(at) != "*" {
        return None;
    }
    let r1 = source.tokens.next_real(at)?;
    if source.text(r1) != "*" {
        return None;
    }
    let r2 = source.tokens.next_real(r1)?;
    let text = source.text(r2);
    let mut chars = text.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    let d = c.to_digit(10)?;
    if (1..=9).contains(&d) {
        Some((d as usize, r2))
    } else {
        None
    }
}

/// Whether a single token's own text contains a `**N` reference.
pub fn has_capture_ref(text: &str) -> bool {
    let b = text.as_bytes();
    if b.len() < 3 {
        return false;
    }
    for i in 0..=b.len() - 3 {
        if b[i] == b'*' && b[i + 1] == b'*' && b[i + 2].is_ascii_digit() && b[i + 2] != b'0' {
            return true;
        }
    }
    false
}

/// After a match used for `extract`, widens each `MultiWildcard` capture to
/// span from the preceding token's `end` to the following token's `begin`,
/// so the captured slice includes gap comments and whitespace. Zero-length
/// multi captures collapse to `(preceding.end, preceding.end)`.
pub fn fixup_gap_captures(target: &Source, elements: &[PatternElement], captures: &mut [Capture]) {
    for (idx, elem) in elements.iter().enumerate() {
        if !matches!(elem, PatternElement::Multi) {
            continue;
        }
        let (begin, end) = captures[idx];
        if begin == end {
            if let Some(prev_end) = preceding_token_end(target, begin) {
                captures[idx] = (prev_end, prev_end);
            }
        } else {
            let new_begin = preceding_token_end(target, begin).unwrap_or(begin);
            let new_end = following_token_begin(target, end).unwrap_or(end);
            captures[idx] = (new_begin, new_end);
        }
    }
}

fn preceding_token_end(target: &Source, begin: usize) -> Option<usize> {
    let r = token_at_begin(target, begin)?;
    let prev = target.tokens.get(r).prev?;
    Some(target.tokens.get(prev).end)
}

fn following_token_begin(target: &Source, end: usize) -> Option<usize> {
    let r = token_at_end(target, end)?;
    let next = target.tokens.get(r).next?;
    Some(target.tokens.get(next).begin)
}

fn token_at_begin(target: &Source, begin: usize) -> Option<TokenRef> {
    let mut cur = target.tokens.head;
    while let Some(r) = cur {
        if target.tokens.get(r).begin == begin {
            return Some(r);
        }
        cur = target.tokens.get(r).next;
    }
    None
}

fn token_at_end(target: &Source, end: usize) -> Option<TokenRef> {
    let mut cur = target.tokens.head;
    while let Some(r) = cur {
        if target.tokens.get(r).end == end {
            return Some(r);
        }
        cur = target.tokens.get(r).next;
    }
    None
}
