//! Matcher: walks a compiled pattern against a position in a token stream.
//!
//! Grounded on `pattern.c`'s `pattern_match`/`tokens_match_before`/
//! `tokens_match_after`/`try_pattern_match`.

use crate::pattern::{Pattern, PatternElement};
use crate::source::Source;
use crate::token::TokenRef;

pub type Capture = (usize, usize);

/// Backward-walk cap for ambiguous multi-wildcard look-behinds. A documented
/// heuristic, not a hard correctness bound.
const LOOK_BEHIND_BACKTRACK_LIMIT: usize = 256;

#[derive(Debug, Clone)]
pub struct MatchResult {
    pub consumed: usize,
    pub last: Option<TokenRef>,
    pub captures: Vec<Capture>,
}

/// Runs `pattern` starting at `start`. SOI/EOI are never consumed as matched
/// tokens. Returns `None` on failure.
pub fn pattern_match(target: &Source, start: TokenRef, pattern: &Pattern) -> Option<MatchResult> {
    let (consumed, captures) = match_from(target, Some(start), &pattern.elements, &pattern.source, 0)?;
    let last = nth_real_from(target, start, consumed.saturating_sub(1));
    Some(MatchResult {
        consumed,
        last,
        captures,
    })
}

fn match_from(
    target: &Source,
    cursor: Option<TokenRef>,
    elements: &[PatternElement],
    psrc: &Source,
    pidx: usize,
) -> Option<(usize, Vec<Capture>)> {
    if pidx == elements.len() {
        return Some((0, Vec::new()));
    }
    match elements[pidx] {
        PatternElement::Literal(p) => {
            let cur = cursor?;
            if target.text(cur) != psrc.text(p) {
                return None;
            }
            let next_cursor = target.tokens.next_real(cur);
            let (consumed, caps) = match_from(target, next_cursor, elements, psrc, pidx + 1)?;
            Some((consumed + 1, caps))
        }
        PatternElement::Single => {
            let cur = cursor?;
            let ctok = target.tokens.get(cur);
            let cap = (ctok.begin, ctok.end);
            let next_cursor = target.tokens.next_real(cur);
            let (consumed, mut caps) = match_from(target, next_cursor, elements, psrc, pidx + 1)?;
            let mut result = vec![cap];
            result.append(&mut caps);
            Some((consumed + 1, result))
        }
        PatternElement::Multi => match_multi(target, cursor, elements, psrc, pidx),
    }
}

fn match_multi(
    target: &Source,
    cursor: Option<TokenRef>,
    elements: &[PatternElement],
    psrc: &Source,
    pidx: usize,
) -> Option<(usize, Vec<Capture>)> {
    if pidx + 1 == elements.len() {
        // Last element: consume everything up to EOI.
        let mut count = 0usize;
        let mut cur = cursor;
        let mut last_tok = None;
        while let Some(r) = cur {
            last_tok = Some(r);
            count += 1;
            cur = target.tokens.next_real(r);
        }
        let cap = match (cursor, last_tok) {
            (Some(f), Some(l)) => (target.tokens.get(f).begin, target.tokens.get(l).end),
            _ => {
                let pos = anchor_pos(target, cursor);
                (pos, pos)
            }
        };
        return Some((count, vec![cap]));
    }

    let mut depth: i32 = 0;
    let mut consumed_tokens: Vec<TokenRef> = Vec::new();
    loop {
        let try_cursor = match consumed_tokens.last() {
            Some(&last) => target.tokens.next_real(last),
            None => cursor,
        };
        if let Some((rest_consumed, rest_caps)) = match_from(target, try_cursor, elements, psrc, pidx + 1) {
            let cap = match (consumed_tokens.first(), consumed_tokens.last()) {
                (Some(&f), Some(&l)) => (target.tokens.get(f).begin, target.tokens.get(l).end),
                _ => {
                    let pos = anchor_pos(target, cursor);
                    (pos, pos)
                }
            };
            let mut result = vec![cap];
            result.extend(rest_caps);
            return Some((consumed_tokens.len() + rest_consumed, result));
        }

        let next = match consumed_tokens.last() {
            Some(&last) => target.tokens.next_real(last),
            None => cursor,
        };
        let r = next?;
        let t = target.tokens.get(r);
        if t.kind.is_opener() {
            depth += 1;
        } else if t.kind.is_closer() {
            if depth == 0 {
                return None;
            }
            depth -= 1;
        }
        consumed_tokens.push(r);
    }
}

fn anchor_pos(target: &Source, cursor: Option<TokenRef>) -> usize {
    match cursor {
        Some(r) => target.tokens.get(r).begin,
        None => target.buffer.len(),
    }
}

fn nth_real_from(target: &Source, start: TokenRef, n: usize) -> Option<TokenRef> {
    let mut cur = Some(start);
    for _ in 0..n {
        cur = cur.and_then(|r| target.tokens.next_real(r));
    }
    cur
}

/// A null look-around pattern is always satisfied.
pub fn tokens_match_after(target: &Source, next: Option<TokenRef>, look_ahead: &Pattern) -> bool {
    if look_ahead.is_empty() {
        return true;
    }
    let next = match next {
        Some(r) => r,
        None => return false,
    };
    match pattern_match(target, next, look_ahead) {
        Some(m) => m.consumed > 0,
        None => false,
    }
}

pub fn tokens_match_before(target: &Source, prev: Option<TokenRef>, look_behind: &Pattern) -> bool {
    if look_behind.is_empty() {
        return true;
    }
    let target_tok = match prev {
        Some(r) => r,
        None => return false,
    };
    if !look_behind.has_multi() {
        let mut cur = Some(target_tok);
        for elem in look_behind.elements.iter().rev() {
            let r = match cur {
                Some(r) => r,
                None => return false,
            };
            match elem {
                PatternElement::Literal(p) => {
                    if target.text(r) != look_behind.source.text(*p) {
                        return false;
                    }
                }
                PatternElement::Single => {}
                PatternElement::Multi => unreachable!("checked has_multi above"),
            }
            cur = target.tokens.prev_real(r);
        }
        true
    } else {
        let ends_with_multi = matches!(look_behind.elements.last(), Some(PatternElement::Multi));
        let mut anchor = Some(target_tok);
        for _ in 0..LOOK_BEHIND_BACKTRACK_LIMIT {
            let a = match anchor {
                Some(r) => r,
                None => return false,
            };
            if let Some(m) = pattern_match(target, a, look_behind) {
                if m.consumed > 0 {
                    if let Some(last_ref) = m.last {
                        let target_begin = target.tokens.get(target_tok).begin;
                        let last_begin = target.tokens.get(last_ref).begin;
                        if last_ref == target_tok || (ends_with_multi && last_begin >= target_begin) {
                            return true;
                        }
                    }
                }
            }
            anchor = target.tokens.prev_real(a);
        }
        false
    }
}

/// Composes the dot-boundary guard, the primary match, and both look-around
/// constraints, in that order.
pub fn try_pattern_match(
    target: &Source,
    at: TokenRef,
    pattern: &Pattern,
    look_behind: &Pattern,
    look_ahead: &Pattern,
) -> Option<MatchResult> {
    if let Some(PatternElement::Literal(p)) = pattern.elements.first() {
        if pattern.source.text(*p) == "." {
            let prev = target.tokens.prev_real(at);
            let ok = matches!(prev.map(|r| target.text(r)), Some("{") | Some(";"));
            if !ok {
                return None;
            }
        }
    }

    let m = pattern_match(target, at, pattern)?;

    if !tokens_match_before(target, target.tokens.prev_real(at), look_behind) {
        return None;
    }

    let after = match m.last {
        Some(l) => target.tokens.next_real(l),
        None => Some(at),
    };
    if !tokens_match_after(target, after, look_ahead) {
        return None;
    }

    Some(m)
}
