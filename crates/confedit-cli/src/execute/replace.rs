use anyhow::Result;
use confedit_core::pattern::Pattern;
use confedit_core::{compile_pattern, substitute_captures, try_pattern_match, FormatterState, Source, TokenKind, TokenRef};

use crate::args::SiteArgs;

/// Two-pass replace: pass one walks the stream writing space-joined raw
/// text, substituting matches past `offset` (up to `offset + limit`); pass
/// two relexes that text and formats it, yielding final indentation. When
/// the replacement text contains an unquoted `$` or `#` it can't be relexed
/// (those trigger directive/comment skipping), so a one-pass raw fallback
/// writes the substitution straight through the formatter instead.
pub fn run(source: &Source, from: &str, to: &str, site: &SiteArgs) -> Result<String> {
    let pattern = compile_pattern(from);
    let look_behind = compile_pattern(site.look_behind.as_deref().unwrap_or(""));
    let look_ahead = compile_pattern(site.look_ahead.as_deref().unwrap_or(""));
    let offset = site.offset();
    let limit = site.limit();

    if text_needs_raw(to) {
        return Ok(emit_raw_fallback(
            source,
            &pattern,
            &look_behind,
            &look_ahead,
            to,
            offset,
            limit,
        ));
    }

    let raw = emit_transform_replace(source, &pattern, &look_behind, &look_ahead, to, offset, limit);
    let relexed = Source::new("<replace>", raw);
    let mut state = FormatterState::new();
    state.emit_source(&relexed);
    Ok(state.finish())
}

fn text_needs_raw(text: &str) -> bool {
    let mut in_string = false;
    for b in text.bytes() {
        if b == b'"' {
            in_string = !in_string;
            continue;
        }
        if !in_string && (b == b'$' || b == b'#') {
            return true;
        }
    }
    false
}

fn emit_transform_replace(
    source: &Source,
    pattern: &Pattern,
    look_behind: &Pattern,
    look_ahead: &Pattern,
    to: &str,
    offset: usize,
    limit: usize,
) -> String {
    let mut out = String::new();
    let mut counter = 0usize;
    let mut cur = source.tokens.first_real();
    while let Some(r) = cur {
        if !pattern.is_empty() {
            if let Some(m) = try_pattern_match(source, r, pattern, look_behind, look_ahead) {
                counter += 1;
                if counter <= offset {
                    push_tokens(source, r, m.consumed, &mut out);
                } else {
                    let substituted = substitute_captures(&source.buffer, to, &m.captures);
                    push_joined(&mut out, &substituted);
                }
                let next = advance_by(source, r, m.consumed);
                if limit != 0 && counter >= offset + limit {
                    push_remaining(source, next, &mut out);
                    break;
                }
                cur = next;
                continue;
            }
        }
        push_joined(&mut out, source.text(r));
        cur = source.tokens.next_real(r);
    }
    out
}

fn push_joined(out: &mut String, text: &str) {
    if !out.is_empty() {
        out.push(' ');
    }
    out.push_str(text);
}

fn push_tokens(source: &Source, start: TokenRef, consumed: usize, out: &mut String) {
    let mut cur = Some(start);
    for _ in 0..consumed {
        let r = match cur {
            Some(r) => r,
            None => break,
        };
        push_joined(out, source.text(r));
        cur = source.tokens.next_real(r);
    }
}

fn push_remaining(source: &Source, mut cur: Option<TokenRef>, out: &mut String) {
    while let Some(r) = cur {
        push_joined(out, source.text(r));
        cur = source.tokens.next_real(r);
    }
}

fn advance_by(source: &Source, start: TokenRef, consumed: usize) -> Option<TokenRef> {
    let mut cur = Some(start);
    for _ in 0..consumed {
        cur = cur.and_then(|r| source.tokens.next_real(r));
    }
    cur
}

fn emit_raw_fallback(
    source: &Source,
    pattern: &Pattern,
    look_behind: &Pattern,
    look_ahead: &Pattern,
    to: &str,
    offset: usize,
    limit: usize,
) -> String {
    let mut state = FormatterState::new();
    let mut counter = 0usize;
    let mut prev_end = source
        .tokens
        .head
        .map(|h| source.tokens.get(h).end)
        .unwrap_or(0);
    let mut cur = source.tokens.first_real();
    while let Some(r) = cur {
        let t = *source.tokens.get(r);
        state.emit_gap_comments(source, prev_end, t.begin);

        if !pattern.is_empty() {
            if let Some(m) = try_pattern_match(source, r, pattern, look_behind, look_ahead) {
                counter += 1;
                let in_window = counter > offset && (limit == 0 || counter <= offset + limit);
                if in_window {
                    let substituted = substitute_captures(&source.buffer, to, &m.captures);
                    let last_kind = last_consumed_kind(source, r, m.consumed);
                    state.emit_raw(&substituted);
                    if matches!(
                        last_kind,
                        Some(TokenKind::Punct(b';'))
                            | Some(TokenKind::Punct(b'{'))
                            | Some(TokenKind::Punct(b'}'))
                            | Some(TokenKind::Csrc)
                    ) {
                        state.need_newline = true;
                    }
                } else {
                    emit_tokens(&mut state, source, r, m.consumed);
                }
                prev_end = last_consumed_end(source, r, m.consumed).unwrap_or(t.end);
                cur = advance_by(source, r, m.consumed);
                continue;
            }
        }

        state.emit(&source.buffer, t.kind, t.begin, t.end, None);
        prev_end = t.end;
        cur = source.tokens.next_real(r);
    }
    state.finish()
}

fn emit_tokens(state: &mut FormatterState, source: &Source, start: TokenRef, consumed: usize) {
    let mut cur = Some(start);
    for _ in 0..consumed {
        let r = match cur {
            Some(r) => r,
            None => break,
        };
        let t = *source.tokens.get(r);
        state.emit(&source.buffer, t.kind, t.begin, t.end, None);
        cur = source.tokens.next_real(r);
    }
}

fn last_consumed_kind(source: &Source, start: TokenRef, consumed: usize) -> Option<TokenKind> {
    if consumed == 0 {
        return None;
    }
    advance_by(source, start, consumed - 1).map(|r| source.tokens.get(r).kind)
}

fn last_consumed_end(source: &Source, start: TokenRef, consumed: usize) -> Option<usize> {
    if consumed == 0 {
        return None;
    }
    advance_by(source, start, consumed - 1).map(|r| source.tokens.get(r).end)
}
