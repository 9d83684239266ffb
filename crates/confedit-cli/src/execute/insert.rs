use anyhow::Result;
use confedit_core::{compile_pattern, tokens_match_after, tokens_match_before, FormatterState, Source};

use crate::args::SiteArgs;

/// During formatting, at each token position, checks whether the
/// look-behind matches ending at the preceding token and the look-ahead
/// matches starting here; injects the insert text at the `offset`..`offset
/// + limit` window of successful sites. With no look-around at all, inserts
/// once at end of stream.
pub fn run(source: &Source, text: &str, site: &SiteArgs) -> Result<String> {
    let look_behind = compile_pattern(site.look_behind.as_deref().unwrap_or(""));
    let look_ahead = compile_pattern(site.look_ahead.as_deref().unwrap_or(""));
    let offset = site.offset();
    let limit = site.limit();

    let insert_source = Source::new("<insert>", text.to_string());

    let mut state = FormatterState::new();

    if look_behind.is_empty() && look_ahead.is_empty() {
        state.emit_source(source);
        state.emit_source(&insert_source);
        return Ok(state.finish());
    }

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

        let prev_real = source.tokens.prev_real(r);
        if tokens_match_before(source, prev_real, &look_behind)
            && tokens_match_after(source, Some(r), &look_ahead)
        {
            counter += 1;
            if counter > offset && (limit == 0 || counter <= offset + limit) {
                state.emit_source(&insert_source);
            }
        }

        state.emit(&source.buffer, t.kind, t.begin, t.end, None);
        prev_end = t.end;
        cur = source.tokens.next_real(r);
    }

    Ok(state.finish())
}
