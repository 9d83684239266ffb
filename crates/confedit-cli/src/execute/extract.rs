use anyhow::Result;
use confedit_core::capture::fixup_gap_captures;
use confedit_core::gap::add_comment_tokens;
use confedit_core::{compile_pattern, substitute_captures, try_pattern_match, Source, TokenRef};

use crate::args::SiteArgs;

/// Walks the stream printing one match per line; once the window defined
/// by `offset`/`limit` is exhausted, extraction stops outright (unlike
/// insert/replace's ongoing per-site gate).
///
/// Splices synthetic `Comment` tokens into `source` before matching, the
/// same way `main.c`'s `cmd_extract_main` calls `add_comment_tokens` right
/// before `cmd_extract`, so a pattern can match against comment text.
pub fn run(
    source: &mut Source,
    from: &str,
    to: Option<&str>,
    strip_whitespace: bool,
    site: &SiteArgs,
) -> Result<String> {
    add_comment_tokens(source);

    let pattern = compile_pattern(from);
    let look_behind = compile_pattern(site.look_behind.as_deref().unwrap_or(""));
    let look_ahead = compile_pattern(site.look_ahead.as_deref().unwrap_or(""));
    let offset = site.offset();
    let limit = site.limit();

    let mut out = String::new();
    if pattern.is_empty() {
        return Ok(out);
    }

    let mut counter = 0usize;
    let mut cur = source.tokens.first_real();

    while let Some(r) = cur {
        let Some(m) = try_pattern_match(source, r, &pattern, &look_behind, &look_ahead) else {
            cur = source.tokens.next_real(r);
            continue;
        };

        counter += 1;
        if counter <= offset {
            cur = advance_by(source, r, m.consumed);
            continue;
        }
        if limit != 0 && counter > offset + limit {
            break;
        }

        let (begin, end) = match m.last {
            Some(last) => (source.tokens.get(r).begin, source.tokens.get(last).end),
            None => (source.tokens.get(r).begin, source.tokens.get(r).begin),
        };

        let rendered = match to {
            None => source.buffer[begin..end].to_string(),
            Some(template) => {
                let mut captures = m.captures.clone();
                fixup_gap_captures(source, &pattern.elements, &mut captures);
                substitute_captures(&source.buffer, template, &captures)
            }
        };

        out.push_str(&strip_and_dedent(&rendered, strip_whitespace));
        out.push('\n');

        cur = advance_by(source, r, m.consumed);
    }

    Ok(out)
}

fn advance_by(source: &Source, start: TokenRef, consumed: usize) -> Option<TokenRef> {
    let mut cur = Some(start);
    for _ in 0..consumed {
        cur = cur.and_then(|r| source.tokens.next_real(r));
    }
    cur
}

fn strip_and_dedent(text: &str, strip_whitespace: bool) -> String {
    let trimmed = text.trim_matches('\n');
    if !strip_whitespace {
        return trimmed.to_string();
    }
    let min_indent = trimmed
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);
    trimmed
        .lines()
        .map(|l| {
            if l.len() >= min_indent {
                &l[min_indent..]
            } else {
                l.trim_start()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
