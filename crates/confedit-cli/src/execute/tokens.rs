use std::fmt::Write as _;

use anyhow::Result;
use confedit_core::gap;
use confedit_core::{Source, TokenKind};

pub fn run(source: &Source, processed: bool) -> Result<String> {
    let mut out = String::new();
    if processed {
        let mut cur = source.tokens.head;
        while let Some(r) = cur {
            let t = *source.tokens.get(r);
            writeln!(out, "{:<12} {}", kind_label(t.kind), source.text(r))?;
            if let Some(next) = t.next {
                let gap_from = t.end;
                let gap_to = source.tokens.get(next).begin;
                for span in gap::scan_gap(source.buffer.as_bytes(), gap_from, gap_to) {
                    writeln!(
                        out,
                        "{:<12} {}",
                        gap::label(span.kind),
                        &source.buffer[span.begin..span.end]
                    )?;
                }
            }
            cur = t.next;
        }
    } else {
        let mut cur = source.tokens.first_real();
        while let Some(r) = cur {
            let t = *source.tokens.get(r);
            writeln!(out, "{:<12} {}", kind_label(t.kind), source.text(r))?;
            cur = source.tokens.next_real(r);
        }
    }
    Ok(out)
}

fn kind_label(kind: TokenKind) -> String {
    match kind {
        TokenKind::Soi => "SOI".to_string(),
        TokenKind::Eoi => "EOI".to_string(),
        TokenKind::Comment => "COMMENT".to_string(),
        TokenKind::Id => "ID".to_string(),
        TokenKind::CNum => "CNUM".to_string(),
        TokenKind::FNum => "FNUM".to_string(),
        TokenKind::CStr => "CSTR".to_string(),
        TokenKind::Csrc => "CSRC".to_string(),
        TokenKind::Punct(b) => (b as char).to_string(),
    }
}
