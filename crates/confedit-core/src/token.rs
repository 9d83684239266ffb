//! Token kinds and the arena-backed token stream.
//!
//! A real lexer never hands back pointers into a process-wide table here:
//! each source owns a flat `Vec<Token>` and tokens address each other by
//! index, so a source (and every capture borrowed from it) can be dropped
//! as a unit.

/// A token's lexical class. Punctuation kinds equal their ASCII byte value,
/// per the host lexer's contract; the three synthesized kinds live outside
/// that byte range conceptually even though they're plain enum variants here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Soi,
    Eoi,
    Comment,
    Id,
    CNum,
    FNum,
    CStr,
    Punct(u8),
    /// An inline host source block (`C{ ... }C`). Formats like `;`.
    Csrc,
}

impl TokenKind {
    pub fn is_boundary(self) -> bool {
        matches!(self, TokenKind::Soi | TokenKind::Eoi)
    }

    pub fn is_opener(self) -> bool {
        matches!(self, TokenKind::Punct(b'{') | TokenKind::Punct(b'('))
    }

    pub fn is_closer(self) -> bool {
        matches!(self, TokenKind::Punct(b'}') | TokenKind::Punct(b')'))
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, TokenKind::CNum | TokenKind::FNum)
    }
}

pub type TokenRef = usize;

#[derive(Debug, Clone, Copy)]
pub struct Token {
    pub kind: TokenKind,
    pub begin: usize,
    pub end: usize,
    pub prev: Option<TokenRef>,
    pub next: Option<TokenRef>,
}

/// Doubly-linked token sequence, backed by an arena so links are plain
/// indices rather than pointers. Exactly one SOI at the head, one EOI at
/// the tail.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    pub tokens: Vec<Token>,
    pub head: Option<TokenRef>,
    pub tail: Option<TokenRef>,
}

impl TokenStream {
    pub fn get(&self, r: TokenRef) -> &Token {
        &self.tokens[r]
    }

    pub fn is_real(&self, r: TokenRef) -> bool {
        !self.tokens[r].kind.is_boundary()
    }

    /// Next non-boundary token after `r`, or `None` if `r` is followed by EOI.
    pub fn next_real(&self, r: TokenRef) -> Option<TokenRef> {
        let n = self.tokens[r].next?;
        self.is_real(n).then_some(n)
    }

    /// Previous non-boundary token before `r`, or `None` if `r` is preceded by SOI.
    pub fn prev_real(&self, r: TokenRef) -> Option<TokenRef> {
        let p = self.tokens[r].prev?;
        self.is_real(p).then_some(p)
    }

    /// First real token in the stream, i.e. SOI's successor if it isn't EOI.
    pub fn first_real(&self) -> Option<TokenRef> {
        let head = self.head?;
        self.next_real(head)
    }

    /// Appends a new token right after `after`, fixing up the surrounding
    /// links. Returns the new token's index.
    pub fn insert_after(&mut self, after: TokenRef, mut token: Token) -> TokenRef {
        let old_next = self.tokens[after].next;
        let new_ref = self.tokens.len();
        token.prev = Some(after);
        token.next = old_next;
        self.tokens.push(token);
        self.tokens[after].next = Some(new_ref);
        if let Some(n) = old_next {
            self.tokens[n].prev = Some(new_ref);
        } else {
            self.tail = Some(new_ref);
        }
        new_ref
    }
}
