use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("{kind}")]
pub struct Error {
    pub kind: ErrorKind,
}

#[derive(Debug, Clone, Error)]
pub enum ErrorKind {
    #[error("syntax error: unparseable content: {snippet}")]
    SyntaxError { snippet: String },
    #[error("pattern requires more than 9 captures")]
    CaptureOverflow,
}

impl Error {
    pub fn syntax(snippet: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::SyntaxError {
                snippet: snippet.into(),
            },
        }
    }

    pub fn capture_overflow() -> Self {
        Self {
            kind: ErrorKind::CaptureOverflow,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
