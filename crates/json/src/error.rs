use thiserror::Error;

/// Malformed or incompletely consumed JSON. Every variant carries the byte offset
/// into the input where decoding stopped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof { offset: usize },

    #[error("unexpected character {found:?} at offset {offset}")]
    UnexpectedCharacter { offset: usize, found: char },

    #[error("invalid number at offset {offset}")]
    InvalidNumber { offset: usize },

    #[error("invalid escape sequence at offset {offset}")]
    InvalidEscape { offset: usize },

    #[error("invalid unicode code point at offset {offset}")]
    InvalidCodePoint { offset: usize },

    #[error("invalid utf-8 at offset {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("nesting exceeds {max_depth} levels at offset {offset}")]
    TooDeep { offset: usize, max_depth: usize },

    #[error("trailing characters at offset {offset}")]
    TrailingCharacters { offset: usize },
}

impl ParseError {
    pub fn offset(&self) -> usize {
        match *self {
            Self::UnexpectedEof { offset }
            | Self::UnexpectedCharacter { offset, .. }
            | Self::InvalidNumber { offset }
            | Self::InvalidEscape { offset }
            | Self::InvalidCodePoint { offset }
            | Self::InvalidUtf8 { offset }
            | Self::TooDeep { offset, .. }
            | Self::TrailingCharacters { offset } => offset,
        }
    }
}
