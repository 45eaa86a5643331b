use std::num::{ParseFloatError, ParseIntError};

use crate::value::Kind;

/// Category of a coercion error. Lets callers tell bad input text apart from
/// shape mismatches without matching on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed text during primitive coercion, or a failing text hook.
    Parse,
    /// A keyed source used a key that is not text.
    MapKey,
    /// No rule exists for the destination/source kind pair.
    Coercion,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Parse => f.write_str("parse"),
            ErrorKind::MapKey => f.write_str("map key"),
            ErrorKind::Coercion => f.write_str("coercion"),
        }
    }
}

/// Error returned by [`convert`](crate::convert).
///
/// Errors propagate unchanged from the failing frame to the caller. The
/// destination may be partially written when one is returned.
#[derive(Debug, thiserror::Error)]
pub enum CoerceError {
    #[error("parse int: {0}")]
    ParseInt(#[from] ParseIntError),

    #[error("parse float: {0}")]
    ParseFloat(#[from] ParseFloatError),

    #[error("parse bool: invalid syntax {0:?}")]
    ParseBool(String),

    #[error("unmarshal {type_name}: {source}")]
    Unmarshal {
        type_name: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("unknown source map key type: {0}")]
    UnknownSourceMapKeyType(Kind),

    #[error("unsupported coercion: {dest} <- {src}")]
    UnsupportedCoercion { dest: Kind, src: Kind },
}

impl CoerceError {
    pub fn unsupported(dest: Kind, src: Kind) -> Self {
        Self::UnsupportedCoercion { dest, src }
    }

    /// Wrap an error raised by a custom text hook.
    pub fn unmarshal(
        type_name: &'static str,
        err: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Unmarshal {
            type_name,
            source: err.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CoerceError::ParseInt(_)
            | CoerceError::ParseFloat(_)
            | CoerceError::ParseBool(_)
            | CoerceError::Unmarshal { .. } => ErrorKind::Parse,
            CoerceError::UnknownSourceMapKeyType(_) => ErrorKind::MapKey,
            CoerceError::UnsupportedCoercion { .. } => ErrorKind::Coercion,
        }
    }
}
