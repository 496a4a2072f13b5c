//! The error type shared by every fallible operation in the crate.
use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The value has no structural hash, so it cannot be a map key or set
    /// member.
    #[error("values of kind `{kind}` have no structural hash and cannot be used as keys")]
    UnsupportedKeyKind { kind: &'static str },

    /// A non-empty collection was requested from a source with no elements.
    #[error("cannot build a non-empty {collection} from an empty source")]
    Empty { collection: &'static str },

    /// A terminal operation ran on a shared stream that was already drained.
    #[error("stream has already been consumed")]
    AlreadyConsumed,

    /// A shared stream was extended twice.
    #[error("stream has already been forked")]
    AlreadyForked,

    #[error("failed to write stream to {}", path.display())]
    Sink {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn unsupported(kind: &'static str) -> Error {
        Error::UnsupportedKeyKind { kind }
    }

    pub(crate) fn empty(collection: &'static str) -> Error {
        Error::Empty { collection }
    }

    /// Whether this error reports a second use of a single-use stream.
    pub fn is_reuse(&self) -> bool {
        matches!(self, Error::AlreadyConsumed | Error::AlreadyForked)
    }
}
