use crate::chunk::display_id;
use riff::ChunkId;
use std::io;

/// Everything that can go wrong while decoding a bank.
///
/// All of these are terminal: the input is structurally invalid and the
/// decode is abandoned without a partial result.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unexpected end of input while reading {what}")]
    TruncatedInput { what: &'static str },

    #[error("expected chunk '{}', found '{}'", display_id(.expected), display_id(.found))]
    UnexpectedTag { expected: ChunkId, found: ChunkId },

    #[error(
        "not a SoundFont 2 file: expected '{}', found '{}'",
        display_id(.expected),
        display_id(.found)
    )]
    UnexpectedFormat { expected: ChunkId, found: ChunkId },

    #[error("chunk '{}' has invalid size {len}: {reason}", display_id(.id))]
    InvalidChunkSize {
        id: ChunkId,
        len: usize,
        reason: String,
    },

    #[error("chunk '{}' must contain exactly 4 bytes, found {len}", display_id(.id))]
    MalformedField { id: ChunkId, len: usize },

    #[error("chunk '{}' must contain {max} or fewer bytes, found {len}", display_id(.id))]
    FieldTooLarge { id: ChunkId, len: usize, max: usize },

    #[error("duplicate chunk '{}'", display_id(.0))]
    DuplicateField(ChunkId),

    #[error("required chunk '{}' is missing", display_id(.0))]
    MissingRequiredField(ChunkId),

    #[error("missing chunk '{}'", display_id(.0))]
    MissingChunk(ChunkId),

    #[error(transparent)]
    Io(#[from] io::Error),
}

// Records are only read from payloads already checked against their width
// and carry no magic or asserts, so in practice only the IO arms occur.
impl From<binread::Error> for Error {
    fn from(err: binread::Error) -> Self {
        match err {
            binread::Error::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                Error::TruncatedInput { what: "record" }
            }
            binread::Error::Io(e) => Error::Io(e),
            other => Error::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{:?}", other),
            )),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
