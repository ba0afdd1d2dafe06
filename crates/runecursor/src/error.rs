use bstr::BString;
use thiserror::Error;

/// Errors reported by [`RuneCursor`](crate::RuneCursor).
///
/// `E` is the error type of the cursor's [`ByteSource`](crate::ByteSource).
#[derive(Error, Debug)]
pub enum CursorError<E> {
    /// The stream contains a malformed UTF-8 sequence.
    #[error("malformed UTF-8 sequence {bytes:?} at byte {offset}")]
    Decode {
        /// Stream byte offset of the first byte of the malformed sequence.
        offset: u64,
        /// The offending bytes.
        bytes: BString,
    },
    /// The source signaled end-of-stream.
    #[error("unexpected end of stream")]
    EndOfStream,
    /// The source kept reading without letting the decoder make progress.
    #[error("byte source stalled without producing codepoints")]
    Stall,
    /// The source failed.
    #[error("byte source error: {0}")]
    Source(E),
    /// More codepoints were requested than are buffered.
    ///
    /// This is local to the call that produced it; the cursor is unchanged.
    #[error("requested {requested} codepoints but only {available} are buffered")]
    InsufficientBuffer {
        /// Codepoints the caller asked for.
        requested: usize,
        /// Codepoints in the pending queue.
        available: usize,
    },
    /// A refill was attempted after the cursor had already been exhausted.
    #[error("cursor exhausted: {0}")]
    Exhausted(Exhaustion),
}

impl<E> CursorError<E> {
    /// Whether this error left the cursor permanently exhausted.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::InsufficientBuffer { .. })
    }

    /// Whether this error is a clean end-of-stream rather than a failure.
    #[must_use]
    pub fn is_end_of_stream(&self) -> bool {
        matches!(
            self,
            Self::EndOfStream | Self::Exhausted(Exhaustion::EndOfStream)
        )
    }

    /// The exhaustion cause this error corresponds to, if it is fatal.
    #[must_use]
    pub fn exhaustion(&self) -> Option<Exhaustion> {
        match self {
            Self::Decode { offset, .. } => Some(Exhaustion::Decode { offset: *offset }),
            Self::EndOfStream => Some(Exhaustion::EndOfStream),
            Self::Stall => Some(Exhaustion::Stall),
            Self::Source(_) => Some(Exhaustion::Source),
            Self::InsufficientBuffer { .. } => None,
            Self::Exhausted(cause) => Some(*cause),
        }
    }
}

/// Why a cursor stopped reading.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exhaustion {
    /// The source signaled end-of-stream.
    #[error("end of stream")]
    EndOfStream,
    /// A malformed UTF-8 sequence starts at stream byte `offset`.
    #[error("malformed UTF-8 at byte {offset}")]
    Decode {
        /// Stream byte offset of the malformed sequence.
        offset: u64,
    },
    /// The source stalled.
    #[error("stalled source")]
    Stall,
    /// The source failed.
    #[error("source error")]
    Source,
}
