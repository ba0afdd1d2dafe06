//! Scratch buffer: the byte stage between the source and the pending queue.
//!
//! Bytes are read into a fixed-capacity buffer and decoded in place. Layout:
//!
//! ```text
//!  0          pos           len          capacity
//!  |  decoded  |  undecoded  |    free    |
//! ```
//!
//! Invariants
//! - `pos <= len <= capacity`.
//! - After a successful [`ScratchBuffer::decode_into`], the undecoded region
//!   is a strict prefix of some UTF-8 sequence, so it is at most 3 bytes long.
//!   With a capacity of at least 4 there is always room for another read.
//! - `base` is the stream offset of `buf[0]`; compaction moves it forward.

use alloc::{boxed::Box, collections::VecDeque, vec};

use bstr::BString;

/// A malformed UTF-8 sequence found while decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Malformed {
    pub(crate) offset: u64,
    pub(crate) bytes: BString,
}

#[derive(Debug)]
pub(crate) struct ScratchBuffer {
    buf: Box<[u8]>,
    pos: usize,
    len: usize,
    base: u64,
}

impl ScratchBuffer {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            buf: vec![0u8; capacity].into_boxed_slice(),
            pos: 0,
            len: 0,
            base: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Stream offset of the first undecoded byte.
    #[cfg(any(test, feature = "fuzzing"))]
    pub(crate) fn decoded_offset(&self) -> u64 {
        self.base + self.pos as u64
    }

    /// Bytes read from the source but not yet decoded.
    pub(crate) fn undecoded(&self) -> &[u8] {
        &self.buf[self.pos..self.len]
    }

    /// Decodes every complete sequence in the undecoded region and appends
    /// `(char, width)` entries to `queue`.
    ///
    /// A truncated sequence at the end of the region is left in place. Returns
    /// the number of codepoints appended. On a malformed sequence the
    /// codepoints before it are still appended and `pos` stops at it.
    pub(crate) fn decode_into(
        &mut self,
        queue: &mut VecDeque<(char, u8)>,
    ) -> Result<usize, Malformed> {
        let (valid, invalid_len) = split_valid(&self.buf[self.pos..self.len]);

        let before = queue.len();
        #[allow(clippy::cast_possible_truncation)] // len_utf8() <= 4
        queue.extend(valid.chars().map(|ch| (ch, ch.len_utf8() as u8)));
        let decoded = queue.len() - before;
        self.pos += valid.len();

        match invalid_len {
            Some(bad) => Err(Malformed {
                offset: self.base + self.pos as u64,
                bytes: BString::from(&self.buf[self.pos..self.pos + bad]),
            }),
            None => Ok(decoded),
        }
    }

    /// Moves the undecoded region to the front of the buffer.
    pub(crate) fn compact(&mut self) {
        if self.pos == 0 {
            return;
        }
        self.buf.copy_within(self.pos..self.len, 0);
        self.base += self.pos as u64;
        self.len -= self.pos;
        self.pos = 0;
    }

    /// The free tail that the next read fills.
    pub(crate) fn spare_mut(&mut self) -> &mut [u8] {
        &mut self.buf[self.len..]
    }

    /// Marks `n` bytes of the free tail as filled.
    pub(crate) fn commit(&mut self, n: usize) {
        debug_assert!(self.len + n <= self.buf.len());
        self.len += n;
    }

    /// Drops the storage; the buffer has no capacity afterwards.
    pub(crate) fn collapse(&mut self) {
        self.base += self.pos as u64;
        self.buf = Box::default();
        self.pos = 0;
        self.len = 0;
    }
}

/// Splits `bytes` into its longest valid UTF-8 prefix and, if the rest is
/// malformed rather than merely truncated, the length of the bad sequence.
fn split_valid(bytes: &[u8]) -> (&str, Option<usize>) {
    match core::str::from_utf8(bytes) {
        Ok(text) => (text, None),
        Err(err) => {
            let valid = &bytes[..err.valid_up_to()];
            (
                core::str::from_utf8(valid).unwrap_or_default(),
                err.error_len(),
            )
        }
    }
}
