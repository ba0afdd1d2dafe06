//! The codepoint cursor.
//!
//! Overview
//! - [`RuneCursor`] reads bytes from a [`ByteSource`] into a fixed-size
//!   scratch buffer, decodes complete UTF-8 sequences into a pending queue of
//!   `(char, width)` pairs, and serves peeks and consumption from that queue.
//! - The queue only grows on demand: a peek of depth `n` reads until `n`
//!   codepoints are queued. Sequences split across reads stay in the scratch
//!   buffer until the bytes that complete them arrive.
//! - Position (line, column, byte offset) advances only when codepoints leave
//!   the queue through consumption. Peeks and failed prefix matches never move
//!   it.
//!
//! Failure model
//! - End-of-stream, a malformed sequence, a source error, or a stalled source
//!   exhausts the cursor for good: the scratch buffer is released and no
//!   further reads happen. Codepoints already queued remain consumable.
//! - Methods returning `char` (and [`RuneCursor::chars`]) report failure with
//!   [`SENTINEL`] or by ending, and keep the first fatal error for
//!   [`RuneCursor::take_error`]. The `try_*` methods and
//!   [`RuneCursor::fill`] return it directly.

use alloc::collections::VecDeque;
use core::{fmt, iter::FusedIterator};

use bstr::ByteSlice;

use crate::{
    error::{CursorError, Exhaustion},
    options::CursorOptions,
    position::Position,
    scratch::ScratchBuffer,
    source::ByteSource,
    trace::{debug_event, trace_event},
};

/// Returned by the `char` methods when no codepoint is available.
///
/// U+FFFD can also occur in valid input; use [`RuneCursor::try_peek_at`] or
/// [`RuneCursor::try_next`] where the two must be told apart.
pub const SENTINEL: char = char::REPLACEMENT_CHARACTER;

/// Reads beyond this many in a row without a new codepoint are a stall. A
/// well-behaved source needs at most 3 (a 4-byte sequence fed byte by byte).
///
/// Malformed bytes are rejected on arrival and the scratch buffer holds at
/// least 4 bytes, so a source that returns real bytes never reaches this
/// limit. Stalls in practice come from a source reporting more bytes than the
/// buffer it was given.
const MAX_IDLE_READS: usize = 3;

/// A streaming cursor over the codepoints of a UTF-8 byte source.
///
/// # Examples
///
/// ```rust
/// use runecursor::RuneCursor;
///
/// let input: &[u8] = "let x = 1;\nx".as_bytes();
/// let mut cursor = RuneCursor::new(input);
///
/// assert!(cursor.has_prefix("let"));
/// assert_eq!(cursor.column(), 1);
/// assert!(cursor.consume_prefix("let "));
/// assert_eq!(cursor.column(), 5);
///
/// assert_eq!(cursor.peek_at(3), '=');
/// cursor.advance(1).unwrap();
/// assert_eq!(cursor.next_char(), ' ');
/// ```
pub struct RuneCursor<R: ByteSource> {
    source: R,
    scratch: ScratchBuffer,
    pending: VecDeque<(char, u8)>,
    position: Position,
    exhausted: Option<Exhaustion>,
    deferred: Option<CursorError<R::Error>>,
    error: Option<CursorError<R::Error>>,
}

impl<R: ByteSource> RuneCursor<R> {
    /// Creates a cursor with the default 40-byte scratch buffer.
    #[must_use]
    pub fn new(source: R) -> Self {
        Self::with_options(source, CursorOptions::default())
    }

    /// Creates a cursor configured by `options`.
    #[must_use]
    pub fn with_options(source: R, options: CursorOptions) -> Self {
        Self {
            source,
            scratch: ScratchBuffer::new(options.effective_capacity()),
            pending: VecDeque::new(),
            position: Position::START,
            exhausted: None,
            deferred: None,
            error: None,
        }
    }

    /// Ensures at least `n` codepoints are queued, reading from the source as
    /// needed. Does not consume anything.
    ///
    /// # Errors
    ///
    /// Any error except [`CursorError::InsufficientBuffer`]. The first failure
    /// that leaves the request unsatisfied carries the detail (decode offset,
    /// source error); after that, every call that needs more codepoints than
    /// are queued returns [`CursorError::Exhausted`].
    pub fn fill(&mut self, n: usize) -> Result<(), CursorError<R::Error>> {
        if self.pending.len() >= n {
            return Ok(());
        }
        if let Some(cause) = self.exhausted {
            return Err(self
                .deferred
                .take()
                .unwrap_or(CursorError::Exhausted(cause)));
        }
        match self.refill(n) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.exhaust(&err);
                // A malformed sequence can follow enough good codepoints to
                // satisfy this request; report it when the queue runs dry.
                if self.pending.len() >= n {
                    self.deferred = Some(err);
                    Ok(())
                } else {
                    Err(err)
                }
            }
        }
    }

    fn refill(&mut self, n: usize) -> Result<(), CursorError<R::Error>> {
        self.decode()?;
        let mut idle_reads = 0;
        while self.pending.len() < n {
            let before = self.pending.len();
            self.scratch.compact();

            let spare = self.scratch.spare_mut();
            let room = spare.len();
            debug_assert!(room > 0, "undecoded tail filled the scratch buffer");
            let read = self.source.read(spare).map_err(CursorError::Source)?;
            trace_event!(
                room,
                read,
                queued = self.pending.len(),
                wanted = n,
                "read from byte source"
            );
            if read == 0 {
                return Err(CursorError::EndOfStream);
            }
            if read > room {
                return Err(CursorError::Stall);
            }
            self.scratch.commit(read);
            self.decode()?;

            if self.pending.len() == before {
                idle_reads += 1;
                if idle_reads > MAX_IDLE_READS {
                    return Err(CursorError::Stall);
                }
            } else {
                idle_reads = 0;
            }
        }
        Ok(())
    }

    fn decode(&mut self) -> Result<(), CursorError<R::Error>> {
        self.scratch
            .decode_into(&mut self.pending)
            .map(|_| ())
            .map_err(|bad| CursorError::Decode {
                offset: bad.offset,
                bytes: bad.bytes,
            })
    }

    fn exhaust(&mut self, err: &CursorError<R::Error>) {
        self.exhausted = err.exhaustion();
        self.scratch.collapse();
        debug_event!(
            cause = ?self.exhausted,
            line = self.position.line,
            column = self.position.column,
            queued = self.pending.len(),
            "cursor exhausted"
        );
    }

    /// Like [`fill`](Self::fill), but keeps the first fatal error for
    /// [`take_error`](Self::take_error) instead of returning it.
    fn fill_or_stash(&mut self, n: usize) -> bool {
        match self.fill(n) {
            Ok(()) => true,
            Err(CursorError::Exhausted(_)) => false,
            Err(err) => {
                self.error.get_or_insert(err);
                false
            }
        }
    }

    fn consume_front(&mut self) -> Option<char> {
        let (ch, width) = self.pending.pop_front()?;
        self.position.advance(ch, width);
        Some(ch)
    }

    /// Returns `true` if no further codepoint can be produced.
    ///
    /// May read from the source, but never consumes.
    pub fn is_exhausted(&mut self) -> bool {
        !self.fill_or_stash(1)
    }

    /// Consumes and returns the next codepoint, or [`SENTINEL`] if there is
    /// none. Nothing is consumed when the sentinel is returned.
    pub fn next_char(&mut self) -> char {
        if self.fill_or_stash(1) {
            self.consume_front().unwrap_or(SENTINEL)
        } else {
            SENTINEL
        }
    }

    /// Consumes and returns the next codepoint.
    ///
    /// # Errors
    ///
    /// Returns the [`fill`](Self::fill) error when no codepoint is available.
    pub fn try_next(&mut self) -> Result<char, CursorError<R::Error>> {
        self.fill(1)?;
        self.consume_front()
            .ok_or(CursorError::InsufficientBuffer {
                requested: 1,
                available: 0,
            })
    }

    /// Returns the next codepoint without consuming it, or [`SENTINEL`].
    pub fn peek(&mut self) -> char {
        self.peek_at(1)
    }

    /// Returns the `n`-th upcoming codepoint (1-based) without consuming
    /// anything, or [`SENTINEL`] if the stream ends first.
    ///
    /// # Panics
    ///
    /// Panics if `n` is zero.
    pub fn peek_at(&mut self, n: usize) -> char {
        assert!(n > 0, "peek_at is 1-based");
        if self.fill_or_stash(n) {
            self.pending[n - 1].0
        } else {
            SENTINEL
        }
    }

    /// Returns the `n`-th upcoming codepoint (1-based) without consuming
    /// anything.
    ///
    /// # Errors
    ///
    /// Returns the [`fill`](Self::fill) error when fewer than `n` codepoints
    /// remain.
    ///
    /// # Panics
    ///
    /// Panics if `n` is zero.
    pub fn try_peek_at(&mut self, n: usize) -> Result<char, CursorError<R::Error>> {
        assert!(n > 0, "try_peek_at is 1-based");
        self.fill(n)?;
        Ok(self.pending[n - 1].0)
    }

    /// Consumes `n` already-queued codepoints.
    ///
    /// This never reads from the source; peek or [`fill`](Self::fill) first.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::InsufficientBuffer`] if fewer than `n`
    /// codepoints are queued. Nothing is consumed in that case.
    pub fn advance(&mut self, n: usize) -> Result<(), CursorError<R::Error>> {
        let available = self.pending.len();
        if n > available {
            return Err(CursorError::InsufficientBuffer {
                requested: n,
                available,
            });
        }
        for (ch, width) in self.pending.drain(..n) {
            self.position.advance(ch, width);
        }
        Ok(())
    }

    /// Returns `true` if the upcoming codepoints spell out `prefix`.
    ///
    /// Never consumes. The empty string is always a prefix.
    pub fn has_prefix(&mut self, prefix: &str) -> bool {
        self.match_prefix(prefix).is_some()
    }

    /// Consumes `prefix` if the upcoming codepoints spell it out.
    ///
    /// On a mismatch, or if the stream ends first, nothing changes: the queue,
    /// line and column are exactly as before the call.
    pub fn consume_prefix(&mut self, prefix: &str) -> bool {
        let Some((count, after)) = self.match_prefix(prefix) else {
            return false;
        };
        self.pending.drain(..count);
        self.position = after;
        true
    }

    /// Matches `prefix` against the queue head. On success returns the number
    /// of queued entries it covers and the position after consuming them.
    fn match_prefix(&mut self, prefix: &str) -> Option<(usize, Position)> {
        let count = prefix.chars().count();
        if !self.fill_or_stash(count) {
            return None;
        }
        let mut after = self.position;
        for (&(queued, width), expected) in self.pending.iter().zip(prefix.chars()) {
            if queued != expected {
                return None;
            }
            after.advance(queued, width);
        }
        Some((count, after))
    }

    /// Line of the next unconsumed codepoint, starting at 1.
    #[must_use]
    pub fn line(&self) -> usize {
        self.position.line
    }

    /// Column of the next unconsumed codepoint, starting at 1.
    #[must_use]
    pub fn column(&self) -> usize {
        self.position.column
    }

    /// Full position of the next unconsumed codepoint.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Bytes consumed so far.
    #[must_use]
    pub fn bytes_consumed(&self) -> u64 {
        self.position.offset
    }

    /// Codepoints decoded and waiting to be consumed. Never reads.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.pending.len()
    }

    /// Scratch buffer capacity in bytes; zero once exhausted.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.scratch.capacity()
    }

    /// Why the cursor stopped reading, if it has.
    #[must_use]
    pub fn exhaustion(&self) -> Option<Exhaustion> {
        self.exhausted
    }

    /// Takes the fatal error swallowed by a sentinel-returning method, if any.
    ///
    /// Errors returned by [`fill`](Self::fill) or the `try_*` methods are not
    /// kept here.
    pub fn take_error(&mut self) -> Option<CursorError<R::Error>> {
        self.error.take()
    }

    /// Panics if the queue, position and scratch buffer disagree about how
    /// many bytes have been decoded.
    #[cfg(any(test, feature = "fuzzing"))]
    #[doc(hidden)]
    pub fn assert_invariants(&self) {
        let queued: u64 = self.pending.iter().map(|&(_, w)| u64::from(w)).sum();
        assert_eq!(
            self.position.offset + queued,
            self.scratch.decoded_offset(),
            "consumed and queued bytes must add up to the decoded bytes"
        );
        assert!(self.scratch.undecoded().len() < crate::options::MIN_SCRATCH_CAPACITY);
        assert_eq!(self.exhausted.is_some(), self.scratch.capacity() == 0);
    }

    /// Consumes codepoints through an iterator, reading as needed.
    ///
    /// ```rust
    /// use runecursor::RuneCursor;
    ///
    /// let input: &[u8] = "héllo".as_bytes();
    /// let mut cursor = RuneCursor::new(input);
    /// assert!(cursor.consume_prefix("h"));
    /// let rest: String = cursor.chars().collect();
    /// assert_eq!(rest, "éllo");
    /// assert_eq!(cursor.column(), 6);
    /// ```
    pub fn chars(&mut self) -> Chars<'_, R> {
        Chars { cursor: self }
    }

    /// The underlying source.
    #[must_use]
    pub fn get_ref(&self) -> &R {
        &self.source
    }

    /// The underlying source, mutably. Reading from it directly skips bytes
    /// the cursor would otherwise decode.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.source
    }

    /// Returns the underlying source, dropping queued codepoints and any
    /// undecoded bytes.
    #[must_use]
    pub fn into_inner(self) -> R {
        self.source
    }
}

/// Consuming iterator over a cursor's codepoints, created by
/// [`RuneCursor::chars`].
///
/// Stops when the cursor is exhausted; the reason is available from
/// [`RuneCursor::take_error`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Chars<'a, R: ByteSource> {
    cursor: &'a mut RuneCursor<R>,
}

impl<R: ByteSource> Iterator for Chars<'_, R> {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor.fill_or_stash(1) {
            self.cursor.consume_front()
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let queued = self.cursor.pending.len();
        if self.cursor.exhausted.is_some() {
            (queued, Some(queued))
        } else {
            (queued, None)
        }
    }
}

impl<R: ByteSource> FusedIterator for Chars<'_, R> {}

impl<R: ByteSource> fmt::Debug for RuneCursor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuneCursor")
            .field("position", &self.position)
            .field("queued", &self.pending.len())
            .field("undecoded", &self.scratch.undecoded().as_bstr())
            .field("capacity", &self.scratch.capacity())
            .field("exhausted", &self.exhausted)
            .finish_non_exhaustive()
    }
}
