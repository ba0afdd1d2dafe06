/// Configuration options for [`RuneCursor`](crate::RuneCursor).
///
/// # Examples
///
/// ```rust
/// use runecursor::{CursorOptions, RuneCursor};
///
/// let input: &[u8] = b"hello";
/// let cursor = RuneCursor::with_options(
///     input,
///     CursorOptions {
///         scratch_capacity: 4096,
///     },
/// );
/// assert_eq!(cursor.capacity(), 4096);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorOptions {
    /// Size in bytes of the scratch buffer each source read fills.
    ///
    /// This only controls I/O granularity. Lookahead depth is not limited by
    /// it: the pending queue grows as far as `peek_at` asks. Values below
    /// [`MIN_SCRATCH_CAPACITY`] are raised to it so that one maximal UTF-8
    /// sequence always fits.
    ///
    /// # Default
    ///
    /// `40`
    pub scratch_capacity: usize,
}

/// Scratch capacity used by [`CursorOptions::default`].
pub const DEFAULT_SCRATCH_CAPACITY: usize = 40;

/// Smallest scratch capacity a cursor runs with: the longest UTF-8 sequence.
pub const MIN_SCRATCH_CAPACITY: usize = 4;

impl Default for CursorOptions {
    fn default() -> Self {
        Self {
            scratch_capacity: DEFAULT_SCRATCH_CAPACITY,
        }
    }
}

impl CursorOptions {
    pub(crate) fn effective_capacity(self) -> usize {
        self.scratch_capacity.max(MIN_SCRATCH_CAPACITY)
    }
}
