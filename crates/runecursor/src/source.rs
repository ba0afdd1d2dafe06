//! Byte sources the cursor reads from.
//!
//! The cursor only needs one operation from its input: fill a caller-provided
//! buffer with the next bytes of the stream. [`ByteSource`] captures exactly
//! that. With the `std` feature every [`std::io::Read`] is a `ByteSource`, so
//! files, sockets, `&[u8]` and `std::io::Cursor` work out of the box. Without
//! `std`, byte slices are supported directly.
//!
//! The cursor holds its source by value. Pass `&mut source` to keep ownership
//! on the caller's side; the cursor never closes or drops a borrowed source.

/// A blocking provider of bytes.
pub trait ByteSource {
    /// The error reported when the underlying source fails.
    type Error;

    /// Reads up to `buf.len()` bytes into the front of `buf`.
    ///
    /// Returns the number of bytes written. `Ok(0)` for a non-empty `buf`
    /// signals end-of-stream. Short reads are valid.
    ///
    /// # Errors
    ///
    /// Returns `Err` when the source fails. The cursor treats this as fatal
    /// and never retries.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

#[cfg(feature = "std")]
impl<R: std::io::Read + ?Sized> ByteSource for R {
    type Error = std::io::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        loop {
            match std::io::Read::read(self, buf) {
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {}
                res => return res,
            }
        }
    }
}

#[cfg(not(feature = "std"))]
impl ByteSource for &[u8] {
    type Error = core::convert::Infallible;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let n = core::cmp::min(buf.len(), self.len());
        let (head, tail) = self.split_at(n);
        buf[..n].copy_from_slice(head);
        *self = tail;
        Ok(n)
    }
}
