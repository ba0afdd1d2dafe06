use alloc::vec::Vec;
use std::io;

/// Serves `data` in reads whose sizes cycle through `sizes`, further capped
/// by the buffer handed to each read.
pub struct ChunkedReader<'a> {
    data: &'a [u8],
    sizes: Vec<usize>,
    reads: usize,
}

impl<'a> ChunkedReader<'a> {
    pub fn new(data: &'a [u8], sizes: &[usize]) -> Self {
        Self {
            data,
            sizes: sizes.to_vec(),
            reads: 0,
        }
    }

    /// One byte per read.
    pub fn trickle(data: &'a [u8]) -> Self {
        Self::new(data, &[1])
    }

    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl io::Read for ChunkedReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let size = if self.sizes.is_empty() {
            usize::MAX
        } else {
            self.sizes[self.reads % self.sizes.len()].max(1)
        };
        self.reads += 1;
        let n = size.min(buf.len()).min(self.data.len());
        let (head, tail) = self.data.split_at(n);
        buf[..n].copy_from_slice(head);
        self.data = tail;
        Ok(n)
    }
}

/// Serves `data`, then fails with `kind` instead of signaling end-of-stream.
pub struct FailingReader<'a> {
    pub data: &'a [u8],
    pub kind: io::ErrorKind,
}

impl io::Read for FailingReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.data.is_empty() {
            return Err(self.kind.into());
        }
        io::Read::read(&mut self.data, buf)
    }
}

/// Claims to have filled one byte more than it was given.
pub struct LyingReader;

impl io::Read for LyingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        buf.fill(b'a');
        Ok(buf.len() + 1)
    }
}

/// Turns arbitrary `splits` into read sizes covering `len` bytes; each split
/// is taken modulo the bytes left.
pub fn split_sizes(len: usize, splits: &[usize]) -> Vec<usize> {
    let mut sizes = Vec::new();
    let mut remaining = len;
    for &s in splits {
        if remaining == 0 {
            break;
        }
        let size = 1 + (s % remaining);
        sizes.push(size);
        remaining -= size;
    }
    if remaining > 0 {
        sizes.push(remaining);
    }
    sizes
}
