#![allow(missing_docs, dead_code)]

use std::io;

/// A reader that hands out `data` in reads of at most `chunk` bytes.
pub struct Chunks<'a> {
    pub data: &'a [u8],
    pub chunk: usize,
}

impl io::Read for Chunks<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.chunk.max(1).min(buf.len()).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

pub const PROGRAM: &str = "let größe = 42;\nif größe >= 40 {\n    say(\"groß ✓\");\n}\n";
