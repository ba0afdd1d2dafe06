use core::fmt;

/// Source position of the next unconsumed codepoint.
///
/// Lines and columns are 1-based and count codepoints, not bytes. Consuming
/// `'\n'` moves to column 1 of the next line; any other codepoint moves one
/// column right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number.
    pub column: usize,
    /// Bytes consumed so far.
    pub offset: u64,
    /// Codepoints consumed so far.
    pub index: u64,
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl Position {
    /// The position before anything has been consumed.
    pub const START: Self = Self {
        line: 1,
        column: 1,
        offset: 0,
        index: 0,
    };

    /// Moves past `ch`, which is `width` bytes long in the stream.
    #[inline]
    pub(crate) fn advance(&mut self, ch: char, width: u8) {
        self.offset += u64::from(width);
        self.index += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
