//! A streaming UTF-8 codepoint cursor for lexers.
//!
//! [`RuneCursor`] sits between a blocking byte source and a lexer. It decodes
//! UTF-8 incrementally, so a codepoint split across reads is handled
//! transparently, and offers arbitrary-depth lookahead, prefix matching and
//! line/column tracking that only moves when codepoints are consumed.
//!
//! ```rust
//! use runecursor::RuneCursor;
//!
//! let input: &[u8] = "a\nb".as_bytes();
//! let mut cursor = RuneCursor::new(input);
//!
//! assert_eq!(cursor.next_char(), 'a');
//! assert_eq!((cursor.line(), cursor.column()), (1, 2));
//! assert_eq!(cursor.next_char(), '\n');
//! assert_eq!((cursor.line(), cursor.column()), (2, 1));
//! assert_eq!(cursor.next_char(), 'b');
//! assert!(cursor.is_exhausted());
//! ```

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod cursor;
mod error;
mod options;
mod position;
mod scratch;
mod source;
mod trace;

#[cfg(all(test, feature = "std"))]
mod tests;

pub use cursor::{Chars, RuneCursor, SENTINEL};
pub use error::{CursorError, Exhaustion};
pub use options::{CursorOptions, DEFAULT_SCRATCH_CAPACITY, MIN_SCRATCH_CAPACITY};
pub use position::Position;
pub use source::ByteSource;
