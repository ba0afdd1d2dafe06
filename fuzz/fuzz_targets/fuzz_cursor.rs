#![no_main]
use std::io;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use runecursor::{CursorError, CursorOptions, Exhaustion, RuneCursor, SENTINEL};

#[derive(Debug, Arbitrary)]
struct Input {
    capacity: u8,
    split_seed: u64,
    max_read: u8,
    ops: Vec<Op>,
    bytes: Vec<u8>,
}

#[derive(Debug, Arbitrary)]
enum Op {
    Next,
    Peek(u8),
    Advance(u8),
    HasPrefix(u8),
    ConsumePrefix(u8),
}

/// Serves `data` in reads of random length drawn from a seeded RNG.
struct RandomReads<'a> {
    data: &'a [u8],
    rng: SmallRng,
    max_read: usize,
}

impl io::Read for RandomReads<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let want = self.rng.random_range(1..=self.max_read);
        let n = want.min(buf.len()).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

/// The codepoints of the longest valid UTF-8 prefix of `bytes`, and whether
/// the input ends in a malformed sequence (as opposed to clean EOF or a
/// truncated tail).
fn reference(bytes: &[u8]) -> (Vec<char>, Option<u64>) {
    match std::str::from_utf8(bytes) {
        Ok(text) => (text.chars().collect(), None),
        Err(err) => {
            let valid = std::str::from_utf8(&bytes[..err.valid_up_to()]).unwrap();
            let bad = err.error_len().map(|_| err.valid_up_to() as u64);
            (valid.chars().collect(), bad)
        }
    }
}

fn run(input: Input) {
    let (expected, malformed_at) = reference(&input.bytes);
    let mut cursor = RuneCursor::with_options(
        RandomReads {
            data: &input.bytes,
            rng: SmallRng::seed_from_u64(input.split_seed),
            max_read: usize::from(input.max_read).max(1),
        },
        CursorOptions {
            scratch_capacity: usize::from(input.capacity),
        },
    );

    let mut consumed = 0usize;
    for op in input.ops {
        let remaining = expected.len() - consumed;
        match op {
            Op::Next => {
                let ch = cursor.next_char();
                if remaining > 0 {
                    assert_eq!(ch, expected[consumed]);
                    consumed += 1;
                } else {
                    assert_eq!(ch, SENTINEL);
                }
            }
            Op::Peek(n) => {
                let n = usize::from(n) + 1;
                let before = cursor.position();
                let ch = cursor.peek_at(n);
                let want = expected.get(consumed + n - 1).copied().unwrap_or(SENTINEL);
                assert_eq!(ch, want);
                assert_eq!(cursor.position(), before);
            }
            Op::Advance(n) => {
                let n = usize::from(n);
                let queued = cursor.buffered();
                match cursor.advance(n) {
                    Ok(()) => consumed += n,
                    Err(err) => {
                        assert!(matches!(err, CursorError::InsufficientBuffer { .. }));
                        assert_eq!(cursor.buffered(), queued);
                    }
                }
            }
            Op::HasPrefix(n) | Op::ConsumePrefix(n) => {
                let n = usize::from(n).min(remaining);
                let prefix: String = expected[consumed..consumed + n].iter().collect();
                let before = cursor.position();
                let consume = matches!(op, Op::ConsumePrefix(_));
                let matched = if consume {
                    cursor.consume_prefix(&prefix)
                } else {
                    cursor.has_prefix(&prefix)
                };
                assert!(matched);
                if consume {
                    consumed += n;
                } else {
                    assert_eq!(cursor.position(), before);
                }
            }
        }
        cursor.assert_invariants();
        assert_eq!(cursor.position().index, consumed as u64);
    }

    // Drain and compare the tail.
    let rest: String = cursor.chars().collect();
    assert!(rest.chars().eq(expected[consumed..].iter().copied()));
    assert!(cursor.is_exhausted());
    match malformed_at {
        Some(offset) => assert_eq!(cursor.exhaustion(), Some(Exhaustion::Decode { offset })),
        None => assert_eq!(cursor.exhaustion(), Some(Exhaustion::EndOfStream)),
    }
}

fuzz_target!(|input: Input| run(input));
