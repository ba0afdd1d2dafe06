#![allow(missing_docs)]

mod common;

use std::io;

use common::Chunks;
use insta::assert_snapshot;
use rstest::rstest;
use runecursor::{CursorError, CursorOptions, Exhaustion, RuneCursor, SENTINEL};

#[rstest]
#[case::lone_continuation(b"abc\x80def", 3)]
#[case::overlong(b"\xC0\x80", 0)]
#[case::surrogate(b"x\xED\xB2\x80", 1)]
#[case::bad_second_byte(b"\xE2\x28\xA1", 0)]
fn malformed_input_reports_offset(#[case] input: &[u8], #[case] offset: u64) {
    for chunk in [1, 2, 64] {
        let mut cursor = RuneCursor::new(Chunks { data: input, chunk });
        let decoded: String = cursor.chars().collect();
        assert_eq!(decoded.len() as u64, offset);
        assert_eq!(cursor.exhaustion(), Some(Exhaustion::Decode { offset }));
        match cursor.take_error() {
            Some(err @ CursorError::Decode { .. }) => assert!(!err.is_end_of_stream()),
            other => panic!("expected decode error, got {other:?}"),
        }
        assert_eq!(cursor.next_char(), SENTINEL);
    }
}

#[test]
fn timeout_from_source_is_surfaced_once() {
    struct TimesOut;
    impl io::Read for TimesOut {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::ErrorKind::TimedOut.into())
        }
    }

    let mut cursor = RuneCursor::new(TimesOut);
    match cursor.try_peek_at(1) {
        Err(CursorError::Source(err)) => assert_eq!(err.kind(), io::ErrorKind::TimedOut),
        other => panic!("expected source error, got {other:?}"),
    }
    assert!(matches!(
        cursor.try_next(),
        Err(CursorError::Exhausted(Exhaustion::Source))
    ));
    // The try_* methods hand errors back directly; nothing is left behind.
    assert!(cursor.take_error().is_none());
}

#[test]
fn borrowed_reader_outlives_exhausted_cursor() {
    let mut reader = Chunks {
        data: b"ab",
        chunk: 1,
    };
    let mut cursor = RuneCursor::with_options(
        &mut reader,
        CursorOptions {
            scratch_capacity: 8,
        },
    );
    assert_eq!(cursor.next_char(), 'a');
    assert!(cursor.consume_prefix("b"));
    assert!(cursor.is_exhausted());
    assert_eq!(cursor.capacity(), 0);
    drop(cursor);
    assert!(reader.data.is_empty());
}

#[test]
fn error_messages() {
    let mut cursor = RuneCursor::new(Chunks {
        data: b"ok\xC3(",
        chunk: 2,
    });
    assert_eq!(cursor.try_next().unwrap(), 'o');
    assert_eq!(cursor.try_next().unwrap(), 'k');
    let decode = cursor.try_next().unwrap_err();
    assert_snapshot!(decode.to_string(), @r#"malformed UTF-8 sequence "\xc3" at byte 2"#);
    let later = cursor.try_peek_at(1).unwrap_err();
    assert_snapshot!(later.to_string(), @"cursor exhausted: malformed UTF-8 at byte 2");
    let short = cursor.advance(3).unwrap_err();
    assert_snapshot!(short.to_string(), @"requested 3 codepoints but only 0 are buffered");
}
