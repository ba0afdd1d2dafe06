//! Benchmark – `runecursor::RuneCursor`
#![allow(missing_docs)]

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use runecursor::{CursorOptions, RuneCursor};

/// Produce deterministic text of exactly `target_len` bytes mixing ASCII,
/// two-, three- and four-byte codepoints and newlines.
fn make_payload(target_len: usize) -> String {
    const PIECES: [&str; 6] = ["ident", " = ", "größe", "中文", "🦀", ";\n"];
    let mut s = String::with_capacity(target_len);
    for piece in PIECES.iter().cycle() {
        if s.len() + piece.len() > target_len {
            break;
        }
        s.push_str(piece);
    }
    s.extend(std::iter::repeat_n('a', target_len - s.len()));
    debug_assert_eq!(s.len(), target_len);
    s
}

/// Drain the cursor one codepoint at a time, returning the final line so
/// that Criterion cannot optimise the work away.
fn run_next_char(payload: &str, capacity: usize) -> usize {
    let mut cursor = RuneCursor::with_options(
        payload.as_bytes(),
        CursorOptions {
            scratch_capacity: capacity,
        },
    );
    while !cursor.is_exhausted() {
        black_box(cursor.next_char());
    }
    cursor.line()
}

/// Lexer-style access: peek two ahead, then consume a prefix or one char.
fn run_lookahead(payload: &str, capacity: usize) -> usize {
    let mut cursor = RuneCursor::with_options(
        payload.as_bytes(),
        CursorOptions {
            scratch_capacity: capacity,
        },
    );
    let mut matched = 0usize;
    while !cursor.is_exhausted() {
        black_box(cursor.peek_at(2));
        if cursor.consume_prefix(" = ") || cursor.consume_prefix("größe") {
            matched += 1;
        } else {
            cursor.next_char();
        }
    }
    matched
}

fn bench_cursor(c: &mut Criterion) {
    let payload = make_payload(64 * 1024);

    let mut group = c.benchmark_group("rune_cursor");
    group.throughput(Throughput::Bytes(payload.len() as u64));

    for &capacity in &[4usize, 40, 4096] {
        group.bench_with_input(
            BenchmarkId::new("next_char", capacity),
            &capacity,
            |b, &cap| b.iter(|| black_box(run_next_char(black_box(&payload), cap))),
        );
        group.bench_with_input(
            BenchmarkId::new("lookahead", capacity),
            &capacity,
            |b, &cap| b.iter(|| black_box(run_lookahead(black_box(&payload), cap))),
        );
    }
    group.finish();
}

fn criterion() -> Criterion {
    let mut c = Criterion::default();
    if cfg!(feature = "bench-fast") {
        c = c
            .warm_up_time(Duration::from_millis(10))
            .measurement_time(Duration::from_millis(100))
            .sample_size(10);
    } else {
        c = c
            .warm_up_time(Duration::from_secs(3))
            .measurement_time(Duration::from_secs(5));
    }
    c
}

criterion_group! { name = benches; config = criterion(); targets = bench_cursor }
criterion_main!(benches);
