// Test the message iterator that runs the lexer on a worker thread
// Run with `cargo test --test iterator_test`

use txlex::{Builder, Chain, LexerOptions, MessageIter, TxlexErrorKind};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn values(b: &Builder<u32>) -> Vec<Chain<u32>> {
    vec![
        b.check(|c| c.is_ascii_digit())
            .repeat(1..)
            .emit_with(|v| v.iter().fold(0, |n, d| n * 10 + (d - b'0') as u32)),
        b.rune(' ').repeat(1..).omit(),
        b.rune('(').emit(0).sub_grammar(inner),
    ]
}

fn inner(b: &Builder<u32>) -> Vec<Chain<u32>> {
    vec![
        b.check(|c| c.is_ascii_digit()).repeat(1..).emit(1),
        b.rune(')').emit(0).break_(),
    ]
}

fn large_input() -> Vec<u8> {
    "12 ".repeat(100_000).into_bytes()
}

#[test]
fn test_ordered_delivery() {
    init();
    let mut iter = MessageIter::spawn("7 (8) 42".as_bytes(), values, LexerOptions::default())
        .unwrap();
    let mut seen = Vec::new();
    for m in iter.by_ref() {
        seen.push((m.text().into_owned(), m.level()));
    }
    assert_eq!(
        seen,
        vec![
            ("7".to_string(), 0),
            ("(".to_string(), 0),
            ("8".to_string(), 1),
            (")".to_string(), 1),
            ("42".to_string(), 0),
        ]
    );
    iter.finish().unwrap();
}

#[test]
fn test_tokens_computed_from_bytes() {
    init();
    let iter = MessageIter::spawn("7 42".as_bytes(), values, LexerOptions::default()).unwrap();
    let tokens: Vec<u32> = iter.filter_map(|m| m.token_type().copied()).collect();
    assert_eq!(tokens, vec![7, 42]);
}

#[test]
fn test_cancel_stops_worker() {
    init();
    let options = LexerOptions::new().with_channel_capacity(1);
    let mut iter = MessageIter::spawn(std::io::Cursor::new(large_input()), values, options).unwrap();
    let first: Vec<_> = iter.by_ref().take(3).collect();
    assert_eq!(first.len(), 3);
    iter.cancel();
    assert!(iter.is_cancelled());
    let err = iter.finish().unwrap_err();
    assert!(matches!(err.kind(), TxlexErrorKind::Cancelled));
}

#[test]
fn test_incomplete_input_is_reported_by_finish() {
    init();
    let mut iter = MessageIter::spawn("5 (1".as_bytes(), values, LexerOptions::default()).unwrap();
    let first = iter.next().unwrap();
    assert_eq!(first.token_type(), Some(&5));
    // The unterminated scope never commits its messages.
    assert!(iter.next().is_none());
    let err = iter.finish().unwrap_err();
    assert!(err.is_incomplete(), "{}", err);
}

#[test]
fn test_drop_mid_stream() {
    init();
    let options = LexerOptions::new().with_channel_capacity(2);
    let mut iter = MessageIter::spawn(std::io::Cursor::new(large_input()), values, options).unwrap();
    assert!(iter.next().is_some());
    // Dropping must not wait for the whole input.
    drop(iter);
}

#[test]
#[should_panic(expected = "can't be the first node")]
fn test_worker_panic_is_resumed() {
    init();
    let iter = MessageIter::spawn(
        "1".as_bytes(),
        |b: &Builder<u32>| vec![b.chain().emit(1)],
        LexerOptions::default(),
    )
    .unwrap();
    let _ = iter.finish();
}
