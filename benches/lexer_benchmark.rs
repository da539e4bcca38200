use std::{sync::LazyLock, time::Duration};

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use txlex::{Builder, Chain, Discard, Lexer, LexerOptions, MessageIter};

#[derive(Debug, Clone, Copy)]
enum Token {
    Number,
    Ident,
    Operator,
    LParen,
    RParen,
}

static LEXER_INPUT: LazyLock<String> = LazyLock::new(|| {
    let line = "alpha + (12 * (beta - 3)) / gamma_7 - (4 + (5 * delta))\n";
    line.repeat(2_000)
});

fn expression(b: &Builder<Token>) -> Vec<Chain<Token>> {
    vec![
        b.check(|c| c.is_ascii_digit()).repeat(1..).emit(Token::Number),
        b.check(|c| c.is_alphabetic())
            .check(|c| c.is_alphanumeric() || c == '_')
            .repeat(0..)
            .emit(Token::Ident),
        b.strings(&["+", "-", "*", "/"]).emit(Token::Operator),
        b.check(char::is_whitespace).repeat(1..).omit(),
        b.rune('(').emit(Token::LParen).sub_grammar(group),
    ]
}

fn group(b: &Builder<Token>) -> Vec<Chain<Token>> {
    let mut chains = expression(b);
    chains.push(b.rune(')').emit(Token::RParen).break_());
    chains
}

fn lexer_benchmark(c: &mut Criterion) {
    let mut lexer = Lexer::new(expression);
    c.bench_function("lexer_benchmark", |b| {
        b.iter(|| {
            let mut messages = Vec::new();
            lexer.run(LEXER_INPUT.as_bytes(), &mut messages).unwrap();
            black_box(messages);
        });
    });
}

fn history_benchmark(c: &mut Criterion) {
    let mut lexer = Lexer::with_options(expression, LexerOptions::new().with_history_depth(8));
    c.bench_function("history_benchmark", |b| {
        b.iter(|| {
            lexer.run(LEXER_INPUT.as_bytes(), &mut Discard).unwrap();
        });
    });
}

fn iterator_benchmark(c: &mut Criterion) {
    c.bench_function("iterator_benchmark", |b| {
        b.iter(|| {
            let iter = MessageIter::spawn(
                LEXER_INPUT.as_bytes(),
                expression,
                LexerOptions::new().with_channel_capacity(256),
            )
            .unwrap();
            for m in iter {
                black_box(m);
            }
        });
    });
}

fn builder_benchmark(c: &mut Criterion) {
    c.bench_function("builder_benchmark", |b| {
        b.iter(|| {
            black_box(Lexer::new(expression));
        });
    });
}

criterion_group! {
    name = bencheslexer;
    config = Criterion::default().measurement_time(Duration::from_secs(10));
    targets = lexer_benchmark, history_benchmark, iterator_benchmark
}

criterion_group! {
    name = benchesbuilder;
    config = Criterion::default();
    targets = builder_benchmark
}

criterion_main!(bencheslexer, benchesbuilder);
