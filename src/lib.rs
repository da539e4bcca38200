#![forbid(missing_docs)]
//! # `txlex`
//! The `txlex` crate is a kit to build streaming lexers out of small composable grammar nodes.
//! Instead of writing a scanner by hand, a grammar is assembled from matchers for runes, bytes and
//! literals, repetitions, lookaheads and nested sub-grammars. The engine drives the grammar over
//! any [`std::io::Read`] source and produces a flat stream of typed token and error messages.
//!
//! The input is read through a [`BufferedStream`] that supports nested speculative reads, the
//! transactions ([`Tx`]). Each alternative of a grammar runs in its own transaction that is
//! either committed or rolled back. Bytes that no open transaction can reach any more are dropped
//! eagerly, so the memory used does not depend on the size of the input.
//!
//! Nesting is encoded in the messages themselves: every message carries the level of the
//! grammar scope that emitted it.
//!
//! # Example
//! ```rust
//! use txlex::{Builder, Chain, Lexer, MessageKind};
//!
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! enum Token {
//!     Number,
//!     Comma,
//!     LParen,
//!     RParen,
//! }
//!
//! fn number(b: &Builder<Token>) -> Chain<Token> {
//!     b.check(|c| c.is_ascii_digit()).repeat(1..).emit(Token::Number)
//! }
//!
//! // The content of a bracket is scanned one level deeper.
//! fn list(b: &Builder<Token>) -> Vec<Chain<Token>> {
//!     vec![
//!         number(b),
//!         b.rune(',').emit(Token::Comma),
//!         b.rune(' ').repeat(1..).omit(),
//!         b.rune('(').emit(Token::LParen).sub_grammar(list),
//!         b.rune(')').emit(Token::RParen).break_(),
//!     ]
//! }
//!
//! fn grammar(b: &Builder<Token>) -> Vec<Chain<Token>> {
//!     vec![
//!         number(b),
//!         b.rune(' ').repeat(1..).omit(),
//!         b.rune('(').emit(Token::LParen).sub_grammar(list),
//!     ]
//! }
//!
//! let mut lexer = Lexer::new(grammar);
//! let mut messages = Vec::new();
//! lexer.run("1 (2, 3) 4".as_bytes(), &mut messages).unwrap();
//! for m in &messages {
//!     assert_eq!(m.kind(), MessageKind::Token);
//!     println!("{} {:?} '{}' {}", m.level(), m.token_type(), m.text(), m.span());
//! }
//! let levels: Vec<usize> = messages.iter().map(|m| m.level()).collect();
//! assert_eq!(levels, vec![0, 0, 1, 1, 1, 1, 0]);
//! ```
//!
//! # Crate features
//! The crate has the following features:
//! - `serde`: This feature is enabled by default. It adds `Serialize` and `Deserialize`
//!   implementations to [`Message`], [`Span`], [`Quantifier`] and [`LexerOptions`].

// Logs a contract violation and panics.
macro_rules! fatal {
    ($($arg:tt)+) => {{
        log::error!($($arg)+);
        panic!($($arg)+)
    }};
}

/// Module that provides the grammar builder
mod builder;
pub use builder::Builder;

/// Module that provides the Chain type
mod chain;
pub use chain::Chain;

/// Module that provides the execution context of nodes
mod context;
pub use context::Context;

/// Module with error definitions
mod errors;
pub use errors::{Result, TxlexError, TxlexErrorKind};

/// Module that provides the message history
mod history;
pub use history::History;

/// The module with internal implementation details.
mod internal;

/// Module that provides the pull style message iterator
mod iterator;
pub use iterator::MessageIter;

/// The module with the lexer.
mod lexer;
pub use lexer::{run, tokenize, Lexer};

/// Module that provides the Message type
mod message;
pub use message::{GrammarError, Message, MessageKind, Payload};

/// Module that provides the Node trait
mod node;
pub use node::Node;

/// Module that provides the lexer options
mod options;
pub use options::LexerOptions;

/// Module that provides the node outcomes
mod outcome;
pub use outcome::{BreakAction, NodeKind, Outcome};

/// Rune predicate combinators
pub mod predicate;

/// Module that provides the Quantifier type
mod quantifier;
pub use quantifier::Quantifier;

/// Module that provides the receivers of messages
mod receiver;
pub use receiver::{from_fn, Discard, FnReceiver, Receiver};

/// Module that provides a Span type
mod span;
pub use span::Span;

/// Module that provides the buffered stream
mod stream;
pub use stream::BufferedStream;

/// Module that provides the transaction type
mod tx;
pub use tx::{Source, Tx};
