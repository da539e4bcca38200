//! Module with the grammar builder.
//!
//! A grammar is a function from a [`Builder`] to the list of its alternatives. Every alternative
//! is a [`Chain`] that is assembled with the fluent node constructors below. The builder methods
//! start a new chain, the chain methods of the same name append to it.
//!
//! ```rust
//! use txlex::{Builder, Chain};
//!
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! enum Token {
//!     Word,
//! }
//!
//! fn words(b: &Builder<Token>) -> Vec<Chain<Token>> {
//!     vec![
//!         b.check(char::is_alphabetic).repeat(1..).emit(Token::Word),
//!         b.rune(' ').repeat(1..).omit(),
//!     ]
//! }
//!
//! let messages = txlex::tokenize(words, "hello world".as_bytes()).unwrap();
//! assert_eq!(messages.len(), 2);
//! ```
use std::{borrow::Cow, marker::PhantomData};

use crate::{
    internal::nodes::{
        Break, ByteFn, Emit, EmitError, FollowedBy, Literal, Omit, Repeat, Rest, RuneFn,
        SubGrammar, Tap, Until, UntilByte, UntilUnescaped,
    },
    BreakAction, Chain, Context, GrammarError, Node, Outcome, Quantifier, Result, Tx,
};

/// The factory of grammar chains.
pub struct Builder<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Builder<T> {
    /// Creates a new builder.
    pub fn new() -> Self {
        Builder {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for Builder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Builder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Builder")
    }
}

// The builder methods that start a chain with a node forward to the chain method.
macro_rules! starters {
    ($(
        $(#[$doc:meta])*
        fn $name:ident $(<$($g:ident),+>)? ($($arg:ident: $ty:ty),*) $(where [$($w:tt)+])?;
    )+) => {
        impl<T: 'static> Builder<T> {
            $(
                $(#[$doc])*
                pub fn $name $(<$($g),+>)? (&self, $($arg: $ty),*) -> Chain<T> $(where $($w)+)? {
                    self.chain().$name($($arg),*)
                }
            )+
        }
    };
}

starters! {
    /// Starts a chain that matches the rune `r`.
    fn rune(r: char);
    /// Starts a chain that matches any rune except `r`.
    fn not_rune(r: char);
    /// Starts a chain that matches any rune.
    fn any_rune();
    /// Starts a chain that matches a rune satisfying the predicate.
    fn check<P>(pred: P) where [P: Fn(char) -> bool + 'static];
    /// Starts a chain that matches a rune not satisfying the predicate.
    fn check_not<P>(pred: P) where [P: Fn(char) -> bool + 'static];
    /// Starts a chain that matches the byte `b`.
    fn byte(b: u8);
    /// Starts a chain that matches any byte.
    fn any_byte();
    /// Starts a chain that matches a byte satisfying the predicate.
    fn check_byte<P>(pred: P) where [P: Fn(u8) -> bool + 'static];
    /// Starts a chain that matches the literal `sample`.
    fn string(sample: &str);
    /// Starts a chain that matches the first matching literal of `samples`.
    fn strings(samples: &[&str]);
    /// Starts a chain that matches the byte literal `sample`.
    fn bytes(sample: &[u8]);
    /// Starts a chain that matches the first matching byte literal of `samples`.
    fn bytes_of(samples: &[&[u8]]);
    /// Starts a chain that consumes runes until the predicate matches.
    fn until<P>(pred: P) where [P: Fn(char) -> bool + 'static];
    /// Starts a chain that consumes runes while the predicate matches.
    fn while_<P>(pred: P) where [P: Fn(char) -> bool + 'static];
    /// Starts a chain that consumes runes until an unescaped `stop` rune.
    fn until_unescaped(escape: char, stop: char);
    /// Starts a chain that consumes bytes until the predicate matches.
    fn until_byte<P>(pred: P) where [P: Fn(u8) -> bool + 'static];
    /// Starts a chain that consumes bytes while the predicate matches.
    fn while_byte<P>(pred: P) where [P: Fn(u8) -> bool + 'static];
    /// Starts a chain with a one rune lookahead.
    fn followed_by<P>(pred: P) where [P: Fn(char) -> bool + 'static];
    /// Starts a chain with a one rune lookahead for `r`.
    fn followed_by_rune(r: char);
    /// Starts a chain with a negative one rune lookahead.
    fn not_followed_by<P>(pred: P) where [P: Fn(char) -> bool + 'static];
    /// Starts a chain with a tap node.
    fn tap<F>(callback: F) where [F: Fn(&Context<'_, T>, &mut Tx<'_>) -> Result<Outcome> + 'static];
    /// Starts a chain with a sub-grammar.
    fn sub_grammar<G>(grammar: G) where [G: Fn(&Builder<T>) -> Vec<Chain<T>> + 'static];
    /// Starts a chain with a negative sub-grammar lookahead.
    fn not_sub_grammar<G>(grammar: G) where [G: Fn(&Builder<T>) -> Vec<Chain<T>> + 'static];
    /// Starts a chain that consumes all remaining input.
    fn rest();
}

impl<T: 'static> Builder<T> {
    /// Starts an empty unnamed chain.
    pub fn chain(&self) -> Chain<T> {
        Chain::new(None)
    }

    /// Starts an empty chain with a diagnostic name.
    pub fn named(&self, name: impl Into<Cow<'static, str>>) -> Chain<T> {
        Chain::new(Some(name.into()))
    }

    /// Starts a chain with a custom node.
    pub fn node<N>(&self, name: impl Into<Cow<'static, str>>, node: N) -> Chain<T>
    where
        N: Node<T> + 'static,
    {
        self.chain().node(name, node)
    }
}

impl<T: 'static> Chain<T> {
    /// Appends a node that matches the rune `r`.
    pub fn rune(self, r: char) -> Self {
        self.append("Rune", RuneFn::new(move |c| c == r))
    }

    /// Appends a node that matches any rune except `r`.
    pub fn not_rune(self, r: char) -> Self {
        self.append("NotRune", RuneFn::new(move |c| c != r))
    }

    /// Appends a node that matches any rune.
    pub fn any_rune(self) -> Self {
        self.append("AnyRune", RuneFn::new(|_| true))
    }

    /// Appends a node that matches a rune satisfying the predicate.
    pub fn check<P>(self, pred: P) -> Self
    where
        P: Fn(char) -> bool + 'static,
    {
        self.append("Fn", RuneFn::new(pred))
    }

    /// Appends a node that matches a rune not satisfying the predicate.
    pub fn check_not<P>(self, pred: P) -> Self
    where
        P: Fn(char) -> bool + 'static,
    {
        self.append("NotFn", RuneFn::new(move |c| !pred(c)))
    }

    /// Appends a node that matches the byte `b`.
    pub fn byte(self, b: u8) -> Self {
        self.append("Byte", ByteFn::new(move |x| x == b))
    }

    /// Appends a node that matches any byte.
    pub fn any_byte(self) -> Self {
        self.append("AnyByte", ByteFn::new(|_| true))
    }

    /// Appends a node that matches a byte satisfying the predicate.
    pub fn check_byte<P>(self, pred: P) -> Self
    where
        P: Fn(u8) -> bool + 'static,
    {
        self.append("FnByte", ByteFn::new(pred))
    }

    /// Appends a node that matches the literal `sample`.
    ///
    /// # Panics
    /// Panics if the sample is empty.
    pub fn string(self, sample: &str) -> Self {
        self.append("String", Literal::new(vec![sample.as_bytes().to_vec()]))
    }

    /// Appends a node that matches the first matching literal of `samples`.
    ///
    /// The samples are tried in the given order, so a sample that is a prefix of a later one
    /// shadows it.
    pub fn strings(self, samples: &[&str]) -> Self {
        let samples = samples.iter().map(|s| s.as_bytes().to_vec()).collect();
        self.append("String", Literal::new(samples))
    }

    /// Appends a node that matches the byte literal `sample`.
    pub fn bytes(self, sample: &[u8]) -> Self {
        self.append("Bytes", Literal::new(vec![sample.to_vec()]))
    }

    /// Appends a node that matches the first matching byte literal of `samples`.
    pub fn bytes_of(self, samples: &[&[u8]]) -> Self {
        let samples = samples.iter().map(|s| s.to_vec()).collect();
        self.append("Bytes", Literal::new(samples))
    }

    /// Appends a node that consumes runes until the predicate matches.
    ///
    /// The matching rune is not consumed. Rolls back if no rune was consumed.
    pub fn until<P>(self, pred: P) -> Self
    where
        P: Fn(char) -> bool + 'static,
    {
        self.append("Until", Until::new(pred))
    }

    /// Appends a node that consumes runes while the predicate matches.
    pub fn while_<P>(self, pred: P) -> Self
    where
        P: Fn(char) -> bool + 'static,
    {
        self.append("While", Until::new(move |c| !pred(c)))
    }

    /// Appends a node that consumes bytes until the predicate matches.
    ///
    /// The matching byte is not consumed. Rolls back if no byte was consumed.
    pub fn until_byte<P>(self, pred: P) -> Self
    where
        P: Fn(u8) -> bool + 'static,
    {
        self.append("UntilByte", UntilByte::new(pred))
    }

    /// Appends a node that consumes bytes while the predicate matches.
    pub fn while_byte<P>(self, pred: P) -> Self
    where
        P: Fn(u8) -> bool + 'static,
    {
        self.append("WhileByte", UntilByte::new(move |b| !pred(b)))
    }

    /// Appends a node that consumes runes until an unescaped `stop` rune.
    pub fn until_unescaped(self, escape: char, stop: char) -> Self {
        self.append("UntilUnescaped", UntilUnescaped::new(escape, stop))
    }

    /// Appends a one rune lookahead that does not consume.
    pub fn followed_by<P>(self, pred: P) -> Self
    where
        P: Fn(char) -> bool + 'static,
    {
        self.append("FollowedBy", FollowedBy::new(pred, true))
    }

    /// Appends a one rune lookahead for `r`.
    pub fn followed_by_rune(self, r: char) -> Self {
        self.append("FollowedByRune", FollowedBy::new(move |c| c == r, true))
    }

    /// Appends a negative one rune lookahead. It also matches at the end of the stream.
    pub fn not_followed_by<P>(self, pred: P) -> Self
    where
        P: Fn(char) -> bool + 'static,
    {
        self.append("NotFollowedBy", FollowedBy::new(pred, false))
    }

    /// Repeats the previous node within the bounds of the quantifier.
    ///
    /// # Panics
    /// Panics if this is the first node or the previous node can't be repeated.
    pub fn repeat(self, quantifier: impl Into<Quantifier>) -> Self {
        self.append("Repeat", Repeat::new(quantifier.into()))
    }

    /// Makes the previous node optional.
    pub fn optional(self) -> Self {
        self.repeat(Quantifier::optional())
    }

    /// Appends a node that emits the pending span as a token.
    ///
    /// # Panics
    /// Panics at evaluation time if the pending span is empty.
    pub fn emit(self, token: T) -> Self
    where
        T: Clone,
    {
        self.append("Emit", Emit::new(move |_| token.clone()))
    }

    /// Appends a node that emits the pending span as the token computed from its bytes.
    pub fn emit_with<F>(self, token: F) -> Self
    where
        F: Fn(&[u8]) -> T + 'static,
    {
        self.append("EmitWith", Emit::new(token))
    }

    /// Appends a node that drops the pending span.
    pub fn omit(self) -> Self {
        self.append("Omit", Omit)
    }

    /// Appends a node that emits the pending span as an error.
    pub fn error<E>(self, error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        self.append("Error", EmitError::new(GrammarError::new(error)))
    }

    /// Appends a node that calls the callback and returns its outcome.
    pub fn tap<F>(self, callback: F) -> Self
    where
        F: Fn(&Context<'_, T>, &mut Tx<'_>) -> Result<Outcome> + 'static,
    {
        self.append("Tap", Tap::new(callback))
    }

    /// Appends a nested grammar scope one level deeper.
    ///
    /// The scope ends successfully at a break node of the nested grammar. Running out of input
    /// inside the scope is an [`crate::TxlexErrorKind::IncompleteGrammar`] error.
    pub fn sub_grammar<G>(self, grammar: G) -> Self
    where
        G: Fn(&Builder<T>) -> Vec<Chain<T>> + 'static,
    {
        self.append("SubGrammar", SubGrammar::new(grammar, false))
    }

    /// Appends a negative lookahead over a whole grammar that never consumes.
    pub fn not_sub_grammar<G>(self, grammar: G) -> Self
    where
        G: Fn(&Builder<T>) -> Vec<Chain<T>> + 'static,
    {
        self.append("NotSubGrammar", SubGrammar::new(grammar, true))
    }

    /// Appends a node that consumes all remaining input.
    pub fn rest(self) -> Self {
        self.append("Rest", Rest)
    }

    /// Ends the current grammar scope and keeps the consumption of the alternative.
    pub fn break_(self) -> Self {
        self.append("Break", Break::new(BreakAction::Commit))
    }

    /// Ends the current grammar scope and discards the consumption of the alternative.
    pub fn break_rollback(self) -> Self {
        self.append("BreakRollback", Break::new(BreakAction::Rollback))
    }

    /// Appends a custom node.
    pub fn node<N>(self, name: impl Into<Cow<'static, str>>, node: N) -> Self
    where
        N: Node<T> + 'static,
    {
        self.append(name, node)
    }
}
