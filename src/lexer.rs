//! Module with the lexer, the root run loop of a grammar.
use std::io::Read;

use log::debug;

use crate::{
    internal::alternation::{run_once, Step},
    BreakAction, BufferedStream, Builder, Chain, Context, History, LexerOptions, Message, Receiver,
    Result, TxlexErrorKind,
};

/// A lexer runs a grammar over a byte stream and passes the committed messages to a receiver.
///
/// The alternatives of the grammar are tried in order against the input. Whenever one of them
/// commits, its messages are delivered and the grammar restarts with the first alternative. The
/// run ends successfully at the end of the stream or when the root grammar reaches a break node.
pub struct Lexer<T> {
    chains: Vec<Chain<T>>,
    options: LexerOptions,
    history: History<T>,
}

impl<T: Clone + 'static> Lexer<T> {
    /// Creates a lexer with the default options.
    pub fn new<G>(grammar: G) -> Self
    where
        G: FnOnce(&Builder<T>) -> Vec<Chain<T>>,
    {
        Self::with_options(grammar, LexerOptions::default())
    }

    /// Creates a lexer with the given options.
    pub fn with_options<G>(grammar: G, options: LexerOptions) -> Self
    where
        G: FnOnce(&Builder<T>) -> Vec<Chain<T>>,
    {
        let chains = grammar(&Builder::new());
        debug!("Lexer with {} alternatives, {:?}", chains.len(), options);
        Lexer {
            chains,
            options,
            history: History::new(options.history_depth),
        }
    }

    /// The options of the lexer.
    #[inline]
    pub fn options(&self) -> &LexerOptions {
        &self.options
    }

    /// The alternatives of the root grammar.
    #[inline]
    pub fn chains(&self) -> &[Chain<T>] {
        &self.chains
    }

    /// The history of the last run.
    #[inline]
    pub fn history(&self) -> &History<T> {
        &self.history
    }

    /// Runs the grammar over `source`.
    ///
    /// Returns `Ok` at the clean end of the stream and when the root grammar reaches a break
    /// node. Fails with [`TxlexErrorKind::LeftoverData`] if no alternative matches the remaining
    /// input.
    pub fn run<R, Rc>(&mut self, source: R, receiver: &mut Rc) -> Result<()>
    where
        R: Read,
        Rc: Receiver<T> + ?Sized,
    {
        let mut stream = BufferedStream::with_chunk_size(source, self.options.chunk_size);
        self.run_stream(&mut stream, receiver)
    }

    /// Runs the grammar over an existing stream, starting at its committed offset.
    pub fn run_stream<Rc>(&mut self, stream: &mut BufferedStream<'_>, receiver: &mut Rc) -> Result<()>
    where
        Rc: Receiver<T> + ?Sized,
    {
        self.history.clear();
        let mut pending = Vec::new();
        loop {
            let step = {
                let mut ctx = Context::new(&self.history, &mut pending, self.options.max_depth);
                run_once(&self.chains, &mut ctx, &mut *stream)?
            };
            match step {
                Step::Committed => self.flush(&mut pending, receiver)?,
                Step::Break(action) => {
                    if action == BreakAction::Commit {
                        self.flush(&mut pending, receiver)?;
                    }
                    debug!("Root grammar breaks at {}", stream.offset());
                    return Ok(());
                }
                Step::Exhausted { has_data: true } => {
                    return Err(TxlexErrorKind::LeftoverData {
                        pos: stream.offset(),
                    }
                    .into());
                }
                Step::Exhausted { has_data: false } => {
                    debug!("End of stream at {}", stream.offset());
                    return Ok(());
                }
            }
        }
    }

    /// Delivers the pending messages in emission order and records them in the history.
    fn flush<Rc>(&mut self, pending: &mut Vec<Message<T>>, receiver: &mut Rc) -> Result<()>
    where
        Rc: Receiver<T> + ?Sized,
    {
        for message in pending.drain(..) {
            let record = (!self.history.is_disabled()).then(|| message.clone());
            receiver.receive(message)?;
            if let Some(message) = record {
                self.history.push(message);
            }
        }
        Ok(())
    }
}

impl<T> std::fmt::Debug for Lexer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("chains", &self.chains)
            .field("options", &self.options)
            .finish()
    }
}

/// Runs `grammar` over `source` with the default options.
pub fn run<T, G, R, Rc>(grammar: G, source: R, receiver: &mut Rc) -> Result<()>
where
    T: Clone + 'static,
    G: FnOnce(&Builder<T>) -> Vec<Chain<T>>,
    R: Read,
    Rc: Receiver<T> + ?Sized,
{
    Lexer::new(grammar).run(source, receiver)
}

/// Runs `grammar` over `source` and collects all messages.
pub fn tokenize<T, G, R>(grammar: G, source: R) -> Result<Vec<Message<T>>>
where
    T: Clone + 'static,
    G: FnOnce(&Builder<T>) -> Vec<Chain<T>>,
    R: Read,
{
    let mut messages = Vec::new();
    run(grammar, source, &mut messages)?;
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Discard, Quantifier, TxlexError};

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn digits(b: &Builder<char>) -> Vec<Chain<char>> {
        vec![
            b.check(|c| c.is_ascii_digit()).repeat(Quantifier::at_least(1)).emit('d'),
            b.rune(' ').omit(),
        ]
    }

    #[test]
    fn test_clean_end_of_stream() {
        init();
        let messages = tokenize(digits, "12 3".as_bytes()).unwrap();
        let values: Vec<_> = messages.iter().map(|m| m.text().into_owned()).collect();
        assert_eq!(values, vec!["12", "3"]);
        assert!(tokenize(digits, "".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_leftover_data() {
        init();
        let err = run(digits, "12 x".as_bytes(), &mut Discard).unwrap_err();
        assert!(matches!(err.kind(), TxlexErrorKind::LeftoverData { pos: 3 }));
    }

    #[test]
    fn test_receiver_rejection_aborts() {
        init();
        let mut count = 0;
        let mut receiver = crate::receiver::from_fn(|_m: Message<char>| {
            count += 1;
            Err(TxlexError::rejected("full"))
        });
        let err = run(digits, "1 2 3".as_bytes(), &mut receiver).unwrap_err();
        assert!(matches!(err.kind(), TxlexErrorKind::Rejected(_)));
        drop(receiver);
        assert_eq!(count, 1);
    }

    #[test]
    fn test_root_break_stops_run() {
        init();
        let mut lexer = Lexer::new(|b: &Builder<char>| {
            vec![
                b.rune(';').break_(),
                b.check(|c| c.is_ascii_digit()).emit('d'),
            ]
        });
        let mut messages = Vec::new();
        lexer.run("12;x".as_bytes(), &mut messages).unwrap();
        assert_eq!(messages.len(), 2);
    }

    #[test]
    fn test_history_is_recorded() {
        init();
        let mut lexer = Lexer::with_options(digits, LexerOptions::new().with_history_depth(1));
        lexer.run("1 2 3".as_bytes(), &mut Discard).unwrap();
        let last: Vec<_> = lexer.history().get().map(|m| m.text().into_owned()).collect();
        assert_eq!(last, vec!["3"]);
    }
}
