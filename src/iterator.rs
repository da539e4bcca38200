//! Module with the pull style message iterator.
//!
//! The lexer runs on a dedicated worker thread and sends every committed message through a
//! bounded channel. The consumer pulls the messages one by one in emission order. Cancellation is
//! cooperative: the worker checks the flag whenever it delivers the next message.
use std::{
    io::Read,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
};

use crossbeam::channel::{self, Receiver as ChannelReceiver, Sender};
use log::debug;

use crate::{Builder, Chain, Lexer, LexerOptions, Message, Receiver, Result, TxlexErrorKind};

// Forwards messages to the consumer side of the channel.
struct ChannelSink<T> {
    sender: Sender<Message<T>>,
    cancel: Arc<AtomicBool>,
}

impl<T> Receiver<T> for ChannelSink<T> {
    fn receive(&mut self, message: Message<T>) -> Result<()> {
        if self.cancel.load(Ordering::Acquire) {
            return Err(TxlexErrorKind::Cancelled.into());
        }
        // A disconnected channel means the consumer is gone.
        self.sender
            .send(message)
            .map_err(|_| TxlexErrorKind::Cancelled.into())
    }
}

/// An iterator over the messages of a lexer running on a worker thread.
///
/// ```rust
/// use txlex::{Builder, LexerOptions, MessageIter};
///
/// let iter = MessageIter::spawn(
///     "a bc".as_bytes(),
///     |b: &Builder<u8>| {
///         vec![
///             b.check(|c| c.is_alphabetic()).repeat(1..).emit(0),
///             b.rune(' ').omit(),
///         ]
///     },
///     LexerOptions::default(),
/// )
/// .unwrap();
/// let values: Vec<String> = iter.map(|m| m.text().into_owned()).collect();
/// assert_eq!(values, vec!["a", "bc"]);
/// ```
pub struct MessageIter<T> {
    receiver: ChannelReceiver<Message<T>>,
    cancel: Arc<AtomicBool>,
    worker: Option<JoinHandle<Result<()>>>,
}

impl<T: Clone + Send + 'static> MessageIter<T> {
    /// Starts the worker thread that runs `grammar` over `source`.
    ///
    /// The grammar is built on the worker thread, so the chains don't need to be `Send`.
    pub fn spawn<R, G>(source: R, grammar: G, options: LexerOptions) -> Result<Self>
    where
        R: Read + Send + 'static,
        G: FnOnce(&Builder<T>) -> Vec<Chain<T>> + Send + 'static,
    {
        let (sender, receiver) = channel::bounded(options.channel_capacity);
        let cancel = Arc::new(AtomicBool::new(false));
        let mut sink = ChannelSink {
            sender,
            cancel: Arc::clone(&cancel),
        };
        let worker = thread::Builder::new()
            .name("txlex-worker".to_string())
            .spawn(move || {
                let mut lexer = Lexer::with_options(grammar, options);
                let result = lexer.run(source, &mut sink);
                debug!("Worker finished: {:?}", result.as_ref().map(|_| ()));
                result
            })?;
        Ok(MessageIter {
            receiver,
            cancel,
            worker: Some(worker),
        })
    }
}

impl<T> MessageIter<T> {
    /// Asks the worker to stop at its next emission.
    ///
    /// Messages already in the channel can still be pulled.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Release);
    }

    /// Returns true if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }

    /// Discards the messages not yet pulled, waits for the worker and returns its result.
    ///
    /// A panic of the worker is resumed on the calling thread.
    pub fn finish(mut self) -> Result<()> {
        while self.receiver.recv().is_ok() {}
        match self.worker.take().map(JoinHandle::join) {
            Some(Ok(result)) => result,
            Some(Err(panic)) => std::panic::resume_unwind(panic),
            None => Ok(()),
        }
    }
}

impl<T> Iterator for MessageIter<T> {
    type Item = Message<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.receiver.recv().ok()
    }
}

impl<T> Drop for MessageIter<T> {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            self.cancel();
            // Unblock a worker waiting on a full channel.
            while self.receiver.try_recv().is_ok() {}
            self.receiver = channel::never();
            let _ = worker.join();
        }
    }
}

impl<T> std::fmt::Debug for MessageIter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageIter")
            .field("pending", &self.receiver.len())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
