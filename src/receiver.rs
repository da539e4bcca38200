use crate::{Message, Result};

/// The sink of the committed messages of a run.
///
/// A receiver may refuse a message by returning an error, which aborts the run immediately with
/// that error. Use [`crate::TxlexError::rejected`] to wrap an own error type.
pub trait Receiver<T> {
    /// Receives one committed message.
    fn receive(&mut self, message: Message<T>) -> Result<()>;
}

/// A receiver that collects all messages.
impl<T> Receiver<T> for Vec<Message<T>> {
    fn receive(&mut self, message: Message<T>) -> Result<()> {
        self.push(message);
        Ok(())
    }
}

impl<T, R> Receiver<T> for &mut R
where
    R: Receiver<T> + ?Sized,
{
    fn receive(&mut self, message: Message<T>) -> Result<()> {
        (**self).receive(message)
    }
}

/// A receiver that drops all messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl<T> Receiver<T> for Discard {
    fn receive(&mut self, _message: Message<T>) -> Result<()> {
        Ok(())
    }
}

/// A receiver that forwards every message to a closure.
pub struct FnReceiver<F>(F);

impl<T, F> Receiver<T> for FnReceiver<F>
where
    F: FnMut(Message<T>) -> Result<()>,
{
    fn receive(&mut self, message: Message<T>) -> Result<()> {
        (self.0)(message)
    }
}

impl<F> std::fmt::Debug for FnReceiver<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnReceiver")
    }
}

/// Creates a receiver from a closure.
pub fn from_fn<T, F>(f: F) -> FnReceiver<F>
where
    F: FnMut(Message<T>) -> Result<()>,
{
    FnReceiver(f)
}
