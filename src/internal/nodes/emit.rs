use log::trace;

use crate::{Context, GrammarError, Message, Node, NodeKind, Outcome, Result, Tx};

/// Flushes the pending span as a token message.
pub(crate) struct Emit<T> {
    token: Box<dyn Fn(&[u8]) -> T + 'static>,
}

impl<T> Emit<T> {
    pub(crate) fn new<F>(token: F) -> Self
    where
        F: Fn(&[u8]) -> T + 'static,
    {
        Emit {
            token: Box::new(token),
        }
    }
}

impl<T> Node<T> for Emit<T> {
    fn update(&self, ctx: &mut Context<'_, T>, tx: &mut Tx<'_>) -> Result<Outcome> {
        if tx.pending().is_empty() {
            fatal!("invalid grammar: nothing to emit at {}", tx.offset());
        }
        let (value, pos) = tx.data()?;
        let token = (self.token)(&value);
        trace!("Emit token at {} with {} bytes", pos, value.len());
        let level = ctx.level();
        ctx.push(Message::token(level, token, value, pos));
        Ok(Outcome::Commit)
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Emit
    }
}

/// Flushes the pending span without a message.
pub(crate) struct Omit;

impl<T> Node<T> for Omit {
    fn update(&self, _ctx: &mut Context<'_, T>, tx: &mut Tx<'_>) -> Result<Outcome> {
        if tx.pending().is_empty() {
            fatal!("invalid grammar: nothing to omit at {}", tx.offset());
        }
        let span = tx.skip();
        trace!("Omit {}", span);
        Ok(Outcome::Commit)
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Omit
    }
}

/// Flushes the pending span as an error message.
///
/// An empty span rolls back, so that a longer alternative can win instead.
pub(crate) struct EmitError {
    error: GrammarError,
}

impl EmitError {
    pub(crate) fn new(error: GrammarError) -> Self {
        EmitError { error }
    }
}

impl<T> Node<T> for EmitError {
    fn update(&self, ctx: &mut Context<'_, T>, tx: &mut Tx<'_>) -> Result<Outcome> {
        if tx.pending().is_empty() {
            return Ok(Outcome::Rollback);
        }
        let (value, pos) = tx.data()?;
        trace!("Emit error '{}' at {}", self.error, pos);
        let level = ctx.level();
        ctx.push(Message::error(level, self.error.clone(), value, pos));
        Ok(Outcome::Commit)
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BufferedStream, History, MessageKind, Source};

    #[test]
    fn test_emit_takes_pending_span() {
        let history = History::new(0);
        let mut pending = Vec::new();
        let mut ctx = Context::new(&history, &mut pending, 1);
        let mut stream = BufferedStream::new("ab".as_bytes());
        let mut tx = stream.begin();
        tx.next_byte().unwrap();
        let emit = Emit::new(|v: &[u8]| v[0]);
        assert_eq!(emit.update(&mut ctx, &mut tx).unwrap(), Outcome::Commit);
        tx.next_byte().unwrap();
        let error = EmitError::new(GrammarError::new("unexpected"));
        assert_eq!(error.update(&mut ctx, &mut tx).unwrap(), Outcome::Commit);
        assert_eq!(error.update(&mut ctx, &mut tx).unwrap(), Outcome::Rollback);
        drop(ctx);
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].token_type(), Some(&b'a'));
        assert_eq!(pending[1].kind(), MessageKind::Error);
        assert_eq!(pending[1].span(), crate::Span::new(1, 2));
    }

    #[test]
    #[should_panic(expected = "nothing to emit")]
    fn test_emit_empty_span_panics() {
        let history = History::new(0);
        let mut pending = Vec::new();
        let mut ctx = Context::new(&history, &mut pending, 1);
        let mut stream = BufferedStream::new("ab".as_bytes());
        let mut tx = stream.begin();
        let _ = Emit::new(|_: &[u8]| ()).update(&mut ctx, &mut tx);
    }

    #[test]
    #[should_panic(expected = "nothing to omit")]
    fn test_omit_empty_span_panics() {
        let history: History<()> = History::new(0);
        let mut pending = Vec::new();
        let mut ctx = Context::new(&history, &mut pending, 1);
        let mut stream = BufferedStream::new("".as_bytes());
        let mut tx = stream.begin();
        let _ = Omit.update(&mut ctx, &mut tx);
    }
}
