use crate::{Context, Node, Outcome, Result, Tx};

/// Matches one byte that satisfies the predicate.
pub(crate) struct ByteFn(Box<dyn Fn(u8) -> bool + 'static>);

impl ByteFn {
    pub(crate) fn new<F>(f: F) -> Self
    where
        F: Fn(u8) -> bool + 'static,
    {
        ByteFn(Box::new(f))
    }
}

impl<T> Node<T> for ByteFn {
    fn update(&self, _ctx: &mut Context<'_, T>, tx: &mut Tx<'_>) -> Result<Outcome> {
        match tx.next_byte()? {
            Some(b) if (self.0)(b) => Ok(Outcome::Next),
            Some(_) => {
                tx.unread();
                Ok(Outcome::Rollback)
            }
            None => Ok(Outcome::Rollback),
        }
    }
}
