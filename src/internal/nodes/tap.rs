use crate::{Context, Node, NodeKind, Outcome, Result, Tx};

/// The callback type of a tap node.
pub(crate) type TapFn<T> = dyn Fn(&Context<'_, T>, &mut Tx<'_>) -> Result<Outcome>;

/// Calls a user callback that decides the outcome.
pub(crate) struct Tap<T> {
    callback: Box<TapFn<T>>,
}

impl<T> Tap<T> {
    pub(crate) fn new<F>(callback: F) -> Self
    where
        F: Fn(&Context<'_, T>, &mut Tx<'_>) -> Result<Outcome> + 'static,
    {
        Tap {
            callback: Box::new(callback),
        }
    }
}

impl<T> Node<T> for Tap<T> {
    fn update(&self, ctx: &mut Context<'_, T>, tx: &mut Tx<'_>) -> Result<Outcome> {
        (self.callback)(ctx, tx)
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Tap
    }
}
