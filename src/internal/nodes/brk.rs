use crate::{BreakAction, Context, Node, NodeKind, Outcome, Result, Tx};

/// Ends the current grammar scope.
pub(crate) struct Break {
    action: BreakAction,
}

impl Break {
    pub(crate) fn new(action: BreakAction) -> Self {
        Break { action }
    }
}

impl<T> Node<T> for Break {
    fn update(&self, _ctx: &mut Context<'_, T>, tx: &mut Tx<'_>) -> Result<Outcome> {
        if self.action == BreakAction::Commit {
            // The closing span is consumed silently.
            tx.skip();
        }
        Ok(Outcome::Break(self.action))
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Break
    }
}
