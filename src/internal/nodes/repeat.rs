use crate::{Context, Node, NodeKind, Outcome, Quantifier, Result, Tx};

/// Repeats the node before it within the bounds of the quantifier.
///
/// The node itself only reports its quantifier, the chain interpreter performs the repetition.
pub(crate) struct Repeat {
    quantifier: Quantifier,
}

impl Repeat {
    pub(crate) fn new(quantifier: Quantifier) -> Self {
        Repeat { quantifier }
    }
}

impl<T> Node<T> for Repeat {
    fn update(&self, _ctx: &mut Context<'_, T>, _tx: &mut Tx<'_>) -> Result<Outcome> {
        Ok(Outcome::Repeat(self.quantifier))
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Repeat(self.quantifier)
    }
}
