use crate::Quantifier;

/// What a break node does with the consumption of the alternative that reached it.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, Default)]
pub enum BreakAction {
    /// Keep the consumed bytes and the pending messages.
    #[default]
    Commit,
    /// Discard the consumed bytes and the pending messages.
    Rollback,
}

/// The control outcome of one grammar node evaluation.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub enum Outcome {
    /// Matched, continue with the next node of the chain.
    Next,
    /// Matched and flushed. At the end of a chain the alternative's transaction commits and the
    /// grammar restarts with its first alternative.
    Commit,
    /// Did not match, abandon the alternative and try the next one.
    Rollback,
    /// Stop the current grammar scope now.
    Break(BreakAction),
    /// Re-invoke the previous node within the given bounds.
    Repeat(Quantifier),
}

impl Outcome {
    /// Returns true if the outcome counts as a match of the node that produced it.
    #[inline]
    pub fn is_match(&self) -> bool {
        matches!(self, Outcome::Next | Outcome::Commit)
    }
}

/// How the interpreter treats a node while the chain is built and walked.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub enum NodeKind {
    /// A node that consumes input and may be repeated.
    Matcher,
    /// A node that repeats the node before it.
    Repeat(Quantifier),
    /// Flushes the pending span as a token.
    Emit,
    /// Flushes the pending span without a message.
    Omit,
    /// Flushes the pending span as an error.
    Error,
    /// A user callback.
    Tap,
    /// A nested grammar.
    SubGrammar,
    /// Ends the current scope, always the last node of a chain.
    Break,
    /// Consumes the remaining input.
    Rest,
    /// Inspects input without consuming it.
    Lookahead,
}

impl NodeKind {
    /// Returns true if a `repeat` may follow a node of this kind.
    pub fn is_repeatable(&self) -> bool {
        matches!(self, NodeKind::Matcher | NodeKind::SubGrammar)
    }

    /// Returns true if a node of this kind flushes the pending span and thus needs a predecessor
    /// that consumed it.
    pub fn is_flush(&self) -> bool {
        matches!(self, NodeKind::Emit | NodeKind::Omit | NodeKind::Error)
    }
}
