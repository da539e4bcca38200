use crate::{History, Message, Result, TxlexErrorKind};

/// The execution context handed to every node evaluation.
///
/// It carries the nesting level, the depth limit, the pending messages of the current root
/// alternative and read access to the committed history.
pub struct Context<'c, T> {
    level: usize,
    max_depth: usize,
    history: &'c History<T>,
    pending: &'c mut Vec<Message<T>>,
}

impl<'c, T> Context<'c, T> {
    pub(crate) fn new(
        history: &'c History<T>,
        pending: &'c mut Vec<Message<T>>,
        max_depth: usize,
    ) -> Self {
        Context {
            level: 0,
            max_depth,
            history,
            pending,
        }
    }

    /// Creates the context of a sub-grammar one level deeper.
    pub(crate) fn nested(&mut self) -> Context<'_, T> {
        Context {
            level: self.level + 1,
            max_depth: self.max_depth,
            history: self.history,
            pending: &mut *self.pending,
        }
    }

    /// The current nesting level, 0 for the root grammar.
    #[inline]
    pub fn level(&self) -> usize {
        self.level
    }

    /// The maximum nesting level.
    #[inline]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns the last messages, most recent last.
    ///
    /// The committed history is followed by the messages still pending within the current
    /// alternative. At most `history_depth` messages are returned.
    ///
    /// Returns [`TxlexErrorKind::HistoryDisabled`] if the history depth is 0.
    pub fn history(&self) -> Result<Vec<&Message<T>>> {
        if self.history.is_disabled() {
            return Err(TxlexErrorKind::HistoryDisabled.into());
        }
        let depth = self.history.depth();
        let total = self.history.len() + self.pending.len();
        Ok(self
            .history
            .get()
            .chain(self.pending.iter())
            .skip(total.saturating_sub(depth))
            .collect())
    }

    /// The most recent message, if history is enabled and any message exists.
    pub fn last(&self) -> Result<Option<&Message<T>>> {
        if self.history.is_disabled() {
            return Err(TxlexErrorKind::HistoryDisabled.into());
        }
        Ok(self.pending.last().or_else(|| self.history.get().next_back()))
    }

    #[inline]
    pub(crate) fn checkpoint(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn rollback_to(&mut self, checkpoint: usize) {
        self.pending.truncate(checkpoint);
    }

    pub(crate) fn push(&mut self, message: Message<T>) {
        self.pending.push(message);
    }
}

impl<T> std::fmt::Debug for Context<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("level", &self.level)
            .field("max_depth", &self.max_depth)
            .field("pending", &self.pending.len())
            .finish()
    }
}
