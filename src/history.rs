use std::collections::VecDeque;

use log::trace;

use crate::Message;

/// A bounded ring of the most recently committed messages.
#[derive(Debug, Clone)]
pub struct History<T> {
    depth: usize,
    messages: VecDeque<Message<T>>,
}

impl<T> History<T> {
    /// Creates a history that keeps the last `depth` messages.
    pub fn new(depth: usize) -> Self {
        History {
            depth,
            messages: VecDeque::with_capacity(depth),
        }
    }

    /// The number of messages the history keeps.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns true if the history keeps no messages at all.
    #[inline]
    pub fn is_disabled(&self) -> bool {
        self.depth == 0
    }

    /// Records a committed message, evicting the oldest one if the ring is full.
    pub fn push(&mut self, message: Message<T>) {
        if self.depth == 0 {
            return;
        }
        if self.messages.len() == self.depth {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
        trace!("History holds {} messages", self.messages.len());
    }

    /// The recorded messages, most recent last.
    pub fn get(&self) -> impl DoubleEndedIterator<Item = &Message<T>> + ExactSizeIterator {
        self.messages.iter()
    }

    /// Number of recorded messages.
    #[inline]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if no message is recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Forgets all recorded messages.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_evicts_oldest() {
        let mut history = History::new(2);
        for (i, b) in b"abc".iter().enumerate() {
            history.push(Message::token(0, *b, vec![*b], i));
        }
        let tokens: Vec<u8> = history.get().filter_map(|m| m.token_type().copied()).collect();
        assert_eq!(tokens, b"bc");
    }

    #[test]
    fn test_disabled_history_stays_empty() {
        let mut history = History::new(0);
        history.push(Message::token(0, (), vec![b'x'], 0));
        assert!(history.is_disabled());
        assert!(history.is_empty());
    }
}
