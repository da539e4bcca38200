use crate::{Context, Node, Outcome, Result, Tx};

/// Matches the first of a list of byte samples.
///
/// The input is probed once with the width of the longest sample, then the samples are compared
/// in priority order.
pub(crate) struct Literal {
    samples: Vec<Vec<u8>>,
    max_len: usize,
}

impl Literal {
    pub(crate) fn new(samples: Vec<Vec<u8>>) -> Self {
        if samples.is_empty() || samples.iter().any(|s| s.is_empty()) {
            fatal!("invalid grammar: literal samples must not be empty");
        }
        let max_len = samples.iter().map(Vec::len).max().unwrap_or_default();
        Literal { samples, max_len }
    }
}

impl<T> Node<T> for Literal {
    fn update(&self, _ctx: &mut Context<'_, T>, tx: &mut Tx<'_>) -> Result<Outcome> {
        let mut probe = vec![0u8; self.max_len];
        let n = tx.read(&mut probe)?;
        tx.unread();
        let probe = &probe[..n];
        match self.samples.iter().find(|s| probe.starts_with(s)) {
            Some(sample) => {
                let mut matched = vec![0u8; sample.len()];
                tx.read(&mut matched)?;
                Ok(Outcome::Next)
            }
            None => Ok(Outcome::Rollback),
        }
    }
}
