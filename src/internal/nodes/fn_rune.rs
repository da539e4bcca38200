use crate::{Context, Node, NodeKind, Outcome, Result, Tx};

pub(crate) struct MatchFn(Box<dyn Fn(char) -> bool + 'static>);

impl MatchFn {
    pub(crate) fn new<F>(f: F) -> Self
    where
        F: Fn(char) -> bool + 'static,
    {
        MatchFn(Box::new(f))
    }

    #[inline]
    pub(crate) fn call(&self, c: char) -> bool {
        (self.0)(c)
    }
}

/// Matches one rune that satisfies the predicate.
pub(crate) struct RuneFn {
    pub(crate) match_fn: MatchFn,
}

impl RuneFn {
    pub(crate) fn new<F>(f: F) -> Self
    where
        F: Fn(char) -> bool + 'static,
    {
        RuneFn {
            match_fn: MatchFn::new(f),
        }
    }
}

impl<T> Node<T> for RuneFn {
    fn update(&self, _ctx: &mut Context<'_, T>, tx: &mut Tx<'_>) -> Result<Outcome> {
        match tx.next_rune()? {
            Some((c, _)) if self.match_fn.call(c) => Ok(Outcome::Next),
            Some(_) => {
                tx.unread();
                Ok(Outcome::Rollback)
            }
            None => Ok(Outcome::Rollback),
        }
    }
}

/// Checks the next rune without consuming it.
pub(crate) struct FollowedBy {
    match_fn: MatchFn,
    // Result expected from the predicate, false for a negative lookahead.
    expected: bool,
}

impl FollowedBy {
    pub(crate) fn new<F>(f: F, expected: bool) -> Self
    where
        F: Fn(char) -> bool + 'static,
    {
        FollowedBy {
            match_fn: MatchFn::new(f),
            expected,
        }
    }
}

impl<T> Node<T> for FollowedBy {
    fn update(&self, _ctx: &mut Context<'_, T>, tx: &mut Tx<'_>) -> Result<Outcome> {
        let matched = match tx.next_rune()? {
            Some((c, _)) => {
                tx.unread();
                self.match_fn.call(c) == self.expected
            }
            // Nothing follows at the end of the stream.
            None => !self.expected,
        };
        if matched {
            Ok(Outcome::Next)
        } else {
            Ok(Outcome::Rollback)
        }
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Lookahead
    }
}
