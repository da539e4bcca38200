use std::cell::OnceCell;

use log::debug;

use crate::{
    internal::alternation::{run_once, Step},
    Builder, BreakAction, Chain, Context, Node, NodeKind, Outcome, Result, Tx, TxlexErrorKind,
};

/// The type of a grammar function.
pub(crate) type GrammarFn<T> = dyn Fn(&Builder<T>) -> Vec<Chain<T>>;

/// Runs a nested grammar one level deeper over the same transaction.
///
/// The chains are built on first use, which allows a grammar to embed itself.
pub(crate) struct SubGrammar<T> {
    grammar: Box<GrammarFn<T>>,
    chains: OnceCell<Vec<Chain<T>>>,
    // Run as negative lookahead.
    negated: bool,
}

// How a nested run ended.
enum ScopeEnd {
    Matched,
    Failed,
}

impl<T> SubGrammar<T> {
    pub(crate) fn new<G>(grammar: G, negated: bool) -> Self
    where
        G: Fn(&Builder<T>) -> Vec<Chain<T>> + 'static,
    {
        SubGrammar {
            grammar: Box::new(grammar),
            chains: OnceCell::new(),
            negated,
        }
    }

    fn chains(&self) -> &[Chain<T>] {
        self.chains
            .get_or_init(|| (self.grammar)(&Builder::new()))
            .as_slice()
    }

    // Runs the alternation loop of the nested grammar until it breaks or gives up.
    fn scope(&self, ctx: &mut Context<'_, T>, scope: &mut Tx<'_>) -> Result<ScopeEnd> {
        let chains = self.chains();
        let mut nested = ctx.nested();
        debug!("Enter scope at level {} at {}", nested.level(), scope.offset());
        loop {
            match run_once(chains, &mut nested, &mut *scope)? {
                Step::Committed => {}
                Step::Break(BreakAction::Commit) => {
                    debug!("Leave scope at level {} at {}", nested.level(), scope.offset());
                    return Ok(ScopeEnd::Matched);
                }
                Step::Break(BreakAction::Rollback) => return Ok(ScopeEnd::Failed),
                Step::Exhausted { has_data: true } => return Ok(ScopeEnd::Failed),
                // An untouched scope at the end of the stream just does not follow.
                Step::Exhausted { has_data: false } if scope.consumed() == 0 => {
                    return Ok(ScopeEnd::Failed);
                }
                Step::Exhausted { has_data: false } => {
                    return Err(TxlexErrorKind::IncompleteGrammar {
                        level: nested.level(),
                        pos: scope.offset(),
                    }
                    .into());
                }
            }
        }
    }
}

impl<T> Node<T> for SubGrammar<T> {
    fn update(&self, ctx: &mut Context<'_, T>, tx: &mut Tx<'_>) -> Result<Outcome> {
        if ctx.level() >= ctx.max_depth() {
            return Err(TxlexErrorKind::DepthLimitExceeded {
                max: ctx.max_depth(),
            }
            .into());
        }
        if !self.negated && !tx.pending().is_empty() {
            fatal!(
                "invalid grammar: span {} is neither emitted nor omitted before the sub-grammar",
                tx.pending()
            );
        }
        let checkpoint = ctx.checkpoint();
        let mut scope = tx.begin();
        let end = match self.scope(ctx, &mut scope) {
            // Running out of input inside the scope means it does not follow.
            Err(e) if self.negated && e.is_incomplete() => ScopeEnd::Failed,
            end => end?,
        };
        let emitted = ctx.checkpoint() > checkpoint;

        if self.negated {
            let progress = emitted || scope.consumed() > 0;
            scope.rollback();
            ctx.rollback_to(checkpoint);
            return match end {
                ScopeEnd::Matched if progress => Ok(Outcome::Rollback),
                _ => Ok(Outcome::Next),
            };
        }

        // A scope without any message did not match.
        match end {
            ScopeEnd::Matched if emitted => {
                scope.commit();
                // The nested messages carry the scope's bytes already.
                tx.skip();
                Ok(Outcome::Commit)
            }
            _ => {
                scope.rollback();
                ctx.rollback_to(checkpoint);
                Ok(Outcome::Rollback)
            }
        }
    }

    fn kind(&self) -> NodeKind {
        if self.negated {
            NodeKind::Lookahead
        } else {
            NodeKind::SubGrammar
        }
    }
}
