//! The alternation step shared by the root grammar and every sub-grammar.
use log::debug;

use crate::{chain::ChainResult, BreakAction, Chain, Context, Result, Source};

/// The result of one pass over the alternatives of a grammar.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum Step {
    /// An alternative matched and committed.
    Committed,
    /// An alternative reached a break node.
    Break(BreakAction),
    /// No alternative matched.
    Exhausted {
        /// Input remains after the failed attempt.
        has_data: bool,
    },
}

/// Tries the alternatives in order until one of them commits or breaks.
///
/// Every alternative runs in a fresh child transaction of `source`. A failed alternative is
/// rolled back together with the messages it left pending.
pub(crate) fn run_once<T>(
    chains: &[Chain<T>],
    ctx: &mut Context<'_, T>,
    source: &mut dyn Source,
) -> Result<Step> {
    for chain in chains {
        let checkpoint = ctx.checkpoint();
        let mut tx = source.begin();
        match chain.run(ctx, &mut tx)? {
            ChainResult::Commit => {
                let consumed = tx.commit();
                if consumed == 0 {
                    fatal!(
                        "invalid grammar: chain '{}' committed without consuming input",
                        chain.name()
                    );
                }
                debug!(
                    "Level {}: '{}' committed {} bytes",
                    ctx.level(),
                    chain.name(),
                    consumed
                );
                return Ok(Step::Committed);
            }
            ChainResult::Rollback => {
                tx.rollback();
                ctx.rollback_to(checkpoint);
            }
            ChainResult::Break(action) => {
                match action {
                    BreakAction::Commit => {
                        tx.commit();
                    }
                    BreakAction::Rollback => {
                        tx.rollback();
                        ctx.rollback_to(checkpoint);
                    }
                }
                debug!(
                    "Level {}: '{}' breaks with {:?}",
                    ctx.level(),
                    chain.name(),
                    action
                );
                return Ok(Step::Break(action));
            }
        }
    }
    let has_data = source.has_data()?;
    debug!(
        "Level {}: no alternative matched at {}, has data: {}",
        ctx.level(),
        source.offset(),
        has_data
    );
    Ok(Step::Exhausted { has_data })
}
