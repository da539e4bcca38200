//! Module with the chain type and its interpreter.
//!
//! A chain is one alternative of a grammar: a sequence of nodes that is walked left to right
//! against one transaction. The interpreter applies the outcome of every node:
//!
//! * [`Outcome::Next`] proceeds with the next node. At the end of the chain the alternative
//!   succeeds if an earlier node committed and nothing was consumed since, otherwise this is
//!   an invalid grammar.
//! * [`Outcome::Commit`] proceeds with the next node, at the end of the chain the alternative
//!   succeeds.
//! * [`Outcome::Rollback`] abandons the alternative.
//! * [`Outcome::Break`] ends the alternative and the enclosing grammar scope.
//! * [`Outcome::Repeat`] is produced by a repeat node and re-invokes the node before it.
//!
//! A node that is followed by a repeat node is always evaluated inside a child transaction, so
//! that a failed attempt can be undone without abandoning the whole alternative.
use std::borrow::Cow;

use log::trace;

use crate::{BreakAction, Context, Node, NodeKind, Outcome, Result, Tx};

pub(crate) struct Link<T> {
    pub(crate) name: Cow<'static, str>,
    pub(crate) kind: NodeKind,
    pub(crate) node: Box<dyn Node<T>>,
}

/// The result of walking a chain.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum ChainResult {
    Commit,
    Rollback,
    Break(BreakAction),
}

// The result of a single evaluation of a repeated node.
enum Attempt {
    Matched { consumed: usize, committed: bool },
    Failed,
    Break(BreakAction),
}

/// One alternative of a grammar, built with a [`crate::Builder`].
pub struct Chain<T> {
    name: Option<Cow<'static, str>>,
    links: Vec<Link<T>>,
}

impl<T> Chain<T> {
    pub(crate) fn new(name: Option<Cow<'static, str>>) -> Self {
        Chain {
            name,
            links: Vec::new(),
        }
    }

    /// The diagnostic name of the chain.
    ///
    /// An unnamed chain is named after its first node.
    pub fn name(&self) -> &str {
        match (&self.name, self.links.first()) {
            (Some(name), _) => name,
            (None, Some(first)) => &first.name,
            (None, None) => "",
        }
    }

    /// The number of nodes in the chain.
    #[inline]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns true if the chain has no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// The kinds of the nodes in chain order.
    pub fn kinds(&self) -> impl Iterator<Item = NodeKind> + '_ {
        self.links.iter().map(|l| l.kind)
    }

    /// Appends a node and checks the structural rules of a chain.
    pub(crate) fn append<N>(mut self, name: impl Into<Cow<'static, str>>, node: N) -> Self
    where
        N: Node<T> + 'static,
    {
        let name = name.into();
        let kind = node.kind();
        let previous = self.links.last().map(|l| (l.kind, l.name.clone()));
        match (previous, kind) {
            (Some((NodeKind::Break, _)), _) => {
                fatal!(
                    "invalid grammar: '{}' appended after break in chain '{}'",
                    name,
                    self.name()
                );
            }
            (None, NodeKind::Repeat(_)) => {
                fatal!(
                    "invalid grammar: repeat can't be the first node in chain '{}'",
                    self.name()
                );
            }
            (Some((prev, prev_name)), NodeKind::Repeat(_)) if !prev.is_repeatable() => {
                fatal!(
                    "invalid grammar: '{}' can't be repeated in chain '{}'",
                    prev_name,
                    self.name()
                );
            }
            (None, kind) if kind.is_flush() => {
                fatal!(
                    "invalid grammar: '{}' can't be the first node in chain '{}'",
                    name,
                    self.name()
                );
            }
            _ => {}
        }
        self.links.push(Link {
            name,
            kind,
            node: Box::new(node),
        });
        self
    }

    /// Walks the chain against the transaction of the alternative.
    pub(crate) fn run(&self, ctx: &mut Context<'_, T>, tx: &mut Tx<'_>) -> Result<ChainResult> {
        if self.links.is_empty() {
            fatal!("invalid grammar: chain '{}' is empty", self.name());
        }
        let mut index = 0;
        // A node of the chain flushed its span.
        let mut flushed = false;
        while let Some(link) = self.links.get(index) {
            let repeated = matches!(
                self.links.get(index + 1).map(|l| l.kind),
                Some(NodeKind::Repeat(_))
            );
            let (outcome, stride) = if repeated {
                (self.repeat_node(index, ctx, tx)?, 2)
            } else {
                (link.node.update(ctx, tx)?, 1)
            };
            trace!(
                "{}[{}] '{}' -> {:?} at {}",
                self.name(),
                index,
                link.name,
                outcome,
                tx.offset()
            );
            let last = index + stride >= self.links.len();
            flushed |= outcome == Outcome::Commit;
            match outcome {
                Outcome::Next if last && (!flushed || !tx.pending().is_empty()) => {
                    fatal!(
                        "invalid grammar: chain '{}' ends with '{}' that does not commit",
                        self.name(),
                        self.links[self.links.len() - 1].name
                    );
                }
                Outcome::Next | Outcome::Commit if !last => index += stride,
                Outcome::Next | Outcome::Commit => return Ok(ChainResult::Commit),
                Outcome::Rollback => return Ok(ChainResult::Rollback),
                Outcome::Break(action) => return Ok(ChainResult::Break(action)),
                Outcome::Repeat(_) => {
                    fatal!(
                        "invalid grammar: '{}' in chain '{}' repeats without a preceding node",
                        link.name,
                        self.name()
                    );
                }
            }
        }
        Ok(ChainResult::Commit)
    }

    // Evaluates the node at `index` greedily as often as the repeat node after it allows.
    fn repeat_node(
        &self,
        index: usize,
        ctx: &mut Context<'_, T>,
        tx: &mut Tx<'_>,
    ) -> Result<Outcome> {
        let link = &self.links[index];
        let mut count = 0;
        let mut committed = false;
        let mut progress = false;
        match Self::attempt(link, ctx, tx)? {
            Attempt::Matched {
                consumed,
                committed: c,
            } => {
                count = 1;
                committed = c;
                progress = consumed > 0;
            }
            Attempt::Failed => {}
            Attempt::Break(action) => return Ok(Outcome::Break(action)),
        }

        let repeat = &self.links[index + 1];
        let quantifier = match repeat.node.update(ctx, tx)? {
            Outcome::Repeat(quantifier) => quantifier,
            other => {
                fatal!(
                    "invalid grammar: repeat node '{}' returned {:?}",
                    repeat.name,
                    other
                );
            }
        };

        // A match without progress would match forever.
        while progress && quantifier.wants_more(count) {
            match Self::attempt(link, ctx, tx)? {
                Attempt::Matched {
                    consumed,
                    committed: c,
                } => {
                    count += 1;
                    committed |= c;
                    progress = consumed > 0;
                }
                Attempt::Failed => break,
                Attempt::Break(action) => return Ok(Outcome::Break(action)),
            }
        }

        trace!(
            "{}[{}] '{}' matched {} times for {}",
            self.name(),
            index,
            link.name,
            count,
            quantifier
        );
        if !quantifier.contains(count) {
            Ok(Outcome::Rollback)
        } else if committed {
            Ok(Outcome::Commit)
        } else {
            Ok(Outcome::Next)
        }
    }

    fn attempt(link: &Link<T>, ctx: &mut Context<'_, T>, tx: &mut Tx<'_>) -> Result<Attempt> {
        let checkpoint = ctx.checkpoint();
        let mut child = tx.begin();
        match link.node.update(ctx, &mut child)? {
            outcome @ (Outcome::Next | Outcome::Commit) => {
                let consumed = child.commit();
                let committed = outcome == Outcome::Commit;
                if committed {
                    // The node flushed its span, it must not be emitted again.
                    tx.skip();
                }
                Ok(Attempt::Matched {
                    consumed,
                    committed,
                })
            }
            Outcome::Rollback => {
                child.rollback();
                ctx.rollback_to(checkpoint);
                Ok(Attempt::Failed)
            }
            Outcome::Break(action) => {
                match action {
                    BreakAction::Commit => {
                        child.commit();
                    }
                    BreakAction::Rollback => {
                        child.rollback();
                        ctx.rollback_to(checkpoint);
                    }
                }
                Ok(Attempt::Break(action))
            }
            Outcome::Repeat(_) => {
                fatal!(
                    "invalid grammar: repeated node '{}' returned a repeat outcome",
                    link.name
                );
            }
        }
    }
}

impl<T> std::fmt::Debug for Chain<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chain")
            .field("name", &self.name())
            .field("nodes", &self.links.iter().map(|l| &l.name).collect::<Vec<_>>())
            .finish()
    }
}
