use crate::{Context, NodeKind, Outcome, Result, Tx};

/// A grammar node, the unit of matching logic in a [`crate::Chain`].
///
/// A node holds only its configuration. Every evaluation receives the transaction of the
/// alternative, consumes zero or more bytes from it and reports an [`Outcome`]. Errors are
/// reserved for I/O failures and receiver refusals, a mismatch is [`Outcome::Rollback`].
///
/// ```rust
/// use txlex::{Builder, Context, Node, Outcome, Result, Tx};
///
/// /// Matches a single ASCII hex digit.
/// struct HexDigit;
///
/// impl<T> Node<T> for HexDigit {
///     fn update(&self, _ctx: &mut Context<'_, T>, tx: &mut Tx<'_>) -> Result<Outcome> {
///         match tx.next_byte()? {
///             Some(b) if b.is_ascii_hexdigit() => Ok(Outcome::Next),
///             _ => Ok(Outcome::Rollback),
///         }
///     }
/// }
///
/// let b = Builder::<&str>::new();
/// let chain = b.node("HexDigit", HexDigit).repeat(1..).emit("hex");
/// assert_eq!(chain.len(), 3);
/// ```
pub trait Node<T> {
    /// Evaluates the node against the transaction.
    fn update(&self, ctx: &mut Context<'_, T>, tx: &mut Tx<'_>) -> Result<Outcome>;

    /// The kind of the node, used to validate the chain while it is built.
    fn kind(&self) -> NodeKind {
        NodeKind::Matcher
    }
}
