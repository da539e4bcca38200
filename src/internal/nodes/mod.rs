/// Module that provides the byte literal node.
mod bytes;
pub(crate) use bytes::Literal;

/// Module that provides the break node.
mod brk;
pub(crate) use brk::Break;

/// Module that provides the flushing nodes.
mod emit;
pub(crate) use emit::{Emit, EmitError, Omit};

/// Module that provides the byte predicate node.
mod fn_byte;
pub(crate) use fn_byte::ByteFn;

/// Module that provides the rune predicate nodes.
mod fn_rune;
pub(crate) use fn_rune::{FollowedBy, RuneFn};

/// Module that provides the repeat node.
mod repeat;
pub(crate) use repeat::Repeat;

/// Module that provides the rest node.
mod rest;
pub(crate) use rest::Rest;

/// Module that provides the sub-grammar node.
mod sub_grammar;
pub(crate) use sub_grammar::SubGrammar;

/// Module that provides the tap node.
mod tap;
pub(crate) use tap::Tap;

/// Module that provides the until nodes.
mod until;
pub(crate) use until::{Until, UntilByte, UntilUnescaped};
