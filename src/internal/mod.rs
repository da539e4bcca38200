/// Module that provides the alternation step of a grammar run.
pub(crate) mod alternation;

/// Module that provides the grammar node library.
pub(crate) mod nodes;
