use thiserror::Error;

/// The result type for the `txlex` crate.
pub type Result<T> = std::result::Result<T, TxlexError>;

/// The error type for the `txlex` crate.
#[derive(Error, Debug)]
pub struct TxlexError {
    /// The source of the error.
    pub source: Box<TxlexErrorKind>,
}

impl TxlexError {
    /// Create a new `TxlexError`.
    pub fn new(kind: TxlexErrorKind) -> Self {
        TxlexError {
            source: Box::new(kind),
        }
    }

    /// Create the error a receiver returns to refuse a message and abort the run.
    pub fn rejected<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        TxlexError::new(TxlexErrorKind::Rejected(error.into()))
    }

    /// Access the kind of the error.
    #[inline]
    pub fn kind(&self) -> &TxlexErrorKind {
        &self.source
    }

    /// Returns true if the run ended inside an unterminated scope.
    pub fn is_incomplete(&self) -> bool {
        matches!(*self.source, TxlexErrorKind::IncompleteGrammar { .. })
    }

    /// Returns true if the root grammar could not match the remaining input.
    pub fn is_leftover(&self) -> bool {
        matches!(*self.source, TxlexErrorKind::LeftoverData { .. })
    }
}

impl std::fmt::Display for TxlexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// The error kind type.
#[derive(Error, Debug)]
pub enum TxlexErrorKind {
    /// A std::io error occurred while pulling bytes from the source.
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// A sub-grammar ran out of input before it reached its closing `Break`.
    #[error("Incomplete grammar: input ended inside a scope at level {level} (byte {pos})")]
    IncompleteGrammar {
        /// The nesting level of the unterminated scope.
        level: usize,
        /// The byte offset where the scope ran out of input.
        pos: usize,
    },

    /// No alternative of the root grammar matched, but input remains.
    #[error("Unparseable input at byte {pos}: no alternative matched")]
    LeftoverData {
        /// The byte offset of the first unmatched byte.
        pos: usize,
    },

    /// A sub-grammar invocation would exceed the configured maximum depth.
    #[error("Maximum grammar depth of {max} exceeded")]
    DepthLimitExceeded {
        /// The configured maximum depth.
        max: usize,
    },

    /// The message history was requested but is not enabled.
    #[error("Message history is disabled")]
    HistoryDisabled,

    /// A receiver refused a message.
    #[error("Receiver rejected message: {0}")]
    Rejected(Box<dyn std::error::Error + Send + Sync>),

    /// The consumer of a message iterator cancelled the run.
    #[error("Run cancelled")]
    Cancelled,
}

impl From<std::io::Error> for TxlexError {
    fn from(error: std::io::Error) -> Self {
        TxlexError::new(TxlexErrorKind::IoError(error))
    }
}

impl From<TxlexErrorKind> for TxlexError {
    fn from(kind: TxlexErrorKind) -> Self {
        TxlexError::new(kind)
    }
}
