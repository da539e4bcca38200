use std::{borrow::Cow, sync::Arc};

use crate::Span;

/// The error payload of an error message.
///
/// Grammar errors are shared, two errors compare equal if their descriptions are equal.
#[derive(Clone)]
pub struct GrammarError(Arc<dyn std::error::Error + Send + Sync>);

impl GrammarError {
    /// Creates a new grammar error.
    pub fn new<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        GrammarError(Arc::from(error.into()))
    }

    /// Access the wrapped error.
    pub fn inner(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.0.as_ref()
    }
}

impl std::fmt::Display for GrammarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Debug for GrammarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("GrammarError")
            .field(&self.0.to_string())
            .finish()
    }
}

impl PartialEq for GrammarError {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.to_string() == other.0.to_string()
    }
}

impl Eq for GrammarError {}

impl std::error::Error for GrammarError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for GrammarError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for GrammarError {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let description = String::deserialize(deserializer)?;
        Ok(GrammarError::new(description))
    }
}

/// The kind of a message.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageKind {
    /// A token recognized by the grammar.
    Token,
    /// A span the grammar classified as an error.
    Error,
}

/// What a message carries besides its bytes.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Payload<T> {
    /// The token type of a token message.
    Token(T),
    /// The error of an error message.
    Error(GrammarError),
}

/// A message emitted by a grammar.
///
/// The `level` is the nesting depth of the grammar scope that emitted the message. The root
/// grammar emits at level 0, every sub-grammar invocation adds one. This way a flat stream of
/// messages encodes the nesting of the input.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message<T> {
    level: usize,
    payload: Payload<T>,
    value: Vec<u8>,
    pos: usize,
}

impl<T> Message<T> {
    /// Creates a token message.
    pub fn token(level: usize, token: T, value: Vec<u8>, pos: usize) -> Self {
        Message {
            level,
            payload: Payload::Token(token),
            value,
            pos,
        }
    }

    /// Creates an error message.
    pub fn error(level: usize, error: GrammarError, value: Vec<u8>, pos: usize) -> Self {
        Message {
            level,
            payload: Payload::Error(error),
            value,
            pos,
        }
    }

    /// The nesting level at emission time.
    #[inline]
    pub fn level(&self) -> usize {
        self.level
    }

    /// The kind of the message.
    #[inline]
    pub fn kind(&self) -> MessageKind {
        match self.payload {
            Payload::Token(_) => MessageKind::Token,
            Payload::Error(_) => MessageKind::Error,
        }
    }

    /// The payload of the message.
    #[inline]
    pub fn payload(&self) -> &Payload<T> {
        &self.payload
    }

    /// The token type, `None` for error messages.
    #[inline]
    pub fn token_type(&self) -> Option<&T> {
        match &self.payload {
            Payload::Token(token) => Some(token),
            Payload::Error(_) => None,
        }
    }

    /// The grammar error, `None` for token messages.
    #[inline]
    pub fn grammar_error(&self) -> Option<&GrammarError> {
        match &self.payload {
            Payload::Token(_) => None,
            Payload::Error(error) => Some(error),
        }
    }

    /// The bytes of the span.
    #[inline]
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// The bytes of the span as text, malformed sequences are replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.value)
    }

    /// Consumes the message and returns its bytes.
    pub fn into_value(self) -> Vec<u8> {
        self.value
    }

    /// The absolute byte offset of the span.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// The byte width of the span.
    #[inline]
    pub fn width(&self) -> usize {
        self.value.len()
    }

    /// The span of the message.
    #[inline]
    pub fn span(&self) -> Span {
        Span::new(self.pos, self.pos + self.value.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_accessors() {
        let token = Message::token(1, 'n', b"42".to_vec(), 7);
        assert_eq!(token.kind(), MessageKind::Token);
        assert_eq!(token.token_type(), Some(&'n'));
        assert_eq!(token.span(), Span::new(7, 9));
        assert_eq!(token.width(), 2);
        assert_eq!(token.text(), "42");

        let error: Message<char> =
            Message::error(0, GrammarError::new("invalid number"), b"4x".to_vec(), 0);
        assert_eq!(error.kind(), MessageKind::Error);
        assert_eq!(error.token_type(), None);
        assert_eq!(
            error.grammar_error().map(|e| e.to_string()),
            Some("invalid number".to_string())
        );
    }

    #[test]
    fn test_grammar_error_equality() {
        assert_eq!(GrammarError::new("a"), GrammarError::new("a"));
        assert_ne!(GrammarError::new("a"), GrammarError::new("b"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_message_serialization() {
        let message: Message<u32> =
            Message::error(2, GrammarError::new("unterminated string"), b"\"ab".to_vec(), 3);
        let json = serde_json::to_string(&message).unwrap();
        let back: Message<u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(message, back);
        assert!(json.contains("unterminated string"));
    }
}
