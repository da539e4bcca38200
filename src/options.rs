use crate::stream::DEFAULT_CHUNK_SIZE;

/// The configuration of a [`crate::Lexer`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LexerOptions {
    /// Number of recent messages visible through [`crate::Context::history`]. 0 disables the
    /// history.
    pub history_depth: usize,
    /// Maximum sub-grammar nesting level.
    pub max_depth: usize,
    /// Minimum number of bytes pulled from the source per fetch.
    pub chunk_size: usize,
    /// Capacity of the channel of a [`crate::MessageIter`].
    pub channel_capacity: usize,
}

impl Default for LexerOptions {
    fn default() -> Self {
        LexerOptions {
            history_depth: 0,
            max_depth: 64,
            chunk_size: DEFAULT_CHUNK_SIZE,
            channel_capacity: 16,
        }
    }
}

impl LexerOptions {
    /// Creates the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the history depth.
    pub fn with_history_depth(mut self, depth: usize) -> Self {
        self.history_depth = depth;
        self
    }

    /// Sets the maximum nesting level.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the fetch chunk size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Sets the capacity of the iterator channel.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = LexerOptions::new().with_history_depth(4);
        assert_eq!(options.history_depth, 4);
        assert_eq!(options.max_depth, 64);
        assert_eq!(options.chunk_size, 4096);
        assert_eq!(options.channel_capacity, 16);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_partial_config() {
        let options: LexerOptions = serde_json::from_str(r#"{ "max_depth": 8 }"#).unwrap();
        assert_eq!(options, LexerOptions::new().with_max_depth(8));
        let json = serde_json::to_string(&options).unwrap();
        assert_eq!(serde_json::from_str::<LexerOptions>(&json).unwrap(), options);
    }
}
