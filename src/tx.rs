//! Module with the transaction type.
//!
//! A [`Tx`] is a speculative read cursor over a [`crate::BufferedStream`]. Transactions nest as a
//! strict stack: [`Tx::begin`] mutably borrows the parent for as long as the child lives, so a
//! parent can neither read, resolve, nor open a second child while a child is open. Resolving
//! consumes the handle, which rules out reuse of a committed or rolled back transaction.
use log::trace;

use crate::{Result, Span};

/// Random access into the retained window of a stream.
pub(crate) trait Window {
    /// Copies bytes at the absolute position `pos` into `out`, returns the number copied.
    fn read_at(&mut self, pos: usize, out: &mut [u8]) -> Result<usize>;
    /// Returns how many of `n` bytes starting at `pos` are available.
    fn available_at(&mut self, pos: usize, n: usize) -> Result<usize>;
    /// Makes `offset` the committed offset and releases everything before it.
    fn advance(&mut self, offset: usize);
}

/// Anything a grammar can be run over: the stream itself or an open transaction.
pub trait Source {
    /// Starts a new child transaction at the current offset.
    fn begin(&mut self) -> Tx<'_>;

    /// Probes for at least one more byte without consuming it.
    fn has_data(&mut self) -> Result<bool>;

    /// The current absolute offset.
    fn offset(&self) -> usize;
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Cursor {
    offset: usize,
    last_read: usize,
}

/// A transaction over a buffered stream.
///
/// The transaction reads at its own offset. On [`Tx::commit`] the offset is handed to the parent
/// transaction, or for a root transaction to the stream which then releases the consumed bytes.
/// On [`Tx::rollback`] the advance is discarded. Only `commit` writes to the parent, so a
/// transaction that is dropped unresolved has the effect of a rollback.
pub struct Tx<'a> {
    stream: &'a mut dyn Window,
    parent: Option<&'a mut Cursor>,
    cursor: Cursor,
    // Offset at begin, used to compute the consumed byte count.
    origin: usize,
    // Start of the span not yet retrieved by `data`.
    mark: usize,
}

impl<'a> Tx<'a> {
    pub(crate) fn root(stream: &'a mut dyn Window, offset: usize) -> Self {
        trace!("Begin root transaction at {}", offset);
        Self::with_parent(stream, None, offset)
    }

    fn with_parent(
        stream: &'a mut dyn Window,
        parent: Option<&'a mut Cursor>,
        offset: usize,
    ) -> Self {
        Self {
            stream,
            parent,
            cursor: Cursor {
                offset,
                last_read: 0,
            },
            origin: offset,
            mark: offset,
        }
    }

    /// Starts a child transaction at the current offset.
    ///
    /// The child borrows this transaction mutably, so only one child can be alive at a time.
    pub fn begin(&mut self) -> Tx<'_> {
        let offset = self.cursor.offset;
        Tx::with_parent(&mut *self.stream, Some(&mut self.cursor), offset)
    }

    /// Reads bytes at the current offset into `out` and returns the number of bytes read.
    ///
    /// A count less than `out.len()` means that the end of the stream was reached.
    pub fn read(&mut self, out: &mut [u8]) -> Result<usize> {
        let n = self.stream.read_at(self.cursor.offset, out)?;
        self.cursor.offset += n;
        self.cursor.last_read = n;
        Ok(n)
    }

    /// Undoes the last read.
    ///
    /// Only one level of undo is supported; a second call without an intermediate read is a no-op.
    /// After a child transaction committed, `unread` undoes the child's whole advance.
    pub fn unread(&mut self) {
        self.cursor.offset -= self.cursor.last_read;
        self.cursor.last_read = 0;
    }

    /// Reads the next byte, `None` at the end of the stream.
    pub fn next_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        if self.read(&mut byte)? == 1 {
            Ok(Some(byte[0]))
        } else {
            Ok(None)
        }
    }

    /// Decodes the next UTF-8 encoded character and returns it together with its width.
    ///
    /// Returns `None` at the end of the stream. A malformed sequence decodes as
    /// [`char::REPLACEMENT_CHARACTER`] with a width of one byte, so scanning always makes progress.
    pub fn next_rune(&mut self) -> Result<Option<(char, usize)>> {
        let mut buf = [0u8; 4];
        let n = self.stream.read_at(self.cursor.offset, &mut buf)?;
        if n == 0 {
            self.cursor.last_read = 0;
            return Ok(None);
        }
        let (c, width) = decode_rune(&buf[..n]);
        self.cursor.offset += width;
        self.cursor.last_read = width;
        Ok(Some((c, width)))
    }

    /// Peeks whether at least one more byte is available.
    ///
    /// The undo state of the last read is preserved.
    pub fn has_data(&mut self) -> Result<bool> {
        Ok(self.stream.available_at(self.cursor.offset, 1)? == 1)
    }

    /// Returns the bytes consumed since the last call of `data` or [`Tx::skip`] and their start.
    ///
    /// The span start is advanced to the current offset.
    pub fn data(&mut self) -> Result<(Vec<u8>, usize)> {
        let pos = self.mark;
        let mut value = vec![0u8; self.cursor.offset - pos];
        let n = self.stream.read_at(pos, &mut value)?;
        value.truncate(n);
        self.mark = self.cursor.offset;
        Ok((value, pos))
    }

    /// The span consumed since the last call of [`Tx::data`] or [`Tx::skip`].
    #[inline]
    pub fn pending(&self) -> Span {
        Span::new(self.mark, self.cursor.offset)
    }

    /// Advances the span start to the current offset without copying the bytes.
    pub fn skip(&mut self) -> Span {
        let span = self.pending();
        self.mark = self.cursor.offset;
        span
    }

    /// The current absolute offset.
    #[inline]
    pub fn offset(&self) -> usize {
        self.cursor.offset
    }

    /// The absolute offset this transaction began at.
    #[inline]
    pub fn start(&self) -> usize {
        self.origin
    }

    /// Number of bytes consumed by this transaction so far.
    #[inline]
    pub fn consumed(&self) -> usize {
        self.cursor.offset - self.origin
    }

    /// Commits the transaction and returns the number of bytes it consumed.
    pub fn commit(mut self) -> usize {
        let consumed = self.consumed();
        match self.parent.take() {
            Some(parent) => {
                parent.offset = self.cursor.offset;
                parent.last_read = consumed;
            }
            None => self.stream.advance(self.cursor.offset),
        }
        trace!("Commit {} bytes at {}", consumed, self.cursor.offset);
        consumed
    }

    /// Rolls the transaction back, discarding its advance.
    pub fn rollback(self) {
        trace!("Rollback {} bytes at {}", self.consumed(), self.origin);
    }
}

impl Source for Tx<'_> {
    fn begin(&mut self) -> Tx<'_> {
        Tx::begin(self)
    }

    fn has_data(&mut self) -> Result<bool> {
        Tx::has_data(self)
    }

    fn offset(&self) -> usize {
        self.cursor.offset
    }
}

impl std::fmt::Debug for Tx<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tx")
            .field("origin", &self.origin)
            .field("mark", &self.mark)
            .field("offset", &self.cursor.offset)
            .field("root", &self.parent.is_none())
            .finish()
    }
}

/// Decodes the first character of `bytes` by probing prefixes of increasing length.
pub(crate) fn decode_rune(bytes: &[u8]) -> (char, usize) {
    for len in 1..=bytes.len().min(4) {
        match std::str::from_utf8(&bytes[..len]) {
            Ok(s) => {
                if let Some(c) = s.chars().next() {
                    return (c, len);
                }
            }
            // An incomplete sequence has no error length, try a longer prefix.
            Err(e) if e.error_len().is_none() => {}
            Err(_) => break,
        }
    }
    (char::REPLACEMENT_CHARACTER, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BufferedStream;

    #[test]
    fn test_rollback_restores_offset() {
        let mut stream = BufferedStream::new("abcdef".as_bytes());
        {
            let mut tx = stream.begin();
            let mut out = [0u8; 4];
            assert_eq!(tx.read(&mut out).unwrap(), 4);
            tx.rollback();
        }
        assert_eq!(stream.offset(), 0);
        assert_eq!(stream.pos(), 0);
        let mut tx = stream.begin();
        let mut out = [0u8; 6];
        assert_eq!(tx.read(&mut out).unwrap(), 6);
        assert_eq!(&out, b"abcdef");
    }

    #[test]
    fn test_drop_rolls_back() {
        let mut stream = BufferedStream::new("abc".as_bytes());
        {
            let mut tx = stream.begin();
            let _ = tx.next_byte().unwrap();
        }
        assert_eq!(stream.offset(), 0);
    }

    #[test]
    fn test_child_commit_is_like_direct_read() {
        let mut direct = BufferedStream::new("hello world".as_bytes());
        let mut tx = direct.begin();
        let mut out = [0u8; 5];
        tx.read(&mut out).unwrap();
        assert_eq!(tx.commit(), 5);

        let mut nested = BufferedStream::new("hello world".as_bytes());
        let mut tx = nested.begin();
        let mut child = tx.begin();
        let mut out = [0u8; 5];
        child.read(&mut out).unwrap();
        assert_eq!(child.commit(), 5);
        assert_eq!(tx.offset(), 5);
        assert_eq!(tx.data().unwrap(), (b"hello".to_vec(), 0));
        assert_eq!(tx.commit(), 5);

        assert_eq!(direct.offset(), nested.offset());
        assert_eq!(direct.pos(), nested.pos());
    }

    #[test]
    fn test_child_rollback_keeps_parent() {
        let mut stream = BufferedStream::new("xyz".as_bytes());
        let mut tx = stream.begin();
        assert_eq!(tx.next_byte().unwrap(), Some(b'x'));
        {
            let mut child = tx.begin();
            assert_eq!(child.next_byte().unwrap(), Some(b'y'));
            child.rollback();
        }
        assert_eq!(tx.offset(), 1);
        assert_eq!(tx.next_byte().unwrap(), Some(b'y'));
    }

    #[test]
    fn test_unread_one_level() {
        let mut stream = BufferedStream::new("ab".as_bytes());
        let mut tx = stream.begin();
        assert_eq!(tx.next_byte().unwrap(), Some(b'a'));
        assert_eq!(tx.next_byte().unwrap(), Some(b'b'));
        tx.unread();
        tx.unread();
        assert_eq!(tx.offset(), 1);
        assert_eq!(tx.next_byte().unwrap(), Some(b'b'));
        assert_eq!(tx.next_byte().unwrap(), None);
    }

    #[test]
    fn test_next_rune() {
        let mut stream = BufferedStream::new("aß€𝄞".as_bytes());
        let mut tx = stream.begin();
        assert_eq!(tx.next_rune().unwrap(), Some(('a', 1)));
        assert_eq!(tx.next_rune().unwrap(), Some(('ß', 2)));
        assert_eq!(tx.next_rune().unwrap(), Some(('€', 3)));
        assert_eq!(tx.next_rune().unwrap(), Some(('𝄞', 4)));
        assert_eq!(tx.next_rune().unwrap(), None);
    }

    #[test]
    fn test_next_rune_malformed() {
        let input: &[u8] = &[0xff, b'a', 0xe2, 0x82];
        let mut stream = BufferedStream::new(input);
        let mut tx = stream.begin();
        assert_eq!(tx.next_rune().unwrap(), Some((char::REPLACEMENT_CHARACTER, 1)));
        assert_eq!(tx.next_rune().unwrap(), Some(('a', 1)));
        // A truncated sequence at the end of the stream.
        assert_eq!(tx.next_rune().unwrap(), Some((char::REPLACEMENT_CHARACTER, 1)));
        assert_eq!(tx.next_rune().unwrap(), Some((char::REPLACEMENT_CHARACTER, 1)));
        assert_eq!(tx.next_rune().unwrap(), None);
    }

    #[test]
    fn test_data_advances_mark() {
        let mut stream = BufferedStream::new("key=value".as_bytes());
        let mut tx = stream.begin();
        let mut out = [0u8; 3];
        tx.read(&mut out).unwrap();
        assert_eq!(tx.data().unwrap(), (b"key".to_vec(), 0));
        assert_eq!(tx.next_byte().unwrap(), Some(b'='));
        assert_eq!(tx.skip(), Span::new(3, 4));
        let mut out = [0u8; 5];
        tx.read(&mut out).unwrap();
        assert_eq!(tx.pending(), Span::new(4, 9));
        assert_eq!(tx.data().unwrap(), (b"value".to_vec(), 4));
        assert!(!tx.has_data().unwrap());
    }

    #[test]
    fn test_has_data_keeps_unread() {
        let mut stream = BufferedStream::new("ab".as_bytes());
        let mut tx = stream.begin();
        tx.next_byte().unwrap();
        assert!(tx.has_data().unwrap());
        tx.unread();
        assert_eq!(tx.offset(), 0);
    }
}
