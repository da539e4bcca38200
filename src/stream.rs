//! Module with the buffered byte stream.
//!
//! The [`BufferedStream`] owns a forward-only byte source and keeps a sliding window of the bytes
//! that are still reachable by an open transaction. The window starts at `pos`, the absolute
//! offset of its first byte, and grows at its end whenever a transaction reads beyond the bytes
//! fetched so far. A commit of a root transaction moves the committed `offset` forward and drops
//! every byte before it, so the retained memory only depends on the distance between the oldest
//! open transaction and the growing edge of the stream, never on the total input size.

use std::io::{ErrorKind, Read};

use log::trace;

use crate::{tx::Window, Result, Source, Tx};

/// The default minimum number of bytes requested from the source per fetch.
pub(crate) const DEFAULT_CHUNK_SIZE: usize = 4096;

/// A buffered reader over a forward-only byte source that supports nested transactions.
///
/// Use [`Source::begin`] to open the root transaction. Only one root transaction can be alive at
/// a time, which is enforced by the borrow checker.
pub struct BufferedStream<'r> {
    source: Box<dyn Read + 'r>,
    // The retained window, buffer[0] is the byte at absolute offset `pos`.
    buffer: Vec<u8>,
    // Absolute offset of the first retained byte.
    pos: usize,
    // Offset consumed by committed root transactions.
    offset: usize,
    // The source reported its end.
    eof: bool,
    chunk_size: usize,
}

impl<'r> BufferedStream<'r> {
    /// Creates a new buffered stream over the given source.
    pub fn new<R>(source: R) -> Self
    where
        R: Read + 'r,
    {
        Self::with_chunk_size(source, DEFAULT_CHUNK_SIZE)
    }

    /// Creates a new buffered stream that pulls at least `chunk_size` bytes per fetch.
    pub fn with_chunk_size<R>(source: R, chunk_size: usize) -> Self
    where
        R: Read + 'r,
    {
        Self {
            source: Box::new(source),
            buffer: Vec::new(),
            pos: 0,
            offset: 0,
            eof: false,
            chunk_size: chunk_size.max(1),
        }
    }

    /// The absolute offset of the earliest byte still retained.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// The absolute offset consumed by committed transactions.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The number of bytes currently held in the window.
    #[inline]
    pub fn retained(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true once the source reported its end.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.eof
    }

    // Absolute offset right after the last buffered byte.
    #[inline]
    fn edge(&self) -> usize {
        self.pos + self.buffer.len()
    }

    /// Ensures that at least `n` bytes counted from `offset` are buffered.
    ///
    /// Returns the number of bytes available from `offset`, capped at `n`. A count less than `n`
    /// signals the end of the stream, which is not an error.
    pub fn fetch(&mut self, n: usize) -> Result<usize> {
        self.fetch_at(self.offset, n)
    }

    /// Like [`BufferedStream::fetch`] but counted from an arbitrary position inside the window.
    pub(crate) fn fetch_at(&mut self, pos: usize, n: usize) -> Result<usize> {
        if pos < self.pos {
            fatal!(
                "out of bounds: position {} is before the retained window at {}",
                pos,
                self.pos
            );
        }
        let end = pos.saturating_add(n);
        self.fill_to(end)?;
        Ok(self.edge().min(end).saturating_sub(pos))
    }

    // Pulls bytes from the source until the window reaches `end` or the source is exhausted.
    fn fill_to(&mut self, end: usize) -> Result<()> {
        while self.edge() < end && !self.eof {
            let want = (end - self.edge()).max(self.chunk_size);
            let old_len = self.buffer.len();
            self.buffer.resize(old_len + want, 0);
            let result = self.source.read(&mut self.buffer[old_len..]);
            match result {
                Ok(0) => {
                    self.buffer.truncate(old_len);
                    self.eof = true;
                    trace!("Source exhausted at {}", self.edge());
                }
                Ok(read) => {
                    self.buffer.truncate(old_len + read);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {
                    self.buffer.truncate(old_len);
                }
                Err(e) => {
                    self.buffer.truncate(old_len);
                    return Err(e.into());
                }
            }
        }
        Ok(())
    }

    /// Copies bytes starting at the absolute position `pos` into `out`.
    ///
    /// Fetches from the source as needed. Returns the number of bytes copied; a count less than
    /// `out.len()` means the end of the stream was reached.
    ///
    /// # Panics
    /// Panics if `pos` lies before the retained window. This indicates broken transaction
    /// nesting, not a recoverable condition.
    pub fn read_at(&mut self, pos: usize, out: &mut [u8]) -> Result<usize> {
        let available = self.fetch_at(pos, out.len())?;
        let start = pos - self.pos;
        out[..available].copy_from_slice(&self.buffer[start..start + available]);
        Ok(available)
    }

    /// Moves the committed offset forward.
    pub fn update(&mut self, offset: usize) {
        if offset < self.offset {
            fatal!(
                "committed offset can not move backwards: {} < {}",
                offset,
                self.offset
            );
        }
        self.offset = offset;
    }

    /// Drops all retained bytes before `pos`.
    ///
    /// # Panics
    /// Panics if `pos` is beyond the committed offset, that would discard bytes an open
    /// transaction may still roll back to.
    pub fn truncate(&mut self, pos: usize) {
        if pos <= self.pos {
            return;
        }
        if pos > self.offset {
            fatal!(
                "out of bounds: can not truncate at {} beyond committed offset {}",
                pos,
                self.offset
            );
        }
        let dropped = (pos - self.pos).min(self.buffer.len());
        self.buffer.drain(..dropped);
        // Keep the allocation proportional to what is still reachable.
        let keep = self.buffer.len().max(self.chunk_size);
        if self.buffer.capacity() > keep * 2 {
            self.buffer.shrink_to(keep);
        }
        self.pos = pos;
        trace!(
            "Truncated window to {}, retained {} bytes",
            self.pos,
            self.buffer.len()
        );
    }
}

impl Window for BufferedStream<'_> {
    fn read_at(&mut self, pos: usize, out: &mut [u8]) -> Result<usize> {
        BufferedStream::read_at(self, pos, out)
    }

    fn available_at(&mut self, pos: usize, n: usize) -> Result<usize> {
        self.fetch_at(pos, n)
    }

    fn advance(&mut self, offset: usize) {
        self.update(offset);
        self.truncate(offset);
    }
}

impl Source for BufferedStream<'_> {
    fn begin(&mut self) -> Tx<'_> {
        let offset = self.offset;
        Tx::root(self, offset)
    }

    fn has_data(&mut self) -> Result<bool> {
        Ok(self.fetch(1)? == 1)
    }

    fn offset(&self) -> usize {
        self.offset
    }
}

impl std::fmt::Debug for BufferedStream<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferedStream")
            .field("pos", &self.pos)
            .field("offset", &self.offset)
            .field("retained", &self.buffer.len())
            .field("eof", &self.eof)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A source that hands out at most `step` bytes per read call.
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn test_fetch_reports_partial_count_at_end() {
        let mut stream = BufferedStream::new("abc".as_bytes());
        assert_eq!(stream.fetch(2).unwrap(), 2);
        assert_eq!(stream.fetch(10).unwrap(), 3);
        assert!(stream.is_exhausted());
    }

    #[test]
    fn test_read_at_slow_source() {
        let mut stream = BufferedStream::with_chunk_size(
            Trickle {
                data: b"hello world",
                step: 2,
            },
            1,
        );
        let mut out = [0u8; 5];
        assert_eq!(stream.read_at(6, &mut out).unwrap(), 5);
        assert_eq!(&out, b"world");
        let mut out = [0u8; 4];
        assert_eq!(stream.read_at(9, &mut out).unwrap(), 2);
        assert_eq!(&out[..2], b"ld");
    }

    #[test]
    fn test_truncate_drops_committed_bytes() {
        let mut stream = BufferedStream::new("0123456789".as_bytes());
        assert_eq!(stream.fetch(10).unwrap(), 10);
        stream.update(4);
        stream.truncate(4);
        assert_eq!(stream.pos(), 4);
        assert_eq!(stream.retained(), 6);
        let mut out = [0u8; 3];
        assert_eq!(stream.read_at(4, &mut out).unwrap(), 3);
        assert_eq!(&out, b"456");
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_read_before_window_panics() {
        let mut stream = BufferedStream::new("0123456789".as_bytes());
        stream.fetch(10).unwrap();
        stream.update(5);
        stream.truncate(5);
        let mut out = [0u8; 1];
        let _ = stream.read_at(2, &mut out);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_truncate_beyond_offset_panics() {
        let mut stream = BufferedStream::new("0123456789".as_bytes());
        stream.fetch(10).unwrap();
        stream.truncate(3);
    }

    #[test]
    fn test_retained_window_is_bounded() {
        let input = vec![b'x'; 100_000];
        let mut stream = BufferedStream::with_chunk_size(input.as_slice(), 64);
        let mut max_retained = 0;
        loop {
            let mut tx = stream.begin();
            let mut byte = [0u8; 1];
            if tx.read(&mut byte).unwrap() == 0 {
                tx.rollback();
                break;
            }
            tx.commit();
            max_retained = max_retained.max(stream.retained());
        }
        assert_eq!(stream.offset(), 100_000);
        assert!(max_retained <= 64, "retained {} bytes", max_retained);
    }
}
