use std::io::{ErrorKind, Read};

use crate::types::{Result, ScanError, BUFFER_SIZE};

/// A fixed-capacity window over an incrementally decompressing byte
/// stream. `pos..len` is the unread region; everything before `pos` has
/// been handed out already and is dead weight until the next refill
/// compacts it away.
///
/// The two mutators are `ensure_available` (refill) and `take` (cursor
/// advance); the invariant `pos <= len <= BUFFER_SIZE` holds between any
/// two calls.
pub struct RecordBuffer<R: Read> {
    inner: R,
    buf: [u8; BUFFER_SIZE],
    len: usize,
    pos: usize,
}

impl<R: Read> RecordBuffer<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: [0u8; BUFFER_SIZE],
            len: 0,
            pos: 0,
        }
    }

    /// Unread bytes currently held.
    pub fn available(&self) -> usize {
        self.len - self.pos
    }

    /// Make at least `needed` unread bytes available, refilling from the
    /// inner stream if necessary. Refilling moves the unread tail to the
    /// front of the window and pulls decompressed bytes into the free
    /// space behind it until the request is satisfied.
    ///
    /// `Ok(false)` means the stream ended with fewer than `needed` bytes
    /// left. The remainder stays readable through `available`, which is
    /// how callers tell clean end-of-stream from a truncated trailing
    /// record.
    pub fn ensure_available(&mut self, needed: usize) -> Result<bool> {
        assert!(
            needed <= BUFFER_SIZE,
            "cannot make {} bytes available in a {} byte window",
            needed,
            BUFFER_SIZE
        );
        while self.available() < needed {
            if self.pos > 0 {
                self.buf.copy_within(self.pos..self.len, 0);
                self.len -= self.pos;
                self.pos = 0;
            }
            match self.inner.read(&mut self.buf[self.len..]) {
                Ok(0) => return Ok(false),
                Ok(n) => self.len += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(ScanError::from_read(e)),
            }
        }
        Ok(true)
    }

    /// Hand out the next `n` unread bytes and advance past them. Callers
    /// must have secured the bytes with `ensure_available` first; asking
    /// for more than `available` is a contract violation, not a data
    /// condition.
    pub fn take(&mut self, n: usize) -> &[u8] {
        assert!(
            n <= self.available(),
            "buffer underflow: {} bytes requested, {} available",
            n,
            self.available()
        );
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        out
    }
}
