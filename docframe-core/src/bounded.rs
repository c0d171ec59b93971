//! Per-frame byte budget for the read side

use crate::error::FrameError;
use std::io::{self, Read};

/// A reader that fails once more than `max_bytes` have been read since the last reset
///
/// The byte counter spans any number of `read` calls and is only reset by the
/// owning frame reader once it has confirmed a complete, in-bounds frame. When the
/// counter sits exactly at the limit, one extra byte is read into a pending slot to
/// tell a frame that ends at the limit apart from one that overflows it. Overflow is
/// sticky until [`BoundedSource::reset`].
///
/// Overflow is reported as an [`io::Error`] wrapping [`FrameError::SizeOverflow`];
/// converting it with `FrameError::from` recovers the original error.
///
/// Not thread-safe; the high-level reader serializes access.
#[derive(Debug)]
pub struct BoundedSource<R> {
    inner: R,
    max_bytes: u64,
    frame_bytes: u64,
    pending: Option<u8>,
}

impl<R: Read> BoundedSource<R> {
    /// Wrap `inner`, allowing at most `max_bytes` per frame
    pub fn new(inner: R, max_bytes: u64) -> Self {
        Self {
            inner,
            max_bytes,
            frame_bytes: 0,
            pending: None,
        }
    }

    /// Start counting the next frame from zero
    pub fn reset(&mut self) {
        self.frame_bytes = 0;
        self.pending = None;
    }

    /// Hand back the byte peeked past the limit, if an overflow left one behind
    ///
    /// The byte stays counted, so the source keeps reporting overflow until
    /// it is reset or enough bytes are discounted.
    pub fn take_peeked(&mut self) -> Option<u8> {
        self.pending.take()
    }

    /// Stop counting `n` bytes already delivered, when the caller dropped them
    /// as padding between frames
    pub fn discount(&mut self, n: u64) {
        self.frame_bytes = self.frame_bytes.saturating_sub(n);
    }

    /// Bytes read since the last reset, including a peeked byte
    pub fn frame_bytes(&self) -> u64 {
        self.frame_bytes
    }

    /// The configured per-frame limit
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Consume the wrapper, returning the underlying source
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn overflow(&self) -> io::Error {
        FrameError::SizeOverflow(self.max_bytes).into()
    }
}

impl<R: Read> Read for BoundedSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.frame_bytes > self.max_bytes {
            return Err(self.overflow());
        }

        if self.frame_bytes == self.max_bytes {
            // Peek one byte to learn whether the frame continues past the limit.
            let mut peek = [0u8; 1];
            let n = self.inner.read(&mut peek)?;
            if n == 0 {
                return Ok(0);
            }
            self.pending = Some(peek[0]);
            self.frame_bytes += 1;
            return Err(self.overflow());
        }

        let bytes_left = self.max_bytes - self.frame_bytes;
        let limit = usize::try_from(bytes_left).map_or(buf.len(), |left| left.min(buf.len()));
        let buf = &mut buf[..limit];
        if buf.is_empty() {
            return Ok(0);
        }

        // A pending byte has already been counted in frame_bytes.
        let mut drained = 0;
        if let Some(byte) = self.pending.take() {
            buf[0] = byte;
            drained = 1;
        }

        let n = self.inner.read(&mut buf[drained..])?;
        self.frame_bytes += n as u64;
        Ok(drained + n)
    }
}
