//! Incremental JSON value framing

use crate::bounded::BoundedSource;
use crate::constants::JSON_INITIAL_WINDOW;
use crate::error::FrameError;
use crate::raw::RawReader;
use crate::types::{Frame, FramingKind};
use crate::Result;
use bytes::{Buf, BufMut, BytesMut};
use memchr::memchr2;
use std::io::{self, Read};

#[cfg(feature = "logging")]
use tracing::{debug, trace};

fn is_json_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// Outcome of scanning the buffered bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    /// A value ends at this offset
    Complete(usize),
    /// More input is needed
    Incomplete,
}

/// Finds the end of one top-level JSON value without parsing it
///
/// The scanner is resumable: `pos` is where scanning continues once more bytes
/// are available. Leading whitespace must be removed before scanning starts.
#[derive(Debug, Default)]
struct JsonScanner {
    pos: usize,
    depth: usize,
    in_string: bool,
    escaped: bool,
    started: bool,
    scalar: bool,
}

impl JsonScanner {
    fn reset(&mut self) {
        *self = Self::default();
    }

    /// Forget the first `consumed` bytes of the buffer
    fn rebase(&mut self, consumed: usize) {
        self.pos -= consumed;
    }

    fn scan(&mut self, buf: &[u8]) -> Result<Scan> {
        while self.pos < buf.len() {
            if self.in_string {
                if self.escaped {
                    self.escaped = false;
                    self.pos += 1;
                    continue;
                }
                match memchr2(b'"', b'\\', &buf[self.pos..]) {
                    None => {
                        self.pos = buf.len();
                        return Ok(Scan::Incomplete);
                    }
                    Some(offset) => {
                        let byte = buf[self.pos + offset];
                        self.pos += offset + 1;
                        if byte == b'\\' {
                            self.escaped = true;
                        } else {
                            self.in_string = false;
                            if self.depth == 0 {
                                return Ok(Scan::Complete(self.pos));
                            }
                        }
                    }
                }
                continue;
            }

            let byte = buf[self.pos];
            if self.scalar {
                if is_json_space(byte) || b"{}[]\",:".contains(&byte) {
                    self.scalar = false;
                    return Ok(Scan::Complete(self.pos));
                }
                self.pos += 1;
                continue;
            }

            match byte {
                b'{' | b'[' => self.depth += 1,
                b'}' | b']' => {
                    if self.depth == 0 {
                        return Err(unexpected(byte));
                    }
                    self.depth -= 1;
                    if self.depth == 0 {
                        self.pos += 1;
                        return Ok(Scan::Complete(self.pos));
                    }
                }
                b'"' => self.in_string = true,
                b',' | b':' if self.depth == 0 => return Err(unexpected(byte)),
                _ if self.depth == 0 => self.scalar = true,
                _ => {}
            }
            self.started = true;
            self.pos += 1;
        }
        Ok(Scan::Incomplete)
    }

    /// Whether the value can end at end of stream
    fn completes_at_eof(&self) -> bool {
        self.scalar
    }
}

fn unexpected(byte: u8) -> FrameError {
    FrameError::InvalidFrame(format!(
        "unexpected {:?} outside of a JSON value",
        byte as char
    ))
}

/// Reads one complete top-level JSON value per call
///
/// Bytes are pulled from a [`BoundedSource`] into a window that starts at
/// `min(max_frame_size, 1024)` bytes and doubles while a partial value fills it.
/// A value longer than `max_frame_size` fails with [`FrameError::SizeOverflow`]
/// and puts the reader into draining mode: the next call first discards the rest
/// of that value. Whitespace between values does not count against the limit.
#[derive(Debug)]
pub struct JsonReader<R> {
    kind: FramingKind,
    source: BoundedSource<R>,
    pending: BytesMut,
    scanner: JsonScanner,
    window: usize,
    max_frame_size: u64,
    draining: bool,
    eof: bool,
}

impl<R: Read + Send> JsonReader<R> {
    /// Create a reader over `source`
    pub fn new(source: R, max_frame_size: u64) -> Self {
        let max = usize::try_from(max_frame_size).unwrap_or(usize::MAX);
        Self {
            kind: FramingKind::Json,
            source: BoundedSource::new(source, max_frame_size),
            pending: BytesMut::new(),
            scanner: JsonScanner::default(),
            window: max.min(JSON_INITIAL_WINDOW).max(1),
            max_frame_size,
            draining: false,
            eof: false,
        }
    }

    /// Largest number of buffered bytes a partial value may occupy, plus one
    /// byte of lookahead to tell a value at the limit from one past it.
    fn window_cap(&self) -> usize {
        usize::try_from(self.max_frame_size)
            .unwrap_or(usize::MAX)
            .saturating_add(1)
    }

    fn skip_leading_space(&mut self) {
        if self.scanner.started {
            return;
        }
        let skip = self
            .pending
            .iter()
            .position(|&b| !is_json_space(b))
            .unwrap_or(self.pending.len());
        self.pending.advance(skip);
        self.source.discount(skip as u64);
    }

    /// Pull more bytes into the window; returns false at end of stream
    ///
    /// When the source overflows, the byte it peeked past the limit is moved into
    /// the window instead, so the scanner decides whether the value really ends
    /// beyond `max_frame_size`.
    fn fill(&mut self) -> Result<bool> {
        if self.pending.len() >= self.window {
            self.window = self.window.saturating_mul(2).min(self.window_cap());
        }
        let start = self.pending.len();
        let want = self.window.saturating_sub(start).max(1);
        self.pending.resize(start + want, 0);

        let read = loop {
            match self.source.read(&mut self.pending[start..]) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                other => break other,
            }
        };
        match read {
            Ok(n) => {
                self.pending.truncate(start + n);
                if n == 0 {
                    self.eof = true;
                }
                Ok(n > 0)
            }
            Err(e) => {
                self.pending.truncate(start);
                match FrameError::from(e) {
                    FrameError::SizeOverflow(max) => {
                        let byte = self
                            .source
                            .take_peeked()
                            .ok_or(FrameError::SizeOverflow(max))?;
                        self.pending.put_u8(byte);
                        Ok(true)
                    }
                    other => Err(other),
                }
            }
        }
    }

    /// Discard everything scanned so far of an oversized value
    fn drain_scanned(&mut self) {
        let consumed = self.scanner.pos;
        self.pending.advance(consumed);
        self.scanner.rebase(consumed);
        self.source.reset();
    }

    fn end_of_stream(&mut self) -> Result<Option<Frame>> {
        if self.scanner.completes_at_eof() && !self.draining {
            let end = self.pending.len();
            return self.finish_value(end);
        }
        if !self.scanner.started || self.draining {
            #[cfg(feature = "logging")]
            trace!("End of JSON stream");
            self.pending.clear();
            self.scanner.reset();
            self.draining = false;
            return Ok(None);
        }
        Err(FrameError::InvalidFrame(
            "unexpected end of stream inside a JSON value".to_string(),
        ))
    }

    fn finish_value(&mut self, end: usize) -> Result<Option<Frame>> {
        let value = self.pending.split_to(end).freeze();
        self.scanner.reset();
        self.source.reset();
        if value.len() as u64 > self.max_frame_size {
            return Err(FrameError::SizeOverflow(self.max_frame_size));
        }
        Ok(Some(value))
    }
}

impl<R: Read + Send> RawReader for JsonReader<R> {
    fn framing_kind(&self) -> &FramingKind {
        &self.kind
    }

    fn read_frame(&mut self) -> Result<Option<Frame>> {
        loop {
            self.skip_leading_space();

            if let Scan::Complete(end) = self.scanner.scan(&self.pending)? {
                if self.draining {
                    #[cfg(feature = "logging")]
                    debug!("Discarded the rest of an oversized JSON value");
                    self.pending.advance(end);
                    self.scanner.reset();
                    self.source.reset();
                    self.draining = false;
                    continue;
                }
                return self.finish_value(end);
            }

            if self.draining {
                self.drain_scanned();
            } else if self.pending.len() as u64 > self.max_frame_size {
                self.draining = true;
                return Err(FrameError::SizeOverflow(self.max_frame_size));
            }

            if self.eof || !self.fill()? {
                return self.end_of_stream();
            }
        }
    }
}
