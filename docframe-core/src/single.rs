//! Single-shot readers and writers for opaque content

use crate::bounded::BoundedSource;
use crate::error::FrameError;
use crate::raw::{write_once, RawReader, RawWriter};
use crate::types::{Frame, FramingKind};
use crate::Result;
use std::io::{Read, Write};

/// Reads the whole source as one frame, then reports end of stream
#[derive(Debug)]
pub struct SingleReader<R> {
    kind: FramingKind,
    source: BoundedSource<R>,
    has_been_read: bool,
}

impl<R: Read + Send> SingleReader<R> {
    /// Create a reader that accepts at most `max_frame_size` bytes
    pub fn new(kind: FramingKind, source: R, max_frame_size: u64) -> Self {
        Self {
            kind,
            source: BoundedSource::new(source, max_frame_size),
            has_been_read: false,
        }
    }
}

impl<R: Read + Send> RawReader for SingleReader<R> {
    fn framing_kind(&self) -> &FramingKind {
        &self.kind
    }

    fn read_frame(&mut self) -> Result<Option<Frame>> {
        if self.has_been_read {
            return Ok(None);
        }
        self.has_been_read = true;

        let mut frame = Vec::new();
        self.source.read_to_end(&mut frame)?;
        Ok(Some(Frame::from(frame)))
    }
}

/// Writes exactly one frame verbatim; every later write fails with [`FrameError::Closed`]
#[derive(Debug)]
pub struct SingleWriter<W> {
    kind: FramingKind,
    sink: W,
    has_been_written: bool,
}

impl<W: Write + Send> SingleWriter<W> {
    /// Create a writer for one frame of `kind`
    pub fn new(kind: FramingKind, sink: W) -> Self {
        Self {
            kind,
            sink,
            has_been_written: false,
        }
    }

    /// Consume the writer, returning the sink
    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: Write + Send> RawWriter for SingleWriter<W> {
    fn framing_kind(&self) -> &FramingKind {
        &self.kind
    }

    fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        if self.has_been_written {
            return Err(FrameError::Closed);
        }
        self.has_been_written = true;
        write_once(&mut self.sink, frame)
    }

    fn close(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }
}
