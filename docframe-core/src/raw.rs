//! Low-level frame readers and writers
//!
//! A low-level reader or writer handles exactly one wire-correct frame per call.
//! It applies no locking, no size or count policy and no sanitization; those are
//! added by [`crate::FrameReader`] and [`crate::FrameWriter`].

use crate::constants::YAML_DOCUMENT_START;
use crate::error::FrameError;
use crate::types::{Frame, FramingKind};
use crate::Result;
use std::io::{self, Write};

/// Produces one frame per call from an underlying byte stream
pub trait RawReader: Send {
    /// Framing kind of the frames this reader produces
    fn framing_kind(&self) -> &FramingKind;

    /// Read the next frame, or `Ok(None)` at end of stream
    ///
    /// The frame is not sanitized and may be empty.
    fn read_frame(&mut self) -> Result<Option<Frame>>;

    /// Release the underlying stream
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Consumes one frame per call into an underlying byte stream
pub trait RawWriter: Send {
    /// Framing kind of the frames this writer accepts
    fn framing_kind(&self) -> &FramingKind;

    /// Encode and write a single frame
    fn write_frame(&mut self, frame: &[u8]) -> Result<()>;

    /// Flush and release the underlying stream
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

impl RawReader for Box<dyn RawReader> {
    fn framing_kind(&self) -> &FramingKind {
        (**self).framing_kind()
    }

    fn read_frame(&mut self) -> Result<Option<Frame>> {
        (**self).read_frame()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

impl RawWriter for Box<dyn RawWriter> {
    fn framing_kind(&self) -> &FramingKind {
        (**self).framing_kind()
    }

    fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        (**self).write_frame(frame)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

/// Reclassify a write that accepted fewer bytes than given, without an error, as a short write
pub fn check_short_write(written: usize, expected: usize) -> Result<()> {
    if written < expected {
        return Err(FrameError::ShortWrite { written, expected });
    }
    Ok(())
}

/// Write `data` with a single call to `sink`
pub(crate) fn write_once<W: Write + ?Sized>(sink: &mut W, data: &[u8]) -> Result<()> {
    let written = loop {
        match sink.write(data) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            other => break other?,
        }
    };
    check_short_write(written, data.len())
}

/// Reader that fails every call with a fixed error
#[derive(Debug)]
pub struct ErrReader {
    kind: FramingKind,
    error: FrameError,
}

impl ErrReader {
    /// Reader for a kind that has no multi-frame implementation
    pub fn unsupported(kind: FramingKind) -> Self {
        let error = FrameError::UnsupportedFramingKind(kind.clone());
        Self { kind, error }
    }
}

impl RawReader for ErrReader {
    fn framing_kind(&self) -> &FramingKind {
        &self.kind
    }

    fn read_frame(&mut self) -> Result<Option<Frame>> {
        Err(self.error.clone())
    }
}

/// Writer that fails every call with a fixed error
#[derive(Debug)]
pub struct ErrWriter {
    kind: FramingKind,
    error: FrameError,
}

impl ErrWriter {
    /// Writer for a kind that has no multi-frame implementation
    pub fn unsupported(kind: FramingKind) -> Self {
        let error = FrameError::UnsupportedFramingKind(kind.clone());
        Self { kind, error }
    }
}

impl RawWriter for ErrWriter {
    fn framing_kind(&self) -> &FramingKind {
        &self.kind
    }

    fn write_frame(&mut self, _frame: &[u8]) -> Result<()> {
        Err(self.error.clone())
    }
}

/// Writer that encodes each frame with its kind's framer
///
/// YAML frames are prefixed with `---\n`. JSON values are written as-is, so
/// consecutive values end up concatenated on the wire.
#[derive(Debug)]
pub struct DelegatingWriter<W> {
    kind: FramingKind,
    sink: W,
    scratch: Vec<u8>,
}

impl<W: Write + Send> DelegatingWriter<W> {
    /// Create a writer for `kind`, which should be YAML or JSON
    pub fn new(kind: FramingKind, sink: W) -> Self {
        Self {
            kind,
            sink,
            scratch: Vec::new(),
        }
    }

    /// Consume the writer, returning the sink
    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: Write + Send> RawWriter for DelegatingWriter<W> {
    fn framing_kind(&self) -> &FramingKind {
        &self.kind
    }

    fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        match self.kind {
            FramingKind::Yaml => {
                self.scratch.clear();
                self.scratch.reserve(YAML_DOCUMENT_START.len() + frame.len());
                self.scratch.extend_from_slice(YAML_DOCUMENT_START);
                self.scratch.extend_from_slice(frame);
                write_once(&mut self.sink, &self.scratch)
            }
            _ => write_once(&mut self.sink, frame),
        }
    }

    fn close(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }
}
