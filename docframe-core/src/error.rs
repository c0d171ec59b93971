//! Error types for framing operations

use crate::types::FramingKind;
use std::io;

/// Errors that can occur while reading or writing frames
///
/// End of stream is not an error: readers report it as `Ok(None)`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// A single frame exceeded the configured maximum size
    #[error("frame was larger than maximum allowed size {0} bytes")]
    SizeOverflow(u64),

    /// The successful-frame limit or the total-attempt limit was reached
    #[error("the maximum amount of frames have been processed: {0}")]
    CountOverflow(u64),

    /// No low-level reader or writer exists for this kind and more than one frame was requested
    #[error("unsupported framing kind: {0:?}")]
    UnsupportedFramingKind(FramingKind),

    /// The sink accepted fewer bytes than the frame without reporting an error
    #[error("short write: {written} of {expected} bytes written")]
    ShortWrite {
        /// Bytes the sink reported as written
        written: usize,
        /// Length of the encoded frame
        expected: usize,
    },

    /// The reader or writer has been closed, explicitly or after an error
    #[error("frame reader or writer is closed")]
    Closed,

    /// The stream does not contain a well-formed frame
    #[error("invalid frame: {0}")]
    InvalidFrame(String),

    /// Any other failure of the underlying stream
    #[error("IO error: {message}")]
    Io {
        /// Kind reported by the stream
        kind: io::ErrorKind,
        /// Rendered error message
        message: String,
    },

    /// An operation failed and closing the resource afterwards failed as well
    #[error("{error} (closing afterwards failed: {close})")]
    CloseFailed {
        /// The error returned by the operation
        error: Box<FrameError>,
        /// The error returned by the close that it triggered
        close: Box<FrameError>,
    },
}

impl FrameError {
    /// The error that caused the operation to fail, looking through
    /// [`FrameError::CloseFailed`].
    pub fn cause(&self) -> &FrameError {
        match self {
            FrameError::CloseFailed { error, .. } => error.cause(),
            other => other,
        }
    }

    /// Whether the cause is a frame size or frame count overflow
    pub fn is_overflow(&self) -> bool {
        matches!(
            self.cause(),
            FrameError::SizeOverflow(_) | FrameError::CountOverflow(_)
        )
    }

    pub(crate) fn into_io(self) -> io::Error {
        let kind = match &self {
            FrameError::Closed => io::ErrorKind::BrokenPipe,
            FrameError::ShortWrite { .. } => io::ErrorKind::WriteZero,
            FrameError::InvalidFrame(_) => io::ErrorKind::InvalidData,
            FrameError::Io { kind, .. } => *kind,
            _ => io::ErrorKind::Other,
        };
        io::Error::new(kind, self)
    }
}

impl From<io::Error> for FrameError {
    fn from(err: io::Error) -> Self {
        // Errors raised inside this crate travel through io::Read as the inner error.
        if err.get_ref().is_some_and(|inner| inner.is::<FrameError>()) {
            if let Some(Ok(inner)) = err.into_inner().map(|inner| inner.downcast::<FrameError>()) {
                return *inner;
            }
            return FrameError::Io {
                kind: io::ErrorKind::Other,
                message: "unrecoverable wrapped frame error".to_string(),
            };
        }
        FrameError::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<FrameError> for io::Error {
    fn from(err: FrameError) -> Self {
        err.into_io()
    }
}
