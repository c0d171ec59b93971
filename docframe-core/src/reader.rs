//! Thread-safe, bounded frame reader

use crate::constants::TOTAL_ATTEMPTS_FACTOR;
use crate::error::FrameError;
use crate::options::FrameOptions;
use crate::raw::RawReader;
use crate::resource::ClosableResource;
use crate::types::{Frame, FramingKind};
use crate::Result;
use parking_lot::Mutex;

#[cfg(feature = "logging")]
use tracing::{debug, trace};

struct ReaderState {
    resource: ClosableResource<Box<dyn RawReader>>,
    successful_frames: u64,
    total_attempts: u64,
}

/// Reads sanitized, non-empty frames from a low-level reader
///
/// Every call is serialized through an internal mutex, so a `FrameReader` can be
/// shared between threads. On top of the low-level reader it:
/// - enforces `max_frames` successful frames and `10 × max_frames` low-level reads,
/// - runs the configured sanitizer and skips frames that sanitize to nothing,
/// - closes itself after an error or end of stream when `close_on_error` is set.
///
/// End of stream is reported as `Ok(None)`.
pub struct FrameReader {
    kind: FramingKind,
    options: FrameOptions,
    state: Mutex<ReaderState>,
}

impl FrameReader {
    /// Wrap `raw`; `owned` decides whether closing also closes the underlying stream
    pub fn new(raw: Box<dyn RawReader>, options: FrameOptions, owned: bool) -> Self {
        let kind = raw.framing_kind().clone();
        let resource = ClosableResource::new(raw, owned, options.close_on_error);
        Self {
            kind,
            options,
            state: Mutex::new(ReaderState {
                resource,
                successful_frames: 0,
                total_attempts: 0,
            }),
        }
    }

    /// Framing kind of the frames this reader returns
    pub fn framing_kind(&self) -> &FramingKind {
        &self.kind
    }

    /// Options this reader was created with
    pub fn options(&self) -> &FrameOptions {
        &self.options
    }

    /// Read the next non-empty frame, or `Ok(None)` at end of stream
    pub fn read_frame(&self) -> Result<Option<Frame>> {
        let mut guard = self.state.lock();
        let ReaderState {
            resource,
            successful_frames,
            total_attempts,
        } = &mut *guard;

        let kind = &self.kind;
        let max_frames = self.options.max_frames;
        let max_attempts = max_frames.saturating_mul(TOTAL_ATTEMPTS_FACTOR);
        let sanitizer = &self.options.sanitizer;

        resource.access(|raw| {
            if *successful_frames > max_frames {
                return Err(FrameError::CountOverflow(max_frames));
            }

            loop {
                if *total_attempts >= max_attempts {
                    return Err(FrameError::CountOverflow(max_frames));
                }
                let next = raw.read_frame();
                *total_attempts += 1;

                let frame = match next? {
                    Some(frame) => frame,
                    None => {
                        #[cfg(feature = "logging")]
                        trace!("End of stream: kind={}", kind);
                        return Ok(None);
                    }
                };

                let frame = sanitizer.sanitize(kind, frame)?;
                if frame.is_empty() {
                    #[cfg(feature = "logging")]
                    trace!("Skipped empty frame: kind={}", kind);
                    continue;
                }

                *successful_frames += 1;
                if *successful_frames > max_frames {
                    return Err(FrameError::CountOverflow(max_frames));
                }

                #[cfg(feature = "logging")]
                debug!("Read frame: kind={}, frame_bytes={}", kind, frame.len());
                return Ok(Some(frame));
            }
        })
    }

    /// Close the reader; closing again is a no-op
    pub fn close(&self) -> Result<()> {
        self.state.lock().resource.close()
    }

    /// Whether the reader has been closed, explicitly or after an error
    pub fn is_closed(&self) -> bool {
        self.state.lock().resource.is_closed()
    }

    /// Iterate over the remaining frames
    ///
    /// The iterator ends at end of stream or after yielding the first error.
    pub fn frames(&self) -> Frames<'_> {
        Frames {
            reader: self,
            done: false,
        }
    }
}

impl std::fmt::Debug for FrameReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameReader")
            .field("kind", &self.kind)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Iterator returned by [`FrameReader::frames`]
#[derive(Debug)]
pub struct Frames<'a> {
    reader: &'a FrameReader,
    done: bool,
}

impl Iterator for Frames<'_> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read_frame() {
            Ok(Some(frame)) => Some(Ok(frame)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
