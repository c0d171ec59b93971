//! Thread-safe, bounded frame writer

use crate::error::FrameError;
use crate::options::FrameOptions;
use crate::raw::RawWriter;
use crate::resource::ClosableResource;
use crate::types::{Frame, FramingKind};
use crate::Result;
use parking_lot::Mutex;

#[cfg(feature = "logging")]
use tracing::{debug, trace};

struct WriterState {
    resource: ClosableResource<Box<dyn RawWriter>>,
    written_frames: u64,
}

/// Writes sanitized, non-empty frames through a low-level writer
///
/// A frame larger than `max_frame_size` is rejected before anything is written.
/// Frames that sanitize to nothing are accepted without being written or counted.
pub struct FrameWriter {
    kind: FramingKind,
    options: FrameOptions,
    state: Mutex<WriterState>,
}

impl FrameWriter {
    /// Wrap `raw`; `owned` decides whether closing also flushes and closes the underlying stream
    pub fn new(raw: Box<dyn RawWriter>, options: FrameOptions, owned: bool) -> Self {
        let kind = raw.framing_kind().clone();
        let resource = ClosableResource::new(raw, owned, options.close_on_error);
        Self {
            kind,
            options,
            state: Mutex::new(WriterState {
                resource,
                written_frames: 0,
            }),
        }
    }

    /// Framing kind of the frames this writer accepts
    pub fn framing_kind(&self) -> &FramingKind {
        &self.kind
    }

    /// Options this writer was created with
    pub fn options(&self) -> &FrameOptions {
        &self.options
    }

    /// Number of non-empty frames written so far
    pub fn written_frames(&self) -> u64 {
        self.state.lock().written_frames
    }

    /// Sanitize and write a single frame
    pub fn write_frame(&self, frame: &[u8]) -> Result<()> {
        let mut guard = self.state.lock();
        let WriterState {
            resource,
            written_frames,
        } = &mut *guard;

        let kind = &self.kind;
        let options = &self.options;

        resource.access(|raw| {
            if frame.len() as u64 > options.max_frame_size {
                return Err(FrameError::SizeOverflow(options.max_frame_size));
            }
            if *written_frames >= options.max_frames {
                return Err(FrameError::CountOverflow(options.max_frames));
            }

            let frame = options
                .sanitizer
                .sanitize(kind, Frame::copy_from_slice(frame))?;
            if frame.is_empty() {
                #[cfg(feature = "logging")]
                trace!("Skipped empty frame: kind={}", kind);
                return Ok(());
            }

            raw.write_frame(&frame)?;
            *written_frames += 1;

            #[cfg(feature = "logging")]
            debug!("Wrote frame: kind={}, frame_bytes={}", kind, frame.len());
            Ok(())
        })
    }

    /// Close the writer; closing again is a no-op
    pub fn close(&self) -> Result<()> {
        self.state.lock().resource.close()
    }

    /// Whether the writer has been closed, explicitly or after an error
    pub fn is_closed(&self) -> bool {
        self.state.lock().resource.is_closed()
    }
}

impl std::fmt::Debug for FrameWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameWriter")
            .field("kind", &self.kind)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
