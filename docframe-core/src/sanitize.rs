//! Frame sanitization

use crate::constants::YAML_SEPARATOR;
use crate::error::FrameError;
use crate::types::{Frame, FramingKind};
use bytes::{BufMut, BytesMut};
use std::fmt;

/// Normalizes the bytes of a single frame for a given framing kind
///
/// A sanitizer only works correctly if the frame holds exactly one document.
/// Returning an empty frame marks it as empty: readers skip it and writers do
/// not write it. Implementations must be pure and idempotent on their own output.
pub trait Sanitizer: fmt::Debug + Send + Sync {
    /// Sanitize `frame` for `kind`
    fn sanitize(&self, kind: &FramingKind, frame: Frame) -> Result<Frame, FrameError>;
}

/// Built-in sanitizer for YAML and JSON
///
/// YAML frames lose surrounding whitespace and stray `---` separators and always
/// end with exactly one newline, unless nothing is left. JSON frames lose surrounding
/// whitespace. Frames of any other kind pass through unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultSanitizer;

impl Sanitizer for DefaultSanitizer {
    fn sanitize(&self, kind: &FramingKind, frame: Frame) -> Result<Frame, FrameError> {
        Ok(match kind {
            FramingKind::Yaml => sanitize_yaml(frame),
            FramingKind::Json => sanitize_json(frame),
            FramingKind::Other(_) => frame,
        })
    }
}

/// Trim whitespace and `---` from both ends until the frame stops shrinking,
/// then terminate a non-empty result with a newline.
pub fn sanitize_yaml(frame: Frame) -> Frame {
    let frame = trim_yaml(frame);
    if frame.is_empty() {
        return frame;
    }
    let mut out = BytesMut::with_capacity(frame.len() + 1);
    out.put_slice(&frame);
    out.put_u8(b'\n');
    out.freeze()
}

/// Length `sanitize_yaml` would produce for `document`, without building it
pub(crate) fn sanitized_yaml_len(document: &Frame) -> usize {
    match trim_yaml(document.clone()).len() {
        0 => 0,
        len => len + 1,
    }
}

fn trim_yaml(frame: Frame) -> Frame {
    let mut frame = frame;
    let mut prev_len = frame.len();
    loop {
        frame = trim_space(frame);
        if frame.starts_with(YAML_SEPARATOR) {
            frame = frame.slice(YAML_SEPARATOR.len()..);
        }
        if frame.ends_with(YAML_SEPARATOR) {
            frame = frame.slice(..frame.len() - YAML_SEPARATOR.len());
        }

        if frame.len() < prev_len {
            prev_len = frame.len();
            continue;
        }
        break;
    }
    frame
}

/// Trim surrounding whitespace
pub fn sanitize_json(frame: Frame) -> Frame {
    trim_space(frame)
}

fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

fn trim_space(frame: Frame) -> Frame {
    let start = frame.iter().position(|&b| !is_space(b));
    match start {
        None => Frame::new(),
        Some(start) => {
            // A non-space byte exists, so rposition finds one.
            let end = frame.iter().rposition(|&b| !is_space(b)).map_or(start, |end| end + 1);
            frame.slice(start..end)
        }
    }
}
