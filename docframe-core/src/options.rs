//! Reader and writer options

use crate::constants::{DEFAULT_MAX_FRAMES, DEFAULT_MAX_FRAME_SIZE};
use crate::sanitize::{DefaultSanitizer, Sanitizer};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Options shared by frame readers and writers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameOptions {
    /// Maximum size of a single frame in bytes
    pub max_frame_size: u64,

    /// Maximum number of non-empty frames a reader or writer may process
    pub max_frames: u64,

    /// Close the resource automatically after any failed operation
    pub close_on_error: bool,

    /// Normalizes frames after reading and before writing
    #[serde(skip)]
    pub sanitizer: Arc<dyn Sanitizer>,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            max_frames: DEFAULT_MAX_FRAMES,
            close_on_error: true,
            sanitizer: Arc::new(DefaultSanitizer),
        }
    }
}

impl FrameOptions {
    /// Apply `overrides` on top of these options
    ///
    /// Unset fields and zero sizes or counts leave the current value in place.
    pub fn with(mut self, overrides: &OptionsOverride) -> Self {
        if let Some(size) = overrides.max_frame_size.filter(|&size| size != 0) {
            self.max_frame_size = size;
        }
        if let Some(frames) = overrides.max_frames.filter(|&frames| frames != 0) {
            self.max_frames = frames;
        }
        if let Some(close_on_error) = overrides.close_on_error {
            self.close_on_error = close_on_error;
        }
        if let Some(sanitizer) = &overrides.sanitizer {
            self.sanitizer = Arc::clone(sanitizer);
        }
        self
    }

    /// Apply every override in order
    pub fn with_all<'a, I>(self, overrides: I) -> Self
    where
        I: IntoIterator<Item = &'a OptionsOverride>,
    {
        overrides.into_iter().fold(self, |opts, o| opts.with(o))
    }
}

/// A partial set of options, layered on top of [`FrameOptions`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsOverride {
    /// Replaces [`FrameOptions::max_frame_size`] unless unset or zero
    pub max_frame_size: Option<u64>,
    /// Replaces [`FrameOptions::max_frames`] unless unset or zero
    pub max_frames: Option<u64>,
    /// Replaces [`FrameOptions::close_on_error`] unless unset
    pub close_on_error: Option<bool>,
    /// Replaces [`FrameOptions::sanitizer`] unless unset
    #[serde(skip)]
    pub sanitizer: Option<Arc<dyn Sanitizer>>,
}

impl OptionsOverride {
    /// Override only the maximum frame size
    pub fn max_frame_size(size: u64) -> Self {
        Self {
            max_frame_size: Some(size),
            ..Self::default()
        }
    }

    /// Override only the maximum frame count
    pub fn max_frames(frames: u64) -> Self {
        Self {
            max_frames: Some(frames),
            ..Self::default()
        }
    }

    /// Override only the close-on-error behaviour
    pub fn close_on_error(close_on_error: bool) -> Self {
        Self {
            close_on_error: Some(close_on_error),
            ..Self::default()
        }
    }

    /// Override only the sanitizer
    pub fn sanitizer(sanitizer: Arc<dyn Sanitizer>) -> Self {
        Self {
            sanitizer: Some(sanitizer),
            ..Self::default()
        }
    }

    /// Layer `other` on top of `self`, with the same rules as [`FrameOptions::with`]
    pub fn merge(mut self, other: &OptionsOverride) -> Self {
        if other.max_frame_size.is_some_and(|size| size != 0) {
            self.max_frame_size = other.max_frame_size;
        }
        if other.max_frames.is_some_and(|frames| frames != 0) {
            self.max_frames = other.max_frames;
        }
        if other.close_on_error.is_some() {
            self.close_on_error = other.close_on_error;
        }
        if other.sanitizer.is_some() {
            self.sanitizer = other.sanitizer.clone();
        }
        self
    }
}
