//! Fuzzing entry points for docframe-core readers and sanitizers
//!
//! To use with cargo-fuzz:
//! 1. Install cargo-fuzz: cargo install cargo-fuzz
//! 2. Call these functions from a `fuzz_target!` body

use bytes::Bytes;
use docframe_core::sanitize::{sanitize_json, sanitize_yaml};
use docframe_core::{new_reader, FramingKind, OptionsOverride};
use std::io::Cursor;

/// Small limits so inputs hit the overflow paths quickly
fn fuzz_overrides() -> [OptionsOverride; 2] {
    [
        OptionsOverride::max_frame_size(256),
        OptionsOverride::max_frames(16),
    ]
}

/// Read every frame of `data` as `kind`; should never panic
pub fn fuzz_read(kind: FramingKind, data: &[u8]) {
    let reader = new_reader(kind, Cursor::new(data.to_vec()), &fuzz_overrides());
    for frame in reader.frames().flatten() {
        assert!(!frame.is_empty(), "reader returned an empty frame");
    }
    let _ = reader.close();
}

/// Sanitize `data` both ways; should never panic and must be idempotent
pub fn fuzz_sanitize(data: &[u8]) {
    let once = sanitize_yaml(Bytes::copy_from_slice(data));
    assert_eq!(sanitize_yaml(once.clone()), once);

    let once = sanitize_json(Bytes::copy_from_slice(data));
    assert_eq!(sanitize_json(once.clone()), once);
}
