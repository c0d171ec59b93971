//! # Docframe Core
//!
//! Bounded, thread-safe framing of YAML and JSON document streams.
//!
//! A frame is one self-contained document. Readers split a byte stream into frames,
//! writers join frames back into a stream, and both enforce a maximum frame size and
//! frame count, sanitize every frame and close themselves after a failure.
//!
//! ## Modules
//!
//! - `constants`: Limits and wire constants
//! - `types`: Frame and framing kind types
//! - `error`: Error taxonomy
//! - `bounded`: Per-frame byte budget for the read side
//! - `sanitize`: Frame normalization
//! - `options`: Reader and writer options
//! - `raw`: Low-level reader and writer traits, error and delegating implementations
//! - `yaml`: YAML document splitter
//! - `json`: JSON value framing
//! - `single`: Single-shot reader and writer for opaque content
//! - `reader`: High-level `FrameReader`
//! - `writer`: High-level `FrameWriter`
//! - `factory`: Reader and writer construction by framing kind
//! - `util`: Batch helpers
//!
//! ## Example
//!
//! ```
//! use docframe_core::{new_yaml_reader, new_yaml_writer, read_all_frames};
//! use std::io::Cursor;
//!
//! let writer = new_yaml_writer(Vec::new(), &[]);
//! writer.write_frame(b"foobar: true").unwrap();
//!
//! let reader = new_yaml_reader(Cursor::new(b"---\nfoobar: true\n".to_vec()), &[]);
//! let frames = read_all_frames(&reader).unwrap();
//! assert_eq!(frames, vec![&b"foobar: true\n"[..]]);
//! ```

#![warn(missing_docs)]

pub mod bounded;
pub mod constants;
pub mod error;
pub mod factory;
pub mod json;
pub mod options;
pub mod raw;
pub mod reader;
mod resource;
pub mod sanitize;
pub mod single;
pub mod types;
pub mod util;
pub mod writer;
pub mod yaml;

// Re-export commonly used types
pub use error::FrameError;
pub use factory::{
    new_json_reader, new_json_writer, new_reader, new_writer, new_yaml_reader, new_yaml_writer,
    Factory,
};
pub use options::{FrameOptions, OptionsOverride};
pub use raw::{RawReader, RawWriter};
pub use reader::{FrameReader, Frames};
pub use sanitize::{DefaultSanitizer, Sanitizer};
pub use types::{Frame, FrameList, FramingKind};
pub use util::{read_all_frames, write_all_frames};
pub use writer::FrameWriter;

/// Result type alias for framing operations
pub type Result<T> = core::result::Result<T, FrameError>;
