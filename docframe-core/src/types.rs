//! Core types for framed document streams

use crate::constants::{MEDIA_TYPE_JSON, MEDIA_TYPE_YAML};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// One self-contained, decodable document
///
/// Frames returned by a reader or accepted by a writer after sanitization are never empty.
pub type Frame = Bytes;

/// An ordered list of frames, as used by the batch helpers
pub type FrameList = Vec<Frame>;

/// Wire convention governing how frame boundaries are recognized
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FramingKind {
    /// YAML documents separated by `---` lines
    Yaml,
    /// Self-delimiting JSON values, concatenated on the wire
    Json,
    /// Any other content, only supported as a single opaque frame
    Other(String),
}

impl FramingKind {
    /// Media type or name of this framing kind
    pub fn as_str(&self) -> &str {
        match self {
            FramingKind::Yaml => MEDIA_TYPE_YAML,
            FramingKind::Json => MEDIA_TYPE_JSON,
            FramingKind::Other(name) => name,
        }
    }

    /// Conventional file extension for a single frame of this kind
    pub fn file_extension(&self) -> &str {
        match self {
            FramingKind::Yaml => "yaml",
            FramingKind::Json => "json",
            FramingKind::Other(_) => "bin",
        }
    }
}

impl fmt::Display for FramingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for FramingKind {
    fn from(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "yaml" | "yml" | MEDIA_TYPE_YAML => FramingKind::Yaml,
            "json" | MEDIA_TYPE_JSON => FramingKind::Json,
            _ => FramingKind::Other(name.to_string()),
        }
    }
}

impl From<String> for FramingKind {
    fn from(name: String) -> Self {
        FramingKind::from(name.as_str())
    }
}

impl From<FramingKind> for String {
    fn from(kind: FramingKind) -> Self {
        kind.as_str().to_string()
    }
}

impl FromStr for FramingKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FramingKind::from(s))
    }
}
