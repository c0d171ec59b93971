//! Constants and limits for document framing

/// Default maximum frame size (16 MiB)
pub const DEFAULT_MAX_FRAME_SIZE: u64 = 16 * 1024 * 1024;

/// Default maximum number of non-empty frames per reader or writer
pub const DEFAULT_MAX_FRAMES: u64 = 1024;

/// A reader may perform at most this many low-level reads per allowed frame,
/// counting reads that sanitize to empty frames.
pub const TOTAL_ATTEMPTS_FACTOR: u64 = 10;

/// YAML document separator token
pub const YAML_SEPARATOR: &[u8; 3] = b"---";

/// Separator line emitted in front of every written YAML document
pub const YAML_DOCUMENT_START: &[u8; 4] = b"---\n";

/// Extra bytes the YAML splitter may read past the frame limit, so that the
/// trailing `---\n` line of an in-bounds document is still visible.
pub const YAML_SEPARATOR_ALLOWANCE: u64 = YAML_DOCUMENT_START.len() as u64;

/// Initial window of the JSON reader's growable buffer
pub const JSON_INITIAL_WINDOW: usize = 1024;

/// Media type used for YAML streams
pub const MEDIA_TYPE_YAML: &str = "application/yaml";

/// Media type used for JSON streams
pub const MEDIA_TYPE_JSON: &str = "application/json";
