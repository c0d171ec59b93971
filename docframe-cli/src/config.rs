//! Option layering and stream opening shared by all commands

use anyhow::{Context, Result};
use docframe_core::{
    new_reader, new_writer, FrameError, FrameReader, FrameWriter, FramingKind, OptionsOverride,
};
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::Path;
use tracing::debug;

/// Path meaning standard input or standard output
pub const STDIO_PATH: &str = "-";

/// Build the effective override: the JSON config file first, then command-line flags
pub fn load_overrides(
    config: Option<&Path>,
    max_frame_size: Option<u64>,
    max_frames: Option<u64>,
) -> Result<OptionsOverride> {
    let from_file = match config {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let parsed: OptionsOverride = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            debug!("Loaded options from {}: {:?}", path.display(), parsed);
            parsed
        }
        None => OptionsOverride::default(),
    };

    let flags = OptionsOverride {
        max_frame_size,
        max_frames,
        ..OptionsOverride::default()
    };
    Ok(from_file.merge(&flags))
}

/// Convert a frame error, pointing at the limit flags when a limit was hit
pub fn frame_error(err: FrameError) -> anyhow::Error {
    if err.is_overflow() {
        return anyhow::Error::new(err)
            .context("Stream exceeds the configured limits (see --max-frame-size and --max-frames)");
    }
    err.into()
}

/// Open a frame reader over a file, or standard input for `-`
pub fn open_reader(
    path: &str,
    kind: &FramingKind,
    overrides: &[OptionsOverride],
) -> Result<FrameReader> {
    if path == STDIO_PATH {
        return Ok(new_reader(kind.clone(), io::stdin(), overrides));
    }
    let file =
        File::open(path).with_context(|| format!("Failed to open input file: {}", path))?;
    Ok(new_reader(kind.clone(), file, overrides))
}

/// Open a frame writer into a file, or standard output for `-`
pub fn open_writer(
    path: &str,
    kind: &FramingKind,
    overrides: &[OptionsOverride],
) -> Result<FrameWriter> {
    if path == STDIO_PATH {
        return Ok(new_writer(kind.clone(), io::stdout(), overrides));
    }
    let file =
        File::create(path).with_context(|| format!("Failed to create output file: {}", path))?;
    Ok(new_writer(kind.clone(), BufWriter::new(file), overrides))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docframe_core::FrameOptions;
    use tempfile::tempdir;

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("docframe.json");
        fs::write(&path, r#"{"max_frames": 3, "max_frame_size": 100, "close_on_error": false}"#)
            .unwrap();

        let merged = load_overrides(Some(&path), Some(50), None).unwrap();
        let opts = FrameOptions::default().with(&merged);
        assert_eq!(opts.max_frames, 3);
        assert_eq!(opts.max_frame_size, 50);
        assert!(!opts.close_on_error);
    }

    #[test]
    fn test_no_config_file_uses_flags_only() {
        let merged = load_overrides(None, None, Some(7)).unwrap();
        assert_eq!(merged.max_frames, Some(7));
        assert_eq!(merged.max_frame_size, None);
        assert_eq!(merged.close_on_error, None);
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_overrides(Some(&path), None, None).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_overflow_errors_mention_limit_flags() {
        let err = frame_error(FrameError::SizeOverflow(16));
        assert!(err.to_string().contains("--max-frame-size"));
        assert_eq!(err.downcast_ref::<FrameError>(), Some(&FrameError::SizeOverflow(16)));

        let err = frame_error(FrameError::Closed);
        assert!(!err.to_string().contains("--max-frame-size"));
    }
}
