use crate::config::{frame_error, open_reader, open_writer};
use anyhow::{Context, Result};
use docframe_core::{FramingKind, OptionsOverride};
use tracing::info;

/// Read every frame of `input` and write it back sanitized to `output`,
/// re-framed as `output_kind` when given.
pub fn execute(
    input: &str,
    output: &str,
    kind: &FramingKind,
    output_kind: Option<&FramingKind>,
    overrides: &[OptionsOverride],
) -> Result<()> {
    let output_kind = output_kind.unwrap_or(kind);
    info!(
        "Normalizing {} ({}) to {} ({})",
        input, kind, output, output_kind
    );

    let reader = open_reader(input, kind, overrides)?;
    let writer = open_writer(output, output_kind, overrides)?;

    let mut frames = 0usize;
    let mut bytes = 0usize;
    for frame in reader.frames() {
        let frame = frame
            .map_err(frame_error)
            .with_context(|| format!("Failed to read frame {} from {}", frames + 1, input))?;
        writer
            .write_frame(&frame)
            .map_err(frame_error)
            .with_context(|| format!("Failed to write frame {} to {}", frames + 1, output))?;
        frames += 1;
        bytes += frame.len();
    }

    writer
        .close()
        .with_context(|| format!("Failed to close output: {}", output))?;
    reader.close()?;

    info!("Normalized {} frames ({} bytes)", frames, bytes);
    Ok(())
}
