use crate::config::{frame_error, open_reader};
use anyhow::{Context, Result};
use docframe_core::single::SingleWriter;
use docframe_core::{FrameOptions, FrameWriter, FramingKind, OptionsOverride};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name of the `index`-th frame (1-based)
pub fn frame_file_name(index: usize, kind: &FramingKind) -> String {
    format!("frame-{:04}.{}", index, kind.file_extension())
}

/// Write every frame of `input` into its own file under `out_dir`
///
/// Returns the paths written, in stream order.
pub fn execute(
    input: &str,
    out_dir: &Path,
    kind: &FramingKind,
    overrides: &[OptionsOverride],
) -> Result<Vec<PathBuf>> {
    info!("Splitting {} ({}) into {}", input, kind, out_dir.display());

    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    let reader = open_reader(input, kind, overrides)?;
    let options = FrameOptions::default().with_all(overrides);

    let mut written = Vec::new();
    for frame in reader.frames() {
        let frame = frame
            .map_err(frame_error)
            .with_context(|| format!("Failed to read frame from {}", input))?;
        let path = out_dir.join(frame_file_name(written.len() + 1, kind));

        let file = File::create(&path)
            .with_context(|| format!("Failed to create file: {}", path.display()))?;
        let raw = SingleWriter::new(kind.clone(), BufWriter::new(file));
        let writer = FrameWriter::new(Box::new(raw), options.clone(), true);
        writer
            .write_frame(&frame)
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        writer.close()?;

        debug!("Wrote {} ({} bytes)", path.display(), frame.len());
        written.push(path);
    }

    info!("Split {} frames into {}", written.len(), out_dir.display());
    Ok(written)
}
