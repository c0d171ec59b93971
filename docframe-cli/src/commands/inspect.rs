use crate::config::{frame_error, open_reader};
use anyhow::{Context, Result};
use docframe_core::{FrameReader, FramingKind, OptionsOverride};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Size of a single frame in a stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInfo {
    /// 1-based position in the stream
    pub index: usize,
    /// Sanitized frame length
    pub bytes: usize,
}

/// Summary of a framed stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Framing kind the stream was read as
    pub kind: FramingKind,
    /// Number of non-empty frames
    pub frame_count: usize,
    /// Sum of all sanitized frame lengths
    pub total_bytes: usize,
    /// Per-frame sizes, in stream order
    pub frames: Vec<FrameInfo>,
}

/// Read all frames of `reader` into a report
pub fn inspect(reader: &FrameReader) -> Result<Report> {
    let mut frames = Vec::new();
    for frame in reader.frames() {
        let frame = frame
            .map_err(frame_error)
            .with_context(|| format!("Failed to read frame {}", frames.len() + 1))?;
        frames.push(FrameInfo {
            index: frames.len() + 1,
            bytes: frame.len(),
        });
    }

    Ok(Report {
        kind: reader.framing_kind().clone(),
        frame_count: frames.len(),
        total_bytes: frames.iter().map(|f| f.bytes).sum(),
        frames,
    })
}

pub fn execute(
    input: &str,
    kind: &FramingKind,
    json: bool,
    overrides: &[OptionsOverride],
) -> Result<()> {
    info!("Inspecting file: {}", input);

    let reader = open_reader(input, kind, overrides)?;
    let report = inspect(&reader)?;

    if json {
        let out = serde_json::to_string_pretty(&report)
            .with_context(|| "Failed to serialize report")?;
        println!("{}", out);
        return Ok(());
    }

    println!("\n=== Inspect Results ===");
    println!("Framing kind:      {}", report.kind);
    println!("Frames:            {}", report.frame_count);
    println!("Total bytes:       {} bytes", report.total_bytes);
    println!();
    for frame in &report.frames {
        println!("Frame {}: {} bytes", frame.index, frame.bytes);
    }

    Ok(())
}
