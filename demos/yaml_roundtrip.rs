//! Write a few YAML documents to a file and read them back

use docframe_core::{new_yaml_reader, new_yaml_writer, read_all_frames, OptionsOverride};
use std::fs::File;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Docframe YAML Round Trip Example\n");

    let path = std::env::temp_dir().join("docframe_example.yaml");

    let writer = new_yaml_writer(File::create(&path)?, &[]);
    for i in 1..=3 {
        let doc = format!("apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: example-{i}\n");
        writer.write_frame(doc.as_bytes())?;
        println!("Wrote document {}: {} bytes", i, doc.len());
    }
    // Whitespace-only documents are skipped
    writer.write_frame(b"\n\n---\n")?;
    writer.close()?;

    println!("\nStream on disk:\n{}", std::fs::read_to_string(&path)?);

    let reader = new_yaml_reader(File::open(&path)?, &[OptionsOverride::max_frames(10)]);
    for (i, frame) in read_all_frames(&reader)?.iter().enumerate() {
        println!("Frame {}: {} bytes", i + 1, frame.len());
    }

    std::fs::remove_file(&path)?;
    Ok(())
}
