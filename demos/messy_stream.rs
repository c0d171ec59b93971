//! Read frames out of badly separated YAML and JSON streams

use docframe_core::{new_json_reader, new_yaml_reader, FrameError, OptionsOverride};
use std::io::Cursor;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Docframe Messy Stream Example\n");

    let yaml = "\n---\n\n---\nfoobar: true\n\n\n---\n---\nfoobar: true\n---";
    println!("YAML input: {:?}", yaml);
    let reader = new_yaml_reader(Cursor::new(yaml.as_bytes().to_vec()), &[]);
    for frame in reader.frames() {
        println!("  frame: {:?}", String::from_utf8_lossy(&frame?));
    }

    let json = "\n\n{\"foo\": true}\n  [1, 2]\"text\" 42\n";
    println!("\nJSON input: {:?}", json);
    let reader = new_json_reader(Cursor::new(json.as_bytes().to_vec()), &[]);
    for frame in reader.frames() {
        println!("  frame: {:?}", String::from_utf8_lossy(&frame?));
    }

    // A document larger than the limit closes the reader
    let big = format!("small: 1\n---\nbig: {}\n---\nsmall: 2\n", "x".repeat(64));
    let reader = new_yaml_reader(
        Cursor::new(big.into_bytes()),
        &[OptionsOverride::max_frame_size(32)],
    );
    println!("\nYAML with an oversized document (limit 32 bytes):");
    loop {
        match reader.read_frame() {
            Ok(Some(frame)) => println!("  frame: {:?}", String::from_utf8_lossy(&frame)),
            Ok(None) => break,
            Err(FrameError::Closed) => {
                println!("  reader closed");
                break;
            }
            Err(e) => println!("  error: {}", e),
        }
    }

    Ok(())
}
