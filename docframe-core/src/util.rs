//! Batch helpers

use crate::reader::FrameReader;
use crate::types::FrameList;
use crate::writer::FrameWriter;
use crate::Result;

/// Read frames until end of stream, stopping at the first error
pub fn read_all_frames(reader: &FrameReader) -> Result<FrameList> {
    reader.frames().collect()
}

/// Write `frames` in order, stopping at the first error
pub fn write_all_frames<I, F>(writer: &FrameWriter, frames: I) -> Result<()>
where
    I: IntoIterator<Item = F>,
    F: AsRef<[u8]>,
{
    for frame in frames {
        writer.write_frame(frame.as_ref())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FrameError;
    use crate::factory::{new_json_reader, new_json_writer};
    use crate::options::OptionsOverride;
    use std::io::Cursor;

    #[test]
    fn test_read_all_stops_at_end_of_stream() {
        let reader = new_json_reader(Cursor::new(br#"{"a":1} {"b":2}"#.to_vec()), &[]);
        let frames = read_all_frames(&reader).unwrap();
        assert_eq!(frames, vec![&br#"{"a":1}"#[..], &br#"{"b":2}"#[..]]);
    }

    #[test]
    fn test_read_all_stops_at_first_error() {
        let reader = new_json_reader(
            Cursor::new(br#"{"a":1}{"b":2}{"c":3}"#.to_vec()),
            &[OptionsOverride::max_frames(2)],
        );
        assert_eq!(read_all_frames(&reader), Err(FrameError::CountOverflow(2)));
    }

    #[test]
    fn test_write_all_stops_at_first_error() {
        let writer = new_json_writer(Vec::new(), &[OptionsOverride::max_frames(1)]);
        let result = write_all_frames(&writer, ["{}", "[]", "1"]);
        assert_eq!(result, Err(FrameError::CountOverflow(1)));
        assert_eq!(writer.written_frames(), 1);
    }
}
