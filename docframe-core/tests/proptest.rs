//! Property-based tests using proptest

use docframe_core::sanitize::{sanitize_json, sanitize_yaml};
use docframe_core::{
    new_reader, new_writer, read_all_frames, write_all_frames, DefaultSanitizer, Frame,
    FrameError, FramingKind, OptionsOverride, Sanitizer,
};
use parking_lot::Mutex;
use proptest::prelude::*;
use std::io::{self, Cursor, Write};
use std::sync::Arc;

#[derive(Clone, Default)]
struct SharedSink(Arc<Mutex<Vec<u8>>>);

impl Write for SharedSink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A YAML document of `key: value` lines, already in sanitized form
fn yaml_document() -> impl Strategy<Value = String> {
    prop::collection::vec(("[a-z][a-z0-9_]{0,8}", "[a-zA-Z0-9]{1,8}( [a-zA-Z0-9]{1,8})?"), 1..6).prop_map(
        |lines| {
            let mut doc = String::new();
            for (key, value) in lines {
                doc.push_str(&key);
                doc.push_str(": ");
                doc.push_str(&value);
                doc.push('\n');
            }
            doc
        },
    )
}

/// A compact JSON object
fn json_document() -> impl Strategy<Value = String> {
    prop::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..6).prop_map(|map| {
        let value = serde_json::to_value(map).unwrap();
        serde_json::to_string(&value).unwrap()
    })
}

fn roundtrip(kind: FramingKind, docs: &[String]) -> Vec<Frame> {
    let sink = SharedSink::default();
    let writer = new_writer(kind.clone(), sink.clone(), &[]);
    write_all_frames(&writer, docs).unwrap();
    writer.close().unwrap();

    let raw = sink.0.lock().clone();
    let reader = new_reader(kind, Cursor::new(raw), &[]);
    read_all_frames(&reader).unwrap()
}

proptest! {
    #[test]
    fn prop_yaml_round_trip(docs in prop::collection::vec(yaml_document(), 1..20)) {
        let frames = roundtrip(FramingKind::Yaml, &docs);
        prop_assert_eq!(frames.len(), docs.len());
        for (frame, doc) in frames.iter().zip(&docs) {
            prop_assert_eq!(&frame[..], doc.as_bytes());
        }
    }

    #[test]
    fn prop_json_round_trip(docs in prop::collection::vec(json_document(), 1..20)) {
        let frames = roundtrip(FramingKind::Json, &docs);
        prop_assert_eq!(frames.len(), docs.len());
        for (frame, doc) in frames.iter().zip(&docs) {
            prop_assert_eq!(&frame[..], doc.as_bytes());
        }
    }

    #[test]
    fn prop_sanitize_idempotent(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let once = sanitize_yaml(Frame::from(data.clone()));
        prop_assert_eq!(sanitize_yaml(once.clone()), once);

        let once = sanitize_json(Frame::from(data));
        prop_assert_eq!(sanitize_json(once.clone()), once);
    }

    #[test]
    fn prop_sanitize_idempotent_on_separator_soup(
        parts in prop::collection::vec(prop_oneof![
            Just("---"), Just("\n"), Just(" "), Just("\t"), Just("a: 1"), Just("-"),
        ], 0..24)
    ) {
        let data = parts.concat();
        let kind = FramingKind::Yaml;
        let once = DefaultSanitizer.sanitize(&kind, Frame::from(data)).unwrap();
        let twice = DefaultSanitizer.sanitize(&kind, once.clone()).unwrap();
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn prop_write_size_boundary(size in 1usize..256) {
        let frame = format!("{{\"k\":\"{}\"}}", "x".repeat(size));
        let max = frame.len() as u64;

        let exact = new_writer(FramingKind::Json, Vec::new(), &[OptionsOverride::max_frame_size(max)]);
        prop_assert!(exact.write_frame(frame.as_bytes()).is_ok());

        let below = new_writer(FramingKind::Json, Vec::new(), &[OptionsOverride::max_frame_size(max - 1)]);
        prop_assert_eq!(
            below.write_frame(frame.as_bytes()),
            Err(FrameError::SizeOverflow(max - 1))
        );
    }

    #[test]
    fn prop_read_size_boundary(size in 1usize..256) {
        let frame = format!("{{\"k\":\"{}\"}}", "x".repeat(size));
        let max = frame.len() as u64;

        let exact = new_reader(
            FramingKind::Json,
            Cursor::new(frame.clone().into_bytes()),
            &[OptionsOverride::max_frame_size(max)],
        );
        let read = exact.read_frame().unwrap();
        prop_assert_eq!(read.as_deref(), Some(frame.as_bytes()));

        let below = new_reader(
            FramingKind::Json,
            Cursor::new(frame.into_bytes()),
            &[OptionsOverride::max_frame_size(max - 1)],
        );
        prop_assert_eq!(below.read_frame(), Err(FrameError::SizeOverflow(max - 1)));
    }

    #[test]
    fn prop_yaml_frames_at_limit_read_back(size in 1usize..256, count in 1usize..4) {
        let frame = format!("k: {}\n", "x".repeat(size));
        let limits = [OptionsOverride::max_frame_size(frame.len() as u64)];
        let frames = vec![frame; count];

        let sink = SharedSink::default();
        let writer = new_writer(FramingKind::Yaml, sink.clone(), &limits);
        write_all_frames(&writer, &frames).unwrap();

        let written = sink.0.lock().clone();
        let reader = new_reader(FramingKind::Yaml, Cursor::new(written), &limits);
        let read: Vec<String> = read_all_frames(&reader)
            .unwrap()
            .iter()
            .map(|f| String::from_utf8_lossy(f).into_owned())
            .collect();
        prop_assert_eq!(read, frames);
    }

    #[test]
    fn prop_readers_never_panic(
        data in prop::collection::vec(any::<u8>(), 0..2048),
        max_frame_size in 1u64..512,
        max_frames in 1u64..8,
    ) {
        let kinds = [
            FramingKind::Yaml,
            FramingKind::Json,
            FramingKind::Other("raw".to_string()),
        ];
        for kind in kinds {
            let reader = new_reader(
                kind,
                Cursor::new(data.clone()),
                &[
                    OptionsOverride::max_frame_size(max_frame_size),
                    OptionsOverride::max_frames(max_frames),
                ],
            );
            let mut successes = 0u64;
            for frame in reader.frames() {
                match frame {
                    Ok(frame) => {
                        prop_assert!(!frame.is_empty());
                        successes += 1;
                    }
                    Err(_) => break,
                }
            }
            prop_assert!(successes <= max_frames);
        }
    }
}
