//! Construction of frame readers and writers by framing kind

use crate::json::JsonReader;
use crate::options::{FrameOptions, OptionsOverride};
use crate::raw::{DelegatingWriter, ErrReader, ErrWriter, RawReader, RawWriter};
use crate::reader::FrameReader;
use crate::single::{SingleReader, SingleWriter};
use crate::types::FramingKind;
use crate::writer::FrameWriter;
use crate::yaml::YamlReader;
use std::any::TypeId;
use std::io::{self, Read, Write};

#[cfg(feature = "logging")]
use tracing::debug;

/// Whether `S` is one of the process' standard streams, which are never closed by a reader or writer
fn is_stdio<S: 'static>() -> bool {
    let id = TypeId::of::<S>();
    [
        TypeId::of::<io::Stdin>(),
        TypeId::of::<io::StdinLock<'static>>(),
        TypeId::of::<io::Stdout>(),
        TypeId::of::<io::StdoutLock<'static>>(),
        TypeId::of::<io::Stderr>(),
        TypeId::of::<io::StderrLock<'static>>(),
    ]
    .contains(&id)
}

/// Builds readers and writers on top of a set of default options
#[derive(Debug, Clone, Default)]
pub struct Factory {
    defaults: FrameOptions,
}

impl Factory {
    /// Create a factory with the given defaults
    pub fn new(defaults: FrameOptions) -> Self {
        Self { defaults }
    }

    /// Create a reader for `kind` over `source`
    ///
    /// YAML and JSON get their own splitters. Any other kind is read as one opaque
    /// frame when `max_frames` is 1, and is rejected on every read otherwise.
    pub fn new_reader<R>(
        &self,
        kind: FramingKind,
        source: R,
        overrides: &[OptionsOverride],
    ) -> FrameReader
    where
        R: Read + Send + 'static,
    {
        let options = self.defaults.clone().with_all(overrides);
        let max = options.max_frame_size;
        let raw: Box<dyn RawReader> = match &kind {
            FramingKind::Yaml => Box::new(YamlReader::new(source, max)),
            FramingKind::Json => Box::new(JsonReader::new(source, max)),
            FramingKind::Other(_) if options.max_frames == 1 => {
                Box::new(SingleReader::new(kind.clone(), source, max))
            }
            FramingKind::Other(_) => Box::new(ErrReader::unsupported(kind.clone())),
        };

        #[cfg(feature = "logging")]
        debug!(
            "Created reader: kind={}, max_frame_size={}, max_frames={}",
            kind, options.max_frame_size, options.max_frames
        );
        FrameReader::new(raw, options, !is_stdio::<R>())
    }

    /// Create a writer for `kind` into `sink`
    ///
    /// Kind selection follows [`Factory::new_reader`].
    pub fn new_writer<W>(
        &self,
        kind: FramingKind,
        sink: W,
        overrides: &[OptionsOverride],
    ) -> FrameWriter
    where
        W: Write + Send + 'static,
    {
        let options = self.defaults.clone().with_all(overrides);
        let raw: Box<dyn RawWriter> = match &kind {
            FramingKind::Yaml | FramingKind::Json => {
                Box::new(DelegatingWriter::new(kind.clone(), sink))
            }
            FramingKind::Other(_) if options.max_frames == 1 => {
                Box::new(SingleWriter::new(kind.clone(), sink))
            }
            FramingKind::Other(_) => Box::new(ErrWriter::unsupported(kind.clone())),
        };

        #[cfg(feature = "logging")]
        debug!(
            "Created writer: kind={}, max_frame_size={}, max_frames={}",
            kind, options.max_frame_size, options.max_frames
        );
        FrameWriter::new(raw, options, !is_stdio::<W>())
    }
}

/// Create a reader with the default factory
pub fn new_reader<R>(kind: FramingKind, source: R, overrides: &[OptionsOverride]) -> FrameReader
where
    R: Read + Send + 'static,
{
    Factory::default().new_reader(kind, source, overrides)
}

/// Create a writer with the default factory
pub fn new_writer<W>(kind: FramingKind, sink: W, overrides: &[OptionsOverride]) -> FrameWriter
where
    W: Write + Send + 'static,
{
    Factory::default().new_writer(kind, sink, overrides)
}

/// Create a YAML reader with the default factory
pub fn new_yaml_reader<R>(source: R, overrides: &[OptionsOverride]) -> FrameReader
where
    R: Read + Send + 'static,
{
    new_reader(FramingKind::Yaml, source, overrides)
}

/// Create a JSON reader with the default factory
pub fn new_json_reader<R>(source: R, overrides: &[OptionsOverride]) -> FrameReader
where
    R: Read + Send + 'static,
{
    new_reader(FramingKind::Json, source, overrides)
}

/// Create a YAML writer with the default factory
pub fn new_yaml_writer<W>(sink: W, overrides: &[OptionsOverride]) -> FrameWriter
where
    W: Write + Send + 'static,
{
    new_writer(FramingKind::Yaml, sink, overrides)
}

/// Create a JSON writer with the default factory
pub fn new_json_writer<W>(sink: W, overrides: &[OptionsOverride]) -> FrameWriter
where
    W: Write + Send + 'static,
{
    new_writer(FramingKind::Json, sink, overrides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FrameError;
    use std::io::Cursor;

    #[test]
    fn test_stdio_is_not_owned() {
        assert!(is_stdio::<io::Stdin>());
        assert!(is_stdio::<io::StdoutLock<'static>>());
        assert!(!is_stdio::<Cursor<Vec<u8>>>());
        assert!(!is_stdio::<Vec<u8>>());
    }

    #[test]
    fn test_other_kind_single_frame() {
        let kind = FramingKind::Other("other".into());
        let reader = new_reader(
            kind.clone(),
            Cursor::new(b"opaque".to_vec()),
            &[OptionsOverride::max_frames(1)],
        );
        assert_eq!(reader.read_frame().unwrap().as_deref(), Some(&b"opaque"[..]));
        assert_eq!(reader.read_frame(), Ok(None));
        assert_eq!(reader.read_frame(), Err(FrameError::Closed));
    }

    #[test]
    fn test_other_kind_rejected_for_many_frames() {
        let kind = FramingKind::Other("other".into());
        let reader = new_reader(kind.clone(), Cursor::new(b"opaque".to_vec()), &[]);
        assert_eq!(
            reader.read_frame(),
            Err(FrameError::UnsupportedFramingKind(kind.clone()))
        );
        let writer = new_writer(kind.clone(), Vec::new(), &[]);
        assert_eq!(
            writer.write_frame(b"opaque"),
            Err(FrameError::UnsupportedFramingKind(kind))
        );
    }

    #[test]
    fn test_factory_defaults_are_layered() {
        let factory = Factory::new(FrameOptions::default().with(&OptionsOverride::max_frames(4)));
        let reader = factory.new_reader(
            FramingKind::Json,
            Cursor::new(Vec::new()),
            &[OptionsOverride::max_frame_size(64)],
        );
        assert_eq!(reader.options().max_frames, 4);
        assert_eq!(reader.options().max_frame_size, 64);
        assert_eq!(reader.framing_kind(), &FramingKind::Json);
    }
}
