//! Line-oriented YAML document splitter

use crate::bounded::BoundedSource;
use crate::constants::{YAML_SEPARATOR, YAML_SEPARATOR_ALLOWANCE};
use crate::error::FrameError;
use crate::raw::RawReader;
use crate::sanitize::sanitized_yaml_len;
use crate::types::{Frame, FramingKind};
use crate::Result;
use bytes::BytesMut;
use std::io::{BufRead, BufReader, Read};

#[cfg(feature = "logging")]
use tracing::trace;

/// Splits a YAML stream into documents at `---` lines
///
/// The underlying source may deliver `max_frame_size + 4` bytes per document, so
/// that the separator line which ends an in-bounds document is still visible. The
/// sanitized length of the returned document is then checked against
/// `max_frame_size` itself, so whatever a writer accepts at the limit reads back.
///
/// A separator line met while the current document is still empty is kept as
/// document content and left for the sanitizer to strip. It does not count
/// against the document's byte budget.
#[derive(Debug)]
pub struct YamlReader<R> {
    kind: FramingKind,
    source: BufReader<BoundedSource<R>>,
    max_frame_size: u64,
    line: Vec<u8>,
}

impl<R: Read + Send> YamlReader<R> {
    /// Create a splitter over `source`
    pub fn new(source: R, max_frame_size: u64) -> Self {
        let limit = max_frame_size.saturating_add(YAML_SEPARATOR_ALLOWANCE);
        Self {
            kind: FramingKind::Yaml,
            source: BufReader::new(BoundedSource::new(source, limit)),
            max_frame_size,
            line: Vec::new(),
        }
    }

    /// Read one line into `self.line`, ending in `\n` unless the stream is exhausted
    fn next_line(&mut self) -> Result<bool> {
        self.line.clear();
        let n = self.source.read_until(b'\n', &mut self.line).map_err(|e| {
            match FrameError::from(e) {
                // Report the configured limit, not the separator allowance.
                FrameError::SizeOverflow(_) => FrameError::SizeOverflow(self.max_frame_size),
                other => other,
            }
        })?;
        if n == 0 {
            return Ok(false);
        }

        if self.line.ends_with(b"\r\n") {
            self.line.truncate(self.line.len() - 2);
        } else if self.line.ends_with(b"\n") {
            self.line.truncate(self.line.len() - 1);
        }
        self.line.push(b'\n');
        Ok(true)
    }

    fn document_done(&mut self, document: BytesMut) -> Result<Option<Frame>> {
        self.source.get_mut().reset();
        let document = document.freeze();
        if sanitized_yaml_len(&document) as u64 > self.max_frame_size {
            return Err(FrameError::SizeOverflow(self.max_frame_size));
        }
        Ok(Some(document))
    }
}

/// A line that starts with `---`, optionally followed by whitespace and a `#` comment
fn is_separator(line: &[u8]) -> bool {
    if !line.starts_with(YAML_SEPARATOR) {
        return false;
    }
    let rest = &line[YAML_SEPARATOR.len()..];
    match rest.iter().position(|b| !b.is_ascii_whitespace()) {
        None => true,
        // The comment must be set apart by whitespace, `---#` is content.
        Some(start) => start > 0 && rest[start] == b'#',
    }
}

impl<R: Read + Send> RawReader for YamlReader<R> {
    fn framing_kind(&self) -> &FramingKind {
        &self.kind
    }

    fn read_frame(&mut self) -> Result<Option<Frame>> {
        let mut document = BytesMut::new();
        loop {
            if !self.next_line()? {
                if document.is_empty() {
                    #[cfg(feature = "logging")]
                    trace!("End of YAML stream");
                    return Ok(None);
                }
                return self.document_done(document);
            }

            if is_separator(&self.line) {
                if !document.is_empty() {
                    return self.document_done(document);
                }
                // Leading separators are stripped later and do not use up the budget.
                self.source.get_mut().reset();
            }
            document.extend_from_slice(&self.line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn frames(input: &str, max: u64) -> Vec<Result<Option<String>>> {
        let mut reader = YamlReader::new(Cursor::new(input.as_bytes().to_vec()), max);
        let mut out = Vec::new();
        loop {
            let next = reader
                .read_frame()
                .map(|f| f.map(|f| String::from_utf8(f.to_vec()).unwrap()));
            let stop = !matches!(next, Ok(Some(_)));
            out.push(next);
            if stop {
                return out;
            }
        }
    }

    #[test]
    fn test_split_on_separator_lines() {
        let out = frames("a: 1\n---\nb: 2\n", 1024);
        assert_eq!(
            out,
            vec![Ok(Some("a: 1\n".into())), Ok(Some("b: 2\n".into())), Ok(None)]
        );
    }

    #[test]
    fn test_leading_separator_is_kept_as_content() {
        let out = frames("---\na: 1\n", 1024);
        assert_eq!(out, vec![Ok(Some("---\na: 1\n".into())), Ok(None)]);
    }

    #[test]
    fn test_crlf_is_normalized() {
        let out = frames("a: 1\r\n---\r\nb: 2", 1024);
        assert_eq!(
            out,
            vec![Ok(Some("a: 1\n".into())), Ok(Some("b: 2\n".into())), Ok(None)]
        );
    }

    #[test]
    fn test_separator_with_trailing_text_is_content() {
        let out = frames("a: |\n  ---x\n--- \nb: 2\n", 1024);
        assert_eq!(
            out,
            vec![
                Ok(Some("a: |\n  ---x\n".into())),
                Ok(Some("b: 2\n".into())),
                Ok(None)
            ]
        );
    }

    #[test]
    fn test_separator_with_comment() {
        let out = frames("a: 1\n--- # second\nb: 2\n---\t#third\nc: 3\n", 1024);
        assert_eq!(
            out,
            vec![
                Ok(Some("a: 1\n".into())),
                Ok(Some("b: 2\n".into())),
                Ok(Some("c: 3\n".into())),
                Ok(None)
            ]
        );
    }

    #[test]
    fn test_separator_glued_to_text_is_content() {
        let out = frames("a: 1\n---#x\n--- b\n", 1024);
        assert_eq!(out, vec![Ok(Some("a: 1\n---#x\n--- b\n".into())), Ok(None)]);
    }

    #[test]
    fn test_written_documents_at_limit_read_back() {
        // Writer output for two frames of exactly 13 bytes.
        let out = frames("---\nfoobar: true\n---\nfoobar: true\n", 13);
        assert_eq!(
            out,
            vec![
                Ok(Some("---\nfoobar: true\n".into())),
                Ok(Some("foobar: true\n".into())),
                Ok(None)
            ]
        );
    }

    #[test]
    fn test_document_exactly_at_limit() {
        let out = frames("foobar: true\n---\nfoobar: true\n", 13);
        assert_eq!(
            out,
            vec![
                Ok(Some("foobar: true\n".into())),
                Ok(Some("foobar: true\n".into())),
                Ok(None)
            ]
        );
    }

    #[test]
    fn test_document_over_limit_on_same_line() {
        let out = frames("foobar: true\n", 12);
        assert_eq!(out, vec![Err(FrameError::SizeOverflow(12))]);
    }

    #[test]
    fn test_document_over_limit_on_next_line() {
        let out = frames("foobar: true\nfoobar: true\n", 13);
        assert_eq!(out, vec![Err(FrameError::SizeOverflow(13))]);
    }

    #[test]
    fn test_separator_only_stream() {
        let out = frames("---\n", 1024);
        assert_eq!(out, vec![Ok(Some("---\n".into())), Ok(None)]);
    }
}
