// chromashift-core/src/stream.rs
//! Stream plumbing: bytes in, colorized units out.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use std::io::{self, Read, Write};

use crate::engine::ColorizationEngine;
use crate::segmenter::LineSegmenter;

/// Read size used by [`copy_colorized`].
pub const READ_BUFFER_SIZE: usize = 4096;

/// An `io::Write` adapter that colorizes every completed unit before it
/// reaches the sink. Each stream needs its own writer.
pub struct ColorizingWriter<'e, W: Write> {
    engine: &'e dyn ColorizationEngine,
    segmenter: LineSegmenter,
    sink: W,
}

impl<'e, W: Write> ColorizingWriter<'e, W> {
    pub fn new(engine: &'e dyn ColorizationEngine, sink: W) -> Self {
        Self { engine, segmenter: LineSegmenter::new(), sink }
    }

    /// Ends the stream. An unterminated tail is dropped, mirroring how a
    /// partially drawn line would be lost by the terminal anyway.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(tail) = self.segmenter.finish() {
            debug!("Discarding {} byte(s) of unterminated output", tail.len());
        }
        self.sink.flush()?;
        Ok(self.sink)
    }
}

impl<W: Write> Write for ColorizingWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for unit in self.segmenter.feed(buf) {
            let styled = self.engine.colorize(&unit.text);
            self.sink.write_all(styled.as_bytes())?;
            let mut term = [0u8; 4];
            self.sink.write_all(unit.terminator().encode_utf8(&mut term).as_bytes())?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }
}

/// Pumps `reader` into a [`ColorizingWriter`] until end of stream, flushing
/// after every read so output appears as soon as a unit completes.
pub fn copy_colorized<R: Read, W: Write>(
    mut reader: R,
    engine: &dyn ColorizationEngine,
    sink: W,
) -> io::Result<W> {
    let mut writer = ColorizingWriter::new(engine, sink);
    let mut buf = [0u8; READ_BUFFER_SIZE];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buf[..n])?;
        writer.flush()?;
    }
    writer.finish()
}
