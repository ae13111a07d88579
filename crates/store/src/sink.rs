//! Output sinks with atomic publish
//!
//! A path destination is written to a temporary file next to the target
//! and renamed over it only by [`OutputSink::publish`]. A writer destination
//! is buffered in memory and receives the bytes only on publish. Dropping an
//! unpublished sink discards everything, so a failed or cancelled build never
//! leaves a partial document at the destination.

use crate::{Result, StoreError};
use std::fmt;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Where a generated document goes
pub enum Destination {
    Path(PathBuf),
    Writer(Box<dyn Write + Send>),
}

impl Destination {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Destination::Path(path.into())
    }

    pub fn writer(writer: impl Write + Send + 'static) -> Self {
        Destination::Writer(Box::new(writer))
    }

    /// Human-readable target for logs and reports
    pub fn describe(&self) -> String {
        match self {
            Destination::Path(path) => path.display().to_string(),
            Destination::Writer(_) => "<stream>".to_string(),
        }
    }
}

impl fmt::Debug for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Destination::Writer(_) => f.write_str("Writer(..)"),
        }
    }
}

enum SinkKind {
    File {
        target: PathBuf,
        temp: BufWriter<NamedTempFile>,
    },
    Stream {
        writer: Box<dyn Write + Send>,
        buffer: Vec<u8>,
    },
}

/// An acquired, exclusively owned output
pub struct OutputSink {
    kind: SinkKind,
    written: u64,
}

impl OutputSink {
    /// Open the destination. For paths this creates the temporary file in
    /// the target's directory, so an unwritable location fails here.
    pub fn acquire(destination: Destination) -> Result<Self> {
        let kind = match destination {
            Destination::Path(target) => {
                if target.is_dir() {
                    return Err(sink_error(
                        &target,
                        io::Error::new(io::ErrorKind::InvalidInput, "destination is a directory"),
                    ));
                }
                let dir = parent_dir(&target);
                let temp = NamedTempFile::new_in(dir).map_err(|e| sink_error(&target, e))?;
                tracing::debug!("Staging {} at {}", target.display(), temp.path().display());
                SinkKind::File {
                    target,
                    temp: BufWriter::new(temp),
                }
            }
            Destination::Writer(writer) => SinkKind::Stream {
                writer,
                buffer: Vec::new(),
            },
        };
        Ok(Self { kind, written: 0 })
    }

    /// Bytes accepted so far
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    pub fn describe(&self) -> String {
        match &self.kind {
            SinkKind::File { target, .. } => target.display().to_string(),
            SinkKind::Stream { .. } => "<stream>".to_string(),
        }
    }

    /// Flush and make the output visible at the destination
    pub fn publish(self) -> Result<u64> {
        match self.kind {
            SinkKind::File { target, temp } => {
                let temp = temp
                    .into_inner()
                    .map_err(|e| sink_error(&target, e.into_error()))?;
                temp.as_file()
                    .sync_all()
                    .map_err(|e| sink_error(&target, e))?;
                temp.persist(&target)
                    .map_err(|e| sink_error(&target, e.error))?;
                tracing::debug!("Published {}", target.display());
            }
            SinkKind::Stream { mut writer, buffer } => {
                writer.write_all(&buffer)?;
                writer.flush()?;
            }
        }
        Ok(self.written)
    }
}

impl Write for OutputSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = match &mut self.kind {
            SinkKind::File { temp, .. } => temp.write(buf)?,
            SinkKind::Stream { buffer, .. } => {
                buffer.extend_from_slice(buf);
                buf.len()
            }
        };
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.kind {
            SinkKind::File { temp, .. } => temp.flush(),
            SinkKind::Stream { .. } => Ok(()),
        }
    }
}

fn parent_dir(target: &Path) -> &Path {
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn sink_error(target: &Path, source: io::Error) -> StoreError {
    StoreError::Sink {
        target: target.display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// Writer whose contents stay inspectable after it is boxed
    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn test_publish_moves_into_place() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("invoice.pdf");

        let mut sink = OutputSink::acquire(Destination::path(&target)).unwrap();
        sink.write_all(b"%PDF-1.4\n").unwrap();
        assert!(!target.exists());

        assert_eq!(sink.publish().unwrap(), 9);
        assert_eq!(std::fs::read(&target).unwrap(), b"%PDF-1.4\n");
        assert_eq!(entries(temp_dir.path()), 1);
    }

    #[test]
    fn test_drop_leaves_nothing_behind() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("invoice.pdf");
        {
            let mut sink = OutputSink::acquire(Destination::path(&target)).unwrap();
            sink.write_all(b"partial").unwrap();
        }
        assert!(!target.exists());
        assert_eq!(entries(temp_dir.path()), 0);
    }

    #[test]
    fn test_existing_file_kept_until_publish() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("invoice.pdf");
        std::fs::write(&target, b"old").unwrap();

        let mut sink = OutputSink::acquire(Destination::path(&target)).unwrap();
        sink.write_all(b"new").unwrap();
        drop(sink);
        assert_eq!(std::fs::read(&target).unwrap(), b"old");
    }

    #[test]
    fn test_missing_directory_fails_acquisition() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("missing").join("invoice.pdf");
        assert!(matches!(
            OutputSink::acquire(Destination::path(target)),
            Err(StoreError::Sink { .. })
        ));
    }

    #[test]
    fn test_directory_target_rejected() {
        let temp_dir = TempDir::new().unwrap();
        assert!(matches!(
            OutputSink::acquire(Destination::path(temp_dir.path())),
            Err(StoreError::Sink { .. })
        ));
    }

    #[test]
    fn test_stream_destination() {
        let buffer = SharedBuffer::default();
        let mut sink = OutputSink::acquire(Destination::writer(buffer.clone())).unwrap();
        sink.write_all(b"abc").unwrap();
        assert_eq!(sink.describe(), "<stream>");
        assert!(buffer.0.lock().unwrap().is_empty());
        assert_eq!(sink.publish().unwrap(), 3);
        assert_eq!(*buffer.0.lock().unwrap(), b"abc");
    }

    #[test]
    fn test_unpublished_stream_receives_nothing() {
        let buffer = SharedBuffer::default();
        {
            let mut sink = OutputSink::acquire(Destination::writer(buffer.clone())).unwrap();
            sink.write_all(b"%PDF-1.4\npartial").unwrap();
            sink.flush().unwrap();
        }
        assert!(buffer.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_destination_debug() {
        assert_eq!(format!("{:?}", Destination::writer(io::sink())), "Writer(..)");
        assert!(format!("{:?}", Destination::path("a.pdf")).contains("a.pdf"));
    }
}
