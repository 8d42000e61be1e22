//! Byte sources feeding the archive writer.
//!
//! Each input is drained once, when the writer reaches it, so large inputs
//! are not held in memory before their turn.

use std::io::Read;
use std::path::{Path, PathBuf};
use zipcodec_core::error::Result;

/// Something that can hand over its full contents once.
pub trait ByteSource: Send {
    /// Read the entire content.
    fn read_all(&mut self) -> Result<Vec<u8>>;

    /// Size in bytes, when known in advance.
    fn len_hint(&self) -> Option<u64> {
        None
    }
}

/// An in-memory buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    data: Vec<u8>,
}

impl MemorySource {
    /// Wrap a buffer.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }
}

impl ByteSource for MemorySource {
    fn read_all(&mut self) -> Result<Vec<u8>> {
        Ok(std::mem::take(&mut self.data))
    }

    fn len_hint(&self) -> Option<u64> {
        Some(self.data.len() as u64)
    }
}

/// A file on disk, opened when read.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Refer to the file at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The path this source reads.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for FileSource {
    fn read_all(&mut self) -> Result<Vec<u8>> {
        Ok(std::fs::read(&self.path)?)
    }

    fn len_hint(&self) -> Option<u64> {
        std::fs::metadata(&self.path).ok().map(|m| m.len())
    }
}

/// Any reader, drained to its end.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
}

impl<R: Read + Send> ReaderSource<R> {
    /// Wrap a reader.
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read + Send> ByteSource for ReaderSource<R> {
    fn read_all(&mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.reader.read_to_end(&mut out)?;
        Ok(out)
    }
}

/// Convenience: open a file as a boxed source.
pub fn open_file(path: impl AsRef<Path>) -> Box<dyn ByteSource> {
    Box::new(FileSource::new(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_memory_source() {
        let mut src = MemorySource::new(b"hello".to_vec());
        assert_eq!(src.len_hint(), Some(5));
        assert_eq!(src.read_all().unwrap(), b"hello");
    }

    #[test]
    fn test_reader_source() {
        let mut src = ReaderSource::new(Cursor::new(vec![1u8, 2, 3]));
        assert_eq!(src.len_hint(), None);
        assert_eq!(src.read_all().unwrap(), [1, 2, 3]);
    }

    #[test]
    fn test_file_source() {
        let dir = std::env::temp_dir().join(format!("zipcodec_source_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("input.bin");
        std::fs::write(&path, b"on disk").unwrap();

        let mut src = FileSource::new(&path);
        assert_eq!(src.len_hint(), Some(7));
        assert_eq!(src.read_all().unwrap(), b"on disk");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let mut src = open_file("/definitely/not/here.bin");
        assert!(matches!(
            src.read_all(),
            Err(zipcodec_core::ZipError::Io(_))
        ));
    }
}
