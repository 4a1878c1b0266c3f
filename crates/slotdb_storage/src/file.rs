//! File-based storage backend for persistent storage.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use fs2::FileExt;
use parking_lot::RwLock;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// A file-based storage backend.
///
/// Data survives process restarts. Positioned reads and writes go through a
/// single file handle guarded by an internal lock, so the backend can be
/// shared across threads.
///
/// # Durability
///
/// - `flush()` calls `File::flush()` to push data to the OS
/// - `sync()` calls `File::sync_all()` to ensure data is on disk
///
/// # Locking
///
/// [`StorageBackend::try_lock_exclusive`] takes an advisory `fs2` lock on the
/// handle. The lock lives as long as the backend and is released when it is
/// dropped.
///
/// # Example
///
/// ```no_run
/// use slotdb_storage::{StorageBackend, FileBackend};
/// use std::path::Path;
///
/// let mut backend = FileBackend::create(Path::new("data.db")).unwrap();
/// backend.append(b"persistent data").unwrap();
/// backend.sync().unwrap();
/// ```
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    file: RwLock<File>,
    size: RwLock<u64>,
}

impl FileBackend {
    /// Opens an existing file for reading and writing.
    ///
    /// # Errors
    ///
    /// Returns an I/O error of kind `NotFound` if the file does not exist.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Self::from_file(path, file)
    }

    /// Creates a new, empty file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an I/O error of kind `AlreadyExists` if the file exists.
    pub fn create(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(path)?;
        Self::from_file(path, file)
    }

    fn from_file(path: &Path, file: File) -> StorageResult<Self> {
        let size = file.metadata()?.len();
        Ok(Self {
            path: path.to_path_buf(),
            file: RwLock::new(file),
            size: RwLock::new(size),
        })
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for FileBackend {
    fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>> {
        let size = *self.size.read();
        let end = offset.saturating_add(len as u64);

        if offset > size || end > size {
            return Err(StorageError::ReadPastEnd { offset, len, size });
        }

        if len == 0 {
            return Ok(Vec::new());
        }

        let mut file = self.file.write();
        file.seek(SeekFrom::Start(offset))?;

        let mut buffer = vec![0u8; len];
        file.read_exact(&mut buffer)?;

        Ok(buffer)
    }

    fn write_at(&mut self, offset: u64, data: &[u8]) -> StorageResult<()> {
        let mut file = self.file.write();
        let mut size = self.size.write();

        if offset > *size {
            return Err(StorageError::WritePastEnd {
                offset,
                size: *size,
            });
        }

        if data.is_empty() {
            return Ok(());
        }

        file.seek(SeekFrom::Start(offset))?;
        file.write_all(data)?;
        *size = (*size).max(offset + data.len() as u64);

        Ok(())
    }

    fn append(&mut self, data: &[u8]) -> StorageResult<u64> {
        if data.is_empty() {
            return Ok(*self.size.read());
        }

        let mut file = self.file.write();
        let mut size = self.size.write();

        let offset = *size;
        file.seek(SeekFrom::End(0))?;
        file.write_all(data)?;
        *size += data.len() as u64;

        Ok(offset)
    }

    fn flush(&mut self) -> StorageResult<()> {
        let mut file = self.file.write();
        file.flush()?;
        Ok(())
    }

    fn size(&self) -> StorageResult<u64> {
        Ok(*self.size.read())
    }

    fn sync(&mut self) -> StorageResult<()> {
        let file = self.file.write();
        file.sync_all()?;
        Ok(())
    }

    fn try_lock_exclusive(&self) -> StorageResult<bool> {
        let file = self.file.read();
        match FileExt::try_lock_exclusive(&*file) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_create_new() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        let backend = FileBackend::create(&path).unwrap();
        assert_eq!(backend.size().unwrap(), 0);
        assert!(path.exists());
    }

    #[test]
    fn create_refuses_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        FileBackend::create(&path).unwrap();
        let result = FileBackend::create(&path);
        assert!(
            matches!(result, Err(StorageError::Io(ref e)) if e.kind() == std::io::ErrorKind::AlreadyExists)
        );
    }

    #[test]
    fn open_missing_file_fails() {
        let dir = tempdir().unwrap();
        let result = FileBackend::open(&dir.path().join("missing.db"));
        assert!(
            matches!(result, Err(StorageError::Io(ref e)) if e.kind() == std::io::ErrorKind::NotFound)
        );
    }

    #[test]
    fn file_append_and_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        let mut backend = FileBackend::create(&path).unwrap();

        assert_eq!(backend.append(b"hello").unwrap(), 0);
        assert_eq!(backend.append(b" world").unwrap(), 5);
        assert_eq!(backend.size().unwrap(), 11);
        assert_eq!(&backend.read_at(0, 11).unwrap(), b"hello world");
    }

    #[test]
    fn write_at_overwrites_in_place() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        let mut backend = FileBackend::create(&path).unwrap();
        backend.append(b"aaaabbbb").unwrap();
        backend.write_at(4, b"cc").unwrap();

        assert_eq!(backend.size().unwrap(), 8);
        assert_eq!(&backend.read_at(0, 8).unwrap(), b"aaaaccbb");
    }

    #[test]
    fn write_at_end_grows_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        let mut backend = FileBackend::create(&path).unwrap();
        backend.append(b"head").unwrap();
        backend.write_at(4, b"tail").unwrap();

        assert_eq!(backend.size().unwrap(), 8);
        assert_eq!(&backend.read_at(0, 8).unwrap(), b"headtail");
    }

    #[test]
    fn write_past_end_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        let mut backend = FileBackend::create(&path).unwrap();
        backend.append(b"head").unwrap();

        let result = backend.write_at(5, b"x");
        assert!(matches!(result, Err(StorageError::WritePastEnd { .. })));
    }

    #[test]
    fn file_read_past_end_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        let mut backend = FileBackend::create(&path).unwrap();
        backend.append(b"hello").unwrap();

        let result = backend.read_at(3, 5);
        assert!(matches!(result, Err(StorageError::ReadPastEnd { .. })));
        assert!(result.unwrap_err().is_past_end());
    }

    #[test]
    fn file_persistence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        {
            let mut backend = FileBackend::create(&path).unwrap();
            backend.append(b"persistent data").unwrap();
            backend.write_at(0, b"P").unwrap();
            backend.sync().unwrap();
        }

        {
            let backend = FileBackend::open(&path).unwrap();
            assert_eq!(backend.size().unwrap(), 15);
            assert_eq!(&backend.read_at(0, 15).unwrap(), b"Persistent data");
        }
    }

    #[test]
    fn exclusive_lock_is_contended_by_second_handle() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        let first = FileBackend::create(&path).unwrap();
        assert!(first.try_lock_exclusive().unwrap());

        let second = FileBackend::open(&path).unwrap();
        assert!(!second.try_lock_exclusive().unwrap());

        drop(first);
        assert!(second.try_lock_exclusive().unwrap());
    }

    #[test]
    fn file_create_with_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("path").join("test.db");

        let backend = FileBackend::create(&path).unwrap();
        assert_eq!(backend.size().unwrap(), 0);
        assert_eq!(backend.path(), path);
    }
}
