// src/core/storage.rs
//
// Storage collaborator: opens named byte streams for the serializer.
// Streams are closed when dropped; writers should be flushed first.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// How a stream is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Read,
    /// Create or truncate
    Write,
}

/// Something that can hand out named byte streams.
pub trait StorageProvider {
    type Stream: Read + Write;

    fn open(&self, path: &str, mode: OpenMode) -> io::Result<Self::Stream>;
}

/// Streams backed by files under a root directory.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Storage rooted at the current directory, so paths resolve as given.
    pub fn cwd() -> Self {
        Self::new("")
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl StorageProvider for FsStorage {
    type Stream = File;

    fn open(&self, path: &str, mode: OpenMode) -> io::Result<File> {
        let full = self.resolve(path);
        match mode {
            OpenMode::Read => File::open(full),
            OpenMode::Write => File::create(full),
        }
    }
}

type FileTable = Rc<RefCell<HashMap<String, Vec<u8>>>>;

/// In-memory storage. Clones share the same file table.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    files: FileTable,
    write_limit: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stream opened for writing accepts at most `limit` bytes,
    /// like a nearly full card.
    pub fn with_write_limit(limit: usize) -> Self {
        Self {
            files: FileTable::default(),
            write_limit: Some(limit),
        }
    }

    pub fn insert(&self, path: &str, bytes: Vec<u8>) {
        self.files.borrow_mut().insert(path.to_string(), bytes);
    }

    pub fn contents(&self, path: &str) -> Option<Vec<u8>> {
        self.files.borrow().get(path).cloned()
    }

    pub fn exists(&self, path: &str) -> bool {
        self.files.borrow().contains_key(path)
    }
}

impl StorageProvider for MemoryStorage {
    type Stream = MemoryStream;

    fn open(&self, path: &str, mode: OpenMode) -> io::Result<MemoryStream> {
        let data = match mode {
            OpenMode::Read => self
                .files
                .borrow()
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.to_string()))?,
            OpenMode::Write => {
                // Created empty right away, as a real filesystem would.
                self.files.borrow_mut().insert(path.to_string(), Vec::new());
                Vec::new()
            }
        };

        Ok(MemoryStream {
            path: path.to_string(),
            files: Rc::clone(&self.files),
            cursor: Cursor::new(data),
            mode,
            write_limit: self.write_limit,
        })
    }
}

/// Stream handed out by [`MemoryStorage`]. Written bytes are committed on
/// flush and on drop.
#[derive(Debug)]
pub struct MemoryStream {
    path: String,
    files: FileTable,
    cursor: Cursor<Vec<u8>>,
    mode: OpenMode,
    write_limit: Option<usize>,
}

impl MemoryStream {
    fn commit(&self) {
        if self.mode == OpenMode::Write {
            self.files
                .borrow_mut()
                .insert(self.path.clone(), self.cursor.get_ref().clone());
        }
    }
}

impl Read for MemoryStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.mode != OpenMode::Read {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "stream opened for writing"));
        }
        self.cursor.read(buf)
    }
}

impl Write for MemoryStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.mode != OpenMode::Write {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "stream opened for reading"));
        }
        let room = match self.write_limit {
            Some(limit) => limit.saturating_sub(self.cursor.get_ref().len()),
            None => buf.len(),
        };
        let n = buf.len().min(room);
        self.cursor.write(&buf[..n])
    }

    fn flush(&mut self) -> io::Result<()> {
        self.commit();
        Ok(())
    }
}

impl Drop for MemoryStream {
    fn drop(&mut self) {
        self.commit();
    }
}
