//! Read-only access to packed resources.
//!
//! An [`Archive`] locates a named entry with [`Archive::seek`] and then streams
//! it with [`Archive::read`]. Dropping the archive closes it.
//!
//! Two implementations ship with the crate: [`AssetDir`] reads entries from a
//! directory on disk (by default the `assets/` folder next to the binary) and
//! [`MemoryArchive`] keeps entries in memory.

use std::{
    collections::HashMap,
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use crate::errors::{IngestError, Result};

pub trait Archive {
    /// Position the archive at the start of `name` and return its byte length.
    fn seek(&mut self, name: &str) -> Result<usize>;

    /// Read from the current entry into `buf`. Returns 0 at the end of the entry.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Seek to `name` and read the whole entry.
    fn read_entry(&mut self, name: &str) -> Result<Vec<u8>> {
        let len = self.seek(name)?;
        let mut data = vec![0; len];
        let mut filled = 0;
        while filled < len {
            let read = self.read(&mut data[filled..])?;
            if read == 0 {
                return Err(IngestError::Unavailable {
                    name: name.to_string(),
                    reason: format!("entry ended after {} of {} bytes", filled, len),
                });
            }
            filled += read;
        }
        Ok(data)
    }
}

/// Entries are files below a root directory, named by their relative path.
#[derive(Debug)]
pub struct AssetDir {
    root: PathBuf,
    current: Option<(String, File)>,
}

impl AssetDir {
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(IngestError::Unavailable {
                name: root.display().to_string(),
                reason: "not a directory".to_string(),
            });
        }
        Ok(Self {
            root,
            current: None,
        })
    }
}

impl Archive for AssetDir {
    fn seek(&mut self, name: &str) -> Result<usize> {
        self.current = None;
        let path = self.root.join(name);
        let file = File::open(&path).map_err(|source| IngestError::Io {
            name: name.to_string(),
            source,
        })?;
        let len = file
            .metadata()
            .map_err(|source| IngestError::Io {
                name: name.to_string(),
                source,
            })?
            .len() as usize;
        if len == 0 {
            return Err(IngestError::Unavailable {
                name: name.to_string(),
                reason: "entry is empty".to_string(),
            });
        }
        self.current = Some((name.to_string(), file));
        Ok(len)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let (name, file) = self.current.as_mut().ok_or_else(|| IngestError::Unavailable {
            name: String::new(),
            reason: "read before seek".to_string(),
        })?;
        file.read(buf).map_err(|source| IngestError::Io {
            name: name.clone(),
            source,
        })
    }
}

/// Entries held in memory. Mostly useful for tests and embedded assets.
#[derive(Debug, Default, Clone)]
pub struct MemoryArchive {
    entries: HashMap<String, Vec<u8>>,
    current: Option<(String, usize)>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, name: &str, data: impl Into<Vec<u8>>) -> Self {
        self.insert(name, data);
        self
    }

    pub fn insert(&mut self, name: &str, data: impl Into<Vec<u8>>) {
        self.entries.insert(name.to_string(), data.into());
    }
}

impl Archive for MemoryArchive {
    fn seek(&mut self, name: &str) -> Result<usize> {
        self.current = None;
        let len = match self.entries.get(name) {
            Some(data) if !data.is_empty() => data.len(),
            Some(_) => {
                return Err(IngestError::Unavailable {
                    name: name.to_string(),
                    reason: "entry is empty".to_string(),
                });
            }
            None => {
                return Err(IngestError::Unavailable {
                    name: name.to_string(),
                    reason: "no such entry".to_string(),
                });
            }
        };
        self.current = Some((name.to_string(), 0));
        Ok(len)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let (name, pos) = self.current.as_mut().ok_or_else(|| IngestError::Unavailable {
            name: String::new(),
            reason: "read before seek".to_string(),
        })?;
        let data = self.entries.get(name.as_str()).map_or(&[][..], Vec::as_slice);
        let n = buf.len().min(data.len().saturating_sub(*pos));
        buf[..n].copy_from_slice(&data[*pos..*pos + n]);
        *pos += n;
        Ok(n)
    }
}
